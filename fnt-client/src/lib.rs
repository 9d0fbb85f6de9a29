//! Client for TiddlyWeb-style tiddler stores.
//!
//! A [`Tiddler`] is a titled document living in a bag (or reached through a
//! recipe) on a host. [`TiddlyWebClient`] reads, writes and deletes tiddlers
//! over HTTP with JSON bodies; [`NotifyingClient`] additionally broadcasts
//! each outcome as a named event.
//!
//! # Example
//!
//! ```ignore
//! use fnt_client::{Tiddler, TiddlyWebClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), fnt_client::FntError> {
//!     let client = TiddlyWebClient::new();
//!
//!     let mut tiddler = Tiddler::new("HelloThere")
//!         .with_host("http://localhost:8080")
//!         .in_bag("common")
//!         .with_text("Welcome!");
//!     tiddler.tags.push("intro".to_string());
//!     client.put(&tiddler).await?;
//!
//!     // Read it back; server metadata is filled in.
//!     client.get(&mut tiddler).await?;
//!     println!("{:?} by {:?}", tiddler.revision(), tiddler.modifier());
//!     Ok(())
//! }
//! ```

mod client;
mod convert;
mod error;
mod events;
mod timestamp;
mod types;
mod uri;

pub use client::TiddlyWebClient;
pub use convert::{apply_json, to_json};
pub use error::{ConfigurationError, FntError, Method, TimestampError};
pub use events::{ErrorEvent, EventBus, NotifyingClient, TiddlerEvent};
pub use timestamp::{format_timestamp, parse_timestamp};
pub use types::{Container, Fields, Tiddler};
