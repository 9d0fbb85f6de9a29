mod config;
mod error;
mod output;

use std::io::Read;

use clap::{Parser, Subcommand};
use fnt_client::{Fields, TiddlyWebClient};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Addressing, resolve_addressing};
use crate::error::FntToolError;
use crate::output::{parse_field, tiddler_json};

#[derive(Parser)]
#[command(name = "fnt")]
#[command(about = "Get, put and delete tiddlers on a TiddlyWeb server", long_about = None)]
struct Cli {
    /// Server base URI, e.g. http://localhost:8080
    #[arg(long, global = true)]
    host: Option<String>,

    /// Bag holding the tiddler
    #[arg(long, global = true, conflicts_with = "recipe")]
    bag: Option<String>,

    /// Recipe to address the tiddler through
    #[arg(long, global = true)]
    recipe: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch a tiddler and print its text
    Get {
        title: String,

        /// Print the whole tiddler, metadata included, as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create or replace a tiddler
    Put {
        title: String,

        /// Tiddler text; read from stdin when omitted
        #[arg(long)]
        text: Option<String>,

        /// Tag to attach (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Content type, e.g. text/x-markdown
        #[arg(long = "type")]
        tiddler_type: Option<String>,

        /// Extra field as key=value (repeatable)
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
    /// Delete a tiddler
    Delete { title: String },
}

fn read_stdin() -> Result<String, FntToolError> {
    let mut text = String::new();
    std::io::stdin().read_to_string(&mut text)?;
    Ok(text)
}

async fn run(cli: Cli) -> Result<(), FntToolError> {
    let addressing = resolve_addressing(Addressing {
        host: cli.host,
        bag: cli.bag,
        recipe: cli.recipe,
    })?;
    debug!(?addressing, "Resolved addressing");

    let client = TiddlyWebClient::new();

    match cli.command {
        Command::Get { title, json } => {
            let mut tiddler = addressing.tiddler(&title);
            client.get(&mut tiddler).await?;
            if json {
                println!("{:#}", tiddler_json(&tiddler));
            } else {
                println!("{}", tiddler.text.as_deref().unwrap_or(""));
            }
        }
        Command::Put {
            title,
            text,
            tags,
            tiddler_type,
            fields,
        } => {
            let mut tiddler = addressing.tiddler(&title);
            // Fail on bad addressing before blocking on stdin.
            tiddler.uri().map_err(fnt_client::FntError::from)?;
            tiddler.text = Some(match text {
                Some(text) => text,
                None => read_stdin()?,
            });
            tiddler.tags = tags;
            tiddler.tiddler_type = tiddler_type;
            tiddler.fields = fields.into_iter().collect::<Fields>();
            client.put(&tiddler).await?;
        }
        Command::Delete { title } => {
            client.delete(&addressing.tiddler(&title)).await?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    run(cli).await?;

    Ok(())
}
