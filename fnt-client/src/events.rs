//! Named completion notifications for callers that want broadcast semantics.
//!
//! The client itself returns results directly. [`NotifyingClient`] layers a
//! publish step on top so that several listeners (a UI, a log, a sync loop)
//! can observe outcomes as `tiddlerGet`, `tiddlerPut`, `tiddlerDelete` and
//! `error` events.

use tokio::sync::broadcast;
use tracing::trace;

use crate::client::TiddlyWebClient;
use crate::error::{FntError, Method};
use crate::types::Tiddler;

const DEFAULT_CAPACITY: usize = 64;

/// Details of a failed operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorEvent {
    pub tiddler: Tiddler,
    /// `uri` for addressing failures, otherwise the HTTP operation.
    pub method: Method,
    pub status: Option<u16>,
    pub msg: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TiddlerEvent {
    Get(Tiddler),
    Put(Tiddler),
    Delete(Tiddler),
    Error(ErrorEvent),
}

impl TiddlerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            TiddlerEvent::Get(_) => "tiddlerGet",
            TiddlerEvent::Put(_) => "tiddlerPut",
            TiddlerEvent::Delete(_) => "tiddlerDelete",
            TiddlerEvent::Error(_) => "error",
        }
    }

    pub fn tiddler(&self) -> &Tiddler {
        match self {
            TiddlerEvent::Get(t) | TiddlerEvent::Put(t) | TiddlerEvent::Delete(t) => t,
            TiddlerEvent::Error(e) => &e.tiddler,
        }
    }

    fn from_outcome(
        method: Method,
        success: fn(Tiddler) -> TiddlerEvent,
        tiddler: &Tiddler,
        result: &Result<(), FntError>,
    ) -> Self {
        match result {
            Ok(()) => success(tiddler.clone()),
            Err(err) => {
                let msg = match err {
                    FntError::Status { message, .. } => message.clone(),
                    other => other.to_string(),
                };
                TiddlerEvent::Error(ErrorEvent {
                    tiddler: tiddler.clone(),
                    method: err.method().unwrap_or(method),
                    status: err.status(),
                    msg,
                })
            }
        }
    }
}

/// Broadcast channel for [`TiddlerEvent`]s.
///
/// Cloning yields another handle to the same channel. Slow subscribers that
/// fall more than the channel capacity behind miss the oldest events.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<TiddlerEvent>,
}

impl EventBus {
    /// Creates a bus holding up to `capacity` undelivered events. A capacity
    /// of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TiddlerEvent> {
        self.sender.subscribe()
    }

    /// Publishes an event, returning how many subscribers will see it.
    pub fn publish(&self, event: TiddlerEvent) -> usize {
        let name = event.name();
        let delivered = self.sender.send(event).unwrap_or(0);
        trace!(event = name, delivered, "Published event");
        delivered
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// A [`TiddlyWebClient`] that also publishes every outcome on an [`EventBus`].
#[derive(Debug, Clone)]
pub struct NotifyingClient {
    client: TiddlyWebClient,
    bus: EventBus,
}

impl NotifyingClient {
    pub fn new(client: TiddlyWebClient, bus: EventBus) -> Self {
        Self { client, bus }
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TiddlerEvent> {
        self.bus.subscribe()
    }

    /// Fetches a tiddler, then publishes `tiddlerGet` or `error`.
    pub async fn get(&self, tiddler: &mut Tiddler) -> Result<(), FntError> {
        let result = self.client.get(tiddler).await;
        self.bus
            .publish(TiddlerEvent::from_outcome(
                Method::Get,
                TiddlerEvent::Get,
                tiddler,
                &result,
            ));
        result
    }

    /// Stores a tiddler, then publishes `tiddlerPut` or `error`.
    pub async fn put(&self, tiddler: &Tiddler) -> Result<(), FntError> {
        let result = self.client.put(tiddler).await;
        self.bus
            .publish(TiddlerEvent::from_outcome(
                Method::Put,
                TiddlerEvent::Put,
                tiddler,
                &result,
            ));
        result
    }

    /// Deletes a tiddler, then publishes `tiddlerDelete` or `error`.
    pub async fn delete(&self, tiddler: &Tiddler) -> Result<(), FntError> {
        let result = self.client.delete(tiddler).await;
        self.bus
            .publish(TiddlerEvent::from_outcome(
                Method::Delete,
                TiddlerEvent::Delete,
                tiddler,
                &result,
            ));
        result
    }
}
