use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{RequestBuilder, Response};
use tracing::{debug, instrument};

use crate::convert::{apply_json, to_json};
use crate::error::{FntError, Method};
use crate::types::Tiddler;

/// Client for a TiddlyWeb-style tiddler store.
///
/// Holds no per-tiddler state: every call derives the URI from the tiddler
/// it is given. Authentication, cookies, proxies and timeouts are whatever
/// the wrapped `reqwest::Client` was built with.
#[derive(Debug, Clone, Default)]
pub struct TiddlyWebClient {
    http: reqwest::Client,
}

impl TiddlyWebClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// Creates a client over a preconfigured HTTP client.
    pub fn with_http_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Fetches a tiddler and fills in its content and server metadata.
    ///
    /// On any failure the tiddler is left unchanged.
    #[instrument(skip(self, tiddler), fields(title = %tiddler.title()))]
    pub async fn get(&self, tiddler: &mut Tiddler) -> Result<(), FntError> {
        let uri = tiddler.uri()?;
        debug!(%uri, "GET tiddler");

        let request = self.http.get(&uri).header(ACCEPT, "application/json");
        let response = send(Method::Get, request).await?;
        let body = response.text().await.map_err(|source| FntError::Http {
            method: Method::Get,
            source,
        })?;

        let document: serde_json::Value = serde_json::from_str(&body)?;
        apply_json(tiddler, &document)?;

        debug!(revision = ?tiddler.revision(), "Received tiddler");
        Ok(())
    }

    /// Stores a tiddler, creating or replacing it.
    ///
    /// No revision precondition is sent, so a concurrent writer's update is
    /// silently overwritten.
    #[instrument(skip(self, tiddler), fields(title = %tiddler.title()))]
    pub async fn put(&self, tiddler: &Tiddler) -> Result<(), FntError> {
        let uri = tiddler.uri()?;
        debug!(%uri, "PUT tiddler");

        let request = self
            .http
            .put(&uri)
            .header(CONTENT_TYPE, "application/json")
            .json(&to_json(tiddler));
        send(Method::Put, request).await?;

        debug!("Stored tiddler");
        Ok(())
    }

    /// Deletes a tiddler. Deleting a missing tiddler is a 404 status error.
    #[instrument(skip(self, tiddler), fields(title = %tiddler.title()))]
    pub async fn delete(&self, tiddler: &Tiddler) -> Result<(), FntError> {
        let uri = tiddler.uri()?;
        debug!(%uri, "DELETE tiddler");

        send(Method::Delete, self.http.delete(&uri)).await?;

        debug!("Deleted tiddler");
        Ok(())
    }
}

/// Sends a request and turns a non-2xx response into a status error carrying
/// the reason phrase and response body.
async fn send(method: Method, request: RequestBuilder) -> Result<Response, FntError> {
    let response = request
        .send()
        .await
        .map_err(|source| FntError::Http { method, source })?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let reason = status.canonical_reason().unwrap_or("Unknown error");
    // The body is diagnostic only; an unreadable body still yields the status error.
    let body = response.text().await.unwrap_or_default();
    debug!(status = status.as_u16(), "Request rejected");

    Err(FntError::Status {
        method,
        status: status.as_u16(),
        message: format!("{}\n{}", reason, body),
    })
}
