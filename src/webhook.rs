use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::debug;

use crate::error::{RelayError, Result};

/// Delivers one assembled payload to the configured webhook endpoint.
/// Fire-and-forget, at-most-once: a single POST, no retry, no dead-letter.
pub struct WebhookDispatcher {
    client: Client,
    url: String,
    authorization: Option<String>,
}

impl WebhookDispatcher {
    pub fn new(url: &str) -> Self {
        Self {
            client: Client::new(),
            url: url.to_string(),
            authorization: None,
        }
    }

    /// Attach a bearer token sent as the `Authorization` header (the
    /// sentinel variant authorizes against the webhook, the basic one
    /// does not).
    pub fn with_authorization(mut self, token: &str) -> Self {
        self.authorization = Some(token.to_string());
        self
    }

    /// Perform exactly one JSON POST. Success is exactly HTTP 200, the only
    /// status the deployed relay accepts; anything else is reported as a
    /// delivery error for the caller to absorb.
    pub async fn dispatch<T: Serialize>(&self, payload: &T) -> Result<StatusCode> {
        debug!("Dispatching payload to webhook: {}", self.url);

        let mut request = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(payload);

        if let Some(token) = &self.authorization {
            request = request.header("Authorization", token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RelayError::Delivery(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(RelayError::Delivery(format!(
                "Failed to send data to webhook. Status: {}",
                status
            )));
        }

        Ok(status)
    }
}
