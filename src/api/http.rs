//! REST adapter for [`BoardApi`](super::BoardApi).
//!
//! Thin reqwest wrapper. Envelope handling lives in `parse_envelope` so it
//! can be tested without a server.

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;

use std::time::Duration;

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::BoardApi;
use super::types::{
    ApiError, Card, CardMoveBody, Column, ColumnOrderBody, ColumnPosition, Envelope, ListId, id_to_wire,
    position_to_wire,
};
use crate::config::BoardConfig;

// =============================================================================
// CLIENT
// =============================================================================

pub struct HttpBoardApi {
    http: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
}

impl HttpBoardApi {
    /// Build a client from typed config.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::HttpClientBuild`] if the TLS backend fails to
    /// initialize.
    pub fn new(config: &BoardConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.api_url.clone(), auth_token: config.auth_token.clone() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Send a request and return the envelope's `data`, if any.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Option<T>, ApiError> {
        let request = match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::ApiRequest(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::ApiRequest(e.to_string()))?;

        parse_envelope(status, &text)
    }

    async fn send_data<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        self.send(request)
            .await?
            .ok_or_else(|| ApiError::ApiParse("response has no data".into()))
    }
}

#[async_trait::async_trait]
impl BoardApi for HttpBoardApi {
    async fn list_columns(&self, board_id: &str) -> Result<Vec<Column>, ApiError> {
        let request = self
            .http
            .get(self.url("/api/lists"))
            .query(&[("board_id", board_id)]);
        let columns: Vec<Column> = self.send_data(request).await?;
        debug!(board_id, count = columns.len(), "lists fetched");
        Ok(columns)
    }

    async fn list_cards(&self, list_id: &str) -> Result<Vec<Card>, ApiError> {
        let request = self
            .http
            .get(self.url("/api/cards"))
            .query(&[("listId", list_id)]);
        let cards: Vec<Card> = self.send_data(request).await?;
        debug!(list_id, count = cards.len(), "cards fetched");
        Ok(cards)
    }

    async fn commit_card_move(&self, card_id: &str, list_id: &str, position: usize) -> Result<(), ApiError> {
        let body = CardMoveBody { list_id: id_to_wire(list_id), position: position_to_wire(position) };
        let request = self
            .http
            .put(self.url(&format!("/api/cards/{card_id}")))
            .json(&body);
        self.send::<serde::de::IgnoredAny>(request).await?;
        Ok(())
    }

    async fn commit_column_order(&self, board_id: &str, ordered: &[ListId]) -> Result<Vec<Column>, ApiError> {
        let body = ColumnOrderBody {
            board_id: id_to_wire(board_id),
            columns: ordered
                .iter()
                .enumerate()
                .map(|(i, id)| ColumnPosition { id: id_to_wire(id), position: position_to_wire(i) })
                .collect(),
        };
        let request = self
            .http
            .patch(self.url("/api/lists/bulk-order"))
            .json(&body);
        self.send_data(request).await
    }
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_envelope<T: DeserializeOwned>(status: u16, body: &str) -> Result<Option<T>, ApiError> {
    if !(200..300).contains(&status) {
        return Err(ApiError::ApiResponse { status, body: body.to_string() });
    }
    let envelope: Envelope<T> = serde_json::from_str(body).map_err(|e| ApiError::ApiParse(e.to_string()))?;
    envelope.into_result()
}
