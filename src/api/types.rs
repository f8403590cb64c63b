//! Board API wire types and errors.
//!
//! Ids are strings everywhere in the client. The backend stores them as
//! integers, so numeric-looking ids go out as JSON numbers and incoming ids
//! are accepted as either numbers or strings.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ErrorCode;

pub type BoardId = String;
pub type ListId = String;
pub type CardId = String;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by board API calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request could not be sent or the body could not be read.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The server answered with a non-2xx status.
    #[error("API returned {status}: {body}")]
    ApiResponse { status: u16, body: String },

    /// The response body was not the expected envelope.
    #[error("failed to parse API response: {0}")]
    ApiParse(String),

    /// The envelope reported `success: false`.
    #[error("API rejected request: {0}")]
    Rejected(String),

    /// Failed to build the HTTP client.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ErrorCode for ApiError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ApiRequest(_) => "E_API_REQUEST",
            Self::ApiResponse { .. } => "E_API_RESPONSE",
            Self::ApiParse(_) => "E_API_PARSE",
            Self::Rejected(_) => "E_API_REJECTED",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }
}

// =============================================================================
// RESOURCES
// =============================================================================

/// A list on a board (a column in the board view).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    #[serde(deserialize_with = "id_from_wire")]
    pub id: ListId,
    #[serde(default)]
    pub title: String,
    #[serde(deserialize_with = "id_from_wire")]
    pub board_id: BoardId,
    pub position: i64,
}

/// A card within a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    #[serde(deserialize_with = "id_from_wire")]
    pub id: CardId,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(deserialize_with = "id_from_wire")]
    pub list_id: ListId,
    pub position: i64,
}

// =============================================================================
// ENVELOPE
// =============================================================================

/// `{ success, data?, error?, message? }` wrapper around every response.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// Unwrap the envelope, turning `success: false` into [`ApiError::Rejected`].
    pub(crate) fn into_result(self) -> Result<Option<T>, ApiError> {
        if self.success {
            return Ok(self.data);
        }
        let reason = self
            .error
            .or(self.message)
            .unwrap_or_else(|| "no reason given".to_string());
        Err(ApiError::Rejected(reason))
    }
}

/// Body of `PUT /api/cards/{id}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CardMoveBody {
    pub list_id: Value,
    pub position: i64,
}

/// Body of `PATCH /api/lists/bulk-order`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ColumnOrderBody {
    pub board_id: Value,
    pub columns: Vec<ColumnPosition>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ColumnPosition {
    pub id: Value,
    pub position: i64,
}

// =============================================================================
// ID NORMALIZATION
// =============================================================================

/// Encode an id for the wire: a JSON number when it parses as one.
#[must_use]
pub fn id_to_wire(id: &str) -> Value {
    match id.parse::<i64>() {
        Ok(n) => Value::from(n),
        Err(_) => Value::from(id),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireId {
    Number(i64),
    Text(String),
}

fn id_from_wire<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match WireId::deserialize(deserializer)? {
        WireId::Number(n) => n.to_string(),
        WireId::Text(s) => s,
    })
}

/// Wire position for a local index.
#[must_use]
pub fn position_to_wire(index: usize) -> i64 {
    i64::try_from(index).unwrap_or(i64::MAX)
}
