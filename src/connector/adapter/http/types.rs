use serde::{Deserialize, Serialize};

/// Body of `POST /api/search`
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    /// Free-text question, e.g. "anatomie du cœur"
    #[serde(default)]
    pub text: Option<String>,
}

/// Error body returned for any failed request
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Body of `GET /health`
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}
