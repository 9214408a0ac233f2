use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::application::HandleQueryUseCase;
use crate::domain::{DomainError, MediaResult};

use super::types::{ErrorResponse, HealthResponse, QueryRequest};

const MISSING_QUERY: &str = "No query provided in request body";
const INTERNAL_ERROR: &str = "Internal server error";

#[derive(Clone)]
pub struct HttpState {
    handle_query: Arc<HandleQueryUseCase>,
}

impl HttpState {
    pub fn new(handle_query: Arc<HandleQueryUseCase>) -> Self {
        Self { handle_query }
    }
}

/// Maps domain failures onto HTTP statuses. Only missing input is a
/// client error; everything else is reported with a generic message.
#[derive(Debug)]
pub struct ApiError(DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            DomainError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            other => {
                error!("Error processing request: {}", other);
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR.to_string())
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// POST /api/search
///
/// Extracts anatomy terms from `text` and returns matching videos and images.
pub async fn search(
    State(state): State<HttpState>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<MediaResult>, ApiError> {
    let span = info_span!("request", id = %Uuid::new_v4());

    async move {
        info!("HTTP search request received");

        let text = match payload {
            Ok(Json(request)) => request.text,
            Err(rejection) => {
                warn!("Unreadable request body: {}", rejection);
                return Err(ApiError(DomainError::invalid_input(MISSING_QUERY)));
            }
        };

        state
            .handle_query
            .execute(text.as_deref())
            .await
            .map(Json)
            .map_err(ApiError)
    }
    .instrument(span)
    .await
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/api/search", post(search))
        .route("/health", get(health_check))
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(state: HttpState, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, build_router(state)).await?;
    Ok(())
}
