//! # HTTP API
//!
//! The axum REST surface over the vault store:
//!
//! - `POST /api/vaults` creates a vault record
//! - `GET  /api/vaults` and `GET /api/vaults/{id}` read records
//! - `POST /api/beneficiaries` attaches a beneficiary to a vault
//! - `POST /api/attachments` registers an uploaded attachment
//! - `PUT  /api/attachments/{id}` associates an attachment with a vault
//! - `GET  /health` is the liveness probe, unauthenticated
//!
//! All `/api` routes pass a shared guard: a global rate limit and, when
//! the server was started with an API key, a constant-time key check on
//! the `x-api-key` header.

use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chronos_core::{
    validate_payload, AttachmentAssignment, AttachmentId, BeneficiaryRequest, StoreError,
    ValidationError, VaultId, VaultPayload, VaultStore,
};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use serde_json::json;
use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Requests allowed per second across all clients.
const RATE_LIMIT_PER_SECOND: u32 = 50;

// =============================================================================
// STATE
// =============================================================================

/// Shared server state: the store, the optional API key, and the
/// global rate limiter.
pub struct ApiState {
    store: Mutex<Box<dyn VaultStore + Send>>,
    api_key: Option<String>,
    limiter: DefaultDirectRateLimiter,
}

impl ApiState {
    /// Build state around a store. `api_key = None` disables auth.
    #[must_use]
    pub fn new(store: Box<dyn VaultStore + Send>, api_key: Option<String>) -> Arc<Self> {
        let quota = Quota::per_second(
            NonZeroU32::new(RATE_LIMIT_PER_SECOND).unwrap_or(NonZeroU32::MIN),
        );
        Arc::new(Self {
            store: Mutex::new(store),
            api_key,
            limiter: RateLimiter::direct(quota),
        })
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// API failure mapped to a status code and a `{ "error": ... }` body.
#[derive(Debug)]
pub enum ApiError {
    /// Request failed a submission-gate check.
    Invalid(ValidationError),
    /// Store-level failure.
    Store(StoreError),
    /// Explicit not-found for reads.
    NotFound(String),
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::Invalid(e)
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::Store(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Invalid(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::Store(e) => match e {
                StoreError::VaultNotFound(_) | StoreError::AttachmentNotFound(_) => {
                    (StatusCode::NOT_FOUND, e.to_string())
                }
                StoreError::Database(_) | StoreError::Encoding(_) => {
                    tracing::error!(error = %e, "store failure");
                    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
                }
            },
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

// =============================================================================
// GUARD
// =============================================================================

/// Rate limit plus optional constant-time API key check.
async fn guard(State(state): State<Arc<ApiState>>, request: Request, next: Next) -> Response {
    if state.limiter.check().is_err() {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "error": "rate limit exceeded" })),
        )
            .into_response();
    }

    if let Some(expected) = &state.api_key {
        let provided = request
            .headers()
            .get("x-api-key")
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");
        if !bool::from(expected.as_bytes().ct_eq(provided.as_bytes())) {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "invalid api key" })),
            )
                .into_response();
        }
    }

    next.run(request).await
}

// =============================================================================
// HANDLERS
// =============================================================================

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn create_vault(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<VaultPayload>,
) -> Result<impl IntoResponse, ApiError> {
    validate_payload(&payload)?;
    let mut store = state.store.lock().await;
    let record = store.insert_vault(&payload)?;
    tracing::info!(vault = %record.id, name = %record.payload.name, "vault created");
    Ok((StatusCode::CREATED, Json(record)))
}

async fn list_vaults(
    State(state): State<Arc<ApiState>>,
) -> Result<impl IntoResponse, ApiError> {
    let store = state.store.lock().await;
    Ok(Json(store.vaults()?))
}

async fn get_vault(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse, ApiError> {
    let store = state.store.lock().await;
    store
        .vault(VaultId(id))?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("vault {id} not found")))
}

async fn create_beneficiary(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<BeneficiaryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut store = state.store.lock().await;
    let record = store.insert_beneficiary(&request)?;
    tracing::info!(vault = %record.vault_id, beneficiary = %record.name, "beneficiary added");
    Ok((StatusCode::CREATED, Json(record)))
}

async fn register_attachment(
    State(state): State<Arc<ApiState>>,
) -> Result<impl IntoResponse, ApiError> {
    let mut store = state.store.lock().await;
    let record = store.register_attachment()?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn assign_attachment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<u64>,
    Json(assignment): Json<AttachmentAssignment>,
) -> Result<impl IntoResponse, ApiError> {
    let mut store = state.store.lock().await;
    let record = store.attach_to_vault(AttachmentId(id), assignment.vault_id)?;
    Ok(Json(record))
}

// =============================================================================
// ROUTER / SERVER
// =============================================================================

/// Build the full application router.
#[must_use]
pub fn router(state: Arc<ApiState>) -> Router {
    let api = Router::new()
        .route("/api/vaults", post(create_vault).get(list_vaults))
        .route("/api/vaults/{id}", get(get_vault))
        .route("/api/beneficiaries", post(create_beneficiary))
        .route("/api/attachments", post(register_attachment))
        .route("/api/attachments/{id}", put(assign_attachment))
        .layer(middleware::from_fn_with_state(state.clone(), guard));

    Router::new()
        .route("/health", get(health))
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until the task is cancelled.
pub async fn serve(addr: SocketAddr, state: Arc<ApiState>) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "chronos API listening");
    axum::serve(listener, router(state)).await
}
