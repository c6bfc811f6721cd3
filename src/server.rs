use axum::{
    extract::{rejection::{JsonRejection, QueryRejection}, Json, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use anyhow::Result;
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

use crate::config::ServiceConfig;
use crate::registry::{DistanceQuery, RankedSchool, RegistryError, SchoolCandidate, SchoolRegistry};

const MSG_BAD_BODY: &str = "Request body must be a JSON object";
const MSG_BAD_QUERY: &str = "Malformed query string";
const MSG_STORAGE: &str = "Database error";
const MSG_ADDED: &str = "School added successfully";

// --- Error Mapping ---
pub struct ServerError(RegistryError);

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            RegistryError::Validation(message) => {
                debug!("Rejected request: {}", message);
                (StatusCode::BAD_REQUEST, message.clone())
            }
            RegistryError::TooClose { .. } => (StatusCode::BAD_REQUEST, self.0.to_string()),
            RegistryError::Storage(err) => {
                error!("Storage failure: {:#}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, MSG_STORAGE.to_string())
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<RegistryError> for ServerError {
    fn from(err: RegistryError) -> Self { Self(err) }
}

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<SchoolRegistry>,
}

pub fn router(registry: Arc<SchoolRegistry>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/addSchool", post(add_school))
        .route("/listSchools", get(list_schools))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { registry })
}

pub async fn run_server(config: &ServiceConfig, registry: Arc<SchoolRegistry>) -> Result<()> {
    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("🚀 School registry listening at http://{}", listener.local_addr()?);

    axum::serve(listener, router(registry))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn add_school(
    State(state): State<AppState>,
    body: Result<Json<SchoolCandidate>, JsonRejection>,
) -> Result<impl IntoResponse, ServerError> {
    let Json(candidate) = body.map_err(|rejection| {
        debug!("Unreadable body: {}", rejection.body_text());
        RegistryError::validation(MSG_BAD_BODY)
    })?;

    let school = state.registry.admit_school(&candidate).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": MSG_ADDED, "schoolId": school.id })),
    ))
}

async fn list_schools(
    State(state): State<AppState>,
    query: Result<Query<DistanceQuery>, QueryRejection>,
) -> Result<Json<Vec<RankedSchool>>, ServerError> {
    let Query(query) = query.map_err(|rejection| {
        debug!("Unreadable query: {}", rejection.body_text());
        RegistryError::validation(MSG_BAD_QUERY)
    })?;

    let ranked = state.registry.list_schools_by_distance(&query).await?;
    Ok(Json(ranked))
}
