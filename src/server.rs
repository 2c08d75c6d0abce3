// src/server.rs

use crate::auth::{AdminAuth, LoginRequest};
use crate::config::Config;
use crate::error::{Result, WorklogError};
use crate::export;
use crate::ledger::Ledger;
use crate::models::{FilterSpec, LogEntry, NewEntry};
use crate::roster;
use axum::{
    extract::{FromRequestParts, Json, Path, State},
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<Ledger>,
    pub auth: Arc<AdminAuth>,
    pub operators_file: Option<PathBuf>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub entries: Vec<LogEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub deleted: usize,
}

#[derive(Debug, Deserialize)]
struct ExportRequest {
    #[serde(default)]
    entries: Vec<LogEntry>,
}

impl IntoResponse for WorklogError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            WorklogError::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            WorklogError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            WorklogError::Auth => (StatusCode::UNAUTHORIZED, self.to_string()),
            _ => {
                tracing::error!(error = %self, storage = self.is_storage(), "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error".to_string(),
                )
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Proof that the request carried the admin bearer token.
pub struct Admin;

#[axum::async_trait]
impl FromRequestParts<AppState> for Admin {
    type Rejection = WorklogError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        state.auth.verify(header)?;
        Ok(Admin)
    }
}

pub fn app_builder(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/login", post(login))
        .route("/api/operators", get(operators))
        .route("/api/entries", post(create_entry).delete(delete_all))
        .route("/api/entries/search", post(search))
        .route("/api/entries/delete-filtered", post(delete_filtered))
        .route("/api/entries/:id", delete(delete_one))
        .route("/api/export/csv", post(export_csv))
        .route("/api/export/xlsx", post(export_xlsx))
        .with_state(state)
}

pub async fn serve(cfg: &Config, state: AppState) -> Result<()> {
    let addr = SocketAddr::from((cfg.address, cfg.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Server running on http://{addr}");

    axum::serve(listener, app_builder(state)).await?;
    Ok(())
}

/// Runs a ledger call on the blocking pool so store I/O stays off the runtime workers.
async fn with_ledger<T, F>(state: &AppState, f: F) -> Result<T>
where
    F: FnOnce(&Ledger) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let ledger = Arc::clone(&state.ledger);
    tokio::task::spawn_blocking(move || f(&ledger)).await?
}

async fn health() -> &'static str {
    "OK"
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let token = state.auth.login(&req)?;
    Ok(Json(serde_json::json!({ "ok": true, "token": token })))
}

async fn operators(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    let Some(path) = state.operators_file.clone() else {
        return Ok(Json(Vec::new()));
    };
    let names = tokio::task::spawn_blocking(move || {
        roster::load_roster(&path).unwrap_or_else(|e| {
            tracing::warn!(error = %e, path = %path.display(), "could not read operator roster");
            Vec::new()
        })
    })
    .await?;
    Ok(Json(names))
}

async fn create_entry(
    State(state): State<AppState>,
    Json(draft): Json<NewEntry>,
) -> Result<impl IntoResponse> {
    let entry = with_ledger(&state, move |ledger| ledger.record(draft)).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn search(
    _: Admin,
    State(state): State<AppState>,
    Json(spec): Json<FilterSpec>,
) -> Result<Json<SearchResponse>> {
    let entries = with_ledger(&state, move |ledger| ledger.search(&spec)).await?;
    Ok(Json(SearchResponse { entries }))
}

async fn delete_filtered(
    _: Admin,
    State(state): State<AppState>,
    Json(spec): Json<FilterSpec>,
) -> Result<Json<DeletedResponse>> {
    let deleted = with_ledger(&state, move |ledger| ledger.delete_filtered(&spec)).await?;
    Ok(Json(DeletedResponse { deleted }))
}

async fn delete_all(_: Admin, State(state): State<AppState>) -> Result<Json<DeletedResponse>> {
    let deleted = with_ledger(&state, |ledger| ledger.delete_all()).await?;
    Ok(Json(DeletedResponse { deleted }))
}

async fn delete_one(
    _: Admin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DeletedResponse>> {
    with_ledger(&state, move |ledger| ledger.delete_by_id(id)).await?;
    Ok(Json(DeletedResponse { deleted: 1 }))
}

async fn export_csv(_: Admin, Json(req): Json<ExportRequest>) -> Result<impl IntoResponse> {
    let mut body = Vec::new();
    export::export_csv(&req.entries, &mut body)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"report.csv\"",
            ),
        ],
        body,
    ))
}

async fn export_xlsx(_: Admin, Json(req): Json<ExportRequest>) -> Result<impl IntoResponse> {
    let body = tokio::task::spawn_blocking(move || export::export_xlsx(&req.entries)).await??;
    Ok((
        [
            (
                header::CONTENT_TYPE,
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            ),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"report.xlsx\"",
            ),
        ],
        body,
    ))
}
