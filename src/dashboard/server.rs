//! Dashboard HTTP API
//!
//! JSON endpoints mirroring the terminal dashboard, plus trade logging and
//! the sign-out action.

use super::{Dashboard, DashboardView, Notification};
use crate::error::{JournalError, Result};
use crate::metrics::{compute_metrics, PnlCalendar, TradeMetrics};
use crate::types::{NewTrade, Trade, TradeQuery};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

/// Error wrapper mapping journal failures onto HTTP statuses
pub struct ApiError(JournalError);

impl From<JournalError> for ApiError {
    fn from(err: JournalError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            JournalError::NotFound(_) => StatusCode::NOT_FOUND,
            err if err.is_backend() => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::debug!("Request failed with {}: {}", status, self.0);

        (status, Json(serde_json::json!({ "error": self.0.to_string() }))).into_response()
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

/// Health check
async fn health_check() -> &'static str {
    "OK"
}

/// Full dashboard view
async fn get_summary(State(state): State<Arc<Dashboard>>) -> ApiResult<Json<DashboardView>> {
    Ok(Json(state.load().await?))
}

async fn get_metrics(State(state): State<Arc<Dashboard>>) -> ApiResult<Json<TradeMetrics>> {
    let snapshot = state.journal().trades(&TradeQuery::all()).await?;
    Ok(Json(compute_metrics(&snapshot, state.settings().highlight)))
}

async fn get_calendar(State(state): State<Arc<Dashboard>>) -> ApiResult<Json<PnlCalendar>> {
    let snapshot = state.journal().trades(&TradeQuery::all()).await?;
    Ok(Json(PnlCalendar::from_trades(&snapshot)))
}

async fn get_recent(State(state): State<Arc<Dashboard>>) -> ApiResult<Json<Vec<Trade>>> {
    let query = TradeQuery::recent(state.settings().recent_limit);
    let recent = state.journal().trades(&query).await?;
    Ok(Json(recent.as_ref().clone()))
}

async fn create_trade(
    State(state): State<Arc<Dashboard>>,
    Json(trade): Json<NewTrade>,
) -> ApiResult<(StatusCode, Json<Trade>)> {
    let stored = state.journal().log_trade(&trade).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

async fn delete_trade(
    State(state): State<Arc<Dashboard>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.journal().delete_trade(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn logout(State(state): State<Arc<Dashboard>>) -> Json<Notification> {
    Json(state.sign_out().await)
}

/// Create dashboard router
pub fn create_router(state: Arc<Dashboard>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/summary", get(get_summary))
        .route("/metrics", get(get_metrics))
        .route("/calendar", get(get_calendar))
        .route("/trades/recent", get(get_recent))
        .route("/trades", post(create_trade))
        .route("/trades/{id}", delete(delete_trade))
        .route("/session/logout", post(logout))
        .with_state(state)
}

/// Start dashboard server
pub async fn start_dashboard(state: Arc<Dashboard>, port: u16) -> Result<()> {
    let app = create_router(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Dashboard server starting on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
