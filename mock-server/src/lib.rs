use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, warn};

pub const REALTIME_PATH: &str = "/analytics/v3/data/realtime";
pub const ACTIVE_USERS_METRIC: &str = "rt:activeUsers";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RealtimeData {
    #[serde(
        rename = "totalsForAllResults",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub totals_for_all_results: Option<Totals>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Totals {
    #[serde(
        rename = "rt:activeUsers",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub rt_active_users: Option<String>,
}

#[derive(Deserialize)]
pub struct RealtimeQuery {
    pub ids: String,
    pub metrics: String,
}

/// View id to current active users. `None` means the view reports no totals.
pub type Db = Arc<RwLock<HashMap<String, Option<u64>>>>;

#[derive(Clone, Default)]
pub struct AppState {
    pub db: Db,
    /// When set, requests must carry `Authorization: Bearer <token>`.
    pub bearer_token: Option<String>,
}

impl AppState {
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub async fn set_active_users(&self, ids: &str, count: Option<u64>) {
        self.db.write().await.insert(ids.to_string(), count);
    }
}

pub fn app() -> Router {
    app_with(AppState::default())
}

pub fn app_with(state: AppState) -> Router {
    Router::new()
        .route(REALTIME_PATH, get(realtime))
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(state)).await
}

async fn realtime(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<RealtimeQuery>,
) -> Response {
    if let Some(token) = &state.bearer_token {
        let expected = format!("Bearer {token}");
        let presented = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
        if presented != Some(expected.as_str()) {
            warn!(ids = %query.ids, "rejecting request without valid credentials");
            return api_error(StatusCode::UNAUTHORIZED, "Login Required");
        }
    }

    if query.metrics != ACTIVE_USERS_METRIC {
        return api_error(
            StatusCode::BAD_REQUEST,
            &format!("Unknown metric(s): {}", query.metrics),
        );
    }

    let db = state.db.read().await;
    match db.get(&query.ids) {
        None => {
            debug!(ids = %query.ids, "unknown view");
            StatusCode::NOT_FOUND.into_response()
        }
        Some(count) => Json(RealtimeData {
            totals_for_all_results: count.map(|n| Totals {
                rt_active_users: Some(n.to_string()),
            }),
        })
        .into_response(),
    }
}

fn api_error(status: StatusCode, message: &str) -> Response {
    let body = json!({ "error": { "code": status.as_u16(), "message": message } });
    (status, Json(body)).into_response()
}
