use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use log::{error, info, warn};
use std::sync::Arc;

use super::AppState;
use crate::api::SpondClient;

pub async fn admin_sync(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if !is_authorized(&headers, state.config.source.admin_token.as_deref()) {
        warn!("Rejected unauthorized sync request");
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let mut client = match SpondClient::new(state.config.source.clone()) {
        Ok(client) => client,
        Err(e) => return (StatusCode::SERVICE_UNAVAILABLE, format!("{e:#}")).into_response(),
    };

    info!("Admin triggered sync started");
    let club = state.club.lock().await;
    match club.sync(&mut client).await {
        Ok(report) => Json(report).into_response(),
        Err(e) => {
            error!("Sync failed: {e:#}");
            (StatusCode::BAD_GATEWAY, format!("Sync failed: {e:#}")).into_response()
        }
    }
}

/// Without a configured token the endpoint is closed.
fn is_authorized(headers: &HeaderMap, token: Option<&str>) -> bool {
    let Some(token) = token else {
        return false;
    };
    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .is_some_and(|given| given == token)
}
