use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::error;
use tokio::sync::Mutex;

use crate::config::AppConfig;
use crate::services::Club;

pub mod admin;
pub mod fines;
pub mod matches;
pub mod teams;

/// One `Club` behind a mutex: each request finishes before the next mutates.
pub struct AppState {
    pub club: Mutex<Club>,
    pub config: AppConfig,
}

fn internal_error(e: anyhow::Error) -> Response {
    error!("Request failed: {e:#}");
    (StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {e:#}")).into_response()
}

fn bad_request(e: anyhow::Error) -> Response {
    (StatusCode::BAD_REQUEST, format!("{e:#}")).into_response()
}

/// `Ok(false)` from a keyed mutation means the key was unknown.
fn found_or_404(result: anyhow::Result<bool>) -> Response {
    match result {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => internal_error(e),
    }
}
