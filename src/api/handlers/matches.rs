use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

use super::{AppState, bad_request, found_or_404, internal_error};
use crate::api::models::{CompleteMatchRequest, CreateMatchRequest, CreatedMatch, LogMatchRequest, MatchListParams};

pub async fn list_matches(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MatchListParams>,
) -> Response {
    let club = state.club.lock().await;
    Json(club.history().list(params.status)).into_response()
}

pub async fn create_match(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateMatchRequest>,
) -> Response {
    let mut club = state.club.lock().await;
    match club.create_match(request.team1, request.team2) {
        Ok(match_id) => (StatusCode::CREATED, Json(CreatedMatch { match_id })).into_response(),
        Err(e) => bad_request(e),
    }
}

pub async fn log_match(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LogMatchRequest>,
) -> Response {
    let mut club = state.club.lock().await;
    match club.log_match(request.team1, request.team2, request.winning_team) {
        Ok(outcome) => (StatusCode::CREATED, Json(outcome)).into_response(),
        Err(e) => bad_request(e),
    }
}

pub async fn complete_match(
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<String>,
    Json(request): Json<CompleteMatchRequest>,
) -> Response {
    let mut club = state.club.lock().await;
    match club.complete_match(&match_id, request.winning_team) {
        Ok(Some(outcome)) => Json(outcome).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Match not found or already completed").into_response(),
        Err(e) => internal_error(e),
    }
}

pub async fn delete_match(State(state): State<Arc<AppState>>, Path(match_id): Path<String>) -> Response {
    let mut club = state.club.lock().await;
    found_or_404(club.delete_match(&match_id))
}
