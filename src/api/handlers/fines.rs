use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

use super::{AppState, bad_request, found_or_404, internal_error};
use crate::api::models::{AmountRequest, FineTypeRequest, KeyedFine, ManualFineRequest};

pub async fn list_fines(State(state): State<Arc<AppState>>) -> Response {
    let club = state.club.lock().await;
    let fines: Vec<KeyedFine> = club
        .ledger()
        .records()
        .into_iter()
        .map(|(key, record)| KeyedFine { key, record })
        .collect();
    Json(fines).into_response()
}

pub async fn get_summary(State(state): State<Arc<AppState>>) -> Response {
    let club = state.club.lock().await;
    Json(club.ledger().summary()).into_response()
}

pub async fn get_players(State(state): State<Arc<AppState>>) -> Response {
    let club = state.club.lock().await;
    Json(club.ledger().by_player_processed()).into_response()
}

pub async fn mark_paid(State(state): State<Arc<AppState>>, Path(key): Path<String>) -> Response {
    let club = state.club.lock().await;
    found_or_404(club.ledger().mark_paid(&key))
}

pub async fn mark_unpaid(State(state): State<Arc<AppState>>, Path(key): Path<String>) -> Response {
    let club = state.club.lock().await;
    found_or_404(club.ledger().set_unpaid(&key))
}

pub async fn set_amount(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    Json(request): Json<AmountRequest>,
) -> Response {
    let club = state.club.lock().await;
    found_or_404(club.ledger().set_amount(&key, request.amount))
}

pub async fn remove_fine(State(state): State<Arc<AppState>>, Path(key): Path<String>) -> Response {
    let club = state.club.lock().await;
    found_or_404(club.ledger().remove(&key))
}

pub async fn issue_manual_fine(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ManualFineRequest>,
) -> Response {
    let club = state.club.lock().await;
    match club.issue_manual_fine(&request.type_id, &request.player_name) {
        Ok(Some((key, record))) => (StatusCode::CREATED, Json(KeyedFine { key, record })).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Unknown fine type").into_response(),
        Err(e) => internal_error(e),
    }
}

pub async fn list_fine_types(State(state): State<Arc<AppState>>) -> Response {
    let club = state.club.lock().await;
    Json(club.catalog().list()).into_response()
}

pub async fn add_fine_type(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FineTypeRequest>,
) -> Response {
    let club = state.club.lock().await;
    match club.catalog().add(&request.name, request.amount, &request.description) {
        Ok(Some(fine_type)) => (StatusCode::CREATED, Json(fine_type)).into_response(),
        Ok(None) => (StatusCode::CONFLICT, "Fine type already exists").into_response(),
        Err(e) => bad_request(e),
    }
}

pub async fn remove_fine_type(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    let club = state.club.lock().await;
    found_or_404(club.catalog().remove(&id))
}
