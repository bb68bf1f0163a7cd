use axum::{
    extract::State,
    response::{IntoResponse, Json, Response},
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;

use super::{AppState, bad_request};
use crate::api::models::{PlayerStatRow, StatisticsResponse, TeamsRequest};

pub async fn get_statistics(State(state): State<Arc<AppState>>) -> Response {
    let mut club = state.club.lock().await;
    let team_wins = club.history().team_win_counts();
    let statistics = club.statistics();

    let players = statistics
        .ranked()
        .into_iter()
        .map(|(name, stat)| PlayerStatRow {
            name: name.to_string(),
            wins: stat.wins,
            losses: stat.losses,
            matches: stat.matches,
            win_rate: stat.win_rate,
        })
        .collect();

    Json(StatisticsResponse {
        players,
        team_wins,
        default_win_rate: statistics.default_win_rate(),
    })
    .into_response()
}

pub async fn generate_teams(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TeamsRequest>,
) -> Response {
    let mut rng = match request.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let mut club = state.club.lock().await;
    match club.generate_teams(&request.players, request.strategy, &mut rng) {
        Ok(partition) => Json(partition).into_response(),
        Err(e) => bad_request(e),
    }
}
