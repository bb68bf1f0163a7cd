use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::api::handlers::{
    admin::admin_sync,
    fines::{
        add_fine_type, get_players, get_summary, issue_manual_fine, list_fine_types, list_fines,
        mark_paid, mark_unpaid, remove_fine, remove_fine_type, set_amount,
    },
    matches::{complete_match, create_match, delete_match, list_matches, log_match},
    teams::{generate_teams, get_statistics},
    AppState,
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/statistics", get(get_statistics))
        .route("/api/teams", post(generate_teams))
        .route("/api/matches", get(list_matches).post(create_match))
        .route("/api/matches/log", post(log_match))
        .route("/api/matches/:id/complete", post(complete_match))
        .route("/api/matches/:id", delete(delete_match))
        .route("/api/fines", get(list_fines))
        .route("/api/fines/summary", get(get_summary))
        .route("/api/fines/players", get(get_players))
        .route("/api/fines/manual", post(issue_manual_fine))
        .route("/api/fines/:key/paid", post(mark_paid).delete(mark_unpaid))
        .route("/api/fines/:key/amount", put(set_amount))
        .route("/api/fines/:key", delete(remove_fine))
        .route("/api/fine-types", get(list_fine_types).post(add_fine_type))
        .route("/api/fine-types/:id", delete(remove_fine_type))
        .route("/api/admin/sync", post(admin_sync))
        .with_state(state)
}
