use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post, put}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/users/:user_id", get(handlers::index))
        .route("/api/users/:user_id/today", get(handlers::get_today))
        .route("/api/users/:user_id/draft", put(handlers::put_draft))
        .route("/api/users/:user_id/submit", post(handlers::submit))
        .route("/api/users/:user_id/submit/confirm", post(handlers::confirm))
        .route("/api/users/:user_id/report", get(handlers::get_report))
        .with_state(state)
}
