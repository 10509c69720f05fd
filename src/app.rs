use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/tasks", post(handlers::add_task_form))
        .route("/tasks/:id/complete", post(handlers::complete_task_form))
        .route("/reset", post(handlers::reset_form))
        .route("/api/state", get(handlers::get_state))
        .route("/api/tasks", post(handlers::add_task))
        .route("/api/tasks/:id/complete", post(handlers::complete_task))
        .route("/api/reset", post(handlers::reset))
        .route("/api/week", get(handlers::get_week))
        .route("/api/notifications", get(handlers::get_notifications))
        .with_state(state)
}
