use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/day", get(handlers::get_day))
        .route("/api/goals", post(handlers::create_goal))
        .route(
            "/api/goals/:id",
            put(handlers::update_goal).delete(handlers::delete_goal),
        )
        .route("/api/goals/:id/stats", get(handlers::get_goal_stats))
        .route("/api/goals/:id/records/:date", put(handlers::set_record))
        .route("/api/goals/:id/history", get(handlers::get_history))
        .route("/api/export", get(handlers::export_data))
        .route("/api/import/preview", post(handlers::preview_import))
        .route("/api/import", post(handlers::import_data))
        .route("/api/data/wipe", post(handlers::wipe_data))
        .with_state(state)
}
