pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::leaderboard::handlers as leaderboard_handlers;
use crate::moderation::handlers as moderation_handlers;
use crate::predictions::handlers as prediction_handlers;
use crate::roles::handlers as role_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Flag/report engine
        .route(
            "/api/v1/flags",
            post(moderation_handlers::handle_submit_flag).get(moderation_handlers::handle_list_flags),
        )
        .route(
            "/api/v1/flags/:id/resolve",
            post(moderation_handlers::handle_resolve_flag),
        )
        .route(
            "/api/v1/reports",
            post(moderation_handlers::handle_submit_report)
                .get(moderation_handlers::handle_list_reports),
        )
        .route(
            "/api/v1/reports/:id/resolve",
            post(moderation_handlers::handle_resolve_report),
        )
        // Prediction game
        .route(
            "/api/v1/predictions",
            post(prediction_handlers::handle_submit_prediction),
        )
        .route(
            "/api/v1/predictions/:id/score",
            post(prediction_handlers::handle_score_prediction),
        )
        // Role ledger
        .route(
            "/api/v1/roles/:user_id/evaluate",
            post(role_handlers::handle_evaluate),
        )
        // Derived views
        .route(
            "/api/v1/analysts/top",
            get(leaderboard_handlers::handle_top_analysts),
        )
        .route(
            "/api/v1/analysts/:user_id/accuracy",
            get(leaderboard_handlers::handle_analyst_accuracy),
        )
        .route(
            "/api/v1/leaderboard/:period",
            get(leaderboard_handlers::handle_leaderboard),
        )
        .route(
            "/api/v1/charts/top-grossing",
            get(leaderboard_handlers::handle_chart_series),
        )
        .with_state(state)
}
