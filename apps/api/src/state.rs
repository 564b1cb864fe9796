use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::notify::TakedownNotifier;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Pluggable take-down notifier. Webhook-backed when TAKEDOWN_WEBHOOK_URL
    /// is set, otherwise a no-op.
    pub notifier: Arc<dyn TakedownNotifier>,
}
