use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Upheld-report count at which the take-down notifier fires.
    pub takedown_threshold: i64,
    /// Webhook endpoint for take-down notifications. None → no-op notifier.
    pub takedown_webhook_url: Option<String>,
    /// Clamp prediction accuracy to [0, 1]. Off reproduces the legacy
    /// unclamped formula, where extreme mispredictions go negative.
    pub clamp_accuracy: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            takedown_threshold: std::env::var("TAKEDOWN_THRESHOLD")
                .unwrap_or_else(|_| "3".to_string())
                .parse::<i64>()
                .context("TAKEDOWN_THRESHOLD must be an integer")?,
            takedown_webhook_url: std::env::var("TAKEDOWN_WEBHOOK_URL").ok(),
            clamp_accuracy: std::env::var("CLAMP_ACCURACY")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
