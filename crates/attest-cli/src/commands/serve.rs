//! Serve command

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use attest_core::chain::ValidationConfig;
use attest_core::db::Database;
use attest_core::models::MinAmounts;
use attest_core::ocr::OcrClient;
use attest_core::storage::LocalStorage;
use attest_server::AppState;

/// Validation configuration from environment variables, with the
/// standard campaign defaults
fn config_from_env() -> ValidationConfig {
    let mut config = ValidationConfig::default();
    if let Ok(year) = std::env::var("ATTEST_CAMPAIGN_YEAR") {
        config.campaign_year = year;
    }
    if let Ok(marker) = std::env::var("ATTEST_PROVINCE_MARKER") {
        config.province_marker = marker;
    }
    let parse_amount = |var: &str| std::env::var(var).ok().and_then(|v| v.parse().ok());
    let defaults = MinAmounts::default();
    config.min_amounts = MinAmounts {
        lodging: parse_amount("ATTEST_MIN_LODGING").unwrap_or(defaults.lodging),
        activity: parse_amount("ATTEST_MIN_ACTIVITY").unwrap_or(defaults.activity),
    };
    config
}

pub async fn cmd_serve(
    db: Database,
    host: &str,
    port: u16,
    storage_dir: &str,
    allow_origin: Vec<String>,
) -> Result<()> {
    let ocr = OcrClient::from_env();
    if ocr.is_none() {
        warn!("OCR_INVOKE_URL / OCR_SECRET not set; claims will resolve as unprocessable");
    }

    let config = config_from_env();
    info!(
        year = %config.campaign_year,
        marker = %config.province_marker,
        "validation configuration loaded"
    );

    let state = Arc::new(AppState {
        db,
        storage: Box::new(LocalStorage::new(storage_dir)?),
        ocr,
        config,
        allowed_origins: allow_origin,
    });
    attest_server::serve(state, host, port).await
}
