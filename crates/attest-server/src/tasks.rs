//! Background claim analysis
//!
//! One task per submitted claim: load the stored image, call the OCR
//! service, run the validation chain, persist the extraction and the
//! verdict. The task never propagates an error; every failure path
//! records a verdict on the claim so polling always terminates.

use std::sync::Arc;

use tracing::{error, info, warn};

use attest_core::chain::ValidationChain;
use attest_core::error::{Error, Result};
use attest_core::models::{ReasonCode, Verdict};
use attest_core::storage::ReceiptStorage as _;

use crate::AppState;

pub async fn analyze_claim(state: Arc<AppState>, claim_id: String) {
    if let Err(e) = run(&state, &claim_id).await {
        error!(claim_id = %claim_id, error = %e, "analysis task failed");
        let verdict = Verdict::fault(e.to_string());
        if let Err(e) = state.db.record_verdict(&claim_id, &verdict) {
            error!(claim_id = %claim_id, error = %e, "failed to record fault verdict");
        }
    }
}

async fn run(state: &AppState, claim_id: &str) -> Result<()> {
    let claim = state
        .db
        .get_claim(claim_id)?
        .ok_or_else(|| Error::NotFound(format!("claim {}", claim_id)))?;

    // A claim submitted without any stored image cannot be verified
    let Some(image_key) = claim.image_keys.first() else {
        warn!(claim_id, "no image reference on claim");
        let verdict = Verdict::ineligible(ReasonCode::DuplicateClaim);
        state.db.record_verdict(claim_id, &verdict)?;
        return Ok(());
    };

    let image = state.storage.load(image_key)?;

    let Some(ocr) = state.ocr.as_ref() else {
        let verdict = Verdict::fault("OCR client not configured");
        state.db.record_verdict(claim_id, &verdict)?;
        return Ok(());
    };

    // OCR transport failures resolve the claim rather than crashing the
    // task; the claim can be resubmitted once the service recovers
    let raw = match ocr.recognize_bytes(&image, claim_id).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!(claim_id, error = %e, "OCR call failed");
            let verdict = Verdict::fault(format!("OCR request failed: {}", e));
            state.db.record_verdict(claim_id, &verdict)?;
            return Ok(());
        }
    };

    let chain =
        ValidationChain::with_config(&state.db, &state.db, &state.db, state.config.clone());
    let outcome = chain.validate(&claim, &raw);

    state.db.record_extraction(claim_id, &outcome.fields, &raw)?;
    let recorded = state.db.record_verdict(claim_id, &outcome.verdict)?;
    info!(claim_id, status = %recorded.status, reason = ?recorded.reason, "claim resolved");
    Ok(())
}
