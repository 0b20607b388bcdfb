//! Claim workflow handlers
//!
//! Three-step flow: upload the receipt image (opens a pending claim),
//! complete the claim with user-declared data (spawns the analysis task),
//! then poll status for the verdict.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use attest_core::models::{Claim, ClaimCategory, ClaimStatus};
use attest_core::storage::{content_hash, ReceiptStorage as _};

use crate::{tasks, AppError, AppState};

/// Response for a stored receipt image
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub claim_id: String,
    pub object_key: String,
}

/// POST /api/v1/claims/upload
///
/// Multipart form with a `file` part (the receipt image), `user_id`, and
/// `category`. Stores the image and opens a pending claim; declared data
/// arrives later via `complete`.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut user_id: Option<String> = None;
    let mut category: Option<ClaimCategory> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::bad_request("Invalid multipart body"))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("image.jpg").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|_| AppError::bad_request("File too large or unreadable"))?;
                file = Some((filename, bytes.to_vec()));
            }
            "user_id" => {
                user_id = Some(
                    field
                        .text()
                        .await
                        .map_err(|_| AppError::bad_request("Invalid user_id field"))?,
                );
            }
            "category" => {
                let text = field
                    .text()
                    .await
                    .map_err(|_| AppError::bad_request("Invalid category field"))?;
                category = Some(
                    text.parse()
                        .map_err(|_| AppError::bad_request("Unknown category"))?,
                );
            }
            _ => {}
        }
    }

    let (filename, bytes) =
        file.ok_or_else(|| AppError::bad_request("Missing file part"))?;
    if bytes.is_empty() {
        return Err(AppError::bad_request("No image data provided"));
    }
    let user_id = user_id.ok_or_else(|| AppError::bad_request("Missing user_id"))?;
    let category = category.ok_or_else(|| AppError::bad_request("Missing category"))?;

    let mut claim = Claim::new(user_id, category, 0, "", vec![], None);
    let object_key = format!("receipts/{}_{}", claim.id, filename);
    state.storage.store(&object_key, &bytes)?;

    claim.image_keys = vec![object_key.clone()];
    claim.content_hash = Some(content_hash(&bytes));
    state.db.create_claim(&claim)?;

    info!(claim_id = %claim.id, object_key = %object_key, "receipt image stored");
    Ok(Json(UploadResponse {
        claim_id: claim.id,
        object_key,
    }))
}

/// User-declared claim data
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteRequest {
    pub claim_id: String,
    pub category: ClaimCategory,
    /// Declared amount in won
    pub amount: i64,
    /// First four digits of the paying card
    pub card_prefix: String,
    #[serde(default)]
    pub image_keys: Vec<String>,
    #[serde(default)]
    pub campaign_id: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteResponse {
    pub status: ClaimStatus,
    pub claim_id: String,
}

/// POST /api/v1/claims/complete
///
/// Records the declared data on the pending claim and starts the
/// analysis task. The response reports `processing`; callers poll the
/// status endpoint for the verdict.
pub async fn complete(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CompleteRequest>,
) -> Result<Json<CompleteResponse>, AppError> {
    if req.card_prefix.len() != 4 || !req.card_prefix.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::bad_request("card_prefix must be four digits"));
    }
    if req.amount <= 0 {
        return Err(AppError::bad_request("amount must be positive"));
    }

    let claim = state
        .db
        .get_claim(&req.claim_id)?
        .ok_or_else(|| AppError::not_found("Claim not found"))?;

    // Keys from the upload step survive unless the caller overrides them
    let image_keys = if req.image_keys.is_empty() {
        claim.image_keys.clone()
    } else {
        req.image_keys.clone()
    };

    state.db.update_claim_submission(
        &req.claim_id,
        req.category.as_str(),
        req.amount,
        &req.card_prefix,
        &image_keys,
        req.campaign_id,
    )?;
    state
        .db
        .set_claim_status(&req.claim_id, ClaimStatus::Processing)?;

    tokio::spawn(tasks::analyze_claim(state.clone(), req.claim_id.clone()));

    Ok(Json(CompleteResponse {
        status: ClaimStatus::Processing,
        claim_id: req.claim_id,
    }))
}

/// Final result for one claim
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub status: ClaimStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fail_reason: Option<String>,
    pub reward_amount: i64,
    /// Merchant address or region extracted from the receipt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_prefix: Option<String>,
}

/// GET /api/v1/claims/:id/status
pub async fn status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<StatusResponse>, AppError> {
    let claim = state
        .db
        .get_claim(&id)?
        .ok_or_else(|| AppError::not_found("Claim not found"))?;

    let reward_amount = if claim.status == ClaimStatus::Eligible {
        claim.category.reward_amount()
    } else {
        0
    };

    let address = [claim.address.as_deref(), claim.region.as_deref(), claim.merchant.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(String::from);

    let fail_reason = claim
        .reason
        .map(|r| r.as_str().to_string())
        .or(claim.detail);

    Ok(Json(StatusResponse {
        status: claim.status,
        amount: claim.extracted_amount,
        fail_reason,
        reward_amount,
        address,
        card_prefix: (!claim.card_prefix.is_empty()).then_some(claim.card_prefix),
    }))
}
