//! Attest Core Library
//!
//! Shared functionality for the attest receipt-incentive service:
//! - Domain models and the fixed reason-code taxonomy
//! - Field extraction from raw OCR responses
//! - Merchant matching against the reference registry
//! - Duplicate detection over approved claims
//! - Campaign eligibility filtering
//! - The validation chain that runs the gates in order
//! - SQLite-backed claim store and merchant registry
//! - Registry CSV ingestion, OCR service client, receipt image storage

pub mod campaign;
pub mod chain;
pub mod db;
pub mod dedup;
pub mod error;
pub mod extract;
pub mod matcher;
pub mod models;
pub mod ocr;
pub mod registry;
pub mod storage;

pub use campaign::{check_campaign, CampaignStore};
pub use chain::{ChainState, ValidationChain, ValidationConfig, ValidationOutcome};
pub use db::Database;
pub use dedup::{is_duplicate, EligibleClaims};
pub use error::{Error, Result};
pub use extract::{clean_amount, extract_receipt_fields, region_token};
pub use matcher::{match_merchant, token_sort_ratio, MerchantRegistry};
pub use models::{
    Campaign, Claim, ClaimCategory, ClaimKey, ClaimStatus, MerchantRecord, MinAmounts,
    NewCampaign, NewMerchant, ReasonCode, ReceiptFields, Verdict,
};
pub use ocr::OcrClient;
pub use registry::parse_merchants_csv;
pub use storage::{content_hash, LocalStorage, ReceiptStorage};
