//! Offline claim validation command
//!
//! Runs the same chain the server runs, against a saved OCR response and
//! the local registry/campaign tables. Useful for replaying disputes and
//! tuning registry data without touching the service.

use anyhow::{Context, Result};

use attest_core::chain::{ValidationChain, ValidationConfig};
use attest_core::db::Database;
use attest_core::models::{Claim, ClaimCategory};

pub fn cmd_validate(
    db: &Database,
    ocr_file: &str,
    category: &str,
    amount: i64,
    card_prefix: &str,
    campaign: Option<i64>,
    year: Option<&str>,
) -> Result<()> {
    let raw = std::fs::read_to_string(ocr_file)
        .with_context(|| format!("cannot read {}", ocr_file))?;
    let raw: serde_json::Value =
        serde_json::from_str(&raw).with_context(|| format!("{} is not valid JSON", ocr_file))?;

    let category: ClaimCategory = category
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let mut config = ValidationConfig::default();
    if let Some(year) = year {
        config.campaign_year = year.to_string();
    }

    let claim = Claim::new("cli", category, amount, card_prefix, vec![], campaign);
    let chain = ValidationChain::with_config(db, db, db, config);
    let outcome = chain.validate(&claim, &raw);

    println!("Status:   {}", outcome.verdict.status);
    if let Some(reason) = outcome.verdict.reason {
        println!("Reason:   {} ({})", reason, reason.label());
    }
    if let Some(detail) = &outcome.verdict.detail {
        println!("Detail:   {}", detail);
    }
    if !outcome.fields.merchant.is_empty() {
        println!("Merchant: {}", outcome.fields.merchant);
    }
    if !outcome.fields.address.is_empty() {
        println!("Address:  {}", outcome.fields.address);
    }
    if !outcome.fields.pay_date.is_empty() {
        println!("Paid:     {}", outcome.fields.pay_date);
    }
    if let Some(extracted) = outcome.fields.amount {
        println!("Amount:   {} won (declared {})", extracted, amount);
    }
    Ok(())
}
