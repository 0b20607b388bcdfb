//! Claim status command

use anyhow::Result;

use attest_core::db::Database;
use attest_core::models::ClaimStatus;

pub fn cmd_status(db: &Database, claim_id: &str) -> Result<()> {
    let Some(claim) = db.get_claim(claim_id)? else {
        println!("Claim {} not found", claim_id);
        return Ok(());
    };

    println!("Claim:    {}", claim.id);
    println!("User:     {}", claim.user_id);
    println!("Category: {}", claim.category);
    println!("Status:   {}", claim.status);
    if let Some(reason) = claim.reason {
        println!("Reason:   {} ({})", reason, reason.label());
    }
    if let Some(detail) = &claim.detail {
        println!("Detail:   {}", detail);
    }
    if let Some(merchant) = claim.merchant.as_deref().filter(|s| !s.is_empty()) {
        println!("Merchant: {}", merchant);
    }
    if let Some(address) = claim.address.as_deref().filter(|s| !s.is_empty()) {
        println!("Address:  {}", address);
    }
    if let Some(extracted) = claim.extracted_amount {
        println!(
            "Amount:   {} won (declared {})",
            extracted, claim.declared_amount
        );
    }
    if claim.status == ClaimStatus::Eligible {
        println!("Reward:   {} won", claim.category.reward_amount());
    }
    Ok(())
}
