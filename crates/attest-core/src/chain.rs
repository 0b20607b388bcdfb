//! The validation chain
//!
//! One claim moves through a fixed sequence of gates; the first failing
//! gate resolves the claim and nothing after it runs. Cheap, highly
//! discriminative gates come first, the network-bound lookups last:
//!
//! 1. unreadable extraction → unprocessable, OCR_001
//! 2. payment date must contain the campaign year token → BIZ_002
//! 3. extracted amount must meet the category minimum → BIZ_003
//! 4. extracted amount must equal the declared amount → BIZ_007
//! 5. an extracted address must contain the province marker → BIZ_004
//! 6. duplicate of an approved claim → terminal `duplicate`, BIZ_001
//! 7. merchant must match the reference registry → OCR_003
//! 8. campaign filter, when the claim names a campaign → its code
//!
//! Gates are read-only; nothing is written before the terminal verdict,
//! so a claim that faults mid-chain can be resubmitted from the same
//! state. An error escaping any gate is caught once at the chain
//! boundary and becomes an unprocessable verdict with a diagnostic.

use serde_json::Value;
use tracing::{debug, error};

use crate::campaign::{check_campaign, CampaignStore};
use crate::dedup::{is_duplicate, EligibleClaims};
use crate::error::Result;
use crate::extract::extract_receipt_fields;
use crate::matcher::{match_merchant, MerchantRegistry};
use crate::models::{Claim, ClaimKey, MinAmounts, ReasonCode, ReceiptFields, Verdict};

/// Gate configuration for one validation run
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Year token the payment date must contain
    pub campaign_year: String,
    /// Marker string a readable address must contain
    pub province_marker: String,
    /// Category minimum amounts in won
    pub min_amounts: MinAmounts,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            campaign_year: "2026".to_string(),
            province_marker: "강원".to_string(),
            min_amounts: MinAmounts::default(),
        }
    }
}

/// Progress of a claim through the chain. The last state reached before
/// resolution names the failing gate in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainState {
    Pending,
    Extracted,
    DateChecked,
    AmountChecked,
    LocationChecked,
    DuplicateChecked,
    StoreMatched,
    CampaignChecked,
    Resolved,
}

/// Result of one validation run: the verdict plus the normalized
/// extraction, which callers persist as the claim's data asset
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    pub verdict: Verdict,
    pub fields: ReceiptFields,
}

/// The ordered gate chain. Collaborators are injected so the chain runs
/// identically against the SQLite store and in-memory fakes.
pub struct ValidationChain<'a> {
    registry: &'a dyn MerchantRegistry,
    claims: &'a dyn EligibleClaims,
    campaigns: &'a dyn CampaignStore,
    config: ValidationConfig,
}

impl<'a> ValidationChain<'a> {
    pub fn new(
        registry: &'a dyn MerchantRegistry,
        claims: &'a dyn EligibleClaims,
        campaigns: &'a dyn CampaignStore,
    ) -> Self {
        Self::with_config(registry, claims, campaigns, ValidationConfig::default())
    }

    pub fn with_config(
        registry: &'a dyn MerchantRegistry,
        claims: &'a dyn EligibleClaims,
        campaigns: &'a dyn CampaignStore,
        config: ValidationConfig,
    ) -> Self {
        Self {
            registry,
            claims,
            campaigns,
            config,
        }
    }

    /// Run a claim through the chain against a raw OCR response.
    ///
    /// Always returns a terminal outcome, never an error: anticipated
    /// failures resolve with one fixed reason code, and an error escaping
    /// a gate resolves as an unprocessable verdict carrying a free-text
    /// diagnostic.
    pub fn validate(&self, claim: &Claim, ocr: &Value) -> ValidationOutcome {
        let fields = extract_receipt_fields(ocr);
        match self.run_gates(claim, &fields) {
            Ok(verdict) => ValidationOutcome { verdict, fields },
            Err(e) => {
                error!(claim_id = %claim.id, error = %e, "validation fault");
                ValidationOutcome {
                    verdict: Verdict::fault(e.to_string()),
                    fields,
                }
            }
        }
    }

    fn run_gates(&self, claim: &Claim, fields: &ReceiptFields) -> Result<Verdict> {
        let mut state = ChainState::Pending;

        if fields.is_unreadable() {
            debug!(claim_id = %claim.id, ?state, "no extractable data");
            return Ok(Verdict::unprocessable(ReasonCode::UnreadableReceipt));
        }
        state = ChainState::Extracted;

        if !fields.pay_date.contains(&self.config.campaign_year) {
            debug!(claim_id = %claim.id, ?state, pay_date = %fields.pay_date, "payment date outside qualifying year");
            return Ok(Verdict::ineligible(ReasonCode::DateOutsideYear));
        }
        state = ChainState::DateChecked;

        let amount = fields.amount.unwrap_or(0);
        if amount < claim.category.min_amount(&self.config.min_amounts) {
            debug!(claim_id = %claim.id, ?state, amount, "amount below category minimum");
            return Ok(Verdict::ineligible(ReasonCode::AmountBelowMinimum));
        }
        if amount != claim.declared_amount {
            debug!(claim_id = %claim.id, ?state, amount, declared = claim.declared_amount, "amount mismatch");
            return Ok(Verdict::ineligible(ReasonCode::AmountMismatch));
        }
        state = ChainState::AmountChecked;

        if !fields.address.is_empty() && !fields.address.contains(&self.config.province_marker) {
            debug!(claim_id = %claim.id, ?state, address = %fields.address, "address outside province");
            return Ok(Verdict::ineligible(ReasonCode::OutsideProvince));
        }
        state = ChainState::LocationChecked;

        let key = ClaimKey {
            merchant: fields.merchant.clone(),
            pay_date: fields.pay_date.clone(),
            amount,
            card_prefix: claim.card_prefix.clone(),
        };
        if is_duplicate(self.claims, &key)? {
            debug!(claim_id = %claim.id, ?state, "duplicate of approved claim");
            return Ok(Verdict::duplicate());
        }
        state = ChainState::DuplicateChecked;

        if !match_merchant(self.registry, &fields.merchant, &fields.region) {
            debug!(claim_id = %claim.id, ?state, merchant = %fields.merchant, "merchant not in registry");
            return Ok(Verdict::ineligible(ReasonCode::StoreNotRegistered));
        }
        state = ChainState::StoreMatched;

        if let Some(campaign_id) = claim.campaign_id {
            let (pass, reason) =
                check_campaign(self.campaigns, campaign_id, &fields.region, &fields.pay_date);
            if !pass {
                let reason = reason.unwrap_or(ReasonCode::CampaignInactive);
                debug!(claim_id = %claim.id, ?state, campaign_id, %reason, "campaign filter failed");
                return Ok(Verdict::ineligible(reason));
            }
        }
        state = ChainState::CampaignChecked;

        debug!(claim_id = %claim.id, ?state, "all gates passed");
        Ok(Verdict::eligible())
    }
}
