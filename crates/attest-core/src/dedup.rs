//! Duplicate detection over approved claims
//!
//! A claim is a repeat when a claim already marked eligible carries
//! exactly the same merchant name, raw payment-date string, amount, and
//! card prefix. Only eligible claims count as candidates; pending or
//! rejected submissions never block a resubmission.
//!
//! This is a read against concurrently-mutating state: two submissions
//! with the same key can both observe "not yet duplicate" before either
//! is approved. The claim store's uniqueness constraint over eligible
//! claims is the serialization point (see `db::claims`).

use crate::error::Result;
use crate::models::ClaimKey;

/// Lookup over claims already marked eligible
pub trait EligibleClaims {
    fn eligible_claim_exists(&self, key: &ClaimKey) -> Result<bool>;
}

/// True when an eligible claim with this exact quadruple already exists.
///
/// Store errors propagate: an unanswered duplicate check is an
/// unanticipated fault for the chain's outer catch, not a pass.
pub fn is_duplicate(claims: &dyn EligibleClaims, key: &ClaimKey) -> Result<bool> {
    claims.eligible_claim_exists(key)
}
