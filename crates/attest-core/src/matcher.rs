//! Merchant matching against the reference registry
//!
//! Region scoping runs first so a chain-store name in a distant city
//! cannot satisfy the match and comparison cost stays proportional to the
//! local registry slice. Then an exact trimmed comparison, then a
//! token-order-insensitive similarity score tolerant of OCR character
//! substitutions and spacing noise. Registry failures degrade to
//! no-match: merchant eligibility is a hard requirement, so this
//! component fails closed.

use tracing::{debug, warn};

use crate::error::Result;
use crate::models::MerchantRecord;

/// Similarity threshold (0-100, inclusive) for treating two merchant
/// names as the same store. Tolerates OCR noise, not substantively
/// different names.
pub const FUZZY_MATCH_THRESHOLD: f64 = 85.0;

/// Read-only access to the merchant reference registry
pub trait MerchantRegistry {
    /// Entries whose region token equals `region`
    fn merchants_in_region(&self, region: &str) -> Result<Vec<MerchantRecord>>;

    /// The full registry, for claims with no usable region token
    fn all_merchants(&self) -> Result<Vec<MerchantRecord>>;
}

/// Token-order-insensitive similarity on a 0-100 scale.
///
/// Both names are split on whitespace, the tokens sorted and rejoined
/// with single spaces, and the normalized Levenshtein similarity of the
/// results scaled to 0-100. `"맛식당 강원"` vs `"강원 맛식당"` scores 100.
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    fn token_sort(s: &str) -> String {
        let mut tokens: Vec<&str> = s.split_whitespace().collect();
        tokens.sort_unstable();
        tokens.join(" ")
    }
    strsim::normalized_levenshtein(&token_sort(a), &token_sort(b)) * 100.0
}

/// Decide whether `name` names a registered merchant in `region`.
///
/// An empty name never matches. An empty region token falls back to the
/// full registry. A registry error is absorbed as no-match.
pub fn match_merchant(registry: &dyn MerchantRegistry, name: &str, region: &str) -> bool {
    let name = name.trim();
    if name.is_empty() {
        return false;
    }
    let region = region.trim();

    let candidates = if region.is_empty() {
        registry.all_merchants()
    } else {
        registry.merchants_in_region(region)
    };
    let candidates = match candidates {
        Ok(candidates) => candidates,
        Err(e) => {
            warn!(error = %e, region, "registry lookup failed, treating as no-match");
            return false;
        }
    };

    for candidate in &candidates {
        let registered = candidate.name.trim();
        if registered.is_empty() {
            continue;
        }
        if registered == name {
            return true;
        }
        let score = token_sort_ratio(name, registered);
        if score >= FUZZY_MATCH_THRESHOLD {
            debug!(name, registered, score, "fuzzy merchant match");
            return true;
        }
    }
    false
}
