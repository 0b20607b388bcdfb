//! Campaign eligibility filtering
//!
//! Campaigns are optional metadata: a missing record or a failed lookup
//! must not block an otherwise-valid claim, so this filter fails open --
//! the opposite of the merchant matcher's policy. A found campaign is
//! checked for its active flag, its date window, and its region target.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::error::Result;
use crate::models::{Campaign, ReasonCode};

/// Campaign configuration lookup
pub trait CampaignStore {
    fn campaign(&self, id: i64) -> Result<Option<Campaign>>;
}

/// Region containment tolerant of inconsistently suffixed tokens
/// harvested from free-text addresses ("속초시" vs "속초"): equality,
/// mutual substring, then the target with its 시/군 suffix characters
/// stripped as a substring of the store's region.
fn region_covers(target: &str, store_region: &str) -> bool {
    if store_region == target {
        return true;
    }
    if target.contains(store_region) || store_region.contains(target) {
        return true;
    }
    let key: String = target
        .chars()
        .filter(|c| *c != '시' && *c != '군')
        .collect();
    let key = key.trim();
    !key.is_empty() && store_region.contains(key)
}

/// Check a claim against its campaign's active flag, date window, and
/// region targeting.
///
/// Returns `(true, None)` on pass. A missing campaign or a failed lookup
/// passes: absence of campaign metadata must not block legacy claims.
/// The window is enforced only when both ends are configured; inside the
/// window is inclusive. An unparsable payment date with a configured
/// window fails as OCR_002.
pub fn check_campaign(
    store: &dyn CampaignStore,
    campaign_id: i64,
    store_region: &str,
    pay_date: &str,
) -> (bool, Option<ReasonCode>) {
    let campaign = match store.campaign(campaign_id) {
        Ok(Some(campaign)) => campaign,
        Ok(None) => return (true, None),
        Err(e) => {
            warn!(campaign_id, error = %e, "campaign lookup failed, skipping filter");
            return (true, None);
        }
    };

    if !campaign.is_active {
        return (false, Some(ReasonCode::CampaignInactive));
    }

    if let (Some(start), Some(end)) = (campaign.start_date, campaign.end_date) {
        let pay_date = pay_date.trim();
        if !pay_date.is_empty() {
            // The date leaf may carry trailing time-of-day text; only the
            // leading YYYY-MM-DD portion is significant
            let prefix: String = pay_date.chars().take(10).collect();
            match NaiveDate::parse_from_str(&prefix, "%Y-%m-%d") {
                Ok(date) => {
                    if date < start || date > end {
                        debug!(campaign_id, %date, "payment date outside campaign window");
                        return (false, Some(ReasonCode::CampaignInactive));
                    }
                }
                Err(_) => return (false, Some(ReasonCode::InvalidDateFormat)),
            }
        }
    }

    let target = campaign
        .target_region
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());
    let Some(target) = target else {
        // No target region: the whole province qualifies
        return (true, None);
    };

    if region_covers(target, store_region.trim()) {
        (true, None)
    } else {
        (false, Some(ReasonCode::RegionMismatch))
    }
}
