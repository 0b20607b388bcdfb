//! Database tests

use super::*;
use crate::campaign::CampaignStore;
use crate::dedup::EligibleClaims;
use crate::matcher::MerchantRegistry;
use crate::models::*;

fn sample_claim() -> Claim {
    Claim::new(
        "user-1",
        ClaimCategory::Activity,
        55000,
        "1234",
        vec!["receipts/r1.jpg".to_string()],
        None,
    )
}

fn sample_fields() -> ReceiptFields {
    ReceiptFields {
        merchant: "강원맛식당".to_string(),
        address: "강원특별자치도 춘천시 중앙로 1".to_string(),
        region: "춘천시".to_string(),
        pay_date: "2026-05-20".to_string(),
        amount: Some(55000),
    }
}

#[test]
fn test_in_memory_db() {
    let db = Database::in_memory().unwrap();
    assert_eq!(db.merchant_count().unwrap(), 0);
    assert!(db.list_campaigns().unwrap().is_empty());
}

#[test]
fn test_claim_round_trip() {
    let db = Database::in_memory().unwrap();
    let claim = sample_claim();
    db.create_claim(&claim).unwrap();

    let stored = db.get_claim(&claim.id).unwrap().unwrap();
    assert_eq!(stored.user_id, "user-1");
    assert_eq!(stored.category, ClaimCategory::Activity);
    assert_eq!(stored.status, ClaimStatus::Pending);
    assert_eq!(stored.declared_amount, 55000);
    assert_eq!(stored.image_keys, vec!["receipts/r1.jpg".to_string()]);
    assert!(stored.merchant.is_none());

    assert!(db.get_claim("no-such-claim").unwrap().is_none());
}

#[test]
fn test_claim_submission_update() {
    let db = Database::in_memory().unwrap();
    let mut claim = sample_claim();
    claim.declared_amount = 0;
    claim.card_prefix = String::new();
    db.create_claim(&claim).unwrap();

    db.update_claim_submission(
        &claim.id,
        "lodging",
        70000,
        "5678",
        &["receipts/r2.jpg".to_string()],
        Some(3),
    )
    .unwrap();

    let stored = db.get_claim(&claim.id).unwrap().unwrap();
    assert_eq!(stored.category, ClaimCategory::Lodging);
    assert_eq!(stored.declared_amount, 70000);
    assert_eq!(stored.card_prefix, "5678");
    assert_eq!(stored.campaign_id, Some(3));

    let missing = db.update_claim_submission("nope", "lodging", 1, "0000", &[], None);
    assert!(missing.is_err());
}

#[test]
fn test_extraction_and_verdict_recording() {
    let db = Database::in_memory().unwrap();
    let claim = sample_claim();
    db.create_claim(&claim).unwrap();
    db.set_claim_status(&claim.id, ClaimStatus::Processing).unwrap();

    let raw = serde_json::json!({ "images": [] });
    db.record_extraction(&claim.id, &sample_fields(), &raw).unwrap();

    let recorded = db
        .record_verdict(&claim.id, &Verdict::ineligible(ReasonCode::AmountMismatch))
        .unwrap();
    assert_eq!(recorded.status, ClaimStatus::Ineligible);

    let stored = db.get_claim(&claim.id).unwrap().unwrap();
    assert_eq!(stored.status, ClaimStatus::Ineligible);
    assert_eq!(stored.reason, Some(ReasonCode::AmountMismatch));
    assert_eq!(stored.merchant.as_deref(), Some("강원맛식당"));
    assert_eq!(stored.extracted_amount, Some(55000));
}

#[test]
fn test_eligible_claims_lookup_only_counts_eligible() {
    let db = Database::in_memory().unwrap();
    let claim = sample_claim();
    db.create_claim(&claim).unwrap();
    db.record_extraction(&claim.id, &sample_fields(), &serde_json::json!({}))
        .unwrap();

    let key = ClaimKey {
        merchant: "강원맛식당".to_string(),
        pay_date: "2026-05-20".to_string(),
        amount: 55000,
        card_prefix: "1234".to_string(),
    };

    // Still pending: not a duplicate candidate
    assert!(!db.eligible_claim_exists(&key).unwrap());

    db.record_verdict(&claim.id, &Verdict::eligible()).unwrap();
    assert!(db.eligible_claim_exists(&key).unwrap());

    // Any field difference misses
    let mut other = key.clone();
    other.card_prefix = "9999".to_string();
    assert!(!db.eligible_claim_exists(&other).unwrap());
}

#[test]
fn test_duplicate_race_downgrades_second_eligible_verdict() {
    let db = Database::in_memory().unwrap();

    let first = sample_claim();
    let second = sample_claim();
    db.create_claim(&first).unwrap();
    db.create_claim(&second).unwrap();

    // Both claims passed the duplicate gate before either was approved
    let raw = serde_json::json!({});
    db.record_extraction(&first.id, &sample_fields(), &raw).unwrap();
    db.record_extraction(&second.id, &sample_fields(), &raw).unwrap();

    let recorded = db.record_verdict(&first.id, &Verdict::eligible()).unwrap();
    assert_eq!(recorded.status, ClaimStatus::Eligible);

    let recorded = db.record_verdict(&second.id, &Verdict::eligible()).unwrap();
    assert_eq!(recorded.status, ClaimStatus::Duplicate);
    assert_eq!(recorded.reason, Some(ReasonCode::DuplicateClaim));

    let stored = db.get_claim(&second.id).unwrap().unwrap();
    assert_eq!(stored.status, ClaimStatus::Duplicate);
}

#[test]
fn test_merchant_registry_region_scoping() {
    let db = Database::in_memory().unwrap();
    let merchants = vec![
        NewMerchant {
            name: "강원맛식당".to_string(),
            region: "춘천시".to_string(),
            road_address: "강원특별자치도 춘천시 중앙로 1".to_string(),
            category_large: Some("음식점".to_string()),
            category_small: None,
        },
        NewMerchant {
            name: "속초수산시장".to_string(),
            region: "속초시".to_string(),
            road_address: "강원특별자치도 속초시 중앙부두길 1".to_string(),
            category_large: None,
            category_small: None,
        },
    ];
    assert_eq!(db.replace_merchants(&merchants).unwrap(), 2);

    let chuncheon = db.merchants_in_region("춘천시").unwrap();
    assert_eq!(chuncheon.len(), 1);
    assert_eq!(chuncheon[0].name, "강원맛식당");

    assert_eq!(db.all_merchants().unwrap().len(), 2);

    // Re-import replaces rather than appends
    assert_eq!(db.replace_merchants(&merchants[..1]).unwrap(), 1);
    assert_eq!(db.merchant_count().unwrap(), 1);
}

#[test]
fn test_campaign_store() {
    let db = Database::in_memory().unwrap();
    let id = db
        .create_campaign(&NewCampaign {
            name: "봄 여행 주간".to_string(),
            is_active: true,
            target_region: Some("속초시".to_string()),
            start_date: chrono::NaiveDate::from_ymd_opt(2026, 5, 1),
            end_date: chrono::NaiveDate::from_ymd_opt(2026, 5, 31),
        })
        .unwrap();

    let campaign = db.campaign(id).unwrap().unwrap();
    assert!(campaign.is_active);
    assert_eq!(campaign.target_region.as_deref(), Some("속초시"));
    assert_eq!(
        campaign.start_date,
        chrono::NaiveDate::from_ymd_opt(2026, 5, 1)
    );

    assert!(db.campaign(id + 1).unwrap().is_none());
    assert_eq!(db.list_campaigns().unwrap().len(), 1);
}
