//! Integration tests for attest-core
//!
//! These tests exercise the full ingest → validate → persist workflow
//! against the SQLite store, including the end-to-end claim scenarios.

use serde_json::{json, Value};

use attest_core::{
    chain::{ValidationChain, ValidationConfig},
    db::Database,
    models::{Claim, ClaimCategory, ClaimStatus, NewCampaign, ReasonCode},
    registry::parse_merchants_csv,
};

/// Registry CSV covering two regions
fn registry_csv() -> &'static str {
    "업소명,업종,업태,도로명주소\n\
     강원맛식당,음식점,한식,강원특별자치도 춘천시 중앙로 1\n\
     춘천호반게스트하우스,숙박,펜션,강원특별자치도 춘천시 호반로 22\n\
     속초수산시장,소매,수산물,강원특별자치도 속초시 중앙부두길 12\n"
}

fn seeded_db() -> Database {
    let db = Database::in_memory().expect("Failed to create in-memory database");
    let merchants = parse_merchants_csv(registry_csv().as_bytes()).expect("Failed to parse CSV");
    db.replace_merchants(&merchants).expect("Failed to seed registry");
    db
}

fn ocr_response(merchant: &str, address: &str, date: &str, price: &str) -> Value {
    json!({
        "images": [{
            "receipt": {
                "result": {
                    "storeInfo": {
                        "name": { "text": merchant },
                        "address": { "text": address }
                    },
                    "paymentInfo": { "date": { "text": date } },
                    "totalPrice": { "price": { "text": price } }
                }
            }
        }]
    })
}

fn activity_claim(declared: i64) -> Claim {
    Claim::new("user-1", ClaimCategory::Activity, declared, "1234", vec![], None)
}

/// Run one claim end to end: create, validate, persist extraction and
/// verdict, and return the stored claim.
fn process(db: &Database, claim: Claim, ocr: &Value) -> Claim {
    db.create_claim(&claim).unwrap();
    db.set_claim_status(&claim.id, ClaimStatus::Processing).unwrap();

    let chain = ValidationChain::new(db, db, db);
    let outcome = chain.validate(&claim, ocr);

    db.record_extraction(&claim.id, &outcome.fields, ocr).unwrap();
    db.record_verdict(&claim.id, &outcome.verdict).unwrap();
    db.get_claim(&claim.id).unwrap().unwrap()
}

#[test]
fn scenario_a_valid_activity_claim_is_eligible() {
    let db = seeded_db();
    let ocr = ocr_response(
        "강원맛식당",
        "강원특별자치도 춘천시 중앙로 1",
        "2026-05-20",
        "55,000",
    );

    let stored = process(&db, activity_claim(55000), &ocr);
    assert_eq!(stored.status, ClaimStatus::Eligible);
    assert!(stored.reason.is_none());
    assert_eq!(stored.merchant.as_deref(), Some("강원맛식당"));
    assert_eq!(stored.region.as_deref(), Some("춘천시"));
    assert_eq!(stored.extracted_amount, Some(55000));
}

#[test]
fn scenario_b_prior_year_receipt_is_rejected() {
    let db = seeded_db();
    let ocr = ocr_response(
        "강원맛식당",
        "강원특별자치도 춘천시 중앙로 1",
        "2025-05-20",
        "55,000",
    );

    let stored = process(&db, activity_claim(55000), &ocr);
    assert_eq!(stored.status, ClaimStatus::Ineligible);
    assert_eq!(stored.reason, Some(ReasonCode::DateOutsideYear));
}

#[test]
fn scenario_c_declared_amount_mismatch_is_rejected() {
    let db = seeded_db();
    let ocr = ocr_response(
        "강원맛식당",
        "강원특별자치도 춘천시 중앙로 1",
        "2026-05-20",
        "55,000",
    );

    let stored = process(&db, activity_claim(60000), &ocr);
    assert_eq!(stored.status, ClaimStatus::Ineligible);
    assert_eq!(stored.reason, Some(ReasonCode::AmountMismatch));
}

#[test]
fn scenario_d_unregistered_merchant_is_rejected() {
    let db = seeded_db();
    let ocr = ocr_response(
        "서울불고기집",
        "강원특별자치도 춘천시 중앙로 9",
        "2026-05-20",
        "55,000",
    );

    let stored = process(&db, activity_claim(55000), &ocr);
    assert_eq!(stored.status, ClaimStatus::Ineligible);
    assert_eq!(stored.reason, Some(ReasonCode::StoreNotRegistered));
}

#[test]
fn ocr_typo_in_merchant_name_still_matches() {
    let db = seeded_db();
    // One syllable misread by OCR; similarity carries it (9 of 10
    // characters agree, score 90)
    let ocr = ocr_response(
        "춘천호반게스트하우수",
        "강원특별자치도 춘천시 호반로 22",
        "2026-07-01",
        "80,000원",
    );

    let claim = Claim::new("user-2", ClaimCategory::Lodging, 80000, "7777", vec![], None);
    let stored = process(&db, claim, &ocr);
    assert_eq!(stored.status, ClaimStatus::Eligible);
}

#[test]
fn second_identical_claim_is_a_duplicate() {
    let db = seeded_db();
    let ocr = ocr_response(
        "강원맛식당",
        "강원특별자치도 춘천시 중앙로 1",
        "2026-05-20",
        "55,000",
    );

    let first = process(&db, activity_claim(55000), &ocr);
    assert_eq!(first.status, ClaimStatus::Eligible);

    let second = process(&db, activity_claim(55000), &ocr);
    assert_eq!(second.status, ClaimStatus::Duplicate);
    assert_eq!(second.reason, Some(ReasonCode::DuplicateClaim));

    // A different card prefix is not a repeat
    let mut third = activity_claim(55000);
    third.card_prefix = "9999".to_string();
    let third = process(&db, third, &ocr);
    assert_eq!(third.status, ClaimStatus::Eligible);
}

#[test]
fn unreadable_receipt_resolves_unprocessable() {
    let db = seeded_db();
    let ocr = json!({ "images": [{ "receipt": { "result": {} } }] });

    let stored = process(&db, activity_claim(55000), &ocr);
    assert_eq!(stored.status, ClaimStatus::Error);
    assert_eq!(stored.reason, Some(ReasonCode::UnreadableReceipt));
}

#[test]
fn campaign_window_and_region_apply_end_to_end() {
    let db = seeded_db();
    let campaign_id = db
        .create_campaign(&NewCampaign {
            name: "속초 집중 주간".to_string(),
            is_active: true,
            target_region: Some("속초시".to_string()),
            start_date: chrono::NaiveDate::from_ymd_opt(2026, 5, 1),
            end_date: chrono::NaiveDate::from_ymd_opt(2026, 5, 31),
        })
        .unwrap();

    let sokcho_ocr = ocr_response(
        "속초수산시장",
        "강원특별자치도 속초시 중앙부두길 12",
        "2026-05-10",
        "52,000",
    );
    let mut claim = activity_claim(52000);
    claim.campaign_id = Some(campaign_id);
    let stored = process(&db, claim, &sokcho_ocr);
    assert_eq!(stored.status, ClaimStatus::Eligible);

    // Same campaign, store in the wrong city
    let chuncheon_ocr = ocr_response(
        "강원맛식당",
        "강원특별자치도 춘천시 중앙로 1",
        "2026-05-10",
        "52,000",
    );
    let mut claim = activity_claim(52000);
    claim.campaign_id = Some(campaign_id);
    let stored = process(&db, claim, &chuncheon_ocr);
    assert_eq!(stored.status, ClaimStatus::Ineligible);
    assert_eq!(stored.reason, Some(ReasonCode::RegionMismatch));

    // Same campaign, payment outside the window
    let late_ocr = ocr_response(
        "속초수산시장",
        "강원특별자치도 속초시 중앙부두길 12",
        "2026-06-10",
        "52,000",
    );
    let mut claim = activity_claim(52000);
    claim.campaign_id = Some(campaign_id);
    let stored = process(&db, claim, &late_ocr);
    assert_eq!(stored.status, ClaimStatus::Ineligible);
    assert_eq!(stored.reason, Some(ReasonCode::CampaignInactive));
}

#[test]
fn configured_year_token_drives_the_date_gate() {
    let db = seeded_db();
    let ocr = ocr_response(
        "강원맛식당",
        "강원특별자치도 춘천시 중앙로 1",
        "2027-02-01",
        "55,000",
    );

    let claim = activity_claim(55000);
    db.create_claim(&claim).unwrap();

    let config = ValidationConfig {
        campaign_year: "2027".to_string(),
        ..ValidationConfig::default()
    };
    let chain = ValidationChain::with_config(&db, &db, &db, config);
    let outcome = chain.validate(&claim, &ocr);
    assert!(outcome.verdict.is_eligible());
}
