//! CLI command tests

use std::io::Write;

use crate::commands;

fn temp_db_path(dir: &tempfile::TempDir) -> String {
    dir.path().join("attest.db").to_string_lossy().to_string()
}

const REGISTRY_CSV: &str = "업소명,업종,업태,도로명주소\n\
강원맛식당,음식점,한식,강원특별자치도 춘천시 중앙로 1\n\
속초수산시장,소매,수산물,강원특별자치도 속초시 중앙부두길 12\n";

#[test]
fn import_merchants_replaces_registry() {
    let dir = tempfile::tempdir().unwrap();
    let db = commands::open_db(&temp_db_path(&dir)).unwrap();

    let csv_path = dir.path().join("stores.csv");
    let mut file = std::fs::File::create(&csv_path).unwrap();
    file.write_all(REGISTRY_CSV.as_bytes()).unwrap();

    commands::cmd_import_merchants(&db, csv_path.to_str().unwrap()).unwrap();
    assert_eq!(db.merchant_count().unwrap(), 2);

    // Importing again replaces rather than appends
    commands::cmd_import_merchants(&db, csv_path.to_str().unwrap()).unwrap();
    assert_eq!(db.merchant_count().unwrap(), 2);
}

#[test]
fn import_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let db = commands::open_db(&temp_db_path(&dir)).unwrap();
    assert!(commands::cmd_import_merchants(&db, "/no/such/file.csv").is_err());
}

#[test]
fn campaigns_add_and_list() {
    let dir = tempfile::tempdir().unwrap();
    let db = commands::open_db(&temp_db_path(&dir)).unwrap();

    commands::cmd_campaigns_add(
        &db,
        "속초 집중 주간",
        Some("속초시"),
        Some("2026-05-01"),
        Some("2026-05-31"),
        true,
    )
    .unwrap();

    let campaigns = db.list_campaigns().unwrap();
    assert_eq!(campaigns.len(), 1);
    assert_eq!(campaigns[0].target_region.as_deref(), Some("속초시"));
    assert!(campaigns[0].is_active);

    commands::cmd_campaigns_list(&db).unwrap();

    assert!(commands::cmd_campaigns_add(&db, "bad", None, Some("05/01/2026"), Some("2026-05-31"), true)
        .is_err());
}

#[test]
fn validate_runs_the_chain_offline() {
    let dir = tempfile::tempdir().unwrap();
    let db = commands::open_db(&temp_db_path(&dir)).unwrap();

    let csv_path = dir.path().join("stores.csv");
    std::fs::write(&csv_path, REGISTRY_CSV).unwrap();
    commands::cmd_import_merchants(&db, csv_path.to_str().unwrap()).unwrap();

    let ocr_path = dir.path().join("ocr.json");
    std::fs::write(
        &ocr_path,
        serde_json::json!({
            "images": [{
                "receipt": {
                    "result": {
                        "storeInfo": {
                            "name": { "text": "강원맛식당" },
                            "address": { "text": "강원특별자치도 춘천시 중앙로 1" }
                        },
                        "paymentInfo": { "date": { "text": "2026-05-20" } },
                        "totalPrice": { "price": { "text": "55,000원" } }
                    }
                }
            }]
        })
        .to_string(),
    )
    .unwrap();

    commands::cmd_validate(
        &db,
        ocr_path.to_str().unwrap(),
        "activity",
        55000,
        "1234",
        None,
        None,
    )
    .unwrap();

    // Unknown category and unreadable fixture are command errors, not panics
    assert!(commands::cmd_validate(
        &db,
        ocr_path.to_str().unwrap(),
        "shopping",
        55000,
        "1234",
        None,
        None,
    )
    .is_err());
    assert!(commands::cmd_validate(&db, "/no/such/ocr.json", "activity", 1, "1234", None, None)
        .is_err());
}
