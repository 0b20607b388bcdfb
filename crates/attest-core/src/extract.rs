//! Field extraction from raw OCR responses
//!
//! The OCR service returns a deeply nested tree of optional fields
//! (`images[0].receipt.result.{storeInfo,totalPrice,paymentInfo}`), any of
//! which may be absent or malformed. All "unknown shape" handling lives
//! here: every step of the walk yields an absence signal instead of
//! failing, and the result collapses into one flat [`ReceiptFields`]
//! record.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::models::ReceiptFields;

fn digit_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9]+").expect("valid digit pattern"))
}

/// Trimmed leaf text at a `a.b.text`-style path, or the empty string when
/// any node along the path is missing or not a string.
fn leaf_text<'a>(node: &'a Value, path: &[&str]) -> &'a str {
    let mut cur = node;
    for key in path {
        match cur.get(key) {
            Some(next) => cur = next,
            None => return "",
        }
    }
    cur.as_str().map(str::trim).unwrap_or("")
}

/// Parse an amount out of noisy OCR price text.
///
/// Strips every non-digit character first, so `"55,000원"`, `"₩55,000"`
/// and `"55000"` all parse to 55000. Text with no digits at all is an
/// unparsable amount (`None`), never a disguised zero.
pub fn clean_amount(text: &str) -> Option<i64> {
    let digits: String = digit_runs()
        .find_iter(text)
        .map(|m| m.as_str())
        .collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Region token of a road address: the second whitespace-separated token
/// ("강원특별자치도 춘천시 중앙로 1" → "춘천시"), or the empty string when the
/// address has fewer than two tokens.
///
/// The registry importer derives its tokens with this same function, so
/// tokens compare without re-derivation.
pub fn region_token(address: &str) -> String {
    address
        .split_whitespace()
        .nth(1)
        .unwrap_or_default()
        .to_string()
}

/// Extract the normalized field record from a raw OCR response.
///
/// Never fails: missing or malformed nodes degrade to empty-string/`None`
/// defaults. [`ReceiptFields::is_unreadable`] reports the case where
/// neither a merchant name nor an amount survived.
pub fn extract_receipt_fields(raw: &Value) -> ReceiptFields {
    let result = raw
        .get("images")
        .and_then(Value::as_array)
        .and_then(|images| images.first())
        .and_then(|image| image.get("receipt"))
        .and_then(|receipt| receipt.get("result"));

    let Some(result) = result else {
        debug!("OCR response has no receipt result node");
        return ReceiptFields::default();
    };

    let merchant = leaf_text(result, &["storeInfo", "name", "text"]).to_string();
    let address = leaf_text(result, &["storeInfo", "address", "text"]).to_string();
    let pay_date = leaf_text(result, &["paymentInfo", "date", "text"]).to_string();
    let amount = clean_amount(leaf_text(result, &["totalPrice", "price", "text"]));
    let region = region_token(&address);

    ReceiptFields {
        merchant,
        address,
        region,
        pay_date,
        amount,
    }
}
