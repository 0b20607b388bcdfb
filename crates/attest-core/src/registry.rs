//! Merchant registry CSV ingestion
//!
//! The reference dataset ships as CSV with Korean headers
//! (업소명, 업종, 업태, 도로명주소). The region token is derived from the
//! road address with the same rule the field extractor uses, so registry
//! tokens and OCR tokens compare directly. English header aliases are
//! accepted for re-importing previously exported data.

use csv::ReaderBuilder;
use std::io::Read;
use tracing::debug;

use crate::error::{Error, Result};
use crate::extract::region_token;
use crate::models::NewMerchant;

/// Parse merchant registry CSV data
pub fn parse_merchants_csv<R: Read>(reader: R) -> Result<Vec<NewMerchant>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let position = |names: &[&str]| {
        headers
            .iter()
            .position(|h| names.contains(&h.trim()))
    };

    let name_idx = position(&["업소명", "store_name", "name"])
        .ok_or_else(|| Error::Import("missing merchant name column".into()))?;
    let addr_idx = position(&["도로명주소", "road_address"])
        .ok_or_else(|| Error::Import("missing road address column".into()))?;
    let category_large_idx = position(&["업종", "category_large"]);
    let category_small_idx = position(&["업태", "category_small"]);

    let mut merchants = Vec::new();
    for result in rdr.records() {
        let record = result?;

        let name = record.get(name_idx).unwrap_or("").trim();
        if name.is_empty() {
            continue;
        }
        let road_address = record.get(addr_idx).unwrap_or("").trim().to_string();
        let region = region_token(&road_address);

        let optional = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        };

        merchants.push(NewMerchant {
            name: name.to_string(),
            region,
            road_address,
            category_large: optional(category_large_idx),
            category_small: optional(category_small_idx),
        });
    }

    debug!("parsed {} merchant records", merchants.len());
    Ok(merchants)
}
