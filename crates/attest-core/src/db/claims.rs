//! Claim lifecycle operations

use rusqlite::{params, OptionalExtension};
use serde_json::Value;
use tracing::warn;

use super::{parse_datetime, Database};
use crate::dedup::EligibleClaims;
use crate::error::{Error, Result};
use crate::models::{Claim, ClaimKey, ClaimStatus, ReceiptFields, Verdict};

const CLAIM_COLUMNS: &str = "id, user_id, category, status, declared_amount, card_prefix,
     campaign_id, image_keys, merchant, address, region, pay_date, extracted_amount,
     reason, detail, content_hash, created_at";

impl Database {
    /// Open a new claim row
    pub fn create_claim(&self, claim: &Claim) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO claims (id, user_id, category, status, declared_amount, card_prefix,
             campaign_id, image_keys, content_hash)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                claim.id,
                claim.user_id,
                claim.category.as_str(),
                claim.status.as_str(),
                claim.declared_amount,
                claim.card_prefix,
                claim.campaign_id,
                serde_json::to_string(&claim.image_keys)?,
                claim.content_hash,
            ],
        )?;
        Ok(())
    }

    /// Get a claim by id
    pub fn get_claim(&self, id: &str) -> Result<Option<Claim>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM claims WHERE id = ?",
            CLAIM_COLUMNS
        ))?;

        let claim = stmt
            .query_row(params![id], Self::row_to_claim)
            .optional()?;

        Ok(claim)
    }

    /// Record the user-declared submission data on a pending claim
    pub fn update_claim_submission(
        &self,
        id: &str,
        category: &str,
        declared_amount: i64,
        card_prefix: &str,
        image_keys: &[String],
        campaign_id: Option<i64>,
    ) -> Result<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE claims SET category = ?, declared_amount = ?, card_prefix = ?,
             image_keys = ?, campaign_id = ? WHERE id = ?",
            params![
                category,
                declared_amount,
                card_prefix,
                serde_json::to_string(image_keys)?,
                campaign_id,
                id
            ],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("claim {}", id)));
        }
        Ok(())
    }

    /// Update a claim's lifecycle status
    pub fn set_claim_status(&self, id: &str, status: ClaimStatus) -> Result<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE claims SET status = ? WHERE id = ?",
            params![status.as_str(), id],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("claim {}", id)));
        }
        Ok(())
    }

    /// Persist the normalized extraction and the raw OCR tree before the
    /// verdict resolves
    pub fn record_extraction(&self, id: &str, fields: &ReceiptFields, ocr_raw: &Value) -> Result<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE claims SET merchant = ?, address = ?, region = ?, pay_date = ?,
             extracted_amount = ?, ocr_raw = ? WHERE id = ?",
            params![
                fields.merchant,
                fields.address,
                fields.region,
                fields.pay_date,
                fields.amount,
                serde_json::to_string(ocr_raw)?,
                id
            ],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("claim {}", id)));
        }
        Ok(())
    }

    /// Record a terminal verdict, returning the verdict that was actually
    /// written.
    ///
    /// The partial unique index over eligible claims serializes the
    /// duplicate race: when a concurrent claim with the same quadruple was
    /// approved first, the constraint fires here and the verdict is
    /// downgraded to duplicate instead of surfacing a constraint error.
    pub fn record_verdict(&self, id: &str, verdict: &Verdict) -> Result<Verdict> {
        let conn = self.conn()?;
        let result = conn.execute(
            "UPDATE claims SET status = ?, reason = ?, detail = ? WHERE id = ?",
            params![
                verdict.status.as_str(),
                verdict.reason.map(|r| r.as_str()),
                verdict.detail,
                id
            ],
        );
        match result {
            Ok(0) => Err(Error::NotFound(format!("claim {}", id))),
            Ok(_) => Ok(verdict.clone()),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation
                    && verdict.status == ClaimStatus::Eligible =>
            {
                warn!(claim_id = id, "eligible verdict lost the duplicate race, downgrading");
                let downgraded = Verdict::duplicate();
                conn.execute(
                    "UPDATE claims SET status = ?, reason = ?, detail = NULL WHERE id = ?",
                    params![
                        downgraded.status.as_str(),
                        downgraded.reason.map(|r| r.as_str()),
                        id
                    ],
                )?;
                Ok(downgraded)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Helper to convert a row to Claim
    fn row_to_claim(row: &rusqlite::Row) -> rusqlite::Result<Claim> {
        let category_str: String = row.get(2)?;
        let status_str: String = row.get(3)?;
        let image_keys_str: String = row.get(7)?;
        let reason_str: Option<String> = row.get(13)?;
        let created_at_str: String = row.get(16)?;

        Ok(Claim {
            id: row.get(0)?,
            user_id: row.get(1)?,
            category: category_str
                .parse()
                .map_err(|_| rusqlite::Error::InvalidQuery)?,
            status: status_str.parse().unwrap_or_default(),
            declared_amount: row.get(4)?,
            card_prefix: row.get(5)?,
            campaign_id: row.get(6)?,
            image_keys: serde_json::from_str(&image_keys_str).unwrap_or_default(),
            merchant: row.get(8)?,
            address: row.get(9)?,
            region: row.get(10)?,
            pay_date: row.get(11)?,
            extracted_amount: row.get(12)?,
            reason: reason_str.and_then(|s| s.parse().ok()),
            detail: row.get(14)?,
            content_hash: row.get(15)?,
            created_at: parse_datetime(&created_at_str),
        })
    }
}

impl EligibleClaims for Database {
    fn eligible_claim_exists(&self, key: &ClaimKey) -> Result<bool> {
        let conn = self.conn()?;
        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM claims
                 WHERE merchant = ? AND pay_date = ? AND extracted_amount = ?
                   AND card_prefix = ? AND status = 'eligible'",
                params![key.merchant, key.pay_date, key.amount, key.card_prefix],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }
}
