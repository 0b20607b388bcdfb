//! Campaign configuration operations

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::campaign::CampaignStore;
use crate::error::Result;
use crate::models::{Campaign, NewCampaign};

impl Database {
    /// Create a campaign, returning its id
    pub fn create_campaign(&self, campaign: &NewCampaign) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO campaigns (name, is_active, target_region, start_date, end_date)
             VALUES (?, ?, ?, ?, ?)",
            params![
                campaign.name,
                campaign.is_active,
                campaign.target_region,
                campaign.start_date.map(|d| d.to_string()),
                campaign.end_date.map(|d| d.to_string()),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// List all campaigns, newest first
    pub fn list_campaigns(&self) -> Result<Vec<Campaign>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, is_active, target_region, start_date, end_date, created_at
             FROM campaigns ORDER BY id DESC",
        )?;

        let campaigns = stmt
            .query_map([], Self::row_to_campaign)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(campaigns)
    }

    /// Helper to convert a row to Campaign
    fn row_to_campaign(row: &rusqlite::Row) -> rusqlite::Result<Campaign> {
        let start_date_str: Option<String> = row.get(4)?;
        let end_date_str: Option<String> = row.get(5)?;
        let created_at_str: String = row.get(6)?;

        Ok(Campaign {
            id: row.get(0)?,
            name: row.get(1)?,
            is_active: row.get(2)?,
            target_region: row.get(3)?,
            start_date: start_date_str
                .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
            end_date: end_date_str.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
            created_at: parse_datetime(&created_at_str),
        })
    }
}

impl CampaignStore for Database {
    fn campaign(&self, id: i64) -> Result<Option<Campaign>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, is_active, target_region, start_date, end_date, created_at
             FROM campaigns WHERE id = ?",
        )?;

        let campaign = stmt
            .query_row(params![id], Self::row_to_campaign)
            .optional()?;

        Ok(campaign)
    }
}
