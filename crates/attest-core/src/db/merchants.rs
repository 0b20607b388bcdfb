//! Merchant registry operations

use rusqlite::params;
use tracing::info;

use super::Database;
use crate::error::Result;
use crate::matcher::MerchantRegistry;
use crate::models::{MerchantRecord, NewMerchant};

impl Database {
    /// Replace the registry with freshly imported records.
    ///
    /// Runs in one transaction so readers never observe a half-replaced
    /// registry, and re-running an import cannot duplicate rows.
    pub fn replace_merchants(&self, merchants: &[NewMerchant]) -> Result<usize> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM merchants", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO merchants (name, region, road_address, category_large, category_small)
                 VALUES (?, ?, ?, ?, ?)",
            )?;
            for merchant in merchants {
                stmt.execute(params![
                    merchant.name,
                    merchant.region,
                    merchant.road_address,
                    merchant.category_large,
                    merchant.category_small,
                ])?;
            }
        }
        tx.commit()?;
        info!(count = merchants.len(), "merchant registry replaced");
        Ok(merchants.len())
    }

    /// Number of registry entries
    pub fn merchant_count(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM merchants", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Helper to convert a row to MerchantRecord
    fn row_to_merchant(row: &rusqlite::Row) -> rusqlite::Result<MerchantRecord> {
        Ok(MerchantRecord {
            id: row.get(0)?,
            name: row.get(1)?,
            region: row.get(2)?,
            road_address: row.get(3)?,
            category_large: row.get(4)?,
            category_small: row.get(5)?,
        })
    }
}

impl MerchantRegistry for Database {
    fn merchants_in_region(&self, region: &str) -> Result<Vec<MerchantRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, region, road_address, category_large, category_small
             FROM merchants WHERE region = ?",
        )?;

        let merchants = stmt
            .query_map(params![region], Self::row_to_merchant)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(merchants)
    }

    fn all_merchants(&self) -> Result<Vec<MerchantRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, region, road_address, category_large, category_small
             FROM merchants",
        )?;

        let merchants = stmt
            .query_map([], Self::row_to_merchant)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(merchants)
    }
}
