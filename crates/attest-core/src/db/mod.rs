//! SQLite-backed store for claims, the merchant registry, and campaigns
//!
//! This module is organized by domain:
//! - `claims` - claim lifecycle and verdict recording
//! - `merchants` - reference registry reads and replacement
//! - `campaigns` - campaign configuration
//!
//! The `Database` implements the engine's collaborator traits
//! (`MerchantRegistry`, `EligibleClaims`, `CampaignStore`), so a pooled
//! handle plugs straight into `ValidationChain`.

use chrono::{DateTime, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::info;

use crate::error::Result;

mod campaigns;
mod claims;
mod merchants;

#[cfg(test)]
mod tests;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Parse a SQLite datetime string into a DateTime<Utc>
pub(crate) fn parse_datetime(s: &str) -> DateTime<Utc> {
    // SQLite stores as "YYYY-MM-DD HH:MM:SS" format
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.and_utc())
        .unwrap_or_else(|_| Utc::now())
}

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Create a new database connection pool backed by a file
    pub fn new(path: &str) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder().max_size(10).build(manager)?;
        let db = Self { pool };
        db.run_migrations()?;
        Ok(db)
    }

    /// Create an in-memory database (for testing)
    ///
    /// The pool is capped at one connection: every `:memory:` connection
    /// would otherwise open its own empty database.
    pub fn in_memory() -> Result<Self> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder().max_size(1).build(manager)?;
        let db = Self { pool };
        db.run_migrations()?;
        Ok(db)
    }

    pub(crate) fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS claims (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                category TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending',
                declared_amount INTEGER NOT NULL DEFAULT 0,
                card_prefix TEXT NOT NULL DEFAULT '',
                campaign_id INTEGER,
                image_keys TEXT NOT NULL DEFAULT '[]',
                merchant TEXT,
                address TEXT,
                region TEXT,
                pay_date TEXT,
                extracted_amount INTEGER,
                reason TEXT,
                detail TEXT,
                content_hash TEXT,
                ocr_raw TEXT,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_claims_user ON claims(user_id);

            -- Serialization point for the duplicate race: at most one
            -- eligible claim per (merchant, pay_date, amount, card_prefix)
            CREATE UNIQUE INDEX IF NOT EXISTS idx_claims_eligible_key
                ON claims(merchant, pay_date, extracted_amount, card_prefix)
                WHERE status = 'eligible';

            CREATE TABLE IF NOT EXISTS merchants (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                region TEXT NOT NULL DEFAULT '',
                road_address TEXT NOT NULL DEFAULT '',
                category_large TEXT,
                category_small TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_merchants_region ON merchants(region);

            CREATE TABLE IF NOT EXISTS campaigns (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                is_active INTEGER NOT NULL DEFAULT 1,
                target_region TEXT,
                start_date TEXT,
                end_date TEXT,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );",
        )?;
        info!("database migrations complete");
        Ok(())
    }
}
