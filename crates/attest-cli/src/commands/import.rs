//! Merchant registry import command

use std::fs::File;

use anyhow::{Context, Result};

use attest_core::db::Database;
use attest_core::registry::parse_merchants_csv;

pub fn cmd_import_merchants(db: &Database, file: &str) -> Result<()> {
    let reader = File::open(file).with_context(|| format!("cannot open {}", file))?;
    let merchants = parse_merchants_csv(reader)?;
    if merchants.is_empty() {
        anyhow::bail!("no merchant rows found in {}", file);
    }
    let count = db.replace_merchants(&merchants)?;
    println!("Imported {} merchants (registry replaced)", count);
    Ok(())
}
