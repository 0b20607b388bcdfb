//! Command implementations

mod campaigns;
mod import;
mod serve;
mod status;
mod validate;

pub use campaigns::{cmd_campaigns_add, cmd_campaigns_list};
pub use import::cmd_import_merchants;
pub use serve::cmd_serve;
pub use status::cmd_status;
pub use validate::cmd_validate;

use anyhow::Result;
use attest_core::db::Database;

pub fn open_db(path: &str) -> Result<Database> {
    Ok(Database::new(path)?)
}

pub fn cmd_init(path: &str) -> Result<()> {
    let db = open_db(path)?;
    println!(
        "Initialized database at {} ({} merchants in registry)",
        path,
        db.merchant_count()?
    );
    Ok(())
}
