//! Campaign management commands

use anyhow::{Context, Result};
use chrono::NaiveDate;

use attest_core::db::Database;
use attest_core::models::NewCampaign;

pub fn cmd_campaigns_add(
    db: &Database,
    name: &str,
    target_region: Option<&str>,
    start: Option<&str>,
    end: Option<&str>,
    is_active: bool,
) -> Result<()> {
    let parse = |s: &str| {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("invalid date {} (use YYYY-MM-DD)", s))
    };
    let start_date = start.map(parse).transpose()?;
    let end_date = end.map(parse).transpose()?;
    if start_date.is_some() != end_date.is_some() {
        println!("Note: the window is only enforced when both --start and --end are set");
    }

    let id = db.create_campaign(&NewCampaign {
        name: name.to_string(),
        is_active,
        target_region: target_region.map(String::from),
        start_date,
        end_date,
    })?;
    println!("Created campaign {} ({})", id, name);
    Ok(())
}

pub fn cmd_campaigns_list(db: &Database) -> Result<()> {
    let campaigns = db.list_campaigns()?;
    if campaigns.is_empty() {
        println!("No campaigns configured");
        return Ok(());
    }

    println!("{:<5} {:<8} {:<12} {:<24} NAME", "ID", "ACTIVE", "REGION", "WINDOW");
    for campaign in campaigns {
        let window = match (campaign.start_date, campaign.end_date) {
            (Some(start), Some(end)) => format!("{} .. {}", start, end),
            _ => "-".to_string(),
        };
        println!(
            "{:<5} {:<8} {:<12} {:<24} {}",
            campaign.id,
            if campaign.is_active { "yes" } else { "no" },
            campaign.target_region.as_deref().unwrap_or("-"),
            window,
            campaign.name
        );
    }
    Ok(())
}
