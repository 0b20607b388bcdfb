//! Attest CLI - receipt incentive verification service
//!
//! Usage:
//!   attest init                         Initialize the database
//!   attest import-merchants --file CSV  Import the merchant registry
//!   attest campaigns add NAME           Configure a campaign
//!   attest validate --ocr FILE ...      Validate a claim offline
//!   attest serve --port 8000            Start the web server
//!   attest status CLAIM_ID              Show a claim's verdict

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::ImportMerchants { file } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_import_merchants(&db, &file)
        }
        Commands::Campaigns { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                None | Some(CampaignsAction::List) => commands::cmd_campaigns_list(&db),
                Some(CampaignsAction::Add {
                    name,
                    target_region,
                    start,
                    end,
                    inactive,
                }) => commands::cmd_campaigns_add(
                    &db,
                    &name,
                    target_region.as_deref(),
                    start.as_deref(),
                    end.as_deref(),
                    !inactive,
                ),
            }
        }
        Commands::Validate {
            ocr,
            category,
            amount,
            card_prefix,
            campaign,
            year,
        } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_validate(
                &db,
                &ocr,
                &category,
                amount,
                &card_prefix,
                campaign,
                year.as_deref(),
            )
        }
        Commands::Serve {
            host,
            port,
            storage_dir,
            allow_origin,
        } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_serve(db, &host, port, &storage_dir, allow_origin).await
        }
        Commands::Status { claim_id } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_status(&db, &claim_id)
        }
    }
}
