//! CLI argument definitions

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "attest",
    about = "Receipt verification for travel incentive campaigns",
    version
)]
pub struct Cli {
    /// Database file path
    #[arg(long, global = true, default_value = "attest.db")]
    pub db: String,

    /// Verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Import the merchant reference registry from CSV (replaces existing)
    ImportMerchants {
        /// CSV file with 업소명/업종/업태/도로명주소 columns
        #[arg(long)]
        file: String,
    },

    /// Manage campaigns
    Campaigns {
        #[command(subcommand)]
        action: Option<CampaignsAction>,
    },

    /// Validate a claim offline against a stored OCR response
    Validate {
        /// OCR response JSON file
        #[arg(long)]
        ocr: String,

        /// Claim category (lodging or activity)
        #[arg(long)]
        category: String,

        /// User-declared amount in won
        #[arg(long)]
        amount: i64,

        /// First four digits of the paying card
        #[arg(long, default_value = "0000")]
        card_prefix: String,

        /// Campaign to check against
        #[arg(long)]
        campaign: Option<i64>,

        /// Override the qualifying year token
        #[arg(long)]
        year: Option<String>,
    },

    /// Start the web server
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        #[arg(short, long, default_value_t = 8000)]
        port: u16,

        /// Directory for uploaded receipt images
        #[arg(long, default_value = "receipts")]
        storage_dir: String,

        /// Allowed CORS origin (repeatable; empty allows any)
        #[arg(long)]
        allow_origin: Vec<String>,
    },

    /// Show a claim's status and verdict
    Status { claim_id: String },
}

#[derive(Subcommand)]
pub enum CampaignsAction {
    /// List campaigns
    List,

    /// Add a campaign
    Add {
        name: String,

        /// Region token the campaign targets (e.g. 속초시); omit for the
        /// whole province
        #[arg(long)]
        target_region: Option<String>,

        /// Window start (YYYY-MM-DD); enforced only with --end
        #[arg(long)]
        start: Option<String>,

        /// Window end (YYYY-MM-DD); enforced only with --start
        #[arg(long)]
        end: Option<String>,

        /// Create the campaign disabled
        #[arg(long)]
        inactive: bool,
    },
}
