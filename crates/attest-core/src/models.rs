//! Domain models for attest

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claim categories, each with its own minimum spend and reward tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimCategory {
    /// Overnight accommodation (hotel, pension, guesthouse)
    Lodging,
    /// Tourist activity (restaurant, attraction, experience)
    Activity,
}

impl ClaimCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lodging => "lodging",
            Self::Activity => "activity",
        }
    }

    /// Minimum qualifying amount in won, from the configured table
    pub fn min_amount(&self, table: &MinAmounts) -> i64 {
        match self {
            Self::Lodging => table.lodging,
            Self::Activity => table.activity,
        }
    }

    /// Reward paid out for an eligible claim, in won
    pub fn reward_amount(&self) -> i64 {
        match self {
            Self::Lodging => 30000,
            Self::Activity => 10000,
        }
    }
}

impl std::str::FromStr for ClaimCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lodging" => Ok(Self::Lodging),
            "activity" => Ok(Self::Activity),
            _ => Err(format!("Unknown claim category: {}", s)),
        }
    }
}

impl std::fmt::Display for ClaimCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Category-specific minimum qualifying amounts in won
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinAmounts {
    pub lodging: i64,
    pub activity: i64,
}

impl Default for MinAmounts {
    fn default() -> Self {
        Self {
            lodging: 60000,
            activity: 50000,
        }
    }
}

/// Claim lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClaimStatus {
    /// Opened, waiting for the user to submit claim data
    #[default]
    Pending,
    /// Analysis task is running
    Processing,
    /// Passed every gate; counts toward duplicate detection
    Eligible,
    /// Failed a business gate; carries exactly one reason code
    Ineligible,
    /// Repeat of an already-eligible claim
    Duplicate,
    /// Unprocessable: unreadable receipt or an unanticipated fault
    Error,
}

impl ClaimStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Eligible => "eligible",
            Self::Ineligible => "ineligible",
            Self::Duplicate => "duplicate",
            Self::Error => "error",
        }
    }
}

impl std::str::FromStr for ClaimStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "eligible" => Ok(Self::Eligible),
            "ineligible" => Ok(Self::Ineligible),
            "duplicate" => Ok(Self::Duplicate),
            "error" => Ok(Self::Error),
            _ => Err(format!("Unknown claim status: {}", s)),
        }
    }
}

impl std::fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fixed reason-code taxonomy. Every anticipated gate failure maps to
/// exactly one code; the codes are the API contract, the variant names
/// are for readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReasonCode {
    /// OCR_001: receipt unreadable, no extractable data
    #[serde(rename = "OCR_001")]
    UnreadableReceipt,
    /// OCR_002: payment date present but unparsable
    #[serde(rename = "OCR_002")]
    InvalidDateFormat,
    /// OCR_003: merchant not found in the reference registry
    #[serde(rename = "OCR_003")]
    StoreNotRegistered,
    /// BIZ_001: duplicate of an approved claim, or missing image reference
    #[serde(rename = "BIZ_001")]
    DuplicateClaim,
    /// BIZ_002: payment date not within the qualifying year
    #[serde(rename = "BIZ_002")]
    DateOutsideYear,
    /// BIZ_003: extracted amount below the category minimum
    #[serde(rename = "BIZ_003")]
    AmountBelowMinimum,
    /// BIZ_004: extracted address outside the required province
    #[serde(rename = "BIZ_004")]
    OutsideProvince,
    /// BIZ_005: campaign inactive or outside its active window
    #[serde(rename = "BIZ_005")]
    CampaignInactive,
    /// BIZ_006: region outside the campaign's targeted region
    #[serde(rename = "BIZ_006")]
    RegionMismatch,
    /// BIZ_007: extracted amount does not equal the user-declared amount
    #[serde(rename = "BIZ_007")]
    AmountMismatch,
}

impl ReasonCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnreadableReceipt => "OCR_001",
            Self::InvalidDateFormat => "OCR_002",
            Self::StoreNotRegistered => "OCR_003",
            Self::DuplicateClaim => "BIZ_001",
            Self::DateOutsideYear => "BIZ_002",
            Self::AmountBelowMinimum => "BIZ_003",
            Self::OutsideProvince => "BIZ_004",
            Self::CampaignInactive => "BIZ_005",
            Self::RegionMismatch => "BIZ_006",
            Self::AmountMismatch => "BIZ_007",
        }
    }

    /// Short operator-facing description
    pub fn label(&self) -> &'static str {
        match self {
            Self::UnreadableReceipt => "Receipt unreadable, no extractable data",
            Self::InvalidDateFormat => "Payment date present but unparsable",
            Self::StoreNotRegistered => "Merchant not found in reference registry",
            Self::DuplicateClaim => "Duplicate of an approved claim or missing image",
            Self::DateOutsideYear => "Payment date not within the qualifying year",
            Self::AmountBelowMinimum => "Extracted amount below category minimum",
            Self::OutsideProvince => "Extracted address outside the required province",
            Self::CampaignInactive => "Campaign inactive or outside its active window",
            Self::RegionMismatch => "Region outside campaign's targeted region",
            Self::AmountMismatch => "Extracted amount does not equal declared amount",
        }
    }
}

impl std::str::FromStr for ReasonCode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "OCR_001" => Ok(Self::UnreadableReceipt),
            "OCR_002" => Ok(Self::InvalidDateFormat),
            "OCR_003" => Ok(Self::StoreNotRegistered),
            "BIZ_001" => Ok(Self::DuplicateClaim),
            "BIZ_002" => Ok(Self::DateOutsideYear),
            "BIZ_003" => Ok(Self::AmountBelowMinimum),
            "BIZ_004" => Ok(Self::OutsideProvince),
            "BIZ_005" => Ok(Self::CampaignInactive),
            "BIZ_006" => Ok(Self::RegionMismatch),
            "BIZ_007" => Ok(Self::AmountMismatch),
            _ => Err(format!("Unknown reason code: {}", s)),
        }
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Terminal decision for a claim
///
/// An eligible verdict carries no reason code; ineligible, duplicate, and
/// unreadable verdicts carry exactly one; a fault verdict carries a
/// free-text diagnostic instead of a code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    pub status: ClaimStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<ReasonCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Verdict {
    pub fn eligible() -> Self {
        Self {
            status: ClaimStatus::Eligible,
            reason: None,
            detail: None,
        }
    }

    pub fn ineligible(reason: ReasonCode) -> Self {
        Self {
            status: ClaimStatus::Ineligible,
            reason: Some(reason),
            detail: None,
        }
    }

    pub fn duplicate() -> Self {
        Self {
            status: ClaimStatus::Duplicate,
            reason: Some(ReasonCode::DuplicateClaim),
            detail: None,
        }
    }

    /// Unprocessable with a fixed code (unreadable receipt)
    pub fn unprocessable(reason: ReasonCode) -> Self {
        Self {
            status: ClaimStatus::Error,
            reason: Some(reason),
            detail: None,
        }
    }

    /// Unanticipated fault with a free-text diagnostic. The one verdict
    /// shape without a fixed code; such a claim is safe to resubmit.
    pub fn fault(detail: impl Into<String>) -> Self {
        Self {
            status: ClaimStatus::Error,
            reason: None,
            detail: Some(detail.into()),
        }
    }

    pub fn is_eligible(&self) -> bool {
        self.status == ClaimStatus::Eligible
    }

    /// The reason string persisted on the claim: the fixed code, or the
    /// fault diagnostic when no code applies
    pub fn fail_reason(&self) -> Option<String> {
        self.reason
            .map(|r| r.as_str().to_string())
            .or_else(|| self.detail.clone())
    }
}

/// A user's reimbursement claim
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    pub id: String,
    pub user_id: String,
    pub category: ClaimCategory,
    pub status: ClaimStatus,
    /// User-declared amount in won (minor unit)
    pub declared_amount: i64,
    /// First four digits of the paying card (non-identifying)
    pub card_prefix: String,
    /// Campaign this claim was submitted under, if any
    pub campaign_id: Option<i64>,
    /// Object keys of the stored receipt images
    pub image_keys: Vec<String>,
    /// Merchant name extracted from the receipt
    pub merchant: Option<String>,
    /// Full address extracted from the receipt
    pub address: Option<String>,
    /// Region token derived from the address
    pub region: Option<String>,
    /// Raw payment-date string from the receipt
    pub pay_date: Option<String>,
    /// Amount extracted from the receipt, in won
    pub extracted_amount: Option<i64>,
    pub reason: Option<ReasonCode>,
    pub detail: Option<String>,
    /// SHA-256 hash of the first uploaded image
    pub content_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Claim {
    /// Open a new pending claim with a fresh id
    pub fn new(
        user_id: impl Into<String>,
        category: ClaimCategory,
        declared_amount: i64,
        card_prefix: impl Into<String>,
        image_keys: Vec<String>,
        campaign_id: Option<i64>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            category,
            status: ClaimStatus::Pending,
            declared_amount,
            card_prefix: card_prefix.into(),
            campaign_id,
            image_keys,
            merchant: None,
            address: None,
            region: None,
            pay_date: None,
            extracted_amount: None,
            reason: None,
            detail: None,
            content_hash: None,
            created_at: Utc::now(),
        }
    }
}

/// Normalized view of one OCR response
///
/// Every field degrades to an empty-string or `None` default when the raw
/// tree is missing the leaf. `amount` is `None` when the price text held
/// no digits at all, which is distinct from a parsed zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptFields {
    pub merchant: String,
    pub address: String,
    /// Second whitespace token of the address ("춘천시", "강릉시", ...)
    pub region: String,
    /// Raw payment-date string, format not guaranteed
    pub pay_date: String,
    pub amount: Option<i64>,
}

impl ReceiptFields {
    /// No merchant name and no amount survived extraction: the receipt is
    /// unreadable and the chain resolves without running business gates
    pub fn is_unreadable(&self) -> bool {
        self.merchant.is_empty() && self.amount.is_none()
    }
}

/// One entry of the merchant reference registry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MerchantRecord {
    pub id: i64,
    pub name: String,
    /// Region token derived from the road address at import time
    pub region: String,
    pub road_address: String,
    pub category_large: Option<String>,
    pub category_small: Option<String>,
}

/// A registry entry before insertion
#[derive(Debug, Clone)]
pub struct NewMerchant {
    pub name: String,
    pub region: String,
    pub road_address: String,
    pub category_large: Option<String>,
    pub category_small: Option<String>,
}

/// Campaign eligibility configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: i64,
    pub name: String,
    pub is_active: bool,
    /// Region token the campaign targets; `None` means the entire province
    pub target_region: Option<String>,
    /// Start of the active window; only enforced when both ends are set
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// A campaign before insertion
#[derive(Debug, Clone)]
pub struct NewCampaign {
    pub name: String,
    pub is_active: bool,
    pub target_region: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Exact-equality key for duplicate detection
///
/// Deliberately coarse: two genuinely distinct purchases with identical
/// metadata collide, which the scheme accepts in exchange for simplicity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClaimKey {
    pub merchant: String,
    /// Raw payment-date string, compared pre-normalization
    pub pay_date: String,
    pub amount: i64,
    pub card_prefix: String,
}
