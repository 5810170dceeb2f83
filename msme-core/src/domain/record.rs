//! Loan record and its categorical fields.
//!
//! Every categorical field has a closed enumeration plus a catch-all bucket
//! (`Unclassified` / `Other`). Parsing never fails: unrecognized text lands in
//! the catch-all and the caller decides whether to flag it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical form used for matching labels: lowercase, with `_`, `-` and
/// runs of whitespace collapsed into a single space.
fn normalize(raw: &str) -> String {
    raw.trim()
        .to_ascii_lowercase()
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Portfolio segment of a loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Segment {
    Healthy,
    Monitored,
    #[serde(rename = "Upcoming NPA")]
    UpcomingNpa,
    #[serde(rename = "Current NPA")]
    CurrentNpa,
    Unclassified,
}

impl Segment {
    pub const ALL: [Segment; 5] = [
        Segment::Healthy,
        Segment::Monitored,
        Segment::UpcomingNpa,
        Segment::CurrentNpa,
        Segment::Unclassified,
    ];

    /// Parse a segment label. Returns `None` for text outside the enumeration;
    /// a literal "Unclassified" parses to `Some(Segment::Unclassified)`.
    pub fn parse(raw: &str) -> Option<Self> {
        match normalize(raw).as_str() {
            "healthy" | "regular" => Some(Segment::Healthy),
            "monitored" => Some(Segment::Monitored),
            "upcoming npa" => Some(Segment::UpcomingNpa),
            "current npa" | "npa" => Some(Segment::CurrentNpa),
            "unclassified" => Some(Segment::Unclassified),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Segment::Healthy => "Healthy",
            Segment::Monitored => "Monitored",
            Segment::UpcomingNpa => "Upcoming NPA",
            Segment::CurrentNpa => "Current NPA",
            Segment::Unclassified => "Unclassified",
        }
    }

    /// Risk zone implied by the segment when the row carries no explicit zone.
    pub fn implied_zone(self) -> RiskZone {
        match self {
            Segment::Healthy => RiskZone::Green,
            Segment::Monitored => RiskZone::Yellow,
            Segment::UpcomingNpa => RiskZone::Orange,
            Segment::CurrentNpa => RiskZone::Red,
            Segment::Unclassified => RiskZone::Unclassified,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Traffic-light risk zone. `Unclassified` collects rows whose zone could not
/// be determined, so zone counts always sum to the record count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskZone {
    Green,
    Yellow,
    Orange,
    Red,
    Unclassified,
}

impl RiskZone {
    pub const ALL: [RiskZone; 5] = [
        RiskZone::Green,
        RiskZone::Yellow,
        RiskZone::Orange,
        RiskZone::Red,
        RiskZone::Unclassified,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        match normalize(raw).as_str() {
            "green" => Some(RiskZone::Green),
            "yellow" => Some(RiskZone::Yellow),
            "orange" => Some(RiskZone::Orange),
            "red" => Some(RiskZone::Red),
            "unclassified" => Some(RiskZone::Unclassified),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskZone::Green => "Green",
            RiskZone::Yellow => "Yellow",
            RiskZone::Orange => "Orange",
            RiskZone::Red => "Red",
            RiskZone::Unclassified => "Unclassified",
        }
    }

    /// Severity in [0, 1] used by the risk score's zone-mix factor.
    pub fn severity(self) -> f64 {
        match self {
            RiskZone::Green | RiskZone::Unclassified => 0.0,
            RiskZone::Yellow => 1.0 / 3.0,
            RiskZone::Orange => 2.0 / 3.0,
            RiskZone::Red => 1.0,
        }
    }
}

impl fmt::Display for RiskZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Borrower profession category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Profession {
    Salaried,
    #[serde(rename = "Self-employed")]
    SelfEmployed,
    Business,
    Other,
}

impl Profession {
    pub const ALL: [Profession; 4] = [
        Profession::Salaried,
        Profession::SelfEmployed,
        Profession::Business,
        Profession::Other,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        match normalize(raw).as_str() {
            "salaried" => Some(Profession::Salaried),
            "self employed" | "selfemployed" => Some(Profession::SelfEmployed),
            "business" => Some(Profession::Business),
            "other" => Some(Profession::Other),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Profession::Salaried => "Salaried",
            Profession::SelfEmployed => "Self-employed",
            Profession::Business => "Business",
            Profession::Other => "Other",
        }
    }
}

impl fmt::Display for Profession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How the borrower pays: the `payment_method` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    Digital,
    Cash,
    Unknown,
}

impl PaymentMethod {
    /// Accepts `Digital` / `Cash` or a boolean "is digital" flag.
    pub fn parse(raw: &str) -> Option<Self> {
        match normalize(raw).as_str() {
            "digital" | "upi" | "online" | "nach" => Some(PaymentMethod::Digital),
            "cash" => Some(PaymentMethod::Cash),
            other => parse_flag(other).map(|digital| {
                if digital {
                    PaymentMethod::Digital
                } else {
                    PaymentMethod::Cash
                }
            }),
        }
    }

    pub fn is_digital(self) -> bool {
        self == PaymentMethod::Digital
    }

    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::Digital => "Digital",
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Unknown => "Unknown",
        }
    }
}

/// Parse a boolean cell: `true/false`, `1/0`, `yes/no`, `y/n`.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "t" => Some(true),
        "false" | "0" | "no" | "n" | "f" => Some(false),
        _ => None,
    }
}

/// Parse an irregular-payment reason. Placeholder text means "no reason".
pub fn parse_reason(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "" | "none" | "na" | "n/a" | "nan" | "null" => None,
        _ => Some(trimmed.to_string()),
    }
}

/// One row of the uploaded portfolio, typed.
///
/// Optional fields are `None` when the cell was empty or malformed; such a
/// record still counts toward totals but drops out of the aggregates that
/// need the missing value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRecord {
    pub customer_id: String,
    pub profession: Profession,
    pub segment: Segment,
    pub risk_zone: RiskZone,
    pub dpd: Option<u32>,
    pub emi_amount: Option<f64>,
    pub loan_amount: Option<f64>,
    pub payment_method: PaymentMethod,
    pub visit_covered: Option<bool>,
    pub got_legal_notice: Option<bool>,
    pub irregular_reason: Option<String>,
    pub payment_regular: Option<bool>,
    pub paid_emis: Option<u32>,
}

impl LoanRecord {
    /// Minimal healthy record; handy for building fixtures.
    pub fn new(customer_id: impl Into<String>, segment: Segment) -> Self {
        Self {
            customer_id: customer_id.into(),
            profession: Profession::Other,
            segment,
            risk_zone: segment.implied_zone(),
            dpd: Some(0),
            emi_amount: None,
            loan_amount: None,
            payment_method: PaymentMethod::Unknown,
            visit_covered: Some(false),
            got_legal_notice: Some(false),
            irregular_reason: None,
            payment_regular: None,
            paid_emis: None,
        }
    }

    pub fn is_digital(&self) -> bool {
        self.payment_method.is_digital()
    }

    pub fn visited(&self) -> bool {
        self.visit_covered.unwrap_or(false)
    }

    pub fn has_legal_notice(&self) -> bool {
        self.got_legal_notice.unwrap_or(false)
    }

    /// Regular payer: known DPD at or under the threshold.
    pub fn is_regular_payer(&self, threshold: u32) -> bool {
        self.dpd.is_some_and(|d| d <= threshold)
    }

    /// Irregular: a reason was recorded, or the payment-regular flag is false.
    pub fn is_irregular(&self) -> bool {
        self.irregular_reason.is_some() || self.payment_regular == Some(false)
    }
}
