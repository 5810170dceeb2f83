//! Domain types for loan portfolio analysis

pub mod ids;
pub mod record;

pub use ids::DatasetHash;
pub use record::{
    parse_flag, parse_reason, LoanRecord, PaymentMethod, Profession, RiskZone, Segment,
};
