//! MSME Core — loan portfolio ingestion, analysis and reporting.
//!
//! This crate holds everything the front-ends share:
//! - Domain types (loan records and their categorical fields)
//! - Schema validation, CSV ingestion and pass-through export
//! - Session state and immutable row-limited snapshots
//! - The pure portfolio analyzer and its configurable risk policy
//! - Dataset fingerprinting
//! - Report documents (JSON, Markdown) and the quick summary

pub mod analyzer;
pub mod config;
pub mod data;
pub mod domain;
pub mod fingerprint;
pub mod reporting;
pub mod session;

pub use analyzer::{analyze, DpdBinning, PortfolioReport, RiskBand, RiskPolicy};
pub use config::{AnalyzerConfig, ConfigError};
pub use data::{Dataset, ExportError, IngestError};
pub use domain::{DatasetHash, LoanRecord};
pub use reporting::{MarkdownReportGenerator, ReportDocument, ReportError};
pub use session::{RowLimitBounds, Session, Snapshot};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: shared state can move between threads, so a
    /// front-end is free to hand a session to a worker later.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<Dataset>();
        require_sync::<Dataset>();
        require_send::<Session>();
        require_sync::<Session>();
        require_send::<PortfolioReport>();
        require_sync::<PortfolioReport>();
        require_send::<ReportDocument>();
        require_sync::<ReportDocument>();
        require_send::<AnalyzerConfig>();
        require_sync::<AnalyzerConfig>();
    }

    #[test]
    fn session_to_document() {
        let csv = "customer_id,profession,segment,dpd,emi_amount,loan_amount,payment_method,visit_covered,got_legal_notice\n\
C1,Salaried,Healthy,0,1000,50000,Digital,yes,no\n";
        let session = Session::new(
            Dataset::from_reader(csv.as_bytes()).unwrap(),
            AnalyzerConfig::default(),
        );
        let doc = ReportDocument::new(
            &session.snapshot(),
            session.report(),
            chrono::NaiveDateTime::default(),
        );
        assert_eq!(doc.rows_analyzed, 1);
        assert_eq!(doc.report.regular_payer_pct, 100.0);
    }
}
