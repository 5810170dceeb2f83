//! Report documents: the pure report plus provenance, as JSON or Markdown.
//!
//! [`ReportDocument`] is what leaves the process. It carries a
//! `schema_version`; documents written by a newer version are rejected on load.

pub mod markdown;
pub mod summary;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::analyzer::PortfolioReport;
use crate::domain::DatasetHash;
use crate::session::Snapshot;

pub use markdown::MarkdownReportGenerator;
pub use summary::quick_summary;

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("report JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported schema version {found} (max supported: {max})")]
    UnsupportedSchema { found: u32, max: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    pub schema_version: u32,
    pub generated_at: NaiveDateTime,
    pub source: Option<String>,
    pub rows_available: usize,
    pub rows_analyzed: usize,
    pub dataset_hash: DatasetHash,
    pub report: PortfolioReport,
}

impl ReportDocument {
    pub fn new(snapshot: &Snapshot<'_>, report: PortfolioReport, generated_at: NaiveDateTime) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            generated_at,
            source: snapshot.source().map(|p| p.display().to_string()),
            rows_available: snapshot.available(),
            rows_analyzed: snapshot.len(),
            dataset_hash: snapshot.fingerprint(),
            report,
        }
    }

    /// "Using first N rows out of M".
    pub fn scope_line(&self) -> String {
        format!(
            "Using first {} rows out of {}",
            self.rows_analyzed, self.rows_available
        )
    }
}

pub fn export_json(doc: &ReportDocument) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(doc)?)
}

pub fn import_json(json: &str) -> Result<ReportDocument, ReportError> {
    let doc: ReportDocument = serde_json::from_str(json)?;
    if doc.schema_version > SCHEMA_VERSION {
        return Err(ReportError::UnsupportedSchema {
            found: doc.schema_version,
            max: SCHEMA_VERSION,
        });
    }
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::analyze;
    use crate::config::AnalyzerConfig;
    use crate::data::Dataset;

    const CSV: &str = "customer_id,profession,segment,dpd,emi_amount,loan_amount,payment_method,visit_covered,got_legal_notice\n\
C1,Salaried,Healthy,0,1000,50000,Digital,yes,no\n\
C2,Business,Current NPA,120,2500,90000,Cash,no,yes\n\
C3,Self-employed,Monitored,15,1200,40000,Digital,yes,no\n";

    fn document(limit: Option<usize>) -> ReportDocument {
        let ds = Dataset::from_reader(CSV.as_bytes()).unwrap();
        let snap = Snapshot::new(&ds, limit);
        let report = analyze(snap.records(), &AnalyzerConfig::default());
        let at = chrono::NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        ReportDocument::new(&snap, report, at)
    }

    #[test]
    fn document_records_scope() {
        let doc = document(Some(2));
        assert_eq!(doc.rows_available, 3);
        assert_eq!(doc.rows_analyzed, 2);
        assert_eq!(doc.report.total_customers, 2);
        assert_eq!(doc.scope_line(), "Using first 2 rows out of 3");
        assert_eq!(doc.source, None);
    }

    #[test]
    fn json_roundtrip_keeps_provenance() {
        let doc = document(None);
        let json = export_json(&doc).unwrap();
        let back = import_json(&json).unwrap();
        assert_eq!(back.schema_version, SCHEMA_VERSION);
        assert_eq!(back.generated_at, doc.generated_at);
        assert_eq!(back.dataset_hash, doc.dataset_hash);
        assert_eq!(back.report.total_customers, 3);
        assert_eq!(back.report.segment_distribution, doc.report.segment_distribution);
    }

    #[test]
    fn newer_schema_rejected() {
        let mut value = serde_json::to_value(document(None)).unwrap();
        value["schema_version"] = serde_json::json!(SCHEMA_VERSION + 1);
        let err = import_json(&value.to_string()).unwrap_err();
        assert!(matches!(err, ReportError::UnsupportedSchema { .. }));
    }
}
