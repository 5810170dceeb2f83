//! CSV ingestion: header validation, typed record parsing, field issues.
//!
//! Ingestion keeps the raw rows alongside the typed records so the in-scope
//! subset can be exported byte-for-byte in the format it arrived in.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::data::schema::{validate_header, Column, ColumnMap, SchemaError};
use crate::domain::{
    parse_flag, parse_reason, LoanRecord, PaymentMethod, Profession, RiskZone, Segment,
};

/// Why an upload could not be turned into a dataset.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("line {line}: {found} fields, header has {expected}")]
    TooManyFields {
        line: u64,
        found: usize,
        expected: usize,
    },
}

/// Per-column count of non-empty cells that could not be interpreted.
///
/// These rows are still analyzed; only the unreadable field drops out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssues(BTreeMap<String, usize>);

impl FieldIssues {
    pub fn record(&mut self, column: Column) {
        *self.0.entry(column.name().to_string()).or_insert(0) += 1;
    }

    pub fn count(&self, column: Column) -> usize {
        self.0.get(column.name()).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// A validated upload.
#[derive(Debug, Clone)]
pub struct Dataset {
    headers: StringRecord,
    rows: Vec<StringRecord>,
    records: Vec<LoanRecord>,
    unknown_columns: Vec<String>,
    issues: FieldIssues,
    source: Option<PathBuf>,
}

impl Dataset {
    /// Read and validate a CSV file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, IngestError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| IngestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut dataset = Self::from_reader(file)?;
        dataset.source = Some(path.to_path_buf());
        info!(
            path = %path.display(),
            rows = dataset.len(),
            "loaded portfolio"
        );
        Ok(dataset)
    }

    /// Read and validate CSV from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, IngestError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let columns = validate_header(&headers)?;
        if !columns.unknown_columns().is_empty() {
            warn!(
                columns = ?columns.unknown_columns(),
                "ignoring columns outside the portfolio schema"
            );
        }

        let mut rows = Vec::new();
        let mut records = Vec::new();
        let mut issues = FieldIssues::default();
        let width = headers.len();
        for result in rdr.records() {
            let mut row = result?;
            if row.len() > width {
                return Err(IngestError::TooManyFields {
                    line: row.position().map_or(0, |p| p.line()),
                    found: row.len(),
                    expected: width,
                });
            }
            // Short rows read as trailing empty cells.
            while row.len() < width {
                row.push_field("");
            }
            records.push(parse_row(&row, &columns, &mut issues));
            rows.push(row);
        }

        if !issues.is_empty() {
            for (column, count) in issues.iter() {
                warn!(column, count, "unreadable cells treated as missing");
            }
        }

        Ok(Self {
            headers,
            rows,
            records,
            unknown_columns: columns.unknown_columns().to_vec(),
            issues,
            source: None,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    pub fn rows(&self) -> &[StringRecord] {
        &self.rows
    }

    pub fn records(&self) -> &[LoanRecord] {
        &self.records
    }

    pub fn unknown_columns(&self) -> &[String] {
        &self.unknown_columns
    }

    pub fn issues(&self) -> &FieldIssues {
        &self.issues
    }

    /// File the dataset was read from, when it came from disk.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

/// Build a typed record from one row. Never fails: unreadable cells become
/// `None` (or the catch-all variant) and are tallied in `issues`.
fn parse_row(row: &StringRecord, columns: &ColumnMap, issues: &mut FieldIssues) -> LoanRecord {
    let cell = |col: Column| columns.cell(row, col).map(str::trim).unwrap_or("");

    let segment = categorical(cell(Column::Segment), Column::Segment, issues, Segment::parse)
        .unwrap_or(Segment::Unclassified);

    // An empty or absent zone is derived from the segment; an unreadable one
    // is bucketed rather than guessed.
    let zone_text = cell(Column::RiskZone);
    let risk_zone = if zone_text.is_empty() {
        segment.implied_zone()
    } else {
        categorical(zone_text, Column::RiskZone, issues, RiskZone::parse)
            .unwrap_or(RiskZone::Unclassified)
    };

    LoanRecord {
        customer_id: cell(Column::CustomerId).to_string(),
        profession: categorical(
            cell(Column::Profession),
            Column::Profession,
            issues,
            Profession::parse,
        )
        .unwrap_or(Profession::Other),
        segment,
        risk_zone,
        dpd: count(cell(Column::Dpd), Column::Dpd, issues),
        emi_amount: amount(cell(Column::EmiAmount), Column::EmiAmount, issues),
        loan_amount: amount(cell(Column::LoanAmount), Column::LoanAmount, issues),
        payment_method: categorical(
            cell(Column::PaymentMethod),
            Column::PaymentMethod,
            issues,
            PaymentMethod::parse,
        )
        .unwrap_or(PaymentMethod::Unknown),
        visit_covered: categorical(cell(Column::VisitCovered), Column::VisitCovered, issues, parse_flag),
        got_legal_notice: categorical(
            cell(Column::GotLegalNotice),
            Column::GotLegalNotice,
            issues,
            parse_flag,
        ),
        irregular_reason: parse_reason(cell(Column::IrregularReason)),
        payment_regular: categorical(
            cell(Column::PaymentRegular),
            Column::PaymentRegular,
            issues,
            parse_flag,
        ),
        paid_emis: count(cell(Column::PaidEmis), Column::PaidEmis, issues),
    }
}

fn categorical<T>(
    text: &str,
    column: Column,
    issues: &mut FieldIssues,
    parse: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    if text.is_empty() {
        return None;
    }
    let parsed = parse(text);
    if parsed.is_none() {
        issues.record(column);
    }
    parsed
}

/// Non-negative integer; integer-valued decimals such as `12.0` are accepted.
fn count(text: &str, column: Column, issues: &mut FieldIssues) -> Option<u32> {
    categorical(text, column, issues, |t| {
        t.parse::<u32>().ok().or_else(|| {
            t.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v >= 0.0 && v.fract() == 0.0 && *v <= u32::MAX as f64)
                .map(|v| v as u32)
        })
    })
}

/// Non-negative finite decimal.
fn amount(text: &str, column: Column, issues: &mut FieldIssues) -> Option<f64> {
    categorical(text, column, issues, |t| {
        t.parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "customer_id,profession,segment,dpd,emi_amount,loan_amount,payment_method,visit_covered,got_legal_notice,irregular_reason";

    fn ingest(body: &str) -> Result<Dataset, IngestError> {
        Dataset::from_reader(format!("{HEADER}\n{body}").as_bytes())
    }

    #[test]
    fn parses_well_formed_rows() {
        let ds = ingest(
            "C1,Salaried,Healthy,0,1200,50000,Digital,True,False,None\n\
             C2,Business,Upcoming_NPA,75,2500.5,120000,Cash,false,true,Job loss\n",
        )
        .unwrap();
        assert_eq!(ds.len(), 2);
        let r = &ds.records()[1];
        assert_eq!(r.customer_id, "C2");
        assert_eq!(r.profession, Profession::Business);
        assert_eq!(r.segment, Segment::UpcomingNpa);
        assert_eq!(r.risk_zone, RiskZone::Orange);
        assert_eq!(r.dpd, Some(75));
        assert_eq!(r.emi_amount, Some(2500.5));
        assert_eq!(r.payment_method, PaymentMethod::Cash);
        assert_eq!(r.visit_covered, Some(false));
        assert_eq!(r.got_legal_notice, Some(true));
        assert_eq!(r.irregular_reason.as_deref(), Some("Job loss"));
        assert!(ds.records()[0].irregular_reason.is_none());
        assert!(ds.issues().is_empty());
    }

    #[test]
    fn negative_and_text_dpd_become_missing() {
        let ds = ingest(
            "C1,Salaried,Healthy,-3,,,Digital,1,0,\n\
             C2,Salaried,Healthy,soon,,,Digital,1,0,\n\
             C3,Salaried,Healthy,12.0,,,Digital,1,0,\n\
             C4,Salaried,Healthy,,,,Digital,1,0,\n",
        )
        .unwrap();
        let dpd: Vec<Option<u32>> = ds.records().iter().map(|r| r.dpd).collect();
        assert_eq!(dpd, vec![None, None, Some(12), None]);
        assert_eq!(ds.issues().count(Column::Dpd), 2);
    }

    #[test]
    fn unknown_categories_fall_back() {
        let ds = ingest("C1,Farmer,Written Off,0,,,Cheque,maybe,0,\n").unwrap();
        let r = &ds.records()[0];
        assert_eq!(r.profession, Profession::Other);
        assert_eq!(r.segment, Segment::Unclassified);
        assert_eq!(r.risk_zone, RiskZone::Unclassified);
        assert_eq!(r.payment_method, PaymentMethod::Unknown);
        assert_eq!(r.visit_covered, None);
        assert_eq!(ds.issues().total(), 4);
    }

    #[test]
    fn explicit_zone_column_wins_over_segment() {
        let csv = "customer_id,profession,segment,risk_zone,dpd,emi_amount,loan_amount,payment_method,visit_covered,got_legal_notice\n\
                   C1,Salaried,Healthy,Yellow,0,,,Cash,0,0\n\
                   C2,Salaried,Monitored,,0,,,Cash,0,0\n\
                   C3,Salaried,Monitored,Purple,0,,,Cash,0,0\n";
        let ds = Dataset::from_reader(csv.as_bytes()).unwrap();
        let zones: Vec<RiskZone> = ds.records().iter().map(|r| r.risk_zone).collect();
        assert_eq!(
            zones,
            vec![RiskZone::Yellow, RiskZone::Yellow, RiskZone::Unclassified]
        );
    }

    #[test]
    fn header_only_file_is_an_empty_dataset() {
        let ds = ingest("").unwrap();
        assert!(ds.is_empty());
    }

    #[test]
    fn missing_columns_halt_ingestion() {
        let err = Dataset::from_reader("customer_id,segment\nC1,Healthy\n".as_bytes()).unwrap_err();
        assert!(matches!(err, IngestError::Schema(SchemaError::MissingColumns(_))));
        assert!(err.to_string().contains("dpd"));
    }

    #[test]
    fn short_rows_are_padded() {
        let ds = ingest(
            "C1,Salaried,Healthy,0,1000,50000,Digital,yes,no\n\
             C2,Business,Current NPA,120,2500,90000,Cash,no,yes,Business loss\n",
        )
        .unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.rows()[0].len(), 10);
        assert_eq!(ds.rows()[0].get(9), Some(""));
        assert!(ds.records()[0].irregular_reason.is_none());
        assert_eq!(ds.records()[0].got_legal_notice, Some(false));
        assert!(ds.issues().is_empty());
    }

    #[test]
    fn long_rows_are_rejected() {
        let err = ingest("C1,Salaried,Healthy,0,1000,50000,Digital,yes,no,,extra\n").unwrap_err();
        assert!(matches!(
            err,
            IngestError::TooManyFields {
                line: 2,
                found: 11,
                expected: 10
            }
        ));
    }

    #[test]
    fn empty_input_has_no_header() {
        let err = Dataset::from_reader("".as_bytes()).unwrap_err();
        assert!(matches!(err, IngestError::Schema(SchemaError::NoHeader)));
    }

    #[test]
    fn unreadable_path_reports_io() {
        let err = Dataset::from_path("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, IngestError::Io { .. }));
    }
}
