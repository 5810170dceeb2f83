//! Portfolio CSV schema: the named columns a loan record is built from.
//!
//! The header is validated once at ingestion. Every missing required column
//! is reported in a single error; columns the schema does not know are kept
//! in the pass-through export but otherwise ignored.

use std::collections::HashMap;

use csv::StringRecord;

/// A column the schema understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    CustomerId,
    Profession,
    Segment,
    RiskZone,
    Dpd,
    EmiAmount,
    LoanAmount,
    PaymentMethod,
    VisitCovered,
    GotLegalNotice,
    IrregularReason,
    PaymentRegular,
    PaidEmis,
}

impl Column {
    pub const ALL: [Column; 13] = [
        Column::CustomerId,
        Column::Profession,
        Column::Segment,
        Column::RiskZone,
        Column::Dpd,
        Column::EmiAmount,
        Column::LoanAmount,
        Column::PaymentMethod,
        Column::VisitCovered,
        Column::GotLegalNotice,
        Column::IrregularReason,
        Column::PaymentRegular,
        Column::PaidEmis,
    ];

    /// Header name as written in the CSV.
    pub fn name(self) -> &'static str {
        match self {
            Column::CustomerId => "customer_id",
            Column::Profession => "profession",
            Column::Segment => "segment",
            Column::RiskZone => "risk_zone",
            Column::Dpd => "dpd",
            Column::EmiAmount => "emi_amount",
            Column::LoanAmount => "loan_amount",
            Column::PaymentMethod => "payment_method",
            Column::VisitCovered => "visit_covered",
            Column::GotLegalNotice => "got_legal_notice",
            Column::IrregularReason => "irregular_reason",
            Column::PaymentRegular => "payment_regular",
            Column::PaidEmis => "paid_emis",
        }
    }

    pub fn is_required(self) -> bool {
        !matches!(
            self,
            Column::RiskZone | Column::IrregularReason | Column::PaymentRegular | Column::PaidEmis
        )
    }

    fn from_header(raw: &str) -> Option<Self> {
        let name = raw.trim().to_ascii_lowercase();
        Column::ALL.into_iter().find(|c| c.name() == name)
    }
}

/// Required column names, in schema order.
pub fn required_columns() -> Vec<&'static str> {
    Column::ALL
        .into_iter()
        .filter(|c| c.is_required())
        .map(Column::name)
        .collect()
}

/// Result of matching a CSV header against the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    positions: HashMap<Column, usize>,
    unknown: Vec<String>,
}

impl ColumnMap {
    /// Position of `column` in each row, if the header has it.
    pub fn position(&self, column: Column) -> Option<usize> {
        self.positions.get(&column).copied()
    }

    /// Header cells that matched no schema column.
    pub fn unknown_columns(&self) -> &[String] {
        &self.unknown
    }

    /// Cell text for `column` in `row`, or `None` when the column is absent.
    pub fn cell<'r>(&self, row: &'r StringRecord, column: Column) -> Option<&'r str> {
        self.position(column).and_then(|i| row.get(i))
    }
}

/// Header validation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("column '{0}' appears more than once in the header")]
    DuplicateColumn(String),

    #[error("file has no header row")]
    NoHeader,
}

/// Match a header row against the schema.
pub fn validate_header(header: &StringRecord) -> Result<ColumnMap, SchemaError> {
    if header.is_empty() || header.iter().all(|h| h.trim().is_empty()) {
        return Err(SchemaError::NoHeader);
    }

    let mut positions = HashMap::new();
    let mut unknown = Vec::new();

    for (i, raw) in header.iter().enumerate() {
        match Column::from_header(raw) {
            Some(col) => {
                if positions.insert(col, i).is_some() {
                    return Err(SchemaError::DuplicateColumn(col.name().to_string()));
                }
            }
            None => unknown.push(raw.trim().to_string()),
        }
    }

    let missing: Vec<String> = Column::ALL
        .into_iter()
        .filter(|c| c.is_required() && !positions.contains_key(c))
        .map(|c| c.name().to_string())
        .collect();
    if !missing.is_empty() {
        return Err(SchemaError::MissingColumns(missing));
    }

    Ok(ColumnMap { positions, unknown })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_header() -> StringRecord {
        StringRecord::from(required_columns())
    }

    #[test]
    fn required_header_validates() {
        let map = validate_header(&full_header()).unwrap();
        assert_eq!(map.position(Column::CustomerId), Some(0));
        assert_eq!(map.position(Column::RiskZone), None);
        assert!(map.unknown_columns().is_empty());
    }

    #[test]
    fn header_matching_ignores_case_and_padding() {
        let mut names: Vec<String> = required_columns().iter().map(|c| c.to_uppercase()).collect();
        names[0] = format!("  {}  ", names[0]);
        let map = validate_header(&StringRecord::from(names)).unwrap();
        assert_eq!(map.position(Column::CustomerId), Some(0));
    }

    #[test]
    fn all_missing_columns_reported_together() {
        let header = StringRecord::from(vec!["customer_id", "segment", "notes"]);
        match validate_header(&header) {
            Err(SchemaError::MissingColumns(missing)) => {
                assert!(missing.contains(&"dpd".to_string()));
                assert!(missing.contains(&"profession".to_string()));
                assert!(missing.contains(&"visit_covered".to_string()));
                assert!(!missing.contains(&"segment".to_string()));
                assert!(!missing.contains(&"risk_zone".to_string()));
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn extra_columns_are_kept_as_unknown() {
        let mut names = required_columns();
        names.push("branch");
        names.push("status");
        let map = validate_header(&StringRecord::from(names)).unwrap();
        assert_eq!(map.unknown_columns(), ["branch", "status"]);
    }

    #[test]
    fn duplicate_column_rejected() {
        let mut names = required_columns();
        names.push("DPD");
        assert_eq!(
            validate_header(&StringRecord::from(names)),
            Err(SchemaError::DuplicateColumn("dpd".into()))
        );
    }

    #[test]
    fn empty_header_rejected() {
        assert_eq!(
            validate_header(&StringRecord::new()),
            Err(SchemaError::NoHeader)
        );
    }
}
