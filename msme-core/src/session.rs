//! Session-scoped analysis state.
//!
//! A [`Session`] owns the current upload and row limit. Front-ends hold one
//! per user session and ask it for a [`Snapshot`] or a report; nothing here
//! is global. Uploading a new file or moving the slider replaces state, it
//! never mutates a snapshot in place.

use std::path::Path;
use std::sync::Arc;

use csv::StringRecord;
use tracing::debug;

use crate::analyzer::{analyze, PortfolioReport};
use crate::config::AnalyzerConfig;
use crate::data::Dataset;
use crate::domain::{DatasetHash, LoanRecord};
use crate::fingerprint;

/// Immutable view of the first `len` rows of a dataset.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    dataset: &'a Dataset,
    len: usize,
}

impl<'a> Snapshot<'a> {
    /// View the first `row_limit` rows (all rows when `None`).
    pub fn new(dataset: &'a Dataset, row_limit: Option<usize>) -> Self {
        let len = row_limit.map_or(dataset.len(), |limit| limit.min(dataset.len()));
        Self { dataset, len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Rows available in the underlying upload.
    pub fn available(&self) -> usize {
        self.dataset.len()
    }

    pub fn records(&self) -> &'a [LoanRecord] {
        &self.dataset.records()[..self.len]
    }

    pub fn headers(&self) -> &'a StringRecord {
        self.dataset.headers()
    }

    /// Raw rows exactly as ingested.
    pub fn rows(&self) -> &'a [StringRecord] {
        &self.dataset.rows()[..self.len]
    }

    /// File the dataset was read from, if any.
    pub fn source(&self) -> Option<&'a Path> {
        self.dataset.source()
    }

    pub fn fingerprint(&self) -> DatasetHash {
        fingerprint::snapshot_hash(self.headers(), self.rows())
    }
}

/// Slider bounds for the row-limit control, derived from dataset size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowLimitBounds {
    pub min: usize,
    pub max: usize,
    pub step: usize,
}

impl RowLimitBounds {
    /// Large uploads start the slider at 100 rows and move in steps of 50.
    pub fn for_rows(rows: usize) -> Self {
        let min = if rows >= 100 {
            100
        } else {
            rows.min(1)
        };
        let step = if rows >= 150 { 50 } else { 1 };
        Self {
            min,
            max: rows,
            step,
        }
    }

    pub fn clamp(&self, value: usize) -> usize {
        value.clamp(self.min, self.max)
    }

    /// One step up, landing exactly on `max` at the top.
    pub fn step_up(&self, value: usize) -> usize {
        self.clamp(value.saturating_add(self.step))
    }

    /// One step down, landing exactly on `min` at the bottom.
    pub fn step_down(&self, value: usize) -> usize {
        self.clamp(value.saturating_sub(self.step))
    }
}

/// Current upload plus the analysis settings applied to it.
#[derive(Debug, Clone)]
pub struct Session {
    dataset: Arc<Dataset>,
    row_limit: usize,
    config: AnalyzerConfig,
}

impl Session {
    /// Start a session on a fresh upload with the row limit at its maximum.
    pub fn new(dataset: Dataset, config: AnalyzerConfig) -> Self {
        let row_limit = dataset.len();
        Self {
            dataset: Arc::new(dataset),
            row_limit,
            config,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn row_limit(&self) -> usize {
        self.row_limit
    }

    pub fn bounds(&self) -> RowLimitBounds {
        RowLimitBounds::for_rows(self.dataset.len())
    }

    /// Set the row limit, clamped to the slider bounds. Returns the value applied.
    pub fn set_row_limit(&mut self, limit: usize) -> usize {
        self.row_limit = self.bounds().clamp(limit);
        debug!(row_limit = self.row_limit, "row limit changed");
        self.row_limit
    }

    /// Swap in a new upload; the row limit resets to the full dataset.
    pub fn replace_dataset(&mut self, dataset: Dataset) {
        self.row_limit = dataset.len();
        self.dataset = Arc::new(dataset);
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot::new(&self.dataset, Some(self.row_limit))
    }

    pub fn report(&self) -> PortfolioReport {
        let snapshot = self.snapshot();
        debug!(
            rows = snapshot.len(),
            available = snapshot.available(),
            "computing portfolio report"
        );
        analyze(snapshot.records(), &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(rows: usize) -> Dataset {
        let mut csv = String::from(
            "customer_id,profession,segment,dpd,emi_amount,loan_amount,payment_method,visit_covered,got_legal_notice\n",
        );
        for i in 0..rows {
            csv.push_str(&format!("C{i},Salaried,Healthy,0,100,1000,Cash,0,0\n"));
        }
        Dataset::from_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn bounds_for_large_upload() {
        let b = RowLimitBounds::for_rows(1000);
        assert_eq!(b, RowLimitBounds { min: 100, max: 1000, step: 50 });
        assert_eq!(b.step_up(980), 1000);
        assert_eq!(b.step_down(120), 100);
        assert_eq!(b.clamp(5), 100);
    }

    #[test]
    fn bounds_for_small_upload() {
        assert_eq!(
            RowLimitBounds::for_rows(120),
            RowLimitBounds { min: 100, max: 120, step: 1 }
        );
        assert_eq!(
            RowLimitBounds::for_rows(10),
            RowLimitBounds { min: 1, max: 10, step: 1 }
        );
        assert_eq!(
            RowLimitBounds::for_rows(0),
            RowLimitBounds { min: 0, max: 0, step: 1 }
        );
    }

    #[test]
    fn snapshot_is_a_prefix() {
        let ds = dataset(5);
        let snap = Snapshot::new(&ds, Some(3));
        assert_eq!(snap.len(), 3);
        assert_eq!(snap.available(), 5);
        assert_eq!(snap.records()[2].customer_id, "C2");
        assert_eq!(snap.rows().len(), 3);

        assert_eq!(Snapshot::new(&ds, Some(50)).len(), 5);
        assert_eq!(Snapshot::new(&ds, None).len(), 5);
        assert!(Snapshot::new(&ds, Some(0)).is_empty());
    }

    #[test]
    fn session_clamps_and_reports() {
        let mut session = Session::new(dataset(200), AnalyzerConfig::default());
        assert_eq!(session.row_limit(), 200);
        assert_eq!(session.set_row_limit(10), 100);
        assert_eq!(session.report().total_customers, 100);
        assert_eq!(session.set_row_limit(10_000), 200);
        assert_eq!(session.report().total_customers, 200);
    }

    #[test]
    fn replacing_dataset_resets_limit() {
        let mut session = Session::new(dataset(200), AnalyzerConfig::default());
        session.set_row_limit(150);
        session.replace_dataset(dataset(7));
        assert_eq!(session.row_limit(), 7);
        assert_eq!(session.report().total_customers, 7);
    }
}
