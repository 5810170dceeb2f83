//! Portfolio analyzer — records in, report out.
//!
//! [`analyze`] is a pure function of the in-scope records and the analyzer
//! configuration. Every field is computed independently, every division is
//! guarded, and an empty input produces a neutral report (zero percentages,
//! zero-filled fixed distributions, empty group maps).

pub mod breakdown;
pub mod histogram;
pub mod risk;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::AnalyzerConfig;
use crate::domain::{LoanRecord, PaymentMethod, Profession, RiskZone, Segment};

pub use breakdown::{emi_vs_loan, ExposureSummary, ProfessionStats, OTHER_REASON};
pub use histogram::{DpdBin, DpdBinning, DpdHistogram};
pub use risk::{RiskBand, RiskFactors, RiskPolicy};

/// `part / whole` as a percentage; 0 when `whole` is 0.
pub fn pct(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

/// Fraction of `records` satisfying `pred`; 0 for an empty slice.
pub(crate) fn share(records: &[LoanRecord], pred: impl Fn(&LoanRecord) -> bool) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    records.iter().filter(|&r| pred(r)).count() as f64 / records.len() as f64
}

fn pct_where(records: &[LoanRecord], pred: impl Fn(&LoanRecord) -> bool) -> f64 {
    pct(records.iter().filter(|&r| pred(r)).count(), records.len())
}

/// KPIs and distributions of one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioReport {
    pub total_customers: usize,
    pub regular_payer_pct: f64,
    pub current_npa_pct: f64,
    pub upcoming_npa_pct: f64,
    pub visit_coverage_pct: f64,
    pub digital_adoption_pct: f64,
    pub portfolio_risk_score: f64,
    pub risk_factors: RiskFactors,
    pub segment_distribution: BTreeMap<Segment, usize>,
    pub risk_zone_distribution: BTreeMap<RiskZone, usize>,
    pub profession_breakdown: BTreeMap<Profession, ProfessionStats>,
    pub dpd_distribution: DpdHistogram,
    pub legal_notice_coverage_by_segment: BTreeMap<Segment, f64>,
    pub visit_coverage_by_segment: BTreeMap<Segment, f64>,
    pub irregular_reason_distribution: BTreeMap<String, usize>,
    pub payment_method_mix: BTreeMap<PaymentMethod, usize>,
    pub exposure: ExposureSummary,
}

impl PortfolioReport {
    pub fn risk_band(&self) -> RiskBand {
        RiskBand::from_score(self.portfolio_risk_score)
    }

    pub fn segment_count(&self, segment: Segment) -> usize {
        self.segment_distribution.get(&segment).copied().unwrap_or(0)
    }

    /// Share of customers in `segment`; 0 for an empty report.
    pub fn segment_share_pct(&self, segment: Segment) -> f64 {
        pct(self.segment_count(segment), self.total_customers)
    }

    pub fn zone_count(&self, zone: RiskZone) -> usize {
        self.risk_zone_distribution.get(&zone).copied().unwrap_or(0)
    }

    /// Every percentage the report carries, labelled. Used by callers that
    /// validate or display the full set uniformly.
    pub fn percentages(&self) -> Vec<(String, f64)> {
        let mut out = vec![
            ("regular_payer_pct".to_string(), self.regular_payer_pct),
            ("current_npa_pct".to_string(), self.current_npa_pct),
            ("upcoming_npa_pct".to_string(), self.upcoming_npa_pct),
            ("visit_coverage_pct".to_string(), self.visit_coverage_pct),
            ("digital_adoption_pct".to_string(), self.digital_adoption_pct),
            ("portfolio_risk_score".to_string(), self.portfolio_risk_score),
        ];
        for (p, stats) in &self.profession_breakdown {
            out.push((format!("regular_payer_pct[{p}]"), stats.regular_payer_pct));
            if let Some(v) = stats.payment_regular_pct {
                out.push((format!("payment_regular_pct[{p}]"), v));
            }
        }
        for (s, v) in &self.legal_notice_coverage_by_segment {
            out.push((format!("legal_notice_coverage[{s}]"), *v));
        }
        for (s, v) in &self.visit_coverage_by_segment {
            out.push((format!("visit_coverage[{s}]"), *v));
        }
        out
    }
}

/// Compute the full report over `records`.
pub fn analyze(records: &[LoanRecord], config: &AnalyzerConfig) -> PortfolioReport {
    let threshold = config.regular_dpd_threshold;

    let mut segment_distribution: BTreeMap<Segment, usize> =
        Segment::ALL.into_iter().map(|s| (s, 0)).collect();
    let mut risk_zone_distribution: BTreeMap<RiskZone, usize> =
        RiskZone::ALL.into_iter().map(|z| (z, 0)).collect();
    for r in records {
        *segment_distribution.entry(r.segment).or_insert(0) += 1;
        *risk_zone_distribution.entry(r.risk_zone).or_insert(0) += 1;
    }

    let risk_factors = RiskFactors::measure(records, &config.risk_policy);

    PortfolioReport {
        total_customers: records.len(),
        regular_payer_pct: pct_where(records, |r| r.is_regular_payer(threshold)),
        current_npa_pct: pct_where(records, |r| r.segment == Segment::CurrentNpa),
        upcoming_npa_pct: pct_where(records, |r| r.segment == Segment::UpcomingNpa),
        visit_coverage_pct: pct_where(records, LoanRecord::visited),
        digital_adoption_pct: pct_where(records, LoanRecord::is_digital),
        portfolio_risk_score: config.risk_policy.score(&risk_factors),
        risk_factors,
        segment_distribution,
        risk_zone_distribution,
        profession_breakdown: breakdown::profession_breakdown(records, threshold),
        dpd_distribution: DpdHistogram::build(records, &config.dpd_binning),
        legal_notice_coverage_by_segment: breakdown::coverage_by_segment(
            records,
            LoanRecord::has_legal_notice,
        ),
        visit_coverage_by_segment: breakdown::coverage_by_segment(records, LoanRecord::visited),
        irregular_reason_distribution: breakdown::irregular_reasons(records),
        payment_method_mix: breakdown::payment_method_mix(records),
        exposure: ExposureSummary::measure(records),
    }
}
