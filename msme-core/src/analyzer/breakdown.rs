//! Group-level aggregates: per profession, per segment, per reason.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::pct;
use crate::domain::{LoanRecord, PaymentMethod, Profession, Segment};

/// Reason bucket for irregular records that carry no reason text.
pub const OTHER_REASON: &str = "Other";

/// Repayment behaviour of one profession group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfessionStats {
    pub customers: usize,
    /// Mean over records with a known DPD; `None` when the group has none.
    pub mean_dpd: Option<f64>,
    pub regular_payer_pct: f64,
    /// Share flagged `payment_regular`, over records where the flag is known.
    pub payment_regular_pct: Option<f64>,
}

pub fn profession_breakdown(
    records: &[LoanRecord],
    regular_dpd_threshold: u32,
) -> BTreeMap<Profession, ProfessionStats> {
    let mut groups: BTreeMap<Profession, Vec<&LoanRecord>> = BTreeMap::new();
    for r in records {
        groups.entry(r.profession).or_default().push(r);
    }

    groups
        .into_iter()
        .map(|(profession, group)| {
            let dpds: Vec<u32> = group.iter().filter_map(|r| r.dpd).collect();
            let mean_dpd = (!dpds.is_empty())
                .then(|| dpds.iter().map(|&d| f64::from(d)).sum::<f64>() / dpds.len() as f64);
            let regular = group
                .iter()
                .filter(|r| r.is_regular_payer(regular_dpd_threshold))
                .count();
            let flags: Vec<bool> = group.iter().filter_map(|r| r.payment_regular).collect();
            let payment_regular_pct = (!flags.is_empty())
                .then(|| pct(flags.iter().filter(|&&f| f).count(), flags.len()));
            (
                profession,
                ProfessionStats {
                    customers: group.len(),
                    mean_dpd,
                    regular_payer_pct: pct(regular, group.len()),
                    payment_regular_pct,
                },
            )
        })
        .collect()
}

/// Percentage of each present segment for which `covered` holds.
pub fn coverage_by_segment(
    records: &[LoanRecord],
    covered: impl Fn(&LoanRecord) -> bool,
) -> BTreeMap<Segment, f64> {
    let mut tally: BTreeMap<Segment, (usize, usize)> = BTreeMap::new();
    for r in records {
        let entry = tally.entry(r.segment).or_insert((0, 0));
        entry.1 += 1;
        if covered(r) {
            entry.0 += 1;
        }
    }
    tally
        .into_iter()
        .map(|(segment, (hit, total))| (segment, pct(hit, total)))
        .collect()
}

/// Reason counts over irregular records only.
pub fn irregular_reasons(records: &[LoanRecord]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for r in records.iter().filter(|r| r.is_irregular()) {
        let reason = r.irregular_reason.as_deref().unwrap_or(OTHER_REASON);
        *counts.entry(reason.to_string()).or_insert(0) += 1;
    }
    counts
}

/// Digital / cash / unknown counts, all three always present.
pub fn payment_method_mix(records: &[LoanRecord]) -> BTreeMap<PaymentMethod, usize> {
    let mut mix: BTreeMap<PaymentMethod, usize> = [
        PaymentMethod::Digital,
        PaymentMethod::Cash,
        PaymentMethod::Unknown,
    ]
    .into_iter()
    .map(|m| (m, 0))
    .collect();
    for r in records {
        *mix.entry(r.payment_method).or_insert(0) += 1;
    }
    mix
}

/// `(loan_amount, paid_emis)` points per segment, over records where both
/// are known. Feeds the EMI-vs-loan scatter.
pub fn emi_vs_loan(records: &[LoanRecord]) -> BTreeMap<Segment, Vec<(f64, f64)>> {
    let mut points: BTreeMap<Segment, Vec<(f64, f64)>> = BTreeMap::new();
    for r in records {
        if let (Some(loan), Some(paid)) = (r.loan_amount, r.paid_emis) {
            points
                .entry(r.segment)
                .or_default()
                .push((loan, f64::from(paid)));
        }
    }
    points
}

/// Loan book size. Averages are over records where the value is known.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExposureSummary {
    pub total_loan_amount: f64,
    pub avg_loan_amount: f64,
    pub total_emi_amount: f64,
    pub avg_paid_emis: Option<f64>,
}

impl ExposureSummary {
    pub fn measure(records: &[LoanRecord]) -> Self {
        let loans: Vec<f64> = records.iter().filter_map(|r| r.loan_amount).collect();
        let total_loan_amount: f64 = loans.iter().sum();
        let avg_loan_amount = if loans.is_empty() {
            0.0
        } else {
            total_loan_amount / loans.len() as f64
        };
        let paid: Vec<u32> = records.iter().filter_map(|r| r.paid_emis).collect();
        Self {
            total_loan_amount,
            avg_loan_amount,
            total_emi_amount: records.iter().filter_map(|r| r.emi_amount).sum(),
            avg_paid_emis: (!paid.is_empty())
                .then(|| paid.iter().map(|&p| f64::from(p)).sum::<f64>() / paid.len() as f64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str, profession: Profession, segment: Segment, dpd: Option<u32>) -> LoanRecord {
        let mut r = LoanRecord::new(id, segment);
        r.profession = profession;
        r.dpd = dpd;
        r
    }

    #[test]
    fn profession_groups_only_present() {
        let recs = vec![
            rec("1", Profession::Salaried, Segment::Healthy, Some(0)),
            rec("2", Profession::Salaried, Segment::Monitored, Some(20)),
            rec("3", Profession::Business, Segment::CurrentNpa, None),
        ];
        let b = profession_breakdown(&recs, 0);
        assert_eq!(b.len(), 2);
        let sal = &b[&Profession::Salaried];
        assert_eq!(sal.customers, 2);
        assert_eq!(sal.mean_dpd, Some(10.0));
        assert_eq!(sal.regular_payer_pct, 50.0);
        assert_eq!(sal.payment_regular_pct, None);
        let biz = &b[&Profession::Business];
        assert_eq!(biz.mean_dpd, None);
        assert_eq!(biz.regular_payer_pct, 0.0);
    }

    #[test]
    fn payment_regular_share_ignores_unknown_flags() {
        let mut a = rec("1", Profession::Business, Segment::Healthy, Some(0));
        a.payment_regular = Some(true);
        let mut b = rec("2", Profession::Business, Segment::Healthy, Some(0));
        b.payment_regular = Some(false);
        let c = rec("3", Profession::Business, Segment::Healthy, Some(0));
        let stats = &profession_breakdown(&[a, b, c], 0)[&Profession::Business];
        assert_eq!(stats.payment_regular_pct, Some(50.0));
    }

    #[test]
    fn coverage_per_present_segment() {
        let mut recs = vec![
            rec("1", Profession::Other, Segment::Healthy, Some(0)),
            rec("2", Profession::Other, Segment::Healthy, Some(0)),
            rec("3", Profession::Other, Segment::CurrentNpa, Some(100)),
        ];
        recs[0].got_legal_notice = Some(true);
        recs[2].got_legal_notice = Some(true);
        let cov = coverage_by_segment(&recs, |r| r.has_legal_notice());
        assert_eq!(cov.len(), 2);
        assert_eq!(cov[&Segment::Healthy], 50.0);
        assert_eq!(cov[&Segment::CurrentNpa], 100.0);
    }

    #[test]
    fn reasons_restricted_to_irregular() {
        let mut recs = vec![
            rec("1", Profession::Other, Segment::Healthy, Some(0)),
            rec("2", Profession::Other, Segment::Monitored, Some(10)),
            rec("3", Profession::Other, Segment::Monitored, Some(40)),
            rec("4", Profession::Other, Segment::Monitored, Some(40)),
        ];
        recs[1].irregular_reason = Some("Job loss".into());
        recs[2].irregular_reason = Some("Job loss".into());
        recs[3].payment_regular = Some(false);
        let reasons = irregular_reasons(&recs);
        assert_eq!(reasons.get("Job loss"), Some(&2));
        assert_eq!(reasons.get(OTHER_REASON), Some(&1));
        assert_eq!(reasons.values().sum::<usize>(), 3);
    }

    #[test]
    fn payment_mix_zero_filled() {
        let mix = payment_method_mix(&[]);
        assert_eq!(mix.len(), 3);
        assert!(mix.values().all(|&c| c == 0));
    }

    #[test]
    fn emi_points_need_both_values() {
        let mut a = rec("1", Profession::Other, Segment::Healthy, Some(0));
        a.loan_amount = Some(50_000.0);
        a.paid_emis = Some(12);
        let mut b = rec("2", Profession::Other, Segment::CurrentNpa, Some(120));
        b.loan_amount = Some(90_000.0);
        b.paid_emis = Some(3);
        let mut c = rec("3", Profession::Other, Segment::Healthy, Some(0));
        c.loan_amount = Some(10_000.0);
        let points = emi_vs_loan(&[a, b, c]);
        assert_eq!(points.len(), 2);
        assert_eq!(points[&Segment::Healthy], vec![(50_000.0, 12.0)]);
        assert_eq!(points[&Segment::CurrentNpa], vec![(90_000.0, 3.0)]);
        assert!(emi_vs_loan(&[]).is_empty());
    }

    #[test]
    fn exposure_over_known_values() {
        let mut a = rec("1", Profession::Other, Segment::Healthy, Some(0));
        a.loan_amount = Some(100_000.0);
        a.emi_amount = Some(5_000.0);
        a.paid_emis = Some(4);
        let mut b = rec("2", Profession::Other, Segment::Healthy, Some(0));
        b.loan_amount = Some(50_000.0);
        let c = rec("3", Profession::Other, Segment::Healthy, Some(0));
        let e = ExposureSummary::measure(&[a, b, c]);
        assert_eq!(e.total_loan_amount, 150_000.0);
        assert_eq!(e.avg_loan_amount, 75_000.0);
        assert_eq!(e.total_emi_amount, 5_000.0);
        assert_eq!(e.avg_paid_emis, Some(4.0));
        assert_eq!(ExposureSummary::measure(&[]), ExposureSummary::default());
    }
}
