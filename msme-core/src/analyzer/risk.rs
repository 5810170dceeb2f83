//! Portfolio risk score: a weighted composite of stress factors.
//!
//! Each factor is a fraction in [0, 1] that grows as the book worsens. The
//! score is `100 * sum(w_i * f_i) / sum(w_i)`, so it stays in [0, 100] for
//! any valid weight set and never decreases when a factor increases.

use serde::{Deserialize, Serialize};

use super::share;
use crate::config::ConfigError;
use crate::domain::{LoanRecord, Segment};

/// Weights of the risk score. Relative, not required to sum to 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskPolicy {
    pub current_npa: f64,
    pub upcoming_npa: f64,
    pub dpd_stress: f64,
    pub zone_mix: f64,
    pub visit_gap: f64,
    /// Records with DPD above this count toward the DPD stress factor.
    pub stress_dpd: u32,
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self {
            current_npa: 35.0,
            upcoming_npa: 25.0,
            dpd_stress: 15.0,
            zone_mix: 15.0,
            visit_gap: 10.0,
            stress_dpd: 30,
        }
    }
}

impl RiskPolicy {
    fn weights(&self) -> [(&'static str, f64); 5] {
        [
            ("current_npa", self.current_npa),
            ("upcoming_npa", self.upcoming_npa),
            ("dpd_stress", self.dpd_stress),
            ("zone_mix", self.zone_mix),
            ("visit_gap", self.visit_gap),
        ]
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, w) in self.weights() {
            if !w.is_finite() || w < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "risk weight '{name}' must be a non-negative number, got {w}"
                )));
            }
        }
        if self.weights().iter().all(|(_, w)| *w == 0.0) {
            return Err(ConfigError::Invalid(
                "at least one risk weight must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Weighted score in [0, 100].
    pub fn score(&self, factors: &RiskFactors) -> f64 {
        let weighted = self.current_npa * factors.current_npa
            + self.upcoming_npa * factors.upcoming_npa
            + self.dpd_stress * factors.dpd_stress
            + self.zone_mix * factors.zone_mix
            + self.visit_gap * factors.visit_gap;
        let total: f64 = self.weights().iter().map(|(_, w)| w).sum();
        if total <= 0.0 {
            return 0.0;
        }
        (weighted / total * 100.0).clamp(0.0, 100.0)
    }
}

/// Stress factors of a snapshot, each a fraction in [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskFactors {
    pub current_npa: f64,
    pub upcoming_npa: f64,
    pub dpd_stress: f64,
    pub zone_mix: f64,
    pub visit_gap: f64,
}

impl RiskFactors {
    /// All-zero for an empty snapshot.
    pub fn measure(records: &[LoanRecord], policy: &RiskPolicy) -> Self {
        if records.is_empty() {
            return Self::default();
        }
        let n = records.len() as f64;
        Self {
            current_npa: share(records, |r| r.segment == Segment::CurrentNpa),
            upcoming_npa: share(records, |r| r.segment == Segment::UpcomingNpa),
            dpd_stress: share(records, |r| r.dpd.is_some_and(|d| d > policy.stress_dpd)),
            zone_mix: records.iter().map(|r| r.risk_zone.severity()).sum::<f64>() / n,
            visit_gap: share(records, |r| !r.visited()),
        }
    }
}

/// Gauge band of a risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskBand {
    Low,
    Moderate,
    High,
}

impl RiskBand {
    /// Marker drawn on the risk gauge.
    pub const REFERENCE_THRESHOLD: f64 = 47.5;

    pub fn from_score(score: f64) -> Self {
        if score < 30.0 {
            RiskBand::Low
        } else if score < 60.0 {
            RiskBand::Moderate
        } else {
            RiskBand::High
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskBand::Low => "Low",
            RiskBand::Moderate => "Moderate",
            RiskBand::High => "High",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RiskZone;

    fn book(segments: &[Segment]) -> Vec<LoanRecord> {
        segments
            .iter()
            .enumerate()
            .map(|(i, s)| LoanRecord::new(format!("C{i}"), *s))
            .collect()
    }

    #[test]
    fn default_policy_is_valid() {
        assert!(RiskPolicy::default().validate().is_ok());
    }

    #[test]
    fn negative_or_zero_weights_rejected() {
        let p = RiskPolicy {
            zone_mix: -1.0,
            ..RiskPolicy::default()
        };
        assert!(p.validate().is_err());

        let p = RiskPolicy {
            current_npa: 0.0,
            upcoming_npa: 0.0,
            dpd_stress: 0.0,
            zone_mix: 0.0,
            visit_gap: 0.0,
            stress_dpd: 30,
        };
        assert!(p.validate().is_err());

        let p = RiskPolicy {
            dpd_stress: f64::NAN,
            ..RiskPolicy::default()
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn worst_case_scores_100() {
        let mut recs = book(&[Segment::CurrentNpa; 4]);
        for r in &mut recs {
            r.dpd = Some(200);
        }
        let policy = RiskPolicy {
            upcoming_npa: 0.0,
            ..RiskPolicy::default()
        };
        let f = RiskFactors::measure(&recs, &policy);
        assert_eq!(f.zone_mix, 1.0);
        assert!((policy.score(&f) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn healthy_visited_book_scores_zero() {
        let mut recs = book(&[Segment::Healthy; 3]);
        for r in &mut recs {
            r.visit_covered = Some(true);
        }
        let policy = RiskPolicy::default();
        let f = RiskFactors::measure(&recs, &policy);
        assert_eq!(policy.score(&f), 0.0);
    }

    #[test]
    fn score_rises_with_worse_segments() {
        let policy = RiskPolicy::default();
        let calm = book(&[Segment::Healthy, Segment::Healthy, Segment::Monitored]);
        let stressed = book(&[Segment::Healthy, Segment::CurrentNpa, Segment::Monitored]);
        let a = policy.score(&RiskFactors::measure(&calm, &policy));
        let b = policy.score(&RiskFactors::measure(&stressed, &policy));
        assert!(b > a);
    }

    #[test]
    fn explicit_zone_feeds_zone_mix() {
        let mut recs = book(&[Segment::Healthy, Segment::Healthy]);
        recs[0].risk_zone = RiskZone::Red;
        let f = RiskFactors::measure(&recs, &RiskPolicy::default());
        assert!((f.zone_mix - 0.5).abs() < 1e-12);
    }

    #[test]
    fn empty_book_has_zero_factors() {
        let policy = RiskPolicy::default();
        let f = RiskFactors::measure(&[], &policy);
        assert_eq!(f, RiskFactors::default());
        assert_eq!(policy.score(&f), 0.0);
    }

    #[test]
    fn bands() {
        assert_eq!(RiskBand::from_score(0.0), RiskBand::Low);
        assert_eq!(RiskBand::from_score(29.9), RiskBand::Low);
        assert_eq!(RiskBand::from_score(30.0), RiskBand::Moderate);
        assert_eq!(RiskBand::from_score(RiskBand::REFERENCE_THRESHOLD), RiskBand::Moderate);
        assert_eq!(RiskBand::from_score(60.0), RiskBand::High);
    }
}
