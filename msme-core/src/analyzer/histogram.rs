//! Days-past-due histogram over fixed regulatory buckets or adaptive bins.

use serde::{Deserialize, Serialize};

use crate::domain::LoanRecord;

/// Upper limit on the adaptive bin count.
pub const MAX_ADAPTIVE_BINS: usize = 200;

/// How DPD values are bucketed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DpdBinning {
    #[default]
    /// `0`, `1-30` (SMA-0), `31-60` (SMA-1), `61-90` (SMA-2), `91+` (NPA).
    Fixed,
    /// Equal-width integer bins spanning the observed range, at most
    /// [`MAX_ADAPTIVE_BINS`].
    Adaptive { bins: usize },
}

/// One histogram bucket; `upper` is inclusive, `None` means open-ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DpdBin {
    pub label: String,
    pub lower: u32,
    pub upper: Option<u32>,
    pub count: usize,
}

impl DpdBin {
    fn new(lower: u32, upper: Option<u32>) -> Self {
        let label = match upper {
            Some(u) if u == lower => lower.to_string(),
            Some(u) => format!("{lower}-{u}"),
            None => format!("{lower}+"),
        };
        Self {
            label,
            lower,
            upper,
            count: 0,
        }
    }

    fn contains(&self, dpd: u32) -> bool {
        dpd >= self.lower && self.upper.map_or(true, |u| dpd <= u)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DpdHistogram {
    pub bins: Vec<DpdBin>,
    /// Records whose DPD was empty or unreadable.
    pub missing: usize,
}

impl DpdHistogram {
    pub fn build(records: &[LoanRecord], binning: &DpdBinning) -> Self {
        let known: Vec<u32> = records.iter().filter_map(|r| r.dpd).collect();
        let missing = records.len() - known.len();

        let bins = match binning {
            DpdBinning::Fixed => {
                let mut bins = fixed_bins();
                for dpd in known {
                    if let Some(bin) = bins.iter_mut().find(|b| b.contains(dpd)) {
                        bin.count += 1;
                    }
                }
                bins
            }
            DpdBinning::Adaptive { bins } => adaptive_bins(&known, *bins),
        };

        Self { bins, missing }
    }

    /// Records with a known DPD.
    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }

    pub fn max_count(&self) -> usize {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }
}

fn fixed_bins() -> Vec<DpdBin> {
    vec![
        DpdBin::new(0, Some(0)),
        DpdBin::new(1, Some(30)),
        DpdBin::new(31, Some(60)),
        DpdBin::new(61, Some(90)),
        DpdBin::new(91, None),
    ]
}

/// Equal-width bins over `[min, max]` of `values`, already counted.
fn adaptive_bins(values: &[u32], requested: usize) -> Vec<DpdBin> {
    let (Some(&min), Some(&max)) = (values.iter().min(), values.iter().max()) else {
        return Vec::new();
    };
    let span = u64::from(max - min) + 1;
    let requested = requested.clamp(1, MAX_ADAPTIVE_BINS) as u64;
    let width = span.div_ceil(requested).max(1);
    let count = span.div_ceil(width);

    let mut bins: Vec<DpdBin> = (0..count)
        .map(|i| {
            let lower = u64::from(min) + i * width;
            let upper = (lower + width - 1).min(u64::from(max));
            // Both bounds lie within [min, max], which fits in u32.
            DpdBin::new(lower as u32, Some(upper as u32))
        })
        .collect();

    for dpd in values {
        let index = (u64::from(dpd - min) / width) as usize;
        if let Some(bin) = bins.get_mut(index) {
            bin.count += 1;
        }
    }
    bins
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Segment;

    fn with_dpd(values: &[Option<u32>]) -> Vec<LoanRecord> {
        values
            .iter()
            .enumerate()
            .map(|(i, d)| {
                let mut r = LoanRecord::new(format!("C{i}"), Segment::Healthy);
                r.dpd = *d;
                r
            })
            .collect()
    }

    #[test]
    fn fixed_buckets_follow_sma_bands() {
        let recs = with_dpd(&[Some(0), Some(0), Some(1), Some(30), Some(31), Some(90), Some(91), Some(400), None]);
        let h = DpdHistogram::build(&recs, &DpdBinning::Fixed);
        let counts: Vec<usize> = h.bins.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![2, 2, 1, 1, 2]);
        assert_eq!(h.missing, 1);
        assert_eq!(h.total() + h.missing, recs.len());
        let labels: Vec<&str> = h.bins.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["0", "1-30", "31-60", "61-90", "91+"]);
    }

    #[test]
    fn adaptive_bins_span_observed_range() {
        let recs = with_dpd(&[Some(0), Some(9), Some(10), Some(19)]);
        let h = DpdHistogram::build(&recs, &DpdBinning::Adaptive { bins: 2 });
        assert_eq!(h.bins.len(), 2);
        assert_eq!(h.bins[0].label, "0-9");
        assert_eq!(h.bins[1].label, "10-19");
        assert_eq!(h.bins[0].count, 2);
        assert_eq!(h.bins[1].count, 2);
    }

    #[test]
    fn adaptive_with_single_value() {
        let recs = with_dpd(&[Some(7), Some(7)]);
        let h = DpdHistogram::build(&recs, &DpdBinning::Adaptive { bins: 30 });
        assert_eq!(h.bins.len(), 1);
        assert_eq!(h.bins[0].label, "7");
        assert_eq!(h.bins[0].count, 2);
    }

    #[test]
    fn adaptive_never_exceeds_requested_bins() {
        let recs = with_dpd(&[Some(0), Some(100)]);
        let h = DpdHistogram::build(&recs, &DpdBinning::Adaptive { bins: 30 });
        assert!(h.bins.len() <= 30);
        assert_eq!(h.total(), 2);
        assert_eq!(h.bins.last().and_then(|b| b.upper), Some(100));
    }

    #[test]
    fn adaptive_bin_count_is_capped() {
        let recs = with_dpd(&[Some(0), Some(4_000_000_000), Some(2_000_000_000)]);
        let h = DpdHistogram::build(&recs, &DpdBinning::Adaptive { bins: 2_000_000 });
        assert_eq!(h.bins.len(), MAX_ADAPTIVE_BINS);
        assert_eq!(h.total(), 3);
        assert_eq!(h.bins[0].count, 1);
        assert_eq!(h.bins.last().map(|b| b.count), Some(1));
        assert_eq!(h.bins.last().and_then(|b| b.upper), Some(4_000_000_000));
    }

    #[test]
    fn adaptive_without_known_values_is_empty() {
        let recs = with_dpd(&[None, None]);
        let h = DpdHistogram::build(&recs, &DpdBinning::Adaptive { bins: 5 });
        assert!(h.bins.is_empty());
        assert_eq!(h.missing, 2);
    }
}
