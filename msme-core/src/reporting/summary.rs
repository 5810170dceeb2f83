//! Plain-language summary lines for a report.

use crate::analyzer::{PortfolioReport, RiskBand};
use crate::domain::PaymentMethod;

/// Short narrative of the report, one finding per line.
pub fn quick_summary(report: &PortfolioReport) -> Vec<String> {
    if report.total_customers == 0 {
        return vec!["No loan records in scope.".to_string()];
    }

    let mut lines = Vec::with_capacity(5);

    let band = report.risk_band();
    let tone = match band {
        RiskBand::Low => "the book is broadly healthy",
        RiskBand::Moderate => "stress is building in NPAs and near-NPAs",
        RiskBand::High => "the book is under heavy NPA stress",
    };
    lines.push(format!(
        "Portfolio risk score {:.1} ({}): {tone}.",
        report.portfolio_risk_score,
        band.label()
    ));

    lines.push(format!(
        "{:.1}% of customers are already NPA and {:.1}% are at risk of slipping into NPA.",
        report.current_npa_pct, report.upcoming_npa_pct
    ));

    let slowest = report
        .profession_breakdown
        .iter()
        .filter_map(|(p, s)| s.mean_dpd.map(|d| (p, d)))
        .max_by(|a, b| a.1.total_cmp(&b.1));
    if let Some((profession, mean)) = slowest {
        lines.push(format!(
            "{profession} customers carry the highest average DPD ({mean:.1} days)."
        ));
    }

    let top_reason = report
        .irregular_reason_distribution
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)));
    if let Some((reason, count)) = top_reason {
        lines.push(format!(
            "Most common irregular-payment reason: {reason} ({count} customers)."
        ));
    }

    let cash = report
        .payment_method_mix
        .get(&PaymentMethod::Cash)
        .copied()
        .unwrap_or(0);
    lines.push(format!(
        "Digital adoption {:.1}% with {cash} cash payers; visit coverage {:.1}%.",
        report.digital_adoption_pct, report.visit_coverage_pct
    ));

    lines
}
