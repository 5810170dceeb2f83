//! Markdown report generator.

use std::fmt::Write;

use super::{quick_summary, ReportDocument};
use crate::analyzer::RiskBand;

pub struct MarkdownReportGenerator;

impl MarkdownReportGenerator {
    pub fn generate(&self, doc: &ReportDocument) -> String {
        let r = &doc.report;
        let mut md = String::with_capacity(4096);

        md.push_str("# MSME Portfolio Report\n\n");
        if let Some(source) = &doc.source {
            let _ = writeln!(md, "Source: `{source}`  ");
        }
        let _ = writeln!(md, "Generated: {}  ", doc.generated_at.format("%Y-%m-%d %H:%M:%S"));
        let _ = writeln!(md, "Dataset: `{}`  ", doc.dataset_hash.short());
        let _ = writeln!(md, "{}\n", doc.scope_line());

        md.push_str("## Key Metrics\n\n");
        md.push_str("| Metric | Value |\n");
        md.push_str("| --- | --- |\n");
        let _ = writeln!(md, "| Total customers | {} |", r.total_customers);
        let _ = writeln!(md, "| Regular payers | {:.1}% |", r.regular_payer_pct);
        let _ = writeln!(md, "| Current NPA | {:.1}% |", r.current_npa_pct);
        let _ = writeln!(md, "| Upcoming NPA | {:.1}% |", r.upcoming_npa_pct);
        let _ = writeln!(md, "| Visit coverage | {:.1}% |", r.visit_coverage_pct);
        let _ = writeln!(md, "| Digital adoption | {:.1}% |", r.digital_adoption_pct);
        let _ = writeln!(
            md,
            "| Portfolio risk score | {:.1} ({}; reference {}) |",
            r.portfolio_risk_score,
            r.risk_band().label(),
            RiskBand::REFERENCE_THRESHOLD
        );
        let _ = writeln!(md, "| Total loan amount | {:.2} |", r.exposure.total_loan_amount);
        let _ = writeln!(md, "| Average loan amount | {:.2} |", r.exposure.avg_loan_amount);
        let _ = writeln!(md, "| Total EMI | {:.2} |", r.exposure.total_emi_amount);
        if let Some(paid) = r.exposure.avg_paid_emis {
            let _ = writeln!(md, "| Average EMIs paid | {paid:.1} |");
        }

        md.push_str("\n## Segments\n\n");
        md.push_str("| Segment | Customers | Share | Legal notice | Visited |\n");
        md.push_str("| --- | --- | --- | --- | --- |\n");
        for (segment, count) in &r.segment_distribution {
            let legal = r.legal_notice_coverage_by_segment.get(segment);
            let visit = r.visit_coverage_by_segment.get(segment);
            let _ = writeln!(
                md,
                "| {segment} | {count} | {:.1}% | {} | {} |",
                r.segment_share_pct(*segment),
                fmt_pct(legal.copied()),
                fmt_pct(visit.copied())
            );
        }

        md.push_str("\n## Risk Zones\n\n");
        md.push_str("| Zone | Customers |\n");
        md.push_str("| --- | --- |\n");
        for (zone, count) in &r.risk_zone_distribution {
            let _ = writeln!(md, "| {zone} | {count} |");
        }

        if !r.profession_breakdown.is_empty() {
            md.push_str("\n## Profession-wise Payment Behaviour\n\n");
            md.push_str("| Profession | Customers | Mean DPD | Regular payers | Payment regular |\n");
            md.push_str("| --- | --- | --- | --- | --- |\n");
            for (profession, s) in &r.profession_breakdown {
                let mean = s.mean_dpd.map_or("-".to_string(), |d| format!("{d:.1}"));
                let _ = writeln!(
                    md,
                    "| {profession} | {} | {mean} | {:.1}% | {} |",
                    s.customers,
                    s.regular_payer_pct,
                    fmt_pct(s.payment_regular_pct)
                );
            }
        }

        md.push_str("\n## DPD Distribution\n\n");
        if r.dpd_distribution.bins.is_empty() {
            md.push_str("No records with a known DPD.\n");
        } else {
            md.push_str("| DPD | Customers |\n");
            md.push_str("| --- | --- |\n");
            for bin in &r.dpd_distribution.bins {
                let _ = writeln!(md, "| {} | {} |", bin.label, bin.count);
            }
        }
        if r.dpd_distribution.missing > 0 {
            let _ = writeln!(md, "\n{} records without a DPD value.", r.dpd_distribution.missing);
        }

        if !r.irregular_reason_distribution.is_empty() {
            md.push_str("\n## Irregular Payment Reasons\n\n");
            md.push_str("| Reason | Customers |\n");
            md.push_str("| --- | --- |\n");
            for (reason, count) in &r.irregular_reason_distribution {
                let _ = writeln!(md, "| {reason} | {count} |");
            }
        }

        md.push_str("\n## Payment Method Mix\n\n");
        for (method, count) in &r.payment_method_mix {
            let _ = writeln!(md, "- {}: {count}", method.label());
        }

        md.push_str("\n## Quick Summary\n\n");
        for line in quick_summary(r) {
            let _ = writeln!(md, "- {line}");
        }

        md
    }
}

fn fmt_pct(value: Option<f64>) -> String {
    value.map_or("-".to_string(), |v| format!("{v:.1}%"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::analyze;
    use crate::config::AnalyzerConfig;
    use crate::data::Dataset;
    use crate::session::Snapshot;

    #[test]
    fn report_has_all_sections() {
        let csv = "customer_id,profession,segment,dpd,emi_amount,loan_amount,payment_method,visit_covered,got_legal_notice,irregular_reason\n\
C1,Salaried,Healthy,0,1000,50000,Digital,yes,no,\n\
C2,Business,Current NPA,120,2500,90000,Cash,no,yes,Business loss\n";
        let ds = Dataset::from_reader(csv.as_bytes()).unwrap();
        let snap = Snapshot::new(&ds, None);
        let report = analyze(snap.records(), &AnalyzerConfig::default());
        let at = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        let doc = ReportDocument::new(&snap, report, at);
        let md = MarkdownReportGenerator.generate(&doc);

        assert!(md.starts_with("# MSME Portfolio Report"));
        assert!(md.contains("Generated: 2024-01-02 03:04:05"));
        assert!(md.contains("Using first 2 rows out of 2"));
        assert!(md.contains("| Current NPA | 50.0% |"));
        assert!(md.contains("| Current NPA | 1 | 50.0% | 100.0% | 0.0% |"));
        assert!(md.contains("| Monitored | 0 | 0.0% | - | - |"));
        assert!(md.contains("| 91+ | 1 |"));
        assert!(md.contains("| Business loss | 1 |"));
        assert!(md.contains("## Quick Summary"));
    }
}
