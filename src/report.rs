//! Markdown reports for agreement and scale analyses.

use serde::{Deserialize, Serialize};

use crate::agreement::ReliabilityResult;
use crate::consistency::{Advisory, ScaleAnalysis};
use crate::optimizer::OptimalSubset;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReliabilityReport {
    /// blake3 of the serialized results, for matching a report to its run.
    pub input_hash: String,
    pub agreement: Vec<ReliabilityResult>,
    pub scale: Option<ScaleAnalysis>,
    pub optimal_subset: Option<OptimalSubset>,
}

pub fn build_report(
    agreement: Vec<ReliabilityResult>,
    scale: Option<ScaleAnalysis>,
    optimal_subset: Option<OptimalSubset>,
) -> ReliabilityReport {
    let input_hash = hash_inputs(&(&agreement, &scale, &optimal_subset));
    ReliabilityReport {
        input_hash,
        agreement,
        scale,
        optimal_subset,
    }
}

pub fn render_report_markdown(report: &ReliabilityReport) -> String {
    let mut out = String::new();
    out.push_str("# Reliability Report\n\n");
    out.push_str(&format!("- Input hash: `{}`\n", report.input_hash));

    if !report.agreement.is_empty() {
        out.push_str("\n## Inter-coder Agreement\n\n");
        out.push_str("| Metric | Value | Interpretation | Units | Coders |\n");
        out.push_str("|---|---|---|---|---|\n");
        for result in &report.agreement {
            out.push_str(&format!(
                "| {} | {:.3} | {} | {} | {} |\n",
                result.metric.label(),
                result.value,
                result.interpretation,
                result.units,
                result.coders
            ));
        }

        for result in &report.agreement {
            if let Some(ci) = &result.confidence_interval {
                out.push_str(&format!(
                    "\n- {} {:.0}% interval ({:?}): [{:.3}, {:.3}]\n",
                    result.metric.label(),
                    ci.level * 100.0,
                    ci.method,
                    ci.lower,
                    ci.upper
                ));
            }
            if !result.pairwise.is_empty() {
                out.push_str(&format!("\n### {} by pair\n\n", result.metric.label()));
                for pair in &result.pairwise {
                    out.push_str(&format!(
                        "- {} / {}: {:.3} ({}/{})\n",
                        pair.coder_a_name,
                        pair.coder_b_name,
                        pair.value,
                        pair.agreements,
                        pair.comparisons
                    ));
                }
            }
            if !result.disagreements.is_empty() {
                out.push_str(&format!(
                    "\n### Disagreements ({})\n\n",
                    result.disagreements.len()
                ));
                for d in &result.disagreements {
                    out.push_str(&format!(
                        "- {}: {} = `{}`, {} = `{}`: \"{}\"\n",
                        d.document_name,
                        d.coder1,
                        d.coder1_code,
                        d.coder2,
                        d.coder2_code,
                        excerpt(&d.segment_text, 60)
                    ));
                }
            }
        }
    }

    if let Some(scale) = &report.scale {
        out.push_str("\n## Internal Consistency\n\n");
        out.push_str(&format!(
            "- Cronbach's Alpha: {:.3} ({})\n",
            scale.cronbach_alpha, scale.label
        ));
        out.push_str(&format!(
            "- Respondents used/excluded: {}/{}\n",
            scale.respondents_used, scale.respondents_excluded
        ));
        if !scale.items.is_empty() {
            out.push_str("\n| Item | Item-total r | Alpha if deleted | Delete? |\n");
            out.push_str("|---|---|---|---|\n");
            for item in &scale.items {
                out.push_str(&format!(
                    "| {} | {:.3} | {:.3} | {} |\n",
                    item.item_id,
                    item.item_total_correlation,
                    item.alpha_if_deleted,
                    if item.should_delete { "yes" } else { "no" }
                ));
            }
        }
        if !scale.advisories.is_empty() {
            out.push_str("\n### Advisories\n\n");
            for advisory in &scale.advisories {
                out.push_str(&format!("- {}\n", describe_advisory(advisory)));
            }
        }
    }

    if let Some(subset) = &report.optimal_subset {
        out.push_str("\n## Short Form\n\n");
        out.push_str(&format!("- Strategy: {:?}\n", subset.strategy));
        out.push_str(&format!(
            "- Alpha: {:.3} -> {:.3}\n",
            subset.original_alpha, subset.alpha
        ));
        out.push_str(&format!("- Kept: {}\n", subset.item_ids.join(", ")));
        if !subset.removed_ids.is_empty() {
            out.push_str(&format!("- Removed: {}\n", subset.removed_ids.join(", ")));
        }
    }

    out
}

fn describe_advisory(advisory: &Advisory) -> String {
    match advisory {
        Advisory::Redundancy { alpha, threshold } => format!(
            "Alpha {alpha:.3} exceeds {threshold:.2}; some items may be redundant"
        ),
        Advisory::NegativeCorrelation {
            item_id,
            correlation,
        } => format!(
            "Item `{item_id}` correlates negatively with the rest ({correlation:.3}); check reverse scoring"
        ),
        Advisory::ExcludedRespondents { excluded, total } => format!(
            "{excluded} of {total} respondents excluded for missing responses"
        ),
    }
}

fn excerpt(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let mut cut: String = flat.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}

fn hash_inputs<T: Serialize>(value: &T) -> String {
    let bytes = serde_json::to_vec(value).unwrap_or_default();
    blake3::hash(&bytes).to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_flattens_and_truncates() {
        assert_eq!(excerpt("a\n  b", 10), "a b");
        assert_eq!(excerpt("abcdef", 3), "abc...");
    }

    #[test]
    fn empty_report_renders_header_and_stable_hash() {
        let a = build_report(Vec::new(), None, None);
        let b = build_report(Vec::new(), None, None);
        assert_eq!(a.input_hash, b.input_hash);
        let md = render_report_markdown(&a);
        assert!(md.starts_with("# Reliability Report"));
        assert!(!md.contains("## Internal Consistency"));
    }
}
