//! Inter-coder agreement: percent agreement, Cohen's Kappa and nominal
//! Krippendorff's Alpha over tiled segments.
//!
//! Every metric works on the same [`AssignmentTable`]: one category (or
//! nothing) per segment and coder. How "nothing" is treated differs between
//! metrics by default:
//!
//! - percent agreement and Cohen's Kappa count an uncoded segment as its own
//!   `none` category, so two coders who both skipped a segment agree on it;
//! - Krippendorff's Alpha treats an uncoded segment as a missing judgment,
//!   so only coders who actually coded a segment contribute to it.
//!
//! [`AgreementConfig::treat_uncoded_as`] overrides the default for all three.
//!
//! Kappa and Alpha are clamped to `[0, 1]` unless
//! [`AgreementConfig::clamp_negative`] is off. `Pe = 1` (Kappa) and `De = 0`
//! (Alpha) are reported as perfect agreement, which conflates "no
//! disagreement was possible" with "coders agreed".

use std::cmp::Ordering;
use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};
use tracing::debug;

use crate::config::AgreementConfig;
use crate::error::ValidationError;
use crate::interpretation::{
    interpret_coefficient, AgreementLevel, INSUFFICIENT_COLOR, INSUFFICIENT_LABEL,
};
use crate::model::{CoderData, Document};
use crate::tiling::{build_assignments, AssignmentTable};

/// Display value for an uncoded segment.
pub const UNCODED: &str = "none";

/// Krippendorff's Alpha needs at least this many segments coded by two or
/// more coders.
pub const MIN_ALPHA_UNITS: usize = 3;

const TINY: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UncodedPolicy {
    /// Uncoded is a category (`none`) that coders can agree on.
    Category,
    /// Uncoded is a missing judgment and is left out of comparisons.
    Missing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    PercentAgreement,
    CohensKappa,
    KrippendorffAlpha,
}

impl Metric {
    pub fn label(self) -> &'static str {
        match self {
            Metric::PercentAgreement => "Percent Agreement",
            Metric::CohensKappa => "Cohen's Kappa",
            Metric::KrippendorffAlpha => "Krippendorff's Alpha",
        }
    }

    pub fn default_uncoded_policy(self) -> UncodedPolicy {
        match self {
            Metric::PercentAgreement | Metric::CohensKappa => UncodedPolicy::Category,
            Metric::KrippendorffAlpha => UncodedPolicy::Missing,
        }
    }

    fn uncoded_policy(self, cfg: &AgreementConfig) -> UncodedPolicy {
        cfg.treat_uncoded_as
            .unwrap_or_else(|| self.default_uncoded_policy())
    }
}

/// Agreement between one pair of coders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairwiseAgreement {
    pub coder_a: String,
    pub coder_a_name: String,
    pub coder_b: String,
    pub coder_b_name: String,
    pub agreements: usize,
    pub comparisons: usize,
    pub value: f64,
}

/// A segment two coders categorized differently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disagreement {
    pub document_name: String,
    pub segment_text: String,
    pub coder1: String,
    pub coder1_code: String,
    pub coder2: String,
    pub coder2_code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalMethod {
    Asymptotic,
    Bootstrap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
    pub level: f64,
    pub method: IntervalMethod,
}

/// Outcome of one agreement calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReliabilityResult {
    pub metric: Metric,
    pub value: f64,
    pub interpretation: String,
    /// `None` for insufficient-data results.
    pub level: Option<AgreementLevel>,
    pub color_token: String,
    pub insufficient_data: bool,
    /// Segments (or segment/coder-pair comparisons for percent agreement)
    /// that entered the statistic.
    pub units: usize,
    pub coders: usize,
    pub uncoded_policy: UncodedPolicy,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pairwise: Vec<PairwiseAgreement>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disagreements: Vec<Disagreement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_interval: Option<ConfidenceInterval>,
}

impl ReliabilityResult {
    fn insufficient(metric: Metric, reason: &str, coders: usize, policy: UncodedPolicy) -> Self {
        debug!(metric = metric.label(), reason, "insufficient data");
        Self {
            metric,
            value: 0.0,
            interpretation: format!("{INSUFFICIENT_LABEL}: {reason}"),
            level: None,
            color_token: INSUFFICIENT_COLOR.to_string(),
            insufficient_data: true,
            units: 0,
            coders,
            uncoded_policy: policy,
            pairwise: Vec::new(),
            disagreements: Vec::new(),
            confidence_interval: None,
        }
    }

    fn computed(
        metric: Metric,
        value: f64,
        units: usize,
        coders: usize,
        policy: UncodedPolicy,
    ) -> Self {
        let interp = interpret_coefficient(value);
        debug!(metric = metric.label(), value, units, "computed agreement");
        Self {
            metric,
            value,
            interpretation: interp.label.to_string(),
            level: Some(interp.level),
            color_token: interp.color_token.to_string(),
            insufficient_data: false,
            units,
            coders,
            uncoded_policy: policy,
            pairwise: Vec::new(),
            disagreements: Vec::new(),
            confidence_interval: None,
        }
    }
}

/// All three metrics over one shared tiling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgreementSummary {
    pub segments: usize,
    pub percent_agreement: ReliabilityResult,
    pub cohens_kappa: ReliabilityResult,
    pub krippendorff_alpha: ReliabilityResult,
}

// ---------------------------------------------------------------------
//  Public API
// ---------------------------------------------------------------------

pub fn percent_agreement(
    coders: &[CoderData],
    documents: &[Document],
    cfg: &AgreementConfig,
) -> Result<ReliabilityResult, ValidationError> {
    let table = build_assignments(coders, documents, cfg)?;
    Ok(percent_agreement_from_table(&table, cfg))
}

pub fn cohens_kappa(
    coders: &[CoderData],
    documents: &[Document],
    cfg: &AgreementConfig,
) -> Result<ReliabilityResult, ValidationError> {
    let table = build_assignments(coders, documents, cfg)?;
    Ok(cohens_kappa_from_table(&table, documents, cfg))
}

pub fn krippendorff_alpha(
    coders: &[CoderData],
    documents: &[Document],
    cfg: &AgreementConfig,
) -> Result<ReliabilityResult, ValidationError> {
    let table = build_assignments(coders, documents, cfg)?;
    Ok(krippendorff_alpha_from_table(&table, cfg))
}

/// Compute every metric from a single tiling pass.
pub fn agreement_summary(
    coders: &[CoderData],
    documents: &[Document],
    cfg: &AgreementConfig,
) -> Result<AgreementSummary, ValidationError> {
    let table = build_assignments(coders, documents, cfg)?;
    Ok(AgreementSummary {
        segments: table.segment_count(),
        percent_agreement: percent_agreement_from_table(&table, cfg),
        cohens_kappa: cohens_kappa_from_table(&table, documents, cfg),
        krippendorff_alpha: krippendorff_alpha_from_table(&table, cfg),
    })
}

// ---------------------------------------------------------------------
//  Percent agreement
// ---------------------------------------------------------------------

pub fn percent_agreement_from_table(
    table: &AssignmentTable,
    cfg: &AgreementConfig,
) -> ReliabilityResult {
    let metric = Metric::PercentAgreement;
    let policy = metric.uncoded_policy(cfg);
    let n_coders = table.coder_count();
    if n_coders < 2 {
        return ReliabilityResult::insufficient(
            metric,
            "at least two coders are required",
            n_coders,
            policy,
        );
    }
    if table.segment_count() == 0 {
        return ReliabilityResult::insufficient(metric, "no segments to compare", n_coders, policy);
    }

    let mut total_agreements = 0usize;
    let mut total_comparisons = 0usize;
    let mut pairwise = Vec::new();
    for (a, b) in coder_pairs(n_coders) {
        let mut agreements = 0usize;
        let mut comparisons = 0usize;
        for row in &table.categories {
            let Some(same) = compare_cells(row[a].as_deref(), row[b].as_deref(), policy) else {
                continue;
            };
            comparisons += 1;
            if same {
                agreements += 1;
            }
        }
        total_agreements += agreements;
        total_comparisons += comparisons;
        pairwise.push(PairwiseAgreement {
            coder_a: table.coder_ids[a].clone(),
            coder_a_name: table.coder_names[a].clone(),
            coder_b: table.coder_ids[b].clone(),
            coder_b_name: table.coder_names[b].clone(),
            agreements,
            comparisons,
            value: ratio(agreements, comparisons),
        });
    }

    if total_comparisons == 0 {
        return ReliabilityResult::insufficient(
            metric,
            "no segment was coded by two coders",
            n_coders,
            policy,
        );
    }

    let value = ratio(total_agreements, total_comparisons);
    let mut result =
        ReliabilityResult::computed(metric, value, total_comparisons, n_coders, policy);
    result.pairwise = pairwise;
    result
}

// ---------------------------------------------------------------------
//  Cohen's Kappa
// ---------------------------------------------------------------------

pub fn cohens_kappa_from_table(
    table: &AssignmentTable,
    documents: &[Document],
    cfg: &AgreementConfig,
) -> ReliabilityResult {
    let metric = Metric::CohensKappa;
    let policy = metric.uncoded_policy(cfg);
    let n_coders = table.coder_count();
    if n_coders != 2 {
        let reason = format!("Cohen's Kappa requires exactly two coders, got {n_coders}");
        return ReliabilityResult::insufficient(metric, &reason, n_coders, policy);
    }
    if table.segment_count() == 0 {
        return ReliabilityResult::insufficient(metric, "no segments to compare", n_coders, policy);
    }

    let docs: HashMap<&str, &Document> = documents.iter().map(|d| (d.id.as_str(), d)).collect();

    let mut total = 0usize;
    let mut agreements = 0usize;
    let mut marginal_1: HashMap<Option<&str>, usize> = HashMap::new();
    let mut marginal_2: HashMap<Option<&str>, usize> = HashMap::new();
    let mut disagreements = Vec::new();

    for (segment, row) in table.segments.iter().zip(&table.categories) {
        let (x, y) = (row[0].as_deref(), row[1].as_deref());
        let Some(same) = compare_cells(x, y, policy) else {
            continue;
        };
        total += 1;
        *marginal_1.entry(x).or_insert(0) += 1;
        *marginal_2.entry(y).or_insert(0) += 1;
        if same {
            agreements += 1;
        } else if disagreements.len() < cfg.max_disagreements {
            let doc = docs.get(segment.document_id.as_str());
            disagreements.push(Disagreement {
                document_name: doc
                    .map(|d| d.display_name().to_string())
                    .unwrap_or_else(|| segment.document_id.clone()),
                segment_text: doc
                    .map(|d| d.slice_chars(segment.start, segment.end))
                    .unwrap_or_default(),
                coder1: table.coder_names[0].clone(),
                coder1_code: x.unwrap_or(UNCODED).to_string(),
                coder2: table.coder_names[1].clone(),
                coder2_code: y.unwrap_or(UNCODED).to_string(),
            });
        }
    }

    if total == 0 {
        return ReliabilityResult::insufficient(
            metric,
            "no segment was coded by both coders",
            n_coders,
            policy,
        );
    }

    let n = total as f64;
    let po = agreements as f64 / n;
    let pe: f64 = marginal_1
        .iter()
        .map(|(category, &c1)| {
            let c2 = marginal_2.get(category).copied().unwrap_or(0);
            (c1 as f64 / n) * (c2 as f64 / n)
        })
        .sum();

    let (kappa, interval) = if pe >= 1.0 - TINY {
        (1.0, None)
    } else {
        let kappa = (po - pe) / (1.0 - pe);
        let se = (po * (1.0 - po) / (n * (1.0 - pe).powi(2))).sqrt();
        let z = normal_quantile(cfg.confidence_level);
        (kappa, Some((kappa - z * se, kappa + z * se)))
    };

    let value = finalize_coefficient(kappa, cfg.clamp_negative);
    let mut result = ReliabilityResult::computed(metric, value, total, n_coders, policy);
    result.disagreements = disagreements;
    result.confidence_interval = interval
        .filter(|(lower, upper)| lower.is_finite() && upper.is_finite())
        .map(|(lower, upper)| ConfidenceInterval {
            lower: finalize_coefficient(lower, cfg.clamp_negative),
            upper: finalize_coefficient(upper, cfg.clamp_negative),
            level: cfg.confidence_level,
            method: IntervalMethod::Asymptotic,
        });
    result
}

// ---------------------------------------------------------------------
//  Krippendorff's Alpha (nominal)
// ---------------------------------------------------------------------

pub fn krippendorff_alpha_from_table(
    table: &AssignmentTable,
    cfg: &AgreementConfig,
) -> ReliabilityResult {
    let metric = Metric::KrippendorffAlpha;
    let policy = metric.uncoded_policy(cfg);
    let n_coders = table.coder_count();
    if n_coders < 2 {
        return ReliabilityResult::insufficient(
            metric,
            "at least two coders are required",
            n_coders,
            policy,
        );
    }
    if table.segment_count() == 0 {
        return ReliabilityResult::insufficient(metric, "no segments to compare", n_coders, policy);
    }

    // Reliability data: one row of present values per segment.
    let units: Vec<Vec<Option<&str>>> = table
        .categories
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| cell.as_deref())
                .filter(|cell| cell.is_some() || policy == UncodedPolicy::Category)
                .collect()
        })
        .collect();

    let pairable = units.iter().filter(|u| u.len() >= 2).count();
    if pairable < MIN_ALPHA_UNITS {
        let reason = format!(
            "{pairable} segment(s) coded by two or more coders, need {MIN_ALPHA_UNITS}"
        );
        return ReliabilityResult::insufficient(metric, &reason, n_coders, policy);
    }

    let Some(alpha) = nominal_alpha(units.iter().map(Vec::as_slice)) else {
        return ReliabilityResult::insufficient(
            metric,
            "no comparable coder pairs",
            n_coders,
            policy,
        );
    };

    let value = finalize_coefficient(alpha, cfg.clamp_negative);
    let mut result = ReliabilityResult::computed(metric, value, pairable, n_coders, policy);
    if cfg.bootstrap_samples > 0 {
        result.confidence_interval = bootstrap_interval(&units, cfg);
    }
    result
}

/// Nominal alpha over reliability-data rows of present values.
///
/// `Do` is the share of differing unordered value pairs within rows holding
/// two or more values. `De` uses category frequencies over every present
/// value. Returns `None` when no row holds a pair.
fn nominal_alpha<'u, 'a: 'u, I>(units: I) -> Option<f64>
where
    I: IntoIterator<Item = &'u [Option<&'a str>]>,
{
    let mut frequencies: HashMap<Option<&str>, usize> = HashMap::new();
    let mut pairs = 0usize;
    let mut differing = 0usize;
    let mut n = 0usize;

    for unit in units {
        for value in unit {
            *frequencies.entry(*value).or_insert(0) += 1;
        }
        n += unit.len();
        if unit.len() < 2 {
            continue;
        }
        for (i, j) in coder_pairs(unit.len()) {
            pairs += 1;
            if unit[i] != unit[j] {
                differing += 1;
            }
        }
    }

    if pairs == 0 || n < 2 {
        return None;
    }

    let observed = differing as f64 / pairs as f64;
    let n_f = n as f64;
    let sum_sq: f64 = frequencies.values().map(|&c| (c as f64).powi(2)).sum();
    // Σ_{i≠j} n_i·n_j = n² − Σ n_i²
    let expected = (n_f * n_f - sum_sq) / (n_f * (n_f - 1.0));

    if expected <= TINY {
        return Some(1.0);
    }
    Some(1.0 - observed / expected)
}

/// Percentile bootstrap over segments.
fn bootstrap_interval(
    units: &[Vec<Option<&str>>],
    cfg: &AgreementConfig,
) -> Option<ConfidenceInterval> {
    let mut rng = StdRng::seed_from_u64(cfg.rng_seed);
    let m = units.len();
    let mut estimates = Vec::with_capacity(cfg.bootstrap_samples);
    for _ in 0..cfg.bootstrap_samples {
        let sample = (0..m).map(|_| units[rng.gen_range(0..m)].as_slice());
        if let Some(alpha) = nominal_alpha(sample) {
            estimates.push(finalize_coefficient(alpha, cfg.clamp_negative));
        }
    }
    if estimates.is_empty() {
        return None;
    }
    estimates.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let tail = (1.0 - cfg.confidence_level) / 2.0;
    Some(ConfidenceInterval {
        lower: percentile(&estimates, tail),
        upper: percentile(&estimates, 1.0 - tail),
        level: cfg.confidence_level,
        method: IntervalMethod::Bootstrap,
    })
}

// ---------------------------------------------------------------------
//  Utilities
// ---------------------------------------------------------------------

fn coder_pairs(n: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..n).flat_map(move |i| ((i + 1)..n).map(move |j| (i, j)))
}

/// `Some(equal)` when the two cells are comparable under `policy`.
fn compare_cells(x: Option<&str>, y: Option<&str>, policy: UncodedPolicy) -> Option<bool> {
    match policy {
        UncodedPolicy::Category => Some(x == y),
        UncodedPolicy::Missing => match (x, y) {
            (Some(x), Some(y)) => Some(x == y),
            _ => None,
        },
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

fn finalize_coefficient(value: f64, clamp_negative: bool) -> f64 {
    if clamp_negative {
        value.clamp(0.0, 1.0)
    } else {
        value.clamp(-1.0, 1.0)
    }
}

fn normal_quantile(level: f64) -> f64 {
    Normal::new(0.0, 1.0)
        .map(|n| n.inverse_cdf(0.5 + level / 2.0))
        .unwrap_or(1.959_963_984_540_054)
}

/// Nearest-rank percentile of an ascending slice.
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let idx = ((sorted.len() - 1) as f64 * q.clamp(0.0, 1.0)).round() as usize;
    sorted[idx]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiling::Segment;

    fn table(rows: &[&[Option<&str>]]) -> AssignmentTable {
        let n_coders = rows.first().map(|r| r.len()).unwrap_or(0);
        AssignmentTable {
            segments: (0..rows.len())
                .map(|i| Segment {
                    document_id: "doc".to_string(),
                    start: i * 10,
                    end: i * 10 + 10,
                })
                .collect(),
            coder_ids: (0..n_coders).map(|i| format!("c{i}")).collect(),
            coder_names: (0..n_coders).map(|i| format!("Coder {i}")).collect(),
            categories: rows
                .iter()
                .map(|r| r.iter().map(|c| c.map(str::to_string)).collect())
                .collect(),
        }
    }

    #[test]
    fn coder_pairs_enumerates_unordered_pairs() {
        let pairs: Vec<_> = coder_pairs(3).collect();
        assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 2)]);
        assert_eq!(coder_pairs(1).count(), 0);
    }

    #[test]
    fn nominal_alpha_matches_hand_computation() {
        // Do = 2/13 over 13 coder pairs; De = 7/13 from 14 present values.
        let t = table(&[
            &[Some("a"), Some("a"), Some("a")],
            &[Some("a"), Some("b"), Some("a")],
            &[Some("b"), Some("b"), Some("b")],
            &[Some("a"), Some("a"), None],
            &[Some("b"), Some("b"), Some("b")],
        ]);
        let result = krippendorff_alpha_from_table(&t, &AgreementConfig::default());
        assert!((result.value - 0.714_285_714).abs() < 1e-6, "{}", result.value);
        assert_eq!(result.units, 5);
    }

    #[test]
    fn alpha_is_one_without_variance() {
        let t = table(&[
            &[Some("a"), Some("a")],
            &[Some("a"), Some("a")],
            &[Some("a"), Some("a")],
        ]);
        let result = krippendorff_alpha_from_table(&t, &AgreementConfig::default());
        assert_eq!(result.value, 1.0);
        assert!(!result.insufficient_data);
    }

    #[test]
    fn alpha_needs_three_pairable_segments() {
        let t = table(&[
            &[Some("a"), Some("a")],
            &[Some("b"), None],
            &[Some("a"), Some("b")],
        ]);
        let result = krippendorff_alpha_from_table(&t, &AgreementConfig::default());
        assert!(result.insufficient_data);
        assert_eq!(result.value, 0.0);
        assert!(result.interpretation.starts_with(INSUFFICIENT_LABEL));
    }

    #[test]
    fn kappa_is_one_when_expected_agreement_is_total() {
        let t = table(&[&[Some("a"), Some("a")], &[Some("a"), Some("a")]]);
        let result = cohens_kappa_from_table(&t, &[], &AgreementConfig::default());
        assert_eq!(result.value, 1.0);
        assert!(result.confidence_interval.is_none());
    }

    #[test]
    fn kappa_drops_interval_with_unbounded_quantile() {
        let t = table(&[
            &[Some("a"), Some("a")],
            &[Some("b"), Some("b")],
            &[Some("a"), Some("a")],
        ]);
        let cfg = AgreementConfig {
            confidence_level: 1.0,
            ..AgreementConfig::default()
        };
        let result = cohens_kappa_from_table(&t, &[], &cfg);
        assert_eq!(result.value, 1.0);
        assert!(result.confidence_interval.is_none());
        assert!(serde_json::to_string(&result).unwrap().find("null").is_none());
    }

    #[test]
    fn negative_kappa_is_clamped_unless_disabled() {
        let t = table(&[&[Some("a"), Some("b")], &[Some("b"), Some("a")]]);
        let clamped = cohens_kappa_from_table(&t, &[], &AgreementConfig::default());
        assert_eq!(clamped.value, 0.0);

        let cfg = AgreementConfig {
            clamp_negative: false,
            ..AgreementConfig::default()
        };
        let raw = cohens_kappa_from_table(&t, &[], &cfg);
        assert!((raw.value + 1.0).abs() < 1e-12);
        assert_eq!(raw.level, Some(AgreementLevel::Poor));
    }

    #[test]
    fn kappa_requires_exactly_two_coders() {
        let t = table(&[&[Some("a"), Some("a"), Some("a")]]);
        let result = cohens_kappa_from_table(&t, &[], &AgreementConfig::default());
        assert!(result.insufficient_data);
        assert_eq!(result.coders, 3);
    }

    #[test]
    fn missing_policy_skips_uncoded_pairs_in_percent_agreement() {
        let t = table(&[
            &[Some("a"), Some("a")],
            &[None, Some("a")],
            &[None, None],
            &[Some("b"), Some("a")],
        ]);
        let category = percent_agreement_from_table(&t, &AgreementConfig::default());
        assert!((category.value - 0.5).abs() < 1e-12);

        let cfg = AgreementConfig {
            treat_uncoded_as: Some(UncodedPolicy::Missing),
            ..AgreementConfig::default()
        };
        let missing = percent_agreement_from_table(&t, &cfg);
        assert!((missing.value - 0.5).abs() < 1e-12);
        assert_eq!(missing.units, 2);
        assert_eq!(missing.pairwise[0].comparisons, 2);
    }

    #[test]
    fn bootstrap_interval_brackets_point_estimate_and_is_reproducible() {
        let rows: Vec<&[Option<&str>]> = vec![
            &[Some("a"), Some("a")],
            &[Some("a"), Some("b")],
            &[Some("b"), Some("b")],
            &[Some("c"), Some("c")],
            &[Some("a"), Some("a")],
            &[Some("b"), Some("b")],
            &[Some("c"), Some("a")],
            &[Some("c"), Some("c")],
        ];
        let t = table(&rows);
        let cfg = AgreementConfig {
            bootstrap_samples: 200,
            ..AgreementConfig::default()
        };
        let first = krippendorff_alpha_from_table(&t, &cfg);
        let second = krippendorff_alpha_from_table(&t, &cfg);
        let ci = first.confidence_interval.clone().unwrap();
        assert_eq!(ci.method, IntervalMethod::Bootstrap);
        assert!(ci.lower <= first.value && first.value <= ci.upper);
        assert_eq!(first.confidence_interval, second.confidence_interval);
    }

    #[test]
    fn percentile_uses_nearest_rank() {
        let v = [0.1, 0.2, 0.3, 0.4, 0.5];
        assert_eq!(percentile(&v, 0.0), 0.1);
        assert_eq!(percentile(&v, 0.5), 0.3);
        assert_eq!(percentile(&v, 1.0), 0.5);
    }
}
