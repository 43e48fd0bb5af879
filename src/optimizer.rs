//! Short-form scale derivation and item-removal simulation.
//!
//! The default search is greedy backward elimination: starting from the full
//! item set, repeatedly drop the item whose removal leaves the highest alpha.
//! Each step evaluates every remaining item, so reducing `k` items costs
//! `O(k²)` alpha evaluations. Greedy elimination can miss the best subset of
//! a given size; [`SearchStrategy::Exhaustive`] checks every subset instead
//! and is limited to small scales.
//!
//! Each candidate subset is scored over the respondents complete on that
//! subset (see [`ScaleData`]), so a reported alpha always matches a direct
//! analysis of the kept items.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ScaleConfig;
use crate::consistency::{analyze_subset, ResponseMatrix, ScaleAnalysis, ScaleData};
use crate::error::ValidationError;
use crate::interpretation::ConsistencyBand;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
    #[default]
    Greedy,
    Exhaustive,
}

/// How an item affects the scale's alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    /// Removing the item lowers alpha: the item is valuable.
    Positive,
    /// Removing the item raises alpha: the item is problematic.
    Negative,
    Neutral,
}

pub fn classify_impact(alpha_if_deleted: f64, base_alpha: f64, threshold: f64) -> Impact {
    if alpha_if_deleted > base_alpha + threshold {
        Impact::Negative
    } else if alpha_if_deleted < base_alpha - threshold {
        Impact::Positive
    } else {
        Impact::Neutral
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemAnalysis {
    pub item_id: String,
    pub item_total_correlation: f64,
    pub alpha_if_deleted: f64,
    pub impact: Impact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EliminationStep {
    pub removed_id: String,
    pub alpha_after: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimalSubset {
    pub item_ids: Vec<String>,
    pub alpha: f64,
    pub original_alpha: f64,
    /// Dropped items; in elimination order for greedy search.
    pub removed_ids: Vec<String>,
    pub steps: Vec<EliminationStep>,
    /// Strategy actually used, after any fallback.
    pub strategy: SearchStrategy,
    pub insufficient_data: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhatIfResult {
    pub alpha_before: f64,
    pub alpha_after: f64,
    pub delta: f64,
    pub band_before: ConsistencyBand,
    pub band_after: ConsistencyBand,
    pub remaining_ids: Vec<String>,
    pub removed_ids: Vec<String>,
    /// Item analysis of the remaining set, classified against `alpha_after`.
    pub items: Vec<ItemAnalysis>,
}

/// Per-item correlation, alpha-if-deleted and impact for `item_ids`.
pub fn item_analysis(
    matrix: &ResponseMatrix,
    item_ids: &[String],
    cfg: &ScaleConfig,
) -> Result<Vec<ItemAnalysis>, ValidationError> {
    let scale = ScaleData::prepare(matrix, item_ids)?;
    Ok(analyze_items(&scale, &scale.all_items(), cfg).1)
}

fn analyze_items(
    scale: &ScaleData,
    subset: &[usize],
    cfg: &ScaleConfig,
) -> (ScaleAnalysis, Vec<ItemAnalysis>) {
    let analysis = analyze_subset(scale, subset, cfg);
    let items = analysis
        .items
        .iter()
        .map(|item| ItemAnalysis {
            item_id: item.item_id.clone(),
            item_total_correlation: item.item_total_correlation,
            alpha_if_deleted: item.alpha_if_deleted,
            impact: classify_impact(
                item.alpha_if_deleted,
                analysis.cronbach_alpha,
                cfg.impact_threshold,
            ),
        })
        .collect();
    (analysis, items)
}

/// Alpha of the scale with `removed` items taken out, next to the current
/// alpha.
pub fn simulate_removal(
    matrix: &ResponseMatrix,
    item_ids: &[String],
    removed: &[String],
    cfg: &ScaleConfig,
) -> Result<WhatIfResult, ValidationError> {
    let scale = ScaleData::prepare(matrix, item_ids)?;
    for id in removed {
        if !item_ids.contains(id) {
            return Err(ValidationError::UnknownItemId {
                item_id: id.clone(),
            });
        }
    }

    let all = scale.all_items();
    let remaining: Vec<usize> = all
        .iter()
        .copied()
        .filter(|&i| !removed.contains(&item_ids[i]))
        .collect();

    let before = analyze_subset(&scale, &all, cfg);
    let (after, items) = analyze_items(&scale, &remaining, cfg);

    Ok(WhatIfResult {
        alpha_before: before.cronbach_alpha,
        alpha_after: after.cronbach_alpha,
        delta: after.cronbach_alpha - before.cronbach_alpha,
        band_before: before.interpretation,
        band_after: after.interpretation,
        remaining_ids: remaining.iter().map(|&i| item_ids[i].clone()).collect(),
        removed_ids: all
            .iter()
            .filter(|i| !remaining.contains(i))
            .map(|&i| item_ids[i].clone())
            .collect(),
        items,
    })
}

/// Select `target_count` items (at least 2) maximizing Cronbach's Alpha.
pub fn find_optimal_subset(
    matrix: &ResponseMatrix,
    item_ids: &[String],
    target_count: usize,
    cfg: &ScaleConfig,
) -> Result<OptimalSubset, ValidationError> {
    let scale = ScaleData::prepare(matrix, item_ids)?;
    let all = scale.all_items();
    let k = all.len();
    let original_alpha = scale.alpha(&all);
    let target = target_count.max(2);

    let identity = |strategy, insufficient_data| OptimalSubset {
        item_ids: item_ids.to_vec(),
        alpha: original_alpha,
        original_alpha,
        removed_ids: Vec::new(),
        steps: Vec::new(),
        strategy,
        insufficient_data,
    };

    if k < 2 || scale.respondents(&all) < cfg.min_respondents {
        debug!(
            items = k,
            respondents = scale.respondents(&all),
            "insufficient data for scale optimization"
        );
        return Ok(identity(cfg.strategy, true));
    }
    if target >= k {
        return Ok(identity(cfg.strategy, false));
    }

    let strategy = match cfg.strategy {
        SearchStrategy::Exhaustive if k > cfg.exhaustive_max_items => {
            warn!(
                items = k,
                max = cfg.exhaustive_max_items,
                "scale too large for exhaustive search; using greedy elimination"
            );
            SearchStrategy::Greedy
        }
        s => s,
    };

    let (kept, steps) = match strategy {
        SearchStrategy::Greedy => greedy_elimination(&scale, all.clone(), target, cfg),
        SearchStrategy::Exhaustive => (exhaustive_search(&scale, k, target, cfg), Vec::new()),
    };

    let removed_ids = if steps.is_empty() {
        all.iter()
            .filter(|i| !kept.contains(i))
            .map(|&i| item_ids[i].clone())
            .collect()
    } else {
        steps.iter().map(|s| s.removed_id.clone()).collect()
    };

    let alpha = scale.alpha(&kept);
    debug!(
        ?strategy,
        from = k,
        to = kept.len(),
        original_alpha,
        alpha,
        "optimized scale"
    );

    Ok(OptimalSubset {
        item_ids: kept.iter().map(|&i| item_ids[i].clone()).collect(),
        alpha,
        original_alpha,
        removed_ids,
        steps,
        strategy,
        insufficient_data: false,
    })
}

fn selection_score(scale: &ScaleData, subset: &[usize], cfg: &ScaleConfig) -> f64 {
    if cfg.rank_by_raw_alpha {
        scale.raw_alpha(subset)
    } else {
        scale.alpha(subset)
    }
}

fn greedy_elimination(
    scale: &ScaleData,
    mut current: Vec<usize>,
    target: usize,
    cfg: &ScaleConfig,
) -> (Vec<usize>, Vec<EliminationStep>) {
    let mut steps = Vec::new();
    while current.len() > target && current.len() > 2 {
        // Ties keep the earliest item.
        let mut best: Option<(usize, f64)> = None;
        for pos in 0..current.len() {
            let candidate: Vec<usize> = current
                .iter()
                .enumerate()
                .filter(|&(p, _)| p != pos)
                .map(|(_, &i)| i)
                .collect();
            let alpha = selection_score(scale, &candidate, cfg);
            if best.map_or(true, |(_, best_alpha)| alpha > best_alpha) {
                best = Some((pos, alpha));
            }
        }
        let Some((pos, _)) = best else {
            break;
        };
        let removed = current.remove(pos);
        steps.push(EliminationStep {
            removed_id: scale.item_ids()[removed].clone(),
            alpha_after: scale.alpha(&current),
        });
    }
    (current, steps)
}

fn exhaustive_search(scale: &ScaleData, k: usize, target: usize, cfg: &ScaleConfig) -> Vec<usize> {
    let mut best: Option<(Vec<usize>, f64)> = None;
    for_each_combination(k, target, |subset| {
        let alpha = selection_score(scale, subset, cfg);
        if best.as_ref().map_or(true, |(_, best_alpha)| alpha > *best_alpha) {
            best = Some((subset.to_vec(), alpha));
        }
    });
    best.map(|(subset, _)| subset)
        .unwrap_or_else(|| (0..target.min(k)).collect())
}

/// Visit every `r`-subset of `0..n` in lexicographic order.
fn for_each_combination(n: usize, r: usize, mut visit: impl FnMut(&[usize])) {
    if r > n {
        return;
    }
    let mut idx: Vec<usize> = (0..r).collect();
    loop {
        visit(&idx);
        // Rightmost position that can still advance.
        let Some(pos) = (0..r).rev().find(|&p| idx[p] < n - r + p) else {
            return;
        };
        idx[pos] += 1;
        for p in (pos + 1)..r {
            idx[p] = idx[p - 1] + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_impact_uses_symmetric_band() {
        assert_eq!(classify_impact(0.82, 0.80, 0.01), Impact::Negative);
        assert_eq!(classify_impact(0.78, 0.80, 0.01), Impact::Positive);
        assert_eq!(classify_impact(0.805, 0.80, 0.01), Impact::Neutral);
        assert_eq!(classify_impact(0.81, 0.80, 0.02), Impact::Neutral);
    }

    #[test]
    fn combinations_are_lexicographic_and_complete() {
        let mut seen = Vec::new();
        for_each_combination(4, 2, |c| seen.push(c.to_vec()));
        assert_eq!(
            seen,
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3]
            ]
        );

        let mut count = 0;
        for_each_combination(6, 6, |_| count += 1);
        assert_eq!(count, 1);
        for_each_combination(2, 3, |_| count += 1);
        assert_eq!(count, 1);
    }
}
