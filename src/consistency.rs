//! Internal consistency of multi-item rating scales.
//!
//! A [`ResponseMatrix`] holds raw responses (rows = respondents, columns =
//! items, `None` = missing). Every statistic runs on complete cases only: a
//! respondent missing any item that statistic uses is dropped from it, never
//! imputed. Alpha-if-deleted for item `i` therefore keeps respondents who
//! skipped only `i`. For the complete cases of an item subset `S` with
//! population covariance matrix `C`,
//!
//! ```text
//! α(S) = k/(k-1) · (1 - Σ_{i∈S} C_ii / Σ_{i,j∈S} C_ij)
//! ```
//!
//! since the population variance of a row sum equals the sum of the
//! covariances of its items.

use std::collections::HashSet;

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use tracing::debug;

use crate::config::ScaleConfig;
use crate::error::ValidationError;
use crate::interpretation::ConsistencyBand;

const TINY: f64 = 1e-12;

/// Unvalidated responses as read from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMatrixData {
    pub item_ids: Vec<String>,
    pub rows: Vec<Vec<Option<f64>>>,
}

/// Respondent × item response grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ResponseMatrixData")]
pub struct ResponseMatrix {
    item_ids: Vec<String>,
    rows: Vec<Vec<Option<f64>>>,
}

impl TryFrom<ResponseMatrixData> for ResponseMatrix {
    type Error = ValidationError;

    fn try_from(data: ResponseMatrixData) -> Result<Self, Self::Error> {
        ResponseMatrix::new(data.item_ids, data.rows)
    }
}

impl ResponseMatrix {
    pub fn new(
        item_ids: Vec<String>,
        rows: Vec<Vec<Option<f64>>>,
    ) -> Result<Self, ValidationError> {
        let mut seen = HashSet::new();
        for id in &item_ids {
            if !seen.insert(id.as_str()) {
                return Err(ValidationError::DuplicateItemId {
                    item_id: id.clone(),
                });
            }
        }
        for (r, row) in rows.iter().enumerate() {
            if row.len() != item_ids.len() {
                return Err(ValidationError::RaggedRow {
                    row: r,
                    expected: item_ids.len(),
                    got: row.len(),
                });
            }
            for (c, value) in row.iter().enumerate() {
                if matches!(value, Some(v) if !v.is_finite()) {
                    return Err(ValidationError::NonFiniteResponse {
                        row: r,
                        item_id: item_ids[c].clone(),
                    });
                }
            }
        }
        Ok(Self { item_ids, rows })
    }

    /// Build from a grid without missing values.
    pub fn from_complete(
        item_ids: Vec<String>,
        rows: Vec<Vec<f64>>,
    ) -> Result<Self, ValidationError> {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(Some).collect())
            .collect();
        Self::new(item_ids, rows)
    }

    pub fn item_ids(&self) -> &[String] {
        &self.item_ids
    }

    pub fn rows(&self) -> &[Vec<Option<f64>>] {
        &self.rows
    }

    pub fn respondent_count(&self) -> usize {
        self.rows.len()
    }

    pub fn item_count(&self) -> usize {
        self.item_ids.len()
    }

    pub fn item_index(&self, item_id: &str) -> Result<usize, ValidationError> {
        self.item_ids
            .iter()
            .position(|id| id == item_id)
            .ok_or_else(|| ValidationError::UnknownItemId {
                item_id: item_id.to_string(),
            })
    }

    fn column_indices(&self, item_ids: &[String]) -> Result<Vec<usize>, ValidationError> {
        let mut seen = HashSet::new();
        item_ids
            .iter()
            .map(|id| {
                if !seen.insert(id.as_str()) {
                    return Err(ValidationError::DuplicateItemId {
                        item_id: id.clone(),
                    });
                }
                self.item_index(id)
            })
            .collect()
    }
}

/// Reverse-score `reversed` items: `new = (scale_max + scale_min) - old`.
/// A recoded value outside `[scale_min, scale_max]` is rejected.
pub fn recode_reversed(
    matrix: &ResponseMatrix,
    reversed: &[String],
    scale_min: f64,
    scale_max: f64,
) -> Result<ResponseMatrix, ValidationError> {
    if !(scale_min < scale_max) {
        return Err(ValidationError::InvalidScaleBounds {
            min: scale_min,
            max: scale_max,
        });
    }
    let columns = matrix.column_indices(reversed)?;
    let mut rows = matrix.rows.clone();
    for (r, row) in rows.iter_mut().enumerate() {
        for &c in &columns {
            if let Some(v) = row[c].as_mut() {
                if *v < scale_min || *v > scale_max {
                    return Err(ValidationError::OutOfScaleRange {
                        row: r,
                        item_id: matrix.item_ids[c].clone(),
                        value: *v,
                        min: scale_min,
                        max: scale_max,
                    });
                }
                *v = (scale_max + scale_min) - *v;
            }
        }
    }
    Ok(ResponseMatrix {
        item_ids: matrix.item_ids.clone(),
        rows,
    })
}

/// Responses restricted to a fixed item set.
///
/// Subsets passed to the statistics below are indices into
/// [`item_ids`](Self::item_ids); each statistic listwise-deletes on its own
/// subset.
#[derive(Debug, Clone)]
pub struct ScaleData {
    item_ids: Vec<String>,
    /// `rows[respondent][item]`, columns in `item_ids` order.
    rows: Vec<Vec<Option<f64>>>,
}

impl ScaleData {
    /// Select `item_ids` from `matrix`. Item order follows `item_ids`.
    pub fn prepare(matrix: &ResponseMatrix, item_ids: &[String]) -> Result<Self, ValidationError> {
        let columns = matrix.column_indices(item_ids)?;
        let rows = matrix
            .rows
            .iter()
            .map(|row| columns.iter().map(|&c| row[c]).collect())
            .collect();
        Ok(Self {
            item_ids: item_ids.to_vec(),
            rows,
        })
    }

    pub fn item_ids(&self) -> &[String] {
        &self.item_ids
    }

    pub fn item_count(&self) -> usize {
        self.item_ids.len()
    }

    pub fn all_items(&self) -> Vec<usize> {
        (0..self.item_count()).collect()
    }

    pub fn total_respondents(&self) -> usize {
        self.rows.len()
    }

    /// Respondents with a value for every item of `subset`.
    pub fn respondents(&self, subset: &[usize]) -> usize {
        self.rows
            .iter()
            .filter(|row| subset.iter().all(|&i| row[i].is_some()))
            .count()
    }

    /// Respondents dropped from statistics over `subset`.
    pub fn excluded(&self, subset: &[usize]) -> usize {
        self.total_respondents() - self.respondents(subset)
    }

    /// Complete cases on `subset` as an `n × subset.len()` matrix, columns in
    /// `subset` order.
    fn complete_cases(&self, subset: &[usize]) -> DMatrix<f64> {
        let complete: Vec<Vec<f64>> = self
            .rows
            .iter()
            .filter_map(|row| subset.iter().map(|&i| row[i]).collect::<Option<Vec<f64>>>())
            .collect();
        let flat: Vec<f64> = complete.iter().flatten().copied().collect();
        DMatrix::from_row_slice(complete.len(), subset.len(), &flat)
    }

    /// Unclamped alpha of `subset`; 0 when it has fewer than two items or
    /// the total score has no variance.
    pub fn raw_alpha(&self, subset: &[usize]) -> f64 {
        let k = subset.len();
        if k < 2 {
            return 0.0;
        }
        let covariance = population_covariance(&self.complete_cases(subset));
        let item_var = covariance.trace();
        let total_var = covariance.sum();
        if total_var <= TINY {
            return 0.0;
        }
        let k = k as f64;
        (k / (k - 1.0)) * (1.0 - item_var / total_var)
    }

    /// Cronbach's Alpha of `subset`, clamped to [0, 1].
    pub fn alpha(&self, subset: &[usize]) -> f64 {
        self.raw_alpha(subset).clamp(0.0, 1.0)
    }

    /// Pearson correlation of `item` with the sum of the other items of
    /// `subset`, over respondents complete on `subset`. 0 when either side
    /// has no variance or `item` is not in `subset`.
    pub fn item_total_correlation(&self, item: usize, subset: &[usize]) -> f64 {
        let Some(pos) = subset.iter().position(|&i| i == item) else {
            return 0.0;
        };
        let data = self.complete_cases(subset);
        let x: Vec<f64> = data.column(pos).iter().copied().collect();
        let rest: Vec<f64> = data
            .row_iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter(|&(p, _)| p != pos)
                    .map(|(_, v)| *v)
                    .sum::<f64>()
            })
            .collect();
        pearson(&x, &rest)
    }
}

fn population_covariance(data: &DMatrix<f64>) -> DMatrix<f64> {
    let (n, k) = data.shape();
    if n == 0 {
        return DMatrix::zeros(k, k);
    }
    let means = data.row_mean();
    let centered = DMatrix::from_fn(n, k, |r, c| data[(r, c)] - means[c]);
    (centered.transpose() * &centered) / n as f64
}

fn pearson(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.len() < 2 {
        return 0.0;
    }
    let var_x = x.iter().population_variance();
    let var_y = y.iter().population_variance();
    if !(var_x > TINY && var_y > TINY) {
        return 0.0;
    }
    let cov = x.iter().population_covariance(y.iter());
    (cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemStatistics {
    pub item_id: String,
    pub item_total_correlation: f64,
    pub alpha_if_deleted: f64,
    pub should_delete: bool,
}

/// Recommendations that accompany an analysis without invalidating it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    /// Alpha is high enough that some items are probably redundant.
    Redundancy { alpha: f64, threshold: f64 },
    /// Item moves against the rest of the scale; often an un-recoded
    /// reversed item.
    NegativeCorrelation { item_id: String, correlation: f64 },
    /// Respondents dropped for missing responses.
    ExcludedRespondents { excluded: usize, total: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleAnalysis {
    pub cronbach_alpha: f64,
    pub interpretation: ConsistencyBand,
    pub label: String,
    pub color_token: String,
    pub insufficient_data: bool,
    pub respondents_used: usize,
    pub respondents_excluded: usize,
    pub items: Vec<ItemStatistics>,
    #[serde(default)]
    pub advisories: Vec<Advisory>,
}

impl ScaleAnalysis {
    pub fn item_ids(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.item_id.as_str()).collect()
    }

    pub fn item_total_correlations(&self) -> Vec<f64> {
        self.items.iter().map(|i| i.item_total_correlation).collect()
    }

    pub fn alpha_if_deleted(&self) -> Vec<f64> {
        self.items.iter().map(|i| i.alpha_if_deleted).collect()
    }

    pub fn item(&self, item_id: &str) -> Option<&ItemStatistics> {
        self.items.iter().find(|i| i.item_id == item_id)
    }

    /// Items whose deletion would raise alpha by more than the threshold.
    pub fn deletion_candidates(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter(|i| i.should_delete)
            .map(|i| i.item_id.as_str())
            .collect()
    }
}

/// Cronbach's Alpha with per-item diagnostics for `item_ids` of `matrix`.
pub fn analyze_reliability(
    matrix: &ResponseMatrix,
    item_ids: &[String],
    cfg: &ScaleConfig,
) -> Result<ScaleAnalysis, ValidationError> {
    let scale = ScaleData::prepare(matrix, item_ids)?;
    Ok(analyze_subset(&scale, &scale.all_items(), cfg))
}

pub(crate) fn analyze_subset(scale: &ScaleData, subset: &[usize], cfg: &ScaleConfig) -> ScaleAnalysis {
    let n = scale.respondents(subset);
    let excluded = scale.excluded(subset);
    let mut advisories = Vec::new();
    if excluded > 0 {
        debug!(
            excluded,
            total = scale.total_respondents(),
            "excluded respondents with missing responses"
        );
        advisories.push(Advisory::ExcludedRespondents {
            excluded,
            total: scale.total_respondents(),
        });
    }

    if subset.len() < 2 || n < cfg.min_respondents {
        debug!(
            items = subset.len(),
            respondents = n,
            "insufficient data for Cronbach's alpha"
        );
        let band = ConsistencyBand::InsufficientData;
        return ScaleAnalysis {
            cronbach_alpha: 0.0,
            interpretation: band,
            label: band.label().to_string(),
            color_token: band.color_token().to_string(),
            insufficient_data: true,
            respondents_used: n,
            respondents_excluded: excluded,
            items: Vec::new(),
            advisories,
        };
    }

    let alpha = scale.alpha(subset);
    let items: Vec<ItemStatistics> = subset
        .iter()
        .map(|&i| {
            let others: Vec<usize> = subset.iter().copied().filter(|&j| j != i).collect();
            let alpha_if_deleted = scale.alpha(&others);
            ItemStatistics {
                item_id: scale.item_ids()[i].clone(),
                item_total_correlation: scale.item_total_correlation(i, subset),
                alpha_if_deleted,
                should_delete: alpha_if_deleted > alpha + cfg.delete_threshold,
            }
        })
        .collect();

    for item in &items {
        if item.item_total_correlation < 0.0 {
            advisories.push(Advisory::NegativeCorrelation {
                item_id: item.item_id.clone(),
                correlation: item.item_total_correlation,
            });
        }
    }
    if alpha > cfg.redundancy_threshold {
        advisories.push(Advisory::Redundancy {
            alpha,
            threshold: cfg.redundancy_threshold,
        });
    }

    let band = ConsistencyBand::from_alpha(alpha);
    ScaleAnalysis {
        cronbach_alpha: alpha,
        interpretation: band,
        label: band.label().to_string(),
        color_token: band.color_token().to_string(),
        insufficient_data: false,
        respondents_used: n,
        respondents_excluded: excluded,
        items,
        advisories,
    }
}
