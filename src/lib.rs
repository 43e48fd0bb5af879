#![forbid(unsafe_code)]

//! # reliability-harness
//!
//! Reliability statistics for qualitative coding and rating scales.
//!
//! Two families of measures live here. Inter-coder agreement tiles coded
//! documents into fixed-width segments, assigns each coder one category per
//! segment, and scores consistency with percent agreement, Cohen's Kappa and
//! nominal Krippendorff's Alpha. Internal consistency computes Cronbach's
//! Alpha over a respondent-by-item response matrix, with item diagnostics and
//! a short-form optimizer that drops items to maximize alpha.
//!
//! Every coefficient is interpreted into a qualitative band with a color
//! token. Too little data is an `Ok` result flagged `insufficient_data`;
//! malformed input is a [`ValidationError`].

pub mod agreement;
pub mod config;
pub mod consistency;
pub mod error;
pub mod interpretation;
pub mod model;
pub mod optimizer;
pub mod report;
pub mod tiling;

pub use agreement::{
    agreement_summary, cohens_kappa, krippendorff_alpha, percent_agreement, AgreementSummary,
    ConfidenceInterval, Disagreement, IntervalMethod, Metric, PairwiseAgreement,
    ReliabilityResult, UncodedPolicy,
};
pub use config::{load_config_from_path, AgreementConfig, ConfigError, EngineConfig, ScaleConfig};
pub use consistency::{
    analyze_reliability, recode_reversed, Advisory, ItemStatistics, ResponseMatrix,
    ScaleAnalysis,
};
pub use error::ValidationError;
pub use interpretation::{interpret_coefficient, AgreementLevel, ConsistencyBand, Interpretation};
pub use model::{AgreementInput, CoderData, Coding, Document};
pub use optimizer::{
    classify_impact, find_optimal_subset, item_analysis, simulate_removal, Impact, ItemAnalysis,
    OptimalSubset, SearchStrategy, WhatIfResult,
};
pub use report::{build_report, render_report_markdown, ReliabilityReport};
pub use tiling::{build_assignments, tile, AssignmentTable, Segment, TieBreak};
