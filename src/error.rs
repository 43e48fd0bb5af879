//! Boundary validation errors.
//!
//! Expected edge cases (too few coders, items or respondents) are not errors:
//! the engines return an insufficient-data result for those. The variants
//! here describe malformed input that must be rejected before any statistic
//! is computed.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("tile width must be positive")]
    ZeroTileWidth,
    #[error("duplicate document id: {document_id}")]
    DuplicateDocumentId { document_id: String },
    #[error("duplicate coder id: {coder_id}")]
    DuplicateCoderId { coder_id: String },
    #[error("coding {coding_id} has inverted range {start}..{end}")]
    InvertedRange {
        coding_id: String,
        start: usize,
        end: usize,
    },
    #[error(
        "coding {coding_id} ends at {end} but document {document_id} has only {len} characters"
    )]
    OffsetOutOfBounds {
        coding_id: String,
        document_id: String,
        end: usize,
        len: usize,
    },
    #[error("response matrix row {row} has {got} values, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        got: usize,
    },
    #[error("non-finite response at row {row}, item {item_id}")]
    NonFiniteResponse { row: usize, item_id: String },
    #[error("duplicate item id: {item_id}")]
    DuplicateItemId { item_id: String },
    #[error("unknown item id: {item_id}")]
    UnknownItemId { item_id: String },
    #[error("invalid scale bounds: min {min} must be below max {max}")]
    InvalidScaleBounds { min: f64, max: f64 },
    #[error("response {value} at row {row}, item {item_id} is outside the scale {min}..={max}")]
    OutOfScaleRange {
        row: usize,
        item_id: String,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("invalid agreement config: {0}")]
    InvalidConfig(String),
}
