//! Segment tiling and per-coder category resolution.
//!
//! Documents are cut into fixed-width, non-overlapping character windows
//! (segments). Each coder's span annotations are reduced to one category per
//! segment, which turns free-form codings into categorical judgments that
//! can be compared across coders.
//!
//! # Tie-break
//!
//! A coder may have several codings overlapping one segment. Only one of them
//! becomes the segment's category, chosen by [`TieBreak`]:
//!
//! - `FirstInStorageOrder` (default): the first intersecting coding in the
//!   order the coder's codings were supplied. Overlap size is ignored.
//! - `LargestOverlap`: the coding sharing the most characters with the
//!   segment; equal overlaps fall back to storage order.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{AgreementConfig, ConfigError};
use crate::error::ValidationError;
use crate::model::{CoderData, Coding, Document};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    #[default]
    FirstInStorageOrder,
    LargestOverlap,
}

/// A `[start, end)` character window of one document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Segment {
    pub document_id: String,
    pub start: usize,
    pub end: usize,
}

impl Segment {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Tile a document into consecutive windows of `tile_width` characters.
///
/// The last segment may be shorter. Empty content (or a zero width) yields
/// no segments.
pub fn tile(document: &Document, tile_width: usize) -> Vec<Segment> {
    let len = document.char_len();
    if tile_width == 0 || len == 0 {
        return Vec::new();
    }
    (0..len)
        .step_by(tile_width)
        .map(|start| Segment {
            document_id: document.id.clone(),
            start,
            end: (start + tile_width).min(len),
        })
        .collect()
}

/// Category a coder assigned to `segment`, or `None` when no coding of that
/// document intersects it.
pub fn resolve_category<'a>(
    codings: &'a [Coding],
    segment: &Segment,
    tie_break: TieBreak,
) -> Option<&'a str> {
    resolve_among(
        codings
            .iter()
            .filter(|c| c.document_id == segment.document_id),
        segment,
        tie_break,
    )
}

fn resolve_among<'a, I>(codings: I, segment: &Segment, tie_break: TieBreak) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a Coding>,
{
    let mut hits = codings
        .into_iter()
        .filter(|c| c.intersects(segment.start, segment.end));
    match tie_break {
        TieBreak::FirstInStorageOrder => hits.next().map(|c| c.code_id.as_str()),
        TieBreak::LargestOverlap => {
            let mut best: Option<(&Coding, usize)> = None;
            for c in hits {
                let overlap = c.overlap_len(segment.start, segment.end);
                match best {
                    Some((_, best_overlap)) if best_overlap >= overlap => {}
                    _ => best = Some((c, overlap)),
                }
            }
            best.map(|(c, _)| c.code_id.as_str())
        }
    }
}

/// Categorical judgments of every coder over one shared tiling.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentTable {
    pub segments: Vec<Segment>,
    pub coder_ids: Vec<String>,
    pub coder_names: Vec<String>,
    /// `categories[segment][coder]`; `None` means the coder left the segment
    /// uncoded.
    pub categories: Vec<Vec<Option<String>>>,
}

impl AssignmentTable {
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn coder_count(&self) -> usize {
        self.coder_ids.len()
    }

    pub fn column(&self, coder: usize) -> impl Iterator<Item = Option<&str>> + '_ {
        self.categories.iter().map(move |row| row[coder].as_deref())
    }
}

/// Reject malformed agreement input before any statistic is computed.
pub fn validate_agreement_input(
    coders: &[CoderData],
    documents: &[Document],
    tile_width: usize,
) -> Result<(), ValidationError> {
    if tile_width == 0 {
        return Err(ValidationError::ZeroTileWidth);
    }

    let mut doc_lens: HashMap<&str, usize> = HashMap::new();
    for doc in documents {
        if doc_lens.insert(doc.id.as_str(), doc.char_len()).is_some() {
            return Err(ValidationError::DuplicateDocumentId {
                document_id: doc.id.clone(),
            });
        }
    }

    let mut seen_coders = HashSet::new();
    for coder in coders {
        if !seen_coders.insert(coder.id.as_str()) {
            return Err(ValidationError::DuplicateCoderId {
                coder_id: coder.id.clone(),
            });
        }
        for coding in &coder.codings {
            if coding.start_offset > coding.end_offset {
                return Err(ValidationError::InvertedRange {
                    coding_id: coding.id.clone(),
                    start: coding.start_offset,
                    end: coding.end_offset,
                });
            }
            if let Some(&len) = doc_lens.get(coding.document_id.as_str()) {
                if coding.end_offset > len {
                    return Err(ValidationError::OffsetOutOfBounds {
                        coding_id: coding.id.clone(),
                        document_id: coding.document_id.clone(),
                        end: coding.end_offset,
                        len,
                    });
                }
            }
        }
    }
    Ok(())
}

/// Tile every document once and resolve each coder's category per segment.
///
/// Codings that reference a document outside `documents` are ignored.
pub fn build_assignments(
    coders: &[CoderData],
    documents: &[Document],
    cfg: &AgreementConfig,
) -> Result<AssignmentTable, ValidationError> {
    validate_agreement_input(coders, documents, cfg.tile_width)?;
    cfg.validate().map_err(|err| match err {
        ConfigError::Invalid(reason) => ValidationError::InvalidConfig(reason),
        other => ValidationError::InvalidConfig(other.to_string()),
    })?;

    let known: HashSet<&str> = documents.iter().map(|d| d.id.as_str()).collect();

    // Per coder, codings grouped by document in storage order.
    let by_doc: Vec<HashMap<&str, Vec<&Coding>>> = coders
        .iter()
        .map(|coder| {
            let mut grouped: HashMap<&str, Vec<&Coding>> = HashMap::new();
            for coding in &coder.codings {
                if !known.contains(coding.document_id.as_str()) {
                    debug!(
                        coder = %coder.id,
                        coding = %coding.id,
                        document = %coding.document_id,
                        "skipping coding for document outside the analysis"
                    );
                    continue;
                }
                grouped
                    .entry(coding.document_id.as_str())
                    .or_default()
                    .push(coding);
            }
            grouped
        })
        .collect();

    let mut segments = Vec::new();
    let mut categories = Vec::new();
    for doc in documents {
        for segment in tile(doc, cfg.tile_width) {
            let row = by_doc
                .iter()
                .map(|grouped| {
                    grouped.get(doc.id.as_str()).and_then(|codings| {
                        resolve_among(codings.iter().copied(), &segment, cfg.tie_break)
                            .map(str::to_string)
                    })
                })
                .collect();
            categories.push(row);
            segments.push(segment);
        }
    }

    debug!(
        segments = segments.len(),
        coders = coders.len(),
        tile_width = cfg.tile_width,
        "built assignment table"
    );

    Ok(AssignmentTable {
        segments,
        coder_ids: coders.iter().map(|c| c.id.clone()).collect(),
        coder_names: coders.iter().map(|c| c.name.clone()).collect(),
        categories,
    })
}
