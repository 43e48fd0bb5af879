//! Input data model shared by the agreement and consistency engines.
//!
//! These types are owned by the surrounding application (storage, upload,
//! coding UI); the engine only reads them.

use serde::{Deserialize, Serialize};

/// A source text that coders annotated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    /// Display name used in disagreement listings. Falls back to `id`.
    #[serde(default)]
    pub name: Option<String>,
    pub content: String,
}

impl Document {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            content: content.into(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// Content length in characters. Offsets and segments count `char`s.
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    /// Characters `[start, end)` of the content, clamped to its length.
    pub fn slice_chars(&self, start: usize, end: usize) -> String {
        self.content
            .chars()
            .skip(start)
            .take(end.saturating_sub(start))
            .collect()
    }
}

/// One coder's application of one code to a half-open character range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coding {
    pub id: String,
    pub document_id: String,
    pub code_id: String,
    pub coder_id: String,
    pub start_offset: usize,
    pub end_offset: usize,
    #[serde(default)]
    pub selected_text: Option<String>,
}

impl Coding {
    pub fn new(
        id: impl Into<String>,
        document_id: impl Into<String>,
        code_id: impl Into<String>,
        coder_id: impl Into<String>,
        start_offset: usize,
        end_offset: usize,
    ) -> Self {
        Self {
            id: id.into(),
            document_id: document_id.into(),
            code_id: code_id.into(),
            coder_id: coder_id.into(),
            start_offset,
            end_offset,
            selected_text: None,
        }
    }

    /// Whether `[start_offset, end_offset)` intersects `[start, end)`.
    pub fn intersects(&self, start: usize, end: usize) -> bool {
        self.start_offset < end && start < self.end_offset
    }

    /// Number of characters shared with `[start, end)`.
    pub fn overlap_len(&self, start: usize, end: usize) -> usize {
        let lo = self.start_offset.max(start);
        let hi = self.end_offset.min(end);
        hi.saturating_sub(lo)
    }
}

/// One coder's full annotation set; the unit of comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoderData {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub codings: Vec<Coding>,
}

impl CoderData {
    pub fn new(id: impl Into<String>, name: impl Into<String>, codings: Vec<Coding>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            codings,
        }
    }
}

/// Documents plus the coders to compare over them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AgreementInput {
    pub documents: Vec<Document>,
    pub coders: Vec<CoderData>,
}
