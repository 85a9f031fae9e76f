//! Column descriptors

use super::tags::Tag;
use crate::tensor::DType;
use serde::{Deserialize, Serialize};

/// Bounds on the number of values per row of a list column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCount {
    #[serde(default)]
    pub min: usize,
    pub max: usize,
}

impl ValueCount {
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Whether every row has the same number of values.
    pub fn is_fixed(&self) -> bool {
        self.min == self.max
    }
}

/// Describes one column: its name and semantic tags.
///
/// Only the name and tags drive transforms. `dtype`, `is_list` and
/// `value_count` are descriptive metadata: they are validated and reported
/// but never checked against batch tensors, and `value_count.max` does not
/// set the padded length.
///
/// Builder methods consume and return the column, so a descriptor never
/// changes once it is placed in a [`Schema`](super::Schema).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSchema {
    name: String,
    #[serde(default)]
    tags: Vec<Tag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dtype: Option<DType>,
    #[serde(default)]
    is_list: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value_count: Option<ValueCount>,
}

impl ColumnSchema {
    /// Create an untagged column.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: Vec::new(),
            dtype: None,
            is_list: false,
            value_count: None,
        }
    }

    /// Add tags, skipping ones already present.
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = Tag>) -> Self {
        for tag in tags {
            if !self.tags.contains(&tag) {
                self.tags.push(tag);
            }
        }
        self
    }

    pub fn with_dtype(mut self, dtype: DType) -> Self {
        self.dtype = Some(dtype);
        self
    }

    /// Mark the column as a list column with the given row-length bounds.
    pub fn with_value_count(mut self, min: usize, max: usize) -> Self {
        self.is_list = true;
        self.value_count = Some(ValueCount::new(min, max));
        self
    }

    pub fn with_list(mut self, is_list: bool) -> Self {
        self.is_list = is_list;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn dtype(&self) -> Option<DType> {
        self.dtype
    }

    pub fn is_list(&self) -> bool {
        self.is_list
    }

    pub fn value_count(&self) -> Option<ValueCount> {
        self.value_count
    }

    pub fn has_tag(&self, tag: &Tag) -> bool {
        self.tags.contains(tag)
    }

    /// Whether the column carries any of `tags`.
    pub fn has_any_tag(&self, tags: &[Tag]) -> bool {
        tags.iter().any(|t| self.has_tag(t))
    }

    /// Whether the column is a variable-length list (ragged when batched).
    pub fn is_ragged(&self) -> bool {
        self.is_list && !self.value_count.is_some_and(|vc| vc.is_fixed())
    }
}

impl From<&str> for ColumnSchema {
    fn from(name: &str) -> Self {
        ColumnSchema::new(name)
    }
}

impl From<String> for ColumnSchema {
    fn from(name: String) -> Self {
        ColumnSchema::new(name)
    }
}
