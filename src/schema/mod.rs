//! Tagged column schemas
//!
//! A [`Schema`] is an ordered, immutable collection of [`ColumnSchema`]
//! descriptors. Transforms consult it only to classify features by role
//! (sequence vs. context) through [`Tag`]s or explicit [`Selection`]s.
//!
//! # Example
//!
//! ```
//! use recomendar::schema::{ColumnSchema, Schema, Tag};
//!
//! let schema = Schema::new(vec![
//!     ColumnSchema::new("item_ids").with_tags([Tag::Sequence, Tag::ItemId]),
//!     ColumnSchema::new("user_age").with_tags([Tag::Context]),
//! ])
//! .unwrap();
//!
//! assert_eq!(schema.select_by_tag(&[Tag::Sequence]).column_names().collect::<Vec<_>>(), ["item_ids"]);
//! ```

mod column;
mod selection;
mod tags;


pub use column::{ColumnSchema, ValueCount};
pub use selection::Selection;
pub use tags::Tag;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Ordered collection of uniquely named columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    columns: Vec<ColumnSchema>,
}

impl Schema {
    /// Create a schema from column descriptors.
    ///
    /// # Errors
    ///
    /// Returns an error if two columns share a name or a name is empty.
    pub fn new(columns: Vec<ColumnSchema>) -> Result<Self> {
        for (i, col) in columns.iter().enumerate() {
            if col.name().is_empty() {
                return Err(Error::ConfigError("Column names cannot be empty".into()));
            }
            if columns[..i].iter().any(|c| c.name() == col.name()) {
                return Err(Error::ConfigError(format!(
                    "Duplicate column name: {}",
                    col.name()
                )));
            }
        }
        Ok(Self { columns })
    }

    /// Create an untagged schema from column names.
    ///
    /// # Errors
    ///
    /// Same as [`Schema::new`].
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        Self::new(
            names
                .iter()
                .map(|n| ColumnSchema::new(n.as_ref()))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names in schema order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(ColumnSchema::name)
    }

    pub fn get(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnSchema> {
        self.columns.iter()
    }

    /// Columns carrying any of `tags`.
    pub fn select_by_tag(&self, tags: &[Tag]) -> Schema {
        self.filtered(|c| c.has_any_tag(tags))
    }

    /// Columns whose name is in `names`, in schema order.
    pub fn select_by_name<S: AsRef<str>>(&self, names: &[S]) -> Schema {
        self.filtered(|c| names.iter().any(|n| n.as_ref() == c.name()))
    }

    /// Columns carrying none of `tags`.
    pub fn remove_by_tag(&self, tags: &[Tag]) -> Schema {
        self.filtered(|c| !c.has_any_tag(tags))
    }

    /// Columns whose name is not in `names`.
    pub fn remove_by_name<S: AsRef<str>>(&self, names: &[S]) -> Schema {
        self.filtered(|c| !names.iter().any(|n| n.as_ref() == c.name()))
    }

    fn filtered(&self, keep: impl Fn(&ColumnSchema) -> bool) -> Schema {
        Schema {
            columns: self.columns.iter().filter(|c| keep(c)).cloned().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a ColumnSchema;
    type IntoIter = std::slice::Iter<'a, ColumnSchema>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}
