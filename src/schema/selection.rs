//! Tag- or name-based column selection

use super::tags::Tag;
use super::Schema;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Which columns of a schema a transform operates on.
///
/// A selection is resolved lazily against the full input schema, so the
/// same configuration can be reused across datasets that share tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    /// Every column carrying any of these tags
    Tags(Vec<Tag>),
    /// Columns with exactly these names
    Names(Vec<String>),
    /// Columns named by another schema
    Columns(Schema),
}

impl Selection {
    /// Resolve against `schema`, returning the selected columns in the
    /// schema's own order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingFeature`] if a name-based selection refers to a
    /// column that `schema` does not contain.
    pub fn resolve(&self, schema: &Schema) -> Result<Schema> {
        match self {
            Selection::Tags(tags) => Ok(schema.select_by_tag(tags)),
            Selection::Names(names) => resolve_names(schema, names.iter().map(String::as_str)),
            Selection::Columns(columns) => resolve_names(schema, columns.column_names()),
        }
    }

    /// Whether the selection can never match anything.
    pub fn is_empty(&self) -> bool {
        match self {
            Selection::Tags(tags) => tags.is_empty(),
            Selection::Names(names) => names.is_empty(),
            Selection::Columns(columns) => columns.is_empty(),
        }
    }
}

fn resolve_names<'a>(schema: &Schema, names: impl IntoIterator<Item = &'a str>) -> Result<Schema> {
    let names: Vec<&str> = names.into_iter().collect();
    if let Some(missing) = names.iter().find(|n| !schema.contains(n)) {
        return Err(Error::MissingFeature((*missing).to_string()));
    }
    Ok(schema.select_by_name(names.as_slice()))
}

impl From<Tag> for Selection {
    fn from(tag: Tag) -> Self {
        Selection::Tags(vec![tag])
    }
}

impl From<Vec<Tag>> for Selection {
    fn from(tags: Vec<Tag>) -> Self {
        Selection::Tags(tags)
    }
}

impl From<Schema> for Selection {
    fn from(schema: Schema) -> Self {
        Selection::Columns(schema)
    }
}

impl From<&[&str]> for Selection {
    fn from(names: &[&str]) -> Self {
        Selection::Names(names.iter().map(|n| (*n).to_string()).collect())
    }
}
