//! Configuration validation logic

use super::error::ValidationError;
use crate::config::schema::TransformSpec;
use crate::schema::{Schema, Selection};
use std::collections::HashSet;

/// Validate a transform specification
///
/// Checks:
/// - The schema is non-empty with unique, non-empty column names
/// - Numeric values are in valid ranges
/// - Selections refer to existing columns
/// - Broadcast and sequence selections do not overlap
pub fn validate_config(spec: &TransformSpec) -> Result<(), ValidationError> {
    let schema = &spec.schema;
    if schema.is_empty() {
        return Err(ValidationError::EmptySchema);
    }

    // Deserialized schemas bypass Schema::new, so uniqueness is checked here
    let mut seen = HashSet::new();
    for column in schema.iter() {
        if column.name().is_empty() {
            return Err(ValidationError::EmptyColumnName);
        }
        if !seen.insert(column.name()) {
            return Err(ValidationError::DuplicateColumn(column.name().to_string()));
        }
        if let Some(count) = column.value_count() {
            if count.min > count.max {
                return Err(ValidationError::InvalidValueCount {
                    column: column.name().to_string(),
                    min: count.min,
                    max: count.max,
                });
            }
        }
    }

    if let Some(max_len) = spec.padding.max_sequence_length {
        if max_len == 0 {
            return Err(ValidationError::InvalidMaxSequenceLength(max_len));
        }
    }

    if !spec.padding.pad_value.is_finite() {
        return Err(ValidationError::InvalidPadValue(spec.padding.pad_value));
    }

    check_names(schema, &spec.padding.sequence, "padding.sequence")?;

    if let Some(broadcast) = &spec.broadcast {
        if broadcast.to_broadcast.is_empty() {
            return Err(ValidationError::EmptySelection("broadcast.to_broadcast"));
        }
        if broadcast.sequence.is_empty() {
            return Err(ValidationError::EmptySelection("broadcast.sequence"));
        }
        check_names(schema, &broadcast.to_broadcast, "broadcast.to_broadcast")?;
        check_names(schema, &broadcast.sequence, "broadcast.sequence")?;

        let to_broadcast = selected_names(schema, &broadcast.to_broadcast);
        let sequence = selected_names(schema, &broadcast.sequence);
        let overlap: Vec<&str> = to_broadcast
            .iter()
            .filter(|name| sequence.contains(name))
            .map(String::as_str)
            .collect();
        if !overlap.is_empty() {
            return Err(ValidationError::OverlappingBroadcast(overlap.join(", ")));
        }
    }

    Ok(())
}

fn check_names(
    schema: &Schema,
    selection: &Selection,
    label: &'static str,
) -> Result<(), ValidationError> {
    let names: Vec<&str> = match selection {
        Selection::Tags(_) => return Ok(()),
        Selection::Names(names) => names.iter().map(String::as_str).collect(),
        Selection::Columns(columns) => columns.column_names().collect(),
    };
    match names.into_iter().find(|name| !schema.contains(name)) {
        Some(missing) => Err(ValidationError::UnknownColumn {
            selection: label,
            column: missing.to_string(),
        }),
        None => Ok(()),
    }
}

fn selected_names(schema: &Schema, selection: &Selection) -> Vec<String> {
    selection
        .resolve(schema)
        .map(|s| s.column_names().map(str::to_string).collect())
        .unwrap_or_default()
}
