//! Validate command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{parse_config, validate_config, TransformSpec, ValidateArgs};
use crate::schema::Selection;

/// Describe a selection in one line
pub fn describe_selection(selection: &Selection) -> String {
    match selection {
        Selection::Tags(tags) => {
            let tags: Vec<String> = tags.iter().map(ToString::to_string).collect();
            format!("tags [{}]", tags.join(", "))
        }
        Selection::Names(names) => format!("names [{}]", names.join(", ")),
        Selection::Columns(schema) => {
            let names: Vec<&str> = schema.column_names().collect();
            format!("columns [{}]", names.join(", "))
        }
    }
}

/// Format schema columns as a string
pub fn format_schema_info(spec: &TransformSpec) -> String {
    let mut lines = vec![format!("  Columns: {}", spec.schema.len())];
    for column in spec.schema.iter() {
        let tags: Vec<String> = column.tags().iter().map(ToString::to_string).collect();
        let mut line = format!("    {} [{}]", column.name(), tags.join(", "));
        if let Some(dtype) = column.dtype() {
            line.push_str(&format!(" {dtype}"));
        }
        if let Some(count) = column.value_count() {
            line.push_str(&format!(" values {}..={}", count.min, count.max));
        }
        lines.push(line);
    }
    lines.join("\n")
}

/// Format padding configuration as a string
pub fn format_padding_info(spec: &TransformSpec) -> String {
    let max_len = spec
        .padding
        .max_sequence_length
        .map_or_else(|| "batch maximum".to_string(), |n| n.to_string());
    [
        "  Padding:".to_string(),
        format!("    Max sequence length: {max_len}"),
        format!("    Pad value: {}", spec.padding.pad_value),
        format!("    Dense sequences: {}", describe_selection(&spec.padding.sequence)),
    ]
    .join("\n")
}

/// Format broadcast configuration as a string
pub fn format_broadcast_info(spec: &TransformSpec) -> Option<String> {
    spec.broadcast.as_ref().map(|broadcast| {
        [
            "  Broadcast:".to_string(),
            format!("    To broadcast: {}", describe_selection(&broadcast.to_broadcast)),
            format!("    Sequence: {}", describe_selection(&broadcast.sequence)),
        ]
        .join("\n")
    })
}

/// Print detailed configuration summary
pub fn print_detailed_summary(spec: &TransformSpec) {
    println!();
    println!("Configuration Summary:");
    println!("{}", format_schema_info(spec));
    println!();
    println!("{}", format_padding_info(spec));

    if let Some(broadcast_info) = format_broadcast_info(spec) {
        println!();
        println!("{broadcast_info}");
    }
}

pub fn run_validate(args: ValidateArgs, level: LogLevel) -> Result<(), String> {
    log(
        level,
        LogLevel::Normal,
        &format!("Validating config: {}", args.config.display()),
    );

    let spec = parse_config(&args.config).map_err(|e| format!("Config error: {e}"))?;

    validate_config(&spec).map_err(|e| format!("Validation failed: {e}"))?;

    // Selections are resolved too, so errors surface before any batch is read
    let pipeline = spec
        .build_pipeline()
        .map_err(|e| format!("Validation failed: {e}"))?;

    log(level, LogLevel::Normal, "Configuration is valid");
    log(
        level,
        LogLevel::Verbose,
        &format!("  Stages: {}", pipeline.stage_names().join(" -> ")),
    );

    if args.detailed {
        print_detailed_summary(&spec);
    }

    Ok(())
}
