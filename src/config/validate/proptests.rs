//! Property-based tests for configuration validation

use super::error::ValidationError;
use super::validator::validate_config;
use crate::config::schema::*;
use crate::schema::{ColumnSchema, Schema, Selection, Tag};
use proptest::prelude::*;

fn arb_valid_spec() -> impl Strategy<Value = TransformSpec> {
    (
        1usize..8,                          // sequence columns
        0usize..4,                          // context columns
        proptest::option::of(1usize..512),  // max_sequence_length
        -10.0f64..10.0,                     // pad_value
    )
        .prop_map(|(n_seq, n_ctx, max_sequence_length, pad_value)| {
            let columns = (0..n_seq)
                .map(|i| ColumnSchema::new(format!("seq_{i}")).with_tags([Tag::Sequence]))
                .chain(
                    (0..n_ctx)
                        .map(|i| ColumnSchema::new(format!("ctx_{i}")).with_tags([Tag::Context])),
                )
                .collect();
            TransformSpec {
                schema: Schema::new(columns).unwrap(),
                padding: PaddingSpec {
                    max_sequence_length,
                    pad_value,
                    ..Default::default()
                },
                broadcast: (n_ctx > 0).then(|| BroadcastSpec {
                    to_broadcast: Selection::Tags(vec![Tag::Context]),
                    sequence: Selection::Tags(vec![Tag::Sequence]),
                }),
            }
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_valid_spec_passes(spec in arb_valid_spec()) {
        prop_assert!(validate_config(&spec).is_ok());
    }

    #[test]
    fn prop_zero_max_length_fails(spec in arb_valid_spec()) {
        let mut spec = spec;
        spec.padding.max_sequence_length = Some(0);
        prop_assert_eq!(
            validate_config(&spec),
            Err(ValidationError::InvalidMaxSequenceLength(0))
        );
    }

    #[test]
    fn prop_unknown_name_fails(spec in arb_valid_spec(), suffix in "[a-z]{1,8}") {
        let mut spec = spec;
        let column = format!("missing_{suffix}");
        spec.padding.sequence = Selection::Names(vec![column.clone()]);
        prop_assert_eq!(
            validate_config(&spec),
            Err(ValidationError::UnknownColumn { selection: "padding.sequence", column })
        );
    }

    #[test]
    fn prop_yaml_roundtrip_preserves_validity(spec in arb_valid_spec()) {
        let yaml = serde_yaml::to_string(&spec).unwrap();
        let back: TransformSpec = serde_yaml::from_str(&yaml).unwrap();
        prop_assert_eq!(&back, &spec);
        prop_assert!(validate_config(&back).is_ok());
    }
}
