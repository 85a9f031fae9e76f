//! Tests for the sequence transforms

use super::*;
use crate::error::Error;
use crate::schema::{ColumnSchema, Schema, Selection, Tag};
use crate::tensor::{DType, RaggedTensor, Tensor, TensorMap};
use approx::assert_abs_diff_eq;
use ndarray::{array, Array1, Array4};

fn sequence_schema() -> Schema {
    Schema::new(vec![
        ColumnSchema::new("a").with_tags([Tag::Sequence]),
        ColumnSchema::new("b").with_tags([Tag::Sequence]),
        ColumnSchema::new("c_dense").with_tags([Tag::Sequence]),
        ColumnSchema::new("d_context").with_tags([Tag::Context]),
    ])
    .unwrap()
}

fn sequence_batch() -> Batch {
    let mut features = TensorMap::new();
    RaggedTensor::from_rows_i64("a", &[vec![1, 2], vec![], vec![3, 4, 5]]).insert_into(&mut features);
    RaggedTensor::from_rows_i64("b", &[vec![34, 30], vec![], vec![33, 23, 50]])
        .insert_into(&mut features);
    features.insert(
        "c_dense".into(),
        Tensor::from(array![[1.0_f32, 2.0, 0.0], [0.0, 0.0, 0.0], [4.0, 5.0, 6.0]]),
    );
    features.insert("d_context".into(), Tensor::from(array![1.0_f32, 2.0, 3.0]));
    Batch::new(features)
}

#[test]
fn test_padded_features() {
    let padding = TabularPadding::from_schema(&sequence_schema(), Some(8)).unwrap();
    let padded = padding.transform(&sequence_batch()).unwrap();

    let sequences = padded.sequences.as_ref().unwrap();
    assert_eq!(sequences.length("a").unwrap(), &array![2_i64, 0, 3]);
    assert_eq!(sequences.max_length(), 8);

    let keys: Vec<&str> = padded.features.keys().map(String::as_str).collect();
    assert_eq!(keys, ["a", "b", "c_dense", "d_context"]);
    for feature in ["a", "b", "c_dense"] {
        assert_eq!(padded.features[feature].shape()[1], 8);
    }
    assert_eq!(
        padded.features["d_context"],
        sequence_batch().features["d_context"]
    );
}

#[test]
fn test_padded_values_keep_row_prefix() {
    let padding = TabularPadding::from_schema(&sequence_schema(), Some(4)).unwrap();
    let padded = padding.transform(&sequence_batch()).unwrap();

    assert_eq!(
        padded.features["b"].as_i64().unwrap(),
        &array![[34_i64, 30, 0, 0], [0, 0, 0, 0], [33, 23, 50, 0]].into_dyn()
    );
    let c = padded.features["c_dense"].as_f32().unwrap();
    assert_abs_diff_eq!(c[[2, 2]], 6.0);
    assert_abs_diff_eq!(c[[2, 3]], 0.0);
}

#[test]
fn test_batch_invalid_lengths() {
    let mut features = TensorMap::new();
    RaggedTensor::from_rows_i64("a", &[vec![1, 2], vec![], vec![3, 4, 5]]).insert_into(&mut features);
    RaggedTensor::from_rows_i64("b", &[vec![34], vec![23, 56], vec![33, 23, 50, 4]])
        .insert_into(&mut features);

    let padding = TabularPadding::from_schema(&Schema::from_names(&["a", "b"]).unwrap(), None).unwrap();
    let err = padding.transform(&Batch::new(features)).unwrap_err();

    assert!(matches!(err, Error::SequenceLengthMismatch { .. }));
    assert!(err
        .to_string()
        .starts_with("The sequential inputs must have the same length for each row in the batch"));
}

#[test]
fn test_dense_lengths_disagree_with_ragged() {
    let mut features = TensorMap::new();
    RaggedTensor::from_rows_i64("a", &[vec![1, 2], vec![], vec![3, 4, 5]]).insert_into(&mut features);
    features.insert(
        "c_dense".into(),
        Tensor::from(array![[1.0_f32, 0.0, 0.0], [0.0, 0.0, 0.0], [4.0, 5.0, 6.0]]),
    );
    let schema = Schema::new(vec![
        ColumnSchema::new("a").with_tags([Tag::Sequence]),
        ColumnSchema::new("c_dense").with_tags([Tag::Sequence]),
    ])
    .unwrap();

    let padding = TabularPadding::from_schema(&schema, Some(4)).unwrap();
    let err = padding.transform(&Batch::new(features)).unwrap_err();

    assert!(matches!(err, Error::SequenceLengthMismatch { .. }));
    let msg = err.to_string();
    assert!(msg.contains("a=[2, 0, 3]"));
    assert!(msg.contains("c_dense=[1, 0, 3]"));
}

#[test]
fn test_column_metadata_does_not_drive_padding() {
    let schema = Schema::new(vec![
        ColumnSchema::new("a")
            .with_tags([Tag::Sequence])
            .with_dtype(DType::Int64)
            .with_list(true)
            .with_value_count(1, 20),
        ColumnSchema::new("c_dense")
            .with_tags([Tag::Sequence])
            .with_dtype(DType::Int64),
    ])
    .unwrap();
    let mut features = TensorMap::new();
    RaggedTensor::from_rows_i64("a", &[vec![1, 2], vec![], vec![3, 4, 5]]).insert_into(&mut features);
    features.insert(
        "c_dense".into(),
        Tensor::from(array![[1.0_f32, 2.0, 0.0], [0.0, 0.0, 0.0], [4.0, 5.0, 6.0]]),
    );

    let padding = TabularPadding::from_schema(&schema, None).unwrap();
    let padded = padding.transform(&Batch::new(features)).unwrap();

    // batch maximum, not value_count.max
    assert_eq!(padded.features["a"].shape(), &[3, 3]);
    assert_eq!(padded.features["c_dense"].dtype(), DType::Float32);
}

#[test]
fn test_padded_targets() {
    let mut targets = TensorMap::new();
    targets.insert("target_1".into(), Tensor::from(array![3.0_f32, 4.0, 6.0]));
    RaggedTensor::from_rows_i64("target_2", &[vec![10, 11], vec![], vec![12, 13, 14]])
        .insert_into(&mut targets);
    let batch = sequence_batch().with_targets(targets.clone());

    let padding = TabularPadding::from_schema(&sequence_schema(), Some(8)).unwrap();
    let padded = padding.transform(&batch).unwrap();

    assert_eq!(padded.target("target_2").unwrap().shape()[1], 8);
    assert_eq!(padded.target("target_1"), targets.get("target_1"));
    assert!(padded.target("target_2__offsets").is_none());
    assert_eq!(
        padded.sequences.unwrap().length("target_2").unwrap(),
        &array![2_i64, 0, 3]
    );
}

#[test]
fn test_infers_max_length_from_batch() {
    let padding = TabularPadding::from_schema(&sequence_schema(), None).unwrap();
    let padded = padding.transform(&sequence_batch()).unwrap();
    for feature in ["a", "b", "c_dense"] {
        assert_eq!(padded.features[feature].shape(), &[3, 3]);
    }
    assert_eq!(padded.sequences.unwrap().max_length(), 3);
}

#[test]
fn test_truncation_keeps_original_lengths() {
    let padding = TabularPadding::from_schema(&sequence_schema(), Some(2)).unwrap();
    let padded = padding.transform(&sequence_batch()).unwrap();

    assert_eq!(
        padded.features["a"].as_i64().unwrap(),
        &array![[1_i64, 2], [0, 0], [3, 4]].into_dyn()
    );
    let sequences = padded.sequences.unwrap();
    assert_eq!(sequences.length("a").unwrap(), &array![2_i64, 0, 3]);
    assert_eq!(
        sequences.mask("a").unwrap(),
        array![[true, true], [false, false], [true, true]]
    );
}

#[test]
fn test_ragged_context_passes_through() {
    let schema = Schema::new(vec![
        ColumnSchema::new("a").with_tags([Tag::Sequence]),
        ColumnSchema::new("tags").with_tags([Tag::Context, Tag::List]),
    ])
    .unwrap();
    let mut features = TensorMap::new();
    RaggedTensor::from_rows_i64("a", &[vec![1, 2], vec![3]]).insert_into(&mut features);
    RaggedTensor::from_rows_i64("tags", &[vec![7], vec![8, 9, 10]]).insert_into(&mut features);

    let padding = TabularPadding::from_schema(&schema, Some(4)).unwrap();
    let padded = padding.transform(&Batch::new(features.clone())).unwrap();

    assert_eq!(padded.features["a"].shape(), &[2, 4]);
    assert_eq!(padded.features.get("tags__values"), features.get("tags__values"));
    assert_eq!(padded.features.get("tags__offsets"), features.get("tags__offsets"));
    assert!(padded.sequences.unwrap().length("tags").is_none());
}

#[test]
fn test_custom_pad_value() {
    let padding = TabularPadding::from_schema(&sequence_schema(), Some(5))
        .unwrap()
        .with_pad_value(-1.0);
    let mut features = TensorMap::new();
    RaggedTensor::from_rows_i64("a", &[vec![1], vec![2, 3]]).insert_into(&mut features);
    let padded = padding.transform(&Batch::new(features)).unwrap();
    assert_eq!(
        padded.features["a"].as_i64().unwrap(),
        &array![[1_i64, -1, -1, -1, -1], [2, 3, -1, -1, -1]].into_dyn()
    );
}

#[test]
fn test_dense_rank1_sequence_rejected() {
    let schema = Schema::new(vec![ColumnSchema::new("s").with_tags([Tag::Sequence])]).unwrap();
    let mut features = TensorMap::new();
    features.insert("s".into(), Tensor::from(array![1.0_f32, 2.0]));
    let padding = TabularPadding::from_schema(&schema, Some(4)).unwrap();
    assert!(matches!(
        padding.transform(&Batch::new(features)),
        Err(Error::UnsupportedRank { ndim: 1 })
    ));
}

#[test]
fn test_padding_requires_initialization() {
    let padding = TabularPadding::new().with_max_sequence_length(4);
    assert!(matches!(
        padding.transform(&sequence_batch()),
        Err(Error::NotInitialized(_))
    ));
}

#[test]
fn test_zero_max_length_rejected() {
    assert!(matches!(
        TabularPadding::from_schema(&sequence_schema(), Some(0)),
        Err(Error::ConfigError(_))
    ));
}

#[test]
fn test_selection_by_name() {
    let padding = TabularPadding::new()
        .with_selection(Selection::Names(vec!["c_dense".into()]));
    let mut padding = padding.with_max_sequence_length(6);
    padding.initialize_from_schema(&sequence_schema()).unwrap();
    assert_eq!(padding.features(), ["c_dense"]);

    let padded = padding.transform(&sequence_batch()).unwrap();
    assert_eq!(padded.features["c_dense"].shape(), &[3, 6]);
}

struct BroadcastFixture {
    inputs: TensorMap,
    schema: Schema,
    broadcast: BroadcastToSequence,
}

fn broadcast_fixture() -> BroadcastFixture {
    let mut inputs = TensorMap::new();
    inputs.insert(
        "feature_1".into(),
        Tensor::from(array![[1.0_f32, 2.0, 3.0], [4.0, 5.0, 6.0]]),
    );
    inputs.insert(
        "feature_2".into(),
        Tensor::from(array![
            [[1.0_f32, 1.0], [2.0, 2.0], [3.0, 3.0]],
            [[4.0, 4.0], [5.0, 5.0], [6.0, 6.0]]
        ]),
    );
    inputs.insert(
        "feature_3".into(),
        Tensor::from(array![[7.0_f32, 8.0, 9.0], [10.0, 11.0, 12.0]]),
    );
    let schema = Schema::from_names(&["feature_1", "feature_2", "feature_3"]).unwrap();
    let to_broadcast = Schema::from_names(&["feature_1", "feature_3"]).unwrap();
    let sequence = Schema::from_names(&["feature_2"]).unwrap();
    BroadcastFixture {
        inputs,
        schema,
        broadcast: BroadcastToSequence::new(to_broadcast, sequence),
    }
}

#[test]
fn test_broadcast_initialize_from_schema() {
    let mut fx = broadcast_fixture();
    fx.broadcast.initialize_from_schema(&fx.schema).unwrap();
    assert_eq!(fx.broadcast.to_broadcast_features(), ["feature_1", "feature_3"]);
    assert_eq!(fx.broadcast.sequence_features(), ["feature_2"]);
}

#[test]
fn test_broadcast_get_seq_length() {
    let mut fx = broadcast_fixture();
    fx.broadcast.initialize_from_schema(&fx.schema).unwrap();
    assert_eq!(fx.broadcast.get_seq_length(&fx.inputs).unwrap(), 3);
}

#[test]
fn test_broadcast_get_seq_length_offsets() {
    let mut fx = broadcast_fixture();
    fx.broadcast.initialize_from_schema(&fx.schema).unwrap();

    let mut inputs = TensorMap::new();
    inputs.insert("feature_1".into(), Tensor::from(array![1_i64, 2]));
    inputs.insert("feature_2__offsets".into(), Tensor::from(array![2_i64, 3]));
    inputs.insert(
        "feature_3".into(),
        Tensor::from(array![[7.0_f32, 8.0, 9.0], [10.0, 11.0, 12.0]]),
    );
    assert_eq!(fx.broadcast.get_seq_length(&inputs).unwrap(), 3);
}

#[test]
fn test_broadcast_get_seq_length_missing_feature() {
    let mut fx = broadcast_fixture();
    fx.broadcast.initialize_from_schema(&fx.schema).unwrap();
    fx.inputs.remove("feature_2");
    assert!(matches!(
        fx.broadcast.get_seq_length(&fx.inputs),
        Err(Error::MissingFeature(name)) if name == "feature_2"
    ));
}

#[test]
fn test_broadcast_forward() {
    let mut fx = broadcast_fixture();
    fx.broadcast.initialize_from_schema(&fx.schema).unwrap();
    let output = fx.broadcast.forward(&fx.inputs).unwrap();

    assert_eq!(output["feature_1"].shape(), &[2, 3, 3]);
    assert_eq!(output["feature_3"].shape(), &[2, 3, 3]);
    assert_eq!(output["feature_2"].shape(), &[2, 3, 2]);
    assert_eq!(output["feature_2"], fx.inputs["feature_2"]);

    let f3 = output["feature_3"].as_f32().unwrap();
    for step in 0..3 {
        assert_abs_diff_eq!(f3[[1, step, 0]], 10.0);
        assert_abs_diff_eq!(f3[[0, step, 2]], 9.0);
    }
}

#[test]
fn test_broadcast_unsupported_dimensions() {
    let mut fx = broadcast_fixture();
    fx.broadcast.initialize_from_schema(&fx.schema).unwrap();
    fx.inputs.insert(
        "feature_3".into(),
        Tensor::from(Array4::<f32>::zeros((10, 3, 3, 3))),
    );
    let err = fx.broadcast.forward(&fx.inputs).unwrap_err();
    assert_eq!(err.to_string(), "Unsupported number of dimensions: 4");
}

#[test]
fn test_broadcast_requires_initialization() {
    let fx = broadcast_fixture();
    assert!(matches!(
        fx.broadcast.forward(&fx.inputs),
        Err(Error::NotInitialized(_))
    ));
}

#[test]
fn test_broadcast_overlap_rejected() {
    let schema = Schema::from_names(&["x", "y"]).unwrap();
    let mut broadcast = BroadcastToSequence::new(
        Selection::Names(vec!["x".into(), "y".into()]),
        Selection::Names(vec!["y".into()]),
    );
    assert!(matches!(
        broadcast.initialize_from_schema(&schema),
        Err(Error::ConfigError(msg)) if msg.contains('y')
    ));
}

#[test]
fn test_broadcast_by_tags() {
    let schema = Schema::new(vec![
        ColumnSchema::new("user_age").with_tags([Tag::Context, Tag::Continuous]),
        ColumnSchema::new("item_ids").with_tags([Tag::Sequence, Tag::ItemId]),
    ])
    .unwrap();
    let mut broadcast = BroadcastToSequence::new(Tag::Context, Tag::Sequence);
    broadcast.initialize_from_schema(&schema).unwrap();

    let mut features = TensorMap::new();
    features.insert("user_age".into(), Tensor::from(array![[31.0_f32], [45.0]]));
    features.insert("item_ids".into(), Tensor::from(array![[1_i64, 2, 3, 4], [5, 6, 0, 0]]));
    let out = broadcast.transform(&Batch::new(features)).unwrap();
    assert_eq!(out.features["user_age"].shape(), &[2, 4, 1]);
}

#[test]
fn test_pipeline_pads_then_broadcasts() {
    let schema = sequence_schema();
    let mut pipeline = SequencePipeline::new()
        .with_stage(TabularPadding::new().with_max_sequence_length(5))
        .with_stage(BroadcastToSequence::new(
            Selection::Names(vec!["d_context".into()]),
            Selection::Names(vec!["a".into()]),
        ));
    pipeline.initialize_from_schema(&schema).unwrap();
    assert_eq!(pipeline.len(), 2);
    assert_eq!(
        pipeline.stage_names(),
        ["tabular_padding", "broadcast_to_sequence"]
    );

    let mut batch = sequence_batch();
    batch
        .features
        .insert("d_context".into(), Tensor::from(array![[1.0_f32], [2.0], [3.0]]));
    let out = pipeline.transform(&batch).unwrap();

    assert_eq!(out.features["a"].shape(), &[3, 5]);
    assert_eq!(out.features["d_context"].shape(), &[3, 5, 1]);
    assert!(out.sequences.is_some());
}

#[test]
fn test_empty_pipeline_is_identity() {
    let pipeline = SequencePipeline::new();
    assert!(pipeline.is_empty());
    let batch = sequence_batch();
    assert_eq!(pipeline.transform(&batch).unwrap(), batch);
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_rows() -> impl Strategy<Value = Vec<Vec<i64>>> {
        proptest::collection::vec(proptest::collection::vec(1i64..500, 0..10), 1..12)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_padding_width_and_lengths(rows in arb_rows(), max_len in 1usize..12) {
            let schema = Schema::from_names(&["a"]).unwrap();
            let padding = TabularPadding::from_schema(&schema, Some(max_len)).unwrap();
            let mut features = TensorMap::new();
            RaggedTensor::from_rows_i64("a", &rows).insert_into(&mut features);

            let padded = padding.transform(&Batch::new(features)).unwrap();
            prop_assert_eq!(padded.features["a"].shape(), &[rows.len(), max_len][..]);

            let expected: Array1<i64> = rows.iter().map(|r| r.len() as i64).collect();
            let sequences = padded.sequences.unwrap();
            prop_assert_eq!(sequences.length("a").unwrap(), &expected);
        }

        #[test]
        fn prop_broadcast_replicates_rows(
            batch in 1usize..6,
            dim in 1usize..5,
            seq_len in 1usize..7,
        ) {
            let data: Vec<f32> = (0..batch * dim).map(|v| v as f32).collect();
            let mut inputs = TensorMap::new();
            inputs.insert("ctx".into(), Tensor::from_f32(&[batch, dim], data).unwrap());
            inputs.insert(
                "seq".into(),
                Tensor::from_f32(&[batch, seq_len], vec![1.0; batch * seq_len]).unwrap(),
            );

            let schema = Schema::from_names(&["ctx", "seq"]).unwrap();
            let mut broadcast = BroadcastToSequence::new(
                Selection::Names(vec!["ctx".into()]),
                Selection::Names(vec!["seq".into()]),
            );
            broadcast.initialize_from_schema(&schema).unwrap();
            let out = broadcast.forward(&inputs).unwrap();

            let a = out["ctx"].as_f32().unwrap();
            prop_assert_eq!(a.shape(), &[batch, seq_len, dim][..]);
            for b in 0..batch {
                for s in 0..seq_len {
                    for d in 0..dim {
                        prop_assert_eq!(a[[b, s, d]], (b * dim + d) as f32);
                    }
                }
            }
        }
    }
}
