//! Element-type generic kernels behind [`Tensor`](super::Tensor)

use crate::error::{Error, Result};
use ndarray::{ArrayD, Axis, IxDyn, Slice};

/// Pad or truncate axis 1 of `a` to `max_len`, filling with `pad`.
pub(crate) fn pad_axis1<T: Clone>(a: &ArrayD<T>, max_len: usize, pad: T) -> ArrayD<T> {
    let mut shape = a.shape().to_vec();
    let keep = shape[1].min(max_len);
    shape[1] = max_len;

    let mut out = ArrayD::from_elem(IxDyn(&shape), pad);
    out.slice_axis_mut(Axis(1), Slice::from(0..keep))
        .assign(&a.slice_axis(Axis(1), Slice::from(0..keep)));
    out
}

/// For each row, count positions along axis 1 holding any non-pad entry.
pub(crate) fn non_pad_lengths<T: PartialEq>(a: &ArrayD<T>, pad: &T) -> Vec<i64> {
    a.outer_iter()
        .map(|row| {
            row.outer_iter()
                .filter(|position| position.iter().any(|v| v != pad))
                .count() as i64
        })
        .collect()
}

/// Insert axis 1 of length `seq_len`, repeating the input along it.
pub(crate) fn repeat_axis1<T: Clone>(a: &ArrayD<T>, seq_len: usize) -> Result<ArrayD<T>> {
    let mut shape = a.shape().to_vec();
    shape.insert(1, seq_len);

    let expanded = a.view().insert_axis(Axis(1));
    expanded
        .broadcast(IxDyn(&shape))
        .map(|view| view.to_owned())
        .ok_or_else(|| Error::ShapeMismatch {
            expected: shape.clone(),
            actual: a.shape().to_vec(),
        })
}

/// Rebuild rows of a flat `values` array from `offsets` into a dense
/// `(rows, max_len, ...)` array. Rows longer than `max_len` are truncated.
///
/// `offsets` must already satisfy the ragged invariant.
pub(crate) fn pad_rows<T: Clone>(
    values: &ArrayD<T>,
    offsets: &[usize],
    max_len: usize,
    pad: T,
) -> ArrayD<T> {
    let rows = offsets.len().saturating_sub(1);
    let mut shape = Vec::with_capacity(values.ndim() + 1);
    shape.push(rows);
    shape.push(max_len);
    shape.extend_from_slice(&values.shape()[1..]);

    let mut out = ArrayD::from_elem(IxDyn(&shape), pad);
    for (i, bounds) in offsets.windows(2).enumerate() {
        let start = bounds[0];
        let n = (bounds[1] - start).min(max_len);
        out.index_axis_mut(Axis(0), i)
            .slice_axis_mut(Axis(0), Slice::from(0..n))
            .assign(&values.slice_axis(Axis(0), Slice::from(start..start + n)));
    }
    out
}
