use ndarray::{Array2, ArrayView2, Axis};

use crate::utils::SoftmaxKind;

/// Computes softmax along `axis` of a 2D array
///
/// Every lane along `axis` of the result is non-negative and sums to 1.
/// Uses the max-subtraction form, see [`softmax_with`] for the naive one.
pub fn softmax(x: ArrayView2<f64>, axis: Axis) -> Array2<f64> {
    softmax_with(x, axis, SoftmaxKind::Stable)
}

/// Computes softmax along `axis` with an explicit [`SoftmaxKind`]
///
/// Both kinds are equal mathematically. `Naive` exponentiates the raw
/// scores and yields NaN once a score exceeds ~709, which is what reference
/// outputs computed that way contain. An empty input gives an empty output.
pub fn softmax_with(x: ArrayView2<f64>, axis: Axis, kind: SoftmaxKind) -> Array2<f64> {
    let exps = match kind {
        SoftmaxKind::Stable => {
            let max = x.fold_axis(axis, f64::NEG_INFINITY, |&a, &b| a.max(b));
            let shifted = &x - &max.insert_axis(axis);
            shifted.mapv(f64::exp)
        }
        SoftmaxKind::Naive => x.mapv(f64::exp),
    };

    // Broadcast the per-lane sums back across `axis`
    let sums = exps.sum_axis(axis).insert_axis(axis);
    exps / &sums
}

/// Checks that every entry lies in [0, 1] and every row sums to 1 within `tolerance`
pub fn is_row_stochastic(weights: ArrayView2<f64>, tolerance: f64) -> bool {
    let entries_in_range = weights
        .iter()
        .all(|&w| (0.0..=1.0 + tolerance).contains(&w));

    entries_in_range
        && weights
            .rows()
            .into_iter()
            .all(|row| (row.sum() - 1.0).abs() <= tolerance)
}
