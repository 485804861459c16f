/// Quantile helpers for already-sorted slices.
///
/// - Empty input => `None`.
/// - `level <= 0` => first element, `level >= 1` => last element.
/// - Otherwise the position `level * (len - 1)` is interpolated linearly
///   between its two neighbouring elements.

/// Returns the `level` quantile (0..=1) of a slice sorted in ascending order.
pub fn quantile_sorted(sorted_values: &[f64], level: f64) -> Option<f64> {
    let last = sorted_values.len().checked_sub(1)?;
    let position = level.clamp(0.0, 1.0) * last as f64;

    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;

    let low = sorted_values[lower];
    let high = sorted_values[upper];
    Some(low + (high - low) * fraction)
}

/// Sorts a copy of `values` and returns the quantile at each of `levels`.
pub fn quantiles(values: &[usize], levels: &[f64]) -> Option<Vec<f64>> {
    let mut sorted: Vec<f64> = values.iter().map(|value| *value as f64).collect();
    sorted.sort_by(|a, b| a.total_cmp(b));
    levels
        .iter()
        .map(|level| quantile_sorted(&sorted, *level))
        .collect()
}
