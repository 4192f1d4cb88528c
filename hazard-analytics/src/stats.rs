//! Small descriptive statistics shared by the density and hotspot stages.

/// Convert a collection size to `f64` without precision-loss casts.
///
/// Sizes beyond `u32::MAX` saturate, far past any batch the engine accepts.
pub(crate) fn count_as_f64(count: usize) -> f64 {
    u32::try_from(count).map_or(f64::from(u32::MAX), f64::from)
}

/// Mean and standard deviation of `values`.
///
/// `Denominator::Population` divides the squared deviations by `n`;
/// `Denominator::Sample` divides by `n - 1`, floored at one. Returns `None`
/// for an empty slice.
#[expect(
    clippy::float_arithmetic,
    reason = "moments are sums of floating-point deviations"
)]
pub(crate) fn moments(values: &[f64], denominator: Denominator) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let n = count_as_f64(values.len());
    let mean = values.iter().sum::<f64>() / n;
    let squared: f64 = values.iter().map(|value| (value - mean).powi(2)).sum();
    let divisor = match denominator {
        Denominator::Population => n,
        Denominator::Sample => (n - 1.0).max(1.0),
    };
    Some((mean, (squared / divisor).sqrt()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Denominator {
    Population,
    Sample,
}
