//! Order statistics over valid channel values.

use maskimg_core::Channel;

/// Valid values of `channel`, sorted ascending.
///
/// NaN values sort last.
pub fn sorted_valid(channel: &Channel) -> Vec<f32> {
    let mut values = channel.valid_values();
    values.sort_unstable_by(f32::total_cmp);
    values
}

/// Percentile `q` (0..=100) of ascending `sorted` data.
///
/// Uses linear interpolation between the two closest ranks: the rank of `q`
/// is `q / 100 * (n - 1)`. Returns `None` for empty input.
///
/// ```rust
/// use maskimg_ops::stats::percentile;
///
/// let data = [1.0, 2.0, 3.0, 4.0];
/// assert_eq!(percentile(&data, 0.0), Some(1.0));
/// assert_eq!(percentile(&data, 50.0), Some(2.5));
/// assert_eq!(percentile(&data, 100.0), Some(4.0));
/// ```
pub fn percentile(sorted: &[f32], q: f32) -> Option<f32> {
    let last = sorted.len().checked_sub(1)?;
    let rank = (f64::from(q.clamp(0.0, 100.0)) / 100.0) * last as f64;
    let lo = rank.floor() as usize;
    let hi = (lo + 1).min(last);
    let frac = rank - lo as f64;
    let (a, b) = (f64::from(sorted[lo]), f64::from(sorted[hi]));
    Some((a + (b - a) * frac) as f32)
}

/// Percentiles for several `qs` over the same sorted data.
pub fn percentiles(sorted: &[f32], qs: &[f32]) -> Option<Vec<f32>> {
    qs.iter().map(|&q| percentile(sorted, q)).collect()
}
