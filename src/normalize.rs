//! Peak normalization to keep shifted audio out of clipping.

use crate::core::types::AudioBuffer;

/// Peak absolute sample value, ignoring NaN.
#[inline]
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()))
}

/// Scales `samples` so the peak is exactly 1.0 if it exceeds 1.0.
///
/// One gain is applied to every sample, so interleaved channels keep their
/// balance. Returns the gain applied, or `None` if the samples were left
/// untouched (peak ≤ 1.0, or a non-finite peak).
pub fn normalize_peak_in_place(samples: &mut [f32]) -> Option<f32> {
    let peak = peak(samples);
    if !peak.is_finite() || peak <= 1.0 {
        return None;
    }
    // Dividing keeps |s / peak| <= 1.0 exactly, where multiplying by the
    // rounded reciprocal can overshoot by one ulp.
    for s in samples.iter_mut() {
        *s /= peak;
    }
    Some(1.0 / peak)
}

/// Returns a peak-normalized copy of `buffer` (unchanged if its peak ≤ 1.0).
///
/// # Example
///
/// ```
/// use wavpitch::{normalize_peak, AudioBuffer};
///
/// let loud = AudioBuffer::from_stereo(vec![2.0, -1.0, 0.5, 0.25], 44100);
/// let out = normalize_peak(&loud);
/// assert_eq!(out.data, vec![1.0, -0.5, 0.25, 0.125]);
/// ```
pub fn normalize_peak(buffer: &AudioBuffer) -> AudioBuffer {
    let mut out = buffer.clone();
    normalize_peak_in_place(&mut out.data);
    out
}
