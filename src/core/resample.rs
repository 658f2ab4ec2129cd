//! Fractional-position resampling via linear and cubic interpolation.

/// Linearly interpolates `input` at fractional position `pos`.
///
/// Positions outside the signal read as silence.
#[inline]
pub fn linear_at(input: &[f32], pos: f64) -> f32 {
    if pos < 0.0 || input.is_empty() {
        return 0.0;
    }
    let idx = pos as usize;
    if idx >= input.len() {
        return 0.0;
    }
    let frac = (pos - idx as f64) as f32;
    let next = input.get(idx + 1).copied().unwrap_or(0.0);
    input[idx] * (1.0 - frac) + next * frac
}

/// Cubic (4-point Hermite) interpolation of `input` at fractional position `pos`.
///
/// Neighbours outside the signal read as silence, so reads near the edges
/// taper rather than repeat the boundary sample.
#[inline]
pub fn cubic_at(input: &[f32], pos: f64) -> f32 {
    if input.len() < 4 {
        return linear_at(input, pos);
    }
    if pos < 0.0 {
        return 0.0;
    }
    let idx = pos as usize;
    if idx >= input.len() {
        return 0.0;
    }
    let frac = (pos - idx as f64) as f32;
    let get = |i: isize| -> f32 {
        if i < 0 {
            0.0
        } else {
            input.get(i as usize).copied().unwrap_or(0.0)
        }
    };
    let i = idx as isize;
    let s0 = get(i - 1);
    let s1 = get(i);
    let s2 = get(i + 1);
    let s3 = get(i + 2);

    // Hermite interpolation
    let c0 = s1;
    let c1 = 0.5 * (s2 - s0);
    let c2 = s0 - 2.5 * s1 + 2.0 * s2 - 0.5 * s3;
    let c3 = 0.5 * (s3 - s0) + 1.5 * (s1 - s2);

    ((c3 * frac + c2) * frac + c1) * frac + c0
}

/// Reads `output_len` samples from `input` starting at position `start`,
/// advancing by `step` input samples per output sample.
///
/// A `step` above 1.0 raises the pitch of the content read, below 1.0 lowers it.
pub fn resample_cubic_span(input: &[f32], start: f64, step: f64, output_len: usize) -> Vec<f32> {
    if input.is_empty() || output_len == 0 {
        return vec![0.0; output_len];
    }
    (0..output_len)
        .map(|i| cubic_at(input, start + i as f64 * step))
        .collect()
}
