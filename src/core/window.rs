//! Window functions for the phase vocoder's analysis and synthesis frames.
//!
//! All windows are periodic (DFT-even): a window of size `N` is one period of
//! an `N`-point sequence, which is what overlap-add reconstruction expects.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Blackman-Harris window coefficients (4-term).
const BH_A0: f64 = 0.35875;
const BH_A1: f64 = 0.48829;
const BH_A2: f64 = 0.14128;
const BH_A3: f64 = 0.01168;

/// Default Kaiser beta, scaled by 100.
pub const KAISER_DEFAULT_BETA_100: u32 = 800;

/// Largest Kaiser beta accepted. Larger values are clamped when the window
/// is generated.
pub const KAISER_MAX_BETA: f64 = 100.0;

/// Window function types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowType {
    #[default]
    Hann,
    BlackmanHarris,
    Kaiser(u32), // beta parameter scaled by 100 (e.g., 800 = 8.0)
}

impl FromStr for WindowType {
    type Err = String;

    /// Parses `hann`, `blackman-harris` (or `bh`), `kaiser`, or `kaiser:<beta>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hann" => Ok(WindowType::Hann),
            "blackman-harris" | "bh" => Ok(WindowType::BlackmanHarris),
            "kaiser" => Ok(WindowType::Kaiser(KAISER_DEFAULT_BETA_100)),
            other if other.starts_with("kaiser:") => {
                let beta_str = &other["kaiser:".len()..];
                match beta_str.parse::<f64>() {
                    Ok(beta) if (0.0..=KAISER_MAX_BETA).contains(&beta) => {
                        Ok(WindowType::Kaiser((beta * 100.0).round() as u32))
                    }
                    _ => Err(format!(
                        "invalid Kaiser beta '{}' (expected a number between 0 and {})",
                        beta_str, KAISER_MAX_BETA
                    )),
                }
            }
            other => Err(format!(
                "unknown window type '{}' (use hann, blackman-harris, or kaiser:<beta>)",
                other
            )),
        }
    }
}

impl fmt::Display for WindowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowType::Hann => write!(f, "hann"),
            WindowType::BlackmanHarris => write!(f, "blackman-harris"),
            WindowType::Kaiser(beta_100) => write!(f, "kaiser:{}", *beta_100 as f64 / 100.0),
        }
    }
}

/// Generates a window function of the specified type and size.
pub fn generate_window(window_type: WindowType, size: usize) -> Vec<f32> {
    match window_type {
        WindowType::Hann => hann_window(size),
        WindowType::BlackmanHarris => blackman_harris_window(size),
        WindowType::Kaiser(beta_100) => {
            kaiser_window(size, (beta_100 as f64 / 100.0).min(KAISER_MAX_BETA))
        }
    }
}

/// Returns `Some(trivial_window)` for degenerate sizes (0 or 1), or `None`
/// to indicate the caller should compute the full window.
#[inline]
fn trivial_window(size: usize) -> Option<Vec<f32>> {
    match size {
        0 => Some(vec![]),
        1 => Some(vec![1.0]),
        _ => None,
    }
}

fn hann_window(size: usize) -> Vec<f32> {
    if let Some(w) = trivial_window(size) {
        return w;
    }
    let n = size as f64;
    (0..size)
        .map(|i| (0.5 * (1.0 - (2.0 * PI * i as f64 / n).cos())) as f32)
        .collect()
}

fn blackman_harris_window(size: usize) -> Vec<f32> {
    if let Some(w) = trivial_window(size) {
        return w;
    }
    let n = size as f64;
    (0..size)
        .map(|i| {
            let x = i as f64 / n;
            let w = BH_A0 - BH_A1 * (2.0 * PI * x).cos() + BH_A2 * (4.0 * PI * x).cos()
                - BH_A3 * (6.0 * PI * x).cos();
            w as f32
        })
        .collect()
}

/// Generates a Kaiser window using the zeroth-order modified Bessel function.
fn kaiser_window(size: usize, beta: f64) -> Vec<f32> {
    if let Some(w) = trivial_window(size) {
        return w;
    }
    let n = size as f64;
    let denom = bessel_i0(beta);
    (0..size)
        .map(|i| {
            let x = 2.0 * i as f64 / n - 1.0;
            let arg = beta * (1.0 - x * x).max(0.0).sqrt();
            (bessel_i0(arg) / denom) as f32
        })
        .collect()
}

/// Upper bound on series terms; I0(KAISER_MAX_BETA) converges in about 100.
const BESSEL_MAX_TERMS: usize = 500;
/// Relative convergence threshold for Bessel I0 series.
const BESSEL_CONVERGENCE: f64 = 1e-15;

/// Zeroth-order modified Bessel function of the first kind, by series expansion.
fn bessel_i0(x: f64) -> f64 {
    let mut sum = 1.0;
    let mut term = 1.0;
    let x_half = x / 2.0;
    for k in 1..BESSEL_MAX_TERMS {
        term *= (x_half / k as f64) * (x_half / k as f64);
        sum += term;
        if term < BESSEL_CONVERGENCE * sum {
            break;
        }
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hann_window_properties() {
        let w = hann_window(1024);
        assert_eq!(w.len(), 1024);
        assert!(w[0].abs() < 1e-6);
        assert!((w[512] - 1.0).abs() < 1e-6);
        // Periodic symmetry: w[i] == w[N - i]
        for i in 1..512 {
            assert!((w[i] - w[1024 - i]).abs() < 1e-6);
        }
    }

    #[test]
    fn test_hann_quarter_overlap_sums_constant() {
        // Squared periodic Hann at 75% overlap sums to 1.5.
        let n = 1024;
        let hop = n / 4;
        let w = hann_window(n);
        for offset in 0..hop {
            let sum: f32 = (0..4).map(|k| w[offset + k * hop].powi(2)).sum();
            assert!((sum - 1.5).abs() < 1e-4, "offset {}: {}", offset, sum);
        }
    }

    #[test]
    fn test_blackman_harris_properties() {
        let w = blackman_harris_window(1024);
        assert_eq!(w.len(), 1024);
        assert!(w[0] < 0.01);
        for i in 1..512 {
            assert!((w[i] - w[1024 - i]).abs() < 1e-6);
        }
    }

    #[test]
    fn test_bessel_i0_converges_for_large_arguments() {
        let cases = [
            (0.0, 1.0),
            (8.0, 427.564_115_721_804_7),
            (40.0, 1.489_477_479_341_990_8e16),
            (100.0, 1.073_751_707_131_076_3e42),
        ];
        for (x, expected) in cases {
            let got = bessel_i0(x);
            assert!(
                ((got - expected) / expected).abs() < 1e-12,
                "I0({}) = {}, expected {}",
                x,
                got,
                expected
            );
        }
    }

    #[test]
    fn test_kaiser_window_large_beta_is_well_formed() {
        for beta in [30.0, KAISER_MAX_BETA] {
            let w = kaiser_window(512, beta);
            assert!((w[256] - 1.0).abs() < 1e-6, "beta {}: peak {}", beta, w[256]);
            assert!(w.iter().all(|v| v.is_finite() && (0.0..=1.0 + 1e-6).contains(v)));
        }
        // Oversized betas from the enum are clamped rather than overflowing.
        let w = generate_window(WindowType::Kaiser(u32::MAX), 256);
        assert!(w.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_kaiser_window_peak_in_middle() {
        let w = kaiser_window(1024, 8.0);
        assert_eq!(w.len(), 1024);
        let mid = w[512];
        assert!((mid - 1.0).abs() < 1e-6);
        for &v in &w {
            assert!(v <= mid + 1e-6);
        }
    }

    #[test]
    fn test_degenerate_sizes() {
        assert!(hann_window(0).is_empty());
        assert!(blackman_harris_window(0).is_empty());
        assert!(kaiser_window(0, 8.0).is_empty());
        assert_eq!(hann_window(1), vec![1.0]);
        assert_eq!(kaiser_window(1, 8.0), vec![1.0]);
    }

    #[test]
    fn test_parse_window() {
        assert_eq!("hann".parse::<WindowType>(), Ok(WindowType::Hann));
        assert_eq!("bh".parse::<WindowType>(), Ok(WindowType::BlackmanHarris));
        assert_eq!(
            "blackman-harris".parse::<WindowType>(),
            Ok(WindowType::BlackmanHarris)
        );
        assert_eq!("kaiser".parse::<WindowType>(), Ok(WindowType::Kaiser(800)));
        assert_eq!("kaiser:5.5".parse::<WindowType>(), Ok(WindowType::Kaiser(550)));
        assert!("kaiser:-1".parse::<WindowType>().is_err());
        assert!("kaiser:100".parse::<WindowType>().is_ok());
        assert!("kaiser:100.5".parse::<WindowType>().is_err());
        assert!("kaiser:NaN".parse::<WindowType>().is_err());
        assert!("triangle".parse::<WindowType>().is_err());
    }

    #[test]
    fn test_display_roundtrips_through_parse() {
        for w in [
            WindowType::Hann,
            WindowType::BlackmanHarris,
            WindowType::Kaiser(1200),
        ] {
            assert_eq!(w.to_string().parse::<WindowType>(), Ok(w));
        }
    }

    #[test]
    fn test_generate_window_dispatch() {
        assert_eq!(generate_window(WindowType::Hann, 256).len(), 256);
        assert_eq!(generate_window(WindowType::BlackmanHarris, 256).len(), 256);
        assert_eq!(generate_window(WindowType::Kaiser(800), 256).len(), 256);
    }
}
