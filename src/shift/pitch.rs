//! Pitch shifting by time stretch followed by resampling.

use log::{debug, warn};

use crate::convert::semitones_to_ratio;
use crate::core::resample::resample_cubic_span;
use crate::error::PitchError;
use crate::shift::params::ShiftParams;
use crate::shift::phase_vocoder::PhaseVocoder;

/// Largest pitch ratio the engine applies (four octaves up). Higher requests
/// are clamped, which also bounds the size of the stretched intermediate.
pub const RATIO_MAX: f64 = 16.0;

/// A pitch-shifting engine operating on one channel at a time.
///
/// Implementations must return exactly `samples.len()` samples: pitch moves,
/// duration does not.
pub trait PitchShifter {
    /// Shifts the pitch of a single channel by `semitones`.
    fn shift_channel(
        &mut self,
        samples: &[f32],
        sample_rate: u32,
        semitones: f64,
    ) -> Result<Vec<f32>, PitchError>;
}

/// Phase-vocoder pitch shifter.
///
/// Stretches the channel in time by the pitch ratio, then reads the stretched
/// signal back at that same ratio so the result has the original length with
/// every frequency scaled.
#[derive(Debug, Clone)]
pub struct PhaseVocoderShifter {
    params: ShiftParams,
}

impl PhaseVocoderShifter {
    /// Creates a shifter, validating the parameters.
    pub fn new(params: ShiftParams) -> Result<Self, PitchError> {
        params.validate()?;
        Ok(Self { params })
    }
}

impl PitchShifter for PhaseVocoderShifter {
    fn shift_channel(
        &mut self,
        samples: &[f32],
        sample_rate: u32,
        semitones: f64,
    ) -> Result<Vec<f32>, PitchError> {
        if sample_rate == 0 {
            return Err(PitchError::Processing(
                "sample rate must be greater than 0".to_string(),
            ));
        }
        if !semitones.is_finite() {
            return Err(PitchError::Processing(format!(
                "semitone offset must be finite, got {}",
                semitones
            )));
        }
        if samples.is_empty() || semitones == 0.0 {
            return Ok(samples.to_vec());
        }

        // Very small ratios need no clamp: the synthesis hop bottoms out at
        // one sample and the result just loses pitch accuracy.
        let requested = semitones_to_ratio(semitones);
        let ratio = if requested > RATIO_MAX {
            warn!(
                "Pitch ratio {:.2} ({:+.2} semitones) exceeds {}; clamping",
                requested, semitones, RATIO_MAX
            );
            RATIO_MAX
        } else {
            requested
        };

        let mut vocoder = PhaseVocoder::new(
            self.params.fft_size,
            self.params.effective_hop_size(),
            ratio,
            self.params.window_type,
            self.params.phase_locking,
        );
        let fft_size = vocoder.fft_size();
        let hop = vocoder.hop_analysis();
        let effective = vocoder.effective_ratio();
        debug!(
            "Phase vocoder: ratio {:.5} (requested {:.5}), fft {}, hops {}/{}",
            effective,
            requested,
            fft_size,
            hop,
            vocoder.hop_synthesis()
        );

        // One frame of silence on each side keeps the edges at full overlap;
        // the extra hop lets the last frame reach past the end of the signal.
        let pad = fft_size;
        let mut padded = Vec::with_capacity(samples.len() + 2 * pad + hop);
        padded.resize(pad, 0.0);
        padded.extend_from_slice(samples);
        padded.resize(samples.len() + 2 * pad + hop, 0.0);

        let stretched = vocoder.process(&padded)?;

        let half = (fft_size / 2) as f64;
        let start = (pad as f64 - half) * effective + half;
        let output = resample_cubic_span(&stretched, start, effective, samples.len());

        if output.len() != samples.len() {
            return Err(PitchError::Processing(format!(
                "engine produced {} samples for {} input samples",
                output.len(),
                samples.len()
            )));
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn sine(freq: f32, sample_rate: u32, n: usize) -> Vec<f32> {
        (0..n)
            .map(|i| (2.0 * PI * freq * i as f32 / sample_rate as f32).sin())
            .collect()
    }

    fn zero_crossing_freq(signal: &[f32], sample_rate: u32) -> f64 {
        let crossings = signal
            .windows(2)
            .filter(|w| w[0] <= 0.0 && w[1] > 0.0)
            .count();
        crossings as f64 * sample_rate as f64 / signal.len() as f64
    }

    #[test]
    fn test_zero_semitones_is_exact_copy() {
        let input = sine(440.0, 44100, 4410);
        let mut shifter = PhaseVocoderShifter::new(ShiftParams::default()).unwrap();
        let output = shifter.shift_channel(&input, 44100, 0.0).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_preserves_length() {
        let mut shifter = PhaseVocoderShifter::new(ShiftParams::default()).unwrap();
        for n in [1, 7, 511, 2048, 44100] {
            let input = sine(440.0, 44100, n);
            for semitones in [-12.0, -2.8, 1.65, 7.0, 12.0] {
                let output = shifter.shift_channel(&input, 44100, semitones).unwrap();
                assert_eq!(output.len(), n, "n={}, semitones={}", n, semitones);
            }
        }
    }

    #[test]
    fn test_octave_up_doubles_frequency() {
        let sr = 44100;
        let input = sine(220.0, sr, sr as usize);
        let mut shifter = PhaseVocoderShifter::new(ShiftParams::default()).unwrap();
        let output = shifter.shift_channel(&input, sr, 12.0).unwrap();
        let freq = zero_crossing_freq(&output[4096..output.len() - 4096], sr);
        assert!((freq - 440.0).abs() < 10.0, "estimated {} Hz", freq);
    }

    #[test]
    fn test_octave_down_halves_frequency() {
        let sr = 44100;
        let input = sine(880.0, sr, sr as usize);
        let mut shifter = PhaseVocoderShifter::new(ShiftParams::default()).unwrap();
        let output = shifter.shift_channel(&input, sr, -12.0).unwrap();
        let freq = zero_crossing_freq(&output[4096..output.len() - 4096], sr);
        assert!((freq - 440.0).abs() < 10.0, "estimated {} Hz", freq);
    }

    #[test]
    fn test_rejects_zero_sample_rate() {
        let mut shifter = PhaseVocoderShifter::new(ShiftParams::default()).unwrap();
        assert!(matches!(
            shifter.shift_channel(&[0.1; 4096], 0, 2.0),
            Err(PitchError::Processing(_))
        ));
    }

    #[test]
    fn test_extreme_shifts_degrade_instead_of_failing() {
        let input = sine(440.0, 44100, 8192);
        let mut shifter = PhaseVocoderShifter::new(ShiftParams::default()).unwrap();
        // 2^(100/12) ≈ 322 is clamped; 2^(-120/12) ≈ 0.001 floors the synthesis hop.
        for semitones in [100.0, 12.0 * 0.001f64.log2(), -1000.0] {
            let output = shifter.shift_channel(&input, 44100, semitones).unwrap();
            assert_eq!(output.len(), input.len(), "semitones={}", semitones);
            assert!(output.iter().all(|s| s.is_finite()), "semitones={}", semitones);
        }
    }

    #[test]
    fn test_clamped_ratio_matches_ratio_max() {
        let sr = 44100;
        let input = sine(110.0, sr, sr as usize);
        let mut shifter = PhaseVocoderShifter::new(ShiftParams::default()).unwrap();
        let clamped = shifter.shift_channel(&input, sr, 60.0).unwrap();
        let at_max = shifter
            .shift_channel(&input, sr, 12.0 * RATIO_MAX.log2())
            .unwrap();
        assert_eq!(clamped, at_max);
    }

    #[test]
    fn test_rejects_non_finite_semitones() {
        let mut shifter = PhaseVocoderShifter::new(ShiftParams::default()).unwrap();
        assert!(matches!(
            shifter.shift_channel(&[0.1; 4096], 44100, f64::NAN),
            Err(PitchError::Processing(_))
        ));
    }

    #[test]
    fn test_invalid_params_rejected_at_construction() {
        let params = ShiftParams::default().with_fft_size(1000);
        assert!(PhaseVocoderShifter::new(params).is_err());
    }
}
