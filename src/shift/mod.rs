//! The pitch-shift engine and its buffer-level entry points.

pub mod params;
pub mod phase_vocoder;
pub mod pitch;

pub use params::ShiftParams;
pub use phase_vocoder::PhaseVocoder;
pub use pitch::{PhaseVocoderShifter, PitchShifter};

use crate::core::types::AudioBuffer;
use crate::error::PitchError;

/// Shifts the pitch of an [`AudioBuffer`] without changing its duration.
///
/// Positive `semitones` raise the pitch, negative lower it, and `0.0` returns
/// the buffer unchanged. The result has the same sample rate, channel layout,
/// and frame count as the input. Normalization is not applied here; see
/// [`crate::normalize`].
///
/// # Errors
///
/// Returns [`PitchError::InvalidParameter`] for invalid `params`, and
/// [`PitchError::Processing`] if the sample rate is zero, `semitones` is not
/// finite, or the buffer contains NaN/Inf samples.
///
/// # Example
///
/// ```
/// use wavpitch::{AudioBuffer, ShiftParams};
///
/// let buffer = AudioBuffer::from_mono(
///     (0..44100)
///         .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 44100.0).sin())
///         .collect(),
///     44100,
/// );
/// let output = wavpitch::shift_pitch(&buffer, 1.650042, &ShiftParams::default()).unwrap();
/// assert_eq!(output.num_frames(), buffer.num_frames());
/// assert_eq!(output.sample_rate, 44100);
/// ```
pub fn shift_pitch(
    buffer: &AudioBuffer,
    semitones: f64,
    params: &ShiftParams,
) -> Result<AudioBuffer, PitchError> {
    let mut shifter = PhaseVocoderShifter::new(params.clone())?;
    shift_pitch_with(buffer, semitones, &mut shifter)
}

/// Shifts the pitch of an [`AudioBuffer`] with any [`PitchShifter`].
///
/// Channels are split out of the interleaved buffer, shifted one at a time
/// with the same engine, and interleaved again.
pub fn shift_pitch_with<S: PitchShifter + ?Sized>(
    buffer: &AudioBuffer,
    semitones: f64,
    shifter: &mut S,
) -> Result<AudioBuffer, PitchError> {
    if buffer.sample_rate == 0 {
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
    validate_input(&buffer.data)?;

    if buffer.is_empty() || semitones == 0.0 {
        return Ok(buffer.clone());
    }

    let mut outputs = Vec::with_capacity(buffer.channels.count());
    for (ch, samples) in buffer.to_channels().iter().enumerate() {
        let shifted = shifter.shift_channel(samples, buffer.sample_rate, semitones)?;
        if shifted.len() != samples.len() {
            return Err(PitchError::Processing(format!(
                "channel {} changed length: {} -> {} samples",
                ch,
                samples.len(),
                shifted.len()
            )));
        }
        outputs.push(shifted);
    }

    AudioBuffer::from_channels(&outputs, buffer.sample_rate)
}

/// Rejects input containing NaN or infinite samples.
#[inline]
fn validate_input(input: &[f32]) -> Result<(), PitchError> {
    if let Some(pos) = input.iter().position(|s| !s.is_finite()) {
        return Err(PitchError::Processing(format!(
            "input contains a non-finite sample at index {}",
            pos
        )));
    }
    Ok(())
}
