//! End-to-end file conversion: load, shift, normalize, write.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::convert::{is_within_safe_range, percentage_to_semitones, SAFE_PERCENTAGE_MAX, SAFE_PERCENTAGE_MIN};
use crate::core::types::Channels;
use crate::error::PitchError;
use crate::io::wav::{read_wav_file, write_wav_file_24bit};
use crate::normalize::{normalize_peak_in_place, peak};
use crate::shift::{shift_pitch, ShiftParams};

/// One pitch-shift conversion from an input WAV file to an output WAV file.
#[derive(Debug, Clone)]
pub struct ShiftJob {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Pitch change in percent; must be greater than -100.
    pub percentage: f64,
    pub params: ShiftParams,
}

/// Summary of a completed [`ShiftJob`].
#[derive(Debug, Clone)]
pub struct ShiftReport {
    pub semitones: f64,
    pub sample_rate: u32,
    pub channels: Channels,
    pub num_frames: usize,
    /// Peak of the shifted audio before normalization.
    pub shifted_peak: f32,
    /// Gain applied by peak normalization, if it ran.
    pub normalize_gain: Option<f32>,
    pub elapsed: Duration,
}

impl ShiftJob {
    /// A job with default engine parameters.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>, percentage: f64) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            percentage,
            params: ShiftParams::default(),
        }
    }

    pub fn with_params(mut self, params: ShiftParams) -> Self {
        self.params = params;
        self
    }

    /// Runs the conversion.
    ///
    /// The percentage is validated before any file is touched, and the output
    /// is written only after shifting succeeds, so every failure leaves the
    /// output path as it was.
    ///
    /// # Errors
    ///
    /// [`PitchError::Domain`] for a percentage ≤ -100, [`PitchError::FileAccess`]
    /// or [`PitchError::Format`] for unreadable input, engine errors from
    /// [`shift_pitch`], and [`PitchError::FileAccess`] when the output cannot
    /// be written.
    pub fn run(&self) -> Result<ShiftReport, PitchError> {
        let start = Instant::now();

        let semitones = percentage_to_semitones(self.percentage)?;
        if !is_within_safe_range(self.percentage) {
            warn!(
                "Pitch change of {}% is outside {}%..{}%; expect audible artifacts",
                self.percentage, SAFE_PERCENTAGE_MIN, SAFE_PERCENTAGE_MAX
            );
        }

        info!("Loading audio file: {}", self.input.display());
        let input = read_wav_file(&self.input)?;
        info!(
            "Input: {} frames, {} Hz, {:?}, {:.2}s",
            input.num_frames(),
            input.sample_rate,
            input.channels,
            input.duration_secs()
        );

        info!("Pitch change: {}% ({:.2} semitones)", self.percentage, semitones);
        debug!("Engine parameters: {}", self.params);
        let mut output = shift_pitch(&input, semitones, &self.params)?;

        let shifted_peak = peak(&output.data);
        let normalize_gain = if self.params.normalize {
            normalize_peak_in_place(&mut output.data)
        } else {
            None
        };
        match normalize_gain {
            Some(gain) => info!(
                "Normalized peak {:.3} to 1.0 (gain {:.2} dB)",
                shifted_peak,
                20.0 * gain.log10()
            ),
            None if shifted_peak > 1.0 => warn!(
                "Output peaks at {:.3} and will clip (normalization disabled)",
                shifted_peak
            ),
            None => {}
        }

        info!("Saving output file: {}", self.output.display());
        write_wav_file_24bit(&self.output, &output)?;

        let report = ShiftReport {
            semitones,
            sample_rate: output.sample_rate,
            channels: output.channels,
            num_frames: output.num_frames(),
            shifted_peak,
            normalize_gain,
            elapsed: start.elapsed(),
        };
        debug!("{:?}", report);
        Ok(report)
    }
}
