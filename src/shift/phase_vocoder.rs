//! Phase vocoder time stretching with identity phase locking.

use std::f32::consts::PI;
use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use crate::core::fft::{COMPLEX_ZERO, WINDOW_SUM_EPSILON, WINDOW_SUM_FLOOR_RATIO};
use crate::core::window::{generate_window, WindowType};
use crate::error::PitchError;

const TWO_PI: f32 = 2.0 * PI;

/// Phase vocoder state for time stretching.
pub struct PhaseVocoder {
    fft_size: usize,
    hop_analysis: usize,
    hop_synthesis: usize,
    window: Vec<f32>,
    phase_locking: bool,
    fft_forward: Arc<dyn Fft<f32>>,
    fft_inverse: Arc<dyn Fft<f32>>,
    /// Phase accumulator for resynthesis.
    phase_accum: Vec<f32>,
    /// Previous analysis phase.
    prev_phase: Vec<f32>,
    /// Pre-computed expected phase advance per bin over one analysis hop.
    expected_phase_advance: Vec<f32>,
    /// Reusable FFT buffer.
    fft_buffer: Vec<Complex<f32>>,
    magnitudes: Vec<f32>,
    /// Analysis phases of the current frame.
    phases: Vec<f32>,
    /// Synthesis phases of the current frame.
    new_phases: Vec<f32>,
    /// Reusable peaks buffer for identity phase locking.
    peaks: Vec<usize>,
}

impl PhaseVocoder {
    /// Creates a phase vocoder that stretches time by roughly `stretch_ratio`.
    ///
    /// The synthesis hop is `hop_analysis * stretch_ratio` rounded to a whole
    /// sample; [`effective_ratio`](Self::effective_ratio) reports the exact
    /// ratio applied.
    pub fn new(
        fft_size: usize,
        hop_analysis: usize,
        stretch_ratio: f64,
        window_type: WindowType,
        phase_locking: bool,
    ) -> Self {
        let hop_synthesis = ((hop_analysis as f64 * stretch_ratio).round() as usize).max(1);
        let window = generate_window(window_type, fft_size);
        let num_bins = fft_size / 2 + 1;

        let expected_phase_advance: Vec<f32> = (0..num_bins)
            .map(|bin| TWO_PI * bin as f32 * hop_analysis as f32 / fft_size as f32)
            .collect();

        let mut planner = FftPlanner::new();
        let fft_forward = planner.plan_fft_forward(fft_size);
        let fft_inverse = planner.plan_fft_inverse(fft_size);

        Self {
            fft_size,
            hop_analysis,
            hop_synthesis,
            window,
            phase_locking,
            fft_forward,
            fft_inverse,
            phase_accum: vec![0.0; num_bins],
            prev_phase: vec![0.0; num_bins],
            expected_phase_advance,
            fft_buffer: vec![COMPLEX_ZERO; fft_size],
            magnitudes: vec![0.0; num_bins],
            phases: vec![0.0; num_bins],
            new_phases: vec![0.0; num_bins],
            peaks: Vec::with_capacity(num_bins / 4),
        }
    }

    #[inline]
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    #[inline]
    pub fn hop_analysis(&self) -> usize {
        self.hop_analysis
    }

    #[inline]
    pub fn hop_synthesis(&self) -> usize {
        self.hop_synthesis
    }

    /// The stretch ratio actually applied: synthesis hop over analysis hop.
    #[inline]
    pub fn effective_ratio(&self) -> f64 {
        self.hop_synthesis as f64 / self.hop_analysis as f64
    }

    /// Output length produced for an input of `input_len` samples.
    pub fn output_len(&self, input_len: usize) -> usize {
        if input_len < self.fft_size {
            return 0;
        }
        let num_frames = (input_len - self.fft_size) / self.hop_analysis + 1;
        (num_frames - 1) * self.hop_synthesis + self.fft_size
    }

    /// Stretches a mono signal.
    ///
    /// Frame `k` is analysed at `k * hop_analysis` and resynthesised at
    /// `k * hop_synthesis`, so content around input position `t` lands near
    /// `(t - fft_size / 2) * effective_ratio + fft_size / 2` in the output.
    pub fn process(&mut self, input: &[f32]) -> Result<Vec<f32>, PitchError> {
        if input.len() < self.fft_size {
            return Err(PitchError::InputTooShort {
                provided: input.len(),
                minimum: self.fft_size,
            });
        }

        let num_bins = self.fft_size / 2 + 1;
        let num_frames = (input.len() - self.fft_size) / self.hop_analysis + 1;
        let output_len = self.output_len(input.len());

        let mut output = vec![0.0f32; output_len];
        let mut window_sum = vec![0.0f32; output_len];

        self.phase_accum.iter_mut().for_each(|x| *x = 0.0);
        self.prev_phase.iter_mut().for_each(|x| *x = 0.0);

        let hop_ratio = self.hop_synthesis as f32 / self.hop_analysis as f32;
        let norm = 1.0 / self.fft_size as f32;

        for frame_idx in 0..num_frames {
            let analysis_pos = frame_idx * self.hop_analysis;
            let synthesis_pos = frame_idx * self.hop_synthesis;

            let input_frame = &input[analysis_pos..analysis_pos + self.fft_size];
            for (slot, (&sample, &win)) in self
                .fft_buffer
                .iter_mut()
                .zip(input_frame.iter().zip(self.window.iter()))
            {
                *slot = Complex::new(sample * win, 0.0);
            }

            self.fft_forward.process(&mut self.fft_buffer);

            for bin in 0..num_bins {
                let c = self.fft_buffer[bin];
                self.magnitudes[bin] = c.norm();
                let phase = c.arg();
                self.phases[bin] = phase;

                if frame_idx == 0 {
                    self.phase_accum[bin] = phase;
                } else {
                    // True bin frequency from the phase deviation against the
                    // expected advance, re-accumulated over the synthesis hop.
                    let expected = self.expected_phase_advance[bin];
                    let deviation = wrap_phase(phase - self.prev_phase[bin] - expected);
                    self.phase_accum[bin] =
                        wrap_phase(self.phase_accum[bin] + (expected + deviation) * hop_ratio);
                }
                self.prev_phase[bin] = phase;
            }

            self.new_phases.copy_from_slice(&self.phase_accum);
            if self.phase_locking && frame_idx > 0 {
                identity_phase_lock(
                    &self.magnitudes,
                    &self.phases,
                    &mut self.new_phases,
                    &mut self.peaks,
                );
                // Continue from the emitted phases so a bin that becomes a
                // peak in the next frame does not jump.
                self.phase_accum.copy_from_slice(&self.new_phases);
            }

            self.reconstruct_spectrum(num_bins);
            self.fft_inverse.process(&mut self.fft_buffer);

            let out_end = (synthesis_pos + self.fft_size).min(output_len);
            for i in 0..out_end - synthesis_pos {
                let out_idx = synthesis_pos + i;
                let w = self.window[i];
                output[out_idx] += self.fft_buffer[i].re * norm * w;
                window_sum[out_idx] += w * w;
            }
        }

        normalize_output(&mut output, &window_sum);
        Ok(output)
    }

    /// Reconstructs the complex spectrum from magnitudes and phases,
    /// then mirrors negative frequencies for inverse FFT.
    fn reconstruct_spectrum(&mut self, num_bins: usize) {
        for bin in 0..num_bins {
            self.fft_buffer[bin] = Complex::from_polar(self.magnitudes[bin], self.new_phases[bin]);
        }
        for bin in 1..num_bins - 1 {
            self.fft_buffer[self.fft_size - bin] = self.fft_buffer[bin].conj();
        }
    }
}

/// Normalizes output by window sum, clamping to prevent amplification in
/// low-overlap regions (occurs when synthesis hop > analysis hop).
fn normalize_output(output: &mut [f32], window_sum: &[f32]) {
    let max_window_sum = window_sum.iter().cloned().fold(0.0f32, f32::max);
    let min_window_sum = (max_window_sum * WINDOW_SUM_FLOOR_RATIO).max(WINDOW_SUM_EPSILON);
    for (sample, &ws) in output.iter_mut().zip(window_sum.iter()) {
        *sample /= ws.max(min_window_sum);
    }
}

/// Wraps a phase value to [-PI, PI).
#[inline]
fn wrap_phase(phase: f32) -> f32 {
    let p = phase + PI;
    p - (p / TWO_PI).floor() * TWO_PI - PI
}

/// Identity phase locking.
///
/// Each spectral peak keeps its propagated phase; every other bin takes the
/// phase of its nearest peak plus the analysis phase offset it had from that
/// peak, preserving the local shape of the spectrum around each partial.
fn identity_phase_lock(
    magnitudes: &[f32],
    analysis_phases: &[f32],
    synthesis_phases: &mut [f32],
    peaks: &mut Vec<usize>,
) {
    let num_bins = magnitudes.len();
    if num_bins < 3 {
        return;
    }

    peaks.clear();
    for bin in 1..num_bins - 1 {
        if magnitudes[bin] > magnitudes[bin - 1] && magnitudes[bin] >= magnitudes[bin + 1] {
            peaks.push(bin);
        }
    }
    if peaks.is_empty() {
        return;
    }

    let mut peak_idx = 0;
    for bin in 0..num_bins {
        while peak_idx + 1 < peaks.len()
            && peaks[peak_idx + 1].abs_diff(bin) < peaks[peak_idx].abs_diff(bin)
        {
            peak_idx += 1;
        }

        let nearest_peak = peaks[peak_idx];
        if bin != nearest_peak {
            synthesis_phases[bin] = synthesis_phases[nearest_peak]
                + (analysis_phases[bin] - analysis_phases[nearest_peak]);
        }
    }
}
