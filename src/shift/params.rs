//! Configuration for the pitch-shift engine.

use std::fmt;

use crate::core::fft::{MAX_FFT_SIZE, MIN_FFT_SIZE};
use crate::core::window::WindowType;
use crate::error::PitchError;

/// Default FFT size for the phase vocoder (~46 ms at 44.1 kHz).
pub const DEFAULT_FFT_SIZE: usize = 2048;

/// Parameters controlling the pitch-shift engine.
///
/// Built with [`ShiftParams::default`] and the `with_*` methods:
///
/// ```
/// use wavpitch::{ShiftParams, WindowType};
///
/// let params = ShiftParams::default()
///     .with_fft_size(4096)
///     .with_window_type(WindowType::BlackmanHarris)
///     .with_normalize(false);
/// assert!(params.validate().is_ok());
/// assert_eq!(params.effective_hop_size(), 1024);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ShiftParams {
    /// FFT size for the phase vocoder (power of two, default: 2048).
    pub fft_size: usize,
    /// Analysis hop size (default: fft_size / 4).
    pub hop_size: Option<usize>,
    /// Analysis/synthesis window (default: Hann).
    pub window_type: WindowType,
    /// Lock non-peak bin phases to their nearest spectral peak (default: true).
    pub phase_locking: bool,
    /// Peak-normalize the result when it would clip (default: true).
    pub normalize: bool,
}

impl Default for ShiftParams {
    fn default() -> Self {
        Self {
            fft_size: DEFAULT_FFT_SIZE,
            hop_size: None,
            window_type: WindowType::Hann,
            phase_locking: true,
            normalize: true,
        }
    }
}

impl ShiftParams {
    /// Set the FFT size.
    pub fn with_fft_size(mut self, fft_size: usize) -> Self {
        self.fft_size = fft_size;
        self
    }

    /// Set the analysis hop size.
    pub fn with_hop_size(mut self, hop_size: usize) -> Self {
        self.hop_size = Some(hop_size);
        self
    }

    /// Set the window type.
    pub fn with_window_type(mut self, window_type: WindowType) -> Self {
        self.window_type = window_type;
        self
    }

    /// Enable or disable identity phase locking.
    pub fn with_phase_locking(mut self, phase_locking: bool) -> Self {
        self.phase_locking = phase_locking;
        self
    }

    /// Enable or disable peak normalization of the result.
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Get the effective analysis hop size.
    pub fn effective_hop_size(&self) -> usize {
        self.hop_size.unwrap_or(self.fft_size / 4)
    }

    /// Validate all parameters.
    pub fn validate(&self) -> Result<(), PitchError> {
        if !self.fft_size.is_power_of_two()
            || !(MIN_FFT_SIZE..=MAX_FFT_SIZE).contains(&self.fft_size)
        {
            return Err(PitchError::InvalidParameter {
                name: "fft_size",
                value: self.fft_size.to_string(),
                reason: format!(
                    "must be a power of two between {} and {}",
                    MIN_FFT_SIZE, MAX_FFT_SIZE
                ),
            });
        }
        let hop = self.effective_hop_size();
        if hop == 0 || hop > self.fft_size / 2 {
            return Err(PitchError::InvalidParameter {
                name: "hop_size",
                value: hop.to_string(),
                reason: format!("must be between 1 and {} (half the FFT size)", self.fft_size / 2),
            });
        }
        Ok(())
    }
}

impl fmt::Display for ShiftParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fft={}, hop={}, window={}, phase_locking={}, normalize={}",
            self.fft_size,
            self.effective_hop_size(),
            self.window_type,
            self.phase_locking,
            self.normalize
        )
    }
}
