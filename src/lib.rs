#![forbid(unsafe_code)]
//! Change the pitch of WAV audio by a percentage without changing its duration.
//!
//! `wavpitch` converts a percentage into a semitone offset
//! (`12 * log2(1 + p / 100)`), shifts the audio with a phase vocoder followed
//! by resampling, optionally peak-normalizes the result, and writes 24-bit PCM.
//!
//! # Quick Start
//!
//! ```
//! use wavpitch::{AudioBuffer, ShiftParams};
//!
//! // 1 second of 440 Hz sine at 44.1 kHz
//! let buffer = AudioBuffer::from_mono(
//!     (0..44100)
//!         .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 44100.0).sin())
//!         .collect(),
//!     44100,
//! );
//!
//! let semitones = wavpitch::percentage_to_semitones(10.0).unwrap(); // ≈ 1.650
//! let shifted = wavpitch::shift_pitch(&buffer, semitones, &ShiftParams::default()).unwrap();
//! let shifted = wavpitch::normalize_peak(&shifted);
//! assert_eq!(shifted.num_frames(), buffer.num_frames()); // same duration
//! ```
//!
//! # Files
//!
//! [`ShiftJob`] runs the whole conversion on disk:
//!
//! ```no_run
//! let report = wavpitch::ShiftJob::new("in.wav", "out.wav", -15.0).run()?;
//! println!("{:.2} semitones, {} frames", report.semitones, report.num_frames);
//! # Ok::<(), wavpitch::PitchError>(())
//! ```

pub mod convert;
pub mod core;
pub mod error;
pub mod io;
pub mod normalize;
pub mod pipeline;
pub mod shift;

pub use convert::{percentage_to_semitones, semitones_to_ratio};
pub use crate::core::types::{AudioBuffer, Channels, Sample};
pub use crate::core::window::WindowType;
pub use error::PitchError;
pub use normalize::normalize_peak;
pub use pipeline::{ShiftJob, ShiftReport};
pub use shift::{shift_pitch, shift_pitch_with, PhaseVocoderShifter, PitchShifter, ShiftParams};
