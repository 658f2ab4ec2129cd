//! Error types for the wavpitch crate.

use std::path::PathBuf;

/// Errors that can occur while converting, loading, shifting, or writing audio.
#[derive(Debug, thiserror::Error)]
pub enum PitchError {
    /// Percentage outside the domain of the semitone conversion (≤ -100 or non-finite).
    #[error("pitch percentage must be a finite number greater than -100, got {percentage}")]
    Domain { percentage: f64 },

    /// A file could not be opened, created, or written.
    #[error("cannot access '{}': {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input is not a valid or supported WAV file.
    #[error("invalid format: {0}")]
    Format(String),

    /// The pitch-shift engine rejected its input.
    #[error("processing failed: {0}")]
    Processing(String),

    /// Input too short for the given analysis frame.
    #[error("input too short: {provided} samples provided, {minimum} required")]
    InputTooShort { provided: usize, minimum: usize },

    /// Invalid engine parameter.
    #[error("invalid parameter `{name}`: got {value}, {reason}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Convenience Result type for wavpitch operations.
pub type Result<T> = std::result::Result<T, PitchError>;

/// Process exit code for runtime failures (I/O, format, processing).
pub const EXIT_RUNTIME_FAILURE: u8 = 1;
/// Process exit code for usage and argument-domain errors.
pub const EXIT_USAGE: u8 = 2;

impl PitchError {
    pub(crate) fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PitchError::FileAccess {
            path: path.into(),
            source,
        }
    }

    /// Exit code the command-line tool reports for this error.
    ///
    /// Domain errors are argument errors and share the usage code; every other
    /// variant is a runtime failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            PitchError::Domain { .. } => EXIT_USAGE,
            _ => EXIT_RUNTIME_FAILURE,
        }
    }
}

impl From<hound::Error> for PitchError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::FormatError(msg) => PitchError::Format(msg.to_string()),
            hound::Error::Unsupported => {
                PitchError::Format("unsupported WAV encoding".to_string())
            }
            hound::Error::TooWide => {
                PitchError::Format("sample does not fit the declared bit depth".to_string())
            }
            hound::Error::InvalidSampleFormat => {
                PitchError::Format("sample format does not match the header".to_string())
            }
            hound::Error::UnfinishedSample => {
                PitchError::Format("data chunk ends mid-sample".to_string())
            }
            hound::Error::IoError(e) => PitchError::Format(format!("read error: {}", e)),
        }
    }
}
