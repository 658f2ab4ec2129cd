use crate::error::PitchError;

/// A single audio sample (32-bit float, nominal range -1.0 to 1.0).
pub type Sample = f32;

/// Channel layout of an [`AudioBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channels {
    Mono,
    Stereo,
}

impl Channels {
    /// Number of channels in this layout.
    #[inline]
    pub fn count(self) -> usize {
        match self {
            Channels::Mono => 1,
            Channels::Stereo => 2,
        }
    }

    /// Layout for a raw channel count, or `None` if unsupported.
    pub fn from_count(count: u16) -> Option<Self> {
        match count {
            1 => Some(Channels::Mono),
            2 => Some(Channels::Stereo),
            _ => None,
        }
    }
}

/// Buffer holding audio samples in interleaved (sample-major) format.
///
/// For mono audio, samples are stored sequentially: `[s0, s1, s2, ...]`
/// For stereo audio, samples are interleaved: `[L0, R0, L1, R1, ...]`
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    /// Raw interleaved sample data.
    pub data: Vec<Sample>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel layout.
    pub channels: Channels,
}

impl AudioBuffer {
    /// Create a new audio buffer from interleaved samples.
    pub fn new(data: Vec<Sample>, sample_rate: u32, channels: Channels) -> Self {
        Self {
            data,
            sample_rate,
            channels,
        }
    }

    /// Create a mono buffer.
    pub fn from_mono(data: Vec<Sample>, sample_rate: u32) -> Self {
        Self::new(data, sample_rate, Channels::Mono)
    }

    /// Create a stereo buffer from interleaved L/R samples.
    pub fn from_stereo(data: Vec<Sample>, sample_rate: u32) -> Self {
        Self::new(data, sample_rate, Channels::Stereo)
    }

    /// Create an `AudioBuffer` from separate (channel-major) channel vectors.
    ///
    /// # Errors
    /// Returns [`PitchError::Processing`] if there are not one or two channels
    /// or if the channels differ in length.
    pub fn from_channels(channels_data: &[Vec<Sample>], sample_rate: u32) -> Result<Self, PitchError> {
        let channels = u16::try_from(channels_data.len())
            .ok()
            .and_then(Channels::from_count)
            .ok_or_else(|| {
                PitchError::Processing(format!(
                    "expected 1 or 2 channels, got {}",
                    channels_data.len()
                ))
            })?;
        let num_frames = channels_data[0].len();
        if channels_data.iter().any(|ch| ch.len() != num_frames) {
            return Err(PitchError::Processing(
                "all channels must have the same number of samples".to_string(),
            ));
        }
        Ok(Self::new(interleave(channels_data), sample_rate, channels))
    }

    /// Number of frames in the buffer (total samples / channels).
    pub fn num_frames(&self) -> usize {
        self.data.len() / self.channels.count()
    }

    /// Duration of the audio in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.num_frames() as f64 / self.sample_rate as f64
    }

    /// Returns true if the buffer contains no samples.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get a single channel's data as a new vector.
    pub fn channel_data(&self, channel: usize) -> Vec<Sample> {
        let num_ch = self.channels.count();
        if channel >= num_ch {
            return Vec::new();
        }
        self.data
            .iter()
            .skip(channel)
            .step_by(num_ch)
            .copied()
            .collect()
    }

    /// Splits the buffer into channel-major vectors.
    pub fn to_channels(&self) -> Vec<Vec<Sample>> {
        deinterleave(&self.data, self.channels.count())
    }
}

/// Deinterleaves multi-channel audio into separate per-channel vectors.
#[inline]
pub fn deinterleave(input: &[f32], num_channels: usize) -> Vec<Vec<f32>> {
    (0..num_channels)
        .map(|ch| {
            input
                .iter()
                .skip(ch)
                .step_by(num_channels)
                .copied()
                .collect()
        })
        .collect()
}

/// Interleaves per-channel vectors into a single buffer, truncating to the shortest channel.
#[inline]
pub fn interleave(channels: &[Vec<f32>]) -> Vec<f32> {
    let min_len = channels.iter().map(|c| c.len()).min().unwrap_or(0);
    (0..min_len)
        .flat_map(|i| channels.iter().map(move |ch| ch[i]))
        .collect()
}
