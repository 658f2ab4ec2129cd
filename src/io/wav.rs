use std::fs::File;
use std::io::{BufReader, Cursor, Read, Write};
use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::core::types::{AudioBuffer, Channels, Sample};
use crate::error::PitchError;

/// Bit depth of files written by this crate.
pub const OUTPUT_BITS_PER_SAMPLE: u16 = 24;

/// Full-scale value of a signed 24-bit sample.
const PCM24_MAX: f32 = 8_388_607.0;

/// Reads a WAV file from a byte slice.
pub fn read_wav(data: &[u8]) -> Result<AudioBuffer, PitchError> {
    decode(WavReader::new(Cursor::new(data))?)
}

/// Reads a WAV file from disk at its native sample rate.
///
/// # Errors
///
/// [`PitchError::FileAccess`] if the file cannot be opened,
/// [`PitchError::Format`] if it is not a supported mono or stereo WAV.
pub fn read_wav_file(path: impl AsRef<Path>) -> Result<AudioBuffer, PitchError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| PitchError::file_access(path, e))?;
    if path.is_dir() {
        return Err(PitchError::file_access(
            path,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "is a directory"),
        ));
    }
    let reader = WavReader::new(BufReader::new(file)).map_err(|e| match PitchError::from(e) {
        PitchError::Format(msg) => PitchError::Format(format!("{}: {}", path.display(), msg)),
        other => other,
    })?;
    decode(reader)
}

fn decode<R: Read>(reader: WavReader<R>) -> Result<AudioBuffer, PitchError> {
    let spec = reader.spec();

    let channels = Channels::from_count(spec.channels).ok_or_else(|| {
        PitchError::Format(format!(
            "unsupported channel count: {} (expected mono or stereo)",
            spec.channels
        ))
    })?;
    if spec.sample_rate == 0 {
        return Err(PitchError::Format("sample rate is 0".to_string()));
    }

    let samples: Vec<Sample> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, 32) => reader
            .into_samples::<f32>()
            .collect::<Result<Vec<_>, hound::Error>>()?,
        (SampleFormat::Int, bits @ 8..=32) => {
            let scale = (1i64 << (bits - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<Vec<_>, hound::Error>>()?
        }
        (fmt, bits) => {
            return Err(PitchError::Format(format!(
                "unsupported sample format: {:?}, {} bits",
                fmt, bits
            )))
        }
    };

    Ok(AudioBuffer::new(samples, spec.sample_rate, channels))
}

#[inline]
fn to_pcm24(sample: Sample) -> i32 {
    (sample.clamp(-1.0, 1.0) * PCM24_MAX).round() as i32
}

fn encode_error(err: hound::Error) -> PitchError {
    PitchError::Processing(format!("WAV encoding failed: {}", err))
}

/// Encodes an audio buffer as a 24-bit PCM WAV file in memory.
///
/// Samples are clamped to [-1.0, 1.0] before quantization.
pub fn write_wav_24bit(buffer: &AudioBuffer) -> Result<Vec<u8>, PitchError> {
    let spec = WavSpec {
        channels: buffer.channels.count() as u16,
        sample_rate: buffer.sample_rate,
        bits_per_sample: OUTPUT_BITS_PER_SAMPLE,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::with_capacity(44 + buffer.data.len() * 3));
    let mut writer = WavWriter::new(&mut cursor, spec).map_err(encode_error)?;
    for &sample in &buffer.data {
        writer.write_sample(to_pcm24(sample)).map_err(encode_error)?;
    }
    writer.finalize().map_err(encode_error)?;

    Ok(cursor.into_inner())
}

/// Writes a buffer to disk as 24-bit PCM WAV, replacing any existing file.
///
/// The file is encoded in memory, written next to the destination as
/// `<name>.partial`, and renamed into place, so a failure never leaves a
/// truncated file at `path`.
pub fn write_wav_file_24bit(path: impl AsRef<Path>, buffer: &AudioBuffer) -> Result<(), PitchError> {
    let path = path.as_ref();
    let data = write_wav_24bit(buffer)?;
    let partial = partial_path(path).ok_or_else(|| {
        PitchError::file_access(
            path,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a file path"),
        )
    })?;

    let result = File::create(&partial)
        .and_then(|mut file| {
            file.write_all(&data)?;
            file.sync_all()
        })
        .and_then(|()| std::fs::rename(&partial, path));

    if let Err(e) = result {
        let _ = std::fs::remove_file(&partial);
        return Err(PitchError::file_access(path, e));
    }
    Ok(())
}

fn partial_path(path: &Path) -> Option<PathBuf> {
    let mut name = path.file_name()?.to_os_string();
    name.push(".partial");
    Some(path.with_file_name(name))
}
