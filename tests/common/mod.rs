#![allow(dead_code)]

use std::f32::consts::PI;
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

pub fn gen_sine<F>(freq_hz: f32, sr: u32, n: usize, amp_fn: F) -> Vec<f32>
where
    F: Fn(usize) -> f32,
{
    (0..n)
        .map(|i| {
            let phase = 2.0 * PI * freq_hz * i as f32 / sr as f32;
            amp_fn(i) * phase.sin()
        })
        .collect()
}

/// Interleaved stereo with a different tone in each channel.
pub fn gen_stereo(freq_l: f32, freq_r: f32, amp: f32, sr: u32, n: usize) -> Vec<f32> {
    let left = gen_sine(freq_l, sr, n, |_| amp);
    let right = gen_sine(freq_r, sr, n, |_| amp);
    left.iter()
        .zip(right.iter())
        .flat_map(|(&l, &r)| [l, r])
        .collect()
}

pub fn gen_chord(freqs: &[f32], amp: f32, sr: u32, n: usize) -> Vec<f32> {
    (0..n)
        .map(|i| {
            let t = i as f32 / sr as f32;
            freqs.iter().map(|f| amp * (2.0 * PI * f * t).sin()).sum()
        })
        .collect()
}

pub fn channel(interleaved: &[f32], ch: usize, num_channels: usize) -> Vec<f32> {
    interleaved
        .iter()
        .skip(ch)
        .step_by(num_channels)
        .copied()
        .collect()
}

pub fn rms(signal: &[f32]) -> f64 {
    if signal.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = signal.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum_sq / signal.len() as f64).sqrt()
}

pub fn peak(signal: &[f32]) -> f32 {
    signal.iter().fold(0.0f32, |m, s| m.max(s.abs()))
}

pub fn count_positive_zero_crossings(signal: &[f32], start: usize, end: usize) -> usize {
    if signal.len() < 2 {
        return 0;
    }
    let start = start.min(signal.len() - 1);
    let end = end.min(signal.len());
    if end <= start + 1 {
        return 0;
    }
    (start..end - 1)
        .filter(|&i| signal[i] <= 0.0 && signal[i + 1] > 0.0)
        .count()
}

pub fn estimate_freq_zero_crossings(signal: &[f32], sr: u32, start: usize, end: usize) -> f64 {
    if end <= start + 1 {
        return 0.0;
    }
    let crossings = count_positive_zero_crossings(signal, start, end) as f64;
    let duration_secs = (end - start) as f64 / sr as f64;
    if duration_secs <= 0.0 {
        0.0
    } else {
        crossings / duration_secs
    }
}

/// Dominant frequency over the middle half of the signal, away from the edges.
pub fn estimate_freq_middle(signal: &[f32], sr: u32) -> f64 {
    let n = signal.len();
    estimate_freq_zero_crossings(signal, sr, n / 4, 3 * n / 4)
}

pub fn write_wav_16bit(path: &Path, data: &[f32], sr: u32, channels: u16) {
    let spec = WavSpec {
        channels,
        sample_rate: sr,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec).unwrap();
    for &s in data {
        writer
            .write_sample((s.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16)
            .unwrap();
    }
    writer.finalize().unwrap();
}

pub fn write_wav_float(path: &Path, data: &[f32], sr: u32, channels: u16) {
    let spec = WavSpec {
        channels,
        sample_rate: sr,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(path, spec).unwrap();
    for &s in data {
        writer.write_sample(s).unwrap();
    }
    writer.finalize().unwrap();
}

/// Reads a WAV file back with hound, returning its spec and samples scaled to [-1, 1].
pub fn read_wav_raw(path: &Path) -> (WavSpec, Vec<f32>) {
    let reader = WavReader::open(path).unwrap();
    let spec = reader.spec();
    let samples = match spec.sample_format {
        SampleFormat::Float => reader.into_samples::<f32>().map(|s| s.unwrap()).collect(),
        SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.unwrap() as f32 / scale)
                .collect()
        }
    };
    (spec, samples)
}
