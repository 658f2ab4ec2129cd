//! Test signal generator: writes WAV fixtures for manual listening tests.
//!
//! Run with: `cargo run --example generate_test_audio`
//!
//! Generates the following files in `test_audio/`:
//! - `tone_440hz_mono_1s_44100sr.wav`: 1s mono 440 Hz sine, 16-bit
//! - `tone_stereo_2s_48000sr.wav`: 2s stereo (L=440Hz, R=660Hz), 24-bit
//! - `sweep_100_4k_mono_3s_44100sr.wav`: 3s logarithmic sweep 100Hz to 4kHz, float
//! - `chord_loud_mono_2s_44100sr.wav`: 2s A-major triad peaking near full scale
//!
//! Pitch them with e.g. `wavpitch test_audio/tone_440hz_mono_1s_44100sr.wav out.wav 10`
//! (expect ~484 Hz).

use std::f32::consts::PI;
use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};

const TWO_PI: f32 = 2.0 * PI;

enum Encoding {
    Pcm16,
    Pcm24,
    Float,
}

struct Fixture {
    name: &'static str,
    sample_rate: u32,
    channels: u16,
    encoding: Encoding,
    data: Vec<f32>,
}

fn main() -> Result<(), hound::Error> {
    let fixtures = vec![
        Fixture {
            name: "tone_440hz_mono_1s_44100sr",
            sample_rate: 44100,
            channels: 1,
            encoding: Encoding::Pcm16,
            data: sine(440.0, 44100, 1.0, 0.5),
        },
        Fixture {
            name: "tone_stereo_2s_48000sr",
            sample_rate: 48000,
            channels: 2,
            encoding: Encoding::Pcm24,
            data: sine_stereo(440.0, 660.0, 48000, 2.0),
        },
        Fixture {
            name: "sweep_100_4k_mono_3s_44100sr",
            sample_rate: 44100,
            channels: 1,
            encoding: Encoding::Float,
            data: freq_sweep(100.0, 4000.0, 44100, 3.0),
        },
        Fixture {
            name: "chord_loud_mono_2s_44100sr",
            sample_rate: 44100,
            channels: 1,
            encoding: Encoding::Pcm16,
            data: chord(&[220.0, 277.18, 329.63], 44100, 2.0),
        },
    ];

    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("test_audio");
    for fixture in &fixtures {
        let path = dir.join(format!("{}.wav", fixture.name));
        write_fixture(&path, fixture)?;
        let frames = fixture.data.len() / fixture.channels as usize;
        println!(
            "  {} ({:.1}s, {} ch, {} frames)",
            path.display(),
            frames as f32 / fixture.sample_rate as f32,
            fixture.channels,
            frames
        );
    }
    println!("Done: {} files generated.", fixtures.len());
    Ok(())
}

fn write_fixture(path: &Path, fixture: &Fixture) -> Result<(), hound::Error> {
    let (bits_per_sample, sample_format) = match fixture.encoding {
        Encoding::Pcm16 => (16, SampleFormat::Int),
        Encoding::Pcm24 => (24, SampleFormat::Int),
        Encoding::Float => (32, SampleFormat::Float),
    };
    let spec = WavSpec {
        channels: fixture.channels,
        sample_rate: fixture.sample_rate,
        bits_per_sample,
        sample_format,
    };

    let mut writer = WavWriter::create(path, spec)?;
    for &s in &fixture.data {
        let s = s.clamp(-1.0, 1.0);
        match fixture.encoding {
            Encoding::Pcm16 => writer.write_sample((s * i16::MAX as f32).round() as i16)?,
            Encoding::Pcm24 => writer.write_sample((s * 8_388_607.0).round() as i32)?,
            Encoding::Float => writer.write_sample(s)?,
        }
    }
    writer.finalize()
}

// ── Signal generators ────────────────────────────────────────────────────────

fn sine(freq: f32, sample_rate: u32, duration: f32, amp: f32) -> Vec<f32> {
    let n = (sample_rate as f32 * duration) as usize;
    (0..n)
        .map(|i| amp * (TWO_PI * freq * i as f32 / sample_rate as f32).sin())
        .collect()
}

fn sine_stereo(freq_l: f32, freq_r: f32, sample_rate: u32, duration: f32) -> Vec<f32> {
    let n = (sample_rate as f32 * duration) as usize;
    let mut data = Vec::with_capacity(n * 2);
    for i in 0..n {
        let t = i as f32 / sample_rate as f32;
        data.push(0.5 * (TWO_PI * freq_l * t).sin());
        data.push(0.5 * (TWO_PI * freq_r * t).sin());
    }
    data
}

fn freq_sweep(start_hz: f32, end_hz: f32, sample_rate: u32, duration: f32) -> Vec<f32> {
    let n = (sample_rate as f32 * duration) as usize;
    let log_start = start_hz.ln();
    let log_end = end_hz.ln();

    let mut phase: f32 = 0.0;
    (0..n)
        .map(|i| {
            let t = i as f32 / n as f32;
            let freq = (log_start + (log_end - log_start) * t).exp();
            phase += TWO_PI * freq / sample_rate as f32;
            if phase > TWO_PI {
                phase -= TWO_PI;
            }
            phase.sin() * 0.6
        })
        .collect()
}

/// Equal-amplitude partials scaled so the sum peaks just under full scale.
/// Pitching this up usually pushes the peak past 1.0, which exercises
/// normalization.
fn chord(freqs: &[f32], sample_rate: u32, duration: f32) -> Vec<f32> {
    let n = (sample_rate as f32 * duration) as usize;
    let mut data: Vec<f32> = (0..n)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            freqs.iter().map(|f| (TWO_PI * f * t).sin()).sum()
        })
        .collect();
    let peak = data.iter().fold(0.0f32, |m, s| m.max(s.abs()));
    if peak > 0.0 {
        for s in &mut data {
            *s *= 0.98 / peak;
        }
    }
    data
}
