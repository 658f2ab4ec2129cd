use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use log::info;

use wavpitch::error::EXIT_USAGE;
use wavpitch::shift::params::DEFAULT_FFT_SIZE;
use wavpitch::{ShiftJob, ShiftParams, WindowType};

const EXAMPLES: &str = "\
Examples:
  wavpitch in.wav out.wav 10       Raise pitch by 10% (~1.65 semitones)
  wavpitch in.wav out.wav -15      Lower pitch by 15%
  wavpitch in.wav out.wav 100      Up one octave
  wavpitch in.wav out.wav 5 --window blackman-harris --fft-size 4096";

/// Shift the pitch of a WAV file by a percentage while keeping its duration.
///
/// The output is written as 24-bit PCM with the input's sample rate and
/// channel layout.
#[derive(Parser, Debug)]
#[command(
    name = "wavpitch",
    author,
    version,
    about,
    allow_negative_numbers = true,
    after_help = EXAMPLES
)]
struct Args {
    /// Input WAV file (mono or stereo)
    input: PathBuf,

    /// Output WAV file (overwritten if it exists)
    output: PathBuf,

    /// Pitch change in percent, greater than -100 (10 = 10% higher, -15 = 15% lower)
    percentage: f64,

    /// Phase vocoder FFT size (power of two, 256..=65536)
    #[arg(long, default_value_t = DEFAULT_FFT_SIZE)]
    fft_size: usize,

    /// Analysis hop size in samples (default: FFT size / 4)
    #[arg(long)]
    hop_size: Option<usize>,

    /// Window: hann, blackman-harris (bh), kaiser, or kaiser:<beta> (beta 0..=100)
    #[arg(short, long, default_value = "hann")]
    window: WindowType,

    /// Leave peaks above full scale alone (they clip in the 24-bit output)
    #[arg(long)]
    no_normalize: bool,

    /// Disable identity phase locking
    #[arg(long)]
    no_phase_lock: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn shift_params(&self) -> ShiftParams {
        let params = ShiftParams::default()
            .with_fft_size(self.fft_size)
            .with_window_type(self.window)
            .with_normalize(!self.no_normalize)
            .with_phase_locking(!self.no_phase_lock);
        match self.hop_size {
            Some(hop) => params.with_hop_size(hop),
            None => params,
        }
    }

    fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

fn init_logging(default_level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.log_level());

    let params = args.shift_params();
    if let Err(e) = params.validate() {
        eprintln!("ERROR: {}", e);
        return ExitCode::from(EXIT_USAGE);
    }

    let job = ShiftJob::new(args.input, args.output, args.percentage).with_params(params);
    match job.run() {
        Ok(report) => {
            info!(
                "Done: {} frames at {} Hz, {:+.2} semitones in {:.2}s",
                report.num_frames,
                report.sample_rate,
                report.semitones,
                report.elapsed.as_secs_f64()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("ERROR: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
