use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use wav_metrics::{
    analyze_file,
    report::{write_json_line, ErrorReport},
    AnalysisParams,
};

const USAGE: &str = "Usage: analyze_audio <audio.wav>";

#[derive(Parser, Debug)]
#[command(
    about = "Print RMS, dominant frequency and silence detection for a WAV file as JSON",
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Args {
    /// 16-bit PCM WAV file, mono or stereo. Any single argument is taken as
    /// the path, including ones starting with `-`.
    #[arg(value_name = "audio.wav", allow_hyphen_values = true)]
    wav_path: PathBuf,
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            log::debug!("argument error: {err}");
            eprintln!("{USAGE}");
            return ExitCode::from(1);
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let report = ErrorReport::new(&*err);
            // Nothing left to report to if stderr is gone too.
            let _ = write_json_line(io::stderr().lock(), &report);
            ExitCode::from(1)
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    log::info!("Analyzing {}", args.wav_path.display());
    let result = analyze_file(&args.wav_path, &AnalysisParams::default())?;
    write_json_line(io::stdout().lock(), &result)?;
    Ok(())
}
