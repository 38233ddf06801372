pub mod analysis;
pub mod audio;
pub mod report;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use analysis::analyze_samples;
pub use audio::{decode_wav, read_wav_samples, DecodedAudio};

/// Signal metrics for one WAV file, serialized as-is to the JSON report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub rms: f64,
    pub frequency: f64,
    pub is_playing: bool,
    pub is_silence: bool,
    pub sample_rate: u32,
    pub duration_sec: f64,
}

#[derive(Debug, Clone)]
pub struct AnalysisParams {
    /// RMS level separating silence from playing audio.
    pub silence_threshold: f64,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            silence_threshold: 0.01,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum AnalysisError {
    #[error("{0}")]
    Wav(#[from] hound::Error),
    #[error("expected 16-bit integer PCM, found {bits_per_sample}-bit {sample_format:?}")]
    UnsupportedFormat {
        bits_per_sample: u16,
        sample_format: hound::SampleFormat,
    },
    #[error("expected 1 or 2 channels, found {0}")]
    UnsupportedChannels(u16),
    #[error("stereo data ends mid-frame ({0} samples)")]
    PartialFrame(usize),
    #[error("need at least 4 samples for frequency analysis, found {0}")]
    TooFewSamples(usize),
    #[error("sample rate must be positive")]
    ZeroSampleRate,
}

/// Read a WAV file and compute its metrics in one step.
pub fn analyze_file(
    wav_path: &Path,
    params: &AnalysisParams,
) -> Result<AnalysisResult, AnalysisError> {
    let audio = read_wav_samples(wav_path)?;
    analyze_samples(&audio.samples, audio.sample_rate, params)
}
