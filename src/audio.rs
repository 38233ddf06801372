//! WAV decoding for signal analysis.
//!
//! This module turns a RIFF/WAVE container into a mono buffer of `f64`
//! samples plus the sample rate read from the header.

use std::io::Read;
use std::path::Path;

use crate::AnalysisError;

/// Divisor mapping 16-bit PCM to floating point. The positive peak
/// (`i16::MAX`) therefore lands just below 1.0.
const PCM16_SCALE: f64 = 32768.0;

/// Mono samples decoded from a WAV file.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    /// One value per frame, in temporal order, within [-1.0, 1.0].
    pub samples: Vec<f64>,
    /// Frames per second as declared by the header.
    pub sample_rate: u32,
}

/// Read WAV file samples and convert them to normalized mono.
///
/// The file is opened for the duration of this call only; the handle is
/// released when the reader goes out of scope, whether decoding succeeded
/// or not.
///
/// # Arguments
///
/// * `wav_path` - Path to the WAV file to read
///
/// # Errors
///
/// This function will return an error if:
/// - The file cannot be opened or read
/// - The file is not a valid WAV container
/// - The data is not 16-bit integer PCM with 1 or 2 channels
///
/// # Examples
///
/// ```rust,no_run
/// use wav_metrics::audio::read_wav_samples;
/// use std::path::Path;
///
/// let audio = read_wav_samples(Path::new("audio.wav"))?;
/// println!("Loaded {} samples at {} Hz", audio.samples.len(), audio.sample_rate);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn read_wav_samples(wav_path: &Path) -> Result<DecodedAudio, AnalysisError> {
    let reader = hound::WavReader::open(wav_path)?;
    decode(reader)
}

/// Decode WAV data from any byte source. See [`read_wav_samples`].
pub fn decode_wav<R: Read>(source: R) -> Result<DecodedAudio, AnalysisError> {
    let reader = hound::WavReader::new(source)?;
    decode(reader)
}

fn decode<R: Read>(mut reader: hound::WavReader<R>) -> Result<DecodedAudio, AnalysisError> {
    let spec = reader.spec();
    log::debug!(
        "WAV spec: {} channel(s), {} Hz, {}-bit {:?}, {} samples",
        spec.channels,
        spec.sample_rate,
        spec.bits_per_sample,
        spec.sample_format,
        reader.len()
    );

    if spec.bits_per_sample != 16 || spec.sample_format != hound::SampleFormat::Int {
        return Err(AnalysisError::UnsupportedFormat {
            bits_per_sample: spec.bits_per_sample,
            sample_format: spec.sample_format,
        });
    }

    let raw: Result<Vec<i16>, _> = reader.samples::<i16>().collect();
    let raw = raw?;

    let samples = match spec.channels {
        1 => raw.iter().map(|&s| f64::from(s) / PCM16_SCALE).collect(),
        2 => downmix_stereo(&raw)?,
        other => return Err(AnalysisError::UnsupportedChannels(other)),
    };

    Ok(DecodedAudio {
        samples,
        sample_rate: spec.sample_rate,
    })
}

/// Average each interleaved left/right pair into one normalized value.
fn downmix_stereo(raw: &[i16]) -> Result<Vec<f64>, AnalysisError> {
    if raw.len() % 2 != 0 {
        return Err(AnalysisError::PartialFrame(raw.len()));
    }

    Ok(raw
        .chunks_exact(2)
        .map(|pair| (f64::from(pair[0]) + f64::from(pair[1])) / 2.0 / PCM16_SCALE)
        .collect())
}
