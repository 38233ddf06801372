//! Signal metrics over a decoded sample buffer.

use rustfft::{num_complex::Complex, FftPlanner};

use crate::{AnalysisError, AnalysisParams, AnalysisResult};

/// Compute RMS, dominant frequency, playing/silence flags and duration.
///
/// # Errors
///
/// Returns [`AnalysisError::ZeroSampleRate`] when `sample_rate` is 0 and
/// [`AnalysisError::TooFewSamples`] when the buffer has no non-DC bin to
/// search (fewer than four samples).
///
/// # Examples
///
/// ```rust
/// use wav_metrics::{analyze_samples, AnalysisParams};
///
/// let silence = vec![0.0; 4410];
/// let result = analyze_samples(&silence, 44_100, &AnalysisParams::default())?;
/// assert!(result.is_silence);
/// assert_eq!(result.duration_sec, 0.1);
/// # Ok::<(), wav_metrics::AnalysisError>(())
/// ```
pub fn analyze_samples(
    samples: &[f64],
    sample_rate: u32,
    params: &AnalysisParams,
) -> Result<AnalysisResult, AnalysisError> {
    if sample_rate == 0 {
        return Err(AnalysisError::ZeroSampleRate);
    }

    let rms = rms(samples);
    let frequency = dominant_frequency(samples, sample_rate)
        .ok_or(AnalysisError::TooFewSamples(samples.len()))?;
    let (is_playing, is_silence) = classify(rms, params.silence_threshold);

    Ok(AnalysisResult {
        rms,
        frequency,
        is_playing,
        is_silence,
        sample_rate,
        duration_sec: samples.len() as f64 / f64::from(sample_rate),
    })
}

/// Root-mean-square over the whole buffer. An empty buffer yields 0.0.
pub fn rms(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let squares: Vec<f64> = samples.iter().map(|s| s * s).collect();
    (pairwise_sum(&squares) / samples.len() as f64).sqrt()
}

const PAIRWISE_BLOCK: usize = 128;

/// Pairwise summation: halves are summed recursively down to blocks of
/// 128, each block is reduced through eight interleaved partial sums.
/// Error grows with `log n` rather than `n`.
fn pairwise_sum(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 8 {
        values.iter().fold(0.0, |acc, v| acc + v)
    } else if n <= PAIRWISE_BLOCK {
        let mut partial = [0.0f64; 8];
        partial.copy_from_slice(&values[..8]);
        let whole = n - n % 8;
        for chunk in values[8..whole].chunks_exact(8) {
            for (acc, v) in partial.iter_mut().zip(chunk) {
                *acc += v;
            }
        }
        let mut sum = ((partial[0] + partial[1]) + (partial[2] + partial[3]))
            + ((partial[4] + partial[5]) + (partial[6] + partial[7]));
        for v in &values[whole..] {
            sum += v;
        }
        sum
    } else {
        let mut mid = n / 2;
        mid -= mid % 8;
        pairwise_sum(&values[..mid]) + pairwise_sum(&values[mid..])
    }
}

/// Frequency in Hz of the strongest non-DC bin in the lower half of the
/// spectrum.
///
/// The whole buffer goes through a single complex FFT with no window and
/// no padding, so the resolution is `sample_rate / samples.len()`. Ties go
/// to the lowest bin. Buffers shorter than four samples have no bin to
/// search and yield `None`.
pub fn dominant_frequency(samples: &[f64], sample_rate: u32) -> Option<f64> {
    let n = samples.len();
    let half = n / 2;
    if half < 2 {
        return None;
    }

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(n);

    let mut buffer: Vec<Complex<f64>> = samples.iter().map(|&s| Complex::new(s, 0.0)).collect();
    fft.process(&mut buffer);

    // Skip bin 0 so a constant offset never wins.
    let mut peak_idx = 1;
    let mut peak_mag = buffer[1].norm();
    for (idx, c) in buffer.iter().enumerate().take(half).skip(2) {
        let mag = c.norm();
        if mag > peak_mag {
            peak_idx = idx;
            peak_mag = mag;
        }
    }

    let freq = bin_frequency(peak_idx, n, sample_rate).abs();
    log::trace!(
        "FFT peak at bin {} of {} ({:.3} Hz, magnitude {:.6})",
        peak_idx,
        n,
        freq,
        peak_mag
    );
    Some(freq)
}

/// Center frequency of bin `k` for an `n`-point transform, evaluated as
/// `k * (1 / (n * (1 / rate)))` to match the rounding of the usual
/// `fftfreq` helper.
fn bin_frequency(k: usize, n: usize, sample_rate: u32) -> f64 {
    let spacing = 1.0 / f64::from(sample_rate);
    let step = 1.0 / (n as f64 * spacing);
    k as f64 * step
}

/// Returns `(is_playing, is_silence)`. Both are false when `rms` equals the
/// threshold exactly.
pub fn classify(rms: f64, silence_threshold: f64) -> (bool, bool) {
    (rms > silence_threshold, rms < silence_threshold)
}
