use std::error::Error;
use std::io::Cursor;
use std::path::Path;

use wav_metrics::{
    audio::{decode_wav, read_wav_samples},
    AnalysisError,
};

fn pcm16_spec(channels: u16) -> hound::WavSpec {
    hound::WavSpec {
        channels,
        sample_rate: 16_000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    }
}

fn write_pcm16(path: &Path, channels: u16, samples: &[i16]) -> Result<(), Box<dyn Error>> {
    let mut writer = hound::WavWriter::create(path, pcm16_spec(channels))?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}

#[test]
fn read_wav_samples_normalizes_by_32768() -> Result<(), Box<dyn Error>> {
    let temp_dir = tempfile::tempdir()?;
    let wav_path = temp_dir.path().join("extreme.wav");
    write_pcm16(&wav_path, 1, &[i16::MAX, i16::MIN, 0, 16_384])?;

    let audio = read_wav_samples(&wav_path)?;
    assert_eq!(audio.sample_rate, 16_000);
    assert_eq!(audio.samples.len(), 4);

    assert_eq!(audio.samples[0], 32767.0 / 32768.0);
    assert_eq!(audio.samples[1], -1.0);
    assert_eq!(audio.samples[2], 0.0);
    assert_eq!(audio.samples[3], 0.5);

    Ok(())
}

#[test]
fn stereo_frames_are_averaged() -> Result<(), Box<dyn Error>> {
    let temp_dir = tempfile::tempdir()?;
    let wav_path = temp_dir.path().join("stereo.wav");
    write_pcm16(&wav_path, 2, &[1000, 3000, -2000, 2000, i16::MIN, i16::MIN, 1, 2])?;

    let audio = read_wav_samples(&wav_path)?;
    assert_eq!(
        audio.samples,
        vec![2000.0 / 32768.0, 0.0, -1.0, 1.5 / 32768.0]
    );

    Ok(())
}

#[test]
fn decode_wav_reads_from_memory() -> Result<(), Box<dyn Error>> {
    let mut bytes = Vec::new();
    {
        let mut writer = hound::WavWriter::new(Cursor::new(&mut bytes), pcm16_spec(1))?;
        writer.write_sample(8192i16)?;
        writer.write_sample(-8192i16)?;
        writer.finalize()?;
    }

    let audio = decode_wav(Cursor::new(bytes))?;
    assert_eq!(audio.samples, vec![0.25, -0.25]);
    assert_eq!(audio.sample_rate, 16_000);

    Ok(())
}

#[test]
fn empty_data_chunk_yields_no_samples() -> Result<(), Box<dyn Error>> {
    let temp_dir = tempfile::tempdir()?;
    let wav_path = temp_dir.path().join("empty.wav");
    write_pcm16(&wav_path, 1, &[])?;

    let audio = read_wav_samples(&wav_path)?;
    assert!(audio.samples.is_empty());
    assert_eq!(audio.sample_rate, 16_000);

    Ok(())
}

#[test]
fn more_than_two_channels_is_rejected() -> Result<(), Box<dyn Error>> {
    let temp_dir = tempfile::tempdir()?;
    let wav_path = temp_dir.path().join("surround.wav");
    write_pcm16(&wav_path, 3, &[1, 2, 3, 4, 5, 6])?;

    let err = read_wav_samples(&wav_path).unwrap_err();
    assert!(matches!(err, AnalysisError::UnsupportedChannels(3)));

    Ok(())
}

#[test]
fn non_16_bit_pcm_is_rejected() -> Result<(), Box<dyn Error>> {
    let temp_dir = tempfile::tempdir()?;

    let wide_path = temp_dir.path().join("wide.wav");
    {
        let spec = hound::WavSpec {
            bits_per_sample: 24,
            ..pcm16_spec(1)
        };
        let mut writer = hound::WavWriter::create(&wide_path, spec)?;
        writer.write_sample(100_000i32)?;
        writer.finalize()?;
    }
    let err = read_wav_samples(&wide_path).unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::UnsupportedFormat {
            bits_per_sample: 24,
            sample_format: hound::SampleFormat::Int,
        }
    ));

    let float_path = temp_dir.path().join("float.wav");
    {
        let spec = hound::WavSpec {
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
            ..pcm16_spec(1)
        };
        let mut writer = hound::WavWriter::create(&float_path, spec)?;
        writer.write_sample(0.5f32)?;
        writer.finalize()?;
    }
    let err = read_wav_samples(&float_path).unwrap_err();
    assert!(matches!(err, AnalysisError::UnsupportedFormat { .. }));

    Ok(())
}

#[test]
fn missing_file_and_garbage_fail_with_wav_error() -> Result<(), Box<dyn Error>> {
    let temp_dir = tempfile::tempdir()?;

    let err = read_wav_samples(&temp_dir.path().join("missing.wav")).unwrap_err();
    assert!(matches!(err, AnalysisError::Wav(hound::Error::IoError(_))));

    let junk_path = temp_dir.path().join("junk.wav");
    std::fs::write(&junk_path, b"definitely not a riff container")?;
    let err = read_wav_samples(&junk_path).unwrap_err();
    assert!(matches!(err, AnalysisError::Wav(_)));
    assert!(!err.to_string().is_empty());

    Ok(())
}
