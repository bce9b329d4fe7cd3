//! WAV file helpers shared by capture and transcription
//!
//! Recordings are mono 16-bit PCM. Reading tolerates int and float WAVs of
//! any channel count, downmixing and converting to mono f32 for inference.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use rubato::{FftFixedIn, Resampler};
use thiserror::Error;

/// Errors from WAV encode/decode or resampling
#[derive(Debug, Clone, Error)]
pub enum WavError {
    #[error("WAV I/O failed: {0}")]
    Io(String),

    #[error("Unsupported WAV format: {0}")]
    Unsupported(String),

    #[error("Resampling failed: {0}")]
    Resample(String),
}

impl From<hound::Error> for WavError {
    fn from(e: hound::Error) -> Self {
        Self::Io(e.to_string())
    }
}

/// Write mono 16-bit PCM samples to a WAV file
pub fn write_mono(path: &Path, samples: &[i16], sample_rate: u32) -> Result<(), WavError> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}

/// Read a WAV file as mono f32 samples in [-1, 1].
/// Returns the samples and the file's sample rate.
pub fn read_mono_f32(path: &Path) -> Result<(Vec<f32>, u32), WavError> {
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let interleaved: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Int, 16) => reader
            .samples::<i16>()
            .map(|s| s.map(|v| v as f32 / 32768.0))
            .collect::<Result<_, _>>()?,
        (SampleFormat::Int, 32) => reader
            .samples::<i32>()
            .map(|s| s.map(|v| v as f32 / 2_147_483_648.0))
            .collect::<Result<_, _>>()?,
        (SampleFormat::Float, 32) => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()?,
        (format, bits) => {
            return Err(WavError::Unsupported(format!(
                "{:?} at {} bits per sample",
                format, bits
            )))
        }
    };

    let mono = downmix(&interleaved, channels);
    Ok((mono, spec.sample_rate))
}

/// Average interleaved channels down to mono
pub fn downmix(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}

/// Resample mono f32 audio between arbitrary rates
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>, WavError> {
    if from_rate == to_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let ratio = to_rate as f64 / from_rate as f64;
    let output_len = (samples.len() as f64 * ratio).ceil() as usize;

    let mut resampler = FftFixedIn::<f32>::new(
        from_rate as usize,
        to_rate as usize,
        1024, // chunk size
        2,    // sub-chunks
        1,    // mono
    )
    .map_err(|e| WavError::Resample(e.to_string()))?;

    let mut output = Vec::with_capacity(output_len);
    let mut input_pos = 0;

    while input_pos < samples.len() {
        let frames_needed = resampler.input_frames_next();
        let end_pos = (input_pos + frames_needed).min(samples.len());

        let mut chunk = samples[input_pos..end_pos].to_vec();
        if chunk.len() < frames_needed {
            chunk.resize(frames_needed, 0.0);
        }

        let resampled = resampler
            .process(&[chunk], None)
            .map_err(|e| WavError::Resample(e.to_string()))?;

        output.extend_from_slice(&resampled[0]);
        input_pos = end_pos;
    }

    output.truncate(output_len);
    Ok(output)
}

/// Convert f32 samples in [-1, 1] to i16 PCM
pub fn f32_to_i16(samples: &[f32]) -> Vec<i16> {
    samples
        .iter()
        .map(|&s| (s.clamp(-1.0, 1.0) * 32767.0) as i16)
        .collect()
}

/// Convert i16 PCM samples to f32 in [-1, 1]
pub fn i16_to_f32(samples: &[i16]) -> Vec<f32> {
    samples.iter().map(|&s| s as f32 / 32768.0).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.wav");
        let samples: Vec<i16> = vec![0, 1000, -1000, 32000, -32000];

        write_mono(&path, &samples, 16_000).unwrap();
        let (read, rate) = read_mono_f32(&path).unwrap();

        assert_eq!(rate, 16_000);
        assert_eq!(read.len(), samples.len());
        for (f, i) in read.iter().zip(&samples) {
            assert!((f - *i as f32 / 32768.0).abs() < 1e-6);
        }
    }

    #[test]
    fn read_missing_file_fails() {
        assert!(read_mono_f32(Path::new("/nonexistent/clip.wav")).is_err());
    }

    #[test]
    fn downmix_single_channel_is_identity() {
        let mono = vec![0.1, 0.2, 0.3];
        assert_eq!(downmix(&mono, 1), mono);
    }

    #[test]
    fn downmix_averages_pairs() {
        let stereo = vec![0.2, 0.4, -0.2, -0.4];
        let mono = downmix(&stereo, 2);
        assert_eq!(mono.len(), 2);
        assert!((mono[0] - 0.3).abs() < 1e-6);
        assert!((mono[1] + 0.3).abs() < 1e-6);
    }

    #[test]
    fn resample_same_rate_is_identity() {
        let samples = vec![0.5f32; 100];
        assert_eq!(resample(&samples, 16_000, 16_000).unwrap(), samples);
    }

    #[test]
    fn resample_halves_sample_count() {
        let samples = vec![0.1f32; 32_000];
        let out = resample(&samples, 32_000, 16_000).unwrap();
        assert_eq!(out.len(), 16_000);
    }

    #[test]
    fn sample_conversions_round_trip() {
        let samples: Vec<i16> = vec![-32768, -1, 0, 1, 32767];
        let back = f32_to_i16(&i16_to_f32(&samples));
        for (a, b) in samples.iter().zip(&back) {
            assert!((a - b).abs() <= 1);
        }
    }
}
