//! Microphone capture using cpal
//!
//! The input stream runs on a dedicated thread because `cpal::Stream` is
//! not `Send`; the thread polls the capture flag every 100 ms while the
//! stream callback appends blocks to the shared buffer. On stop the buffer
//! is flushed to one timestamped WAV file at the configured sample rate.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate, StreamConfig};
use tokio::time::{sleep, Duration};

use crate::application::ports::{CaptureError, RecordedClip, Recorder};
use crate::infrastructure::audio::wav;

/// How often the capture thread polls the active flag
const POLL_INTERVAL: std::time::Duration = std::time::Duration::from_millis(100);

/// Microphone recorder backed by cpal
pub struct CpalRecorder {
    /// Captured audio (mono i16 at the device sample rate)
    buffer: Arc<Mutex<Vec<i16>>>,
    /// Device sample rate, set once the stream is open
    device_rate: Arc<AtomicU32>,
    /// Capture flag polled by the stream thread
    capturing: Arc<AtomicBool>,
    /// Sample rate recordings are written at
    target_rate: u32,
    /// Directory recordings are written to
    recordings_dir: PathBuf,
}

impl CpalRecorder {
    /// Create a recorder writing WAVs at `target_rate` into `recordings_dir`
    pub fn new(target_rate: u32, recordings_dir: impl Into<PathBuf>) -> Self {
        Self {
            buffer: Arc::new(Mutex::new(Vec::new())),
            device_rate: Arc::new(AtomicU32::new(0)),
            capturing: Arc::new(AtomicBool::new(false)),
            target_rate,
            recordings_dir: recordings_dir.into(),
        }
    }

    fn input_device() -> Result<cpal::Device, CaptureError> {
        cpal::default_host()
            .default_input_device()
            .ok_or(CaptureError::NoAudioDevice)
    }

    /// Pick an input config, preferring mono and the target sample rate
    fn input_config(
        device: &cpal::Device,
        target_rate: u32,
    ) -> Result<(StreamConfig, SampleFormat), CaptureError> {
        let supported = device
            .supported_input_configs()
            .map_err(|e| CaptureError::StartFailed(format!("Failed to get configs: {}", e)))?;

        let mut best: Option<cpal::SupportedStreamConfigRange> = None;
        for config in supported {
            if config.sample_format() != SampleFormat::I16
                && config.sample_format() != SampleFormat::F32
            {
                continue;
            }

            let includes_target = config.min_sample_rate().0 <= target_rate
                && config.max_sample_rate().0 >= target_rate;

            let is_better = match &best {
                None => true,
                Some(current) => {
                    let fewer_channels = config.channels() < current.channels();
                    let better_rate =
                        includes_target && current.min_sample_rate().0 > target_rate;
                    fewer_channels || better_rate
                }
            };
            if is_better {
                best = Some(config);
            }
        }

        let range = best.ok_or(CaptureError::StartFailed(
            "No suitable input config found".into(),
        ))?;

        let sample_rate = if range.min_sample_rate().0 <= target_rate
            && range.max_sample_rate().0 >= target_rate
        {
            SampleRate(target_rate)
        } else {
            range.min_sample_rate()
        };

        let sample_format = range.sample_format();
        let config = StreamConfig {
            channels: range.channels(),
            sample_rate,
            buffer_size: cpal::BufferSize::Default,
        };

        Ok((config, sample_format))
    }

    /// Mix interleaved i16 frames down to mono
    fn stereo_to_mono(samples: &[i16], channels: u16) -> Vec<i16> {
        if channels <= 1 {
            return samples.to_vec();
        }
        samples
            .chunks(channels as usize)
            .map(|frame| {
                let sum: i32 = frame.iter().map(|&s| s as i32).sum();
                (sum / frame.len() as i32) as i16
            })
            .collect()
    }

    /// Flush a finished session to disk.
    ///
    /// Zero samples produce no file and return `None`; otherwise the
    /// samples are resampled to `target_rate` when the device rate differs
    /// and written to one timestamped WAV in arrival order.
    fn flush_session(
        samples: Vec<i16>,
        device_rate: u32,
        target_rate: u32,
        recordings_dir: &std::path::Path,
    ) -> Result<Option<RecordedClip>, CaptureError> {
        if samples.is_empty() {
            return Ok(None);
        }

        let samples = if device_rate != target_rate {
            let resampled = wav::resample(&wav::i16_to_f32(&samples), device_rate, target_rate)
                .map_err(|e| CaptureError::WriteFailed(e.to_string()))?;
            wav::f32_to_i16(&resampled)
        } else {
            samples
        };

        std::fs::create_dir_all(recordings_dir)
            .map_err(|e| CaptureError::WriteFailed(e.to_string()))?;

        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let path = recordings_dir.join(format!("recording_{}.wav", timestamp));

        wav::write_mono(&path, &samples, target_rate)
            .map_err(|e| CaptureError::WriteFailed(e.to_string()))?;

        let duration_ms = samples.len() as u64 * 1000 / target_rate.max(1) as u64;
        tracing::info!(path = %path.display(), duration_ms, "recording saved");

        Ok(Some(RecordedClip { path, duration_ms }))
    }

    /// Run the capture stream until the flag clears. Runs on its own
    /// thread; failures clear the flag so `start` can report them.
    fn capture_thread(
        buffer: Arc<Mutex<Vec<i16>>>,
        device_rate: Arc<AtomicU32>,
        capturing: Arc<AtomicBool>,
        target_rate: u32,
    ) {
        let fail = |capturing: &AtomicBool, message: &str| {
            tracing::error!("{}", message);
            capturing.store(false, Ordering::SeqCst);
        };

        let device = match Self::input_device() {
            Ok(d) => d,
            Err(e) => return fail(&capturing, &format!("no input device: {}", e)),
        };

        let (config, sample_format) = match Self::input_config(&device, target_rate) {
            Ok(c) => c,
            Err(e) => return fail(&capturing, &format!("no input config: {}", e)),
        };

        let channels = config.channels;
        device_rate.store(config.sample_rate.0, Ordering::SeqCst);

        let stream_result = match sample_format {
            SampleFormat::I16 => {
                let buffer = Arc::clone(&buffer);
                let capturing = Arc::clone(&capturing);
                device.build_input_stream(
                    &config,
                    move |data: &[i16], _: &cpal::InputCallbackInfo| {
                        if capturing.load(Ordering::SeqCst) {
                            let mono = CpalRecorder::stereo_to_mono(data, channels);
                            if let Ok(mut buffer) = buffer.lock() {
                                buffer.extend_from_slice(&mono);
                            }
                        }
                    },
                    |err| tracing::warn!(error = %err, "audio stream error"),
                    None,
                )
            }
            SampleFormat::F32 => {
                let buffer = Arc::clone(&buffer);
                let capturing = Arc::clone(&capturing);
                device.build_input_stream(
                    &config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        if capturing.load(Ordering::SeqCst) {
                            let as_i16 = wav::f32_to_i16(data);
                            let mono = CpalRecorder::stereo_to_mono(&as_i16, channels);
                            if let Ok(mut buffer) = buffer.lock() {
                                buffer.extend_from_slice(&mono);
                            }
                        }
                    },
                    |err| tracing::warn!(error = %err, "audio stream error"),
                    None,
                )
            }
            other => {
                return fail(&capturing, &format!("unsupported sample format {:?}", other))
            }
        };

        let stream = match stream_result {
            Ok(s) => s,
            Err(e) => return fail(&capturing, &format!("failed to open stream: {}", e)),
        };

        if let Err(e) = stream.play() {
            return fail(&capturing, &format!("failed to start stream: {}", e));
        }

        while capturing.load(Ordering::SeqCst) {
            std::thread::sleep(POLL_INTERVAL);
        }

        drop(stream);
    }
}

#[async_trait]
impl Recorder for CpalRecorder {
    async fn start(&self) -> Result<(), CaptureError> {
        if self.capturing.swap(true, Ordering::SeqCst) {
            // Already capturing; a second start is swallowed
            return Ok(());
        }

        {
            let mut buffer = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
            buffer.clear();
        }

        let buffer = Arc::clone(&self.buffer);
        let device_rate = Arc::clone(&self.device_rate);
        let capturing = Arc::clone(&self.capturing);
        let target_rate = self.target_rate;

        std::thread::spawn(move || {
            Self::capture_thread(buffer, device_rate, capturing, target_rate)
        });

        // Give the stream a moment to open, then confirm it survived
        sleep(Duration::from_millis(50)).await;
        if !self.capturing.load(Ordering::SeqCst) {
            return Err(CaptureError::StartFailed(
                "audio stream did not start".into(),
            ));
        }

        tracing::info!("recording started");
        Ok(())
    }

    async fn stop(&self) -> Result<Option<RecordedClip>, CaptureError> {
        if !self.capturing.swap(false, Ordering::SeqCst) {
            // Not capturing; nothing to flush
            return Ok(None);
        }

        // Let the capture thread observe the flag and close the stream
        sleep(POLL_INTERVAL).await;

        let samples = {
            let mut buffer = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
            std::mem::take(&mut *buffer)
        };

        tracing::info!(samples = samples.len(), "recording stopped");

        let device_rate = self.device_rate.load(Ordering::SeqCst);
        let device_rate = if device_rate == 0 {
            self.target_rate
        } else {
            device_rate
        };

        let target_rate = self.target_rate;
        let dir = self.recordings_dir.clone();
        tokio::task::spawn_blocking(move || {
            Self::flush_session(samples, device_rate, target_rate, &dir)
        })
        .await
        .map_err(|e| CaptureError::WriteFailed(format!("flush task failed: {}", e)))?
    }

    async fn cancel(&self) -> Result<(), CaptureError> {
        self.capturing.store(false, Ordering::SeqCst);
        sleep(POLL_INTERVAL).await;

        let mut buffer = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
        buffer.clear();
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stereo_to_mono_single_channel() {
        let mono = vec![100i16, 200, 300];
        assert_eq!(CpalRecorder::stereo_to_mono(&mono, 1), mono);
    }

    #[test]
    fn stereo_to_mono_averages_pairs() {
        let stereo = vec![100i16, 200, 300, 400];
        assert_eq!(CpalRecorder::stereo_to_mono(&stereo, 2), vec![150, 350]);
    }

    #[test]
    fn flush_empty_session_produces_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let clip = CpalRecorder::flush_session(Vec::new(), 16_000, 16_000, dir.path()).unwrap();
        assert!(clip.is_none());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn flush_writes_samples_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let samples: Vec<i16> = (0..1600).map(|i| (i % 101) as i16).collect();

        let clip = CpalRecorder::flush_session(samples.clone(), 16_000, 16_000, dir.path())
            .unwrap()
            .expect("clip should be produced");

        assert!(clip.path.exists());
        assert_eq!(clip.duration_ms, 100);
        assert!(clip
            .path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("recording_"));

        let (read, rate) = wav::read_mono_f32(&clip.path).unwrap();
        assert_eq!(rate, 16_000);
        assert_eq!(read.len(), samples.len());
        for (f, i) in read.iter().zip(&samples) {
            assert!((f - *i as f32 / 32768.0).abs() < 1e-6);
        }
    }

    #[test]
    fn flush_resamples_when_device_rate_differs() {
        let dir = tempfile::tempdir().unwrap();
        let samples: Vec<i16> = vec![1000; 48_000];

        let clip = CpalRecorder::flush_session(samples, 48_000, 16_000, dir.path())
            .unwrap()
            .expect("clip should be produced");

        let (read, rate) = wav::read_mono_f32(&clip.path).unwrap();
        assert_eq!(rate, 16_000);
        assert_eq!(read.len(), 16_000);
    }

    #[tokio::test]
    async fn stop_without_start_is_benign() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = CpalRecorder::new(16_000, dir.path());
        assert!(!recorder.is_capturing());
        assert_eq!(recorder.stop().await.unwrap(), None);
    }

    #[tokio::test]
    async fn cancel_without_start_is_benign() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = CpalRecorder::new(16_000, dir.path());
        assert!(recorder.cancel().await.is_ok());
    }
}
