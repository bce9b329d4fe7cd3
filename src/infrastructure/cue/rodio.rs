//! Rodio-based audio cue adapter
//!
//! Generates and plays short synthesized tones: a higher beep when capture
//! starts, a lower one when it stops.

use std::time::Duration;

use async_trait::async_trait;
use rodio::source::{SineWave, Source};
use rodio::{OutputStream, Sink};

use crate::application::ports::{AudioCue, AudioCueError, CueKind};

/// Audio cue implementation using rodio
pub struct RodioCue;

impl RodioCue {
    /// Create a new rodio-based cue player
    pub fn new() -> Self {
        Self
    }
}

impl Default for RodioCue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioCue for RodioCue {
    async fn play(&self, kind: CueKind) -> Result<(), AudioCueError> {
        // Playback blocks until the tone finishes, so run it off the runtime
        tokio::task::spawn_blocking(move || play_cue_sync(kind))
            .await
            .map_err(|e| AudioCueError::PlaybackFailed(format!("Task join error: {}", e)))?
    }
}

/// Create a tone with a short fade-in for a softer attack
fn gentle_tone(freq: f32, duration_ms: u64, amplitude: f32) -> impl Source<Item = f32> + Send {
    let fade_ms = (duration_ms / 5).min(30);
    SineWave::new(freq)
        .take_duration(Duration::from_millis(duration_ms))
        .fade_in(Duration::from_millis(fade_ms))
        .amplify(amplitude)
}

fn play_cue_sync(kind: CueKind) -> Result<(), AudioCueError> {
    let (_stream, stream_handle) = OutputStream::try_default()
        .map_err(|e| AudioCueError::DeviceNotAvailable(e.to_string()))?;

    let sink =
        Sink::try_new(&stream_handle).map_err(|e| AudioCueError::PlaybackFailed(e.to_string()))?;

    const AMP: f32 = 0.3;

    match kind {
        CueKind::CaptureStart => {
            sink.append(gentle_tone(800.0, 100, AMP));
        }
        CueKind::CaptureStop => {
            sink.append(gentle_tone(400.0, 100, AMP));
        }
        CueKind::CaptureCancel => {
            sink.append(gentle_tone(400.0, 60, AMP * 0.8));
            let gap =
                rodio::source::Zero::<f32>::new(1, 44100).take_duration(Duration::from_millis(40));
            sink.append(gap);
            sink.append(gentle_tone(400.0, 60, AMP * 0.8));
        }
    }

    sink.sleep_until_end();
    Ok(())
}
