//! Silent cue adapter for headless environments and tests

use async_trait::async_trait;

use crate::application::ports::{AudioCue, AudioCueError, CueKind};

/// Cue player that plays nothing
pub struct NoOpCue;

impl NoOpCue {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpCue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioCue for NoOpCue {
    async fn play(&self, _kind: CueKind) -> Result<(), AudioCueError> {
        Ok(())
    }
}
