//! Pipeline session state machine
//!
//! One session tracks the full record, transcribe, format cycle. Every
//! run is tagged with a `RunId` at start; a stage completion carrying a
//! stale id is discarded, so a superseded run can never overwrite the
//! texts or status of the run that replaced it.

use std::fmt;

/// Pipeline states as reflected to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PipelineStatus {
    #[default]
    Ready,
    Recording,
    Processing,
    Transcribing,
    Formatting,
    Error,
}

impl PipelineStatus {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Recording => "recording",
            Self::Processing => "processing",
            Self::Transcribing => "transcribing",
            Self::Formatting => "formatting",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identifier tagging one pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunId(u64);

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run#{}", self.0)
    }
}

/// Outcome of handing a stage completion to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageGate {
    /// The completion belonged to the active run and advanced the session
    Advanced,
    /// The completion belonged to a superseded run and was discarded
    Stale,
}

impl StageGate {
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::Stale)
    }
}

/// Point-in-time copy of the user-visible session state
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    pub status: PipelineStatus,
    pub transcript: String,
    pub formatted: String,
    pub last_error: Option<String>,
}

/// Pipeline session entity.
///
/// State machine:
///   READY/ERROR -> RECORDING       (start_run; a fresh run supersedes any
///                                   stage still in flight)
///   RECORDING   -> PROCESSING      (stop_run)
///   RECORDING   -> READY           (cancel_run)
///   PROCESSING  -> TRANSCRIBING    (capture_complete with a clip)
///   PROCESSING  -> READY           (capture_complete with nothing captured)
///   PROCESSING  -> ERROR           (capture_failed)
///   TRANSCRIBING-> FORMATTING      (transcribed)
///   TRANSCRIBING-> ERROR           (transcribe_failed)
///   FORMATTING  -> READY or ERROR  (formatted, degraded carries the
///                                   fail-open message)
#[derive(Debug, Default)]
pub struct PipelineSession {
    status: PipelineStatus,
    next_run: u64,
    active_run: Option<RunId>,
    transcript: String,
    formatted: String,
    last_error: Option<String>,
}

impl PipelineSession {
    /// Create a new session in the ready state
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current status
    pub fn status(&self) -> PipelineStatus {
        self.status
    }

    /// Check if a recording is active
    pub fn is_recording(&self) -> bool {
        self.status == PipelineStatus::Recording
    }

    /// The transcript of the most recent completed transcription
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    /// The formatted text of the most recent completed run
    pub fn formatted_text(&self) -> &str {
        &self.formatted
    }

    /// The most recent error message, if the session is in the error state
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Copy the user-visible state
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            status: self.status,
            transcript: self.transcript.clone(),
            formatted: self.formatted.clone(),
            last_error: self.last_error.clone(),
        }
    }

    /// Start a fresh run and transition to RECORDING.
    ///
    /// Valid from any non-recording state: from READY this is the normal
    /// path, from ERROR it doubles as the user's acknowledgement, and from
    /// PROCESSING/TRANSCRIBING/FORMATTING it supersedes the in-flight run,
    /// whose later completions will be discarded as stale.
    pub fn start_run(&mut self) -> RunId {
        self.next_run += 1;
        let run = RunId(self.next_run);
        self.active_run = Some(run);
        self.status = PipelineStatus::Recording;
        self.last_error = None;
        run
    }

    /// Stop the active recording and transition to PROCESSING.
    /// Returns `None` when no recording is active (benign no-op).
    pub fn stop_run(&mut self) -> Option<RunId> {
        if self.status != PipelineStatus::Recording {
            return None;
        }
        self.status = PipelineStatus::Processing;
        self.active_run
    }

    /// Abandon the active recording and return to READY.
    /// Returns `None` when no recording is active.
    pub fn cancel_run(&mut self) -> Option<RunId> {
        if self.status != PipelineStatus::Recording {
            return None;
        }
        let run = self.active_run.take();
        self.status = PipelineStatus::Ready;
        run
    }

    fn gate(&self, run: RunId) -> StageGate {
        if self.active_run == Some(run) {
            StageGate::Advanced
        } else {
            StageGate::Stale
        }
    }

    /// Capture finished: `produced` says whether any audio was flushed.
    /// An empty session is a normal "nothing to transcribe" outcome and
    /// returns the pipeline to READY.
    pub fn capture_complete(&mut self, run: RunId, produced: bool) -> StageGate {
        if self.gate(run).is_stale() {
            return StageGate::Stale;
        }
        self.status = if produced {
            PipelineStatus::Transcribing
        } else {
            self.active_run = None;
            PipelineStatus::Ready
        };
        StageGate::Advanced
    }

    /// Capture failed outright
    pub fn capture_failed(&mut self, run: RunId, message: impl Into<String>) -> StageGate {
        if self.gate(run).is_stale() {
            return StageGate::Stale;
        }
        self.active_run = None;
        self.status = PipelineStatus::Error;
        self.last_error = Some(message.into());
        StageGate::Advanced
    }

    /// Transcription succeeded; stores the transcript and moves to FORMATTING
    pub fn transcribed(&mut self, run: RunId, text: impl Into<String>) -> StageGate {
        if self.gate(run).is_stale() {
            return StageGate::Stale;
        }
        self.transcript = text.into();
        self.status = PipelineStatus::Formatting;
        StageGate::Advanced
    }

    /// Transcription failed; the run ends in the error state
    pub fn transcribe_failed(&mut self, run: RunId, message: impl Into<String>) -> StageGate {
        if self.gate(run).is_stale() {
            return StageGate::Stale;
        }
        self.active_run = None;
        self.status = PipelineStatus::Error;
        self.last_error = Some(message.into());
        StageGate::Advanced
    }

    /// Formatting finished. `degraded` carries the error message when the
    /// formatter failed open and `text` is the best-effort fallback; the
    /// run then ends in the error state but the text is still displayed.
    pub fn formatted(
        &mut self,
        run: RunId,
        text: impl Into<String>,
        degraded: Option<String>,
    ) -> StageGate {
        if self.gate(run).is_stale() {
            return StageGate::Stale;
        }
        self.formatted = text.into();
        self.active_run = None;
        match degraded {
            Some(message) => {
                self.status = PipelineStatus::Error;
                self.last_error = Some(message);
            }
            None => {
                self.status = PipelineStatus::Ready;
                self.last_error = None;
            }
        }
        StageGate::Advanced
    }
}
