//! Dictation pipeline use case
//!
//! Drives the record / transcribe / format cycle over the port traits.
//! Every potentially slow stage runs on its own spawned task and reports
//! back by advancing the shared session, which gates completions on the
//! run token so a superseded run can never clobber the one that replaced
//! it. Progress is published on a single event channel; presentation
//! layers subscribe to it instead of passing callbacks into the stages,
//! which keeps the sequencing testable without any UI.

use std::fmt;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use crate::domain::pipeline::{PipelineSession, PipelineStatus, RunId, SessionSnapshot};

use super::ports::{
    AudioCue, CueKind, RecordedClip, Recorder, SpeechToText, TextFormatter, TextInjector,
};
use super::settings::SettingsService;

/// Pipeline stages, for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Capture,
    Transcribe,
    Format,
    Inject,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Capture => "capture",
            Self::Transcribe => "transcription",
            Self::Format => "formatting",
            Self::Inject => "injection",
        };
        write!(f, "{}", name)
    }
}

/// Progress events published by the pipeline
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// The user-visible status changed
    Status(PipelineStatus),
    /// A transcript was produced for the given run
    TranscriptReady { run: RunId, text: String },
    /// Formatting finished for the given run. `degraded` carries the error
    /// message when the formatter failed open and `text` is the preserved
    /// fallback.
    FormattedReady {
        run: RunId,
        text: String,
        degraded: Option<String>,
    },
    /// Injection typed `chars` characters into the focused window
    InjectionFinished { chars: usize },
    /// A stage failed; the message is already user-presentable
    StageFailed { stage: Stage, message: String },
}

struct Inner<R, S, F, I, C> {
    recorder: R,
    stt: S,
    formatter: F,
    injector: I,
    cue: C,
    settings: Arc<SettingsService>,
    session: Mutex<PipelineSession>,
    events: mpsc::UnboundedSender<PipelineEvent>,
}

/// The dictation pipeline use case
pub struct DictationPipeline<R, S, F, I, C> {
    inner: Arc<Inner<R, S, F, I, C>>,
}

impl<R, S, F, I, C> Clone for DictationPipeline<R, S, F, I, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R, S, F, I, C> DictationPipeline<R, S, F, I, C>
where
    R: Recorder + 'static,
    S: SpeechToText + 'static,
    F: TextFormatter + 'static,
    I: TextInjector + 'static,
    C: AudioCue + 'static,
{
    /// Create a pipeline and the event receiver the presentation layer
    /// subscribes to
    pub fn new(
        recorder: R,
        stt: S,
        formatter: F,
        injector: I,
        cue: C,
        settings: Arc<SettingsService>,
    ) -> (Self, mpsc::UnboundedReceiver<PipelineEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let pipeline = Self {
            inner: Arc::new(Inner {
                recorder,
                stt,
                formatter,
                injector,
                cue,
                settings,
                session: Mutex::new(PipelineSession::new()),
                events,
            }),
        };
        (pipeline, receiver)
    }

    /// Current user-visible status
    pub fn status(&self) -> PipelineStatus {
        self.with_session(|s| s.status())
    }

    /// Copy of the user-visible session state
    pub fn snapshot(&self) -> SessionSnapshot {
        self.with_session(|s| s.snapshot())
    }

    fn with_session<T>(&self, f: impl FnOnce(&mut PipelineSession) -> T) -> T {
        let mut session = self.inner.session.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut session)
    }

    fn emit(&self, event: PipelineEvent) {
        let _ = self.inner.events.send(event);
    }

    fn emit_status(&self, status: PipelineStatus) {
        self.emit(PipelineEvent::Status(status));
    }

    /// Toggle the pipeline: start a fresh recording when idle, otherwise
    /// stop the active one and hand it to the downstream stages. A toggle
    /// while a prior run is still transcribing or formatting supersedes
    /// that run.
    pub async fn toggle(&self) {
        enum Action {
            Start(RunId),
            Stop(RunId),
        }

        let action = self.with_session(|s| {
            if s.is_recording() {
                s.stop_run().map(Action::Stop)
            } else {
                Some(Action::Start(s.start_run()))
            }
        });

        match action {
            Some(Action::Start(run)) => {
                self.emit_status(PipelineStatus::Recording);
                match self.inner.recorder.start().await {
                    Ok(()) => {
                        if let Err(e) = self.inner.cue.play(CueKind::CaptureStart).await {
                            tracing::warn!(error = %e, "start cue failed");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "failed to start capture");
                        if !self
                            .with_session(|s| s.capture_failed(run, e.to_string()))
                            .is_stale()
                        {
                            self.emit(PipelineEvent::StageFailed {
                                stage: Stage::Capture,
                                message: e.to_string(),
                            });
                            self.emit_status(PipelineStatus::Error);
                        }
                    }
                }
            }
            Some(Action::Stop(run)) => {
                self.emit_status(PipelineStatus::Processing);
                let pipeline = self.clone();
                tokio::spawn(async move { pipeline.flush_capture(run).await });
            }
            None => {}
        }
    }

    /// Abandon the active recording without transcribing it
    pub async fn cancel(&self) {
        let Some(_run) = self.with_session(|s| s.cancel_run()) else {
            return;
        };
        if let Err(e) = self.inner.recorder.cancel().await {
            tracing::warn!(error = %e, "failed to cancel capture");
        }
        if let Err(e) = self.inner.cue.play(CueKind::CaptureCancel).await {
            tracing::warn!(error = %e, "cancel cue failed");
        }
        self.emit_status(PipelineStatus::Ready);
    }

    /// Type the most recent formatted text into the focused window.
    /// Independent of the recording state machine; may be invoked at any
    /// time.
    pub fn inject(&self) {
        let text = self.with_session(|s| s.formatted_text().to_string());
        let pipeline = self.clone();
        tokio::spawn(async move {
            match pipeline.inner.injector.inject(&text).await {
                Ok(()) => {
                    tracing::info!(chars = text.chars().count(), "text injected");
                    pipeline.emit(PipelineEvent::InjectionFinished {
                        chars: text.chars().count(),
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "injection failed");
                    pipeline.emit(PipelineEvent::StageFailed {
                        stage: Stage::Inject,
                        message: e.to_string(),
                    });
                }
            }
        });
    }

    async fn flush_capture(&self, run: RunId) {
        if let Err(e) = self.inner.cue.play(CueKind::CaptureStop).await {
            tracing::warn!(error = %e, "stop cue failed");
        }

        match self.inner.recorder.stop().await {
            Ok(Some(clip)) => {
                if self.with_session(|s| s.capture_complete(run, true)).is_stale() {
                    tracing::debug!(%run, "discarding superseded capture");
                    return;
                }
                self.emit_status(PipelineStatus::Transcribing);
                let pipeline = self.clone();
                tokio::spawn(async move { pipeline.transcribe(run, clip).await });
            }
            Ok(None) => {
                // Nothing was captured between start and stop
                if !self.with_session(|s| s.capture_complete(run, false)).is_stale() {
                    tracing::info!(%run, "no audio captured, nothing to transcribe");
                    self.emit_status(PipelineStatus::Ready);
                }
            }
            Err(e) => {
                tracing::error!(%run, error = %e, "capture failed");
                if !self
                    .with_session(|s| s.capture_failed(run, e.to_string()))
                    .is_stale()
                {
                    self.emit(PipelineEvent::StageFailed {
                        stage: Stage::Capture,
                        message: e.to_string(),
                    });
                    self.emit_status(PipelineStatus::Error);
                }
            }
        }
    }

    async fn transcribe(&self, run: RunId, clip: RecordedClip) {
        match self.inner.stt.transcribe(&clip.path).await {
            Ok(text) => {
                if self.with_session(|s| s.transcribed(run, text.clone())).is_stale() {
                    tracing::debug!(%run, "discarding superseded transcript");
                    return;
                }
                tracing::info!(%run, chars = text.chars().count(), "transcription complete");
                self.emit(PipelineEvent::TranscriptReady {
                    run,
                    text: text.clone(),
                });
                self.emit_status(PipelineStatus::Formatting);
                let pipeline = self.clone();
                tokio::spawn(async move { pipeline.format(run, text).await });
            }
            Err(e) => {
                tracing::error!(%run, error = %e, "transcription failed");
                if !self
                    .with_session(|s| s.transcribe_failed(run, e.to_string()))
                    .is_stale()
                {
                    self.emit(PipelineEvent::StageFailed {
                        stage: Stage::Transcribe,
                        message: e.to_string(),
                    });
                    self.emit_status(PipelineStatus::Error);
                }
            }
        }
    }

    async fn format(&self, run: RunId, transcript: String) {
        let mode = self.inner.settings.format_mode();
        match self.inner.formatter.format(&transcript, mode).await {
            Ok(text) => {
                if self
                    .with_session(|s| s.formatted(run, text.clone(), None))
                    .is_stale()
                {
                    tracing::debug!(%run, "discarding superseded formatting result");
                    return;
                }
                tracing::info!(%run, mode = %mode, "formatting complete");
                self.emit(PipelineEvent::FormattedReady {
                    run,
                    text,
                    degraded: None,
                });
                self.emit_status(PipelineStatus::Ready);
            }
            Err(e) => {
                // Fail open: never lose the user's words
                let fallback = e.fallback_text(&transcript).to_string();
                tracing::error!(%run, error = %e, "formatting failed, keeping fallback text");
                if self
                    .with_session(|s| s.formatted(run, fallback.clone(), Some(e.to_string())))
                    .is_stale()
                {
                    return;
                }
                self.emit(PipelineEvent::FormattedReady {
                    run,
                    text: fallback,
                    degraded: Some(e.to_string()),
                });
                self.emit_status(PipelineStatus::Error);
            }
        }
    }
}
