//! App wiring and the one-shot runner

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use toml::Value;

use crate::application::ports::{NotificationIcon, Notifier};
use crate::application::{DictationPipeline, PipelineEvent, SettingsService, Stage};
use crate::domain::pipeline::PipelineStatus;
use crate::infrastructure::{
    create_notifier, paths, CpalRecorder, EnigoInjector, GeminiFormatter, RodioCue,
    WhisperConfig, WhisperSpeechToText,
};

use super::args::OneshotOptions;
use super::presenter::Presenter;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// The pipeline wired to the real adapters
pub type AppPipeline =
    DictationPipeline<CpalRecorder, WhisperSpeechToText, GeminiFormatter, EnigoInjector, RodioCue>;

/// Build the pipeline from the current settings. Kicks off the background
/// whisper model load.
pub fn build_pipeline(
    settings: Arc<SettingsService>,
) -> (AppPipeline, mpsc::UnboundedReceiver<PipelineEvent>) {
    let snapshot = settings.snapshot();

    let recorder = CpalRecorder::new(snapshot.sample_rate(), paths::recordings_dir());
    let stt = WhisperSpeechToText::new(WhisperConfig {
        model: snapshot.whisper_model(),
        models_dir: paths::models_dir(),
        use_fp16: snapshot.use_fp16(),
        threads: None,
    });
    let formatter = GeminiFormatter::from_env(snapshot.gemini_model());

    DictationPipeline::new(
        recorder,
        stt,
        formatter,
        EnigoInjector::new(),
        RodioCue::new(),
        settings,
    )
}

/// What one oneshot run produced
#[derive(Default)]
struct RunOutcome {
    transcript: Option<String>,
    formatted: Option<String>,
    degraded: Option<String>,
    failure: Option<String>,
}

/// Record for a fixed duration, run the pipeline once, print the results
pub async fn run_oneshot(settings: Arc<SettingsService>, options: OneshotOptions) -> ExitCode {
    let mut presenter = Presenter::new();

    // A mode flag overrides the configured mode for this run only
    let settings = match options.mode {
        Some(mode) => {
            let mut snapshot = settings.snapshot();
            snapshot.set("format_mode", Value::String(mode.to_string()));
            Arc::new(SettingsService::detached(snapshot))
        }
        None => settings,
    };

    let notifier = create_notifier(options.notify);
    let (pipeline, mut events) = build_pipeline(settings);

    presenter.start_spinner("Recording...");
    pipeline.toggle().await;

    // Record for the requested duration, watching for early failures
    let total_ms = options.duration_secs * 1000;
    let started = Instant::now();
    let mut ticker = tokio::time::interval(std::time::Duration::from_millis(100));
    let mut outcome = RunOutcome::default();
    let mut early_error = false;

    while (started.elapsed().as_millis() as u64) < total_ms && !early_error {
        tokio::select! {
            _ = ticker.tick() => {
                presenter.update_recording_progress(started.elapsed().as_millis() as u64, total_ms);
            }
            event = events.recv() => match event {
                Some(PipelineEvent::StageFailed { stage, message }) => {
                    outcome.failure = Some(format!("{} failed: {}", stage, message));
                }
                Some(PipelineEvent::Status(PipelineStatus::Error)) => early_error = true,
                Some(_) => {}
                None => early_error = true,
            }
        }
    }

    if !early_error {
        pipeline.toggle().await;
        presenter.update_spinner("Processing...");
        drain_pipeline(&mut events, &presenter, &mut outcome).await;
    }

    finish_oneshot(presenter, outcome, &pipeline, &mut events, &options, notifier).await
}

/// Consume events until the pipeline settles in Ready or Error
async fn drain_pipeline(
    events: &mut mpsc::UnboundedReceiver<PipelineEvent>,
    presenter: &Presenter,
    outcome: &mut RunOutcome,
) {
    while let Some(event) = events.recv().await {
        match event {
            PipelineEvent::Status(PipelineStatus::Transcribing) => {
                presenter.update_spinner("Transcribing...");
            }
            PipelineEvent::Status(PipelineStatus::Formatting) => {
                presenter.update_spinner("Formatting...");
            }
            PipelineEvent::TranscriptReady { text, .. } => {
                outcome.transcript = Some(text);
            }
            PipelineEvent::FormattedReady { text, degraded, .. } => {
                outcome.formatted = Some(text);
                outcome.degraded = degraded;
            }
            PipelineEvent::StageFailed { stage, message } => {
                outcome.failure = Some(format!("{} failed: {}", stage, message));
            }
            PipelineEvent::Status(PipelineStatus::Ready)
            | PipelineEvent::Status(PipelineStatus::Error) => break,
            _ => {}
        }
    }
}

async fn finish_oneshot(
    mut presenter: Presenter,
    outcome: RunOutcome,
    pipeline: &AppPipeline,
    events: &mut mpsc::UnboundedReceiver<PipelineEvent>,
    options: &OneshotOptions,
    notifier: Box<dyn Notifier>,
) -> ExitCode {
    if let Some(failure) = &outcome.failure {
        presenter.spinner_fail(failure);
        let _ = notifier
            .notify("SpeakWrite", failure, NotificationIcon::Error)
            .await;
        return ExitCode::from(EXIT_ERROR);
    }

    let Some(transcript) = outcome.transcript else {
        presenter.spinner_success("No audio captured, nothing to transcribe");
        return ExitCode::from(EXIT_SUCCESS);
    };

    presenter.spinner_success("Dictation complete");
    presenter.labeled("Transcript:", &transcript);

    let formatted = outcome.formatted.unwrap_or_default();
    if let Some(message) = &outcome.degraded {
        presenter.warn(&format!("Formatting degraded: {}", message));
    }
    // Formatted text goes to stdout so it can be piped
    presenter.output(&formatted);

    let _ = notifier
        .notify(
            "SpeakWrite",
            "Dictation complete",
            NotificationIcon::Success,
        )
        .await;

    if options.inject && !formatted.is_empty() {
        presenter.info("Typing into the focused window (focus your target now)...");
        pipeline.inject();

        while let Some(event) = events.recv().await {
            match event {
                PipelineEvent::InjectionFinished { chars } => {
                    presenter.success(&format!("Typed {} characters", chars));
                    break;
                }
                PipelineEvent::StageFailed {
                    stage: Stage::Inject,
                    message,
                } => {
                    presenter.error(&format!("injection failed: {}", message));
                    return ExitCode::from(EXIT_ERROR);
                }
                _ => {}
            }
        }
    }

    ExitCode::from(EXIT_SUCCESS)
}
