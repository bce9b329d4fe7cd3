//! Whisper-based speech-to-text
//!
//! Uses whisper.cpp via the whisper-rs crate for local transcription. The
//! model load starts on a background task as soon as the engine is
//! constructed; the first `transcribe` call awaits that shared load, so a
//! recording made while the model is still loading simply waits instead of
//! failing.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::application::ports::{SpeechToText, TranscribeError};
use crate::infrastructure::audio::wav;

/// Sample rate whisper models expect
const WHISPER_SAMPLE_RATE: u32 = 16_000;

/// Engine configuration, sourced from settings
#[derive(Debug, Clone)]
pub struct WhisperConfig {
    /// Model identifier, e.g. `small` or `base.en`
    pub model: String,
    /// Directory model files are resolved from
    pub models_dir: PathBuf,
    /// Half-precision inference flag
    pub use_fp16: bool,
    /// Inference threads; `None` picks a sensible count
    pub threads: Option<usize>,
}

impl WhisperConfig {
    /// Path of the model file for this configuration
    pub fn model_path(&self) -> PathBuf {
        self.models_dir.join(format!("ggml-{}.bin", self.model))
    }
}

/// Local whisper transcription engine
pub struct WhisperSpeechToText {
    config: WhisperConfig,
    context: Arc<OnceCell<Arc<WhisperContext>>>,
}

impl WhisperSpeechToText {
    /// Create the engine and begin loading the model in the background.
    /// Must be called from within a tokio runtime for the eager load to
    /// start; otherwise the load happens on first use.
    pub fn new(config: WhisperConfig) -> Self {
        let engine = Self {
            config,
            context: Arc::new(OnceCell::new()),
        };

        if tokio::runtime::Handle::try_current().is_ok() {
            let context = Arc::clone(&engine.context);
            let config = engine.config.clone();
            tokio::spawn(async move {
                if let Err(e) = context
                    .get_or_try_init(|| Self::load_model(config.clone()))
                    .await
                {
                    tracing::error!(error = %e, "background model load failed");
                }
            });
        }

        engine
    }

    async fn load_model(config: WhisperConfig) -> Result<Arc<WhisperContext>, TranscribeError> {
        let path = config.model_path();
        tracing::info!(
            model = %config.model,
            path = %path.display(),
            fp16 = config.use_fp16,
            "loading whisper model"
        );
        let start = std::time::Instant::now();

        let ctx = tokio::task::spawn_blocking(move || {
            let path_str = path
                .to_str()
                .ok_or_else(|| TranscribeError::ModelLoad("invalid model path".into()))?;
            WhisperContext::new_with_params(path_str, WhisperContextParameters::default())
                .map_err(|e| TranscribeError::ModelLoad(e.to_string()))
        })
        .await
        .map_err(|e| TranscribeError::ModelLoad(format!("load task failed: {}", e)))??;

        tracing::info!("model loaded in {:.2}s", start.elapsed().as_secs_f32());
        Ok(Arc::new(ctx))
    }

    /// The loaded context, awaiting the in-flight load when necessary
    async fn context(&self) -> Result<Arc<WhisperContext>, TranscribeError> {
        let config = self.config.clone();
        self.context
            .get_or_try_init(|| Self::load_model(config))
            .await
            .cloned()
    }

    fn run_inference(
        ctx: &WhisperContext,
        samples: &[f32],
        threads: usize,
    ) -> Result<String, TranscribeError> {
        let mut state = ctx
            .create_state()
            .map_err(|e| TranscribeError::Inference(e.to_string()))?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_language(None);
        params.set_n_threads(threads as i32);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        params.set_suppress_blank(true);

        // Dictation clips are short; a single segment avoids spurious splits
        let duration_secs = samples.len() as f32 / WHISPER_SAMPLE_RATE as f32;
        if duration_secs < 30.0 {
            params.set_single_segment(true);
        }

        state
            .full(params, samples)
            .map_err(|e| TranscribeError::Inference(e.to_string()))?;

        let mut text = String::new();
        for segment in state.as_iter() {
            text.push_str(
                segment
                    .to_str()
                    .map_err(|e| TranscribeError::Inference(e.to_string()))?,
            );
        }

        Ok(text.trim().to_string())
    }
}

#[async_trait]
impl SpeechToText for WhisperSpeechToText {
    async fn transcribe(&self, audio: &Path) -> Result<String, TranscribeError> {
        // Fail fast before waiting for the model
        if !audio.exists() {
            return Err(TranscribeError::FileNotFound(audio.to_path_buf()));
        }

        let ctx = self.context().await?;

        let (samples, rate) =
            wav::read_mono_f32(audio).map_err(|e| TranscribeError::AudioRead(e.to_string()))?;
        let samples = wav::resample(&samples, rate, WHISPER_SAMPLE_RATE)
            .map_err(|e| TranscribeError::AudioRead(e.to_string()))?;

        let threads = self
            .config
            .threads
            .unwrap_or_else(|| num_cpus::get().min(4));

        tracing::info!(
            path = %audio.display(),
            secs = samples.len() as f32 / WHISPER_SAMPLE_RATE as f32,
            "transcribing"
        );
        let start = std::time::Instant::now();

        let text =
            tokio::task::spawn_blocking(move || Self::run_inference(&ctx, &samples, threads))
                .await
                .map_err(|e| TranscribeError::Inference(format!("inference task failed: {}", e)))??;

        tracing::info!(
            chars = text.chars().count(),
            "transcription finished in {:.2}s",
            start.elapsed().as_secs_f32()
        );

        Ok(text)
    }
}
