//! Application layer - Use cases and port interfaces

pub mod pipeline;
pub mod ports;
pub mod settings;

pub use pipeline::{DictationPipeline, PipelineEvent, Stage};
pub use settings::SettingsService;
