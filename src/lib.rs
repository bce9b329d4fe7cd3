//! SpeakWrite - push-to-talk dictation with AI cleanup
//!
//! Press a global hotkey, speak, and have the speech transcribed by a
//! local whisper model, cleaned up by the Gemini API, and typed into
//! whatever application currently has focus.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: settings document, format modes and prompt templates,
//!   the pipeline state machine, hotkey chords
//! - **Application**: the dictation pipeline use case and port interfaces
//!   (traits)
//! - **Infrastructure**: adapter implementations (cpal, whisper.cpp,
//!   Gemini, enigo, rdev, rodio, ...)
//! - **CLI**: command-line interface, daemon runner, and IPC control

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
