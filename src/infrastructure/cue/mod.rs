//! Audio cue adapters

mod noop;
mod rodio;

pub use self::rodio::RodioCue;
pub use noop::NoOpCue;
