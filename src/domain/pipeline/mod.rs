//! Pipeline session state machine and run tokens

mod session;

pub use session::{PipelineSession, PipelineStatus, RunId, SessionSnapshot, StageGate};
