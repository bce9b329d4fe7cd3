//! Global hotkey adapters

mod rdev_listener;

pub use rdev_listener::{RdevHotkeyListener, ToggleFn};
