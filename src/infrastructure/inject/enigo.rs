//! Cross-platform keystroke injection using enigo
//!
//! Works on Windows, macOS, and Linux (X11/Wayland).

use async_trait::async_trait;
use tokio::time::{sleep, Duration};

use crate::application::ports::{InjectError, TextInjector};

/// Grace period before typing so the user can focus the target window;
/// there is no way to verify which window has focus.
const FOCUS_GRACE: Duration = Duration::from_millis(500);

/// Fixed pause between synthesized keystrokes, in milliseconds
const INTER_KEY_DELAY_MS: u32 = 10;

/// Keystroke injector backed by enigo
pub struct EnigoInjector;

impl EnigoInjector {
    /// Create a new enigo injector
    pub fn new() -> Self {
        Self
    }
}

impl Default for EnigoInjector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextInjector for EnigoInjector {
    async fn inject(&self, text: &str) -> Result<(), InjectError> {
        if text.is_empty() {
            return Err(InjectError::EmptyText);
        }

        sleep(FOCUS_GRACE).await;

        let text = text.to_owned();

        // enigo operations are blocking, so run in spawn_blocking
        tokio::task::spawn_blocking(move || {
            use enigo::{Enigo, Keyboard, Settings};

            let settings = Settings {
                linux_delay: INTER_KEY_DELAY_MS,
                ..Settings::default()
            };

            let mut enigo = Enigo::new(&settings)
                .map_err(|e| InjectError::TypeFailed(format!("Failed to create enigo: {}", e)))?;

            enigo
                .text(&text)
                .map_err(|e| InjectError::TypeFailed(format!("Failed to type text: {}", e)))
        })
        .await
        .map_err(|e| InjectError::TypeFailed(format!("Task join error: {}", e)))?
    }
}
