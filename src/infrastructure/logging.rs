//! Tracing setup
//!
//! Timestamped, leveled lines go to the console and to one plain-text log
//! file per day. The file is informational only; nothing parses it.

use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber.
///
/// `level` is a tracing filter directive (normally the `log_level`
/// setting). An unopenable log file degrades to console-only logging
/// rather than failing startup.
pub fn init(logs_dir: &Path, level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    let file = open_daily_log(logs_dir);
    let file_layer = file.map(|f| {
        tracing_subscriber::fmt::layer()
            .with_writer(Arc::new(f))
            .with_ansi(false)
    });

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer);

    // try_init so repeated initialization (tests) is harmless
    if registry.try_init().is_err() {
        return;
    }

    tracing::debug!(dir = %logs_dir.display(), "logging initialized");
}

fn open_daily_log(logs_dir: &Path) -> Option<File> {
    if let Err(e) = fs::create_dir_all(logs_dir) {
        eprintln!("warning: cannot create log directory: {}", e);
        return None;
    }

    let name = format!("{}.log", chrono::Local::now().format("%Y-%m-%d"));
    match File::options().create(true).append(true).open(logs_dir.join(&name)) {
        Ok(file) => Some(file),
        Err(e) => {
            eprintln!("warning: cannot open log file {}: {}", name, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_log_file_is_created() {
        let dir = std::env::temp_dir().join("speakwrite-log-test");
        let _ = fs::remove_dir_all(&dir);

        let file = open_daily_log(&dir);
        assert!(file.is_some());

        let entries: Vec<_> = fs::read_dir(&dir).unwrap().collect();
        assert_eq!(entries.len(), 1);
        let name = entries[0].as_ref().unwrap().file_name();
        assert!(name.to_string_lossy().ends_with(".log"));

        let _ = fs::remove_dir_all(&dir);
    }
}
