//! File logging.
//!
//! The terminal belongs to the page while it runs, so records go to
//! `vitrine.log` in the cache directory.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::PathBuf;

use directories::ProjectDirs;
use env_logger::{Builder, Target};
use log::LevelFilter;

const LOG_FILE: &str = "vitrine.log";

/// Path of the log file, if the platform has a cache directory.
pub fn log_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "vitrine").map(|dirs| dirs.cache_dir().join(LOG_FILE))
}

fn open_log() -> Option<File> {
    let path = log_path()?;
    fs::create_dir_all(path.parent()?).ok()?;
    OpenOptions::new().create(true).append(true).open(path).ok()
}

/// Install the global logger. Records are discarded when no log file can
/// be opened.
pub fn init(level: LevelFilter) {
    let target = match open_log() {
        Some(file) => Target::Pipe(Box::new(file)),
        None => Target::Pipe(Box::new(io::sink())),
    };
    // A logger may already be installed when running under a test harness.
    let _ = Builder::new()
        .filter_level(level)
        .target(target)
        .format_timestamp_millis()
        .try_init();
}
