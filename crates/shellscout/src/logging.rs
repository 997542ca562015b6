use shellscout_platform::AppPaths;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::settings::AppSettings;

/// Appends to the log file, reopening it if it was deleted while running.
struct LogFileWriter {
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl LogFileWriter {
    fn open(path: PathBuf) -> io::Result<Self> {
        let file = open_append(&path)?;
        Ok(Self {
            path,
            file: Mutex::new(Some(file)),
        })
    }

    fn with_file<T>(&self, f: impl FnOnce(&mut File) -> io::Result<T>) -> io::Result<T> {
        let mut guard = self
            .file
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        if guard.is_none() || !self.path.exists() {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            *guard = Some(open_append(&self.path)?);
        }

        match guard.as_mut() {
            Some(file) => f(file),
            None => Err(io::Error::other("log file not available")),
        }
    }
}

impl Write for LogFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.with_file(|file| file.write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.with_file(File::flush)
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Drop the older half of the log, cut at a line boundary.
fn truncate_log_to_recent_half(log_path: &Path, max_log_size: u64) {
    if let Ok(metadata) = std::fs::metadata(log_path)
        && metadata.len() > max_log_size
        && let Ok(contents) = std::fs::read(log_path)
    {
        let half = contents.len() / 2;
        let keep_from = contents[half..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(half, |pos| half + pos + 1);
        let _ = std::fs::write(log_path, &contents[keep_from..]);
    }
}

fn logger_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .add_filter_allow_str("shellscout")
        .build()
}

/// Install the global logger.
///
/// Stdout carries the detected profiles, so terminal output goes to stderr
/// and only when `verbose` is set. The log file is written whenever debug
/// logging is enabled in the settings.
pub fn init_logging(settings: &AppSettings, verbose: bool) {
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    if verbose {
        loggers.push(TermLogger::new(
            LevelFilter::Trace,
            logger_config(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }

    let mut log_path = None;
    if settings.debug_logging
        && let Ok(paths) = AppPaths::new()
    {
        let _ = paths.ensure_dirs();
        let path = paths.log_file();
        truncate_log_to_recent_half(&path, settings.max_log_size_bytes);

        if let Ok(writer) = LogFileWriter::open(path.clone()) {
            loggers.push(WriteLogger::new(LevelFilter::Debug, logger_config(), writer));
            log_path = Some(path);
        }
    }

    if loggers.is_empty() {
        return;
    }
    let _ = CombinedLogger::init(loggers);
    log::set_max_level(max_level(settings.debug_logging, verbose));

    if let Some(path) = log_path {
        log::info!("Debug logging to {}", path.display());
    }
}

fn max_level(debug_logging: bool, verbose: bool) -> log::LevelFilter {
    if verbose {
        log::LevelFilter::Trace
    } else if debug_logging {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Off
    }
}
