use flexi_logger::{DeferredNow, FileSpec, FlexiLoggerError, Logger, LoggerHandle, Record};
use std::path::PathBuf;

/// Directory the log files are written to.
/// The terminal is in raw mode while the app runs, so logs never go to the console.
pub fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("pixel-sand")
        .join("logs")
}

/// Setup file logging for this application.
///
/// The returned handle must be kept alive for as long as logging is needed.
pub fn setup(default_level: &str) -> Result<LoggerHandle, FlexiLoggerError> {
    let handle = Logger::try_with_env_or_str(default_level)?
        .log_to_file(FileSpec::default().directory(log_dir()).basename("pixel-sand"))
        .format(line_format)
        .start()?;

    log::info!(
        "Adjust the log level by setting RUST_LOG. By default RUST_LOG={}",
        default_level
    );

    Ok(handle)
}

/// One line per record: level, time, source location, message
pub fn line_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &Record,
) -> Result<(), std::io::Error> {
    write!(
        w,
        "{} [{}] [{}:{}] {}",
        record.level(),
        now.now().format("%H:%M:%S%.6f"),
        record.file().unwrap_or("<unnamed>"),
        record.line().unwrap_or(0),
        record.args()
    )
}
