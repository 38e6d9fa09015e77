use std::env;

use chrono::Local;
use log::{LevelFilter, Metadata, Record, SetLoggerError};


pub struct Logger {
    level: LevelFilter,
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            println!("{} [{}] {} - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.target(), record.level(), record.args());
        }
    }

    fn flush(&self) {}
}


/// Installs the process logger. Error records are also forwarded to Sentry
/// when `SENTRY_DSN` is set; the returned guard must outlive the server.
pub fn init() -> Result<Option<sentry::ClientInitGuard>, SetLoggerError> {
    let level = env::var("LOG_LEVEL").ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(LevelFilter::Info);

    let guard = env::var("SENTRY_DSN").ok()
        .filter(|dsn| !dsn.is_empty())
        .map(|dsn| sentry::init((dsn, sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        })));

    let logger = sentry_log::SentryLogger::with_dest(Logger { level });
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(level);

    Ok(guard)
}
