use chrono::{DateTime, Utc};
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use once_cell::sync::OnceCell;

pub struct StderrLogger {
    level: LevelFilter,
}

static LOGGER: OnceCell<StderrLogger> = OnceCell::new();

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now: DateTime<Utc> = Utc::now();
            eprintln!(
                "[{}] {} {} - {}",
                now.to_rfc3339(),
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}

/// Install the stderr logger. Only the first call installs; later calls get
/// the error from `log::set_logger`.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    let logger = LOGGER.get_or_init(|| StderrLogger { level });
    log::set_logger(logger)?;
    log::set_max_level(logger.level);
    Ok(())
}
