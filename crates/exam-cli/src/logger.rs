use chrono::{DateTime, Local};
use log::{Level, LevelFilter, Metadata, Record};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct WarningEntry {
    pub timestamp: DateTime<Local>,
    pub target: String,
    pub message: String,
}

/// Timestamped stderr logger that also remembers warnings for the run summary
#[derive(Clone)]
pub struct CliLogger {
    level: LevelFilter,
    warnings: Arc<Mutex<Vec<WarningEntry>>>,
}

impl CliLogger {
    pub fn new(verbose: bool) -> Self {
        Self {
            level: if verbose {
                LevelFilter::Debug
            } else {
                LevelFilter::Info
            },
            warnings: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn init(self) -> Result<(), log::SetLoggerError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(level);
        Ok(())
    }

    pub fn warnings(&self) -> Vec<WarningEntry> {
        self.warnings
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }
}

impl log::Log for CliLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let timestamp = Local::now();
        eprintln!(
            "{} {:<5} [{}] {}",
            timestamp.format("%H:%M:%S%.3f"),
            record.level(),
            record.target(),
            record.args()
        );

        if record.level() == Level::Warn {
            if let Ok(mut entries) = self.warnings.lock() {
                entries.push(WarningEntry {
                    timestamp,
                    target: record.target().to_string(),
                    message: format!("{}", record.args()),
                });
            }
        }
    }

    fn flush(&self) {}
}
