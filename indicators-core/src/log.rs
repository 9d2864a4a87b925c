use chrono::Local;
use log::{LevelFilter, Log, Metadata, Record};

/// Writes log lines to stderr. Stdout belongs to the status bar, so the
/// indicators never log there.
pub struct Logger {
    level: LevelFilter,
    prefix: Option<String>,
    thread: bool,
}

impl Logger {
    fn format(&self, record: &Record) -> String {
        let timestamp =
            Local::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        let level = format!("[{}]", record.level());
        let prefix = match &self.prefix {
            Some(prefix) => format!("[{}] ", prefix),
            None => String::new(),
        };
        let target = if !record.target().is_empty() {
            format!("comp={} ", record.target())
        } else {
            format!("comp={} ", record.module_path().unwrap_or_default())
        };

        let thread = if self.thread {
            let thread = std::thread::current();
            let name = thread.name().unwrap_or("?");
            format!("t={} ", name)
        } else {
            "".to_string()
        };

        format!(
            "{} {}{:<7} {}{} {}",
            timestamp,
            prefix,
            level,
            thread,
            target,
            record.args()
        )
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level().to_level_filter() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        eprintln!("{}", self.format(record));
    }

    fn flush(&self) {}
}

pub struct LoggerBuilder {
    level: LevelFilter,
    prefix: Option<String>,
    thread: bool,
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        LoggerBuilder {
            level: LevelFilter::Off,
            prefix: None,
            thread: false,
        }
    }
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Tag printed in front of every line, usually the indicator name.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_threads(mut self, enabled: bool) -> Self {
        self.thread = enabled;
        self
    }

    pub fn build(self) -> Logger {
        Logger {
            level: self.level,
            prefix: self.prefix,
            thread: self.thread,
        }
    }
}

pub fn init_global_logger(
    prefix: &str,
    level: LevelFilter,
) -> Result<(), log::SetLoggerError> {
    let logger = LoggerBuilder::new()
        .with_level(level)
        .with_prefix(prefix)
        .build();

    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(level);

    Ok(())
}
