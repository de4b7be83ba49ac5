use chrono::Utc;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

/// Timestamped console logger. With `quiet` set, Info lines are dropped;
/// warnings and errors always reach stderr.
#[derive(Clone)]
pub struct Logger {
    quiet: bool,
}

impl Logger {
    pub fn new(quiet: bool) -> Self {
        Logger { quiet }
    }

    pub fn log(&self, level: LogLevel, message: &str) {
        if self.quiet && level == LogLevel::Info {
            return;
        }
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S");
        let formatted_message = format!("[{}] [{}] {}", timestamp, level.as_str(), message);
        if level == LogLevel::Error || level == LogLevel::Warning {
            eprintln!("{}", formatted_message);
        } else {
            println!("{}", formatted_message);
        }
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn warning(&self, message: &str) {
        self.log(LogLevel::Warning, message);
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)*) => {
        $logger.info(&format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warning {
    ($logger:expr, $($arg:tt)*) => {
        $logger.warning(&format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)*) => {
        $logger.error(&format!($($arg)*))
    };
}
