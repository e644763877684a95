//! Structured logging for battery analysis runs
//!
//! Installs a `log` backend that writes timestamped, colored lines to stderr and
//! optionally plain lines to a file. Debug output is gated per category so a
//! noisy collector does not drown out analysis logs.

use chrono::Local;
use log::{Level, LevelFilter, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Mutex, Once, RwLock};
use std::time::Instant;

use crate::config::LogLevel;

/// Timestamp format for log entries
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Global initialization guard
static INIT_LOGGER: Once = Once::new();

/// Debug flag categories for selective logging
#[derive(Debug, Clone, Default)]
pub struct DebugFlags {
    pub collector: bool, // Polling loop, per-sample reads
    pub analysis: bool,  // Statistics, trend, scoring
    pub device: bool,    // Simulated and replay sources
    pub config: bool,    // Configuration loading, saving, validation
    pub all: bool,       // Enable all debug output
}

impl DebugFlags {
    /// Flags with every category switched on
    pub fn all() -> Self {
        Self {
            all: true,
            ..Self::default()
        }
    }

    /// Whether debug records from `module_path` pass these flags
    pub fn allows(&self, module_path: &str) -> bool {
        if self.all {
            return true;
        }

        if module_path.contains("::telemetry") || module_path.contains("collector") {
            return self.collector;
        }
        if module_path.contains("::analysis")
            || module_path.contains("::analyzer")
            || module_path.contains("::report")
        {
            return self.analysis;
        }
        if module_path.contains("::device") {
            return self.device;
        }
        if module_path.contains("::config") {
            return self.config;
        }
        false
    }
}

/// Global debug flags storage
static DEBUG_FLAGS: RwLock<DebugFlags> = RwLock::new(DebugFlags {
    collector: false,
    analysis: false,
    device: false,
    config: false,
    all: false,
});

/// Logger backing the `log` facade
pub struct AnalyzerLogger {
    /// File output for logs
    file: Option<Mutex<File>>,
    /// Log level filter
    level: LevelFilter,
    /// Whether to output to stderr
    console_output: bool,
}

impl log::Log for AnalyzerLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        if metadata.level() > self.level {
            return false;
        }

        if metadata.level() == Level::Debug {
            return should_log_debug(metadata.target());
        }

        true
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let timestamp = Local::now().format(TIMESTAMP_FORMAT);

        let level_str = match record.level() {
            Level::Error => "\x1B[31mERROR\x1B[0m", // Red
            Level::Warn => "\x1B[33mWARN \x1B[0m",  // Yellow
            Level::Info => "\x1B[32mINFO \x1B[0m",  // Green
            Level::Debug => "\x1B[36mDEBUG\x1B[0m", // Cyan
            Level::Trace => "\x1B[90mTRACE\x1B[0m", // Gray
        };

        let module = record.module_path().unwrap_or("<unknown>");

        if self.console_output {
            let console_entry = format!(
                "[{}] {} [{}] {}\n",
                timestamp,
                level_str,
                module,
                record.args()
            );
            let _ = io::stderr().write_all(console_entry.as_bytes());
        }

        if let Some(file) = &self.file {
            let file_entry = format!(
                "[{}] {} [{}] [{}:{}] {}\n",
                timestamp,
                record.level(),
                module,
                record.file().unwrap_or("<unknown>"),
                record.line().unwrap_or(0),
                record.args()
            );
            if let Ok(mut file) = file.lock() {
                let _ = file.write_all(file_entry.as_bytes());
                let _ = file.flush();
            }
        }
    }

    fn flush(&self) {
        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let _ = file.flush();
            }
        }
    }
}

/// Map a configured level onto the `log` filter
pub fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Error => LevelFilter::Error,
        LogLevel::Warn => LevelFilter::Warn,
        LogLevel::Info => LevelFilter::Info,
        LogLevel::Debug => LevelFilter::Debug,
        LogLevel::Trace => LevelFilter::Trace,
    }
}

/// Configure logging with the specified level and optionally a log file
pub fn configure_logging(
    level: LogLevel,
    log_file: Option<PathBuf>,
    console_output: bool,
) -> Result<(), String> {
    let mut result = Ok(());

    INIT_LOGGER.call_once(|| {
        let level_filter = level_filter(level);

        let file = if let Some(path) = log_file.clone() {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    if let Err(e) = std::fs::create_dir_all(parent) {
                        result = Err(format!("Failed to create log directory: {}", e));
                        return;
                    }
                }
            }

            match OpenOptions::new().create(true).append(true).open(&path) {
                Ok(file) => Some(Mutex::new(file)),
                Err(e) => {
                    result = Err(format!("Failed to open log file: {}", e));
                    return;
                }
            }
        } else {
            None
        };

        let logger = Box::new(AnalyzerLogger {
            file,
            level: level_filter,
            console_output,
        });

        if let Err(e) = log::set_boxed_logger(logger) {
            result = Err(format!("Failed to set logger: {}", e));
            return;
        }

        log::set_max_level(level_filter);

        // A debug level opens every category; `set_debug_flags` narrows it afterwards
        if level_filter >= LevelFilter::Debug {
            set_debug_flags(DebugFlags::all());
        }

        log::info!("Logging initialized at level: {}", level);
        if let Some(path) = log_file {
            log::info!("Log file: {}", path.display());
        }
    });

    result
}

/// Set global debug flags for selective logging
pub fn set_debug_flags(flags: DebugFlags) {
    if let Ok(mut debug_flags) = DEBUG_FLAGS.write() {
        *debug_flags = flags;
    }
}

/// Check if a debug category should log based on the module path and global flags
pub fn should_log_debug(module_path: &str) -> bool {
    DEBUG_FLAGS
        .read()
        .map(|flags| flags.allows(module_path))
        .unwrap_or(false)
}

/// Helper for performance logging
pub struct PerformanceLogger {
    /// Operation being timed
    operation: String,
    /// Component performing the operation
    component: String,
    /// Start time
    start_time: Instant,
}

impl PerformanceLogger {
    /// Create a new performance logger
    pub fn new<S: Into<String>>(component: S, operation: S) -> Self {
        Self {
            component: component.into(),
            operation: operation.into(),
            start_time: Instant::now(),
        }
    }

    /// Finish timing and log result
    pub fn finish(self) {
        log::debug!(
            "[{}::{}] Operation completed in {:?}",
            self.component,
            self.operation,
            self.start_time.elapsed()
        );
    }

    /// Finish timing with additional context
    pub fn finish_with_context(self, context: &str) {
        log::debug!(
            "[{}::{}] Operation '{}' completed in {:?}",
            self.component,
            self.operation,
            context,
            self.start_time.elapsed()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_categories() {
        let flags = DebugFlags {
            analysis: true,
            ..DebugFlags::default()
        };

        assert!(flags.allows("battery_analyzer::analysis::trend"));
        assert!(flags.allows("battery_analyzer::analyzer"));
        assert!(!flags.allows("battery_analyzer::telemetry::collector"));
        assert!(!flags.allows("battery_analyzer::device::replay"));

        assert!(DebugFlags::all().allows("battery_analyzer::device::replay"));
        assert!(!DebugFlags::default().allows("battery_analyzer::config::app_config"));
    }

    #[test]
    fn test_debug_level_enables_crate_debug_records() {
        configure_logging(LogLevel::Debug, None, false).expect("logger should install");

        for target in [
            "battery_analyzer::analysis::health",
            "battery_analyzer::telemetry::collector",
            "battery_analyzer::device::replay",
        ] {
            let metadata = Metadata::builder()
                .level(Level::Debug)
                .target(target)
                .build();
            assert!(log::logger().enabled(&metadata), "debug disabled for {}", target);
        }
        assert_eq!(log::max_level(), LevelFilter::Debug);
    }

    #[test]
    fn test_level_filter_mapping() {
        assert_eq!(level_filter(LogLevel::Warn), LevelFilter::Warn);
        assert_eq!(level_filter(LogLevel::Trace), LevelFilter::Trace);
    }

    #[test]
    fn test_performance_logger() {
        let _ = configure_logging(LogLevel::Debug, None, false);

        let perf = PerformanceLogger::new("Test", "performance_logging");
        std::thread::sleep(std::time::Duration::from_millis(5));
        perf.finish();

        let perf = PerformanceLogger::new("Test", "performance_logging");
        perf.finish_with_context("with extra info");
    }
}
