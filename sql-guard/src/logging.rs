//! Logging utilities and configuration for sql-guard.
//!
//! Validators log through `tracing`. Model output can be arbitrarily long, so
//! query text and feedback are always passed through [`truncate_field`] before
//! being attached to a log event.

use tracing::Level;

/// Logging configuration for validators.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Base log level for sql-guard components
    pub base_level: Level,
    /// Whether to log each pipeline stage as it is entered
    pub log_stage_details: bool,
    /// Whether to log statements sent to the query executor
    pub log_executor_calls: bool,
    /// Maximum length for logged field values (to prevent huge logs)
    pub max_field_length: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            base_level: Level::INFO,
            log_stage_details: false,
            log_executor_calls: true,
            max_field_length: 256,
        }
    }
}

impl LogConfig {
    /// Creates a verbose configuration suitable for debugging.
    pub fn verbose() -> Self {
        Self {
            base_level: Level::DEBUG,
            log_stage_details: true,
            log_executor_calls: true,
            max_field_length: 1024,
        }
    }

    /// Creates a minimal configuration for production with lowest overhead.
    pub fn production() -> Self {
        Self {
            base_level: Level::WARN,
            log_stage_details: false,
            log_executor_calls: false,
            max_field_length: 128,
        }
    }

    /// Creates a balanced configuration suitable for most use cases.
    pub fn balanced() -> Self {
        Self::default()
    }

    /// Returns true if events at `level` pass this configuration's base level.
    pub fn enables(&self, level: Level) -> bool {
        level <= self.base_level
    }

    /// Truncates a value to this configuration's field length.
    pub fn field(&self, value: &str) -> String {
        truncate_field(value, self.max_field_length)
    }
}

/// Macro for conditional pipeline stage logging.
#[macro_export]
macro_rules! log_stage {
    ($config:expr, $($arg:tt)*) => {
        if $config.log_stage_details && $config.enables(tracing::Level::DEBUG) {
            tracing::debug!($($arg)*);
        }
    };
}

/// Macro for conditional executor call logging.
#[macro_export]
macro_rules! log_executor {
    ($config:expr, $($arg:tt)*) => {
        if $config.log_executor_calls && $config.enables(tracing::Level::INFO) {
            tracing::info!($($arg)*);
        }
    };
}

/// Truncates a string to the maximum field length if needed.
///
/// The cut is moved back to the nearest character boundary so multi-byte
/// text never panics.
pub fn truncate_field(value: &str, max_length: usize) -> String {
    if value.len() <= max_length {
        return value.to_string();
    }
    let mut end = max_length;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...(truncated)", &value[..end])
}

/// Utilities for setting up structured logging.
pub mod setup {
    use tracing::Level;

    /// Configuration for the global subscriber.
    #[derive(Debug, Clone)]
    pub struct LoggingConfig {
        /// Log level for the application
        pub level: Level,
        /// Log level for sql-guard components specifically
        pub guard_level: Level,
        /// Whether to use JSON output format
        pub json_format: bool,
        /// Environment filter override
        pub env_filter: Option<String>,
    }

    impl Default for LoggingConfig {
        fn default() -> Self {
            Self {
                level: Level::INFO,
                guard_level: Level::DEBUG,
                json_format: false,
                env_filter: None,
            }
        }
    }

    impl LoggingConfig {
        /// Creates a configuration for production use.
        pub fn production() -> Self {
            Self {
                level: Level::WARN,
                guard_level: Level::INFO,
                json_format: true,
                env_filter: None,
            }
        }

        /// Creates a configuration for development use.
        pub fn development() -> Self {
            Self {
                level: Level::DEBUG,
                guard_level: Level::DEBUG,
                json_format: false,
                env_filter: None,
            }
        }

        /// Sets the log level for the application.
        pub fn with_level(mut self, level: Level) -> Self {
            self.level = level;
            self
        }

        /// Sets the log level for sql-guard components.
        pub fn with_guard_level(mut self, level: Level) -> Self {
            self.guard_level = level;
            self
        }

        /// Sets whether to use JSON output format.
        pub fn with_json_format(mut self, enabled: bool) -> Self {
            self.json_format = enabled;
            self
        }

        /// Sets a custom environment filter.
        pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
            self.env_filter = Some(filter.into());
            self
        }

        /// Builds the environment filter string.
        pub fn env_filter(&self) -> String {
            if let Some(ref filter) = self.env_filter {
                filter.clone()
            } else {
                format!(
                    "{},sql_guard={}",
                    self.level.as_str().to_lowercase(),
                    self.guard_level.as_str().to_lowercase()
                )
            }
        }
    }

    /// Installs the global `tracing` subscriber.
    ///
    /// `RUST_LOG` takes precedence over the configured filter.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use sql_guard::logging::setup::{init_logging, LoggingConfig};
    ///
    /// init_logging(LoggingConfig::development().with_json_format(true)).unwrap();
    /// ```
    pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.env_filter()));

        let fmt_layer = if config.json_format {
            tracing_subscriber::fmt::layer().json().boxed()
        } else {
            tracing_subscriber::fmt::layer().boxed()
        };

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;

        Ok(())
    }
}
