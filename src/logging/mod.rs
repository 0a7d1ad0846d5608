use slog::{o, Drain, Logger};
use slog_async::Async;
use slog_term::{FullFormat, TermDecorator};

/// Configuration for setting up the logger
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    async_buffer_size: usize,
    use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            async_buffer_size: 1024,
            use_color: true,
        }
    }
}

impl LoggerConfig {
    /// Colorless output, for JSON deployments and CLI redirection.
    pub fn plain() -> Self {
        Self {
            use_color: false,
            ..Self::default()
        }
    }
}

/// Sets up the root audit logger
pub fn setup_logger(config: LoggerConfig) -> Logger {
    let decorator = {
        let builder = TermDecorator::new().stderr();
        let builder = if config.use_color {
            builder.force_color()
        } else {
            builder.force_plain()
        };
        builder.build()
    };

    let drain = FullFormat::new(decorator).build().fuse();

    let drain = Async::new(drain)
        .chan_size(config.async_buffer_size)
        .build()
        .fuse();

    Logger::root(drain, o!("version" => env!("CARGO_PKG_VERSION")))
}

/// Child logger tagged with the owning component, e.g. `trips` or `reports`.
pub fn component_logger(root: &Logger, component: &'static str) -> Logger {
    root.new(o!("component" => component))
}

/// A logger that drops everything.
pub fn discard_logger() -> Logger {
    Logger::root(slog::Discard, o!())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_loggers_can_be_derived_from_discard() {
        let root = discard_logger();
        let trips = component_logger(&root, "trips");
        slog::info!(trips, "trip created"; "trip_id" => "T-1");
    }

    #[test]
    fn plain_config_disables_color() {
        let cfg = LoggerConfig::plain();
        assert!(!cfg.use_color);
        assert_eq!(cfg.async_buffer_size, 1024);
    }
}
