//! Observability & Logging Config

use clap::Args;

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Crates whose chatter is capped at `warn` whatever the log level.
const QUIET_TARGETS: [&str; 5] = ["h2", "hyper", "tower", "tonic", "opentelemetry"];

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    /// Log every SQL statement sqlx executes
    #[arg(long, env = "LOG_SQL", default_value_t = false)]
    pub log_sql: bool,
}

impl LoggingConfig {
    /// `EnvFilter` directives for the configured level.
    #[must_use]
    pub fn filter_directives(&self) -> String {
        let mut directives = vec![self.log_level.clone()];

        directives.extend(QUIET_TARGETS.iter().map(|target| format!("{target}=warn")));

        if !self.log_sql {
            directives.push("sqlx::query=warn".to_string());
        }

        directives.join(",")
    }
}

/// Observability settings.
#[derive(Debug, Args)]
pub struct ObservabilityConfig {
    /// Export traces over OTLP.
    #[arg(long, env = "OTEL_ENABLED", default_value_t = false)]
    pub otel_enabled: bool,

    /// Enable traceparent extraction from incoming request headers.
    #[arg(long, env = "OTEL_PARENT_PROPAGATION_ENABLED", default_value_t = false)]
    pub otel_parent_propagation_enabled: bool,

    /// OTLP gRPC endpoint for trace export.
    #[arg(
        long,
        env = "OTEL_EXPORTER_OTLP_ENDPOINT",
        default_value = "http://localhost:4317"
    )]
    pub otel_exporter_otlp_endpoint: String,

    /// OTLP exporter timeout in seconds.
    #[arg(
        long,
        env = "OTEL_EXPORTER_OTLP_TIMEOUT_SECONDS",
        default_value_t = 3u64
    )]
    pub otel_exporter_otlp_timeout_seconds: u64,

    /// OpenTelemetry service name.
    #[arg(long, env = "OTEL_SERVICE_NAME", default_value = "shop-json")]
    pub otel_service_name: String,

    /// OpenTelemetry service version.
    #[arg(
        long,
        env = "OTEL_SERVICE_VERSION",
        default_value = env!("CARGO_PKG_VERSION")
    )]
    pub otel_service_version: String,

    /// OpenTelemetry deployment environment.
    #[arg(
        long,
        env = "OTEL_DEPLOYMENT_ENVIRONMENT",
        default_value = "development"
    )]
    pub otel_deployment_environment: String,

    /// Trace sampling ratio in range [0.0, 1.0].
    #[arg(long, env = "OTEL_TRACE_SAMPLE_RATIO", default_value_t = 1.0_f64)]
    pub otel_trace_sample_ratio: f64,

    /// Requests slower than this many milliseconds are logged as warnings.
    #[arg(long, env = "SLOW_REQUEST_THRESHOLD_MS", default_value_t = 500_u64)]
    pub slow_request_threshold_ms: u64,
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use testresult::TestResult;

    use super::*;

    #[derive(Debug, Parser)]
    struct Harness {
        #[command(flatten)]
        logging: LoggingConfig,
    }

    #[test]
    fn sql_statements_are_quiet_by_default() -> TestResult {
        let harness = Harness::try_parse_from(["shop-json", "--log-level", "debug"])?;

        let directives = harness.logging.filter_directives();

        assert!(directives.starts_with("debug,"), "got {directives}");
        assert!(directives.contains("hyper=warn"), "got {directives}");

        if !harness.logging.log_sql {
            assert!(directives.ends_with("sqlx::query=warn"), "got {directives}");
        }

        Ok(())
    }

    #[test]
    fn log_sql_lifts_the_sqlx_cap() -> TestResult {
        let harness = Harness::try_parse_from(["shop-json", "--log-level", "info", "--log-sql"])?;

        let directives = harness.logging.filter_directives();

        assert!(!directives.contains("sqlx"), "got {directives}");

        Ok(())
    }
}
