//! Database Config

use std::time::Duration;

use clap::Args;

use shop_app::database::PoolSettings;

/// Database settings.
#[derive(Debug, Args)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,

    /// Upper bound on pooled connections
    #[arg(
        long,
        env = "DATABASE_MAX_CONNECTIONS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub database_max_connections: u32,

    /// Seconds a request waits for a free connection before failing
    #[arg(long, env = "DATABASE_ACQUIRE_TIMEOUT_SECONDS", default_value_t = 5)]
    pub database_acquire_timeout_seconds: u64,
}

impl DatabaseConfig {
    #[must_use]
    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            max_connections: self.database_max_connections,
            acquire_timeout: Duration::from_secs(self.database_acquire_timeout_seconds),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use testresult::TestResult;

    use super::*;

    #[derive(Debug, Parser)]
    struct Harness {
        #[command(flatten)]
        database: DatabaseConfig,
    }

    #[test]
    fn pool_settings_follow_arguments() -> TestResult {
        let harness = Harness::try_parse_from([
            "shop-json",
            "--database-url",
            "postgres://localhost/shop",
            "--database-max-connections",
            "25",
            "--database-acquire-timeout-seconds",
            "2",
        ])?;

        assert_eq!(
            harness.database.pool_settings(),
            PoolSettings {
                max_connections: 25,
                acquire_timeout: Duration::from_secs(2),
            }
        );

        Ok(())
    }

    #[test]
    fn empty_pool_is_rejected() {
        let result = Harness::try_parse_from([
            "shop-json",
            "--database-url",
            "postgres://localhost/shop",
            "--database-max-connections",
            "0",
        ]);

        assert!(result.is_err(), "a pool needs at least one connection");
    }
}
