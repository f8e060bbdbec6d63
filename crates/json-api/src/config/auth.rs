//! Auth Config

use clap::Args;
use jiff::SignedDuration;

/// Session token and password hashing settings.
#[derive(Debug, Args)]
pub struct AuthConfig {
    /// HMAC secret used to sign access and refresh tokens
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// Access token lifetime in minutes
    #[arg(long, env = "ACCESS_TOKEN_TTL_MINUTES", default_value_t = 60_u32)]
    pub access_token_ttl_minutes: u32,

    /// Refresh token lifetime in hours
    #[arg(long, env = "REFRESH_TOKEN_TTL_HOURS", default_value_t = 24_u32)]
    pub refresh_token_ttl_hours: u32,

    /// bcrypt work factor for stored passwords
    #[arg(
        long,
        env = "BCRYPT_COST",
        default_value_t = 12_u32,
        value_parser = clap::value_parser!(u32).range(4..=31)
    )]
    pub bcrypt_cost: u32,
}

impl AuthConfig {
    #[must_use]
    pub fn access_token_ttl(&self) -> SignedDuration {
        SignedDuration::from_mins(i64::from(self.access_token_ttl_minutes))
    }

    #[must_use]
    pub fn refresh_token_ttl(&self) -> SignedDuration {
        SignedDuration::from_hours(i64::from(self.refresh_token_ttl_hours))
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
        auth: AuthConfig,
    }

    #[test]
    fn lifetimes_convert_to_durations() -> TestResult {
        let harness = Harness::try_parse_from([
            "shop-json",
            "--jwt-secret",
            "secret",
            "--access-token-ttl-minutes",
            "5",
            "--refresh-token-ttl-hours",
            "48",
        ])?;

        assert_eq!(harness.auth.access_token_ttl(), SignedDuration::from_mins(5));
        assert_eq!(harness.auth.refresh_token_ttl(), SignedDuration::from_hours(48));

        Ok(())
    }

    #[test]
    fn bcrypt_cost_below_minimum_is_rejected() {
        let result = Harness::try_parse_from([
            "shop-json",
            "--jwt-secret",
            "secret",
            "--bcrypt-cost",
            "3",
        ]);

        assert!(result.is_err(), "cost 3 should be rejected");
    }
}
