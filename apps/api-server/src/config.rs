//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use scribe_infra::{DatabaseConfig, SupabaseConfig};

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Development,
    Test,
    Production,
}

impl Environment {
    /// The password login endpoint is a convenience for non-production
    /// deployments only.
    pub fn allows_login(self) -> bool {
        self != Environment::Production
    }
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "development" | "dev" => Ok(Self::Development),
            "test" => Ok(Self::Test),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(()),
        }
    }
}

/// Configuration errors, fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Placeholder rate limit settings. No limiter is wired yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub window_ms: u64,
    pub max_requests: u32,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
    pub supabase: SupabaseConfig,
    pub rate_limit: RateLimitConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its
    /// value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        Ok(Self {
            env: vars.parsed("APP_ENV", Environment::Development)?,
            host: vars.get("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: vars.parsed("PORT", 3000)?,
            database: DatabaseConfig {
                url: vars.required("DATABASE_URL")?,
                max_connections: vars.parsed("DB_MAX_CONNECTIONS", 20)?,
                min_connections: vars.parsed("DB_MIN_CONNECTIONS", 2)?,
            },
            supabase: SupabaseConfig {
                url: vars.required("SUPABASE_URL")?,
                anon_key: vars.required("SUPABASE_ANON_KEY")?,
            },
            rate_limit: RateLimitConfig {
                window_ms: vars.parsed("RATE_LIMIT_WINDOW_MS", 900_000)?,
                max_requests: vars.parsed("RATE_LIMIT_MAX_REQUESTS", 100)?,
            },
        })
    }
}

struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Blank values count as unset.
    fn get(&self, name: &str) -> Option<String> {
        (self.0)(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, name: &'static str) -> Result<String, ConfigError> {
        self.get(name).ok_or(ConfigError::Missing(name))
    }

    fn parsed<T: FromStr>(&self, name: &'static str, default: T) -> Result<T, ConfigError> {
        match self.get(name) {
            None => Ok(default),
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::Invalid { name, value }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    const REQUIRED: &[(&str, &str)] = &[
        ("DATABASE_URL", "postgres://localhost/scribe"),
        ("SUPABASE_URL", "https://project.supabase.co"),
        ("SUPABASE_ANON_KEY", "anon"),
    ];

    #[test]
    fn test_defaults() {
        let config = load(REQUIRED).unwrap();

        assert_eq!(config.env, Environment::Development);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert_eq!(config.database.max_connections, 20);
        assert_eq!(config.database.min_connections, 2);
        assert_eq!(config.rate_limit.window_ms, 900_000);
        assert_eq!(config.rate_limit.max_requests, 100);
    }

    #[test]
    fn test_missing_required_is_named() {
        let err = load(&REQUIRED[..2]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("SUPABASE_ANON_KEY")));
    }

    #[test]
    fn test_blank_required_counts_as_missing() {
        let mut pairs = REQUIRED.to_vec();
        pairs[0] = ("DATABASE_URL", "  ");
        assert!(matches!(load(&pairs), Err(ConfigError::Missing("DATABASE_URL"))));
    }

    #[test]
    fn test_invalid_number() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("PORT", "eighty"));

        let err = load(&pairs).unwrap_err();
        assert_eq!(err.to_string(), "invalid value for PORT: \"eighty\"");
    }

    #[test]
    fn test_environment_gates_login() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("APP_ENV", "Production"));

        let config = load(&pairs).unwrap();
        assert_eq!(config.env, Environment::Production);
        assert!(!config.env.allows_login());
        assert!(Environment::Local.allows_login());
    }

    #[test]
    fn test_unknown_environment_is_rejected() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("APP_ENV", "staging"));
        assert!(matches!(load(&pairs), Err(ConfigError::Invalid { name: "APP_ENV", .. })));
    }
}
