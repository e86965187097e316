//! Server configuration read from the environment.

use std::str::FromStr;
use std::time::Duration;

use crate::error::AppError;

/// Settings for one server process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// PostgreSQL connection string. Quizzes and results stay in memory
    /// when unset.
    pub database_url: Option<String>,
    /// Address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Upper bound of the connection pool.
    pub max_connections: u32,
    /// Participants silent for longer than this are dropped from their
    /// session. Never, when unset.
    pub session_idle_timeout: Option<Duration>,
}

impl ApiConfig {
    /// Reads `DATABASE_URL`, `HOST`, `PORT`, `DATABASE_MAX_CONNECTIONS` and
    /// `SESSION_IDLE_TIMEOUT_SECS`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env) but with an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let idle_secs: Option<u64> = parse_optional(&lookup, "SESSION_IDLE_TIMEOUT_SECS")?;
        if idle_secs == Some(0) {
            return Err(AppError::Config(
                "SESSION_IDLE_TIMEOUT_SECS must be greater than zero".into(),
            ));
        }
        Ok(Self {
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_optional(&lookup, "PORT")?.unwrap_or(3000),
            max_connections: parse_optional(&lookup, "DATABASE_MAX_CONNECTIONS")?.unwrap_or(10),
            session_idle_timeout: idle_secs.map(Duration::from_secs),
        })
    }
}

fn parse_optional<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<Option<T>, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(name)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|e| AppError::Config(format!("{name} is invalid: {e}")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<ApiConfig, AppError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ApiConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.database_url, None);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.session_idle_timeout, None);
    }

    #[test]
    fn test_reads_every_variable() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://localhost/quizwings"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("DATABASE_MAX_CONNECTIONS", "4"),
            ("SESSION_IDLE_TIMEOUT_SECS", "1800"),
        ])
        .unwrap();

        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/quizwings"));
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_connections, 4);
        assert_eq!(config.session_idle_timeout, Some(Duration::from_secs(1800)));
    }

    #[test]
    fn test_invalid_port_is_a_config_error() {
        let result = config_from(&[("PORT", "eighty")]);

        match result.unwrap_err() {
            AppError::Config(message) => assert!(message.starts_with("PORT is invalid")),
            other => panic!("expected Config, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_idle_timeout_is_rejected() {
        let result = config_from(&[("SESSION_IDLE_TIMEOUT_SECS", "0")]);

        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
