use anyhow::Context;
use serde::Deserialize;

/// Argon2 cost parameters used when hashing new credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct HashingConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub host: String,
    pub port: u16,
    pub hashing: HashingConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;
        let defaults = HashingConfig::default();
        let hashing = HashingConfig {
            memory_kib: parse_or(&lookup, "PASSWORD_MEMORY_KIB", defaults.memory_kib)?,
            iterations: parse_or(&lookup, "PASSWORD_ITERATIONS", defaults.iterations)?,
            parallelism: parse_or(&lookup, "PASSWORD_PARALLELISM", defaults.parallelism)?,
        };
        Ok(Self {
            database_url,
            max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?,
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(&lookup, "APP_PORT", 5000)?,
            hashing,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid value for {key}: {raw:?}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let cfg = config_from(&[("DATABASE_URL", "postgres://localhost/forge")]).unwrap();
        assert_eq!(cfg.database_url, "postgres://localhost/forge");
        assert_eq!(cfg.max_connections, 10);
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.hashing, HashingConfig::default());
    }

    #[test]
    fn missing_database_url_is_an_error() {
        let err = config_from(&[("APP_PORT", "8080")]).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn hashing_cost_is_tunable() {
        let cfg = config_from(&[
            ("DATABASE_URL", "postgres://localhost/forge"),
            ("PASSWORD_MEMORY_KIB", "4096"),
            ("PASSWORD_ITERATIONS", "3"),
            ("PASSWORD_PARALLELISM", "2"),
        ])
        .unwrap();
        assert_eq!(
            cfg.hashing,
            HashingConfig {
                memory_kib: 4096,
                iterations: 3,
                parallelism: 2
            }
        );
    }

    #[test]
    fn malformed_number_is_rejected() {
        let err = config_from(&[
            ("DATABASE_URL", "postgres://localhost/forge"),
            ("APP_PORT", "eighty"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("APP_PORT"));
    }
}
