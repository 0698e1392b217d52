//! Process configuration, read from the environment (optionally seeded from `.env`).

use std::time::Duration;

use crate::models::encuentro::ParticipantBounds;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_MAX_CONNECTIONS: u32 = 8;
const DEFAULT_REGISTRY_TIMEOUT_SECS: u64 = 10;

/// Which storage backend serves the catalog and receives actas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage: StorageBackend,
    pub database_url: Option<String>,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub session_key: Option<String>,
    /// Bounds applied when a submission does not name an encuentro configuration.
    pub participant_bounds: ParticipantBounds,
    pub registro_civil_url: Option<String>,
    pub registro_civil_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageBackend::Memory,
            database_url: None,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            db_max_connections: DEFAULT_MAX_CONNECTIONS,
            session_key: None,
            participant_bounds: ParticipantBounds::default(),
            registro_civil_url: None,
            registro_civil_timeout: Duration::from_secs(DEFAULT_REGISTRY_TIMEOUT_SECS),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let get = |key: &str| get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let storage = match get("STORAGE").as_deref().map(str::to_lowercase).as_deref() {
            None | Some("postgres") => StorageBackend::Postgres,
            Some("memory") => StorageBackend::Memory,
            Some(other) => return Err(format!("STORAGE must be 'postgres' or 'memory', got '{other}'")),
        };

        let database_url = get("DATABASE_URL");
        if storage == StorageBackend::Postgres && database_url.is_none() {
            return Err("DATABASE_URL is required when STORAGE=postgres".to_string());
        }

        let defaults = ParticipantBounds::default();
        let min = parse_number(get("PARTICIPANTES_MIN"), "PARTICIPANTES_MIN", defaults.min)?;
        let max = parse_number(get("PARTICIPANTES_MAX"), "PARTICIPANTES_MAX", defaults.max)?;
        let participant_bounds = ParticipantBounds::new(min, max)?;

        Ok(Self {
            storage,
            database_url,
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            db_max_connections: parse_number(
                get("DB_MAX_CONNECTIONS"),
                "DB_MAX_CONNECTIONS",
                DEFAULT_MAX_CONNECTIONS,
            )?,
            session_key: get("SESSION_KEY"),
            participant_bounds,
            registro_civil_url: get("REGISTRO_CIVIL_URL"),
            registro_civil_timeout: Duration::from_secs(parse_number(
                get("REGISTRO_CIVIL_TIMEOUT_SECS"),
                "REGISTRO_CIVIL_TIMEOUT_SECS",
                DEFAULT_REGISTRY_TIMEOUT_SECS,
            )?),
        })
    }
}

fn parse_number<T: std::str::FromStr>(value: Option<String>, key: &str, default: T) -> Result<T, String> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| format!("{key} must be a non-negative integer, got '{raw}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn memory_backend_needs_no_database_url() {
        let cfg = AppConfig::from_lookup(lookup(&[("STORAGE", "memory")])).unwrap();
        assert_eq!(cfg.storage, StorageBackend::Memory);
        assert_eq!(cfg.bind_addr, "127.0.0.1:8080");
        assert_eq!(cfg.participant_bounds, ParticipantBounds::default());
        assert!(cfg.registro_civil_url.is_none());
    }

    #[test]
    fn postgres_backend_requires_database_url() {
        let err = AppConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(err.contains("DATABASE_URL"));

        let cfg = AppConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/actas")])).unwrap();
        assert_eq!(cfg.storage, StorageBackend::Postgres);
    }

    #[test]
    fn participant_bounds_are_overridable() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("STORAGE", "memory"),
            ("PARTICIPANTES_MIN", "7"),
            ("PARTICIPANTES_MAX", "50"),
        ]))
        .unwrap();
        assert_eq!(cfg.participant_bounds.min, 7);
        assert_eq!(cfg.participant_bounds.max, 50);
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let err = AppConfig::from_lookup(lookup(&[
            ("STORAGE", "memory"),
            ("PARTICIPANTES_MIN", "12"),
            ("PARTICIPANTES_MAX", "10"),
        ]))
        .unwrap_err();
        assert!(err.contains("PARTICIPANTES"));
    }

    #[test]
    fn garbage_numbers_are_rejected() {
        let err = AppConfig::from_lookup(lookup(&[("STORAGE", "memory"), ("DB_MAX_CONNECTIONS", "many")]))
            .unwrap_err();
        assert!(err.contains("DB_MAX_CONNECTIONS"));
    }

    #[test]
    fn unknown_storage_is_rejected() {
        assert!(AppConfig::from_lookup(lookup(&[("STORAGE", "redis")])).is_err());
    }
}
