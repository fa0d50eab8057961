// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup. Invalid
//! values abort startup with a [`ConfigError`].
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `DATABASE_PATH` | SQLite file, `:memory:` or `memory` | `data/politico.db` |
//! | `JWT_SECRET` | HMAC secret for bearer tokens | random per process |
//! | `ADMIN_EMAIL` / `ADMIN_PASSWORD` | Bootstrap admin account | unset |
//! | `TLS_CERT_PATH` / `TLS_KEY_PATH` | PEM certificate chain and key | unset (plain HTTP) |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::{env, net::SocketAddr, path::PathBuf, sync::Arc};

use tracing::{info, warn};

use crate::storage::{InMemoryStorage, SqliteStorage, Storage, StorageResult};

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const DATABASE_PATH_ENV: &str = "DATABASE_PATH";
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const ADMIN_EMAIL_ENV: &str = "ADMIN_EMAIL";
pub const ADMIN_PASSWORD_ENV: &str = "ADMIN_PASSWORD";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATABASE_PATH: &str = "data/politico.db";

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key} value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("{set} is set but {missing} is not; set both or neither")]
    Incomplete {
        set: &'static str,
        missing: &'static str,
    },
}

/// Where rows are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// SQLite database file
    Sqlite(PathBuf),
    /// SQLite in memory, discarded on exit
    SqliteInMemory,
    /// Map-backed store, discarded on exit
    InMemory,
}

impl StorageBackend {
    fn parse(value: &str) -> Self {
        match value {
            ":memory:" => StorageBackend::SqliteInMemory,
            "memory" => StorageBackend::InMemory,
            path => StorageBackend::Sqlite(PathBuf::from(path)),
        }
    }

    pub fn open(&self) -> StorageResult<Arc<dyn Storage>> {
        Ok(match self {
            StorageBackend::Sqlite(path) => Arc::new(SqliteStorage::open(path)?),
            StorageBackend::SqliteInMemory => Arc::new(SqliteStorage::open_in_memory()?),
            StorageBackend::InMemory => Arc::new(InMemoryStorage::new()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }

    /// Read `LOG_FORMAT` alone, so logging can start before the rest of the
    /// configuration is resolved.
    pub fn from_env() -> Self {
        Self::parse(env::var(LOG_FORMAT_ENV).ok().as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminBootstrap {
    pub email: String,
    pub password: String,
}

/// Fully resolved server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub storage: StorageBackend,
    pub jwt_secret: Option<String>,
    pub admin: Option<AdminBootstrap>,
    pub tls: Option<TlsPaths>,
    pub log_format: LogFormat,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = var(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match var(PORT_ENV) {
            None => {
                info!("{PORT_ENV} not set, using default: {DEFAULT_PORT}");
                DEFAULT_PORT
            }
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                key: PORT_ENV,
                value: raw.clone(),
                reason: e.to_string(),
            })?,
        };
        let addr = format!("{host}:{port}")
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                key: HOST_ENV,
                value: host.clone(),
                reason: e.to_string(),
            })?;

        let storage = StorageBackend::parse(
            &var(DATABASE_PATH_ENV).unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string()),
        );

        let jwt_secret = var(JWT_SECRET_ENV);
        if jwt_secret.is_none() {
            warn!("{JWT_SECRET_ENV} not set; tokens will not survive a restart");
        }

        let admin = pair(
            (ADMIN_EMAIL_ENV, var(ADMIN_EMAIL_ENV)),
            (ADMIN_PASSWORD_ENV, var(ADMIN_PASSWORD_ENV)),
        )?
        .map(|(email, password)| AdminBootstrap { email, password });

        let tls = pair(
            (TLS_CERT_PATH_ENV, var(TLS_CERT_PATH_ENV)),
            (TLS_KEY_PATH_ENV, var(TLS_KEY_PATH_ENV)),
        )?
        .map(|(cert, key)| TlsPaths {
            cert: cert.into(),
            key: key.into(),
        });

        let log_format = LogFormat::parse(var(LOG_FORMAT_ENV).as_deref());

        Ok(Self {
            addr,
            storage,
            jwt_secret,
            admin,
            tls,
            log_format,
        })
    }
}

/// Two variables that only make sense together.
fn pair(
    (first_key, first): (&'static str, Option<String>),
    (second_key, second): (&'static str, Option<String>),
) -> Result<Option<(String, String)>, ConfigError> {
    match (first, second) {
        (Some(a), Some(b)) => Ok(Some((a, b))),
        (None, None) => Ok(None),
        (Some(_), None) => Err(ConfigError::Incomplete {
            set: first_key,
            missing: second_key,
        }),
        (None, Some(_)) => Err(ConfigError::Incomplete {
            set: second_key,
            missing: first_key,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(
            config.storage,
            StorageBackend::Sqlite(PathBuf::from(DEFAULT_DATABASE_PATH))
        );
        assert!(config.jwt_secret.is_none());
        assert!(config.admin.is_none());
        assert!(config.tls.is_none());
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn explicit_values() {
        let config = load(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "9000"),
            ("DATABASE_PATH", "memory"),
            ("JWT_SECRET", "s3cret"),
            ("ADMIN_EMAIL", "root@example.com"),
            ("ADMIN_PASSWORD", "rootpw"),
            ("LOG_FORMAT", "json"),
        ])
        .unwrap();
        assert_eq!(config.addr, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(config.storage, StorageBackend::InMemory);
        assert_eq!(config.jwt_secret.as_deref(), Some("s3cret"));
        assert_eq!(config.admin.unwrap().email, "root@example.com");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn sqlite_memory_keyword() {
        let config = load(&[("DATABASE_PATH", ":memory:")]).unwrap();
        assert_eq!(config.storage, StorageBackend::SqliteInMemory);
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = load(&[("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
    }

    #[test]
    fn half_configured_pairs_are_rejected() {
        assert_eq!(
            load(&[("TLS_CERT_PATH", "cert.pem")]).unwrap_err(),
            ConfigError::Incomplete {
                set: "TLS_CERT_PATH",
                missing: "TLS_KEY_PATH"
            }
        );
        assert!(matches!(
            load(&[("ADMIN_PASSWORD", "pw")]).unwrap_err(),
            ConfigError::Incomplete { set: "ADMIN_PASSWORD", .. }
        ));
    }

    #[test]
    fn in_memory_backends_open() {
        assert!(StorageBackend::InMemory.open().unwrap().ping().is_ok());
        assert!(StorageBackend::SqliteInMemory.open().unwrap().ping().is_ok());
    }
}
