//! Process configuration, read from environment variables.

use std::net::SocketAddr;

use thiserror::Error;

use orgbook_core::TenantId;

pub const TENANT_ID_VAR: &str = "ORGBOOK_TENANT_ID";
pub const BIND_ADDR_VAR: &str = "ORGBOOK_BIND_ADDR";
pub const MAX_BODY_BYTES_VAR: &str = "ORGBOOK_MAX_BODY_BYTES";

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Tenant every request is served on behalf of.
    pub tenant_id: TenantId,
    pub bind_addr: SocketAddr,
    /// Upper bound for request bodies; larger bodies get 413.
    pub max_body_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build the config from an arbitrary variable lookup (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let tenant_id = lookup(TENANT_ID_VAR)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing(TENANT_ID_VAR))?
            .parse::<TenantId>()
            .map_err(|e| ConfigError::Invalid {
                var: TENANT_ID_VAR,
                reason: e.to_string(),
            })?;

        let bind_addr = lookup(BIND_ADDR_VAR)
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                var: BIND_ADDR_VAR,
                reason: e.to_string(),
            })?;

        let max_body_bytes = match lookup(MAX_BODY_BYTES_VAR) {
            Some(raw) => raw.trim().parse::<usize>().map_err(|e| ConfigError::Invalid {
                var: MAX_BODY_BYTES_VAR,
                reason: e.to_string(),
            })?,
            None => DEFAULT_MAX_BODY_BYTES,
        };

        Ok(Self {
            tenant_id,
            bind_addr,
            max_body_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const TENANT: &str = "0190a5a8-5c2e-7d1f-9a3b-4c5d6e7f8091";

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var: &str| map.get(var).cloned()
    }

    #[test]
    fn defaults_apply_when_only_tenant_is_set() {
        let cfg = AppConfig::from_lookup(lookup(&[(TENANT_ID_VAR, TENANT)])).unwrap();
        assert_eq!(cfg.tenant_id.to_string(), TENANT);
        assert_eq!(cfg.bind_addr, DEFAULT_BIND_ADDR.parse::<SocketAddr>().unwrap());
        assert_eq!(cfg.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
    }

    #[test]
    fn overrides_are_honoured() {
        let cfg = AppConfig::from_lookup(lookup(&[
            (TENANT_ID_VAR, TENANT),
            (BIND_ADDR_VAR, "127.0.0.1:9000"),
            (MAX_BODY_BYTES_VAR, "1024"),
        ]))
        .unwrap();
        assert_eq!(cfg.bind_addr.port(), 9000);
        assert_eq!(cfg.max_body_bytes, 1024);
    }

    #[test]
    fn tenant_is_required() {
        let err = AppConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing(TENANT_ID_VAR));

        let err = AppConfig::from_lookup(lookup(&[(TENANT_ID_VAR, "  ")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing(TENANT_ID_VAR));
    }

    #[test]
    fn malformed_values_name_the_variable() {
        let err = AppConfig::from_lookup(lookup(&[(TENANT_ID_VAR, "acme")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: TENANT_ID_VAR, .. }));

        let err = AppConfig::from_lookup(lookup(&[
            (TENANT_ID_VAR, TENANT),
            (BIND_ADDR_VAR, "localhost"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: BIND_ADDR_VAR, .. }));

        let err = AppConfig::from_lookup(lookup(&[
            (TENANT_ID_VAR, TENANT),
            (MAX_BODY_BYTES_VAR, "lots"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: MAX_BODY_BYTES_VAR, .. }));
    }
}
