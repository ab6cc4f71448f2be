//! CLI configuration.
//!
//! Defaults suit local use. Override via environment variables or explicit
//! construction in tests.

use std::path::PathBuf;

use veritas_did::is_network_segment;
use zeroize::Zeroizing;

pub const DEFAULT_NETWORK: &str = "polygon";
pub const DEFAULT_STATUS_BASE_URL: &str = "https://veritas.id/credentials/status";
pub const DEFAULT_REGISTRY_PATH: &str = "veritas-registry.json";
pub const DEFAULT_EXPIRES_IN_DAYS: u32 = 365;

/// Settings shared by all subcommands.
///
/// Custom `Debug` implementation redacts the issuer key.
#[derive(Clone)]
pub struct CliConfig {
    /// Hex secp256k1 secret used when a command gets no `--key`.
    pub issuer_private_key: Option<Zeroizing<String>>,
    /// `did:ethr` network segment for issuer DIDs.
    pub network: String,
    /// Base URI of status-list credentials.
    pub status_base_url: String,
    /// JSON registry snapshot read by `verify` and written by `status`.
    pub registry_path: PathBuf,
    /// Validity of issued credentials; 0 means no expiration.
    pub expires_in_days: u32,
}

impl std::fmt::Debug for CliConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CliConfig")
            .field(
                "issuer_private_key",
                &self.issuer_private_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("network", &self.network)
            .field("status_base_url", &self.status_base_url)
            .field("registry_path", &self.registry_path)
            .field("expires_in_days", &self.expires_in_days)
            .finish()
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            issuer_private_key: None,
            network: DEFAULT_NETWORK.to_string(),
            status_base_url: DEFAULT_STATUS_BASE_URL.to_string(),
            registry_path: PathBuf::from(DEFAULT_REGISTRY_PATH),
            expires_in_days: DEFAULT_EXPIRES_IN_DAYS,
        }
    }
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `VERITAS_ISSUER_PRIVATE_KEY` (optional)
    /// - `VERITAS_NETWORK` (default: `polygon`)
    /// - `VERITAS_STATUS_BASE_URL` (default: `https://veritas.id/credentials/status`)
    /// - `VERITAS_REGISTRY_PATH` (default: `veritas-registry.json`)
    /// - `VERITAS_EXPIRES_IN_DAYS` (default: 365)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through `lookup` instead of the process
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let network = lookup("VERITAS_NETWORK").unwrap_or(defaults.network);
        if !is_network_segment(&network) {
            return Err(ConfigError::InvalidValue {
                var: "VERITAS_NETWORK",
                value: network,
            });
        }

        let status_base_url = lookup("VERITAS_STATUS_BASE_URL")
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or(defaults.status_base_url);
        if !(status_base_url.starts_with("https://") || status_base_url.starts_with("http://")) {
            return Err(ConfigError::InvalidUrl {
                var: "VERITAS_STATUS_BASE_URL",
                value: status_base_url,
            });
        }

        let expires_in_days = match lookup("VERITAS_EXPIRES_IN_DAYS") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                var: "VERITAS_EXPIRES_IN_DAYS",
                value: raw,
            })?,
            None => defaults.expires_in_days,
        };

        Ok(Self {
            issuer_private_key: lookup("VERITAS_ISSUER_PRIVATE_KEY")
                .filter(|s| !s.trim().is_empty())
                .map(Zeroizing::new),
            network,
            status_base_url,
            registry_path: lookup("VERITAS_REGISTRY_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.registry_path),
            expires_in_days,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
    #[error("invalid URL for {var}: {value:?}")]
    InvalidUrl { var: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = CliConfig::from_lookup(lookup(&[])).unwrap();
        assert!(cfg.issuer_private_key.is_none());
        assert_eq!(cfg.network, "polygon");
        assert_eq!(cfg.status_base_url, DEFAULT_STATUS_BASE_URL);
        assert_eq!(cfg.registry_path, PathBuf::from("veritas-registry.json"));
        assert_eq!(cfg.expires_in_days, 365);
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = CliConfig::from_lookup(lookup(&[
            ("VERITAS_NETWORK", "sepolia"),
            ("VERITAS_STATUS_BASE_URL", "http://localhost:8080/status/"),
            ("VERITAS_REGISTRY_PATH", "/tmp/reg.json"),
            ("VERITAS_EXPIRES_IN_DAYS", "30"),
        ]))
        .unwrap();
        assert_eq!(cfg.network, "sepolia");
        assert_eq!(cfg.status_base_url, "http://localhost:8080/status");
        assert_eq!(cfg.registry_path, PathBuf::from("/tmp/reg.json"));
        assert_eq!(cfg.expires_in_days, 30);
    }

    #[test]
    fn malformed_values_are_errors() {
        assert!(matches!(
            CliConfig::from_lookup(lookup(&[("VERITAS_EXPIRES_IN_DAYS", "a year")])),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            CliConfig::from_lookup(lookup(&[("VERITAS_STATUS_BASE_URL", "veritas.id")])),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            CliConfig::from_lookup(lookup(&[("VERITAS_NETWORK", "poly gon")])),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            CliConfig::from_lookup(lookup(&[("VERITAS_NETWORK", "")])),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn dotted_network_issues_verifiable_dids() {
        let cfg = CliConfig::from_lookup(lookup(&[("VERITAS_NETWORK", "base.sepolia")])).unwrap();
        let key = veritas_crypto::SecpKeyPair::generate();
        let did = veritas_did::encode_ethr(&cfg.network, &key.address().to_lower_hex()).unwrap();
        assert_eq!(
            veritas_did::extract_identity(&did).unwrap(),
            veritas_did::Identity::Address(key.address())
        );
    }

    #[test]
    fn debug_redacts_key() {
        let cfg = CliConfig::from_lookup(lookup(&[(
            "VERITAS_ISSUER_PRIVATE_KEY",
            "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318",
        )]))
        .unwrap();
        let dbg = format!("{cfg:?}");
        assert!(dbg.contains("[REDACTED]"));
        assert!(!dbg.contains("4c0883a6"));
    }
}
