//! Process configuration.
//!
//! Every section has a `Default` and is loaded from environment variables
//! through [`FromEnv`]. Unset and empty variables fall back to the default;
//! set but unparsable ones are an error.
//!
//! | Variable | Section | Meaning |
//! |---|---|---|
//! | `PINATA_KEY` / `PINATA_SECRET` | pinning | API credentials |
//! | `PINATA_URL` | pinning | JSON pinning endpoint |
//! | `PINATA_FILE_URL` | pinning | file pinning endpoint |
//! | `PORT` | server | listen port (default 3000) |
//! | `L2_MOCK_HOST` | client | document store base URL |
//! | `PROFILE_LEDGER_KEYSTORE` | client | device keystore file |

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use profile_ledger_pin::PinataConfig;
use profile_ledger_store::StoreConfig;

use crate::error::ConfigError;

/// Default listen port of the document store.
pub const DEFAULT_PORT: u16 = 3000;

/// Default document store URL, as seen from an Android emulator.
pub const DEFAULT_STORE_URL: &str = "http://10.0.2.2:3000";

/// Default device keystore file.
pub const DEFAULT_KEYSTORE_PATH: &str = "profile-ledger-keystore.db";

/// Default timeout for document store requests.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(10);

/// Load a configuration section from environment variables.
pub trait FromEnv: Sized {
    /// Load using an arbitrary variable lookup.
    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>;

    /// Load from the process environment.
    fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }
}

fn non_empty<F>(lookup: &F, var: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var).filter(|value| !value.trim().is_empty())
}

// ─────────────────────────────────────────────────────────────────────────────
// Pinning
// ─────────────────────────────────────────────────────────────────────────────

impl FromEnv for PinataConfig {
    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = PinataConfig::default();
        Ok(PinataConfig {
            api_key: non_empty(&lookup, "PINATA_KEY"),
            api_secret: non_empty(&lookup, "PINATA_SECRET"),
            json_endpoint: non_empty(&lookup, "PINATA_URL").unwrap_or(defaults.json_endpoint),
            file_endpoint: non_empty(&lookup, "PINATA_FILE_URL").unwrap_or(defaults.file_endpoint),
            request_timeout: defaults.request_timeout,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Server
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration of the document store server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listen address.
    pub bind: SocketAddr,
    /// Reject documents whose signature does not verify.
    pub verify_signatures: bool,
}

impl ServerConfig {
    /// The store configuration this server runs with.
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            verify_signatures: self.verify_signatures,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT),
            verify_signatures: false,
        }
    }
}

impl FromEnv for ServerConfig {
    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ServerConfig::default();
        if let Some(value) = non_empty(&lookup, "PORT") {
            let port = value
                .trim()
                .parse::<u16>()
                .map_err(|e| ConfigError::Invalid {
                    var: "PORT",
                    value: value.clone(),
                    reason: e.to_string(),
                })?;
            config.bind.set_port(port);
        }
        Ok(config)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Client
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration of the registration client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the document store.
    pub store_url: String,
    /// SQLite file holding the device key.
    pub keystore_path: PathBuf,
    /// Timeout for document store requests.
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            store_url: DEFAULT_STORE_URL.to_string(),
            keystore_path: PathBuf::from(DEFAULT_KEYSTORE_PATH),
            request_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }
}

impl FromEnv for ClientConfig {
    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ClientConfig::default();
        Ok(ClientConfig {
            store_url: non_empty(&lookup, "L2_MOCK_HOST").unwrap_or(defaults.store_url),
            keystore_path: non_empty(&lookup, "PROFILE_LEDGER_KEYSTORE")
                .map(PathBuf::from)
                .unwrap_or(defaults.keystore_path),
            request_timeout: defaults.request_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let pinning = PinataConfig::from_lookup(env(&[])).unwrap();
        assert!(!pinning.has_credentials());
        assert_eq!(pinning.request_timeout, Duration::from_secs(30));

        let server = ServerConfig::from_lookup(env(&[])).unwrap();
        assert_eq!(server, ServerConfig::default());
        assert_eq!(server.bind.port(), 3000);

        let client = ClientConfig::from_lookup(env(&[])).unwrap();
        assert_eq!(client.store_url, "http://10.0.2.2:3000");
        assert_eq!(client.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_pinning_from_env() {
        let pinning = PinataConfig::from_lookup(env(&[
            ("PINATA_KEY", "k"),
            ("PINATA_SECRET", "s"),
            ("PINATA_URL", "http://localhost:9000/json"),
        ]))
        .unwrap();

        assert!(pinning.has_credentials());
        assert_eq!(pinning.json_endpoint, "http://localhost:9000/json");
        assert_eq!(pinning.file_endpoint, PinataConfig::default().file_endpoint);
    }

    #[test]
    fn test_empty_values_are_unset() {
        let pinning =
            PinataConfig::from_lookup(env(&[("PINATA_KEY", ""), ("PINATA_SECRET", " ")])).unwrap();
        assert_eq!(pinning.api_key, None);
        assert_eq!(pinning.api_secret, None);
    }

    #[test]
    fn test_port_override_and_rejection() {
        let server = ServerConfig::from_lookup(env(&[("PORT", "8080")])).unwrap();
        assert_eq!(server.bind.port(), 8080);

        let err = ServerConfig::from_lookup(env(&[("PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_client_from_env() {
        let client = ClientConfig::from_lookup(env(&[
            ("L2_MOCK_HOST", "http://127.0.0.1:4000"),
            ("PROFILE_LEDGER_KEYSTORE", "/tmp/keys.db"),
        ]))
        .unwrap();
        assert_eq!(client.store_url, "http://127.0.0.1:4000");
        assert_eq!(client.keystore_path, PathBuf::from("/tmp/keys.db"));
    }

    #[test]
    fn test_server_store_config() {
        let server = ServerConfig {
            verify_signatures: true,
            ..ServerConfig::default()
        };
        assert!(server.store_config().verify_signatures);
    }
}
