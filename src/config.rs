// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! YAML configuration for servers, TSIG keys and the transport.
//!
//! ```yaml
//! servers:
//!   - hostname: ns1.example.com
//!     dns_port: 53
//! keys:
//!   - name: update-key
//!     algorithm: hmac-sha256
//!     secret: "c2VjcmV0LWtleS1mb3ItdGVzdHM="
//! key_files:
//!   - /etc/bind/update.key
//! transport:
//!   timeout_secs: 10
//! ```
//!
//! Relative `key_files` paths are resolved against the directory of the
//! configuration file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::constants::{DEFAULT_TRANSPORT_TIMEOUT_SECS, DNS_PORT};
use crate::update::registry::{Keyring, ServerTable};
use crate::update::transport::TcpTransport;
use crate::update::tsig::parse_key_file;
use crate::update::types::TsigCredential;

/// A nameserver that accepts updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub hostname: String,
    #[serde(default = "default_dns_port")]
    pub dns_port: u16,
}

/// Transport settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportConfig {
    /// I/O timeout for one update exchange, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TRANSPORT_TIMEOUT_SECS,
        }
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub servers: Vec<ServerConfig>,
    /// Inline TSIG keys
    #[serde(default)]
    pub keys: Vec<TsigCredential>,
    /// BIND key files to load keys from
    #[serde(default)]
    pub key_files: Vec<PathBuf>,
    #[serde(default)]
    pub transport: TransportConfig,
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

fn default_dns_port() -> u16 {
    DNS_PORT
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TRANSPORT_TIMEOUT_SECS
}

impl Config {
    /// Read and parse the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?;

        let mut config = Self::from_yaml(&content)
            .with_context(|| format!("Invalid configuration file {}", path.display()))?;
        config.base_dir = path.parent().map(Path::to_path_buf);

        debug!(
            "Loaded configuration from {} ({} server(s), {} inline key(s), {} key file(s))",
            path.display(),
            config.servers.len(),
            config.keys.len(),
            config.key_files.len()
        );
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML does not describe a valid configuration.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(content).context("Failed to parse configuration YAML")?;
        if config.transport.timeout_secs == 0 {
            anyhow::bail!("transport.timeout_secs must be greater than zero");
        }
        Ok(config)
    }

    /// Keys from `keys` and every file in `key_files`.
    ///
    /// A key defined more than once keeps its last definition; key files are
    /// read after the inline keys.
    ///
    /// # Errors
    ///
    /// Returns an error if a key file cannot be read or parsed.
    pub fn keyring(&self) -> Result<Keyring> {
        let mut keyring: Keyring = self.keys.iter().cloned().collect();

        for file in &self.key_files {
            let path = self.resolve(file);
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read key file {}", path.display()))?;
            let credentials = parse_key_file(&content)
                .with_context(|| format!("Failed to parse key file {}", path.display()))?;

            for credential in credentials {
                let name = credential.name.clone();
                if keyring.insert(credential).is_some() {
                    warn!("Key '{}' from {} overrides an earlier definition", name, path.display());
                }
            }
        }

        Ok(keyring)
    }

    #[must_use]
    pub fn server_table(&self) -> ServerTable {
        let mut table = ServerTable::new();
        for server in &self.servers {
            table.insert(server.hostname.clone(), server.dns_port);
        }
        table
    }

    #[must_use]
    pub fn transport(&self) -> TcpTransport {
        TcpTransport::new(Duration::from_secs(self.transport.timeout_secs))
    }

    fn resolve(&self, file: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if file.is_relative() => base.join(file),
            _ => file.to_path_buf(),
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
