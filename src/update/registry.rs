// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Lookup interfaces for TSIG keys and nameservers.
//!
//! The orchestrator only needs to resolve a key name to a credential and a
//! server hostname to an endpoint. Where those come from (a configuration
//! file, a database, a secret store) is up to the caller.

use std::collections::BTreeMap;

use super::types::{ServerEndpoint, TsigCredential};
use crate::dns_errors::{TransportError, TsigError};

/// Resolves TSIG key names to credentials.
pub trait CredentialProvider {
    /// Look up the credential for `key_name`.
    ///
    /// # Errors
    ///
    /// Returns [`TsigError::UnknownKey`] if no such key is configured.
    fn lookup(&self, key_name: &str) -> Result<TsigCredential, TsigError>;
}

/// Resolves server hostnames to the endpoint updates are sent to.
pub trait ServerRegistry {
    /// Look up the endpoint for `hostname`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::UnknownServer`] if the server is not known.
    fn lookup(&self, hostname: &str) -> Result<ServerEndpoint, TransportError>;
}

impl<T: CredentialProvider + ?Sized> CredentialProvider for &T {
    fn lookup(&self, key_name: &str) -> Result<TsigCredential, TsigError> {
        (**self).lookup(key_name)
    }
}

impl<T: ServerRegistry + ?Sized> ServerRegistry for &T {
    fn lookup(&self, hostname: &str) -> Result<ServerEndpoint, TransportError> {
        (**self).lookup(hostname)
    }
}

/// In-memory set of TSIG credentials keyed by name.
#[derive(Debug, Clone, Default)]
pub struct Keyring {
    keys: BTreeMap<String, TsigCredential>,
}

impl Keyring {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a credential; returns the one it replaced.
    pub fn insert(&mut self, credential: TsigCredential) -> Option<TsigCredential> {
        self.keys.insert(credential.name.clone(), credential)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Key names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }
}

impl FromIterator<TsigCredential> for Keyring {
    fn from_iter<I: IntoIterator<Item = TsigCredential>>(iter: I) -> Self {
        let mut keyring = Self::new();
        for credential in iter {
            keyring.insert(credential);
        }
        keyring
    }
}

impl CredentialProvider for Keyring {
    fn lookup(&self, key_name: &str) -> Result<TsigCredential, TsigError> {
        self.keys
            .get(key_name)
            .cloned()
            .ok_or_else(|| TsigError::UnknownKey {
                key_name: key_name.to_string(),
            })
    }
}

/// In-memory table of known servers and their update ports.
#[derive(Debug, Clone, Default)]
pub struct ServerTable {
    ports: BTreeMap<String, u16>,
}

impl ServerTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, hostname: impl Into<String>, port: u16) {
        self.ports.insert(hostname.into(), port);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ports.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }
}

impl ServerRegistry for ServerTable {
    fn lookup(&self, hostname: &str) -> Result<ServerEndpoint, TransportError> {
        self.ports
            .get(hostname)
            .map(|port| ServerEndpoint::new(hostname, *port))
            .ok_or_else(|| TransportError::UnknownServer {
                hostname: hostname.to_string(),
            })
    }
}

/// Accepts any hostname and pairs it with one fixed port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPort(pub u16);

impl ServerRegistry for FixedPort {
    fn lookup(&self, hostname: &str) -> Result<ServerEndpoint, TransportError> {
        Ok(ServerEndpoint::new(hostname, self.0))
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod registry_tests;
