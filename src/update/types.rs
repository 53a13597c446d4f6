// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Types shared by the update builder, transport and orchestrator.

use std::fmt;
use std::str::FromStr;

use hickory_client::rr::RecordType;
use serde::{Deserialize, Serialize};

/// HMAC algorithm used to sign updates with a TSIG key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TsigAlgorithm {
    #[serde(rename = "hmac-md5")]
    HmacMd5,
    #[serde(rename = "hmac-sha1")]
    HmacSha1,
    #[serde(rename = "hmac-sha224")]
    HmacSha224,
    #[serde(rename = "hmac-sha256")]
    HmacSha256,
    #[serde(rename = "hmac-sha384")]
    HmacSha384,
    #[serde(rename = "hmac-sha512")]
    HmacSha512,
}

impl TsigAlgorithm {
    /// Algorithm name as written in BIND key statements.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HmacMd5 => "hmac-md5",
            Self::HmacSha1 => "hmac-sha1",
            Self::HmacSha224 => "hmac-sha224",
            Self::HmacSha256 => "hmac-sha256",
            Self::HmacSha384 => "hmac-sha384",
            Self::HmacSha512 => "hmac-sha512",
        }
    }
}

impl fmt::Display for TsigAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TsigAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // BIND accepts the legacy "hmac-md5.sig-alg.reg.int" spelling as well.
        match s.trim().trim_end_matches('.').to_ascii_lowercase().as_str() {
            "hmac-md5" | "hmac-md5.sig-alg.reg.int" => Ok(Self::HmacMd5),
            "hmac-sha1" => Ok(Self::HmacSha1),
            "hmac-sha224" => Ok(Self::HmacSha224),
            "hmac-sha256" => Ok(Self::HmacSha256),
            "hmac-sha384" => Ok(Self::HmacSha384),
            "hmac-sha512" => Ok(Self::HmacSha512),
            other => Err(format!(
                "Unsupported TSIG algorithm '{other}'. Supported algorithms: hmac-md5, \
                 hmac-sha1, hmac-sha224, hmac-sha256, hmac-sha384, hmac-sha512"
            )),
        }
    }
}

/// TSIG key used to authenticate dynamic updates.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TsigCredential {
    /// Key name as configured on the nameserver
    pub name: String,
    /// HMAC algorithm
    pub algorithm: TsigAlgorithm,
    /// Base64-encoded secret key
    pub secret: String,
}

impl fmt::Debug for TsigCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TsigCredential")
            .field("name", &self.name)
            .field("algorithm", &self.algorithm)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Nameserver an update is sent to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServerEndpoint {
    /// Hostname or address literal
    pub hostname: String,
    /// TCP port the server accepts updates on
    pub port: u16,
}

impl ServerEndpoint {
    #[must_use]
    pub fn new(hostname: impl Into<String>, port: u16) -> Self {
        Self {
            hostname: hostname.into(),
            port,
        }
    }
}

impl fmt::Display for ServerEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.hostname, self.port)
    }
}

/// What an update does to its record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateAction {
    /// Append the record to its RRset
    Add,
    /// Replace every record of the same name and type with this one
    Replace,
    /// Remove the record (or RRset, or every RRset at the name)
    Delete,
}

impl fmt::Display for UpdateAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "ADD"),
            Self::Replace => write!(f, "REPLACE"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// One resource record, named relative to its zone.
///
/// `rdata` is the presentation form (e.g. `"10 mail"` for MX). A record
/// used for deletion may leave it empty, and may use type `ANY` to address
/// every RRset at the name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    /// Owner name; `@` or empty is the zone apex, a trailing `.` makes it absolute
    pub name: String,
    /// Record type
    pub record_type: RecordType,
    /// Time to live in seconds
    pub ttl: u32,
    /// Presentation-format record data
    pub rdata: String,
}

impl ResourceRecord {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        record_type: RecordType,
        ttl: u32,
        rdata: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            record_type,
            ttl,
            rdata: rdata.into(),
        }
    }

    /// A record addressing every RRset at `name`, for deletion.
    #[must_use]
    pub fn any(name: impl Into<String>) -> Self {
        Self::new(name, RecordType::ANY, 0, String::new())
    }

    /// Fully-qualified owner name within `zone`.
    #[must_use]
    pub fn fqdn(&self, zone: &str) -> String {
        owner_fqdn(&self.name, zone)
    }
}

/// Zone name with the trailing root label.
#[must_use]
pub fn zone_fqdn(zone: &str) -> String {
    let zone = zone.trim();
    if zone.ends_with('.') {
        zone.to_string()
    } else {
        format!("{zone}.")
    }
}

/// Fully-qualified owner name for `name` relative to `zone`.
#[must_use]
pub fn owner_fqdn(name: &str, zone: &str) -> String {
    let name = name.trim();
    if name.is_empty() || name == "@" {
        zone_fqdn(zone)
    } else if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{name}.{}", zone_fqdn(zone))
    }
}

/// True for record types whose data is an address a PTR can point back from.
#[must_use]
pub fn is_address_type(record_type: RecordType) -> bool {
    matches!(record_type, RecordType::A | RecordType::AAAA)
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
