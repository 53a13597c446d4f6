// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! DNS update error types for binder.
//!
//! This module provides specialized error types for:
//! - TSIG key resolution and server-side TSIG rejections
//! - Record data problems and non-success response codes
//! - TCP transport failures while talking to a nameserver
//! - Reverse-name computation from address literals
//!
//! Every variant carries the server, key or record it concerns so that the
//! caller can log or render the failure at its own boundary.

use std::fmt;

use thiserror::Error;

use crate::constants::{TSIG_ERROR_BADKEY, TSIG_ERROR_BADSIG, TSIG_ERROR_BADTIME};

/// Why a nameserver refused a TSIG-signed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TsigRejection {
    /// The server does not know the key (TSIG error BADKEY)
    BadKey,
    /// The MAC did not verify, on either side of the exchange (TSIG error BADSIG)
    BadSignature,
    /// Signing time outside the allowed fudge window (TSIG error BADTIME)
    BadTime,
    /// A successful response came back without the TSIG record we asked for
    Unsigned,
}

impl TsigRejection {
    /// Map the TSIG error field of a response onto a rejection, if it is one.
    #[must_use]
    pub fn from_tsig_error(code: u16) -> Option<Self> {
        match code {
            TSIG_ERROR_BADSIG => Some(Self::BadSignature),
            TSIG_ERROR_BADKEY => Some(Self::BadKey),
            TSIG_ERROR_BADTIME => Some(Self::BadTime),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BadKey => "BADKEY",
            Self::BadSignature => "BADSIG",
            Self::BadTime => "BADTIME",
            Self::Unsigned => "UNSIGNED",
        }
    }
}

impl fmt::Display for TsigRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let detail = match self {
            Self::BadKey => "the server is not configured for this key",
            Self::BadSignature => "the signature did not verify, check the key for correctness",
            Self::BadTime => "the signing time is outside the allowed window, check clock skew",
            Self::Unsigned => "the response carried no TSIG signature",
        };
        write!(f, "{} ({detail})", self.as_str())
    }
}

/// Errors related to TSIG (Transaction Signature) keys and authentication.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TsigError {
    /// The named TSIG key has no configured credential
    #[error("The specified TSIG key '{key_name}' does not exist in the configured keyring")]
    UnknownKey {
        /// The key name that was requested
        key_name: String,
    },

    /// The credential exists but cannot be turned into a signer
    ///
    /// Returned for malformed base64 secrets, invalid key names, or an
    /// algorithm the signer refuses.
    #[error("Invalid TSIG key data for '{key_name}': {reason}")]
    InvalidKeyData {
        /// The key name with invalid data
        key_name: String,
        /// Explanation of what is invalid
        reason: String,
    },

    /// The nameserver rejected the signed message
    #[error("DNS server {server} rejected TSIG key '{key_name}': {reason}")]
    Rejected {
        /// The DNS server hostname that rejected the message
        server: String,
        /// The TSIG key name that was used
        key_name: String,
        /// What the server (or response verification) reported
        reason: TsigRejection,
    },
}

/// Errors related to record contents and update outcomes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// Transport succeeded but the server answered with a non-success code
    #[error("Error when requesting DNS server {server}: {code}")]
    ResponseCode {
        /// The DNS server hostname
        server: String,
        /// Mnemonic of the response code (e.g. "REFUSED", "NOTAUTH")
        code: String,
    },

    /// Record owner, zone or rdata could not be turned into wire form
    #[error("Invalid record data for '{name}': {reason}")]
    InvalidRecordData {
        /// The record (or zone) name with invalid data
        name: String,
        /// Explanation of what is invalid
        reason: String,
    },
}

/// Connection-level failures while exchanging an update with a nameserver.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The server registry has no entry for this hostname
    #[error("DNS server '{hostname}' is not configured")]
    UnknownServer {
        /// The hostname that was requested
        hostname: String,
    },

    /// Resolution of the server address or the TCP connect failed
    #[error("Connection to {server}:{port} failed: {reason}")]
    ConnectionFailed {
        /// The DNS server hostname
        server: String,
        /// TCP port
        port: u16,
        /// Reason reported by the socket layer
        reason: String,
    },

    /// The exchange did not finish within the transport timeout
    #[error("Update exchange with {server}:{port} timed out after {timeout_secs}s")]
    Timeout {
        /// The DNS server hostname
        server: String,
        /// TCP port
        port: u16,
        /// Timeout that elapsed
        timeout_secs: u64,
    },

    /// The connection broke while the message or its response was in flight
    #[error("Update exchange with {server}:{port} failed: {reason}")]
    Exchange {
        /// The DNS server hostname
        server: String,
        /// TCP port
        port: u16,
        /// Reason reported by the socket layer
        reason: String,
    },

    /// Bytes came back but they are not a response to our message
    #[error("Malformed response from DNS server {server}: {reason}")]
    MalformedResponse {
        /// The DNS server hostname
        server: String,
        /// What was wrong with the response
        reason: String,
    },
}

/// Errors computing reverse names from address literals.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// Input is not a parseable IPv4 or IPv6 literal
    #[error("'{address}' is not a valid IPv4 or IPv6 address")]
    InvalidAddress {
        /// The rejected input
        address: String,
    },
}

/// Composite error type returned by every update operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpdateError {
    /// TSIG key resolution or rejection
    #[error(transparent)]
    Tsig(#[from] TsigError),

    /// Record data or response code error
    #[error(transparent)]
    Record(#[from] RecordError),

    /// TCP transport error
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Reverse-name computation error
    #[error(transparent)]
    Address(#[from] AddressError),
}

impl UpdateError {
    /// Returns true if retrying the same update later could succeed.
    ///
    /// Nothing in binder retries; this is advice for the caller.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(
                TransportError::ConnectionFailed { .. }
                | TransportError::Timeout { .. }
                | TransportError::Exchange { .. },
            ) => true,
            Self::Record(RecordError::ResponseCode { code, .. }) => code == "SERVFAIL",
            Self::Tsig(TsigError::Rejected {
                reason: TsigRejection::BadTime,
                ..
            }) => true,

            Self::Tsig(_)
            | Self::Record(RecordError::InvalidRecordData { .. })
            | Self::Transport(
                TransportError::UnknownServer { .. } | TransportError::MalformedResponse { .. },
            )
            | Self::Address(_) => false,
        }
    }

    /// Stable reason code for this error, suitable for reports and logs.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Tsig(TsigError::UnknownKey { .. }) => "UnknownKey",
            Self::Tsig(TsigError::InvalidKeyData { .. }) => "InvalidTsigKeyData",
            Self::Tsig(TsigError::Rejected { .. }) => "TsigRejected",

            Self::Record(RecordError::ResponseCode { .. }) => "RecordError",
            Self::Record(RecordError::InvalidRecordData { .. }) => "InvalidRecordData",

            Self::Transport(TransportError::UnknownServer { .. }) => "UnknownServer",
            Self::Transport(TransportError::ConnectionFailed { .. }) => "ConnectionFailed",
            Self::Transport(TransportError::Timeout { .. }) => "TransportTimeout",
            Self::Transport(TransportError::Exchange { .. }) => "ExchangeFailed",
            Self::Transport(TransportError::MalformedResponse { .. }) => "MalformedResponse",

            Self::Address(AddressError::InvalidAddress { .. }) => "InvalidAddress",
        }
    }
}
