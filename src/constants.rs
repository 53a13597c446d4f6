// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for binder.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// DNS Protocol Constants
// ============================================================================

/// Standard DNS port for dynamic updates over TCP
pub const DNS_PORT: u16 = 53;

/// Default TTL for records created from the CLI (1 hour)
pub const DEFAULT_DNS_RECORD_TTL_SECS: u32 = 3600;

/// Longest character-string a TXT record can carry (RFC 1035 §3.3)
pub const MAX_CHARACTER_STRING_LEN: usize = 255;

/// Largest DNS message that fits behind a TCP length prefix
pub const MAX_TCP_MESSAGE_LEN: usize = 65_535;

// ============================================================================
// TSIG Constants
// ============================================================================

/// TSIG fudge time in seconds (allows for clock skew)
pub const TSIG_FUDGE_TIME_SECS: u64 = 300;

/// Size of generated HMAC-SHA256 secrets in bytes
pub const TSIG_GENERATED_KEY_BYTES: usize = 32;

/// TSIG error field: signature failed to verify (RFC 8945 §5.3.2)
pub const TSIG_ERROR_BADSIG: u16 = 16;

/// TSIG error field: key not recognized by the server
pub const TSIG_ERROR_BADKEY: u16 = 17;

/// TSIG error field: signing time outside the fudge window
pub const TSIG_ERROR_BADTIME: u16 = 18;

// ============================================================================
// Transport Constants
// ============================================================================

/// Default read/write/connect timeout for one update exchange
pub const DEFAULT_TRANSPORT_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// Configuration Constants
// ============================================================================

/// Environment variable naming the configuration file
pub const CONFIG_PATH_ENV: &str = "BINDER_CONFIG";

/// Configuration file used when neither flag nor environment names one
pub const DEFAULT_CONFIG_PATH: &str = "binder.yaml";

/// Environment variable selecting the log output format (`text` or `json`)
pub const LOG_FORMAT_ENV: &str = "RUST_LOG_FORMAT";
