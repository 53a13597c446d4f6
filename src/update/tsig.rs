// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! TSIG key generation, key-file handling and signer construction.

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hickory_client::rr::rdata::tsig::TsigAlgorithm as HickoryTsigAlgorithm;
use hickory_client::rr::Name;
use hickory_proto::rr::dnssec::tsig::TSigner;
use std::str::FromStr;

use super::types::{TsigAlgorithm, TsigCredential};
use crate::constants::{TSIG_FUDGE_TIME_SECS, TSIG_GENERATED_KEY_BYTES};
use crate::dns_errors::TsigError;

/// Generate a new TSIG key with HMAC-SHA256.
///
/// Returns a base64-encoded 256-bit (32-byte) secret under the given key name.
#[must_use]
pub fn generate_tsig_key(name: &str) -> TsigCredential {
    let key_bytes: [u8; TSIG_GENERATED_KEY_BYTES] = rand::random();

    TsigCredential {
        name: name.to_string(),
        algorithm: TsigAlgorithm::HmacSha256,
        secret: BASE64.encode(key_bytes),
    }
}

/// Render a credential as a BIND `key` statement.
#[must_use]
pub fn key_file_contents(credential: &TsigCredential) -> String {
    format!(
        "key \"{}\" {{\n    algorithm {};\n    secret \"{}\";\n}};\n",
        credential.name,
        credential.algorithm.as_str(),
        credential.secret
    )
}

/// Parse every `key` statement in a BIND key file.
///
/// Expected format (one or more blocks):
/// ```text
/// key "key-name" {
///     algorithm hmac-sha256;
///     secret "base64secret==";
/// };
/// ```
///
/// # Errors
///
/// Returns an error if a block is missing its name, algorithm or secret, names an
/// unsupported algorithm, or if the file contains no key statement at all.
pub fn parse_key_file(content: &str) -> Result<Vec<TsigCredential>> {
    let mut credentials = Vec::new();
    let mut name: Option<String> = None;
    let mut algorithm: Option<TsigAlgorithm> = None;
    let mut secret: Option<String> = None;

    for line in content.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
            continue;
        }

        if line.starts_with("key ") || line.starts_with("key\t") {
            name = Some(
                line.split('"')
                    .nth(1) // Get the text between first pair of quotes
                    .context("Failed to parse key name from key statement")?
                    .to_string(),
            );
            algorithm = None;
            secret = None;
        } else if line.starts_with("algorithm") {
            let algorithm_str = line
                .split_whitespace()
                .nth(1) // After "algorithm"
                .map(|s| s.trim_end_matches(';'))
                .context("Failed to parse algorithm from key file")?;
            algorithm = Some(
                TsigAlgorithm::from_str(algorithm_str).map_err(|e| anyhow::anyhow!(e))?,
            );
        } else if line.starts_with("secret") {
            secret = Some(
                line.split('"')
                    .nth(1)
                    .context("Failed to parse secret from key file")?
                    .to_string(),
            );
        } else if line.starts_with("};") {
            let key_name = name.take().context("Key block closed before a key name")?;
            credentials.push(TsigCredential {
                algorithm: algorithm
                    .take()
                    .with_context(|| format!("Key '{key_name}' has no algorithm"))?,
                secret: secret
                    .take()
                    .with_context(|| format!("Key '{key_name}' has no secret"))?,
                name: key_name,
            });
        }
    }

    if let Some(key_name) = name {
        anyhow::bail!("Key '{key_name}' is not terminated with '}};'");
    }
    if credentials.is_empty() {
        anyhow::bail!("No key statement found in key file");
    }

    Ok(credentials)
}

/// Create a TSIG signer from a credential.
///
/// # Errors
///
/// Returns [`TsigError::InvalidKeyData`] if the secret is not base64, the key name
/// is not a valid DNS name, or the algorithm is not supported by the signer.
pub fn create_tsig_signer(credential: &TsigCredential) -> Result<TSigner, TsigError> {
    let invalid = |reason: String| TsigError::InvalidKeyData {
        key_name: credential.name.clone(),
        reason,
    };

    let algorithm = match credential.algorithm {
        TsigAlgorithm::HmacMd5 => HickoryTsigAlgorithm::HmacMd5,
        TsigAlgorithm::HmacSha1 => HickoryTsigAlgorithm::HmacSha1,
        TsigAlgorithm::HmacSha224 => HickoryTsigAlgorithm::HmacSha224,
        TsigAlgorithm::HmacSha256 => HickoryTsigAlgorithm::HmacSha256,
        TsigAlgorithm::HmacSha384 => HickoryTsigAlgorithm::HmacSha384,
        TsigAlgorithm::HmacSha512 => HickoryTsigAlgorithm::HmacSha512,
    };

    let key_bytes = BASE64
        .decode(credential.secret.trim())
        .map_err(|e| invalid(format!("secret is not valid base64: {e}")))?;

    let signer_name = Name::from_str(&credential.name)
        .map_err(|e| invalid(format!("invalid key name: {e}")))?;

    TSigner::new(
        key_bytes,
        algorithm,
        signer_name,
        u16::try_from(TSIG_FUDGE_TIME_SECS).unwrap_or(300),
    )
    .map_err(|e| invalid(format!("failed to create TSIG signer: {e}")))
}

#[cfg(test)]
#[path = "tsig_tests.rs"]
mod tsig_tests;
