// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Presentation-format record data parsing.
//!
//! Turns strings such as `"10 mail"` (MX) or `"\"v=spf1 -all\""` (TXT) into
//! hickory [`RData`]. Names inside rdata that do not end with `.` are completed
//! with the zone, the same way a zone file resolves them against `$ORIGIN`.

use hickory_client::rr::{rdata, Name, RData, RecordType};
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use crate::constants::MAX_CHARACTER_STRING_LEN;

/// Wrap TXT data in a quoted-string literal so it travels as one character-string.
///
/// Embedded quotes and backslashes are escaped; any other type is returned verbatim.
#[must_use]
pub fn quote_txt(record_type: RecordType, data: &str) -> String {
    if record_type != RecordType::TXT {
        return data.to_string();
    }

    let escaped = data.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

/// Split presentation text into tokens, honouring quoted strings.
///
/// Inside and outside quotes a backslash escapes the next character.
///
/// # Errors
///
/// Returns an error for an unterminated quoted string or a trailing backslash.
pub fn tokenize(text: &str) -> Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut in_quotes = false;
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let escaped = chars
                    .next()
                    .ok_or_else(|| "trailing backslash in record data".to_string())?;
                current.push(escaped);
                in_token = true;
            }
            '"' if in_quotes => {
                tokens.push(std::mem::take(&mut current));
                in_quotes = false;
                in_token = false;
            }
            '"' => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                }
                in_quotes = true;
                in_token = false;
            }
            c if c.is_whitespace() && !in_quotes => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if in_quotes {
        return Err("unterminated quoted string in record data".to_string());
    }
    if in_token {
        tokens.push(current);
    }

    Ok(tokens)
}

/// Parse a domain name appearing in rdata, completing relative names with `zone`.
///
/// # Errors
///
/// Returns an error if the resulting name is not a valid DNS name.
pub fn parse_name(text: &str, zone: &str) -> Result<Name, String> {
    let absolute = if text == "@" {
        zone.to_string()
    } else if text.ends_with('.') {
        text.to_string()
    } else {
        format!("{text}.{zone}")
    };

    Name::from_str(&absolute).map_err(|e| format!("invalid domain name '{absolute}': {e}"))
}

/// Parse presentation-format data for `record_type` within `zone` (which must be absolute).
///
/// Supported types: A, AAAA, CNAME, PTR, NS, TXT, MX, SRV.
///
/// # Errors
///
/// Returns a human-readable reason when the data does not parse or the type is
/// not supported.
pub fn parse_rdata(record_type: RecordType, text: &str, zone: &str) -> Result<RData, String> {
    let tokens = tokenize(text)?;
    let fields: Vec<&str> = tokens.iter().map(String::as_str).collect();

    match record_type {
        RecordType::A => {
            let [address] = expect_fields::<1>(record_type, &fields)?;
            let ipv4 = Ipv4Addr::from_str(address)
                .map_err(|_| format!("invalid IPv4 address '{address}'"))?;
            Ok(RData::A(ipv4.into()))
        }
        RecordType::AAAA => {
            let [address] = expect_fields::<1>(record_type, &fields)?;
            let ipv6 = Ipv6Addr::from_str(address)
                .map_err(|_| format!("invalid IPv6 address '{address}'"))?;
            Ok(RData::AAAA(ipv6.into()))
        }
        RecordType::CNAME => {
            let [target] = expect_fields::<1>(record_type, &fields)?;
            Ok(RData::CNAME(rdata::CNAME(parse_name(target, zone)?)))
        }
        RecordType::PTR => {
            let [target] = expect_fields::<1>(record_type, &fields)?;
            Ok(RData::PTR(rdata::PTR(parse_name(target, zone)?)))
        }
        RecordType::NS => {
            let [target] = expect_fields::<1>(record_type, &fields)?;
            Ok(RData::NS(rdata::NS(parse_name(target, zone)?)))
        }
        RecordType::MX => {
            let [preference, exchange] = expect_fields::<2>(record_type, &fields)?;
            Ok(RData::MX(rdata::MX::new(
                parse_u16("MX preference", preference)?,
                parse_name(exchange, zone)?,
            )))
        }
        RecordType::SRV => {
            let [priority, weight, port, target] = expect_fields::<4>(record_type, &fields)?;
            Ok(RData::SRV(rdata::SRV::new(
                parse_u16("SRV priority", priority)?,
                parse_u16("SRV weight", weight)?,
                parse_u16("SRV port", port)?,
                parse_name(target, zone)?,
            )))
        }
        RecordType::TXT => {
            if tokens.is_empty() {
                return Err("TXT record needs at least one string".to_string());
            }
            if let Some(long) = tokens.iter().find(|t| t.len() > MAX_CHARACTER_STRING_LEN) {
                return Err(format!(
                    "TXT string of {} bytes exceeds the {MAX_CHARACTER_STRING_LEN}-byte limit",
                    long.len()
                ));
            }
            Ok(RData::TXT(rdata::TXT::new(tokens)))
        }
        other => Err(format!("unsupported record type {other}")),
    }
}

fn expect_fields<'a, const N: usize>(
    record_type: RecordType,
    fields: &[&'a str],
) -> Result<[&'a str; N], String> {
    <[&str; N]>::try_from(fields).map_err(|_| {
        format!(
            "{record_type} record expects {N} field(s), got {}",
            fields.len()
        )
    })
}

fn parse_u16(what: &str, value: &str) -> Result<u16, String> {
    value
        .parse::<u16>()
        .map_err(|_| format!("invalid {what} '{value}'"))
}

#[cfg(test)]
#[path = "rdata_tests.rs"]
mod rdata_tests;
