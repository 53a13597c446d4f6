// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Classification of update responses.
//!
//! TSIG rejections are detected by the transport while it verifies the response
//! signature. What reaches this module is a verified response, and the only
//! remaining question is whether its response code reports success.

use hickory_client::op::{Message, ResponseCode};

use crate::dns_errors::RecordError;
use crate::report::ServerResponse;

/// Response code mnemonic as printed by `nsupdate` and `dig`.
///
/// Codes without a mnemonic are rendered as `RCODE<n>`.
#[must_use]
pub fn rcode_text(code: ResponseCode) -> String {
    let value = u16::from(code);
    let mnemonic = match value {
        0 => "NOERROR",
        1 => "FORMERR",
        2 => "SERVFAIL",
        3 => "NXDOMAIN",
        4 => "NOTIMP",
        5 => "REFUSED",
        6 => "YXDOMAIN",
        7 => "YXRRSET",
        8 => "NXRRSET",
        9 => "NOTAUTH",
        10 => "NOTZONE",
        16 => "BADVERS",
        17 => "BADKEY",
        18 => "BADTIME",
        19 => "BADMODE",
        20 => "BADNAME",
        21 => "BADALG",
        22 => "BADTRUNC",
        23 => "BADCOOKIE",
        _ => return format!("RCODE{value}"),
    };
    mnemonic.to_string()
}

/// Turn a verified response into a report entry or a record error.
///
/// # Errors
///
/// Returns [`RecordError::ResponseCode`] naming `server` and the response code
/// mnemonic for any code other than `NOERROR`.
pub fn classify(server: &str, response: &Message) -> Result<ServerResponse, RecordError> {
    let code = response.response_code();
    if code == ResponseCode::NoError {
        Ok(ServerResponse::from_message(response))
    } else {
        Err(RecordError::ResponseCode {
            server: server.to_string(),
            code: rcode_text(code),
        })
    }
}

#[cfg(test)]
#[path = "classify_tests.rs"]
mod classify_tests;
