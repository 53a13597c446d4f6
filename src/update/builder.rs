// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Construction of single-record RFC 2136 update operations.
//!
//! An update message carries the zone in its zone section (the question
//! section on the wire) and the changes in its update section (the authority
//! section). The class of each update record selects its meaning:
//!
//! | Class  | Type  | RDATA   | Meaning                          |
//! |--------|-------|---------|----------------------------------|
//! | `IN`   | rr    | rr      | add to an RRset                  |
//! | `ANY`  | rr    | empty   | delete an RRset                  |
//! | `ANY`  | `ANY` | empty   | delete all RRsets at a name      |
//! | `NONE` | rr    | rr      | delete one RR from an RRset      |
//!
//! Replace is a delete-RRset followed by an add in the same message, which
//! the server applies atomically.

use std::fmt;
use std::str::FromStr;

use hickory_client::op::{Message, MessageType, OpCode, Query};
use hickory_client::rr::{DNSClass, Name, Record, RecordType};
use hickory_proto::rr::dnssec::tsig::TSigner;
use tracing::debug;

use super::rdata::{parse_rdata, quote_txt};
use super::tsig::create_tsig_signer;
use super::types::{owner_fqdn, zone_fqdn, ResourceRecord, TsigCredential, UpdateAction};
use crate::dns_errors::{RecordError, UpdateError};

/// A built, not yet transmitted, update for one record in one zone.
///
/// The operation holds the signer for its credential; the TSIG record itself is
/// computed by the transport when the message is framed, so every transmission
/// gets a fresh message id and signing time.
#[derive(Clone)]
pub struct UpdateOperation {
    zone: Name,
    action: UpdateAction,
    record: ResourceRecord,
    owner: Name,
    message: Message,
    key_name: String,
    signer: TSigner,
}

impl UpdateOperation {
    /// Zone the update targets.
    #[must_use]
    pub fn zone(&self) -> &Name {
        &self.zone
    }

    #[must_use]
    pub fn action(&self) -> UpdateAction {
        self.action
    }

    /// The record as it is transmitted (TXT data already quoted).
    #[must_use]
    pub fn record(&self) -> &ResourceRecord {
        &self.record
    }

    /// Presentation-format rdata as transmitted.
    #[must_use]
    pub fn rdata(&self) -> &str {
        &self.record.rdata
    }

    /// Fully-qualified owner name of the record.
    #[must_use]
    pub fn owner(&self) -> &Name {
        &self.owner
    }

    /// The unsigned update message.
    #[must_use]
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Name of the TSIG key the update is signed with.
    #[must_use]
    pub fn key_name(&self) -> &str {
        &self.key_name
    }

    #[must_use]
    pub fn signer(&self) -> &TSigner {
        &self.signer
    }
}

impl fmt::Debug for UpdateOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateOperation")
            .field("zone", &self.zone)
            .field("action", &self.action)
            .field("record", &self.record)
            .field("key_name", &self.key_name)
            .finish_non_exhaustive()
    }
}

/// Build a signed update operation for one record.
///
/// # Arguments
///
/// * `zone` - Zone name; a trailing `.` is added if missing
/// * `record` - The record, named relative to `zone`
/// * `credential` - TSIG key the operation is signed with
/// * `action` - Add, replace or delete
///
/// # Errors
///
/// Returns [`crate::dns_errors::TsigError::InvalidKeyData`] if no signer can be
/// created from `credential`, and [`RecordError::InvalidRecordData`] if the zone,
/// owner or rdata cannot be parsed.
pub fn build_update(
    zone: &str,
    record: &ResourceRecord,
    credential: &TsigCredential,
    action: UpdateAction,
) -> Result<UpdateOperation, UpdateError> {
    let signer = create_tsig_signer(credential)?;

    let zone_str = zone_fqdn(zone);
    let zone_name = Name::from_str(&zone_str).map_err(|e| RecordError::InvalidRecordData {
        name: zone_str.clone(),
        reason: format!("invalid zone name: {e}"),
    })?;

    let fqdn = owner_fqdn(&record.name, &zone_str);
    let owner = Name::from_str(&fqdn).map_err(|e| RecordError::InvalidRecordData {
        name: fqdn.clone(),
        reason: format!("invalid record name: {e}"),
    })?;

    let mut wire_record = record.clone();
    if action != UpdateAction::Delete || !record.rdata.is_empty() {
        wire_record.rdata = quote_txt(record.record_type, &record.rdata);
    }

    let updates = update_records(&owner, &zone_str, &wire_record, action).map_err(|reason| {
        RecordError::InvalidRecordData {
            name: fqdn.clone(),
            reason,
        }
    })?;

    let mut message = Message::new();
    message
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Update)
        .set_recursion_desired(false);
    // Zone section: exactly one SOA-typed entry naming the zone (RFC 2136 §2.3).
    message.add_query(Query::query(zone_name.clone(), RecordType::SOA));
    for update in updates {
        message.add_name_server(update);
    }

    debug!(
        "Built {} update for {} {} in zone {} (key {})",
        action, fqdn, wire_record.record_type, zone_name, credential.name
    );

    Ok(UpdateOperation {
        zone: zone_name,
        action,
        record: wire_record,
        owner,
        message,
        key_name: credential.name.clone(),
        signer,
    })
}

fn update_records(
    owner: &Name,
    zone: &str,
    record: &ResourceRecord,
    action: UpdateAction,
) -> Result<Vec<Record>, String> {
    match action {
        UpdateAction::Add => Ok(vec![add_record(owner, zone, record)?]),
        UpdateAction::Replace => Ok(vec![
            delete_rrset(owner, record.record_type),
            add_record(owner, zone, record)?,
        ]),
        UpdateAction::Delete if record.rdata.is_empty() => {
            Ok(vec![delete_rrset(owner, record.record_type)])
        }
        UpdateAction::Delete => {
            let rdata = parse_rdata(record.record_type, &record.rdata, zone)?;
            let mut delete = Record::from_rdata(owner.clone(), 0, rdata);
            delete.set_dns_class(DNSClass::NONE);
            Ok(vec![delete])
        }
    }
}

fn add_record(owner: &Name, zone: &str, record: &ResourceRecord) -> Result<Record, String> {
    if record.record_type == RecordType::ANY {
        return Err("cannot add a record of type ANY".to_string());
    }

    let rdata = parse_rdata(record.record_type, &record.rdata, zone)?;
    let mut add = Record::from_rdata(owner.clone(), record.ttl, rdata);
    add.set_dns_class(DNSClass::IN);
    Ok(add)
}

/// Class ANY with empty rdata: the RRset of `record_type`, or every RRset for type ANY.
fn delete_rrset(owner: &Name, record_type: RecordType) -> Record {
    let mut delete = Record::with(owner.clone(), record_type, 0);
    delete.set_dns_class(DNSClass::ANY);
    delete
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod builder_tests;
