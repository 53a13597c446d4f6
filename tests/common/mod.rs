// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

// Common test utilities for integration tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use binder::dns_errors::UpdateError;
use binder::update::{
    Keyring, ServerEndpoint, ServerTable, TsigAlgorithm, TsigCredential, UpdateOperation,
    UpdateTransport,
};
use hickory_client::op::{Message, MessageType, OpCode, ResponseCode};
use hickory_client::rr::{DNSClass, Name, RData, RecordType};

pub const SERVER: &str = "ns1.example.com";
pub const KEY_NAME: &str = "update-key";

pub fn keyring() -> Keyring {
    std::iter::once(TsigCredential {
        name: KEY_NAME.to_string(),
        algorithm: TsigAlgorithm::HmacSha256,
        secret: "c2VjcmV0LWtleS1mb3ItdGVzdHM=".to_string(),
    })
    .collect()
}

pub fn servers() -> ServerTable {
    let mut servers = ServerTable::new();
    servers.insert(SERVER, 53);
    servers
}

/// A nameserver that applies RFC 2136 update sections to in-memory zones.
///
/// Updates whose zone is not served answer NOTAUTH, owners outside the zone
/// answer NOTZONE, and owners listed with [`InMemoryZone::refuse`] answer
/// REFUSED without changing anything.
#[derive(Default)]
pub struct InMemoryZone {
    zones: HashSet<Name>,
    rrsets: RefCell<HashMap<(Name, RecordType), Vec<RData>>>,
    refused: HashSet<Name>,
    sent: RefCell<Vec<UpdateOperation>>,
}

impl InMemoryZone {
    pub fn serving(zones: &[&str]) -> Self {
        Self {
            zones: zones.iter().map(|z| name(z)).collect(),
            ..Self::default()
        }
    }

    pub fn refuse(mut self, owner: &str) -> Self {
        self.refused.insert(name(owner));
        self
    }

    /// Current RRset of `record_type` at `owner`.
    pub fn rrset(&self, owner: &str, record_type: RecordType) -> Vec<RData> {
        self.rrsets
            .borrow()
            .get(&(name(owner), record_type))
            .cloned()
            .unwrap_or_default()
    }

    pub fn has_records_at(&self, owner: &str) -> bool {
        let owner = name(owner);
        self.rrsets.borrow().keys().any(|(n, _)| *n == owner)
    }

    pub fn sent(&self) -> Vec<UpdateOperation> {
        self.sent.borrow().clone()
    }

    fn apply(&self, message: &Message) -> ResponseCode {
        let Some(zone) = message.queries().first().map(|q| q.name().clone()) else {
            return ResponseCode::FormErr;
        };
        if !self.zones.contains(&zone) {
            return ResponseCode::NotAuth;
        }

        let updates = message.name_servers();
        for update in updates {
            if !zone.zone_of(update.name()) {
                return ResponseCode::NotZone;
            }
            if self.refused.contains(update.name()) {
                return ResponseCode::Refused;
            }
        }

        let mut rrsets = self.rrsets.borrow_mut();
        for update in updates {
            let owner = update.name().clone();
            match (update.dns_class(), update.record_type()) {
                (DNSClass::ANY, RecordType::ANY) => rrsets.retain(|(n, _), _| *n != owner),
                (DNSClass::ANY, record_type) => {
                    rrsets.remove(&(owner, record_type));
                }
                (DNSClass::NONE, record_type) => {
                    if let (Some(rdata), Some(rrset)) =
                        (update.data(), rrsets.get_mut(&(owner, record_type)))
                    {
                        rrset.retain(|existing| existing != rdata);
                    }
                }
                (DNSClass::IN, record_type) => {
                    if let Some(rdata) = update.data() {
                        let rrset = rrsets.entry((owner, record_type)).or_default();
                        if !rrset.contains(rdata) {
                            rrset.push(rdata.clone());
                        }
                    }
                }
                _ => return ResponseCode::FormErr,
            }
        }
        rrsets.retain(|_, rrset| !rrset.is_empty());
        ResponseCode::NoError
    }
}

impl UpdateTransport for InMemoryZone {
    fn send(
        &self,
        operation: &UpdateOperation,
        _endpoint: &ServerEndpoint,
    ) -> Result<Message, UpdateError> {
        self.sent.borrow_mut().push(operation.clone());
        assert_eq!(operation.message().op_code(), OpCode::Update);

        let code = self.apply(operation.message());
        let mut response = Message::new();
        response
            .set_id(operation.message().id())
            .set_message_type(MessageType::Response)
            .set_op_code(OpCode::Update)
            .set_response_code(code);
        Ok(response)
    }
}

pub fn name(value: &str) -> Name {
    let value = if value.ends_with('.') {
        value.to_string()
    } else {
        format!("{value}.")
    };
    value.parse().unwrap()
}
