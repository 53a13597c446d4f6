// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! End-to-end record operations against one nameserver.
//!
//! The [`UpdateOrchestrator`] ties key and server lookup, update construction,
//! transmission and response classification together into the three operations
//! callers use:
//!
//! - [`UpdateOrchestrator::add_record`] - forward record, optionally followed by its PTR
//! - [`UpdateOrchestrator::add_cname_record`] - replace an alias with a CNAME
//! - [`UpdateOrchestrator::delete_record`] - delete a batch of names
//!
//! Adds are fail-fast: the first error is returned as is and nothing after it
//! is attempted. A batch delete isolates failures per record and always returns
//! a full report once the server and key are resolved.
//!
//! # Example
//!
//! ```rust,no_run
//! use binder::orchestrator::UpdateOrchestrator;
//! use binder::update::{FixedPort, Keyring, TcpTransport};
//! use hickory_client::rr::RecordType;
//!
//! # fn example(keys: Keyring) -> Result<(), binder::dns_errors::UpdateError> {
//! let orchestrator = UpdateOrchestrator::new(keys, FixedPort(53), TcpTransport::default());
//!
//! let report = orchestrator.add_record(
//!     "ns1.example.com",
//!     "example.com",
//!     "www",
//!     RecordType::A,
//!     "192.0.2.10",
//!     3600,
//!     "update-key",
//!     true,
//!     false,
//! )?;
//! assert_eq!(report.len(), 2);
//! # Ok(())
//! # }
//! ```

use hickory_client::rr::RecordType;
use tracing::{debug, info, warn};

use crate::dns_errors::{RecordError, UpdateError};
use crate::report::{ReportStep, ServerResponse, TransactionReport};
use crate::reverse::reverse_name;
use crate::update::builder::build_update;
use crate::update::classify::classify;
use crate::update::registry::{CredentialProvider, ServerRegistry};
use crate::update::transport::UpdateTransport;
use crate::update::types::{
    is_address_type, owner_fqdn, zone_fqdn, ResourceRecord, ServerEndpoint, TsigCredential,
    UpdateAction,
};

/// Runs record operations using injected key, server and transport collaborators.
#[derive(Debug, Clone)]
pub struct UpdateOrchestrator<K, S, T> {
    keys: K,
    servers: S,
    transport: T,
}

impl<K, S, T> UpdateOrchestrator<K, S, T>
where
    K: CredentialProvider,
    S: ServerRegistry,
    T: UpdateTransport,
{
    pub fn new(keys: K, servers: S, transport: T) -> Self {
        Self {
            keys,
            servers,
            transport,
        }
    }

    /// Add a record, and optionally the PTR record that points back to it.
    ///
    /// The forward record is added (or replaces its RRset when `replace` is
    /// set). Only once that succeeded, and only for A and AAAA records with
    /// `create_reverse` set, the PTR for `data` is replaced in its reverse zone
    /// so that it points at `record_name.zone.`.
    ///
    /// # Returns
    ///
    /// A report with one step, or two when the reverse record was created.
    ///
    /// # Errors
    ///
    /// Any failure of either step is returned unchanged: unknown server or key,
    /// invalid key or record data, transport failure, TSIG rejection, or a
    /// non-success response code. A failed forward step means no reverse step.
    #[allow(clippy::too_many_arguments)]
    pub fn add_record(
        &self,
        server: &str,
        zone: &str,
        record_name: &str,
        record_type: RecordType,
        data: &str,
        ttl: u32,
        key_name: &str,
        create_reverse: bool,
        replace: bool,
    ) -> Result<TransactionReport, UpdateError> {
        let endpoint = self.servers.lookup(server)?;
        let credential = self.keys.lookup(key_name)?;
        let fqdn = owner_fqdn(record_name, zone);
        let action = if replace {
            UpdateAction::Replace
        } else {
            UpdateAction::Add
        };

        info!(
            "Adding {} record {} -> {} on {} (replace: {})",
            record_type, fqdn, data, server, replace
        );

        let mut report = TransactionReport::new();
        let record = ResourceRecord::new(record_name, record_type, ttl, data);
        let response = self.apply(&endpoint, zone, &record, &credential, action)?;
        report.push(ReportStep::succeeded(
            format!("Forward Record Creation: {fqdn}"),
            None,
            response,
        ));

        if create_reverse && is_address_type(record_type) {
            let reverse = reverse_name(data)?;
            info!(
                "Replacing {} PTR {} -> {} on {}",
                reverse.family,
                reverse.fqdn(),
                fqdn,
                server
            );

            let ptr = ResourceRecord::new(&reverse.owner, RecordType::PTR, ttl, &fqdn);
            let response = self.apply(
                &endpoint,
                &reverse.zone,
                &ptr,
                &credential,
                UpdateAction::Replace,
            )?;
            report.push(ReportStep::succeeded(
                format!("Reverse Record Creation: {}", data.trim()),
                None,
                response,
            ));
        } else if create_reverse {
            debug!(
                "Skipping reverse record for {}: {} is not an address type",
                fqdn, record_type
            );
        }

        Ok(report)
    }

    /// Point `alias` at `target` with a CNAME, replacing whatever CNAME was there.
    ///
    /// `target` is taken as absolute; a trailing `.` is added if missing.
    ///
    /// # Errors
    ///
    /// Same fail-fast policy as [`Self::add_record`].
    pub fn add_cname_record(
        &self,
        server: &str,
        zone: &str,
        alias: &str,
        target: &str,
        ttl: u32,
        key_name: &str,
    ) -> Result<TransactionReport, UpdateError> {
        let endpoint = self.servers.lookup(server)?;
        let credential = self.keys.lookup(key_name)?;
        let target = target.trim();
        let absolute_target = if target.ends_with('.') {
            target.to_string()
        } else {
            format!("{target}.")
        };

        info!(
            "Replacing CNAME {} -> {} on {}",
            owner_fqdn(alias, zone),
            absolute_target,
            server
        );

        let record = ResourceRecord::new(alias, RecordType::CNAME, ttl, absolute_target);
        let response = self.apply(&endpoint, zone, &record, &credential, UpdateAction::Replace)?;

        let mut report = TransactionReport::new();
        report.push(ReportStep::succeeded(
            format!(
                "CNAME {}.{} points to {}",
                alias,
                zone.trim_end_matches('.'),
                target
            ),
            None,
            response,
        ));
        Ok(report)
    }

    /// Delete every RRset at each of the given names.
    ///
    /// Each entry has the form `<owner>.<zone>`: the first label is the owner
    /// and everything after the first `.` is the zone. Every entry is attempted
    /// and gets its own step in the report, whether it succeeded or not.
    ///
    /// # Errors
    ///
    /// Only an unknown server or key is returned as an error, and in that case
    /// nothing has been sent. Per-entry failures are captured in the report.
    pub fn delete_record<R: AsRef<str>>(
        &self,
        server: &str,
        rr_list: &[R],
        key_name: &str,
    ) -> Result<TransactionReport, UpdateError> {
        let endpoint = self.servers.lookup(server)?;
        let credential = self.keys.lookup(key_name)?;

        info!(
            "Deleting {} record name(s) on {} with key {}",
            rr_list.len(),
            server,
            key_name
        );

        let mut report = TransactionReport::new();
        for rr in rr_list {
            let rr = rr.as_ref().trim();
            match self.delete_one(&endpoint, rr, &credential) {
                Ok(response) => {
                    debug!("Deleted {} on {}", rr, server);
                    report.push(ReportStep::succeeded(
                        format!("Deleted {rr}"),
                        Some(rr.to_string()),
                        response,
                    ));
                }
                Err(e) => {
                    warn!("Failed to delete {} on {}: {}", rr, server, e);
                    report.push(ReportStep::failed(Some(rr.to_string()), &e));
                }
            }
        }

        if !report.all_succeeded() {
            warn!(
                "{} of {} deletes failed on {}",
                report.failure_count(),
                report.len(),
                server
            );
        }
        Ok(report)
    }

    fn delete_one(
        &self,
        endpoint: &ServerEndpoint,
        rr: &str,
        credential: &TsigCredential,
    ) -> Result<ServerResponse, UpdateError> {
        let (owner, zone) = match rr.split_once('.') {
            Some((owner, zone)) if !owner.is_empty() && !zone.trim_matches('.').is_empty() => {
                (owner, zone)
            }
            _ => {
                return Err(RecordError::InvalidRecordData {
                    name: rr.to_string(),
                    reason: "expected <owner>.<zone>".to_string(),
                }
                .into())
            }
        };

        self.apply(
            endpoint,
            zone,
            &ResourceRecord::any(owner),
            credential,
            UpdateAction::Delete,
        )
    }

    /// Build, send and classify one update.
    fn apply(
        &self,
        endpoint: &ServerEndpoint,
        zone: &str,
        record: &ResourceRecord,
        credential: &TsigCredential,
        action: UpdateAction,
    ) -> Result<ServerResponse, UpdateError> {
        let operation = build_update(zone, record, credential, action)?;
        let response = self.transport.send(&operation, endpoint)?;
        let result = classify(&endpoint.hostname, &response)?;

        debug!(
            "{} {} {} in {} accepted by {} (id {})",
            action,
            operation.owner(),
            record.record_type,
            zone_fqdn(zone),
            endpoint,
            result.id
        );
        Ok(result)
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod orchestrator_tests;
