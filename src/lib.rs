// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # Binder - TSIG-signed DNS dynamic updates
//!
//! Binder manages records in BIND zones by sending authenticated Dynamic
//! Update (RFC 2136) messages to a nameserver over TCP.
//!
//! ## Overview
//!
//! This library provides:
//!
//! - Construction of signed add, replace and delete updates for single records
//! - Reverse (PTR) names derived from forward address data
//! - A blocking TCP transport that verifies response signatures
//! - Classification of response codes and TSIG rejections into typed errors
//! - An orchestrator for add-with-reverse, CNAME and batch-delete operations
//!
//! ## Modules
//!
//! - [`orchestrator`] - End-to-end record operations
//! - [`update`] - Update construction, transport and classification
//! - [`reverse`] - Reverse-lookup names from address literals
//! - [`report`] - Per-step results of an operation
//! - [`dns_errors`] - Error taxonomy
//! - [`config`] - YAML configuration for servers and keys
//!
//! ## Example
//!
//! ```rust,no_run
//! use binder::config::Config;
//! use binder::orchestrator::UpdateOrchestrator;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = Config::load("binder.yaml")?;
//! let orchestrator = UpdateOrchestrator::new(
//!     config.keyring()?,
//!     config.server_table(),
//!     config.transport(),
//! );
//!
//! let report = orchestrator.delete_record(
//!     "ns1.example.com",
//!     &["old-host.example.com", "stale.example.com"],
//!     "update-key",
//! )?;
//! for step in &report {
//!     println!("{} {}", if step.success { "ok" } else { "failed" }, step.description);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod dns_errors;
pub mod orchestrator;
pub mod report;
pub mod reverse;
pub mod update;
