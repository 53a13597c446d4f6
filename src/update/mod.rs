// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! TSIG-signed RFC 2136 dynamic updates.
//!
//! This module holds the pieces the orchestrator is assembled from:
//!
//! - [`registry`] - Key and server lookup interfaces with in-memory implementations
//! - [`tsig`] - TSIG key generation, BIND key files and signer construction
//! - [`rdata`] - Presentation-format record data parsing
//! - [`builder`] - Construction of single-record update operations
//! - [`transport`] - Framing, signing and exchange over TCP
//! - [`classify`] - Response code classification
//!
//! # Example
//!
//! ```rust,no_run
//! use binder::update::{build_update, ResourceRecord, TcpTransport, TsigAlgorithm,
//!     TsigCredential, UpdateAction, UpdateTransport, ServerEndpoint};
//! use hickory_client::rr::RecordType;
//!
//! # fn example() -> Result<(), binder::dns_errors::UpdateError> {
//! let key = TsigCredential {
//!     name: "update-key".to_string(),
//!     algorithm: TsigAlgorithm::HmacSha256,
//!     secret: "c2VjcmV0LWtleS1mb3ItdGVzdHM=".to_string(),
//! };
//! let record = ResourceRecord::new("www", RecordType::A, 300, "192.0.2.10");
//! let operation = build_update("example.com", &record, &key, UpdateAction::Replace)?;
//!
//! let response = TcpTransport::default()
//!     .send(&operation, &ServerEndpoint::new("ns1.example.com", 53))?;
//! let result = binder::update::classify("ns1.example.com", &response)?;
//! println!("{result}");
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod classify;
pub mod rdata;
pub mod registry;
pub mod transport;
pub mod tsig;
pub mod types;

pub use builder::{build_update, UpdateOperation};
pub use classify::{classify, rcode_text};
pub use registry::{CredentialProvider, FixedPort, Keyring, ServerRegistry, ServerTable};
pub use transport::{TcpTransport, UpdateTransport};
pub use tsig::{create_tsig_signer, generate_tsig_key, key_file_contents, parse_key_file};
pub use types::{
    is_address_type, owner_fqdn, zone_fqdn, ResourceRecord, ServerEndpoint, TsigAlgorithm,
    TsigCredential, UpdateAction,
};
