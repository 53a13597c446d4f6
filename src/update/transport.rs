// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Transmission of update operations to a nameserver over TCP.
//!
//! Every exchange goes through a fresh [`SyncClient`] over a
//! [`TcpClientConnection`], so each update opens its own connection and drops
//! it once the response arrives. The message is signed here rather than by
//! the client so that TSIG rejections surface as [`TsigError::Rejected`]
//! instead of an opaque verification failure.

use std::io::ErrorKind;
use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;

use chrono::Utc;
use hickory_client::client::{Client, SyncClient};
use hickory_client::error::{ClientError, ClientErrorKind};
use hickory_client::op::{Message, ResponseCode};
use hickory_client::rr::{Name, RData};
use hickory_client::tcp::TcpClientConnection;
use hickory_proto::error::ProtoErrorKind;
use hickory_proto::rr::dnssec::rdata::DNSSECRData;
use hickory_proto::serialize::binary::{BinDecodable, BinDecoder, BinEncodable};
use tracing::{debug, warn};

use super::builder::UpdateOperation;
use super::types::ServerEndpoint;
use crate::constants::{DEFAULT_TRANSPORT_TIMEOUT_SECS, MAX_TCP_MESSAGE_LEN};
use crate::dns_errors::{TransportError, TsigError, TsigRejection, UpdateError};

/// Sends an update operation to a nameserver and returns its response.
pub trait UpdateTransport {
    /// Transmit `operation` to `endpoint`.
    ///
    /// Returns the response message once its signature has been checked. The
    /// response code is not interpreted.
    ///
    /// # Errors
    ///
    /// Returns [`TsigError::Rejected`] if the server rejected the key or the
    /// response is not correctly signed, and a [`TransportError`] for
    /// connection-level failures.
    fn send(&self, operation: &UpdateOperation, endpoint: &ServerEndpoint)
        -> Result<Message, UpdateError>;
}

impl<T: UpdateTransport + ?Sized> UpdateTransport for &T {
    fn send(
        &self,
        operation: &UpdateOperation,
        endpoint: &ServerEndpoint,
    ) -> Result<Message, UpdateError> {
        (**self).send(operation, endpoint)
    }
}

/// Blocking TCP transport with a per-exchange I/O timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TcpTransport {
    timeout: Duration,
}

impl TcpTransport {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn resolve(&self, endpoint: &ServerEndpoint) -> Result<SocketAddr, TransportError> {
        let connection_failed = |reason: String| TransportError::ConnectionFailed {
            server: endpoint.hostname.clone(),
            port: endpoint.port,
            reason,
        };

        (endpoint.hostname.as_str(), endpoint.port)
            .to_socket_addrs()
            .map_err(|e| connection_failed(format!("cannot resolve address: {e}")))?
            .next()
            .ok_or_else(|| connection_failed("name resolved to no addresses".to_string()))
    }

    /// Map a client failure onto the transport taxonomy.
    fn transport_error(&self, endpoint: &ServerEndpoint, error: &ClientError) -> TransportError {
        let io_kind = match error.kind() {
            ClientErrorKind::Timeout => return self.timed_out(endpoint),
            ClientErrorKind::Io(e) => Some(e.kind()),
            ClientErrorKind::Proto(e) => match e.kind() {
                ProtoErrorKind::Timeout => return self.timed_out(endpoint),
                ProtoErrorKind::Io(e) => Some(e.kind()),
                _ => None,
            },
            _ => None,
        };

        match io_kind {
            Some(ErrorKind::TimedOut | ErrorKind::WouldBlock) => self.timed_out(endpoint),
            Some(
                ErrorKind::ConnectionRefused
                | ErrorKind::HostUnreachable
                | ErrorKind::NetworkUnreachable
                | ErrorKind::AddrNotAvailable,
            ) => TransportError::ConnectionFailed {
                server: endpoint.hostname.clone(),
                port: endpoint.port,
                reason: error.to_string(),
            },
            _ => TransportError::Exchange {
                server: endpoint.hostname.clone(),
                port: endpoint.port,
                reason: error.to_string(),
            },
        }
    }

    fn timed_out(&self, endpoint: &ServerEndpoint) -> TransportError {
        TransportError::Timeout {
            server: endpoint.hostname.clone(),
            port: endpoint.port,
            timeout_secs: self.timeout.as_secs(),
        }
    }
}

impl Default for TcpTransport {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_TRANSPORT_TIMEOUT_SECS))
    }
}

impl UpdateTransport for TcpTransport {
    fn send(
        &self,
        operation: &UpdateOperation,
        endpoint: &ServerEndpoint,
    ) -> Result<Message, UpdateError> {
        let mut request = operation.message().clone();
        request.set_id(rand::random::<u16>());
        let request_id = request.id();

        let signed_at = u32::try_from(Utc::now().timestamp()).unwrap_or(u32::MAX);
        let verifier = request
            .finalize(operation.signer(), signed_at)
            .map_err(|e| TsigError::InvalidKeyData {
                key_name: operation.key_name().to_string(),
                reason: format!("failed to sign update: {e}"),
            })?;

        let bytes = request.to_vec().map_err(|e| TransportError::Exchange {
            server: endpoint.hostname.clone(),
            port: endpoint.port,
            reason: format!("failed to encode update: {e}"),
        })?;
        if bytes.len() > MAX_TCP_MESSAGE_LEN {
            return Err(TransportError::Exchange {
                server: endpoint.hostname.clone(),
                port: endpoint.port,
                reason: format!("update message is {} bytes", bytes.len()),
            }
            .into());
        }

        debug!(
            "Sending {} update for {} to {} (id {}, {} bytes)",
            operation.action(),
            operation.owner(),
            endpoint,
            request_id,
            bytes.len()
        );

        let addr = self.resolve(endpoint)?;
        let conn = TcpClientConnection::with_timeout(addr, self.timeout)
            .map_err(|e| self.transport_error(endpoint, &e))?;
        let client = SyncClient::new(conn);

        let response = client
            .send(request)
            .into_iter()
            .next()
            .ok_or_else(|| TransportError::Exchange {
                server: endpoint.hostname.clone(),
                port: endpoint.port,
                reason: "connection closed without a response".to_string(),
            })?
            .map_err(|e| {
                debug!("Update exchange with {} ({}) failed: {}", endpoint, addr, e);
                self.transport_error(endpoint, &e)
            })?;

        let rejected = |reason: TsigRejection| {
            warn!(
                "DNS server {} rejected TSIG key '{}': {}",
                endpoint.hostname,
                operation.key_name(),
                reason
            );
            UpdateError::from(TsigError::Rejected {
                server: endpoint.hostname.clone(),
                key_name: operation.key_name().to_string(),
                reason,
            })
        };

        let tsig_error = response_tsig_error(&response).map_err(|reason| {
            TransportError::MalformedResponse {
                server: endpoint.hostname.clone(),
                reason,
            }
        })?;
        if let Some(reason) = tsig_error {
            return Err(rejected(reason));
        }

        if response.signature().is_empty() {
            // Unsigned error responses are legal (e.g. FORMERR before the TSIG
            // was parsed); an unsigned success is not.
            if response.response_code() == ResponseCode::NoError {
                return Err(rejected(TsigRejection::Unsigned));
            }
            return Ok(response.into_message());
        }

        if let Some(mut verify) = verifier {
            if let Err(e) = verify(response.as_buffer()) {
                debug!("Response signature from {} did not verify: {}", endpoint, e);
                return Err(rejected(TsigRejection::BadSignature));
            }
        }

        Ok(response.into_message())
    }
}

/// TSIG error carried by the response's TSIG record, if it is a rejection.
fn response_tsig_error(response: &Message) -> Result<Option<TsigRejection>, String> {
    for record in response.signature() {
        if let Some(rdata @ RData::DNSSEC(DNSSECRData::TSIG(_))) = record.data() {
            let code = tsig_error_code(rdata)
                .map_err(|e| format!("unreadable TSIG record: {e}"))?;
            return Ok(TsigRejection::from_tsig_error(code));
        }
    }
    Ok(None)
}

/// Read the error field of TSIG rdata (RFC 8945 §4.2).
///
/// The field sits after the algorithm name, time signed (6), fudge (2), the
/// length-prefixed MAC and the original id (2).
fn tsig_error_code(rdata: &RData) -> Result<u16, String> {
    let bytes = rdata.to_bytes().map_err(|e| e.to_string())?;
    let mut decoder = BinDecoder::new(&bytes);

    Name::read(&mut decoder).map_err(|e| e.to_string())?;
    decoder.read_slice(8).map_err(|e| e.to_string())?;
    let mac_len = decoder.read_u16().map_err(|e| e.to_string())?.unverified();
    decoder
        .read_slice(usize::from(mac_len))
        .map_err(|e| e.to_string())?;
    decoder.read_u16().map_err(|e| e.to_string())?;
    Ok(decoder.read_u16().map_err(|e| e.to_string())?.unverified())
}

#[cfg(test)]
#[path = "transport_tests.rs"]
mod transport_tests;
