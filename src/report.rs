// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Per-step results of an update transaction.
//!
//! A [`TransactionReport`] is built by the orchestrator while it works through
//! an operation and is handed to the caller once the operation is finished.
//! Callers only read it; rendering (text, JSON, HTML) happens at their end.

use std::fmt;

use hickory_client::op::Message;
use serde::Serialize;

use crate::dns_errors::UpdateError;
use crate::update::classify::rcode_text;

/// A successful response from the nameserver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerResponse {
    /// Message id of the response
    pub id: u16,
    /// Response code mnemonic (always "NOERROR" once classified)
    pub rcode: String,
    /// Any records the server sent back, in presentation form
    pub records: Vec<String>,
}

impl ServerResponse {
    #[must_use]
    pub fn from_message(message: &Message) -> Self {
        let records = message
            .answers()
            .iter()
            .chain(message.name_servers())
            .chain(message.additionals())
            .map(ToString::to_string)
            .collect();

        Self {
            id: message.id(),
            rcode: rcode_text(message.response_code()),
            records,
        }
    }
}

impl fmt::Display for ServerResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (id {})", self.rcode, self.id)?;
        for record in &self.records {
            write!(f, "\n  {record}")?;
        }
        Ok(())
    }
}

/// A failure captured in a report instead of being returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDetail {
    /// Stable reason code (see [`UpdateError::reason`])
    pub reason: &'static str,
    /// Human-readable message
    pub message: String,
    /// Whether a later retry could succeed
    pub transient: bool,
}

impl From<&UpdateError> for ErrorDetail {
    fn from(error: &UpdateError) -> Self {
        Self {
            reason: error.reason(),
            message: error.to_string(),
            transient: error.is_transient(),
        }
    }
}

/// What a step produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepOutput {
    Response(ServerResponse),
    Error(ErrorDetail),
}

/// One step of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportStep {
    pub description: String,
    /// The record string the step concerned (batch deletes only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<String>,
    pub output: StepOutput,
    pub success: bool,
}

impl ReportStep {
    #[must_use]
    pub fn succeeded(
        description: impl Into<String>,
        record: Option<String>,
        response: ServerResponse,
    ) -> Self {
        Self {
            description: description.into(),
            record,
            output: StepOutput::Response(response),
            success: true,
        }
    }

    /// A failed step; the description is the error message.
    #[must_use]
    pub fn failed(record: Option<String>, error: &UpdateError) -> Self {
        Self {
            description: error.to_string(),
            record,
            output: StepOutput::Error(error.into()),
            success: false,
        }
    }

    /// The server response, if the step succeeded.
    #[must_use]
    pub fn response(&self) -> Option<&ServerResponse> {
        match &self.output {
            StepOutput::Response(response) => Some(response),
            StepOutput::Error(_) => None,
        }
    }

    /// The captured error, if the step failed.
    #[must_use]
    pub fn error(&self) -> Option<&ErrorDetail> {
        match &self.output {
            StepOutput::Response(_) => None,
            StepOutput::Error(detail) => Some(detail),
        }
    }
}

/// Ordered results of one orchestrator call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TransactionReport {
    steps: Vec<ReportStep>,
}

impl TransactionReport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, step: ReportStep) {
        self.steps.push(step);
    }

    #[must_use]
    pub fn steps(&self) -> &[ReportStep] {
        &self.steps
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// True when every step succeeded (vacuously true for an empty report).
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.steps.iter().all(|step| step.success)
    }

    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.steps.iter().filter(|step| !step.success).count()
    }

    #[must_use]
    pub fn into_steps(self) -> Vec<ReportStep> {
        self.steps
    }
}

impl<'a> IntoIterator for &'a TransactionReport {
    type Item = &'a ReportStep;
    type IntoIter = std::slice::Iter<'a, ReportStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod report_tests;
