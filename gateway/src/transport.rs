//! Blocking HTTP delivery of the signed form body.
//!
//! The transport does one thing: POST the signed body to the endpoint and
//! hand back the raw reply text. One request, one connection, closed after
//! the response. There are no retries and no internally imposed deadline;
//! callers that need a timeout must enforce it from outside.
//!
//! Failures are never swallowed. Every way the exchange can go wrong maps
//! to a [`TransportError`] variant that preserves the cause, and the
//! orchestrator carries that value to the caller instead of raising it.

use reqwest::blocking::Client;
use reqwest::header::{CONNECTION, CONTENT_LENGTH, CONTENT_TYPE};
use thiserror::Error;
use tracing::debug;

use crate::config::FORM_CONTENT_TYPE;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// A network or HTTP failure while delivering the request.
///
/// The request may or may not have reached the gateway; the caller only
/// knows delivery was not confirmed. None of these variants represent a
/// card decline, which arrives as a successful exchange with a non-zero
/// response code.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The exchange exceeded an externally imposed deadline.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The TCP/TLS connection could not be established.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The gateway answered with a non-success HTTP status.
    #[error("gateway returned HTTP status {status}")]
    HttpStatus { status: u16 },

    /// The connection was established but the response body could not be
    /// read in full.
    #[error("failed to read response body: {0}")]
    Read(String),

    /// The endpoint URL could not be used to build a request.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Any other I/O failure.
    #[error("transport failure: {0}")]
    Other(String),
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// Delivers a signed form body and captures the raw reply.
///
/// The production implementation is [`HttpTransport`]; tests substitute
/// their own to script failures without a network.
pub trait Transport: Send + Sync {
    /// POSTs `body` to `endpoint` and returns the full response text.
    fn post_form(&self, endpoint: &str, body: &str) -> Result<String, TransportError>;
}

/// The real HTTP transport, backed by a blocking `reqwest` client.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpTransport;

impl HttpTransport {
    pub fn new() -> Self {
        Self
    }
}

impl Transport for HttpTransport {
    fn post_form(&self, endpoint: &str, body: &str) -> Result<String, TransportError> {
        // One client per call. The protocol is strictly one-shot and the
        // connection closes after the reply. The client-level default
        // timeout is disabled; the caller owns the deadline.
        let client = Client::builder()
            .timeout(None)
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;

        debug!(endpoint, bytes = body.len(), "posting signed form");

        let response = client
            .post(endpoint)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .header(CONNECTION, "close")
            .header(CONTENT_LENGTH, body.len())
            .header("charset", "utf-8")
            .body(body.to_string())
            .send()
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let text = response
            .text()
            .map_err(|e| TransportError::Read(e.to_string()))?;
        debug!(bytes = text.len(), "response received");
        Ok(text)
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(err.to_string())
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else if err.is_builder() {
        TransportError::InvalidEndpoint(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
