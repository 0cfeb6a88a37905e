//! The gateway client: credentials, orchestration, and the call outcome.
//!
//! [`Gateway::authorise`] runs the full cycle for one request: build and
//! sign the canonical body, POST it, parse the reply. The outcome is split
//! exactly the way callers need to branch:
//!
//! - a [`ValidationError`] is returned as `Err` before anything touches
//!   the network;
//! - a transport failure yields `Ok` with `http_success() == false` and
//!   the structured cause attached;
//! - a delivered exchange yields `Ok` with `http_success() == true`, and
//!   the business outcome (approved, referred, declined) is read from the
//!   parsed response. A decline is not an error at this layer.

use std::fmt;

use tracing::{debug, warn};

use crate::config;
use crate::fields::{self, ValidationError};
use crate::response::TransactionResponse;
use crate::transaction::{form, TransactionRequest};
use crate::transport::{HttpTransport, Transport, TransportError};

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// The merchant account identity, immutable once constructed.
///
/// The pre-shared key is the signing secret agreed with the gateway. The
/// optional merchant password is held for completeness but never placed in
/// the request body.
#[derive(Clone)]
pub struct GatewayCredentials {
    merchant_id: String,
    pre_shared_key: String,
    merchant_password: Option<String>,
}

impl GatewayCredentials {
    /// Creates credentials. The merchant ID must be non-empty.
    pub fn new(
        merchant_id: impl Into<String>,
        pre_shared_key: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let merchant_id = merchant_id.into();
        fields::validate_required("merchantID", &merchant_id)?;
        Ok(Self {
            merchant_id,
            pre_shared_key: pre_shared_key.into(),
            merchant_password: None,
        })
    }

    /// Attaches the optional merchant password.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.merchant_password = Some(password.into());
        self
    }

    /// The merchant account identifier.
    pub fn merchant_id(&self) -> &str {
        &self.merchant_id
    }

    pub(crate) fn pre_shared_key(&self) -> &str {
        &self.pre_shared_key
    }

    /// The merchant password, if one was supplied.
    pub fn merchant_password(&self) -> Option<&str> {
        self.merchant_password.as_deref()
    }
}

impl fmt::Debug for GatewayCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The signing secret stays out of logs.
        f.debug_struct("GatewayCredentials")
            .field("merchant_id", &self.merchant_id)
            .field("pre_shared_key", &"<redacted>")
            .field("merchant_password", &self.merchant_password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Authorisation outcome
// ---------------------------------------------------------------------------

/// The result of one authorise cycle.
///
/// `http_success()` answers "did the request reach the gateway and come
/// back". Business success is a separate question answered by the parsed
/// [`response`](Authorisation::response).
#[derive(Debug)]
pub struct Authorisation {
    request_body: String,
    http_success: bool,
    transport_error: Option<TransportError>,
    raw_response: String,
    response: TransactionResponse,
}

impl Authorisation {
    /// `true` if the exchange completed and a reply was captured.
    pub fn is_http_success(&self) -> bool {
        self.http_success
    }

    /// The structured delivery failure, when `is_http_success()` is false.
    pub fn transport_error(&self) -> Option<&TransportError> {
        self.transport_error.as_ref()
    }

    /// The parsed reply. Empty when the request was never delivered.
    pub fn response(&self) -> &TransactionResponse {
        &self.response
    }

    /// The reply text exactly as received.
    pub fn raw_response(&self) -> &str {
        &self.raw_response
    }

    /// The signed body that was (or would have been) posted.
    pub fn request_body(&self) -> &str {
        &self.request_body
    }
}

// ---------------------------------------------------------------------------
// Gateway
// ---------------------------------------------------------------------------

/// A client bound to one gateway endpoint and one merchant account.
pub struct Gateway {
    endpoint: String,
    credentials: GatewayCredentials,
    transport: Box<dyn Transport>,
}

impl Gateway {
    /// Creates a client that talks real HTTP to `endpoint`.
    pub fn new(endpoint: impl Into<String>, credentials: GatewayCredentials) -> Self {
        Self::with_transport(endpoint, credentials, Box::new(HttpTransport::new()))
    }

    /// Creates a client with a custom transport. The seam tests use to
    /// script delivery failures.
    pub fn with_transport(
        endpoint: impl Into<String>,
        credentials: GatewayCredentials,
        transport: Box<dyn Transport>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            credentials,
            transport,
        }
    }

    /// The configured endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The configured credentials.
    pub fn credentials(&self) -> &GatewayCredentials {
        &self.credentials
    }

    /// Runs one full request/response cycle.
    ///
    /// Builds and signs the canonical body (mutating `request` to fix the
    /// merchant ID and uniqueness token), posts it, and parses the reply.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if any stored field fails the
    /// pre-signing re-validation; nothing is sent in that case. Delivery
    /// failures are not errors here: they come back as an [`Authorisation`]
    /// with `is_http_success() == false` and the cause attached.
    pub fn authorise(
        &self,
        request: &mut TransactionRequest,
    ) -> Result<Authorisation, ValidationError> {
        let body = form::build_signed_body(request, &self.credentials)?;

        match self.transport.post_form(&self.endpoint, &body) {
            Ok(raw) => {
                let response = TransactionResponse::parse(&raw);
                if let Some(code) = response.response_code() {
                    debug!(
                        code,
                        meaning = config::response_code_meaning(code).unwrap_or("unknown"),
                        "gateway replied"
                    );
                }
                Ok(Authorisation {
                    request_body: body,
                    http_success: true,
                    transport_error: None,
                    raw_response: raw,
                    response,
                })
            }
            Err(err) => {
                warn!(error = %err, "request not delivered");
                Ok(Authorisation {
                    request_body: body,
                    http_success: false,
                    transport_error: Some(err),
                    raw_response: String::new(),
                    response: TransactionResponse::empty(),
                })
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
