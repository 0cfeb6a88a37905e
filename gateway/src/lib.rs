// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # VELA Gateway -- Client SDK
//!
//! A client library for submitting card-payment authorisations to the VELA
//! direct gateway over signed HTTP form POSTs. The gateway verifies every
//! request against a SHA-512 signature computed over a canonically ordered,
//! Latin-1 percent-encoded form body; one byte out of place and
//! authentication fails silently on the remote side. This crate exists to
//! get those bytes right, every time.
//!
//! ## Architecture
//!
//! The modules mirror the stations a request passes through:
//!
//! - **fields** -- Per-field validation and normalization. Nothing enters a
//!   request without passing its rule.
//! - **transaction** -- The ordered field map, the wire enums, and the
//!   canonical signed-body builder.
//! - **crypto** -- SHA-512 digest and form-body signing.
//! - **transport** -- One blocking HTTP POST, one captured reply.
//! - **response** -- The `key=value` reply parser and its typed accessors.
//! - **client** -- Credentials and the `authorise` orchestrator.
//! - **clock** -- Injectable time source for tokens and expiry checks.
//! - **config** -- Protocol constants and documented response codes.
//!
//! ## Usage
//!
//! ```no_run
//! use vela_gateway::{Action, Gateway, GatewayCredentials, TransactionRequest, TransactionType};
//!
//! # fn main() -> Result<(), vela_gateway::ValidationError> {
//! let credentials = GatewayCredentials::new("100001", "Circle4Take40Idea")?;
//! let gateway = Gateway::new("https://gateway.example.com/direct/", credentials);
//!
//! let mut payment = TransactionRequest::new();
//! payment.set_amount(100)?;
//! payment.set_type(TransactionType::Ecom);
//! payment.set_action(Action::Sale);
//! payment.set_country_code("GB")?;
//! payment.set_currency_code_numeric(826)?;
//! payment.set_card_number("4929421234600821")?;
//! payment.set_card_expiry_month(12)?;
//! payment.set_card_expiry_year(27)?;
//! payment.set_customer_name("John Smith")?;
//!
//! let auth = gateway.authorise(&mut payment)?;
//! if auth.is_http_success() && auth.response().is_approved() {
//!     println!("approved, xref {:?}", auth.response().xref());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Design Notes
//!
//! - One `TransactionRequest` models exactly one in-flight call. It is not
//!   reused and not shared across threads mid-flight.
//! - Execution is fully synchronous; the only suspension point is the
//!   blocking HTTP round trip, and no timeout is imposed internally.
//! - Validation failures abort before any network traffic. Delivery
//!   failures surface as a flag plus a structured cause, never an
//!   exception. Declines are data, not errors.

pub mod client;
pub mod clock;
pub mod config;
pub mod crypto;
pub mod fields;
pub mod response;
pub mod transaction;
pub mod transport;

pub use client::{Authorisation, Gateway, GatewayCredentials};
pub use fields::ValidationError;
pub use response::TransactionResponse;
pub use transaction::{Action, TransactionRequest, TransactionType};
pub use transport::{HttpTransport, Transport, TransportError};
