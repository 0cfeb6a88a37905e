//! # Transaction Module
//!
//! Construction and canonical encoding of authorisation requests for the
//! VELA direct gateway. Every payment submitted through this crate starts
//! life as a [`TransactionRequest`] built here.
//!
//! ## Architecture
//!
//! ```text
//! types.rs   - Wire enums (Action, TransactionType)
//! request.rs - TransactionRequest: ordered field map + validated setters
//! form.rs    - Canonical Latin-1 form encoding and the signed body
//! ```
//!
//! ## Request Lifecycle
//!
//! 1. **Build** - Populate a [`TransactionRequest`] through its setters;
//!    each setter validates before storing.
//! 2. **Sign** - [`form::build_signed_body`] fixes the uniqueness token,
//!    re-validates, and appends the SHA-512 signature.
//! 3. **Send** - The orchestrator posts the signed body and parses the
//!    reply; the request is then discarded, never reused.
//!
//! ## Design Decisions
//!
//! - The field map is a `BTreeMap`, so ascending key order (the signing
//!   order the gateway verifies against) is a structural property rather
//!   than a sort performed at encoding time.
//! - Amounts are integer minor units end to end. No floating point
//!   anywhere near monetary values.
//! - The current time is read through [`crate::clock::Clock`], so the
//!   uniqueness token and the expiry check are deterministic under test.

pub mod form;
pub mod request;
pub mod types;

pub use form::{build_signed_body, canonical_body, encode_form_component};
pub use request::{generate_uniqid, generate_uniqid_with_entropy, TransactionRequest};
pub use types::{Action, TransactionType};
