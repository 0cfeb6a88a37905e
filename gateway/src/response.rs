//! Decoding of the gateway's reply.
//!
//! The gateway answers in the same `&`-separated `key=value` text it
//! accepts. Parsing is deliberately strict about shape and silent about
//! garbage: a candidate pair is kept only if splitting on `=` yields
//! exactly two non-empty parts, and anything else is discarded without
//! error. A later duplicate key overwrites an earlier one.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config;

/// The parsed key/value reply to one authorisation request.
///
/// Business outcome lives in `responseCode`: `"0"` is approved, anything
/// else is a referral, decline, or processing failure. A populated
/// `TransactionResponse` says nothing about business success on its own;
/// callers must branch on the code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResponse {
    values: HashMap<String, String>,
}

impl TransactionResponse {
    /// An empty response, used when the request never reached the gateway.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses raw reply text.
    ///
    /// Splits on `&` into candidate pairs, then each candidate on `=`.
    /// Only candidates with exactly two non-empty parts are kept; malformed
    /// pairs are dropped silently. Empty input parses to an empty response.
    pub fn parse(raw: &str) -> Self {
        let mut values = HashMap::new();
        for candidate in raw.split('&') {
            let parts: Vec<&str> = candidate.split('=').collect();
            if let [key, value] = parts[..] {
                if !key.is_empty() && !value.is_empty() {
                    values.insert(key.to_string(), value.to_string());
                }
            }
        }
        Self { values }
    }

    /// The value of an arbitrary response key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// The gateway's numeric business outcome code.
    pub fn response_code(&self) -> Option<&str> {
        self.get("responseCode")
    }

    /// The gateway's human-readable outcome message.
    pub fn response_message(&self) -> Option<&str> {
        self.get("responseMessage")
    }

    /// The gateway-assigned cross reference for this transaction, usable
    /// for later capture, refund, or cancel operations.
    pub fn xref(&self) -> Option<&str> {
        self.get("xref")
    }

    /// The order description echoed back by the gateway.
    pub fn order_description(&self) -> Option<&str> {
        self.get("orderDesc")
    }

    /// The uniqueness token echoed back by the gateway.
    pub fn transaction_unique(&self) -> Option<&str> {
        self.get("transactionUnique")
    }

    /// Returns `true` if the response code signals approval.
    pub fn is_approved(&self) -> bool {
        self.response_code() == Some(config::RESPONSE_APPROVED)
    }

    /// Number of parsed pairs.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if nothing was parsed.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
