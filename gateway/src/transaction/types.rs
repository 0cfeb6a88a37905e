//! Wire enums for the VELA direct protocol.
//!
//! These are the two closed vocabularies of the request: what to do with
//! the payment ([`Action`]) and which channel it arrived through
//! ([`TransactionType`]). Everything else on the wire is a string field.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// The operation requested of the gateway.
///
/// Transmitted by name in the `action` field. `Sale` both authorises and
/// captures; `Preauth` authorises only, to be completed later by `Capture`
/// against the returned xref.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Authorise without capturing funds.
    Preauth,
    /// Authorise and capture in one step.
    Sale,
    /// Return funds for a previously captured transaction.
    Refund,
    /// Refund an earlier sale by xref without the card details.
    RefundSale,
    /// Check the card without reserving funds.
    Verify,
    /// Capture a previously authorised transaction.
    Capture,
    /// Cancel a previous authorisation before capture.
    Cancel,
}

impl Action {
    /// The exact token sent in the `action` field.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::Preauth => "PREAUTH",
            Self::Sale => "SALE",
            Self::Refund => "REFUND",
            Self::RefundSale => "REFUND_SALE",
            Self::Verify => "VERIFY",
            Self::Capture => "CAPTURE",
            Self::Cancel => "CANCEL",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

// ---------------------------------------------------------------------------
// TransactionType
// ---------------------------------------------------------------------------

/// The channel the transaction was taken through.
///
/// Transmitted as a numeric code in the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    /// E-commerce: cardholder present online. Code 1.
    Ecom,
    /// Mail order / telephone order. Code 2.
    Moto,
    /// Continuous authority (recurring). Code 9.
    ContinuousAuthority,
}

impl TransactionType {
    /// The numeric wire code.
    pub fn code(&self) -> u8 {
        match self {
            Self::Ecom => 1,
            Self::Moto => 2,
            Self::ContinuousAuthority => 9,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_wire_names() {
        assert_eq!(Action::Preauth.to_string(), "PREAUTH");
        assert_eq!(Action::Sale.to_string(), "SALE");
        assert_eq!(Action::RefundSale.to_string(), "REFUND_SALE");
        assert_eq!(Action::Cancel.to_string(), "CANCEL");
    }

    #[test]
    fn transaction_type_codes() {
        assert_eq!(TransactionType::Ecom.code(), 1);
        assert_eq!(TransactionType::Moto.code(), 2);
        assert_eq!(TransactionType::ContinuousAuthority.code(), 9);
    }

    #[test]
    fn transaction_type_display_is_the_code() {
        assert_eq!(TransactionType::Ecom.to_string(), "1");
        assert_eq!(TransactionType::ContinuousAuthority.to_string(), "9");
    }

    #[test]
    fn action_serde_roundtrip() {
        for action in [
            Action::Preauth,
            Action::Sale,
            Action::Refund,
            Action::RefundSale,
            Action::Verify,
            Action::Capture,
            Action::Cancel,
        ] {
            let json = serde_json::to_string(&action).unwrap();
            let recovered: Action = serde_json::from_str(&json).unwrap();
            assert_eq!(action, recovered);
        }
    }

    #[test]
    fn transaction_type_serde_roundtrip() {
        for tx_type in [
            TransactionType::Ecom,
            TransactionType::Moto,
            TransactionType::ContinuousAuthority,
        ] {
            let json = serde_json::to_string(&tx_type).unwrap();
            let recovered: TransactionType = serde_json::from_str(&json).unwrap();
            assert_eq!(tx_type, recovered);
        }
    }
}
