//! # Protocol Constants
//!
//! Every magic number of the VELA direct protocol lives here: field-format
//! limits, the signature field name, and the response codes the gateway is
//! documented to return. If you find one of these hardcoded anywhere else
//! in the crate, that is a bug.

// ---------------------------------------------------------------------------
// Signing
// ---------------------------------------------------------------------------

/// Name of the trailing signature field. Always the last field of the body
/// and never part of the signed content.
pub const SIGNATURE_FIELD: &str = "signature";

/// Digest algorithm used for the request signature.
pub const SIGNING_ALGORITHM: &str = "SHA-512";

/// Length of the hex-rendered signature. SHA-512 digests are 64 bytes,
/// two lowercase hex digits per byte.
pub const SIGNATURE_HEX_LENGTH: usize = 128;

// ---------------------------------------------------------------------------
// Field-format limits
// ---------------------------------------------------------------------------

/// Smallest amount the gateway accepts, in minor currency units.
pub const MIN_AMOUNT_MINOR: i64 = 10;

/// Card number length bounds, counted in digits (spaces excluded).
pub const CARD_NUMBER_MIN_DIGITS: usize = 15;
pub const CARD_NUMBER_MAX_DIGITS: usize = 19;

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// Content type of every request body.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

// ---------------------------------------------------------------------------
// Response codes
// ---------------------------------------------------------------------------

/// Authorisation approved.
pub const RESPONSE_APPROVED: &str = "0";

/// Card referred: the issuer wants a voice authorisation.
pub const RESPONSE_REFERRED: &str = "2";

/// Card declined, retain card.
pub const RESPONSE_DECLINED_KEEP_CARD: &str = "4";

/// Card declined.
pub const RESPONSE_DECLINED: &str = "5";

/// The gateway could not process the authorisation.
pub const RESPONSE_PROCESSING_ERROR: &str = "30";

/// Returns a short human-readable meaning for a documented response code,
/// mainly for logging. Unknown codes return `None`; we don't guess.
pub fn response_code_meaning(code: &str) -> Option<&'static str> {
    match code {
        RESPONSE_APPROVED => Some("approved"),
        RESPONSE_REFERRED => Some("referred"),
        RESPONSE_DECLINED_KEEP_CARD => Some("declined (retain card)"),
        RESPONSE_DECLINED => Some("declined"),
        RESPONSE_PROCESSING_ERROR => Some("processing error"),
        _ => None,
    }
}
