//! Canonical form encoding and the signed request body.
//!
//! This module produces the exact byte sequence submitted to the gateway.
//! Three invariants are protocol contracts, not implementation choices:
//!
//! 1. Fields are encoded in ascending lexicographic key order.
//! 2. The percent-encoding is over the Latin-1 (ISO-8859-1) byte of each
//!    character, with space encoded as `+`, matching classic form encoding.
//! 3. The `signature` field is always last and is excluded from the signed
//!    content: the signature covers everything before it.
//!
//! Any deviation changes the signing input and the gateway rejects the
//! request as tampered. Setters cannot place a `signature` key in the map,
//! so the canonical body never contains one before signing.

use crate::client::GatewayCredentials;
use crate::config::SIGNATURE_FIELD;
use crate::crypto;
use crate::fields::{self, ValidationError};

use super::request::TransactionRequest;

// ---------------------------------------------------------------------------
// Percent encoding
// ---------------------------------------------------------------------------

/// Percent-encodes a key or value for the canonical body.
///
/// Each character is reduced to its Latin-1 byte: ASCII alphanumerics and
/// `.` `-` `*` `_` pass through, space becomes `+`, and every other byte
/// becomes `%XX` with uppercase hex. Characters above U+00FF have no
/// Latin-1 byte and are transmitted as `%3F` (`?`), which is what the
/// gateway's reference form encoding does.
pub fn encode_form_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        let byte = if (ch as u32) <= 0xFF { ch as u32 as u8 } else { b'?' };
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'.' | b'-' | b'*' | b'_' => {
                out.push(byte as char)
            }
            b' ' => out.push('+'),
            _ => {
                out.push('%');
                out.push_str(&format!("{byte:02X}"));
            }
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Canonical body and signing
// ---------------------------------------------------------------------------

/// Encodes the request's fields as `key=value` pairs joined by `&`, in
/// ascending key order. This string, without the signature, is the signing
/// input.
pub fn canonical_body(request: &TransactionRequest) -> String {
    let mut body = String::new();
    for (key, value) in request.fields() {
        if !body.is_empty() {
            body.push('&');
        }
        body.push_str(&encode_form_component(key));
        body.push('=');
        body.push_str(&encode_form_component(value));
    }
    body
}

/// Builds the complete signed request body.
///
/// Steps, in order:
///
/// 1. Write the merchant ID from the credentials into the field map.
/// 2. Generate a uniqueness token if the caller never supplied one.
/// 3. Re-validate the stored required fields, so a request that was never
///    fully populated fails here instead of at the gateway.
/// 4. Encode the canonical body and append
///    `&signature=<sha512-hex(body || pre-shared key)>`.
///
/// The returned string is what goes on the wire, byte for byte.
pub fn build_signed_body(
    request: &mut TransactionRequest,
    credentials: &GatewayCredentials,
) -> Result<String, ValidationError> {
    request.insert_raw("merchantID", credentials.merchant_id().to_string());
    request.ensure_transaction_unique();
    revalidate(request)?;

    let body = canonical_body(request);
    let signature = crypto::sign_form_body(&body, credentials.pre_shared_key());
    Ok(format!("{body}&{SIGNATURE_FIELD}={signature}"))
}

/// Re-runs the field validators over the stored required fields.
///
/// Catches fields that were never set as well as any value that no longer
/// passes its rule (the expiry pair is re-checked against the clock, so a
/// request built long ago cannot be signed with a now-expired card).
fn revalidate(request: &TransactionRequest) -> Result<(), ValidationError> {
    fields::parse_amount(required(request, "amount")?)?;
    fields::validate_card_number(required(request, "cardNumber")?)?;
    fields::validate_required("customerName", required(request, "customerName")?)?;

    let year = parse_expiry(required(request, "cardExpiryYear")?, "cardExpiryYear")?;
    let month = parse_expiry(required(request, "cardExpiryMonth")?, "cardExpiryMonth")?;
    fields::validate_expiry_year(year)?;
    fields::validate_expiry_month(month)?;
    fields::check_expiry_not_past(month, year, request.current_month_year())?;

    fields::normalize_currency_code(required(request, "currencyCode")?)?;
    fields::normalize_country_code("countryCode", required(request, "countryCode")?)?;
    Ok(())
}

fn required<'a>(
    request: &'a TransactionRequest,
    field: &'static str,
) -> Result<&'a str, ValidationError> {
    request
        .field(field)
        .ok_or(ValidationError::Missing { field })
}

fn parse_expiry(value: &str, field: &'static str) -> Result<u32, ValidationError> {
    value
        .parse()
        .map_err(|_| ValidationError::Missing { field })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::transaction::types::{Action, TransactionType};
    use std::sync::Arc;

    /// 2023-11-14T22:13:20Z.
    const NOV_2023: u64 = 1_700_000_000_000;

    fn credentials() -> GatewayCredentials {
        GatewayCredentials::new("100001", "Circle4Take40Idea").unwrap()
    }

    /// A fully populated request on a pinned clock.
    fn complete_request() -> TransactionRequest {
        let mut tx = TransactionRequest::with_clock(Arc::new(FixedClock(NOV_2023)));
        tx.set_amount(100).unwrap();
        tx.set_type(TransactionType::Ecom);
        tx.set_action(Action::Sale);
        tx.set_country_code("GB").unwrap();
        tx.set_currency_code_numeric(826).unwrap();
        tx.set_card_number("4929421234600821").unwrap();
        tx.set_card_expiry_month(12).unwrap();
        tx.set_card_expiry_year(27).unwrap();
        tx.set_customer_name("John Smith").unwrap();
        tx
    }

    #[test]
    fn unreserved_characters_pass_through() {
        assert_eq!(encode_form_component("Test.Payment-1_*"), "Test.Payment-1_*");
    }

    #[test]
    fn space_becomes_plus() {
        assert_eq!(encode_form_component("John Smith"), "John+Smith");
    }

    #[test]
    fn reserved_ascii_is_percent_encoded_uppercase() {
        assert_eq!(encode_form_component("a&b=c"), "a%26b%3Dc");
        assert_eq!(encode_form_component("50%"), "50%25");
        assert_eq!(encode_form_component("a/b+c"), "a%2Fb%2Bc");
    }

    #[test]
    fn latin1_characters_encode_their_byte() {
        // U+00E9 is 0xE9 in Latin-1.
        assert_eq!(encode_form_component("Café"), "Caf%E9");
    }

    #[test]
    fn characters_outside_latin1_become_question_marks() {
        // Neither the euro sign nor CJK have Latin-1 bytes.
        assert_eq!(encode_form_component("€"), "%3F");
        assert_eq!(encode_form_component("永"), "%3F");
    }

    #[test]
    fn canonical_body_is_in_ascending_key_order() {
        let mut tx = complete_request();
        tx.set_order_ref("Test Payment");
        let body = canonical_body(&tx);

        let keys: Vec<&str> = body
            .split('&')
            .map(|pair| pair.split('=').next().unwrap())
            .collect();
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        assert_eq!(keys, sorted, "body must be key-sorted: {body}");
    }

    #[test]
    fn signed_body_is_deterministic() {
        let creds = credentials();
        let body_a = build_signed_body(&mut complete_request(), &creds).unwrap();
        let body_b = build_signed_body(&mut complete_request(), &creds).unwrap();
        assert_eq!(body_a, body_b);
    }

    #[test]
    fn signed_body_has_exact_canonical_form() {
        let body = build_signed_body(&mut complete_request(), &credentials()).unwrap();
        let expected_prefix = "action=SALE&amount=100&cardExpiryMonth=12&cardExpiryYear=27\
                               &cardNumber=4929421234600821&countryCode=GB&currencyCode=826\
                               &customerName=John+Smith&merchantID=100001\
                               &transactionUnique=6553f10056800&type=1&signature=";
        assert!(
            body.starts_with(expected_prefix),
            "unexpected body: {body}"
        );
    }

    #[test]
    fn signature_is_sha512_of_body_and_key() {
        let creds = credentials();
        let body = build_signed_body(&mut complete_request(), &creds).unwrap();

        let (content, signature) = body
            .rsplit_once("&signature=")
            .expect("signature must be the final field");
        assert_eq!(signature.len(), 128);
        assert_eq!(
            signature,
            crypto::sign_form_body(content, "Circle4Take40Idea")
        );
    }

    #[test]
    fn signature_field_is_excluded_from_signed_content() {
        let body = build_signed_body(&mut complete_request(), &credentials()).unwrap();
        let (content, _) = body.rsplit_once("&signature=").unwrap();
        assert!(!content.contains("signature="));
    }

    #[test]
    fn supplied_transaction_unique_is_preserved() {
        let mut tx = complete_request();
        tx.set_transaction_unique("my-token-1");
        let body = build_signed_body(&mut tx, &credentials()).unwrap();
        assert!(body.contains("transactionUnique=my-token-1"));
    }

    #[test]
    fn missing_required_fields_abort_the_build() {
        let creds = credentials();
        for field in [
            "amount",
            "cardNumber",
            "customerName",
            "cardExpiryYear",
            "cardExpiryMonth",
            "currencyCode",
            "countryCode",
        ] {
            let mut tx = complete_request();
            tx.remove_raw(field);
            match build_signed_body(&mut tx, &creds) {
                Err(ValidationError::Missing { field: missing }) => assert_eq!(missing, field),
                other => panic!("expected Missing for {field}, got {:?}", other),
            }
        }
    }

    #[test]
    fn expiry_is_rechecked_against_the_clock_at_build_time() {
        // Expiry 12/27 is valid when set (clock at Nov 2023) but has
        // passed by 2028-01-01T00:00:00Z.
        const JAN_2028: u64 = 1_830_297_600_000;

        let mut tx = complete_request();
        let mut aged = TransactionRequest::with_clock(Arc::new(FixedClock(JAN_2028)));
        for (key, value) in tx.fields() {
            aged.insert_raw(key, value.to_string());
        }

        match build_signed_body(&mut aged, &credentials()) {
            Err(ValidationError::ExpiryInPast { month: 12, year: 27 }) => {}
            other => panic!("expected ExpiryInPast, got {:?}", other),
        }
        // The original request still signs fine.
        assert!(build_signed_body(&mut tx, &credentials()).is_ok());
    }

    #[test]
    fn merchant_data_sorts_with_the_other_fields() {
        let mut tx = complete_request();
        tx.add_merchant_data("note", "gift wrap");
        let body = build_signed_body(&mut tx, &credentials()).unwrap();
        assert!(body.contains("merchantData%5Bnote%5D=gift+wrap"));
    }
}
