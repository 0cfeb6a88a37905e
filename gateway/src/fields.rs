//! # Field Validation
//!
//! Pure per-field validation and normalization, applied before a value is
//! allowed into the request's field map. The rules mirror the gateway's
//! documented field formats exactly; a value that passes here is a value
//! the gateway will accept syntactically.
//!
//! Checks are pure functions over their inputs. Nothing here reads the
//! clock or touches the network; the one time-dependent rule (card expiry
//! must be in the future) takes the current month/year pair as an argument
//! so callers decide where "now" comes from.

use thiserror::Error;

use crate::config::MIN_AMOUNT_MINOR;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// A field value that violates its format, range, or cross-field rule.
///
/// Each variant names the offending field and the rule that failed, so the
/// caller can correct the input and retry. Card numbers are never echoed
/// back in error messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field was given an empty value.
    #[error("{field} must not be blank")]
    Blank { field: &'static str },

    /// A required field was never set on the request.
    #[error("{field} is required but was never set")]
    Missing { field: &'static str },

    /// The amount is below the gateway's minimum.
    #[error("amount must be at least {min} minor units, got {got}")]
    AmountTooSmall { min: i64, got: i64 },

    /// The amount string is neither an integer nor a `digits.digits` decimal.
    #[error("amount must be an integer or a digits.digits decimal, got {value:?}")]
    AmountFormat { value: String },

    /// Not an ISO alpha-2, alpha-3, or 3-digit numeric country code.
    #[error("{field} must be an ISO alpha-2, alpha-3, or 3-digit numeric country code (e.g. GB/GBR/826), got {value:?}")]
    CountryCode {
        /// Either `countryCode` or `customerCountryCode`.
        field: &'static str,
        value: String,
    },

    /// Not an ISO 4217 alphabetic or 3-digit numeric currency code.
    #[error("currencyCode must be an ISO 4217 alphabetic or numeric code (e.g. GBP/826), got {value:?}")]
    CurrencyCode { value: String },

    /// The CVV is not 2 or 3 ASCII digits.
    #[error("cardCVV must be a 2 or 3 digit number")]
    CardCvv,

    /// The card number does not match the accepted grouping pattern.
    #[error("cardNumber must be 15-19 digits, optionally space-separated into 4-digit groups")]
    CardNumber,

    /// The expiry month is outside 1-12.
    #[error("cardExpiryMonth must be a month between 1 and 12, got {got}")]
    ExpiryMonth { got: u32 },

    /// The expiry year is outside 0-99.
    #[error("cardExpiryYear must be a 2-digit year between 0 and 99, got {got}")]
    ExpiryYear { got: u32 },

    /// The (month, year) pair is not strictly after the current month.
    #[error("card expiry cannot be a date in the past (expiry month {month}, expiry year {year})")]
    ExpiryInPast { month: u32, year: u32 },

    /// The combined expiry-date field does not match an accepted layout.
    #[error("cardExpiryDate must be in format MMYY, MM/YY, MM-YY, MMYYYY, or MM/YYYY")]
    ExpiryDate,
}

// ---------------------------------------------------------------------------
// Required fields
// ---------------------------------------------------------------------------

/// Rejects empty values for a required field.
pub fn validate_required(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Blank { field });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Amount
// ---------------------------------------------------------------------------

/// Checks an integer minor-unit amount against the gateway minimum.
pub fn amount_from_minor(minor: i64) -> Result<i64, ValidationError> {
    if minor < MIN_AMOUNT_MINOR {
        return Err(ValidationError::AmountTooSmall {
            min: MIN_AMOUNT_MINOR,
            got: minor,
        });
    }
    Ok(minor)
}

/// Parses an amount string into integer minor units.
///
/// Accepts a pure-integer string (already minor units) or a decimal of the
/// form `digits.digits`, which is converted by multiplying by 100 and
/// truncating toward zero. The conversion is done in integer arithmetic so
/// `"4.999"` is exactly 499 and `"0.29"` is exactly 29; no float ever
/// touches the value. Anything else is rejected.
pub fn parse_amount(value: &str) -> Result<i64, ValidationError> {
    let format_err = || ValidationError::AmountFormat {
        value: value.to_string(),
    };

    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        let minor = value.parse::<i64>().map_err(|_| format_err())?;
        return amount_from_minor(minor);
    }

    let (whole, frac) = value.split_once('.').ok_or_else(format_err)?;
    if whole.is_empty()
        || frac.is_empty()
        || !whole.bytes().all(|b| b.is_ascii_digit())
        || !frac.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(format_err());
    }

    let whole: i64 = whole.parse().map_err(|_| format_err())?;

    // First two fraction digits, right-padded: "9" is 90 cents, "999" is 99.
    let cents: i64 = match frac.len() {
        1 => frac.parse::<i64>().map_err(|_| format_err())? * 10,
        _ => frac[..2].parse().map_err(|_| format_err())?,
    };

    let minor = whole
        .checked_mul(100)
        .and_then(|m| m.checked_add(cents))
        .ok_or_else(format_err)?;
    amount_from_minor(minor)
}

// ---------------------------------------------------------------------------
// Country and currency codes
// ---------------------------------------------------------------------------

fn is_all_ascii_uppercase(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_uppercase())
}

fn is_all_ascii_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Validates a country code and normalizes it to uppercase.
///
/// Accepts ISO 3166-1 alpha-2 (`GB`), alpha-3 (`GBR`), or 3-digit numeric
/// (`826`) shapes. Only the shape is checked; the code is not looked up
/// against the ISO registry.
pub fn normalize_country_code(
    field: &'static str,
    value: &str,
) -> Result<String, ValidationError> {
    let upper = value.to_uppercase();
    let valid = matches!(upper.len(), 2 | 3) && is_all_ascii_uppercase(&upper)
        || upper.len() == 3 && is_all_ascii_digits(&upper);
    if !valid {
        return Err(ValidationError::CountryCode {
            field,
            value: value.to_string(),
        });
    }
    Ok(upper)
}

/// Validates a currency code and normalizes it to uppercase.
///
/// Accepts ISO 4217 alphabetic (`GBP`) or 3-digit numeric (`826`) shapes.
pub fn normalize_currency_code(value: &str) -> Result<String, ValidationError> {
    let upper = value.to_uppercase();
    let valid = upper.len() == 3 && (is_all_ascii_uppercase(&upper) || is_all_ascii_digits(&upper));
    if !valid {
        return Err(ValidationError::CurrencyCode {
            value: value.to_string(),
        });
    }
    Ok(upper)
}

// ---------------------------------------------------------------------------
// Card fields
// ---------------------------------------------------------------------------

/// Validates a CVV: exactly 2 or 3 ASCII digits.
pub fn validate_cvv(value: &str) -> Result<(), ValidationError> {
    if matches!(value.len(), 2 | 3) && is_all_ascii_digits(value) {
        Ok(())
    } else {
        Err(ValidationError::CardCvv)
    }
}

/// Validates a card number against the gateway's grouping pattern.
///
/// The accepted shape is three groups of exactly 4 digits, each optionally
/// followed by a single space, then 3-7 trailing digits: 15-19 digits in
/// total. No other characters are allowed.
pub fn validate_card_number(value: &str) -> Result<(), ValidationError> {
    let bytes = value.as_bytes();
    let mut pos = 0;

    for _ in 0..3 {
        let group = bytes.get(pos..pos + 4).ok_or(ValidationError::CardNumber)?;
        if !group.iter().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::CardNumber);
        }
        pos += 4;
        if bytes.get(pos) == Some(&b' ') {
            pos += 1;
        }
    }

    let tail = &bytes[pos..];
    let tail_ok = (3..=7).contains(&tail.len()) && tail.iter().all(|b| b.is_ascii_digit());
    if !tail_ok {
        return Err(ValidationError::CardNumber);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Card expiry
// ---------------------------------------------------------------------------

/// Validates an expiry month: 1 through 12.
pub fn validate_expiry_month(month: u32) -> Result<(), ValidationError> {
    if !(1..=12).contains(&month) {
        return Err(ValidationError::ExpiryMonth { got: month });
    }
    Ok(())
}

/// Validates a two-digit expiry year: 0 through 99.
pub fn validate_expiry_year(year: u32) -> Result<(), ValidationError> {
    if year > 99 {
        return Err(ValidationError::ExpiryYear { got: year });
    }
    Ok(())
}

/// Checks that an expiry pair is strictly after the current month.
///
/// `current` is the (month, two-digit year) pair of the present instant; a
/// card expiring in the current month has already expired for authorisation
/// purposes. Century wrap-around is not considered: year 00 is before
/// year 99, same as the gateway.
pub fn check_expiry_not_past(
    month: u32,
    year: u32,
    current: (u32, u32),
) -> Result<(), ValidationError> {
    let (current_month, current_year) = current;
    let in_future = year > current_year || (year == current_year && month > current_month);
    if !in_future {
        return Err(ValidationError::ExpiryInPast { month, year });
    }
    Ok(())
}

/// Validates the combined expiry-date field.
///
/// Accepted layouts: `MMYY`, `MM/YY`, `MM-YY`, `MMYYYY`, `MM/YYYY`.
/// Only the layout is checked here; the split month/year setters carry the
/// future-date rule.
pub fn validate_expiry_date(value: &str) -> Result<(), ValidationError> {
    let b = value.as_bytes();
    let digits = |range: &[u8]| range.iter().all(|c| c.is_ascii_digit());

    let valid = match b.len() {
        4 | 6 => digits(b),
        5 => digits(&b[..2]) && (b[2] == b'/' || b[2] == b'-') && digits(&b[3..]),
        7 => digits(&b[..2]) && b[2] == b'/' && digits(&b[3..]),
        _ => false,
    };
    if !valid {
        return Err(ValidationError::ExpiryDate);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_rejects_empty() {
        assert!(validate_required("customerName", "John Smith").is_ok());
        match validate_required("customerName", "") {
            Err(ValidationError::Blank {
                field: "customerName",
            }) => {}
            other => panic!("expected Blank, got {:?}", other),
        }
    }

    #[test]
    fn minor_amounts_at_or_above_minimum_pass() {
        assert_eq!(amount_from_minor(10), Ok(10));
        assert_eq!(amount_from_minor(100), Ok(100));
        assert_eq!(amount_from_minor(999_999), Ok(999_999));
    }

    #[test]
    fn minor_amounts_below_minimum_fail() {
        for minor in [9, 1, 0, -5] {
            match amount_from_minor(minor) {
                Err(ValidationError::AmountTooSmall { min: 10, got }) => assert_eq!(got, minor),
                other => panic!("expected AmountTooSmall for {minor}, got {:?}", other),
            }
        }
    }

    #[test]
    fn integer_amount_strings_are_minor_units() {
        assert_eq!(parse_amount("100"), Ok(100));
        assert_eq!(parse_amount("10"), Ok(10));
        assert_eq!(parse_amount("1250"), Ok(1250));
    }

    #[test]
    fn decimal_amount_strings_convert_to_minor_units() {
        assert_eq!(parse_amount("1.00"), Ok(100));
        assert_eq!(parse_amount("12.50"), Ok(1250));
        assert_eq!(parse_amount("0.29"), Ok(29));
        // Single fraction digit is tenths.
        assert_eq!(parse_amount("4.9"), Ok(490));
        // Extra fraction digits truncate toward zero.
        assert_eq!(parse_amount("4.999"), Ok(499));
    }

    #[test]
    fn malformed_amount_strings_fail() {
        for value in ["", ".", "1.", ".50", "12.5.0", "12,50", "abc", "1a.00", "-5.00"] {
            match parse_amount(value) {
                Err(ValidationError::AmountFormat { .. }) => {}
                other => panic!("expected AmountFormat for {value:?}, got {:?}", other),
            }
        }
    }

    #[test]
    fn decimal_amounts_below_minimum_fail() {
        match parse_amount("0.09") {
            Err(ValidationError::AmountTooSmall { got: 9, .. }) => {}
            other => panic!("expected AmountTooSmall, got {:?}", other),
        }
    }

    #[test]
    fn country_codes_normalize_to_uppercase() {
        assert_eq!(normalize_country_code("countryCode", "gb").unwrap(), "GB");
        assert_eq!(normalize_country_code("countryCode", "GBR").unwrap(), "GBR");
        assert_eq!(normalize_country_code("countryCode", "826").unwrap(), "826");
    }

    #[test]
    fn bad_country_codes_fail() {
        for value in ["", "G", "GBRX", "82", "8261", "G1", "12a"] {
            match normalize_country_code("countryCode", value) {
                Err(ValidationError::CountryCode { .. }) => {}
                other => panic!("expected CountryCode for {value:?}, got {:?}", other),
            }
        }
    }

    #[test]
    fn currency_codes_normalize_to_uppercase() {
        assert_eq!(normalize_currency_code("gbp").unwrap(), "GBP");
        assert_eq!(normalize_currency_code("826").unwrap(), "826");
    }

    #[test]
    fn bad_currency_codes_fail() {
        // Unlike countries, two-letter currency codes do not exist.
        for value in ["", "GB", "GBPX", "82", "8#6"] {
            match normalize_currency_code(value) {
                Err(ValidationError::CurrencyCode { .. }) => {}
                other => panic!("expected CurrencyCode for {value:?}, got {:?}", other),
            }
        }
    }

    #[test]
    fn cvv_accepts_2_or_3_digits() {
        assert!(validate_cvv("35").is_ok());
        assert!(validate_cvv("356").is_ok());
    }

    #[test]
    fn cvv_rejects_everything_else() {
        for value in ["", "3", "3566", "35a", "3 6"] {
            assert_eq!(validate_cvv(value), Err(ValidationError::CardCvv), "{value:?}");
        }
    }

    #[test]
    fn card_numbers_accept_15_to_19_digits() {
        assert!(validate_card_number("492942123460082").is_ok()); // 15
        assert!(validate_card_number("4929421234600821").is_ok()); // 16
        assert!(validate_card_number("4929421234600821999").is_ok()); // 19
    }

    #[test]
    fn card_numbers_accept_space_grouping() {
        assert!(validate_card_number("4929 4212 3460 0821").is_ok());
        assert!(validate_card_number("4929 421234600821").is_ok());
        assert!(validate_card_number("4929 4212 34600821").is_ok());
    }

    #[test]
    fn card_numbers_reject_bad_lengths_and_characters() {
        for value in [
            "",
            "49294212346008",      // 14 digits
            "49294212346008219999", // 20 digits
            "4929-4212-3460-0821", // wrong separator
            "4929 4212 3460 08x1", // non-digit
            "4929  4212 3460 0821", // double space
            "4929 4212 3460 ",     // missing tail
        ] {
            assert_eq!(
                validate_card_number(value),
                Err(ValidationError::CardNumber),
                "{value:?}"
            );
        }
    }

    #[test]
    fn expiry_month_range() {
        assert!(validate_expiry_month(1).is_ok());
        assert!(validate_expiry_month(12).is_ok());
        assert_eq!(
            validate_expiry_month(0),
            Err(ValidationError::ExpiryMonth { got: 0 })
        );
        assert_eq!(
            validate_expiry_month(13),
            Err(ValidationError::ExpiryMonth { got: 13 })
        );
    }

    #[test]
    fn expiry_year_range() {
        assert!(validate_expiry_year(0).is_ok());
        assert!(validate_expiry_year(99).is_ok());
        assert_eq!(
            validate_expiry_year(100),
            Err(ValidationError::ExpiryYear { got: 100 })
        );
    }

    #[test]
    fn expiry_strictly_after_current_month_passes() {
        // Current instant: November 2023.
        let now = (11, 23);
        assert!(check_expiry_not_past(12, 23, now).is_ok());
        assert!(check_expiry_not_past(1, 24, now).is_ok());
        assert!(check_expiry_not_past(11, 24, now).is_ok());
        assert!(check_expiry_not_past(12, 99, now).is_ok());
    }

    #[test]
    fn expiry_on_or_before_current_month_fails() {
        let now = (11, 23);
        for (month, year) in [(11, 23), (10, 23), (12, 22), (1, 0)] {
            match check_expiry_not_past(month, year, now) {
                Err(ValidationError::ExpiryInPast { month: m, year: y }) => {
                    assert_eq!((m, y), (month, year));
                }
                other => panic!("expected ExpiryInPast for {month}/{year}, got {:?}", other),
            }
        }
    }

    #[test]
    fn combined_expiry_date_layouts() {
        for value in ["1225", "12/25", "12-25", "122025", "12/2025"] {
            assert!(validate_expiry_date(value).is_ok(), "{value:?}");
        }
    }

    #[test]
    fn combined_expiry_date_rejects_other_layouts() {
        // MM-YYYY is not in the accepted set.
        for value in ["", "12", "12-2025", "12.25", "1/25", "12/255", "ab/cd"] {
            assert_eq!(
                validate_expiry_date(value),
                Err(ValidationError::ExpiryDate),
                "{value:?}"
            );
        }
    }
}
