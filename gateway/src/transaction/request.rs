//! The transaction request: one ordered field map, validated on the way in.
//!
//! [`TransactionRequest`] is the mutable object a caller fills in before
//! handing it to [`Gateway::authorise`](crate::client::Gateway::authorise).
//! Every setter validates before storing, so the map never holds a value
//! the gateway would reject syntactically.
//!
//! The map is the single source of truth. Typed reads such as
//! [`amount_minor`](TransactionRequest::amount_minor) parse out of the map
//! on demand; there is no parallel set of typed fields that could drift out
//! of sync with what actually goes on the wire.
//!
//! Iteration order is ascending lexicographic key order. That ordering is
//! load-bearing: it is the canonical order the signature is computed over,
//! and reordering breaks signature verification at the gateway.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use rand::RngCore;

use crate::clock::{self, Clock, SystemClock};
use crate::fields::{self, ValidationError};

use super::types::{Action, TransactionType};

// ---------------------------------------------------------------------------
// Uniqueness token
// ---------------------------------------------------------------------------

/// Generates a transaction-uniqueness token from the clock.
///
/// The token is the epoch-seconds value as 8 hex digits followed by a
/// 5-hex-digit value taken from the low 20 bits of the epoch-milliseconds
/// value. Two calls in the same millisecond produce the same token; callers
/// needing collision resistance beyond the clock should use
/// [`generate_uniqid_with_entropy`].
pub fn generate_uniqid(clock: &dyn Clock) -> String {
    let millis = clock.now_millis();
    format!("{:08x}{:05x}", millis / 1000, millis & 0xf_ffff)
}

/// Generates a uniqueness token with an extra random suffix.
///
/// Appends `.` and 8 decimal digits drawn from the supplied random source
/// to the clock-derived token. Use a seeded `StdRng` in tests and `OsRng`
/// in production.
pub fn generate_uniqid_with_entropy(clock: &dyn Clock, rng: &mut dyn RngCore) -> String {
    format!(
        "{}.{:08}",
        generate_uniqid(clock),
        rng.next_u64() % 100_000_000
    )
}

// ---------------------------------------------------------------------------
// TransactionRequest
// ---------------------------------------------------------------------------

/// A single card-payment authorisation request under construction.
///
/// Built across many setter calls, conceptually frozen at the moment of
/// signing, and discarded after one request/response cycle. Not for reuse
/// across calls and not for sharing across threads mid-flight.
pub struct TransactionRequest {
    fields: BTreeMap<String, String>,
    clock: Arc<dyn Clock>,
}

impl Default for TransactionRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TransactionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionRequest")
            .field("fields", &self.fields)
            .finish()
    }
}

impl TransactionRequest {
    /// Creates an empty request on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty request reading time from the given clock.
    ///
    /// Tests pin the clock to make token generation and expiry validation
    /// deterministic.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            fields: BTreeMap::new(),
            clock,
        }
    }

    // -- reads --------------------------------------------------------------

    /// The stored value of a field, if set.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// All stored fields in ascending lexicographic key order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of stored fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no field has been set.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The amount in minor currency units, parsed out of the map.
    pub fn amount_minor(&self) -> Option<i64> {
        self.field("amount").and_then(|v| v.parse().ok())
    }

    /// The expiry month, parsed out of the map.
    pub fn card_expiry_month(&self) -> Option<u32> {
        self.field("cardExpiryMonth").and_then(|v| v.parse().ok())
    }

    /// The two-digit expiry year, parsed out of the map.
    pub fn card_expiry_year(&self) -> Option<u32> {
        self.field("cardExpiryYear").and_then(|v| v.parse().ok())
    }

    /// The (month, year) expiry pair, if both halves are set.
    pub fn card_expiry(&self) -> Option<(u32, u32)> {
        Some((self.card_expiry_month()?, self.card_expiry_year()?))
    }

    /// The uniqueness token, if set.
    pub fn transaction_unique(&self) -> Option<&str> {
        self.field("transactionUnique")
    }

    pub(crate) fn current_month_year(&self) -> (u32, u32) {
        clock::month_and_two_digit_year(self.clock.now_millis())
    }

    pub(crate) fn insert_raw(&mut self, name: &str, value: String) {
        self.fields.insert(name.to_string(), value);
    }

    #[cfg(test)]
    pub(crate) fn remove_raw(&mut self, name: &str) {
        self.fields.remove(name);
    }

    /// Sets the uniqueness token from the clock if the caller never supplied
    /// one. Returns the token now guaranteed to be present.
    pub(crate) fn ensure_transaction_unique(&mut self) -> &str {
        let missing = self.transaction_unique().map_or(true, str::is_empty);
        if missing {
            let token = generate_uniqid(self.clock.as_ref());
            self.insert_raw("transactionUnique", token);
        }
        self.transaction_unique().unwrap_or_default()
    }

    // -- order fields -------------------------------------------------------

    /// Sets the amount in minor currency units. Must be at least 10.
    pub fn set_amount(&mut self, minor: i64) -> Result<(), ValidationError> {
        let minor = fields::amount_from_minor(minor)?;
        self.insert_raw("amount", minor.to_string());
        Ok(())
    }

    /// Sets the amount from a string: either minor units (`"100"`) or a
    /// major-unit decimal (`"1.00"`), converted by truncation toward zero.
    pub fn set_amount_str(&mut self, value: &str) -> Result<(), ValidationError> {
        let minor = fields::parse_amount(value)?;
        self.insert_raw("amount", minor.to_string());
        Ok(())
    }

    /// Sets the requested gateway operation.
    pub fn set_action(&mut self, action: Action) {
        self.insert_raw("action", action.wire_name().to_string());
    }

    /// Sets the transaction channel, transmitted as its numeric code.
    pub fn set_type(&mut self, tx_type: TransactionType) {
        self.insert_raw("type", tx_type.code().to_string());
    }

    /// Sets the merchant's own country code. Normalized to uppercase.
    pub fn set_country_code(&mut self, code: &str) -> Result<(), ValidationError> {
        let normalized = fields::normalize_country_code("countryCode", code)?;
        self.insert_raw("countryCode", normalized);
        Ok(())
    }

    /// Numeric convenience for [`set_country_code`](Self::set_country_code).
    pub fn set_country_code_numeric(&mut self, code: u16) -> Result<(), ValidationError> {
        self.set_country_code(&code.to_string())
    }

    /// Sets the transaction currency. Normalized to uppercase.
    pub fn set_currency_code(&mut self, code: &str) -> Result<(), ValidationError> {
        let normalized = fields::normalize_currency_code(code)?;
        self.insert_raw("currencyCode", normalized);
        Ok(())
    }

    /// Numeric convenience for [`set_currency_code`](Self::set_currency_code).
    pub fn set_currency_code_numeric(&mut self, code: u16) -> Result<(), ValidationError> {
        self.set_currency_code(&code.to_string())
    }

    /// Sets the caller's uniqueness token, replacing any generated one.
    pub fn set_transaction_unique(&mut self, token: impl Into<String>) {
        self.insert_raw("transactionUnique", token.into());
    }

    /// Sets the gateway reference of an earlier transaction to act on.
    pub fn set_xref(&mut self, xref: &str) {
        self.insert_raw("xref", xref.to_string());
    }

    /// Sets the merchant's free-text order reference.
    pub fn set_order_ref(&mut self, order_ref: &str) {
        self.insert_raw("orderRef", order_ref.to_string());
    }

    /// Sets the URL the gateway notifies asynchronously.
    pub fn set_callback_url(&mut self, url: &str) {
        self.insert_raw("callbackURL", url.to_string());
    }

    // -- card fields --------------------------------------------------------

    /// Sets the card number: 15-19 digits, optionally space-grouped.
    pub fn set_card_number(&mut self, number: &str) -> Result<(), ValidationError> {
        fields::validate_card_number(number)?;
        self.insert_raw("cardNumber", number.to_string());
        Ok(())
    }

    /// Sets the card security code: 2 or 3 digits.
    pub fn set_card_cvv(&mut self, cvv: &str) -> Result<(), ValidationError> {
        fields::validate_cvv(cvv)?;
        self.insert_raw("cardCVV", cvv.to_string());
        Ok(())
    }

    /// Sets the expiry month (1-12), stored zero-padded to two digits.
    ///
    /// If the expiry year is already set, the pair must be a month strictly
    /// after the current month.
    pub fn set_card_expiry_month(&mut self, month: u32) -> Result<(), ValidationError> {
        fields::validate_expiry_month(month)?;
        if let Some(year) = self.card_expiry_year() {
            fields::check_expiry_not_past(month, year, self.current_month_year())?;
        }
        self.insert_raw("cardExpiryMonth", format!("{month:02}"));
        Ok(())
    }

    /// Sets the two-digit expiry year (0-99), stored zero-padded.
    ///
    /// If the expiry month is already set, the pair must be a month strictly
    /// after the current month.
    pub fn set_card_expiry_year(&mut self, year: u32) -> Result<(), ValidationError> {
        fields::validate_expiry_year(year)?;
        if let Some(month) = self.card_expiry_month() {
            fields::check_expiry_not_past(month, year, self.current_month_year())?;
        }
        self.insert_raw("cardExpiryYear", format!("{year:02}"));
        Ok(())
    }

    /// Sets the combined expiry-date field (`MMYY`, `MM/YY`, `MM-YY`,
    /// `MMYYYY`, or `MM/YYYY`), stored verbatim.
    pub fn set_card_expiry_date(&mut self, date: &str) -> Result<(), ValidationError> {
        fields::validate_expiry_date(date)?;
        self.insert_raw("cardExpiryDate", date.to_string());
        Ok(())
    }

    /// Sets the card start month, for cards that carry one.
    pub fn set_card_start_month(&mut self, month: &str) {
        self.insert_raw("cardStartMonth", month.to_string());
    }

    /// Sets the card start year.
    pub fn set_card_start_year(&mut self, year: &str) {
        self.insert_raw("cardStartYear", year.to_string());
    }

    /// Sets the card issue number.
    pub fn set_card_issue_number(&mut self, issue: &str) {
        self.insert_raw("cardIssueNumber", issue.to_string());
    }

    // -- customer fields ----------------------------------------------------

    /// Sets the cardholder name. Must not be blank.
    pub fn set_customer_name(&mut self, name: &str) -> Result<(), ValidationError> {
        fields::validate_required("customerName", name)?;
        self.insert_raw("customerName", name.to_string());
        Ok(())
    }

    /// Sets the customer's country code. Normalized to uppercase.
    pub fn set_customer_country_code(&mut self, code: &str) -> Result<(), ValidationError> {
        let normalized = fields::normalize_country_code("customerCountryCode", code)?;
        self.insert_raw("customerCountryCode", normalized);
        Ok(())
    }

    pub fn set_customer_company(&mut self, company: &str) {
        self.insert_raw("customerCompany", company.to_string());
    }

    pub fn set_customer_address(&mut self, address: &str) {
        self.insert_raw("customerAddress", address.to_string());
    }

    pub fn set_customer_town(&mut self, town: &str) {
        self.insert_raw("customerTown", town.to_string());
    }

    pub fn set_customer_county(&mut self, county: &str) {
        self.insert_raw("customerCounty", county.to_string());
    }

    pub fn set_customer_postcode(&mut self, postcode: &str) {
        self.insert_raw("customerPostcode", postcode.to_string());
    }

    pub fn set_customer_email(&mut self, email: &str) {
        self.insert_raw("customerEmail", email.to_string());
    }

    pub fn set_customer_phone(&mut self, phone: &str) {
        self.insert_raw("customerPhone", phone.to_string());
    }

    // -- tax, discount, merchant data ---------------------------------------

    /// Sets the tax amount in minor units. Clears any discount value; the
    /// gateway accepts one or the other, never both.
    pub fn set_tax_value(&mut self, value: i64) {
        self.fields.remove("discountValue");
        self.insert_raw("taxValue", value.to_string());
    }

    /// Sets the discount amount in minor units. Clears any tax value.
    pub fn set_discount_value(&mut self, value: i64) {
        self.fields.remove("taxValue");
        self.insert_raw("discountValue", value.to_string());
    }

    /// Describes the tax or discount applied.
    pub fn set_tax_discount_description(&mut self, description: &str) {
        self.insert_raw("taxDiscountDescription", description.to_string());
    }

    /// Attaches an arbitrary merchant data entry, stored under
    /// `merchantData[<key>]`.
    pub fn add_merchant_data(&mut self, key: &str, value: &str) {
        self.insert_raw(&format!("merchantData[{key}]"), value.to_string());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
