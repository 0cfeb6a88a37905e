//! Test payment walkthrough against the VELA direct gateway.
//!
//! Builds a 100-pence ECOM sale with the documentation test card, submits
//! it, and prints the business outcome. The endpoint and credentials below
//! are the sandbox values; swap in your own account to run against a real
//! merchant.
//!
//! Run with:
//!   cargo run --example payment

use vela_gateway::{Action, Gateway, GatewayCredentials, TransactionRequest, TransactionType};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Initialise the gateway client.
    let credentials = GatewayCredentials::new("100001", "Circle4Take40Idea")?;
    let gateway = Gateway::new("https://gateway.example.com/direct/", credentials);

    let mut payment = TransactionRequest::new();

    // Order fields.
    payment.set_amount(100)?;
    payment.set_type(TransactionType::Ecom);
    payment.set_action(Action::Sale);
    payment.set_country_code("GB")?;
    payment.set_currency_code_numeric(826)?;
    payment.set_order_ref("Test Payment");

    // Card fields.
    payment.set_card_number("4929421234600821")?;
    payment.set_card_cvv("356")?;
    payment.set_card_expiry_month(12)?;
    payment.set_card_expiry_year(39)?;

    // Customer details.
    payment.set_customer_name("John Smith")?;
    payment.set_customer_address("Flat 6, Primrose Rise, 347 Lavender Road, Northampton");
    payment.set_customer_postcode("NN17 8YG");
    payment.set_customer_email("john.smith@example.com");
    payment.set_customer_phone("01234 567890");

    payment.set_discount_value(20);

    // Authorise the payment.
    let auth = gateway.authorise(&mut payment)?;

    // Make sure the request actually reached the gateway.
    if !auth.is_http_success() {
        match auth.transport_error() {
            Some(cause) => println!("Request failed: {cause}"),
            None => println!("Request failed"),
        }
        return Ok(());
    }

    // Branch on the authorisation response.
    let message = auth.response().response_message().unwrap_or("");
    match auth.response().response_code() {
        Some("0") => println!(
            "Card authorised successfully (xref {})",
            auth.response().xref().unwrap_or("?")
        ),
        Some("2") => println!("Card referred"),
        Some("4") => println!("Card declined - keep card"),
        Some("5") => println!("Card declined"),
        Some("30") => println!("Authorisation failed: {message}"),
        Some(code) => println!("Unknown gateway response {code}: {message}"),
        None => println!("Gateway reply carried no response code"),
    }

    Ok(())
}
