//! Example: create a checkout link and follow its payment
//!
//! Reads credentials from `INTASEND_PUBLISHABLE_KEY` and `INTASEND_TOKEN`;
//! set `INTASEND_TEST_MODE=1` to use the sandbox and `INTASEND_DEMO_INVOICE`
//! to look up an existing invoice.

use intasend::{
    CheckoutRequest, ClientConfig, Currency, Decimal, IntaSendClient, ListTransactionsParams,
    PaymentMethod, UpdatedAtFilter,
};

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let config = ClientConfig::from_env();
    println!("🌍 Using {}", config.base_url());
    let client = IntaSendClient::new(config)?;

    println!("\n🧾 Creating checkout link...");
    let checkout = CheckoutRequest::builder()
        .email("jane@example.com")
        .phone_number("254712345678")
        .amount(Decimal::new(100, 0))
        .currency(Currency::Kes)
        .method(PaymentMethod::MPesa)
        .api_ref("demo-order-1")
        .comment("Demo payment")
        .submit(&client)
        .await?;
    println!("🔗 Send the customer to: {}", checkout.url);

    if let Ok(invoice_id) = std::env::var("INTASEND_DEMO_INVOICE") {
        println!("\n📡 Checking payment status of {}...", invoice_id);
        match client.payment_status(&invoice_id).await {
            Ok(status) => println!("  {}", status.summary()),
            Err(e) if e.is_api_error() => println!("  Not available: {}", e),
            Err(e) => return Err(e.into()),
        }
    }

    if client.config().token.is_some() {
        println!("\n💰 Wallets:");
        for wallet in client.list_wallets(None).await?.results {
            println!(
                "  {} ({}): {} available",
                wallet.label.as_deref().unwrap_or("unnamed"),
                wallet.wallet_type,
                wallet.available_balance
            );
        }

        let recent = ListTransactionsParams::new().updated_at(UpdatedAtFilter::ThisWeek);
        let transactions = client.list_transactions(Some(&recent)).await?;
        println!("\n📒 {} transactions this week", transactions.count);
    }

    Ok(())
}
