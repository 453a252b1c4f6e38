//! Dashboard example: sign in if needed, then print assets, spending and
//! round-up totals.
//!
//! Set `PFM_API_URL`, `PFM_EMAIL` and `PFM_PASSWORD` before running.

use std::sync::Arc;

use pfm_client::models::auth::LoginRequest;
use pfm_client::storage::FileCredentialStore;
use pfm_client::{PfmClient, Result, SessionEvent};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("pfm_client=info")
        .init();

    // Session survives between runs in ~/.config/mybank-pfm/session.json
    let client = PfmClient::builder()
        .storage(Arc::new(FileCredentialStore::default_path()?))
        .build()
        .await?;

    let mut events = client.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            if let SessionEvent::LoginRequired { reason } = event {
                eprintln!("Session expired ({}); run again to sign in", reason);
            }
        }
    });

    if !client.is_authenticated().await {
        let email = std::env::var("PFM_EMAIL").unwrap_or_default();
        let password = std::env::var("PFM_PASSWORD").unwrap_or_default();
        let login = client
            .auth()
            .login(&LoginRequest::new(email, password))
            .await?;
        println!("Signed in as {}", login.user.name);
    }

    let assets = client.pfm().assets().await?;
    println!("Total balance: {} {}", assets.total_balance, assets.currency);
    for asset in &assets.assets {
        println!(
            "  {:<12} {:<20} {}",
            asset.asset_type, asset.account_name, asset.balance
        );
    }

    let spending = client.pfm().spending_analysis(Some(7)).await?;
    println!("Spent {} over {}", spending.total_spending, spending.period);
    for category in &spending.category_breakdown {
        println!("  {:<12} {}", category.category, category.amount);
    }

    let invest = client.investments().summary().await?;
    println!(
        "Rounded up {} across {} transactions",
        invest.total_rounded_up, invest.total_round_up_transactions
    );

    Ok(())
}
