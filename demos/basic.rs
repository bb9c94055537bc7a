//! Basic example demonstrating the Reporting API client.
//!
//! Run with:
//! ```
//! OS_AUTH_URL=https://keystone.example.com:5000/v3 OS_USERNAME=me OS_PASSWORD=secret \
//!     OS_PROJECT_NAME=my-project cargo run --example basic
//! ```

use reportingclient::{authenticate, Credential, FilterParams, ReportingClient};

#[tokio::main]
async fn main() -> reportingclient::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    // Authenticate from environment variables
    println!("Authenticating...");
    let credential = Credential::from_env()?;
    let auth = authenticate(&credential, None).await?;
    let mut client = ReportingClient::new(auth)?;
    println!("Connected to: {}", client.endpoint());

    // API versions
    println!("\n--- API Versions ---");
    for version in client.get_versions().await? {
        let links: Vec<&str> = version.links.keys().map(String::as_str).collect();
        println!("  - {} ({})", version.id, links.join(", "));
    }

    // Reports
    println!("\n--- Reports ---");
    let names: Vec<String> = client
        .get_reports()
        .await?
        .iter()
        .map(|r| {
            println!("  - {}: {} (updated {})", r.name, r.description, r.last_updated);
            r.name.clone()
        })
        .collect();

    // Fetch the first report and show a few rows
    if let Some(name) = names.first() {
        println!("\n--- Fetching '{}' ---", name);
        let rows = client.fetch(name, &FilterParams::new()).await?;
        println!("Fetched {} rows", rows.len());
        for row in rows.iter().take(5) {
            println!("  {}", serde_json::Value::Object(row.clone()));
        }
    }

    println!("\nDone!");
    Ok(())
}
