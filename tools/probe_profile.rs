use std::env;
use std::time::Duration;

use metadata::{extract_profile, HttpPage, Timeouts};
use tracing::info;
use tracing_subscriber::EnvFilter;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = env::args().skip(1);
    let url = args
        .next()
        .or_else(|| env::var("PROFILE_URL").ok())
        .ok_or("PROFILE_URL not set and no url argument")?;
    let timeout_secs = env::var("PROBE_TIMEOUT_SECS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(30);
    let timeouts = Timeouts {
        navigation: Duration::from_secs(timeout_secs),
        ..Timeouts::default()
    };

    let mut page = HttpPage::new(USER_AGENT)?;
    info!("Probing {}", url);
    let update = extract_profile(&mut page, &url, timeouts).await?;
    println!("{}", serde_json::to_string_pretty(&update)?);

    Ok(())
}
