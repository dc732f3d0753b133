use anyhow::{Context, Result};
use std::io::Read;
use tracing::info;
use tracing_subscriber::EnvFilter;

use trace_relay::{run_sentinel, Secrets, TransactionTrigger};

fn read_trigger() -> Result<TransactionTrigger> {
    let input = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read trigger file: {}", path))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read trigger from stdin")?;
            buf
        }
    };

    Ok(TransactionTrigger::from_json(&input)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    // logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).compact().init();

    dotenv::dotenv().ok();

    let trigger = read_trigger()?;
    let secrets = Secrets::from_env().context("Failed to resolve relay secrets")?;

    let report = run_sentinel(&trigger, &secrets).await?;

    info!(
        "Sentinel relay complete for {}: {} matched events, {} addresses, delivered: {}",
        trigger.hash,
        report.events_matched,
        report.addresses.len(),
        report.delivered
    );

    Ok(())
}
