//! Bulk-saves accounts and contacts against a live org.
//!
//! Requires `BULK_INSTANCE_URL` and `BULK_ACCESS_TOKEN`; see `RestConfig::from_env`.
//! Run with: RUST_LOG=info cargo run --example basic_usage

use bulk_saver::hooks::LogHook;
use bulk_saver::{BulkSaver, BulkSaverConfig, RestClient, RestConfig, SObject};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let client = RestClient::new(RestConfig::from_env()?)?;
    let mut saver = BulkSaver::with_config(client, BulkSaverConfig::from_env())?
        .with_hook(Arc::new(LogHook));

    for i in 0..250 {
        let account = SObject::new()
            .with_field("Name", format!("Bulk account {i}"))
            .with_field("External_Id__c", format!("BULK-{i:04}"));
        saver.save(account, "Account", Some("External_Id__c")).await?;
    }
    saver
        .save(SObject::new().with_field("LastName", "Doe"), "Contact", None)
        .await?;

    let results = match saver.flush().await {
        Ok(results) => results.snapshot(),
        Err(err) => {
            if let Some(flush) = err.as_flush() {
                eprintln!(
                    "{} batch failed after {} outcomes; {} items still pending",
                    flush.kind,
                    flush.results.len(),
                    saver.pending_len()
                );
            }
            return Err(err.into());
        }
    };

    println!(
        "upserted {}, created {}",
        results.upserted.len(),
        results.created.len()
    );
    for (kind, failure) in results.failures() {
        println!(
            "{kind} {:?}: {}",
            failure.id,
            failure.first_error_message().unwrap_or("unknown error")
        );
    }
    Ok(())
}
