//! Memsource demo entrypoint.
//!
//! Serves each identifier given on the command line from files under `MEMSOURCE_ROOT`
//! through the configured strategy, printing one status line per identifier.

use std::sync::Arc;

use mimalloc::MiMalloc;

use memsource::config::Config;
use memsource::{DirectoryBackend, FetchResult, Memsource, MemoryStore, TimeoutStore};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;

    let identifiers: Vec<String> = std::env::args().skip(1).collect();
    if identifiers.is_empty() {
        anyhow::bail!("usage: memsource <identifier>...");
    }

    tracing::info!(
        mode = %config.mode,
        root = %config.root.display(),
        store_timeout_ms = config.store_timeout.as_millis() as u64,
        "Memsource starting"
    );

    let store = TimeoutStore::new(
        MemoryStore::with_capacity(config.store_capacity),
        config.store_timeout,
    );
    let backend = DirectoryBackend::new(config.root.clone());
    let source = Memsource::from_config(&config, Arc::new(store), Arc::new(backend)).build();

    for identifier in &identifiers {
        println!("{}", status_line(identifier, &source.get(identifier).await));
    }

    source.settle().await;
    tracing::info!("Background writes settled");
    Ok(())
}

fn status_line(identifier: &str, result: &FetchResult) -> String {
    match result {
        Ok(resource) => format!(
            "200 {identifier} {} bytes{}",
            resource
                .headers
                .content_length()
                .unwrap_or("?"),
            if resource.is_cached() { " (cached)" } else { "" }
        ),
        Err(err) => format!(
            "{} {identifier} {}{}",
            err.status.map_or_else(|| "ERR".to_string(), |s| s.to_string()),
            err.message,
            if err.is_cached() { " (cached)" } else { "" }
        ),
    }
}
