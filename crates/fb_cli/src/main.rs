use anyhow::Context;
use clap::{Parser, ValueEnum};
use fb_core::StoryStore;
#[cfg(feature = "elasticsearch")]
use fb_storage::ElasticStorage;
use fb_storage::{MemoryStorage, StorageBackend};
use fb_web::{create_app, AppState};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn, Level};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Backend {
    Memory,
    #[cfg(feature = "elasticsearch")]
    Elasticsearch,
}

#[derive(Parser, Debug)]
#[command(name = "fb_server", about = "HTTP API over the fact-checked story collection")]
struct Args {
    /// Storage backend holding the story collection
    #[arg(long, value_enum, default_value_t = Backend::Memory)]
    backend: Backend,

    /// Port to listen on
    #[arg(long, default_value_t = 3000)]
    port: u16,

    /// Stories returned per page by /stories/page/:page
    #[arg(long, default_value_t = 10)]
    page_size: i64,

    /// JSON object of {id: fields} documents loaded into the memory backend
    /// at startup
    #[arg(long)]
    seed: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let args = Args::parse();

    let store = build_store(&args).await?;

    // Cheap probe so an unreachable store fails the boot, not the first
    // request.
    store
        .search_page(0, 1)
        .await
        .context("store probe failed")?;
    info!("Store reachable");

    let app = create_app(AppState {
        store,
        page_size: args.page_size,
    })
    .await;

    let address = format!("0.0.0.0:{}", args.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!("Serving stories on {address} ({} per page)", args.page_size);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn build_store(args: &Args) -> anyhow::Result<Arc<dyn StoryStore>> {
    match args.backend {
        Backend::Memory => {
            let storage = MemoryStorage::connect()
                .await
                .with_context(MemoryStorage::unavailable_hint)?;
            if let Some(path) = &args.seed {
                seed_memory(&storage, path).await?;
            }
            Ok(Arc::new(storage))
        }
        #[cfg(feature = "elasticsearch")]
        Backend::Elasticsearch => {
            if args.seed.is_some() {
                warn!("--seed only applies to the memory backend, ignoring");
            }
            let storage = ElasticStorage::connect()
                .await
                .with_context(ElasticStorage::unavailable_hint)?;
            Ok(Arc::new(storage))
        }
    }
}

async fn seed_memory(storage: &MemoryStorage, path: &PathBuf) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read seed file {}", path.display()))?;
    let docs: serde_json::Map<String, Value> =
        serde_json::from_str(&raw).context("seed file must be a JSON object of {id: fields}")?;

    let mut seeded = 0usize;
    for (id, fields) in docs {
        match fields.as_object() {
            Some(fields) => {
                storage.insert(id, fields.clone()).await;
                seeded += 1;
            }
            None => warn!("seed entry {id} is not an object, skipped"),
        }
    }
    info!("Seeded {seeded} stories from {}", path.display());
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
        info!("Received ctrl-c, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
