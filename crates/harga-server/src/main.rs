//! harga server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite price store, and serves the JSON API over HTTP.
//!
//! # Inspecting the catalog
//!
//! To print the region and commodity ids the server will resolve against:
//!
//! ```
//! cargo run -p harga-server --bin server -- --print-catalog
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use harga_server::{ServerConfig, app, build_service};
use harga_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "harga commodity price API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the active region/commodity catalog as JSON and exit.
  #[arg(long)]
  print_catalog: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  // Helper mode: dump the catalog and exit.
  if cli.print_catalog {
    let catalog = server_cfg.catalog().context("invalid catalog")?;
    println!("{}", serde_json::to_string_pretty(&catalog.to_config())?);
    return Ok(());
  }

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let service = build_service(Arc::new(store), &server_cfg)
    .context("failed to build price service")?;

  let app = app(Arc::new(service));
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::warn!("failed to listen for ctrl-c: {e}");
    std::future::pending::<()>().await;
  }
  tracing::info!("shutting down");
}

/// Expand a leading `~` (alone or as `~/...`) to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  match std::env::var_os("HOME") {
    Some(home) => expand_tilde_with(path, Path::new(&home)),
    None => path.to_path_buf(),
  }
}

fn expand_tilde_with(path: &Path, home: &Path) -> PathBuf {
  match path.strip_prefix("~") {
    Ok(rest) => home.join(rest),
    Err(_) => path.to_path_buf(),
  }
}
