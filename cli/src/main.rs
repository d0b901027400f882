use anyhow::{anyhow, Result};
use clap::Parser;
use scout_catalog::{CatalogConfig, OmdbClient, TitleLookup, DEFAULT_BASE_URL};
use scout_core::{MemoryStore, MovieCatalogService, PersistentKeyValueStore, SledStore};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{fmt, EnvFilter};

mod session;

use session::{Command, Session, HELP};

#[derive(Parser)]
#[command(name = "scout")]
#[command(about = "Search a movie catalog, scroll through results, keep a starred list")]
struct Args {
    /// Catalog API key (falls back to OMDB_API_KEY)
    #[arg(long)]
    api_key: Option<String>,
    /// Catalog base URL
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,
    /// Directory for the starred-items database
    #[arg(long, default_value = "./scout-data")]
    data_dir: String,
    /// Request timeout seconds
    #[arg(long, default_value_t = 12)]
    timeout_secs: u64,
    /// User-Agent sent to the catalog
    #[arg(long)]
    user_agent: Option<String>,
    /// Keep starred items in memory only
    #[arg(long, default_value_t = false)]
    ephemeral: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();
    let args = Args::parse();

    let api_key = args
        .api_key
        .clone()
        .or_else(|| std::env::var("OMDB_API_KEY").ok())
        .ok_or_else(|| anyhow!("no API key: pass --api-key or set OMDB_API_KEY"))?;
    let mut config = CatalogConfig { base_url: args.base_url.clone(), api_key, timeout_secs: args.timeout_secs, ..CatalogConfig::default() };
    if let Some(ua) = &args.user_agent {
        config.user_agent = ua.clone();
    }
    let catalog = Arc::new(OmdbClient::new(config)?);
    tracing::info!(base_url = %args.base_url, ephemeral = args.ephemeral, "scout starting");

    if args.ephemeral {
        run(Session::new(catalog, MemoryStore::new())).await
    } else {
        std::fs::create_dir_all(&args.data_dir)?;
        let store = SledStore::open(std::path::Path::new(&args.data_dir).join("starred.sled"))?;
        run(Session::new(catalog, store)).await
    }
}

async fn run<C, S>(mut session: Session<C, S>) -> Result<()>
where
    C: MovieCatalogService + TitleLookup,
    S: PersistentKeyValueStore,
{
    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match Command::parse(&line) {
                    Ok(Some(cmd)) => {
                        if !session.handle(cmd).await {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => println!("{e}"),
                }
            }
            Some(settlement) = session.settle_next(), if session.in_flight() => {
                session.on_settled(settlement);
            }
        }
    }
    tracing::info!("bye");
    Ok(())
}
