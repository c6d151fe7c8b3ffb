use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wallet_lanes::application::service::WalletService;
use wallet_lanes::config::{EngineConfig, ShutdownPolicy};
use wallet_lanes::domain::ports::{BalanceStore, BalanceStoreRef};
use wallet_lanes::domain::request::ChangeRequest;
use wallet_lanes::infrastructure::in_memory::InMemoryBalanceStore;
use wallet_lanes::interfaces::csv::balance_writer::BalanceWriter;
use wallet_lanes::interfaces::csv::request_reader::RequestReader;
use wallet_lanes::interfaces::csv::seed_reader::SeedReader;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input balance change requests CSV file (`wallet, operation, amount`)
    input: PathBuf,

    /// Opening balances CSV file (`wallet, balance`) used to create wallets
    #[arg(long)]
    wallets: Option<PathBuf>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Retire lanes that stayed empty for this many milliseconds
    #[arg(
        long,
        env = "WALLET_IDLE_TIMEOUT_MS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    idle_timeout_ms: Option<u64>,

    /// What to do with queued requests on shutdown
    #[arg(long, value_enum, default_value_t = ShutdownPolicy::Drain)]
    on_shutdown: ShutdownPolicy,

    /// Log level used when RUST_LOG is not set (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Cli {
    fn engine_config(&self) -> EngineConfig {
        let config = EngineConfig::default().with_shutdown_policy(self.on_shutdown);
        match self.idle_timeout_ms {
            Some(ms) => config.with_idle_timeout(Duration::from_millis(ms)),
            None => config,
        }
    }
}

#[cfg(feature = "storage-rocksdb")]
fn open_store(db_path: Option<PathBuf>) -> Result<BalanceStoreRef> {
    use wallet_lanes::infrastructure::rocksdb::RocksDBStore;

    match db_path {
        Some(path) => {
            info!(path = %path.display(), "using RocksDB balance store");
            Ok(Arc::new(RocksDBStore::open(path).into_diagnostic()?))
        }
        None => Ok(Arc::new(InMemoryBalanceStore::new())),
    }
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_store(db_path: Option<PathBuf>) -> Result<BalanceStoreRef> {
    if db_path.is_some() {
        warn!(
            "persistent storage requested via --db-path, but the 'storage-rocksdb' feature is not enabled; falling back to in-memory storage"
        );
    }
    Ok(Arc::new(InMemoryBalanceStore::new()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .init();

    let store = open_store(cli.db_path.clone())?;

    if let Some(path) = &cli.wallets {
        let file = File::open(path).into_diagnostic()?;
        for seed in SeedReader::new(file).wallets() {
            match seed {
                Ok((wallet, balance)) => store.store(wallet, balance).await.into_diagnostic()?,
                Err(e) => warn!(error = %e, "skipping wallet seed"),
            }
        }
    }

    let service = WalletService::new(Arc::clone(&store), cli.engine_config());

    let file = File::open(&cli.input).into_diagnostic()?;
    let mut receipts = Vec::new();
    for (row, draft) in RequestReader::new(file).requests().enumerate() {
        let request = match draft.and_then(ChangeRequest::try_from) {
            Ok(request) => request,
            Err(e) => {
                warn!(row = row + 1, error = %e, "error reading request");
                continue;
            }
        };
        match service.submit(request).await {
            Ok(receipt) => receipts.push(receipt),
            Err(e) => warn!(row = row + 1, wallet = %request.wallet, error = %e, "request rejected"),
        }
    }

    let accepted = receipts.len();
    let mut failed = 0usize;
    for receipt in receipts {
        let wallet = receipt.wallet();
        if let Err(e) = receipt.settled().await {
            failed += 1;
            warn!(%wallet, error = %e, "request failed in lane");
        }
    }
    info!(accepted, failed, "all accepted requests settled");

    service.shutdown().await;

    let balances = store.all_balances().await.into_diagnostic()?;
    let stdout = io::stdout();
    let mut writer = BalanceWriter::new(stdout.lock());
    writer.write_balances(balances).into_diagnostic()?;

    Ok(())
}
