//! hexwatch: derive stake status and accrued interest from a chain snapshot.

mod source;

use anyhow::Context;
use clap::Parser;
use hexwatch_portfolio::{refresh_chain, Account, AccountData, PortfolioConfig, PortfolioStore, RefreshReport, Totals};
use hexwatch_types::Chain;
use hexwatch_utils::{init_logging, LogFormat};
use serde::Serialize;
use source::SnapshotSource;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "hexwatch", about = "HEX stake accrual tracker")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, global = true, env = "HEXWATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, global = true, env = "HEXWATCH_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, global = true, env = "HEXWATCH_LOG_FORMAT")]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Refresh every tracked account from a JSON chain snapshot and print
    /// the derived accounts and favorites rollup as JSON.
    Derive {
        /// JSON chain snapshot to read.
        #[arg(long, env = "HEXWATCH_SNAPSHOT")]
        snapshot: PathBuf,

        /// Only refresh this chain ("ethereum" or "pulsechain").
        #[arg(long, env = "HEXWATCH_CHAIN")]
        chain: Option<Chain>,

        /// Binary state file: last good state is loaded from it (if present)
        /// before refreshing and written back afterwards.
        #[arg(long, env = "HEXWATCH_STATE")]
        state: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct DeriveOutput<'a> {
    accounts: Vec<&'a AccountData>,
    favorites: Totals,
    reports: Vec<RefreshReport>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => PortfolioConfig::from_toml_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => PortfolioConfig::default(),
    };
    let log_level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());
    let log_format: LogFormat = cli
        .log_format
        .as_deref()
        .unwrap_or(&config.log_format)
        .parse()?;
    init_logging(log_format, &log_level)?;

    match cli.command {
        Command::Derive { snapshot, chain, state } => derive(&config, &snapshot, chain, state),
    }
}

fn derive(
    config: &PortfolioConfig,
    snapshot: &Path,
    only: Option<Chain>,
    state: Option<PathBuf>,
) -> anyhow::Result<()> {
    let source = SnapshotSource::from_file(snapshot)?;
    let chains = match only {
        Some(chain) => vec![chain],
        None => config.chains.clone(),
    };

    let mut store = match &state {
        Some(path) if path.exists() => {
            let mut store = PortfolioStore::load_snapshot(path)
                .with_context(|| format!("failed to load state {}", path.display()))?;
            for chain in Chain::ALL {
                store.set_constants(chain, config.constants(chain));
            }
            for account in &config.accounts {
                store.register_account(account.into());
            }
            tracing::info!(path = %path.display(), accounts = store.len(), "restored last good state");
            store
        }
        _ => config.build_store(),
    };

    // Without configured accounts, follow everything the snapshot lists.
    if config.accounts.is_empty() {
        for &chain in &chains {
            for address in source.addresses(chain) {
                let name = address.to_string();
                let account = Account::new(address, chain, name);
                if store.account(&account.key()).is_err() {
                    store.register_account(account);
                }
            }
        }
    }

    let mut reports = Vec::with_capacity(chains.len());
    for chain in chains {
        match refresh_chain(&mut store, &source, chain) {
            Ok(report) => reports.push(report),
            Err(e) => tracing::warn!(%chain, error = %e, "chain refresh failed, keeping last good state"),
        }
    }

    if let Some(path) = &state {
        store
            .save_snapshot(path)
            .with_context(|| format!("failed to save state {}", path.display()))?;
    }

    let output = DeriveOutput {
        accounts: store.accounts().collect(),
        favorites: store.favorites_total()?,
        reports,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
