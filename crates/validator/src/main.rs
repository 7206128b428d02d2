//! Checkpoint Bridge Validator
//!
//! Main entry point for the validator-side bridge node.
//! Serves checkpoint submission and staking queries over REST, or advances
//! the canonical proposer rotation from the command line.

use anyhow::{Context, Result};
use bridge_checkpoint::SystemClock;
use bridge_staking::ValidatorSet;
use bridge_store::{MemoryStore, QueryGateway, SledStore, StakingStore};
use clap::{Parser, ValueEnum};
use rpc_server::{RestContext, RestServer, UnsignedTxGateway};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;

use config::NodeConfig;

/// Node mode
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    /// Serve the REST interface
    Serve,
    /// Rotate the stored validator set and exit
    Advance,
}

/// Checkpoint bridge validator
#[derive(Parser, Debug)]
#[command(name = "bridge-validator")]
#[command(about = "Validator-side checkpoint submission and proposer rotation", long_about = None)]
struct Args {
    /// Node mode (serve or advance)
    #[arg(long, value_enum, default_value = "serve")]
    mode: Mode,

    /// JSON config file; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// REST bind address
    #[arg(long)]
    rest_addr: Option<String>,

    /// Data directory for persistent state
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Genesis validator set (JSON)
    #[arg(long)]
    genesis: Option<PathBuf>,

    /// Largest proposer preview served over REST
    #[arg(long)]
    max_preview: Option<usize>,

    /// Rounds to advance (advance mode)
    #[arg(long, default_value = "1")]
    rounds: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    /// File config (or defaults) with CLI overrides applied
    fn resolve_config(&self) -> Result<NodeConfig> {
        let mut config = match &self.config {
            Some(path) => NodeConfig::load(path)
                .with_context(|| format!("failed to load config {:?}", path))?,
            None => NodeConfig::default(),
        };
        if let Some(addr) = &self.rest_addr {
            config.rest_addr = addr.clone();
        }
        if let Some(dir) = &self.data_dir {
            config.data_dir = Some(dir.clone());
        }
        if let Some(genesis) = &self.genesis {
            config.genesis = Some(genesis.clone());
        }
        if let Some(max) = self.max_preview {
            config.max_preview = max;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.resolve_config()?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let staking = Arc::new(open_staking_store(&config)?);
    if let Some(path) = &config.genesis {
        apply_genesis(&staking, path)?;
    }

    match args.mode {
        Mode::Serve => run_server(config, staking).await,
        Mode::Advance => run_advance(&staking, args.rounds),
    }
}

fn open_staking_store(config: &NodeConfig) -> Result<StakingStore> {
    let gateway: Arc<dyn QueryGateway> = match &config.data_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            Arc::new(SledStore::open(dir)?)
        }
        None => {
            tracing::warn!("No data directory configured, state is kept in memory");
            Arc::new(MemoryStore::new())
        }
    };
    Ok(StakingStore::new(gateway))
}

/// Store the genesis set unless a validator set already exists
fn apply_genesis(staking: &StakingStore, path: &Path) -> Result<()> {
    if staking.current_validator_set()?.is_some() {
        tracing::info!("Validator set already stored, ignoring genesis {:?}", path);
        return Ok(());
    }

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read genesis {:?}", path))?;
    let set: ValidatorSet = serde_json::from_str(&raw)
        .with_context(|| format!("invalid genesis {:?}", path))?;
    staking.save_validator_set(&set)?;

    tracing::info!(
        "Stored genesis validator set: {} validators, total power {}",
        set.len(),
        set.total_voting_power()
    );
    Ok(())
}

/// Serve REST until Ctrl+C
async fn run_server(config: NodeConfig, staking: Arc<StakingStore>) -> Result<()> {
    tracing::info!("Starting checkpoint bridge validator");
    tracing::info!("  REST: {}", config.rest_addr);
    tracing::info!("  Data directory: {:?}", config.data_dir);
    tracing::info!("  Max proposer preview: {}", config.max_preview);

    let context = RestContext::new(staking.clone(), Arc::new(UnsignedTxGateway), Arc::new(SystemClock))
        .with_max_preview(config.max_preview);

    let rest_addr = config.rest_addr.clone();
    let rest_server = tokio::spawn(async move {
        let server = RestServer::new(Arc::new(context));
        if let Err(e) = server.run(&rest_addr).await {
            tracing::error!("REST server error: {}", e);
        }
    });

    tracing::info!("Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    tracing::info!("Shutting down...");
    rest_server.abort();
    staking.flush()?;
    tracing::info!("Validator stopped");

    Ok(())
}

/// Advance the canonical proposer `rounds` times
fn run_advance(staking: &StakingStore, rounds: u64) -> Result<()> {
    for round in 0..rounds {
        match staking.advance_proposer()? {
            Some(proposer) => {
                println!("{}", proposer.address);
                tracing::debug!("Round {}: proposer {}", round + 1, proposer.address);
            }
            None => anyhow::bail!("no validator set stored; pass --genesis first"),
        }
    }
    staking.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_staking::Validator;
    use std::io::Write;

    #[test]
    fn test_cli_overrides_config() {
        let args = Args::parse_from([
            "bridge-validator",
            "--rest-addr",
            "0.0.0.0:1318",
            "--max-preview",
            "7",
        ]);
        let config = args.resolve_config().unwrap();

        assert_eq!(config.rest_addr, "0.0.0.0:1318");
        assert_eq!(config.max_preview, 7);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_genesis_applied_once() {
        let staking = StakingStore::new(Arc::new(MemoryStore::new()));
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"validators": [
                {{"address": "0x{a}", "voting_power": 3}},
                {{"address": "0x{b}", "voting_power": 1}}
            ]}}"#,
            a = "01".repeat(20),
            b = "02".repeat(20)
        )
        .unwrap();

        apply_genesis(&staking, file.path()).unwrap();
        let set = staking.current_validator_set().unwrap().unwrap();
        assert_eq!(set.total_voting_power(), 4);

        // a stored set wins over genesis on restart
        staking.advance_proposer().unwrap();
        apply_genesis(&staking, file.path()).unwrap();
        let stored = staking.current_validator_set().unwrap().unwrap();
        assert!(stored.proposer().is_some());
    }

    #[test]
    fn test_advance_without_set_fails() {
        let staking = StakingStore::new(Arc::new(MemoryStore::new()));
        assert!(run_advance(&staking, 1).is_err());

        let address = format!("0x{}", "01".repeat(20)).parse().unwrap();
        let set = ValidatorSet::new(vec![Validator::new(address, 1)]).unwrap();
        staking.save_validator_set(&set).unwrap();
        assert!(run_advance(&staking, 3).is_ok());
    }

    #[test]
    fn test_advance_on_disk_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = NodeConfig {
            data_dir: Some(dir.path().join("state")),
            ..NodeConfig::default()
        };
        let staking = open_staking_store(&config).unwrap();

        let address = format!("0x{}", "02".repeat(20)).parse().unwrap();
        let set = ValidatorSet::new(vec![Validator::new(address, 5)]).unwrap();
        staking.save_validator_set(&set).unwrap();

        run_advance(&staking, 2).unwrap();
        let stored = staking.current_validator_set().unwrap().unwrap();
        assert_eq!(stored.proposer().unwrap().address, address);
    }
}
