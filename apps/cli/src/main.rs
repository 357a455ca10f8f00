//! Skydrop CLI
//!
//! Command-line interface for the Skydrop distribution pipeline: ingest or
//! fetch balance data, build the commitment, and serve proofs and claim
//! packages against the frozen tree.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use skydrop_claim::{prepare_claim, PublishedDistribution};
use skydrop_core::{Address, EligibilityRecord};
use skydrop_extractor::{read_transfer_dump, ApiSource, ApiSourceConfig, BalanceLedger};
use skydrop_merkle::{verify, DistributionTree, MerkleError, MerkleProof};
use skydrop_settings::Settings;

/// Skydrop - Merkle distribution generator and proof server
#[derive(Parser)]
#[command(name = "skydrop")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file path (defaults to ~/.skydrop/settings.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest a CSV transfer dump into an allocations file
    Ingest {
        /// Transfer dump (columns: timestamp,from,to,quantity)
        input: PathBuf,

        /// Output allocations JSON
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Fetch balance records from a paginated indexer endpoint
    Fetch {
        /// Indexer endpoint accepting {cursor, limit} queries
        endpoint: String,

        /// Output allocations JSON
        #[arg(short, long)]
        output: PathBuf,

        /// Checkpoint file for resumable fetches
        #[arg(long)]
        checkpoint: Option<PathBuf>,
    },

    /// Build the commitment tree from an allocations file
    Build {
        /// Allocations JSON (from ingest/fetch)
        input: PathBuf,

        /// Output path for the published artifact (root + allocations)
        #[arg(long, default_value = "distribution.json")]
        artifact: PathBuf,

        /// Output path for the tree snapshot used by proof queries
        #[arg(long, default_value = "tree.snapshot")]
        snapshot: PathBuf,
    },

    /// Print the membership proof for an address
    Proof {
        /// Claiming address
        address: String,

        /// Tree snapshot written by build
        #[arg(long, default_value = "tree.snapshot")]
        snapshot: PathBuf,
    },

    /// Verify a proof against a published root
    Verify {
        /// Claiming address
        address: String,

        /// Committed amount in base units
        amount: String,

        /// Published root (hex)
        #[arg(long)]
        root: String,

        /// Proof nodes (hex), leaf to root
        #[arg(long)]
        proof: Vec<String>,
    },

    /// Prepare a self-checked claim package for an address
    Claim {
        /// Claiming address
        address: String,

        /// Tree snapshot written by build
        #[arg(long, default_value = "tree.snapshot")]
        snapshot: PathBuf,

        /// Published artifact whose root the claim targets
        #[arg(long, default_value = "distribution.json")]
        artifact: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load_or_default()?,
    };

    match cli.command {
        Commands::Ingest { input, output } => cmd_ingest(&settings, &input, &output),
        Commands::Fetch {
            endpoint,
            output,
            checkpoint,
        } => cmd_fetch(&settings, endpoint, &output, checkpoint).await,
        Commands::Build {
            input,
            artifact,
            snapshot,
        } => cmd_build(&settings, &input, &artifact, &snapshot),
        Commands::Proof { address, snapshot } => cmd_proof(&address, &snapshot),
        Commands::Verify {
            address,
            amount,
            root,
            proof,
        } => cmd_verify(&address, &amount, &root, &proof),
        Commands::Claim {
            address,
            snapshot,
            artifact,
        } => cmd_claim(&address, &snapshot, &artifact),
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "debug,skydrop=trace"
    } else {
        "info,skydrop=debug"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
}

fn cmd_ingest(settings: &Settings, input: &Path, output: &Path) -> Result<()> {
    let events = read_transfer_dump(
        input,
        settings.token.decimals,
        settings.build.strict_validation,
    )
    .with_context(|| format!("Failed to ingest {}", input.display()))?;

    let ledger = BalanceLedger::from_events(events);
    let records = ledger.records();
    info!(
        "Ingested {} with {} eligible addresses",
        input.display(),
        records.len()
    );

    write_allocations(&records, output)
}

async fn cmd_fetch(
    settings: &Settings,
    endpoint: String,
    output: &Path,
    checkpoint: Option<PathBuf>,
) -> Result<()> {
    let config = ApiSourceConfig {
        endpoint,
        page_size: settings.fetch.page_size,
        max_attempts: settings.fetch.max_attempts,
        request_timeout: Duration::from_secs(settings.fetch.request_timeout_secs),
        checkpoint_path: checkpoint,
        checkpoint_every_pages: settings.fetch.checkpoint_every_pages,
        ..Default::default()
    };

    let source = ApiSource::new(config)?;
    let rows = source.fetch_all().await.context("Fetch failed")?;

    let mut events = Vec::with_capacity(rows.len());
    for row in &rows {
        match row.to_event(settings.token.decimals) {
            Ok(event) => events.push(event),
            Err(e) if !settings.build.strict_validation => {
                tracing::warn!("Skipping invalid row for {:?}: {}", row.address, e);
            }
            Err(e) => return Err(e).context("Invalid source row"),
        }
    }

    let ledger = BalanceLedger::from_events(events);
    let records = ledger.records();
    info!("Fetched {} eligible addresses", records.len());

    write_allocations(&records, output)
}

fn cmd_build(settings: &Settings, input: &Path, artifact: &Path, snapshot: &Path) -> Result<()> {
    let content = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read allocations {}", input.display()))?;
    let records: Vec<EligibilityRecord> =
        serde_json::from_str(&content).context("Failed to parse allocations")?;

    let tree = DistributionTree::build(&records, settings.build.dedup_policy)?;

    let published = PublishedDistribution::from_tree(&tree, settings.token.decimals);
    published.save(artifact)?;

    let bytes = bincode::serialize(&tree).context("Failed to serialize tree snapshot")?;
    let tmp_path = snapshot.with_extension("snapshot.tmp");
    std::fs::write(&tmp_path, &bytes)
        .with_context(|| format!("Failed to write snapshot {}", snapshot.display()))?;
    std::fs::rename(&tmp_path, snapshot).context("Failed to finalize snapshot")?;

    println!("Root: 0x{}", hex::encode(tree.root()));
    println!("Committed records: {}", tree.len());
    Ok(())
}

fn cmd_proof(address: &str, snapshot: &Path) -> Result<()> {
    let address = Address::parse(address)?;
    let tree = load_snapshot(snapshot)?;

    match tree.proof(&address) {
        Ok(proof) => {
            let amount = tree
                .allocation(&address)
                .expect("proved address has an allocation");
            let out = serde_json::json!({
                "address": address.to_checksum(),
                "amount": amount.to_string(),
                "proof": proof.to_hex(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
            Ok(())
        }
        Err(MerkleError::NotEligible(_)) => {
            // Expected outcome, not a failure
            println!("{} has no allocation", address);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn cmd_verify(address: &str, amount: &str, root: &str, proof: &[String]) -> Result<()> {
    let address = Address::parse(address)?;
    let amount: u128 = amount.parse().context("Amount must be integer base units")?;

    let cleaned = root.strip_prefix("0x").unwrap_or(root);
    let mut root_bytes = [0u8; 32];
    hex::decode_to_slice(cleaned, &mut root_bytes).context("Root must be 32 hex bytes")?;

    let proof = MerkleProof::from_hex(proof).context("Proof nodes must be 32 hex bytes each")?;

    if verify(&root_bytes, &address, amount, &proof) {
        println!("Proof is valid");
        Ok(())
    } else {
        bail!("Proof verification FAILED for {}", address);
    }
}

fn cmd_claim(address: &str, snapshot: &Path, artifact: &Path) -> Result<()> {
    let address = Address::parse(address)?;
    let tree = load_snapshot(snapshot)?;
    let published = PublishedDistribution::load(artifact)?;

    let root = published
        .root_bytes()
        .context("Published artifact has a malformed root")?;

    let package = prepare_claim(&tree, &root, &address)?;
    println!("{}", serde_json::to_string_pretty(&package.to_json())?);
    Ok(())
}

fn write_allocations(records: &[EligibilityRecord], output: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    let tmp_path = output.with_extension("json.tmp");
    std::fs::write(&tmp_path, &json)
        .with_context(|| format!("Failed to write allocations {}", output.display()))?;
    std::fs::rename(&tmp_path, output).context("Failed to finalize allocations")?;
    info!("Wrote {} allocations to {}", records.len(), output.display());
    Ok(())
}

fn load_snapshot(path: &Path) -> Result<DistributionTree> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read tree snapshot {}", path.display()))?;
    bincode::deserialize(&bytes).context("Failed to parse tree snapshot")
}
