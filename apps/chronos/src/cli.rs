//! # CLI Interface
//!
//! Clap-based commands for the Chronos binary. Each command body lives
//! in a `cmd_*` function returning `Result`, so integration tests can
//! drive them without spawning a process.

use chronos_core::{
    is_low_security, security_score, submit, Deployment, SecurityFeatures, SecurityLevel,
    SplitMix, StaticWallet, StoreError, SubmissionError, SubmissionReport, UserId,
    ValidationError, VaultDraft, VaultStore, VaultType, WalletRegistry,
    Chain, RedbVaultStore, StoreCounts, DEPLOY_TICK_MILLIS,
};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

// =============================================================================
// ERRORS
// =============================================================================

/// CLI command failures; each maps to a non-zero exit.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("database already exists at {0} (use --force to overwrite)")]
    DatabaseExists(PathBuf),

    #[error("database not found at {0} (run `chronos init` first)")]
    DatabaseMissing(PathBuf),

    #[error("unknown vault type: {0}")]
    UnknownVaultType(String),

    #[error("unknown security level: {0}")]
    UnknownSecurityLevel(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

// =============================================================================
// ARGUMENTS
// =============================================================================

/// Chronos vault server and CLI.
#[derive(Debug, Parser)]
#[command(name = "chronos", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a new vault database.
    Init {
        /// Database file path.
        #[arg(long, default_value = "chronos.redb")]
        db: PathBuf,
        /// Overwrite an existing database.
        #[arg(long)]
        force: bool,
    },

    /// Run the HTTP API server.
    Serve {
        /// Listen address.
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: SocketAddr,
        /// Database file path.
        #[arg(long, default_value = "chronos.redb")]
        db: PathBuf,
        /// Require this key in the x-api-key header.
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Check a draft file against the submission gate.
    Validate {
        /// Draft JSON file.
        draft: PathBuf,
    },

    /// Run the deployment simulation to completion.
    Simulate {
        /// Seed for the tick generator.
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Vault flavor (fragment, nft-powered, gift, ...).
        #[arg(long, default_value = "fragment")]
        vault_type: String,
        /// Sleep the real 150ms cadence between ticks.
        #[arg(long)]
        real_time: bool,
    },

    /// Compute the security score for a configuration.
    Score {
        /// Protection tier: standard, enhanced, maximum.
        #[arg(long, default_value = "standard")]
        level: String,
        #[arg(long)]
        multisig: bool,
        #[arg(long)]
        geolocation: bool,
        #[arg(long)]
        biometrics: bool,
        /// Time-lock period in days.
        #[arg(long, default_value_t = 30)]
        time_lock_days: u32,
    },

    /// Run the full submission flow for a draft against the local store.
    Submit {
        /// Draft JSON file.
        draft: PathBuf,
        /// Database file path.
        #[arg(long, default_value = "chronos.redb")]
        db: PathBuf,
        /// Owner user id for the created record.
        #[arg(long, default_value_t = 1)]
        user: u64,
        /// Leave every wallet disconnected and unconnectable.
        #[arg(long)]
        offline_wallet: bool,
    },

    /// Show record counts for the store.
    Status {
        /// Database file path.
        #[arg(long, default_value = "chronos.redb")]
        db: PathBuf,
        /// Emit machine-readable JSON.
        #[arg(long)]
        json: bool,
    },
}

// =============================================================================
// PARSE HELPERS
// =============================================================================

fn parse_vault_type(tag: &str) -> Result<VaultType, CliError> {
    match tag {
        "standard" => Ok(VaultType::Standard),
        "fragment" => Ok(VaultType::Fragment),
        "nft-powered" | "nft" => Ok(VaultType::NftPowered),
        "gift" => Ok(VaultType::Gift),
        "multisig" => Ok(VaultType::Multisig),
        "inheritance" => Ok(VaultType::Inheritance),
        "recurring" => Ok(VaultType::Recurring),
        other => Err(CliError::UnknownVaultType(other.to_owned())),
    }
}

fn parse_level(tag: &str) -> Result<SecurityLevel, CliError> {
    match tag {
        "standard" => Ok(SecurityLevel::Standard),
        "enhanced" => Ok(SecurityLevel::Enhanced),
        "maximum" => Ok(SecurityLevel::Maximum),
        other => Err(CliError::UnknownSecurityLevel(other.to_owned())),
    }
}

/// Load a draft from a JSON file.
pub fn load_draft(path: &Path) -> Result<VaultDraft, CliError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

// =============================================================================
// COMMANDS
// =============================================================================

/// Create a vault database at `db`.
pub fn cmd_init(db: &Path, force: bool) -> Result<(), CliError> {
    if db.exists() {
        if !force {
            return Err(CliError::DatabaseExists(db.to_path_buf()));
        }
        std::fs::remove_file(db)?;
    }
    RedbVaultStore::create(db)?;
    tracing::info!(path = %db.display(), "database initialized");
    Ok(())
}

/// Run a draft through the submission gate.
pub fn cmd_validate(draft_path: &Path) -> Result<(), CliError> {
    let draft = load_draft(draft_path)?;
    chronos_core::validate(&draft)?;

    let score = draft.security_score();
    println!("draft ok: {} ({} security score)", draft.name, score);
    if is_low_security(score) {
        println!("warning: security score below {}", chronos_core::LOW_SECURITY_THRESHOLD);
    }
    Ok(())
}

/// Drive the deployment state machine to completion. Returns the
/// generated vault reference.
pub fn cmd_simulate(seed: u64, vault_type: &str, real_time: bool) -> Result<String, CliError> {
    let vault_type = parse_vault_type(vault_type)?;
    let mut rng = SplitMix::new(seed);
    let mut deployment = Deployment::Idle;
    deployment.begin(vault_type);

    let mut phase = deployment.phase();
    println!("  0% {}", phase.label());
    while deployment.is_deploying() {
        if real_time {
            std::thread::sleep(std::time::Duration::from_millis(DEPLOY_TICK_MILLIS));
        }
        let progress = deployment.tick(&mut rng);
        let current = deployment.phase();
        if current != phase {
            println!("{progress:>3}% {}", current.label());
            phase = current;
        }
    }

    // The simulated process cannot fail; success is the only exit.
    let reference = deployment.reference().unwrap_or_default().to_owned();
    println!("vault created: {reference}");
    Ok(reference)
}

/// Compute and print a security score.
pub fn cmd_score(
    level: &str,
    multisig: bool,
    geolocation: bool,
    biometrics: bool,
    time_lock_days: u32,
) -> Result<u8, CliError> {
    let level = parse_level(level)?;
    let features = SecurityFeatures {
        multisig,
        geolocation,
        biometrics,
    };
    let score = security_score(level, features, time_lock_days);
    println!(
        "security score: {score}{}",
        if is_low_security(score) { " (low)" } else { "" }
    );
    Ok(score)
}

/// Run the full submission flow against the local store.
pub fn cmd_submit(
    draft_path: &Path,
    db: &Path,
    user: u64,
    offline_wallet: bool,
    now_unix_secs: u64,
) -> Result<SubmissionReport, CliError> {
    let mut draft = load_draft(draft_path)?;
    let mut store = RedbVaultStore::create(db)?;

    // Draft attachment entries stand in for pre-uploaded files: register
    // each one so the association step has a record to update.
    for slot in draft.attachments.iter_mut() {
        *slot = store.register_attachment()?.id;
    }

    let mut wallets = WalletRegistry::new();
    for chain in Chain::CANDIDATES {
        let wallet = if offline_wallet {
            StaticWallet::offline()
        } else {
            StaticWallet::connectable()
        };
        wallets.register(chain, Box::new(wallet));
    }

    let report = submit(&mut draft, UserId(user), now_unix_secs, &mut wallets, &mut store)?;

    println!("vault {} created for user {user}", report.vault.id);
    for item in &report.beneficiaries {
        match &item.outcome {
            chronos_core::BatchOutcome::Succeeded => {
                println!("beneficiary {}: ok", item.item.name);
            }
            chronos_core::BatchOutcome::Failed { message } => {
                println!("beneficiary {}: failed ({message})", item.item.name);
            }
        }
    }
    for item in &report.attachments {
        match &item.outcome {
            chronos_core::BatchOutcome::Succeeded => {
                println!("attachment {}: ok", item.item);
            }
            chronos_core::BatchOutcome::Failed { message } => {
                println!("attachment {}: failed ({message})", item.item);
            }
        }
    }
    Ok(report)
}

/// Print record counts from the store.
pub fn cmd_status(db: &Path, json: bool) -> Result<StoreCounts, CliError> {
    if !db.exists() {
        return Err(CliError::DatabaseMissing(db.to_path_buf()));
    }
    let store = RedbVaultStore::open(db)?;
    let counts = store.counts()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&counts)?);
    } else {
        println!(
            "vaults: {}, beneficiaries: {}, attachments: {}",
            counts.vaults, counts.beneficiaries, counts.attachments
        );
    }
    Ok(counts)
}
