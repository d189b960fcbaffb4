//! Chronos binary entry point: parse the CLI, initialize tracing, and
//! dispatch to the command handlers. Wall-clock time enters the engine
//! only here.

use chronos::api::{self, ApiState};
use chronos::cli::{
    cmd_init, cmd_score, cmd_simulate, cmd_status, cmd_submit, cmd_validate, Cli, Command,
};
use chronos_core::RedbVaultStore;
use clap::Parser;
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing_subscriber::EnvFilter;

fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Init { db, force } => cmd_init(&db, force),
        Command::Serve { addr, db, api_key } => {
            match RedbVaultStore::create(&db) {
                Ok(store) => {
                    let state = ApiState::new(Box::new(store), api_key);
                    api::serve(addr, state)
                        .await
                        .map_err(chronos::cli::CliError::Io)
                }
                Err(e) => Err(e.into()),
            }
        }
        Command::Validate { draft } => cmd_validate(&draft),
        Command::Simulate {
            seed,
            vault_type,
            real_time,
        } => cmd_simulate(seed, &vault_type, real_time).map(|_| ()),
        Command::Score {
            level,
            multisig,
            geolocation,
            biometrics,
            time_lock_days,
        } => cmd_score(&level, multisig, geolocation, biometrics, time_lock_days).map(|_| ()),
        Command::Submit {
            draft,
            db,
            user,
            offline_wallet,
        } => cmd_submit(&draft, &db, user, offline_wallet, now_unix_secs()).map(|_| ()),
        Command::Status { db, json } => cmd_status(&db, json).map(|_| ()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
