//! `milk`: replay scripted calls against a fresh ledger and inspect the
//! bridge wire format.

mod script;

use std::{io, path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use milk_ledger::RoleGatedLedger;
use milk_types::{LedgerConfig, Result, Role, constants, encode_amount, parse_units};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "milk", version, about = "Milk role-gated ledger tools")]
struct Cli {
    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply a JSON script of calls to a fresh ledger, printing one JSON
    /// line per call followed by a supply summary.
    Replay {
        /// Path to the call script (JSON array).
        #[arg(long)]
        script: PathBuf,
        /// Ledger config (JSON). Defaults to Milk Token / MTK / 18 decimals.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the 32-byte identifier of a role.
    RoleId {
        /// Role name, e.g. `DEPOSITOR_ROLE` or `contract`.
        name: String,
    },
    /// Encode a token amount as a deposit payload.
    EncodeAmount {
        /// Decimal token amount, e.g. `100000000` or `0.5`.
        amount: String,
        #[arg(long, default_value_t = constants::DEFAULT_DECIMALS)]
        decimals: u8,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Replay { script, config } => {
            let config = match config {
                Some(path) => LedgerConfig::from_json_file(path)?,
                None => LedgerConfig::default(),
            };
            let calls = script::load_script(&script)?;
            tracing::info!(script = %script.display(), calls = calls.len(), "Replaying script");

            let mut ledger = RoleGatedLedger::new(config)?;
            let stdout = io::stdout();
            let mut out = stdout.lock();
            let summary = script::replay(&mut ledger, &calls, &mut out)?;
            println!("{}", serde_json::to_string(&summary)?);
        }
        Command::RoleId { name } => {
            let role: Role = name.parse()?;
            println!("{}", role.id());
        }
        Command::EncodeAmount { amount, decimals } => {
            let value = parse_units(&amount, decimals)?;
            println!("0x{}", hex::encode(encode_amount(value)));
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "Command failed");
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
