//! PoorToken CLI Application
//!
//! A command-line interface for interacting with the token ledger.

use clap::{Parser, Subcommand};
use poor_token::cli::{self, AppState};
use primitive_types::U256;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "poor")]
#[command(version = "0.1.0")]
#[command(about = "A fee-gated fungible token ledger", long_about = None)]
struct Cli {
    /// Data directory for ledger storage
    #[arg(short, long, default_value = ".poor_data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new ledger
    Init,

    /// Mint tokens by paying the per-token fee
    Mint {
        /// Account receiving the minted tokens
        #[arg(short, long)]
        caller: String,

        /// Payment in payment-currency base units (fee is 10^16 per token)
        #[arg(short, long)]
        payment: String,
    },

    /// Transfer tokens to an address
    Transfer {
        /// Sender's address
        #[arg(short, long)]
        from: String,

        /// Recipient's address
        #[arg(short, long)]
        to: String,

        /// Amount to transfer
        #[arg(short, long)]
        amount: String,
    },

    /// Approve a spender to withdraw from an owner's account
    Approve {
        /// Owner's address
        #[arg(short, long)]
        owner: String,

        /// Spender's address
        #[arg(short, long)]
        spender: String,

        /// Allowance amount (overwrites any prior approval)
        #[arg(short, long)]
        amount: String,
    },

    /// Transfer tokens out of another account (requires prior approval)
    TransferFrom {
        /// Calling account (the spender, unless equal to --from)
        #[arg(short, long)]
        caller: String,

        /// Funds source address
        #[arg(short, long)]
        from: String,

        /// Recipient's address
        #[arg(short, long)]
        to: String,

        /// Amount to transfer
        #[arg(short, long)]
        amount: String,
    },

    /// Show the balance of an address
    Balance {
        /// Address to query
        #[arg(short, long)]
        address: String,
    },

    /// Show the allowance granted by an owner to a spender
    Allowance {
        /// Owner's address
        #[arg(short, long)]
        owner: String,

        /// Spender's address
        #[arg(short, long)]
        spender: String,
    },

    /// Display ledger information
    Info,

    /// Show recent events
    Events {
        /// Number of events to show
        #[arg(short, long, default_value = "20")]
        count: usize,
    },

    /// Audit the supply invariant
    Validate,

    /// Export the ledger to a file
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Import a ledger from a file
    Import {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,
    },
}

/// Parse a decimal amount into a U256
fn parse_amount(s: &str) -> Result<U256, Box<dyn std::error::Error>> {
    Ok(U256::from_dec_str(s.trim())?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Handle init command separately (doesn't need full state)
    if let Commands::Init = &cli.command {
        return cli::cmd_init(&cli.data_dir);
    }

    // Initialize application state
    let mut state = AppState::new(cli.data_dir.clone())?;

    // Process commands
    match cli.command {
        Commands::Init => unreachable!(),

        Commands::Mint { caller, payment } => {
            cli::cmd_mint(&mut state, &caller, parse_amount(&payment)?)?;
        }

        Commands::Transfer { from, to, amount } => {
            cli::cmd_transfer(&mut state, &from, &to, parse_amount(&amount)?)?;
        }

        Commands::Approve {
            owner,
            spender,
            amount,
        } => {
            cli::cmd_approve(&mut state, &owner, &spender, parse_amount(&amount)?)?;
        }

        Commands::TransferFrom {
            caller,
            from,
            to,
            amount,
        } => {
            cli::cmd_transfer_from(&mut state, &caller, &from, &to, parse_amount(&amount)?)?;
        }

        Commands::Balance { address } => {
            cli::cmd_balance(&state, &address)?;
        }

        Commands::Allowance { owner, spender } => {
            cli::cmd_allowance(&state, &owner, &spender)?;
        }

        Commands::Info => {
            cli::cmd_info(&state)?;
        }

        Commands::Events { count } => {
            cli::cmd_events(&state, count)?;
        }

        Commands::Validate => {
            cli::cmd_validate(&state)?;
        }

        Commands::Export { output } => {
            cli::cmd_export(&state, &output)?;
        }

        Commands::Import { input } => {
            cli::cmd_import(&mut state, &input)?;
        }
    }

    Ok(())
}
