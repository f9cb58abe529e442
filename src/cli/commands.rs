//! CLI commands for the ledger
//!
//! Implements all command handlers for the CLI interface.

use crate::ledger::{initial_supply, mint_fee, Ledger, LedgerEvent, MINT_SOURCE};
use crate::storage::{load_from_file, save_to_file, Storage, StorageConfig};
use primitive_types::U256;
use std::path::{Path, PathBuf};

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Application state
pub struct AppState {
    pub ledger: Ledger,
    pub storage: Storage,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize application state
    pub fn new(data_dir: PathBuf) -> CliResult<Self> {
        let storage_config = StorageConfig {
            data_dir: data_dir.clone(),
            ..Default::default()
        };

        let storage = Storage::new(storage_config)?;

        // Load or create ledger
        let ledger = if storage.exists() {
            println!("📂 Loading existing ledger...");
            storage.load()?
        } else {
            println!("🆕 Creating new ledger...");
            let ledger = Ledger::new();
            storage.save(&ledger)?;
            ledger
        };

        Ok(Self {
            ledger,
            storage,
            data_dir,
        })
    }

    /// Save the current state
    pub fn save(&self) -> CliResult<()> {
        self.storage.save(&self.ledger)?;
        Ok(())
    }
}

/// Initialize a new ledger
pub fn cmd_init(data_dir: &Path) -> CliResult<()> {
    let storage_config = StorageConfig {
        data_dir: data_dir.to_path_buf(),
        ..Default::default()
    };

    let storage = Storage::new(storage_config)?;

    if storage.exists() {
        println!("⚠️  Ledger already exists at {:?}", data_dir);
        println!("   Delete the data directory to reinitialize.");
        return Ok(());
    }

    let ledger = Ledger::new();
    storage.save(&ledger)?;

    println!("✅ Ledger initialized!");
    println!("   📁 Data directory: {:?}", data_dir);
    println!("   🪙 Token: {} ({})", ledger.name(), ledger.symbol());
    println!("   🔢 Decimals: {}", ledger.decimals());
    println!("   💰 Initial supply: {}", ledger.initial_supply());
    println!("   💸 Mint fee per token: {}", mint_fee());

    Ok(())
}

/// Mint tokens by paying the fee
pub fn cmd_mint(state: &mut AppState, caller: &str, payment: U256) -> CliResult<()> {
    let event = state.ledger.mint(caller, payment)?;
    state.save()?;

    println!("✅ Minted {} token(s)!", event.amount);
    println!("   ├─ To: {}", event.to);
    println!("   ├─ Payment: {}", payment);
    println!("   └─ New balance: {}", state.ledger.balance_of(caller));

    Ok(())
}

/// Transfer tokens to another address
pub fn cmd_transfer(state: &mut AppState, from: &str, to: &str, amount: U256) -> CliResult<()> {
    let event = state.ledger.transfer(from, to, amount)?;
    state.save()?;

    println!("✅ Transferred {} token(s)!", event.amount);
    println!("   ├─ From: {} (balance {})", from, state.ledger.balance_of(from));
    println!("   └─ To:   {} (balance {})", to, state.ledger.balance_of(to));

    Ok(())
}

/// Approve a spender
pub fn cmd_approve(state: &mut AppState, owner: &str, spender: &str, amount: U256) -> CliResult<()> {
    let event = state.ledger.approve(owner, spender, amount)?;
    state.save()?;

    println!("✅ Approval set!");
    println!("   ├─ Owner: {}", event.owner);
    println!("   ├─ Spender: {}", event.spender);
    println!("   └─ Allowance: {}", event.amount);

    Ok(())
}

/// Transfer tokens on behalf of another account
pub fn cmd_transfer_from(
    state: &mut AppState,
    caller: &str,
    from: &str,
    to: &str,
    amount: U256,
) -> CliResult<()> {
    let event = state.ledger.transfer_from(caller, from, to, amount)?;
    state.save()?;

    println!("✅ Transferred {} token(s) as {}!", event.amount, caller);
    println!("   ├─ From: {} (balance {})", from, state.ledger.balance_of(from));
    println!("   ├─ To:   {} (balance {})", to, state.ledger.balance_of(to));
    if caller != from {
        println!(
            "   └─ Remaining allowance: {}",
            state.ledger.allowance(from, caller)
        );
    } else {
        println!("   └─ Self-initiated (no allowance used)");
    }

    Ok(())
}

/// Show the balance of an address
pub fn cmd_balance(state: &AppState, address: &str) -> CliResult<()> {
    println!("💰 Balance of {}: {}", address, state.ledger.balance_of(address));
    Ok(())
}

/// Show the allowance granted by an owner to a spender
pub fn cmd_allowance(state: &AppState, owner: &str, spender: &str) -> CliResult<()> {
    println!(
        "🔓 Allowance {} -> {}: {}",
        owner,
        spender,
        state.ledger.allowance(owner, spender)
    );
    Ok(())
}

/// Show ledger information
pub fn cmd_info(state: &AppState) -> CliResult<()> {
    let ledger = &state.ledger;

    println!("🪙 {} ({})", ledger.name(), ledger.symbol());
    println!("   ├─ Decimals: {}", ledger.decimals());
    println!("   ├─ Total supply: {}", ledger.total_supply());
    println!("   ├─ Initial supply: {}", initial_supply());
    println!("   ├─ Mint fee per token: {}", mint_fee());
    println!("   ├─ Holders: {}", ledger.holder_count());
    println!("   └─ Events: {}", ledger.events.len());

    let mut holders = ledger.holders();
    holders.sort_by(|a, b| a.0.cmp(b.0));

    if !holders.is_empty() {
        println!("\n   Balances:");
        for (address, balance) in holders {
            if address.as_str() == MINT_SOURCE {
                println!("   {} (mint source): {}", address, balance);
            } else {
                println!("   {}: {}", address, balance);
            }
        }
    }

    Ok(())
}

/// Show recent events
pub fn cmd_events(state: &AppState, count: usize) -> CliResult<()> {
    let events = &state.ledger.events;

    if events.is_empty() {
        println!("📭 No events yet.");
        return Ok(());
    }

    let start = events.len().saturating_sub(count);
    println!("📨 Events ({} of {}):", events.len() - start, events.len());

    for event in &events[start..] {
        match event {
            LedgerEvent::Transfer(t) => {
                println!(
                    "   [{}] Transfer {} -> {}: {}",
                    t.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    t.from,
                    t.to,
                    t.amount
                );
            }
            LedgerEvent::Approval(a) => {
                println!(
                    "   [{}] Approval {} -> {}: {}",
                    a.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    a.owner,
                    a.spender,
                    a.amount
                );
            }
        }
    }

    Ok(())
}

/// Audit the supply invariant
pub fn cmd_validate(state: &AppState) -> CliResult<()> {
    if state.ledger.validate() {
        println!("✅ Ledger is valid: sum of balances equals total supply.");
    } else {
        println!("❌ Ledger is INVALID: sum of balances does not match total supply!");
    }
    Ok(())
}

/// Export the ledger to a file
pub fn cmd_export(state: &AppState, output: &Path) -> CliResult<()> {
    save_to_file(&state.ledger, output)?;
    println!("✅ Ledger exported to {:?}", output);
    Ok(())
}

/// Import a ledger from a file
pub fn cmd_import(state: &mut AppState, input: &Path) -> CliResult<()> {
    let ledger = load_from_file(input)?;

    if !ledger.validate() {
        return Err("imported ledger fails the supply invariant".into());
    }

    state.ledger = ledger;
    state.save()?;

    println!("✅ Ledger imported from {:?}", input);
    println!("   ├─ Total supply: {}", state.ledger.total_supply());
    println!("   └─ Holders: {}", state.ledger.holder_count());

    Ok(())
}
