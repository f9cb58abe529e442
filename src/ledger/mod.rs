//! The PoorToken ledger
//!
//! A single fungible token with:
//! - Balances per address
//! - Allowances for delegated transfers
//! - Fee-gated minting open to anyone
//! - An append-only event log
//!
//! # Example
//!
//! ```rust
//! use poor_token::ledger::{mint_fee, Ledger};
//! use primitive_types::U256;
//!
//! let mut ledger = Ledger::new();
//!
//! // Mint one token by paying the fee
//! ledger.mint("alice", mint_fee()).unwrap();
//! assert_eq!(ledger.balance_of("alice"), U256::from(1u64));
//!
//! // Transfer it
//! ledger.transfer("alice", "bob", U256::from(1u64)).unwrap();
//! assert_eq!(ledger.balance_of("bob"), U256::from(1u64));
//! ```

pub mod events;
pub mod ledger;

pub use events::{ApprovalEvent, LedgerEvent, TransferEvent};
pub use ledger::{
    initial_supply, mint_fee, Ledger, LedgerError, DECIMALS, MINT_SOURCE, TOKEN_NAME, TOKEN_SYMBOL,
};
