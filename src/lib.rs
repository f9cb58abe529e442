//! PoorToken: a fee-gated fungible token ledger in Rust
//!
//! This crate provides a single-token account ledger featuring:
//! - Fee-gated minting open to any account
//! - ERC-20 style transfers and delegated transfers (allowances)
//! - An append-only event log for transfers and approvals
//! - JSON persistence with atomic writes and rotating backups
//! - A CLI for operating on a persisted ledger
//!
//! # Example
//!
//! ```rust
//! use poor_token::ledger::{mint_fee, Ledger};
//! use primitive_types::U256;
//!
//! let mut ledger = Ledger::new();
//!
//! // Mint five tokens by paying five fees at once
//! ledger.mint("alice", mint_fee() * U256::from(5u64)).unwrap();
//! assert_eq!(ledger.balance_of("alice"), U256::from(5u64));
//!
//! // Delegate three of them to bob, who withdraws them
//! ledger.approve("alice", "bob", U256::from(3u64)).unwrap();
//! ledger.transfer_from("bob", "alice", "bob", U256::from(3u64)).unwrap();
//!
//! assert_eq!(ledger.balance_of("alice"), U256::from(2u64));
//! assert_eq!(ledger.balance_of("bob"), U256::from(3u64));
//! assert!(ledger.validate());
//! ```

pub mod cli;
pub mod ledger;
pub mod storage;

// Re-export commonly used types
pub use ledger::{
    initial_supply, mint_fee, ApprovalEvent, Ledger, LedgerError, LedgerEvent, TransferEvent,
    DECIMALS, MINT_SOURCE, TOKEN_NAME, TOKEN_SYMBOL,
};
pub use storage::{Storage, StorageConfig, StorageError};
