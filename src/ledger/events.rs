//! Ledger event types
//!
//! Every successful mutating operation appends exactly one event to the
//! ledger's log and returns it to the caller. Failed operations emit nothing.

use chrono::{DateTime, Utc};
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// Transfer event (emitted when tokens move, including mints)
///
/// Mints use the mint-source sentinel address as `from`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransferEvent {
    pub from: String,
    pub to: String,
    pub amount: U256,
    pub timestamp: DateTime<Utc>,
}

/// Approval event (emitted when an allowance is set)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApprovalEvent {
    pub owner: String,
    pub spender: String,
    pub amount: U256,
    pub timestamp: DateTime<Utc>,
}

/// A single entry in the ledger's append-only event log
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum LedgerEvent {
    Transfer(TransferEvent),
    Approval(ApprovalEvent),
}
