//! The PoorToken ledger state machine
//!
//! A single fungible token with fee-gated issuance. Anyone may mint by
//! paying the fee; transfers and delegated transfers follow ERC-20 style
//! balance and allowance rules.

use chrono::Utc;
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::ledger::events::{ApprovalEvent, LedgerEvent, TransferEvent};

/// Token name
pub const TOKEN_NAME: &str = "PoorToken";

/// Token symbol
pub const TOKEN_SYMBOL: &str = "POOR";

/// Fixed-point decimal places for token balances
pub const DECIMALS: u8 = 18;

/// Sentinel address that originates mint events and holds the initial supply
pub const MINT_SOURCE: &str = "0x0000000000000000000000000000000000000000";

/// Supply credited to the mint source at ledger creation:
/// 1,000,000 tokens at 18 decimals.
pub fn initial_supply() -> U256 {
    U256::exp10(24)
}

/// Price of one whole token, in payment-currency base units (10^16,
/// i.e. 0.01 of the payment currency's major unit).
pub fn mint_fee() -> U256 {
    U256::exp10(16)
}

/// Ledger errors
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: U256, need: U256 },
    #[error("account {spender} is not authorized to withdraw {requested} (allowance is {allowed})")]
    NotAuthorized {
        spender: String,
        allowed: U256,
        requested: U256,
    },
    #[error("insufficient payment: sent {paid}, minting one token costs {fee}")]
    InsufficientPayment { paid: U256, fee: U256 },
}

/// The single-token account ledger
///
/// Owns all balance and allowance state. Operations are atomic: any failure
/// returns before the first mutation, so state and the event log are
/// untouched on error.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Ledger {
    /// Balances: address -> amount
    balances: HashMap<String, U256>,
    /// Allowances: owner -> (spender -> amount)
    allowances: HashMap<String, HashMap<String, U256>>,
    /// Total supply, increased only by minting
    total_supply: U256,
    /// Append-only event log
    pub events: Vec<LedgerEvent>,
}

impl Ledger {
    /// Create a new ledger with the initial supply held by the mint source
    pub fn new() -> Self {
        let mut balances = HashMap::new();
        balances.insert(MINT_SOURCE.to_string(), initial_supply());

        Self {
            balances,
            allowances: HashMap::new(),
            total_supply: initial_supply(),
            events: Vec::new(),
        }
    }

    // =========================================================================
    // View functions
    // =========================================================================

    /// Get token name
    pub fn name(&self) -> &'static str {
        TOKEN_NAME
    }

    /// Get token symbol
    pub fn symbol(&self) -> &'static str {
        TOKEN_SYMBOL
    }

    /// Get decimal places
    pub fn decimals(&self) -> u8 {
        DECIMALS
    }

    /// Get total supply
    pub fn total_supply(&self) -> U256 {
        self.total_supply
    }

    /// Get the supply the ledger was created with
    pub fn initial_supply(&self) -> U256 {
        initial_supply()
    }

    /// Get balance of an address (zero for unknown addresses)
    pub fn balance_of(&self, address: &str) -> U256 {
        self.balances.get(address).copied().unwrap_or_default()
    }

    /// Get the amount `spender` may withdraw from `owner`
    pub fn allowance(&self, owner: &str, spender: &str) -> U256 {
        self.allowances
            .get(owner)
            .and_then(|spenders| spenders.get(spender))
            .copied()
            .unwrap_or_default()
    }

    /// Get all holders with non-zero balances
    pub fn holders(&self) -> Vec<(&String, &U256)> {
        self.balances.iter().filter(|(_, b)| !b.is_zero()).collect()
    }

    /// Get holder count
    pub fn holder_count(&self) -> usize {
        self.balances.values().filter(|b| !b.is_zero()).count()
    }

    /// Check the supply invariant: sum of all balances equals total supply
    pub fn validate(&self) -> bool {
        let sum = self
            .balances
            .values()
            .fold(U256::zero(), |acc, b| acc + *b);
        sum == self.total_supply
    }

    // =========================================================================
    // Mutating functions
    // =========================================================================

    /// Mint tokens by paying the per-token fee
    ///
    /// Credits `caller` with `floor(payment / fee)` whole tokens and grows
    /// the total supply by the same amount. A payment below the fee is
    /// rejected rather than silently minting zero; any remainder above a
    /// whole multiple of the fee is kept without minting.
    pub fn mint(&mut self, caller: &str, payment: U256) -> Result<TransferEvent, LedgerError> {
        let fee = mint_fee();
        if payment < fee {
            return Err(LedgerError::InsufficientPayment { paid: payment, fee });
        }

        let units = payment / fee;

        *self
            .balances
            .entry(caller.to_string())
            .or_insert_with(U256::zero) += units;
        self.total_supply += units;

        log::info!("minted {} token(s) to {}", units, caller);

        let event = TransferEvent {
            from: MINT_SOURCE.to_string(),
            to: caller.to_string(),
            amount: units,
            timestamp: Utc::now(),
        };
        self.events.push(LedgerEvent::Transfer(event.clone()));

        Ok(event)
    }

    /// Transfer tokens from the caller to another address
    ///
    /// Self-transfers succeed and leave the balance unchanged.
    pub fn transfer(
        &mut self,
        caller: &str,
        to: &str,
        amount: U256,
    ) -> Result<TransferEvent, LedgerError> {
        let have = self.balance_of(caller);
        if have < amount {
            return Err(LedgerError::InsufficientBalance { have, need: amount });
        }

        *self
            .balances
            .entry(caller.to_string())
            .or_insert_with(U256::zero) -= amount;
        *self
            .balances
            .entry(to.to_string())
            .or_insert_with(U256::zero) += amount;

        let event = TransferEvent {
            from: caller.to_string(),
            to: to.to_string(),
            amount,
            timestamp: Utc::now(),
        };
        self.events.push(LedgerEvent::Transfer(event.clone()));

        Ok(event)
    }

    /// Approve a spender to withdraw up to `amount` from the caller
    ///
    /// Overwrites any previous approval for the same spender; the new value
    /// replaces, never adds to, the old one. Can be zero to revoke. No
    /// balance check happens here; enforcement is at transfer time.
    pub fn approve(
        &mut self,
        caller: &str,
        spender: &str,
        amount: U256,
    ) -> Result<ApprovalEvent, LedgerError> {
        self.allowances
            .entry(caller.to_string())
            .or_insert_with(HashMap::new)
            .insert(spender.to_string(), amount);

        let event = ApprovalEvent {
            owner: caller.to_string(),
            spender: spender.to_string(),
            amount,
            timestamp: Utc::now(),
        };
        self.events.push(LedgerEvent::Approval(event.clone()));

        Ok(event)
    }

    /// Transfer tokens out of `from` on behalf of `caller`
    ///
    /// When `caller == from` this is a self-initiated transfer with no
    /// allowance check or mutation. Otherwise `caller` must hold a
    /// sufficient allowance from `from`, which is consumed by the transfer.
    /// Authorization is checked before balance sufficiency, so an unapproved
    /// caller always observes `NotAuthorized`.
    pub fn transfer_from(
        &mut self,
        caller: &str,
        from: &str,
        to: &str,
        amount: U256,
    ) -> Result<TransferEvent, LedgerError> {
        let delegated = caller != from;

        if delegated {
            let allowed = self.allowance(from, caller);
            if allowed < amount {
                return Err(LedgerError::NotAuthorized {
                    spender: caller.to_string(),
                    allowed,
                    requested: amount,
                });
            }
        }

        let have = self.balance_of(from);
        if have < amount {
            return Err(LedgerError::InsufficientBalance { have, need: amount });
        }

        *self
            .balances
            .entry(from.to_string())
            .or_insert_with(U256::zero) -= amount;
        *self
            .balances
            .entry(to.to_string())
            .or_insert_with(U256::zero) += amount;

        // The allowance check above bounds `amount`, so this never underflows.
        if delegated {
            if let Some(spenders) = self.allowances.get_mut(from) {
                if let Some(allowance) = spenders.get_mut(caller) {
                    *allowance -= amount;
                }
            }
        }

        let event = TransferEvent {
            from: from.to_string(),
            to: to.to_string(),
            amount,
            timestamp: Utc::now(),
        };
        self.events.push(LedgerEvent::Transfer(event.clone()));

        Ok(event)
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mint `count` whole tokens to `caller`, one fee-unit per call,
    /// mirroring how issuance happens in practice.
    fn mint_tokens(ledger: &mut Ledger, caller: &str, count: u64) {
        for _ in 0..count {
            ledger.mint(caller, mint_fee()).unwrap();
        }
    }

    #[test]
    fn test_ledger_creation() {
        let ledger = Ledger::new();

        assert_eq!(ledger.name(), "PoorToken");
        assert_eq!(ledger.symbol(), "POOR");
        assert_eq!(ledger.decimals(), 18);
        assert_eq!(ledger.total_supply(), initial_supply());
        assert_eq!(ledger.initial_supply(), U256::exp10(24));
        assert_eq!(ledger.balance_of(MINT_SOURCE), initial_supply());
        assert_eq!(ledger.balance_of("owner"), U256::zero());
        assert!(ledger.validate());
        assert!(ledger.events.is_empty());
    }

    #[test]
    fn test_mint_single_unit() {
        let mut ledger = Ledger::new();

        let event = ledger.mint("owner", mint_fee()).unwrap();

        assert_eq!(event.from, MINT_SOURCE);
        assert_eq!(event.to, "owner");
        assert_eq!(event.amount, U256::from(1u64));
        assert_eq!(ledger.balance_of("owner"), U256::from(1u64));
        assert_eq!(
            ledger.total_supply(),
            initial_supply() + U256::from(1u64)
        );
        assert!(ledger.validate());
    }

    #[test]
    fn test_mint_multiple_units() {
        let mut ledger = Ledger::new();

        // One large payment mints floor(payment / fee) units
        ledger.mint("owner", mint_fee() * U256::from(5u64)).unwrap();
        assert_eq!(ledger.balance_of("owner"), U256::from(5u64));

        // Repeated single-fee calls accumulate
        mint_tokens(&mut ledger, "owner", 5);
        assert_eq!(ledger.balance_of("owner"), U256::from(10u64));
        assert_eq!(
            ledger.total_supply(),
            initial_supply() + U256::from(10u64)
        );
        assert!(ledger.validate());
    }

    #[test]
    fn test_mint_floors_partial_payment() {
        let mut ledger = Ledger::new();

        // 2.5 fees mints exactly 2 tokens
        let payment = mint_fee() * U256::from(2u64) + mint_fee() / U256::from(2u64);
        let event = ledger.mint("owner", payment).unwrap();

        assert_eq!(event.amount, U256::from(2u64));
        assert_eq!(ledger.balance_of("owner"), U256::from(2u64));
    }

    #[test]
    fn test_mint_insufficient_payment() {
        let mut ledger = Ledger::new();

        let result = ledger.mint("owner", mint_fee() - U256::from(1u64));
        assert!(matches!(
            result,
            Err(LedgerError::InsufficientPayment { .. })
        ));

        // Rejected call leaves no trace
        assert_eq!(ledger.balance_of("owner"), U256::zero());
        assert_eq!(ledger.total_supply(), initial_supply());
        assert!(ledger.events.is_empty());
    }

    #[test]
    fn test_transfer() {
        let mut ledger = Ledger::new();
        mint_tokens(&mut ledger, "owner", 2);

        let event = ledger
            .transfer("owner", "other", U256::from(1u64))
            .unwrap();

        assert_eq!(event.from, "owner");
        assert_eq!(event.to, "other");
        assert_eq!(event.amount, U256::from(1u64));
        assert_eq!(ledger.balance_of("owner"), U256::from(1u64));
        assert_eq!(ledger.balance_of("other"), U256::from(1u64));

        ledger.transfer("owner", "other", U256::from(1u64)).unwrap();
        assert_eq!(ledger.balance_of("owner"), U256::zero());
        assert_eq!(ledger.balance_of("other"), U256::from(2u64));
        assert!(ledger.validate());
    }

    #[test]
    fn test_transfer_insufficient_balance() {
        let mut ledger = Ledger::new();
        mint_tokens(&mut ledger, "owner", 3);

        let events_before = ledger.events.len();
        let result = ledger.transfer("owner", "other", U256::from(4u64));

        match result {
            Err(LedgerError::InsufficientBalance { have, need }) => {
                assert_eq!(have, U256::from(3u64));
                assert_eq!(need, U256::from(4u64));
            }
            other => panic!("expected InsufficientBalance, got {:?}", other),
        }

        // Balances unchanged, nothing emitted
        assert_eq!(ledger.balance_of("owner"), U256::from(3u64));
        assert_eq!(ledger.balance_of("other"), U256::zero());
        assert_eq!(ledger.events.len(), events_before);
    }

    #[test]
    fn test_transfer_from_empty_account() {
        let mut ledger = Ledger::new();

        let result = ledger.transfer("owner", "other", U256::from(3u64));
        assert!(matches!(
            result,
            Err(LedgerError::InsufficientBalance { .. })
        ));
    }

    #[test]
    fn test_self_transfer() {
        let mut ledger = Ledger::new();
        mint_tokens(&mut ledger, "owner", 5);

        ledger.transfer("owner", "owner", U256::from(3u64)).unwrap();

        assert_eq!(ledger.balance_of("owner"), U256::from(5u64));
        assert!(ledger.validate());
    }

    #[test]
    fn test_approve_and_allowance() {
        let mut ledger = Ledger::new();

        assert_eq!(ledger.allowance("owner", "spender"), U256::zero());

        let event = ledger
            .approve("owner", "spender", U256::from(3u64))
            .unwrap();
        assert_eq!(event.owner, "owner");
        assert_eq!(event.spender, "spender");
        assert_eq!(event.amount, U256::from(3u64));
        assert_eq!(ledger.allowance("owner", "spender"), U256::from(3u64));
    }

    #[test]
    fn test_approve_overwrites() {
        let mut ledger = Ledger::new();

        ledger.approve("owner", "spender", U256::from(3u64)).unwrap();
        ledger.approve("owner", "spender", U256::from(6u64)).unwrap();

        // Second approval replaces the first, it does not accumulate
        assert_eq!(ledger.allowance("owner", "spender"), U256::from(6u64));

        // Zero revokes
        ledger.approve("owner", "spender", U256::zero()).unwrap();
        assert_eq!(ledger.allowance("owner", "spender"), U256::zero());
    }

    #[test]
    fn test_approve_may_exceed_balance() {
        let mut ledger = Ledger::new();

        ledger
            .approve("owner", "spender", U256::from(1_000u64))
            .unwrap();
        assert_eq!(ledger.allowance("owner", "spender"), U256::from(1_000u64));
    }

    #[test]
    fn test_transfer_from_self_path() {
        let mut ledger = Ledger::new();
        mint_tokens(&mut ledger, "owner", 20);
        ledger.approve("owner", "spender", U256::from(2u64)).unwrap();

        // Caller == from: no allowance is needed or consumed
        ledger
            .transfer_from("owner", "owner", "other", U256::from(5u64))
            .unwrap();

        assert_eq!(ledger.balance_of("owner"), U256::from(15u64));
        assert_eq!(ledger.balance_of("other"), U256::from(5u64));
        assert_eq!(ledger.allowance("owner", "spender"), U256::from(2u64));
    }

    #[test]
    fn test_transfer_from_delegated_path() {
        let mut ledger = Ledger::new();
        mint_tokens(&mut ledger, "owner", 20);
        ledger
            .approve("owner", "spender", U256::from(10u64))
            .unwrap();

        let event = ledger
            .transfer_from("spender", "owner", "spender", U256::from(10u64))
            .unwrap();

        assert_eq!(event.from, "owner");
        assert_eq!(event.to, "spender");
        assert_eq!(ledger.balance_of("owner"), U256::from(10u64));
        assert_eq!(ledger.balance_of("spender"), U256::from(10u64));
        assert_eq!(ledger.allowance("owner", "spender"), U256::zero());

        // Allowance is spent; the next delegated withdrawal is refused
        let result = ledger.transfer_from("spender", "owner", "spender", U256::from(1u64));
        match result {
            Err(LedgerError::NotAuthorized { spender, .. }) => {
                assert_eq!(spender, "spender");
            }
            other => panic!("expected NotAuthorized, got {:?}", other),
        }
        assert!(ledger.validate());
    }

    #[test]
    fn test_transfer_from_partial_allowance() {
        let mut ledger = Ledger::new();
        mint_tokens(&mut ledger, "owner", 4);
        ledger.approve("owner", "spender", U256::from(4u64)).unwrap();

        ledger
            .transfer_from("spender", "owner", "spender", U256::from(2u64))
            .unwrap();

        assert_eq!(ledger.allowance("owner", "spender"), U256::from(2u64));
    }

    #[test]
    fn test_transfer_from_unauthorized_by_default() {
        let mut ledger = Ledger::new();
        mint_tokens(&mut ledger, "owner", 3);

        // No approval exists, regardless of the owner's balance
        let result = ledger.transfer_from("spender", "owner", "spender", U256::from(3u64));
        match result {
            Err(LedgerError::NotAuthorized {
                spender,
                allowed,
                requested,
            }) => {
                assert_eq!(spender, "spender");
                assert_eq!(allowed, U256::zero());
                assert_eq!(requested, U256::from(3u64));
            }
            other => panic!("expected NotAuthorized, got {:?}", other),
        }
    }

    #[test]
    fn test_transfer_from_checks_authorization_first() {
        let mut ledger = Ledger::new();
        mint_tokens(&mut ledger, "owner", 1);

        // Both allowance and balance are insufficient; authorization loses
        let result = ledger.transfer_from("spender", "owner", "spender", U256::from(5u64));
        assert!(matches!(result, Err(LedgerError::NotAuthorized { .. })));

        // With enough allowance the balance check surfaces instead
        ledger.approve("owner", "spender", U256::from(5u64)).unwrap();
        let result = ledger.transfer_from("spender", "owner", "spender", U256::from(5u64));
        assert!(matches!(
            result,
            Err(LedgerError::InsufficientBalance { .. })
        ));
    }

    #[test]
    fn test_event_log_ordering() {
        let mut ledger = Ledger::new();
        ledger.mint("owner", mint_fee()).unwrap();
        ledger.approve("owner", "spender", U256::from(1u64)).unwrap();
        ledger.transfer("owner", "other", U256::from(1u64)).unwrap();

        assert_eq!(ledger.events.len(), 3);
        assert!(matches!(ledger.events[0], LedgerEvent::Transfer(_)));
        assert!(matches!(ledger.events[1], LedgerEvent::Approval(_)));
        assert!(matches!(ledger.events[2], LedgerEvent::Transfer(_)));
    }

    #[test]
    fn test_end_to_end_scenario() {
        let mut ledger = Ledger::new();

        // Mint 5 to owner
        mint_tokens(&mut ledger, "owner", 5);
        assert_eq!(ledger.balance_of("owner"), U256::from(5u64));

        // Approve spender for 3 and let it withdraw
        ledger.approve("owner", "spender", U256::from(3u64)).unwrap();
        ledger
            .transfer_from("spender", "owner", "spender", U256::from(3u64))
            .unwrap();

        assert_eq!(ledger.balance_of("owner"), U256::from(2u64));
        assert_eq!(ledger.balance_of("spender"), U256::from(3u64));
        assert_eq!(ledger.allowance("owner", "spender"), U256::zero());

        // Owner only has 2 left
        let result = ledger.transfer("owner", "spender", U256::from(3u64));
        assert!(matches!(
            result,
            Err(LedgerError::InsufficientBalance { .. })
        ));

        assert!(ledger.validate());
    }
}
