//! Stable coin supply accounting
//! Tracks per-holder balances and the total supply minted against kasas

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{KasaError, Result};
use crate::events::{ProtocolEvent, StableCoinBurned, StableCoinMinted};
use crate::invariants::{assert_amount_nonzero, assert_supply_covers};

static NEXT_LEDGER_ID: AtomicU64 = AtomicU64::new(1);

/// Capability authorising supply changes on the ledger that issued it
///
/// Not `Clone`: the owner of the value holds the permission.
#[derive(Debug, PartialEq, Eq)]
pub struct AdminCap {
  ledger_id: u64,
}

/// Stable coin ledger - the single writer for supply and balances
#[derive(Debug)]
pub struct StableCoinLedger {
  id: u64,
  total_supply: u64,
  balances: BTreeMap<String, u64>,
}

impl StableCoinLedger {
  /// Create an empty ledger together with its only admin capability
  pub fn new() -> (Self, AdminCap) {
    let id = NEXT_LEDGER_ID.fetch_add(1, Ordering::Relaxed);
    let ledger = Self {
      id,
      total_supply: 0,
      balances: BTreeMap::new(),
    };
    (ledger, AdminCap { ledger_id: id })
  }

  pub fn total_supply(&self) -> u64 {
    self.total_supply
  }

  pub fn balance_of(&self, holder: &str) -> u64 {
    self.balances.get(holder).copied().unwrap_or(0)
  }

  pub fn holders(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
    self.balances.iter().map(|(holder, balance)| (holder.as_str(), *balance))
  }

  fn check_cap(&self, cap: &AdminCap) -> Result<()> {
    require!(cap.ledger_id == self.id, KasaError::Unauthorized);
    Ok(())
  }

  /// Mint stable coin to `holder`
  ///
  /// # Returns
  /// The new total supply. On error the ledger is left untouched.
  pub fn mint(&mut self, cap: &AdminCap, holder: &str, amount: u64) -> Result<u64> {
    self.check_cap(cap)?;
    assert_amount_nonzero(amount)?;

    let new_balance = self
      .balance_of(holder)
      .checked_add(amount)
      .ok_or(KasaError::MathOverflow)?;
    let new_supply = self
      .total_supply
      .checked_add(amount)
      .ok_or(KasaError::MathOverflow)?;

    self.balances.insert(holder.to_owned(), new_balance);
    self.total_supply = new_supply;

    StableCoinMinted {
      holder: holder.to_owned(),
      amount,
      total_supply: new_supply,
    }
    .emit();

    Ok(new_supply)
  }

  /// Burn stable coin held by `holder`
  ///
  /// # Returns
  /// The new total supply. On error the ledger is left untouched.
  pub fn burn(&mut self, cap: &AdminCap, holder: &str, amount: u64) -> Result<u64> {
    self.check_cap(cap)?;
    assert_amount_nonzero(amount)?;

    let balance = self.balance_of(holder);
    assert_supply_covers(balance, amount)?;

    let new_supply = self
      .total_supply
      .checked_sub(amount)
      .ok_or(KasaError::InsufficientSupply)?;
    let new_balance = balance - amount;

    if new_balance == 0 {
      self.balances.remove(holder);
    } else {
      self.balances.insert(holder.to_owned(), new_balance);
    }
    self.total_supply = new_supply;

    StableCoinBurned {
      holder: holder.to_owned(),
      amount,
      total_supply: new_supply,
    }
    .emit();

    Ok(new_supply)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_mint_and_burn() {
    let (mut ledger, cap) = StableCoinLedger::new();

    assert_eq!(ledger.mint(&cap, "alice", 500).unwrap(), 500);
    assert_eq!(ledger.mint(&cap, "bob", 250).unwrap(), 750);
    assert_eq!(ledger.balance_of("alice"), 500);

    assert_eq!(ledger.burn(&cap, "alice", 200).unwrap(), 550);
    assert_eq!(ledger.balance_of("alice"), 300);
    assert_eq!(ledger.total_supply(), 550);
  }

  #[test]
  fn test_burn_full_balance_removes_holder() {
    let (mut ledger, cap) = StableCoinLedger::new();
    ledger.mint(&cap, "alice", 100).unwrap();
    ledger.burn(&cap, "alice", 100).unwrap();

    assert_eq!(ledger.holders().count(), 0);
    assert_eq!(ledger.total_supply(), 0);
  }

  #[test]
  fn test_zero_amount_rejected() {
    let (mut ledger, cap) = StableCoinLedger::new();
    assert_eq!(ledger.mint(&cap, "alice", 0), Err(KasaError::ZeroAmount));
    assert_eq!(ledger.burn(&cap, "alice", 0), Err(KasaError::ZeroAmount));
  }

  #[test]
  fn test_burn_more_than_balance() {
    let (mut ledger, cap) = StableCoinLedger::new();
    ledger.mint(&cap, "alice", 100).unwrap();
    ledger.mint(&cap, "bob", 100).unwrap();

    // total supply covers it, alice's balance does not
    assert_eq!(
      ledger.burn(&cap, "alice", 150),
      Err(KasaError::InsufficientSupply)
    );
    assert_eq!(ledger.balance_of("alice"), 100);
    assert_eq!(ledger.total_supply(), 200);
  }

  #[test]
  fn test_mint_overflow_leaves_state() {
    let (mut ledger, cap) = StableCoinLedger::new();
    ledger.mint(&cap, "alice", u64::MAX).unwrap();

    assert_eq!(ledger.mint(&cap, "bob", 1), Err(KasaError::MathOverflow));
    assert_eq!(ledger.balance_of("bob"), 0);
    assert_eq!(ledger.total_supply(), u64::MAX);
  }

  #[test]
  fn test_foreign_cap_rejected() {
    let (mut ledger, _cap) = StableCoinLedger::new();
    let (_other, foreign_cap) = StableCoinLedger::new();

    assert_eq!(
      ledger.mint(&foreign_cap, "alice", 10),
      Err(KasaError::Unauthorized)
    );
    assert_eq!(ledger.total_supply(), 0);
  }
}
