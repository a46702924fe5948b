//! Invariant assertions for the kasa protocol
//! These are the rules that protect protocol solvency
//! Every operation that moves value MUST call these before committing

use crate::error::{KasaError, Result};
use crate::math::required_collateral_ratio;
use crate::state::{Kasa, RiskParameters, SystemMode};

/// Assert that a collateral ratio clears the required threshold
///
/// # Arguments
/// * `ratio` - Current collateral ratio in percent
/// * `required_ratio` - Minimum allowed ratio in percent (inclusive)
pub fn assert_cr_above_minimum(ratio: u128, required_ratio: u64) -> Result<()> {
  require!(
    ratio >= u128::from(required_ratio),
    KasaError::CollateralRatioTooLow
  );
  Ok(())
}

/// Assert that a kasa is healthy under the prevailing system mode
///
/// Gates minting more debt against the kasa or withdrawing its collateral.
/// Evaluator failures (zero debt, overflow) are propagated unchanged.
pub fn assert_kasa_healthy(
  kasa: &Kasa,
  mode: SystemMode,
  collateral_price: u64,
  params: &RiskParameters,
) -> Result<()> {
  let ratio = kasa.collateral_ratio(collateral_price, params)?;
  let required = required_collateral_ratio(params, mode);

  if let Err(err) = assert_cr_above_minimum(ratio, required) {
    tracing::debug!(
      collateral_ratio = %ratio,
      required_ratio = required,
      recovery_mode = mode.is_recovery(),
      "kasa below required collateral ratio"
    );
    return Err(err);
  }
  Ok(())
}

/// Assert that an amount is non-zero
pub fn assert_amount_nonzero(amount: u64) -> Result<()> {
  require!(amount > 0, KasaError::ZeroAmount);
  Ok(())
}

/// Assert that a supply or balance can cover a burn of `amount`
pub fn assert_supply_covers(supply: u64, amount: u64) -> Result<()> {
  require!(supply >= amount, KasaError::InsufficientSupply);
  Ok(())
}
