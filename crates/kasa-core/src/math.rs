//! Pure mathematical functions for the kasa protocol
//! All functions are deterministic and use checked integer arithmetic
//! No state, fully testable in isolation

use crate::constants::{DEFAULT_PRICE_DECIMALS, RATIO_PRECISION};
use crate::error::{KasaError, Result};
use crate::state::{RiskParameters, SystemMode};

/// Fixed-point divisor for a price quoted with `price_decimals` decimals
///
/// # Returns
/// `10^price_decimals`, or `ArithmeticOverflow` if it does not fit in u128
pub fn price_scale(price_decimals: u8) -> Result<u128> {
  10u128
    .checked_pow(u32::from(price_decimals))
    .ok_or(KasaError::ArithmeticOverflow)
}

/// Compute the collateral ratio of a kasa as an integer percentage
///
/// ratio = (collateral_amount * collateral_price * 100) / debt_amount
///
/// # Arguments
/// * `collateral_amount` - Collateral held, in the smallest collateral unit
/// * `debt_amount` - Debt minted, in the smallest stable coin unit
/// * `collateral_price` - Value of one collateral unit in stable coin units
///
/// # Returns
/// Ratio in percent, floored (e.g., 150 = 150%)
pub fn calculate_collateral_ratio(
  collateral_amount: u64,
  debt_amount: u64,
  collateral_price: u64,
) -> Result<u128> {
  calculate_collateral_ratio_with_precision(
    collateral_amount,
    debt_amount,
    collateral_price,
    DEFAULT_PRICE_DECIMALS,
  )
}

/// Compute the collateral ratio for a price carrying `price_decimals` decimals
///
/// ratio = (collateral_amount * collateral_price * 100) / (debt_amount * 10^price_decimals)
///
/// The whole computation runs in u128. Nothing wraps: an oversized
/// intermediate is reported as `ArithmeticOverflow`.
pub fn calculate_collateral_ratio_with_precision(
  collateral_amount: u64,
  debt_amount: u64,
  collateral_price: u64,
  price_decimals: u8,
) -> Result<u128> {
  require!(debt_amount > 0, KasaError::InvalidDebtAmount);

  let scale = price_scale(price_decimals)?;

  let collateral_value = u128::from(collateral_amount)
    .checked_mul(u128::from(collateral_price))
    .ok_or(KasaError::ArithmeticOverflow)?;

  let numerator = collateral_value
    .checked_mul(RATIO_PRECISION)
    .ok_or(KasaError::ArithmeticOverflow)?;

  let denominator = u128::from(debt_amount)
    .checked_mul(scale)
    .ok_or(KasaError::ArithmeticOverflow)?;

  Ok(numerator / denominator)
}

/// Minimum ratio a kasa must hold under `mode`
pub fn required_collateral_ratio(params: &RiskParameters, mode: SystemMode) -> u64 {
  match mode {
    SystemMode::Normal => params.minimum_collateral_ratio(),
    SystemMode::Recovery => params.critical_collateral_ratio(),
  }
}

/// Decide whether a kasa satisfies the default risk policy
///
/// # Arguments
/// * `is_recovery_mode` - Whether the protocol is in recovery mode
/// * `collateral_amount` - Collateral held
/// * `debt_amount` - Debt minted, must be non-zero
/// * `collateral_price` - Value of one collateral unit
///
/// # Returns
/// `ratio >= 150` in recovery mode, `ratio >= 110` otherwise
pub fn is_position_healthy(
  is_recovery_mode: bool,
  collateral_amount: u64,
  debt_amount: u64,
  collateral_price: u64,
) -> Result<bool> {
  is_position_healthy_with(
    &RiskParameters::default(),
    SystemMode::from(is_recovery_mode),
    collateral_amount,
    debt_amount,
    collateral_price,
  )
}

/// Health predicate driven by an explicit risk policy
pub fn is_position_healthy_with(
  params: &RiskParameters,
  mode: SystemMode,
  collateral_amount: u64,
  debt_amount: u64,
  collateral_price: u64,
) -> Result<bool> {
  let ratio = calculate_collateral_ratio_with_precision(
    collateral_amount,
    debt_amount,
    collateral_price,
    params.price_decimals(),
  )?;

  Ok(ratio >= u128::from(required_collateral_ratio(params, mode)))
}
