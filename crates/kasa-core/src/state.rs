//! Position and policy types for the kasa protocol

use serde::{Deserialize, Serialize};

use crate::constants::{
  CRITICAL_COLLATERAL_RATIO, DEFAULT_PRICE_DECIMALS, MAX_PRICE_DECIMALS, MINIMUM_COLLATERAL_RATIO,
};
use crate::error::{KasaError, Result};
use crate::math;

/// Protocol-wide risk regime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemMode {
  #[default]
  Normal,
  /// Stricter regime, kasas must clear the critical ratio
  Recovery,
}

impl SystemMode {
  pub fn is_recovery(self) -> bool {
    matches!(self, SystemMode::Recovery)
  }
}

impl From<bool> for SystemMode {
  fn from(is_recovery_mode: bool) -> Self {
    if is_recovery_mode {
      SystemMode::Recovery
    } else {
      SystemMode::Normal
    }
  }
}

/// A single collateralized debt position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kasa {
  /// Collateral held, in the smallest collateral unit
  pub collateral_amount: u64,

  /// Stable coin minted against the collateral, in its smallest unit
  pub debt_amount: u64,
}

impl Kasa {
  pub fn new(collateral_amount: u64, debt_amount: u64) -> Self {
    Self {
      collateral_amount,
      debt_amount,
    }
  }

  pub fn collateral_ratio(&self, collateral_price: u64, params: &RiskParameters) -> Result<u128> {
    math::calculate_collateral_ratio_with_precision(
      self.collateral_amount,
      self.debt_amount,
      collateral_price,
      params.price_decimals(),
    )
  }

  pub fn is_healthy(
    &self,
    mode: SystemMode,
    collateral_price: u64,
    params: &RiskParameters,
  ) -> Result<bool> {
    math::is_position_healthy_with(
      params,
      mode,
      self.collateral_amount,
      self.debt_amount,
      collateral_price,
    )
  }
}

/// Risk policy applied by the health predicate
///
/// Thresholds are whole percentages. `price_decimals` declares the
/// fixed-point scale of the collateral price, 0 meaning a raw integer price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskParameters {
  minimum_collateral_ratio: u64,
  critical_collateral_ratio: u64,
  price_decimals: u8,
}

impl RiskParameters {
  /// # Errors
  /// `InvalidParameter` unless `0 < minimum <= critical` and
  /// `price_decimals <= MAX_PRICE_DECIMALS`
  pub fn new(
    minimum_collateral_ratio: u64,
    critical_collateral_ratio: u64,
    price_decimals: u8,
  ) -> Result<Self> {
    require!(minimum_collateral_ratio > 0, KasaError::InvalidParameter);
    require!(
      minimum_collateral_ratio <= critical_collateral_ratio,
      KasaError::InvalidParameter
    );
    require!(price_decimals <= MAX_PRICE_DECIMALS, KasaError::InvalidParameter);

    Ok(Self {
      minimum_collateral_ratio,
      critical_collateral_ratio,
      price_decimals,
    })
  }

  pub fn minimum_collateral_ratio(&self) -> u64 {
    self.minimum_collateral_ratio
  }

  pub fn critical_collateral_ratio(&self) -> u64 {
    self.critical_collateral_ratio
  }

  pub fn price_decimals(&self) -> u8 {
    self.price_decimals
  }
}

impl Default for RiskParameters {
  fn default() -> Self {
    Self {
      minimum_collateral_ratio: MINIMUM_COLLATERAL_RATIO,
      critical_collateral_ratio: CRITICAL_COLLATERAL_RATIO,
      price_decimals: DEFAULT_PRICE_DECIMALS,
    }
  }
}
