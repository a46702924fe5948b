//! Kasa protocol core
//! Collateral health evaluation, stable coin supply accounting and the
//! invariants that gate value movement

/// Return early with `$err` unless `$cond` holds
macro_rules! require {
  ($cond:expr, $err:expr $(,)?) => {
    if !($cond) {
      return Err($err);
    }
  };
}

pub mod constants;
pub mod error;
pub mod events;
pub mod invariants;
pub mod ledger;
pub mod math;
pub mod state;

pub use error::{KasaError, Result};
pub use ledger::{AdminCap, StableCoinLedger};
pub use math::{calculate_collateral_ratio, is_position_healthy};
pub use state::{Kasa, RiskParameters, SystemMode};
