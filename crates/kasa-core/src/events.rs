//! Structured protocol events
//! Each event is serialized to JSON and logged through `tracing`

use serde::Serialize;

pub trait ProtocolEvent: Serialize {
  const NAME: &'static str;

  fn emit(&self) {
    match serde_json::to_string(self) {
      Ok(payload) => tracing::info!(event = Self::NAME, %payload, "protocol event"),
      Err(err) => tracing::warn!(event = Self::NAME, error = %err, "failed to serialize protocol event"),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KasaHealthEvaluated {
  pub kasa_id: String,
  pub collateral_amount: u64,
  pub debt_amount: u64,
  pub collateral_price: u64,
  pub collateral_ratio: u128,
  pub required_ratio: u64,
  pub recovery_mode: bool,
  pub healthy: bool,
}

impl ProtocolEvent for KasaHealthEvaluated {
  const NAME: &'static str = "kasa_health_evaluated";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StableCoinMinted {
  pub holder: String,
  pub amount: u64,
  pub total_supply: u64,
}

impl ProtocolEvent for StableCoinMinted {
  const NAME: &'static str = "stable_coin_minted";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StableCoinBurned {
  pub holder: String,
  pub amount: u64,
  pub total_supply: u64,
}

impl ProtocolEvent for StableCoinBurned {
  const NAME: &'static str = "stable_coin_burned";
}
