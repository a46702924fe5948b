use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum KasaError {
  #[error("Debt amount must be greater than zero - collateral ratio is undefined")]
  InvalidDebtAmount,

  #[error("Arithmetic overflow in collateral ratio computation")]
  ArithmeticOverflow,

  #[error("Collateral ratio is below the threshold required by the current system mode")]
  CollateralRatioTooLow,

  #[error("Amount must be greater than zero")]
  ZeroAmount,

  #[error("Math overflow occurred - values exceeded u64 bounds")]
  MathOverflow,

  #[error("Insufficient token supply to burn - check your balance")]
  InsufficientSupply,

  #[error("Admin capability was not issued by this ledger")]
  Unauthorized,

  #[error("Invalid parameter value provided")]
  InvalidParameter,
}

pub type Result<T> = std::result::Result<T, KasaError>;
