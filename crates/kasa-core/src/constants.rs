//! Protocol-wide constants
//! Centralized location for the default risk policy

// RATIO PRECISION
pub const RATIO_PRECISION: u128 = 100;          // ratios are whole percent (150 = 150%)

// RISK PARAMETERS
pub const MINIMUM_COLLATERAL_RATIO: u64 = 110;  // 110%, normal mode
pub const CRITICAL_COLLATERAL_RATIO: u64 = 150; // 150%, recovery mode

// PRICE SCALE
pub const DEFAULT_PRICE_DECIMALS: u8 = 0;       // price multiplies straight into collateral
pub const MAX_PRICE_DECIMALS: u8 = 18;
