mod snapshot;

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use kasa_config::KasaConfig;
use kasa_core::{RiskParameters, SystemMode};

use crate::snapshot::Snapshot;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    kasa_telemetry::init("keeper=info,kasa_core=info")?;

    tracing::info!("Kasa keeper starting...");

    let config = KasaConfig::from_env()?;
    let params = RiskParameters::new(
        config.minimum_collateral_ratio,
        config.critical_collateral_ratio,
        config.price_decimals,
    )
    .context("invalid risk parameters")?;
    let default_mode = SystemMode::from(config.recovery_mode);

    tracing::info!(
        minimum_collateral_ratio = params.minimum_collateral_ratio(),
        critical_collateral_ratio = params.critical_collateral_ratio(),
        price_decimals = params.price_decimals(),
        recovery_mode = default_mode.is_recovery(),
        snapshot = %config.snapshot_path.display(),
        interval_ms = config.keeper_interval_ms,
        "Keeper configured"
    );

    let mut ticker = tokio::time::interval(Duration::from_millis(config.keeper_interval_ms));
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = run_pass(&config.snapshot_path, default_mode, &params).await {
                    tracing::error!(error = %e, "Keeper pass failed");
                }
            }
            _ = &mut shutdown => {
                tracing::info!("Received shutdown signal, stopping gracefully...");
                break;
            }
        }
    }

    tracing::info!("Kasa keeper stopped.");
    Ok(())
}

async fn run_pass(path: &Path, default_mode: SystemMode, params: &RiskParameters) -> anyhow::Result<()> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading snapshot {}", path.display()))?;
    let snapshot = Snapshot::from_json(&raw).context("parsing snapshot")?;

    let summary = snapshot::evaluate(&snapshot, default_mode, params);
    tracing::info!(
        evaluated = summary.evaluated,
        unhealthy = summary.unhealthy,
        skipped = summary.skipped,
        "Keeper pass complete"
    );

    Ok(())
}
