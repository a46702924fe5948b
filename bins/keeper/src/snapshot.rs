use kasa_core::events::{KasaHealthEvaluated, ProtocolEvent};
use kasa_core::math::required_collateral_ratio;
use kasa_core::{Kasa, KasaError, RiskParameters, SystemMode};
use serde::Deserialize;

/// Point-in-time view of the kasas and the oracle price they are judged at.
#[derive(Debug, Clone, Deserialize)]
pub struct Snapshot {
    pub collateral_price: u64,

    /// Overrides the configured system mode when present
    #[serde(default)]
    pub recovery_mode: Option<bool>,

    pub kasas: Vec<KasaEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KasaEntry {
    pub id: String,
    pub collateral_amount: u64,
    pub debt_amount: u64,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PassSummary {
    pub evaluated: usize,
    pub unhealthy: usize,
    pub skipped: usize,
}

impl Snapshot {
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    pub fn mode(&self, default_mode: SystemMode) -> SystemMode {
        self.recovery_mode.map(SystemMode::from).unwrap_or(default_mode)
    }
}

/// Evaluate every kasa in the snapshot and emit one health event per kasa.
///
/// Debt-free kasas have no ratio and are skipped, as are kasas whose ratio
/// overflows; neither aborts the pass.
pub fn evaluate(snapshot: &Snapshot, default_mode: SystemMode, params: &RiskParameters) -> PassSummary {
    let mode = snapshot.mode(default_mode);
    let required_ratio = required_collateral_ratio(params, mode);
    let mut summary = PassSummary::default();

    for entry in &snapshot.kasas {
        let kasa = Kasa::new(entry.collateral_amount, entry.debt_amount);

        let ratio = match kasa.collateral_ratio(snapshot.collateral_price, params) {
            Ok(ratio) => ratio,
            Err(KasaError::InvalidDebtAmount) => {
                tracing::debug!(kasa_id = %entry.id, "kasa has no debt, skipping");
                summary.skipped += 1;
                continue;
            }
            Err(err) => {
                tracing::warn!(kasa_id = %entry.id, error = %err, "could not evaluate kasa");
                summary.skipped += 1;
                continue;
            }
        };

        let healthy = ratio >= u128::from(required_ratio);
        summary.evaluated += 1;

        if !healthy {
            summary.unhealthy += 1;
            tracing::warn!(
                kasa_id = %entry.id,
                collateral_ratio = %ratio,
                required_ratio,
                "kasa is undercollateralized"
            );
        }

        KasaHealthEvaluated {
            kasa_id: entry.id.clone(),
            collateral_amount: kasa.collateral_amount,
            debt_amount: kasa.debt_amount,
            collateral_price: snapshot.collateral_price,
            collateral_ratio: ratio,
            required_ratio,
            recovery_mode: mode.is_recovery(),
            healthy,
        }
        .emit();
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"{
        "collateral_price": 1,
        "kasas": [
            { "id": "a", "collateral_amount": 200, "debt_amount": 100 },
            { "id": "b", "collateral_amount": 110, "debt_amount": 100 },
            { "id": "c", "collateral_amount": 109, "debt_amount": 100 },
            { "id": "d", "collateral_amount": 500, "debt_amount": 0 }
        ]
    }"#;

    #[test]
    fn normal_mode_pass() {
        let snapshot = Snapshot::from_json(SNAPSHOT).unwrap();
        let summary = evaluate(&snapshot, SystemMode::Normal, &RiskParameters::default());

        assert_eq!(
            summary,
            PassSummary {
                evaluated: 3,
                unhealthy: 1,
                skipped: 1,
            }
        );
    }

    #[test]
    fn recovery_mode_pass() {
        let snapshot = Snapshot::from_json(SNAPSHOT).unwrap();
        let summary = evaluate(&snapshot, SystemMode::Recovery, &RiskParameters::default());

        assert_eq!(summary.evaluated, 3);
        assert_eq!(summary.unhealthy, 2);
    }

    #[test]
    fn snapshot_mode_overrides_default() {
        let raw = r#"{ "collateral_price": 1, "recovery_mode": true, "kasas": [] }"#;
        let snapshot = Snapshot::from_json(raw).unwrap();

        assert_eq!(snapshot.mode(SystemMode::Normal), SystemMode::Recovery);
        assert_eq!(
            Snapshot::from_json(SNAPSHOT).unwrap().mode(SystemMode::Normal),
            SystemMode::Normal
        );
    }

    #[test]
    fn overflowing_kasa_is_skipped() {
        let raw = format!(
            r#"{{ "collateral_price": {max}, "kasas": [ {{ "id": "x", "collateral_amount": {max}, "debt_amount": 1 }} ] }}"#,
            max = u64::MAX
        );
        let snapshot = Snapshot::from_json(&raw).unwrap();
        let summary = evaluate(&snapshot, SystemMode::Normal, &RiskParameters::default());

        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.evaluated, 0);
    }

    #[test]
    fn malformed_snapshot_is_an_error() {
        assert!(Snapshot::from_json(r#"{ "kasas": [] }"#).is_err());
    }
}
