//! Loading policy and snapshots through serde (requires the `serde` feature).

#![cfg(feature = "serde")]

use strain_field::{AccumulatorState, ChannelRegistry, Panel, Sample, StrainConfig};

#[test]
fn partial_config_fills_defaults() {
    let config: StrainConfig =
        serde_json::from_str(r#"{ "band": 0.2, "min_dominance_ms": 60000 }"#).unwrap();

    assert_eq!(config.band, 0.2);
    assert_eq!(config.min_dominance_ms, 60_000);
    assert_eq!(config.min_recovery_ms, StrainConfig::default().min_recovery_ms);
    assert!(config.validate().is_ok());
}

#[test]
fn inverted_rates_load_but_fail_validation() {
    let config: StrainConfig =
        serde_json::from_str(r#"{ "accumulate_per_ms": 1e-9, "decay_per_ms": 1e-8 }"#).unwrap();
    assert!(ChannelRegistry::new(config).is_err());
}

#[test]
fn snapshot_uses_readable_labels() {
    let mut registry = ChannelRegistry::new(StrainConfig::default()).unwrap();
    registry.apply_sample("load", Sample::new(0, 0.9));
    let state = registry.apply_sample("load", Sample::new(60_000, 0.0));
    assert_eq!(state.panel, Panel::Returning);

    let json = serde_json::to_value(&state).unwrap();
    assert_eq!(json["panel"], "returning_to_equilibrium");

    let restored: AccumulatorState = serde_json::from_value(json).unwrap();
    assert_eq!(restored, state);
}
