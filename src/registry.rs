//! Channel registry - owned store of per-channel accumulator state
//!
//! Maps a channel key to its latest [`AccumulatorState`]. Channels are
//! created lazily on first use and live until removed. The registry is a
//! plain value owned by whatever drives the update loop: writes take
//! `&mut self`, so there is one writer per registry by construction.
//! Wrap it in a `Mutex` to share it across threads.

use crate::accumulator::{step, strain_to_heat01, AccumulatorState};
use crate::config::StrainConfig;
use crate::error::Result;
use crate::observer::{ChannelEvent, ChannelObserver};
use crate::signal::Sample;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Keyed store of channel states sharing one [`StrainConfig`].
pub struct ChannelRegistry {
    config: StrainConfig,
    channels: HashMap<String, AccumulatorState>,
    observers: Vec<Arc<dyn ChannelObserver>>,
}

impl ChannelRegistry {
    /// Create an empty registry. Fails if `config` does not validate.
    pub fn new(config: StrainConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            channels: HashMap::new(),
            observers: Vec::new(),
        })
    }

    /// Shared configuration.
    pub fn config(&self) -> &StrainConfig {
        &self.config
    }

    // =========================================================================
    // PUB/SUB
    // =========================================================================

    /// Subscribe an observer to channel transitions.
    pub fn subscribe(&mut self, observer: Arc<dyn ChannelObserver>) {
        self.observers.push(observer);
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    // =========================================================================
    // WRITING
    // =========================================================================

    /// Apply one sample to `key`, creating the channel if unseen. Returns a
    /// snapshot of the new state.
    pub fn apply_sample(&mut self, key: &str, sample: Sample) -> AccumulatorState {
        let state = self.channels.entry(key.to_owned()).or_insert_with(|| {
            debug!(channel = key, "creating channel");
            AccumulatorState::initial()
        });

        if let Some(last_t) = state.last_t {
            if sample.t < last_t {
                warn!(
                    channel = key,
                    t = sample.t,
                    last_t,
                    "out-of-order sample, treating as zero duration"
                );
            }
        }

        let next = step(state, sample, &self.config);
        let prev = std::mem::replace(state, next.clone());

        trace!(
            channel = key,
            t = sample.t,
            x = sample.x,
            strain = next.strain,
            panel = %next.panel,
            "sample applied"
        );

        let events = ChannelEvent::diff(key, &prev, &next);
        for event in &events {
            debug!(channel = key, ?event, "channel transition");
            for observer in &self.observers {
                observer.on_event(event);
            }
        }

        next
    }

    /// Apply samples for `key` in order and return the final snapshot.
    pub fn apply_samples<I>(&mut self, key: &str, samples: I) -> AccumulatorState
    where
        I: IntoIterator<Item = Sample>,
    {
        let mut last = self.get_state(key);
        for sample in samples {
            last = self.apply_sample(key, sample);
        }
        last
    }

    /// Drop a channel. Returns its last state if it existed.
    pub fn remove(&mut self, key: &str) -> Option<AccumulatorState> {
        self.channels.remove(key)
    }

    /// Drop every channel. Observers stay subscribed.
    pub fn clear(&mut self) {
        self.channels.clear();
    }

    // =========================================================================
    // READING
    // =========================================================================

    /// Snapshot of `key`'s state. An unseen channel reads as the initial
    /// state, which is exactly what the first sample would start from.
    pub fn get_state(&self, key: &str) -> AccumulatorState {
        self.channels.get(key).cloned().unwrap_or_default()
    }

    /// Heat for `key`'s current strain.
    pub fn heat(&self, key: &str) -> f64 {
        self.channels
            .get(key)
            .map_or(0.0, |state| strain_to_heat01(state.strain, &self.config))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.channels.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Known channel keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.channels.keys().map(String::as_str)
    }

    /// Read-only view of every channel.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AccumulatorState)> {
        self.channels.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl fmt::Debug for ChannelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelRegistry")
            .field("config", &self.config)
            .field("channels", &self.channels)
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulator::{run, Panel};
    use crate::error::StrainError;
    use crate::observer::FnObserver;
    use crate::signal::{Pole, Target};
    use std::sync::Mutex;

    const MINUTE: i64 = 60_000;

    fn registry() -> ChannelRegistry {
        ChannelRegistry::new(StrainConfig::default()).unwrap()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = StrainConfig::default().with_rates(1e-9, 1e-8);
        assert!(matches!(
            ChannelRegistry::new(config),
            Err(StrainError::InvertedRates { .. })
        ));
    }

    #[test]
    fn test_lazy_creation() {
        let mut reg = registry();
        assert!(reg.is_empty());
        assert_eq!(reg.get_state("load"), AccumulatorState::initial());
        // Reading does not create
        assert!(!reg.contains("load"));

        let state = reg.apply_sample("load", Sample::new(0, 0.5));
        assert!(reg.contains("load"));
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.get_state("load"), state);
        assert_eq!(state.last_t, Some(0));
    }

    #[test]
    fn test_matches_batch_replay() {
        let mut reg = registry();
        let samples: Vec<Sample> = (0..30).map(|i| Sample::new(i * MINUTE, -0.7)).collect();

        let last = reg.apply_samples("readiness", samples.iter().copied());
        let replayed = run(samples, reg.config(), None);
        assert_eq!(last, replayed);
        assert_eq!(last.target, Some(Target::Pole(Pole::A)));
        assert!(reg.heat("readiness") > 0.0);
    }

    #[test]
    fn test_channels_independent() {
        let mut reg = registry();
        for i in 0..10 {
            reg.apply_sample("a", Sample::new(i * MINUTE, 0.9));
            reg.apply_sample("b", Sample::new(i * MINUTE, 0.0));
        }
        assert!(reg.get_state("a").strain > 0.0);
        assert_eq!(reg.get_state("b").strain, 0.0);
        assert_eq!(reg.get_state("b").panel, Panel::Equilibrium);

        let mut keys: Vec<&str> = reg.keys().collect();
        keys.sort_unstable();
        assert_eq!(keys, ["a", "b"]);
        assert_eq!(reg.iter().filter(|(_, s)| s.is_straining()).count(), 1);

        // Separate registries share nothing
        assert!(registry().is_empty());
    }

    #[test]
    fn test_remove_and_clear() {
        let mut reg = registry();
        reg.apply_sample("a", Sample::new(0, 0.3));
        reg.apply_sample("b", Sample::new(0, 0.3));

        assert!(reg.remove("a").is_some());
        assert!(reg.remove("a").is_none());
        assert_eq!(reg.len(), 1);

        reg.clear();
        assert!(reg.is_empty());
        assert_eq!(reg.heat("b"), 0.0);
    }

    #[test]
    fn test_observers_receive_transitions() {
        let mut reg = registry();
        let seen: Arc<Mutex<Vec<ChannelEvent>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        reg.subscribe(Arc::new(FnObserver(move |event: &ChannelEvent| {
            sink.lock().unwrap().push(event.clone());
        })));
        assert_eq!(reg.observer_count(), 1);

        for i in 0..=5 {
            reg.apply_sample("load", Sample::new(i * MINUTE, 0.8));
        }

        let events = seen.lock().unwrap().clone();
        assert_eq!(
            events,
            vec![
                ChannelEvent::PanelChanged {
                    channel: "load".to_owned(),
                    from: Panel::Equilibrium,
                    to: Panel::OutOfEquilibrium,
                },
                ChannelEvent::DominanceChanged {
                    channel: "load".to_owned(),
                    from: None,
                    to: Some(Pole::A),
                },
                ChannelEvent::StrainActivated {
                    channel: "load".to_owned(),
                    strain: reg.get_state("load").strain,
                },
            ]
        );
    }

    #[test]
    fn test_out_of_order_sample_does_not_advance() {
        let mut reg = registry();
        reg.apply_sample("a", Sample::new(10 * MINUTE, 0.5));
        reg.apply_sample("a", Sample::new(11 * MINUTE, 0.5));
        let state = reg.apply_sample("a", Sample::new(MINUTE, 0.5));
        assert_eq!(state.outside_ms, MINUTE as u64);
    }
}
