//! Strain Field - temporal equilibrium substrate for bipolar balance metrics
//!
//! A channel carries one signed scalar in [-1.0, +1.0] between two poles.
//! The field decides whether the channel is balanced, drifting out, or
//! coming back, and integrates a slow "strain" scalar that only moves after
//! an imbalance (or a recovery) has proven itself sustained.
//!
//! # Core Types
//!
//! - **classify**: stateless position/trend verdict for one reading
//! - **AccumulatorState / step**: per-channel state machine with dwell
//!   gating, dominance debounce and asymmetric accumulate/decay
//! - **ChannelRegistry**: owned keyed store of channel states with pub/sub
//!
//! # Architecture: Producer / Registry / Consumer
//!
//! 1. **Producers** derive `x` per channel from whatever they measure and
//!    call [`ChannelRegistry::apply_sample`] once per tick
//! 2. **Registry** runs [`step`] for that channel and stores the result
//! 3. **Consumers** read `strain`, `target` and `panel` from snapshots, or
//!    subscribe a [`ChannelObserver`] to be told about transitions
//!
//! Nothing here reads a clock, does I/O, or fails at runtime. Bad input is
//! clamped. Only configuration can be rejected.
//!
//! # Example: Training Load vs. Competitive Readiness
//!
//! ```rust
//! use strain_field::{ChannelRegistry, Pole, Sample, StrainConfig, Target};
//!
//! let mut registry = ChannelRegistry::new(StrainConfig::default())?;
//!
//! // Load leads readiness at 0.8 for 20 minutes, one sample per minute
//! for minute in 0..=20 {
//!     registry.apply_sample("load_vs_readiness", Sample::new(minute * 60_000, 0.8));
//! }
//!
//! let state = registry.get_state("load_vs_readiness");
//! assert!(state.strain > 0.0);
//! assert_eq!(state.dominant, Some(Pole::A));
//! // Heat goes to the pole being neglected
//! assert_eq!(state.target, Some(Target::Pole(Pole::B)));
//! # Ok::<(), strain_field::StrainError>(())
//! ```
//!
//! # Example: Narrative Verdict
//!
//! ```rust
//! use strain_field::{aggregate_tension, classify, Classification};
//!
//! let prev = aggregate_tension([0.5, -0.2]);
//! let now = aggregate_tension([0.05, -0.02]);
//! let verdict = classify(now, prev, 0.12, 0.03, None);
//! assert_eq!(verdict.state, Classification::Returning);
//! ```

mod accumulator;
mod classify;
mod config;
mod error;
mod numeric;
mod observer;
mod registry;
mod signal;

pub use accumulator::{run, step, strain_to_heat01, AccumulatorState, Panel, HEAT_GAMMA};
pub use classify::{aggregate_tension, classify, Classification, ClassifyResult, TrendClassifier};
pub use config::StrainConfig;
pub use error::{Result, StrainError};
pub use numeric::{clamp, clamp01, clamp_signed};
pub use observer::{ChannelEvent, ChannelObserver, FnObserver, SenderObserver};
pub use registry::ChannelRegistry;
pub use signal::{Pole, Sample, Target};
