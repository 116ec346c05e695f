//! Temporal strain accumulator - the per-channel state machine
//!
//! Each sample advances one channel's [`AccumulatorState`] by the elapsed
//! time since the previous sample. Three things are tracked:
//!
//! - **Dwell**: continuous time inside or outside the band. Exactly one of
//!   the two counters is non-zero at a time.
//! - **Dominance**: continuous time the raw sign has held. A pole becomes
//!   `dominant` only after holding for `min_dominance_ms`, so noisy zero
//!   crossings never flip the heat target.
//! - **Strain**: rises after `min_activation_ms` outside the band, in
//!   proportion to how far outside. Falls after `min_recovery_ms` inside,
//!   faster the closer the signal sits to center. Full recovery clears the
//!   heat target.
//!
//! Time is whatever the caller says it is. Nothing here reads a clock.

use crate::config::StrainConfig;
use crate::numeric::{clamp, clamp01, clamp_signed, elapsed_ms};
use crate::signal::{Pole, Sample, Target};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Exponent of the heat curve. Above 1 keeps low strain visually quiet.
pub const HEAT_GAMMA: f64 = 1.6;

/// Distribution-only view of a channel: band membership plus whether it
/// has been outside before. Ignores strain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Panel {
    #[default]
    Equilibrium,
    OutOfEquilibrium,
    /// Inside the band after having been outside.
    #[cfg_attr(feature = "serde", serde(rename = "returning_to_equilibrium"))]
    Returning,
}

impl Panel {
    pub fn label(self) -> &'static str {
        match self {
            Panel::Equilibrium => "equilibrium",
            Panel::OutOfEquilibrium => "out_of_equilibrium",
            Panel::Returning => "returning_to_equilibrium",
        }
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// State of one channel. A value: [`step`] returns a new one and never
/// touches its input.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AccumulatorState {
    /// Accumulated strain in [0, max_strain].
    pub strain: f64,
    /// Pole that should receive the heat overlay.
    pub target: Option<Target>,
    /// Last pole that held its sign for `min_dominance_ms`. Sticky.
    pub dominant: Option<Pole>,
    /// Continuous time outside the band.
    pub outside_ms: u64,
    /// Continuous time inside the band.
    pub inside_ms: u64,
    /// Length of the current raw sign streak.
    pub dominance_ms: u64,
    /// Raw sign of the current streak.
    pub dominance_sign: Option<Pole>,
    pub panel: Panel,
    /// Timestamp of the last processed sample.
    pub last_t: Option<i64>,
}

impl AccumulatorState {
    /// Fresh state: no strain, no history, panel in equilibrium.
    pub fn initial() -> Self {
        Self::default()
    }

    /// Heat for this state's strain. See [`strain_to_heat01`].
    pub fn heat(&self, config: &StrainConfig) -> f64 {
        strain_to_heat01(self.strain, config)
    }

    #[inline]
    pub fn is_straining(&self) -> bool {
        self.strain > 0.0
    }

    #[inline]
    pub fn is_inside_band(&self) -> bool {
        self.panel != Panel::OutOfEquilibrium
    }
}

/// Advance `prev` by one sample.
///
/// Total over all inputs: out-of-order timestamps count as zero elapsed
/// time, `x` is clamped to [-1, 1] (NaN reads as centered), strain is
/// clamped to [0, max_strain].
pub fn step(prev: &AccumulatorState, sample: Sample, config: &StrainConfig) -> AccumulatorState {
    let dt = elapsed_ms(prev.last_t, sample.t);
    let x = clamp_signed(sample.x);
    let abs_x = x.abs();
    let inside = abs_x <= config.band;
    let sign = Pole::from_sign(x);

    let panel = if inside {
        if prev.panel == Panel::Equilibrium {
            Panel::Equilibrium
        } else {
            Panel::Returning
        }
    } else {
        Panel::OutOfEquilibrium
    };

    let (inside_ms, outside_ms) = if inside {
        (prev.inside_ms.saturating_add(dt), 0)
    } else {
        (0, prev.outside_ms.saturating_add(dt))
    };

    let (dominance_sign, dominance_ms) = if sign == prev.dominance_sign {
        (sign, prev.dominance_ms.saturating_add(dt))
    } else {
        (sign, dt)
    };

    let dominant = match dominance_sign {
        Some(pole) if dominance_ms >= config.min_dominance_ms => Some(pole),
        _ => prev.dominant,
    };

    let mut target = match dominant {
        Some(pole) => Some(Target::Pole(pole.opposite())),
        None => prev.target,
    };

    let max_strain = config.max_strain.max(0.0);
    let mut strain = prev.strain;
    let dt_ms = dt as f64;

    if !inside && outside_ms >= config.min_activation_ms {
        let distance = clamp01(abs_x - config.band);
        strain = clamp(
            strain + distance * config.accumulate_per_ms * dt_ms,
            0.0,
            max_strain,
        );
    } else if inside && inside_ms >= config.min_recovery_ms {
        let center_factor = if config.band > 0.0 {
            1.0 - clamp01(abs_x / config.band)
        } else {
            1.0
        };
        let rate = (0.5 + 0.5 * center_factor) * config.decay_per_ms;
        strain = clamp(strain - rate * dt_ms, 0.0, max_strain);
        if strain == 0.0 {
            target = None;
        }
    } else {
        strain = clamp(strain, 0.0, max_strain);
    }

    AccumulatorState {
        strain,
        target,
        dominant,
        outside_ms,
        inside_ms,
        dominance_ms,
        dominance_sign,
        panel,
        last_t: Some(sample.t),
    }
}

/// Replay `samples` in order from `seed` (or the initial state).
pub fn run<I>(samples: I, config: &StrainConfig, seed: Option<AccumulatorState>) -> AccumulatorState
where
    I: IntoIterator<Item = Sample>,
{
    samples
        .into_iter()
        .fold(seed.unwrap_or_default(), |state, sample| {
            step(&state, sample, config)
        })
}

/// Map strain to a [0, 1] display intensity: `(strain / max_strain)^1.6`.
///
/// Low strain renders as almost nothing; only sustained high strain becomes
/// visually assertive.
pub fn strain_to_heat01(strain: f64, config: &StrainConfig) -> f64 {
    if config.max_strain.is_nan() || config.max_strain <= 0.0 {
        return 0.0;
    }
    clamp01(strain / config.max_strain).powf(HEAT_GAMMA)
}
