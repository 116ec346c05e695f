//! Instantaneous equilibrium classifier
//!
//! Compares the magnitude of a tension now against the previous reading.
//! Position decides first: inside `epsilon` the signal is in equilibrium.
//! Outside it, the change in magnitude decides, with `delta` acting as a
//! noise floor.
//!
//! ## Holding
//!
//! When the trend is inside the noise band `(-delta, delta)` and the signal
//! is outside `epsilon`, the previous verdict is held. Without this the
//! state flickers between "out" and "returning" every time the trend wobbles
//! around zero. An unknown or `Equilibrium` previous verdict falls back to
//! [`Classification::OutStable`].
//!
//! ## Arrival
//!
//! A reading that lands inside the band while its magnitude is still
//! dropping by at least `delta` is reported as `Returning`, not
//! `Equilibrium`: the signal arrived this tick. A flat in-band reading is
//! always `Equilibrium`.

use crate::numeric::finite_or_zero;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Four-way verdict of [`classify`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Classification {
    /// Inside the band.
    Equilibrium,
    /// Outside the band and moving further out.
    OutOfEquilibrium,
    /// Moving back toward the band.
    Returning,
    /// Outside the band, not clearly moving.
    OutStable,
}

impl Classification {
    /// Stable snake-case label, used for narrative copy.
    pub fn label(self) -> &'static str {
        match self {
            Classification::Equilibrium => "equilibrium",
            Classification::OutOfEquilibrium => "out_of_equilibrium",
            Classification::Returning => "returning",
            Classification::OutStable => "out_stable",
        }
    }

    #[inline]
    pub fn is_out_of_equilibrium(self) -> bool {
        self != Classification::Equilibrium
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of one classification.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClassifyResult {
    pub state: Classification,
    /// `state != Equilibrium`.
    pub is_out_of_equilibrium: bool,
    /// `|tension_now|`.
    pub abs_now: f64,
    /// `|tension_now| - |tension_prev|`.
    pub d_abs: f64,
}

/// Classify the current tension against the previous one.
///
/// Tensions can be on any consistent scale. Non-finite tensions count as 0,
/// negative thresholds as 0. Pure: the same inputs always give the same
/// verdict.
pub fn classify(
    tension_now: f64,
    tension_prev: f64,
    epsilon: f64,
    delta: f64,
    prev_state: Option<Classification>,
) -> ClassifyResult {
    let epsilon = finite_or_zero(epsilon).max(0.0);
    let delta = finite_or_zero(delta).max(0.0);

    let abs_now = finite_or_zero(tension_now).abs();
    let abs_prev = finite_or_zero(tension_prev).abs();
    let d_abs = abs_now - abs_prev;

    let shrinking = d_abs <= -delta;

    let state = if abs_now <= epsilon {
        if shrinking && d_abs < 0.0 {
            Classification::Returning
        } else {
            Classification::Equilibrium
        }
    } else if d_abs >= delta {
        Classification::OutOfEquilibrium
    } else if shrinking {
        Classification::Returning
    } else {
        match prev_state {
            Some(prev) if prev != Classification::Equilibrium => prev,
            _ => Classification::OutStable,
        }
    };

    ClassifyResult {
        state,
        is_out_of_equilibrium: state.is_out_of_equilibrium(),
        abs_now,
        d_abs,
    }
}

/// Aggregate several channel tensions into one: the largest magnitude.
///
/// Non-finite values are ignored. An empty input aggregates to 0.0.
pub fn aggregate_tension<I>(tensions: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    tensions
        .into_iter()
        .map(|t| finite_or_zero(t).abs())
        .fold(0.0f64, f64::max)
}

/// Stateful wrapper around [`classify`] that remembers the previous tension
/// and verdict between updates.
#[derive(Clone, Debug)]
pub struct TrendClassifier {
    epsilon: f64,
    delta: f64,
    prev: Option<(f64, Classification)>,
}

impl TrendClassifier {
    pub fn new(epsilon: f64, delta: f64) -> Self {
        Self {
            epsilon,
            delta,
            prev: None,
        }
    }

    /// Classify a new reading. The first reading is compared against itself,
    /// so its trend is flat.
    pub fn update(&mut self, tension: f64) -> ClassifyResult {
        let (prev_tension, prev_state) = match self.prev {
            Some((t, s)) => (t, Some(s)),
            None => (tension, None),
        };
        let result = classify(tension, prev_tension, self.epsilon, self.delta, prev_state);
        self.prev = Some((tension, result.state));
        result
    }

    /// Last verdict, if any reading has been seen.
    pub fn state(&self) -> Option<Classification> {
        self.prev.map(|(_, s)| s)
    }

    /// Forget history.
    pub fn reset(&mut self) {
        self.prev = None;
    }
}
