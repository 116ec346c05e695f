//! Signal primitives - samples, poles and heat targets
//!
//! A channel carries one signed scalar in [-1.0, +1.0]. The sign encodes
//! which pole leads (A = positive, B = negative), the magnitude how far.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One timestamped observation on a channel.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sample {
    /// Timestamp in milliseconds.
    pub t: i64,
    /// Position between the poles, expected in [-1.0, +1.0].
    pub x: f64,
}

impl Sample {
    #[inline]
    pub fn new(t: i64, x: f64) -> Self {
        Self { t, x }
    }
}

/// One end of a bipolar channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Pole {
    /// The +1 direction.
    A,
    /// The -1 direction.
    B,
}

impl Pole {
    /// Pole a signed position leans toward. Exactly 0 (or NaN) leans nowhere.
    #[inline]
    pub fn from_sign(x: f64) -> Option<Pole> {
        if x > 0.0 {
            Some(Pole::A)
        } else if x < 0.0 {
            Some(Pole::B)
        } else {
            None
        }
    }

    #[inline]
    pub fn opposite(self) -> Pole {
        match self {
            Pole::A => Pole::B,
            Pole::B => Pole::A,
        }
    }

    /// +1.0 for A, -1.0 for B.
    #[inline]
    pub fn signum(self) -> f64 {
        match self {
            Pole::A => 1.0,
            Pole::B => -1.0,
        }
    }
}

impl fmt::Display for Pole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Pole::A => "A",
            Pole::B => "B",
        })
    }
}

/// Where a strain-driven heat overlay should land.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Target {
    Pole(Pole),
    /// Both poles; never produced by the accumulator, available to renderers
    /// that merge channels.
    Both,
}

impl Target {
    /// Whether the overlay covers `pole`.
    pub fn includes(self, pole: Pole) -> bool {
        match self {
            Target::Pole(p) => p == pole,
            Target::Both => true,
        }
    }
}
