//! Strain policy configuration

use crate::error::{Result, StrainError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const MS_PER_MINUTE: u64 = 60 * 1000;
const MS_PER_HOUR: f64 = 3600.0 * 1000.0;

/// Numeric policy for the strain accumulator.
///
/// Immutable once built; one instance can drive any number of channels.
/// Build-up is meant to outpace recovery (`decay_per_ms < accumulate_per_ms`).
/// [`StrainConfig::validate`] rejects configs that invert this, but
/// [`crate::step`] itself will run with whatever it is given.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StrainConfig {
    /// Half-width of the equilibrium zone around 0.
    pub band: f64,

    /// Continuous time outside the band before strain may rise.
    pub min_activation_ms: u64,

    /// Continuous time inside the band before strain may fall.
    pub min_recovery_ms: u64,

    /// Strain gained per millisecond at full distance from the band.
    pub accumulate_per_ms: f64,

    /// Base strain lost per millisecond while recovering.
    pub decay_per_ms: f64,

    /// Upper clamp for strain.
    pub max_strain: f64,

    /// Continuous sign streak required before a pole counts as dominant.
    pub min_dominance_ms: u64,
}

impl StrainConfig {
    /// Create a configuration with explicit band and rates, keeping the
    /// default dwell windows.
    pub fn new(band: f64, accumulate_per_ms: f64, decay_per_ms: f64) -> Self {
        Self {
            band,
            accumulate_per_ms,
            decay_per_ms,
            ..Self::default()
        }
    }

    pub fn with_band(mut self, band: f64) -> Self {
        self.band = band;
        self
    }

    /// Set activation and recovery dwell windows.
    pub fn with_dwell(mut self, min_activation_ms: u64, min_recovery_ms: u64) -> Self {
        self.min_activation_ms = min_activation_ms;
        self.min_recovery_ms = min_recovery_ms;
        self
    }

    pub fn with_rates(mut self, accumulate_per_ms: f64, decay_per_ms: f64) -> Self {
        self.accumulate_per_ms = accumulate_per_ms;
        self.decay_per_ms = decay_per_ms;
        self
    }

    pub fn with_max_strain(mut self, max_strain: f64) -> Self {
        self.max_strain = max_strain;
        self
    }

    pub fn with_min_dominance(mut self, min_dominance_ms: u64) -> Self {
        self.min_dominance_ms = min_dominance_ms;
        self
    }

    /// Time to build from 0 to `max_strain` at full distance, in ms.
    pub fn saturation_ms(&self) -> f64 {
        if self.accumulate_per_ms > 0.0 {
            self.max_strain / self.accumulate_per_ms
        } else {
            f64::INFINITY
        }
    }

    /// Upper bound on time to decay from `max_strain` to 0 once recovery is
    /// active (slowest case: signal parked at the band edge), in ms.
    pub fn worst_case_recovery_ms(&self) -> f64 {
        if self.decay_per_ms > 0.0 {
            self.max_strain / (0.5 * self.decay_per_ms)
        } else {
            f64::INFINITY
        }
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        let floats = [
            ("band", self.band),
            ("accumulate_per_ms", self.accumulate_per_ms),
            ("decay_per_ms", self.decay_per_ms),
            ("max_strain", self.max_strain),
        ];
        for (name, value) in floats {
            if !value.is_finite() {
                return Err(StrainError::NonFiniteParameter { name });
            }
            if value < 0.0 {
                return Err(StrainError::NegativeParameter { name, value });
            }
        }
        if self.decay_per_ms >= self.accumulate_per_ms {
            return Err(StrainError::InvertedRates {
                accumulate: self.accumulate_per_ms,
                decay: self.decay_per_ms,
            });
        }
        Ok(())
    }
}

impl Default for StrainConfig {
    /// Dashboard policy: build to full strain over ~12h of sustained
    /// imbalance, settle over ~24h.
    fn default() -> Self {
        Self {
            band: 0.12,
            min_activation_ms: 5 * MS_PER_MINUTE,
            min_recovery_ms: 10 * MS_PER_MINUTE,
            accumulate_per_ms: 1.0 / (12.0 * MS_PER_HOUR),
            decay_per_ms: 1.0 / (24.0 * MS_PER_HOUR),
            max_strain: 1.0,
            min_dominance_ms: 3 * MS_PER_MINUTE,
        }
    }
}
