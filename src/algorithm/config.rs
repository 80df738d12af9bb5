//! # AlgorithmConfig
//!
//! Named parameter slots and their validation. An [`AlgorithmConfig`] collects
//! slot values for one [`AlgorithmKind`] and builds the matching
//! [`Optimizer`] once every required slot is present.
//!
//! ## Example
//!
//! ```rust
//! use sosbench::algorithm::{AlgorithmConfig, AlgorithmKind, ParameterSlot};
//!
//! let mut config = AlgorithmConfig::new(AlgorithmKind::ShortDistanceExploration);
//! assert!(config.build().is_err()); // alpha is required
//!
//! config.configure(ParameterSlot::Alpha, 0.4)?;
//! let s = config.build()?;
//!
//! // slots that S does not have are rejected up front
//! assert!(config.configure(ParameterSlot::CrossoverRate, 0.9).is_err());
//! # Ok::<(), sosbench::error::OptimizationError>(())
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{OptimizationError, Result};

use super::{DifferentialEvolution, Optimizer, SelfAdaptiveDe, ShortDistanceExploration};

/// Largest value accepted for integer slots such as the population size.
pub const MAX_COUNT: usize = u32::MAX as usize;

/// The closed set of algorithm parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum ParameterSlot {
    PopulationSize,
    ScalingFactor,
    CrossoverRate,
    ScalingFactorLower,
    ScalingFactorUpper,
    TauOne,
    TauTwo,
    Alpha,
    LocalSearchSweeps,
}

impl ParameterSlot {
    pub const ALL: [ParameterSlot; 9] = [
        ParameterSlot::PopulationSize,
        ParameterSlot::ScalingFactor,
        ParameterSlot::CrossoverRate,
        ParameterSlot::ScalingFactorLower,
        ParameterSlot::ScalingFactorUpper,
        ParameterSlot::TauOne,
        ParameterSlot::TauTwo,
        ParameterSlot::Alpha,
        ParameterSlot::LocalSearchSweeps,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterSlot::PopulationSize => "population_size",
            ParameterSlot::ScalingFactor => "scaling_factor",
            ParameterSlot::CrossoverRate => "crossover_rate",
            ParameterSlot::ScalingFactorLower => "scaling_factor_lower",
            ParameterSlot::ScalingFactorUpper => "scaling_factor_upper",
            ParameterSlot::TauOne => "tau_one",
            ParameterSlot::TauTwo => "tau_two",
            ParameterSlot::Alpha => "alpha",
            ParameterSlot::LocalSearchSweeps => "local_search_sweeps",
        }
    }
}

impl fmt::Display for ParameterSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParameterSlot {
    type Err = OptimizationError;

    fn from_str(s: &str) -> Result<Self> {
        ParameterSlot::ALL
            .iter()
            .copied()
            .find(|slot| slot.as_str() == s)
            .ok_or_else(|| OptimizationError::UnknownParameter(s.to_string()))
    }
}

/// The optimisers that can be built from a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlgorithmKind {
    DifferentialEvolution,
    SelfAdaptiveDe,
    ShortDistanceExploration,
}

impl AlgorithmKind {
    pub fn name(&self) -> &'static str {
        match self {
            AlgorithmKind::DifferentialEvolution => "DE",
            AlgorithmKind::SelfAdaptiveDe => "jDES",
            AlgorithmKind::ShortDistanceExploration => "S",
        }
    }

    /// The slots this kind reads. All of them are required.
    pub fn slots(&self) -> &'static [ParameterSlot] {
        match self {
            AlgorithmKind::DifferentialEvolution => &[
                ParameterSlot::PopulationSize,
                ParameterSlot::ScalingFactor,
                ParameterSlot::CrossoverRate,
            ],
            AlgorithmKind::SelfAdaptiveDe => &[
                ParameterSlot::PopulationSize,
                ParameterSlot::ScalingFactorLower,
                ParameterSlot::ScalingFactorUpper,
                ParameterSlot::TauOne,
                ParameterSlot::TauTwo,
                ParameterSlot::Alpha,
                ParameterSlot::LocalSearchSweeps,
            ],
            AlgorithmKind::ShortDistanceExploration => &[ParameterSlot::Alpha],
        }
    }
}

/// Parameter values for one algorithm, validated on [`AlgorithmConfig::build`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlgorithmConfig {
    kind: AlgorithmKind,
    #[cfg_attr(feature = "serde", serde(default))]
    parameters: BTreeMap<ParameterSlot, f64>,
}

impl AlgorithmConfig {
    pub fn new(kind: AlgorithmKind) -> Self {
        Self {
            kind,
            parameters: BTreeMap::new(),
        }
    }

    pub fn kind(&self) -> AlgorithmKind {
        self.kind
    }

    /// Sets a slot value.
    ///
    /// # Errors
    ///
    /// Returns `OptimizationError::UnsupportedParameter` if the algorithm kind
    /// does not read `slot`.
    pub fn configure(&mut self, slot: ParameterSlot, value: f64) -> Result<&mut Self> {
        if !self.kind.slots().contains(&slot) {
            return Err(OptimizationError::UnsupportedParameter {
                algorithm: self.kind.name().to_string(),
                slot,
            });
        }
        self.parameters.insert(slot, value);
        Ok(self)
    }

    /// Fluent form of [`AlgorithmConfig::configure`].
    pub fn with(mut self, slot: ParameterSlot, value: f64) -> Result<Self> {
        self.configure(slot, value)?;
        Ok(self)
    }

    pub fn get(&self, slot: ParameterSlot) -> Option<f64> {
        self.parameters.get(&slot).copied()
    }

    /// Validates the configuration and builds the optimiser.
    ///
    /// # Errors
    ///
    /// Returns `OptimizationError::MissingParameter` for the first required
    /// slot without a value, `OptimizationError::UnsupportedParameter` if a
    /// foreign slot slipped in through deserialisation, and
    /// `OptimizationError::Configuration` for out-of-range values.
    pub fn build(&self) -> Result<Optimizer> {
        if let Some(&slot) = self
            .parameters
            .keys()
            .find(|slot| !self.kind.slots().contains(slot))
        {
            return Err(OptimizationError::UnsupportedParameter {
                algorithm: self.kind.name().to_string(),
                slot,
            });
        }

        let optimizer = match self.kind {
            AlgorithmKind::DifferentialEvolution => DifferentialEvolution::new(
                self.count(ParameterSlot::PopulationSize)?,
                self.require(ParameterSlot::ScalingFactor)?,
                self.require(ParameterSlot::CrossoverRate)?,
            )?
            .into(),
            AlgorithmKind::SelfAdaptiveDe => SelfAdaptiveDe::new(
                self.count(ParameterSlot::PopulationSize)?,
                self.require(ParameterSlot::ScalingFactorLower)?,
                self.require(ParameterSlot::ScalingFactorUpper)?,
                self.require(ParameterSlot::TauOne)?,
                self.require(ParameterSlot::TauTwo)?,
                self.require(ParameterSlot::Alpha)?,
                self.count(ParameterSlot::LocalSearchSweeps)?,
            )?
            .into(),
            AlgorithmKind::ShortDistanceExploration => {
                ShortDistanceExploration::new(self.require(ParameterSlot::Alpha)?)?.into()
            }
        };
        Ok(optimizer)
    }

    fn require(&self, slot: ParameterSlot) -> Result<f64> {
        self.get(slot)
            .ok_or_else(|| OptimizationError::MissingParameter {
                algorithm: self.kind.name().to_string(),
                slot,
            })
    }

    fn count(&self, slot: ParameterSlot) -> Result<usize> {
        let value = self.require(slot)?;
        if !value.is_finite() || value < 0.0 || value.fract() != 0.0 {
            return Err(OptimizationError::Configuration(format!(
                "{} must be a non-negative integer, got {}",
                slot, value
            )));
        }
        if value > MAX_COUNT as f64 {
            return Err(OptimizationError::Configuration(format!(
                "{} must be at most {}, got {}",
                slot, MAX_COUNT, value
            )));
        }
        Ok(value as usize)
    }
}
