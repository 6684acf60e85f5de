//! Entropy generation as a function of the initial temperature difference.
//!
//! Sweeps the hot reservoir's initial temperature against a fixed cold reservoir. Each point
//! carries the closed-form entropy and, optionally, the entropy accumulated by a full stepped
//! run. Stepped runs are independent and evaluated in parallel.

use crate::equilibrium::EquilibriumAnalysis;
use crate::error::{SimError, SimResult};
use crate::params::SimulationParameters;
use crate::simulator::ReservoirPairSimulator;
use ef_core::units::constants::AMBIENT_K;
use ef_core::{ensure_positive, linspace};
use rayon::prelude::*;

/// Upper bound on sweep resolution.
pub const MAX_SWEEP_POINTS: usize = 100_000;

/// Definition of a linear sweep over the hot reservoir's initial temperature.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntropySweep {
    pub t_cold_k: f64,
    pub t_hot_start_k: f64,
    pub t_hot_end_k: f64,
    pub points: usize,
}

impl Default for EntropySweep {
    fn default() -> Self {
        Self {
            t_cold_k: 300.0,
            t_hot_start_k: 310.0,
            t_hot_end_k: 500.0,
            points: 50,
        }
    }
}

/// One evaluated point of a sweep.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SweepPoint {
    pub t_hot_k: f64,
    /// T_hot0 − T_cold0 (K)
    pub delta_t_k: f64,
    pub closed_form_entropy_j_per_k: f64,
    /// Final cumulative entropy of a stepped run, when requested.
    pub simulated_entropy_j_per_k: Option<f64>,
}

impl EntropySweep {
    pub fn validate(&self) -> SimResult<()> {
        ensure_positive(self.t_cold_k, "t_cold_k")?;
        ensure_positive(self.t_hot_start_k, "t_hot_start_k")?;
        ensure_positive(self.t_hot_end_k, "t_hot_end_k")?;
        if self.points < 2 {
            return Err(SimError::InvalidArg {
                what: "sweep must have at least 2 points",
            });
        }
        if self.points > MAX_SWEEP_POINTS {
            return Err(SimError::InvalidArg {
                what: "sweep points exceed MAX_SWEEP_POINTS",
            });
        }
        if (self.t_hot_start_k - self.t_hot_end_k).abs() < 1e-12 {
            return Err(SimError::InvalidArg {
                what: "sweep start and end must differ",
            });
        }
        Ok(())
    }

    pub fn hot_temperatures(&self) -> Vec<f64> {
        linspace(self.t_hot_start_k, self.t_hot_end_k, self.points)
    }

    /// Evaluate every point using `base` for masses, specific heat, conductance and timing.
    ///
    /// With `simulate`, each point also runs the stepped simulation to completion.
    pub fn evaluate(
        &self,
        base: &SimulationParameters,
        simulate: bool,
    ) -> SimResult<Vec<SweepPoint>> {
        self.validate()?;
        base.validate()?;

        let points = self
            .hot_temperatures()
            .into_par_iter()
            .map(|t_hot| self.evaluate_point(base, t_hot, simulate))
            .collect::<SimResult<Vec<_>>>()?;

        tracing::debug!(points = points.len(), simulate, "entropy sweep evaluated");
        Ok(points)
    }

    fn evaluate_point(
        &self,
        base: &SimulationParameters,
        t_hot_k: f64,
        simulate: bool,
    ) -> SimResult<SweepPoint> {
        let params = base.clone().with_temperatures(t_hot_k, self.t_cold_k);
        let analysis = EquilibriumAnalysis::compute(&params, AMBIENT_K)?;

        let simulated_entropy_j_per_k = if simulate {
            let mut sim = ReservoirPairSimulator::new(params)?;
            sim.run_to_completion()?;
            Some(sim.current_record().entropy_generated_j_per_k)
        } else {
            None
        };

        Ok(SweepPoint {
            t_hot_k,
            delta_t_k: t_hot_k - self.t_cold_k,
            closed_form_entropy_j_per_k: analysis.delta_s_total_j_per_k,
            simulated_entropy_j_per_k,
        })
    }
}
