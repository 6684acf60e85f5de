//! The reservoir pair simulator: owns parameters, the series and the replay cursor.

use crate::equilibrium::EquilibriumAnalysis;
use crate::error::{SimError, SimResult};
use crate::integrator::{ForwardEuler, Integrator};
use crate::model::TransientModel;
use crate::params::SimulationParameters;
use crate::reservoir::{ReservoirPair, ReservoirState};
use crate::series::{SimulationSeries, StepRecord};
use crate::system::SystemType;

/// Replayable simulation of conduction between a hot and a cold reservoir.
///
/// The full series is allocated up front; `step` fills it one index at a time and
/// `current_step` tracks how far the replay has progressed.
#[derive(Clone, Debug)]
pub struct ReservoirPairSimulator {
    params: SimulationParameters,
    model: ReservoirPair,
    integrator: ForwardEuler,
    equilibrium_temperature_k: f64,
    series: SimulationSeries,
    current_step: usize,
}

/// Deviation of the replay position from the closed-form endpoint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClosedFormComparison {
    pub analysis: EquilibriumAnalysis,
    pub record: StepRecord,
    /// |T_hot − T_eq| (K)
    pub hot_deviation_k: f64,
    /// |T_cold − T_eq| (K)
    pub cold_deviation_k: f64,
    /// (S_gen − ΔS_total) / ΔS_total, zero when ΔS_total is zero
    pub entropy_relative_error: f64,
}

impl ReservoirPairSimulator {
    /// Create a simulator from validated parameters with the series at its initial conditions.
    pub fn new(params: SimulationParameters) -> SimResult<Self> {
        let n = params.validate()?;
        let model = ReservoirPair::from_parameters(&params);
        let series = SimulationSeries::new(n, params.time_step_s, &model.initial_state());
        let sim = Self {
            equilibrium_temperature_k: params.equilibrium_temperature(),
            params,
            model,
            integrator: ForwardEuler,
            series,
            current_step: 0,
        };
        sim.log_configuration();
        Ok(sim)
    }

    /// Replace all parameters at once.
    ///
    /// The candidate is validated before anything changes; on error the simulator keeps its
    /// previous parameters and series. On success the equilibrium temperature is recomputed
    /// and the series is reallocated at its initial conditions.
    pub fn set_parameters(&mut self, params: SimulationParameters) -> SimResult<()> {
        *self = Self::new(params)?;
        Ok(())
    }

    /// Apply an in-place edit to a copy of the parameters, then `set_parameters`.
    pub fn configure(&mut self, edit: impl FnOnce(&mut SimulationParameters)) -> SimResult<()> {
        let mut candidate = self.params.clone();
        edit(&mut candidate);
        self.set_parameters(candidate)
    }

    pub fn set_t_hot_initial(&mut self, t_hot_k: f64) -> SimResult<()> {
        self.configure(|p| p.t_hot_initial_k = t_hot_k)
    }

    pub fn set_t_cold_initial(&mut self, t_cold_k: f64) -> SimResult<()> {
        self.configure(|p| p.t_cold_initial_k = t_cold_k)
    }

    pub fn set_mass_hot(&mut self, mass_kg: f64) -> SimResult<()> {
        self.configure(|p| p.mass_hot_kg = mass_kg)
    }

    pub fn set_mass_cold(&mut self, mass_kg: f64) -> SimResult<()> {
        self.configure(|p| p.mass_cold_kg = mass_kg)
    }

    pub fn set_specific_heat(&mut self, cp_j_per_kg_k: f64) -> SimResult<()> {
        self.configure(|p| p.specific_heat_j_per_kg_k = cp_j_per_kg_k)
    }

    pub fn set_heat_transfer_coefficient(&mut self, h_w_per_k: f64) -> SimResult<()> {
        self.configure(|p| p.heat_transfer_coefficient_w_per_k = h_w_per_k)
    }

    pub fn set_system_type(&mut self, system_type: SystemType) -> SimResult<()> {
        self.configure(|p| p.system_type = system_type)
    }

    pub fn set_time_step(&mut self, dt_s: f64) -> SimResult<()> {
        self.configure(|p| p.time_step_s = dt_s)
    }

    pub fn set_max_time(&mut self, t_max_s: f64) -> SimResult<()> {
        self.configure(|p| p.max_time_s = t_max_s)
    }

    /// Restore the initial conditions and rewind the cursor. Parameters are unchanged.
    pub fn reset(&mut self) {
        self.series.reinitialize(&self.model.initial_state());
        self.current_step = 0;
        tracing::debug!(n_steps = self.n_steps(), "simulation reset");
    }

    /// Advance from `current_step` to the next index.
    ///
    /// Returns `Ok(false)` without touching anything once the series is exhausted. Returns
    /// `InvalidState` if the update would produce a non-physical temperature; the series and
    /// cursor are left at the pre-step index in that case.
    pub fn step(&mut self) -> SimResult<bool> {
        let i = self.current_step;
        if i + 1 >= self.n_steps() {
            return Ok(false);
        }

        let x = self
            .series
            .state(i)
            .ok_or(SimError::Invariant {
                what: "current_step outside series",
            })?;
        let t = self.series.time()[i];
        let dt = self.params.time_step_s;

        let rates = self.model.rhs(t, &x)?;
        let next = self.integrator.advance(&self.model, &x, &rates, dt);
        check_physical(&next, i + 1)?;

        self.series.write_step(i, rates.heat_j, &next);
        self.current_step = i + 1;

        tracing::trace!(
            step = i + 1,
            q_dot_w = rates.heat_j,
            t_hot_k = next.t_hot_k,
            t_cold_k = next.t_cold_k,
            "step"
        );
        Ok(true)
    }

    /// Take up to `n` steps; returns how many advanced.
    pub fn step_n(&mut self, n: usize) -> SimResult<usize> {
        let mut taken = 0;
        while taken < n && self.step()? {
            taken += 1;
        }
        Ok(taken)
    }

    /// Reset, then step until the series is full.
    pub fn run_to_completion(&mut self) -> SimResult<()> {
        self.reset();
        while self.step()? {}

        let last = self.current_record();
        tracing::debug!(
            steps = self.current_step,
            t_hot_k = last.t_hot_k,
            t_cold_k = last.t_cold_k,
            entropy_j_per_k = last.entropy_generated_j_per_k,
            "run complete"
        );
        Ok(())
    }

    pub fn parameters(&self) -> &SimulationParameters {
        &self.params
    }

    pub fn equilibrium_temperature(&self) -> f64 {
        self.equilibrium_temperature_k
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn n_steps(&self) -> usize {
        self.series.len()
    }

    pub fn system_type(&self) -> SystemType {
        self.params.system_type
    }

    /// Full pre-sized series. Slots past `current_step` are not yet meaningful.
    pub fn series(&self) -> &SimulationSeries {
        &self.series
    }

    pub fn record(&self, i: usize) -> Option<StepRecord> {
        self.series.record(i)
    }

    pub fn current_record(&self) -> StepRecord {
        // n_steps >= 1 and current_step < n_steps always hold
        self.series.record(self.current_step).unwrap_or(StepRecord {
            index: self.current_step,
            time_s: 0.0,
            t_hot_k: self.params.t_hot_initial_k,
            t_cold_k: self.params.t_cold_initial_k,
            heat_flux_w: 0.0,
            heat_transferred_j: 0.0,
            entropy_generated_j_per_k: 0.0,
        })
    }

    /// Records from index 0 through `current_step`.
    pub fn records(&self) -> impl Iterator<Item = StepRecord> + '_ {
        self.series.records(self.current_step)
    }

    pub fn is_finished(&self) -> bool {
        self.current_step + 1 >= self.n_steps()
    }

    /// Fraction of the replay completed, in [0, 1].
    pub fn progress(&self) -> f64 {
        let last = self.n_steps().saturating_sub(1);
        if last == 0 {
            1.0
        } else {
            self.current_step as f64 / last as f64
        }
    }

    /// Closed-form analysis of the current parameters.
    pub fn equilibrium_analysis(&self, ambient_k: f64) -> SimResult<EquilibriumAnalysis> {
        EquilibriumAnalysis::compute(&self.params, ambient_k)
    }

    /// Compare the record at `current_step` against the closed-form endpoint.
    pub fn compare_with_closed_form(&self, ambient_k: f64) -> SimResult<ClosedFormComparison> {
        let analysis = self.equilibrium_analysis(ambient_k)?;
        let record = self.current_record();
        let expected = analysis.delta_s_total_j_per_k;
        let entropy_relative_error = if expected == 0.0 {
            0.0
        } else {
            (record.entropy_generated_j_per_k - expected) / expected
        };
        Ok(ClosedFormComparison {
            analysis,
            record,
            hot_deviation_k: (record.t_hot_k - analysis.t_eq_k).abs(),
            cold_deviation_k: (record.t_cold_k - analysis.t_eq_k).abs(),
            entropy_relative_error,
        })
    }

    fn log_configuration(&self) {
        let sigma = self.params.stability_number();
        tracing::debug!(
            system_type = %self.params.system_type,
            t_eq_k = self.equilibrium_temperature_k,
            n_steps = self.n_steps(),
            stability_number = sigma,
            "simulation configured"
        );
        if sigma > 1.0 {
            tracing::warn!(
                stability_number = sigma,
                "time step overshoots equilibrium; reduce dt or the heat transfer coefficient"
            );
        }
    }
}

fn check_physical(x: &ReservoirState, step: usize) -> SimResult<()> {
    for (what, value) in [("t_hot_k", x.t_hot_k), ("t_cold_k", x.t_cold_k)] {
        if !value.is_finite() || value <= 0.0 {
            return Err(SimError::InvalidState { what, step, value });
        }
    }
    Ok(())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn stable_params() -> impl Strategy<Value = SimulationParameters> {
        (
            250.0_f64..400.0,
            1.0_f64..200.0,
            0.2_f64..5.0,
            0.2_f64..5.0,
            100.0_f64..5000.0,
            1.0_f64..200.0,
            0.01_f64..1.0,
            1.0_f64..30.0,
            prop::sample::select(vec![SystemType::Closed, SystemType::Open]),
        )
            .prop_map(|(t_cold, dt_k, m_hot, m_cold, cp, h, dt, t_max, system)| {
                SimulationParameters::default()
                    .with_temperatures(t_cold + dt_k, t_cold)
                    .with_masses(m_hot, m_cold)
                    .with_specific_heat(cp)
                    .with_heat_transfer_coefficient(h)
                    .with_timing(dt, t_max)
                    .with_system_type(system)
            })
            .prop_filter("explicit update must not overshoot", |p| {
                p.stability_number() < 1.0
            })
    }

    proptest! {
        #[test]
        fn energy_is_conserved(params in stable_params()) {
            let mut sim = ReservoirPairSimulator::new(params.clone()).unwrap();
            sim.run_to_completion().unwrap();
            let s = sim.series();
            let c_hot = params.heat_capacity_hot();
            let c_cold = params.heat_capacity_cold();
            let scale = c_hot * s.t_hot()[0] + c_cold * s.t_cold()[0];
            for i in 0..sim.n_steps() {
                let imbalance = c_hot * (s.t_hot()[i] - s.t_hot()[0])
                    + c_cold * (s.t_cold()[i] - s.t_cold()[0]);
                prop_assert!(imbalance.abs() <= 1e-9 * scale, "i={} imbalance={}", i, imbalance);
            }
        }

        #[test]
        fn entropy_is_monotone_and_positive(params in stable_params()) {
            let mut sim = ReservoirPairSimulator::new(params).unwrap();
            sim.run_to_completion().unwrap();
            let s = sim.series();
            for i in 1..sim.n_steps() {
                prop_assert!(s.entropy_generated()[i] >= s.entropy_generated()[i - 1]);
                prop_assert!(s.entropy_generated()[i] > 0.0);
            }
        }

        #[test]
        fn temperature_gap_never_widens(params in stable_params()) {
            let mut sim = ReservoirPairSimulator::new(params).unwrap();
            sim.run_to_completion().unwrap();
            let s = sim.series();
            for i in 1..sim.n_steps() {
                let gap = (s.t_hot()[i] - s.t_cold()[i]).abs();
                let prev = (s.t_hot()[i - 1] - s.t_cold()[i - 1]).abs();
                prop_assert!(gap <= prev + 1e-9);
            }
        }

        #[test]
        fn isolated_series_is_constant(params in stable_params()) {
            let params = params.with_system_type(SystemType::Isolated);
            let mut sim = ReservoirPairSimulator::new(params).unwrap();
            sim.run_to_completion().unwrap();
            for r in sim.records() {
                prop_assert_eq!(r.t_hot_k, sim.series().t_hot()[0]);
                prop_assert_eq!(r.t_cold_k, sim.series().t_cold()[0]);
                prop_assert_eq!(r.heat_flux_w, 0.0);
                prop_assert_eq!(r.heat_transferred_j, 0.0);
                prop_assert_eq!(r.entropy_generated_j_per_k, 0.0);
            }
        }
    }
}
