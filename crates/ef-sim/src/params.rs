//! Simulation parameters and their validation.

use crate::error::{SimError, SimResult};
use crate::system::SystemType;
use ef_core::units::{HeatCapacity, Mass, SpecificHeat, Temperature, Time};
use ef_core::{ensure_non_negative, ensure_positive, j_per_k, j_per_kg_k, k, kg, s};

/// Upper bound on the number of samples a single run may allocate.
pub const MAX_STEPS: usize = 10_000_000;

/// Configuration of a reservoir pair run, all values in SI units.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SimulationParameters {
    /// Initial hot reservoir temperature (K)
    pub t_hot_initial_k: f64,
    /// Initial cold reservoir temperature (K)
    pub t_cold_initial_k: f64,
    /// Hot reservoir mass (kg)
    pub mass_hot_kg: f64,
    /// Cold reservoir mass (kg)
    pub mass_cold_kg: f64,
    /// Specific heat shared by both reservoirs (J/(kg·K))
    pub specific_heat_j_per_kg_k: f64,
    /// Conductance between the reservoirs (W/K)
    pub heat_transfer_coefficient_w_per_k: f64,
    pub system_type: SystemType,
    /// Integration step (s)
    pub time_step_s: f64,
    /// Horizon (s)
    pub max_time_s: f64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            t_hot_initial_k: 400.0,
            t_cold_initial_k: 300.0,
            mass_hot_kg: 1.0,
            mass_cold_kg: 1.0,
            specific_heat_j_per_kg_k: 1000.0,
            heat_transfer_coefficient_w_per_k: 50.0,
            system_type: SystemType::Closed,
            time_step_s: 0.1,
            max_time_s: 200.0,
        }
    }
}

impl SimulationParameters {
    /// Check every field and return the number of samples `n = ceil(t_max / dt)`.
    pub fn validate(&self) -> SimResult<usize> {
        ensure_positive(self.t_hot_initial_k, "t_hot_initial_k")?;
        ensure_positive(self.t_cold_initial_k, "t_cold_initial_k")?;
        ensure_positive(self.mass_hot_kg, "mass_hot_kg")?;
        ensure_positive(self.mass_cold_kg, "mass_cold_kg")?;
        ensure_positive(self.specific_heat_j_per_kg_k, "specific_heat_j_per_kg_k")?;
        ensure_non_negative(
            self.heat_transfer_coefficient_w_per_k,
            "heat_transfer_coefficient_w_per_k",
        )?;
        ensure_positive(self.time_step_s, "time_step_s")?;
        ensure_positive(self.max_time_s, "max_time_s")?;
        self.n_steps()
    }

    /// Number of samples in the series. Assumes `dt` and `t_max` are positive and finite.
    pub fn n_steps(&self) -> SimResult<usize> {
        let n = (self.max_time_s / self.time_step_s).ceil();
        if !n.is_finite() || n < 1.0 {
            return Err(SimError::InvalidParameter {
                what: "n_steps",
                value: n,
            });
        }
        if n > MAX_STEPS as f64 {
            return Err(SimError::InvalidParameter {
                what: "n_steps exceeds MAX_STEPS",
                value: n,
            });
        }
        Ok(n as usize)
    }

    /// m_hot · c_p (J/K)
    pub fn heat_capacity_hot(&self) -> f64 {
        self.mass_hot_kg * self.specific_heat_j_per_kg_k
    }

    /// m_cold · c_p (J/K)
    pub fn heat_capacity_cold(&self) -> f64 {
        self.mass_cold_kg * self.specific_heat_j_per_kg_k
    }

    /// Common final temperature fixed by energy conservation.
    pub fn equilibrium_temperature(&self) -> f64 {
        let c_hot = self.heat_capacity_hot();
        let c_cold = self.heat_capacity_cold();
        (c_hot * self.t_hot_initial_k + c_cold * self.t_cold_initial_k) / (c_hot + c_cold)
    }

    /// Per-step decay factor of the temperature difference is `1 - stability_number()`.
    ///
    /// Above 1 the explicit update overshoots equilibrium; at 2 and beyond it diverges.
    pub fn stability_number(&self) -> f64 {
        if !self.system_type.exchanges_energy() {
            return 0.0;
        }
        self.heat_transfer_coefficient_w_per_k
            * self.time_step_s
            * (1.0 / self.heat_capacity_hot() + 1.0 / self.heat_capacity_cold())
    }

    pub fn with_temperatures(mut self, t_hot_k: f64, t_cold_k: f64) -> Self {
        self.t_hot_initial_k = t_hot_k;
        self.t_cold_initial_k = t_cold_k;
        self
    }

    pub fn with_masses(mut self, mass_hot_kg: f64, mass_cold_kg: f64) -> Self {
        self.mass_hot_kg = mass_hot_kg;
        self.mass_cold_kg = mass_cold_kg;
        self
    }

    /// Hot mass set to `ratio` kg against a 1 kg cold reservoir.
    pub fn with_mass_ratio(self, ratio: f64) -> Self {
        self.with_masses(ratio, 1.0)
    }

    pub fn with_specific_heat(mut self, cp_j_per_kg_k: f64) -> Self {
        self.specific_heat_j_per_kg_k = cp_j_per_kg_k;
        self
    }

    pub fn with_heat_transfer_coefficient(mut self, h_w_per_k: f64) -> Self {
        self.heat_transfer_coefficient_w_per_k = h_w_per_k;
        self
    }

    pub fn with_system_type(mut self, system_type: SystemType) -> Self {
        self.system_type = system_type;
        self
    }

    pub fn with_timing(mut self, time_step_s: f64, max_time_s: f64) -> Self {
        self.time_step_s = time_step_s;
        self.max_time_s = max_time_s;
        self
    }

    // Typed views

    pub fn hot_temperature(&self) -> Temperature {
        k(self.t_hot_initial_k)
    }

    pub fn cold_temperature(&self) -> Temperature {
        k(self.t_cold_initial_k)
    }

    pub fn mass_hot(&self) -> Mass {
        kg(self.mass_hot_kg)
    }

    pub fn mass_cold(&self) -> Mass {
        kg(self.mass_cold_kg)
    }

    pub fn specific_heat(&self) -> SpecificHeat {
        j_per_kg_k(self.specific_heat_j_per_kg_k)
    }

    pub fn total_heat_capacity(&self) -> HeatCapacity {
        j_per_k(self.heat_capacity_hot() + self.heat_capacity_cold())
    }

    pub fn time_step(&self) -> Time {
        s(self.time_step_s)
    }

    pub fn max_time(&self) -> Time {
        s(self.max_time_s)
    }
}
