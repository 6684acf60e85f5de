//! Closed-form equilibrium endpoint of the conduction process.
//!
//! Computed directly from the initial conditions, never from a stepped series, so it can
//! serve as an oracle for the time integration.

use crate::error::SimResult;
use crate::params::SimulationParameters;
use ef_core::units::{Energy, HeatCapacity, Ratio, Temperature};
use ef_core::{ensure_positive, j, j_per_k, k, unitless};
use std::fmt;

/// Equilibrium temperature, entropy balance and exergy figures of the full process.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquilibriumAnalysis {
    pub t_hot_initial_k: f64,
    pub t_cold_initial_k: f64,
    pub ambient_k: f64,
    pub t_eq_k: f64,
    /// m_hot · c_p · (T_hot0 − T_eq)
    pub heat_transferred_j: f64,
    pub delta_s_hot_j_per_k: f64,
    pub delta_s_cold_j_per_k: f64,
    pub delta_s_total_j_per_k: f64,
    /// Exergy destroyed: T_ambient · ΔS_total
    pub lost_work_j: f64,
    /// 1 − T_cold0 / T_hot0
    pub carnot_efficiency: f64,
    /// Carnot-limited work from the same heat: η · Q
    pub max_reversible_work_j: f64,
}

impl EquilibriumAnalysis {
    /// Analysis for the temperatures, masses and specific heat in `params`.
    ///
    /// Independent of the system type, conductance and timing.
    pub fn compute(params: &SimulationParameters, ambient_k: f64) -> SimResult<Self> {
        Self::from_initial_conditions(
            params.t_hot_initial_k,
            params.t_cold_initial_k,
            params.mass_hot_kg,
            params.mass_cold_kg,
            params.specific_heat_j_per_kg_k,
            ambient_k,
        )
    }

    pub fn from_initial_conditions(
        t_hot0_k: f64,
        t_cold0_k: f64,
        mass_hot_kg: f64,
        mass_cold_kg: f64,
        cp_j_per_kg_k: f64,
        ambient_k: f64,
    ) -> SimResult<Self> {
        ensure_positive(t_hot0_k, "t_hot_initial_k")?;
        ensure_positive(t_cold0_k, "t_cold_initial_k")?;
        ensure_positive(mass_hot_kg, "mass_hot_kg")?;
        ensure_positive(mass_cold_kg, "mass_cold_kg")?;
        ensure_positive(cp_j_per_kg_k, "specific_heat_j_per_kg_k")?;
        ensure_positive(ambient_k, "ambient_k")?;

        let c_hot = mass_hot_kg * cp_j_per_kg_k;
        let c_cold = mass_cold_kg * cp_j_per_kg_k;
        let t_eq = (c_hot * t_hot0_k + c_cold * t_cold0_k) / (c_hot + c_cold);

        let heat = c_hot * (t_hot0_k - t_eq);
        let ds_hot = c_hot * (t_eq / t_hot0_k).ln();
        let ds_cold = c_cold * (t_eq / t_cold0_k).ln();
        let ds_total = ds_hot + ds_cold;
        let eta = 1.0 - t_cold0_k / t_hot0_k;

        Ok(Self {
            t_hot_initial_k: t_hot0_k,
            t_cold_initial_k: t_cold0_k,
            ambient_k,
            t_eq_k: t_eq,
            heat_transferred_j: heat,
            delta_s_hot_j_per_k: ds_hot,
            delta_s_cold_j_per_k: ds_cold,
            delta_s_total_j_per_k: ds_total,
            lost_work_j: ambient_k * ds_total,
            carnot_efficiency: eta,
            max_reversible_work_j: eta * heat,
        })
    }

    pub fn equilibrium_temperature(&self) -> Temperature {
        k(self.t_eq_k)
    }

    pub fn heat_transferred(&self) -> Energy {
        j(self.heat_transferred_j)
    }

    pub fn entropy_generated(&self) -> HeatCapacity {
        j_per_k(self.delta_s_total_j_per_k)
    }

    pub fn lost_work(&self) -> Energy {
        j(self.lost_work_j)
    }

    pub fn carnot_efficiency(&self) -> Ratio {
        unitless(self.carnot_efficiency)
    }

    pub fn max_reversible_work(&self) -> Energy {
        j(self.max_reversible_work_j)
    }
}

impl fmt::Display for EquilibriumAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Initial:        T_hot = {:.2} K, T_cold = {:.2} K",
            self.t_hot_initial_k, self.t_cold_initial_k
        )?;
        writeln!(f, "Equilibrium:    T_eq = {:.2} K", self.t_eq_k)?;
        writeln!(
            f,
            "Heat:           Q = {:.2} J ({:.3} kJ)",
            self.heat_transferred_j,
            self.heat_transferred_j / 1000.0
        )?;
        writeln!(f, "Entropy hot:    {:+.2} J/K", self.delta_s_hot_j_per_k)?;
        writeln!(f, "Entropy cold:   {:+.2} J/K", self.delta_s_cold_j_per_k)?;
        writeln!(f, "Entropy total:  {:+.2} J/K", self.delta_s_total_j_per_k)?;
        writeln!(
            f,
            "Lost work:      {:.2} J at T_ambient = {:.2} K",
            self.lost_work_j, self.ambient_k
        )?;
        write!(
            f,
            "Carnot limit:   eta = {:.2}%, W_max = {:.2} J",
            self.carnot_efficiency * 100.0,
            self.max_reversible_work_j
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;
    use ef_core::{Tolerances, nearly_equal};

    fn tol() -> Tolerances {
        Tolerances {
            abs: 1e-9,
            rel: 1e-9,
        }
    }

    #[test]
    fn demonstration_values() {
        let a = EquilibriumAnalysis::compute(&SimulationParameters::default(), 298.0).unwrap();
        assert!(nearly_equal(a.t_eq_k, 350.0, tol()));
        assert!(nearly_equal(a.heat_transferred_j, 50_000.0, tol()));
        assert!((a.delta_s_hot_j_per_k - (-133.53)).abs() < 0.01);
        assert!((a.delta_s_cold_j_per_k - 154.15).abs() < 0.01);
        assert!((a.delta_s_total_j_per_k - 20.62).abs() < 0.01);
        assert!(nearly_equal(a.carnot_efficiency, 0.25, tol()));
        assert!(nearly_equal(a.max_reversible_work_j, 12_500.0, tol()));
        assert!(nearly_equal(a.lost_work_j, 298.0 * a.delta_s_total_j_per_k, tol()));
    }

    #[test]
    fn equal_temperatures_generate_nothing() {
        let a = EquilibriumAnalysis::from_initial_conditions(320.0, 320.0, 2.0, 1.0, 900.0, 298.0)
            .unwrap();
        assert_eq!(a.t_eq_k, 320.0);
        assert_eq!(a.heat_transferred_j, 0.0);
        assert_eq!(a.delta_s_total_j_per_k, 0.0);
        assert_eq!(a.carnot_efficiency, 0.0);
        assert_eq!(a.max_reversible_work_j, 0.0);
    }

    #[test]
    fn entropy_generated_grows_with_difference() {
        let small = EquilibriumAnalysis::from_initial_conditions(320.0, 300.0, 1.0, 1.0, 1000.0, 298.0)
            .unwrap();
        let large = EquilibriumAnalysis::from_initial_conditions(500.0, 300.0, 1.0, 1.0, 1000.0, 298.0)
            .unwrap();
        assert!(small.delta_s_total_j_per_k > 0.0);
        assert!(large.delta_s_total_j_per_k > small.delta_s_total_j_per_k);
    }

    #[test]
    fn unequal_masses_shift_equilibrium() {
        let p = SimulationParameters::default().with_mass_ratio(0.2);
        let a = EquilibriumAnalysis::compute(&p, 298.0).unwrap();
        // (0.2*400 + 300) / 1.2
        assert!(nearly_equal(a.t_eq_k, 380.0 / 1.2, tol()));
        assert!(a.delta_s_total_j_per_k > 0.0);
    }

    #[test]
    fn rejects_invalid_inputs() {
        assert!(matches!(
            EquilibriumAnalysis::compute(&SimulationParameters::default(), 0.0),
            Err(SimError::InvalidParameter {
                what: "ambient_k",
                ..
            })
        ));
        let p = SimulationParameters::default().with_specific_heat(-1.0);
        assert!(EquilibriumAnalysis::compute(&p, 298.0).is_err());
    }

    #[test]
    fn typed_accessors() {
        let a = EquilibriumAnalysis::compute(&SimulationParameters::default(), 298.0).unwrap();
        assert!(nearly_equal(a.equilibrium_temperature().value, 350.0, tol()));
        assert!(nearly_equal(a.heat_transferred().value, 50_000.0, tol()));
        assert!(nearly_equal(a.entropy_generated().value, a.delta_s_total_j_per_k, tol()));
        assert!(nearly_equal(a.carnot_efficiency().value, 0.25, tol()));
        assert!(a.lost_work().value > 0.0);
        assert!(nearly_equal(a.max_reversible_work().value, 12_500.0, tol()));
    }

    #[test]
    fn display_mentions_key_figures() {
        let a = EquilibriumAnalysis::compute(&SimulationParameters::default(), 298.0).unwrap();
        let text = a.to_string();
        assert!(text.contains("T_eq = 350.00 K"));
        assert!(text.contains("+20.62 J/K"));
        assert!(text.contains("eta = 25.00%"));
    }
}
