//! Reservoir pair physics: conduction between two lumped thermal masses.

use crate::error::SimResult;
use crate::model::TransientModel;
use crate::params::SimulationParameters;
use crate::system::SystemType;

/// Instantaneous heat transfer rate from hot to cold (W).
///
/// Positive when `t_hot_k > t_cold_k`. Always zero for an isolated system.
pub fn heat_transfer_rate(
    system_type: SystemType,
    h_w_per_k: f64,
    t_hot_k: f64,
    t_cold_k: f64,
) -> f64 {
    if !system_type.exchanges_energy() {
        return 0.0;
    }
    h_w_per_k * (t_hot_k - t_cold_k)
}

/// Entropy generation rate of heat `q_dot_w` crossing from `t_hot_k` to `t_cold_k` (W/K).
///
/// Non-negative whenever heat flows down the temperature gradient; exactly zero when no heat
/// flows or the temperatures are equal.
pub fn entropy_generation_rate(q_dot_w: f64, t_hot_k: f64, t_cold_k: f64) -> f64 {
    if q_dot_w == 0.0 || t_hot_k == t_cold_k {
        return 0.0;
    }
    q_dot_w * (1.0 / t_cold_k - 1.0 / t_hot_k)
}

/// State of the reservoir pair.
///
/// Used both as the state and as its time derivative: as a derivative the fields hold
/// dT_hot/dt, dT_cold/dt, the heat flux (W) and the entropy generation rate (W/K).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ReservoirState {
    pub t_hot_k: f64,
    pub t_cold_k: f64,
    /// Cumulative heat transferred hot -> cold (J)
    pub heat_j: f64,
    /// Cumulative entropy generated (J/K)
    pub entropy_j_per_k: f64,
}

/// Two reservoirs coupled by a conductance.
#[derive(Clone, Debug)]
pub struct ReservoirPair {
    system_type: SystemType,
    h_w_per_k: f64,
    c_hot_j_per_k: f64,
    c_cold_j_per_k: f64,
    initial: ReservoirState,
}

impl ReservoirPair {
    /// Build from parameters that have already been validated.
    pub fn from_parameters(params: &SimulationParameters) -> Self {
        Self {
            system_type: params.system_type,
            h_w_per_k: params.heat_transfer_coefficient_w_per_k,
            c_hot_j_per_k: params.heat_capacity_hot(),
            c_cold_j_per_k: params.heat_capacity_cold(),
            initial: ReservoirState {
                t_hot_k: params.t_hot_initial_k,
                t_cold_k: params.t_cold_initial_k,
                heat_j: 0.0,
                entropy_j_per_k: 0.0,
            },
        }
    }
}

impl TransientModel for ReservoirPair {
    type State = ReservoirState;

    fn initial_state(&self) -> ReservoirState {
        self.initial
    }

    fn rhs(&mut self, _t: f64, x: &ReservoirState) -> SimResult<ReservoirState> {
        let q_dot = heat_transfer_rate(self.system_type, self.h_w_per_k, x.t_hot_k, x.t_cold_k);

        let (dt_hot, dt_cold) = if self.system_type.exchanges_energy() {
            (-q_dot / self.c_hot_j_per_k, q_dot / self.c_cold_j_per_k)
        } else {
            (0.0, 0.0)
        };

        Ok(ReservoirState {
            t_hot_k: dt_hot,
            t_cold_k: dt_cold,
            heat_j: q_dot,
            entropy_j_per_k: entropy_generation_rate(q_dot, x.t_hot_k, x.t_cold_k),
        })
    }

    fn add(&self, a: &ReservoirState, b: &ReservoirState) -> ReservoirState {
        ReservoirState {
            t_hot_k: a.t_hot_k + b.t_hot_k,
            t_cold_k: a.t_cold_k + b.t_cold_k,
            heat_j: a.heat_j + b.heat_j,
            entropy_j_per_k: a.entropy_j_per_k + b.entropy_j_per_k,
        }
    }

    fn scale(&self, a: &ReservoirState, scale: f64) -> ReservoirState {
        ReservoirState {
            t_hot_k: a.t_hot_k * scale,
            t_cold_k: a.t_cold_k * scale,
            heat_j: a.heat_j * scale,
            entropy_j_per_k: a.entropy_j_per_k * scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heat_rate_follows_gradient() {
        assert_eq!(heat_transfer_rate(SystemType::Closed, 50.0, 400.0, 300.0), 5000.0);
        assert_eq!(heat_transfer_rate(SystemType::Open, 50.0, 400.0, 300.0), 5000.0);
        assert_eq!(heat_transfer_rate(SystemType::Closed, 50.0, 300.0, 400.0), -5000.0);
        assert_eq!(heat_transfer_rate(SystemType::Isolated, 50.0, 400.0, 300.0), 0.0);
    }

    #[test]
    fn entropy_rate_zero_cases() {
        assert_eq!(entropy_generation_rate(0.0, 400.0, 300.0), 0.0);
        assert_eq!(entropy_generation_rate(5000.0, 350.0, 350.0), 0.0);
    }

    #[test]
    fn entropy_rate_positive_in_both_directions() {
        let forward = entropy_generation_rate(5000.0, 400.0, 300.0);
        assert!((forward - 5000.0 * (1.0 / 300.0 - 1.0 / 400.0)).abs() < 1e-12);
        assert!(forward > 0.0);

        // Reversed gradient: the rate keeps its sign because q_dot flips too.
        let q = heat_transfer_rate(SystemType::Closed, 50.0, 300.0, 400.0);
        assert!(entropy_generation_rate(q, 300.0, 400.0) > 0.0);
    }

    #[test]
    fn rhs_conserves_energy() {
        let params = SimulationParameters::default().with_mass_ratio(2.5);
        let mut pair = ReservoirPair::from_parameters(&params);
        let x = pair.initial_state();
        let xdot = pair.rhs(0.0, &x).unwrap();
        let de = params.heat_capacity_hot() * xdot.t_hot_k
            + params.heat_capacity_cold() * xdot.t_cold_k;
        assert!(de.abs() < 1e-9);
        assert_eq!(xdot.heat_j, 5000.0);
    }

    #[test]
    fn euler_step_keeps_internal_energy() {
        use crate::integrator::{ForwardEuler, Integrator};

        let params = SimulationParameters::default().with_masses(0.4, 3.0);
        let mut pair = ReservoirPair::from_parameters(&params);
        let x0 = pair.initial_state();
        let x1 = ForwardEuler.step(&mut pair, 0.0, &x0, 0.1).unwrap();
        let energy = |x: &ReservoirState| {
            params.heat_capacity_hot() * x.t_hot_k + params.heat_capacity_cold() * x.t_cold_k
        };
        let e0 = energy(&x0);
        let e1 = energy(&x1);
        assert!((e1 - e0).abs() < 1e-9 * e0);
        assert!(x1.t_hot_k < x0.t_hot_k);
        assert!(x1.t_cold_k > x0.t_cold_k);
    }

    #[test]
    fn isolated_rhs_is_zero() {
        let params = SimulationParameters::default().with_system_type(SystemType::Isolated);
        let mut pair = ReservoirPair::from_parameters(&params);
        let x = pair.initial_state();
        assert_eq!(pair.rhs(0.0, &x).unwrap(), ReservoirState::default());
    }
}
