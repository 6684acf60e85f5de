//! Fixed-step time integrators.

use crate::error::SimResult;
use crate::model::TransientModel;

/// Trait for time integrators.
pub trait Integrator {
    /// Advance `x` by `dt` given a derivative already evaluated at `(t, x)`.
    fn advance<M: TransientModel>(
        &self,
        model: &M,
        x: &M::State,
        xdot: &M::State,
        dt: f64,
    ) -> M::State;

    /// Advance state by one time step using the transient model.
    fn step<M: TransientModel>(
        &self,
        model: &mut M,
        t: f64,
        x: &M::State,
        dt: f64,
    ) -> SimResult<M::State> {
        let xdot = model.rhs(t, x)?;
        Ok(self.advance(model, x, &xdot, dt))
    }
}

/// Forward Euler (explicit, 1st order): x_new = x + dt * rhs(t, x).
#[derive(Clone, Copy, Debug, Default)]
pub struct ForwardEuler;

impl Integrator for ForwardEuler {
    fn advance<M: TransientModel>(
        &self,
        model: &M,
        x: &M::State,
        xdot: &M::State,
        dt: f64,
    ) -> M::State {
        model.add(x, &model.scale(xdot, dt))
    }
}
