//! Continuous-time models advanced by an [`Integrator`](crate::integrator::Integrator).

use crate::error::SimResult;

/// A system described by `dx/dt = f(t, x)`.
///
/// The state doubles as its own derivative type, so explicit schemes only need vector-space
/// arithmetic on it (`add`, `scale`).
pub trait TransientModel {
    type State: Clone;

    /// State at `t = 0`.
    fn initial_state(&self) -> Self::State;

    /// Evaluate `dx/dt` at `(t, x)`.
    ///
    /// `&mut self` leaves room for models that memoize between evaluations.
    fn rhs(&mut self, t: f64, x: &Self::State) -> SimResult<Self::State>;

    /// `a + b`
    fn add(&self, a: &Self::State, b: &Self::State) -> Self::State;

    /// `scale * a`
    fn scale(&self, a: &Self::State, scale: f64) -> Self::State;
}
