//! Transient simulation of irreversible heat conduction between two finite reservoirs.
//!
//! Provides:
//! - Reservoir pair physics (heat transfer rate, entropy generation rate)
//! - `TransientModel` / `Integrator` seam with a forward Euler integrator
//! - Replayable, pre-sized time series owned by `ReservoirPairSimulator`
//! - Closed-form equilibrium analysis used as a validation oracle
//! - Parallel entropy sweeps over the initial temperature difference

pub mod equilibrium;
pub mod error;
pub mod integrator;
pub mod model;
pub mod params;
pub mod reservoir;
pub mod series;
pub mod simulator;
pub mod sweep;
pub mod system;

// Re-exports for public API
pub use equilibrium::EquilibriumAnalysis;
pub use error::{SimError, SimResult};
pub use integrator::{ForwardEuler, Integrator};
pub use model::TransientModel;
pub use params::{MAX_STEPS, SimulationParameters};
pub use reservoir::{ReservoirPair, ReservoirState, entropy_generation_rate, heat_transfer_rate};
pub use series::{SimulationSeries, StepRecord};
pub use simulator::{ClosedFormComparison, ReservoirPairSimulator};
pub use sweep::{EntropySweep, MAX_SWEEP_POINTS, SweepPoint};
pub use system::{ParseSystemTypeError, SystemType};
