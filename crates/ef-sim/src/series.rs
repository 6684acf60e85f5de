//! Pre-sized time series storage, one slot per sample index.

use crate::reservoir::ReservoirState;

/// One sample of the series.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepRecord {
    pub index: usize,
    pub time_s: f64,
    pub t_hot_k: f64,
    pub t_cold_k: f64,
    /// Heat transfer rate evaluated at this sample (W); zero until the step from it is taken.
    pub heat_flux_w: f64,
    pub heat_transferred_j: f64,
    pub entropy_generated_j_per_k: f64,
}

/// Parallel arrays holding the full trajectory.
///
/// Index 0 carries the initial conditions; every other slot is zero until stepped into.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimulationSeries {
    time_s: Vec<f64>,
    t_hot_k: Vec<f64>,
    t_cold_k: Vec<f64>,
    heat_flux_w: Vec<f64>,
    heat_transferred_j: Vec<f64>,
    entropy_generated_j_per_k: Vec<f64>,
}

impl SimulationSeries {
    pub(crate) fn new(n: usize, dt: f64, initial: &ReservoirState) -> Self {
        let mut series = Self {
            time_s: (0..n).map(|i| i as f64 * dt).collect(),
            t_hot_k: vec![0.0; n],
            t_cold_k: vec![0.0; n],
            heat_flux_w: vec![0.0; n],
            heat_transferred_j: vec![0.0; n],
            entropy_generated_j_per_k: vec![0.0; n],
        };
        series.write_state(0, initial);
        series
    }

    /// Zero every slot and restore the initial conditions at index 0.
    pub(crate) fn reinitialize(&mut self, initial: &ReservoirState) {
        for column in [
            &mut self.t_hot_k,
            &mut self.t_cold_k,
            &mut self.heat_flux_w,
            &mut self.heat_transferred_j,
            &mut self.entropy_generated_j_per_k,
        ] {
            column.fill(0.0);
        }
        self.write_state(0, initial);
    }

    fn write_state(&mut self, i: usize, x: &ReservoirState) {
        self.t_hot_k[i] = x.t_hot_k;
        self.t_cold_k[i] = x.t_cold_k;
        self.heat_transferred_j[i] = x.heat_j;
        self.entropy_generated_j_per_k[i] = x.entropy_j_per_k;
    }

    /// Record the flux evaluated at `i` and the state reached at `i + 1`.
    pub(crate) fn write_step(&mut self, i: usize, heat_flux_w: f64, next: &ReservoirState) {
        self.heat_flux_w[i] = heat_flux_w;
        self.write_state(i + 1, next);
    }

    pub fn len(&self) -> usize {
        self.time_s.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time_s.is_empty()
    }

    pub fn time(&self) -> &[f64] {
        &self.time_s
    }

    pub fn t_hot(&self) -> &[f64] {
        &self.t_hot_k
    }

    pub fn t_cold(&self) -> &[f64] {
        &self.t_cold_k
    }

    pub fn heat_flux(&self) -> &[f64] {
        &self.heat_flux_w
    }

    pub fn heat_transferred(&self) -> &[f64] {
        &self.heat_transferred_j
    }

    pub fn entropy_generated(&self) -> &[f64] {
        &self.entropy_generated_j_per_k
    }

    /// Integrated state at sample `i`.
    pub fn state(&self, i: usize) -> Option<ReservoirState> {
        (i < self.len()).then(|| ReservoirState {
            t_hot_k: self.t_hot_k[i],
            t_cold_k: self.t_cold_k[i],
            heat_j: self.heat_transferred_j[i],
            entropy_j_per_k: self.entropy_generated_j_per_k[i],
        })
    }

    pub fn record(&self, i: usize) -> Option<StepRecord> {
        (i < self.len()).then(|| StepRecord {
            index: i,
            time_s: self.time_s[i],
            t_hot_k: self.t_hot_k[i],
            t_cold_k: self.t_cold_k[i],
            heat_flux_w: self.heat_flux_w[i],
            heat_transferred_j: self.heat_transferred_j[i],
            entropy_generated_j_per_k: self.entropy_generated_j_per_k[i],
        })
    }

    /// Records `0..=upto`, clamped to the series length.
    pub fn records(&self, upto: usize) -> impl Iterator<Item = StepRecord> + '_ {
        let end = upto.saturating_add(1).min(self.len());
        (0..end).filter_map(move |i| self.record(i))
    }
}
