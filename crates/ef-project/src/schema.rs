//! Scenario schema definitions.

use ef_core::units::constants::AMBIENT_K;
use ef_sim::{EntropySweep, SimulationParameters};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    /// Schema version; files without one are read as version 0 and migrated.
    #[serde(default)]
    pub version: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub parameters: SimulationParameters,
    /// Dead-state temperature for exergy figures (K)
    #[serde(default = "default_ambient_temperature_k")]
    pub ambient_temperature_k: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sweep: Option<EntropySweep>,
}

fn default_ambient_temperature_k() -> f64 {
    AMBIENT_K
}

impl Scenario {
    pub fn new(name: impl Into<String>, parameters: SimulationParameters) -> Self {
        Self {
            version: crate::migrate::LATEST_VERSION,
            name: name.into(),
            description: None,
            parameters,
            ambient_temperature_k: AMBIENT_K,
            sweep: None,
        }
    }
}

impl Default for Scenario {
    fn default() -> Self {
        Self::new("Default demonstration", SimulationParameters::default())
    }
}
