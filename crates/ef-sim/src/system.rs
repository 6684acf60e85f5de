//! Thermodynamic system classification.

use std::fmt;
use std::str::FromStr;

/// How the reservoir pair interacts with its surroundings.
///
/// `Closed` and `Open` behave identically: energy is exchanged by conduction between the
/// reservoirs and no mass exchange is modeled for either. `Isolated` forbids any exchange.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SystemType {
    #[default]
    Closed,
    Open,
    Isolated,
}

impl SystemType {
    pub const ALL: [SystemType; 3] = [SystemType::Closed, SystemType::Open, SystemType::Isolated];

    /// Whether heat may flow between the reservoirs.
    pub fn exchanges_energy(self) -> bool {
        !matches!(self, SystemType::Isolated)
    }

    pub fn label(self) -> &'static str {
        match self {
            SystemType::Closed => "Closed",
            SystemType::Open => "Open",
            SystemType::Isolated => "Isolated",
        }
    }
}

impl fmt::Display for SystemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown system type '{0}' (expected Closed, Open or Isolated)")]
pub struct ParseSystemTypeError(pub String);

impl FromStr for SystemType {
    type Err = ParseSystemTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SystemType::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseSystemTypeError(s.to_string()))
    }
}
