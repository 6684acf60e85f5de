// ef-core/src/units.rs

use uom::si::f64::{
    Energy as UomEnergy, HeatCapacity as UomHeatCapacity, Mass as UomMass, Ratio as UomRatio,
    SpecificHeatCapacity as UomSpecificHeatCapacity,
    ThermodynamicTemperature as UomThermodynamicTemperature, Time as UomTime,
};

// Public canonical unit types (SI, f64)
pub type Energy = UomEnergy;
/// Also the unit of entropy (J/K).
pub type HeatCapacity = UomHeatCapacity;
pub type Mass = UomMass;
pub type Ratio = UomRatio;
pub type SpecificHeat = UomSpecificHeatCapacity;
pub type Temperature = UomThermodynamicTemperature;
pub type Time = UomTime;

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn kg(v: f64) -> Mass {
    use uom::si::mass::kilogram;
    Mass::new::<kilogram>(v)
}

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

#[inline]
pub fn j(v: f64) -> Energy {
    use uom::si::energy::joule;
    Energy::new::<joule>(v)
}

#[inline]
pub fn j_per_kg_k(v: f64) -> SpecificHeat {
    use uom::si::specific_heat_capacity::joule_per_kilogram_kelvin;
    SpecificHeat::new::<joule_per_kilogram_kelvin>(v)
}

#[inline]
pub fn j_per_k(v: f64) -> HeatCapacity {
    use uom::si::heat_capacity::joule_per_kelvin;
    HeatCapacity::new::<joule_per_kelvin>(v)
}

#[inline]
pub fn unitless(v: f64) -> Ratio {
    use uom::si::ratio::ratio;
    Ratio::new::<ratio>(v)
}

pub mod constants {
    use super::*;

    /// Reference ambient (dead-state) temperature, 25 °C rounded to whole kelvin.
    pub const AMBIENT_K: f64 = 298.0;

    #[inline]
    pub fn ambient() -> Temperature {
        k(AMBIENT_K)
    }
}
