// tfdh-core/src/units.rs
//
// Plasma inputs arrive as typed quantities at the API edge and are converted
// once into the CGS scalars used by the physics kernels.

use crate::constants::K_BOLTZMANN;
use uom::si::energy::{erg, kiloelectronvolt};
use uom::si::f64::{
    Energy as UomEnergy, Length as UomLength, MassDensity as UomMassDensity,
    ThermodynamicTemperature as UomThermodynamicTemperature,
};
use uom::si::length::centimeter;
use uom::si::mass_density::gram_per_cubic_centimeter;
use uom::si::thermodynamic_temperature::kelvin as kelvin_unit;

// Public canonical unit types (SI, f64)
pub type Density = UomMassDensity;
pub type Energy = UomEnergy;
pub type Length = UomLength;
pub type Temperature = UomThermodynamicTemperature;

#[inline]
pub fn g_per_cc(v: f64) -> Density {
    Density::new::<gram_per_cubic_centimeter>(v)
}

#[inline]
pub fn kelvin(v: f64) -> Temperature {
    Temperature::new::<kelvin_unit>(v)
}

#[inline]
pub fn ergs(v: f64) -> Energy {
    Energy::new::<erg>(v)
}

#[inline]
pub fn kev(v: f64) -> Energy {
    Energy::new::<kiloelectronvolt>(v)
}

#[inline]
pub fn cm(v: f64) -> Length {
    Length::new::<centimeter>(v)
}

/// Mass density in g/cm³.
#[inline]
pub fn density_cgs(d: Density) -> f64 {
    d.get::<gram_per_cubic_centimeter>()
}

/// Energy in erg.
#[inline]
pub fn energy_cgs(e: Energy) -> f64 {
    e.get::<erg>()
}

/// Length in cm.
#[inline]
pub fn length_cgs(l: Length) -> f64 {
    l.get::<centimeter>()
}

/// Thermal energy k_B·T.
#[inline]
pub fn thermal_energy(t: Temperature) -> Energy {
    ergs(K_BOLTZMANN * t.get::<kelvin_unit>())
}

/// Temperature for which k_B·T equals `kt`.
#[inline]
pub fn temperature_of(kt: Energy) -> Temperature {
    kelvin(energy_cgs(kt) / K_BOLTZMANN)
}
