// fp-core/src/units.rs

use uom::si::f64::{
    AvailableEnergy as UomAvailableEnergy, DynamicViscosity as UomDynamicViscosity,
    MassDensity as UomMassDensity, MolarMass as UomMolarMass, Pressure as UomPressure,
    Ratio as UomRatio, SpecificHeatCapacity as UomSpecificHeatCapacity,
    SpecificVolume as UomSpecificVolume, ThermalConductivity as UomThermalConductivity,
    ThermodynamicTemperature as UomThermodynamicTemperature, Velocity as UomVelocity,
};

// Public canonical unit types (SI, f64)
pub type Density = UomMassDensity;
pub type DynVisc = UomDynamicViscosity;
pub type MolarMass = UomMolarMass;
pub type Pressure = UomPressure;
pub type Ratio = UomRatio;
pub type SpecEnergy = UomAvailableEnergy;
pub type SpecHeatCapacity = UomSpecificHeatCapacity;
pub type SpecVolume = UomSpecificVolume;
pub type Temperature = UomThermodynamicTemperature;
pub type ThermalCond = UomThermalConductivity;
pub type Velocity = UomVelocity;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn kg_per_m3(v: f64) -> Density {
    use uom::si::mass_density::kilogram_per_cubic_meter;
    Density::new::<kilogram_per_cubic_meter>(v)
}

#[inline]
pub fn m3_per_kg(v: f64) -> SpecVolume {
    use uom::si::specific_volume::cubic_meter_per_kilogram;
    SpecVolume::new::<cubic_meter_per_kilogram>(v)
}

#[inline]
pub fn j_per_kg(v: f64) -> SpecEnergy {
    use uom::si::available_energy::joule_per_kilogram;
    SpecEnergy::new::<joule_per_kilogram>(v)
}

#[inline]
pub fn j_per_kg_k(v: f64) -> SpecHeatCapacity {
    use uom::si::specific_heat_capacity::joule_per_kilogram_kelvin;
    SpecHeatCapacity::new::<joule_per_kilogram_kelvin>(v)
}

#[inline]
pub fn pa_s(v: f64) -> DynVisc {
    use uom::si::dynamic_viscosity::pascal_second;
    DynVisc::new::<pascal_second>(v)
}

#[inline]
pub fn w_per_m_k(v: f64) -> ThermalCond {
    use uom::si::thermal_conductivity::watt_per_meter_kelvin;
    ThermalCond::new::<watt_per_meter_kelvin>(v)
}

#[inline]
pub fn mps(v: f64) -> Velocity {
    use uom::si::velocity::meter_per_second;
    Velocity::new::<meter_per_second>(v)
}

#[inline]
pub fn kg_per_mol(v: f64) -> MolarMass {
    use uom::si::molar_mass::kilogram_per_mole;
    MolarMass::new::<kilogram_per_mole>(v)
}

#[inline]
pub fn unitless(v: f64) -> Ratio {
    use uom::si::ratio::ratio;
    Ratio::new::<ratio>(v)
}

pub mod constants {
    /// Universal gas constant [J/(mol·K)] (CODATA 2014).
    pub const R_MOLAR: f64 = 8.314_459_8;

    /// Avogadro constant [1/mol] (CODATA 2014).
    pub const AVOGADRO: f64 = 6.022_140_857e23;
}
