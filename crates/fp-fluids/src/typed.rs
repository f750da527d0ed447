//! Unit-safe access to any [`SinglePhaseFluid`].
//!
//! The property functions work on bare SI `f64`s. This extension trait wraps
//! the common (p,T) and (v,e) queries in `uom` quantities and validates the
//! inputs before they reach an equation of state.

use crate::error::{FluidError, FluidResult};
use crate::fluid::SinglePhaseFluid;
use fp_core::{
    Density, DynVisc, Pressure, SpecEnergy, SpecHeatCapacity, SpecVolume, Temperature,
    ThermalCond, Velocity, j_per_kg, j_per_kg_k, k, kg_per_m3, mps, pa, pa_s, w_per_m_k,
};

/// Properties of one (p,T) state, evaluated together.
#[derive(Clone, Debug)]
pub struct PropertyPack {
    pub p: Pressure,
    pub t: Temperature,
    pub rho: Density,
    /// Specific enthalpy [J/kg]
    pub h: SpecEnergy,
    /// Specific entropy [J/(kg·K)]
    pub s: SpecHeatCapacity,
    pub cp: SpecHeatCapacity,
    pub cv: SpecHeatCapacity,
    /// Speed of sound
    pub c: Velocity,
}

impl PropertyPack {
    /// Heat capacity ratio cp/cv
    pub fn gamma(&self) -> f64 {
        self.cp.value / self.cv.value
    }

    pub fn summary(&self) -> String {
        format!(
            "Pack(P={:.0}Pa,T={:.1}K,ρ={:.3}kg/m³,h={:.1}J/kg,s={:.2}J/kg·K,cp={:.1}J/kg·K,c={:.1}m/s)",
            self.p.value,
            self.t.value,
            self.rho.value,
            self.h.value,
            self.s.value,
            self.cp.value,
            self.c.value
        )
    }
}

fn validate_pressure(name: &str, op: &'static str, p: Pressure) -> FluidResult<f64> {
    if !p.value.is_finite() || p.value <= 0.0 {
        return Err(FluidError::invalid_input(
            name,
            op,
            "pressure must be positive and finite",
        ));
    }
    Ok(p.value)
}

fn validate_temperature(name: &str, op: &'static str, t: Temperature) -> FluidResult<f64> {
    if !t.value.is_finite() || t.value <= 0.0 {
        return Err(FluidError::invalid_input(
            name,
            op,
            "temperature must be positive and finite",
        ));
    }
    Ok(t.value)
}

/// Typed (p,T) and (v,e) accessors, implemented for every fluid.
pub trait SinglePhaseFluidExt: SinglePhaseFluid {
    fn density(&self, p: Pressure, t: Temperature) -> FluidResult<Density> {
        let name = self.fluid_name();
        let p = validate_pressure(name, "density", p)?;
        let t = validate_temperature(name, "density", t)?;
        Ok(kg_per_m3(self.rho_from_p_t(p, t)?))
    }

    fn enthalpy(&self, p: Pressure, t: Temperature) -> FluidResult<SpecEnergy> {
        let name = self.fluid_name();
        let p = validate_pressure(name, "enthalpy", p)?;
        let t = validate_temperature(name, "enthalpy", t)?;
        Ok(j_per_kg(self.h_from_p_t(p, t)?))
    }

    fn viscosity(&self, p: Pressure, t: Temperature) -> FluidResult<DynVisc> {
        let name = self.fluid_name();
        let p = validate_pressure(name, "viscosity", p)?;
        let t = validate_temperature(name, "viscosity", t)?;
        Ok(pa_s(self.mu_from_p_t(p, t)?))
    }

    fn conductivity(&self, p: Pressure, t: Temperature) -> FluidResult<ThermalCond> {
        let name = self.fluid_name();
        let p = validate_pressure(name, "conductivity", p)?;
        let t = validate_temperature(name, "conductivity", t)?;
        Ok(w_per_m_k(self.k_from_p_t(p, t)?))
    }

    /// Evaluates ρ once and derives the remaining properties from (ρ,T).
    fn property_pack(&self, p: Pressure, t: Temperature) -> FluidResult<PropertyPack> {
        let name = self.fluid_name();
        let p_si = validate_pressure(name, "property_pack", p)?;
        let t_si = validate_temperature(name, "property_pack", t)?;
        let rho = self.rho_from_p_t(p_si, t_si)?;
        Ok(PropertyPack {
            p,
            t,
            rho: kg_per_m3(rho),
            h: j_per_kg(self.h_from_rho_t(rho, t_si)?),
            s: j_per_kg_k(self.s_from_rho_t(rho, t_si)?),
            cp: j_per_kg_k(self.cp_from_rho_t(rho, t_si)?),
            cv: j_per_kg_k(self.cv_from_rho_t(rho, t_si)?),
            c: mps(self.c_from_rho_t(rho, t_si)?),
        })
    }

    /// State from specific volume and internal energy, as (p, T).
    fn state_from_v_e(&self, v: SpecVolume, e: SpecEnergy) -> FluidResult<(Pressure, Temperature)> {
        let t = self.t_from_v_e(v.value, e.value)?;
        Ok((pa(self.p_from_t_v(t, v.value)?), k(t)))
    }
}

impl<F: SinglePhaseFluid + ?Sized> SinglePhaseFluidExt for F {}
