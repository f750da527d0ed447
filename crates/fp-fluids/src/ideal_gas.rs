//! Calorically perfect ideal gas.
//!
//! ```text
//! p = ρ R T        e = cv T        h = cp T
//! s = cv ln(T^γ / p^(γ-1))         c = √(γ R T)
//! ```
//!
//! with R = R_molar / M and cv = R / (γ - 1). Transport properties are
//! constant.

use crate::error::{FluidError, FluidResult};
use crate::fluid::{PropDerivs, SinglePhaseFluid};
use fp_core::{Real, constants::R_MOLAR};

/// Parameters of an [`IdealGasFluid`]. Defaults describe dry air.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IdealGasParams {
    pub name: String,
    /// Ratio of specific heats
    pub gamma: Real,
    /// Molar mass [kg/mol]
    pub molar_mass: Real,
    /// Dynamic viscosity [Pa·s]
    pub mu: Real,
    /// Thermal conductivity [W/(m·K)]
    pub k: Real,
    /// Critical temperature [K]
    pub t_c: Real,
    /// Critical density [kg/m³]
    pub rho_c: Real,
    /// Specific internal energy at the critical point [J/kg]
    pub e_c: Real,
}

impl Default for IdealGasParams {
    fn default() -> Self {
        let gamma = 1.4;
        let molar_mass = 28.965e-3;
        let t_c = 132.5;
        let cv = R_MOLAR / molar_mass / (gamma - 1.0);
        Self {
            name: "ideal_gas".to_string(),
            gamma,
            molar_mass,
            mu: 18.23e-6,
            k: 25.68e-3,
            t_c,
            rho_c: 302.5,
            e_c: cv * t_c,
        }
    }
}

/// Ideal gas with constant specific heats.
#[derive(Clone, Debug)]
pub struct IdealGasFluid {
    params: IdealGasParams,
    r_specific: Real,
    cv: Real,
    cp: Real,
}

impl Default for IdealGasFluid {
    fn default() -> Self {
        Self::from_valid(IdealGasParams::default())
    }
}

impl IdealGasFluid {
    /// # Errors
    /// `InvalidInput` unless γ > 1 and M > 0.
    pub fn new(params: IdealGasParams) -> FluidResult<Self> {
        if !(params.gamma > 1.0) {
            return Err(FluidError::invalid_input(
                &params.name,
                "new",
                format!("gamma must be greater than 1, got {}", params.gamma),
            ));
        }
        if !(params.molar_mass > 0.0) {
            return Err(FluidError::invalid_input(
                &params.name,
                "new",
                format!("molar mass must be positive, got {}", params.molar_mass),
            ));
        }
        Ok(Self::from_valid(params))
    }

    fn from_valid(params: IdealGasParams) -> Self {
        let r_specific = R_MOLAR / params.molar_mass;
        let cv = r_specific / (params.gamma - 1.0);
        Self {
            r_specific,
            cv,
            cp: params.gamma * cv,
            params,
        }
    }

    pub fn params(&self) -> &IdealGasParams {
        &self.params
    }

    /// Specific gas constant [J/(kg·K)]
    pub fn specific_gas_constant(&self) -> Real {
        self.r_specific
    }

    fn gamma(&self) -> Real {
        self.params.gamma
    }

    fn entropy(&self, p: Real, t: Real) -> Real {
        self.cv * (self.gamma() * t.ln() - (self.gamma() - 1.0) * p.ln())
    }

    fn temperature_from_p_s(&self, p: Real, s: Real) -> Real {
        ((s / self.cv + (self.gamma() - 1.0) * p.ln()) / self.gamma()).exp()
    }
}

impl SinglePhaseFluid for IdealGasFluid {
    fn fluid_name(&self) -> &str {
        &self.params.name
    }

    fn molar_mass(&self) -> Real {
        self.params.molar_mass
    }

    fn critical_temperature(&self) -> FluidResult<Real> {
        Ok(self.params.t_c)
    }

    fn critical_density(&self) -> FluidResult<Real> {
        Ok(self.params.rho_c)
    }

    fn critical_internal_energy(&self) -> FluidResult<Real> {
        Ok(self.params.e_c)
    }

    fn p_from_rho_t(&self, rho: Real, t: Real) -> FluidResult<Real> {
        Ok(rho * self.r_specific * t)
    }

    fn p_from_rho_t_derivs(&self, rho: Real, t: Real) -> FluidResult<PropDerivs> {
        let r = self.r_specific;
        Ok(PropDerivs::new(rho * r * t, r * t, rho * r))
    }

    fn e_from_rho_t(&self, _rho: Real, t: Real) -> FluidResult<Real> {
        Ok(self.cv * t)
    }

    fn e_from_rho_t_derivs(&self, _rho: Real, t: Real) -> FluidResult<PropDerivs> {
        Ok(PropDerivs::new(self.cv * t, 0.0, self.cv))
    }

    fn h_from_rho_t(&self, _rho: Real, t: Real) -> FluidResult<Real> {
        Ok(self.cp * t)
    }

    fn h_from_rho_t_derivs(&self, _rho: Real, t: Real) -> FluidResult<PropDerivs> {
        Ok(PropDerivs::new(self.cp * t, 0.0, self.cp))
    }

    fn s_from_rho_t(&self, rho: Real, t: Real) -> FluidResult<Real> {
        Ok(self.entropy(rho * self.r_specific * t, t))
    }

    fn s_from_rho_t_derivs(&self, rho: Real, t: Real) -> FluidResult<PropDerivs> {
        Ok(PropDerivs::new(
            self.entropy(rho * self.r_specific * t, t),
            -self.r_specific / rho,
            self.cv / t,
        ))
    }

    fn cv_from_rho_t(&self, _rho: Real, _t: Real) -> FluidResult<Real> {
        Ok(self.cv)
    }

    fn cv_from_rho_t_derivs(&self, _rho: Real, _t: Real) -> FluidResult<PropDerivs> {
        Ok(PropDerivs::new(self.cv, 0.0, 0.0))
    }

    fn cp_from_rho_t(&self, _rho: Real, _t: Real) -> FluidResult<Real> {
        Ok(self.cp)
    }

    fn cp_from_rho_t_derivs(&self, _rho: Real, _t: Real) -> FluidResult<PropDerivs> {
        Ok(PropDerivs::new(self.cp, 0.0, 0.0))
    }

    fn c_from_rho_t(&self, _rho: Real, t: Real) -> FluidResult<Real> {
        Ok((self.gamma() * self.r_specific * t).sqrt())
    }

    fn c_from_rho_t_derivs(&self, _rho: Real, t: Real) -> FluidResult<PropDerivs> {
        let c = (self.gamma() * self.r_specific * t).sqrt();
        Ok(PropDerivs::new(c, 0.0, 0.5 * c / t))
    }

    fn mu_from_rho_t(&self, _rho: Real, _t: Real) -> FluidResult<Real> {
        Ok(self.params.mu)
    }

    fn mu_from_rho_t_derivs(&self, _rho: Real, _t: Real) -> FluidResult<PropDerivs> {
        Ok(PropDerivs::new(self.params.mu, 0.0, 0.0))
    }

    fn k_from_rho_t(&self, _rho: Real, _t: Real) -> FluidResult<Real> {
        Ok(self.params.k)
    }

    fn k_from_rho_t_derivs(&self, _rho: Real, _t: Real) -> FluidResult<PropDerivs> {
        Ok(PropDerivs::new(self.params.k, 0.0, 0.0))
    }

    fn rho_from_p_t(&self, p: Real, t: Real) -> FluidResult<Real> {
        Ok(p / (self.r_specific * t))
    }

    fn rho_from_p_t_derivs(&self, p: Real, t: Real) -> FluidResult<PropDerivs> {
        let rho = p / (self.r_specific * t);
        Ok(PropDerivs::new(rho, 1.0 / (self.r_specific * t), -rho / t))
    }

    fn t_from_v_e(&self, _v: Real, e: Real) -> FluidResult<Real> {
        Ok(e / self.cv)
    }

    fn t_from_v_e_derivs(&self, _v: Real, e: Real) -> FluidResult<PropDerivs> {
        Ok(PropDerivs::new(e / self.cv, 0.0, 1.0 / self.cv))
    }

    fn e_from_p_rho(&self, p: Real, rho: Real) -> FluidResult<Real> {
        Ok(p / ((self.gamma() - 1.0) * rho))
    }

    fn e_from_p_rho_derivs(&self, p: Real, rho: Real) -> FluidResult<PropDerivs> {
        let gm1 = self.gamma() - 1.0;
        Ok(PropDerivs::new(
            p / (gm1 * rho),
            1.0 / (gm1 * rho),
            -p / (gm1 * rho * rho),
        ))
    }

    fn t_from_p_h(&self, _p: Real, h: Real) -> FluidResult<Real> {
        Ok(h / self.cp)
    }

    fn rho_from_p_s(&self, p: Real, s: Real) -> FluidResult<Real> {
        self.rho_from_p_t(p, self.temperature_from_p_s(p, s))
    }

    fn p_from_h_s(&self, h: Real, s: Real) -> FluidResult<Real> {
        let t = h / self.cp;
        Ok(((self.gamma() * t.ln() - s / self.cv) / (self.gamma() - 1.0)).exp())
    }

    fn e_spndl_from_v(&self, _v: Real) -> FluidResult<Real> {
        Ok(self.params.e_c)
    }

    fn v_e_spndl_from_t(&self, _t: Real) -> FluidResult<(Real, Real)> {
        Ok((1.0 / self.params.rho_c, self.params.e_c))
    }
}
