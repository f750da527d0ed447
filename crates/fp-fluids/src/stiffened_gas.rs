//! Stiffened gas equation of state.
//!
//! ```text
//! p = (γ - 1) ρ (e - q) - γ p∞
//! T = (e - q - p∞ v) / cv
//! s = cv ln(T^γ / (p + p∞)^(γ-1)) + q'
//! ```
//!
//! Reduces to a calorically perfect ideal gas for q = q' = p∞ = 0.

use crate::error::{FluidError, FluidResult};
use crate::fluid::{PropDerivs, SinglePhaseFluid};
use fp_core::Real;

/// Parameters of a [`StiffenedGasFluid`]. Defaults describe water vapor.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StiffenedGasParams {
    pub name: String,
    pub gamma: Real,
    /// Isochoric specific heat [J/(kg·K)]
    pub cv: Real,
    /// Reference energy [J/kg]
    pub q: Real,
    /// Reference entropy [J/(kg·K)]
    pub q_prime: Real,
    /// Stiffness pressure [Pa]
    pub p_inf: Real,
    /// Dynamic viscosity [Pa·s]
    pub mu: Real,
    /// Thermal conductivity [W/(m·K)]
    pub k: Real,
    /// Molar mass [kg/mol]
    pub molar_mass: Real,
    /// Critical temperature [K]
    pub t_c: Real,
    /// Critical density [kg/m³]
    pub rho_c: Real,
    /// Specific internal energy at the critical point [J/kg]
    pub e_c: Real,
}

impl Default for StiffenedGasParams {
    fn default() -> Self {
        let cv = 1040.0;
        let q = 2.03e6;
        let t_c = 647.096;
        Self {
            name: "stiffened_gas".to_string(),
            gamma: 1.43,
            cv,
            q,
            q_prime: -2.3e4,
            p_inf: 0.0,
            mu: 1.3e-5,
            k: 0.027,
            molar_mass: 18.01528e-3,
            t_c,
            rho_c: 322.0,
            e_c: cv * t_c + q,
        }
    }
}

/// Stiffened gas with constant transport properties.
#[derive(Clone, Debug)]
pub struct StiffenedGasFluid {
    params: StiffenedGasParams,
}

impl Default for StiffenedGasFluid {
    fn default() -> Self {
        Self {
            params: StiffenedGasParams::default(),
        }
    }
}

impl StiffenedGasFluid {
    /// # Errors
    /// `InvalidInput` unless γ > 1, cv > 0 and M > 0.
    pub fn new(params: StiffenedGasParams) -> FluidResult<Self> {
        let checks = [
            (params.gamma > 1.0, "gamma must be greater than 1"),
            (params.cv > 0.0, "cv must be positive"),
            (params.molar_mass > 0.0, "molar mass must be positive"),
        ];
        if let Some((_, what)) = checks.iter().find(|(ok, _)| !ok) {
            return Err(FluidError::invalid_input(&params.name, "new", *what));
        }
        Ok(Self { params })
    }

    pub fn params(&self) -> &StiffenedGasParams {
        &self.params
    }

    fn gm1(&self) -> Real {
        self.params.gamma - 1.0
    }

    fn cp(&self) -> Real {
        self.params.gamma * self.params.cv
    }

    fn entropy(&self, p: Real, t: Real) -> Real {
        let StiffenedGasParams {
            gamma,
            cv,
            q_prime,
            p_inf,
            ..
        } = self.params;
        cv * (gamma * t.ln() - (gamma - 1.0) * (p + p_inf).ln()) + q_prime
    }

    fn temperature_from_p_s(&self, p: Real, s: Real) -> Real {
        let StiffenedGasParams {
            gamma,
            cv,
            q_prime,
            p_inf,
            ..
        } = self.params;
        (((s - q_prime) / cv + (gamma - 1.0) * (p + p_inf).ln()) / gamma).exp()
    }

    fn sound_speed(&self, t: Real) -> Real {
        (self.params.gamma * self.gm1() * self.params.cv * t).sqrt()
    }
}

impl SinglePhaseFluid for StiffenedGasFluid {
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
        Ok(self.gm1() * self.params.cv * rho * t - self.params.p_inf)
    }

    fn p_from_rho_t_derivs(&self, rho: Real, t: Real) -> FluidResult<PropDerivs> {
        let a = self.gm1() * self.params.cv;
        Ok(PropDerivs::new(a * rho * t - self.params.p_inf, a * t, a * rho))
    }

    fn e_from_rho_t(&self, rho: Real, t: Real) -> FluidResult<Real> {
        Ok(self.params.cv * t + self.params.q + self.params.p_inf / rho)
    }

    fn e_from_rho_t_derivs(&self, rho: Real, t: Real) -> FluidResult<PropDerivs> {
        let StiffenedGasParams { cv, q, p_inf, .. } = self.params;
        Ok(PropDerivs::new(cv * t + q + p_inf / rho, -p_inf / (rho * rho), cv))
    }

    fn h_from_rho_t(&self, _rho: Real, t: Real) -> FluidResult<Real> {
        Ok(self.cp() * t + self.params.q)
    }

    fn h_from_rho_t_derivs(&self, _rho: Real, t: Real) -> FluidResult<PropDerivs> {
        Ok(PropDerivs::new(self.cp() * t + self.params.q, 0.0, self.cp()))
    }

    fn s_from_rho_t(&self, rho: Real, t: Real) -> FluidResult<Real> {
        Ok(self.entropy(self.p_from_rho_t(rho, t)?, t))
    }

    fn s_from_rho_t_derivs(&self, rho: Real, t: Real) -> FluidResult<PropDerivs> {
        let cv = self.params.cv;
        Ok(PropDerivs::new(
            self.entropy(self.p_from_rho_t(rho, t)?, t),
            -cv * self.gm1() / rho,
            cv / t,
        ))
    }

    fn cv_from_rho_t(&self, _rho: Real, _t: Real) -> FluidResult<Real> {
        Ok(self.params.cv)
    }

    fn cv_from_rho_t_derivs(&self, _rho: Real, _t: Real) -> FluidResult<PropDerivs> {
        Ok(PropDerivs::new(self.params.cv, 0.0, 0.0))
    }

    fn cp_from_rho_t(&self, _rho: Real, _t: Real) -> FluidResult<Real> {
        Ok(self.cp())
    }

    fn cp_from_rho_t_derivs(&self, _rho: Real, _t: Real) -> FluidResult<PropDerivs> {
        Ok(PropDerivs::new(self.cp(), 0.0, 0.0))
    }

    fn c_from_rho_t(&self, _rho: Real, t: Real) -> FluidResult<Real> {
        Ok(self.sound_speed(t))
    }

    fn c_from_rho_t_derivs(&self, _rho: Real, t: Real) -> FluidResult<PropDerivs> {
        let c = self.sound_speed(t);
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
        Ok((p + self.params.p_inf) / (self.gm1() * self.params.cv * t))
    }

    fn rho_from_p_t_derivs(&self, p: Real, t: Real) -> FluidResult<PropDerivs> {
        let a = self.gm1() * self.params.cv * t;
        let rho = (p + self.params.p_inf) / a;
        Ok(PropDerivs::new(rho, 1.0 / a, -rho / t))
    }

    fn t_from_v_e(&self, v: Real, e: Real) -> FluidResult<Real> {
        let StiffenedGasParams { cv, q, p_inf, .. } = self.params;
        Ok((e - q - p_inf * v) / cv)
    }

    fn t_from_v_e_derivs(&self, v: Real, e: Real) -> FluidResult<PropDerivs> {
        let StiffenedGasParams { cv, q, p_inf, .. } = self.params;
        Ok(PropDerivs::new((e - q - p_inf * v) / cv, -p_inf / cv, 1.0 / cv))
    }

    fn e_from_p_rho(&self, p: Real, rho: Real) -> FluidResult<Real> {
        let StiffenedGasParams { gamma, q, p_inf, .. } = self.params;
        Ok((p + gamma * p_inf) / (self.gm1() * rho) + q)
    }

    fn e_from_p_rho_derivs(&self, p: Real, rho: Real) -> FluidResult<PropDerivs> {
        let StiffenedGasParams { gamma, q, p_inf, .. } = self.params;
        let gm1 = self.gm1();
        Ok(PropDerivs::new(
            (p + gamma * p_inf) / (gm1 * rho) + q,
            1.0 / (gm1 * rho),
            -(p + gamma * p_inf) / (gm1 * rho * rho),
        ))
    }

    fn t_from_p_h(&self, _p: Real, h: Real) -> FluidResult<Real> {
        Ok((h - self.params.q) / self.cp())
    }

    fn rho_from_p_s(&self, p: Real, s: Real) -> FluidResult<Real> {
        self.rho_from_p_t(p, self.temperature_from_p_s(p, s))
    }

    fn p_from_h_s(&self, h: Real, s: Real) -> FluidResult<Real> {
        let StiffenedGasParams {
            gamma,
            cv,
            q,
            q_prime,
            p_inf,
            ..
        } = self.params;
        let t = (h - q) / self.cp();
        Ok(((gamma * t.ln() - (s - q_prime) / cv) / (gamma - 1.0)).exp() - p_inf)
    }

    fn e_spndl_from_v(&self, _v: Real) -> FluidResult<Real> {
        Ok(self.params.e_c)
    }

    fn v_e_spndl_from_t(&self, _t: Real) -> FluidResult<(Real, Real)> {
        Ok((1.0 / self.params.rho_c, self.params.e_c))
    }
}
