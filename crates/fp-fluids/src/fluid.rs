//! The single-phase fluid contract.
//!
//! Every property is offered in a value-only form and a `*_derivs` form that
//! also returns the partial derivatives with respect to both independent
//! variables, in argument order. Fluids implement the (ρ,T) family, `rho_from_p_t`
//! and `t_from_v_e`; the (p,T), (T,v) and (v,e) families default to chain-rule
//! conversions of those.

use crate::error::{FluidError, FluidResult};
use fp_core::Real;
use fp_solver::brent;

/// A property value with its two partial derivatives.
///
/// `d1` is the derivative with respect to the first independent variable of the
/// call that produced it, `d2` with respect to the second.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PropDerivs {
    pub value: Real,
    pub d1: Real,
    pub d2: Real,
}

impl PropDerivs {
    pub const fn new(value: Real, d1: Real, d2: Real) -> Self {
        Self { value, d1, d2 }
    }

    /// Re-express `y(ρ,T)` derivatives as `y(p,T)` derivatives given `ρ(p,T)`.
    pub fn rho_t_to_p_t(self, rho: &PropDerivs) -> Self {
        Self::new(self.value, self.d1 * rho.d1, self.d2 + self.d1 * rho.d2)
    }

    /// Re-express `y(ρ,T)` derivatives as `y(T,v)` derivatives at `v = 1/ρ`.
    pub fn rho_t_to_t_v(self, v: Real) -> Self {
        Self::new(self.value, self.d2, -self.d1 / (v * v))
    }

    /// Re-express `y(T,v)` derivatives as `y(v,e)` derivatives given `T(v,e)`.
    pub fn t_v_to_v_e(self, t: &PropDerivs) -> Self {
        Self::new(self.value, self.d2 + self.d1 * t.d1, self.d1 * t.d2)
    }
}

fn unsupported<T>(fluid: &str, op: &'static str) -> FluidResult<T> {
    Err(FluidError::not_implemented(fluid, op))
}

/// Contract implemented by every single-phase fluid.
///
/// Implementations must be thread-safe (Send + Sync); all methods take `&self`
/// and fluids are immutable after construction. Units are SI throughout:
/// p [Pa], T [K], ρ [kg/m³], v [m³/kg], e/h [J/kg], s/cp/cv [J/(kg·K)],
/// c [m/s], μ [Pa·s], k [W/(m·K)].
pub trait SinglePhaseFluid: Send + Sync {
    /// Short lowercase identifier used in error messages.
    fn fluid_name(&self) -> &str;

    /// Molar mass [kg/mol]
    fn molar_mass(&self) -> Real;

    fn critical_pressure(&self) -> FluidResult<Real> {
        unsupported(self.fluid_name(), "critical_pressure")
    }

    fn critical_temperature(&self) -> FluidResult<Real> {
        unsupported(self.fluid_name(), "critical_temperature")
    }

    fn critical_density(&self) -> FluidResult<Real> {
        unsupported(self.fluid_name(), "critical_density")
    }

    /// Specific internal energy at the critical point [J/kg]
    fn critical_internal_energy(&self) -> FluidResult<Real> {
        unsupported(self.fluid_name(), "critical_internal_energy")
    }

    fn triple_point_pressure(&self) -> FluidResult<Real> {
        unsupported(self.fluid_name(), "triple_point_pressure")
    }

    fn triple_point_temperature(&self) -> FluidResult<Real> {
        unsupported(self.fluid_name(), "triple_point_temperature")
    }

    /// Coefficients (A, B, C) of the Henry's-law correlation for this gas in water.
    fn henry_coefficients(&self) -> FluidResult<[Real; 3]> {
        unsupported(self.fluid_name(), "henry_coefficients")
    }

    // ----------------------------------------------------------------------
    // (ρ, T)
    // ----------------------------------------------------------------------

    fn p_from_rho_t(&self, _rho: Real, _t: Real) -> FluidResult<Real> {
        unsupported(self.fluid_name(), "p_from_rho_t")
    }

    fn p_from_rho_t_derivs(&self, _rho: Real, _t: Real) -> FluidResult<PropDerivs> {
        unsupported(self.fluid_name(), "p_from_rho_t")
    }

    fn e_from_rho_t(&self, _rho: Real, _t: Real) -> FluidResult<Real> {
        unsupported(self.fluid_name(), "e_from_rho_t")
    }

    fn e_from_rho_t_derivs(&self, _rho: Real, _t: Real) -> FluidResult<PropDerivs> {
        unsupported(self.fluid_name(), "e_from_rho_t")
    }

    fn h_from_rho_t(&self, _rho: Real, _t: Real) -> FluidResult<Real> {
        unsupported(self.fluid_name(), "h_from_rho_t")
    }

    fn h_from_rho_t_derivs(&self, _rho: Real, _t: Real) -> FluidResult<PropDerivs> {
        unsupported(self.fluid_name(), "h_from_rho_t")
    }

    fn s_from_rho_t(&self, _rho: Real, _t: Real) -> FluidResult<Real> {
        unsupported(self.fluid_name(), "s_from_rho_t")
    }

    fn s_from_rho_t_derivs(&self, _rho: Real, _t: Real) -> FluidResult<PropDerivs> {
        unsupported(self.fluid_name(), "s_from_rho_t")
    }

    fn cv_from_rho_t(&self, _rho: Real, _t: Real) -> FluidResult<Real> {
        unsupported(self.fluid_name(), "cv_from_rho_t")
    }

    fn cv_from_rho_t_derivs(&self, _rho: Real, _t: Real) -> FluidResult<PropDerivs> {
        unsupported(self.fluid_name(), "cv_from_rho_t")
    }

    fn cp_from_rho_t(&self, _rho: Real, _t: Real) -> FluidResult<Real> {
        unsupported(self.fluid_name(), "cp_from_rho_t")
    }

    fn cp_from_rho_t_derivs(&self, _rho: Real, _t: Real) -> FluidResult<PropDerivs> {
        unsupported(self.fluid_name(), "cp_from_rho_t")
    }

    fn c_from_rho_t(&self, _rho: Real, _t: Real) -> FluidResult<Real> {
        unsupported(self.fluid_name(), "c_from_rho_t")
    }

    fn c_from_rho_t_derivs(&self, _rho: Real, _t: Real) -> FluidResult<PropDerivs> {
        unsupported(self.fluid_name(), "c_from_rho_t")
    }

    fn mu_from_rho_t(&self, _rho: Real, _t: Real) -> FluidResult<Real> {
        unsupported(self.fluid_name(), "mu_from_rho_t")
    }

    fn mu_from_rho_t_derivs(&self, _rho: Real, _t: Real) -> FluidResult<PropDerivs> {
        unsupported(self.fluid_name(), "mu_from_rho_t")
    }

    fn k_from_rho_t(&self, _rho: Real, _t: Real) -> FluidResult<Real> {
        unsupported(self.fluid_name(), "k_from_rho_t")
    }

    fn k_from_rho_t_derivs(&self, _rho: Real, _t: Real) -> FluidResult<PropDerivs> {
        unsupported(self.fluid_name(), "k_from_rho_t")
    }

    // ----------------------------------------------------------------------
    // (p, T)
    // ----------------------------------------------------------------------

    fn rho_from_p_t(&self, _p: Real, _t: Real) -> FluidResult<Real> {
        unsupported(self.fluid_name(), "rho_from_p_t")
    }

    fn rho_from_p_t_derivs(&self, _p: Real, _t: Real) -> FluidResult<PropDerivs> {
        unsupported(self.fluid_name(), "rho_from_p_t")
    }

    fn v_from_p_t(&self, p: Real, t: Real) -> FluidResult<Real> {
        Ok(1.0 / self.rho_from_p_t(p, t)?)
    }

    fn v_from_p_t_derivs(&self, p: Real, t: Real) -> FluidResult<PropDerivs> {
        let rho = self.rho_from_p_t_derivs(p, t)?;
        let v = 1.0 / rho.value;
        let dv_drho = -v * v;
        Ok(PropDerivs::new(v, dv_drho * rho.d1, dv_drho * rho.d2))
    }

    fn e_from_p_t(&self, p: Real, t: Real) -> FluidResult<Real> {
        self.e_from_rho_t(self.rho_from_p_t(p, t)?, t)
    }

    fn e_from_p_t_derivs(&self, p: Real, t: Real) -> FluidResult<PropDerivs> {
        let rho = self.rho_from_p_t_derivs(p, t)?;
        Ok(self.e_from_rho_t_derivs(rho.value, t)?.rho_t_to_p_t(&rho))
    }

    fn h_from_p_t(&self, p: Real, t: Real) -> FluidResult<Real> {
        self.h_from_rho_t(self.rho_from_p_t(p, t)?, t)
    }

    fn h_from_p_t_derivs(&self, p: Real, t: Real) -> FluidResult<PropDerivs> {
        let rho = self.rho_from_p_t_derivs(p, t)?;
        Ok(self.h_from_rho_t_derivs(rho.value, t)?.rho_t_to_p_t(&rho))
    }

    fn s_from_p_t(&self, p: Real, t: Real) -> FluidResult<Real> {
        self.s_from_rho_t(self.rho_from_p_t(p, t)?, t)
    }

    fn s_from_p_t_derivs(&self, p: Real, t: Real) -> FluidResult<PropDerivs> {
        let rho = self.rho_from_p_t_derivs(p, t)?;
        Ok(self.s_from_rho_t_derivs(rho.value, t)?.rho_t_to_p_t(&rho))
    }

    fn cv_from_p_t(&self, p: Real, t: Real) -> FluidResult<Real> {
        self.cv_from_rho_t(self.rho_from_p_t(p, t)?, t)
    }

    fn cv_from_p_t_derivs(&self, p: Real, t: Real) -> FluidResult<PropDerivs> {
        let rho = self.rho_from_p_t_derivs(p, t)?;
        Ok(self.cv_from_rho_t_derivs(rho.value, t)?.rho_t_to_p_t(&rho))
    }

    fn cp_from_p_t(&self, p: Real, t: Real) -> FluidResult<Real> {
        self.cp_from_rho_t(self.rho_from_p_t(p, t)?, t)
    }

    fn cp_from_p_t_derivs(&self, p: Real, t: Real) -> FluidResult<PropDerivs> {
        let rho = self.rho_from_p_t_derivs(p, t)?;
        Ok(self.cp_from_rho_t_derivs(rho.value, t)?.rho_t_to_p_t(&rho))
    }

    fn c_from_p_t(&self, p: Real, t: Real) -> FluidResult<Real> {
        self.c_from_rho_t(self.rho_from_p_t(p, t)?, t)
    }

    fn c_from_p_t_derivs(&self, p: Real, t: Real) -> FluidResult<PropDerivs> {
        let rho = self.rho_from_p_t_derivs(p, t)?;
        Ok(self.c_from_rho_t_derivs(rho.value, t)?.rho_t_to_p_t(&rho))
    }

    fn mu_from_p_t(&self, p: Real, t: Real) -> FluidResult<Real> {
        self.mu_from_rho_t(self.rho_from_p_t(p, t)?, t)
    }

    fn mu_from_p_t_derivs(&self, p: Real, t: Real) -> FluidResult<PropDerivs> {
        let rho = self.rho_from_p_t_derivs(p, t)?;
        Ok(self.mu_from_rho_t_derivs(rho.value, t)?.rho_t_to_p_t(&rho))
    }

    fn k_from_p_t(&self, p: Real, t: Real) -> FluidResult<Real> {
        self.k_from_rho_t(self.rho_from_p_t(p, t)?, t)
    }

    fn k_from_p_t_derivs(&self, p: Real, t: Real) -> FluidResult<PropDerivs> {
        let rho = self.rho_from_p_t_derivs(p, t)?;
        Ok(self.k_from_rho_t_derivs(rho.value, t)?.rho_t_to_p_t(&rho))
    }

    /// Ratio of specific heats cp/cv.
    fn gamma_from_p_t(&self, p: Real, t: Real) -> FluidResult<Real> {
        let rho = self.rho_from_p_t(p, t)?;
        Ok(self.cp_from_rho_t(rho, t)? / self.cv_from_rho_t(rho, t)?)
    }

    /// Volumetric thermal expansion coefficient β = -(1/ρ)(∂ρ/∂T)_p [1/K]
    fn beta_from_p_t(&self, p: Real, t: Real) -> FluidResult<Real> {
        let rho = self.rho_from_p_t_derivs(p, t)?;
        Ok(-rho.d2 / rho.value)
    }

    /// Density and viscosity in one call.
    fn rho_mu_from_p_t(&self, p: Real, t: Real) -> FluidResult<(Real, Real)> {
        let rho = self.rho_from_p_t(p, t)?;
        Ok((rho, self.mu_from_rho_t(rho, t)?))
    }

    fn rho_mu_from_p_t_derivs(&self, p: Real, t: Real) -> FluidResult<(PropDerivs, PropDerivs)> {
        let rho = self.rho_from_p_t_derivs(p, t)?;
        let mu = self.mu_from_rho_t_derivs(rho.value, t)?.rho_t_to_p_t(&rho);
        Ok((rho, mu))
    }

    /// Density and internal energy in one call.
    fn rho_e_from_p_t(&self, p: Real, t: Real) -> FluidResult<(Real, Real)> {
        let rho = self.rho_from_p_t(p, t)?;
        Ok((rho, self.e_from_rho_t(rho, t)?))
    }

    fn rho_e_from_p_t_derivs(&self, p: Real, t: Real) -> FluidResult<(PropDerivs, PropDerivs)> {
        let rho = self.rho_from_p_t_derivs(p, t)?;
        let e = self.e_from_rho_t_derivs(rho.value, t)?.rho_t_to_p_t(&rho);
        Ok((rho, e))
    }

    // ----------------------------------------------------------------------
    // (T, v)
    // ----------------------------------------------------------------------

    fn p_from_t_v(&self, t: Real, v: Real) -> FluidResult<Real> {
        self.p_from_rho_t(1.0 / v, t)
    }

    fn p_from_t_v_derivs(&self, t: Real, v: Real) -> FluidResult<PropDerivs> {
        Ok(self.p_from_rho_t_derivs(1.0 / v, t)?.rho_t_to_t_v(v))
    }

    fn e_from_t_v(&self, t: Real, v: Real) -> FluidResult<Real> {
        self.e_from_rho_t(1.0 / v, t)
    }

    fn e_from_t_v_derivs(&self, t: Real, v: Real) -> FluidResult<PropDerivs> {
        Ok(self.e_from_rho_t_derivs(1.0 / v, t)?.rho_t_to_t_v(v))
    }

    fn h_from_t_v(&self, t: Real, v: Real) -> FluidResult<Real> {
        self.h_from_rho_t(1.0 / v, t)
    }

    fn h_from_t_v_derivs(&self, t: Real, v: Real) -> FluidResult<PropDerivs> {
        Ok(self.h_from_rho_t_derivs(1.0 / v, t)?.rho_t_to_t_v(v))
    }

    fn s_from_t_v(&self, t: Real, v: Real) -> FluidResult<Real> {
        self.s_from_rho_t(1.0 / v, t)
    }

    fn s_from_t_v_derivs(&self, t: Real, v: Real) -> FluidResult<PropDerivs> {
        Ok(self.s_from_rho_t_derivs(1.0 / v, t)?.rho_t_to_t_v(v))
    }

    fn cv_from_t_v(&self, t: Real, v: Real) -> FluidResult<Real> {
        self.cv_from_rho_t(1.0 / v, t)
    }

    fn cv_from_t_v_derivs(&self, t: Real, v: Real) -> FluidResult<PropDerivs> {
        Ok(self.cv_from_rho_t_derivs(1.0 / v, t)?.rho_t_to_t_v(v))
    }

    fn cp_from_t_v(&self, t: Real, v: Real) -> FluidResult<Real> {
        self.cp_from_rho_t(1.0 / v, t)
    }

    fn cp_from_t_v_derivs(&self, t: Real, v: Real) -> FluidResult<PropDerivs> {
        Ok(self.cp_from_rho_t_derivs(1.0 / v, t)?.rho_t_to_t_v(v))
    }

    fn c_from_t_v(&self, t: Real, v: Real) -> FluidResult<Real> {
        self.c_from_rho_t(1.0 / v, t)
    }

    fn c_from_t_v_derivs(&self, t: Real, v: Real) -> FluidResult<PropDerivs> {
        Ok(self.c_from_rho_t_derivs(1.0 / v, t)?.rho_t_to_t_v(v))
    }

    fn mu_from_t_v(&self, t: Real, v: Real) -> FluidResult<Real> {
        self.mu_from_rho_t(1.0 / v, t)
    }

    fn mu_from_t_v_derivs(&self, t: Real, v: Real) -> FluidResult<PropDerivs> {
        Ok(self.mu_from_rho_t_derivs(1.0 / v, t)?.rho_t_to_t_v(v))
    }

    fn k_from_t_v(&self, t: Real, v: Real) -> FluidResult<Real> {
        self.k_from_rho_t(1.0 / v, t)
    }

    fn k_from_t_v_derivs(&self, t: Real, v: Real) -> FluidResult<PropDerivs> {
        Ok(self.k_from_rho_t_derivs(1.0 / v, t)?.rho_t_to_t_v(v))
    }

    // ----------------------------------------------------------------------
    // (v, e)
    // ----------------------------------------------------------------------

    fn t_from_v_e(&self, _v: Real, _e: Real) -> FluidResult<Real> {
        unsupported(self.fluid_name(), "t_from_v_e")
    }

    fn t_from_v_e_derivs(&self, _v: Real, _e: Real) -> FluidResult<PropDerivs> {
        unsupported(self.fluid_name(), "t_from_v_e")
    }

    fn p_from_v_e(&self, v: Real, e: Real) -> FluidResult<Real> {
        self.p_from_t_v(self.t_from_v_e(v, e)?, v)
    }

    fn p_from_v_e_derivs(&self, v: Real, e: Real) -> FluidResult<PropDerivs> {
        let t = self.t_from_v_e_derivs(v, e)?;
        Ok(self.p_from_t_v_derivs(t.value, v)?.t_v_to_v_e(&t))
    }

    fn c_from_v_e(&self, v: Real, e: Real) -> FluidResult<Real> {
        self.c_from_t_v(self.t_from_v_e(v, e)?, v)
    }

    fn c_from_v_e_derivs(&self, v: Real, e: Real) -> FluidResult<PropDerivs> {
        let t = self.t_from_v_e_derivs(v, e)?;
        Ok(self.c_from_t_v_derivs(t.value, v)?.t_v_to_v_e(&t))
    }

    fn cp_from_v_e(&self, v: Real, e: Real) -> FluidResult<Real> {
        self.cp_from_t_v(self.t_from_v_e(v, e)?, v)
    }

    fn cp_from_v_e_derivs(&self, v: Real, e: Real) -> FluidResult<PropDerivs> {
        let t = self.t_from_v_e_derivs(v, e)?;
        Ok(self.cp_from_t_v_derivs(t.value, v)?.t_v_to_v_e(&t))
    }

    fn cv_from_v_e(&self, v: Real, e: Real) -> FluidResult<Real> {
        self.cv_from_t_v(self.t_from_v_e(v, e)?, v)
    }

    fn cv_from_v_e_derivs(&self, v: Real, e: Real) -> FluidResult<PropDerivs> {
        let t = self.t_from_v_e_derivs(v, e)?;
        Ok(self.cv_from_t_v_derivs(t.value, v)?.t_v_to_v_e(&t))
    }

    fn s_from_v_e(&self, v: Real, e: Real) -> FluidResult<Real> {
        self.s_from_t_v(self.t_from_v_e(v, e)?, v)
    }

    fn s_from_v_e_derivs(&self, v: Real, e: Real) -> FluidResult<PropDerivs> {
        let t = self.t_from_v_e_derivs(v, e)?;
        Ok(self.s_from_t_v_derivs(t.value, v)?.t_v_to_v_e(&t))
    }

    fn h_from_v_e(&self, v: Real, e: Real) -> FluidResult<Real> {
        self.h_from_t_v(self.t_from_v_e(v, e)?, v)
    }

    fn h_from_v_e_derivs(&self, v: Real, e: Real) -> FluidResult<PropDerivs> {
        let t = self.t_from_v_e_derivs(v, e)?;
        Ok(self.h_from_t_v_derivs(t.value, v)?.t_v_to_v_e(&t))
    }

    fn mu_from_v_e(&self, v: Real, e: Real) -> FluidResult<Real> {
        self.mu_from_t_v(self.t_from_v_e(v, e)?, v)
    }

    fn mu_from_v_e_derivs(&self, v: Real, e: Real) -> FluidResult<PropDerivs> {
        let t = self.t_from_v_e_derivs(v, e)?;
        Ok(self.mu_from_t_v_derivs(t.value, v)?.t_v_to_v_e(&t))
    }

    fn k_from_v_e(&self, v: Real, e: Real) -> FluidResult<Real> {
        self.k_from_t_v(self.t_from_v_e(v, e)?, v)
    }

    fn k_from_v_e_derivs(&self, v: Real, e: Real) -> FluidResult<PropDerivs> {
        let t = self.t_from_v_e_derivs(v, e)?;
        Ok(self.k_from_t_v_derivs(t.value, v)?.t_v_to_v_e(&t))
    }

    fn gamma_from_v_e(&self, v: Real, e: Real) -> FluidResult<Real> {
        let t = self.t_from_v_e(v, e)?;
        Ok(self.cp_from_t_v(t, v)? / self.cv_from_t_v(t, v)?)
    }

    // ----------------------------------------------------------------------
    // Other inversions
    // ----------------------------------------------------------------------

    fn e_from_p_rho(&self, _p: Real, _rho: Real) -> FluidResult<Real> {
        unsupported(self.fluid_name(), "e_from_p_rho")
    }

    fn e_from_p_rho_derivs(&self, _p: Real, _rho: Real) -> FluidResult<PropDerivs> {
        unsupported(self.fluid_name(), "e_from_p_rho")
    }

    fn t_from_p_h(&self, _p: Real, _h: Real) -> FluidResult<Real> {
        unsupported(self.fluid_name(), "t_from_p_h")
    }

    fn s_from_h_p(&self, h: Real, p: Real) -> FluidResult<Real> {
        self.s_from_p_t(p, self.t_from_p_h(p, h)?)
    }

    fn rho_from_p_s(&self, _p: Real, _s: Real) -> FluidResult<Real> {
        unsupported(self.fluid_name(), "rho_from_p_s")
    }

    fn p_from_h_s(&self, _h: Real, _s: Real) -> FluidResult<Real> {
        unsupported(self.fluid_name(), "p_from_h_s")
    }

    // ----------------------------------------------------------------------
    // Phase boundaries
    // ----------------------------------------------------------------------

    fn vapor_pressure(&self, _t: Real) -> FluidResult<Real> {
        unsupported(self.fluid_name(), "vapor_pressure")
    }

    /// Vapor pressure and its temperature derivative.
    fn vapor_pressure_derivs(&self, _t: Real) -> FluidResult<(Real, Real)> {
        unsupported(self.fluid_name(), "vapor_pressure")
    }

    /// Saturation temperature at pressure `p`.
    ///
    /// Inverts [`vapor_pressure`](Self::vapor_pressure) between the triple and
    /// critical temperatures.
    fn vapor_temperature(&self, p: Real) -> FluidResult<Real> {
        let name = self.fluid_name();
        let t_triple = self.triple_point_temperature()?;
        let t_crit = self.critical_temperature()?;

        let residual = |t: Real| -> FluidResult<Real> { Ok(self.vapor_pressure(t)? - p) };
        if residual(t_triple)? * residual(t_crit)? > 0.0 {
            return Err(FluidError::domain(name, "vapor_temperature", "Pressure is out of range"));
        }
        brent::root(residual, t_triple, t_crit).map_err(|e| e.in_context(name, "vapor_temperature"))
    }

    fn saturated_liquid_density(&self, _t: Real) -> FluidResult<Real> {
        unsupported(self.fluid_name(), "saturated_liquid_density")
    }

    fn saturated_vapor_density(&self, _t: Real) -> FluidResult<Real> {
        unsupported(self.fluid_name(), "saturated_vapor_density")
    }

    fn melting_pressure(&self, _t: Real) -> FluidResult<Real> {
        unsupported(self.fluid_name(), "melting_pressure")
    }

    fn sublimation_pressure(&self, _t: Real) -> FluidResult<Real> {
        unsupported(self.fluid_name(), "sublimation_pressure")
    }

    // ----------------------------------------------------------------------
    // Mixture bracketing helpers
    // ----------------------------------------------------------------------

    /// Internal energy on the vapor spinodal at specific volume `v`.
    fn e_spndl_from_v(&self, _v: Real) -> FluidResult<Real> {
        unsupported(self.fluid_name(), "e_spndl_from_v")
    }

    /// Specific volume and internal energy on the vapor spinodal at `t`.
    fn v_e_spndl_from_t(&self, _t: Real) -> FluidResult<(Real, Real)> {
        unsupported(self.fluid_name(), "v_e_spndl_from_t")
    }

    /// Partial pressure at which this component saturates inside a mixture at
    /// total pressure `p` and temperature `t`.
    ///
    /// `None` means the component cannot condense at this state.
    fn pp_sat_from_p_t(&self, p: Real, t: Real) -> FluidResult<Option<Real>> {
        if t >= self.critical_temperature()? {
            return Ok(None);
        }
        let p_sat = self.vapor_pressure(t)?;
        Ok((p_sat < p).then_some(p_sat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Analytic toy fluid: p = ρ T, e = T² + ρ.
    struct Toy;

    impl SinglePhaseFluid for Toy {
        fn fluid_name(&self) -> &str {
            "toy"
        }

        fn molar_mass(&self) -> Real {
            1.0
        }

        fn p_from_rho_t_derivs(&self, rho: Real, t: Real) -> FluidResult<PropDerivs> {
            Ok(PropDerivs::new(rho * t, t, rho))
        }

        fn e_from_rho_t_derivs(&self, rho: Real, t: Real) -> FluidResult<PropDerivs> {
            Ok(PropDerivs::new(t * t + rho, 1.0, 2.0 * t))
        }

        fn rho_from_p_t_derivs(&self, p: Real, t: Real) -> FluidResult<PropDerivs> {
            Ok(PropDerivs::new(p / t, 1.0 / t, -p / (t * t)))
        }

        fn t_from_v_e_derivs(&self, v: Real, e: Real) -> FluidResult<PropDerivs> {
            // e = T² + 1/v
            let t = (e - 1.0 / v).sqrt();
            Ok(PropDerivs::new(t, 1.0 / (2.0 * t * v * v), 1.0 / (2.0 * t)))
        }
    }

    #[test]
    fn p_t_chain_rule() {
        // e(p, T) = T² + p/T
        let (p, t) = (6.0, 2.0);
        let e = Toy.e_from_p_t_derivs(p, t).unwrap();
        assert_relative_eq!(e.value, 7.0);
        assert_relative_eq!(e.d1, 1.0 / t);
        assert_relative_eq!(e.d2, 2.0 * t - p / (t * t));
    }

    #[test]
    fn t_v_chain_rule() {
        // p(T, v) = T / v
        let (t, v) = (3.0, 0.5);
        let p = Toy.p_from_t_v_derivs(t, v).unwrap();
        assert_relative_eq!(p.value, 6.0);
        assert_relative_eq!(p.d1, 1.0 / v);
        assert_relative_eq!(p.d2, -t / (v * v));
    }

    #[test]
    fn v_e_chain_rule() {
        // p(v, e) = sqrt(e - 1/v) / v
        let (v, e) = (0.5, 11.0);
        let p = Toy.p_from_v_e_derivs(v, e).unwrap();
        let t: Real = 3.0;
        assert_relative_eq!(p.value, t / v);

        let dp_de = 1.0 / (2.0 * t * v);
        let dp_dv = -t / (v * v) + (1.0 / v) / (2.0 * t * v * v);
        assert_relative_eq!(p.d1, dp_dv, max_relative = 1e-12);
        assert_relative_eq!(p.d2, dp_de, max_relative = 1e-12);
    }

    #[test]
    fn specific_volume_derivs() {
        // v = T / p
        let v = Toy.v_from_p_t_derivs(4.0, 2.0).unwrap();
        assert_relative_eq!(v.value, 0.5);
        assert_relative_eq!(v.d1, -2.0 / 16.0);
        assert_relative_eq!(v.d2, 0.25);
    }

    #[test]
    fn missing_methods_report_fluid_and_operation() {
        let err = Toy.vapor_pressure(300.0).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::NotImplemented);
        let msg = err.to_string();
        assert!(msg.contains("toy"));
        assert!(msg.contains("vapor_pressure"));
    }
}
