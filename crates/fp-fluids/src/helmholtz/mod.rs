//! Fluids described by a reduced Helmholtz free energy α(δ,τ).
//!
//! δ = ρ/ρc and τ = Tc/T. A fluid supplies its constants and term banks by
//! implementing [`HelmholtzEos`]; wrapping it in a [`HelmholtzFluid`] yields a
//! full [`SinglePhaseFluid`] with every thermodynamic property derived from α
//! and its partial derivatives:
//!
//! ```text
//! p  = ρ R T δ α_δ
//! e  = R T τ α_τ
//! h  = R T (τ α_τ + δ α_δ)
//! s  = R (τ α_τ − α)
//! cv = −R τ² α_ττ
//! cp = cv + R (δ α_δ − δ τ α_δτ)² / (2 δ α_δ + δ² α_δδ)
//! c² = R T (2 δ α_δ + δ² α_δδ − (δ α_δ − δ τ α_δτ)² / (τ² α_ττ))
//! ```
//!
//! with R the specific gas constant.

pub mod terms;

use crate::error::{FluidError, FluidResult};
use crate::fluid::{PropDerivs, SinglePhaseFluid};
use fp_core::{FD_REL_STEP, Real, central_difference, constants::R_MOLAR};
use fp_solver::{NewtonConfig, brent, newton};
use nalgebra::{Matrix2, Vector2};

pub use terms::{
    ExpTerm, GaussianTerm, IdealPart, NonAnalyticTerm, PowerTerm, ResidualPart, ResidualTerm,
};

/// Constants, term banks and correlations of a Helmholtz equation of state.
///
/// Only the constants and the two α parts are required. Correlations a fluid
/// does not publish keep their default, which reports
/// [`FluidError::NotImplemented`].
pub trait HelmholtzEos: Send + Sync {
    /// Short lowercase identifier, e.g. `"co2"`.
    fn name(&self) -> &'static str;

    /// Molar mass [kg/mol]
    fn molar_mass(&self) -> Real;
    fn critical_pressure(&self) -> Real;
    fn critical_temperature(&self) -> Real;
    fn critical_density(&self) -> Real;
    fn triple_point_pressure(&self) -> Real;
    fn triple_point_temperature(&self) -> Real;

    /// Molar gas constant [J/(mol·K)] the equation was fitted with.
    fn gas_constant(&self) -> Real {
        R_MOLAR
    }

    /// Ideal-gas part α⁰.
    fn ideal(&self) -> &IdealPart;

    /// Residual part αʳ.
    fn residual(&self) -> &ResidualPart;

    fn alpha(&self, delta: Real, tau: Real) -> Real {
        self.ideal().alpha(delta, tau) + self.residual().alpha(delta, tau)
    }

    fn dalpha_ddelta(&self, delta: Real, tau: Real) -> Real {
        self.ideal().d_delta(delta) + self.residual().d_delta(delta, tau)
    }

    fn dalpha_dtau(&self, delta: Real, tau: Real) -> Real {
        self.ideal().d_tau(tau) + self.residual().d_tau(delta, tau)
    }

    fn d2alpha_ddelta2(&self, delta: Real, tau: Real) -> Real {
        self.ideal().d2_delta2(delta) + self.residual().d2_delta2(delta, tau)
    }

    fn d2alpha_dtau2(&self, delta: Real, tau: Real) -> Real {
        self.ideal().d2_tau2(tau) + self.residual().d2_tau2(delta, tau)
    }

    /// The ideal part carries no δ-τ coupling.
    fn d2alpha_ddeltatau(&self, delta: Real, tau: Real) -> Real {
        self.residual().d2_delta_tau(delta, tau)
    }

    /// Seed interval for the density search at (p, T) [kg/m³].
    fn density_bracket(&self, _p: Real, _t: Real) -> (Real, Real) {
        (1e-2, 100.0)
    }

    /// Validity check applied before evaluating p(ρ,T).
    fn check_rho_t(&self, _rho: Real, _t: Real, _op: &'static str) -> FluidResult<()> {
        Ok(())
    }

    /// Validity check applied before inverting ρ(p,T).
    fn check_p_t(&self, _p: Real, _t: Real, _op: &'static str) -> FluidResult<()> {
        Ok(())
    }

    /// Pressure to report instead of the equation of state inside the
    /// two-phase region, if the fluid defines one.
    fn two_phase_pressure(&self, _rho: Real, _t: Real) -> FluidResult<Option<Real>> {
        Ok(None)
    }

    /// Dynamic viscosity [Pa·s] with ∂μ/∂ρ|T and ∂μ/∂T|ρ.
    fn viscosity(&self, _rho: Real, _t: Real) -> FluidResult<PropDerivs> {
        Err(FluidError::not_implemented(self.name(), "mu_from_rho_t"))
    }

    /// Thermal conductivity [W/(m·K)].
    fn conductivity(&self, _rho: Real, _t: Real) -> FluidResult<Real> {
        Err(FluidError::not_implemented(self.name(), "k_from_rho_t"))
    }

    fn vapor_pressure(&self, _t: Real) -> FluidResult<Real> {
        Err(FluidError::not_implemented(self.name(), "vapor_pressure"))
    }

    fn vapor_pressure_derivs(&self, _t: Real) -> FluidResult<(Real, Real)> {
        Err(FluidError::not_implemented(self.name(), "vapor_pressure"))
    }

    fn saturated_liquid_density(&self, _t: Real) -> FluidResult<Real> {
        Err(FluidError::not_implemented(self.name(), "saturated_liquid_density"))
    }

    fn saturated_vapor_density(&self, _t: Real) -> FluidResult<Real> {
        Err(FluidError::not_implemented(self.name(), "saturated_vapor_density"))
    }

    fn melting_pressure(&self, _t: Real) -> FluidResult<Real> {
        Err(FluidError::not_implemented(self.name(), "melting_pressure"))
    }

    fn sublimation_pressure(&self, _t: Real) -> FluidResult<Real> {
        Err(FluidError::not_implemented(self.name(), "sublimation_pressure"))
    }

    fn henry_coefficients(&self) -> FluidResult<[Real; 3]> {
        Err(FluidError::not_implemented(self.name(), "henry_coefficients"))
    }
}

/// Σ n θ^k of an ancillary correlation and its derivative with respect to θ.
pub(crate) fn ancillary_sum(terms: &[(Real, Real)], theta: Real) -> (Real, Real) {
    terms.iter().fold((0.0, 0.0), |(sum, dsum), &(n, k)| {
        (sum + n * theta.powf(k), dsum + n * k * theta.powf(k - 1.0))
    })
}

/// Settings for the Newton inversions of a [`HelmholtzFluid`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InversionConfig {
    pub newton: NewtonConfig,
    /// Starting temperature for T(p,h), T(p,s) and T(p,ρ) [K]
    pub t_initial_guess: Real,
    /// Starting pressure for p(h,s) [Pa]
    pub p_initial_guess: Real,
}

impl Default for InversionConfig {
    fn default() -> Self {
        Self {
            newton: NewtonConfig::default(),
            t_initial_guess: 400.0,
            p_initial_guess: 2e5,
        }
    }
}

/// α and its five partial derivatives at one (δ, τ).
#[derive(Clone, Copy, Debug)]
struct AlphaDerivs {
    delta: Real,
    tau: Real,
    a: Real,
    d: Real,
    t: Real,
    dd: Real,
    tt: Real,
    dt: Real,
}

impl AlphaDerivs {
    /// 2δα_δ + δ²α_δδ, proportional to (∂p/∂ρ)_T
    fn compressibility(&self) -> Real {
        2.0 * self.delta * self.d + self.delta * self.delta * self.dd
    }

    /// δα_δ − δτα_δτ, proportional to (∂p/∂T)_ρ
    fn thermal_pressure(&self) -> Real {
        self.delta * self.d - self.delta * self.tau * self.dt
    }
}

/// A [`SinglePhaseFluid`] backed by a Helmholtz equation of state.
#[derive(Clone, Debug, Default)]
pub struct HelmholtzFluid<E> {
    eos: E,
    config: InversionConfig,
}

impl<E: HelmholtzEos> HelmholtzFluid<E> {
    pub fn new(eos: E) -> Self {
        Self::with_config(eos, InversionConfig::default())
    }

    pub fn with_config(eos: E, config: InversionConfig) -> Self {
        Self { eos, config }
    }

    pub fn eos(&self) -> &E {
        &self.eos
    }

    pub fn config(&self) -> &InversionConfig {
        &self.config
    }

    /// Specific gas constant [J/(kg·K)]
    pub fn specific_gas_constant(&self) -> Real {
        self.eos.gas_constant() / self.eos.molar_mass()
    }

    fn alpha_derivs(&self, rho: Real, t: Real) -> AlphaDerivs {
        let delta = rho / self.eos.critical_density();
        let tau = self.eos.critical_temperature() / t;
        AlphaDerivs {
            delta,
            tau,
            a: self.eos.alpha(delta, tau),
            d: self.eos.dalpha_ddelta(delta, tau),
            t: self.eos.dalpha_dtau(delta, tau),
            dd: self.eos.d2alpha_ddelta2(delta, tau),
            tt: self.eos.d2alpha_dtau2(delta, tau),
            dt: self.eos.d2alpha_ddeltatau(delta, tau),
        }
    }

    /// Pressure from the equation of state alone, ignoring two-phase hooks.
    fn eos_pressure(&self, rho: Real, t: Real) -> PropDerivs {
        let r = self.specific_gas_constant();
        let a = self.alpha_derivs(rho, t);
        PropDerivs::new(
            r * rho * t * a.delta * a.d,
            r * t * a.compressibility(),
            r * rho * a.thermal_pressure(),
        )
    }

    fn cv_value(&self, rho: Real, t: Real) -> Real {
        let a = self.alpha_derivs(rho, t);
        -self.specific_gas_constant() * a.tau * a.tau * a.tt
    }

    fn cp_value(&self, rho: Real, t: Real) -> Real {
        let r = self.specific_gas_constant();
        let a = self.alpha_derivs(rho, t);
        let cv = -r * a.tau * a.tau * a.tt;
        cv + r * a.thermal_pressure().powi(2) / a.compressibility()
    }

    fn c_value(&self, rho: Real, t: Real) -> Real {
        let r = self.specific_gas_constant();
        let a = self.alpha_derivs(rho, t);
        let c2 = r
            * t
            * (a.compressibility() - a.thermal_pressure().powi(2) / (a.tau * a.tau * a.tt));
        c2.sqrt()
    }

    /// Central differences of `f` in ρ and T with relative step [`FD_REL_STEP`].
    fn fd_rho_t(
        &self,
        rho: Real,
        t: Real,
        f: impl Fn(Real, Real) -> FluidResult<Real>,
    ) -> FluidResult<PropDerivs> {
        let value = f(rho, t)?;
        let d_rho = central_difference(|x| f(x, t), rho, FD_REL_STEP)?;
        let d_t = central_difference(|x| f(rho, x), t, FD_REL_STEP)?;
        Ok(PropDerivs::new(value, d_rho, d_t))
    }

    /// Temperature at given pressure and density, by Newton iteration on T.
    pub fn t_from_p_rho(&self, p: Real, rho: Real) -> FluidResult<Real> {
        let residual = |t: Real| -> FluidResult<(Real, Real)> {
            let pd = self.p_from_rho_t_derivs(rho, t)?;
            Ok((pd.value, pd.d2))
        };
        newton::newton_solve(p, self.config.t_initial_guess, residual, &self.config.newton)
            .map(|r| r.x)
            .map_err(|e| e.in_context(self.eos.name(), "t_from_p_rho"))
    }

    /// Pressure and temperature at given specific enthalpy and entropy.
    ///
    /// Two-dimensional Newton iteration on (p, T) starting from the configured
    /// initial guesses.
    pub fn p_t_from_h_s(&self, h: Real, s: Real) -> FluidResult<(Real, Real)> {
        let residual = |z: &Vector2<Real>| -> FluidResult<(Vector2<Real>, Matrix2<Real>)> {
            let hd = self.h_from_p_t_derivs(z[0], z[1])?;
            let sd = self.s_from_p_t_derivs(z[0], z[1])?;
            Ok((
                Vector2::new(hd.value, sd.value),
                Matrix2::new(hd.d1, hd.d2, sd.d1, sd.d2),
            ))
        };
        let z0 = Vector2::new(self.config.p_initial_guess, self.config.t_initial_guess);
        let result =
            newton::newton_solve_2d(Vector2::new(h, s), z0, residual, &self.config.newton)
                .map_err(|e| e.in_context(self.eos.name(), "p_t_from_h_s"))?;
        Ok((result.x[0], result.x[1]))
    }

    /// Temperature at which the saturated vapor density equals `rho`.
    ///
    /// Clamped to the triple point for states more dilute than the saturated
    /// vapor there.
    fn saturation_temperature_at_vapor_density(&self, rho: Real) -> FluidResult<Real> {
        let name = self.eos.name();
        let t_triple = self.eos.triple_point_temperature();
        let t_crit = self.eos.critical_temperature();

        let residual = |t: Real| -> FluidResult<Real> {
            Ok(self.eos.saturated_vapor_density(t)? - rho)
        };
        if residual(t_triple)? >= 0.0 {
            return Ok(t_triple);
        }
        brent::root(residual, t_triple, t_crit).map_err(|e| e.in_context(name, "e_spndl_from_v"))
    }
}

impl<E: HelmholtzEos> SinglePhaseFluid for HelmholtzFluid<E> {
    fn fluid_name(&self) -> &str {
        self.eos.name()
    }

    fn molar_mass(&self) -> Real {
        self.eos.molar_mass()
    }

    fn critical_pressure(&self) -> FluidResult<Real> {
        Ok(self.eos.critical_pressure())
    }

    fn critical_temperature(&self) -> FluidResult<Real> {
        Ok(self.eos.critical_temperature())
    }

    fn critical_density(&self) -> FluidResult<Real> {
        Ok(self.eos.critical_density())
    }

    fn critical_internal_energy(&self) -> FluidResult<Real> {
        self.e_from_rho_t(self.eos.critical_density(), self.eos.critical_temperature())
    }

    fn triple_point_pressure(&self) -> FluidResult<Real> {
        Ok(self.eos.triple_point_pressure())
    }

    fn triple_point_temperature(&self) -> FluidResult<Real> {
        Ok(self.eos.triple_point_temperature())
    }

    fn henry_coefficients(&self) -> FluidResult<[Real; 3]> {
        self.eos.henry_coefficients()
    }

    fn p_from_rho_t(&self, rho: Real, t: Real) -> FluidResult<Real> {
        self.eos.check_rho_t(rho, t, "p_from_rho_t")?;
        if let Some(p) = self.eos.two_phase_pressure(rho, t)? {
            return Ok(p);
        }
        Ok(self.eos_pressure(rho, t).value)
    }

    fn p_from_rho_t_derivs(&self, rho: Real, t: Real) -> FluidResult<PropDerivs> {
        self.eos.check_rho_t(rho, t, "p_from_rho_t")?;
        if self.eos.two_phase_pressure(rho, t)?.is_some() {
            // saturation pressure depends on temperature only
            let (p_sat, dpsat_dt) = self.eos.vapor_pressure_derivs(t)?;
            return Ok(PropDerivs::new(p_sat, 0.0, dpsat_dt));
        }
        Ok(self.eos_pressure(rho, t))
    }

    fn e_from_rho_t(&self, rho: Real, t: Real) -> FluidResult<Real> {
        let a = self.alpha_derivs(rho, t);
        Ok(self.specific_gas_constant() * t * a.tau * a.t)
    }

    fn e_from_rho_t_derivs(&self, rho: Real, t: Real) -> FluidResult<PropDerivs> {
        let r = self.specific_gas_constant();
        let a = self.alpha_derivs(rho, t);
        Ok(PropDerivs::new(
            r * t * a.tau * a.t,
            r * t * a.tau * a.dt / self.eos.critical_density(),
            -r * a.tau * a.tau * a.tt,
        ))
    }

    fn h_from_rho_t(&self, rho: Real, t: Real) -> FluidResult<Real> {
        let a = self.alpha_derivs(rho, t);
        Ok(self.specific_gas_constant() * t * (a.tau * a.t + a.delta * a.d))
    }

    fn h_from_rho_t_derivs(&self, rho: Real, t: Real) -> FluidResult<PropDerivs> {
        let r = self.specific_gas_constant();
        let a = self.alpha_derivs(rho, t);
        Ok(PropDerivs::new(
            r * t * (a.tau * a.t + a.delta * a.d),
            r * t * (a.tau * a.dt + a.d + a.delta * a.dd) / self.eos.critical_density(),
            r * (a.delta * a.d - a.tau * a.tau * a.tt - a.delta * a.tau * a.dt),
        ))
    }

    fn s_from_rho_t(&self, rho: Real, t: Real) -> FluidResult<Real> {
        let a = self.alpha_derivs(rho, t);
        Ok(self.specific_gas_constant() * (a.tau * a.t - a.a))
    }

    fn s_from_rho_t_derivs(&self, rho: Real, t: Real) -> FluidResult<PropDerivs> {
        let r = self.specific_gas_constant();
        let a = self.alpha_derivs(rho, t);
        Ok(PropDerivs::new(
            r * (a.tau * a.t - a.a),
            r * (a.tau * a.dt - a.d) / self.eos.critical_density(),
            -r * a.tau * a.tau * a.tt / t,
        ))
    }

    fn cv_from_rho_t(&self, rho: Real, t: Real) -> FluidResult<Real> {
        Ok(self.cv_value(rho, t))
    }

    fn cv_from_rho_t_derivs(&self, rho: Real, t: Real) -> FluidResult<PropDerivs> {
        self.fd_rho_t(rho, t, |r, t| Ok(self.cv_value(r, t)))
    }

    fn cp_from_rho_t(&self, rho: Real, t: Real) -> FluidResult<Real> {
        Ok(self.cp_value(rho, t))
    }

    fn cp_from_rho_t_derivs(&self, rho: Real, t: Real) -> FluidResult<PropDerivs> {
        self.fd_rho_t(rho, t, |r, t| Ok(self.cp_value(r, t)))
    }

    fn c_from_rho_t(&self, rho: Real, t: Real) -> FluidResult<Real> {
        Ok(self.c_value(rho, t))
    }

    fn c_from_rho_t_derivs(&self, rho: Real, t: Real) -> FluidResult<PropDerivs> {
        self.fd_rho_t(rho, t, |r, t| Ok(self.c_value(r, t)))
    }

    fn mu_from_rho_t(&self, rho: Real, t: Real) -> FluidResult<Real> {
        Ok(self.eos.viscosity(rho, t)?.value)
    }

    fn mu_from_rho_t_derivs(&self, rho: Real, t: Real) -> FluidResult<PropDerivs> {
        self.eos.viscosity(rho, t)
    }

    fn k_from_rho_t(&self, rho: Real, t: Real) -> FluidResult<Real> {
        self.eos.conductivity(rho, t)
    }

    fn k_from_rho_t_derivs(&self, rho: Real, t: Real) -> FluidResult<PropDerivs> {
        self.fd_rho_t(rho, t, |r, t| self.eos.conductivity(r, t))
    }

    fn rho_from_p_t(&self, p: Real, t: Real) -> FluidResult<Real> {
        let name = self.eos.name();
        self.eos.check_p_t(p, t, "rho_from_p_t")?;

        let (mut lo, mut hi) = self.eos.density_bracket(p, t);
        let residual = |rho: Real| -> FluidResult<Real> { Ok(self.p_from_rho_t(rho, t)? - p) };

        brent::bracket(residual, &mut lo, &mut hi)
            .and_then(|()| brent::root(residual, lo, hi))
            .map_err(|e| e.in_context(name, "rho_from_p_t"))
            .inspect_err(|err| {
                tracing::debug!(fluid = name, p, t, %err, "density inversion failed");
            })
    }

    fn rho_from_p_t_derivs(&self, p: Real, t: Real) -> FluidResult<PropDerivs> {
        let rho = self.rho_from_p_t(p, t)?;
        let dp = self.eos_pressure(rho, t);
        Ok(PropDerivs::new(rho, 1.0 / dp.d1, -dp.d2 / dp.d1))
    }

    fn t_from_v_e(&self, v: Real, e: Real) -> FluidResult<Real> {
        let name = self.eos.name();
        let rho = 1.0 / v;
        let residual = |t: Real| -> FluidResult<Real> { Ok(self.e_from_rho_t(rho, t)? - e) };

        let mut lo = 0.5 * self.config.t_initial_guess;
        let mut hi = self.config.t_initial_guess;
        brent::bracket(residual, &mut lo, &mut hi)
            .and_then(|()| brent::root(residual, lo, hi))
            .map_err(|err| err.in_context(name, "t_from_v_e"))
            .inspect_err(|err| {
                tracing::debug!(fluid = name, v, e, %err, "temperature inversion failed");
            })
    }

    fn t_from_v_e_derivs(&self, v: Real, e: Real) -> FluidResult<PropDerivs> {
        let t = self.t_from_v_e(v, e)?;
        let rho = 1.0 / v;
        let de = self.e_from_rho_t_derivs(rho, t)?;
        // (∂e/∂v)_T = −ρ² (∂e/∂ρ)_T
        Ok(PropDerivs::new(t, rho * rho * de.d1 / de.d2, 1.0 / de.d2))
    }

    fn e_from_p_rho(&self, p: Real, rho: Real) -> FluidResult<Real> {
        let t = self.t_from_p_rho(p, rho)?;
        self.e_from_rho_t(rho, t)
    }

    fn e_from_p_rho_derivs(&self, p: Real, rho: Real) -> FluidResult<PropDerivs> {
        let t = self.t_from_p_rho(p, rho)?;
        let dp = self.eos_pressure(rho, t);
        let de = self.e_from_rho_t_derivs(rho, t)?;
        Ok(PropDerivs::new(
            de.value,
            de.d2 / dp.d2,
            de.d1 - de.d2 * dp.d1 / dp.d2,
        ))
    }

    fn t_from_p_h(&self, p: Real, h: Real) -> FluidResult<Real> {
        let residual = |t: Real| -> FluidResult<(Real, Real)> {
            let hd = self.h_from_p_t_derivs(p, t)?;
            Ok((hd.value, hd.d2))
        };
        newton::newton_solve(h, self.config.t_initial_guess, residual, &self.config.newton)
            .map(|r| r.x)
            .map_err(|e| e.in_context(self.eos.name(), "t_from_p_h"))
    }

    fn rho_from_p_s(&self, p: Real, s: Real) -> FluidResult<Real> {
        let residual = |t: Real| -> FluidResult<(Real, Real)> {
            let sd = self.s_from_p_t_derivs(p, t)?;
            Ok((sd.value, sd.d2))
        };
        let t = newton::newton_solve(s, self.config.t_initial_guess, residual, &self.config.newton)
            .map_err(|e| e.in_context(self.eos.name(), "rho_from_p_s"))?
            .x;
        self.rho_from_p_t(p, t)
    }

    fn p_from_h_s(&self, h: Real, s: Real) -> FluidResult<Real> {
        Ok(self.p_t_from_h_s(h, s)?.0)
    }

    fn vapor_pressure(&self, t: Real) -> FluidResult<Real> {
        self.eos.vapor_pressure(t)
    }

    fn vapor_pressure_derivs(&self, t: Real) -> FluidResult<(Real, Real)> {
        self.eos.vapor_pressure_derivs(t)
    }

    fn saturated_liquid_density(&self, t: Real) -> FluidResult<Real> {
        self.eos.saturated_liquid_density(t)
    }

    fn saturated_vapor_density(&self, t: Real) -> FluidResult<Real> {
        self.eos.saturated_vapor_density(t)
    }

    fn melting_pressure(&self, t: Real) -> FluidResult<Real> {
        self.eos.melting_pressure(t)
    }

    fn sublimation_pressure(&self, t: Real) -> FluidResult<Real> {
        self.eos.sublimation_pressure(t)
    }

    /// The saturated vapor state stands in for the vapor spinodal.
    fn e_spndl_from_v(&self, v: Real) -> FluidResult<Real> {
        let rho = 1.0 / v;
        if rho >= self.eos.critical_density() {
            return self.critical_internal_energy();
        }
        let t = self.saturation_temperature_at_vapor_density(rho)?;
        self.e_from_rho_t(rho, t)
    }

    fn v_e_spndl_from_t(&self, t: Real) -> FluidResult<(Real, Real)> {
        let rho = if t < self.eos.critical_temperature() {
            self.eos.saturated_vapor_density(t)?
        } else {
            self.eos.critical_density()
        };
        Ok((1.0 / rho, self.e_from_rho_t(rho, t)?))
    }
}
