//! Ideal mixture of real gases.
//!
//! One condensable primary vapor and any number of secondary vapors share a
//! temperature; the pressure is the sum of the component pressures and each
//! component fills the whole volume, so component `j` sits at `v / xⱼ`.

use std::sync::Once;

use crate::composition::{MassFractions, apparent_molar_mass};
use crate::config::MixtureConfig;
use crate::convert::{self, Components};
use crate::error::{MixtureError, MixtureResult};
use crate::fluid::{MixDerivs, VaporMixtureFluid};
use fp_core::constants::R_MOLAR;
use fp_core::{FD_REL_STEP, Real, forward_difference};
use fp_fluids::SinglePhaseFluid;
use fp_solver::newton::{self, NewtonConfig};
use fp_solver::{SolverError, brent};

/// Step used for the composition finite differences of the speed of sound.
const DX_STEP: Real = 1e-6;

/// Newton settings for the secondary partial-pressure balance in
/// [`IdealRealGasMixture::xs_prim_from_p_t`].
const XS_NEWTON: NewtonConfig = NewtonConfig {
    tolerance: 1e-8,
    max_iterations: 16,
};

/// Mixture of a primary vapor with secondary vapors under Dalton's law.
///
/// The component fluids are borrowed; the mixture itself holds no state
/// besides its configuration.
pub struct IdealRealGasMixture<'a> {
    primary: &'a dyn SinglePhaseFluid,
    secondary: Vec<&'a dyn SinglePhaseFluid>,
    config: MixtureConfig,
    imperfect_jacobian: Once,
}

impl<'a> IdealRealGasMixture<'a> {
    pub fn new(
        primary: &'a dyn SinglePhaseFluid,
        secondary: Vec<&'a dyn SinglePhaseFluid>,
    ) -> MixtureResult<Self> {
        Self::with_config(primary, secondary, MixtureConfig::default())
    }

    pub fn with_config(
        primary: &'a dyn SinglePhaseFluid,
        secondary: Vec<&'a dyn SinglePhaseFluid>,
        config: MixtureConfig,
    ) -> MixtureResult<Self> {
        let invalid = |what: &str| MixtureError::InvalidInput {
            mixture: config.name.clone(),
            what: what.to_string(),
        };
        if secondary.is_empty() {
            return Err(invalid("at least one secondary vapor is required"));
        }
        if !(config.t_mix_max.is_finite() && config.t_mix_max > 0.0) {
            return Err(invalid("t_mix_max must be positive and finite"));
        }

        tracing::debug!(
            mixture = %config.name,
            primary = primary.fluid_name(),
            secondary = ?secondary.iter().map(|fp| fp.fluid_name()).collect::<Vec<_>>(),
            "mixture created"
        );

        Ok(Self {
            primary,
            secondary,
            config,
            imperfect_jacobian: Once::new(),
        })
    }

    pub fn config(&self) -> &MixtureConfig {
        &self.config
    }

    pub fn primary(&self) -> &'a dyn SinglePhaseFluid {
        self.primary
    }

    pub fn secondary(&self) -> &[&'a dyn SinglePhaseFluid] {
        &self.secondary
    }

    /// Apparent molar mass `M*` of the mixture at composition `x`.
    pub fn molar_mass(&self, x: &[Real]) -> MixtureResult<Real> {
        let x = self.fractions(x)?;
        Ok(self.apparent_molar_mass(&x))
    }

    fn fractions<'x>(&self, x: &'x [Real]) -> MixtureResult<MassFractions<'x>> {
        MassFractions::new(x, self.secondary.len())
    }

    fn components(&self) -> Components<'_> {
        (self.primary, self.secondary.as_slice())
    }

    fn apparent_molar_mass(&self, x: &MassFractions<'_>) -> Real {
        apparent_molar_mass(
            std::iter::once((x.primary(), self.primary.molar_mass())).chain(
                self.secondary
                    .iter()
                    .zip(x.secondary())
                    .map(|(fp, &x_i)| (x_i, fp.molar_mass())),
            ),
        )
    }

    fn note_imperfect_jacobian(&self, op: &'static str) {
        if self.secondary.len() > 1 {
            self.imperfect_jacobian.call_once(|| {
                tracing::warn!(
                    mixture = %self.config.name,
                    op,
                    "composition derivatives hold the other secondary fractions fixed; \
                     the Jacobian is imperfect with more than one secondary vapor"
                );
            });
        }
    }

    /// Temperature bracket for the (v,e) and (p,v) inversions.
    ///
    /// The lower end is the primary's saturated (or critical) state at its own
    /// specific volume; the upper end is `t_mix_max`.
    fn temperature_bracket(&self, v: Real, x: &MassFractions<'_>) -> MixtureResult<(Real, Real)> {
        let v_primary = v / x.primary();
        let v_c = 1.0 / self.primary.critical_density()?;
        let e_lower = if v_primary > v_c {
            self.primary.e_spndl_from_v(v_primary)?
        } else {
            self.primary.critical_internal_energy()?
        };
        let t_lower = self.primary.t_from_v_e(v_primary, e_lower)?;
        Ok((t_lower, self.config.t_mix_max))
    }

    /// Solve `residual(T) = 0` over the mixture temperature bracket.
    fn solve_temperature<F>(
        &self,
        v: Real,
        x: &MassFractions<'_>,
        op: &'static str,
        residual: F,
    ) -> MixtureResult<Real>
    where
        F: Fn(Real) -> MixtureResult<Real>,
    {
        let (mut lower, mut upper) = self.temperature_bracket(v, x)?;
        let name = self.config.name.as_str();
        brent::bracket(&residual, &mut lower, &mut upper).map_err(|e| e.in_context(name, op))?;
        brent::root(&residual, lower, upper).map_err(|e| e.in_context(name, op))
    }

    fn p_derivs(&self, t: Real, v: Real, x: &MassFractions<'_>) -> MixtureResult<MixDerivs> {
        convert::partial_pressure_from_t_v(self.components(), x, t, v, |fp, t, v| {
            fp.p_from_t_v_derivs(t, v)
        })
    }

    fn e_derivs(&self, t: Real, v: Real, x: &MassFractions<'_>) -> MixtureResult<MixDerivs> {
        convert::mass_specific_from_t_v(self.components(), x, t, v, |fp, t, v| {
            fp.e_from_t_v_derivs(t, v)
        })
    }

    fn s_derivs(&self, t: Real, v: Real, x: &MassFractions<'_>) -> MixtureResult<MixDerivs> {
        convert::mass_specific_from_t_v(self.components(), x, t, v, |fp, t, v| {
            fp.s_from_t_v_derivs(t, v)
        })
    }

    fn c_value(&self, t: Real, v: Real, x: &MassFractions<'_>) -> MixtureResult<Real> {
        let p = self.p_derivs(t, v, x)?;
        let s = self.s_derivs(t, v, x)?;
        let dp_dv_s = p.d2 - p.d1 * s.d2 / s.d1;
        if dp_dv_s >= 0.0 {
            tracing::warn!(
                mixture = %self.config.name,
                t,
                v,
                dp_dv_s,
                "c_from_t_v(): dp_dv_s should be negative"
            );
        }
        Ok(v * (-dp_dv_s).sqrt())
    }

    /// cp of every component at the mixture's (∂p/∂T)_v and (∂p/∂v)_T, primary first.
    fn component_cp(
        &self,
        t: Real,
        v: Real,
        x: &MassFractions<'_>,
    ) -> MixtureResult<(Real, Vec<Real>)> {
        let p = self.p_derivs(t, v, x)?;
        let cp = |fp: &dyn SinglePhaseFluid, v_j: Real| -> MixtureResult<Real> {
            let h = fp.h_from_t_v_derivs(t, v_j)?;
            Ok(h.d1 - h.d2 * p.d1 / p.d2)
        };
        let cp_primary = cp(self.primary, v / x.primary())?;
        let cp_secondary = self
            .secondary
            .iter()
            .zip(x.secondary())
            .map(|(fp, &x_i)| cp(*fp, v / x_i))
            .collect::<MixtureResult<Vec<_>>>()?;
        Ok((cp_primary, cp_secondary))
    }

    fn component_cv(
        &self,
        t: Real,
        v: Real,
        x: &MassFractions<'_>,
    ) -> MixtureResult<(Real, Vec<Real>)> {
        let cv_primary = self.primary.cv_from_t_v(t, v / x.primary())?;
        let cv_secondary = self
            .secondary
            .iter()
            .zip(x.secondary())
            .map(|(fp, &x_i)| fp.cv_from_t_v(t, v / x_i))
            .collect::<Result<Vec<_>, _>>()?;
        Ok((cv_primary, cv_secondary))
    }

    fn viscosity(
        &self,
        t: Real,
        v: Real,
        x: &MassFractions<'_>,
    ) -> MixtureResult<(Real, Vec<Real>)> {
        convert::transport_from_t_v(self.components(), x, t, v, |fp, t, v| fp.mu_from_t_v(t, v))
    }

    fn conductivity(
        &self,
        t: Real,
        v: Real,
        x: &MassFractions<'_>,
    ) -> MixtureResult<(Real, Vec<Real>)> {
        convert::transport_from_t_v(self.components(), x, t, v, |fp, t, v| fp.k_from_t_v(t, v))
    }

    /// Mass-weighted sum of per-component values; its composition derivatives
    /// are `yᵢ − y_primary`.
    fn weighted_with_dx(
        x: &MassFractions<'_>,
        (y_primary, y_secondary): (Real, Vec<Real>),
    ) -> (Real, Vec<Real>) {
        let value = x.primary() * y_primary
            + y_secondary
                .iter()
                .zip(x.secondary())
                .map(|(y_i, x_i)| x_i * y_i)
                .sum::<Real>();
        let dx = y_secondary.iter().map(|y_i| y_i - y_primary).collect();
        (value, dx)
    }

    /// Attach forward-difference (T,v) derivatives of `f` to a known value.
    fn with_t_v_differences<F>(
        t: Real,
        v: Real,
        (value, dx): (Real, Vec<Real>),
        f: F,
    ) -> MixtureResult<MixDerivs>
    where
        F: Fn(Real, Real) -> MixtureResult<Real>,
    {
        let dy_dt = forward_difference(|t| f(t, v), t, value, FD_REL_STEP)?;
        let dy_dv = forward_difference(|v| f(t, v), v, value, FD_REL_STEP)?;
        Ok(MixDerivs::new(value, dy_dt, dy_dv, dx))
    }

    /// Specific volume the secondaries occupy together at partial pressure
    /// `pp`, or `None` when the Newton balance does not converge.
    fn secondary_volume(
        &self,
        pp: Real,
        t: Real,
        x: &MassFractions<'_>,
    ) -> MixtureResult<Option<Real>> {
        let x_secondary_total = 1.0 - x.primary();
        let x_sec: Vec<Real> = x.secondary().iter().map(|x_i| x_i / x_secondary_total).collect();
        let m_star = apparent_molar_mass(
            self.secondary
                .iter()
                .zip(&x_sec)
                .map(|(fp, &x_i)| (x_i, fp.molar_mass())),
        );
        let v_ideal = R_MOLAR * t / (m_star * pp);

        let balance = |v: Real| -> MixtureResult<(Real, Real)> {
            let mut p = 0.0;
            let mut dp_dv = 0.0;
            for (fp, &x_i) in self.secondary.iter().zip(&x_sec) {
                let p_i = fp.p_from_t_v_derivs(t, v / x_i)?;
                p += p_i.value;
                dp_dv += p_i.d2 / x_i;
            }
            Ok((p, dp_dv))
        };

        match newton::newton_solve(pp, v_ideal, balance, &XS_NEWTON) {
            Ok(result) => Ok(Some(result.x)),
            Err(MixtureError::Numeric(SolverError::Convergence { what })) => {
                tracing::debug!(
                    mixture = %self.config.name,
                    %what,
                    "secondary partial-pressure balance failed"
                );
                Ok(None)
            }
            Err(err) => Err(err.in_context(&self.config.name, "xs_prim_from_p_t")),
        }
    }
}

impl VaporMixtureFluid for IdealRealGasMixture<'_> {
    fn mixture_name(&self) -> &str {
        &self.config.name
    }

    fn number_of_secondary_vapors(&self) -> usize {
        self.secondary.len()
    }

    fn p_from_t_v(&self, t: Real, v: Real, x: &[Real]) -> MixtureResult<Real> {
        let x = self.fractions(x)?;
        let mut p = self.primary.p_from_t_v(t, v / x.primary())?;
        for (fp, &x_i) in self.secondary.iter().zip(x.secondary()) {
            p += fp.p_from_t_v(t, v / x_i)?;
        }
        Ok(p)
    }

    fn p_from_t_v_derivs(&self, t: Real, v: Real, x: &[Real]) -> MixtureResult<MixDerivs> {
        let x = self.fractions(x)?;
        self.note_imperfect_jacobian("p_from_t_v");
        self.p_derivs(t, v, &x)
    }

    fn e_from_t_v(&self, t: Real, v: Real, x: &[Real]) -> MixtureResult<Real> {
        let x = self.fractions(x)?;
        let mut e = x.primary() * self.primary.e_from_t_v(t, v / x.primary())?;
        for (fp, &x_i) in self.secondary.iter().zip(x.secondary()) {
            e += x_i * fp.e_from_t_v(t, v / x_i)?;
        }
        Ok(e)
    }

    fn e_from_t_v_derivs(&self, t: Real, v: Real, x: &[Real]) -> MixtureResult<MixDerivs> {
        let x = self.fractions(x)?;
        self.note_imperfect_jacobian("e_from_t_v");
        self.e_derivs(t, v, &x)
    }

    fn s_from_t_v(&self, t: Real, v: Real, x: &[Real]) -> MixtureResult<Real> {
        let x = self.fractions(x)?;
        let mut s = x.primary() * self.primary.s_from_t_v(t, v / x.primary())?;
        for (fp, &x_i) in self.secondary.iter().zip(x.secondary()) {
            s += x_i * fp.s_from_t_v(t, v / x_i)?;
        }
        Ok(s)
    }

    fn s_from_t_v_derivs(&self, t: Real, v: Real, x: &[Real]) -> MixtureResult<MixDerivs> {
        let x = self.fractions(x)?;
        self.note_imperfect_jacobian("s_from_t_v");
        self.s_derivs(t, v, &x)
    }

    fn c_from_t_v(&self, t: Real, v: Real, x: &[Real]) -> MixtureResult<Real> {
        let x = self.fractions(x)?;
        self.c_value(t, v, &x)
    }

    fn c_from_t_v_derivs(&self, t: Real, v: Real, x: &[Real]) -> MixtureResult<MixDerivs> {
        let fractions = self.fractions(x)?;
        let c = self.c_value(t, v, &fractions)?;

        let dx = (0..fractions.len())
            .map(|i| -> MixtureResult<Real> {
                let perturbed = fractions.perturbed(i, DX_STEP);
                let c_perturbed = self.c_value(t, v, &self.fractions(&perturbed)?)?;
                Ok((c_perturbed - c) / DX_STEP)
            })
            .collect::<MixtureResult<Vec<_>>>()?;

        Self::with_t_v_differences(t, v, (c, dx), |t, v| self.c_value(t, v, &fractions))
    }

    fn cp_from_t_v(&self, t: Real, v: Real, x: &[Real]) -> MixtureResult<Real> {
        let x = self.fractions(x)?;
        Ok(Self::weighted_with_dx(&x, self.component_cp(t, v, &x)?).0)
    }

    fn cp_from_t_v_derivs(&self, t: Real, v: Real, x: &[Real]) -> MixtureResult<MixDerivs> {
        let x = self.fractions(x)?;
        let cp = Self::weighted_with_dx(&x, self.component_cp(t, v, &x)?);
        Self::with_t_v_differences(t, v, cp, |t, v| {
            Ok(Self::weighted_with_dx(&x, self.component_cp(t, v, &x)?).0)
        })
    }

    fn cv_from_t_v(&self, t: Real, v: Real, x: &[Real]) -> MixtureResult<Real> {
        let x = self.fractions(x)?;
        Ok(Self::weighted_with_dx(&x, self.component_cv(t, v, &x)?).0)
    }

    fn cv_from_t_v_derivs(&self, t: Real, v: Real, x: &[Real]) -> MixtureResult<MixDerivs> {
        let x = self.fractions(x)?;
        let cv = Self::weighted_with_dx(&x, self.component_cv(t, v, &x)?);
        Self::with_t_v_differences(t, v, cv, |t, v| {
            Ok(Self::weighted_with_dx(&x, self.component_cv(t, v, &x)?).0)
        })
    }

    fn mu_from_t_v(&self, t: Real, v: Real, x: &[Real]) -> MixtureResult<Real> {
        let x = self.fractions(x)?;
        Ok(self.viscosity(t, v, &x)?.0)
    }

    fn mu_from_t_v_derivs(&self, t: Real, v: Real, x: &[Real]) -> MixtureResult<MixDerivs> {
        let x = self.fractions(x)?;
        Self::with_t_v_differences(t, v, self.viscosity(t, v, &x)?, |t, v| {
            Ok(self.viscosity(t, v, &x)?.0)
        })
    }

    fn k_from_t_v(&self, t: Real, v: Real, x: &[Real]) -> MixtureResult<Real> {
        let x = self.fractions(x)?;
        Ok(self.conductivity(t, v, &x)?.0)
    }

    fn k_from_t_v_derivs(&self, t: Real, v: Real, x: &[Real]) -> MixtureResult<MixDerivs> {
        let x = self.fractions(x)?;
        Self::with_t_v_differences(t, v, self.conductivity(t, v, &x)?, |t, v| {
            Ok(self.conductivity(t, v, &x)?.0)
        })
    }

    fn t_from_v_e(&self, v: Real, e: Real, x: &[Real]) -> MixtureResult<Real> {
        let fractions = self.fractions(x)?;
        self.solve_temperature(v, &fractions, "t_from_v_e", |t| Ok(self.e_from_t_v(t, v, x)? - e))
    }

    fn t_from_v_e_derivs(&self, v: Real, e: Real, x: &[Real]) -> MixtureResult<MixDerivs> {
        let t = self.t_from_v_e(v, e, x)?;
        let e = self.e_from_t_v_derivs(t, v, x)?;
        Ok(MixDerivs::new(
            t,
            -e.d2 / e.d1,
            1.0 / e.d1,
            e.dx.iter().map(|de_dx| -de_dx / e.d1).collect(),
        ))
    }

    fn t_from_p_v(&self, p: Real, v: Real, x: &[Real]) -> MixtureResult<Real> {
        let fractions = self.fractions(x)?;
        self.solve_temperature(v, &fractions, "t_from_p_v", |t| Ok(self.p_from_t_v(t, v, x)? - p))
    }

    fn t_from_p_v_derivs(&self, p: Real, v: Real, x: &[Real]) -> MixtureResult<MixDerivs> {
        let t = self.t_from_p_v(p, v, x)?;
        let p = self.p_from_t_v_derivs(t, v, x)?;
        Ok(MixDerivs::new(
            t,
            1.0 / p.d1,
            -p.d2 / p.d1,
            p.dx.iter().map(|dp_dx| -dp_dx / p.d1).collect(),
        ))
    }

    fn v_from_p_t(&self, p: Real, t: Real, x: &[Real]) -> MixtureResult<Real> {
        let fractions = self.fractions(x)?;
        let v_ideal = R_MOLAR * t / (self.apparent_molar_mass(&fractions) * p);

        let v_spndl = if t < self.primary.critical_temperature()? {
            self.primary.v_e_spndl_from_t(t)?.0
        } else {
            1.0 / self.primary.critical_density()?
        };

        let mut lower = v_spndl * fractions.primary();
        let mut upper = v_ideal;
        if p > self.p_from_t_v(t, lower, x)? || upper < lower {
            tracing::debug!(
                mixture = %self.config.name,
                p,
                t,
                "no mixture state reaches the requested pressure"
            );
            return Ok(Real::NAN);
        }

        let name = self.config.name.as_str();
        let residual = |v: Real| -> MixtureResult<Real> { Ok(self.p_from_t_v(t, v, x)? - p) };
        brent::bracket(&residual, &mut lower, &mut upper)
            .map_err(|e| e.in_context(name, "v_from_p_t"))?;
        brent::root(&residual, lower, upper).map_err(|e| e.in_context(name, "v_from_p_t"))
    }

    fn v_from_p_t_derivs(&self, p: Real, t: Real, x: &[Real]) -> MixtureResult<MixDerivs> {
        let v = self.v_from_p_t(p, t, x)?;
        if v.is_nan() {
            return Ok(MixDerivs::nan(self.secondary.len()));
        }
        let p = self.p_from_t_v_derivs(t, v, x)?;
        Ok(MixDerivs::new(
            v,
            1.0 / p.d2,
            -p.d1 / p.d2,
            p.dx.iter().map(|dp_dx| -dp_dx / p.d2).collect(),
        ))
    }

    fn xs_prim_from_p_t(&self, p: Real, t: Real, x: &[Real]) -> MixtureResult<Real> {
        let fractions = self.fractions(x)?;
        if t > self.primary.critical_temperature()? {
            return Ok(1.0);
        }
        let Some(pp_sat) = self.primary.pp_sat_from_p_t(p, t)? else {
            return Ok(1.0);
        };

        let v_primary = self.primary.v_from_p_t(pp_sat, t)?;
        let pp_secondary = p - pp_sat;
        let v_secondary = match self.secondary.as_slice() {
            [only] => only.v_from_p_t(pp_secondary, t)?,
            _ => match self.secondary_volume(pp_secondary, t, &fractions)? {
                Some(v) => v,
                None => return Ok(Real::NAN),
            },
        };

        Ok(v_secondary / (v_primary + v_secondary))
    }
}
