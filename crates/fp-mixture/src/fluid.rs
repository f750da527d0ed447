//! The vapor mixture contract.
//!
//! Mixtures are native in (T,v). Implementations supply the (T,v) properties
//! and the three inversions T(v,e), T(p,v) and v(p,T); the (v,e), (p,T) and
//! (p,ρ) forms are provided on top of them through [`crate::convert`].

use crate::convert;
use crate::error::MixtureResult;
use fp_core::Real;

/// A mixture property with its derivatives.
///
/// `d1` and `d2` follow the argument order of the call that produced it;
/// `dx[i]` is the derivative with respect to the mass fraction of secondary
/// vapor `i`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MixDerivs {
    pub value: Real,
    pub d1: Real,
    pub d2: Real,
    pub dx: Vec<Real>,
}

impl MixDerivs {
    pub fn new(value: Real, d1: Real, d2: Real, dx: Vec<Real>) -> Self {
        Self { value, d1, d2, dx }
    }

    /// All-NaN result for a mixture with `n_secondary` secondary vapors.
    pub fn nan(n_secondary: usize) -> Self {
        Self::new(Real::NAN, Real::NAN, Real::NAN, vec![Real::NAN; n_secondary])
    }

    pub fn is_nan(&self) -> bool {
        self.value.is_nan()
    }
}

/// Evaluate `f` at `v(p,T)`, passing the NaN sentinel straight through.
fn at_p_t<M, F>(mixture: &M, p: Real, t: Real, x: &[Real], f: F) -> MixtureResult<Real>
where
    M: VaporMixtureFluid + ?Sized,
    F: FnOnce(Real) -> MixtureResult<Real>,
{
    let v = mixture.v_from_p_t(p, t, x)?;
    if v.is_nan() {
        return Ok(Real::NAN);
    }
    f(v)
}

fn at_p_t_derivs<M, F>(mixture: &M, p: Real, t: Real, x: &[Real], f: F) -> MixtureResult<MixDerivs>
where
    M: VaporMixtureFluid + ?Sized,
    F: FnOnce(Real) -> MixtureResult<MixDerivs>,
{
    let v = mixture.v_from_p_t_derivs(p, t, x)?;
    if v.is_nan() {
        return Ok(MixDerivs::nan(mixture.number_of_secondary_vapors()));
    }
    Ok(convert::from_p_t_using_t_v(f(v.value)?, &v))
}

/// Contract implemented by every vapor mixture.
///
/// `x` always holds the secondary mass fractions; units are SI as in
/// [`fp_fluids::SinglePhaseFluid`]. Inversions that have no physical solution
/// return `Ok(NaN)` where noted instead of an error.
pub trait VaporMixtureFluid: Send + Sync {
    fn mixture_name(&self) -> &str;

    fn number_of_secondary_vapors(&self) -> usize;

    fn primary_mass_fraction(&self, x: &[Real]) -> Real {
        crate::composition::primary_mass_fraction(x)
    }

    // ----------------------------------------------------------------------
    // (T, v)
    // ----------------------------------------------------------------------

    fn p_from_t_v(&self, t: Real, v: Real, x: &[Real]) -> MixtureResult<Real>;
    fn p_from_t_v_derivs(&self, t: Real, v: Real, x: &[Real]) -> MixtureResult<MixDerivs>;

    fn e_from_t_v(&self, t: Real, v: Real, x: &[Real]) -> MixtureResult<Real>;
    fn e_from_t_v_derivs(&self, t: Real, v: Real, x: &[Real]) -> MixtureResult<MixDerivs>;

    fn s_from_t_v(&self, t: Real, v: Real, x: &[Real]) -> MixtureResult<Real>;
    fn s_from_t_v_derivs(&self, t: Real, v: Real, x: &[Real]) -> MixtureResult<MixDerivs>;

    fn c_from_t_v(&self, t: Real, v: Real, x: &[Real]) -> MixtureResult<Real>;
    fn c_from_t_v_derivs(&self, t: Real, v: Real, x: &[Real]) -> MixtureResult<MixDerivs>;

    fn cp_from_t_v(&self, t: Real, v: Real, x: &[Real]) -> MixtureResult<Real>;
    fn cp_from_t_v_derivs(&self, t: Real, v: Real, x: &[Real]) -> MixtureResult<MixDerivs>;

    fn cv_from_t_v(&self, t: Real, v: Real, x: &[Real]) -> MixtureResult<Real>;
    fn cv_from_t_v_derivs(&self, t: Real, v: Real, x: &[Real]) -> MixtureResult<MixDerivs>;

    fn mu_from_t_v(&self, t: Real, v: Real, x: &[Real]) -> MixtureResult<Real>;
    fn mu_from_t_v_derivs(&self, t: Real, v: Real, x: &[Real]) -> MixtureResult<MixDerivs>;

    fn k_from_t_v(&self, t: Real, v: Real, x: &[Real]) -> MixtureResult<Real>;
    fn k_from_t_v_derivs(&self, t: Real, v: Real, x: &[Real]) -> MixtureResult<MixDerivs>;

    // ----------------------------------------------------------------------
    // Inversions
    // ----------------------------------------------------------------------

    fn t_from_v_e(&self, v: Real, e: Real, x: &[Real]) -> MixtureResult<Real>;
    fn t_from_v_e_derivs(&self, v: Real, e: Real, x: &[Real]) -> MixtureResult<MixDerivs>;

    fn t_from_p_v(&self, p: Real, v: Real, x: &[Real]) -> MixtureResult<Real>;
    fn t_from_p_v_derivs(&self, p: Real, v: Real, x: &[Real]) -> MixtureResult<MixDerivs>;

    /// Specific volume at (p,T); NaN when no mixture state reaches `p`.
    fn v_from_p_t(&self, p: Real, t: Real, x: &[Real]) -> MixtureResult<Real>;
    fn v_from_p_t_derivs(&self, p: Real, t: Real, x: &[Real]) -> MixtureResult<MixDerivs>;

    /// Secondary-vapor mass fraction at which the primary vapor starts to
    /// condense at (p,T).
    ///
    /// 1 when the primary cannot condense; NaN when the secondary partial
    /// pressure balance does not converge.
    fn xs_prim_from_p_t(&self, p: Real, t: Real, x: &[Real]) -> MixtureResult<Real>;

    // ----------------------------------------------------------------------
    // (v, e)
    // ----------------------------------------------------------------------

    fn p_from_v_e(&self, v: Real, e: Real, x: &[Real]) -> MixtureResult<Real> {
        let t = self.t_from_v_e(v, e, x)?;
        self.p_from_t_v(t, v, x)
    }

    fn p_from_v_e_derivs(&self, v: Real, e: Real, x: &[Real]) -> MixtureResult<MixDerivs> {
        let t = self.t_from_v_e_derivs(v, e, x)?;
        Ok(convert::from_v_e_using_t_v(self.p_from_t_v_derivs(t.value, v, x)?, &t))
    }

    fn c_from_v_e(&self, v: Real, e: Real, x: &[Real]) -> MixtureResult<Real> {
        let t = self.t_from_v_e(v, e, x)?;
        self.c_from_t_v(t, v, x)
    }

    fn c_from_v_e_derivs(&self, v: Real, e: Real, x: &[Real]) -> MixtureResult<MixDerivs> {
        let t = self.t_from_v_e_derivs(v, e, x)?;
        Ok(convert::from_v_e_using_t_v(self.c_from_t_v_derivs(t.value, v, x)?, &t))
    }

    /// Pressure and temperature from (v,e) with a single inversion.
    fn p_t_from_v_e(&self, v: Real, e: Real, x: &[Real]) -> MixtureResult<(Real, Real)> {
        let t = self.t_from_v_e(v, e, x)?;
        Ok((self.p_from_t_v(t, v, x)?, t))
    }

    // ----------------------------------------------------------------------
    // (p, T)
    // ----------------------------------------------------------------------

    fn rho_from_p_t(&self, p: Real, t: Real, x: &[Real]) -> MixtureResult<Real> {
        Ok(1.0 / self.v_from_p_t(p, t, x)?)
    }

    fn rho_from_p_t_derivs(&self, p: Real, t: Real, x: &[Real]) -> MixtureResult<MixDerivs> {
        let v = self.v_from_p_t_derivs(p, t, x)?;
        let rho = 1.0 / v.value;
        let drho_dv = -rho * rho;
        Ok(MixDerivs::new(
            rho,
            drho_dv * v.d1,
            drho_dv * v.d2,
            v.dx.iter().map(|dv_dx| drho_dv * dv_dx).collect(),
        ))
    }

    fn e_from_p_t(&self, p: Real, t: Real, x: &[Real]) -> MixtureResult<Real> {
        at_p_t(self, p, t, x, |v| self.e_from_t_v(t, v, x))
    }

    fn e_from_p_t_derivs(&self, p: Real, t: Real, x: &[Real]) -> MixtureResult<MixDerivs> {
        at_p_t_derivs(self, p, t, x, |v| self.e_from_t_v_derivs(t, v, x))
    }

    fn s_from_p_t(&self, p: Real, t: Real, x: &[Real]) -> MixtureResult<Real> {
        at_p_t(self, p, t, x, |v| self.s_from_t_v(t, v, x))
    }

    fn s_from_p_t_derivs(&self, p: Real, t: Real, x: &[Real]) -> MixtureResult<MixDerivs> {
        at_p_t_derivs(self, p, t, x, |v| self.s_from_t_v_derivs(t, v, x))
    }

    fn c_from_p_t(&self, p: Real, t: Real, x: &[Real]) -> MixtureResult<Real> {
        at_p_t(self, p, t, x, |v| self.c_from_t_v(t, v, x))
    }

    fn c_from_p_t_derivs(&self, p: Real, t: Real, x: &[Real]) -> MixtureResult<MixDerivs> {
        at_p_t_derivs(self, p, t, x, |v| self.c_from_t_v_derivs(t, v, x))
    }

    fn cp_from_p_t(&self, p: Real, t: Real, x: &[Real]) -> MixtureResult<Real> {
        at_p_t(self, p, t, x, |v| self.cp_from_t_v(t, v, x))
    }

    fn cp_from_p_t_derivs(&self, p: Real, t: Real, x: &[Real]) -> MixtureResult<MixDerivs> {
        at_p_t_derivs(self, p, t, x, |v| self.cp_from_t_v_derivs(t, v, x))
    }

    fn cv_from_p_t(&self, p: Real, t: Real, x: &[Real]) -> MixtureResult<Real> {
        at_p_t(self, p, t, x, |v| self.cv_from_t_v(t, v, x))
    }

    fn cv_from_p_t_derivs(&self, p: Real, t: Real, x: &[Real]) -> MixtureResult<MixDerivs> {
        at_p_t_derivs(self, p, t, x, |v| self.cv_from_t_v_derivs(t, v, x))
    }

    fn mu_from_p_t(&self, p: Real, t: Real, x: &[Real]) -> MixtureResult<Real> {
        at_p_t(self, p, t, x, |v| self.mu_from_t_v(t, v, x))
    }

    fn mu_from_p_t_derivs(&self, p: Real, t: Real, x: &[Real]) -> MixtureResult<MixDerivs> {
        at_p_t_derivs(self, p, t, x, |v| self.mu_from_t_v_derivs(t, v, x))
    }

    fn k_from_p_t(&self, p: Real, t: Real, x: &[Real]) -> MixtureResult<Real> {
        at_p_t(self, p, t, x, |v| self.k_from_t_v(t, v, x))
    }

    fn k_from_p_t_derivs(&self, p: Real, t: Real, x: &[Real]) -> MixtureResult<MixDerivs> {
        at_p_t_derivs(self, p, t, x, |v| self.k_from_t_v_derivs(t, v, x))
    }

    // ----------------------------------------------------------------------
    // (p, ρ)
    // ----------------------------------------------------------------------

    fn e_from_p_rho(&self, p: Real, rho: Real, x: &[Real]) -> MixtureResult<Real> {
        let v = 1.0 / rho;
        let t = self.t_from_p_v(p, v, x)?;
        self.e_from_t_v(t, v, x)
    }

    fn e_from_p_rho_derivs(&self, p: Real, rho: Real, x: &[Real]) -> MixtureResult<MixDerivs> {
        let v = 1.0 / rho;
        let t = self.t_from_p_v(p, v, x)?;
        let p = self.p_from_t_v_derivs(t, v, x)?;
        let e = self.e_from_t_v_derivs(t, v, x)?;

        // T(p,v) from p(T,v), then e(p,v) = e(T(p,v), v)
        let de_dp = e.d1 / p.d1;
        let de_dv = e.d2 - e.d1 * p.d2 / p.d1;
        let dx = e
            .dx
            .iter()
            .zip(&p.dx)
            .map(|(de_dx, dp_dx)| de_dx - e.d1 * dp_dx / p.d1)
            .collect();
        Ok(MixDerivs::new(e.value, de_dp, -v * v * de_dv, dx))
    }
}
