//! Basis conversions and component sums.
//!
//! The chain-rule combinators turn (T,v) derivatives into (v,e) or (p,T)
//! derivatives. The sum combinators assemble a mixture property from one
//! per-component callback evaluated at the shared temperature, each
//! component occupying `v / xⱼ`.

use crate::composition::{MassFractions, apparent_molar_mass};
use crate::error::MixtureResult;
use crate::fluid::MixDerivs;
use fp_core::Real;
use fp_fluids::{FluidResult, PropDerivs, SinglePhaseFluid};

/// `y(v,e)` from `y(T,v)` and `T(v,e)`.
pub fn from_v_e_using_t_v(y: MixDerivs, t: &MixDerivs) -> MixDerivs {
    let dx = y
        .dx
        .iter()
        .zip(&t.dx)
        .map(|(dy_dx, dt_dx)| dy_dx + y.d1 * dt_dx)
        .collect();
    MixDerivs::new(y.value, y.d2 + y.d1 * t.d1, y.d1 * t.d2, dx)
}

/// `y(p,T)` from `y(T,v)` and `v(p,T)`.
pub fn from_p_t_using_t_v(y: MixDerivs, v: &MixDerivs) -> MixDerivs {
    let dx = y
        .dx
        .iter()
        .zip(&v.dx)
        .map(|(dy_dx, dv_dx)| dy_dx + y.d2 * dv_dx)
        .collect();
    MixDerivs::new(y.value, y.d2 * v.d1, y.d1 + y.d2 * v.d2, dx)
}

/// Primary first, then the secondaries in order.
pub type Components<'c> = (&'c dyn SinglePhaseFluid, &'c [&'c dyn SinglePhaseFluid]);

#[derive(Clone, Copy)]
enum Weighting {
    /// `y = Σ yⱼ(T, v/xⱼ)`
    Unit,
    /// `y = Σ xⱼ yⱼ(T, v/xⱼ)`
    MassFraction,
}

impl Weighting {
    fn weight(self, x: Real) -> Real {
        match self {
            Weighting::Unit => 1.0,
            Weighting::MassFraction => x,
        }
    }

    fn dweight(self) -> Real {
        match self {
            Weighting::Unit => 0.0,
            Weighting::MassFraction => 1.0,
        }
    }
}

fn component_sum<F>(
    (primary, secondary): Components<'_>,
    x: &MassFractions<'_>,
    t: Real,
    v: Real,
    weighting: Weighting,
    prop: F,
) -> MixtureResult<MixDerivs>
where
    F: Fn(&dyn SinglePhaseFluid, Real, Real) -> FluidResult<PropDerivs>,
{
    let x_p = x.primary();
    let w_p = weighting.weight(x_p);
    let y_p = prop(primary, t, v / x_p)?;

    let mut sum = MixDerivs::new(
        w_p * y_p.value,
        w_p * y_p.d1,
        w_p * y_p.d2 / x_p,
        Vec::with_capacity(x.len()),
    );
    // change of the primary term per unit change of x_p
    let dyp_dxp = weighting.dweight() * y_p.value - w_p * y_p.d2 * v / (x_p * x_p);

    for (i, (fluid, &x_i)) in secondary.iter().zip(x.secondary()).enumerate() {
        let w_i = weighting.weight(x_i);
        let y_i = prop(*fluid, t, v / x_i)?;
        sum.value += w_i * y_i.value;
        sum.d1 += w_i * y_i.d1;
        sum.d2 += w_i * y_i.d2 / x_i;

        // the other secondary fractions are held fixed
        let dyi_dxi = weighting.dweight() * y_i.value - w_i * y_i.d2 * v / (x_i * x_i);
        sum.dx.push(dyi_dxi + x.primary_sensitivity(i) * dyp_dxp);
    }

    Ok(sum)
}

/// Dalton sum of partial properties, `y = Σ yⱼ(T, v/xⱼ)`.
pub fn partial_pressure_from_t_v<F>(
    components: Components<'_>,
    x: &MassFractions<'_>,
    t: Real,
    v: Real,
    prop: F,
) -> MixtureResult<MixDerivs>
where
    F: Fn(&dyn SinglePhaseFluid, Real, Real) -> FluidResult<PropDerivs>,
{
    component_sum(components, x, t, v, Weighting::Unit, prop)
}

/// Mass-weighted sum of a specific property, `y = Σ xⱼ yⱼ(T, v/xⱼ)`.
pub fn mass_specific_from_t_v<F>(
    components: Components<'_>,
    x: &MassFractions<'_>,
    t: Real,
    v: Real,
    prop: F,
) -> MixtureResult<MixDerivs>
where
    F: Fn(&dyn SinglePhaseFluid, Real, Real) -> FluidResult<PropDerivs>,
{
    component_sum(components, x, t, v, Weighting::MassFraction, prop)
}

/// Mole-fraction weighted transport property,
/// `y = Σ xⱼ (M*/Mⱼ) yⱼ(T, v/xⱼ)` with the apparent molar mass `M*`.
///
/// Returns the value and its mass-fraction derivatives. The derivatives
/// account for the weights only; the component values are taken as fixed.
pub fn transport_from_t_v<F>(
    (primary, secondary): Components<'_>,
    x: &MassFractions<'_>,
    t: Real,
    v: Real,
    prop: F,
) -> MixtureResult<(Real, Vec<Real>)>
where
    F: Fn(&dyn SinglePhaseFluid, Real, Real) -> FluidResult<Real>,
{
    let x_p = x.primary();
    let m_p = primary.molar_mass();
    let m_star = apparent_molar_mass(
        std::iter::once((x_p, m_p)).chain(
            secondary
                .iter()
                .zip(x.secondary())
                .map(|(fluid, &x_i)| (x_i, fluid.molar_mass())),
        ),
    );

    let y_p = prop(primary, t, v / x_p)?;
    let mut weighted = x_p * y_p / m_p;
    let mut terms = Vec::with_capacity(x.len());
    for (fluid, &x_i) in secondary.iter().zip(x.secondary()) {
        let m_i = fluid.molar_mass();
        let y_i = prop(*fluid, t, v / x_i)?;
        weighted += x_i * y_i / m_i;
        terms.push((m_i, y_i));
    }
    let y = m_star * weighted;

    let dx = terms
        .into_iter()
        .map(|(m_i, y_i)| {
            let dm_star_dxi = -m_star * m_star * (1.0 / m_i - 1.0 / m_p);
            dm_star_dxi * weighted + m_star * (y_i / m_i - y_p / m_p)
        })
        .collect();
    Ok((y, dx))
}
