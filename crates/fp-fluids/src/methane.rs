//! Methane.
//!
//! Twelve-term technical equation of state of Span & Wagner (2003) with the
//! ideal part and ancillaries of Setzmann & Wagner (1991). Transport
//! properties are the dilute-gas polynomials of Irvine & Liley (1984).

use crate::error::{FluidError, FluidResult};
use crate::fluid::PropDerivs;
use crate::helmholtz::{
    ExpTerm, HelmholtzEos, HelmholtzFluid, IdealPart, PowerTerm, ResidualPart, ancillary_sum,
};
use fp_core::Real;

const NAME: &str = "methane";
const MOLAR_MASS: Real = 16.0425e-3;
const CRITICAL_PRESSURE: Real = 4.5992e6;
const CRITICAL_TEMPERATURE: Real = 190.564;
const CRITICAL_DENSITY: Real = 162.66;
const TRIPLE_POINT_PRESSURE: Real = 11.696e3;
const TRIPLE_POINT_TEMPERATURE: Real = 90.6941;

const TRANSPORT_T_MIN: Real = 200.0;
const TRANSPORT_T_MAX: Real = 1000.0;

static IDEAL: IdealPart = IdealPart {
    constant: 9.91243972,
    ln_tau: 3.0016,
    power: &[(-6.33270087, 1.0)],
    planck: &[
        (0.008449, 3.4004324),
        (4.6942, 10.26951575),
        (3.4865, 20.43932747),
        (1.6572, 29.93744884),
        (1.4115, 79.13351945),
    ],
};

static RESIDUAL: ResidualPart = ResidualPart {
    power: &[
        PowerTerm::new(0.89269676, 1, 0.25),
        PowerTerm::new(-2.5438282, 1, 1.125),
        PowerTerm::new(0.64980978, 1, 1.5),
        PowerTerm::new(0.020793471, 2, 1.375),
        PowerTerm::new(0.070189104, 3, 0.25),
        PowerTerm::new(2.3700378e-4, 7, 0.875),
    ],
    exponential: &[
        ExpTerm::new(0.16653334, 2, 0.625, 1),
        ExpTerm::new(-0.043855669, 5, 1.75, 1),
        ExpTerm::new(-0.1572678, 1, 3.625, 2),
        ExpTerm::new(-0.035311675, 4, 3.625, 2),
        ExpTerm::new(-0.029570024, 3, 14.5, 3),
        ExpTerm::new(0.014019842, 4, 12.0, 3),
    ],
    gaussian: &[],
    non_analytic: &[],
};

const PSAT: [(Real, Real); 4] = [
    (-6.036219, 1.0),
    (1.409353, 1.5),
    (-0.4945199, 2.0),
    (-1.443048, 4.5),
];
const RHO_LIQUID: [(Real, Real); 3] = [
    (1.9906389, 0.354),
    (-0.78756197, 0.5),
    (0.036976723, 2.5),
];
const RHO_VAPOR: [(Real, Real); 6] = [
    (-1.880284, 0.354),
    (-2.8526531, 5.0 / 6.0),
    (-3.000648, 1.5),
    (-5.251169, 2.5),
    (-13.191859, 25.0 / 6.0),
    (-37.553961, 47.0 / 6.0),
];

/// μ [μPa·s] as a polynomial in T [K]
const MU: [Real; 6] = [
    0.2968267,
    0.03711201,
    1.218298e-5,
    -7.02426e-8,
    7.543269e-11,
    -2.7237166e-14,
];
/// k [W/(m·K)] as a polynomial in T [K]
const K: [Real; 7] = [
    -0.013401499,
    3.663076e-4,
    -1.82248608e-6,
    5.93987998e-9,
    -9.1405505e-12,
    6.7896889e-15,
    -1.95048736e-18,
];

/// Methane equation of state.
#[derive(Clone, Copy, Debug, Default)]
pub struct Methane;

/// Methane as a [`SinglePhaseFluid`](crate::SinglePhaseFluid).
pub type MethaneFluid = HelmholtzFluid<Methane>;

impl Methane {
    fn check_saturation_range(&self, t: Real, op: &'static str) -> FluidResult<()> {
        if !(TRIPLE_POINT_TEMPERATURE..=CRITICAL_TEMPERATURE).contains(&t) {
            return Err(FluidError::domain(NAME, op, "Temperature is out of range"));
        }
        Ok(())
    }

    fn check_transport_range(&self, t: Real, op: &'static str) -> FluidResult<()> {
        if !(TRANSPORT_T_MIN..=TRANSPORT_T_MAX).contains(&t) {
            return Err(FluidError::domain(NAME, op, "Temperature is out of range"));
        }
        Ok(())
    }
}

impl HelmholtzEos for Methane {
    fn name(&self) -> &'static str {
        NAME
    }

    fn molar_mass(&self) -> Real {
        MOLAR_MASS
    }

    fn critical_pressure(&self) -> Real {
        CRITICAL_PRESSURE
    }

    fn critical_temperature(&self) -> Real {
        CRITICAL_TEMPERATURE
    }

    fn critical_density(&self) -> Real {
        CRITICAL_DENSITY
    }

    fn triple_point_pressure(&self) -> Real {
        TRIPLE_POINT_PRESSURE
    }

    fn triple_point_temperature(&self) -> Real {
        TRIPLE_POINT_TEMPERATURE
    }

    fn ideal(&self) -> &IdealPart {
        &IDEAL
    }

    fn residual(&self) -> &ResidualPart {
        &RESIDUAL
    }

    /// Density-independent; ∂μ/∂ρ is zero.
    fn viscosity(&self, _rho: Real, t: Real) -> FluidResult<PropDerivs> {
        self.check_transport_range(t, "mu_from_rho_t")?;
        let mu = MU.iter().rev().fold(0.0, |acc, a| acc * t + a);
        let dmu_dt = MU
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, a)| i as Real * a * t.powi(i as i32 - 1))
            .sum::<Real>();
        Ok(PropDerivs::new(mu * 1e-6, 0.0, dmu_dt * 1e-6))
    }

    fn conductivity(&self, _rho: Real, t: Real) -> FluidResult<Real> {
        self.check_transport_range(t, "k_from_rho_t")?;
        Ok(K.iter().rev().fold(0.0, |acc, b| acc * t + b))
    }

    fn vapor_pressure(&self, t: Real) -> FluidResult<Real> {
        Ok(self.vapor_pressure_derivs(t)?.0)
    }

    fn vapor_pressure_derivs(&self, t: Real) -> FluidResult<(Real, Real)> {
        self.check_saturation_range(t, "vapor_pressure")?;
        let theta = 1.0 - t / CRITICAL_TEMPERATURE;
        let (sum, dsum) = ancillary_sum(&PSAT, theta);
        let p = CRITICAL_PRESSURE * (CRITICAL_TEMPERATURE / t * sum).exp();
        let dln_p = -CRITICAL_TEMPERATURE / (t * t) * sum - dsum / t;
        Ok((p, p * dln_p))
    }

    fn saturated_liquid_density(&self, t: Real) -> FluidResult<Real> {
        self.check_saturation_range(t, "saturated_liquid_density")?;
        let theta = 1.0 - t / CRITICAL_TEMPERATURE;
        Ok(CRITICAL_DENSITY * ancillary_sum(&RHO_LIQUID, theta).0.exp())
    }

    fn saturated_vapor_density(&self, t: Real) -> FluidResult<Real> {
        self.check_saturation_range(t, "saturated_vapor_density")?;
        let theta = 1.0 - t / CRITICAL_TEMPERATURE;
        Ok(CRITICAL_DENSITY * ancillary_sum(&RHO_VAPOR, theta).0.exp())
    }

    fn melting_pressure(&self, t: Real) -> FluidResult<Real> {
        if t < TRIPLE_POINT_TEMPERATURE {
            return Err(FluidError::domain(
                NAME,
                "melting_pressure",
                "Temperature is below the triple point temperature",
            ));
        }
        let x = t / TRIPLE_POINT_TEMPERATURE - 1.0;
        Ok(TRIPLE_POINT_PRESSURE * (1.0 + 0.247e5 * x - 0.7339e4 * x.powf(1.85)))
    }

    fn henry_coefficients(&self) -> FluidResult<[Real; 3]> {
        Ok([-10.44708, 4.66491, 12.12986])
    }
}
