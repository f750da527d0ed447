//! Nitrogen.
//!
//! Equation of state and ancillaries from Span et al. (2000); viscosity and
//! thermal conductivity from Lemmon & Jacobsen (2004) without the critical
//! enhancement of conductivity.

use crate::error::{FluidError, FluidResult};
use crate::fluid::PropDerivs;
use crate::helmholtz::{
    ExpTerm, GaussianTerm, HelmholtzEos, HelmholtzFluid, IdealPart, PowerTerm, ResidualPart,
    ancillary_sum,
};
use fp_core::Real;

const NAME: &str = "nitrogen";
const MOLAR_MASS: Real = 28.01348e-3;
const CRITICAL_PRESSURE: Real = 3.3958e6;
const CRITICAL_TEMPERATURE: Real = 126.192;
const CRITICAL_DENSITY: Real = 313.3;
const TRIPLE_POINT_PRESSURE: Real = 12.523e3;
const TRIPLE_POINT_TEMPERATURE: Real = 63.151;

static IDEAL: IdealPart = IdealPart {
    constant: -12.76952708,
    ln_tau: 2.5,
    power: &[
        (-0.00784163, 1.0),
        (-1.934819e-4, -1.0),
        (-1.247742e-5, -2.0),
        (6.678326e-8, -3.0),
    ],
    planck: &[(1.012941, 26.65788)],
};

static RESIDUAL: ResidualPart = ResidualPart {
    power: &[
        PowerTerm::new(0.924803575275, 1, 0.25),
        PowerTerm::new(-0.492448489428, 1, 0.875),
        PowerTerm::new(0.661883336938, 2, 0.5),
        PowerTerm::new(-0.192902649201e1, 2, 0.875),
        PowerTerm::new(-0.622469309629e-1, 3, 0.375),
        PowerTerm::new(0.349943957581, 3, 0.75),
    ],
    exponential: &[
        ExpTerm::new(0.564857472498, 1, 0.5, 1),
        ExpTerm::new(-0.161720005987e1, 1, 0.75, 1),
        ExpTerm::new(-0.481395031883, 1, 2.0, 1),
        ExpTerm::new(0.421150636384, 3, 1.25, 1),
        ExpTerm::new(-0.161962230825e-1, 3, 3.5, 1),
        ExpTerm::new(0.172100994165, 4, 1.0, 1),
        ExpTerm::new(0.735448924933e-2, 6, 0.5, 1),
        ExpTerm::new(0.168077305479e-1, 6, 3.0, 1),
        ExpTerm::new(-0.107626664179e-2, 7, 0.0, 1),
        ExpTerm::new(-0.137318088513e-1, 7, 2.75, 1),
        ExpTerm::new(0.635466899859e-3, 8, 0.75, 1),
        ExpTerm::new(0.304432279419e-2, 8, 2.5, 1),
        ExpTerm::new(-0.435762336045e-1, 1, 4.0, 2),
        ExpTerm::new(-0.723174889316e-1, 2, 6.0, 2),
        ExpTerm::new(0.389644315272e-1, 3, 6.0, 2),
        ExpTerm::new(-0.212201363910e-1, 4, 3.0, 2),
        ExpTerm::new(0.408822981509e-2, 5, 3.0, 2),
        ExpTerm::new(-0.551990017984e-4, 8, 6.0, 2),
        ExpTerm::new(-0.462016716479e-1, 4, 16.0, 3),
        ExpTerm::new(-0.300311716011e-2, 5, 11.0, 3),
        ExpTerm::new(0.368825891208e-1, 5, 15.0, 3),
        ExpTerm::new(-0.255856846220e-2, 8, 12.0, 3),
        ExpTerm::new(0.896915264558e-2, 3, 12.0, 4),
        ExpTerm::new(-0.441513370350e-2, 5, 7.0, 4),
        ExpTerm::new(0.133722924858e-2, 6, 4.0, 4),
        ExpTerm::new(0.264832491957e-3, 9, 16.0, 4),
    ],
    gaussian: &[
        GaussianTerm::new(0.196688194015e2, 1, 0.0, 20.0, 325.0, 1.16, 1.0),
        GaussianTerm::new(-0.209115600730e2, 1, 1.0, 20.0, 325.0, 1.16, 1.0),
        GaussianTerm::new(0.167788306989e-1, 3, 2.0, 15.0, 300.0, 1.13, 1.0),
        GaussianTerm::new(0.262767566274e4, 2, 3.0, 25.0, 275.0, 1.25, 1.0),
    ],
    non_analytic: &[],
};

// Span et al. (2000) ancillaries: (n, exponent of θ = 1 − T/Tc)
const PSAT: [(Real, Real); 4] = [
    (-6.12445284, 1.0),
    (1.26327220, 1.5),
    (-0.765910082, 2.5),
    (-1.77570564, 5.0),
];
const RHO_LIQUID: [(Real, Real); 4] = [
    (1.48654237, 0.3294),
    (-0.280476066, 2.0 / 3.0),
    (0.0894143085, 8.0 / 3.0),
    (-0.119879866, 35.0 / 6.0),
];
const RHO_VAPOR: [(Real, Real); 5] = [
    (-1.70127164, 0.34),
    (-3.70402649, 5.0 / 6.0),
    (1.29859383, 7.0 / 6.0),
    (-0.561424977, 13.0 / 6.0),
    (-2.68505381, 14.0 / 3.0),
];

// Lemmon & Jacobsen (2004)
const MU_SIGMA: Real = 0.3656;
const MU_EPSILON_K: Real = 98.94;
const MU_OMEGA: [Real; 5] = [0.431, -0.4623, 0.08406, 0.005341, -0.00331];
/// Residual terms (N, t, d, l); γ = 0 when l = 0 and 1 otherwise
const MU_RESIDUAL: [(Real, Real, i32, i32); 5] = [
    (10.72, 0.1, 2, 0),
    (0.03989, 0.25, 10, 1),
    (0.001208, 3.2, 12, 1),
    (-7.402, 0.9, 2, 2),
    (4.62, 0.3, 1, 3),
];
const K_DILUTE: [Real; 5] = [1.511, 2.117, -1.0, -3.332, -0.7];
const K_RESIDUAL: [(Real, Real, i32, i32); 6] = [
    (8.862, 0.0, 1, 0),
    (31.11, 0.03, 2, 0),
    (-73.13, 0.2, 3, 1),
    (20.03, 0.8, 4, 2),
    (-0.7096, 0.6, 8, 2),
    (0.2672, 1.9, 10, 2),
];

/// Nitrogen equation of state.
#[derive(Clone, Copy, Debug, Default)]
pub struct Nitrogen;

/// Nitrogen as a [`SinglePhaseFluid`](crate::SinglePhaseFluid).
pub type NitrogenFluid = HelmholtzFluid<Nitrogen>;

/// Σ N τ^t δ^d exp(−γ δ^l) with its δ and τ derivatives.
fn density_series(terms: &[(Real, Real, i32, i32)], delta: Real, tau: Real) -> (Real, Real, Real) {
    terms
        .iter()
        .fold((0.0, 0.0, 0.0), |(sum, d_delta, d_tau), &(n, t, d, l)| {
            let gamma = if l == 0 { 0.0 } else { 1.0 };
            let dl = delta.powi(l);
            let term = n * tau.powf(t) * delta.powi(d) * (-gamma * dl).exp();
            (
                sum + term,
                d_delta + term * (Real::from(d) - gamma * Real::from(l) * dl) / delta,
                d_tau + term * t / tau,
            )
        })
}

impl Nitrogen {
    fn check_saturation_range(&self, t: Real, op: &'static str) -> FluidResult<()> {
        if !(TRIPLE_POINT_TEMPERATURE..=CRITICAL_TEMPERATURE).contains(&t) {
            return Err(FluidError::domain(NAME, op, "Temperature is out of range"));
        }
        Ok(())
    }

    /// Dilute-gas viscosity [μPa·s] and its temperature derivative.
    fn dilute_viscosity(&self, t: Real) -> (Real, Real) {
        let ln_t = (t / MU_EPSILON_K).ln();
        let (ln_omega, dln_omega) = MU_OMEGA.iter().enumerate().fold(
            (0.0, 0.0),
            |(sum, dsum), (i, b)| {
                let dterm = if i == 0 { 0.0 } else { i as Real * b * ln_t.powi(i as i32 - 1) };
                (sum + b * ln_t.powi(i as i32), dsum + dterm)
            },
        );
        let eta0 = 0.0266958 * (1000.0 * MOLAR_MASS * t).sqrt()
            / (MU_SIGMA * MU_SIGMA * ln_omega.exp());
        (eta0, eta0 * (0.5 - dln_omega) / t)
    }
}

impl HelmholtzEos for Nitrogen {
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

    fn viscosity(&self, rho: Real, t: Real) -> FluidResult<PropDerivs> {
        let (eta0, deta0_dt) = self.dilute_viscosity(t);

        let tau = CRITICAL_TEMPERATURE / t;
        let delta = rho / CRITICAL_DENSITY;
        let (eta_r, deta_r_ddelta, deta_r_dtau) = density_series(&MU_RESIDUAL, delta, tau);

        // μPa·s to Pa·s
        Ok(PropDerivs::new(
            (eta0 + eta_r) * 1.0e-6,
            deta_r_ddelta / CRITICAL_DENSITY * 1.0e-6,
            (deta0_dt - deta_r_dtau * tau / t) * 1.0e-6,
        ))
    }

    fn conductivity(&self, rho: Real, t: Real) -> FluidResult<Real> {
        let (eta0, _) = self.dilute_viscosity(t);
        let tau = CRITICAL_TEMPERATURE / t;
        let delta = rho / CRITICAL_DENSITY;

        let [n1, n2, t2, n3, t3] = K_DILUTE;
        let lambda0 = n1 * eta0 + n2 * tau.powf(t2) + n3 * tau.powf(t3);
        let (lambda_r, _, _) = density_series(&K_RESIDUAL, delta, tau);

        // mW/(m·K) to W/(m·K)
        Ok((lambda0 + lambda_r) * 1.0e-3)
    }

    fn vapor_pressure(&self, t: Real) -> FluidResult<Real> {
        Ok(self.vapor_pressure_derivs(t)?.0)
    }

    fn vapor_pressure_derivs(&self, t: Real) -> FluidResult<(Real, Real)> {
        self.check_saturation_range(t, "vapor_pressure")?;
        let theta = 1.0 - t / CRITICAL_TEMPERATURE;
        let (sum, dsum) = ancillary_sum(&PSAT, theta);
        let p = CRITICAL_PRESSURE * (CRITICAL_TEMPERATURE / t * sum).exp();
        // d/dT [Tc/T · S(θ)] with dθ/dT = −1/Tc
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
        let sum = ancillary_sum(&RHO_VAPOR, theta).0;
        Ok(CRITICAL_DENSITY * (CRITICAL_TEMPERATURE / t * sum).exp())
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
        Ok(TRIPLE_POINT_PRESSURE * (1.0 + 12798.61 * x.powf(1.78963)))
    }

    fn sublimation_pressure(&self, t: Real) -> FluidResult<Real> {
        if t > TRIPLE_POINT_TEMPERATURE {
            return Err(FluidError::domain(
                NAME,
                "sublimation_pressure",
                "Temperature is above the triple point temperature",
            ));
        }
        let tr = t / TRIPLE_POINT_TEMPERATURE;
        Ok(TRIPLE_POINT_PRESSURE * (-13.088692 * (1.0 - tr) / tr).exp())
    }

    fn henry_coefficients(&self) -> FluidResult<[Real; 3]> {
        Ok([-9.67578, 4.72162, 11.70585])
    }
}
