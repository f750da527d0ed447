//! Normal hydrogen.
//!
//! Equation of state from Leachman et al. (2009), viscosity from Muzny et al.
//! (2013) and thermal conductivity from Assael et al. (2011), the latter
//! without its critical enhancement.

use crate::error::{FluidError, FluidResult};
use crate::fluid::PropDerivs;
use crate::helmholtz::{
    ExpTerm, GaussianTerm, HelmholtzEos, HelmholtzFluid, IdealPart, PowerTerm, ResidualPart,
    ancillary_sum,
};
use fp_core::{Real, constants::AVOGADRO};

const NAME: &str = "hydrogen";
const MOLAR_MASS: Real = 2.01588e-3;
const CRITICAL_PRESSURE: Real = 1.2964e6;
const CRITICAL_TEMPERATURE: Real = 33.145;
const CRITICAL_DENSITY: Real = 31.262;
const TRIPLE_POINT_PRESSURE: Real = 7.36e3;
const TRIPLE_POINT_TEMPERATURE: Real = 13.957;

static IDEAL: IdealPart = IdealPart {
    constant: -1.4579856475,
    ln_tau: 1.5,
    power: &[(1.888076782, 1.0)],
    planck: &[
        (1.616, 16.0205159149),
        (-0.4117, 22.6580178006),
        (-0.792, 60.0090511389),
        (0.758, 74.9434303817),
        (1.217, 206.9392065168),
    ],
};

static RESIDUAL: ResidualPart = ResidualPart {
    power: &[
        PowerTerm::new(-6.93643, 1, 0.6844),
        PowerTerm::new(0.01, 4, 1.0),
        PowerTerm::new(2.1101, 1, 0.989),
        PowerTerm::new(4.52059, 1, 0.489),
        PowerTerm::new(0.732564, 2, 0.803),
        PowerTerm::new(-1.34086, 2, 1.1444),
        PowerTerm::new(0.130985, 3, 1.409),
    ],
    exponential: &[
        ExpTerm::new(-0.777414, 1, 1.754, 1),
        ExpTerm::new(0.351944, 3, 1.311, 1),
    ],
    gaussian: &[
        GaussianTerm::new(-0.0211716, 2, 4.187, 1.685, 0.1710, 0.7164, 1.506),
        GaussianTerm::new(0.0226312, 1, 5.646, 0.489, 0.2245, 1.3444, 0.156),
        GaussianTerm::new(0.032187, 3, 0.791, 0.103, 0.1304, 1.4517, 1.736),
        GaussianTerm::new(-0.0231752, 1, 7.249, 2.506, 0.2785, 0.7204, 0.670),
        GaussianTerm::new(0.0557346, 1, 2.986, 1.607, 0.3967, 1.5445, 1.662),
    ],
    non_analytic: &[],
};

const PSAT: [(Real, Real); 4] = [
    (-4.89789, 1.0),
    (0.988558, 1.5),
    (0.349689, 2.0),
    (0.499356, 2.85),
];

// Muzny et al. (2013)
const MU_SIGMA: Real = 0.297;
const MU_EPSILON_K: Real = 30.41;
const MU_DILUTE: [Real; 5] = [0.209630, -0.455274, 0.143602, -0.0335325, 0.00276981];
const MU_SECOND_VIRIAL: [Real; 7] = [-0.187, 2.4871, 3.7151, -11.0972, 9.0965, -3.8292, 0.5166];
const MU_DENSE: [Real; 6] = [
    6.43449673,
    4.56334068e-2,
    2.32797868e-1,
    9.58326120e-1,
    1.27941189e-1,
    3.63576595e-1,
];
const MU_RHO_SCALE: Real = 90.909090909;

// Assael et al. (2011)
const K_DILUTE_NUM: [Real; 7] = [
    -3.40976e-1,
    4.58820,
    -1.45080,
    3.26394e-1,
    3.16939e-3,
    1.90592e-4,
    -1.13900e-6,
];
const K_DILUTE_DEN: [Real; 4] = [1.38497e2, -2.21878e1, 4.57151, 1.0];
const K_EXCESS: [(Real, Real); 5] = [
    (3.63081e-2, 1.83370e-3),
    (-2.07629e-2, -8.86716e-3),
    (3.14810e-2, 1.58260e-2),
    (-1.43097e-2, -1.06283e-2),
    (1.74980e-3, 2.80673e-3),
];

/// Normal hydrogen equation of state.
#[derive(Clone, Copy, Debug, Default)]
pub struct Hydrogen;

/// Hydrogen as a [`SinglePhaseFluid`](crate::SinglePhaseFluid).
pub type HydrogenFluid = HelmholtzFluid<Hydrogen>;

fn polynomial(coeffs: &[Real], x: Real) -> Real {
    coeffs.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

impl Hydrogen {
    /// Zero-density viscosity [μPa·s] and its temperature derivative.
    fn dilute_viscosity(&self, t: Real) -> (Real, Real) {
        let ln_t = (t / MU_EPSILON_K).ln();
        let ln_s = polynomial(&MU_DILUTE, ln_t);
        let dln_s = MU_DILUTE
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, a)| i as Real * a * ln_t.powi(i as i32 - 1))
            .sum::<Real>();
        let eta0 =
            0.021357 * (1000.0 * MOLAR_MASS * t).sqrt() / (MU_SIGMA * MU_SIGMA * ln_s.exp());
        (eta0, eta0 * (0.5 - dln_s) / t)
    }

    /// Second viscosity virial coefficient [m³/mol] and its temperature derivative.
    fn viscosity_virial(&self, t: Real) -> (Real, Real) {
        let t_star = t / MU_EPSILON_K;
        let (b, db_dtstar) = MU_SECOND_VIRIAL.iter().enumerate().fold(
            (0.0, 0.0),
            |(b, db), (i, bi)| {
                let i = i as i32;
                (
                    b + bi * t_star.powi(-i),
                    db - Real::from(i) * bi * t_star.powi(-i - 1),
                )
            },
        );
        let scale = AVOGADRO * (MU_SIGMA * 1e-9).powi(3);
        (scale * b, scale * db_dtstar / MU_EPSILON_K)
    }
}

impl HelmholtzEos for Hydrogen {
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

    fn density_bracket(&self, _p: Real, _t: Real) -> (Real, Real) {
        (1e-3, 10.0)
    }

    fn viscosity(&self, rho: Real, t: Real) -> FluidResult<PropDerivs> {
        let (eta0, deta0_dt) = self.dilute_viscosity(t);

        // initial density dependence, with the molar density in mol/m³
        let (b, db_dt) = self.viscosity_virial(t);
        let rho_molar = rho / MOLAR_MASS;
        let eta1 = eta0 * b * rho_molar;

        let [c1, c2, c3, c4, c5, c6] = MU_DENSE;
        let tr = t / CRITICAL_TEMPERATURE;
        let rr = rho / MU_RHO_SCALE;
        let exponent = c2 * tr + c3 / tr + c4 * rr * rr / (c5 + tr) + c6 * rr.powi(6);
        let dense = c1 * tr * rr * rr * exponent.exp();
        let ddense_drr = c1 * tr * exponent.exp()
            * (2.0 * rr + rr * rr * (2.0 * c4 * rr / (c5 + tr) + 6.0 * c6 * rr.powi(5)));
        let ddense_dtr = dense
            * (1.0 / tr + c2 - c3 / (tr * tr) - c4 * rr * rr / ((c5 + tr) * (c5 + tr)));

        // μPa·s to Pa·s
        Ok(PropDerivs::new(
            (eta0 + eta1 + dense) * 1e-6,
            (eta0 * b / MOLAR_MASS + ddense_drr / MU_RHO_SCALE) * 1e-6,
            (deta0_dt
                + (deta0_dt * b + eta0 * db_dt) * rho_molar
                + ddense_dtr / CRITICAL_TEMPERATURE)
                * 1e-6,
        ))
    }

    fn conductivity(&self, rho: Real, t: Real) -> FluidResult<Real> {
        let tr = t / CRITICAL_TEMPERATURE;
        let dilute = polynomial(&K_DILUTE_NUM, tr) / polynomial(&K_DILUTE_DEN, tr);

        let rr = rho / CRITICAL_DENSITY;
        let excess = K_EXCESS
            .iter()
            .zip(1..)
            .map(|(&(b1, b2), i)| (b1 + b2 * tr) * rr.powi(i))
            .sum::<Real>();

        Ok(dilute + excess)
    }

    fn vapor_pressure(&self, t: Real) -> FluidResult<Real> {
        Ok(self.vapor_pressure_derivs(t)?.0)
    }

    fn vapor_pressure_derivs(&self, t: Real) -> FluidResult<(Real, Real)> {
        if !(TRIPLE_POINT_TEMPERATURE..=CRITICAL_TEMPERATURE).contains(&t) {
            return Err(FluidError::domain(NAME, "vapor_pressure", "Temperature is out of range"));
        }
        let theta = 1.0 - t / CRITICAL_TEMPERATURE;
        let (sum, dsum) = ancillary_sum(&PSAT, theta);
        let p = CRITICAL_PRESSURE * (CRITICAL_TEMPERATURE / t * sum).exp();
        let dln_p = -CRITICAL_TEMPERATURE / (t * t) * sum - dsum / t;
        Ok((p, p * dln_p))
    }

    fn henry_coefficients(&self) -> FluidResult<[Real; 3]> {
        Ok([-4.73284, 6.08954, 6.06066])
    }
}
