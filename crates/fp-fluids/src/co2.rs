//! Carbon dioxide.
//!
//! Equation of state from Span & Wagner (1996), viscosity from Fenghour et al.
//! (1998), thermal conductivity from Scalabrin et al. (2006) and the
//! saturation, melting and sublimation ancillaries published with the EOS.

use crate::error::{FluidError, FluidResult};
use crate::fluid::PropDerivs;
use crate::helmholtz::{
    ExpTerm, GaussianTerm, HelmholtzEos, HelmholtzFluid, IdealPart, NonAnalyticTerm, PowerTerm,
    ResidualPart, ancillary_sum,
};
use fp_core::Real;

const NAME: &str = "co2";
const MOLAR_MASS: Real = 44.0098e-3;
const CRITICAL_PRESSURE: Real = 7.3773e6;
const CRITICAL_TEMPERATURE: Real = 304.1282;
const CRITICAL_DENSITY: Real = 467.6;
const TRIPLE_POINT_PRESSURE: Real = 0.51795e6;
const TRIPLE_POINT_TEMPERATURE: Real = 216.592;
const GAS_CONSTANT: Real = 8.31451;

/// Validity range of the equation of state [K]
const T_MIN: Real = 216.0;
const T_MAX: Real = 1100.0;
/// Validity range of the viscosity correlation
const MU_T_MAX: Real = 1000.0;
const MU_RHO_MAX: Real = 1400.0;
const K_T_MAX: Real = 1000.0;

/// ln(p/pc)·T/Tc = Σ n θ^k with θ = 1 − T/Tc
const PSAT: [(Real, Real); 4] = [
    (-7.0602087, 1.0),
    (1.9391218, 1.5),
    (-1.6463597, 2.0),
    (-3.2995634, 4.0),
];

static IDEAL: IdealPart = IdealPart {
    constant: 8.37304456,
    ln_tau: 2.5,
    power: &[(-3.70454304, 1.0)],
    planck: &[
        (1.99427042, 3.15163),
        (0.62105248, 6.11190),
        (0.41195293, 6.77708),
        (1.04028922, 11.32384),
        (0.08327678, 27.08792),
    ],
};

static RESIDUAL: ResidualPart = ResidualPart {
    power: &[
        PowerTerm::new(0.38856823203161, 1, 0.0),
        PowerTerm::new(2.9385475942740, 1, 0.75),
        PowerTerm::new(-5.5867188534934, 1, 1.0),
        PowerTerm::new(-0.76753199592477, 1, 2.0),
        PowerTerm::new(0.31729005580416, 2, 0.75),
        PowerTerm::new(0.54803315897767, 2, 2.0),
        PowerTerm::new(0.12279411220335, 3, 0.75),
    ],
    exponential: &[
        ExpTerm::new(2.1658961543220, 1, 1.5, 1),
        ExpTerm::new(1.5841735109724, 2, 1.5, 1),
        ExpTerm::new(-0.23132705405503, 4, 2.5, 1),
        ExpTerm::new(0.058116916431436, 5, 0.0, 1),
        ExpTerm::new(-0.55369137205382, 5, 1.5, 1),
        ExpTerm::new(0.48946615909422, 5, 2.0, 1),
        ExpTerm::new(-0.024275739843501, 6, 0.0, 1),
        ExpTerm::new(0.062494790501172, 6, 1.0, 1),
        ExpTerm::new(-0.12175860225246, 6, 2.0, 1),
        ExpTerm::new(-0.37055685270086, 1, 3.0, 2),
        ExpTerm::new(-0.016775879700426, 1, 6.0, 2),
        ExpTerm::new(-0.11960736637987, 4, 3.0, 2),
        ExpTerm::new(-0.045619362508778, 4, 6.0, 2),
        ExpTerm::new(0.035612789270346, 4, 8.0, 2),
        ExpTerm::new(-0.0074427727132052, 7, 6.0, 2),
        ExpTerm::new(-0.0017395704902432, 8, 0.0, 2),
        ExpTerm::new(-0.021810121289527, 2, 7.0, 3),
        ExpTerm::new(0.024332166559236, 3, 12.0, 3),
        ExpTerm::new(-0.037440133423463, 3, 16.0, 3),
        ExpTerm::new(0.14338715756878, 5, 22.0, 4),
        ExpTerm::new(-0.13491969083286, 5, 24.0, 4),
        ExpTerm::new(-0.023151225053480, 6, 16.0, 4),
        ExpTerm::new(0.012363125492901, 7, 24.0, 4),
        ExpTerm::new(0.0021058321972940, 8, 8.0, 4),
        ExpTerm::new(-0.00033958519026368, 10, 2.0, 4),
        ExpTerm::new(0.0055993651771592, 4, 28.0, 5),
        ExpTerm::new(-0.00030335118055646, 8, 14.0, 6),
    ],
    gaussian: &[
        GaussianTerm::new(-213.65488688320, 2, 1.0, 25.0, 325.0, 1.16, 1.0),
        GaussianTerm::new(26641.569149272, 2, 0.0, 25.0, 300.0, 1.19, 1.0),
        GaussianTerm::new(-24027.212204557, 2, 1.0, 25.0, 300.0, 1.19, 1.0),
        GaussianTerm::new(-283.41603423999, 3, 3.0, 15.0, 275.0, 1.25, 1.0),
        GaussianTerm::new(212.47284400179, 3, 3.0, 20.0, 275.0, 1.22, 1.0),
    ],
    non_analytic: &[
        NonAnalyticTerm {
            n: -0.66642276540751,
            a: 3.5,
            b: 0.875,
            beta: 0.3,
            big_a: 0.7,
            big_b: 0.3,
            big_c: 10.0,
            big_d: 275.0,
        },
        NonAnalyticTerm {
            n: 0.72608632349897,
            a: 3.5,
            b: 0.925,
            beta: 0.3,
            big_a: 0.7,
            big_b: 0.3,
            big_c: 10.0,
            big_d: 275.0,
        },
        NonAnalyticTerm {
            n: 0.055068668612842,
            a: 3.0,
            b: 0.875,
            beta: 0.3,
            big_a: 0.7,
            big_b: 1.0,
            big_c: 12.5,
            big_d: 275.0,
        },
    ],
};

// Fenghour et al. (1998)
const MU_A: [Real; 5] = [0.235156, -0.491266, 5.211155e-2, 5.347906e-2, -1.537102e-2];
const MU_D: [Real; 5] = [
    0.4071119e-2,
    0.7198037e-4,
    0.2411697e-16,
    0.2971072e-22,
    -0.1627888e-22,
];
const MU_T_SCALE: Real = 251.196;

// Scalabrin et al. (2006): (n, g, h) for n·Tr^g·ρr^h
const K_DILUTE: [(Real, Real, i32); 3] = [
    (7.69857587, 0.0, 1),
    (0.159885811, 0.0, 5),
    (1.56918621, 1.5, 1),
];
const K_DAMPED: [(Real, Real, i32); 7] = [
    (-6.73400790, 0.0, 1),
    (16.3890156, 1.0, 2),
    (3.69415242, 1.5, 0),
    (22.3205514, 1.5, 5),
    (66.1420950, 1.5, 9),
    (-0.171779133, 3.5, 0),
    (0.00433043347, 5.5, 0),
];
const K_CRIT: [Real; 12] = [
    3.0, 6.70697, 0.94604, 0.30, 0.30, 0.39751, 0.33791, 0.77963, 0.79857, 0.90, 0.02, 0.20,
];

/// Carbon dioxide equation of state.
#[derive(Clone, Copy, Debug, Default)]
pub struct Co2;

/// Carbon dioxide as a [`SinglePhaseFluid`](crate::SinglePhaseFluid).
pub type Co2Fluid = HelmholtzFluid<Co2>;

impl Co2 {
    /// Density of CO2 dissolved in water [kg/m³], from the partial molar
    /// volume correlation of Garcia (2001).
    pub fn partial_density(&self, t: Real) -> Real {
        let tc = t - 273.15;
        let v = 37.51 - 9.585e-2 * tc + 8.74e-4 * tc * tc - 5.044e-7 * tc * tc * tc;
        1.0e6 * MOLAR_MASS / v
    }

    fn check_saturation_range(&self, t: Real, op: &'static str) -> FluidResult<()> {
        if !(TRIPLE_POINT_TEMPERATURE..=CRITICAL_TEMPERATURE).contains(&t) {
            return Err(FluidError::domain(NAME, op, "Temperature is out of range"));
        }
        Ok(())
    }
}

impl HelmholtzEos for Co2 {
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

    fn gas_constant(&self) -> Real {
        GAS_CONSTANT
    }

    fn ideal(&self) -> &IdealPart {
        &IDEAL
    }

    fn residual(&self) -> &ResidualPart {
        &RESIDUAL
    }

    fn density_bracket(&self, _p: Real, _t: Real) -> (Real, Real) {
        (100.0, 1000.0)
    }

    fn check_rho_t(&self, rho: Real, t: Real, op: &'static str) -> FluidResult<()> {
        if !(T_MIN..=T_MAX).contains(&t) || rho <= 0.0 {
            return Err(FluidError::domain(NAME, op, "Parameters out of range"));
        }
        Ok(())
    }

    fn check_p_t(&self, p: Real, t: Real, op: &'static str) -> FluidResult<()> {
        if !(T_MIN..=T_MAX).contains(&t) || p <= 0.0 {
            return Err(FluidError::domain(NAME, op, "Parameters out of range"));
        }

        let solid = if t > TRIPLE_POINT_TEMPERATURE {
            p > self.melting_pressure(t)?
        } else if t < TRIPLE_POINT_TEMPERATURE {
            p > self.sublimation_pressure(t)?
        } else {
            false
        };
        if solid {
            return Err(FluidError::domain(
                NAME,
                op,
                format!("Input pressure {p} Pa and temperature {t} K correspond to solid CO2 phase"),
            ));
        }
        Ok(())
    }

    /// Inside the saturation dome the pressure is the vapor pressure.
    fn two_phase_pressure(&self, rho: Real, t: Real) -> FluidResult<Option<Real>> {
        if t <= TRIPLE_POINT_TEMPERATURE || t >= CRITICAL_TEMPERATURE {
            return Ok(None);
        }
        let rho_vapor = self.saturated_vapor_density(t)?;
        let rho_liquid = self.saturated_liquid_density(t)?;
        if rho < rho_vapor || rho > rho_liquid {
            Ok(None)
        } else {
            Ok(Some(self.vapor_pressure(t)?))
        }
    }

    fn viscosity(&self, rho: Real, t: Real) -> FluidResult<PropDerivs> {
        if !(T_MIN..=MU_T_MAX).contains(&t) || rho > MU_RHO_MAX {
            return Err(FluidError::domain(NAME, "mu_from_rho_t", "Parameters out of range"));
        }

        let t_star = t / MU_T_SCALE;
        let ln_t = t_star.ln();

        // Zero-density limit, a function of T only
        let mut sum = MU_A[0];
        let mut dsum_dt = 0.0;
        for (i, a) in MU_A.iter().enumerate().skip(1) {
            sum += a * ln_t.powi(i as i32);
            dsum_dt += i as Real * a * ln_t.powi(i as i32 - 1) / t;
        }
        let mu0 = 1.00697 * t.sqrt() / sum.exp();
        let dmu0_dt = mu0 * (0.5 / t - dsum_dt);

        // Excess viscosity
        let r2 = rho * rho;
        let r5 = r2 * r2 * rho;
        let r6 = r5 * rho;
        let r7 = r6 * rho;
        let r8 = r7 * rho;
        let t3 = t_star.powi(3);
        let mue = MU_D[0] * rho
            + MU_D[1] * r2
            + MU_D[2] * r6 / t3
            + MU_D[3] * r8
            + MU_D[4] * r8 / t_star;
        let dmue_drho = MU_D[0]
            + 2.0 * MU_D[1] * rho
            + 6.0 * MU_D[2] * r5 / t3
            + 8.0 * MU_D[3] * r7
            + 8.0 * MU_D[4] * r7 / t_star;
        let dmue_dt = (-3.0 * MU_D[2] * r6 / (t3 * t_star) - MU_D[4] * r8 / (t_star * t_star))
            / MU_T_SCALE;

        // μPa·s to Pa·s
        Ok(PropDerivs::new(
            (mu0 + mue) * 1.0e-6,
            dmue_drho * 1.0e-6,
            (dmu0_dt + dmue_dt) * 1.0e-6,
        ))
    }

    fn conductivity(&self, rho: Real, t: Real) -> FluidResult<Real> {
        if t <= TRIPLE_POINT_TEMPERATURE || t >= K_T_MAX {
            return Err(FluidError::domain(
                NAME,
                "k_from_rho_t",
                format!("Temperature {t} K is out of range"),
            ));
        }

        let tr = t / CRITICAL_TEMPERATURE;
        let rhor = rho / CRITICAL_DENSITY;
        let bank = |terms: &[(Real, Real, i32)]| -> Real {
            terms.iter().map(|&(n, g, h)| n * tr.powf(g) * rhor.powi(h)).sum()
        };
        let sum1 = bank(&K_DILUTE);
        let sum2 = bank(&K_DAMPED);

        // Near-critical enhancement
        let a = &K_CRIT;
        let alpha = 1.0 - a[9] * (1.0 + a[10] * ((1.0 - tr).powi(2)).powf(a[11])).acosh();
        let numerator = rhor
            * (-rhor.powf(a[0]) / a[0]
                - (a[1] * (tr - 1.0)).powi(2)
                - (a[2] * (rhor - 1.0)).powi(2))
            .exp();
        let thermal = 1.0 - 1.0 / tr + a[3] * ((rhor - 1.0).powi(2)).powf(0.5 / a[4]);
        let density = a[6] * (rhor - alpha);
        let denominator = (thermal.powi(2).powf(a[5]) + density.powi(2).powf(a[7])).powf(a[8]);
        let lambda_c = numerator / denominator;

        // mW/(m·K) to W/(m·K)
        Ok(4.81384 * (sum1 + (-5.0 * rhor * rhor).exp() * sum2 + 0.775547504 * lambda_c) / 1000.0)
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
        let ln_rho = 1.9245108 * theta.powf(0.34) - 0.62385555 * theta.powf(0.5)
            - 0.32731127 * theta.powf(10.0 / 6.0)
            + 0.39245142 * theta.powf(11.0 / 6.0);
        Ok(CRITICAL_DENSITY * ln_rho.exp())
    }

    fn saturated_vapor_density(&self, t: Real) -> FluidResult<Real> {
        self.check_saturation_range(t, "saturated_vapor_density")?;
        let theta = 1.0 - t / CRITICAL_TEMPERATURE;
        let ln_rho = -1.7074879 * theta.powf(0.34)
            - 0.82274670 * theta.powf(0.5)
            - 4.6008549 * theta
            - 10.111178 * theta.powf(7.0 / 3.0)
            - 29.742252 * theta.powf(14.0 / 3.0);
        Ok(CRITICAL_DENSITY * ln_rho.exp())
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
        Ok(TRIPLE_POINT_PRESSURE * (1.0 + 1955.539 * x + 2055.4593 * x * x))
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
        let x = 1.0 - tr;
        let ln_p = (-14.740846 * x + 2.4327015 * x.powf(1.9) - 5.3061778 * x.powf(2.9)) / tr;
        Ok(TRIPLE_POINT_PRESSURE * ln_p.exp())
    }

    fn henry_coefficients(&self) -> FluidResult<[Real; 3]> {
        Ok([-8.55445, 4.01195, 9.52345])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fluid::SinglePhaseFluid;
    use crate::ErrorKind;
    use approx::assert_relative_eq;

    #[test]
    fn vapor_pressure_at_280_k() {
        let p = Co2.vapor_pressure(280.0).unwrap();
        assert_relative_eq!(p, 4.1607e6, max_relative = 1e-3);
    }

    #[test]
    fn saturation_correlations_reject_supercritical_temperatures() {
        let err = Co2.vapor_pressure(310.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Domain);
        assert_eq!(err.to_string(), "Temperature is out of range in co2: vapor_pressure()");
        assert!(Co2.saturated_vapor_density(200.0).is_err());
    }

    #[test]
    fn liquid_is_denser_than_vapor_below_critical_point() {
        for t in [220.0, 250.0, 280.0, 300.0] {
            let liquid = Co2.saturated_liquid_density(t).unwrap();
            let vapor = Co2.saturated_vapor_density(t).unwrap();
            assert!(liquid > CRITICAL_DENSITY && vapor < CRITICAL_DENSITY);
        }
    }

    #[test]
    fn melting_and_sublimation_meet_at_triple_point() {
        let melting = Co2.melting_pressure(TRIPLE_POINT_TEMPERATURE).unwrap();
        let sublimation = Co2.sublimation_pressure(TRIPLE_POINT_TEMPERATURE).unwrap();
        assert_relative_eq!(melting, TRIPLE_POINT_PRESSURE);
        assert_relative_eq!(sublimation, TRIPLE_POINT_PRESSURE);
        assert!(Co2.melting_pressure(200.0).is_err());
        assert!(Co2.sublimation_pressure(220.0).is_err());
    }

    #[test]
    fn dilute_transport_properties() {
        let mu = Co2.viscosity(1e-6, 300.0).unwrap();
        assert_relative_eq!(mu.value, 15.01e-6, max_relative = 2e-3);
        let k = Co2.conductivity(1e-6, 300.0).unwrap();
        assert_relative_eq!(k, 16.65e-3, max_relative = 2e-3);
    }

    #[test]
    fn viscosity_derivatives_match_differences() {
        let (rho, t) = (600.0, 320.0);
        let mu = Co2.viscosity(rho, t).unwrap();
        let h_rho = 1e-4 * rho;
        let h_t = 1e-4 * t;
        let fd_rho = (Co2.viscosity(rho + h_rho, t).unwrap().value
            - Co2.viscosity(rho - h_rho, t).unwrap().value)
            / (2.0 * h_rho);
        let fd_t = (Co2.viscosity(rho, t + h_t).unwrap().value
            - Co2.viscosity(rho, t - h_t).unwrap().value)
            / (2.0 * h_t);
        assert_relative_eq!(mu.d1, fd_rho, max_relative = 1e-6);
        assert_relative_eq!(mu.d2, fd_t, max_relative = 1e-6);
    }

    #[test]
    fn transport_rejects_out_of_range_states() {
        assert!(Co2.viscosity(1500.0, 300.0).is_err());
        assert!(Co2.viscosity(10.0, 1200.0).is_err());
        assert!(Co2.conductivity(10.0, 210.0).is_err());
    }

    #[test]
    fn pressure_is_flat_inside_dome() {
        let fluid = Co2Fluid::default();
        let t = 280.0;
        let p = fluid.p_from_rho_t(400.0, t).unwrap();
        assert_eq!(p, Co2.vapor_pressure(t).unwrap());
    }

    #[test]
    fn density_rejects_solid_states() {
        let fluid = Co2Fluid::default();
        let err = fluid.rho_from_p_t(1e9, 220.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Domain);
        assert!(err.to_string().contains("solid CO2 phase"));
        assert!(fluid.rho_from_p_t(1e6, 200.0).is_err());
    }

    #[test]
    fn partial_density_is_liquid_like() {
        let rho = Co2.partial_density(298.15);
        assert!(rho > 1000.0 && rho < 1500.0, "rho = {rho}");
    }
}
