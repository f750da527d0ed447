//! Consistency of the Helmholtz fluids: α derivatives, inversions, chained
//! derivatives and published reference values.

use approx::assert_relative_eq;
use fp_fluids::{
    Co2, Co2Fluid, ErrorKind, HelmholtzEos, Hydrogen, HydrogenFluid, Methane, MethaneFluid,
    Nitrogen, NitrogenFluid, PropDerivs, SinglePhaseFluid,
};
use proptest::prelude::*;

const REL_STEP: f64 = 1e-5;

fn central(f: impl Fn(f64) -> f64, x: f64) -> f64 {
    let h = REL_STEP * x.abs();
    (f(x + h) - f(x - h)) / (2.0 * h)
}

/// Compare a `*_derivs` result against central differences of its value form.
///
/// Derivatives that nearly vanish are judged against the natural scale
/// `value / x` instead of their own magnitude.
fn check_derivs(
    derivs: PropDerivs,
    value: impl Fn(f64, f64) -> f64,
    x1: f64,
    x2: f64,
    tol: f64,
) {
    assert_relative_eq!(derivs.value, value(x1, x2), max_relative = 1e-12);
    assert_relative_eq!(
        derivs.d1,
        central(|x| value(x, x2), x1),
        max_relative = tol,
        epsilon = tol * (derivs.value / x1).abs()
    );
    assert_relative_eq!(
        derivs.d2,
        central(|x| value(x1, x), x2),
        max_relative = tol,
        epsilon = tol * (derivs.value / x2).abs()
    );
}

fn check_alpha<E: HelmholtzEos>(eos: &E) {
    for (delta, tau) in [(0.5, 1.2), (1.5, 0.8), (0.1, 2.0), (2.0, 1.5)] {
        let a_d = central(|d| eos.alpha(d, tau), delta);
        let a_t = central(|t| eos.alpha(delta, t), tau);
        let a_dd = central(|d| eos.dalpha_ddelta(d, tau), delta);
        let a_tt = central(|t| eos.dalpha_dtau(delta, t), tau);
        let a_dt = central(|t| eos.dalpha_ddelta(delta, t), tau);

        let name = eos.name();
        let (tol, eps) = (1e-6, 1e-7);
        assert!(
            approx::relative_eq!(eos.dalpha_ddelta(delta, tau), a_d, max_relative = tol, epsilon = eps),
            "{name}: α_δ at ({delta}, {tau})"
        );
        assert!(
            approx::relative_eq!(eos.dalpha_dtau(delta, tau), a_t, max_relative = tol, epsilon = eps),
            "{name}: α_τ at ({delta}, {tau})"
        );
        assert!(
            approx::relative_eq!(eos.d2alpha_ddelta2(delta, tau), a_dd, max_relative = tol, epsilon = eps),
            "{name}: α_δδ at ({delta}, {tau})"
        );
        assert!(
            approx::relative_eq!(eos.d2alpha_dtau2(delta, tau), a_tt, max_relative = tol, epsilon = eps),
            "{name}: α_ττ at ({delta}, {tau})"
        );
        assert!(
            approx::relative_eq!(
                eos.d2alpha_ddeltatau(delta, tau),
                a_dt,
                max_relative = tol,
                epsilon = eps
            ),
            "{name}: α_δτ at ({delta}, {tau})"
        );
    }
}

#[test]
fn alpha_derivatives_match_differences() {
    check_alpha(&Co2);
    check_alpha(&Nitrogen);
    check_alpha(&Hydrogen);
    check_alpha(&Methane);
}

fn all_fluids() -> Vec<(Box<dyn SinglePhaseFluid>, f64, f64)> {
    vec![
        (Box::new(Co2Fluid::default()), 1e6, 350.0),
        (Box::new(NitrogenFluid::default()), 1e6, 280.0),
        (Box::new(HydrogenFluid::default()), 1e6, 300.0),
        (Box::new(MethaneFluid::default()), 1e6, 300.0),
    ]
}

#[test]
fn density_round_trips() {
    for (fp, p, t) in all_fluids() {
        let rho = fp.rho_from_p_t(p, t).unwrap();
        assert!(rho > 0.0, "{}", fp.fluid_name());
        assert_relative_eq!(fp.p_from_rho_t(rho, t).unwrap(), p, max_relative = 1e-9);
    }
}

#[test]
fn rho_t_derivatives_match_differences() {
    let dense: [(Box<dyn SinglePhaseFluid>, f64, f64); 4] = [
        (Box::new(Co2Fluid::default()), 5e6, 350.0),
        (Box::new(NitrogenFluid::default()), 1e7, 200.0),
        (Box::new(HydrogenFluid::default()), 1e7, 100.0),
        (Box::new(MethaneFluid::default()), 1e7, 250.0),
    ];
    for (fp, p, t) in dense {
        let rho = fp.rho_from_p_t(p, t).unwrap();
        let fp = fp.as_ref();

        check_derivs(fp.p_from_rho_t_derivs(rho, t).unwrap(), |r, t| fp.p_from_rho_t(r, t).unwrap(), rho, t, 1e-5);
        check_derivs(fp.e_from_rho_t_derivs(rho, t).unwrap(), |r, t| fp.e_from_rho_t(r, t).unwrap(), rho, t, 1e-5);
        check_derivs(fp.h_from_rho_t_derivs(rho, t).unwrap(), |r, t| fp.h_from_rho_t(r, t).unwrap(), rho, t, 1e-5);
        check_derivs(fp.s_from_rho_t_derivs(rho, t).unwrap(), |r, t| fp.s_from_rho_t(r, t).unwrap(), rho, t, 1e-5);
        check_derivs(fp.mu_from_rho_t_derivs(rho, t).unwrap(), |r, t| fp.mu_from_rho_t(r, t).unwrap(), rho, t, 1e-5);
    }
}

#[test]
fn pressure_derivatives_inside_the_co2_dome() {
    let fp = Co2Fluid::default();
    let (rho, t) = (400.0, 280.0);

    let p = fp.p_from_rho_t_derivs(rho, t).unwrap();
    assert_eq!(p.value, fp.vapor_pressure(t).unwrap());
    assert_eq!(p.d1, 0.0);
    check_derivs(p, |r, t| fp.p_from_rho_t(r, t).unwrap(), rho, t, 1e-5);

    let (_, dpsat_dt) = fp.vapor_pressure_derivs(t).unwrap();
    let fd = central(|t| fp.vapor_pressure(t).unwrap(), t);
    assert_relative_eq!(dpsat_dt, fd, max_relative = 1e-6);
}

#[test]
fn p_t_derivatives_match_differences() {
    let fp = NitrogenFluid::default();
    let (p, t) = (1e6, 280.0);

    check_derivs(fp.rho_from_p_t_derivs(p, t).unwrap(), |p, t| fp.rho_from_p_t(p, t).unwrap(), p, t, 1e-5);
    check_derivs(fp.e_from_p_t_derivs(p, t).unwrap(), |p, t| fp.e_from_p_t(p, t).unwrap(), p, t, 1e-5);
    check_derivs(fp.h_from_p_t_derivs(p, t).unwrap(), |p, t| fp.h_from_p_t(p, t).unwrap(), p, t, 1e-5);
    check_derivs(fp.s_from_p_t_derivs(p, t).unwrap(), |p, t| fp.s_from_p_t(p, t).unwrap(), p, t, 1e-5);
    check_derivs(fp.cv_from_p_t_derivs(p, t).unwrap(), |p, t| fp.cv_from_p_t(p, t).unwrap(), p, t, 1e-4);
    check_derivs(fp.cp_from_p_t_derivs(p, t).unwrap(), |p, t| fp.cp_from_p_t(p, t).unwrap(), p, t, 1e-4);
    check_derivs(fp.c_from_p_t_derivs(p, t).unwrap(), |p, t| fp.c_from_p_t(p, t).unwrap(), p, t, 1e-4);
    check_derivs(fp.mu_from_p_t_derivs(p, t).unwrap(), |p, t| fp.mu_from_p_t(p, t).unwrap(), p, t, 1e-5);
    check_derivs(fp.k_from_p_t_derivs(p, t).unwrap(), |p, t| fp.k_from_p_t(p, t).unwrap(), p, t, 1e-4);
}

#[test]
fn v_e_derivatives_match_differences() {
    let fp = NitrogenFluid::default();
    let rho = fp.rho_from_p_t(1e6, 280.0).unwrap();
    let v = 1.0 / rho;
    let e = fp.e_from_rho_t(rho, 280.0).unwrap();

    let t = fp.t_from_v_e_derivs(v, e).unwrap();
    assert_relative_eq!(t.value, 280.0, max_relative = 1e-9);
    check_derivs(t, |v, e| fp.t_from_v_e(v, e).unwrap(), v, e, 1e-5);
    check_derivs(fp.p_from_v_e_derivs(v, e).unwrap(), |v, e| fp.p_from_v_e(v, e).unwrap(), v, e, 1e-5);
}

#[test]
fn nitrogen_reference_state() {
    let fp = NitrogenFluid::default();
    let m = fp.molar_mass();
    let (p, t) = (1e6, 280.0);

    assert_relative_eq!(fp.rho_from_p_t(p, t).unwrap(), 0.43104 * 1000.0 * m, max_relative = 1e-3);
    assert_relative_eq!(fp.h_from_p_t(p, t).unwrap(), 8070.2 / m, max_relative = 1e-3);
    assert_relative_eq!(fp.s_from_p_t(p, t).unwrap(), 170.41 / m, max_relative = 1e-3);
    assert_relative_eq!(fp.cp_from_p_t(p, t).unwrap(), 29.66 / m, max_relative = 2e-3);
    assert_relative_eq!(fp.cv_from_p_t(p, t).unwrap(), 20.89 / m, max_relative = 2e-3);
    assert_relative_eq!(fp.c_from_p_t(p, t).unwrap(), 342.4, max_relative = 1e-3);
}

#[test]
fn combined_accessors_match_single_calls() {
    let fp = NitrogenFluid::default();
    let (p, t) = (2e6, 300.0);

    let (rho, mu) = fp.rho_mu_from_p_t(p, t).unwrap();
    assert_eq!(rho, fp.rho_from_p_t(p, t).unwrap());
    assert_eq!(mu, fp.mu_from_p_t(p, t).unwrap());

    let (rho, e) = fp.rho_e_from_p_t(p, t).unwrap();
    assert_eq!(rho, fp.rho_from_p_t(p, t).unwrap());
    assert_eq!(e, fp.e_from_p_t(p, t).unwrap());

    let (rho_d, e_d) = fp.rho_e_from_p_t_derivs(p, t).unwrap();
    assert_eq!(rho_d, fp.rho_from_p_t_derivs(p, t).unwrap());
    assert_eq!(e_d, fp.e_from_p_t_derivs(p, t).unwrap());

    let (rho_d, mu_d) = fp.rho_mu_from_p_t_derivs(p, t).unwrap();
    assert_eq!(rho_d, fp.rho_from_p_t_derivs(p, t).unwrap());
    assert_eq!(mu_d, fp.mu_from_p_t_derivs(p, t).unwrap());
}

#[test]
fn newton_inversions_recover_state() {
    let fp = NitrogenFluid::default();
    let (p, t) = (5e5, 350.0);
    let rho = fp.rho_from_p_t(p, t).unwrap();
    let h = fp.h_from_p_t(p, t).unwrap();
    let s = fp.s_from_p_t(p, t).unwrap();

    assert_relative_eq!(fp.t_from_p_h(p, h).unwrap(), t, max_relative = 1e-6);
    assert_relative_eq!(fp.s_from_h_p(h, p).unwrap(), s, max_relative = 1e-6);
    assert_relative_eq!(fp.rho_from_p_s(p, s).unwrap(), rho, max_relative = 1e-6);
    assert_relative_eq!(fp.p_from_h_s(h, s).unwrap(), p, max_relative = 1e-6);

    let (p_hs, t_hs) = fp.p_t_from_h_s(h, s).unwrap();
    assert_relative_eq!(p_hs, p, max_relative = 1e-6);
    assert_relative_eq!(t_hs, t, max_relative = 1e-6);

    assert_relative_eq!(fp.t_from_p_rho(p, rho).unwrap(), t, max_relative = 1e-6);
    assert_relative_eq!(
        fp.e_from_p_rho(p, rho).unwrap(),
        fp.e_from_rho_t(rho, t).unwrap(),
        max_relative = 1e-6
    );
}

#[test]
fn e_from_p_rho_derivatives() {
    let fp = MethaneFluid::default();
    let (p, t) = (2e6, 320.0);
    let rho = fp.rho_from_p_t(p, t).unwrap();
    check_derivs(
        fp.e_from_p_rho_derivs(p, rho).unwrap(),
        |p, r| fp.e_from_p_rho(p, r).unwrap(),
        p,
        rho,
        1e-5,
    );
}

#[test]
fn saturation_correlations_respect_their_range() {
    let fluids: [(&dyn SinglePhaseFluid, f64, f64); 3] = [
        (&Co2Fluid::default(), 216.592, 304.1282),
        (&NitrogenFluid::default(), 63.151, 126.192),
        (&MethaneFluid::default(), 90.6941, 190.564),
    ];
    for (fp, t_triple, t_crit) in fluids {
        for t in [t_triple - 1.0, t_crit + 1.0] {
            for result in [
                fp.vapor_pressure(t),
                fp.saturated_liquid_density(t),
                fp.saturated_vapor_density(t),
            ] {
                let err = result.unwrap_err();
                assert_eq!(err.kind(), ErrorKind::Domain);
                assert!(err.to_string().contains(fp.fluid_name()));
            }
        }

        let t = 0.5 * (t_triple + t_crit);
        let p_sat = fp.vapor_pressure(t).unwrap();
        let rho_l = fp.saturated_liquid_density(t).unwrap();
        let rho_v = fp.saturated_vapor_density(t).unwrap();
        assert!(p_sat.is_finite() && p_sat > 0.0);
        assert!(rho_l > rho_v && rho_v > 0.0);

        assert_relative_eq!(fp.vapor_temperature(p_sat).unwrap(), t, max_relative = 1e-9);
    }
}

#[test]
fn error_names_fluid_and_operation() {
    let err = NitrogenFluid::default().vapor_pressure(200.0).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Temperature is out of range in nitrogen: vapor_pressure()"
    );
}

#[test]
fn spinodal_helpers_follow_saturated_vapor() {
    let fp = NitrogenFluid::default();
    let t = 100.0;
    let (v, e) = fp.v_e_spndl_from_t(t).unwrap();
    assert_relative_eq!(v, 1.0 / fp.saturated_vapor_density(t).unwrap());
    assert_relative_eq!(fp.e_spndl_from_v(v).unwrap(), e, max_relative = 1e-6);

    let rho_c = fp.critical_density().unwrap();
    assert_relative_eq!(
        fp.e_spndl_from_v(0.5 / rho_c).unwrap(),
        fp.critical_internal_energy().unwrap()
    );

    let (v_c, _) = fp.v_e_spndl_from_t(200.0).unwrap();
    assert_relative_eq!(v_c, 1.0 / rho_c);
}

#[test]
fn partial_saturation_pressure() {
    let fp = NitrogenFluid::default();
    let p_sat = fp.vapor_pressure(90.0).unwrap();
    assert_eq!(fp.pp_sat_from_p_t(2.0 * p_sat, 90.0).unwrap(), Some(p_sat));
    assert_eq!(fp.pp_sat_from_p_t(0.5 * p_sat, 90.0).unwrap(), None);
    assert_eq!(fp.pp_sat_from_p_t(1e6, 200.0).unwrap(), None);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn nitrogen_density_round_trip(p in 1.0e5_f64..1.0e7, t in 200.0_f64..600.0) {
        let fp = NitrogenFluid::default();
        let rho = fp.rho_from_p_t(p, t).unwrap();
        let p_back = fp.p_from_rho_t(rho, t).unwrap();
        prop_assert!((p_back / p - 1.0).abs() < 1e-9);
    }

    #[test]
    fn methane_energy_round_trip(p in 1.0e5_f64..5.0e6, t in 250.0_f64..600.0) {
        let fp = MethaneFluid::default();
        let rho = fp.rho_from_p_t(p, t).unwrap();
        let e = fp.e_from_rho_t(rho, t).unwrap();
        let t_back = fp.t_from_v_e(1.0 / rho, e).unwrap();
        prop_assert!((t_back / t - 1.0).abs() < 1e-9);
    }
}
