//! Term banks for reduced Helmholtz free energy formulations.
//!
//! α(δ,τ) = α⁰(δ,τ) + αʳ(δ,τ), where α⁰ is the ideal-gas part and αʳ the
//! residual part. Each term type provides its value and its five partial
//! derivatives in closed form; no numerical differentiation is involved.

use fp_core::Real;

/// Ideal-gas part
///
/// α⁰ = ln δ + `constant` + `ln_tau`·ln τ + Σ nᵢ τ^kᵢ + Σ aᵢ ln(1 − exp(−θᵢ τ))
#[derive(Clone, Copy, Debug)]
pub struct IdealPart {
    pub constant: Real,
    pub ln_tau: Real,
    /// (n, k) pairs for n·τ^k
    pub power: &'static [(Real, Real)],
    /// (a, θ) pairs for Planck–Einstein terms a·ln(1 − exp(−θτ))
    pub planck: &'static [(Real, Real)],
}

impl IdealPart {
    pub fn alpha(&self, delta: Real, tau: Real) -> Real {
        let power: Real = self.power.iter().map(|&(n, k)| n * tau.powf(k)).sum();
        let planck: Real = self
            .planck
            .iter()
            .map(|&(a, theta)| a * (-(-theta * tau).exp()).ln_1p())
            .sum();
        delta.ln() + self.constant + self.ln_tau * tau.ln() + power + planck
    }

    pub fn d_delta(&self, delta: Real) -> Real {
        1.0 / delta
    }

    pub fn d2_delta2(&self, delta: Real) -> Real {
        -1.0 / (delta * delta)
    }

    pub fn d_tau(&self, tau: Real) -> Real {
        let power: Real = self
            .power
            .iter()
            .map(|&(n, k)| n * k * tau.powf(k - 1.0))
            .sum();
        let planck: Real = self
            .planck
            .iter()
            .map(|&(a, theta)| a * theta * (1.0 / (1.0 - (-theta * tau).exp()) - 1.0))
            .sum();
        self.ln_tau / tau + power + planck
    }

    pub fn d2_tau2(&self, tau: Real) -> Real {
        let power: Real = self
            .power
            .iter()
            .map(|&(n, k)| n * k * (k - 1.0) * tau.powf(k - 2.0))
            .sum();
        let planck: Real = self
            .planck
            .iter()
            .map(|&(a, theta)| {
                let x = (-theta * tau).exp();
                a * theta * theta * x / ((1.0 - x) * (1.0 - x))
            })
            .sum();
        -self.ln_tau / (tau * tau) + power - planck
    }
}

/// A single residual term with closed-form derivatives.
pub trait ResidualTerm {
    fn value(&self, delta: Real, tau: Real) -> Real;
    fn d_delta(&self, delta: Real, tau: Real) -> Real;
    fn d_tau(&self, delta: Real, tau: Real) -> Real;
    fn d2_delta2(&self, delta: Real, tau: Real) -> Real;
    fn d2_tau2(&self, delta: Real, tau: Real) -> Real;
    fn d2_delta_tau(&self, delta: Real, tau: Real) -> Real;
}

/// n·δ^d·τ^t
#[derive(Clone, Copy, Debug)]
pub struct PowerTerm {
    pub n: Real,
    pub d: i32,
    pub t: Real,
}

impl PowerTerm {
    pub const fn new(n: Real, d: i32, t: Real) -> Self {
        Self { n, d, t }
    }
}

impl ResidualTerm for PowerTerm {
    fn value(&self, delta: Real, tau: Real) -> Real {
        self.n * delta.powi(self.d) * tau.powf(self.t)
    }

    fn d_delta(&self, delta: Real, tau: Real) -> Real {
        self.n * Real::from(self.d) * delta.powi(self.d - 1) * tau.powf(self.t)
    }

    fn d_tau(&self, delta: Real, tau: Real) -> Real {
        self.n * self.t * delta.powi(self.d) * tau.powf(self.t - 1.0)
    }

    fn d2_delta2(&self, delta: Real, tau: Real) -> Real {
        let d = Real::from(self.d);
        self.n * d * (d - 1.0) * delta.powi(self.d - 2) * tau.powf(self.t)
    }

    fn d2_tau2(&self, delta: Real, tau: Real) -> Real {
        self.n * self.t * (self.t - 1.0) * delta.powi(self.d) * tau.powf(self.t - 2.0)
    }

    fn d2_delta_tau(&self, delta: Real, tau: Real) -> Real {
        self.n * Real::from(self.d) * self.t * delta.powi(self.d - 1) * tau.powf(self.t - 1.0)
    }
}

/// n·δ^d·τ^t·exp(−δ^c)
#[derive(Clone, Copy, Debug)]
pub struct ExpTerm {
    pub n: Real,
    pub d: i32,
    pub t: Real,
    pub c: i32,
}

impl ExpTerm {
    pub const fn new(n: Real, d: i32, t: Real, c: i32) -> Self {
        Self { n, d, t, c }
    }

    #[inline]
    fn damping(&self, delta: Real) -> (Real, Real) {
        let dc = delta.powi(self.c);
        (dc, (-dc).exp())
    }
}

impl ResidualTerm for ExpTerm {
    fn value(&self, delta: Real, tau: Real) -> Real {
        let (_, e) = self.damping(delta);
        self.n * delta.powi(self.d) * tau.powf(self.t) * e
    }

    fn d_delta(&self, delta: Real, tau: Real) -> Real {
        let (dc, e) = self.damping(delta);
        let d = Real::from(self.d);
        let c = Real::from(self.c);
        self.n * e * delta.powi(self.d - 1) * tau.powf(self.t) * (d - c * dc)
    }

    fn d_tau(&self, delta: Real, tau: Real) -> Real {
        self.t / tau * self.value(delta, tau)
    }

    fn d2_delta2(&self, delta: Real, tau: Real) -> Real {
        let (dc, e) = self.damping(delta);
        let d = Real::from(self.d);
        let c = Real::from(self.c);
        self.n
            * e
            * delta.powi(self.d - 2)
            * tau.powf(self.t)
            * ((d - c * dc) * (d - 1.0 - c * dc) - c * c * dc)
    }

    fn d2_tau2(&self, delta: Real, tau: Real) -> Real {
        self.t * (self.t - 1.0) / (tau * tau) * self.value(delta, tau)
    }

    fn d2_delta_tau(&self, delta: Real, tau: Real) -> Real {
        self.t / tau * self.d_delta(delta, tau)
    }
}

/// n·δ^d·τ^t·exp(−α(δ−ε)² − β(τ−γ)²)
#[derive(Clone, Copy, Debug)]
pub struct GaussianTerm {
    pub n: Real,
    pub d: i32,
    pub t: Real,
    pub alpha: Real,
    pub beta: Real,
    pub gamma: Real,
    pub epsilon: Real,
}

impl GaussianTerm {
    pub const fn new(
        n: Real,
        d: i32,
        t: Real,
        alpha: Real,
        beta: Real,
        gamma: Real,
        epsilon: Real,
    ) -> Self {
        Self {
            n,
            d,
            t,
            alpha,
            beta,
            gamma,
            epsilon,
        }
    }

    #[inline]
    fn ln_factors(&self, delta: Real, tau: Real) -> (Real, Real) {
        let gd = Real::from(self.d) / delta - 2.0 * self.alpha * (delta - self.epsilon);
        let gt = self.t / tau - 2.0 * self.beta * (tau - self.gamma);
        (gd, gt)
    }
}

impl ResidualTerm for GaussianTerm {
    fn value(&self, delta: Real, tau: Real) -> Real {
        let ddelta = delta - self.epsilon;
        let dtau = tau - self.gamma;
        self.n
            * delta.powi(self.d)
            * tau.powf(self.t)
            * (-self.alpha * ddelta * ddelta - self.beta * dtau * dtau).exp()
    }

    fn d_delta(&self, delta: Real, tau: Real) -> Real {
        let (gd, _) = self.ln_factors(delta, tau);
        self.value(delta, tau) * gd
    }

    fn d_tau(&self, delta: Real, tau: Real) -> Real {
        let (_, gt) = self.ln_factors(delta, tau);
        self.value(delta, tau) * gt
    }

    fn d2_delta2(&self, delta: Real, tau: Real) -> Real {
        let (gd, _) = self.ln_factors(delta, tau);
        let d = Real::from(self.d);
        self.value(delta, tau) * (gd * gd - d / (delta * delta) - 2.0 * self.alpha)
    }

    fn d2_tau2(&self, delta: Real, tau: Real) -> Real {
        let (_, gt) = self.ln_factors(delta, tau);
        self.value(delta, tau) * (gt * gt - self.t / (tau * tau) - 2.0 * self.beta)
    }

    fn d2_delta_tau(&self, delta: Real, tau: Real) -> Real {
        let (gd, gt) = self.ln_factors(delta, tau);
        self.value(delta, tau) * gd * gt
    }
}

/// Non-analytic critical-region term n·Δ^b·δ·Ψ (Span & Wagner 1996).
///
/// θ = (1 − τ) + A((δ−1)²)^(1/2β), Δ = θ² + B((δ−1)²)^a,
/// Ψ = exp(−C(δ−1)² − D(τ−1)²). Undefined at exactly δ = 1.
#[derive(Clone, Copy, Debug)]
pub struct NonAnalyticTerm {
    pub n: Real,
    pub a: Real,
    pub b: Real,
    pub beta: Real,
    pub big_a: Real,
    pub big_b: Real,
    pub big_c: Real,
    pub big_d: Real,
}

/// Intermediate quantities shared by the value and derivatives of a
/// [`NonAnalyticTerm`].
struct NonAnalyticParts {
    delta_b: Real,
    ddelta_b_dd: Real,
    d2delta_b_dd2: Real,
    ddelta_b_dt: Real,
    d2delta_b_dt2: Real,
    d2delta_b_ddt: Real,
    psi: Real,
    dpsi_dd: Real,
    d2psi_dd2: Real,
    dpsi_dt: Real,
    d2psi_dt2: Real,
    d2psi_ddt: Real,
}

impl NonAnalyticTerm {
    fn parts(&self, delta: Real, tau: Real) -> NonAnalyticParts {
        let (a, b, beta) = (self.a, self.b, self.beta);
        let (big_a, big_b, big_c, big_d) = (self.big_a, self.big_b, self.big_c, self.big_d);

        let dm1 = delta - 1.0;
        let sq = dm1 * dm1;
        let tm1 = tau - 1.0;
        let inv_2beta = 1.0 / (2.0 * beta);

        let theta = (1.0 - tau) + big_a * sq.powf(inv_2beta);
        let big_delta = theta * theta + big_b * sq.powf(a);

        let ddelta_dd = dm1
            * (big_a * theta * 2.0 / beta * sq.powf(inv_2beta - 1.0)
                + 2.0 * big_b * a * sq.powf(a - 1.0));
        let d2delta_dd2 = ddelta_dd / dm1
            + sq * (4.0 * big_b * a * (a - 1.0) * sq.powf(a - 2.0)
                + 2.0 * big_a * big_a / (beta * beta) * sq.powf(inv_2beta - 1.0).powi(2)
                + big_a * theta * 4.0 / beta * (inv_2beta - 1.0) * sq.powf(inv_2beta - 2.0));

        let pow_b1 = big_delta.powf(b - 1.0);
        let pow_b2 = big_delta.powf(b - 2.0);
        let delta_b = big_delta.powf(b);
        let ddelta_b_dd = b * pow_b1 * ddelta_dd;
        let d2delta_b_dd2 = b * (pow_b1 * d2delta_dd2 + (b - 1.0) * pow_b2 * ddelta_dd * ddelta_dd);
        let ddelta_b_dt = -2.0 * theta * b * pow_b1;
        let d2delta_b_dt2 = 2.0 * b * pow_b1 + 4.0 * theta * theta * b * (b - 1.0) * pow_b2;
        let d2delta_b_ddt = -big_a * b * 2.0 / beta * pow_b1 * dm1 * sq.powf(inv_2beta - 1.0)
            - 2.0 * theta * b * (b - 1.0) * pow_b2 * ddelta_dd;

        let psi = (-big_c * sq - big_d * tm1 * tm1).exp();
        let dpsi_dd = -2.0 * big_c * dm1 * psi;
        let d2psi_dd2 = 2.0 * big_c * (2.0 * big_c * sq - 1.0) * psi;
        let dpsi_dt = -2.0 * big_d * tm1 * psi;
        let d2psi_dt2 = 2.0 * big_d * (2.0 * big_d * tm1 * tm1 - 1.0) * psi;
        let d2psi_ddt = 4.0 * big_c * big_d * dm1 * tm1 * psi;

        NonAnalyticParts {
            delta_b,
            ddelta_b_dd,
            d2delta_b_dd2,
            ddelta_b_dt,
            d2delta_b_dt2,
            d2delta_b_ddt,
            psi,
            dpsi_dd,
            d2psi_dd2,
            dpsi_dt,
            d2psi_dt2,
            d2psi_ddt,
        }
    }
}

impl ResidualTerm for NonAnalyticTerm {
    fn value(&self, delta: Real, tau: Real) -> Real {
        let p = self.parts(delta, tau);
        self.n * p.delta_b * delta * p.psi
    }

    fn d_delta(&self, delta: Real, tau: Real) -> Real {
        let p = self.parts(delta, tau);
        self.n * (p.delta_b * (p.psi + delta * p.dpsi_dd) + p.ddelta_b_dd * delta * p.psi)
    }

    fn d_tau(&self, delta: Real, tau: Real) -> Real {
        let p = self.parts(delta, tau);
        self.n * delta * (p.ddelta_b_dt * p.psi + p.delta_b * p.dpsi_dt)
    }

    fn d2_delta2(&self, delta: Real, tau: Real) -> Real {
        let p = self.parts(delta, tau);
        self.n
            * (p.delta_b * (2.0 * p.dpsi_dd + delta * p.d2psi_dd2)
                + 2.0 * p.ddelta_b_dd * (p.psi + delta * p.dpsi_dd)
                + p.d2delta_b_dd2 * delta * p.psi)
    }

    fn d2_tau2(&self, delta: Real, tau: Real) -> Real {
        let p = self.parts(delta, tau);
        self.n
            * delta
            * (p.d2delta_b_dt2 * p.psi + 2.0 * p.ddelta_b_dt * p.dpsi_dt + p.delta_b * p.d2psi_dt2)
    }

    fn d2_delta_tau(&self, delta: Real, tau: Real) -> Real {
        let p = self.parts(delta, tau);
        self.n
            * (p.delta_b * (p.dpsi_dt + delta * p.d2psi_ddt)
                + delta * p.ddelta_b_dd * p.dpsi_dt
                + p.ddelta_b_dt * (p.psi + delta * p.dpsi_dd)
                + p.d2delta_b_ddt * delta * p.psi)
    }
}

/// Residual part αʳ as a collection of term banks.
#[derive(Clone, Copy, Debug)]
pub struct ResidualPart {
    pub power: &'static [PowerTerm],
    pub exponential: &'static [ExpTerm],
    pub gaussian: &'static [GaussianTerm],
    pub non_analytic: &'static [NonAnalyticTerm],
}

impl ResidualPart {
    fn sum(&self, f: impl Fn(&dyn ResidualTerm) -> Real) -> Real {
        self.power.iter().map(|t| f(t)).sum::<Real>()
            + self.exponential.iter().map(|t| f(t)).sum::<Real>()
            + self.gaussian.iter().map(|t| f(t)).sum::<Real>()
            + self.non_analytic.iter().map(|t| f(t)).sum::<Real>()
    }

    pub fn alpha(&self, delta: Real, tau: Real) -> Real {
        self.sum(|t| t.value(delta, tau))
    }

    pub fn d_delta(&self, delta: Real, tau: Real) -> Real {
        self.sum(|t| t.d_delta(delta, tau))
    }

    pub fn d_tau(&self, delta: Real, tau: Real) -> Real {
        self.sum(|t| t.d_tau(delta, tau))
    }

    pub fn d2_delta2(&self, delta: Real, tau: Real) -> Real {
        self.sum(|t| t.d2_delta2(delta, tau))
    }

    pub fn d2_tau2(&self, delta: Real, tau: Real) -> Real {
        self.sum(|t| t.d2_tau2(delta, tau))
    }

    pub fn d2_delta_tau(&self, delta: Real, tau: Real) -> Real {
        self.sum(|t| t.d2_delta_tau(delta, tau))
    }
}
