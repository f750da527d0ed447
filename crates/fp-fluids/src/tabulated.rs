//! Fluid properties interpolated from tables on a uniform (p,T) grid.
//!
//! A [`TabulatedFluid`] samples a source fluid once at construction and then
//! answers every query from bicubic Hermite patches. Node slopes come from
//! natural cubic splines along each axis, so values and first derivatives are
//! continuous across cells.
//!
//! (ρ,T), (v,e) and the other inversions are Newton solves on the
//! interpolant itself, which keeps them consistent with the (p,T) forms.

use crate::error::{ErrorKind, FluidError, FluidResult};
use crate::fluid::{PropDerivs, SinglePhaseFluid};
use crate::helmholtz::InversionConfig;
use fp_core::{Real, constants::R_MOLAR};
use fp_solver::newton;
use nalgebra::{Matrix2, Vector2};
use std::collections::BTreeMap;

/// A property that can be stored in a table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TabulatedProperty {
    Density,
    InternalEnergy,
    Enthalpy,
    Entropy,
    Cv,
    Cp,
    SpeedOfSound,
    Viscosity,
    Conductivity,
}

impl TabulatedProperty {
    pub const ALL: [TabulatedProperty; 9] = [
        TabulatedProperty::Density,
        TabulatedProperty::InternalEnergy,
        TabulatedProperty::Enthalpy,
        TabulatedProperty::Entropy,
        TabulatedProperty::Cv,
        TabulatedProperty::Cp,
        TabulatedProperty::SpeedOfSound,
        TabulatedProperty::Viscosity,
        TabulatedProperty::Conductivity,
    ];

    fn evaluate(self, source: &dyn SinglePhaseFluid, rho: Real, t: Real) -> FluidResult<Real> {
        use TabulatedProperty::*;
        match self {
            Density => Ok(rho),
            InternalEnergy => source.e_from_rho_t(rho, t),
            Enthalpy => source.h_from_rho_t(rho, t),
            Entropy => source.s_from_rho_t(rho, t),
            Cv => source.cv_from_rho_t(rho, t),
            Cp => source.cp_from_rho_t(rho, t),
            SpeedOfSound => source.c_from_rho_t(rho, t),
            Viscosity => source.mu_from_rho_t(rho, t),
            Conductivity => source.k_from_rho_t(rho, t),
        }
    }
}

/// What a query outside the tabulated range does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OutOfBounds {
    /// Return a `Domain` error naming the offending variable.
    #[default]
    Error,
    /// Evaluate at the closest point of the table.
    Clamp,
    /// Clamp and log a warning.
    WarnAndClamp,
}

/// Grid extent and behavior of a [`TabulatedFluid`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TabulationConfig {
    /// Temperature range [K]
    pub t_min: Real,
    pub t_max: Real,
    /// Pressure range [Pa]
    pub p_min: Real,
    pub p_max: Real,
    /// Number of temperature nodes
    pub num_t: usize,
    /// Number of pressure nodes
    pub num_p: usize,
    /// Properties to tabulate. Density is always included; properties the
    /// source does not provide are skipped.
    pub properties: Vec<TabulatedProperty>,
    pub out_of_bounds: OutOfBounds,
    /// Newton settings and starting point of the inversions
    pub inversion: InversionConfig,
}

impl Default for TabulationConfig {
    fn default() -> Self {
        Self {
            t_min: 300.0,
            t_max: 500.0,
            p_min: 1e5,
            p_max: 50e6,
            num_t: 100,
            num_p: 100,
            properties: TabulatedProperty::ALL.to_vec(),
            out_of_bounds: OutOfBounds::Error,
            inversion: InversionConfig::default(),
        }
    }
}

impl TabulationConfig {
    fn validate(&self, fluid: &str) -> FluidResult<()> {
        let invalid = |what: String| Err(FluidError::invalid_input(fluid, "tabulate", what));
        if self.num_t < 2 || self.num_p < 2 {
            return invalid(format!(
                "tables need at least 2 nodes per axis, got {} x {}",
                self.num_p, self.num_t
            ));
        }
        if !(self.t_min > 0.0 && self.t_min < self.t_max && self.t_max.is_finite()) {
            return invalid(format!(
                "temperature range ({}, {}) is not valid",
                self.t_min, self.t_max
            ));
        }
        if !(self.p_min >= 0.0 && self.p_min < self.p_max && self.p_max.is_finite()) {
            return invalid(format!("pressure range ({}, {}) is not valid", self.p_min, self.p_max));
        }
        Ok(())
    }
}

/// Equally spaced axis.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Axis {
    min: Real,
    max: Real,
    n: usize,
}

impl Axis {
    fn step(&self) -> Real {
        (self.max - self.min) / (self.n - 1) as Real
    }

    fn node(&self, i: usize) -> Real {
        if i == self.n - 1 {
            self.max
        } else {
            self.min + i as Real * self.step()
        }
    }

    /// Cell index and local coordinate of `x`; outside the axis the end cell
    /// is extended.
    fn locate(&self, x: Real) -> (usize, Real) {
        let h = self.step();
        let i = (((x - self.min) / h).floor().max(0.0) as usize).min(self.n - 2);
        (i, (x - self.node(i)) / h)
    }
}

/// Node values and slopes of one property, row-major in (p, T).
#[derive(Clone, Debug, PartialEq)]
struct PropertyTable {
    values: Vec<Real>,
    d_p: Vec<Real>,
    d_t: Vec<Real>,
    d_pt: Vec<Real>,
}

impl PropertyTable {
    fn from_nodes(values: Vec<Real>, p: &Axis, t: &Axis) -> Self {
        let (np, nt) = (p.n, t.n);
        let d_t: Vec<Real> = values
            .chunks(nt)
            .flat_map(|row| spline_slopes(row, t.step()))
            .collect();

        let along_p = |grid: &[Real]| {
            let mut out = vec![0.0; grid.len()];
            for j in 0..nt {
                let column: Vec<Real> = (0..np).map(|i| grid[i * nt + j]).collect();
                for (i, m) in spline_slopes(&column, p.step()).into_iter().enumerate() {
                    out[i * nt + j] = m;
                }
            }
            out
        };
        let d_p = along_p(&values);
        let d_pt = along_p(&d_t);
        Self {
            values,
            d_p,
            d_t,
            d_pt,
        }
    }
}

/// Node slopes of the natural cubic spline through equally spaced `y`.
fn spline_slopes(y: &[Real], h: Real) -> Vec<Real> {
    let n = y.len();
    let mut diag = vec![4.0; n];
    diag[0] = 2.0;
    diag[n - 1] = 2.0;
    let mut rhs: Vec<Real> = (0..n)
        .map(|i| {
            let (lo, hi) = (i.saturating_sub(1), (i + 1).min(n - 1));
            3.0 * (y[hi] - y[lo]) / h
        })
        .collect();

    // Thomas algorithm, unit off-diagonals
    for i in 1..n {
        let w = 1.0 / diag[i - 1];
        diag[i] -= w;
        rhs[i] -= w * rhs[i - 1];
    }
    let mut m = vec![0.0; n];
    m[n - 1] = rhs[n - 1] / diag[n - 1];
    for i in (0..n - 1).rev() {
        m[i] = (rhs[i] - m[i + 1]) / diag[i];
    }
    m
}

/// Cubic Hermite basis `[h00, h10, h01, h11]` at `u` and its derivative.
fn hermite(u: Real) -> ([Real; 4], [Real; 4]) {
    let (u2, u3) = (u * u, u * u * u);
    (
        [2.0 * u3 - 3.0 * u2 + 1.0, u3 - 2.0 * u2 + u, -2.0 * u3 + 3.0 * u2, u3 - u2],
        [6.0 * u2 - 6.0 * u, 3.0 * u2 - 4.0 * u + 1.0, -6.0 * u2 + 6.0 * u, 3.0 * u2 - 2.0 * u],
    )
}

/// Fluid whose properties are interpolated from (p,T) tables.
#[derive(Clone, Debug, PartialEq)]
pub struct TabulatedFluid {
    name: String,
    molar_mass: Real,
    critical_pressure: Option<Real>,
    critical_temperature: Option<Real>,
    critical_density: Option<Real>,
    triple_point_pressure: Option<Real>,
    triple_point_temperature: Option<Real>,
    config: TabulationConfig,
    p_axis: Axis,
    t_axis: Axis,
    tables: BTreeMap<TabulatedProperty, PropertyTable>,
}

impl TabulatedFluid {
    /// Tabulate `source` on the grid described by `config`.
    ///
    /// # Errors
    /// `InvalidInput` for a degenerate grid; any error the source raises at a
    /// node, except `NotImplemented` for a property other than density, which
    /// drops that property from the tables.
    pub fn from_fluid(
        source: &dyn SinglePhaseFluid,
        config: TabulationConfig,
    ) -> FluidResult<Self> {
        let name = source.fluid_name().to_string();
        config.validate(&name)?;

        let p_axis = Axis {
            min: config.p_min,
            max: config.p_max,
            n: config.num_p,
        };
        let t_axis = Axis {
            min: config.t_min,
            max: config.t_max,
            n: config.num_t,
        };

        let mut properties = vec![TabulatedProperty::Density];
        let rho0 = source.rho_from_p_t(p_axis.min, t_axis.min)?;
        for &prop in &config.properties {
            if properties.contains(&prop) {
                continue;
            }
            match prop.evaluate(source, rho0, t_axis.min) {
                Ok(_) => properties.push(prop),
                Err(err) if err.kind() == ErrorKind::NotImplemented => {
                    tracing::debug!(fluid = %name, ?prop, "property not provided, not tabulated");
                }
                Err(err) => return Err(err),
            }
        }

        let mut nodes: Vec<Vec<Real>> =
            vec![Vec::with_capacity(p_axis.n * t_axis.n); properties.len()];
        for i in 0..p_axis.n {
            let p = p_axis.node(i);
            for j in 0..t_axis.n {
                let t = t_axis.node(j);
                let rho = source.rho_from_p_t(p, t)?;
                for (column, prop) in nodes.iter_mut().zip(&properties) {
                    column.push(prop.evaluate(source, rho, t)?);
                }
            }
        }

        let tables = properties
            .iter()
            .zip(nodes)
            .map(|(&prop, values)| (prop, PropertyTable::from_nodes(values, &p_axis, &t_axis)))
            .collect();
        tracing::info!(
            fluid = %name,
            num_p = p_axis.n,
            num_t = t_axis.n,
            ?properties,
            "tabulated fluid properties"
        );

        Ok(Self {
            name,
            molar_mass: source.molar_mass(),
            critical_pressure: source.critical_pressure().ok(),
            critical_temperature: source.critical_temperature().ok(),
            critical_density: source.critical_density().ok(),
            triple_point_pressure: source.triple_point_pressure().ok(),
            triple_point_temperature: source.triple_point_temperature().ok(),
            config,
            p_axis,
            t_axis,
            tables,
        })
    }

    pub fn config(&self) -> &TabulationConfig {
        &self.config
    }

    /// Properties held in the tables.
    pub fn properties(&self) -> impl Iterator<Item = TabulatedProperty> + '_ {
        self.tables.keys().copied()
    }

    fn table(&self, prop: TabulatedProperty, op: &'static str) -> FluidResult<&PropertyTable> {
        self.tables
            .get(&prop)
            .ok_or_else(|| FluidError::not_implemented(&self.name, op))
    }

    fn index(&self, i: usize, j: usize) -> usize {
        i * self.t_axis.n + j
    }

    /// Bicubic value of `table` and its (p, T) derivatives.
    fn sample(&self, table: &PropertyTable, p: Real, t: Real) -> PropDerivs {
        let (i, u) = self.p_axis.locate(p);
        let (j, w) = self.t_axis.locate(t);
        let (hp, ht) = (self.p_axis.step(), self.t_axis.step());
        let (bu, dbu) = hermite(u);
        let (bw, dbw) = hermite(w);

        let (mut z, mut z_u, mut z_w) = (0.0, 0.0, 0.0);
        for a in 0..2 {
            for b in 0..2 {
                let k = self.index(i + a, j + b);
                let (vu, su, vw, sw) = (2 * a, 2 * a + 1, 2 * b, 2 * b + 1);
                let terms = [
                    (vu, vw, table.values[k]),
                    (su, vw, hp * table.d_p[k]),
                    (vu, sw, ht * table.d_t[k]),
                    (su, sw, hp * ht * table.d_pt[k]),
                ];
                for (iu, iw, c) in terms {
                    z += c * bu[iu] * bw[iw];
                    z_u += c * dbu[iu] * bw[iw];
                    z_w += c * bu[iu] * dbw[iw];
                }
            }
        }
        PropDerivs::new(z, z_u / hp, z_w / ht)
    }

    fn out_of_range(&self, var: &str, x: Real, axis: &Axis, op: &'static str) -> FluidError {
        FluidError::domain(
            &self.name,
            op,
            format!(
                "{var} {x} is outside the range of tabulated {} ({}, {})",
                var.to_lowercase(),
                axis.min,
                axis.max
            ),
        )
    }

    /// Apply the out-of-bounds policy to a (p,T) query.
    fn bounded(&self, p: Real, t: Real, op: &'static str) -> FluidResult<(Real, Real)> {
        let p_in = (self.p_axis.min..=self.p_axis.max).contains(&p);
        let t_in = (self.t_axis.min..=self.t_axis.max).contains(&t);
        if p_in && t_in {
            return Ok((p, t));
        }
        match self.config.out_of_bounds {
            OutOfBounds::Error if !p_in => Err(self.out_of_range("Pressure", p, &self.p_axis, op)),
            OutOfBounds::Error => Err(self.out_of_range("Temperature", t, &self.t_axis, op)),
            policy => {
                if policy == OutOfBounds::WarnAndClamp {
                    tracing::warn!(fluid = %self.name, p, t, op, "state outside tabulated range");
                }
                Ok((
                    p.clamp(self.p_axis.min, self.p_axis.max),
                    t.clamp(self.t_axis.min, self.t_axis.max),
                ))
            }
        }
    }

    /// Solved states are extrapolated rather than clamped; only the error
    /// policy rejects them.
    fn check_solution(&self, p: Real, t: Real, op: &'static str) -> FluidResult<()> {
        if self.config.out_of_bounds == OutOfBounds::Error {
            self.bounded(p, t, op)?;
        }
        Ok(())
    }

    fn at_p_t(
        &self,
        prop: TabulatedProperty,
        p: Real,
        t: Real,
        op: &'static str,
    ) -> FluidResult<PropDerivs> {
        let table = self.table(prop, op)?;
        let (p, t) = self.bounded(p, t, op)?;
        Ok(self.sample(table, p, t))
    }

    /// Pressure at (ρ, T) by Newton iteration on the density table, with ρ(p,T)
    /// and its derivatives at the solution.
    fn solve_p(&self, rho: Real, t: Real, op: &'static str) -> FluidResult<(Real, PropDerivs)> {
        let density = self.table(TabulatedProperty::Density, op)?;
        let guess = (rho * R_MOLAR / self.molar_mass * t).clamp(self.p_axis.min, self.p_axis.max);
        let residual = |p: Real| -> FluidResult<(Real, Real)> {
            let d = self.sample(density, p, t);
            Ok((d.value, d.d1))
        };
        let p = newton::newton_solve(rho, guess, residual, &self.config.inversion.newton)
            .map_err(|e| e.in_context(&self.name, op))?
            .x;
        self.check_solution(p, t, op)?;
        Ok((p, self.sample(density, p, t)))
    }

    /// `prop` at (ρ, T) with derivatives re-expressed in (ρ, T).
    fn at_rho_t(
        &self,
        prop: TabulatedProperty,
        rho: Real,
        t: Real,
        op: &'static str,
    ) -> FluidResult<PropDerivs> {
        let table = self.table(prop, op)?;
        let (p, rho_d) = self.solve_p(rho, t, op)?;
        let y = self.sample(table, p, t);
        Ok(PropDerivs::new(
            y.value,
            y.d1 / rho_d.d1,
            y.d2 - y.d1 * rho_d.d2 / rho_d.d1,
        ))
    }

    /// Temperature at which `prop(p, T)` equals `target`.
    fn solve_t(
        &self,
        prop: TabulatedProperty,
        p: Real,
        target: Real,
        op: &'static str,
    ) -> FluidResult<Real> {
        let table = self.table(prop, op)?;
        let residual = |t: Real| -> FluidResult<(Real, Real)> {
            let d = self.sample(table, p, t);
            Ok((d.value, d.d2))
        };
        let t = newton::newton_solve(
            target,
            self.config.inversion.t_initial_guess,
            residual,
            &self.config.inversion.newton,
        )
        .map_err(|e| e.in_context(&self.name, op))?
        .x;
        self.check_solution(p, t, op)?;
        Ok(t)
    }

    /// (p, T) at which `eval` reaches `targets`, and the inverse Jacobian
    /// `∂(p,T)/∂(targets)` there.
    fn solve_p_t<F>(
        &self,
        targets: Vector2<Real>,
        eval: F,
        op: &'static str,
    ) -> FluidResult<(Real, Real, Matrix2<Real>)>
    where
        F: Fn(Real, Real) -> FluidResult<(Vector2<Real>, Matrix2<Real>)>,
    {
        let z0 = Vector2::new(
            self.config.inversion.p_initial_guess,
            self.config.inversion.t_initial_guess,
        );
        let residual = |z: &Vector2<Real>| eval(z[0], z[1]);
        let z = newton::newton_solve_2d(targets, z0, residual, &self.config.inversion.newton)
            .map_err(|e| e.in_context(&self.name, op))?
            .x;
        self.check_solution(z[0], z[1], op)?;
        let (_, jacobian) = eval(z[0], z[1])?;
        let inverse = jacobian.try_inverse().ok_or_else(|| {
            FluidError::convergence(&self.name, op, "singular Jacobian at solution")
        })?;
        Ok((z[0], z[1], inverse))
    }

    /// (p, T) from (v, e) with the inverse Jacobian `∂(p,T)/∂(v,e)`.
    fn p_t_from_v_e(
        &self,
        v: Real,
        e: Real,
        op: &'static str,
    ) -> FluidResult<(Real, Real, Matrix2<Real>)> {
        let density = self.table(TabulatedProperty::Density, op)?;
        let energy = self.table(TabulatedProperty::InternalEnergy, op)?;
        let eval = |p: Real, t: Real| -> FluidResult<(Vector2<Real>, Matrix2<Real>)> {
            let rho = self.sample(density, p, t);
            let e = self.sample(energy, p, t);
            let dv = -1.0 / (rho.value * rho.value);
            Ok((
                Vector2::new(1.0 / rho.value, e.value),
                Matrix2::new(dv * rho.d1, dv * rho.d2, e.d1, e.d2),
            ))
        };
        self.solve_p_t(Vector2::new(v, e), eval, op)
    }
}

impl SinglePhaseFluid for TabulatedFluid {
    fn fluid_name(&self) -> &str {
        &self.name
    }

    fn molar_mass(&self) -> Real {
        self.molar_mass
    }

    fn critical_pressure(&self) -> FluidResult<Real> {
        self.critical_pressure
            .ok_or_else(|| FluidError::not_implemented(&self.name, "critical_pressure"))
    }

    fn critical_temperature(&self) -> FluidResult<Real> {
        self.critical_temperature
            .ok_or_else(|| FluidError::not_implemented(&self.name, "critical_temperature"))
    }

    fn critical_density(&self) -> FluidResult<Real> {
        self.critical_density
            .ok_or_else(|| FluidError::not_implemented(&self.name, "critical_density"))
    }

    fn triple_point_pressure(&self) -> FluidResult<Real> {
        self.triple_point_pressure
            .ok_or_else(|| FluidError::not_implemented(&self.name, "triple_point_pressure"))
    }

    fn triple_point_temperature(&self) -> FluidResult<Real> {
        self.triple_point_temperature
            .ok_or_else(|| FluidError::not_implemented(&self.name, "triple_point_temperature"))
    }

    // (ρ, T)

    fn p_from_rho_t(&self, rho: Real, t: Real) -> FluidResult<Real> {
        Ok(self.solve_p(rho, t, "p_from_rho_t")?.0)
    }

    fn p_from_rho_t_derivs(&self, rho: Real, t: Real) -> FluidResult<PropDerivs> {
        let (p, rho_d) = self.solve_p(rho, t, "p_from_rho_t")?;
        Ok(PropDerivs::new(p, 1.0 / rho_d.d1, -rho_d.d2 / rho_d.d1))
    }

    fn e_from_rho_t(&self, rho: Real, t: Real) -> FluidResult<Real> {
        Ok(self.e_from_rho_t_derivs(rho, t)?.value)
    }

    fn e_from_rho_t_derivs(&self, rho: Real, t: Real) -> FluidResult<PropDerivs> {
        self.at_rho_t(TabulatedProperty::InternalEnergy, rho, t, "e_from_rho_t")
    }

    fn h_from_rho_t(&self, rho: Real, t: Real) -> FluidResult<Real> {
        Ok(self.h_from_rho_t_derivs(rho, t)?.value)
    }

    fn h_from_rho_t_derivs(&self, rho: Real, t: Real) -> FluidResult<PropDerivs> {
        self.at_rho_t(TabulatedProperty::Enthalpy, rho, t, "h_from_rho_t")
    }

    fn s_from_rho_t(&self, rho: Real, t: Real) -> FluidResult<Real> {
        Ok(self.s_from_rho_t_derivs(rho, t)?.value)
    }

    fn s_from_rho_t_derivs(&self, rho: Real, t: Real) -> FluidResult<PropDerivs> {
        self.at_rho_t(TabulatedProperty::Entropy, rho, t, "s_from_rho_t")
    }

    fn cv_from_rho_t(&self, rho: Real, t: Real) -> FluidResult<Real> {
        Ok(self.cv_from_rho_t_derivs(rho, t)?.value)
    }

    fn cv_from_rho_t_derivs(&self, rho: Real, t: Real) -> FluidResult<PropDerivs> {
        self.at_rho_t(TabulatedProperty::Cv, rho, t, "cv_from_rho_t")
    }

    fn cp_from_rho_t(&self, rho: Real, t: Real) -> FluidResult<Real> {
        Ok(self.cp_from_rho_t_derivs(rho, t)?.value)
    }

    fn cp_from_rho_t_derivs(&self, rho: Real, t: Real) -> FluidResult<PropDerivs> {
        self.at_rho_t(TabulatedProperty::Cp, rho, t, "cp_from_rho_t")
    }

    fn c_from_rho_t(&self, rho: Real, t: Real) -> FluidResult<Real> {
        Ok(self.c_from_rho_t_derivs(rho, t)?.value)
    }

    fn c_from_rho_t_derivs(&self, rho: Real, t: Real) -> FluidResult<PropDerivs> {
        self.at_rho_t(TabulatedProperty::SpeedOfSound, rho, t, "c_from_rho_t")
    }

    fn mu_from_rho_t(&self, rho: Real, t: Real) -> FluidResult<Real> {
        Ok(self.mu_from_rho_t_derivs(rho, t)?.value)
    }

    fn mu_from_rho_t_derivs(&self, rho: Real, t: Real) -> FluidResult<PropDerivs> {
        self.at_rho_t(TabulatedProperty::Viscosity, rho, t, "mu_from_rho_t")
    }

    fn k_from_rho_t(&self, rho: Real, t: Real) -> FluidResult<Real> {
        Ok(self.k_from_rho_t_derivs(rho, t)?.value)
    }

    fn k_from_rho_t_derivs(&self, rho: Real, t: Real) -> FluidResult<PropDerivs> {
        self.at_rho_t(TabulatedProperty::Conductivity, rho, t, "k_from_rho_t")
    }

    // (p, T)

    fn rho_from_p_t(&self, p: Real, t: Real) -> FluidResult<Real> {
        Ok(self.rho_from_p_t_derivs(p, t)?.value)
    }

    fn rho_from_p_t_derivs(&self, p: Real, t: Real) -> FluidResult<PropDerivs> {
        self.at_p_t(TabulatedProperty::Density, p, t, "rho_from_p_t")
    }

    fn e_from_p_t(&self, p: Real, t: Real) -> FluidResult<Real> {
        Ok(self.e_from_p_t_derivs(p, t)?.value)
    }

    fn e_from_p_t_derivs(&self, p: Real, t: Real) -> FluidResult<PropDerivs> {
        self.at_p_t(TabulatedProperty::InternalEnergy, p, t, "e_from_p_t")
    }

    fn h_from_p_t(&self, p: Real, t: Real) -> FluidResult<Real> {
        Ok(self.h_from_p_t_derivs(p, t)?.value)
    }

    fn h_from_p_t_derivs(&self, p: Real, t: Real) -> FluidResult<PropDerivs> {
        self.at_p_t(TabulatedProperty::Enthalpy, p, t, "h_from_p_t")
    }

    fn s_from_p_t(&self, p: Real, t: Real) -> FluidResult<Real> {
        Ok(self.s_from_p_t_derivs(p, t)?.value)
    }

    fn s_from_p_t_derivs(&self, p: Real, t: Real) -> FluidResult<PropDerivs> {
        self.at_p_t(TabulatedProperty::Entropy, p, t, "s_from_p_t")
    }

    fn cv_from_p_t(&self, p: Real, t: Real) -> FluidResult<Real> {
        Ok(self.cv_from_p_t_derivs(p, t)?.value)
    }

    fn cv_from_p_t_derivs(&self, p: Real, t: Real) -> FluidResult<PropDerivs> {
        self.at_p_t(TabulatedProperty::Cv, p, t, "cv_from_p_t")
    }

    fn cp_from_p_t(&self, p: Real, t: Real) -> FluidResult<Real> {
        Ok(self.cp_from_p_t_derivs(p, t)?.value)
    }

    fn cp_from_p_t_derivs(&self, p: Real, t: Real) -> FluidResult<PropDerivs> {
        self.at_p_t(TabulatedProperty::Cp, p, t, "cp_from_p_t")
    }

    fn c_from_p_t(&self, p: Real, t: Real) -> FluidResult<Real> {
        Ok(self.c_from_p_t_derivs(p, t)?.value)
    }

    fn c_from_p_t_derivs(&self, p: Real, t: Real) -> FluidResult<PropDerivs> {
        self.at_p_t(TabulatedProperty::SpeedOfSound, p, t, "c_from_p_t")
    }

    fn mu_from_p_t(&self, p: Real, t: Real) -> FluidResult<Real> {
        Ok(self.mu_from_p_t_derivs(p, t)?.value)
    }

    fn mu_from_p_t_derivs(&self, p: Real, t: Real) -> FluidResult<PropDerivs> {
        self.at_p_t(TabulatedProperty::Viscosity, p, t, "mu_from_p_t")
    }

    fn k_from_p_t(&self, p: Real, t: Real) -> FluidResult<Real> {
        Ok(self.k_from_p_t_derivs(p, t)?.value)
    }

    fn k_from_p_t_derivs(&self, p: Real, t: Real) -> FluidResult<PropDerivs> {
        self.at_p_t(TabulatedProperty::Conductivity, p, t, "k_from_p_t")
    }

    // (v, e)

    fn t_from_v_e(&self, v: Real, e: Real) -> FluidResult<Real> {
        Ok(self.p_t_from_v_e(v, e, "t_from_v_e")?.1)
    }

    fn t_from_v_e_derivs(&self, v: Real, e: Real) -> FluidResult<PropDerivs> {
        let (_, t, inverse) = self.p_t_from_v_e(v, e, "t_from_v_e")?;
        Ok(PropDerivs::new(t, inverse[(1, 0)], inverse[(1, 1)]))
    }

    fn p_from_v_e(&self, v: Real, e: Real) -> FluidResult<Real> {
        Ok(self.p_t_from_v_e(v, e, "p_from_v_e")?.0)
    }

    fn p_from_v_e_derivs(&self, v: Real, e: Real) -> FluidResult<PropDerivs> {
        let (p, _, inverse) = self.p_t_from_v_e(v, e, "p_from_v_e")?;
        Ok(PropDerivs::new(p, inverse[(0, 0)], inverse[(0, 1)]))
    }

    // Other inversions

    fn e_from_p_rho(&self, p: Real, rho: Real) -> FluidResult<Real> {
        Ok(self.e_from_p_rho_derivs(p, rho)?.value)
    }

    fn e_from_p_rho_derivs(&self, p: Real, rho: Real) -> FluidResult<PropDerivs> {
        let op = "e_from_p_rho";
        let t = self.solve_t(TabulatedProperty::Density, p, rho, op)?;
        let rho_d = self.sample(self.table(TabulatedProperty::Density, op)?, p, t);
        let e = self.sample(self.table(TabulatedProperty::InternalEnergy, op)?, p, t);
        let dt_dp = -rho_d.d1 / rho_d.d2;
        Ok(PropDerivs::new(e.value, e.d1 + e.d2 * dt_dp, e.d2 / rho_d.d2))
    }

    fn t_from_p_h(&self, p: Real, h: Real) -> FluidResult<Real> {
        self.solve_t(TabulatedProperty::Enthalpy, p, h, "t_from_p_h")
    }

    fn rho_from_p_s(&self, p: Real, s: Real) -> FluidResult<Real> {
        let t = self.solve_t(TabulatedProperty::Entropy, p, s, "rho_from_p_s")?;
        let density = self.table(TabulatedProperty::Density, "rho_from_p_s")?;
        Ok(self.sample(density, p, t).value)
    }

    fn p_from_h_s(&self, h: Real, s: Real) -> FluidResult<Real> {
        let op = "p_from_h_s";
        let enthalpy = self.table(TabulatedProperty::Enthalpy, op)?;
        let entropy = self.table(TabulatedProperty::Entropy, op)?;
        let eval = |p: Real, t: Real| -> FluidResult<(Vector2<Real>, Matrix2<Real>)> {
            let h = self.sample(enthalpy, p, t);
            let s = self.sample(entropy, p, t);
            Ok((Vector2::new(h.value, s.value), Matrix2::new(h.d1, h.d2, s.d1, s.d2)))
        };
        Ok(self.solve_p_t(Vector2::new(h, s), eval, op)?.0)
    }
}
