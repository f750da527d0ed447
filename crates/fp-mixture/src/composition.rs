//! Mass fractions of a primary vapor and its secondary vapors.
//!
//! Callers pass the secondary mass fractions only; the primary fraction is
//! whatever remains, `1 − Σx`.

use crate::error::{MixtureError, MixtureResult};
use fp_core::Real;

/// Primary mass fraction implied by the secondary fractions.
pub fn primary_mass_fraction(x: &[Real]) -> Real {
    1.0 - x.iter().sum::<Real>()
}

/// Apparent molar mass `M* = 1 / Σ (xⱼ / Mⱼ)` from (mass fraction, molar mass) pairs.
pub fn apparent_molar_mass(components: impl IntoIterator<Item = (Real, Real)>) -> Real {
    1.0 / components
        .into_iter()
        .map(|(x, molar_mass)| x / molar_mass)
        .sum::<Real>()
}

/// Validated secondary mass fractions together with the implied primary one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MassFractions<'x> {
    secondary: &'x [Real],
    primary: Real,
}

impl<'x> MassFractions<'x> {
    /// Check `x` against a mixture with `n_secondary` secondary vapors.
    ///
    /// Every component, the primary included, must be present with a finite
    /// fraction in (0, 1): each one is evaluated at `v / xⱼ`.
    pub fn new(x: &'x [Real], n_secondary: usize) -> MixtureResult<Self> {
        if x.len() != n_secondary {
            return Err(MixtureError::composition(format!(
                "expected {n_secondary} secondary mass fractions, got {}",
                x.len()
            )));
        }
        if let Some(bad) = x.iter().find(|xi| !(xi.is_finite() && **xi > 0.0 && **xi < 1.0)) {
            return Err(MixtureError::composition(format!(
                "secondary mass fraction {bad} is outside (0, 1)"
            )));
        }

        let primary = primary_mass_fraction(x);
        if primary <= 0.0 {
            return Err(MixtureError::composition(format!(
                "secondary mass fractions leave no primary vapor (x_primary = {primary})"
            )));
        }

        Ok(Self {
            secondary: x,
            primary,
        })
    }

    pub fn primary(&self) -> Real {
        self.primary
    }

    pub fn secondary(&self) -> &'x [Real] {
        self.secondary
    }

    pub fn len(&self) -> usize {
        self.secondary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.secondary.is_empty()
    }

    /// Response of the primary fraction to secondary `i`, `dx_p/dxᵢ = −x_p / (1 − xᵢ)`.
    pub fn primary_sensitivity(&self, i: usize) -> Real {
        -self.primary / (1.0 - self.secondary[i])
    }

    /// Secondary fractions with `xᵢ` raised by `dx` and every other fraction
    /// scaled by `(1 − xᵢ − dx) / (1 − xᵢ)`, so the total stays 1.
    pub fn perturbed(&self, i: usize, dx: Real) -> Vec<Real> {
        let xi = self.secondary[i];
        let scale = (1.0 - (xi + dx)) / (1.0 - xi);
        self.secondary
            .iter()
            .enumerate()
            .map(|(j, &xj)| if j == i { xi + dx } else { xj * scale })
            .collect()
    }
}
