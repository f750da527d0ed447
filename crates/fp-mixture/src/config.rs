//! Mixture configuration.

use fp_core::Real;

/// Settings shared by every query on one mixture.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MixtureConfig {
    /// Name used in error messages and logs
    pub name: String,
    /// Upper temperature bound for the (v,e) and (p,v) inversions [K]
    pub t_mix_max: Real,
}

impl Default for MixtureConfig {
    fn default() -> Self {
        Self {
            name: "ideal_real_gas_mixture".to_string(),
            t_mix_max: 1300.0,
        }
    }
}
