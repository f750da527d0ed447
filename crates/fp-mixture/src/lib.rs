//! fp-mixture: vapor mixtures built from single-phase fluids.
//!
//! Provides:
//! - The [`VaporMixtureFluid`] contract over (T,v), (v,e), (p,T) and (p,ρ),
//!   with derivatives in both state variables and every secondary mass fraction
//! - [`IdealRealGasMixture`]: a condensable primary vapor plus secondary
//!   vapors combined by partial pressures at a shared temperature
//! - Basis-conversion and component-sum combinators in [`convert`]
//!
//! # Example
//!
//! ```no_run
//! use fp_fluids::{IdealGasFluid, StiffenedGasFluid};
//! use fp_mixture::{IdealRealGasMixture, VaporMixtureFluid};
//!
//! let steam = StiffenedGasFluid::default();
//! let air = IdealGasFluid::default();
//! let mixture = IdealRealGasMixture::new(&steam, vec![&air]).unwrap();
//!
//! let x = [0.3];
//! let v = mixture.v_from_p_t(1e5, 800.0, &x).unwrap();
//! let e = mixture.e_from_t_v(800.0, v, &x).unwrap();
//! println!("v = {v:.4} m³/kg, e = {e:.1} J/kg");
//! ```

pub mod composition;
pub mod config;
pub mod convert;
pub mod error;
pub mod fluid;
pub mod ideal_real_gas;

pub use composition::{MassFractions, primary_mass_fraction};
pub use config::MixtureConfig;
pub use error::{MixtureError, MixtureResult};
pub use fluid::{MixDerivs, VaporMixtureFluid};
pub use ideal_real_gas::IdealRealGasMixture;
