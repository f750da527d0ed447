//! fp-fluids: single-phase fluid properties.
//!
//! Provides:
//! - The [`SinglePhaseFluid`] contract: properties from (ρ,T), (p,T), (T,v),
//!   (v,e) and the usual inversions, each with a derivative-carrying form
//! - Helmholtz-energy equations of state for CO2, nitrogen, hydrogen and methane
//! - Ideal gas and stiffened gas fluids in closed form
//! - Fluids interpolated from (p,T) tables of any of the above
//! - A `uom`-typed extension trait for callers outside the numerical core
//!
//! # Example
//!
//! ```no_run
//! use fp_fluids::{NitrogenFluid, SinglePhaseFluid};
//!
//! let n2 = NitrogenFluid::default();
//! let rho = n2.rho_from_p_t(1e6, 280.0).unwrap();
//! let h = n2.h_from_rho_t(rho, 280.0).unwrap();
//! println!("rho = {rho:.4} kg/m³, h = {h:.1} J/kg");
//! ```

pub mod co2;
pub mod error;
pub mod fluid;
pub mod helmholtz;
pub mod hydrogen;
pub mod ideal_gas;
pub mod methane;
pub mod nitrogen;
pub mod stiffened_gas;
pub mod tabulated;
pub mod typed;

pub use co2::{Co2, Co2Fluid};
pub use error::{ErrorKind, FluidError, FluidResult};
pub use fluid::{PropDerivs, SinglePhaseFluid};
pub use helmholtz::{HelmholtzEos, HelmholtzFluid, InversionConfig};
pub use hydrogen::{Hydrogen, HydrogenFluid};
pub use ideal_gas::{IdealGasFluid, IdealGasParams};
pub use methane::{Methane, MethaneFluid};
pub use nitrogen::{Nitrogen, NitrogenFluid};
pub use stiffened_gas::{StiffenedGasFluid, StiffenedGasParams};
pub use tabulated::{OutOfBounds, TabulatedFluid, TabulatedProperty, TabulationConfig};
pub use typed::{PropertyPack, SinglePhaseFluidExt};
