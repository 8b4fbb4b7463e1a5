//! Income tax under the old, new (2020) and newer (2023) Indian regimes:
//! progressive slabs, surcharge with marginal relief, cess, and the inverse
//! mapping from old-regime tax back to income.

pub mod calculations;
pub mod engine;
pub mod error;
pub mod models;

pub use calculations::{IncomeResolution, SurchargeBreakdown};
pub use engine::TaxEngine;
pub use error::{RulesError, TaxError};
pub use models::*;
