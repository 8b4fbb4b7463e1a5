//! Tax calculation modules.
//!
//! Data flows one way: gross income → taxable income → base tax
//! ([`SlabTaxCalculator`]) → surcharge ([`SurchargeCalculator`]) → total tax
//! ([`TotalTaxAggregator`]). [`InverseTaxResolver`] runs the old-regime
//! pipeline backwards.

pub mod common;
pub mod inverse;
pub mod slab_tax;
pub mod surcharge;
pub mod total_tax;

pub use inverse::{IncomeResolution, InverseFormula, InverseSegment, InverseTaxResolver};
pub use slab_tax::SlabTaxCalculator;
pub use surcharge::{SurchargeBreakdown, SurchargeCalculator};
pub use total_tax::TotalTaxAggregator;
