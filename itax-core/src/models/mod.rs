mod age_band;
mod regime;
mod rules;
mod slab;
mod surcharge;
mod tax_result;

pub use age_band::AgeBand;
pub use regime::Regime;
pub use rules::{RegimeRules, SlabSchedule, TaxRules};
pub use slab::{Slab, SlabContribution, SlabTable};
pub use surcharge::SurchargeTable;
pub use tax_result::TaxResult;
