use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::round_to_paise;
use crate::models::Regime;

/// Complete liability for one income under one regime.
///
/// Every field is derived; `total_tax` always equals
/// `base_tax + surcharge + cess`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    pub regime: Regime,
    pub income: Decimal,
    /// Income after the standard deduction, floored at zero.
    pub taxable_income: Decimal,
    pub base_tax: Decimal,
    /// Surcharge after any marginal relief.
    pub surcharge: Decimal,
    /// Relief already subtracted from `surcharge`.
    pub marginal_relief: Decimal,
    pub cess: Decimal,
    pub total_tax: Decimal,
}

impl TaxResult {
    /// The same result with every amount rounded half-up to two places.
    pub fn rounded(&self) -> Self {
        Self {
            regime: self.regime,
            income: round_to_paise(self.income),
            taxable_income: round_to_paise(self.taxable_income),
            base_tax: round_to_paise(self.base_tax),
            surcharge: round_to_paise(self.surcharge),
            marginal_relief: round_to_paise(self.marginal_relief),
            cess: round_to_paise(self.cess),
            total_tax: round_to_paise(self.total_tax),
        }
    }

    /// Total tax as a share of gross income; zero for non-positive income.
    pub fn effective_rate(&self) -> Decimal {
        if self.income <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        self.total_tax / self.income
    }
}
