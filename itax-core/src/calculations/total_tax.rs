//! Total liability: base tax plus surcharge, grossed up by the cess.

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::slab_tax::SlabTaxCalculator;
use crate::calculations::surcharge::SurchargeCalculator;
use crate::error::TaxError;
use crate::models::{Regime, TaxResult, TaxRules};

/// Composes base tax, surcharge and cess.
#[derive(Debug, Clone, Copy)]
pub struct TotalTaxAggregator<'a> {
    rules: &'a TaxRules,
    slab_tax: SlabTaxCalculator<'a>,
    surcharge: SurchargeCalculator<'a>,
}

impl<'a> TotalTaxAggregator<'a> {
    pub fn new(rules: &'a TaxRules) -> Self {
        Self {
            rules,
            slab_tax: SlabTaxCalculator::new(rules),
            surcharge: SurchargeCalculator::new(rules),
        }
    }

    /// `(base tax + surcharge) × (1 + cess rate)`.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use itax_core::calculations::TotalTaxAggregator;
    /// use itax_core::{Regime, TaxRules};
    ///
    /// let rules = TaxRules::default();
    /// let total = TotalTaxAggregator::new(&rules)
    ///     .compute_total_tax(dec!(600000), Regime::Old, 30)
    ///     .unwrap();
    ///
    /// assert_eq!(total, dec!(23400));
    /// ```
    pub fn compute_total_tax(
        &self,
        income: Decimal,
        regime: Regime,
        age: i32,
    ) -> Result<Decimal, TaxError> {
        Ok(self.compute_tax_result(income, regime, age)?.total_tax)
    }

    /// Full breakdown of the liability on `income`.
    pub fn compute_tax_result(
        &self,
        income: Decimal,
        regime: Regime,
        age: i32,
    ) -> Result<TaxResult, TaxError> {
        let base_tax = self.slab_tax.compute_base_tax(income, regime, age)?;
        let surcharge = self.surcharge.surcharge_breakdown(income, regime, age)?;

        let tax_with_surcharge = base_tax + surcharge.surcharge;
        let cess = tax_with_surcharge * self.rules.cess_rate;
        let total_tax = tax_with_surcharge + cess;

        debug!(
            regime = %regime,
            income = %income,
            base_tax = %base_tax,
            surcharge = %surcharge.surcharge,
            cess = %cess,
            total_tax = %total_tax,
            "Computed total tax"
        );

        Ok(TaxResult {
            regime,
            income,
            taxable_income: self.slab_tax.taxable_income(income, regime),
            base_tax,
            surcharge: surcharge.surcharge,
            marginal_relief: surcharge.marginal_relief,
            cess,
            total_tax,
        })
    }
}
