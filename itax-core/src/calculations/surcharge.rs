//! Surcharge on high incomes, with marginal relief.
//!
//! Surcharge is a percentage of base tax, chosen by the band of taxable
//! income above the surcharge threshold. Crossing into a band raises the rate
//! on the whole base tax, so just above a band floor the extra tax can exceed
//! the extra income. Marginal relief caps the increase over the tax due at
//! the band floor (charged at the previous band's rate) to the income earned
//! above that floor.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::slab_tax::SlabTaxCalculator;
use crate::error::TaxError;
use crate::models::{Regime, TaxRules};

/// How a surcharge amount was arrived at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurchargeBreakdown {
    /// Rate of the band containing the taxable income.
    pub rate: Decimal,
    /// Floor of that band.
    pub lower_bound: Decimal,
    /// Amount by which the plain surcharge was reduced.
    pub marginal_relief: Decimal,
    /// Surcharge payable after relief.
    pub surcharge: Decimal,
}

impl SurchargeBreakdown {
    fn not_applicable() -> Self {
        Self {
            rate: Decimal::ZERO,
            lower_bound: Decimal::ZERO,
            marginal_relief: Decimal::ZERO,
            surcharge: Decimal::ZERO,
        }
    }
}

/// Computes surcharge for a regime, re-deriving base tax as needed.
#[derive(Debug, Clone, Copy)]
pub struct SurchargeCalculator<'a> {
    rules: &'a TaxRules,
    slab_tax: SlabTaxCalculator<'a>,
}

impl<'a> SurchargeCalculator<'a> {
    pub fn new(rules: &'a TaxRules) -> Self {
        Self {
            rules,
            slab_tax: SlabTaxCalculator::new(rules),
        }
    }

    /// Surcharge payable on `income`, after marginal relief.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use itax_core::calculations::SurchargeCalculator;
    /// use itax_core::{Regime, TaxRules};
    ///
    /// let rules = TaxRules::default();
    /// let calculator = SurchargeCalculator::new(&rules);
    ///
    /// // Base tax 3,037,500 in the 15% band, well clear of the 10M floor
    /// let surcharge = calculator.compute_surcharge(dec!(11000000), Regime::New, 30).unwrap();
    /// assert_eq!(surcharge, dec!(455625));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`TaxError::InvalidAge`] for a negative age under an age
    /// banded regime.
    pub fn compute_surcharge(
        &self,
        income: Decimal,
        regime: Regime,
        age: i32,
    ) -> Result<Decimal, TaxError> {
        Ok(self.surcharge_breakdown(income, regime, age)?.surcharge)
    }

    /// Surcharge together with the band and relief that produced it.
    pub fn surcharge_breakdown(
        &self,
        income: Decimal,
        regime: Regime,
        age: i32,
    ) -> Result<SurchargeBreakdown, TaxError> {
        let regime_rules = self.rules.regime(regime);
        regime_rules.slabs.table_for_age(age)?;

        let taxable = regime_rules.taxable_income(income);
        let Some(index) = regime_rules.surcharge.band_index_for(taxable) else {
            return Ok(SurchargeBreakdown::not_applicable());
        };
        let band = &regime_rules.surcharge.bands()[index];
        let rate_below = regime_rules.surcharge.rate_below(index);

        let base_tax = self.slab_tax.compute_base_tax(income, regime, age)?;
        let base_tax_at_lower_bound = self.slab_tax.compute_base_tax(
            band.floor + regime_rules.standard_deduction,
            regime,
            age,
        )?;

        let total_at_income = base_tax * (Decimal::ONE + band.rate);
        let total_at_lower_bound = base_tax_at_lower_bound * (Decimal::ONE + rate_below);
        let extra_tax = total_at_income - total_at_lower_bound;
        let extra_income = taxable - band.floor;

        if extra_tax > extra_income {
            let marginal_relief = extra_tax - extra_income;
            let surcharge = total_at_income - marginal_relief - base_tax;
            debug!(
                regime = %regime,
                taxable = %taxable,
                lower_bound = %band.floor,
                rate = %band.rate,
                marginal_relief = %marginal_relief,
                "Marginal relief applied to surcharge"
            );
            return Ok(SurchargeBreakdown {
                rate: band.rate,
                lower_bound: band.floor,
                marginal_relief,
                surcharge,
            });
        }

        Ok(SurchargeBreakdown {
            rate: band.rate,
            lower_bound: band.floor,
            marginal_relief: Decimal::ZERO,
            surcharge: base_tax * band.rate,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn breakdown(
        income: Decimal,
        regime: Regime,
    ) -> SurchargeBreakdown {
        let rules = TaxRules::default();
        SurchargeCalculator::new(&rules)
            .surcharge_breakdown(income, regime, 30)
            .unwrap()
    }

    #[test]
    fn no_surcharge_at_threshold() {
        let result = breakdown(dec!(5050000), Regime::Old);

        assert_eq!(result, SurchargeBreakdown::not_applicable());
    }

    #[test]
    fn no_surcharge_below_threshold() {
        let result = breakdown(dec!(4000000), Regime::New);

        assert_eq!(result.surcharge, dec!(0));
    }

    #[test]
    fn plain_surcharge_clear_of_band_floor() {
        let result = breakdown(dec!(11000000), Regime::New);

        // Base 3,037,500 × 1.15 = 3,493,125 vs 2,737,500 × 1.10 = 3,011,250
        // at the floor; extra tax 481,875 is under the extra 1,000,000.
        assert_eq!(result.rate, dec!(0.15));
        assert_eq!(result.lower_bound, dec!(10000000));
        assert_eq!(result.marginal_relief, dec!(0));
        assert_eq!(result.surcharge, dec!(455625));
    }

    #[test]
    fn marginal_relief_just_above_band_floor() {
        let result = breakdown(dec!(10100000), Regime::New);

        // Base 2,767,500 × 1.15 = 3,182,625; floor 3,011,250; extra tax
        // 171,375 against extra income 100,000.
        assert_eq!(result.marginal_relief, dec!(71375));
        assert_eq!(result.surcharge, dec!(343750));
    }

    #[test]
    fn marginal_relief_above_threshold() {
        let result = breakdown(dec!(5100000), Regime::Old);

        // Base 1,327,500 × 1.10 = 1,460,250; threshold tax 1,312,500.
        assert_eq!(result.marginal_relief, dec!(97750));
        assert_eq!(result.surcharge, dec!(35000));
    }

    #[test]
    fn newer_regime_caps_at_twenty_five_percent() {
        let result = breakdown(dec!(100050000), Regime::Newer);

        assert_eq!(result.rate, dec!(0.25));
        assert_eq!(result.lower_bound, dec!(20000000));
    }

    #[test]
    fn old_regime_top_band() {
        let result = breakdown(dec!(100050000), Regime::Old);

        assert_eq!(result.rate, dec!(0.37));
        assert_eq!(result.lower_bound, dec!(50000000));
        assert_eq!(result.marginal_relief, dec!(0));
    }

    #[test]
    fn surcharge_checks_age_below_threshold() {
        let rules = TaxRules::default();

        let result = SurchargeCalculator::new(&rules).compute_surcharge(dec!(100000), Regime::Old, -5);

        assert_eq!(result, Err(TaxError::InvalidAge(-5)));
    }
}
