//! Base tax from progressive slab tables.
//!
//! Taxable income is gross income less the regime's standard deduction. The
//! old regime picks its table by age band; the newer regime waives tax
//! entirely up to its rebate limit before any slab is consulted.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use itax_core::calculations::SlabTaxCalculator;
//! use itax_core::{Regime, TaxRules};
//!
//! let rules = TaxRules::default();
//! let calculator = SlabTaxCalculator::new(&rules);
//!
//! // Taxable 550,000: 250,000 × 5% + 50,000 × 20%
//! let tax = calculator.compute_base_tax(dec!(600000), Regime::Old, 30).unwrap();
//! assert_eq!(tax, dec!(22500));
//! ```

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::error::TaxError;
use crate::models::{Regime, SlabContribution, TaxRules};

/// Applies a regime's slab table to gross income.
#[derive(Debug, Clone, Copy)]
pub struct SlabTaxCalculator<'a> {
    rules: &'a TaxRules,
}

impl<'a> SlabTaxCalculator<'a> {
    /// Creates a calculator over `rules`, which should already be validated.
    pub fn new(rules: &'a TaxRules) -> Self {
        Self { rules }
    }

    /// Taxable income for `regime`, floored at zero.
    pub fn taxable_income(
        &self,
        income: Decimal,
        regime: Regime,
    ) -> Decimal {
        let taxable = self.rules.regime(regime).taxable_income(income);
        if taxable < Decimal::ZERO {
            warn!(
                regime = %regime,
                income = %income,
                taxable = %taxable,
                "Income is below the standard deduction; taxable income floored at zero"
            );
        }
        taxable.max(Decimal::ZERO)
    }

    /// Base tax before surcharge and cess.
    ///
    /// # Errors
    ///
    /// Returns [`TaxError::InvalidAge`] when `regime` is age banded and
    /// `age` is negative.
    pub fn compute_base_tax(
        &self,
        income: Decimal,
        regime: Regime,
        age: i32,
    ) -> Result<Decimal, TaxError> {
        let tax = self
            .slab_breakdown(income, regime, age)?
            .iter()
            .map(|c| c.tax)
            .sum();
        Ok(tax)
    }

    /// Per-slab contributions making up the base tax.
    ///
    /// Empty when the rebate waives the tax.
    pub fn slab_breakdown(
        &self,
        income: Decimal,
        regime: Regime,
        age: i32,
    ) -> Result<Vec<SlabContribution>, TaxError> {
        let regime_rules = self.rules.regime(regime);
        let table = regime_rules.slabs.table_for_age(age)?;
        let taxable = self.taxable_income(income, regime);

        if let Some(limit) = regime_rules.rebate_limit.filter(|limit| taxable <= *limit) {
            debug!(
                regime = %regime,
                taxable = %taxable,
                rebate_limit = %limit,
                "Taxable income within rebate limit; base tax waived"
            );
            return Ok(Vec::new());
        }

        let contributions = table.contributions(taxable);
        debug!(
            regime = %regime,
            age,
            taxable = %taxable,
            slabs = contributions.len(),
            "Applied slab table"
        );
        Ok(contributions)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use tracing_subscriber::fmt::format::FmtSpan;

    use super::*;

    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_span_events(FmtSpan::NONE)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    fn base_tax(
        income: Decimal,
        regime: Regime,
        age: i32,
    ) -> Result<Decimal, TaxError> {
        let rules = TaxRules::default();
        SlabTaxCalculator::new(&rules).compute_base_tax(income, regime, age)
    }

    // =========================================================================
    // taxable_income tests
    // =========================================================================

    #[test]
    fn taxable_income_subtracts_standard_deduction() {
        let rules = TaxRules::default();
        let calculator = SlabTaxCalculator::new(&rules);

        assert_eq!(calculator.taxable_income(dec!(600000), Regime::Old), dec!(550000));
        assert_eq!(calculator.taxable_income(dec!(600000), Regime::New), dec!(600000));
        assert_eq!(calculator.taxable_income(dec!(600000), Regime::Newer), dec!(550000));
    }

    #[test]
    fn taxable_income_floors_negative_at_zero() {
        let _guard = init_test_tracing();
        let rules = TaxRules::default();
        let calculator = SlabTaxCalculator::new(&rules);

        assert_eq!(calculator.taxable_income(dec!(10000), Regime::Old), dec!(0));
    }

    // =========================================================================
    // compute_base_tax: old regime
    // =========================================================================

    #[test]
    fn old_regime_under_60() {
        assert_eq!(base_tax(dec!(600000), Regime::Old, 30), Ok(dec!(22500)));
    }

    #[test]
    fn old_regime_senior() {
        // Taxable 350,000: 50,000 × 5%
        assert_eq!(base_tax(dec!(400000), Regime::Old, 65), Ok(dec!(2500)));
    }

    #[test]
    fn old_regime_super_senior_skips_five_percent_band() {
        // Taxable 750,000: 250,000 × 20%
        assert_eq!(base_tax(dec!(800000), Regime::Old, 85), Ok(dec!(50000)));
    }

    #[test]
    fn old_regime_income_within_zero_band() {
        assert_eq!(base_tax(dec!(300000), Regime::Old, 30), Ok(dec!(0)));
    }

    #[test]
    fn old_regime_income_below_deduction() {
        let _guard = init_test_tracing();

        assert_eq!(base_tax(dec!(20000), Regime::Old, 30), Ok(dec!(0)));
    }

    #[test]
    fn old_regime_rejects_negative_age() {
        assert_eq!(
            base_tax(dec!(600000), Regime::Old, -1),
            Err(TaxError::InvalidAge(-1))
        );
    }

    // =========================================================================
    // compute_base_tax: new regime
    // =========================================================================

    #[test]
    fn new_regime_has_no_deduction() {
        // 250,000 × 5% + 100,000 × 10%
        assert_eq!(base_tax(dec!(600000), Regime::New, 30), Ok(dec!(22500)));
    }

    #[test]
    fn new_regime_ignores_age() {
        assert_eq!(
            base_tax(dec!(600000), Regime::New, 30),
            base_tax(dec!(600000), Regime::New, 85)
        );
    }

    #[test]
    fn new_regime_top_slab() {
        // 187,500 across the lower slabs + 500,000 × 30%
        assert_eq!(base_tax(dec!(2000000), Regime::New, 30), Ok(dec!(337500)));
    }

    // =========================================================================
    // compute_base_tax: newer regime
    // =========================================================================

    #[test]
    fn newer_regime_rebate_at_limit() {
        let _guard = init_test_tracing();

        // Taxable 700,000 exactly
        assert_eq!(base_tax(dec!(750000), Regime::Newer, 30), Ok(dec!(0)));
    }

    #[test]
    fn newer_regime_rebate_cliff() {
        // Taxable 700,001: 300,000 × 5% + 100,001 × 10%
        assert_eq!(
            base_tax(dec!(750001), Regime::Newer, 30),
            Ok(dec!(25000.1))
        );
    }

    #[test]
    fn newer_regime_above_rebate() {
        // Taxable 1,000,000: 15,000 + 30,000 + 100,000 × 15%
        assert_eq!(base_tax(dec!(1050000), Regime::Newer, 30), Ok(dec!(60000)));
    }

    // =========================================================================
    // slab_breakdown tests
    // =========================================================================

    #[test]
    fn slab_breakdown_sums_to_base_tax() {
        let rules = TaxRules::default();
        let calculator = SlabTaxCalculator::new(&rules);

        let breakdown = calculator
            .slab_breakdown(dec!(1600000), Regime::Old, 30)
            .unwrap();
        let total: Decimal = breakdown.iter().map(|c| c.tax).sum();

        assert_eq!(breakdown.len(), 4);
        assert_eq!(
            Ok(total),
            calculator.compute_base_tax(dec!(1600000), Regime::Old, 30)
        );
    }

    #[test]
    fn slab_breakdown_is_empty_under_rebate() {
        let rules = TaxRules::default();
        let calculator = SlabTaxCalculator::new(&rules);

        let breakdown = calculator
            .slab_breakdown(dec!(700000), Regime::Newer, 30)
            .unwrap();

        assert!(breakdown.is_empty());
    }
}
