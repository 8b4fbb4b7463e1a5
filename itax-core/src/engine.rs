//! Entry point bundling validated rules with every calculator.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use itax_core::{IncomeResolution, Regime, TaxEngine, TaxRules};
//!
//! let engine = TaxEngine::new(TaxRules::default()).unwrap();
//!
//! let total = engine.compute_total_tax(dec!(600000), Regime::Old, 30).unwrap();
//! assert_eq!(total, dec!(23400));
//!
//! let income = engine.resolve_income_from_tax(total).unwrap();
//! assert_eq!(income, IncomeResolution::Exact(dec!(600000)));
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::{
    IncomeResolution, InverseTaxResolver, SlabTaxCalculator, SurchargeBreakdown,
    SurchargeCalculator, TotalTaxAggregator,
};
use crate::error::TaxError;
use crate::models::{Regime, SlabContribution, TaxResult, TaxRules};

/// Validated tax rules together with the generated old-regime inverse.
#[derive(Debug, Clone)]
pub struct TaxEngine {
    rules: TaxRules,
    inverse: InverseTaxResolver,
}

impl TaxEngine {
    /// Validates `rules` and builds the inverse table from them.
    ///
    /// # Errors
    ///
    /// Returns [`TaxError::InvalidRules`] if the rules fail validation or the
    /// old regime cannot be inverted.
    pub fn new(rules: TaxRules) -> Result<Self, TaxError> {
        rules.validate()?;
        let inverse = InverseTaxResolver::new(&rules)?;
        Ok(Self { rules, inverse })
    }

    /// Builds an engine from a TOML rules document.
    pub fn from_toml_str(document: &str) -> Result<Self, TaxError> {
        Self::new(TaxRules::from_toml_str(document)?)
    }

    pub fn rules(&self) -> &TaxRules {
        &self.rules
    }

    pub fn inverse(&self) -> &InverseTaxResolver {
        &self.inverse
    }

    pub fn compute_base_tax(
        &self,
        income: Decimal,
        regime: Regime,
        age: i32,
    ) -> Result<Decimal, TaxError> {
        SlabTaxCalculator::new(&self.rules).compute_base_tax(income, regime, age)
    }

    pub fn slab_breakdown(
        &self,
        income: Decimal,
        regime: Regime,
        age: i32,
    ) -> Result<Vec<SlabContribution>, TaxError> {
        SlabTaxCalculator::new(&self.rules).slab_breakdown(income, regime, age)
    }

    pub fn compute_surcharge(
        &self,
        income: Decimal,
        regime: Regime,
        age: i32,
    ) -> Result<Decimal, TaxError> {
        SurchargeCalculator::new(&self.rules).compute_surcharge(income, regime, age)
    }

    pub fn surcharge_breakdown(
        &self,
        income: Decimal,
        regime: Regime,
        age: i32,
    ) -> Result<SurchargeBreakdown, TaxError> {
        SurchargeCalculator::new(&self.rules).surcharge_breakdown(income, regime, age)
    }

    pub fn compute_total_tax(
        &self,
        income: Decimal,
        regime: Regime,
        age: i32,
    ) -> Result<Decimal, TaxError> {
        TotalTaxAggregator::new(&self.rules).compute_total_tax(income, regime, age)
    }

    pub fn compute_tax_result(
        &self,
        income: Decimal,
        regime: Regime,
        age: i32,
    ) -> Result<TaxResult, TaxError> {
        TotalTaxAggregator::new(&self.rules).compute_tax_result(income, regime, age)
    }

    /// Old-regime (under 60) gross income whose total tax is `tax`.
    pub fn resolve_income_from_tax(
        &self,
        tax: Decimal,
    ) -> Result<IncomeResolution, TaxError> {
        self.inverse.resolve_income_from_tax(tax)
    }

    /// Extra exemption, beyond its standard deduction, that the old regime
    /// needs for its tax to match what `regime` charges on `income`.
    ///
    /// With `N` the tax under `regime`, `O` old-regime tax and `Q` the
    /// inverse of `O`, this solves `N(I) = O(I - E)` as `E = I - Q(N(I))`.
    /// When `N(I)` is zero any old-regime income in the zero-tax band
    /// matches, so the minimum is whatever brings `I` down to that band.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use itax_core::{Regime, TaxEngine, TaxRules};
    ///
    /// let engine = TaxEngine::new(TaxRules::default()).unwrap();
    ///
    /// let exemption = engine
    ///     .minimum_exemption_for_regime_equivalence(dec!(1050000), Regime::Newer, 30)
    ///     .unwrap();
    ///
    /// // Newer regime: net tax 60,000 → old-regime income 787,500.
    /// assert_eq!(exemption, dec!(262500));
    /// ```
    pub fn minimum_exemption_for_regime_equivalence(
        &self,
        income: Decimal,
        regime: Regime,
        age: i32,
    ) -> Result<Decimal, TaxError> {
        let total_tax = self.compute_total_tax(income, regime, age)?;
        let exemption = match self.resolve_income_from_tax(total_tax)? {
            IncomeResolution::Exact(old_income) => income - old_income,
            IncomeResolution::Indeterminate { up_to } => (income - up_to).max(Decimal::ZERO),
        };
        debug!(
            regime = %regime,
            income = %income,
            total_tax = %total_tax,
            exemption = %exemption,
            "Computed minimum exemption for regime equivalence"
        );
        Ok(exemption)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::error::RulesError;

    fn engine() -> TaxEngine {
        TaxEngine::new(TaxRules::default()).unwrap()
    }

    #[test]
    fn new_rejects_invalid_rules() {
        let rules = TaxRules {
            cess_rate: dec!(-0.04),
            ..TaxRules::default()
        };

        let result = TaxEngine::new(rules);

        assert!(matches!(
            result,
            Err(TaxError::InvalidRules(RulesError::InvalidCessRate(_)))
        ));
    }

    #[test]
    fn from_toml_str_reports_parse_errors() {
        let result = TaxEngine::from_toml_str("not toml at all = = =");

        assert!(matches!(
            result,
            Err(TaxError::InvalidRules(RulesError::Parse(_)))
        ));
    }

    #[test]
    fn engine_exposes_each_calculator() {
        let engine = engine();

        assert_eq!(
            engine.compute_base_tax(dec!(11000000), Regime::New, 30),
            Ok(dec!(3037500))
        );
        assert_eq!(
            engine.compute_surcharge(dec!(11000000), Regime::New, 30),
            Ok(dec!(455625))
        );
        assert_eq!(
            engine.compute_total_tax(dec!(11000000), Regime::New, 30),
            Ok(dec!(3632850))
        );
    }

    // =========================================================================
    // minimum_exemption_for_regime_equivalence tests
    // =========================================================================

    #[test]
    fn exemption_against_old_regime_itself_is_zero() {
        let exemption = engine()
            .minimum_exemption_for_regime_equivalence(dec!(2000000), Regime::Old, 30)
            .unwrap();

        assert_eq!(exemption, dec!(0));
    }

    #[test]
    fn exemption_against_new_regime() {
        // New regime on 1,500,000: 187,500 net → old taxable 1,250,000.
        let exemption = engine()
            .minimum_exemption_for_regime_equivalence(dec!(1500000), Regime::New, 30)
            .unwrap();

        assert_eq!(exemption, dec!(200000));
    }

    #[test]
    fn exemption_when_regime_charges_nothing() {
        // Newer regime rebate: zero tax, old regime needs income ≤ 300,000.
        let exemption = engine()
            .minimum_exemption_for_regime_equivalence(dec!(750000), Regime::Newer, 30)
            .unwrap();

        assert_eq!(exemption, dec!(450000));
    }

    #[test]
    fn exemption_is_zero_for_income_already_untaxed() {
        let exemption = engine()
            .minimum_exemption_for_regime_equivalence(dec!(200000), Regime::New, 30)
            .unwrap();

        assert_eq!(exemption, dec!(0));
    }

    #[test]
    fn exemption_rejects_invalid_age() {
        let result =
            engine().minimum_exemption_for_regime_equivalence(dec!(2000000), Regime::Old, -1);

        assert_eq!(result, Err(TaxError::InvalidAge(-1)));
    }
}
