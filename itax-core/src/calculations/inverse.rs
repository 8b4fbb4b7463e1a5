//! Income recovered from total tax under the old regime.
//!
//! Old-regime total tax (under-60 slabs) is a continuous, piecewise-linear,
//! non-decreasing function of income. Every taxed piece is strictly
//! increasing and therefore invertible; only the zero-rate band maps many
//! incomes to the same (zero) tax.
//!
//! The pieces are generated from the slab, surcharge, deduction and cess
//! parameters when the resolver is built, so they always track the forward
//! calculation. With the default rules there are eleven of them:
//!
//! | Net tax up to     | Formula                                  |
//! |-------------------|------------------------------------------|
//! | 12,500            | 5% slab                                  |
//! | 112,500           | 20% slab                                 |
//! | 1,312,500         | 30% slab, up to the surcharge threshold  |
//! | 1,508,395.52…     | marginal relief above 5M                 |
//! | 3,093,750         | 30% slab with 10% surcharge              |
//! | 3,308,444.65…     | marginal relief above 10M                |
//! | 6,684,375         | 30% slab with 15% surcharge              |
//! | 7,614,375         | marginal relief above 20M                |
//! | 18,515,625        | 30% slab with 25% surcharge              |
//! | 21,533,451.82…    | marginal relief above 50M                |
//! | ∞                 | 30% slab with 37% surcharge              |
//!
//! "Net tax" is total tax with the cess removed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::lower_ceiling;
use crate::error::{RulesError, TaxError};
use crate::models::{Slab, SlabTable, SurchargeTable, TaxRules};

/// Outcome of resolving an income from a tax amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncomeResolution {
    /// The unique gross income that produces the tax.
    Exact(Decimal),
    /// Zero tax: any gross income from zero up to `up_to` produces it.
    Indeterminate { up_to: Decimal },
}

/// Closed-form inverse on one piece; yields taxable income from net tax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InverseFormula {
    /// Plain slab: `floor + (t - tax_at_floor) / rate`.
    SlabRate {
        floor: Decimal,
        tax_at_floor: Decimal,
        rate: Decimal,
    },
    /// Marginal relief: every rupee above `lower_bound` goes to tax, so
    /// `lower_bound + (t - tax_at_lower_bound)`.
    MarginalRelief {
        lower_bound: Decimal,
        tax_at_lower_bound: Decimal,
    },
    /// Slab with surcharge on the whole base tax:
    /// `floor + (t / (1 + surcharge_rate) - tax_at_floor) / rate`.
    Surcharged {
        floor: Decimal,
        tax_at_floor: Decimal,
        rate: Decimal,
        surcharge_rate: Decimal,
    },
}

impl InverseFormula {
    fn slab(
        table: &SlabTable,
        slab: &Slab,
    ) -> Self {
        Self::SlabRate {
            floor: slab.floor,
            tax_at_floor: table.tax_on(slab.floor),
            rate: slab.rate,
        }
    }

    fn surcharged(
        table: &SlabTable,
        slab: &Slab,
        surcharge_rate: Decimal,
    ) -> Self {
        Self::Surcharged {
            floor: slab.floor,
            tax_at_floor: table.tax_on(slab.floor),
            rate: slab.rate,
            surcharge_rate,
        }
    }

    /// Taxable income producing `net_tax` on this piece, or `None` if the
    /// result does not fit in a [`Decimal`].
    pub fn taxable_income(
        &self,
        net_tax: Decimal,
    ) -> Option<Decimal> {
        match *self {
            Self::SlabRate {
                floor,
                tax_at_floor,
                rate,
            } => net_tax
                .checked_sub(tax_at_floor)?
                .checked_div(rate)?
                .checked_add(floor),
            Self::MarginalRelief {
                lower_bound,
                tax_at_lower_bound,
            } => net_tax
                .checked_sub(tax_at_lower_bound)?
                .checked_add(lower_bound),
            Self::Surcharged {
                floor,
                tax_at_floor,
                rate,
                surcharge_rate,
            } => net_tax
                .checked_div(Decimal::ONE + surcharge_rate)?
                .checked_sub(tax_at_floor)?
                .checked_div(rate)?
                .checked_add(floor),
        }
    }
}

/// One piece of the inverse, covering net tax in `(lower, upper]`.
///
/// Consecutive pieces usually meet. Where surcharge jumps at a band floor
/// they do not, and net tax in the gap has no income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InverseSegment {
    /// Exclusive lower bound of net tax.
    pub lower: Decimal,
    /// Inclusive upper bound of net tax; `None` is unbounded.
    pub upper: Option<Decimal>,
    pub formula: InverseFormula,
}

/// Piecewise inverse of old-regime total tax for taxpayers under 60.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InverseTaxResolver {
    segments: Vec<InverseSegment>,
    standard_deduction: Decimal,
    cess_multiplier: Decimal,
    zero_tax_ceiling: Decimal,
}

impl InverseTaxResolver {
    /// Builds the inverse from the old regime's under-60 table and surcharge.
    ///
    /// # Errors
    ///
    /// Returns [`TaxError::InvalidRules`] when the old regime carries a
    /// rebate (its cliff has no inverse) or taxes nothing.
    pub fn new(rules: &TaxRules) -> Result<Self, TaxError> {
        let old = &rules.old;
        if old.rebate_limit.is_some() {
            return Err(RulesError::RebateNotInvertible.into());
        }
        let table = old.slabs.primary_table();
        let zero_rate_ceiling = table.zero_rate_ceiling().ok_or(RulesError::NoTaxableSlab)?;

        let segments = build_segments(table, &old.surcharge);
        debug!(segments = segments.len(), "Built old regime inverse");

        Ok(Self {
            segments,
            standard_deduction: old.standard_deduction,
            cess_multiplier: rules.cess_multiplier(),
            zero_tax_ceiling: zero_rate_ceiling + old.standard_deduction,
        })
    }

    pub fn segments(&self) -> &[InverseSegment] {
        &self.segments
    }

    /// Gross income whose old-regime total tax (age under 60) is `tax`.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use itax_core::TaxRules;
    /// use itax_core::calculations::{IncomeResolution, InverseTaxResolver};
    ///
    /// let resolver = InverseTaxResolver::new(&TaxRules::default()).unwrap();
    ///
    /// assert_eq!(
    ///     resolver.resolve_income_from_tax(dec!(23400)),
    ///     Ok(IncomeResolution::Exact(dec!(600000)))
    /// );
    /// assert_eq!(
    ///     resolver.resolve_income_from_tax(dec!(0)),
    ///     Ok(IncomeResolution::Indeterminate { up_to: dec!(300000) })
    /// );
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`TaxError::OutOfDomain`] for a negative tax or one too large
    /// to invert, and [`TaxError::NotInvertible`] for a tax no income
    /// produces.
    pub fn resolve_income_from_tax(
        &self,
        tax: Decimal,
    ) -> Result<IncomeResolution, TaxError> {
        if tax < Decimal::ZERO {
            return Err(TaxError::OutOfDomain(tax));
        }

        let net_tax = tax
            .checked_div(self.cess_multiplier)
            .ok_or(TaxError::OutOfDomain(tax))?;
        if net_tax.is_zero() {
            return Ok(IncomeResolution::Indeterminate {
                up_to: self.zero_tax_ceiling,
            });
        }

        let segment = self
            .segments
            .iter()
            .find(|segment| segment.upper.is_none_or(|upper| net_tax <= upper))
            .filter(|segment| net_tax > segment.lower)
            .ok_or(TaxError::NotInvertible(tax))?;

        let income = segment
            .formula
            .taxable_income(net_tax)
            .and_then(|taxable| taxable.checked_add(self.standard_deduction))
            .ok_or(TaxError::OutOfDomain(tax))?;
        debug!(
            tax = %tax,
            net_tax = %net_tax,
            formula = ?segment.formula,
            income = %income,
            "Resolved income from tax"
        );
        Ok(IncomeResolution::Exact(income))
    }
}

/// Splits net tax into invertible pieces: taxed slabs below the surcharge
/// threshold, then for each surcharge band a relief piece followed by the
/// surcharged slabs up to the band's ceiling. A band whose relief lasts to
/// its ceiling has no surcharged pieces.
fn build_segments(
    table: &SlabTable,
    surcharge: &SurchargeTable,
) -> Vec<InverseSegment> {
    let threshold = surcharge.threshold();
    let mut segments = Vec::new();

    for slab in table.slabs() {
        if threshold.is_some_and(|threshold| slab.floor >= threshold) {
            break;
        }
        if slab.rate.is_zero() {
            continue;
        }
        let top = lower_ceiling(slab.ceiling, threshold);
        segments.push(InverseSegment {
            lower: table.tax_on(slab.floor),
            upper: top.map(|top| table.tax_on(top)),
            formula: InverseFormula::slab(table, slab),
        });
    }

    for (index, band) in surcharge.bands().iter().enumerate() {
        let multiplier = Decimal::ONE + band.rate;
        let tax_at_lower_bound = table.tax_on(band.floor) * (Decimal::ONE + surcharge.rate_below(index));
        let relief_end = relief_crossover(table, band, tax_at_lower_bound);

        let relief_upper = relief_end.map(|end| tax_at_lower_bound + (end - band.floor));
        if relief_end.is_none_or(|end| end > band.floor) {
            segments.push(InverseSegment {
                lower: tax_at_lower_bound,
                upper: relief_upper,
                formula: InverseFormula::MarginalRelief {
                    lower_bound: band.floor,
                    tax_at_lower_bound,
                },
            });
        }

        let Some(start) = relief_end else {
            continue;
        };
        if band.ceiling.is_some_and(|ceiling| start >= ceiling) {
            continue;
        }
        let mut lower = match relief_upper.filter(|_| start > band.floor) {
            Some(upper) => upper,
            None => table.tax_on(start) * multiplier,
        };
        for slab in table.slabs() {
            if band.ceiling.is_some_and(|ceiling| slab.floor >= ceiling) {
                break;
            }
            if slab.rate.is_zero() || slab.ceiling.is_some_and(|ceiling| ceiling <= start) {
                continue;
            }
            let top = lower_ceiling(slab.ceiling, band.ceiling);
            let upper = top.map(|top| table.tax_on(top) * multiplier);
            segments.push(InverseSegment {
                lower,
                upper,
                formula: InverseFormula::surcharged(table, slab, band.rate),
            });
            if let Some(upper) = upper {
                lower = upper;
            }
        }
    }

    segments
}

/// Taxable income at which marginal relief for `band` runs out, i.e. where
/// surcharged tax catches up with the tax at the band floor plus the income
/// earned above it. `None` when relief never ends.
fn relief_crossover(
    table: &SlabTable,
    band: &Slab,
    tax_at_lower_bound: Decimal,
) -> Option<Decimal> {
    let multiplier = Decimal::ONE + band.rate;
    let excess =
        |income: Decimal| table.tax_on(income) * multiplier - tax_at_lower_bound - (income - band.floor);

    if excess(band.floor) <= Decimal::ZERO {
        return Some(band.floor);
    }

    for slab in table.slabs() {
        if band.ceiling.is_some_and(|ceiling| slab.floor >= ceiling) {
            break;
        }
        if slab.ceiling.is_some_and(|ceiling| ceiling <= band.floor) {
            continue;
        }

        // Within this slab excess(x) = intercept + slope * x.
        let slope = slab.rate * multiplier - Decimal::ONE;
        if slope >= Decimal::ZERO {
            continue;
        }
        let crosses = match lower_ceiling(slab.ceiling, band.ceiling) {
            Some(end) => excess(end) <= Decimal::ZERO,
            None => true,
        };
        if crosses {
            let intercept = (table.tax_on(slab.floor) - slab.rate * slab.floor) * multiplier
                - tax_at_lower_bound
                + band.floor;
            return Some(-intercept / slope);
        }
    }

    band.ceiling
}
