//! Combined tax liability for salary plus side-business income.
//!
//! # Calculation Steps
//!
//! | Step | Description |
//! |------|-------------|
//! | 1 | Salary taxable income: salary minus the salary-income deduction (min 0) |
//! | 2 | Side taxable income: side income minus expenses (min 0) |
//! | 3 | Combined taxable income: Step 1 + Step 2; minus the basic deduction (min 0) |
//! | 4 | Income tax on the adjusted figure, resident tax on the unadjusted one, social insurance on salary |
//! | 5 | Steps 1-4 again for the salary alone |
//! | 6 | Additional tax: (income + resident tax) minus the salary-only figure |
//! | 7 | Net increase: Step 2 minus Step 6; ROI: net increase / side income |
//!
//! Social insurance depends on salary only, so it is left out of the delta.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fukugyo_core::{RateTables, TaxInputs};
//! use fukugyo_core::calculations::TaxAggregator;
//!
//! let inputs = TaxInputs::new(dec!(4000000), dec!(1000000), dec!(200000)).unwrap();
//! let result = TaxAggregator::new(RateTables::standard()).compute(&inputs);
//!
//! assert_eq!(result.comparison.additional_tax, dec!(160000));
//! assert_eq!(result.comparison.net_increase, dec!(640000));
//! assert_eq!(result.comparison.roi, dec!(0.64));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::brackets::{self, TaxSchedule};
use crate::calculations::common::{non_negative, safe_div};
use crate::{RateTables, TaxInputs};

/// How the side business changes the tax bill compared with earning the
/// salary alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxComparison {
    /// Income tax + resident tax + social insurance on the salary alone.
    pub salary_only_tax: Decimal,
    /// Income and resident tax attributable to the side income.
    pub additional_tax: Decimal,
    /// Side profit left after the additional tax.
    pub net_increase: Decimal,
    /// Net increase as a fraction of side income.
    pub roi: Decimal,
}

/// Tax liability for a salary plus side-business income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    /// Salary plus gross side income.
    pub total_income: Decimal,
    /// Total income minus income tax, resident tax and social insurance.
    pub net_income: Decimal,
    pub income_tax: Decimal,
    pub resident_tax: Decimal,
    pub social_insurance: Decimal,
    pub total_tax: Decimal,
    pub comparison: TaxComparison,
}

/// Income and resident tax for one taxable-income figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PersonalTax {
    pub income_tax: Decimal,
    pub resident_tax: Decimal,
}

impl PersonalTax {
    pub fn sum(&self) -> Decimal {
        self.income_tax + self.resident_tax
    }
}

/// Calculator that combines salary and side income into one liability.
#[derive(Debug, Clone, Copy)]
pub struct TaxAggregator<'a> {
    schedule: TaxSchedule<'a>,
}

impl<'a> TaxAggregator<'a> {
    pub fn new(tables: &'a RateTables) -> Self {
        Self {
            schedule: TaxSchedule::new(tables),
        }
    }

    pub fn schedule(&self) -> TaxSchedule<'a> {
        self.schedule
    }

    /// Computes the combined liability and the salary-only comparison.
    ///
    /// Never fails: amounts are floored at zero and the ROI is zero when there
    /// is no side income.
    pub fn compute(
        &self,
        inputs: &TaxInputs,
    ) -> TaxResult {
        // Steps 1-2
        let salary_taxable = self.schedule.salary_taxable_income(inputs.salary);
        let side_taxable = non_negative(inputs.side_income - inputs.side_expenses);

        // Steps 3-4
        let combined = self.personal_tax(salary_taxable + side_taxable);
        let social_insurance = brackets::total(&self.schedule.social_insurance(inputs.salary));

        // Step 5
        let salary_only = self.personal_tax(salary_taxable);

        // Steps 6-7
        let additional_tax = combined.sum() - salary_only.sum();
        let net_increase = side_taxable - additional_tax;
        let roi = if inputs.side_income > Decimal::ZERO {
            safe_div(net_increase, inputs.side_income)
        } else {
            Decimal::ZERO
        };

        let total_income = inputs.salary + inputs.side_income;
        let total_tax = combined.sum() + social_insurance;

        debug!(
            salary_taxable = %salary_taxable,
            side_taxable = %side_taxable,
            income_tax = %combined.income_tax,
            resident_tax = %combined.resident_tax,
            additional_tax = %additional_tax,
            "computed combined tax"
        );

        TaxResult {
            total_income,
            net_income: total_income - total_tax,
            income_tax: combined.income_tax,
            resident_tax: combined.resident_tax,
            social_insurance,
            total_tax,
            comparison: TaxComparison {
                salary_only_tax: salary_only.sum() + social_insurance,
                additional_tax,
                net_increase,
                roi,
            },
        }
    }

    /// Income tax (after the basic deduction) and resident tax (before it)
    /// for a combined taxable income.
    pub(crate) fn personal_tax(
        &self,
        taxable_income: Decimal,
    ) -> PersonalTax {
        PersonalTax {
            income_tax: self
                .schedule
                .income_tax(self.schedule.after_basic_deduction(taxable_income)),
            resident_tax: self.schedule.resident_tax(taxable_income),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn aggregator() -> TaxAggregator<'static> {
        TaxAggregator::new(RateTables::standard())
    }

    fn inputs(
        salary: Decimal,
        side_income: Decimal,
        side_expenses: Decimal,
    ) -> TaxInputs {
        TaxInputs::new(salary, side_income, side_expenses).unwrap()
    }

    #[test]
    fn compute_worked_example() {
        let result = aggregator().compute(&inputs(dec!(4000000), dec!(1000000), dec!(200000)));

        assert_eq!(
            result,
            TaxResult {
                total_income: dec!(5000000),
                net_income: dec!(4203024),
                income_tax: dec!(210500),
                resident_tax: dec!(318000),
                social_insurance: dec!(268476),
                total_tax: dec!(796976),
                comparison: TaxComparison {
                    salary_only_tax: dec!(636976),
                    additional_tax: dec!(160000),
                    net_increase: dec!(640000),
                    roi: dec!(0.64),
                },
            }
        );
    }

    #[test]
    fn net_increase_is_side_profit_minus_additional_tax() {
        let result = aggregator().compute(&inputs(dec!(4000000), dec!(1000000), dec!(200000)));

        assert_eq!(
            result.comparison.net_increase,
            dec!(800000) - result.comparison.additional_tax
        );
        assert_eq!(
            result.comparison.roi,
            result.comparison.net_increase / dec!(1000000)
        );
    }

    #[test]
    fn zero_side_income_is_a_no_op() {
        let result = aggregator().compute(&TaxInputs::salary_only(dec!(5000000)));

        assert_eq!(result.comparison.additional_tax, dec!(0));
        assert_eq!(result.comparison.roi, dec!(0));
        assert_eq!(result.comparison.net_increase, dec!(0));
        assert_eq!(result.total_tax, result.comparison.salary_only_tax);
    }

    #[test]
    fn zero_everything_owes_only_the_per_capita_levy() {
        let result = aggregator().compute(&TaxInputs::salary_only(dec!(0)));

        assert_eq!(result.income_tax, dec!(0));
        assert_eq!(result.resident_tax, dec!(5000));
        assert_eq!(result.social_insurance, dec!(0));
        assert_eq!(result.comparison.additional_tax, dec!(0));
    }

    #[test]
    fn side_income_fully_offset_by_expenses_adds_no_tax() {
        let result = aggregator().compute(&inputs(dec!(4000000), dec!(300000), dec!(300000)));

        assert_eq!(result.comparison.additional_tax, dec!(0));
        assert_eq!(result.comparison.net_increase, dec!(0));
        assert_eq!(result.comparison.roi, dec!(0));
    }

    #[test]
    fn side_income_without_salary_uses_basic_deduction() {
        let result = aggregator().compute(&inputs(dec!(0), dec!(2000000), dec!(500000)));

        // Income tax on 1,500,000 - 480,000 = 1,020,000 at 5%
        assert_eq!(result.income_tax, dec!(51000));
        // (1,500,000 - 430,000) * 10% + 5,000
        assert_eq!(result.resident_tax, dec!(112000));
        // The levy is owed in both scenarios and cancels out
        assert_eq!(result.comparison.additional_tax, dec!(158000));
    }

    #[test]
    fn compute_is_deterministic() {
        let agg = aggregator();
        let input = inputs(dec!(6200000), dec!(1800000), dec!(450000));

        assert_eq!(agg.compute(&input), agg.compute(&input));
    }
}
