use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::BusinessType;

/// Highest expected annual growth accepted, in percent.
pub const MAX_GROWTH_RATE: Decimal = Decimal::ONE_THOUSAND;

/// Errors raised when constructing calculator inputs.
///
/// The calculators themselves never fail; these checks belong to whoever
/// collects the figures from the user.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    /// A monetary amount or hour count is negative.
    #[error("{field} must be non-negative, got {value}")]
    Negative { field: &'static str, value: Decimal },

    /// Side-business expenses exceed side-business income.
    #[error("expenses ({expenses}) must not exceed side income ({income})")]
    ExpensesExceedIncome { expenses: Decimal, income: Decimal },

    /// Growth at or below -100%, or above [`MAX_GROWTH_RATE`].
    #[error("annual growth rate must be above -100% and at most 1000%, got {0}%")]
    InvalidGrowthRate(Decimal),

    /// A marginal tax rate outside `[0, 1]`.
    #[error("marginal tax rate must be between 0 and 1, got {0}")]
    InvalidMarginalRate(Decimal),
}

fn non_negative(
    field: &'static str,
    value: Decimal,
) -> Result<(), InputError> {
    if value < Decimal::ZERO {
        return Err(InputError::Negative { field, value });
    }
    Ok(())
}

/// Annual salary and side-business figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxInputs {
    pub salary: Decimal,
    pub side_income: Decimal,
    pub side_expenses: Decimal,
}

impl TaxInputs {
    /// Builds validated inputs.
    ///
    /// # Errors
    ///
    /// Returns [`InputError`] if any amount is negative or the expenses exceed
    /// the side income.
    pub fn new(
        salary: Decimal,
        side_income: Decimal,
        side_expenses: Decimal,
    ) -> Result<Self, InputError> {
        let inputs = Self {
            salary,
            side_income,
            side_expenses,
        };
        inputs.validate()?;
        Ok(inputs)
    }

    /// Inputs for a salary with no side business.
    pub fn salary_only(salary: Decimal) -> Self {
        Self {
            salary,
            side_income: Decimal::ZERO,
            side_expenses: Decimal::ZERO,
        }
    }

    pub fn validate(&self) -> Result<(), InputError> {
        non_negative("salary", self.salary)?;
        non_negative("side income", self.side_income)?;
        non_negative("side expenses", self.side_expenses)?;
        if self.side_expenses > self.side_income {
            return Err(InputError::ExpensesExceedIncome {
                expenses: self.side_expenses,
                income: self.side_income,
            });
        }
        Ok(())
    }
}

/// Tax inputs plus the time and money put into the side business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoiInputs {
    #[serde(flatten)]
    pub tax: TaxInputs,
    pub monthly_hours_invested: Decimal,
    pub initial_investment: Decimal,
}

impl RoiInputs {
    pub fn new(
        tax: TaxInputs,
        monthly_hours_invested: Decimal,
        initial_investment: Decimal,
    ) -> Result<Self, InputError> {
        let inputs = Self {
            tax,
            monthly_hours_invested,
            initial_investment,
        };
        inputs.validate()?;
        Ok(inputs)
    }

    pub fn validate(&self) -> Result<(), InputError> {
        self.tax.validate()?;
        non_negative("monthly hours invested", self.monthly_hours_invested)?;
        non_negative("initial investment", self.initial_investment)
    }
}

/// Figures needed to compare running the business as a sole proprietor
/// against running it through a company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncorporationInputs {
    /// Salary from the main job.
    pub salary: Decimal,
    pub business_income: Decimal,
    pub business_expenses: Decimal,
    /// Officer salary the company would pay its owner.
    pub desired_officer_salary: Decimal,
    /// One-off incorporation cost.
    pub setup_cost: Decimal,
    /// Expected annual growth of business income, in percent.
    pub expected_annual_growth_rate: Decimal,
    pub consider_social_insurance: bool,
}

impl IncorporationInputs {
    pub fn validate(&self) -> Result<(), InputError> {
        non_negative("salary", self.salary)?;
        non_negative("business income", self.business_income)?;
        non_negative("business expenses", self.business_expenses)?;
        non_negative("officer salary", self.desired_officer_salary)?;
        non_negative("setup cost", self.setup_cost)?;
        let growth = self.expected_annual_growth_rate;
        if growth <= -Decimal::ONE_HUNDRED || growth > MAX_GROWTH_RATE {
            return Err(InputError::InvalidGrowthRate(
                self.expected_annual_growth_rate,
            ));
        }
        Ok(())
    }
}

/// The user's financial situation as seen by the optimization engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialProfile {
    pub salary: Decimal,
    pub side_income: Decimal,
    pub expenses: Decimal,
    #[serde(default)]
    pub business_type: BusinessType,
    /// Overrides the marginal rate used to value extra expenses.
    #[serde(default)]
    pub marginal_tax_rate: Option<Decimal>,
}

impl FinancialProfile {
    pub fn tax_inputs(&self) -> TaxInputs {
        TaxInputs {
            salary: self.salary,
            side_income: self.side_income,
            side_expenses: self.expenses,
        }
    }

    pub fn validate(&self) -> Result<(), InputError> {
        self.tax_inputs().validate()?;
        if let Some(rate) = self.marginal_tax_rate {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(InputError::InvalidMarginalRate(rate));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn tax_inputs_accepts_valid_figures() {
        let inputs = TaxInputs::new(dec!(4000000), dec!(1000000), dec!(200000)).unwrap();

        assert_eq!(inputs.side_expenses, dec!(200000));
    }

    #[test]
    fn tax_inputs_rejects_negative_salary() {
        let result = TaxInputs::new(dec!(-1), dec!(0), dec!(0));

        assert_eq!(
            result,
            Err(InputError::Negative {
                field: "salary",
                value: dec!(-1),
            })
        );
    }

    #[test]
    fn tax_inputs_rejects_expenses_above_income() {
        let result = TaxInputs::new(dec!(4000000), dec!(100000), dec!(150000));

        assert_eq!(
            result,
            Err(InputError::ExpensesExceedIncome {
                expenses: dec!(150000),
                income: dec!(100000),
            })
        );
    }

    #[test]
    fn roi_inputs_rejects_negative_hours() {
        let tax = TaxInputs::salary_only(dec!(3000000));

        let result = RoiInputs::new(tax, dec!(-5), dec!(0));

        assert!(matches!(result, Err(InputError::Negative { field, .. }) if field == "monthly hours invested"));
    }

    #[test]
    fn incorporation_inputs_rejects_total_collapse() {
        let inputs = IncorporationInputs {
            salary: dec!(5000000),
            business_income: dec!(8000000),
            business_expenses: dec!(1000000),
            desired_officer_salary: dec!(4000000),
            setup_cost: dec!(300000),
            expected_annual_growth_rate: dec!(-100),
            consider_social_insurance: true,
        };

        assert_eq!(
            inputs.validate(),
            Err(InputError::InvalidGrowthRate(dec!(-100)))
        );
    }

    #[test]
    fn incorporation_inputs_growth_rate_bounds() {
        let mut inputs = IncorporationInputs {
            salary: dec!(5000000),
            business_income: dec!(8000000),
            business_expenses: dec!(1000000),
            desired_officer_salary: dec!(4000000),
            setup_cost: dec!(300000),
            expected_annual_growth_rate: dec!(1000),
            consider_social_insurance: true,
        };
        assert_eq!(inputs.validate(), Ok(()));

        inputs.expected_annual_growth_rate = dec!(1000.5);
        assert_eq!(
            inputs.validate(),
            Err(InputError::InvalidGrowthRate(dec!(1000.5)))
        );
    }

    #[test]
    fn profile_rejects_marginal_rate_above_one() {
        let profile = FinancialProfile {
            salary: dec!(5000000),
            side_income: dec!(1000000),
            expenses: dec!(0),
            business_type: BusinessType::SoleProprietor,
            marginal_tax_rate: Some(dec!(1.2)),
        };

        assert_eq!(
            profile.validate(),
            Err(InputError::InvalidMarginalRate(dec!(1.2)))
        );
    }
}
