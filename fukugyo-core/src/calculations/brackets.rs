//! Bracket and deduction functions.
//!
//! These are the building blocks every other calculator uses:
//!
//! | Function | Applies to |
//! |----------|------------|
//! | [`TaxSchedule::income_tax`] | taxable income after the basic deduction |
//! | [`TaxSchedule::resident_tax`] | taxable income before the basic deduction |
//! | [`TaxSchedule::social_insurance`] | gross salary |
//! | [`TaxSchedule::salary_income_deduction`] | gross salary |
//!
//! All functions are total over non-negative inputs and never return a
//! negative amount.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fukugyo_core::RateTables;
//! use fukugyo_core::calculations::TaxSchedule;
//!
//! let schedule = TaxSchedule::new(RateTables::standard());
//!
//! assert_eq!(schedule.income_tax(dec!(3080000)), dec!(210500));
//! assert_eq!(schedule.resident_tax(dec!(3560000)), dec!(318000));
//! assert_eq!(schedule.salary_income_deduction(dec!(4000000)), dec!(1240000));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::RateTables;
use crate::calculations::common::{non_negative, round_yen};

/// Employee share of each social-insurance premium for one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialInsurancePremiums {
    pub health: Decimal,
    pub pension: Decimal,
    pub employment: Decimal,
    pub long_term_care: Decimal,
}

impl SocialInsurancePremiums {
    /// A zero premium record, used when social insurance is not considered.
    pub fn none() -> Self {
        Self {
            health: Decimal::ZERO,
            pension: Decimal::ZERO,
            employment: Decimal::ZERO,
            long_term_care: Decimal::ZERO,
        }
    }
}

/// Sum of every premium in the record.
pub fn total(premiums: &SocialInsurancePremiums) -> Decimal {
    premiums.health + premiums.pension + premiums.employment + premiums.long_term_care
}

/// The part an employer pays on top of the employee share: health, pension
/// and long-term care are split evenly, employment insurance is not matched.
pub fn employer_share(premiums: &SocialInsurancePremiums) -> Decimal {
    premiums.health + premiums.pension + premiums.long_term_care
}

/// Bracket lookups and deduction schedules bound to a set of rate tables.
#[derive(Debug, Clone, Copy)]
pub struct TaxSchedule<'a> {
    tables: &'a RateTables,
}

impl<'a> TaxSchedule<'a> {
    pub fn new(tables: &'a RateTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &'a RateTables {
        self.tables
    }

    /// National income tax on `taxable_income`.
    ///
    /// Finds the bracket with `min < taxable_income <= max` and returns
    /// `taxable_income * rate - subtracted_amount`, floored at zero. Zero or
    /// negative income matches no bracket and owes no tax.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use fukugyo_core::RateTables;
    /// use fukugyo_core::calculations::TaxSchedule;
    ///
    /// let schedule = TaxSchedule::new(RateTables::standard());
    ///
    /// // 9,430,000 * 33% - 1,536,000
    /// assert_eq!(schedule.income_tax(dec!(9430000)), dec!(1575900));
    /// assert_eq!(schedule.income_tax(dec!(0)), dec!(0));
    /// ```
    pub fn income_tax(
        &self,
        taxable_income: Decimal,
    ) -> Decimal {
        if taxable_income <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        match self
            .tables
            .income_tax_brackets
            .iter()
            .find(|b| b.contains(taxable_income))
        {
            Some(bracket) => round_yen(non_negative(
                taxable_income * bracket.rate - bracket.subtracted_amount,
            )),
            None => {
                warn!(
                    taxable_income = %taxable_income,
                    "no income tax bracket matched; treating tax as zero"
                );
                Decimal::ZERO
            }
        }
    }

    /// Resident tax on `taxable_income` (before the income-tax basic
    /// deduction).
    ///
    /// `max(0, income - resident basic deduction) * rate + per-capita levy`.
    /// The per-capita levy is owed even when the income-proportional part is
    /// zero.
    pub fn resident_tax(
        &self,
        taxable_income: Decimal,
    ) -> Decimal {
        let rates = &self.tables.resident_tax;
        let base = non_negative(taxable_income - rates.basic_deduction);
        round_yen(base * rates.rate + rates.per_capita_levy)
    }

    /// Employee social-insurance premiums on `salary`.
    ///
    /// Health, pension and long-term care are charged at half the combined
    /// rate on salary up to the insurable-income cap. Employment insurance is
    /// charged on the full salary.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use fukugyo_core::RateTables;
    /// use fukugyo_core::calculations::{TaxSchedule, brackets};
    ///
    /// let schedule = TaxSchedule::new(RateTables::standard());
    /// let premiums = schedule.social_insurance(dec!(4000000));
    ///
    /// assert_eq!(premiums.health, dec!(86217));
    /// assert_eq!(premiums.employment, dec!(12000));
    /// assert_eq!(brackets::total(&premiums), dec!(268476));
    /// ```
    pub fn social_insurance(
        &self,
        salary: Decimal,
    ) -> SocialInsurancePremiums {
        if salary <= Decimal::ZERO {
            return SocialInsurancePremiums::none();
        }

        let rates = &self.tables.social_insurance;
        let insurable = salary.min(rates.insurable_income_cap);
        let half = |rate: Decimal| round_yen(insurable * rate / Decimal::TWO);

        SocialInsurancePremiums {
            health: half(rates.health),
            pension: half(rates.pension),
            employment: round_yen(salary * rates.employment),
            long_term_care: half(rates.long_term_care),
        }
    }

    /// Salary-income deduction for a gross `salary`.
    ///
    /// Uses the first band whose `max_salary` is at or above the salary;
    /// the open final band caps the deduction for high salaries.
    pub fn salary_income_deduction(
        &self,
        salary: Decimal,
    ) -> Decimal {
        let salary = non_negative(salary);
        self.tables
            .salary_deduction_bands
            .iter()
            .find(|band| band.max_salary.is_none_or(|max| salary <= max))
            .map(|band| round_yen(salary * band.rate + band.fixed_amount))
            .unwrap_or(Decimal::ZERO)
    }

    /// Salary income after the salary-income deduction, floored at zero.
    pub fn salary_taxable_income(
        &self,
        salary: Decimal,
    ) -> Decimal {
        non_negative(salary - self.salary_income_deduction(salary))
    }

    /// Taxable income after the basic deduction, floored at zero.
    pub fn after_basic_deduction(
        &self,
        taxable_income: Decimal,
    ) -> Decimal {
        non_negative(taxable_income - self.tables.basic_deduction)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn schedule() -> TaxSchedule<'static> {
        TaxSchedule::new(RateTables::standard())
    }

    // =========================================================================
    // income_tax tests
    // =========================================================================

    #[test]
    fn income_tax_is_zero_for_zero_income() {
        assert_eq!(schedule().income_tax(dec!(0)), dec!(0));
    }

    #[test]
    fn income_tax_is_zero_for_negative_income() {
        assert_eq!(schedule().income_tax(dec!(-100000)), dec!(0));
    }

    #[test]
    fn income_tax_first_bracket() {
        // 1,000,000 * 5%
        assert_eq!(schedule().income_tax(dec!(1000000)), dec!(50000));
    }

    #[test]
    fn income_tax_second_bracket() {
        // 3,080,000 * 10% - 97,500
        assert_eq!(schedule().income_tax(dec!(3080000)), dec!(210500));
    }

    #[test]
    fn income_tax_third_bracket() {
        // 4,780,000 * 20% - 427,500
        assert_eq!(schedule().income_tax(dec!(4780000)), dec!(528500));
    }

    #[test]
    fn income_tax_top_bracket() {
        // 50,000,000 * 45% - 4,796,000
        assert_eq!(schedule().income_tax(dec!(50000000)), dec!(17704000));
    }

    #[test]
    fn income_tax_is_continuous_at_bracket_bounds() {
        let s = schedule();
        for bound in [
            dec!(1950000),
            dec!(3300000),
            dec!(6950000),
            dec!(9000000),
            dec!(18000000),
            dec!(40000000),
        ] {
            let at = s.income_tax(bound);
            let just_above = s.income_tax(bound + dec!(1));
            assert!(just_above >= at, "tax decreased across {bound}");
            assert!(just_above - at <= dec!(1), "tax jumped across {bound}");
        }
    }

    #[test]
    fn income_tax_is_non_decreasing() {
        let s = schedule();
        let mut previous = Decimal::ZERO;
        let mut income = Decimal::ZERO;
        while income <= dec!(50000000) {
            let tax = s.income_tax(income);
            assert!(tax >= previous, "tax decreased at {income}");
            previous = tax;
            income += dec!(250000);
        }
    }

    // =========================================================================
    // resident_tax tests
    // =========================================================================

    #[test]
    fn resident_tax_applies_basic_deduction_and_levy() {
        // (3,560,000 - 430,000) * 10% + 5,000
        assert_eq!(schedule().resident_tax(dec!(3560000)), dec!(318000));
    }

    #[test]
    fn resident_tax_below_deduction_is_levy_only() {
        assert_eq!(schedule().resident_tax(dec!(200000)), dec!(5000));
        assert_eq!(schedule().resident_tax(dec!(0)), dec!(5000));
    }

    // =========================================================================
    // social_insurance tests
    // =========================================================================

    #[test]
    fn social_insurance_caps_insurable_income() {
        let premiums = schedule().social_insurance(dec!(5000000));

        assert_eq!(
            premiums,
            SocialInsurancePremiums {
                health: dec!(86217),
                pension: dec!(159210),
                employment: dec!(15000),
                long_term_care: dec!(11049),
            }
        );
        assert_eq!(total(&premiums), dec!(271476));
        assert_eq!(employer_share(&premiums), dec!(256476));
    }

    #[test]
    fn social_insurance_below_cap_uses_full_salary() {
        let premiums = schedule().social_insurance(dec!(1000000));

        // 1,000,000 * 9.91% / 2
        assert_eq!(premiums.health, dec!(49550));
        // 1,000,000 * 18.3% / 2
        assert_eq!(premiums.pension, dec!(91500));
        assert_eq!(premiums.long_term_care, dec!(6350));
        assert_eq!(premiums.employment, dec!(3000));
    }

    #[test]
    fn social_insurance_is_zero_without_salary() {
        assert_eq!(
            schedule().social_insurance(dec!(0)),
            SocialInsurancePremiums::none()
        );
    }

    #[test]
    fn social_insurance_grows_only_by_employment_above_cap() {
        let s = schedule();
        let at_cap = s.social_insurance(dec!(1740000));
        let above = s.social_insurance(dec!(2740000));

        assert_eq!(employer_share(&at_cap), employer_share(&above));
        assert_eq!(total(&above) - total(&at_cap), dec!(3000));
    }

    #[test]
    fn social_insurance_total_is_non_decreasing() {
        let s = schedule();
        let mut previous = Decimal::ZERO;
        let mut salary = Decimal::ZERO;
        while salary <= dec!(10000000) {
            let current = total(&s.social_insurance(salary));
            assert!(current >= previous, "premiums decreased at {salary}");
            previous = current;
            salary += dec!(100000);
        }
    }

    // =========================================================================
    // salary_income_deduction tests
    // =========================================================================

    #[test]
    fn salary_deduction_minimum_band() {
        assert_eq!(schedule().salary_income_deduction(dec!(0)), dec!(550000));
        assert_eq!(schedule().salary_income_deduction(dec!(1625000)), dec!(550000));
    }

    #[test]
    fn salary_deduction_second_band() {
        // 1,700,000 * 40% - 100,000
        assert_eq!(schedule().salary_income_deduction(dec!(1700000)), dec!(580000));
    }

    #[test]
    fn salary_deduction_third_band() {
        // 3,000,000 * 30% + 80,000
        assert_eq!(schedule().salary_income_deduction(dec!(3000000)), dec!(980000));
    }

    #[test]
    fn salary_deduction_fourth_band() {
        // 5,000,000 * 20% + 440,000
        assert_eq!(schedule().salary_income_deduction(dec!(5000000)), dec!(1440000));
    }

    #[test]
    fn salary_deduction_fifth_band() {
        // 8,000,000 * 10% + 1,100,000
        assert_eq!(schedule().salary_income_deduction(dec!(8000000)), dec!(1900000));
    }

    #[test]
    fn salary_deduction_is_capped() {
        assert_eq!(schedule().salary_income_deduction(dec!(8500001)), dec!(1950000));
        assert_eq!(schedule().salary_income_deduction(dec!(30000000)), dec!(1950000));
    }

    #[test]
    fn salary_taxable_income_never_negative() {
        assert_eq!(schedule().salary_taxable_income(dec!(500000)), dec!(0));
        assert_eq!(schedule().salary_taxable_income(dec!(4000000)), dec!(2760000));
    }
}
