//! Law-derived rate tables.
//!
//! Every constant the calculators use lives in [`RateTables`]. The built-in
//! table reflects the 2024 (Reiwa 6) rules and is constructed once per
//! process; callers that need different figures can deserialize their own
//! table (see the `fukugyo-data` crate) and validate it before use.

use std::sync::LazyLock;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::TaxBracket;

static STANDARD: LazyLock<RateTables> = LazyLock::new(RateTables::reiwa6);

/// Errors reported by [`RateTables::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RateTableError {
    /// The income-tax schedule has no brackets.
    #[error("no income tax brackets provided")]
    NoTaxBrackets,

    /// The first bracket must start at zero.
    #[error("first income tax bracket must start at 0, got {0}")]
    FirstBracketNotZero(Decimal),

    /// A bracket does not start where the previous one ended.
    #[error("income tax bracket {index} starts at {found}, expected {expected}")]
    BracketGap {
        index: usize,
        expected: Decimal,
        found: Decimal,
    },

    /// A bracket ends at or below its own lower bound.
    #[error("income tax bracket {index} is empty or inverted")]
    EmptyBracket { index: usize },

    /// An open-ended bracket appears before the end of the schedule.
    #[error("income tax bracket {0} is open-ended but is not the last bracket")]
    OpenBracketNotLast(usize),

    /// The schedule stops at a finite income.
    #[error("last income tax bracket must be open-ended")]
    LastBracketClosed,

    /// A rate is outside `[0, 1]`.
    #[error("{name} must be between 0 and 1, got {value}")]
    InvalidRate { name: &'static str, value: Decimal },

    /// An amount that must not be negative is negative.
    #[error("{name} must be non-negative, got {value}")]
    NegativeAmount { name: &'static str, value: Decimal },

    /// The salary-income deduction schedule has no bands.
    #[error("no salary income deduction bands provided")]
    NoSalaryDeductionBands,

    /// Salary-income deduction bands are not in ascending order.
    #[error("salary income deduction band {0} is out of order")]
    SalaryBandsUnordered(usize),

    /// The salary-income deduction schedule must end with an open band.
    #[error("last salary income deduction band must be open-ended")]
    LastSalaryBandClosed,

    /// Setup costs cannot be amortized over zero years.
    #[error("amortization period must be at least one year")]
    ZeroAmortizationYears,
}

/// Per-capita and income-proportional resident tax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidentTaxRates {
    /// Flat income-proportional rate (municipal 6% + prefectural 4%).
    pub rate: Decimal,
    /// Basic deduction used for resident tax (smaller than the income tax one).
    pub basic_deduction: Decimal,
    /// Flat per-capita levy added regardless of income.
    pub per_capita_levy: Decimal,
}

/// Employee social-insurance rates. Each rate is the combined
/// employer + employee figure; the employee pays half of health, pension and
/// long-term care, and the employment rate in full.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialInsuranceRates {
    pub health: Decimal,
    pub pension: Decimal,
    pub employment: Decimal,
    pub long_term_care: Decimal,
    /// Ceiling on the income that health, pension and care premiums apply to.
    pub insurable_income_cap: Decimal,
}

/// One band of the salary-income deduction schedule.
///
/// The deduction for a salary inside the band is
/// `salary * rate + fixed_amount`. Bands are ordered by `max_salary` and the
/// last one is open-ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryDeductionBand {
    pub max_salary: Option<Decimal>,
    pub rate: Decimal,
    pub fixed_amount: Decimal,
}

/// Figures that only apply to a sole proprietor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessTaxRates {
    /// Blue-return special deduction.
    pub blue_return_deduction: Decimal,
    /// Individual enterprise tax rate.
    pub business_tax_rate: Decimal,
    /// Enterprise tax proprietor deduction.
    pub business_tax_deduction: Decimal,
    /// Rate used to estimate national health insurance on business income.
    pub health_insurance_rate: Decimal,
    /// Annual ceiling on national health insurance.
    pub health_insurance_cap: Decimal,
}

/// Corporate tax figures for a small company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorporateTaxRates {
    /// Reduced rate applied up to `reduced_rate_ceiling`.
    pub reduced_rate: Decimal,
    pub reduced_rate_ceiling: Decimal,
    /// Rate applied to taxable income above the ceiling.
    pub standard_rate: Decimal,
    /// Flat local-tax-equivalent rate on corporate taxable income.
    pub local_rate: Decimal,
    /// Per-capita levy owed even when the company makes a loss.
    pub per_capita_levy: Decimal,
    /// Straight-line amortization period for incorporation costs.
    pub amortization_years: u32,
}

/// Complete set of tax-law constants used by the calculators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTables {
    /// Human readable name of the tax year these figures belong to.
    pub label: String,
    pub income_tax_brackets: Vec<TaxBracket>,
    /// Basic deduction applied before the income-tax brackets.
    pub basic_deduction: Decimal,
    pub resident_tax: ResidentTaxRates,
    pub social_insurance: SocialInsuranceRates,
    pub salary_deduction_bands: Vec<SalaryDeductionBand>,
    pub business: BusinessTaxRates,
    pub corporate: CorporateTaxRates,
}

impl RateTables {
    /// The built-in tables, created on first use and shared afterwards.
    pub fn standard() -> &'static RateTables {
        &STANDARD
    }

    /// Figures for the 2024 (Reiwa 6) tax year.
    pub fn reiwa6() -> Self {
        let bracket = |min: Decimal, max: Option<Decimal>, rate: Decimal, sub: Decimal| {
            TaxBracket {
                min_income: min,
                max_income: max,
                rate,
                subtracted_amount: sub,
            }
        };
        let band = |max: Option<Decimal>, rate: Decimal, fixed: Decimal| SalaryDeductionBand {
            max_salary: max,
            rate,
            fixed_amount: fixed,
        };

        Self {
            label: "Reiwa 6 (2024)".to_string(),
            income_tax_brackets: vec![
                bracket(dec!(0), Some(dec!(1950000)), dec!(0.05), dec!(0)),
                bracket(dec!(1950000), Some(dec!(3300000)), dec!(0.10), dec!(97500)),
                bracket(dec!(3300000), Some(dec!(6950000)), dec!(0.20), dec!(427500)),
                bracket(dec!(6950000), Some(dec!(9000000)), dec!(0.23), dec!(636000)),
                bracket(dec!(9000000), Some(dec!(18000000)), dec!(0.33), dec!(1536000)),
                bracket(dec!(18000000), Some(dec!(40000000)), dec!(0.40), dec!(2796000)),
                bracket(dec!(40000000), None, dec!(0.45), dec!(4796000)),
            ],
            basic_deduction: dec!(480000),
            resident_tax: ResidentTaxRates {
                rate: dec!(0.10),
                basic_deduction: dec!(430000),
                per_capita_levy: dec!(5000),
            },
            social_insurance: SocialInsuranceRates {
                health: dec!(0.0991),
                pension: dec!(0.183),
                employment: dec!(0.003),
                long_term_care: dec!(0.0127),
                insurable_income_cap: dec!(1740000),
            },
            salary_deduction_bands: vec![
                band(Some(dec!(1625000)), dec!(0), dec!(550000)),
                band(Some(dec!(1800000)), dec!(0.4), dec!(-100000)),
                band(Some(dec!(3600000)), dec!(0.3), dec!(80000)),
                band(Some(dec!(6600000)), dec!(0.2), dec!(440000)),
                band(Some(dec!(8500000)), dec!(0.1), dec!(1100000)),
                band(None, dec!(0), dec!(1950000)),
            ],
            business: BusinessTaxRates {
                blue_return_deduction: dec!(650000),
                business_tax_rate: dec!(0.05),
                business_tax_deduction: dec!(2900000),
                health_insurance_rate: dec!(0.10),
                health_insurance_cap: dec!(1060000),
            },
            corporate: CorporateTaxRates {
                reduced_rate: dec!(0.15),
                reduced_rate_ceiling: dec!(8000000),
                standard_rate: dec!(0.232),
                local_rate: dec!(0.07),
                per_capita_levy: dec!(70000),
                amortization_years: 3,
            },
        }
    }

    /// Checks the structural invariants of the tables.
    ///
    /// # Errors
    ///
    /// Returns [`RateTableError`] if:
    /// - the bracket schedule is empty, does not start at 0, has gaps, or
    ///   does not end with an open bracket
    /// - any rate is outside `[0, 1]`
    /// - a deduction, ceiling or levy is negative
    /// - the salary deduction bands are empty, unordered, or closed
    /// - the amortization period is zero
    pub fn validate(&self) -> Result<(), RateTableError> {
        self.validate_brackets()?;
        self.validate_salary_bands()?;

        let rates = [
            ("resident tax rate", self.resident_tax.rate),
            ("health insurance rate", self.social_insurance.health),
            ("pension rate", self.social_insurance.pension),
            ("employment insurance rate", self.social_insurance.employment),
            ("long-term care rate", self.social_insurance.long_term_care),
            ("business tax rate", self.business.business_tax_rate),
            ("national health insurance rate", self.business.health_insurance_rate),
            ("corporate reduced rate", self.corporate.reduced_rate),
            ("corporate standard rate", self.corporate.standard_rate),
            ("corporate local rate", self.corporate.local_rate),
        ];
        for (name, value) in rates {
            if value < Decimal::ZERO || value > Decimal::ONE {
                return Err(RateTableError::InvalidRate { name, value });
            }
        }

        let amounts = [
            ("basic deduction", self.basic_deduction),
            ("resident basic deduction", self.resident_tax.basic_deduction),
            ("resident per-capita levy", self.resident_tax.per_capita_levy),
            ("insurable income cap", self.social_insurance.insurable_income_cap),
            ("blue return deduction", self.business.blue_return_deduction),
            ("business tax deduction", self.business.business_tax_deduction),
            ("national health insurance cap", self.business.health_insurance_cap),
            ("corporate reduced rate ceiling", self.corporate.reduced_rate_ceiling),
            ("corporate per-capita levy", self.corporate.per_capita_levy),
        ];
        for (name, value) in amounts {
            if value < Decimal::ZERO {
                return Err(RateTableError::NegativeAmount { name, value });
            }
        }

        if self.corporate.amortization_years == 0 {
            return Err(RateTableError::ZeroAmortizationYears);
        }
        Ok(())
    }

    fn validate_brackets(&self) -> Result<(), RateTableError> {
        let brackets = &self.income_tax_brackets;
        let first = brackets.first().ok_or(RateTableError::NoTaxBrackets)?;
        if first.min_income != Decimal::ZERO {
            return Err(RateTableError::FirstBracketNotZero(first.min_income));
        }

        let last_index = brackets.len() - 1;
        let mut expected_min = Decimal::ZERO;
        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.min_income != expected_min {
                return Err(RateTableError::BracketGap {
                    index,
                    expected: expected_min,
                    found: bracket.min_income,
                });
            }
            if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(RateTableError::InvalidRate {
                    name: "income tax bracket rate",
                    value: bracket.rate,
                });
            }
            match bracket.max_income {
                Some(max) if max <= bracket.min_income => {
                    return Err(RateTableError::EmptyBracket { index });
                }
                Some(max) => expected_min = max,
                None if index != last_index => {
                    return Err(RateTableError::OpenBracketNotLast(index));
                }
                None => {}
            }
        }

        if brackets[last_index].max_income.is_some() {
            return Err(RateTableError::LastBracketClosed);
        }
        Ok(())
    }

    fn validate_salary_bands(&self) -> Result<(), RateTableError> {
        let bands = &self.salary_deduction_bands;
        if bands.is_empty() {
            return Err(RateTableError::NoSalaryDeductionBands);
        }

        let mut previous: Option<Decimal> = None;
        for (index, band) in bands.iter().enumerate() {
            match (band.max_salary, previous) {
                (Some(max), Some(prev)) if max <= prev => {
                    return Err(RateTableError::SalaryBandsUnordered(index));
                }
                (None, _) if index != bands.len() - 1 => {
                    return Err(RateTableError::SalaryBandsUnordered(index));
                }
                _ => previous = band.max_salary,
            }
        }

        if bands[bands.len() - 1].max_salary.is_some() {
            return Err(RateTableError::LastSalaryBandClosed);
        }
        Ok(())
    }
}

impl Default for RateTables {
    fn default() -> Self {
        Self::reiwa6()
    }
}
