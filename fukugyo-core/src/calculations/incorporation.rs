//! Sole proprietorship versus incorporation.
//!
//! Both burdens measure the take-home attributable to the business, so the
//! main-job salary cancels out of the comparison.
//!
//! # Individual (sole proprietor)
//!
//! | Step | Description |
//! |------|-------------|
//! | 1 | Business profit: income minus expenses (min 0) |
//! | 2 | Taxable business income: Step 1 minus the blue-return deduction (min 0) |
//! | 3 | Income and resident tax on salary + Step 2, minus the salary-only figures |
//! | 4 | Business tax: rate × (Step 1 minus the business-tax deduction) |
//! | 5 | National health insurance: rate × Step 2, capped (optional) |
//! | 6 | Net income: Step 1 minus Steps 3-5 |
//!
//! # Corporate
//!
//! | Step | Description |
//! |------|-------------|
//! | 1 | Business profit: income minus expenses (min 0) |
//! | 2 | Deductions: officer salary, employer share of its social insurance (optional), setup-cost amortization |
//! | 3 | Taxable income: Step 1 minus Step 2 (min 0) |
//! | 4 | Corporate tax: reduced rate up to the ceiling, standard rate above |
//! | 5 | Local tax: local rate × Step 3; plus the per-capita levy |
//! | 6 | Retained earnings: Step 1 minus Steps 2, 4 and 5 |
//! | 7 | Personal net: officer salary minus its income tax, resident tax and employee social insurance (optional) |
//! | 8 | Net income: Step 6 + Step 7 |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fukugyo_core::{IncorporationInputs, RateTables};
//! use fukugyo_core::calculations::{IncorporationAnalyzer, Recommendation};
//!
//! let inputs = IncorporationInputs {
//!     salary: dec!(5000000),
//!     business_income: dec!(8000000),
//!     business_expenses: dec!(1000000),
//!     desired_officer_salary: dec!(4000000),
//!     setup_cost: dec!(300000),
//!     expected_annual_growth_rate: dec!(10),
//!     consider_social_insurance: true,
//! };
//!
//! let analysis = IncorporationAnalyzer::new(RateTables::standard()).analyze(&inputs);
//!
//! assert_eq!(analysis.current_difference, dec!(1195372));
//! assert_eq!(analysis.break_even_point, dec!(4500000));
//! assert_eq!(analysis.recommendation, Recommendation::Recommended);
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::aggregator::TaxAggregator;
use crate::calculations::brackets::{self, SocialInsurancePremiums, TaxSchedule};
use crate::calculations::common::{non_negative, round_yen, safe_div};
use crate::{IncorporationInputs, RateTables};

/// Lowest business income sampled by the break-even search.
pub const BREAK_EVEN_START: Decimal = dec!(1000000);
/// Highest business income sampled by the break-even search (inclusive).
pub const BREAK_EVEN_END: Decimal = dec!(20000000);
pub const BREAK_EVEN_STEP: Decimal = dec!(500000);
/// Used when no crossing is found in the sampled range.
pub const BREAK_EVEN_FALLBACK: Decimal = dec!(5000000);
/// Officer salary assumed by the break-even search, as a share of salary.
pub const OFFICER_SALARY_RATIO: Decimal = dec!(0.8);
pub const DEFAULT_PROJECTION_YEARS: u32 = 5;
/// Longest projection the analyzer produces.
pub const MAX_PROJECTION_YEARS: u32 = 50;
/// Incorporation cost assumed when the caller has no quote.
pub const DEFAULT_SETUP_COST: Decimal = dec!(300000);

const PREPARE_RATIO: Decimal = dec!(0.8);
const SAVINGS_RATIO: Decimal = dec!(0.05);

/// Tax burden of running the business as a sole proprietor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndividualTaxBurden {
    pub business_profit: Decimal,
    /// Profit after the blue-return deduction.
    pub taxable_business_income: Decimal,
    /// Income tax increase over the salary alone.
    pub income_tax: Decimal,
    /// Resident tax increase over the salary alone.
    pub resident_tax: Decimal,
    pub business_tax: Decimal,
    /// Estimated national health insurance; 0 when social insurance is not
    /// considered.
    pub health_insurance: Decimal,
    pub total_tax: Decimal,
    pub net_income: Decimal,
}

/// Tax burden of running the business through a company that pays its owner
/// an officer salary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorporateTaxBurden {
    pub business_profit: Decimal,
    pub officer_salary: Decimal,
    /// Company share of the officer's health, pension and care premiums.
    pub employer_social_insurance: Decimal,
    /// Setup cost written off this year.
    pub amortization: Decimal,
    pub taxable_income: Decimal,
    pub corporate_tax: Decimal,
    pub local_tax: Decimal,
    pub per_capita_levy: Decimal,
    /// Profit kept by the company after salary, premiums and taxes.
    pub retained_earnings: Decimal,
    pub personal_income_tax: Decimal,
    pub personal_resident_tax: Decimal,
    pub personal_social_insurance: Decimal,
    /// Officer salary after personal taxes and premiums.
    pub personal_net_income: Decimal,
    pub total_tax: Decimal,
    pub net_income: Decimal,
}

/// Both burdens evaluated at one business-income level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakEvenSample {
    pub business_income: Decimal,
    pub individual_net_income: Decimal,
    pub corporate_net_income: Decimal,
    /// Corporate minus individual net income.
    pub delta: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakEvenCurve {
    pub samples: Vec<BreakEvenSample>,
    /// First sampled income where the delta turns positive.
    pub break_even_point: Option<Decimal>,
}

impl BreakEvenCurve {
    /// The break-even point, or [`BREAK_EVEN_FALLBACK`] when the curve never
    /// crosses.
    pub fn resolved(&self) -> Decimal {
        match self.break_even_point {
            Some(point) => point,
            None => {
                warn!(
                    fallback = %BREAK_EVEN_FALLBACK,
                    "no break-even crossing in sampled range, using fallback"
                );
                BREAK_EVEN_FALLBACK
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectionLabel {
    /// At or above the break-even point.
    Incorporate,
    /// Within 80% of the break-even point.
    Prepare,
    SoleProprietor,
}

impl ProjectionLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Incorporate => "incorporate",
            Self::Prepare => "prepare to incorporate",
            Self::SoleProprietor => "stay sole proprietor",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    /// 1-based year from now.
    pub year: u32,
    pub projected_income: Decimal,
    pub above_break_even: bool,
    pub label: ProjectionLabel,
    /// Rough savings from incorporating; 5% of projected income when above
    /// break-even, otherwise 0.
    pub estimated_savings: Decimal,
}

/// Recommendation band, keyed by whether incorporating pays today and whether
/// the business income has reached the break-even point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Recommendation {
    /// Beneficial and above break-even.
    Recommended,
    /// Exactly one of the two holds.
    Consider,
    NotYet,
}

impl Recommendation {
    pub fn from_conditions(
        beneficial: bool,
        above_break_even: bool,
    ) -> Self {
        match (beneficial, above_break_even) {
            (true, true) => Self::Recommended,
            (true, false) | (false, true) => Self::Consider,
            (false, false) => Self::NotYet,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Recommended => "Incorporation recommended",
            Self::Consider => "Incorporation worth considering",
            Self::NotYet => "Stay a sole proprietor for now",
        }
    }

    pub fn explanation(&self) -> &'static str {
        match self {
            Self::Recommended => {
                "Incorporating already increases your take-home and your business income is above the break-even point."
            }
            Self::Consider => {
                "Incorporating is close to paying off. Weigh the administrative cost against the expected gain."
            }
            Self::NotYet => {
                "At the current business income, running as a sole proprietor keeps more of your profit."
            }
        }
    }

    pub fn action_items(&self) -> &'static [&'static str] {
        match self {
            Self::Recommended => &[
                "Consult a tax accountant and a judicial scrivener",
                "Prepare the articles of incorporation",
                "Decide the capital and the business plan",
                "Open a corporate bank account and file the notifications",
            ],
            Self::Consider => &[
                "Track business income monthly against the break-even point",
                "Get a quote for incorporation and bookkeeping costs",
                "Review the planned officer salary",
            ],
            Self::NotYet => &[
                "Keep filing a blue return to use the special deduction",
                "Focus on growing business income",
                "Revisit incorporation once income nears the break-even point",
            ],
        }
    }
}

/// Full comparison for one set of [`IncorporationInputs`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncorporationAnalysis {
    pub individual: IndividualTaxBurden,
    pub corporate: CorporateTaxBurden,
    /// Resolved break-even point; see [`BreakEvenCurve::resolved`].
    pub break_even_point: Decimal,
    pub break_even_curve: BreakEvenCurve,
    pub future_projection: Vec<ProjectionPoint>,
    pub recommendation: Recommendation,
    /// Corporate minus individual net income at the current figures.
    pub current_difference: Decimal,
}

/// Calculator for the individual-versus-corporate comparison.
#[derive(Debug, Clone, Copy)]
pub struct IncorporationAnalyzer<'a> {
    aggregator: TaxAggregator<'a>,
    projection_years: u32,
}

impl<'a> IncorporationAnalyzer<'a> {
    pub fn new(tables: &'a RateTables) -> Self {
        Self {
            aggregator: TaxAggregator::new(tables),
            projection_years: DEFAULT_PROJECTION_YEARS,
        }
    }

    /// Overrides the number of projected years, up to
    /// [`MAX_PROJECTION_YEARS`].
    pub fn with_projection_years(
        mut self,
        years: u32,
    ) -> Self {
        self.projection_years = years.min(MAX_PROJECTION_YEARS);
        self
    }

    fn schedule(&self) -> TaxSchedule<'a> {
        self.aggregator.schedule()
    }

    fn tables(&self) -> &'a RateTables {
        self.schedule().tables()
    }

    pub fn analyze(
        &self,
        inputs: &IncorporationInputs,
    ) -> IncorporationAnalysis {
        let individual = self.individual_burden(
            inputs.salary,
            inputs.business_income,
            inputs.business_expenses,
            inputs.consider_social_insurance,
        );
        let corporate = self.corporate_burden(
            inputs.business_income,
            inputs.business_expenses,
            inputs.desired_officer_salary,
            inputs.setup_cost,
            inputs.consider_social_insurance,
        );

        let break_even_curve = self.break_even_search(inputs);
        let break_even_point = break_even_curve.resolved();

        let future_projection = project_future(
            inputs.business_income,
            inputs.expected_annual_growth_rate,
            break_even_point,
            self.projection_years,
        );
        let recommendation = recommend(
            &individual,
            &corporate,
            break_even_point,
            inputs.business_income,
        );
        let current_difference = corporate.net_income - individual.net_income;

        debug!(
            individual_net = %individual.net_income,
            corporate_net = %corporate.net_income,
            break_even = %break_even_point,
            ?recommendation,
            "analyzed incorporation"
        );

        IncorporationAnalysis {
            individual,
            corporate,
            break_even_point,
            break_even_curve,
            future_projection,
            recommendation,
            current_difference,
        }
    }

    pub fn individual_burden(
        &self,
        salary: Decimal,
        business_income: Decimal,
        business_expenses: Decimal,
        consider_social_insurance: bool,
    ) -> IndividualTaxBurden {
        let business = &self.tables().business;

        // Steps 1-2
        let business_profit = non_negative(business_income - business_expenses);
        let taxable_business_income =
            non_negative(business_profit - business.blue_return_deduction);

        // Step 3
        let salary_taxable = self.schedule().salary_taxable_income(salary);
        let with_business = self
            .aggregator
            .personal_tax(salary_taxable + taxable_business_income);
        let salary_only = self.aggregator.personal_tax(salary_taxable);
        let income_tax = with_business.income_tax - salary_only.income_tax;
        let resident_tax = with_business.resident_tax - salary_only.resident_tax;

        // Step 4
        let business_tax = round_yen(
            non_negative(business_profit - business.business_tax_deduction)
                * business.business_tax_rate,
        );

        // Step 5
        let health_insurance = if consider_social_insurance {
            round_yen(
                (taxable_business_income * business.health_insurance_rate)
                    .min(business.health_insurance_cap),
            )
        } else {
            Decimal::ZERO
        };

        // Step 6
        let total_tax = income_tax + resident_tax + business_tax + health_insurance;

        IndividualTaxBurden {
            business_profit,
            taxable_business_income,
            income_tax,
            resident_tax,
            business_tax,
            health_insurance,
            total_tax,
            net_income: business_profit - total_tax,
        }
    }

    pub fn corporate_burden(
        &self,
        business_income: Decimal,
        business_expenses: Decimal,
        officer_salary: Decimal,
        setup_cost: Decimal,
        consider_social_insurance: bool,
    ) -> CorporateTaxBurden {
        let corporate = &self.tables().corporate;
        let schedule = self.schedule();

        // Steps 1-2
        let business_profit = non_negative(business_income - business_expenses);
        let premiums = if consider_social_insurance {
            schedule.social_insurance(officer_salary)
        } else {
            SocialInsurancePremiums::none()
        };
        let employer_social_insurance = brackets::employer_share(&premiums);
        let amortization = round_yen(safe_div(
            setup_cost,
            Decimal::from(corporate.amortization_years),
        ));
        let deductions = officer_salary + employer_social_insurance + amortization;

        // Steps 3-5
        let taxable_income = non_negative(business_profit - deductions);
        let corporate_tax = self.corporate_tax(taxable_income);
        let local_tax = round_yen(taxable_income * corporate.local_rate);
        let per_capita_levy = corporate.per_capita_levy;
        let company_taxes = corporate_tax + local_tax + per_capita_levy;

        // Step 6
        let retained_earnings = business_profit - deductions - company_taxes;

        // Step 7
        let officer_taxable = schedule.salary_taxable_income(officer_salary);
        let personal = self.aggregator.personal_tax(officer_taxable);
        let personal_social_insurance = brackets::total(&premiums);
        let personal_net_income =
            officer_salary - personal.sum() - personal_social_insurance;

        // Step 8
        let total_tax = company_taxes
            + employer_social_insurance
            + personal.sum()
            + personal_social_insurance;

        CorporateTaxBurden {
            business_profit,
            officer_salary,
            employer_social_insurance,
            amortization,
            taxable_income,
            corporate_tax,
            local_tax,
            per_capita_levy,
            retained_earnings,
            personal_income_tax: personal.income_tax,
            personal_resident_tax: personal.resident_tax,
            personal_social_insurance,
            personal_net_income,
            total_tax,
            net_income: retained_earnings + personal_net_income,
        }
    }

    fn corporate_tax(
        &self,
        taxable_income: Decimal,
    ) -> Decimal {
        let corporate = &self.tables().corporate;
        let reduced = taxable_income.min(corporate.reduced_rate_ceiling) * corporate.reduced_rate;
        let standard = non_negative(taxable_income - corporate.reduced_rate_ceiling)
            * corporate.standard_rate;
        round_yen(reduced + standard)
    }

    /// Samples both burdens across the fixed income range and reports the
    /// first upward crossing.
    ///
    /// The officer salary is [`OFFICER_SALARY_RATIO`] of the salary and social
    /// insurance is always considered. The delta is not assumed to cross zero
    /// only once; later crossings are kept in the samples.
    pub fn break_even_search(
        &self,
        inputs: &IncorporationInputs,
    ) -> BreakEvenCurve {
        let officer_salary = round_yen(inputs.salary * OFFICER_SALARY_RATIO);

        let mut samples = Vec::new();
        let mut break_even_point = None;
        let mut income = BREAK_EVEN_START;

        while income <= BREAK_EVEN_END {
            let individual =
                self.individual_burden(inputs.salary, income, inputs.business_expenses, true);
            let corporate = self.corporate_burden(
                income,
                inputs.business_expenses,
                officer_salary,
                inputs.setup_cost,
                true,
            );
            let delta = corporate.net_income - individual.net_income;

            if break_even_point.is_none() && delta > Decimal::ZERO {
                let previous_non_positive = samples
                    .last()
                    .is_none_or(|prev: &BreakEvenSample| prev.delta <= Decimal::ZERO);
                if previous_non_positive {
                    break_even_point = Some(income);
                }
            }

            samples.push(BreakEvenSample {
                business_income: income,
                individual_net_income: individual.net_income,
                corporate_net_income: corporate.net_income,
                delta,
            });
            income += BREAK_EVEN_STEP;
        }

        BreakEvenCurve {
            samples,
            break_even_point,
        }
    }
}

/// Compounds `current_income` by `growth_percent` for each of `years` years
/// and labels every year against `break_even`.
///
/// Income that outgrows [`Decimal`] saturates at `Decimal::MAX`.
pub fn project_future(
    current_income: Decimal,
    growth_percent: Decimal,
    break_even: Decimal,
    years: u32,
) -> Vec<ProjectionPoint> {
    let factor = Decimal::ONE.saturating_add(growth_percent / Decimal::ONE_HUNDRED);
    let mut income = current_income;

    (1..=years)
        .map(|year| {
            income = income.saturating_mul(factor);
            let projected_income = round_yen(income);
            let above_break_even = projected_income >= break_even;
            let label = if above_break_even {
                ProjectionLabel::Incorporate
            } else if projected_income >= break_even * PREPARE_RATIO {
                ProjectionLabel::Prepare
            } else {
                ProjectionLabel::SoleProprietor
            };
            let estimated_savings = if above_break_even {
                round_yen(projected_income.saturating_mul(SAVINGS_RATIO))
            } else {
                Decimal::ZERO
            };

            ProjectionPoint {
                year,
                projected_income,
                above_break_even,
                label,
                estimated_savings,
            }
        })
        .collect()
}

pub fn recommend(
    individual: &IndividualTaxBurden,
    corporate: &CorporateTaxBurden,
    break_even: Decimal,
    current_income: Decimal,
) -> Recommendation {
    Recommendation::from_conditions(
        corporate.net_income > individual.net_income,
        current_income >= break_even,
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn analyzer() -> IncorporationAnalyzer<'static> {
        IncorporationAnalyzer::new(RateTables::standard())
    }

    fn inputs(business_income: Decimal) -> IncorporationInputs {
        IncorporationInputs {
            salary: dec!(5000000),
            business_income,
            business_expenses: dec!(1000000),
            desired_officer_salary: dec!(4000000),
            setup_cost: dec!(300000),
            expected_annual_growth_rate: dec!(10),
            consider_social_insurance: true,
        }
    }

    // =========================================================================
    // individual_burden tests
    // =========================================================================

    #[test]
    fn individual_burden_with_social_insurance() {
        let burden = analyzer().individual_burden(dec!(5000000), dec!(8000000), dec!(1000000), true);

        assert_eq!(
            burden,
            IndividualTaxBurden {
                business_profit: dec!(7000000),
                taxable_business_income: dec!(6350000),
                income_tax: dec!(1365400),
                resident_tax: dec!(635000),
                business_tax: dec!(205000),
                health_insurance: dec!(635000),
                total_tax: dec!(2840400),
                net_income: dec!(4159600),
            }
        );
    }

    #[test]
    fn individual_burden_without_social_insurance_skips_health_insurance() {
        let burden = analyzer().individual_burden(dec!(5000000), dec!(8000000), dec!(1000000), false);

        assert_eq!(burden.health_insurance, dec!(0));
        assert_eq!(burden.net_income, dec!(4794600));
    }

    #[test]
    fn individual_burden_caps_health_insurance() {
        let burden = analyzer().individual_burden(dec!(5000000), dec!(30000000), dec!(0), true);

        assert_eq!(burden.health_insurance, dec!(1060000));
    }

    #[test]
    fn individual_burden_below_business_tax_deduction() {
        let burden = analyzer().individual_burden(dec!(5000000), dec!(2000000), dec!(0), true);

        assert_eq!(burden.business_tax, dec!(0));
    }

    #[test]
    fn individual_burden_with_loss_is_zero() {
        let burden = analyzer().individual_burden(dec!(5000000), dec!(500000), dec!(800000), true);

        assert_eq!(burden.business_profit, dec!(0));
        assert_eq!(burden.total_tax, dec!(0));
        assert_eq!(burden.net_income, dec!(0));
    }

    // =========================================================================
    // corporate_burden tests
    // =========================================================================

    #[test]
    fn corporate_burden_with_social_insurance() {
        let burden = analyzer().corporate_burden(
            dec!(8000000),
            dec!(1000000),
            dec!(4000000),
            dec!(300000),
            true,
        );

        assert_eq!(
            burden,
            CorporateTaxBurden {
                business_profit: dec!(7000000),
                officer_salary: dec!(4000000),
                employer_social_insurance: dec!(256476),
                amortization: dec!(100000),
                taxable_income: dec!(2643524),
                corporate_tax: dec!(396529),
                local_tax: dec!(185047),
                per_capita_levy: dec!(70000),
                retained_earnings: dec!(1991948),
                personal_income_tax: dec!(130500),
                personal_resident_tax: dec!(238000),
                personal_social_insurance: dec!(268476),
                personal_net_income: dec!(3363024),
                total_tax: dec!(1545028),
                net_income: dec!(5354972),
            }
        );
    }

    #[test]
    fn corporate_tax_uses_standard_rate_above_ceiling() {
        // 8,000,000 * 15% + 2,000,000 * 23.2%
        assert_eq!(analyzer().corporate_tax(dec!(10000000)), dec!(1664000));
    }

    #[test]
    fn corporate_burden_still_owes_levy_on_a_loss() {
        let burden = analyzer().corporate_burden(
            dec!(3000000),
            dec!(1000000),
            dec!(4000000),
            dec!(0),
            false,
        );

        assert_eq!(burden.taxable_income, dec!(0));
        assert_eq!(burden.corporate_tax, dec!(0));
        assert_eq!(burden.retained_earnings, dec!(-2070000));
    }

    // =========================================================================
    // break_even_search tests
    // =========================================================================

    #[test]
    fn break_even_search_finds_first_crossing() {
        let curve = analyzer().break_even_search(&inputs(dec!(8000000)));

        assert_eq!(curve.break_even_point, Some(dec!(4500000)));
        assert_eq!(curve.samples.len(), 39);
        assert_eq!(curve.samples[0].business_income, dec!(1000000));
        assert_eq!(curve.samples[38].business_income, dec!(20000000));
    }

    #[test]
    fn break_even_search_deltas_around_crossing() {
        let curve = analyzer().break_even_search(&inputs(dec!(8000000)));

        let at = |income: Decimal| {
            curve
                .samples
                .iter()
                .find(|s| s.business_income == income)
                .map(|s| s.delta)
                .unwrap()
        };

        assert_eq!(at(dec!(4000000)), dec!(-140452));
        assert_eq!(at(dec!(4500000)), dec!(84548));
        assert!(
            curve
                .samples
                .iter()
                .filter(|s| s.business_income < dec!(4500000))
                .all(|s| s.delta <= Decimal::ZERO)
        );
    }

    #[test]
    fn resolved_uses_fallback_without_crossing() {
        let curve = BreakEvenCurve {
            samples: Vec::new(),
            break_even_point: None,
        };

        assert_eq!(curve.resolved(), BREAK_EVEN_FALLBACK);
    }

    #[test]
    fn analyze_falls_back_when_incorporation_never_wins() {
        // Expenses above every sampled income leave no profit to shelter,
        // while the company still pays the levy and officer-salary costs.
        let analysis = analyzer().analyze(&IncorporationInputs {
            business_expenses: dec!(25000000),
            ..inputs(dec!(30000000))
        });

        assert_eq!(analysis.break_even_curve.break_even_point, None);
        assert_eq!(analysis.break_even_point, dec!(5000000));
        assert_eq!(analysis.break_even_curve.samples.len(), 39);
        assert!(
            analysis
                .break_even_curve
                .samples
                .iter()
                .all(|s| s.delta < Decimal::ZERO)
        );
    }

    // =========================================================================
    // project_future tests
    // =========================================================================

    #[test]
    fn project_future_compounds_growth() {
        let points = project_future(dec!(8000000), dec!(10), dec!(4500000), 5);

        let incomes: Vec<Decimal> = points.iter().map(|p| p.projected_income).collect();
        assert_eq!(
            incomes,
            vec![
                dec!(8800000),
                dec!(9680000),
                dec!(10648000),
                dec!(11712800),
                dec!(12884080),
            ]
        );
        assert_eq!(points[0].year, 1);
        assert_eq!(points[0].estimated_savings, dec!(440000));
        assert!(points.iter().all(|p| p.label == ProjectionLabel::Incorporate));
    }

    #[test]
    fn project_future_saturates_on_extreme_growth() {
        let points = project_future(dec!(8000000), dec!(1000), dec!(5000000), 30);

        assert_eq!(points.len(), 30);
        assert_eq!(points[29].projected_income, Decimal::MAX);
        assert!(
            points
                .windows(2)
                .all(|w| w[0].projected_income <= w[1].projected_income)
        );
        assert!(points.iter().all(|p| p.label == ProjectionLabel::Incorporate));
    }

    #[test]
    fn project_future_labels_against_break_even() {
        let points = project_future(dec!(3000000), dec!(20), dec!(5000000), 3);

        // 3,600,000 / 4,320,000 / 5,184,000
        assert_eq!(points[0].label, ProjectionLabel::SoleProprietor);
        assert_eq!(points[0].estimated_savings, dec!(0));
        assert_eq!(points[1].label, ProjectionLabel::Prepare);
        assert!(!points[1].above_break_even);
        assert_eq!(points[2].label, ProjectionLabel::Incorporate);
        assert_eq!(points[2].estimated_savings, dec!(259200));
    }

    #[test]
    fn project_future_produces_requested_years() {
        assert_eq!(project_future(dec!(1000000), dec!(5), dec!(5000000), 7).len(), 7);
        assert!(project_future(dec!(1000000), dec!(5), dec!(5000000), 0).is_empty());
    }

    #[test]
    fn project_future_strictly_increases_with_positive_growth() {
        let points = project_future(dec!(2500000), dec!(3), dec!(5000000), 10);

        assert!(
            points
                .windows(2)
                .all(|w| w[1].projected_income > w[0].projected_income)
        );
    }

    // =========================================================================
    // recommend / analyze tests
    // =========================================================================

    #[test]
    fn recommendation_decision_table() {
        assert_eq!(Recommendation::from_conditions(true, true), Recommendation::Recommended);
        assert_eq!(Recommendation::from_conditions(true, false), Recommendation::Consider);
        assert_eq!(Recommendation::from_conditions(false, true), Recommendation::Consider);
        assert_eq!(Recommendation::from_conditions(false, false), Recommendation::NotYet);
    }

    #[test]
    fn every_recommendation_has_action_items() {
        for band in [
            Recommendation::Recommended,
            Recommendation::Consider,
            Recommendation::NotYet,
        ] {
            assert!(!band.action_items().is_empty());
            assert!(!band.title().is_empty());
        }
    }

    #[test]
    fn analyze_high_income_recommends_incorporation() {
        let analysis = analyzer().analyze(&inputs(dec!(8000000)));

        assert_eq!(analysis.current_difference, dec!(1195372));
        assert_eq!(analysis.break_even_point, dec!(4500000));
        assert_eq!(analysis.recommendation, Recommendation::Recommended);
        assert_eq!(analysis.future_projection.len(), 5);
    }

    #[test]
    fn analyze_low_income_is_not_yet() {
        let analysis = analyzer().analyze(&inputs(dec!(3000000)));

        assert!(analysis.current_difference < Decimal::ZERO);
        assert_eq!(analysis.recommendation, Recommendation::NotYet);
    }

    #[test]
    fn analyze_respects_projection_years() {
        let analysis = analyzer()
            .with_projection_years(2)
            .analyze(&inputs(dec!(8000000)));

        assert_eq!(analysis.future_projection.len(), 2);
    }

    #[test]
    fn analyze_caps_projection_years() {
        let analysis = analyzer()
            .with_projection_years(u32::MAX)
            .analyze(&inputs(dec!(8000000)));

        assert_eq!(analysis.future_projection.len(), 50);
    }
}
