//! Evaluation of every [`StrategyKind`] against a financial profile.
//!
//! Each kind has its own evaluator. An evaluator returns `None` when the
//! strategy fails its materiality check, so only worthwhile suggestions reach
//! the plan.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, warn};

use super::catalog::{EXPENSE_CATALOG, StrategyKind, marginal_tax_rate};
use super::{
    ExpenseCategoryEstimate, ExpenseItemEstimate, OptimizationPlan, OptimizationStrategy,
    StrategyDetails,
};
use crate::calculations::aggregator::{TaxAggregator, TaxResult};
use crate::calculations::common::{compound, floor_to, format_yen, non_negative, round_yen};
use crate::calculations::incorporation::{
    DEFAULT_SETUP_COST, IncorporationAnalyzer, OFFICER_SALARY_RATIO,
};
use crate::{BusinessType, FinancialProfile, IncorporationInputs, RateTables};

const DONATION_SELF_BURDEN: Decimal = dec!(2000);
const DONATION_RESIDENT_TAX_SHARE: Decimal = dec!(0.2);
const DONATION_RETURN_RATIO: Decimal = dec!(0.3);
const DONATION_UNIT: Decimal = dec!(1000);
const DONATION_MINIMUM: Decimal = dec!(10000);

const DEFAULT_EXPENSE_RATE: Decimal = dec!(0.25);
const EXPENSE_HEADROOM_MINIMUM: Decimal = dec!(100000);

const MUTUAL_AID_CONTRIBUTION: Decimal = dec!(840000);
const MUTUAL_AID_RETURN: Decimal = dec!(1.02);

const IDECO_CONTRIBUTION: Decimal = dec!(276000);
const IDECO_GROWTH: Decimal = dec!(0.03);
const IDECO_YEARS: u32 = 20;
const IDECO_MINIMUM_BENEFIT: Decimal = dec!(10000);

const LIFE_INSURANCE_PREMIUM: Decimal = dec!(120000);
const LIFE_INSURANCE_DEDUCTION_CAP: Decimal = dec!(40000);
const LIFE_INSURANCE_COVERAGE_MULTIPLE: Decimal = dec!(10);

const INCORPORATION_PROFIT_FLOOR: Decimal = dec!(3000000);
const INCORPORATION_MINIMUM_BENEFIT: Decimal = dec!(100000);

const NISA_SHARE_OF_NET_INCOME: Decimal = dec!(0.1);
const NISA_MINIMUM_FUNDS: Decimal = dec!(100000);
const NISA_ANNUAL_CAP: Decimal = dec!(400000);
const NISA_EXPECTED_RETURN: Decimal = dec!(0.05);
const NISA_TAX_RATE: Decimal = dec!(0.2);
const NISA_YEARS: u32 = 10;

/// Benefit, description and details produced by one evaluator.
struct Evaluation {
    annual_benefit: Decimal,
    description: String,
    details: StrategyDetails,
}

/// Builds an [`OptimizationPlan`] for a [`FinancialProfile`].
#[derive(Debug, Clone, Copy)]
pub struct OptimizationEngine<'a> {
    aggregator: TaxAggregator<'a>,
    incorporation: IncorporationAnalyzer<'a>,
}

impl<'a> OptimizationEngine<'a> {
    pub fn new(tables: &'a RateTables) -> Self {
        Self {
            aggregator: TaxAggregator::new(tables),
            incorporation: IncorporationAnalyzer::new(tables),
        }
    }

    /// Evaluates every strategy, drops the immaterial ones and sorts the rest
    /// by descending priority.
    pub fn build_plan(
        &self,
        profile: &FinancialProfile,
    ) -> OptimizationPlan {
        let current_tax = self.aggregator.compute(&profile.tax_inputs());

        let mut optimizations: Vec<OptimizationStrategy> = StrategyKind::ALL
            .into_iter()
            .filter_map(|kind| {
                let evaluation = self.evaluate(kind, profile, &current_tax)?;
                Some(strategy(kind, evaluation))
            })
            .collect();
        optimizations.sort_by(|a, b| b.priority.cmp(&a.priority));

        let total_potential_saving: Decimal = optimizations.iter().map(|s| s.annual_benefit).sum();

        debug!(
            strategies = optimizations.len(),
            total_potential_saving = %total_potential_saving,
            "built optimization plan"
        );

        OptimizationPlan {
            current_tax,
            optimizations,
            total_potential_saving,
        }
    }

    fn evaluate(
        &self,
        kind: StrategyKind,
        profile: &FinancialProfile,
        current_tax: &TaxResult,
    ) -> Option<Evaluation> {
        match kind {
            StrategyKind::FurusatoNozei => furusato_nozei(profile, current_tax),
            StrategyKind::ExpenseOptimization => expense_optimization(profile),
            StrategyKind::SmallBusinessMutualAid => small_business_mutual_aid(profile),
            StrategyKind::IndividualPension => individual_pension(profile),
            StrategyKind::LifeInsurance => Some(life_insurance(profile)),
            StrategyKind::Incorporation => self.incorporation_benefit(profile),
            StrategyKind::TsumitateNisa => tsumitate_nisa(current_tax),
        }
    }

    fn incorporation_benefit(
        &self,
        profile: &FinancialProfile,
    ) -> Option<Evaluation> {
        let profit = profile.side_income - profile.expenses;
        if profit <= INCORPORATION_PROFIT_FLOOR {
            return None;
        }

        let inputs = IncorporationInputs {
            salary: profile.salary,
            business_income: profile.side_income,
            business_expenses: profile.expenses,
            desired_officer_salary: round_yen(profile.salary * OFFICER_SALARY_RATIO),
            setup_cost: DEFAULT_SETUP_COST,
            expected_annual_growth_rate: Decimal::ZERO,
            consider_social_insurance: true,
        };
        let individual = self.incorporation.individual_burden(
            inputs.salary,
            inputs.business_income,
            inputs.business_expenses,
            inputs.consider_social_insurance,
        );
        let corporate = self.incorporation.corporate_burden(
            inputs.business_income,
            inputs.business_expenses,
            inputs.desired_officer_salary,
            inputs.setup_cost,
            inputs.consider_social_insurance,
        );

        let benefit = corporate.net_income - individual.net_income;
        if benefit <= INCORPORATION_MINIMUM_BENEFIT {
            return None;
        }

        let break_even_income = self.incorporation.break_even_search(&inputs).resolved();

        Some(Evaluation {
            annual_benefit: benefit,
            description: format!(
                "Incorporating would raise take-home pay by {} a year",
                format_yen(benefit)
            ),
            details: StrategyDetails::Incorporation {
                current_net: individual.net_income,
                corporation_net: corporate.net_income,
                saving_amount: benefit,
                break_even_income,
            },
        })
    }
}

fn strategy(
    kind: StrategyKind,
    evaluation: Evaluation,
) -> OptimizationStrategy {
    OptimizationStrategy {
        id: kind.id().to_string(),
        kind,
        category: kind.category().to_string(),
        title: kind.title().to_string(),
        description: evaluation.description,
        annual_benefit: evaluation.annual_benefit,
        implementation: kind.implementation(),
        difficulty: kind.difficulty(),
        priority: kind.priority(),
        details: evaluation.details,
        action_steps: kind.action_steps().iter().map(|s| s.to_string()).collect(),
    }
}

/// Largest donation fully credited against tax: the smaller of 20% of the
/// resident tax and 30% of income above the self-burden, in 1,000 yen units.
pub fn furusato_donation_limit(
    income: Decimal,
    resident_tax: Decimal,
) -> Decimal {
    let limit = (resident_tax * DONATION_RESIDENT_TAX_SHARE)
        .min((income - DONATION_SELF_BURDEN) * DONATION_RETURN_RATIO);
    non_negative(floor_to(limit, DONATION_UNIT))
}

fn furusato_nozei(
    profile: &FinancialProfile,
    current_tax: &TaxResult,
) -> Option<Evaluation> {
    let income = profile.salary + profile.side_income - profile.expenses;
    let max_donation = furusato_donation_limit(income, current_tax.resident_tax);
    if max_donation <= DONATION_MINIMUM {
        return None;
    }

    let return_value = round_yen(max_donation * DONATION_RETURN_RATIO);
    let net_benefit = return_value - DONATION_SELF_BURDEN;

    Some(Evaluation {
        annual_benefit: net_benefit,
        description: format!("Donate up to {} a year", format_yen(max_donation)),
        details: StrategyDetails::FurusatoNozei {
            max_donation,
            tax_reduction: non_negative(max_donation - DONATION_SELF_BURDEN),
            return_value,
            real_cost: DONATION_SELF_BURDEN,
        },
    })
}

/// Estimated deductible amounts for every catalog category.
pub fn expense_estimates() -> Vec<ExpenseCategoryEstimate> {
    EXPENSE_CATALOG
        .iter()
        .map(|category| {
            let items: Vec<ExpenseItemEstimate> = category
                .items
                .iter()
                .map(|item| ExpenseItemEstimate {
                    name: item.name.to_string(),
                    description: item.description.to_string(),
                    estimated_amount: item.estimate.annual_amount(),
                })
                .filter(|item| item.estimated_amount > Decimal::ZERO)
                .collect();
            ExpenseCategoryEstimate {
                category: category.name.to_string(),
                total: items.iter().map(|i| i.estimated_amount).sum(),
                items,
            }
        })
        .filter(|category| category.total > Decimal::ZERO)
        .collect()
}

fn expense_optimization(profile: &FinancialProfile) -> Option<Evaluation> {
    let categories = expense_estimates();
    let potential_expenses: Decimal = categories.iter().map(|c| c.total).sum();
    let additional_expenses = non_negative(potential_expenses - profile.expenses);
    if additional_expenses <= EXPENSE_HEADROOM_MINIMUM {
        return None;
    }

    let rate = profile.marginal_tax_rate.unwrap_or(DEFAULT_EXPENSE_RATE);
    if !(Decimal::ZERO..=Decimal::ONE).contains(&rate) {
        warn!(rate = %rate, "marginal tax rate outside 0..=1");
    }

    Some(Evaluation {
        annual_benefit: round_yen(additional_expenses * rate),
        description: format!(
            "Claim an extra {} of expenses a year",
            format_yen(additional_expenses)
        ),
        details: StrategyDetails::ExpenseOptimization {
            current_expenses: profile.expenses,
            potential_expenses,
            additional_expenses,
            categories,
        },
    })
}

fn profile_marginal_rate(profile: &FinancialProfile) -> Decimal {
    marginal_tax_rate(profile.salary + profile.side_income)
}

fn small_business_mutual_aid(profile: &FinancialProfile) -> Option<Evaluation> {
    if profile.business_type != BusinessType::SoleProprietor {
        return None;
    }

    let tax_reduction = round_yen(MUTUAL_AID_CONTRIBUTION * profile_marginal_rate(profile));

    Some(Evaluation {
        annual_benefit: tax_reduction,
        description: format!(
            "Save tax on {} of yearly contributions",
            format_yen(MUTUAL_AID_CONTRIBUTION)
        ),
        details: StrategyDetails::SmallBusinessMutualAid {
            max_contribution: MUTUAL_AID_CONTRIBUTION,
            tax_reduction,
            future_return: round_yen(MUTUAL_AID_CONTRIBUTION * MUTUAL_AID_RETURN),
        },
    })
}

/// Contributions are deductible only up to the income they offset, so a
/// profile with little or no income falls below the materiality floor.
fn individual_pension(profile: &FinancialProfile) -> Option<Evaluation> {
    let income = non_negative(profile.salary + profile.side_income - profile.expenses);
    let deductible = IDECO_CONTRIBUTION.min(income);
    let tax_reduction = round_yen(deductible * profile_marginal_rate(profile));
    if tax_reduction < IDECO_MINIMUM_BENEFIT {
        return None;
    }

    Some(Evaluation {
        annual_benefit: tax_reduction,
        description: format!(
            "Deduct up to {} of pension contributions a year",
            format_yen(IDECO_CONTRIBUTION)
        ),
        details: StrategyDetails::IndividualPension {
            max_contribution: IDECO_CONTRIBUTION,
            tax_reduction,
            future_value: round_yen(compound(IDECO_CONTRIBUTION, IDECO_GROWTH, IDECO_YEARS)),
        },
    })
}

fn life_insurance(profile: &FinancialProfile) -> Evaluation {
    let deduction = LIFE_INSURANCE_PREMIUM.min(LIFE_INSURANCE_DEDUCTION_CAP);
    let tax_reduction = round_yen(deduction * profile_marginal_rate(profile));

    Evaluation {
        annual_benefit: tax_reduction,
        description: format!(
            "Deduct premiums of up to {} a year",
            format_yen(LIFE_INSURANCE_PREMIUM)
        ),
        details: StrategyDetails::LifeInsurance {
            max_deduction: LIFE_INSURANCE_PREMIUM,
            tax_reduction,
            protection: LIFE_INSURANCE_PREMIUM * LIFE_INSURANCE_COVERAGE_MULTIPLE,
        },
    }
}

fn tsumitate_nisa(current_tax: &TaxResult) -> Option<Evaluation> {
    let available = current_tax.net_income * NISA_SHARE_OF_NET_INCOME;
    if available <= NISA_MINIMUM_FUNDS {
        return None;
    }

    let annual_investment = round_yen(available.min(NISA_ANNUAL_CAP));
    let tax_saving = round_yen(annual_investment * NISA_EXPECTED_RETURN * NISA_TAX_RATE);
    let expected_return_10_years = round_yen(
        compound(annual_investment, NISA_EXPECTED_RETURN, NISA_YEARS) * Decimal::from(NISA_YEARS),
    );

    Some(Evaluation {
        annual_benefit: tax_saving,
        description: format!(
            "Invest {} a year tax-free",
            format_yen(annual_investment)
        ),
        details: StrategyDetails::TsumitateNisa {
            annual_investment,
            expected_return_10_years,
            tax_saving,
        },
    })
}
