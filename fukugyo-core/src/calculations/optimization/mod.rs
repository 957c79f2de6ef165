//! Tax-reduction strategies for a salaried worker with a side business.
//!
//! [`catalog`] holds the fixed strategy metadata and the deductible-expense
//! catalog, [`engine`] evaluates every [`StrategyKind`] against a
//! [`FinancialProfile`](crate::FinancialProfile) and [`simulator`] turns a
//! selection of strategies into totals and a month-by-month roadmap.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fukugyo_core::{BusinessType, FinancialProfile, RateTables};
//! use fukugyo_core::calculations::optimization::{OptimizationEngine, StrategyKind};
//!
//! let profile = FinancialProfile {
//!     salary: dec!(5000000),
//!     side_income: dec!(2000000),
//!     expenses: dec!(300000),
//!     business_type: BusinessType::SoleProprietor,
//!     marginal_tax_rate: None,
//! };
//!
//! let plan = OptimizationEngine::new(RateTables::standard()).build_plan(&profile);
//!
//! assert_eq!(plan.optimizations[0].kind, StrategyKind::ExpenseOptimization);
//! assert_eq!(plan.total_potential_saving, dec!(904122));
//! ```

pub mod catalog;
pub mod engine;
pub mod simulator;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use catalog::{
    Difficulty, ExpenseCategory, ExpenseEstimate, ExpenseItem, Implementation, StrategyKind,
    EXPENSE_CATALOG, marginal_tax_rate,
};
pub use engine::OptimizationEngine;
pub use simulator::{RoadmapStep, Selection, SelectionParseError, SimulationResult, simulate};

use crate::calculations::aggregator::TaxResult;

/// Estimated annual amount for one deductible item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseItemEstimate {
    pub name: String,
    pub description: String,
    pub estimated_amount: Decimal,
}

/// Estimated annual deductible amount for one expense category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseCategoryEstimate {
    pub category: String,
    pub total: Decimal,
    pub items: Vec<ExpenseItemEstimate>,
}

/// Figures behind a strategy's annual benefit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum StrategyDetails {
    ExpenseOptimization {
        current_expenses: Decimal,
        potential_expenses: Decimal,
        additional_expenses: Decimal,
        categories: Vec<ExpenseCategoryEstimate>,
    },
    FurusatoNozei {
        max_donation: Decimal,
        tax_reduction: Decimal,
        return_value: Decimal,
        real_cost: Decimal,
    },
    SmallBusinessMutualAid {
        max_contribution: Decimal,
        tax_reduction: Decimal,
        future_return: Decimal,
    },
    Incorporation {
        current_net: Decimal,
        corporation_net: Decimal,
        saving_amount: Decimal,
        break_even_income: Decimal,
    },
    TsumitateNisa {
        annual_investment: Decimal,
        expected_return_10_years: Decimal,
        tax_saving: Decimal,
    },
    IndividualPension {
        max_contribution: Decimal,
        tax_reduction: Decimal,
        future_value: Decimal,
    },
    LifeInsurance {
        max_deduction: Decimal,
        tax_reduction: Decimal,
        protection: Decimal,
    },
}

/// A strategy that passed its materiality check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizationStrategy {
    pub id: String,
    pub kind: StrategyKind,
    pub category: String,
    pub title: String,
    pub description: String,
    pub annual_benefit: Decimal,
    pub implementation: Implementation,
    pub difficulty: Difficulty,
    /// 0 to 100; higher is suggested first.
    pub priority: u8,
    pub details: StrategyDetails,
    pub action_steps: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizationPlan {
    pub current_tax: TaxResult,
    /// Sorted by descending priority.
    pub optimizations: Vec<OptimizationStrategy>,
    /// Sum of every strategy's annual benefit.
    pub total_potential_saving: Decimal,
}

impl OptimizationPlan {
    pub fn find(
        &self,
        id: &str,
    ) -> Option<&OptimizationStrategy> {
        self.optimizations.iter().find(|s| s.id == id)
    }
}
