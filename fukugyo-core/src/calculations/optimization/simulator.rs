//! What-if totals and a roadmap for a chosen subset of a plan.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fukugyo_core::{BusinessType, FinancialProfile, RateTables};
//! use fukugyo_core::calculations::optimization::{OptimizationEngine, Selection, simulate};
//!
//! let profile = FinancialProfile {
//!     salary: dec!(5000000),
//!     side_income: dec!(2000000),
//!     expenses: dec!(300000),
//!     business_type: BusinessType::SoleProprietor,
//!     marginal_tax_rate: None,
//! };
//! let plan = OptimizationEngine::new(RateTables::standard()).build_plan(&profile);
//!
//! let selections: Vec<Selection> = ["furusato-nozei", "ideco:0.5"]
//!     .iter()
//!     .map(|s| s.parse().unwrap())
//!     .collect();
//! let result = simulate(&selections, &plan);
//!
//! // 27,100 + 91,080 * 0.5
//! assert_eq!(result.total_benefit, dec!(72640));
//! ```

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use super::catalog::{Difficulty, Implementation};
use super::{OptimizationPlan, OptimizationStrategy};
use crate::calculations::common::{months_to_recover, percent, round_yen};

/// Errors from parsing a `id[:rate]` selection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionParseError {
    #[error("empty strategy id")]
    EmptyId,

    #[error("invalid applicable rate '{0}'")]
    InvalidRate(String),

    #[error("applicable rate must be between 0 and 1, got {0}")]
    RateOutOfRange(Decimal),
}

/// A strategy the user plans to adopt, and how much of its benefit applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub id: String,
    /// Share of the annual benefit counted, in `[0, 1]`. Defaults to 1 when
    /// omitted. An explicit 0 counts nothing; it is not read as "omitted".
    #[serde(default = "full_rate")]
    pub applicable_rate: Decimal,
}

fn full_rate() -> Decimal {
    Decimal::ONE
}

impl Selection {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            applicable_rate: Decimal::ONE,
        }
    }

    pub fn with_rate(
        id: impl Into<String>,
        applicable_rate: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            applicable_rate,
        }
    }
}

impl FromStr for Selection {
    type Err = SelectionParseError;

    /// Parses `id` or `id:rate`, e.g. `ideco:0.5`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, rate) = match s.split_once(':') {
            Some((id, rate)) => (id.trim(), Some(rate.trim())),
            None => (s.trim(), None),
        };
        if id.is_empty() {
            return Err(SelectionParseError::EmptyId);
        }

        let applicable_rate = match rate {
            Some(rate) => Decimal::from_str(rate)
                .map_err(|_| SelectionParseError::InvalidRate(rate.to_string()))?,
            None => Decimal::ONE,
        };
        if applicable_rate < Decimal::ZERO || applicable_rate > Decimal::ONE {
            return Err(SelectionParseError::RateOutOfRange(applicable_rate));
        }

        Ok(Self::with_rate(id, applicable_rate))
    }
}

/// One entry of the implementation roadmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapStep {
    /// 1-based month in which to start.
    pub month: u32,
    pub id: String,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub expected_benefit: Decimal,
    pub action_steps: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub current_net_income: Decimal,
    pub optimized_net_income: Decimal,
    pub total_benefit: Decimal,
    pub implementation_cost: Decimal,
    /// Benefit / cost, in percent; 0 when nothing costs anything.
    pub roi: Decimal,
    pub payback_period_months: u32,
    /// Titles of strategies that can start right away.
    pub monthly_actions: Vec<String>,
    /// Titles of strategies needing a one-off setup.
    pub one_time_actions: Vec<String>,
    pub roadmap: Vec<RoadmapStep>,
}

/// Applies `selections` to `plan`. Ids not in the plan are skipped.
pub fn simulate(
    selections: &[Selection],
    plan: &OptimizationPlan,
) -> SimulationResult {
    let chosen: Vec<(&OptimizationStrategy, Decimal)> = selections
        .iter()
        .filter_map(|selection| match plan.find(&selection.id) {
            Some(strategy) => Some((strategy, selection.applicable_rate)),
            None => {
                warn!(id = %selection.id, "selected strategy not in plan, skipping");
                None
            }
        })
        .collect();

    let total_benefit = round_yen(
        chosen
            .iter()
            .map(|(strategy, rate)| strategy.annual_benefit * *rate)
            .sum(),
    );
    let implementation_cost: Decimal = chosen
        .iter()
        .map(|(strategy, _)| strategy.implementation.setup_cost())
        .sum();

    let (monthly, one_time): (Vec<_>, Vec<_>) = chosen
        .iter()
        .partition(|(strategy, _)| strategy.implementation == Implementation::Immediate);

    let current_net_income = plan.current_tax.net_income;

    SimulationResult {
        current_net_income,
        optimized_net_income: current_net_income + total_benefit,
        total_benefit,
        implementation_cost,
        roi: percent(total_benefit, implementation_cost),
        payback_period_months: months_to_recover(implementation_cost, total_benefit),
        monthly_actions: monthly.iter().map(|(s, _)| s.title.clone()).collect(),
        one_time_actions: one_time.iter().map(|(s, _)| s.title.clone()).collect(),
        roadmap: roadmap(chosen.iter().map(|(s, _)| *s).collect()),
    }
}

/// Orders strategies soonest first, then by descending priority, and spaces
/// them by each strategy's lead time.
fn roadmap(mut strategies: Vec<&OptimizationStrategy>) -> Vec<RoadmapStep> {
    strategies.sort_by(|a, b| {
        a.implementation
            .cmp(&b.implementation)
            .then_with(|| b.priority.cmp(&a.priority))
    });

    let mut month = 1;
    strategies
        .into_iter()
        .map(|strategy| {
            let step = RoadmapStep {
                month,
                id: strategy.id.clone(),
                title: strategy.title.clone(),
                description: strategy.description.clone(),
                difficulty: strategy.difficulty,
                expected_benefit: strategy.annual_benefit,
                action_steps: strategy.action_steps.clone(),
            };
            month += strategy.implementation.lead_months();
            step
        })
        .collect()
}
