//! Japanese income tax, resident tax and social insurance calculations for a
//! salaried worker with a side business.
//!
//! The free functions below run against [`RateTables::standard`]. Use the
//! calculator types in [`calculations`] to run against other tables.

pub mod calculations;
pub mod models;

pub use models::*;

use calculations::{
    IncorporationAnalysis, IncorporationAnalyzer, OptimizationEngine, OptimizationPlan, RoiAnalyzer,
    RoiResult, Selection, SimulationResult, TaxAggregator, TaxResult,
};

/// Combined tax for a salary plus side income.
pub fn compute_tax(inputs: &TaxInputs) -> TaxResult {
    TaxAggregator::new(RateTables::standard()).compute(inputs)
}

/// Profitability of the side business after tax.
pub fn compute_roi(inputs: &RoiInputs) -> RoiResult {
    RoiAnalyzer::new(RateTables::standard()).compute(inputs)
}

/// Sole proprietor versus incorporation, with break-even and projection.
pub fn analyze_incorporation(inputs: &IncorporationInputs) -> IncorporationAnalysis {
    IncorporationAnalyzer::new(RateTables::standard()).analyze(inputs)
}

/// Material tax-reduction strategies, highest priority first.
pub fn build_optimization_plan(profile: &FinancialProfile) -> OptimizationPlan {
    OptimizationEngine::new(RateTables::standard()).build_plan(profile)
}

/// Totals and roadmap for the selected strategies of `plan`.
pub fn simulate_optimization_selection(
    selections: &[Selection],
    plan: &OptimizationPlan,
) -> SimulationResult {
    calculations::optimization::simulate(selections, plan)
}
