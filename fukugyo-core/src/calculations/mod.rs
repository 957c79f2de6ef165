//! Tax, ROI, incorporation and optimization calculators.
//!
//! Every calculator borrows a [`RateTables`](crate::RateTables) and is a pure
//! function of its inputs.

pub mod aggregator;
pub mod brackets;
pub mod common;
pub mod incorporation;
pub mod optimization;
pub mod roi;

pub use aggregator::{TaxAggregator, TaxComparison, TaxResult};
pub use brackets::{SocialInsurancePremiums, TaxSchedule};
pub use incorporation::{
    BreakEvenCurve, BreakEvenSample, CorporateTaxBurden, IncorporationAnalysis,
    IncorporationAnalyzer, IndividualTaxBurden, ProjectionLabel, ProjectionPoint, Recommendation,
    project_future, recommend,
};
pub use optimization::{
    OptimizationEngine, OptimizationPlan, OptimizationStrategy, Selection, SimulationResult,
    StrategyDetails, StrategyKind,
};
pub use roi::{Advisory, RoiAnalyzer, RoiResult};
