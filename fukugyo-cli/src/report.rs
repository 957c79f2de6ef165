//! Text and JSON rendering of calculator results.
//!
//! JSON output is the `serde` form of the result records. Text output is a
//! plain two-column layout with amounts formatted as `¥1,234,567`.

use std::fmt::{self, Write};

use clap::ValueEnum;
use fukugyo_core::calculations::common::format_yen;
use fukugyo_core::calculations::optimization::RoadmapStep;
use fukugyo_core::calculations::{
    IncorporationAnalysis, OptimizationPlan, RoiResult, SimulationResult, StrategyDetails,
    TaxResult,
};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::utils::opt_yen_display;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Human-readable rendering of a result record.
pub trait TextReport {
    fn write_text(
        &self,
        out: &mut String,
    ) -> fmt::Result;
}

/// Renders `value` in the requested format.
pub fn render<T: Serialize + TextReport>(
    value: &T,
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)? + "\n"),
        OutputFormat::Text => {
            let mut out = String::new();
            value.write_text(&mut out)?;
            Ok(out)
        }
    }
}

const LABEL_WIDTH: usize = 30;
const VALUE_WIDTH: usize = 14;

fn heading(
    out: &mut String,
    title: &str,
) -> fmt::Result {
    writeln!(out, "{title}")?;
    writeln!(out, "{}", "-".repeat(LABEL_WIDTH + VALUE_WIDTH))
}

fn yen_row(
    out: &mut String,
    label: &str,
    amount: Decimal,
) -> fmt::Result {
    text_row(out, label, format_yen(amount))
}

fn text_row(
    out: &mut String,
    label: &str,
    value: impl fmt::Display,
) -> fmt::Result {
    writeln!(
        out,
        "{:<lw$}{:>vw$}",
        label,
        value.to_string(),
        lw = LABEL_WIDTH,
        vw = VALUE_WIDTH
    )
}

fn percent_row(
    out: &mut String,
    label: &str,
    percent: Decimal,
) -> fmt::Result {
    text_row(out, label, format!("{}%", percent.round_dp(2)))
}

// ---------------------------------------------------------------------------
// Tax
// ---------------------------------------------------------------------------

impl TextReport for TaxResult {
    fn write_text(
        &self,
        out: &mut String,
    ) -> fmt::Result {
        heading(out, "Tax estimate")?;
        yen_row(out, "Total income", self.total_income)?;
        yen_row(out, "Income tax", self.income_tax)?;
        yen_row(out, "Resident tax", self.resident_tax)?;
        yen_row(out, "Social insurance", self.social_insurance)?;
        yen_row(out, "Total tax", self.total_tax)?;
        yen_row(out, "Net income", self.net_income)?;
        writeln!(out)?;

        heading(out, "Effect of the side income")?;
        yen_row(out, "Tax on salary alone", self.comparison.salary_only_tax)?;
        yen_row(out, "Additional tax", self.comparison.additional_tax)?;
        yen_row(out, "Net increase", self.comparison.net_increase)?;
        percent_row(
            out,
            "Kept per yen earned",
            self.comparison.roi * Decimal::ONE_HUNDRED,
        )
    }
}

// ---------------------------------------------------------------------------
// ROI
// ---------------------------------------------------------------------------

impl TextReport for RoiResult {
    fn write_text(
        &self,
        out: &mut String,
    ) -> fmt::Result {
        heading(out, "Side business return")?;
        yen_row(out, "Gross profit", self.gross_profit)?;
        yen_row(out, "Net profit after tax", self.net_profit)?;
        yen_row(out, "Total investment", self.total_investment)?;
        text_row(out, "Hours per year", self.yearly_hours)?;
        percent_row(out, "Total ROI", self.total_roi)?;
        yen_row(out, "Hourly rate", self.hourly_rate)?;
        yen_row(out, "Real hourly rate", self.real_hourly_rate)?;
        percent_row(out, "Net profit margin", self.net_profit_margin)?;
        text_row(
            out,
            "Payback period",
            format!("{} months", self.payback_period_months),
        )?;
        text_row(
            out,
            "Efficiency score",
            format!("{}/100", self.efficiency_score),
        )?;

        if !self.advisories.is_empty() {
            writeln!(out)?;
            writeln!(out, "Advice")?;
            for advisory in &self.advisories {
                writeln!(out, "  * {advisory}")?;
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Incorporation
// ---------------------------------------------------------------------------

impl TextReport for IncorporationAnalysis {
    fn write_text(
        &self,
        out: &mut String,
    ) -> fmt::Result {
        heading(out, "Sole proprietor")?;
        yen_row(out, "Business profit", self.individual.business_profit)?;
        yen_row(out, "Income tax", self.individual.income_tax)?;
        yen_row(out, "Resident tax", self.individual.resident_tax)?;
        yen_row(out, "Business tax", self.individual.business_tax)?;
        yen_row(out, "Health insurance", self.individual.health_insurance)?;
        yen_row(out, "Total tax", self.individual.total_tax)?;
        yen_row(out, "Net income", self.individual.net_income)?;
        writeln!(out)?;

        heading(out, "Corporation")?;
        yen_row(out, "Officer salary", self.corporate.officer_salary)?;
        yen_row(
            out,
            "Employer social insurance",
            self.corporate.employer_social_insurance,
        )?;
        yen_row(out, "Taxable income", self.corporate.taxable_income)?;
        yen_row(out, "Corporate tax", self.corporate.corporate_tax)?;
        yen_row(out, "Local tax", self.corporate.local_tax)?;
        yen_row(out, "Per-capita levy", self.corporate.per_capita_levy)?;
        yen_row(out, "Retained earnings", self.corporate.retained_earnings)?;
        yen_row(out, "Personal net income", self.corporate.personal_net_income)?;
        yen_row(out, "Total tax", self.corporate.total_tax)?;
        yen_row(out, "Net income", self.corporate.net_income)?;
        writeln!(out)?;

        heading(out, "Comparison")?;
        yen_row(out, "Difference (corp - sole)", self.current_difference)?;
        yen_row(out, "Break-even income", self.break_even_point)?;
        text_row(
            out,
            "Crossing found in range",
            opt_yen_display(&self.break_even_curve.break_even_point),
        )?;
        writeln!(out)?;

        writeln!(out, "Projection")?;
        for point in &self.future_projection {
            writeln!(
                out,
                "  Year {}: {:>14}  {:<24} savings {}",
                point.year,
                format_yen(point.projected_income),
                point.label.as_str(),
                format_yen(point.estimated_savings),
            )?;
        }
        writeln!(out)?;

        writeln!(out, "{}", self.recommendation.title())?;
        writeln!(out, "  {}", self.recommendation.explanation())?;
        for item in self.recommendation.action_items() {
            writeln!(out, "  * {item}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Optimization
// ---------------------------------------------------------------------------

/// A plan plus the simulation of any selected strategies.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizationReport {
    pub plan: OptimizationPlan,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simulation: Option<SimulationResult>,
}

fn details_line(details: &StrategyDetails) -> String {
    match details {
        StrategyDetails::ExpenseOptimization {
            additional_expenses,
            ..
        } => format!("additional expenses {}", format_yen(*additional_expenses)),
        StrategyDetails::FurusatoNozei {
            max_donation,
            real_cost,
            ..
        } => format!(
            "donate up to {}, real cost {}",
            format_yen(*max_donation),
            format_yen(*real_cost)
        ),
        StrategyDetails::SmallBusinessMutualAid {
            max_contribution, ..
        }
        | StrategyDetails::IndividualPension {
            max_contribution, ..
        } => format!("contribute up to {} a year", format_yen(*max_contribution)),
        StrategyDetails::Incorporation {
            break_even_income, ..
        } => format!("break-even income {}", format_yen(*break_even_income)),
        StrategyDetails::TsumitateNisa {
            annual_investment,
            expected_return_10_years,
            ..
        } => format!(
            "invest {} a year, {} after 10 years",
            format_yen(*annual_investment),
            format_yen(*expected_return_10_years)
        ),
        StrategyDetails::LifeInsurance { max_deduction, .. } => {
            format!("deduction up to {}", format_yen(*max_deduction))
        }
    }
}

fn write_roadmap(
    out: &mut String,
    roadmap: &[RoadmapStep],
) -> fmt::Result {
    writeln!(out, "Roadmap")?;
    for step in roadmap {
        writeln!(
            out,
            "  Month {:>2}: {} ({}, {})",
            step.month,
            step.title,
            step.difficulty,
            format_yen(step.expected_benefit)
        )?;
        for action in &step.action_steps {
            writeln!(out, "      - {action}")?;
        }
    }
    Ok(())
}

impl TextReport for OptimizationPlan {
    fn write_text(
        &self,
        out: &mut String,
    ) -> fmt::Result {
        heading(out, "Current position")?;
        yen_row(out, "Total tax", self.current_tax.total_tax)?;
        yen_row(out, "Net income", self.current_tax.net_income)?;
        writeln!(out)?;

        if self.optimizations.is_empty() {
            return writeln!(out, "No material savings found.");
        }

        heading(out, "Strategies")?;
        for strategy in &self.optimizations {
            writeln!(
                out,
                "[{}] {} ({})",
                strategy.id, strategy.title, strategy.category
            )?;
            writeln!(
                out,
                "    {} a year, {}, {}",
                format_yen(strategy.annual_benefit),
                strategy.implementation,
                strategy.difficulty
            )?;
            writeln!(out, "    {}", details_line(&strategy.details))?;
        }
        writeln!(out)?;
        yen_row(out, "Total potential saving", self.total_potential_saving)
    }
}

impl TextReport for SimulationResult {
    fn write_text(
        &self,
        out: &mut String,
    ) -> fmt::Result {
        heading(out, "Simulation")?;
        yen_row(out, "Current net income", self.current_net_income)?;
        yen_row(out, "Optimized net income", self.optimized_net_income)?;
        yen_row(out, "Total benefit", self.total_benefit)?;
        yen_row(out, "Implementation cost", self.implementation_cost)?;
        percent_row(out, "Return on cost", self.roi)?;
        text_row(
            out,
            "Payback period",
            format!("{} months", self.payback_period_months),
        )?;
        writeln!(out)?;
        write_roadmap(out, &self.roadmap)
    }
}

impl TextReport for OptimizationReport {
    fn write_text(
        &self,
        out: &mut String,
    ) -> fmt::Result {
        self.plan.write_text(out)?;
        if let Some(simulation) = &self.simulation {
            writeln!(out)?;
            simulation.write_text(out)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Batch
// ---------------------------------------------------------------------------

/// Headline figures for one profile of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchRow {
    pub name: String,
    pub total_income: Decimal,
    pub total_tax: Decimal,
    pub net_income: Decimal,
    pub strategies: usize,
    pub total_potential_saving: Decimal,
    /// Id of the highest-priority strategy, if any.
    pub top_strategy: Option<String>,
}

impl BatchRow {
    pub fn new(
        name: impl Into<String>,
        plan: &OptimizationPlan,
    ) -> Self {
        Self {
            name: name.into(),
            total_income: plan.current_tax.total_income,
            total_tax: plan.current_tax.total_tax,
            net_income: plan.current_tax.net_income,
            strategies: plan.optimizations.len(),
            total_potential_saving: plan.total_potential_saving,
            top_strategy: plan.optimizations.first().map(|s| s.id.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BatchReport(pub Vec<BatchRow>);

impl TextReport for BatchReport {
    fn write_text(
        &self,
        out: &mut String,
    ) -> fmt::Result {
        writeln!(
            out,
            "{:<16}{:>14}{:>14}{:>14}{:>14}  {}",
            "name", "income", "tax", "net", "saving", "top strategy"
        )?;
        for row in &self.0 {
            writeln!(
                out,
                "{:<16}{:>14}{:>14}{:>14}{:>14}  {}",
                row.name,
                format_yen(row.total_income),
                format_yen(row.total_tax),
                format_yen(row.net_income),
                format_yen(row.total_potential_saving),
                row.top_strategy.as_deref().unwrap_or("-"),
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use fukugyo_core::{
        BusinessType, FinancialProfile, TaxInputs, build_optimization_plan, compute_tax,
    };
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn worked_example() -> TaxResult {
        compute_tax(&TaxInputs::new(dec!(4000000), dec!(1000000), dec!(200000)).unwrap())
    }

    fn profile() -> FinancialProfile {
        FinancialProfile {
            salary: dec!(5000000),
            side_income: dec!(2000000),
            expenses: dec!(300000),
            business_type: BusinessType::SoleProprietor,
            marginal_tax_rate: None,
        }
    }

    #[test]
    fn tax_text_formats_yen() {
        let text = render(&worked_example(), OutputFormat::Text).unwrap();

        assert!(text.contains("¥210,500"), "{text}");
        assert!(text.contains("¥318,000"), "{text}");
        assert!(text.contains("¥640,000"), "{text}");
        assert!(text.contains("64.00%"), "{text}");
    }

    #[test]
    fn tax_json_is_the_serde_form() {
        let result = worked_example();

        let json = render(&result, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["income_tax"], "210500");
        assert_eq!(value["comparison"]["additional_tax"], "160000");
    }

    #[test]
    fn optimization_report_omits_missing_simulation() {
        let report = OptimizationReport {
            plan: build_optimization_plan(&profile()),
            simulation: None,
        };

        let json = render(&report, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert!(value.get("simulation").is_none());
        assert!(value["plan"]["optimizations"].is_array());
    }

    #[test]
    fn plan_text_lists_strategy_ids() {
        let text = render(&build_optimization_plan(&profile()), OutputFormat::Text).unwrap();

        assert!(text.contains("[furusato-nozei]"), "{text}");
        assert!(text.contains("[small-business-mutual]"), "{text}");
        assert!(text.contains("Total potential saving"), "{text}");
    }

    #[test]
    fn batch_row_takes_top_strategy() {
        let plan = build_optimization_plan(&profile());

        let row = BatchRow::new("designer", &plan);

        assert_eq!(row.net_income, dec!(5712024));
        assert_eq!(row.strategies, plan.optimizations.len());
        assert_eq!(row.top_strategy, plan.optimizations.first().map(|s| s.id.clone()));
    }

    #[test]
    fn batch_json_is_an_array() {
        let plan = build_optimization_plan(&profile());
        let report = BatchReport(vec![BatchRow::new("a", &plan), BatchRow::new("b", &plan)]);

        let json = render(&report, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value.as_array().map(Vec::len), Some(2));
        assert_eq!(value[1]["name"], "b");
    }
}
