//! Command-line definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use fukugyo_core::BusinessType;
use fukugyo_core::calculations::Selection;
use fukugyo_core::calculations::incorporation::{DEFAULT_SETUP_COST, MAX_PROJECTION_YEARS};
use rust_decimal::Decimal;

use crate::report::OutputFormat;
use crate::utils::parse_decimal;

/// Tax estimates for a salaried worker with a side business in Japan.
///
/// Amounts are annual yen and may use thousands separators
/// (e.g. `--salary 5,000,000`).
#[derive(Debug, Parser)]
#[command(name = "fukugyo", version, about)]
pub struct Cli {
    /// TOML rate table file to use instead of the built-in tables.
    #[arg(long, global = true, value_name = "FILE")]
    pub rates: Option<PathBuf>,

    /// CSV file replacing the income tax brackets.
    #[arg(long, global = true, value_name = "FILE")]
    pub brackets: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also append log output to this file.
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Combined tax for a salary plus side income.
    Tax(TaxArgs),

    /// Profitability of the side business after tax.
    Roi(RoiArgs),

    /// Compare staying a sole proprietor with incorporating.
    Incorporation(IncorporationArgs),

    /// List tax-saving strategies and simulate a selection of them.
    Optimize(OptimizeArgs),

    /// Build an optimization summary for every profile in a CSV file.
    Batch(BatchArgs),

    /// Print the active rate tables after validating them.
    Rates,
}

#[derive(Debug, Clone, Args)]
pub struct TaxArgs {
    /// Annual salary.
    #[arg(long, value_parser = parse_decimal)]
    pub salary: Decimal,

    /// Side-business revenue.
    #[arg(long, value_parser = parse_decimal, default_value = "0")]
    pub side_income: Decimal,

    /// Side-business expenses.
    #[arg(long, value_parser = parse_decimal, default_value = "0")]
    pub expenses: Decimal,
}

#[derive(Debug, Clone, Args)]
pub struct RoiArgs {
    #[command(flatten)]
    pub tax: TaxArgs,

    /// Hours spent on the side business per month.
    #[arg(long, value_parser = parse_decimal)]
    pub monthly_hours: Decimal,

    /// One-off investment in equipment, training and the like.
    #[arg(long, value_parser = parse_decimal, default_value = "0")]
    pub initial_investment: Decimal,
}

#[derive(Debug, Clone, Args)]
pub struct IncorporationArgs {
    /// Salary from the main job.
    #[arg(long, value_parser = parse_decimal)]
    pub salary: Decimal,

    /// Business revenue.
    #[arg(long, value_parser = parse_decimal)]
    pub business_income: Decimal,

    /// Business expenses.
    #[arg(long, value_parser = parse_decimal, default_value = "0")]
    pub business_expenses: Decimal,

    /// Officer salary the company would pay. Defaults to 80% of the salary.
    #[arg(long, value_parser = parse_decimal)]
    pub officer_salary: Option<Decimal>,

    /// One-off incorporation cost.
    #[arg(long, value_parser = parse_decimal, default_value_t = DEFAULT_SETUP_COST)]
    pub setup_cost: Decimal,

    /// Expected annual growth of business income, in percent (at most 1000).
    #[arg(long, value_parser = parse_decimal, default_value = "0", allow_hyphen_values = true)]
    pub growth_rate: Decimal,

    /// Leave social insurance on the officer salary out of the comparison.
    #[arg(long)]
    pub no_social_insurance: bool,

    /// Number of years to project (1 to 50).
    #[arg(
        long,
        default_value_t = 5,
        value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_PROJECTION_YEARS))
    )]
    pub years: u32,
}

#[derive(Debug, Clone, Args)]
pub struct ProfileArgs {
    /// Annual salary.
    #[arg(long, value_parser = parse_decimal)]
    pub salary: Decimal,

    /// Side-business revenue.
    #[arg(long, value_parser = parse_decimal, default_value = "0")]
    pub side_income: Decimal,

    /// Side-business expenses.
    #[arg(long, value_parser = parse_decimal, default_value = "0")]
    pub expenses: Decimal,

    /// How the side business is registered: individual, corporation or none.
    #[arg(long, value_parser = parse_business_type, default_value = "none")]
    pub business_type: BusinessType,

    /// Marginal rate used to value extra expenses, e.g. 0.3.
    #[arg(long, value_parser = parse_decimal)]
    pub marginal_rate: Option<Decimal>,
}

#[derive(Debug, Clone, Args)]
pub struct OptimizeArgs {
    #[command(flatten)]
    pub profile: ProfileArgs,

    /// Strategy to simulate, as `id` or `id:rate` with rate in [0, 1].
    /// Repeat for several strategies.
    #[arg(long = "select", value_name = "ID[:RATE]")]
    pub selections: Vec<Selection>,
}

#[derive(Debug, Clone, Args)]
pub struct BatchArgs {
    /// CSV file with columns
    /// name,salary,side_income,expenses[,business_type][,marginal_tax_rate].
    pub profiles: PathBuf,
}

fn parse_business_type(s: &str) -> Result<BusinessType, String> {
    BusinessType::parse(s).ok_or_else(|| {
        format!("unknown business type '{s}' (expected individual, corporation or none)")
    })
}
