//! Subcommand execution. Each command returns its rendered output.

use anyhow::{Context, Result};
use fukugyo_core::calculations::common::round_yen;
use fukugyo_core::calculations::incorporation::OFFICER_SALARY_RATIO;
use fukugyo_core::calculations::optimization::simulate;
use fukugyo_core::calculations::{
    IncorporationAnalyzer, OptimizationEngine, RoiAnalyzer, TaxAggregator,
};
use fukugyo_core::{FinancialProfile, IncorporationInputs, RateTables, RoiInputs, TaxInputs};
use fukugyo_data::{RateTableLoader, profiles};
use tracing::{debug, info};

use crate::cli::{
    BatchArgs, Cli, Command, IncorporationArgs, OptimizeArgs, ProfileArgs, RoiArgs, TaxArgs,
};
use crate::report::{BatchReport, BatchRow, OptimizationReport, OutputFormat, render};

/// Loads the rate tables the flags ask for and runs the subcommand.
pub fn run(cli: &Cli) -> Result<String> {
    let tables = RateTableLoader::load(cli.rates.as_deref(), cli.brackets.as_deref())
        .context("Failed to load rate tables")?;
    debug!(label = %tables.label, "using rate tables");

    match &cli.command {
        Command::Tax(args) => tax(&tables, args, cli.format),
        Command::Roi(args) => roi(&tables, args, cli.format),
        Command::Incorporation(args) => incorporation(&tables, args, cli.format),
        Command::Optimize(args) => optimize(&tables, args, cli.format),
        Command::Batch(args) => batch(&tables, args, cli.format),
        Command::Rates => rates(&tables, cli.format),
    }
}

fn tax_inputs(args: &TaxArgs) -> Result<TaxInputs> {
    TaxInputs::new(args.salary, args.side_income, args.expenses).context("Invalid tax inputs")
}

fn tax(
    tables: &RateTables,
    args: &TaxArgs,
    format: OutputFormat,
) -> Result<String> {
    let inputs = tax_inputs(args)?;
    let result = TaxAggregator::new(tables).compute(&inputs);
    render(&result, format)
}

fn roi(
    tables: &RateTables,
    args: &RoiArgs,
    format: OutputFormat,
) -> Result<String> {
    let inputs = RoiInputs::new(
        tax_inputs(&args.tax)?,
        args.monthly_hours,
        args.initial_investment,
    )
    .context("Invalid ROI inputs")?;
    let result = RoiAnalyzer::new(tables).compute(&inputs);
    render(&result, format)
}

fn incorporation(
    tables: &RateTables,
    args: &IncorporationArgs,
    format: OutputFormat,
) -> Result<String> {
    let inputs = IncorporationInputs {
        salary: args.salary,
        business_income: args.business_income,
        business_expenses: args.business_expenses,
        desired_officer_salary: args
            .officer_salary
            .unwrap_or_else(|| round_yen(args.salary * OFFICER_SALARY_RATIO)),
        setup_cost: args.setup_cost,
        expected_annual_growth_rate: args.growth_rate,
        consider_social_insurance: !args.no_social_insurance,
    };
    inputs.validate().context("Invalid incorporation inputs")?;

    let analysis = IncorporationAnalyzer::new(tables)
        .with_projection_years(args.years)
        .analyze(&inputs);
    render(&analysis, format)
}

fn financial_profile(args: &ProfileArgs) -> Result<FinancialProfile> {
    let profile = FinancialProfile {
        salary: args.salary,
        side_income: args.side_income,
        expenses: args.expenses,
        business_type: args.business_type,
        marginal_tax_rate: args.marginal_rate,
    };
    profile.validate().context("Invalid financial profile")?;
    Ok(profile)
}

fn optimize(
    tables: &RateTables,
    args: &OptimizeArgs,
    format: OutputFormat,
) -> Result<String> {
    let profile = financial_profile(&args.profile)?;
    let plan = OptimizationEngine::new(tables).build_plan(&profile);

    let simulation = if args.selections.is_empty() {
        None
    } else {
        Some(simulate(&args.selections, &plan))
    };
    render(&OptimizationReport { plan, simulation }, format)
}

fn batch(
    tables: &RateTables,
    args: &BatchArgs,
    format: OutputFormat,
) -> Result<String> {
    let batch = profiles::load_from_file(&args.profiles)
        .with_context(|| format!("Failed to load profiles: {}", args.profiles.display()))?;
    info!(
        count = batch.len(),
        path = %args.profiles.display(),
        "loaded profiles"
    );

    let engine = OptimizationEngine::new(tables);
    let rows = batch
        .iter()
        .map(|named| BatchRow::new(named.name.as_str(), &engine.build_plan(&named.profile)))
        .collect();
    render(&BatchReport(rows), format)
}

fn rates(
    tables: &RateTables,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Text => {
            RateTableLoader::to_toml_string(tables).context("Failed to render rate tables")
        }
        OutputFormat::Json => Ok(serde_json::to_string_pretty(tables)? + "\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    fn run_args(args: &[&str]) -> Result<String> {
        let mut argv = vec!["fukugyo"];
        argv.extend_from_slice(args);
        run(&Cli::parse_from(argv))
    }

    fn run_json(args: &[&str]) -> serde_json::Value {
        let mut argv = args.to_vec();
        argv.extend_from_slice(&["--format", "json"]);
        let output = run_args(&argv).expect("command succeeds");
        serde_json::from_str(&output).expect("valid JSON")
    }

    #[test]
    fn tax_worked_example() {
        let value = run_json(&[
            "tax",
            "--salary",
            "4,000,000",
            "--side-income",
            "1,000,000",
            "--expenses",
            "200,000",
        ]);

        assert_eq!(value["income_tax"], "210500");
        assert_eq!(value["resident_tax"], "318000");
        assert_eq!(value["comparison"]["net_increase"], "640000");
    }

    #[test]
    fn tax_rejects_expenses_above_income() {
        let err = run_args(&[
            "tax",
            "--salary",
            "4000000",
            "--side-income",
            "100000",
            "--expenses",
            "200000",
        ])
        .unwrap_err();

        assert!(format!("{err:#}").contains("must not exceed side income"));
    }

    #[test]
    fn incorporation_recommends_at_high_income() {
        let value = run_json(&[
            "incorporation",
            "--salary",
            "5,000,000",
            "--business-income",
            "8,000,000",
            "--business-expenses",
            "1,000,000",
            "--officer-salary",
            "4,000,000",
        ]);

        assert_eq!(value["recommendation"], "recommended");
        assert_eq!(value["break_even_point"], "4500000");
        assert_eq!(value["future_projection"].as_array().map(Vec::len), Some(5));
    }

    #[test]
    fn incorporation_rejects_runaway_growth() {
        let err = run_args(&[
            "incorporation",
            "--salary",
            "5000000",
            "--business-income",
            "8000000",
            "--growth-rate",
            "5000",
        ])
        .unwrap_err();

        assert!(format!("{err:#}").contains("at most 1000%"));
    }

    #[test]
    fn incorporation_with_extreme_growth_completes() {
        let value = run_json(&[
            "incorporation",
            "--salary",
            "5000000",
            "--business-income",
            "8000000",
            "--growth-rate",
            "1000",
            "--years",
            "50",
        ]);

        assert_eq!(value["future_projection"].as_array().map(Vec::len), Some(50));
    }

    #[test]
    fn optimize_without_selection_has_no_simulation() {
        let value = run_json(&[
            "optimize",
            "--salary",
            "5000000",
            "--side-income",
            "2000000",
            "--expenses",
            "300000",
            "--business-type",
            "individual",
        ]);

        assert!(value.get("simulation").is_none());
        assert_eq!(value["plan"]["current_tax"]["net_income"], "5712024");
    }

    #[test]
    fn optimize_simulates_selection() {
        let value = run_json(&[
            "optimize",
            "--salary",
            "5000000",
            "--side-income",
            "2000000",
            "--expenses",
            "300000",
            "--business-type",
            "individual",
            "--select",
            "ideco:0.5",
        ]);

        assert_eq!(value["simulation"]["total_benefit"], "45540");
    }

    #[test]
    fn rates_text_is_loadable_toml() {
        let output = run_args(&["rates"]).expect("command succeeds");

        let tables = RateTableLoader::from_toml_str(&output).expect("valid tables");

        assert_eq!(&tables, RateTables::standard());
    }

    #[test]
    fn missing_rates_file_is_an_error() {
        let err = run_args(&["rates", "--rates", "no/such/rates.toml"]).unwrap_err();

        assert!(format!("{err:#}").contains("no/such/rates.toml"));
    }
}
