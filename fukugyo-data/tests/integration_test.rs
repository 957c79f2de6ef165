//! Integration tests that load rate tables and profile batches from the
//! fixture files and feed them to the calculators.

use std::path::PathBuf;

use fukugyo_core::calculations::{OptimizationEngine, TaxAggregator, TaxSchedule};
use fukugyo_core::{BusinessType, RateTableError, RateTables, TaxInputs};
use fukugyo_data::{ProfileLoadError, RateTableLoadError, RateTableLoader, profiles};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

// =============================================================================
// Rate tables
// =============================================================================

#[test]
fn test_reiwa6_fixture_matches_builtin_tables() {
    let tables =
        RateTableLoader::from_file(&fixture_path("rates_reiwa6.toml")).expect("fixture loads");

    assert_eq!(tables, RateTables::reiwa6());
}

#[test]
fn test_loaded_tables_drive_the_aggregator() {
    let tables =
        RateTableLoader::from_file(&fixture_path("rates_reiwa6.toml")).expect("fixture loads");
    let inputs = TaxInputs::new(dec!(4000000), dec!(1000000), dec!(200000)).expect("valid");

    let result = TaxAggregator::new(&tables).compute(&inputs);

    assert_eq!(result.income_tax, dec!(210500));
    assert_eq!(result.resident_tax, dec!(318000));
    assert_eq!(result.comparison.additional_tax, dec!(160000));
}

#[test]
fn test_bracket_csv_replaces_schedule() {
    let tables = RateTableLoader::load(
        Some(&fixture_path("rates_reiwa6.toml")),
        Some(&fixture_path("brackets_two_tier.csv")),
    )
    .expect("tables load");

    assert_eq!(tables.income_tax_brackets.len(), 2);
    assert_eq!(tables.resident_tax, RateTables::reiwa6().resident_tax);

    let schedule = TaxSchedule::new(&tables);
    // 4,000,000 * 20% - 300,000
    assert_eq!(schedule.income_tax(dec!(4000000)), dec!(500000));
    assert_eq!(schedule.income_tax(dec!(1000000)), dec!(100000));
}

#[test]
fn test_bracket_csv_over_builtin_tables() {
    let tables = RateTableLoader::load(None, Some(&fixture_path("brackets_two_tier.csv")))
        .expect("tables load");

    assert_eq!(tables.label, RateTables::standard().label);
    assert_eq!(tables.income_tax_brackets[1].max_income, None);
}

#[test]
fn test_gapped_bracket_csv_is_rejected() {
    let err = RateTableLoader::load(None, Some(&fixture_path("brackets_gapped.csv")))
        .expect_err("gap should be rejected");

    let RateTableLoadError::Invalid(RateTableError::BracketGap {
        index,
        expected,
        found,
    }) = err
    else {
        panic!("Expected BracketGap, got: {:?}", err);
    };
    assert_eq!(index, 1);
    assert_eq!(expected, dec!(3000000));
    assert_eq!(found, dec!(3500000));
}

#[test]
fn test_missing_bracket_file_is_io_error() {
    let err = RateTableLoader::load(None, Some(&fixture_path("no_such_file.csv")))
        .expect_err("should fail");

    assert!(matches!(err, RateTableLoadError::Io { .. }));
}

// =============================================================================
// Profile batches
// =============================================================================

#[test]
fn test_load_profile_fixture() {
    let batch = profiles::load_from_file(&fixture_path("profiles.csv")).expect("fixture loads");

    assert_eq!(batch.len(), 3);
    assert_eq!(batch[0].name, "designer");
    assert_eq!(batch[0].profile.business_type, BusinessType::SoleProprietor);
    assert_eq!(batch[1].profile.marginal_tax_rate, Some(dec!(0.2)));
    assert_eq!(batch[2].profile.business_type, BusinessType::Corporation);
    assert_eq!(batch[2].profile.side_income, dec!(12000000));
}

#[test]
fn test_profile_fixture_builds_plans() {
    let batch = profiles::load_from_file(&fixture_path("profiles.csv")).expect("fixture loads");
    let engine = OptimizationEngine::new(RateTables::standard());

    let designer = engine.build_plan(&batch[0].profile);

    assert_eq!(designer.current_tax.net_income, dec!(5712024));
    assert!(designer.find("small-business-mutual").is_some());
}

#[test]
fn test_profile_fixture_with_bad_business_type() {
    let err = profiles::load_from_file(&fixture_path("profiles_bad_type.csv"))
        .expect_err("should fail");

    match err {
        ProfileLoadError::InvalidBusinessType { value, row } => {
            assert_eq!(value, "llc");
            assert_eq!(row, 2);
        }
        other => panic!("expected InvalidBusinessType, got {:?}", other),
    }
}
