//! CSV loader for batches of financial profiles.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does not matter.
//!
//! | Column | Required | Type | Notes |
//! |---------------------|----------|---------|----------------------------------------|
//! | `name` | yes | string | Label echoed in batch output |
//! | `salary` | yes | decimal | Annual salary in yen |
//! | `side_income` | yes | decimal | Side-business revenue |
//! | `expenses` | yes | decimal | Side-business expenses |
//! | `business_type` | no | string | `individual`, `corporation` or `none` |
//! | `marginal_tax_rate` | no | decimal | e.g. `0.3`; empty for the default |
//!
//! ### Example
//!
//! ```csv
//! name,salary,side_income,expenses,business_type,marginal_tax_rate
//! designer,5000000,2000000,300000,individual,
//! tutor,3500000,600000,50000,none,0.2
//! ```

use std::path::{Path, PathBuf};

use fukugyo_core::{BusinessType, FinancialProfile, InputError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

// ---------------------------------------------------------------------------
// Serde-compatible row that mirrors the CSV layout
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    name: String,
    salary: Decimal,
    side_income: Decimal,
    expenses: Decimal,
    #[serde(default)]
    business_type: Option<String>,
    #[serde(default)]
    marginal_tax_rate: Option<Decimal>,
}

/// A profile together with the label it was given in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedProfile {
    pub name: String,
    #[serde(flatten)]
    pub profile: FinancialProfile,
}

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

/// Errors that can occur while loading a profile batch.
///
/// Row numbers are 1-based and count data rows only (the header is row 0).
#[derive(Debug, thiserror::Error)]
pub enum ProfileLoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Bad structure, missing required column or a type mismatch.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    #[error("unrecognised business type '{value}' on row {row}")]
    InvalidBusinessType { value: String, row: usize },

    #[error("invalid profile on row {row}: {source}")]
    InvalidProfile {
        row: usize,
        #[source]
        source: InputError,
    },
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<NamedProfile, ProfileLoadError> {
    let business_type = match row.business_type {
        Some(value) => {
            BusinessType::parse(&value).ok_or(ProfileLoadError::InvalidBusinessType {
                value,
                row: row_number,
            })?
        }
        None => BusinessType::default(),
    };

    let profile = FinancialProfile {
        salary: row.salary,
        side_income: row.side_income,
        expenses: row.expenses,
        business_type,
        marginal_tax_rate: row.marginal_tax_rate,
    };
    profile
        .validate()
        .map_err(|source| ProfileLoadError::InvalidProfile {
            row: row_number,
            source,
        })?;

    Ok(NamedProfile {
        name: row.name,
        profile,
    })
}

/// Parse CSV text and return the profiles in file order.
///
/// # Errors
///
/// * [`ProfileLoadError::Parse`] if the CSV is structurally invalid or a
///   required field cannot be deserialised.
/// * [`ProfileLoadError::InvalidBusinessType`] if a `business_type` cell is
///   not a recognised value.
/// * [`ProfileLoadError::InvalidProfile`] if a row has negative amounts,
///   expenses above its side income, or a marginal rate outside `[0, 1]`.
pub fn load_from_str(input: &str) -> Result<Vec<NamedProfile>, ProfileLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    let profiles = reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| convert_row(result?, idx + 1))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(count = profiles.len(), "parsed profile batch");
    Ok(profiles)
}

/// Read a file from disk and delegate to [`load_from_str`].
pub fn load_from_file(path: &Path) -> Result<Vec<NamedProfile>, ProfileLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ProfileLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
