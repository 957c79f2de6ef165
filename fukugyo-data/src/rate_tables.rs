//! Rate tables from TOML, with the income tax brackets optionally replaced
//! from a CSV file.
//!
//! The TOML layout mirrors [`RateTables`] field for field:
//!
//! ```toml
//! label = "Reiwa 6 (2024)"
//! basic_deduction = 480000
//!
//! [[income_tax_brackets]]
//! min_income = 0
//! max_income = 1950000
//! rate = 0.05
//! subtracted_amount = 0
//!
//! # ... remaining brackets; omit max_income on the last one
//!
//! [resident_tax]
//! rate = 0.10
//! basic_deduction = 430000
//! per_capita_levy = 5000
//!
//! # [social_insurance], [[salary_deduction_bands]], [business], [corporate]
//! ```
//!
//! Every table is validated before it is returned.

use std::fs::File;
use std::path::{Path, PathBuf};

use fukugyo_core::{RateTableError, RateTables};
use thiserror::Error;
use tracing::info;

use crate::brackets::{BracketLoader, BracketLoaderError};

/// Errors that can occur when loading rate tables.
#[derive(Debug, Error)]
pub enum RateTableLoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("bracket file error: {0}")]
    Brackets(#[from] BracketLoaderError),

    #[error("invalid rate tables: {0}")]
    Invalid(#[from] RateTableError),
}

/// Loader for [`RateTables`] files.
pub struct RateTableLoader;

impl RateTableLoader {
    /// Parse and validate rate tables from TOML text.
    pub fn from_toml_str(input: &str) -> Result<RateTables, RateTableLoadError> {
        let tables: RateTables = toml::from_str(input)?;
        tables.validate()?;
        Ok(tables)
    }

    /// Read, parse and validate a TOML rate table file.
    pub fn from_file(path: &Path) -> Result<RateTables, RateTableLoadError> {
        let contents = std::fs::read_to_string(path).map_err(|source| RateTableLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tables = Self::from_toml_str(&contents)?;

        info!(label = %tables.label, path = %path.display(), "loaded rate tables");
        Ok(tables)
    }

    /// Replaces the income tax brackets of `tables` with those in a CSV file
    /// and validates the result.
    pub fn with_brackets_file(
        mut tables: RateTables,
        path: &Path,
    ) -> Result<RateTables, RateTableLoadError> {
        let file = File::open(path).map_err(|source| RateTableLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tables.income_tax_brackets = BracketLoader::load(file)?;
        tables.validate()?;

        info!(
            brackets = tables.income_tax_brackets.len(),
            path = %path.display(),
            "replaced income tax brackets"
        );
        Ok(tables)
    }

    /// Builds the active tables: `rates` if given, otherwise the built-in
    /// tables, with brackets from `brackets` if given.
    pub fn load(
        rates: Option<&Path>,
        brackets: Option<&Path>,
    ) -> Result<RateTables, RateTableLoadError> {
        let tables = match rates {
            Some(path) => Self::from_file(path)?,
            None => RateTables::standard().clone(),
        };
        match brackets {
            Some(path) => Self::with_brackets_file(tables, path),
            None => Ok(tables),
        }
    }

    /// Renders tables in the TOML layout [`RateTableLoader::from_toml_str`]
    /// reads.
    pub fn to_toml_string(tables: &RateTables) -> Result<String, RateTableLoadError> {
        Ok(toml::to_string_pretty(tables)?)
    }
}
