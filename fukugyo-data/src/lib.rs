//! File-backed inputs for the `fukugyo-core` calculators.
//!
//! - [`RateTableLoader`] reads [`RateTables`](fukugyo_core::RateTables) from
//!   TOML, optionally replacing the income tax brackets from CSV.
//! - [`BracketLoader`] parses a bracket CSV on its own.
//! - [`profiles`] loads batches of named financial profiles.

mod brackets;
pub mod profiles;
mod rate_tables;

pub use brackets::{BracketLoader, BracketLoaderError, TaxBracketRecord};
pub use profiles::{NamedProfile, ProfileLoadError};
pub use rate_tables::{RateTableLoadError, RateTableLoader};
