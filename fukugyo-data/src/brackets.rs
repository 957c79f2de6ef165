use std::io::Read;

use fukugyo_core::TaxBracket;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading income tax brackets.
#[derive(Debug, Error)]
pub enum BracketLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("bracket file contains no brackets")]
    Empty,
}

impl From<csv::Error> for BracketLoaderError {
    fn from(err: csv::Error) -> Self {
        BracketLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from an income tax bracket CSV file.
///
/// - `min_income`: exclusive lower bound of the bracket
/// - `max_income`: inclusive upper bound (empty for unlimited)
/// - `rate`: marginal rate as a decimal (e.g., 0.10 for 10%)
/// - `subtracted_amount`: amount subtracted from `income * rate`
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TaxBracketRecord {
    pub min_income: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
    pub subtracted_amount: Decimal,
}

impl From<TaxBracketRecord> for TaxBracket {
    fn from(record: TaxBracketRecord) -> Self {
        TaxBracket {
            min_income: record.min_income,
            max_income: record.max_income,
            rate: record.rate,
            subtracted_amount: record.subtracted_amount,
        }
    }
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for income tax brackets from CSV.
///
/// The brackets are returned in file order; checking that they form a
/// contiguous schedule is left to
/// [`RateTables::validate`](fukugyo_core::RateTables::validate).
pub struct BracketLoader;

impl BracketLoader {
    /// Parse bracket records from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file or
    /// a byte slice.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<TaxBracketRecord>, BracketLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: TaxBracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Parse a CSV reader into brackets, rejecting a file with no rows.
    pub fn load<R: Read>(reader: R) -> Result<Vec<TaxBracket>, BracketLoaderError> {
        let records = Self::parse(reader)?;
        if records.is_empty() {
            return Err(BracketLoaderError::Empty);
        }
        Ok(records.into_iter().map(TaxBracket::from).collect())
    }
}
