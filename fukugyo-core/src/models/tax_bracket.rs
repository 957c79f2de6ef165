use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One band of the progressive income-tax schedule.
///
/// A bracket covers `(min_income, max_income]`. The last bracket of a table
/// has `max_income` set to `None` and covers everything above `min_income`.
/// Tax for an income inside the bracket is `income * rate - subtracted_amount`,
/// where the subtracted amount keeps the schedule continuous at the bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min_income: Decimal,
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
    pub subtracted_amount: Decimal,
}

impl TaxBracket {
    /// Returns `true` when `income` falls inside `(min_income, max_income]`.
    pub fn contains(
        &self,
        income: Decimal,
    ) -> bool {
        income > self.min_income && self.max_income.is_none_or(|max| income <= max)
    }
}
