//! Profitability metrics for the side business.
//!
//! The analyzer runs the [`TaxAggregator`] and derives ratios from its
//! comparison: profit after the additional tax, per-hour earnings, margin,
//! payback period and a 0-100 efficiency score.
//!
//! # Efficiency Score
//!
//! | Metric | Tiers (points) |
//! |--------|----------------|
//! | Real hourly rate | ≥ 3,000 → 30, ≥ 2,000 → 20, ≥ 1,000 → 10 |
//! | Net profit margin (%) | ≥ 50 → 30, ≥ 30 → 20, ≥ 10 → 10 |
//! | Total ROI (%) | ≥ 200 → 25, ≥ 100 → 15, ≥ 50 → 5 |
//! | Payback (months, net profit > 0) | ≤ 6 → 15, ≤ 12 → 10, ≤ 24 → 5 |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fukugyo_core::{RateTables, RoiInputs, TaxInputs};
//! use fukugyo_core::calculations::{Advisory, RoiAnalyzer};
//!
//! let tax = TaxInputs::new(dec!(4000000), dec!(1000000), dec!(200000)).unwrap();
//! let inputs = RoiInputs::new(tax, dec!(20), dec!(100000)).unwrap();
//!
//! let result = RoiAnalyzer::new(RateTables::standard()).compute(&inputs);
//!
//! assert_eq!(result.total_roi, dec!(213.33));
//! assert_eq!(result.payback_period_months, 6);
//! assert_eq!(result.efficiency_score, 90);
//! assert_eq!(result.advisories, vec![Advisory::Excellent]);
//! ```

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::aggregator::{TaxAggregator, TaxResult};
use crate::calculations::common::{months_to_recover, percent, round_half_up, safe_div};
use crate::{RateTables, RoiInputs};

const LOW_REAL_HOURLY_RATE: Decimal = dec!(1000);
const LOW_MARGIN_PERCENT: Decimal = dec!(20);
const LOW_ROI_PERCENT: Decimal = dec!(50);
const SLOW_PAYBACK_MONTHS: u32 = 24;
const EXCELLENT_SCORE: u32 = 80;
const GOOD_SCORE: u32 = 60;

/// A threshold rule that fired for the analysed business.
///
/// Advisories are emitted in declaration order, at most one of
/// [`Advisory::Excellent`] and [`Advisory::Good`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Advisory {
    /// Real hourly rate below 1,000 yen.
    LowHourlyRate,
    /// Net profit margin below 20%.
    LowMargin,
    /// Total ROI below 50%.
    LowRoi,
    /// No profit after tax, or a payback period over 24 months.
    SlowPayback,
    /// Efficiency score of 80 or more.
    Excellent,
    /// Efficiency score of 60 or more.
    Good,
}

impl Advisory {
    pub fn message(&self) -> &'static str {
        match self {
            Self::LowHourlyRate => {
                "Real hourly rate is below 1,000 yen. Raise your prices or take on higher-value work."
            }
            Self::LowMargin => {
                "Net profit margin is below 20%. Review your expenses and pricing."
            }
            Self::LowRoi => {
                "Return on investment is below 50%. Cut unnecessary spending or reinvest where returns are higher."
            }
            Self::SlowPayback => {
                "The investment will take more than two years to pay back. Revisit your cost plan."
            }
            Self::Excellent => {
                "Excellent efficiency. Consider scaling the business up."
            }
            Self::Good => "Good efficiency. There is still room to improve.",
        }
    }
}

impl fmt::Display for Advisory {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Profitability of the side business after tax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoiResult {
    /// Side income minus side expenses.
    pub gross_profit: Decimal,
    /// Gross profit minus the additional tax the side income causes.
    pub net_profit: Decimal,
    /// Initial investment plus side expenses.
    pub total_investment: Decimal,
    pub yearly_hours: Decimal,
    /// Net profit / total investment, in percent.
    pub total_roi: Decimal,
    /// Gross profit per hour worked.
    pub hourly_rate: Decimal,
    /// Net profit per hour worked.
    pub real_hourly_rate: Decimal,
    /// Net profit / side income, in percent.
    pub net_profit_margin: Decimal,
    /// Months until the net profit covers the total investment; 0 when there
    /// is no profit.
    pub payback_period_months: u32,
    /// 0 to 100.
    pub efficiency_score: u32,
    pub advisories: Vec<Advisory>,
    pub tax_result: TaxResult,
}

/// Calculator deriving [`RoiResult`] from the combined tax figures.
#[derive(Debug, Clone, Copy)]
pub struct RoiAnalyzer<'a> {
    aggregator: TaxAggregator<'a>,
}

impl<'a> RoiAnalyzer<'a> {
    pub fn new(tables: &'a RateTables) -> Self {
        Self {
            aggregator: TaxAggregator::new(tables),
        }
    }

    pub fn compute(
        &self,
        inputs: &RoiInputs,
    ) -> RoiResult {
        let tax_result = self.aggregator.compute(&inputs.tax);

        let gross_profit = inputs.tax.side_income - inputs.tax.side_expenses;
        let net_profit = gross_profit - tax_result.comparison.additional_tax;
        let total_investment = inputs.initial_investment + inputs.tax.side_expenses;
        let yearly_hours = inputs.monthly_hours_invested * Decimal::from(12);

        let total_roi = percent(net_profit, total_investment);
        let hourly_rate = round_half_up(safe_div(gross_profit, yearly_hours));
        let real_hourly_rate = round_half_up(safe_div(net_profit, yearly_hours));
        let net_profit_margin = percent(net_profit, inputs.tax.side_income);
        let payback_period_months = months_to_recover(total_investment, net_profit);

        let efficiency_score = hourly_points(real_hourly_rate)
            + margin_points(net_profit_margin)
            + roi_points(total_roi)
            + payback_points(net_profit, payback_period_months);

        let advisories = advisories(
            real_hourly_rate,
            net_profit_margin,
            total_roi,
            net_profit,
            payback_period_months,
            efficiency_score,
        );

        debug!(
            net_profit = %net_profit,
            total_roi = %total_roi,
            efficiency_score,
            "computed side-business ROI"
        );

        RoiResult {
            gross_profit,
            net_profit,
            total_investment,
            yearly_hours,
            total_roi,
            hourly_rate,
            real_hourly_rate,
            net_profit_margin,
            payback_period_months,
            efficiency_score,
            advisories,
            tax_result,
        }
    }
}

fn hourly_points(real_hourly_rate: Decimal) -> u32 {
    if real_hourly_rate >= dec!(3000) {
        30
    } else if real_hourly_rate >= dec!(2000) {
        20
    } else if real_hourly_rate >= dec!(1000) {
        10
    } else {
        0
    }
}

fn margin_points(margin: Decimal) -> u32 {
    if margin >= dec!(50) {
        30
    } else if margin >= dec!(30) {
        20
    } else if margin >= dec!(10) {
        10
    } else {
        0
    }
}

fn roi_points(total_roi: Decimal) -> u32 {
    if total_roi >= dec!(200) {
        25
    } else if total_roi >= dec!(100) {
        15
    } else if total_roi >= dec!(50) {
        5
    } else {
        0
    }
}

fn payback_points(
    net_profit: Decimal,
    months: u32,
) -> u32 {
    if net_profit <= Decimal::ZERO {
        return 0;
    }
    match months {
        0..=6 => 15,
        7..=12 => 10,
        13..=24 => 5,
        _ => 0,
    }
}

fn advisories(
    real_hourly_rate: Decimal,
    margin: Decimal,
    total_roi: Decimal,
    net_profit: Decimal,
    payback_months: u32,
    score: u32,
) -> Vec<Advisory> {
    let mut advisories = Vec::new();

    if real_hourly_rate < LOW_REAL_HOURLY_RATE {
        advisories.push(Advisory::LowHourlyRate);
    }
    if margin < LOW_MARGIN_PERCENT {
        advisories.push(Advisory::LowMargin);
    }
    if total_roi < LOW_ROI_PERCENT {
        advisories.push(Advisory::LowRoi);
    }
    if net_profit <= Decimal::ZERO || payback_months > SLOW_PAYBACK_MONTHS {
        advisories.push(Advisory::SlowPayback);
    }

    if score >= EXCELLENT_SCORE {
        advisories.push(Advisory::Excellent);
    } else if score >= GOOD_SCORE {
        advisories.push(Advisory::Good);
    }

    advisories
}
