//! Common utility functions for tax calculations.
//!
//! Rounding, clamping and guarded division shared by every calculator.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Used for ratios and percentages.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use fukugyo_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(213.3333)), dec!(213.33));
/// assert_eq!(round_half_up(dec!(2666.665)), dec!(2666.67));
/// assert_eq!(round_half_up(dec!(-1.005)), dec!(-1.01)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a monetary amount to whole yen, half away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use fukugyo_core::calculations::common::round_yen;
///
/// assert_eq!(round_yen(dec!(396528.6)), dec!(396529));
/// assert_eq!(round_yen(dec!(491541.5)), dec!(491542));
/// assert_eq!(round_yen(dec!(16666.49)), dec!(16666));
/// ```
pub fn round_yen(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds `value` down to a multiple of `unit`.
///
/// A non-positive `unit` leaves the value unchanged.
pub fn floor_to(
    value: Decimal,
    unit: Decimal,
) -> Decimal {
    if unit <= Decimal::ZERO {
        return value;
    }
    (value / unit).floor() * unit
}

/// Returns the maximum of two decimal values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use fukugyo_core::calculations::common::max;
///
/// assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
/// assert_eq!(max(dec!(-100.00), dec!(-200.00)), dec!(-100.00));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Floors a value at zero.
pub fn non_negative(value: Decimal) -> Decimal {
    max(value, Decimal::ZERO)
}

/// Divides `numerator` by `denominator`, returning zero when the denominator
/// is zero.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
/// use fukugyo_core::calculations::common::safe_div;
///
/// assert_eq!(safe_div(dec!(640000), dec!(1000000)), dec!(0.64));
/// assert_eq!(safe_div(dec!(640000), Decimal::ZERO), Decimal::ZERO);
/// ```
pub fn safe_div(
    numerator: Decimal,
    denominator: Decimal,
) -> Decimal {
    if denominator.is_zero() {
        Decimal::ZERO
    } else {
        numerator / denominator
    }
}

/// `numerator / denominator * 100`, rounded to two places; zero when the
/// denominator is zero.
pub fn percent(
    numerator: Decimal,
    denominator: Decimal,
) -> Decimal {
    round_half_up(safe_div(numerator, denominator) * Decimal::ONE_HUNDRED)
}

/// Number of whole months a twelfth of `annual_gain` needs to cover `cost`.
/// Zero when the annual gain or the cost is not positive.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use fukugyo_core::calculations::common::months_to_recover;
///
/// assert_eq!(months_to_recover(dec!(300000), dec!(640000)), 6);
/// assert_eq!(months_to_recover(dec!(300000), dec!(0)), 0);
/// ```
pub fn months_to_recover(
    cost: Decimal,
    annual_gain: Decimal,
) -> u32 {
    if annual_gain <= Decimal::ZERO || cost <= Decimal::ZERO {
        return 0;
    }
    (cost * Decimal::from(12) / annual_gain)
        .ceil()
        .to_u32()
        .unwrap_or(u32::MAX)
}

/// Compounds `amount` by `1 + rate` for `years` periods, saturating at the
/// bounds of [`Decimal`].
pub fn compound(
    amount: Decimal,
    rate: Decimal,
    years: u32,
) -> Decimal {
    let factor = Decimal::ONE.saturating_add(rate);
    (0..years).fold(amount, |acc, _| acc.saturating_mul(factor))
}

/// Formats an amount as whole yen with thousands separators.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use fukugyo_core::calculations::common::format_yen;
///
/// assert_eq!(format_yen(dec!(1234567)), "¥1,234,567");
/// assert_eq!(format_yen(dec!(-140452)), "-¥140,452");
/// assert_eq!(format_yen(dec!(999.5)), "¥1,000");
/// ```
pub fn format_yen(amount: Decimal) -> String {
    let rounded = round_yen(amount);
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-¥{grouped}")
    } else {
        format!("¥{grouped}")
    }
}
