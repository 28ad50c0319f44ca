//! Fixed-point money helpers shared by forms, views and the promotion engine.
//!
//! Prices are stored as an integer amount of minor units (scale 2) and
//! discounts as basis points (scale 4). Every conversion here stays in exact
//! decimal arithmetic; binary floating point is never involved.

use std::cmp::Ordering;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Number of fractional digits kept for currency amounts.
pub const CURRENCY_SCALE: u32 = 2;

/// Number of fractional digits kept for promotion discounts.
pub const DISCOUNT_SCALE: u32 = 4;

/// A discount of `1.0` expressed in basis points.
pub const BASIS_POINTS: i64 = 10_000;

/// Largest storable price in minor units (`9 999 999 999.99`).
///
/// Keeps `price_cents * BASIS_POINTS` inside the 64-bit integer range, so the
/// SQL price update never falls back to floating point.
pub const MAX_PRICE_CENTS: i64 = 999_999_999_999;

/// Rounding policy applied whenever a price is brought back to currency precision.
pub const PRICE_ROUNDING: RoundingStrategy = RoundingStrategy::MidpointNearestEven;

/// Convert an amount stored in minor units into a decimal with currency scale.
pub fn cents_to_decimal(cents: i64) -> Decimal {
    Decimal::new(cents, CURRENCY_SCALE)
}

/// Convert a decimal amount into minor units, rounding to currency precision first.
///
/// Returns `None` when the amount does not fit into an `i64`.
pub fn decimal_to_cents(amount: Decimal) -> Option<i64> {
    (round_currency(amount) * Decimal::ONE_HUNDRED).to_i64()
}

/// Round an amount to [`CURRENCY_SCALE`] digits using [`PRICE_ROUNDING`].
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CURRENCY_SCALE, PRICE_ROUNDING)
}

/// Multiplier applied to a price for the given discount (`1 - discount`).
pub fn discount_factor(discount: Decimal) -> Decimal {
    Decimal::ONE - discount
}

/// Price after applying `discount_factor`, rounded to currency precision.
pub fn discounted_price(original: Decimal, discount_factor: Decimal) -> Decimal {
    round_currency(original * discount_factor)
}

/// Integer form of [`discounted_price`] working on minor units and basis points.
///
/// The bulk price update issued by the repository evaluates the same
/// arithmetic in SQL, so all three paths agree for prices in
/// `0..=MAX_PRICE_CENTS`. Returns `None` when the product overflows.
pub fn discounted_price_cents(price_cents: i64, discount_bps: i32) -> Option<i64> {
    let factor = BASIS_POINTS - i64::from(discount_bps);
    let scaled = price_cents.checked_mul(factor)?;
    let quotient = scaled / BASIS_POINTS;
    let remainder = scaled % BASIS_POINTS;

    Some(match remainder.cmp(&(BASIS_POINTS / 2)) {
        Ordering::Greater => quotient + 1,
        Ordering::Equal => quotient + quotient % 2,
        Ordering::Less => quotient,
    })
}

/// Decimal discount represented by a basis point value.
pub fn discount_from_bps(discount_bps: i32) -> Decimal {
    Decimal::new(i64::from(discount_bps), DISCOUNT_SCALE)
}

/// Basis point value of a discount.
///
/// Returns `None` unless `0 <= discount < 1` and the discount has at most
/// [`DISCOUNT_SCALE`] fractional digits.
pub fn discount_to_bps(discount: Decimal) -> Option<i32> {
    if discount.is_sign_negative() && !discount.is_zero() {
        return None;
    }
    if discount >= Decimal::ONE {
        return None;
    }

    let scaled = discount * Decimal::from(BASIS_POINTS);
    if !scaled.fract().is_zero() {
        return None;
    }

    scaled.to_i32()
}

/// Format minor units for display, e.g. `1299` -> `12.99`.
pub fn format_cents(cents: i64) -> String {
    cents_to_decimal(cents).to_string()
}
