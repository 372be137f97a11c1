//! Conversion between the decimal amounts used in the domain and the integer
//! cents stored in the database.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

use crate::Error;

/// The number of fraction digits kept for every amount.
pub const AMOUNT_SCALE: u32 = 2;

/// The largest amount, in either direction, that may be stored.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// [MAX_AMOUNT] in cents.
pub const MAX_AMOUNT_CENTS: i64 = 100_000_000_000_000;

/// Round `amount` to two fraction digits, with midpoints rounded away from zero.
pub fn round_amount(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert `amount` into integer cents, rounding to two fraction digits first.
///
/// # Errors
///
/// Returns [Error::InvalidAmount] if the magnitude of the amount is larger
/// than [MAX_AMOUNT].
pub fn to_cents(amount: Decimal) -> Result<i64, Error> {
    let rounded = round_amount(amount);

    if rounded.abs() > MAX_AMOUNT {
        return Err(Error::InvalidAmount(amount.to_string()));
    }

    rounded
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|cents| cents.to_i64())
        .ok_or_else(|| Error::InvalidAmount(amount.to_string()))
}

/// Convert integer cents read from the database into a decimal amount.
pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, AMOUNT_SCALE)
}

/// Parse a user supplied amount such as "1200", "-35.5" or "1,234.56".
///
/// Thousands separators and surrounding whitespace are ignored. The result is
/// rounded to two fraction digits.
///
/// # Errors
///
/// Returns [Error::InvalidAmount] if `raw_amount` is empty, is not a number or
/// is larger than [MAX_AMOUNT].
pub fn parse_amount(raw_amount: &str) -> Result<Decimal, Error> {
    let cleaned: String = raw_amount
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '_')
        .collect();

    if cleaned.is_empty() {
        return Err(Error::InvalidAmount(raw_amount.to_owned()));
    }

    let amount = Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .map_err(|_| Error::InvalidAmount(raw_amount.to_owned()))?;

    // Reject amounts that cannot be stored rather than failing at write time.
    to_cents(amount)?;

    Ok(round_amount(amount))
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::Error;

    use super::{MAX_AMOUNT, MAX_AMOUNT_CENTS, from_cents, parse_amount, to_cents};

    #[test]
    fn cents_conversion_keeps_two_decimal_places() {
        let amount = Decimal::new(123456, 2);

        let cents = to_cents(amount).unwrap();

        assert_eq!(cents, 123456);
        assert_eq!(from_cents(cents), amount);
    }

    #[test]
    fn to_cents_rounds_midpoint_away_from_zero() {
        assert_eq!(to_cents(Decimal::new(10005, 3)), Ok(1001));
        assert_eq!(to_cents(Decimal::new(-10005, 3)), Ok(-1001));
    }

    #[test]
    fn max_amount_matches_max_cents() {
        assert_eq!(MAX_AMOUNT, Decimal::from(1_000_000_000_000_i64));
        assert_eq!(to_cents(MAX_AMOUNT), Ok(MAX_AMOUNT_CENTS));
        assert_eq!(to_cents(-MAX_AMOUNT), Ok(-MAX_AMOUNT_CENTS));
    }

    #[test]
    fn to_cents_rejects_amounts_past_the_limit() {
        let too_large = MAX_AMOUNT + Decimal::new(1, 2);

        assert_eq!(
            to_cents(too_large),
            Err(Error::InvalidAmount(too_large.to_string()))
        );
        assert_eq!(
            parse_amount("60000000000000000"),
            Err(Error::InvalidAmount("60000000000000000".to_owned()))
        );
    }

    #[test]
    fn parse_amount_accepts_integers_and_fractions() {
        assert_eq!(parse_amount("1200"), Ok(Decimal::new(1200, 0)));
        assert_eq!(parse_amount(" -35.5 "), Ok(Decimal::new(-355, 1)));
        assert_eq!(parse_amount("1,234.56"), Ok(Decimal::new(123456, 2)));
    }

    #[test]
    fn parse_amount_rounds_to_cents() {
        assert_eq!(parse_amount("0.125"), Ok(Decimal::new(13, 2)));
    }

    #[test]
    fn parse_amount_rejects_non_numbers() {
        assert_eq!(
            parse_amount("twelve"),
            Err(Error::InvalidAmount("twelve".to_owned()))
        );
        assert_eq!(parse_amount(""), Err(Error::InvalidAmount("".to_owned())));
    }
}
