//! Display formatting for register values.
//!
//! Numbers render the way the dashboard has always shown them: two fraction
//! digits, `.` as decimal point, `,` between thousands.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use time::{macros::format_description, OffsetDateTime, PrimitiveDateTime};

/// Shown in place of a percentage whose base is not positive.
pub const NO_PERCENT: &str = "-";

/// Render `value` with exactly two fraction digits and thousands grouping.
///
/// Rounding works on the shortest decimal that reads back as `value`, half
/// away from zero, so `2.675` shows as `2.68` even though the stored double
/// sits just below it.
pub fn fixed2(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let sign = if value.is_sign_negative() { "-" } else { "" };
    // f64 Display is the shortest round-trip form and never exponential.
    let shortest = value.abs().to_string();
    let digits = match Decimal::from_str(&shortest) {
        Ok(d) => format!(
            "{:.2}",
            d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        ),
        // Beyond Decimal's 96-bit range.
        Err(_) => format!("{:.2}", value.abs()),
    };
    let (int_part, frac_part) = digits.as_str().split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}{grouped}.{frac_part}")
}

/// `numerator` as a percentage of `base`, or [`NO_PERCENT`] when `base <= 0`.
pub fn percent_of(numerator: f64, base: f64) -> String {
    if base > 0.0 {
        fixed2(numerator * 100.0 / base)
    } else {
        NO_PERCENT.to_string()
    }
}

pub fn reading_date(at: PrimitiveDateTime) -> Result<String, time::error::Format> {
    at.format(format_description!("[day]-[month]-[year]"))
}

pub fn reading_time(at: PrimitiveDateTime) -> Result<String, time::error::Format> {
    at.format(format_description!("[hour]:[minute]:[second]"))
}

/// Wall-clock date and time as shown on the dashboard, in `now`'s own offset.
pub fn wall_clock(now: OffsetDateTime) -> Result<(String, String), time::error::Format> {
    let local = PrimitiveDateTime::new(now.date(), now.time());
    Ok((reading_date(local)?, reading_time(local)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn two_fraction_digits_always() {
        assert_eq!(fixed2(0.0), "0.00");
        assert_eq!(fixed2(300.0), "300.00");
        assert_eq!(fixed2(50.01), "50.01");
        assert_eq!(fixed2(12.5), "12.50");
        assert_eq!(fixed2(97.333333), "97.33");
        assert_eq!(fixed2(1.8181818), "1.82");
    }

    #[test]
    fn thousands_are_grouped() {
        assert_eq!(fixed2(999.999), "1,000.00");
        assert_eq!(fixed2(1234.5), "1,234.50");
        assert_eq!(fixed2(1234567.891), "1,234,567.89");
        assert_eq!(fixed2(-1234.5), "-1,234.50");
        assert_eq!(fixed2(100000.0), "100,000.00");
    }

    #[test]
    fn exact_ties_round_away_from_zero() {
        assert_eq!(fixed2(0.125), "0.13");
        assert_eq!(fixed2(2.375), "2.38");
        assert_eq!(fixed2(-0.125), "-0.13");
    }

    #[test]
    fn ties_in_the_shortest_decimal_round_up() {
        // Each of these is stored just below its written value.
        assert_eq!(fixed2(1.005), "1.01");
        assert_eq!(fixed2(2.675), "2.68");
        assert_eq!(fixed2(0.285), "0.29");
        assert_eq!(fixed2(-1.005), "-1.01");
        assert_eq!(fixed2(1234.565), "1,234.57");
        assert_eq!(fixed2(1.0049), "1.00");
    }

    #[test]
    fn huge_and_signed_zero_values() {
        assert_eq!(fixed2(-0.0), "-0.00");
        assert_eq!(fixed2(-0.001), "-0.00");
        assert_eq!(fixed2(1e20), "100,000,000,000,000,000,000.00");
    }

    #[test]
    fn negatives_keep_their_sign() {
        assert_eq!(fixed2(-10.0), "-10.00");
        assert_eq!(fixed2(-0.5), "-0.50");
    }

    #[test]
    fn percent_needs_a_positive_base() {
        assert_eq!(percent_of(292.0, 300.0), "97.33");
        assert_eq!(percent_of(5.0, 0.0), NO_PERCENT);
        assert_eq!(percent_of(5.0, -3.0), NO_PERCENT);
    }

    #[test]
    fn dates_and_times_are_zero_padded() {
        let at = datetime!(2024-03-05 07:08:09);
        assert_eq!(reading_date(at).unwrap(), "05-03-2024");
        assert_eq!(reading_time(at).unwrap(), "07:08:09");

        let (date, time) = wall_clock(datetime!(2024-12-31 23:59:01 +5:30)).unwrap();
        assert_eq!(date, "31-12-2024");
        assert_eq!(time, "23:59:01");
    }
}
