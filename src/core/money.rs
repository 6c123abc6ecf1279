//! Monetary kernel.
//!
//! All invoice amounts carry at most two fractional digits. Addition,
//! subtraction and summation convert to integer minor units (cents) so
//! that no binary floating point ever participates and long sums cannot
//! drift. Every other module routes monetary arithmetic through here.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Default tolerance for cross-checks: one cent.
pub fn default_tolerance() -> Decimal {
    dec!(0.01)
}

/// Widened tolerance for multi-step reconciliations, where per-group
/// rounding can compound. KoSIT accepts ±0.02.
pub fn reconciliation_tolerance() -> Decimal {
    dec!(0.02)
}

/// Round to 2 decimal places, half away from zero (commercial rounding).
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Convert an amount to integer minor units, rounding half up first.
fn minor_units(value: Decimal) -> i128 {
    let rounded = round_half_up(value) * dec!(100);
    // After round_half_up the value has at most 2 decimals, so ×100 is integral.
    rounded.mantissa() / 10i128.pow(rounded.scale())
}

fn from_minor_units(cents: i128) -> Decimal {
    Decimal::from_i128_with_scale(cents, 2)
}

/// Exact addition of two amounts.
pub fn add(a: Decimal, b: Decimal) -> Decimal {
    from_minor_units(minor_units(a) + minor_units(b))
}

/// Exact subtraction of two amounts.
pub fn sub(a: Decimal, b: Decimal) -> Decimal {
    from_minor_units(minor_units(a) - minor_units(b))
}

/// Sum a sequence of amounts in minor units.
pub fn sum<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    from_minor_units(amounts.into_iter().map(minor_units).sum())
}

/// Scale an amount by a factor (e.g. unit price × quantity), rounded to
/// 2 decimals.
pub fn scale(amount: Decimal, factor: Decimal) -> Decimal {
    round_half_up(amount * factor)
}

/// Tax amount for a basis and a percentage rate:
/// round(basis × rate / 100).
pub fn tax(basis: Decimal, rate: Decimal) -> Decimal {
    round_half_up(basis * rate / dec!(100))
}

/// Tolerance equality: |a − b| ≤ tolerance.
pub fn approx_eq(a: Decimal, b: Decimal, tolerance: Decimal) -> bool {
    (a - b).abs() <= tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round_half_up(dec!(2.675)), dec!(2.68));
        assert_eq!(round_half_up(dec!(2.674)), dec!(2.67));
        assert_eq!(round_half_up(dec!(-2.675)), dec!(-2.68));
        assert_eq!(round_half_up(dec!(0.005)), dec!(0.01));
    }

    #[test]
    fn add_sub_are_inverses() {
        let a = dec!(1234.56);
        let b = dec!(78.90);
        assert_eq!(sub(add(a, b), b), a);
        assert_eq!(add(sub(a, b), b), a);
    }

    #[test]
    fn sum_matches_sequential_add() {
        let xs = [dec!(0.10), dec!(0.20), dec!(0.30), dec!(99.99)];
        let mut acc = Decimal::ZERO;
        for x in xs {
            acc = add(acc, x);
        }
        assert_eq!(sum(xs), acc);
        assert_eq!(sum(xs), dec!(100.59));
    }

    #[test]
    fn tax_computation() {
        assert_eq!(tax(dec!(100), dec!(19)), dec!(19.00));
        assert_eq!(tax(dec!(9649.90), dec!(19)), dec!(1833.48));
        assert_eq!(tax(dec!(0.01), dec!(19)), dec!(0.00));
        assert_eq!(tax(dec!(100), dec!(0)), dec!(0.00));
    }

    #[test]
    fn tax_is_stable_under_reapplication() {
        // Rounded tax, used as input to the same rounding, is unchanged.
        let t = tax(dec!(123.45), dec!(7));
        assert_eq!(round_half_up(t), t);
    }

    #[test]
    fn tolerance_equality() {
        assert!(approx_eq(dec!(10.00), dec!(10.01), default_tolerance()));
        assert!(!approx_eq(dec!(10.00), dec!(10.02), default_tolerance()));
        assert!(approx_eq(dec!(10.00), dec!(10.02), reconciliation_tolerance()));
    }

    #[test]
    fn scale_rounds() {
        assert_eq!(scale(dec!(0.333), dec!(3)), dec!(1.00));
        assert_eq!(scale(dec!(120), dec!(80)), dec!(9600.00));
    }
}
