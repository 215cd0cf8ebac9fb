//! The obligation itself: a fixed share of eligible net wealth.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// The Zakat rate on monetary wealth, 2.5%.
///
/// Fixed by religious law and not configurable; keep it distinct from the
/// stocks liquid ratio, which is a modeling assumption.
pub const ZAKAT_RATE: Decimal = dec!(0.025);

/// `net_wealth × ZAKAT_RATE` when eligible, otherwise zero.
pub fn compute_zakat(net_wealth: Decimal, is_eligible: bool) -> Decimal {
    if !is_eligible || net_wealth <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    // The rate is below one, so this can only overflow on a corrupted input.
    net_wealth.checked_mul(ZAKAT_RATE).unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_applied_when_eligible() {
        assert_eq!(compute_zakat(dec!(20000), true), dec!(500));
        assert_eq!(compute_zakat(dec!(12197.50), true), dec!(304.9375));
    }

    #[test]
    fn test_nothing_due_when_not_eligible() {
        assert_eq!(compute_zakat(dec!(20000), false), Decimal::ZERO);
    }

    #[test]
    fn test_zero_wealth_owes_nothing() {
        assert_eq!(compute_zakat(Decimal::ZERO, true), Decimal::ZERO);
    }
}
