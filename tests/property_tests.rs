//! Property-based tests for the rescue math.
//!
//! These tests verify invariants hold under random inputs.

use margin_guardian::*;
use proptest::prelude::*;
use rust_decimal::Decimal;

// Strategies for generating test data
fn price_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|x| Decimal::new(x, 2)) // $0.01 to $100,000
}

fn margin_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|x| Decimal::new(x, 2)) // $0 to $100,000
}

fn leverage_strategy() -> impl Strategy<Value = u32> {
    1u32..=MAX_LEVERAGE
}

fn side_strategy() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::Long), Just(Side::Short)]
}

prop_compose! {
    fn request_strategy()(
        side in side_strategy(),
        entry_price in price_strategy(),
        initial_margin in margin_strategy(),
        leverage in leverage_strategy(),
        current_price in price_strategy(),
        added_margin in margin_strategy(),
    ) -> PositionInjectionRequest {
        PositionInjectionRequest {
            side,
            entry_price,
            initial_margin,
            leverage,
            current_price,
            added_margin,
        }
    }
}

proptest! {
    /// Blended entry never leaves the range spanned by the two fill prices
    #[test]
    fn new_entry_between_fill_prices(req in request_strategy()) {
        prop_assume!(req.initial_margin + req.added_margin > Decimal::ZERO);
        let result = compute(&req).unwrap();

        let lo = req.entry_price.min(req.current_price);
        let hi = req.entry_price.max(req.current_price);
        let entry = result.new_entry_price.value();
        prop_assert!(entry >= lo && entry <= hi, "entry {} outside [{}, {}]", entry, lo, hi);
    }

    /// No new capital means no change in entry
    #[test]
    fn zero_injection_keeps_entry(mut req in request_strategy()) {
        prop_assume!(req.initial_margin > Decimal::ZERO);
        req.added_margin = Decimal::ZERO;

        let result = compute(&req).unwrap();
        prop_assert_eq!(result.new_entry_price.value(), req.entry_price);
    }

    /// Opening from nothing enters at the current price
    #[test]
    fn zero_initial_enters_at_current(mut req in request_strategy()) {
        prop_assume!(req.added_margin > Decimal::ZERO);
        req.initial_margin = Decimal::ZERO;

        let result = compute(&req).unwrap();
        prop_assert_eq!(result.new_entry_price.value(), req.current_price);
    }

    /// Distance to liquidation is never negative and the tier matches it
    #[test]
    fn distance_non_negative_and_tier_consistent(req in request_strategy()) {
        prop_assume!(req.initial_margin + req.added_margin > Decimal::ZERO);
        let result = compute(&req).unwrap();

        prop_assert!(result.distance_to_liquidation_percent >= Decimal::ZERO);
        prop_assert_eq!(result.risk_tier, classify_distance(result.distance_to_liquidation_percent));
    }

    /// Longs profit when price is above the blended entry, shorts when below
    #[test]
    fn pnl_sign_follows_side(req in request_strategy()) {
        prop_assume!(req.initial_margin + req.added_margin > Decimal::ZERO);
        let result = compute(&req).unwrap();

        let move_from_entry = req.current_price - result.new_entry_price.value();
        let aligned = result.pnl_percent * move_from_entry;
        match req.side {
            Side::Long => prop_assert!(aligned >= Decimal::ZERO),
            Side::Short => prop_assert!(aligned <= Decimal::ZERO),
        }
    }

    /// Liquidation sits on the losing side of the blended entry
    #[test]
    fn liquidation_on_losing_side(req in request_strategy()) {
        prop_assume!(req.initial_margin + req.added_margin > Decimal::ZERO);
        let result = compute(&req).unwrap();
        let entry = result.new_entry_price.value();

        match req.side {
            Side::Long => {
                prop_assert!(result.new_liquidation_price < entry);
                prop_assert!(result.new_liquidation_price >= Decimal::ZERO);
            }
            Side::Short => prop_assert!(result.new_liquidation_price > entry),
        }
    }

    /// Notionals are margin times leverage and add up
    #[test]
    fn notionals_consistent(req in request_strategy()) {
        prop_assume!(req.initial_margin + req.added_margin > Decimal::ZERO);
        let result = compute(&req).unwrap();
        let lev = Decimal::from(req.leverage);

        prop_assert_eq!(result.initial_notional.value(), req.initial_margin * lev);
        prop_assert_eq!(result.added_notional.value(), req.added_margin * lev);
        prop_assert_eq!(
            result.total_notional.value(),
            result.initial_notional.value() + result.added_notional.value()
        );
    }

    /// Same input, same output
    #[test]
    fn compute_is_idempotent(req in request_strategy()) {
        prop_assume!(req.initial_margin + req.added_margin > Decimal::ZERO);
        let first = compute(&req).unwrap();
        let second = compute(&req).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Leverage outside 1..=125 is always rejected
    #[test]
    fn out_of_range_leverage_rejected(
        mut req in request_strategy(),
        leverage in prop_oneof![Just(0u32), (MAX_LEVERAGE + 1)..10_000u32],
    ) {
        req.leverage = leverage;
        let is_leverage_error = matches!(compute(&req), Err(InvalidInputError::LeverageOutOfRange { .. }));
        prop_assert!(is_leverage_error);
    }
}
