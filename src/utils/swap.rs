/*
 * Constant-product swap math with exact BigUint arithmetic
 */

use crate::models::{QuoteError, Result};
use crate::utils::pool::BigUintPool;
use num_bigint::BigUint;
use num_traits::Zero;
use std::sync::LazyLock;

pub const FEE_DENOMINATOR: u32 = 1000;

static DENOMINATOR_1000: LazyLock<BigUint> = LazyLock::new(|| BigUint::from(FEE_DENOMINATOR));
static MULTIPLIER_997: LazyLock<BigUint> = LazyLock::new(|| BigUint::from(997u32));
static MULTIPLIER_995: LazyLock<BigUint> = LazyLock::new(|| BigUint::from(995u32));
static MULTIPLIER_990: LazyLock<BigUint> = LazyLock::new(|| BigUint::from(990u32));

/// Fee as parts per 1000 removed from the input amount (3 = 0.30%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fee(u32);

impl Fee {
    pub const PCT_0_30: Fee = Fee(3);
    pub const PCT_0_50: Fee = Fee(5);
    pub const PCT_1_00: Fee = Fee(10);

    pub fn new(removed: u32) -> Result<Self> {
        if removed >= FEE_DENOMINATOR {
            return Err(QuoteError::Validation(format!(
                "fee must be below {FEE_DENOMINATOR} parts per thousand, got {removed}"
            )));
        }
        Ok(Fee(removed))
    }

    #[must_use]
    pub fn removed(self) -> u32 {
        self.0
    }

    #[must_use]
    pub fn multiplier(self) -> u32 {
        FEE_DENOMINATOR - self.0
    }

    fn preset_multiplier(self) -> Option<&'static BigUint> {
        match self.0 {
            3 => Some(&MULTIPLIER_997),
            5 => Some(&MULTIPLIER_995),
            10 => Some(&MULTIPLIER_990),
            _ => None,
        }
    }
}

/// `amount_in * m * reserve_out / (reserve_in * 1000 + amount_in * m)` with
/// `m = 1000 - fee`, truncated exactly like `UniswapV2Library.getAmountOut`.
///
/// Both reserves must be non-zero; callers reject empty pools before getting
/// here. Every scratch integer goes back to `pool` before this returns.
#[must_use]
pub fn compute_output(
    amount_in: &BigUint,
    reserve_in: &BigUint,
    reserve_out: &BigUint,
    fee: Fee,
    pool: &BigUintPool,
) -> BigUint {
    debug_assert!(!reserve_in.is_zero() && !reserve_out.is_zero());

    let custom;
    let multiplier: &BigUint = match fee.preset_multiplier() {
        Some(preset) => preset,
        None => {
            let mut scratch = pool.acquire();
            scratch.set_zero();
            *scratch += fee.multiplier();
            custom = scratch;
            &*custom
        }
    };

    let mut amount_in_with_fee = pool.acquire();
    amount_in_with_fee.set(amount_in);
    *amount_in_with_fee *= multiplier;

    let mut denominator = pool.acquire();
    denominator.set(reserve_in);
    *denominator *= &*DENOMINATOR_1000;
    *denominator += &*amount_in_with_fee;

    let mut numerator = pool.acquire();
    numerator.set(&amount_in_with_fee);
    *numerator *= reserve_out;

    &*numerator / &*denominator
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn naive(amount_in: &BigUint, reserve_in: &BigUint, reserve_out: &BigUint, fee: u32) -> BigUint {
        let with_fee = amount_in * BigUint::from(1000 - fee);
        let numerator = &with_fee * reserve_out;
        let denominator = reserve_in * BigUint::from(1000u32) + &with_fee;
        numerator / denominator
    }

    fn big(v: u128) -> BigUint {
        BigUint::from(v)
    }

    #[test]
    fn matches_reference_fixture() {
        let pool = BigUintPool::new(8);
        let out = compute_output(&big(1000), &big(1_000_000), &big(1_000_000), Fee::PCT_0_30, &pool);
        assert_eq!(out, big(996));

        let doubled = compute_output(&big(2000), &big(1_000_000), &big(1_000_000), Fee::PCT_0_30, &pool);
        assert_eq!(doubled, big(1990));
    }

    #[test]
    fn all_scratch_integers_are_returned() {
        let pool = BigUintPool::new(8);
        let _ = compute_output(&big(1000), &big(1_000_000), &big(1_000_000), Fee::PCT_0_30, &pool);
        assert_eq!(pool.available(), 3);

        let custom = Fee::new(25).unwrap();
        let _ = compute_output(&big(1000), &big(1_000_000), &big(1_000_000), custom, &pool);
        assert_eq!(pool.available(), 4);
    }

    #[test]
    fn presets_and_custom_fees_agree_with_formula() {
        let pool = BigUintPool::new(8);
        let (a, rin, rout) = (big(123_456_789), big(98_765_432_109), big(13_451_234_567_890));
        for fee in [0u32, 3, 5, 10, 25, 999] {
            let out = compute_output(&a, &rin, &rout, Fee::new(fee).unwrap(), &pool);
            assert_eq!(out, naive(&a, &rin, &rout, fee), "fee {fee}");
        }
    }

    #[test]
    fn handles_full_width_reserves_without_overflow() {
        let pool = BigUintPool::new(8);
        let max112 = (BigUint::from(1u8) << 112u32) - 1u32;
        let amount_in = BigUint::from(1u8) << 200u32;
        let out = compute_output(&amount_in, &max112, &max112, Fee::PCT_0_30, &pool);
        assert_eq!(out, naive(&amount_in, &max112, &max112, 3));
        assert!(out < max112);
    }

    #[test]
    fn rejects_fee_at_or_above_denominator() {
        assert!(matches!(Fee::new(1000), Err(QuoteError::Validation(_))));
        assert_eq!(Fee::new(999).unwrap().multiplier(), 1);
        assert_eq!(Fee::PCT_1_00.removed(), 10);
    }

    #[test]
    fn concurrent_runs_match_single_threaded_results() {
        let pool = BigUintPool::new(64);
        let inputs: Vec<(BigUint, BigUint, BigUint, Fee)> = (1..=32u128)
            .map(|i| {
                let fee = match i % 4 {
                    0 => Fee::PCT_0_30,
                    1 => Fee::PCT_0_50,
                    2 => Fee::PCT_1_00,
                    _ => Fee::new(17).unwrap(),
                };
                (big(i * 1_000_003), big(i * 7_919_000_000), big(1_000_000_000_000 + i), fee)
            })
            .collect();

        let expected: Vec<BigUint> = inputs
            .iter()
            .map(|(a, rin, rout, fee)| compute_output(a, rin, rout, *fee, &pool))
            .collect();

        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for _ in 0..50 {
                        for ((a, rin, rout, fee), want) in inputs.iter().zip(&expected) {
                            assert_eq!(&compute_output(a, rin, rout, *fee, &pool), want);
                        }
                    }
                });
            }
        });
    }

    proptest! {
        #[test]
        fn output_is_monotonic_and_below_input(
            amount in 1u128..(1u128 << 100),
            delta in 1u128..(1u128 << 20),
            reserve_in in 1u128..(1u128 << 112),
            reserve_out in 1u128..(1u128 << 112),
            fee in 1u32..1000,
        ) {
            let pool = BigUintPool::new(8);
            let fee = Fee::new(fee).unwrap();
            let smaller = compute_output(&big(amount), &big(reserve_in), &big(reserve_out), fee, &pool);
            let larger = compute_output(&big(amount + delta), &big(reserve_in), &big(reserve_out), fee, &pool);
            prop_assert!(larger >= smaller);
            prop_assert!(smaller < big(reserve_out));
            if reserve_out <= reserve_in {
                prop_assert!(smaller < big(amount));
            }
        }
    }
}
