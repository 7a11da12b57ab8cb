//! Correctly rounded string-to-double conversion.
//!
//! Three tiers, cheapest first: an exact double computation when both the
//! digits and the power of ten are exactly representable, an
//! extended-precision guess with a tracked error bound, and finally an
//! exact bignum comparison against the guess's upper boundary.

use std::cmp::Ordering;

use crate::bignum::Bignum;
use crate::cached_powers;
use crate::diy_fp::DiyFp;
use crate::ieee::Double;
use crate::utils;

// 2^53 = 9007199254740992. Any integer with at most 15 decimal digits is
// exactly representable as a double, and so is every power of ten up to
// 10^22 (= 2^22 * 5^22, with 5^22 < 2^53).
const MAX_EXACT_DOUBLE_INTEGER_DECIMAL_DIGITS: usize = 15;
const EXACT_POWERS_OF_TEN: [f64; 23] = [
    1.0, 10.0, 100.0, 1000.0, 10000.0, 100000.0, 1000000.0, 10000000.0, 100000000.0, 1e9, 1e10,
    1e11, 1e12, 1e13, 1e14, 1e15, 1e16, 1e17, 1e18, 1e19, 1e20, 1e21, 1e22,
];

// 2^64 = 18446744073709551616 > 10^19.
const MAX_UINT64_DECIMAL_DIGITS: usize = 19;

// 10^309 > MAX_DOUBLE and 10^-324 < MIN_DENORMAL: values beyond these
// decimal magnitudes clamp to infinity or zero without any computation.
const MAX_DECIMAL_POWER: i32 = 309;
const MIN_DECIMAL_POWER: i32 = -324;

// Digits beyond this count cannot influence the rounding decision, except
// through being non-zero; a cut buffer keeps a non-zero marker digit.
const MAX_SIGNIFICANT_DECIMAL_DIGITS: usize = 780;

/// Convert a decimal digit buffer and exponent into the nearest double.
///
/// The value is `buffer * 10^exponent`, where `buffer` holds only ASCII
/// digits (no sign, no dot). Halfway cases round to even.
pub fn strtod(buffer: &[u8], mut exponent: i32) -> f64 {
    let left_trimmed = utils::trim_leading_zeros(buffer);
    let trimmed = utils::trim_trailing_zeros(left_trimmed);
    exponent += (left_trimmed.len() - trimmed.len()) as i32;
    if trimmed.len() > MAX_SIGNIFICANT_DECIMAL_DIGITS {
        // Cut the buffer down. The discarded tail cannot move the result
        // across a rounding boundary, but whether it is zero can: replace
        // the last kept digit with a non-zero marker.
        debug_assert!(trimmed[trimmed.len() - 1] != b'0');
        let mut copy = [0u8; MAX_SIGNIFICANT_DECIMAL_DIGITS];
        copy[..MAX_SIGNIFICANT_DECIMAL_DIGITS - 1]
            .copy_from_slice(&trimmed[..MAX_SIGNIFICANT_DECIMAL_DIGITS - 1]);
        copy[MAX_SIGNIFICANT_DECIMAL_DIGITS - 1] = b'1';
        exponent += (trimmed.len() - MAX_SIGNIFICANT_DECIMAL_DIGITS) as i32;
        strtod_trimmed(&copy, exponent)
    } else {
        strtod_trimmed(trimmed, exponent)
    }
}

/// Like [`strtod`], for a buffer already stripped of leading and trailing
/// zeros and at most 780 digits long.
pub fn strtod_trimmed(trimmed: &[u8], exponent: i32) -> f64 {
    debug_assert!(trimmed.len() <= MAX_SIGNIFICANT_DECIMAL_DIGITS);
    debug_assert!(trimmed.is_empty() || trimmed[trimmed.len() - 1] != b'0');
    let (guess, is_correct) = compute_guess(trimmed, exponent);
    if is_correct {
        return guess;
    }

    // The guess is the correct result or off by one ulp: compare the
    // exact input against the boundary between guess and its successor.
    let upper_boundary = Double::new(guess).upper_boundary();
    match compare_buffer_with_diy_fp(trimmed, exponent, upper_boundary) {
        Ordering::Less => guess,
        Ordering::Greater => Double::new(guess).next_double(),
        // Exactly halfway: round to even.
        Ordering::Equal => {
            if Double::new(guess).significand() & 1 == 0 {
                guess
            } else {
                Double::new(guess).next_double()
            }
        }
    }
}

// Returns the guess and whether it is known to be correct.
fn compute_guess(trimmed: &[u8], exponent: i32) -> (f64, bool) {
    if trimmed.is_empty() {
        return (0.0, true);
    }
    if exponent + trimmed.len() as i32 - 1 >= MAX_DECIMAL_POWER {
        return (Double::infinity(), true);
    }
    if exponent + (trimmed.len() as i32) <= MIN_DECIMAL_POWER {
        return (0.0, true);
    }

    if let Some(result) = double_strtod(trimmed, exponent) {
        return (result, true);
    }
    let (guess, is_correct) = diy_fp_strtod(trimmed, exponent);
    if guess == Double::infinity() {
        return (guess, true);
    }
    (guess, is_correct)
}

// Reads the buffer into a DiyFp with exponent 0, rounding at the 19th
// digit. Returns the number of digits that did not fit.
fn read_diy_fp(buffer: &[u8]) -> (DiyFp, usize) {
    let (mut significand, read_digits) = utils::read_u64(buffer, MAX_UINT64_DECIMAL_DIGITS);
    let remaining_decimals = buffer.len() - read_digits;
    if remaining_decimals != 0 && buffer[read_digits] >= b'5' {
        significand += 1;
    }
    (DiyFp::new(significand, 0), remaining_decimals)
}

// The fast path: when significand and scale are both exactly representable
// as doubles, one correctly rounded multiplication or division gives the
// correctly rounded result.
fn double_strtod(trimmed: &[u8], exponent: i32) -> Option<f64> {
    if trimmed.len() > MAX_EXACT_DOUBLE_INTEGER_DECIMAL_DIGITS {
        return None;
    }
    let (value, read_digits) = utils::read_u64(trimmed, MAX_UINT64_DECIMAL_DIGITS);
    debug_assert!(read_digits == trimmed.len());
    let value = value as f64;
    if exponent == 0 {
        return Some(value);
    }
    if exponent > 0 && (exponent as usize) < EXACT_POWERS_OF_TEN.len() {
        return Some(value * EXACT_POWERS_OF_TEN[exponent as usize]);
    }
    if exponent < 0 && ((-exponent) as usize) < EXACT_POWERS_OF_TEN.len() {
        return Some(value / EXACT_POWERS_OF_TEN[(-exponent) as usize]);
    }
    // 10^exponent alone is too big, but part of it can be folded into the
    // significand without losing exactness.
    let remaining_digits = (MAX_EXACT_DOUBLE_INTEGER_DECIMAL_DIGITS - trimmed.len()) as i32;
    if exponent > 0 && exponent - remaining_digits < EXACT_POWERS_OF_TEN.len() as i32 {
        let value = value * EXACT_POWERS_OF_TEN[remaining_digits as usize];
        return Some(value * EXACT_POWERS_OF_TEN[(exponent - remaining_digits) as usize]);
    }
    None
}

// The normalized DiyFp for 10^exponent, 1 <= exponent <= 7. These powers
// are exact in 64 bits, so the adjustment multiplication they feed adds no
// error of its own.
fn adjustment_power_of_ten(exponent: i32) -> DiyFp {
    debug_assert!((1..cached_powers::DECIMAL_EXPONENT_DISTANCE).contains(&exponent));
    DiyFp::new(10u64.pow(exponent as u32), 0).normalized()
}

// The second tier: scale the 64-bit-read significand by a cached power of
// ten, tracking every error source in units of 1/8 ulp. Returns the guess
// and whether the error interval excludes the rounding boundary.
fn diy_fp_strtod(buffer: &[u8], mut exponent: i32) -> (f64, bool) {
    const DENOMINATOR_LOG: i32 = 3;
    const DENOMINATOR: u64 = 1 << DENOMINATOR_LOG;

    let (mut input, remaining_decimals) = read_diy_fp(buffer);
    // Rounding away the tail digits cost at most half an ulp.
    exponent += remaining_decimals as i32;
    let mut error: u64 = if remaining_decimals == 0 { 0 } else { DENOMINATOR / 2 };

    let old_e = input.exp;
    input.normalize();
    error <<= (old_e - input.exp) as u32;

    debug_assert!(exponent <= cached_powers::MAX_DECIMAL_EXPONENT);
    if exponent < cached_powers::MIN_DECIMAL_EXPONENT {
        return (0.0, true);
    }
    let (cached_power, cached_decimal_exponent) =
        cached_powers::get_cached_power_for_decimal_exponent(exponent);

    if cached_decimal_exponent != exponent {
        let adjustment_exponent = exponent - cached_decimal_exponent;
        let adjustment_power = adjustment_power_of_ten(adjustment_exponent);
        input.imul(&adjustment_power);
        // The product of input with the adjustment power is exact when
        // both factors together have at most 19 decimal digits; beyond
        // that the multiplication truncates at most half an ulp.
        if MAX_UINT64_DECIMAL_DIGITS as i32 - (buffer.len() as i32) < adjustment_exponent {
            error += DENOMINATOR / 2;
        }
    }

    input.imul(&cached_power);
    // The cached power is off by at most half an ulp (error_b), the
    // multiplication truncates at most half an ulp (fixed_error), and the
    // cross term of both input errors is below 1/8 ulp (error_ab).
    let error_b = DENOMINATOR / 2;
    let error_ab = if error == 0 { 0 } else { 1 };
    let fixed_error = DENOMINATOR / 2;
    error += error_b + error_ab + fixed_error;

    let old_e = input.exp;
    input.normalize();
    error <<= (old_e - input.exp) as u32;

    // How many of input's 64 bits lie below the double's precision?
    let order_of_magnitude = DiyFp::SIGNIFICAND_SIZE + input.exp;
    let effective_significand_size = Double::significand_size_for_order_of_magnitude(order_of_magnitude);
    let mut precision_digits_count = DiyFp::SIGNIFICAND_SIZE - effective_significand_size;
    if precision_digits_count + DENOMINATOR_LOG >= DiyFp::SIGNIFICAND_SIZE {
        // Deep denormal territory: shifting the error into range discards
        // bits, compensated by rounding the error up generously.
        let shift_amount = (precision_digits_count + DENOMINATOR_LOG) - DiyFp::SIGNIFICAND_SIZE + 1;
        input.mant >>= shift_amount;
        input.exp += shift_amount;
        error = (error >> shift_amount) + 1 + DENOMINATOR;
        precision_digits_count -= shift_amount;
    }
    debug_assert!(precision_digits_count < 64);
    let precision_bits_mask = (1u64 << precision_digits_count) - 1;
    let precision_bits = (input.mant & precision_bits_mask) * DENOMINATOR;
    let half_way = (1u64 << (precision_digits_count - 1)) * DENOMINATOR;
    let mut rounded_input = DiyFp::new(
        input.mant >> precision_digits_count,
        input.exp + precision_digits_count,
    );
    if precision_bits >= half_way + error {
        rounded_input.mant += 1;
    }
    // Rounding up may overflow the significand into the next binary
    // magnitude; Double's constructor renormalizes.
    let result = Double::from_diy_fp(rounded_input).value();
    // The guess is uncertain only when the error interval contains the
    // rounding boundary.
    let uncertain =
        half_way.wrapping_sub(error) < precision_bits && precision_bits < half_way + error;
    (result, !uncertain)
}

// Exact comparison of buffer * 10^exponent against a DiyFp, via bignums
// brought to a common scale.
fn compare_buffer_with_diy_fp(buffer: &[u8], exponent: i32, diy_fp: DiyFp) -> Ordering {
    let mut buffer_bignum = Bignum::from_decimal_digits(buffer);
    let mut diy_fp_bignum = Bignum::from_u64(diy_fp.mant);
    if exponent >= 0 {
        buffer_bignum.imul_pow10(exponent as u32);
    } else {
        diy_fp_bignum.imul_pow10((-exponent) as u32);
    }
    if diy_fp.exp > 0 {
        diy_fp_bignum.imul_pow2(diy_fp.exp as u32);
    } else {
        buffer_bignum.imul_pow2((-diy_fp.exp) as u32);
    }
    buffer_bignum.compare(&diy_fp_bignum)
}

// TESTS
// -----

#[cfg(test)]
mod tests {
    use super::*;

    fn check(digits: &[u8], exponent: i32, expected: f64) {
        let result = strtod(digits, exponent);
        assert_eq!(
            result.to_bits(),
            expected.to_bits(),
            "{} * 10^{}",
            std::str::from_utf8(digits).unwrap(),
            exponent
        );
    }

    #[test]
    fn exact_path() {
        check(b"0", 0, 0.0);
        check(b"12345", 0, 12345.0);
        check(b"12345", 10, 12345e10);
        check(b"123456789", 10, 123456789e10);
        check(b"1", 22, 1e22);
        check(b"12345", -5, 0.12345);
        check(b"3", -1, 0.3);
    }

    #[test]
    fn near_halfway_cases() {
        // 2^53 and neighbors: 9007199254740993 is odd and not
        // representable, it must round to the even 2^53.
        check(b"9007199254740992", 0, 9007199254740992.0);
        check(b"9007199254740993", 0, 9007199254740992.0);
        check(b"9007199254740994", 0, 9007199254740994.0);
        check(b"9007199254740995", 0, 9007199254740996.0);
        // 1e23 lies almost exactly between two doubles.
        check(b"1", 23, 1e23);
        check(b"99999999999999974834176", 0, 9.999999999999997e22);
        check(b"100000000000000008388608", 0, 1.0000000000000001e23);
    }

    #[test]
    fn overflow_and_underflow() {
        check(b"1", 309, f64::INFINITY);
        check(b"17976931348623157", 292, f64::MAX);
        check(b"17976931348623159", 292, f64::INFINITY);
        check(b"1", -325, 0.0);
        check(b"5", -324, 5e-324);
        // The exact midpoint between 0 and the smallest denormal rounds
        // down to (even) zero; anything above it rounds up.
        check(b"24703282292062327", -340, 0.0);
        check(b"24703282292062328", -340, 5e-324);
    }

    #[test]
    fn long_buffers() {
        check(&[b'9'; 25], 0, 1e25);
        // 800 significant digits exceed the 780-digit cut; the value
        // 0.999...9 still rounds to 1.
        check(&[b'9'; 800], -800, 1.0);
        // Trailing zeros are stripped before any digit limit applies.
        let mut digits = vec![b'1'];
        digits.extend_from_slice(&[b'0'; 1000]);
        check(&digits, -1000, 1.0);
    }

    #[test]
    fn trimmed_entry_point() {
        assert_eq!(strtod_trimmed(b"", 0), 0.0);
        assert_eq!(strtod_trimmed(b"1", 0), 1.0);
        assert_eq!(strtod_trimmed(b"125", -2), 1.25);
    }
}
