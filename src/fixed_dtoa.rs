//! Fast fixed-notation digit generation.
//!
//! Handles doubles with a binary exponent of at most 20 and at most 20
//! requested digits after the decimal point, using plain integer
//! arithmetic (at most 128 bits wide). Larger inputs are rejected and the
//! caller falls back to the exact bignum generator.

use crate::ieee::Double;

// 5^17, the largest power of five fitting in 40 bits. Dividing the
// significand by it peels off 17 decimal digits at once.
const FIVE_17: u64 = 762_939_453_125;

fn fill_digits_32_fixed_length(mut number: u32, requested_length: usize, buffer: &mut [u8], length: &mut usize) {
    for i in (0..requested_length).rev() {
        buffer[*length + i] = b'0' + (number % 10) as u8;
        number /= 10;
    }
    *length += requested_length;
}

fn fill_digits_32(mut number: u32, buffer: &mut [u8], length: &mut usize) {
    let mut number_length = 0;
    // We fill the digits in reverse order and reverse them afterwards.
    while number != 0 {
        let digit = (number % 10) as u8;
        number /= 10;
        buffer[*length + number_length] = b'0' + digit;
        number_length += 1;
    }
    buffer[*length..*length + number_length].reverse();
    *length += number_length;
}

fn fill_digits_64_fixed_length(mut number: u64, buffer: &mut [u8], length: &mut usize) {
    const TEN_7: u64 = 10_000_000;
    // For efficiency cut the number into three parts that fit in 32 bits.
    let part2 = (number % TEN_7) as u32;
    number /= TEN_7;
    let part1 = (number % TEN_7) as u32;
    let part0 = (number / TEN_7) as u32;

    fill_digits_32_fixed_length(part0, 3, buffer, length);
    fill_digits_32_fixed_length(part1, 7, buffer, length);
    fill_digits_32_fixed_length(part2, 7, buffer, length);
}

fn fill_digits_64(mut number: u64, buffer: &mut [u8], length: &mut usize) {
    const TEN_7: u64 = 10_000_000;
    let part2 = (number % TEN_7) as u32;
    number /= TEN_7;
    let part1 = (number % TEN_7) as u32;
    let part0 = (number / TEN_7) as u32;

    if part0 != 0 {
        fill_digits_32(part0, buffer, length);
        fill_digits_32_fixed_length(part1, 7, buffer, length);
        fill_digits_32_fixed_length(part2, 7, buffer, length);
    } else if part1 != 0 {
        fill_digits_32(part1, buffer, length);
        fill_digits_32_fixed_length(part2, 7, buffer, length);
    } else {
        fill_digits_32(part2, buffer, length);
    }
}

// Increments the last digit, propagating carries; an empty buffer becomes
// "1" (the fraction rounded up to a unit).
fn round_up(buffer: &mut [u8], length: &mut usize, decimal_point: &mut i32) {
    if *length == 0 {
        buffer[0] = b'1';
        *decimal_point = 1;
        *length = 1;
        return;
    }
    buffer[*length - 1] += 1;
    for i in (1..*length).rev() {
        if buffer[i] != b'0' + 10 {
            return;
        }
        buffer[i] = b'0';
        buffer[i - 1] += 1;
    }
    if buffer[0] == b'0' + 10 {
        buffer[0] = b'1';
        *decimal_point += 1;
    }
}

// Emits fractional_count digits of fractionals * 2^exponent (a value in
// [0, 1)), rounding the remainder half-up.
//
// Multiplying by 5 and moving the point one bit down is the same as
// multiplying by 10: the digit then sits above the point.
fn fill_fractionals(
    mut fractionals: u64,
    exponent: i32,
    fractional_count: usize,
    buffer: &mut [u8],
    length: &mut usize,
    decimal_point: &mut i32,
) {
    debug_assert!((-128..=0).contains(&exponent));
    if -exponent <= 64 {
        // fractionals stays below 2^point and point <= 60, so the
        // multiplication by 5 cannot overflow.
        debug_assert!(fractionals >> 56 == 0);
        let mut point = -exponent;
        for _ in 0..fractional_count {
            if fractionals == 0 {
                break;
            }
            fractionals *= 5;
            point -= 1;
            let digit = (fractionals >> point) as u8;
            debug_assert!(digit <= 9);
            buffer[*length] = b'0' + digit;
            *length += 1;
            fractionals -= (digit as u64) << point;
        }
        // Round up if the remainder's first bit is set.
        debug_assert!(fractionals == 0 || point - 1 >= 0);
        if fractionals != 0 && (fractionals >> (point - 1)) & 1 == 1 {
            round_up(buffer, length, decimal_point);
        }
    } else {
        debug_assert!(64 < -exponent && -exponent <= 128);
        let mut fractionals128 = (fractionals as u128) << (exponent + 128);
        let mut point = 128;
        for _ in 0..fractional_count {
            if fractionals128 == 0 {
                break;
            }
            fractionals128 *= 5;
            point -= 1;
            let digit = (fractionals128 >> point) as u8;
            debug_assert!(digit <= 9);
            buffer[*length] = b'0' + digit;
            *length += 1;
            fractionals128 -= (digit as u128) << point;
        }
        if (fractionals128 >> (point - 1)) & 1 == 1 {
            round_up(buffer, length, decimal_point);
        }
    }
}

// Removes leading and trailing zeros, adjusting the decimal point for the
// removed leading ones.
fn trim_zeros(buffer: &mut [u8], length: &mut usize, decimal_point: &mut i32) {
    while *length > 0 && buffer[*length - 1] == b'0' {
        *length -= 1;
    }
    let mut first_non_zero = 0;
    while first_non_zero < *length && buffer[first_non_zero] == b'0' {
        first_non_zero += 1;
    }
    if first_non_zero != 0 {
        buffer.copy_within(first_non_zero..*length, 0);
        *length -= first_non_zero;
        *decimal_point -= first_non_zero as i32;
    }
}

/// Produce digits of `v` for fixed notation with `fractional_count` digits
/// after the decimal point, such that `v ~= 0.digits * 10^decimal_point`
/// when rounded at that resolution.
///
/// Returns `None` when `v` is too large (binary exponent above 20, i.e.
/// roughly above `2^73`) or `fractional_count` exceeds 20; the caller then
/// falls back to `bignum_dtoa`. Trailing zeros are trimmed, so a value
/// that rounds to zero at the requested resolution yields an empty digit
/// sequence with `decimal_point == -fractional_count`.
pub fn fast_fixed_dtoa(
    v: f64,
    fractional_count: usize,
    buffer: &mut [u8],
) -> Option<(usize, i32)> {
    let significand = Double::new(v).significand();
    let exponent = Double::new(v).exponent();
    // Out of the fast path's range.
    if exponent > 20 {
        return None;
    }
    if fractional_count > 20 {
        return None;
    }

    let mut length = 0;
    let mut decimal_point;
    if exponent + Double::SIGNIFICAND_SIZE > 64 {
        // The integral part needs more than 64 bits. Split off 17 decimal
        // digits by dividing with 10^17 = 5^17 * 2^17, folding the power
        // of two into the shifts.
        let mut divisor = FIVE_17;
        let divisor_power = 17;
        let mut dividend = significand;
        let quotient;
        let remainder;
        if exponent > divisor_power {
            dividend <<= exponent - divisor_power;
            quotient = (dividend / divisor) as u32;
            remainder = (dividend % divisor) << divisor_power;
        } else {
            divisor <<= divisor_power - exponent;
            quotient = (dividend / divisor) as u32;
            remainder = (dividend % divisor) << exponent;
        }
        fill_digits_32(quotient, buffer, &mut length);
        fill_digits_64_fixed_length(remainder, buffer, &mut length);
        decimal_point = length as i32;
    } else if exponent >= 0 {
        // An integer with at most 64 bits.
        let significand = significand << exponent;
        fill_digits_64(significand, buffer, &mut length);
        decimal_point = length as i32;
    } else if exponent > -Double::SIGNIFICAND_SIZE {
        // Integral and fractional part.
        let integrals = significand >> -exponent;
        let fractionals = significand - (integrals << -exponent);
        if integrals > u32::MAX as u64 {
            fill_digits_64(integrals, buffer, &mut length);
        } else {
            fill_digits_32(integrals as u32, buffer, &mut length);
        }
        decimal_point = length as i32;
        fill_fractionals(
            fractionals,
            exponent,
            fractional_count,
            buffer,
            &mut length,
            &mut decimal_point,
        );
    } else if exponent < -128 {
        // The value is below 10^-20 and rounds to zero at any supported
        // resolution.
        decimal_point = -(fractional_count as i32);
    } else {
        decimal_point = 0;
        fill_fractionals(
            significand,
            exponent,
            fractional_count,
            buffer,
            &mut length,
            &mut decimal_point,
        );
    }
    trim_zeros(buffer, &mut length, &mut decimal_point);
    if length == 0 {
        // The (rounded) value is zero at this resolution.
        decimal_point = -(fractional_count as i32);
    }
    Some((length, decimal_point))
}

// TESTS
// -----

#[cfg(test)]
mod tests {
    use super::*;

    fn check(v: f64, fractional_count: usize, digits: &str, point: i32) {
        let mut buffer = [0u8; 128];
        let (length, decimal_point) =
            fast_fixed_dtoa(v, fractional_count, &mut buffer).expect("value out of range");
        assert_eq!(
            std::str::from_utf8(&buffer[..length]).unwrap(),
            digits,
            "digits for {:e}",
            v
        );
        assert_eq!(decimal_point, point, "decimal point for {:e}", v);
    }

    #[test]
    fn various_doubles() {
        check(1.0, 1, "1", 1);
        check(1.0, 15, "1", 1);
        check(1.0, 0, "1", 1);
        check(0xFFFFFFFFu32 as f64, 5, "4294967295", 10);
        check(4294967296.0, 5, "4294967296", 10);
        check(1e21, 5, "1", 22);
        check(999999999999999868928.0, 2, "999999999999999868928", 21);
        check(6.9999999999999989514240000e21, 5, "6999999999999998951424", 22);
        check(1.5, 5, "15", 1);
        check(1.55, 5, "155", 1);
        check(1.55, 1, "16", 1);
        check(1.00000001, 15, "100000001", 1);
        check(0.1, 10, "1", 0);
        check(0.01, 10, "1", -1);
        check(0.001, 10, "1", -2);
        check(0.5, 5, "5", 0);
        check(0.05, 5, "5", -1);
        check(0.7, 1, "7", 0);
        check(4.1, 10, "41", 1);
        check(0.000000625, 15, "625", -6);
    }

    #[test]
    fn rounding_carries() {
        check(0.99999, 2, "1", 1);
        check(0.096, 2, "1", 0);
        check(0.096, 1, "1", 0);
        check(0.96, 1, "1", 1);
        // 0.95 is really 0.94999999999999995559... and must round down.
        check(0.95, 1, "9", 0);
    }

    #[test]
    fn rounds_to_zero() {
        // Too small for the requested resolution.
        check(1e-30, 20, "", -20);
        check(0.0000001, 5, "", -5);
        check(0.04, 1, "", -1);
    }

    #[test]
    fn rejects_out_of_range() {
        let mut buffer = [0u8; 128];
        // Above 2^73 the integral part no longer fits the fast path.
        assert!(fast_fixed_dtoa(1e30, 5, &mut buffer).is_none());
        assert!(fast_fixed_dtoa(1.5, 30, &mut buffer).is_none());
    }
}
