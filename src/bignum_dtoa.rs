//! Exact digit generation backed by arbitrary-precision arithmetic.
//!
//! Scales the value into `[1/10, 1)` as a ratio of two bignums and emits
//! digits by repeated division. Slow but always correct; the fast
//! generators fall back to this path when they cannot guarantee the
//! result.

use std::cmp::Ordering;

use crate::bignum::Bignum;
use crate::ieee::Double;

/// Digit-generation modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BignumDtoaMode {
    /// Produce the fewest digits that still round-trip to the input.
    Shortest,
    /// Produce digits for a fixed count after the decimal point.
    Fixed,
    /// Produce a fixed count of significant digits.
    Precision,
}

/// Convert `v` into decimal digits and a decimal point position, such that
/// `v = 0.digits * 10^decimal_point`.
///
/// `v` must be strictly positive and finite. `requested_digits` is the
/// after-the-point count in `Fixed` mode and the significant-digit count in
/// `Precision` mode; it is ignored for `Shortest`. Returns the number of
/// digits written into `buffer` and the decimal point.
///
/// Generated digits are not trimmed: `Fixed` and `Precision` results may
/// carry trailing zeros.
pub fn bignum_dtoa(
    v: f64,
    mode: BignumDtoaMode,
    requested_digits: usize,
    buffer: &mut [u8],
) -> (usize, i32) {
    debug_assert!(v > 0.0);
    debug_assert!(!Double::new(v).is_special());
    let significand = Double::new(v).significand();
    let is_even = (significand & 1) == 0;
    let exponent = Double::new(v).exponent();
    let normalized_exponent = normalized_exponent(significand, exponent);
    // estimated_power is approximately 10^(position-of-leading-digit).
    let estimated_power = estimate_power(normalized_exponent);

    // Shortcut for Fixed: the requested digits all lie left of the first
    // significant digit, so the value rounds to an empty buffer.
    if mode == BignumDtoaMode::Fixed && -estimated_power - 1 > requested_digits as i32 {
        return (0, -(requested_digits as i32));
    }

    let mut numerator = Bignum::new();
    let mut denominator = Bignum::new();
    let mut delta_minus = Bignum::new();
    let mut delta_plus = Bignum::new();
    let need_boundary_deltas = mode == BignumDtoaMode::Shortest;
    initial_scaled_start_values(
        v,
        estimated_power,
        need_boundary_deltas,
        &mut numerator,
        &mut denominator,
        &mut delta_minus,
        &mut delta_plus,
    );
    // Brings numerator/denominator into [1/10, 1) and computes the first
    // digit's position.
    let mut decimal_point = fixup_multiply10(
        estimated_power,
        is_even,
        &mut numerator,
        &mut denominator,
        &mut delta_minus,
        &mut delta_plus,
    );

    let length = match mode {
        BignumDtoaMode::Shortest => generate_shortest_digits(
            &mut numerator,
            &denominator,
            &mut delta_minus,
            &mut delta_plus,
            is_even,
            buffer,
        ),
        BignumDtoaMode::Fixed => bignum_to_fixed(
            requested_digits,
            &mut decimal_point,
            &mut numerator,
            &mut denominator,
            buffer,
        ),
        BignumDtoaMode::Precision => generate_counted_digits(
            requested_digits,
            &mut decimal_point,
            &mut numerator,
            &denominator,
            buffer,
        ),
    };
    (length, decimal_point)
}

/// The binary exponent of the value with its significand shifted up to the
/// hidden bit.
fn normalized_exponent(mut significand: u64, mut exponent: i32) -> i32 {
    debug_assert!(significand != 0);
    while significand & Double::HIDDEN_BIT == 0 {
        significand <<= 1;
        exponent -= 1;
    }
    exponent
}

/// Estimate the decimal magnitude `10^estimated_power` of a value with the
/// given normalized binary exponent.
///
/// The estimate is never too small, and at most one too big (which the
/// fixup step repairs by a final multiplication by 10).
fn estimate_power(exponent: i32) -> i32 {
    // 1 / lg(10)
    const K_1_LOG10: f64 = 0.301_029_995_663_981_14;
    let estimate = ((exponent + Double::SIGNIFICAND_SIZE - 1) as f64 * K_1_LOG10 - 1e-10).ceil();
    estimate as i32
}

// Let v = significand * 2^exponent.
// Computes, depending on the signs of the exponents, scaled start values
// such that v = numerator / denominator * 10^estimated_power, with the
// boundary deltas (half the distance to the neighboring doubles, in the
// same scale) when requested.
fn initial_scaled_start_values(
    v: f64,
    estimated_power: i32,
    need_boundary_deltas: bool,
    numerator: &mut Bignum,
    denominator: &mut Bignum,
    delta_minus: &mut Bignum,
    delta_plus: &mut Bignum,
) {
    let significand = Double::new(v).significand();
    let exponent = Double::new(v).exponent();

    if exponent >= 0 {
        // v = (significand * 2^exponent) / 10^estimated_power.
        *numerator = Bignum::from_u64(significand);
        numerator.imul_pow2(exponent as u32);
        *denominator = Bignum::from_power_of_ten(estimated_power as u32);
        if need_boundary_deltas {
            // Introduce a common denominator of 2 for the half-ulp deltas.
            denominator.imul_pow2(1);
            numerator.imul_pow2(1);
            *delta_plus = Bignum::from_u64(1);
            delta_plus.imul_pow2(exponent as u32);
            *delta_minus = Bignum::from_u64(1);
            delta_minus.imul_pow2(exponent as u32);
        }
    } else if estimated_power >= 0 {
        // v = significand / (2^-exponent * 10^estimated_power).
        *numerator = Bignum::from_u64(significand);
        *denominator = Bignum::from_power_of_ten(estimated_power as u32);
        denominator.imul_pow2((-exponent) as u32);
        if need_boundary_deltas {
            denominator.imul_pow2(1);
            numerator.imul_pow2(1);
            *delta_plus = Bignum::from_u64(1);
            *delta_minus = Bignum::from_u64(1);
        }
    } else {
        // v = (significand * 10^-estimated_power) / 2^-exponent.
        *numerator = Bignum::from_power_of_ten((-estimated_power) as u32);
        if need_boundary_deltas {
            *delta_plus = numerator.clone();
            *delta_minus = numerator.clone();
        }
        numerator.imul_small(significand);
        *denominator = Bignum::from_u64(1);
        denominator.imul_pow2((-exponent) as u32);
        if need_boundary_deltas {
            numerator.imul_pow2(1);
            denominator.imul_pow2(1);
        }
    }

    // At a power of two the lower boundary is only a quarter ulp away.
    // Scale everything by 2 and double delta_plus so that delta_minus
    // keeps half its relative size.
    if need_boundary_deltas && Double::new(v).lower_boundary_is_closer() {
        numerator.imul_pow2(1);
        denominator.imul_pow2(1);
        delta_plus.imul_pow2(1);
    }
}

// The estimated power may be off by one: multiply numerator (and deltas)
// by 10 when v lies below 1/10 in the scaled representation. Returns the
// position of the decimal point.
fn fixup_multiply10(
    estimated_power: i32,
    is_even: bool,
    numerator: &mut Bignum,
    denominator: &mut Bignum,
    delta_minus: &mut Bignum,
    delta_plus: &mut Bignum,
) -> i32 {
    let in_range = if is_even {
        Bignum::plus_compare(numerator, delta_plus, denominator) != Ordering::Less
    } else {
        Bignum::plus_compare(numerator, delta_plus, denominator) == Ordering::Greater
    };
    if in_range {
        // The estimate was exact: the first digit lands at estimated_power.
        estimated_power + 1
    } else {
        numerator.times10();
        if delta_minus == delta_plus {
            delta_minus.times10();
            *delta_plus = delta_minus.clone();
        } else {
            delta_minus.times10();
            delta_plus.times10();
        }
        estimated_power
    }
}

// Generates digits until the remaining interval around the value is small
// enough that the digits uniquely identify v among its neighbors, rounding
// the last digit toward v.
fn generate_shortest_digits(
    numerator: &mut Bignum,
    denominator: &Bignum,
    delta_minus: &mut Bignum,
    delta_plus: &mut Bignum,
    is_even: bool,
    buffer: &mut [u8],
) -> usize {
    // When the boundary deltas coincide, delta_plus is kept as an alias of
    // delta_minus so only one of them needs updating per digit.
    let deltas_equal = delta_minus == delta_plus;
    let mut length = 0;
    loop {
        let digit = numerator.div_mod_small(denominator);
        debug_assert!(digit <= 9);
        buffer[length] = b'0' + digit as u8;
        length += 1;

        // Can we stop and round down (the remainder is below delta_minus),
        // or stop and round up (the remainder reaches past the denominator
        // minus delta_plus)?
        let in_delta_room_minus = if is_even {
            numerator.compare(delta_minus) != Ordering::Greater
        } else {
            numerator.compare(delta_minus) == Ordering::Less
        };
        let in_delta_room_plus = {
            let delta_plus: &Bignum = if deltas_equal { delta_minus } else { delta_plus };
            if is_even {
                Bignum::plus_compare(numerator, delta_plus, denominator) != Ordering::Less
            } else {
                Bignum::plus_compare(numerator, delta_plus, denominator) == Ordering::Greater
            }
        };
        if !in_delta_room_minus && !in_delta_room_plus {
            numerator.times10();
            delta_minus.times10();
            if !deltas_equal {
                delta_plus.times10();
            }
        } else if in_delta_room_minus && in_delta_room_plus {
            // Both rounding directions yield a valid representation:
            // pick the one closest to v, ties going to the even digit.
            match Bignum::plus_compare(numerator, numerator, denominator) {
                Ordering::Less => {}
                Ordering::Greater => {
                    debug_assert!(buffer[length - 1] != b'9');
                    buffer[length - 1] += 1;
                }
                Ordering::Equal => {
                    if (buffer[length - 1] - b'0') % 2 != 0 {
                        debug_assert!(buffer[length - 1] != b'9');
                        buffer[length - 1] += 1;
                    }
                }
            }
            return length;
        } else if in_delta_room_minus {
            return length;
        } else {
            debug_assert!(buffer[length - 1] != b'9');
            buffer[length - 1] += 1;
            return length;
        }
    }
}

// Generates exactly count digits (count >= 1), rounding the final digit
// half-up and propagating carries.
fn generate_counted_digits(
    count: usize,
    decimal_point: &mut i32,
    numerator: &mut Bignum,
    denominator: &Bignum,
    buffer: &mut [u8],
) -> usize {
    debug_assert!(count >= 1);
    for i in 0..count - 1 {
        let digit = numerator.div_mod_small(denominator);
        debug_assert!(digit <= 9);
        buffer[i] = b'0' + digit as u8;
        numerator.times10();
    }
    // Generate the last digit and round.
    let mut digit = numerator.div_mod_small(denominator);
    if Bignum::plus_compare(numerator, numerator, denominator) != Ordering::Less {
        digit += 1;
    }
    debug_assert!(digit <= 10);
    buffer[count - 1] = b'0' + digit as u8;
    // Correct bad digits (in case we had a sequence of '9's).
    for i in (1..count).rev() {
        if buffer[i] != b'0' + 10 {
            break;
        }
        buffer[i] = b'0';
        buffer[i - 1] += 1;
    }
    if buffer[0] == b'0' + 10 {
        buffer[0] = b'1';
        *decimal_point += 1;
    }
    count
}

// Fixed mode: generate decimal_point + requested_digits digits, where the
// first digit's weight is 10^(decimal_point-1).
fn bignum_to_fixed(
    requested_digits: usize,
    decimal_point: &mut i32,
    numerator: &mut Bignum,
    denominator: &mut Bignum,
    buffer: &mut [u8],
) -> usize {
    // Note that we have to generate one extra position when rounding could
    // carry into a new leading digit.
    if -(*decimal_point) > requested_digits as i32 {
        // The value is far smaller than the requested resolution.
        *decimal_point = -(requested_digits as i32);
        0
    } else if -(*decimal_point) == requested_digits as i32 {
        // The first digit sits just past the resolution: the value rounds
        // to either 1 or 0 at this scale.
        denominator.times10();
        if Bignum::plus_compare(numerator, numerator, denominator) != Ordering::Less {
            buffer[0] = b'1';
            *decimal_point += 1;
            1
        } else {
            0
        }
    } else {
        let needed_digits = (*decimal_point + requested_digits as i32) as usize;
        generate_counted_digits(needed_digits, decimal_point, numerator, denominator, buffer)
    }
}

// TESTS
// -----
