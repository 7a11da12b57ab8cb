//! Grisu3 digit generation.
//!
//! Fast but imprecise: the value is scaled by a cached power of ten using
//! 64-bit extended-precision arithmetic, so the generated digits come with
//! an error bound of one unit in the last place of the scaled value. When
//! that error does not allow a safe rounding decision the functions bail
//! out, and the caller retries with the exact bignum generator.

use crate::cached_powers;
use crate::diy_fp::DiyFp;
use crate::ieee::Double;

/// Digit-generation modes for the fast path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FastDtoaMode {
    /// Produce the fewest digits that still round-trip to the input.
    Shortest,
    /// Produce a fixed count of significant digits.
    Precision,
}

/// The longest digit sequence `fast_dtoa` produces, excluding a terminator.
pub const FAST_DTOA_MAXIMAL_LENGTH: usize = 17;

// Grisu works on normalized DiyFps whose binary exponent lies in this
// window. The bounds leave enough headroom that the integral part of the
// scaled value fits in 32 bits and the fractional multiplications by 10
// cannot overflow 64 bits.
const MINIMAL_TARGET_EXPONENT: i32 = -60;
const MAXIMAL_TARGET_EXPONENT: i32 = -32;

/// Convert `v` into decimal digits and a decimal point position, such that
/// `v = 0.digits * 10^decimal_point`.
///
/// `v` must be strictly positive and finite. Returns `None` when the fast
/// path cannot guarantee a correct result; the caller must then fall back
/// to `bignum_dtoa`. On success in `Shortest` mode the digits are the
/// shortest round-tripping representation; in `Precision` mode exactly
/// `requested_digits` digits are produced (modulo a rounding carry).
pub fn fast_dtoa(
    v: f64,
    mode: FastDtoaMode,
    requested_digits: usize,
    buffer: &mut [u8],
) -> Option<(usize, i32)> {
    debug_assert!(v > 0.0);
    debug_assert!(!Double::new(v).is_special());

    let (length, decimal_exponent) = match mode {
        FastDtoaMode::Shortest => grisu3(v, buffer)?,
        FastDtoaMode::Precision => grisu3_counted(v, requested_digits, buffer)?,
    };
    Some((length, length as i32 + decimal_exponent))
}

// Scales v and its boundaries into the target exponent window and lets
// digit_gen emit digits valid for the whole rounding interval. Errors made
// by the imprecise cached power are accounted for inside digit_gen, so a
// false result here only ever means "undecidable", never "wrong".
fn grisu3(v: f64, buffer: &mut [u8]) -> Option<(usize, i32)> {
    let w = Double::new(v).as_normalized_diy_fp();
    let (boundary_minus, boundary_plus) = Double::new(v).normalized_boundaries();
    debug_assert!(boundary_plus.exp == w.exp);

    let ten_mk_minimal_binary_exponent =
        MINIMAL_TARGET_EXPONENT - (w.exp + DiyFp::SIGNIFICAND_SIZE);
    let ten_mk_maximal_binary_exponent =
        MAXIMAL_TARGET_EXPONENT - (w.exp + DiyFp::SIGNIFICAND_SIZE);
    let (ten_mk, mk) = cached_powers::get_cached_power_for_binary_exponent_range(
        ten_mk_minimal_binary_exponent,
        ten_mk_maximal_binary_exponent,
    );
    debug_assert!(
        MINIMAL_TARGET_EXPONENT <= w.exp + ten_mk.exp + DiyFp::SIGNIFICAND_SIZE
            && MAXIMAL_TARGET_EXPONENT >= w.exp + ten_mk.exp + DiyFp::SIGNIFICAND_SIZE
    );

    // The scaled values are off by at most one ulp: w was normalized so
    // its product with ten_mk loses less than one bit of precision.
    let scaled_w = w.mul(&ten_mk);
    debug_assert!(scaled_w.exp == boundary_plus.exp + ten_mk.exp + DiyFp::SIGNIFICAND_SIZE);
    let scaled_boundary_minus = boundary_minus.mul(&ten_mk);
    let scaled_boundary_plus = boundary_plus.mul(&ten_mk);

    let (length, kappa) = digit_gen(
        scaled_boundary_minus,
        scaled_w,
        scaled_boundary_plus,
        buffer,
    )?;
    Some((length, -mk + kappa))
}

fn grisu3_counted(
    v: f64,
    requested_digits: usize,
    buffer: &mut [u8],
) -> Option<(usize, i32)> {
    let w = Double::new(v).as_normalized_diy_fp();

    let ten_mk_minimal_binary_exponent =
        MINIMAL_TARGET_EXPONENT - (w.exp + DiyFp::SIGNIFICAND_SIZE);
    let ten_mk_maximal_binary_exponent =
        MAXIMAL_TARGET_EXPONENT - (w.exp + DiyFp::SIGNIFICAND_SIZE);
    let (ten_mk, mk) = cached_powers::get_cached_power_for_binary_exponent_range(
        ten_mk_minimal_binary_exponent,
        ten_mk_maximal_binary_exponent,
    );

    let scaled_w = w.mul(&ten_mk);

    let (length, kappa) = digit_gen_counted(scaled_w, requested_digits, buffer)?;
    Some((length, -mk + kappa))
}

// Adjusts the last digit of the generated digits towards w, and checks
// that the result stays inside the unsafe interval with enough margin to
// absorb the accumulated imprecision (unit per input value).
//
// All quantities are significands of DiyFps with the same exponent.
fn round_weed(
    buffer: &mut [u8],
    length: usize,
    distance_too_high_w: u64,
    unsafe_interval: u64,
    mut rest: u64,
    ten_kappa: u64,
    unit: u64,
) -> bool {
    let small_distance = distance_too_high_w - unit;
    let big_distance = distance_too_high_w + unit;
    // The digits so far point at too_high - rest; walk it down towards w
    // as long as the next step stays inside the interval and gets closer.
    debug_assert!(rest <= unsafe_interval);
    while rest < small_distance
        && unsafe_interval - rest >= ten_kappa
        && (rest + ten_kappa < small_distance
            || small_distance - rest >= rest + ten_kappa - small_distance)
    {
        buffer[length - 1] -= 1;
        rest += ten_kappa;
    }

    // If the approximation was off, another digit value could be at least
    // as close to the (unknown) exact w. Reject such undecidable cases.
    if rest < big_distance
        && unsafe_interval - rest >= ten_kappa
        && (rest + ten_kappa < big_distance
            || big_distance - rest > rest + ten_kappa - big_distance)
    {
        return false;
    }

    // The result must lie safely inside the interval even after the
    // boundaries move by unit towards each other.
    (2 * unit <= rest) && (rest <= unsafe_interval - 4 * unit)
}

// Rounds the last generated digit of a counted sequence, reporting failure
// when the imprecision does not allow a decision. A carry out of the first
// digit bumps kappa.
fn round_weed_counted(
    buffer: &mut [u8],
    length: usize,
    rest: u64,
    ten_kappa: u64,
    unit: u64,
    kappa: &mut i32,
) -> bool {
    debug_assert!(rest < ten_kappa);
    // Too imprecise to decide anything.
    if unit >= ten_kappa {
        return false;
    }
    if ten_kappa - unit <= unit {
        return false;
    }
    // Clearly closer to the value obtained by rounding down.
    if (ten_kappa - rest > rest) && (ten_kappa - 2 * rest >= 2 * unit) {
        return true;
    }
    // Clearly closer to the value obtained by rounding up.
    if (rest > unit) && (ten_kappa - (rest - unit) <= rest - unit) {
        buffer[length - 1] += 1;
        for i in (1..length).rev() {
            if buffer[i] != b'0' + 10 {
                break;
            }
            buffer[i] = b'0';
            buffer[i - 1] += 1;
        }
        if buffer[0] == b'0' + 10 {
            buffer[0] = b'1';
            *kappa += 1;
        }
        return true;
    }
    false
}

const SMALL_POWERS_OF_TEN: [u32; 11] = [
    0, 1, 10, 100, 1000, 10_000, 100_000, 1_000_000, 10_000_000, 100_000_000, 1_000_000_000,
];

// Returns the biggest power of ten not greater than number, together with
// its exponent plus one. number_bits bounds the bit length of number.
fn biggest_power_ten(number: u32, number_bits: i32) -> (u32, i32) {
    debug_assert!(number < (1u64 << number_bits) as u32 || number_bits == 32);
    // 1233/4096 is a lower bound for lg(10); the guess is off by at most
    // one, and only in the too-small direction before the correction.
    let mut exponent_plus_one_guess = ((number_bits + 1) * 1233 >> 12) + 1;
    if number < SMALL_POWERS_OF_TEN[exponent_plus_one_guess as usize] {
        exponent_plus_one_guess -= 1;
    }
    (
        SMALL_POWERS_OF_TEN[exponent_plus_one_guess as usize],
        exponent_plus_one_guess,
    )
}

// Generates digits for the interval (low, high) around w, all three scaled
// into the target exponent window. Emits the digits of high and weeds them
// back towards w once the remainder fits in the unsafe interval.
//
// Returns the digit count and kappa, where the digits satisfy
// w ~= 0.digits * 10^(kappa - 60ish); the caller folds kappa into the
// decimal exponent.
fn digit_gen(low: DiyFp, w: DiyFp, high: DiyFp, buffer: &mut [u8]) -> Option<(usize, i32)> {
    debug_assert!(low.exp == w.exp && w.exp == high.exp);
    debug_assert!(low.mant + 1 <= high.mant - 1);
    debug_assert!((MINIMAL_TARGET_EXPONENT..=MAXIMAL_TARGET_EXPONENT).contains(&w.exp));

    // low and high are each off by at most one unit; widening the interval
    // by one unit on both sides makes every emitted sequence convertible
    // back to a value in [low, high].
    let mut unit: u64 = 1;
    let too_low = DiyFp::new(low.mant - unit, low.exp);
    let too_high = DiyFp::new(high.mant + unit, high.exp);
    let mut unsafe_interval = too_high.sub(&too_low);

    // one = 1 in the fixed-point representation induced by w's exponent.
    let one = DiyFp::new(1u64 << -w.exp, w.exp);
    let mut integrals = (too_high.mant >> -one.exp) as u32;
    let mut fractionals = too_high.mant & (one.mant - 1);

    let (mut divisor, divisor_exponent_plus_one) =
        biggest_power_ten(integrals, DiyFp::SIGNIFICAND_SIZE - (-one.exp));
    let mut kappa = divisor_exponent_plus_one;
    let mut length = 0;

    // Integral digits.
    while kappa > 0 {
        let digit = integrals / divisor;
        debug_assert!(digit <= 9);
        buffer[length] = b'0' + digit as u8;
        length += 1;
        integrals %= divisor;
        kappa -= 1;
        let rest = ((integrals as u64) << -one.exp) + fractionals;
        if rest < unsafe_interval.mant {
            let ok = round_weed(
                buffer,
                length,
                too_high.sub(&w).mant,
                unsafe_interval.mant,
                rest,
                (divisor as u64) << -one.exp,
                unit,
            );
            return if ok { Some((length, kappa)) } else { None };
        }
        divisor /= 10;
    }

    // Fractional digits. The invariants fractionals < one and unit < one
    // guarantee the multiplications by 10 do not overflow.
    debug_assert!(one.exp >= -60);
    debug_assert!(fractionals < one.mant);
    loop {
        fractionals *= 10;
        unit *= 10;
        unsafe_interval.mant *= 10;
        let digit = (fractionals >> -one.exp) as u8;
        debug_assert!(digit <= 9);
        buffer[length] = b'0' + digit;
        length += 1;
        fractionals &= one.mant - 1;
        kappa -= 1;
        if fractionals < unsafe_interval.mant {
            let ok = round_weed(
                buffer,
                length,
                too_high.sub(&w).mant * unit,
                unsafe_interval.mant,
                fractionals,
                one.mant,
                unit,
            );
            return if ok { Some((length, kappa)) } else { None };
        }
    }
}

// Counted variant: emits exactly requested_digits digits of w (which is
// off by at most one unit) and rounds the last one, failing when the
// imprecision makes the rounding ambiguous.
fn digit_gen_counted(
    w: DiyFp,
    requested_digits: usize,
    buffer: &mut [u8],
) -> Option<(usize, i32)> {
    debug_assert!((MINIMAL_TARGET_EXPONENT..=MAXIMAL_TARGET_EXPONENT).contains(&w.exp));
    debug_assert!(requested_digits >= 1);

    let mut w_error: u64 = 1;
    let one = DiyFp::new(1u64 << -w.exp, w.exp);
    let mut integrals = (w.mant >> -one.exp) as u32;
    let mut fractionals = w.mant & (one.mant - 1);

    let (mut divisor, divisor_exponent_plus_one) =
        biggest_power_ten(integrals, DiyFp::SIGNIFICAND_SIZE - (-one.exp));
    let mut kappa = divisor_exponent_plus_one;
    let mut length = 0;
    let mut remaining = requested_digits;

    // Integral digits.
    while kappa > 0 {
        let digit = integrals / divisor;
        debug_assert!(digit <= 9);
        buffer[length] = b'0' + digit as u8;
        length += 1;
        integrals %= divisor;
        kappa -= 1;
        remaining -= 1;
        if remaining == 0 {
            break;
        }
        divisor /= 10;
    }

    if remaining == 0 {
        let rest = ((integrals as u64) << -one.exp) + fractionals;
        let ok = round_weed_counted(
            buffer,
            length,
            rest,
            (divisor as u64) << -one.exp,
            w_error,
            &mut kappa,
        );
        return if ok { Some((length, kappa)) } else { None };
    }

    // Fractional digits, until the error swallows the remaining digits.
    debug_assert!(one.exp >= -60);
    debug_assert!(fractionals < one.mant);
    while remaining > 0 && fractionals > w_error {
        fractionals *= 10;
        w_error *= 10;
        let digit = (fractionals >> -one.exp) as u8;
        debug_assert!(digit <= 9);
        buffer[length] = b'0' + digit;
        length += 1;
        fractionals &= one.mant - 1;
        kappa -= 1;
        remaining -= 1;
    }
    if remaining != 0 {
        return None;
    }
    let ok = round_weed_counted(buffer, length, fractionals, one.mant, w_error, &mut kappa);
    if ok {
        Some((length, kappa))
    } else {
        None
    }
}

// TESTS
// -----
