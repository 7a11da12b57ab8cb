//! High-level double-to-string and string-to-double conversion.
//!
//! [`DoubleToStringConverter`] formats doubles in shortest, fixed,
//! exponential, and precision notation; [`StringToDoubleConverter`] parses
//! them back with configurable leniency. Both delegate the digit work to
//! the lower-level generators and [`strtod`](crate::strtod).

use std::fmt;

use crate::bignum_dtoa::{bignum_dtoa, BignumDtoaMode};
use crate::fast_dtoa::{fast_dtoa, FastDtoaMode, FAST_DTOA_MAXIMAL_LENGTH};
use crate::fixed_dtoa::fast_fixed_dtoa;
use crate::ieee::Double;
use crate::strtod::strtod;
use crate::utils;

/// Modes for [`double_to_ascii`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DtoaMode {
    /// The fewest digits that round-trip to the input.
    Shortest,
    /// `requested_digits` digits after the decimal point.
    Fixed,
    /// `requested_digits` significant digits.
    Precision,
}

/// The longest decimal digit sequence a double ever needs to round-trip.
pub const BASE10_MAXIMAL_LENGTH: usize = 17;

/// Produce the decimal digits and decimal point for `v`, dispatching to
/// the fast generators and falling back to the exact bignum generator.
///
/// `v` must be finite. Returns the sign, the number of digits written to
/// `buffer`, and the decimal point, such that
/// `|v| ~= 0.digits * 10^decimal_point`. In `Fixed` mode trailing zeros
/// are trimmed and an all-zero result is empty; `Precision` keeps its
/// trailing zeros.
pub fn double_to_ascii(
    v: f64,
    mode: DtoaMode,
    requested_digits: usize,
    buffer: &mut [u8],
) -> (bool, usize, i32) {
    debug_assert!(!Double::new(v).is_special());

    let sign = Double::new(v).sign() < 0;
    let v = if sign { -v } else { v };

    if mode == DtoaMode::Precision && requested_digits == 0 {
        return (sign, 0, 0);
    }
    if v == 0.0 {
        buffer[0] = b'0';
        return (sign, 1, 1);
    }

    let fast = match mode {
        DtoaMode::Shortest => fast_dtoa(v, FastDtoaMode::Shortest, 0, buffer),
        DtoaMode::Fixed => fast_fixed_dtoa(v, requested_digits, buffer),
        DtoaMode::Precision => fast_dtoa(v, FastDtoaMode::Precision, requested_digits, buffer),
    };
    let (length, decimal_point) = match fast {
        Some(result) => result,
        None => {
            let bignum_mode = match mode {
                DtoaMode::Shortest => BignumDtoaMode::Shortest,
                DtoaMode::Fixed => BignumDtoaMode::Fixed,
                DtoaMode::Precision => BignumDtoaMode::Precision,
            };
            let (mut length, decimal_point) = bignum_dtoa(v, bignum_mode, requested_digits, buffer);
            if mode == DtoaMode::Fixed {
                length = utils::trim_trailing_zeros(&buffer[..length]).len();
            }
            (length, decimal_point)
        }
    };
    (sign, length, decimal_point)
}

/// Formatter from doubles to decimal strings.
///
/// The fields mirror the knobs of the ECMAScript `Number`-to-string
/// algorithms; [`DoubleToStringConverter::ecmascript`] is configured to
/// match them exactly.
#[derive(Clone, Debug)]
pub struct DoubleToStringConverter {
    /// Emit `+` before non-negative exponents (`1e+5` instead of `1e5`).
    pub emit_positive_exponent_sign: bool,
    /// In shortest mode, append `.` to integral results.
    pub emit_trailing_decimal_point: bool,
    /// With the trailing point, also append a `0` after it.
    pub emit_trailing_zero_after_point: bool,
    /// Drop the sign of negative zero.
    pub unique_zero: bool,
    /// Spelling of infinities, or `None` to refuse them.
    pub infinity_symbol: Option<&'static str>,
    /// Spelling of NaNs, or `None` to refuse them.
    pub nan_symbol: Option<&'static str>,
    /// Character introducing the exponent.
    pub exponent_character: char,
    /// Shortest mode switches to exponential notation below
    /// `10^decimal_in_shortest_low`.
    pub decimal_in_shortest_low: i32,
    /// Shortest mode switches to exponential notation at
    /// `10^decimal_in_shortest_high` and above.
    pub decimal_in_shortest_high: i32,
    /// Precision mode tolerates this many zeros between the point and the
    /// first significant digit before going exponential.
    pub max_leading_padding_zeroes_in_precision_mode: i32,
    /// Precision mode tolerates this many padding zeros after the last
    /// significant digit before going exponential.
    pub max_trailing_padding_zeroes_in_precision_mode: i32,
}

impl DoubleToStringConverter {
    /// Values at or above `10^60` have no fixed representation.
    pub const MAX_FIXED_DIGITS_BEFORE_POINT: usize = 60;
    /// Upper limit for [`to_fixed`](Self::to_fixed)'s digit count.
    pub const MAX_FIXED_DIGITS_AFTER_POINT: usize = 60;
    /// Upper limit for [`to_exponential`](Self::to_exponential)'s digit count.
    pub const MAX_EXPONENTIAL_DIGITS: usize = 120;
    /// Lower bound for [`to_precision`](Self::to_precision)'s digit count.
    pub const MIN_PRECISION_DIGITS: usize = 1;
    /// Upper bound for [`to_precision`](Self::to_precision)'s digit count.
    pub const MAX_PRECISION_DIGITS: usize = 120;

    /// The converter behind ECMAScript's `Number.prototype.toString` and
    /// friends.
    pub const fn ecmascript() -> DoubleToStringConverter {
        DoubleToStringConverter {
            emit_positive_exponent_sign: true,
            emit_trailing_decimal_point: false,
            emit_trailing_zero_after_point: false,
            unique_zero: true,
            infinity_symbol: Some("Infinity"),
            nan_symbol: Some("NaN"),
            exponent_character: 'e',
            decimal_in_shortest_low: -6,
            decimal_in_shortest_high: 21,
            max_leading_padding_zeroes_in_precision_mode: 6,
            max_trailing_padding_zeroes_in_precision_mode: 0,
        }
    }

    /// Shortest round-tripping representation, in positional notation
    /// inside the `decimal_in_shortest_low..high` window and exponential
    /// notation outside it.
    ///
    /// Returns `None` for a special value without a configured symbol.
    pub fn to_shortest(&self, value: f64) -> Option<String> {
        if Double::new(value).is_special() {
            return self.special_value(value);
        }

        let mut buffer = [0u8; BASE10_MAXIMAL_LENGTH + 1];
        let (sign, length, decimal_point) =
            double_to_ascii(value, DtoaMode::Shortest, 0, &mut buffer);

        let mut result = String::new();
        if sign && (value != 0.0 || !self.unique_zero) {
            result.push('-');
        }
        let exponent = decimal_point - 1;
        if self.decimal_in_shortest_low <= exponent && exponent < self.decimal_in_shortest_high {
            let digits_after_point = (length as i32 - decimal_point).max(0) as usize;
            self.push_decimal(&buffer[..length], decimal_point, digits_after_point, &mut result);
        } else {
            self.push_exponential(&buffer[..length], exponent, &mut result);
        }
        Some(result)
    }

    /// Fixed notation with `requested_digits` digits after the point.
    ///
    /// Returns `None` when the value is at or above `10^60`, when more
    /// than 60 digits are requested, or for a special value without a
    /// configured symbol.
    pub fn to_fixed(&self, value: f64, requested_digits: usize) -> Option<String> {
        if Double::new(value).is_special() {
            return self.special_value(value);
        }
        if requested_digits > Self::MAX_FIXED_DIGITS_AFTER_POINT {
            return None;
        }
        const FIRST_NON_FIXED: f64 = 1e60;
        if value >= FIRST_NON_FIXED || value <= -FIRST_NON_FIXED {
            return None;
        }

        // 60 digits before the point, 60 after, one rounding carry.
        let mut buffer = [0u8; 128];
        let (sign, length, decimal_point) =
            double_to_ascii(value, DtoaMode::Fixed, requested_digits, &mut buffer);

        let mut result = String::new();
        if sign && (value != 0.0 || !self.unique_zero) {
            result.push('-');
        }
        self.push_decimal(&buffer[..length], decimal_point, requested_digits, &mut result);
        Some(result)
    }

    /// Exponential notation with `requested_digits` digits after the
    /// point, or the shortest round-tripping digit sequence when `None`.
    ///
    /// Returns `None` when more than 120 digits are requested, or for a
    /// special value without a configured symbol.
    pub fn to_exponential(&self, value: f64, requested_digits: Option<usize>) -> Option<String> {
        if Double::new(value).is_special() {
            return self.special_value(value);
        }

        // One digit before the point, the requested count after it, one
        // rounding carry.
        let mut buffer = [0u8; Self::MAX_EXPONENTIAL_DIGITS + 2];
        let (sign, mut length, decimal_point) = match requested_digits {
            None => double_to_ascii(value, DtoaMode::Shortest, 0, &mut buffer),
            Some(digits) => {
                if digits > Self::MAX_EXPONENTIAL_DIGITS {
                    return None;
                }
                let (sign, length, decimal_point) =
                    double_to_ascii(value, DtoaMode::Precision, digits + 1, &mut buffer);
                debug_assert!(length <= digits + 1);
                (sign, length, decimal_point)
            }
        };
        if let Some(digits) = requested_digits {
            for slot in &mut buffer[length..digits + 1] {
                *slot = b'0';
            }
            length = digits + 1;
        }

        let mut result = String::new();
        if sign && (value != 0.0 || !self.unique_zero) {
            result.push('-');
        }
        self.push_exponential(&buffer[..length], decimal_point - 1, &mut result);
        Some(result)
    }

    /// `precision` significant digits, in positional notation when the
    /// padding stays within the configured limits and exponential
    /// notation otherwise.
    ///
    /// Returns `None` when `precision` is outside `1..=120`, or for a
    /// special value without a configured symbol.
    pub fn to_precision(&self, value: f64, precision: usize) -> Option<String> {
        if Double::new(value).is_special() {
            return self.special_value(value);
        }
        if !(Self::MIN_PRECISION_DIGITS..=Self::MAX_PRECISION_DIGITS).contains(&precision) {
            return None;
        }

        // The precision digits and a rounding carry.
        let mut buffer = [0u8; Self::MAX_PRECISION_DIGITS + 1];
        let (sign, length, decimal_point) =
            double_to_ascii(value, DtoaMode::Precision, precision, &mut buffer);
        debug_assert!(length <= precision);

        let mut result = String::new();
        if sign && (value != 0.0 || !self.unique_zero) {
            result.push('-');
        }
        let exponent = decimal_point - 1;
        let extra_zero = i32::from(self.emit_trailing_zero_after_point);
        let as_exponential = (-decimal_point + 1
            > self.max_leading_padding_zeroes_in_precision_mode)
            || (decimal_point - precision as i32 + extra_zero
                > self.max_trailing_padding_zeroes_in_precision_mode);
        if as_exponential {
            // Fill up to precision digits.
            for slot in &mut buffer[length..precision] {
                *slot = b'0';
            }
            self.push_exponential(&buffer[..precision], exponent, &mut result);
        } else {
            let digits_after_point = (precision as i32 - decimal_point).max(0) as usize;
            self.push_decimal(&buffer[..length], decimal_point, digits_after_point, &mut result);
        }
        Some(result)
    }

    fn special_value(&self, value: f64) -> Option<String> {
        let double = Double::new(value);
        if double.is_infinite() {
            let symbol = self.infinity_symbol?;
            let mut result = String::new();
            if value < 0.0 {
                result.push('-');
            }
            result.push_str(symbol);
            return Some(result);
        }
        debug_assert!(double.is_nan());
        self.nan_symbol.map(str::to_owned)
    }

    // Positional notation: digits padded with zeros around the point as
    // needed, plus digits_after_point digits after it.
    fn push_decimal(
        &self,
        digits: &[u8],
        decimal_point: i32,
        digits_after_point: usize,
        result: &mut String,
    ) {
        let length = digits.len() as i32;
        let digits = std::str::from_utf8(digits).expect("generated digits are ASCII");
        if decimal_point <= 0 {
            // "0.00000digits"
            result.push('0');
            if digits_after_point > 0 {
                result.push('.');
                push_padding(result, -decimal_point);
                result.push_str(digits);
                let remaining = digits_after_point as i32 - (-decimal_point) - length;
                push_padding(result, remaining);
            }
        } else if decimal_point >= length {
            // "digits00000.000"
            result.push_str(digits);
            push_padding(result, decimal_point - length);
            if digits_after_point > 0 {
                result.push('.');
                push_padding(result, digits_after_point as i32);
            }
        } else {
            // "dig.its000"
            let point = decimal_point as usize;
            result.push_str(&digits[..point]);
            result.push('.');
            result.push_str(&digits[point..]);
            let remaining = digits_after_point as i32 - (length - decimal_point);
            push_padding(result, remaining);
        }
        if digits_after_point == 0 {
            if self.emit_trailing_decimal_point {
                result.push('.');
                if self.emit_trailing_zero_after_point {
                    result.push('0');
                }
            }
        }
    }

    // "d.igitse+x" notation.
    fn push_exponential(&self, digits: &[u8], exponent: i32, result: &mut String) {
        debug_assert!(!digits.is_empty());
        let digits = std::str::from_utf8(digits).expect("generated digits are ASCII");
        result.push_str(&digits[..1]);
        if digits.len() != 1 {
            result.push('.');
            result.push_str(&digits[1..]);
        }
        result.push(self.exponent_character);
        if exponent < 0 {
            result.push('-');
        } else if self.emit_positive_exponent_sign {
            result.push('+');
        }
        let mut itoa_buffer = itoa::Buffer::new();
        result.push_str(itoa_buffer.format(exponent.unsigned_abs()));
    }
}

fn push_padding(result: &mut String, count: i32) {
    for _ in 0..count.max(0) {
        result.push('0');
    }
}

/// Parser from decimal strings to doubles.
///
/// Recognizes an optional sign, decimal digits with an optional fraction,
/// an optional exponent, and the configured infinity and NaN symbols.
#[derive(Clone, Debug)]
pub struct StringToDoubleConverter {
    /// Stop at the first unparseable character instead of rejecting the
    /// whole input.
    pub allow_trailing_junk: bool,
    /// Skip whitespace before the number.
    pub allow_leading_spaces: bool,
    /// Skip whitespace after the number.
    pub allow_trailing_spaces: bool,
    /// Skip whitespace between the sign and the digits.
    pub allow_spaces_after_sign: bool,
    /// Result for empty (or all-spaces, when allowed) input.
    pub empty_string_value: f64,
    /// Result for unparseable input.
    pub junk_string_value: f64,
    /// Spelling of infinities, or `None` to not recognize any.
    pub infinity_symbol: Option<&'static str>,
    /// Spelling of NaNs, or `None` to not recognize any.
    pub nan_symbol: Option<&'static str>,
}

// Digits past this count can only matter through being non-zero; the
// parser replaces them with a single marker digit.
const MAX_SIGNIFICANT_DIGITS: usize = 772;

impl StringToDoubleConverter {
    /// Parse a double out of `input`.
    ///
    /// Returns the value and the number of bytes consumed. Unparseable
    /// input yields `(junk_string_value, 0)`.
    pub fn string_to_double(&self, input: &[u8]) -> (f64, usize) {
        let junk = (self.junk_string_value, 0);
        let len = input.len();
        let mut current = 0;

        if self.allow_leading_spaces || self.allow_trailing_spaces {
            while current < len && utils::is_whitespace(input[current]) {
                current += 1;
            }
            if current == len {
                return (self.empty_string_value, current);
            }
            if !self.allow_leading_spaces && current != 0 {
                return junk;
            }
        }
        if input.is_empty() {
            return (self.empty_string_value, 0);
        }

        let mut sign = false;
        if input[current] == b'+' || input[current] == b'-' {
            sign = input[current] == b'-';
            current += 1;
            let mut next_non_space = current;
            while next_non_space < len && utils::is_whitespace(input[next_non_space]) {
                next_non_space += 1;
            }
            if next_non_space == len {
                return junk;
            }
            if !self.allow_spaces_after_sign && current != next_non_space {
                return junk;
            }
            current = next_non_space;
        }

        if let Some(symbol) = self.infinity_symbol {
            if input[current..].starts_with(symbol.as_bytes()) {
                current += symbol.len();
                let Some(processed) = self.check_trailing(input, current) else {
                    return junk;
                };
                let value = if sign { -Double::infinity() } else { Double::infinity() };
                return (value, processed);
            }
        }
        if let Some(symbol) = self.nan_symbol {
            if input[current..].starts_with(symbol.as_bytes()) {
                current += symbol.len();
                let Some(processed) = self.check_trailing(input, current) else {
                    return junk;
                };
                let value = if sign { -Double::nan() } else { Double::nan() };
                return (value, processed);
            }
        }

        // One marker digit and a safety slot beyond the cut.
        let mut digits = [0u8; MAX_SIGNIFICANT_DIGITS + 10];
        let mut digits_pos = 0;
        let mut significant_digits = 0usize;
        let mut insignificant_digits = 0i32;
        let mut nonzero_digit_dropped = false;
        let mut exponent: i32 = 0;

        let mut leading_zero = false;
        if current < len && input[current] == b'0' {
            current += 1;
            leading_zero = true;
            while current < len && input[current] == b'0' {
                current += 1;
            }
        }

        // Integer part.
        while current < len && utils::is_decimal_digit(input[current]) {
            if significant_digits < MAX_SIGNIFICANT_DIGITS {
                digits[digits_pos] = input[current];
                digits_pos += 1;
                significant_digits += 1;
            } else {
                // The digit still shifts the decimal point.
                insignificant_digits += 1;
                nonzero_digit_dropped = nonzero_digit_dropped || input[current] != b'0';
            }
            current += 1;
        }

        // Fraction part.
        if current < len && input[current] == b'.' {
            current += 1;
            if significant_digits == 0 {
                // Significant digits start after leading zeros; move each
                // skipped zero into the exponent.
                while current < len && input[current] == b'0' {
                    current += 1;
                    exponent -= 1;
                }
            }
            while current < len && utils::is_decimal_digit(input[current]) {
                if significant_digits < MAX_SIGNIFICANT_DIGITS {
                    digits[digits_pos] = input[current];
                    digits_pos += 1;
                    significant_digits += 1;
                    exponent -= 1;
                } else {
                    nonzero_digit_dropped = nonzero_digit_dropped || input[current] != b'0';
                }
                current += 1;
            }
        }

        // Some digit must have been seen by now.
        if !leading_zero && exponent == 0 && significant_digits == 0 {
            return junk;
        }

        // Exponent part. On malformed exponents roll back to before the
        // 'e' so it counts as trailing junk.
        if current < len && (input[current] == b'e' || input[current] == b'E') {
            let junk_begin = current;
            current += 1;
            let mut exponent_sign = 1i32;
            if current < len && (input[current] == b'+' || input[current] == b'-') {
                exponent_sign = if input[current] == b'-' { -1 } else { 1 };
                current += 1;
            }
            if current == len || !utils::is_decimal_digit(input[current]) {
                if self.allow_trailing_junk {
                    current = junk_begin;
                } else {
                    return junk;
                }
            } else {
                // Saturate instead of overflowing; the final exponent
                // addition below stays far from i32's limits.
                const MAX_EXPONENT: i32 = i32::MAX / 2;
                let mut num: i32 = 0;
                while current < len && utils::is_decimal_digit(input[current]) {
                    let digit = (input[current] - b'0') as i32;
                    if num >= MAX_EXPONENT / 10
                        && !(num == MAX_EXPONENT / 10 && digit <= MAX_EXPONENT % 10)
                    {
                        num = MAX_EXPONENT;
                    } else {
                        num = num * 10 + digit;
                    }
                    current += 1;
                }
                exponent += exponent_sign * num;
            }
        }

        let Some(processed) = self.check_trailing(input, current) else {
            return junk;
        };

        exponent += insignificant_digits;
        if nonzero_digit_dropped {
            // The dropped tail cannot change the magnitude but its
            // non-zeroness can decide a halfway case.
            digits[digits_pos] = b'1';
            digits_pos += 1;
            exponent -= 1;
        }
        let converted = strtod(&digits[..digits_pos], exponent);
        (if sign { -converted } else { converted }, processed)
    }

    // Validates what follows a complete number, returning the processed
    // byte count or None for junk.
    fn check_trailing(&self, input: &[u8], mut current: usize) -> Option<usize> {
        let len = input.len();
        if !(self.allow_trailing_spaces || self.allow_trailing_junk) && current != len {
            return None;
        }
        if self.allow_trailing_spaces {
            while current < len && utils::is_whitespace(input[current]) {
                current += 1;
            }
        }
        if !self.allow_trailing_junk && current != len {
            return None;
        }
        Some(current)
    }
}

/// Errors from [`parse_double`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// The input was empty.
    Empty,
    /// The input was not a decimal number.
    Invalid,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseError::Empty => f.write_str("cannot parse a number from an empty string"),
            ParseError::Invalid => f.write_str("invalid decimal number"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse a complete string as a double, strictly.
///
/// The whole input must be a number: no surrounding whitespace, no
/// trailing junk. `Infinity` and `NaN` (optionally signed) are accepted.
pub fn parse_double(input: &str) -> Result<f64, ParseError> {
    if input.is_empty() {
        return Err(ParseError::Empty);
    }
    let converter = StringToDoubleConverter {
        allow_trailing_junk: false,
        allow_leading_spaces: false,
        allow_trailing_spaces: false,
        allow_spaces_after_sign: false,
        empty_string_value: 0.0,
        junk_string_value: f64::NAN,
        infinity_symbol: Some("Infinity"),
        nan_symbol: Some("NaN"),
    };
    let (value, processed) = converter.string_to_double(input.as_bytes());
    if processed == input.len() {
        Ok(value)
    } else {
        Err(ParseError::Invalid)
    }
}

// TESTS
// -----

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_to_ascii_test() {
        let mut buffer = [0u8; 128];

        let (sign, length, point) = double_to_ascii(0.0, DtoaMode::Shortest, 0, &mut buffer);
        assert!(!sign);
        assert_eq!((&buffer[..length], point), (&b"0"[..], 1));

        let (sign, length, point) = double_to_ascii(-1.5, DtoaMode::Shortest, 0, &mut buffer);
        assert!(sign);
        assert_eq!((&buffer[..length], point), (&b"15"[..], 1));

        let (_, length, point) = double_to_ascii(0.1, DtoaMode::Fixed, 3, &mut buffer);
        assert_eq!((&buffer[..length], point), (&b"1"[..], 0));

        let (_, length, point) = double_to_ascii(123.456, DtoaMode::Precision, 4, &mut buffer);
        assert_eq!((&buffer[..length], point), (&b"1235"[..], 3));

        // Precision with zero digits yields nothing at all.
        let (_, length, _) = double_to_ascii(123.0, DtoaMode::Precision, 0, &mut buffer);
        assert_eq!(length, 0);

        // A value the fixed fast path rejects still converts through the
        // bignum fallback, producing the exact decimal expansion of the
        // nearest double.
        let (_, length, point) = double_to_ascii(1e30, DtoaMode::Fixed, 2, &mut buffer);
        assert_eq!(&buffer[..length], &b"1000000000000000019884624838656"[..]);
        assert_eq!(point, 31);
    }

    #[test]
    fn to_shortest_test() {
        let converter = DoubleToStringConverter::ecmascript();
        let shortest = |v| converter.to_shortest(v).unwrap();
        assert_eq!(shortest(0.1), "0.1");
        assert_eq!(shortest(0.0), "0");
        assert_eq!(shortest(-0.0), "0");
        assert_eq!(shortest(1234567.0), "1234567");
        assert_eq!(shortest(-12.345), "-12.345");
        assert_eq!(shortest(1e20), "100000000000000000000");
        assert_eq!(shortest(1e21), "1e+21");
        assert_eq!(shortest(0.000001), "0.000001");
        assert_eq!(shortest(0.0000001), "1e-7");
        assert_eq!(shortest(5e-324), "5e-324");
        assert_eq!(shortest(f64::MAX), "1.7976931348623157e+308");
        assert_eq!(shortest(f64::INFINITY), "Infinity");
        assert_eq!(shortest(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(shortest(f64::NAN), "NaN");
    }

    // Every formatter honors unique_zero, not just to_shortest.
    #[test]
    fn negative_zero_is_kept_without_unique_zero() {
        let mut converter = DoubleToStringConverter::ecmascript();
        converter.unique_zero = false;
        assert_eq!(converter.to_shortest(-0.0).unwrap(), "-0");
        assert_eq!(converter.to_fixed(-0.0, 2).unwrap(), "-0.00");
        assert_eq!(converter.to_exponential(-0.0, Some(2)).unwrap(), "-0.00e+0");
        assert_eq!(converter.to_precision(-0.0, 3).unwrap(), "-0.00");

        converter.unique_zero = true;
        assert_eq!(converter.to_fixed(-0.0, 2).unwrap(), "0.00");
        assert_eq!(converter.to_exponential(-0.0, Some(2)).unwrap(), "0.00e+0");
        assert_eq!(converter.to_precision(-0.0, 3).unwrap(), "0.00");
    }

    #[test]
    fn to_fixed_test() {
        let converter = DoubleToStringConverter::ecmascript();
        let fixed = |v, digits| converter.to_fixed(v, digits).unwrap();
        assert_eq!(fixed(3.12, 1), "3.1");
        assert_eq!(fixed(3.1415, 3), "3.142");
        assert_eq!(fixed(1234.56789, 4), "1234.5679");
        assert_eq!(fixed(0.1, 4), "0.1000");
        assert_eq!(fixed(0.102, 2), "0.10");
        assert_eq!(fixed(0.0, 2), "0.00");
        assert_eq!(fixed(123.0, 0), "123");
        assert_eq!(fixed(-12.5, 0), "-13");
        assert_eq!(fixed(0.000001, 2), "0.00");

        assert_eq!(converter.to_fixed(1e60, 2), None);
        assert_eq!(converter.to_fixed(1.0, 100), None);
    }

    #[test]
    fn to_exponential_test() {
        let converter = DoubleToStringConverter::ecmascript();
        let exp = |v, digits| converter.to_exponential(v, digits).unwrap();
        assert_eq!(exp(3.12, Some(1)), "3.1e+0");
        assert_eq!(exp(5.0, Some(3)), "5.000e+0");
        assert_eq!(exp(0.001, Some(2)), "1.00e-3");
        assert_eq!(exp(3.1415, None), "3.1415e+0");
        assert_eq!(exp(1e21, Some(2)), "1.00e+21");
        assert_eq!(exp(0.0, Some(2)), "0.00e+0");
        assert_eq!(exp(-123456.0, Some(3)), "-1.235e+5");

        assert_eq!(converter.to_exponential(1.0, Some(200)), None);
    }

    #[test]
    fn to_precision_test() {
        let converter = DoubleToStringConverter::ecmascript();
        let precision = |v, digits| converter.to_precision(v, digits).unwrap();
        assert_eq!(precision(3.1415, 3), "3.14");
        assert_eq!(precision(0.0000012345, 2), "0.0000012");
        assert_eq!(precision(0.00000012345, 2), "1.2e-7");
        // A padding zero before the point forces exponential notation.
        assert_eq!(precision(230.0, 2), "2.3e+2");
        assert_eq!(precision(230.0, 3), "230");
        assert_eq!(precision(123450.0, 6), "123450");
        assert_eq!(precision(123450.0, 4), "1.235e+5");
        assert_eq!(precision(0.0, 3), "0.00");

        assert_eq!(converter.to_precision(1.0, 0), None);
        assert_eq!(converter.to_precision(1.0, 121), None);
    }

    #[test]
    fn string_to_double_test() {
        let strict = StringToDoubleConverter {
            allow_trailing_junk: false,
            allow_leading_spaces: false,
            allow_trailing_spaces: false,
            allow_spaces_after_sign: false,
            empty_string_value: 0.0,
            junk_string_value: f64::NAN,
            infinity_symbol: None,
            nan_symbol: None,
        };
        assert_eq!(strict.string_to_double(b"12.5"), (12.5, 4));
        assert_eq!(strict.string_to_double(b"-0.25"), (-0.25, 5));
        assert_eq!(strict.string_to_double(b"1e3"), (1000.0, 3));
        assert_eq!(strict.string_to_double(b"1E+3"), (1000.0, 4));
        assert_eq!(strict.string_to_double(b".5"), (0.5, 2));
        assert_eq!(strict.string_to_double(b"0"), (0.0, 1));
        assert_eq!(strict.string_to_double(b"000"), (0.0, 3));
        assert_eq!(strict.string_to_double(b"0."), (0.0, 2));

        let (junk, processed) = strict.string_to_double(b"12x");
        assert!(junk.is_nan());
        assert_eq!(processed, 0);
        let (junk, _) = strict.string_to_double(b" 12");
        assert!(junk.is_nan());
        let (junk, _) = strict.string_to_double(b"1e");
        assert!(junk.is_nan());
        let (junk, _) = strict.string_to_double(b".");
        assert!(junk.is_nan());

        let lenient = StringToDoubleConverter {
            allow_trailing_junk: true,
            allow_leading_spaces: true,
            allow_trailing_spaces: true,
            allow_spaces_after_sign: true,
            empty_string_value: 0.0,
            junk_string_value: f64::NAN,
            infinity_symbol: Some("Infinity"),
            nan_symbol: Some("NaN"),
        };
        assert_eq!(lenient.string_to_double(b"123foo"), (123.0, 3));
        assert_eq!(lenient.string_to_double(b"  12  "), (12.0, 6));
        assert_eq!(lenient.string_to_double(b"- 5"), (-5.0, 3));
        // A dangling exponent marker is trailing junk, not an error.
        assert_eq!(lenient.string_to_double(b"3e"), (3.0, 1));
        assert_eq!(lenient.string_to_double(b"3e+x"), (3.0, 1));
        assert_eq!(lenient.string_to_double(b"Infinity!"), (f64::INFINITY, 8));
        assert_eq!(lenient.string_to_double(b"-Infinity"), (f64::NEG_INFINITY, 9));
        assert_eq!(lenient.string_to_double(b""), (0.0, 0));
        assert_eq!(lenient.string_to_double(b"   "), (0.0, 3));
    }

    #[test]
    fn huge_digit_counts() {
        let strict = StringToDoubleConverter {
            allow_trailing_junk: false,
            allow_leading_spaces: false,
            allow_trailing_spaces: false,
            allow_spaces_after_sign: false,
            empty_string_value: 0.0,
            junk_string_value: f64::NAN,
            infinity_symbol: None,
            nan_symbol: None,
        };
        // More digits than the parser keeps: the dropped non-zero tail
        // still participates in rounding.
        let mut input = Vec::new();
        input.extend_from_slice(&[b'9'; 1000]);
        let (value, processed) = strict.string_to_double(&input);
        assert_eq!(value, f64::INFINITY);
        assert_eq!(processed, 1000);

        let mut input = Vec::new();
        input.extend_from_slice(b"0.");
        input.extend_from_slice(&[b'9'; 1000]);
        let (value, processed) = strict.string_to_double(&input);
        assert_eq!(value, 1.0);
        assert_eq!(processed, 1002);
    }

    #[test]
    fn parse_double_test() {
        assert_eq!(parse_double("0.1"), Ok(0.1));
        assert_eq!(parse_double("-2.5e-3"), Ok(-0.0025));
        assert_eq!(parse_double("1e22"), Ok(1e22));
        assert_eq!(parse_double("Infinity"), Ok(f64::INFINITY));
        assert!(parse_double("NaN").unwrap().is_nan());

        assert_eq!(parse_double(""), Err(ParseError::Empty));
        assert_eq!(parse_double(" 1"), Err(ParseError::Invalid));
        assert_eq!(parse_double("1 "), Err(ParseError::Invalid));
        assert_eq!(parse_double("1x"), Err(ParseError::Invalid));
        assert_eq!(parse_double("e5"), Err(ParseError::Invalid));

        // Round-trip against the shortest formatter.
        let converter = DoubleToStringConverter::ecmascript();
        for v in [0.1, 1.5, 5e-324, f64::MAX, 4294967272.0, 3.141592653589793] {
            let formatted = converter.to_shortest(v).unwrap();
            assert_eq!(parse_double(&formatted), Ok(v));
        }
    }
}
