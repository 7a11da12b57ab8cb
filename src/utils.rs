//! Helpers shared by the digit generators and the parser.

// DIGITS

/// Check whether the byte is an ASCII decimal digit.
#[inline]
pub fn is_decimal_digit(c: u8) -> bool {
    c.is_ascii_digit()
}

// Convert u8 to digit.
#[inline]
pub(crate) fn to_digit(c: u8) -> Option<u32> {
    (c as char).to_digit(10)
}

// Add digit to an accumulated value, checking for overflow.
#[inline]
pub(crate) fn add_digit(value: u64, digit: u32) -> Option<u64> {
    value.checked_mul(10)?.checked_add(digit as u64)
}

/// Whitespace recognized around numbers. The ASCII set plus vertical tab,
/// which `u8::is_ascii_whitespace` leaves out.
#[inline]
pub(crate) fn is_whitespace(c: u8) -> bool {
    c.is_ascii_whitespace() || c == 0x0B
}

// TRIMMING

/// Strip trailing `'0'` bytes from a digit buffer.
#[inline]
pub fn trim_trailing_zeros(digits: &[u8]) -> &[u8] {
    let mut digits = digits;
    while digits.last() == Some(&b'0') {
        digits = &digits[..digits.len() - 1];
    }
    digits
}

/// Strip leading `'0'` bytes from a digit buffer.
#[inline]
pub(crate) fn trim_leading_zeros(digits: &[u8]) -> &[u8] {
    let mut digits = digits;
    while digits.first() == Some(&b'0') {
        digits = &digits[1..];
    }
    digits
}

/// Read up to `max_digits` decimal digits into a u64.
///
/// Returns the value and the number of digits consumed. The caller limits
/// `max_digits` so that no overflow can occur (19 digits always fit).
pub(crate) fn read_u64(digits: &[u8], max_digits: usize) -> (u64, usize) {
    let count = digits.len().min(max_digits);
    let mut value: u64 = 0;
    for &c in &digits[..count] {
        debug_assert!(is_decimal_digit(c));
        value = value * 10 + (c - b'0') as u64;
    }
    (value, count)
}

// TESTS
// -----
