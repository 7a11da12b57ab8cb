//! Arbitrary-precision integer arithmetic for exact digit generation.
//!
//! The limb buffers are little-endian: for `[0, 1, 2]`, `2` is the most
//! significant limb and `0` the least significant one. Values are kept
//! canonical, with no zero limbs above the most significant one; zero is
//! the empty buffer.

use arrayvec::ArrayVec;
use std::cmp::Ordering;

use crate::utils::to_digit;

// Type for a single limb of the big integer, with a wide type for
// intermediate products.
pub(crate) type Limb = u64;
type Wide = u128;

const LIMB_BITS: u32 = 64;

// Capacity in limbs. The largest values built here are 780-digit parsed
// significands scaled by powers of ten up to 10^324 and small power-of-two
// shifts, which stays below 4096 bits.
const MAX_LIMBS: usize = 64;

type LimbVec = ArrayVec<Limb, MAX_LIMBS>;

// Largest powers of 5 and 10 that fit in a limb.
const MAX_POW5_STEP: u32 = 27;
const MAX_POW10_STEP: u32 = 19;

/// Precalculated small powers of 5; `5^27` is the largest fitting a limb.
#[rustfmt::skip]
const POW5_64: [u64; 28] = [
    1,
    5,
    25,
    125,
    625,
    3125,
    15625,
    78125,
    390625,
    1953125,
    9765625,
    48828125,
    244140625,
    1220703125,
    6103515625,
    30517578125,
    152587890625,
    762939453125,
    3814697265625,
    19073486328125,
    95367431640625,
    476837158203125,
    2384185791015625,
    11920928955078125,
    59604644775390625,
    298023223876953125,
    1490116119384765625,
    7450580596923828125,
];

/// Precalculated small powers of 10; `10^19` is the largest fitting a limb.
#[rustfmt::skip]
const POW10_64: [u64; 20] = [
    1,
    10,
    100,
    1000,
    10000,
    100000,
    1000000,
    10000000,
    100000000,
    1000000000,
    10000000000,
    100000000000,
    1000000000000,
    10000000000000,
    100000000000000,
    1000000000000000,
    10000000000000000,
    100000000000000000,
    1000000000000000000,
    10000000000000000000,
];

/// Storage for a big integer.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Bignum {
    data: LimbVec,
}

impl Bignum {
    /// The zero bignum.
    #[inline]
    pub fn new() -> Bignum {
        Bignum { data: LimbVec::new() }
    }

    /// Build the bignum from a 64-bit value.
    #[inline]
    pub fn from_u64(value: u64) -> Bignum {
        let mut bignum = Bignum::new();
        bignum.assign_u64(value);
        bignum
    }

    /// Build the bignum from a buffer of ASCII decimal digits.
    pub fn from_decimal_digits(digits: &[u8]) -> Bignum {
        let mut result = Bignum::new();
        // Process the digits in limb-sized chunks.
        for chunk in digits.chunks(MAX_POW10_STEP as usize) {
            let mut value: Limb = 0;
            for &c in chunk {
                value = value * 10 + to_digit(c).unwrap() as Limb;
            }
            result.imul_small(POW10_64[chunk.len()]);
            result.iadd_small(value);
        }
        result
    }

    /// Build `10^exponent`.
    pub fn from_power_of_ten(exponent: u32) -> Bignum {
        let mut bignum = Bignum::from_u64(1);
        bignum.imul_pow10(exponent);
        bignum
    }

    /// Replace the value with a 64-bit one.
    #[inline]
    pub fn assign_u64(&mut self, value: u64) {
        self.data.clear();
        if value != 0 {
            self.data.push(value);
        }
    }

    /// Check if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of bits needed to represent the value; 0 for zero.
    pub fn bit_length(&self) -> u32 {
        match self.data.last() {
            None => 0,
            Some(&top) => self.data.len() as u32 * LIMB_BITS - top.leading_zeros(),
        }
    }

    // SMALL OPERATIONS

    /// AddAssign a single limb.
    pub fn iadd_small(&mut self, y: Limb) {
        let mut carry = y;
        for limb in self.data.iter_mut() {
            if carry == 0 {
                return;
            }
            let (sum, overflow) = limb.overflowing_add(carry);
            *limb = sum;
            carry = overflow as Limb;
        }
        if carry != 0 {
            self.data.push(carry);
        }
    }

    /// MulAssign by a single limb.
    pub fn imul_small(&mut self, y: Limb) {
        if y == 0 {
            self.data.clear();
            return;
        }
        let mut carry: Limb = 0;
        for limb in self.data.iter_mut() {
            let wide = (*limb as Wide) * (y as Wide) + (carry as Wide);
            *limb = wide as Limb;
            carry = (wide >> LIMB_BITS) as Limb;
        }
        if carry != 0 {
            self.data.push(carry);
        }
    }

    // BIG OPERATIONS

    /// AddAssign another bignum.
    pub fn iadd(&mut self, other: &Bignum) {
        while self.data.len() < other.data.len() {
            self.data.push(0);
        }
        let mut carry: Limb = 0;
        for (i, limb) in self.data.iter_mut().enumerate() {
            let y = other.data.get(i).copied().unwrap_or(0);
            if y == 0 && carry == 0 {
                continue;
            }
            let (sum, overflow1) = limb.overflowing_add(y);
            let (sum, overflow2) = sum.overflowing_add(carry);
            *limb = sum;
            carry = (overflow1 as Limb) + (overflow2 as Limb);
        }
        if carry != 0 {
            self.data.push(carry);
        }
    }

    /// SubAssign another bignum. `self` must not be smaller than `other`.
    pub fn isub(&mut self, other: &Bignum) {
        debug_assert!(self.compare(other) != Ordering::Less);
        let mut borrow: Limb = 0;
        for (i, limb) in self.data.iter_mut().enumerate() {
            let y = other.data.get(i).copied().unwrap_or(0);
            let (diff, overflow1) = limb.overflowing_sub(y);
            let (diff, overflow2) = diff.overflowing_sub(borrow);
            *limb = diff;
            borrow = (overflow1 as Limb) + (overflow2 as Limb);
        }
        debug_assert!(borrow == 0);
        self.normalize();
    }

    // SCALING

    /// Shift left by `shift` bits, as if by `*= 2^shift`.
    pub fn imul_pow2(&mut self, shift: u32) {
        if self.is_zero() || shift == 0 {
            return;
        }
        let limbs = (shift / LIMB_BITS) as usize;
        let bits = shift % LIMB_BITS;
        if bits != 0 {
            let mut carry: Limb = 0;
            for limb in self.data.iter_mut() {
                let wide = (*limb as Wide) << bits;
                *limb = (wide as Limb) | carry;
                carry = (wide >> LIMB_BITS) as Limb;
            }
            if carry != 0 {
                self.data.push(carry);
            }
        }
        for _ in 0..limbs {
            self.data.insert(0, 0);
        }
    }

    /// MulAssign by `5^exponent`, stepping through the small-powers table.
    pub fn imul_pow5(&mut self, mut exponent: u32) {
        while exponent >= MAX_POW5_STEP {
            self.imul_small(POW5_64[MAX_POW5_STEP as usize]);
            exponent -= MAX_POW5_STEP;
        }
        if exponent != 0 {
            self.imul_small(POW5_64[exponent as usize]);
        }
    }

    /// MulAssign by `10^exponent`.
    #[inline]
    pub fn imul_pow10(&mut self, exponent: u32) {
        self.imul_pow5(exponent);
        self.imul_pow2(exponent);
    }

    /// Multiply by 10.
    #[inline]
    pub fn times10(&mut self) {
        self.imul_small(10);
    }

    // COMPARISONS

    /// Compare against another bignum.
    pub fn compare(&self, other: &Bignum) -> Ordering {
        if self.data.len() != other.data.len() {
            return self.data.len().cmp(&other.data.len());
        }
        for (x, y) in self.data.iter().rev().zip(other.data.iter().rev()) {
            match x.cmp(y) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        Ordering::Equal
    }

    /// Compare `a + b` against `c`.
    pub fn plus_compare(a: &Bignum, b: &Bignum, c: &Bignum) -> Ordering {
        let mut sum = a.clone();
        sum.iadd(b);
        sum.compare(c)
    }

    // DIVISION

    /// Divide by `other`, keeping the remainder in `self` and returning the
    /// quotient.
    ///
    /// The digit generators keep `self < 16 * other`, so the quotient fits
    /// a single decimal digit step and a short subtraction loop wins over
    /// general long division.
    pub fn div_mod_small(&mut self, other: &Bignum) -> u32 {
        debug_assert!(!other.is_zero());
        let mut quotient = 0;
        while self.compare(other) != Ordering::Less {
            self.isub(other);
            quotient += 1;
            debug_assert!(quotient <= 16);
        }
        quotient
    }

    // NORMALIZATION

    /// Drop zero limbs above the most significant one.
    #[inline]
    fn normalize(&mut self) {
        while self.data.last() == Some(&0) {
            self.data.pop();
        }
    }
}

// TESTS
// -----

#[cfg(test)]
mod tests {
    use super::*;

    fn from_digits(s: &str) -> Bignum {
        Bignum::from_decimal_digits(s.as_bytes())
    }

    #[test]
    fn assign_test() {
        assert!(Bignum::new().is_zero());
        assert_eq!(Bignum::from_u64(42).data.as_slice(), &[42]);
        assert_eq!(from_digits("0"), Bignum::new());
        assert_eq!(from_digits("18446744073709551615").data.as_slice(), &[u64::MAX]);
        assert_eq!(from_digits("18446744073709551616").data.as_slice(), &[0, 1]);
        // 2^128 - 1
        assert_eq!(
            from_digits("340282366920938463463374607431768211455").data.as_slice(),
            &[u64::MAX, u64::MAX]
        );
    }

    #[test]
    fn small_ops_test() {
        let mut big = Bignum::from_u64(u64::MAX);
        big.iadd_small(1);
        assert_eq!(big.data.as_slice(), &[0, 1]);

        let mut big = Bignum::from_u64(u64::MAX);
        big.imul_small(2);
        assert_eq!(big.data.as_slice(), &[u64::MAX - 1, 1]);

        let mut big = Bignum::from_u64(10);
        big.imul_small(0);
        assert!(big.is_zero());
    }

    #[test]
    fn big_ops_test() {
        let mut a = from_digits("340282366920938463463374607431768211455");
        a.iadd(&Bignum::from_u64(1));
        assert_eq!(a.data.as_slice(), &[0, 0, 1]);

        a.isub(&Bignum::from_u64(1));
        assert_eq!(a, from_digits("340282366920938463463374607431768211455"));

        let mut a = Bignum::from_u64(1000);
        a.isub(&Bignum::from_u64(1000));
        assert!(a.is_zero());
    }

    #[test]
    fn pow_test() {
        let mut big = Bignum::from_u64(1);
        big.imul_pow2(128);
        assert_eq!(big.data.as_slice(), &[0, 0, 1]);

        let mut big = Bignum::from_u64(3);
        big.imul_pow2(1);
        assert_eq!(big.data.as_slice(), &[6]);

        let mut big = Bignum::from_u64(1);
        big.imul_pow5(30);
        assert_eq!(big, from_digits("931322574615478515625"));

        assert_eq!(Bignum::from_power_of_ten(20), from_digits("100000000000000000000"));
        assert_eq!(Bignum::from_power_of_ten(0), Bignum::from_u64(1));
    }

    #[test]
    fn compare_test() {
        let small = Bignum::from_u64(10);
        let big = from_digits("18446744073709551616");
        assert_eq!(small.compare(&big), Ordering::Less);
        assert_eq!(big.compare(&small), Ordering::Greater);
        assert_eq!(big.compare(&big), Ordering::Equal);

        // 5 + 5 vs 10, 5 + 6 vs 10
        let five = Bignum::from_u64(5);
        let six = Bignum::from_u64(6);
        let ten = Bignum::from_u64(10);
        assert_eq!(Bignum::plus_compare(&five, &five, &ten), Ordering::Equal);
        assert_eq!(Bignum::plus_compare(&five, &six, &ten), Ordering::Greater);
        assert_eq!(Bignum::plus_compare(&five, &Bignum::new(), &ten), Ordering::Less);
    }

    #[test]
    fn div_mod_small_test() {
        let mut num = Bignum::from_u64(95);
        let den = Bignum::from_u64(10);
        assert_eq!(num.div_mod_small(&den), 9);
        assert_eq!(num, Bignum::from_u64(5));

        // Digit generation for 9223/1000 = 9.223, scaled by 2^64.
        let mut num = Bignum::from_u64(9223);
        num.imul_pow2(64);
        let mut den = Bignum::from_u64(1000);
        den.imul_pow2(64);
        let mut digits = Vec::new();
        for _ in 0..4 {
            digits.push(num.div_mod_small(&den));
            num.times10();
        }
        assert_eq!(digits, vec![9, 2, 2, 3]);
    }

    #[test]
    fn bit_length_test() {
        assert_eq!(Bignum::new().bit_length(), 0);
        assert_eq!(Bignum::from_u64(1).bit_length(), 1);
        assert_eq!(Bignum::from_u64(u64::MAX).bit_length(), 64);
        let mut big = Bignum::from_u64(1);
        big.imul_pow2(100);
        assert_eq!(big.bit_length(), 101);
    }
}
