//! Extended-precision floating-point type.

/// A "do-it-yourself" floating-point number: a 64-bit significand and a
/// binary exponent, with no sign and no hidden bit.
///
/// The value is `mant * 2^exp`. Operations leave normalization to the
/// caller so that intermediate results keep maximal precision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiyFp {
    /// Significand of the extended-precision float.
    pub mant: u64,
    /// Binary exponent of the extended-precision float.
    pub exp: i32,
}

impl DiyFp {
    /// Number of significand bits.
    pub const SIGNIFICAND_SIZE: i32 = 64;

    /// Build the float from its significand and binary exponent.
    #[inline]
    pub fn new(mant: u64, exp: i32) -> DiyFp {
        DiyFp { mant, exp }
    }

    /// Subtract, as if by `self - other`.
    ///
    /// The exponents must match and `self.mant` must not be smaller than
    /// the subtrahend's. The result is not normalized.
    #[inline]
    pub fn sub(&self, other: &DiyFp) -> DiyFp {
        debug_assert!(self.exp == other.exp);
        debug_assert!(self.mant >= other.mant);
        DiyFp {
            mant: self.mant - other.mant,
            exp: self.exp,
        }
    }

    /// Multiply two extended-precision floats, as if by `a*b`.
    ///
    /// Simply "emulates" a 128-bit multiplication: splits both operands
    /// into 32-bit halves, multiplies them pairwise, and keeps the rounded
    /// upper 64 bits of the product. The result is not normalized.
    pub fn mul(&self, other: &DiyFp) -> DiyFp {
        const HALF: i32 = 32;
        const LOMASK: u64 = 0x0000_0000_FFFF_FFFF;

        let ah = self.mant >> HALF;
        let al = self.mant & LOMASK;
        let bh = other.mant >> HALF;
        let bl = other.mant & LOMASK;

        let ah_bl = ah * bl;
        let al_bh = al * bh;
        let al_bl = al * bl;
        let ah_bh = ah * bh;

        let mut tmp = (ah_bl & LOMASK) + (al_bh & LOMASK) + (al_bl >> HALF);
        // round up
        tmp += 1 << (HALF - 1);

        DiyFp {
            mant: ah_bh + (ah_bl >> HALF) + (al_bh >> HALF) + (tmp >> HALF),
            exp: self.exp + other.exp + Self::SIGNIFICAND_SIZE,
        }
    }

    /// Multiply in-place, as if by `a*b`.
    #[inline]
    pub fn imul(&mut self, other: &DiyFp) {
        *self = self.mul(other);
    }

    /// Shift the significand until the most significant bit is set.
    ///
    /// The significand must not be zero.
    #[inline]
    pub fn normalize(&mut self) {
        debug_assert!(self.mant != 0);
        let shift = self.mant.leading_zeros() as i32;
        self.mant <<= shift;
        self.exp -= shift;
    }

    /// Return the normalized copy of the float.
    #[inline]
    pub fn normalized(mut self) -> DiyFp {
        self.normalize();
        self
    }
}

// TESTS
// -----

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sub_test() {
        let a = DiyFp::new(3, 0);
        let b = DiyFp::new(1, 0);
        assert_eq!(a.sub(&b), DiyFp::new(2, 0));
    }

    #[test]
    fn mul_test() {
        let a = DiyFp::new(3, 0);
        let b = DiyFp::new(2, 0);
        let product = a.mul(&b);
        // 6 sits entirely in the (discarded) low 64 bits of the product.
        assert_eq!(product.mant, 0);
        assert_eq!(product.exp, 64);

        let a = DiyFp::new(0x8000_0000_0000_0000, 11);
        let b = DiyFp::new(2, 13);
        let product = a.mul(&b);
        assert_eq!(product.mant, 1);
        assert_eq!(product.exp, 11 + 13 + 64);

        // Test rounding: halfway cases round up.
        let a = DiyFp::new(0x8000_0000_0000_0001, 11);
        let b = DiyFp::new(1, 13);
        let product = a.mul(&b);
        assert_eq!(product.mant, 1);
        assert_eq!(product.exp, 11 + 13 + 64);

        // Big numbers.
        let a = DiyFp::new(0xFFFF_FFFF_FFFF_FFFF, 11);
        let b = DiyFp::new(0xFFFF_FFFF_FFFF_FFFF, 13);
        // 128-bit result: 0xFFFFFFFFFFFFFFFE0000000000000001
        let product = a.mul(&b);
        assert_eq!(product.mant, 0xFFFF_FFFF_FFFF_FFFE);
        assert_eq!(product.exp, 11 + 13 + 64);
    }

    #[test]
    fn normalize_test() {
        let mut fp = DiyFp::new(1, 0);
        fp.normalize();
        assert_eq!(fp, DiyFp::new(0x8000_0000_0000_0000, -63));

        let fp = DiyFp::new(0x0010_0000_0000_0000, 10).normalized();
        assert_eq!(fp, DiyFp::new(0x8000_0000_0000_0000, -1));
    }
}
