//! Bit-level access to IEEE-754 doubles.

use crate::diy_fp::DiyFp;

/// A `f64` viewed through its IEEE-754 bit representation.
#[derive(Clone, Copy, Debug)]
pub struct Double(u64);

impl Double {
    /// Bitmask for the sign bit.
    pub const SIGN_MASK: u64 = 0x8000_0000_0000_0000;
    /// Bitmask for the biased exponent.
    pub const EXPONENT_MASK: u64 = 0x7FF0_0000_0000_0000;
    /// Bitmask for the significand (fraction), excluding the hidden bit.
    pub const SIGNIFICAND_MASK: u64 = 0x000F_FFFF_FFFF_FFFF;
    /// The hidden bit: an implicit 1 above the fraction in normal values.
    pub const HIDDEN_BIT: u64 = 0x0010_0000_0000_0000;
    /// Size of the significand as stored, without the hidden bit.
    pub const PHYSICAL_SIGNIFICAND_SIZE: i32 = 52;
    /// Size of the significand including the hidden bit.
    pub const SIGNIFICAND_SIZE: i32 = 53;

    const EXPONENT_BIAS: i32 = 0x3FF + Self::PHYSICAL_SIGNIFICAND_SIZE;
    const DENORMAL_EXPONENT: i32 = -Self::EXPONENT_BIAS + 1;
    const MAX_EXPONENT: i32 = 0x7FF - Self::EXPONENT_BIAS;
    const INFINITY_BITS: u64 = 0x7FF0_0000_0000_0000;

    /// Wrap the double for bit-level inspection.
    #[inline]
    pub fn new(value: f64) -> Double {
        Double(value.to_bits())
    }

    /// Build the double from its raw bit pattern.
    #[inline]
    pub fn from_bits(bits: u64) -> Double {
        Double(bits)
    }

    /// Construct the double from an extended-precision float, rounding to
    /// nearest with ties away handled by truncation of excess bits.
    /// Overflows to infinity, underflows to zero.
    pub fn from_diy_fp(diy_fp: DiyFp) -> Double {
        let mut significand = diy_fp.mant;
        let mut exponent = diy_fp.exp;
        while significand > Self::HIDDEN_BIT + Self::SIGNIFICAND_MASK {
            significand >>= 1;
            exponent += 1;
        }
        if exponent >= Self::MAX_EXPONENT {
            return Double(Self::INFINITY_BITS);
        }
        if exponent < Self::DENORMAL_EXPONENT {
            return Double(0);
        }
        while exponent > Self::DENORMAL_EXPONENT && (significand & Self::HIDDEN_BIT) == 0 {
            significand <<= 1;
            exponent -= 1;
        }
        let biased_exponent =
            if exponent == Self::DENORMAL_EXPONENT && (significand & Self::HIDDEN_BIT) == 0 {
                0
            } else {
                (exponent + Self::EXPONENT_BIAS) as u64
            };
        Double((significand & Self::SIGNIFICAND_MASK) | (biased_exponent << Self::PHYSICAL_SIGNIFICAND_SIZE))
    }

    /// The raw bit pattern.
    #[inline]
    pub fn as_bits(&self) -> u64 {
        self.0
    }

    /// The wrapped value.
    #[inline]
    pub fn value(&self) -> f64 {
        f64::from_bits(self.0)
    }

    /// Positive infinity.
    #[inline]
    pub fn infinity() -> f64 {
        f64::INFINITY
    }

    /// A quiet NaN.
    #[inline]
    pub fn nan() -> f64 {
        f64::NAN
    }

    /// Returns the sign: +1 for positive (and +0.0), -1 for negative.
    #[inline]
    pub fn sign(&self) -> i32 {
        if self.0 & Self::SIGN_MASK == 0 {
            1
        } else {
            -1
        }
    }

    /// Returns true if the double is a denormal.
    #[inline]
    pub fn is_denormal(&self) -> bool {
        self.0 & Self::EXPONENT_MASK == 0
    }

    /// Returns true if the double is NaN or infinite.
    #[inline]
    pub fn is_special(&self) -> bool {
        self.0 & Self::EXPONENT_MASK == Self::EXPONENT_MASK
    }

    /// Returns true if the double is a NaN.
    #[inline]
    pub fn is_nan(&self) -> bool {
        self.is_special() && (self.0 & Self::SIGNIFICAND_MASK) != 0
    }

    /// Returns true if the double is an infinity of either sign.
    #[inline]
    pub fn is_infinite(&self) -> bool {
        self.is_special() && (self.0 & Self::SIGNIFICAND_MASK) == 0
    }

    /// The unbiased binary exponent, such that
    /// `value = significand * 2^exponent`.
    #[inline]
    pub fn exponent(&self) -> i32 {
        if self.is_denormal() {
            return Self::DENORMAL_EXPONENT;
        }
        let biased = ((self.0 & Self::EXPONENT_MASK) >> Self::PHYSICAL_SIGNIFICAND_SIZE) as i32;
        biased - Self::EXPONENT_BIAS
    }

    /// The significand with the hidden bit added for normal values.
    #[inline]
    pub fn significand(&self) -> u64 {
        let significand = self.0 & Self::SIGNIFICAND_MASK;
        if self.is_denormal() {
            significand
        } else {
            significand + Self::HIDDEN_BIT
        }
    }

    /// The double as an unnormalized `DiyFp`.
    ///
    /// The value must be strictly greater than 0 and not special.
    #[inline]
    pub fn as_diy_fp(&self) -> DiyFp {
        debug_assert!(self.sign() > 0);
        debug_assert!(!self.is_special());
        DiyFp::new(self.significand(), self.exponent())
    }

    /// The double as a normalized `DiyFp` with 64 significand bits.
    ///
    /// The value must be strictly greater than 0 and finite.
    pub fn as_normalized_diy_fp(&self) -> DiyFp {
        debug_assert!(self.value() > 0.0);
        let mut f = self.significand();
        let mut e = self.exponent();

        // The current double could be a denormal.
        while (f & Self::HIDDEN_BIT) == 0 {
            f <<= 1;
            e -= 1;
        }
        // Do the final shifts in one go.
        f <<= DiyFp::SIGNIFICAND_SIZE - Self::SIGNIFICAND_SIZE;
        e -= DiyFp::SIGNIFICAND_SIZE - Self::SIGNIFICAND_SIZE;
        DiyFp::new(f, e)
    }

    /// Returns true if the distance to the lower neighbor is smaller than
    /// the distance to the upper one, which happens at positive powers of
    /// two above the denormal range.
    #[inline]
    pub fn lower_boundary_is_closer(&self) -> bool {
        // The boundary is closer when the value is an exact power of two:
        // the lower boundary then reaches into the next smaller binade where
        // ulps are half as large. The smallest normal is the exception since
        // denormals below it keep the same spacing.
        let physical_significand_is_zero = (self.0 & Self::SIGNIFICAND_MASK) == 0;
        physical_significand_is_zero && self.exponent() != Self::DENORMAL_EXPONENT
    }

    /// The upper boundary `v+` between this double and its successor, as an
    /// unnormalized `DiyFp`. The value must be positive.
    #[inline]
    pub fn upper_boundary(&self) -> DiyFp {
        let v = self.as_diy_fp();
        DiyFp::new(v.mant * 2 + 1, v.exp - 1)
    }

    /// The two boundaries of this double, normalized and sharing an
    /// exponent. The value must be positive and finite.
    pub fn normalized_boundaries(&self) -> (DiyFp, DiyFp) {
        debug_assert!(self.value() > 0.0);
        let v = self.as_diy_fp();
        let m_plus = DiyFp::new((v.mant << 1) + 1, v.exp - 1).normalized();
        let mut m_minus = if self.lower_boundary_is_closer() {
            DiyFp::new((v.mant << 2) - 1, v.exp - 2)
        } else {
            DiyFp::new((v.mant << 1) - 1, v.exp - 1)
        };
        m_minus.mant <<= m_minus.exp - m_plus.exp;
        m_minus.exp = m_plus.exp;
        (m_minus, m_plus)
    }

    /// The next larger double. Infinity stays infinity.
    #[inline]
    pub fn next_double(&self) -> f64 {
        if self.0 == Self::INFINITY_BITS {
            return f64::INFINITY;
        }
        if self.sign() < 0 && self.significand() == 0 {
            return 0.0;
        }
        if self.sign() < 0 {
            Double(self.0 - 1).value()
        } else {
            Double(self.0 + 1).value()
        }
    }

    /// The next smaller double. Negative infinity stays negative infinity.
    #[inline]
    pub fn previous_double(&self) -> f64 {
        if self.0 == Self::INFINITY_BITS | Self::SIGN_MASK {
            return f64::NEG_INFINITY;
        }
        if self.sign() < 0 {
            Double(self.0 + 1).value()
        } else if self.significand() == 0 {
            -0.0
        } else {
            Double(self.0 - 1).value()
        }
    }

    /// How many significand bits a value with the given order of magnitude
    /// effectively carries, accounting for the denormal range.
    ///
    /// The order of magnitude is such that the value fits in
    /// `[2^(order-1), 2^order)`.
    #[inline]
    pub fn significand_size_for_order_of_magnitude(order: i32) -> i32 {
        if order >= Self::DENORMAL_EXPONENT + Self::SIGNIFICAND_SIZE {
            return Self::SIGNIFICAND_SIZE;
        }
        if order <= Self::DENORMAL_EXPONENT {
            return 0;
        }
        order - Self::DENORMAL_EXPONENT
    }
}

// TESTS
// -----

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_diy_fp_test() {
        let diy_fp = Double::new(1.0).as_diy_fp();
        assert_eq!(diy_fp.exp, -52);
        assert_eq!(diy_fp.mant, 0x0010_0000_0000_0000);

        // Min denormal.
        let diy_fp = Double::new(5e-324).as_diy_fp();
        assert_eq!(diy_fp.exp, -1074);
        assert_eq!(diy_fp.mant, 1);
    }

    #[test]
    fn as_normalized_diy_fp_test() {
        let diy_fp = Double::new(1.0).as_normalized_diy_fp();
        assert_eq!(diy_fp.exp, -63);
        assert_eq!(diy_fp.mant, 0x8000_0000_0000_0000);

        let diy_fp = Double::new(5e-324).as_normalized_diy_fp();
        assert_eq!(diy_fp.exp, -1074 - 63);
        assert_eq!(diy_fp.mant, 0x8000_0000_0000_0000);
    }

    #[test]
    fn from_diy_fp_test() {
        assert_eq!(Double::from_diy_fp(DiyFp::new(1, 0)).value(), 1.0);
        assert_eq!(Double::from_diy_fp(DiyFp::new(5, -1)).value(), 2.5);
        assert_eq!(Double::from_diy_fp(DiyFp::new(1, -1074)).value(), 5e-324);
        // Overflow and underflow.
        assert_eq!(Double::from_diy_fp(DiyFp::new(1, 1024)).value(), f64::INFINITY);
        assert_eq!(Double::from_diy_fp(DiyFp::new(1, -1075)).value(), 0.0);
    }

    #[test]
    fn special_test() {
        assert!(Double::new(f64::NAN).is_nan());
        assert!(Double::new(f64::NAN).is_special());
        assert!(Double::new(f64::INFINITY).is_infinite());
        assert!(Double::new(f64::NEG_INFINITY).is_infinite());
        assert!(!Double::new(1.5).is_special());
        assert!(Double::new(5e-324).is_denormal());
        assert!(!Double::new(2.2250738585072014e-308).is_denormal());
    }

    #[test]
    fn sign_test() {
        assert_eq!(Double::new(1.0).sign(), 1);
        assert_eq!(Double::new(0.0).sign(), 1);
        assert_eq!(Double::new(-0.0).sign(), -1);
        assert_eq!(Double::new(-1.0).sign(), -1);
    }

    #[test]
    fn neighbors_test() {
        assert_eq!(Double::new(0.0).next_double(), 5e-324);
        assert_eq!(Double::new(5e-324).previous_double(), 0.0);
        assert_eq!(Double::new(-0.0).next_double(), 0.0);
        assert_eq!(Double::new(1.0).next_double(), 1.0 + f64::EPSILON);
        assert_eq!(Double::new(f64::INFINITY).next_double(), f64::INFINITY);
        assert_eq!(Double::new(-5e-324).next_double(), -0.0);
    }

    #[test]
    fn boundaries_test() {
        // 1.5 is in the middle of a binade: boundaries are half an ulp away.
        let (m_minus, m_plus) = Double::new(1.5).normalized_boundaries();
        let v = Double::new(1.5).as_normalized_diy_fp();
        assert_eq!(m_plus.exp, v.exp);
        assert_eq!(m_minus.exp, v.exp);
        assert_eq!(m_plus.mant - v.mant, v.mant - m_minus.mant);

        // 1.0 sits at a power of two: the lower boundary is closer.
        let (m_minus, m_plus) = Double::new(1.0).normalized_boundaries();
        let v = Double::new(1.0).as_normalized_diy_fp();
        assert!(m_plus.mant - v.mant > v.mant - m_minus.mant);
    }

    #[test]
    fn significand_size_test() {
        assert_eq!(Double::significand_size_for_order_of_magnitude(0), 53);
        assert_eq!(Double::significand_size_for_order_of_magnitude(-1021), 53);
        assert_eq!(Double::significand_size_for_order_of_magnitude(-1022), 52);
        assert_eq!(Double::significand_size_for_order_of_magnitude(-1073), 1);
        assert_eq!(Double::significand_size_for_order_of_magnitude(-1074), 0);
        assert_eq!(Double::significand_size_for_order_of_magnitude(-2000), 0);
    }
}
