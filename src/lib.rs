//! Binary-decimal conversion routines for IEEE doubles.
//!
//! Converting a double to the shortest string that parses back to the
//! same value, and parsing a decimal string to the nearest double, both
//! require more care than the naive algorithms provide. This crate
//! implements the Grisu family of digit generators with an exact
//! arbitrary-precision fallback, and a correctly rounded strtod.
//!
//! The highest-level entry points live in [`double_conversion`]:
//!
//! ```
//! use double_conversion::{DoubleToStringConverter, parse_double};
//!
//! let converter = DoubleToStringConverter::ecmascript();
//! assert_eq!(converter.to_shortest(0.1).unwrap(), "0.1");
//! assert_eq!(converter.to_fixed(3.1415, 2).unwrap(), "3.14");
//! assert_eq!(parse_double("2.5e-3"), Ok(0.0025));
//! ```
//!
//! The lower layers are public as well: [`fast_dtoa`] and [`fixed_dtoa`]
//! for the fast generators, [`bignum_dtoa`] for the exact one, [`strtod`]
//! for parsing, and [`ieee`], [`diy_fp`], [`bignum`], [`cached_powers`],
//! and [`utils`] for the machinery underneath.

#![deny(missing_docs)]

// MODULES

pub mod bignum;
pub mod bignum_dtoa;
pub mod cached_powers;
pub mod diy_fp;
pub mod double_conversion;
pub mod fast_dtoa;
pub mod fixed_dtoa;
pub mod ieee;
pub mod strtod;
pub mod utils;

// API

pub use crate::bignum::Bignum;
pub use crate::bignum_dtoa::{bignum_dtoa, BignumDtoaMode};
pub use crate::diy_fp::DiyFp;
pub use crate::double_conversion::{
    double_to_ascii, parse_double, DoubleToStringConverter, DtoaMode, ParseError,
    StringToDoubleConverter, BASE10_MAXIMAL_LENGTH,
};
pub use crate::fast_dtoa::{fast_dtoa, FastDtoaMode, FAST_DTOA_MAXIMAL_LENGTH};
pub use crate::fixed_dtoa::fast_fixed_dtoa;
pub use crate::ieee::Double;
pub use crate::strtod::{strtod, strtod_trimmed};
