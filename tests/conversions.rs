#![allow(clippy::excessive_precision, clippy::float_cmp)]

use double_conversion::{
    bignum_dtoa, double_to_ascii, fast_dtoa, parse_double, BignumDtoaMode, DoubleToStringConverter,
    DtoaMode, FastDtoaMode, StringToDoubleConverter,
};

fn shortest_digits(v: f64) -> (String, i32) {
    let mut buffer = [0u8; 32];
    let (sign, length, point) = double_to_ascii(v, DtoaMode::Shortest, 0, &mut buffer);
    assert!(!sign);
    (String::from_utf8(buffer[..length].to_vec()).unwrap(), point)
}

#[test]
fn shortest_digit_vectors() {
    assert_eq!(shortest_digits(0.1), ("1".to_owned(), 0));
    assert_eq!(shortest_digits(1.0), ("1".to_owned(), 1));
    assert_eq!(shortest_digits(1.5), ("15".to_owned(), 1));
    assert_eq!(shortest_digits(5e-324), ("5".to_owned(), -323));
    assert_eq!(
        shortest_digits(1.7976931348623157e308),
        ("17976931348623157".to_owned(), 309)
    );
    assert_eq!(shortest_digits(4294967272.0), ("4294967272".to_owned(), 10));
    assert_eq!(
        shortest_digits(9007199254740992.0),
        ("9007199254740992".to_owned(), 16)
    );
    assert_eq!(
        shortest_digits(9007199254740994.0),
        ("9007199254740994".to_owned(), 16)
    );
}

// The fast generator must agree with the exact one whenever it does not
// bail out.
#[test]
fn fast_and_exact_generators_agree() {
    let mut bits: u64 = 0x2B99_0DDE_D32F_2F4F;
    for _ in 0..2000 {
        bits = bits.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let v = f64::from_bits(bits % 0x7FEF_FFFF_FFFF_FFFF);
        if v <= 0.0 {
            continue;
        }
        let mut fast_buffer = [0u8; 32];
        let Some((fast_length, fast_point)) =
            fast_dtoa(v, FastDtoaMode::Shortest, 0, &mut fast_buffer)
        else {
            continue;
        };
        let mut exact_buffer = [0u8; 32];
        let (exact_length, exact_point) =
            bignum_dtoa(v, BignumDtoaMode::Shortest, 0, &mut exact_buffer);
        assert_eq!(fast_point, exact_point, "{:e}", v);
        assert_eq!(
            &fast_buffer[..fast_length],
            &exact_buffer[..exact_length],
            "{:e}",
            v
        );
    }
}

#[test]
fn format_parse_round_trip() {
    let converter = DoubleToStringConverter::ecmascript();
    let mut bits: u64 = 0xDEAD_BEEF_CAFE_F00D;
    for _ in 0..2000 {
        bits = bits.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let v = f64::from_bits(bits % 0x7FEF_FFFF_FFFF_FFFF);
        let formatted = converter.to_shortest(v).unwrap();
        let parsed = parse_double(&formatted).unwrap();
        assert_eq!(parsed.to_bits(), v.to_bits(), "{} -> {}", v, formatted);
    }
}

#[test]
fn ecmascript_formatting() {
    let converter = DoubleToStringConverter::ecmascript();
    assert_eq!(converter.to_shortest(123.456).unwrap(), "123.456");
    assert_eq!(converter.to_shortest(-0.0).unwrap(), "0");
    assert_eq!(converter.to_shortest(1e21).unwrap(), "1e+21");
    assert_eq!(converter.to_shortest(1.2e-7).unwrap(), "1.2e-7");
    // Exact halves round up, mirroring Number.prototype.toFixed.
    assert_eq!(converter.to_fixed(0.5, 0).unwrap(), "1");
    assert_eq!(converter.to_fixed(1.5, 0).unwrap(), "2");
    assert_eq!(converter.to_fixed(2.5, 0).unwrap(), "3");
    assert_eq!(converter.to_exponential(1234.0, Some(2)).unwrap(), "1.23e+3");
    assert_eq!(converter.to_precision(1234.0, 2).unwrap(), "1.2e+3");
}

#[test]
fn lenient_parsing() {
    let converter = StringToDoubleConverter {
        allow_trailing_junk: true,
        allow_leading_spaces: true,
        allow_trailing_spaces: false,
        allow_spaces_after_sign: false,
        empty_string_value: 0.0,
        junk_string_value: f64::NAN,
        infinity_symbol: Some("Infinity"),
        nan_symbol: Some("NaN"),
    };
    assert_eq!(converter.string_to_double(b"  3.25abc"), (3.25, 6));
    assert_eq!(converter.string_to_double(b"+12e1"), (120.0, 5));
    let (value, processed) = converter.string_to_double(b"-Infinity, almost");
    assert_eq!(value, f64::NEG_INFINITY);
    assert_eq!(processed, 9);
}

#[test]
fn parse_extremes() {
    assert_eq!(parse_double("1.7976931348623157e308"), Ok(f64::MAX));
    assert_eq!(parse_double("1.7976931348623159e308"), Ok(f64::INFINITY));
    assert_eq!(parse_double("4.9406564584124654e-324"), Ok(5e-324));
    assert_eq!(parse_double("2.4703282292062327e-324"), Ok(0.0));
    assert_eq!(parse_double("-0"), Ok(-0.0));
    assert_eq!(parse_double("-0").unwrap().to_bits(), (-0.0f64).to_bits());
}
