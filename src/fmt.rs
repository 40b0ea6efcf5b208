//! Number rendering for exposition lines.
//!
//! Values render like JavaScript's `Number.prototype.toString`: `1` rather
//! than `1.0`, `Infinity` rather than `inf`, and exponent notation outside
//! `[1e-7, 1e21)`. Rust's `{:e}` formatting already produces the shortest
//! round-trip digits, so we only need to re-layout them.

use std::fmt;

/// Display adapter rendering an `f64` the way exposition lines expect.
#[derive(Debug, Clone, Copy)]
pub struct Number(pub f64);

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.0;
        if v.is_nan() {
            return f.write_str("NaN");
        }
        if v.is_infinite() {
            return f.write_str(if v > 0.0 { "Infinity" } else { "-Infinity" });
        }
        // Covers -0 as well.
        if v == 0.0 {
            return f.write_str("0");
        }
        if v < 0.0 {
            f.write_str("-")?;
        }

        let sci = format!("{:e}", v.abs());
        let (mantissa, exp) = match sci.split_once('e') {
            Some(parts) => parts,
            None => return f.write_str(&sci),
        };
        let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
        let exp: i32 = match exp.parse() {
            Ok(exp) => exp,
            Err(_) => return f.write_str(&sci),
        };

        let k = digits.len() as i32;
        // Position of the decimal point relative to the start of `digits`.
        let n = exp + 1;
        if k <= n && n <= 21 {
            f.write_str(&digits)?;
            for _ in 0..(n - k) {
                f.write_str("0")?;
            }
            Ok(())
        } else if 0 < n && n <= 21 {
            let (int, frac) = digits.split_at(n as usize);
            write!(f, "{int}.{frac}")
        } else if -6 < n && n <= 0 {
            f.write_str("0.")?;
            for _ in 0..(-n) {
                f.write_str("0")?;
            }
            f.write_str(&digits)
        } else {
            let (lead, rest) = digits.split_at(1);
            f.write_str(lead)?;
            if !rest.is_empty() {
                write!(f, ".{rest}")?;
            }
            let e = n - 1;
            write!(f, "e{}{}", if e < 0 { '-' } else { '+' }, e.abs())
        }
    }
}

/// Render `v` as it appears on an exposition line.
pub fn format_value(v: f64) -> String {
    Number(v).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers() {
        assert_eq!(format_value(1.0), "1");
        assert_eq!(format_value(125.0), "125");
        assert_eq!(format_value(-1.0), "-1");
        assert_eq!(format_value(1e20), "100000000000000000000");
        assert_eq!(format_value(u32::MAX as f64), "4294967295");
    }

    #[test]
    fn test_fractions() {
        assert_eq!(format_value(1.5), "1.5");
        assert_eq!(format_value(4.5), "4.5");
        assert_eq!(format_value(-2.75), "-2.75");
        assert_eq!(format_value(123.456), "123.456");
        assert_eq!(format_value(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_value(0.000001), "0.000001");
        assert_eq!(format_value(0.5), "0.5");
    }

    #[test]
    fn test_exponents() {
        assert_eq!(format_value(1e21), "1e+21");
        assert_eq!(format_value(1.5e300), "1.5e+300");
        assert_eq!(format_value(1e-7), "1e-7");
        assert_eq!(format_value(-1.23e-18), "-1.23e-18");
        assert_eq!(format_value(f64::MAX), "1.7976931348623157e+308");
        assert_eq!(format_value(5e-324), "5e-324");
    }

    #[test]
    fn test_special_values() {
        assert_eq!(format_value(0.0), "0");
        assert_eq!(format_value(-0.0), "0");
        assert_eq!(format_value(f64::INFINITY), "Infinity");
        assert_eq!(format_value(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(format_value(f64::NAN), "NaN");
    }

    #[test]
    fn test_display_adapter() {
        assert_eq!(format!("x {}\n", Number(2.0)), "x 2\n");
    }
}
