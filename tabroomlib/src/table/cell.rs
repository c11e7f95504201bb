//! Cell values and their conversion to display text.
//!
//! Cells are normalized once, when a row is added: numbers (and text that
//! parses as a finite number) are formatted according to the column's
//! [`Dtype`]; everything else is kept as its plain text form.

use serde::{Deserialize, Serialize};

use super::options::Dtype;

/// Magnitude above which `Auto` switches to exponential notation.
const AUTO_EXPONENTIAL_ABOVE: f64 = 1e8;

/// A raw value handed to the table before normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    /// The plain text form, used for headers, text columns and values that
    /// are not finite numbers.
    pub fn plain(&self) -> String {
        match self {
            CellValue::Null => "None".to_string(),
            CellValue::Int(i) => i.to_string(),
            CellValue::Float(f) => float_repr(*f),
            CellValue::Text(s) => s.clone(),
        }
    }

    /// The value as a finite number, if it is one.
    ///
    /// Text is trimmed and parsed; NaN and the infinities are rejected so
    /// they render as their raw string form.
    fn as_finite(&self) -> Option<f64> {
        let f = match self {
            CellValue::Null => return None,
            CellValue::Int(i) => *i as f64,
            CellValue::Float(f) => *f,
            CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        f.is_finite().then_some(f)
    }

    /// Format the value for a column with the given datatype and precision.
    pub fn normalize(&self, dtype: Dtype, precision: usize) -> String {
        let Some(f) = self.as_finite() else {
            return self.plain();
        };

        match dtype {
            Dtype::Text => self.plain(),
            Dtype::Integer => format_integral(f.round_ties_even()),
            Dtype::Float => format!("{:.*}", precision, f),
            Dtype::Exponential => format_exponential(f, precision),
            Dtype::Auto => {
                if f.abs() > AUTO_EXPONENTIAL_ABOVE {
                    format_exponential(f, precision)
                } else if f.fract() == 0.0 {
                    format_integral(f)
                } else {
                    format!("{:.*}", precision, f)
                }
            }
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<&String> for CellValue {
    fn from(s: &String) -> Self {
        CellValue::Text(s.clone())
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<f32> for CellValue {
    fn from(f: f32) -> Self {
        CellValue::Float(f as f64)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<i32> for CellValue {
    fn from(i: i32) -> Self {
        CellValue::Int(i as i64)
    }
}

impl From<u32> for CellValue {
    fn from(i: u32) -> Self {
        CellValue::Int(i as i64)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Null, Into::into)
    }
}

impl From<serde_json::Value> for CellValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => CellValue::Null,
            Value::Number(n) => match n.as_i64() {
                Some(i) => CellValue::Int(i),
                None => CellValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => CellValue::Text(s),
            Value::Bool(b) => CellValue::Text(if b { "True" } else { "False" }.to_string()),
            other => CellValue::Text(other.to_string()),
        }
    }
}

/// Render an already-integral float without a fractional part.
fn format_integral(f: f64) -> String {
    // adding 0.0 turns -0.0 into 0.0
    format!("{:.0}", f + 0.0)
}

/// C-style `%.*e`: explicit exponent sign and at least two exponent digits.
fn format_exponential(f: f64, precision: usize) -> String {
    let raw = format!("{:.*e}", precision, f);
    fix_exponent(&raw)
}

/// Shortest round-trip form with a `.0` on integral values (`5.0`, `1e+16`).
fn float_repr(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    fix_exponent(&format!("{:?}", f))
}

fn fix_exponent(raw: &str) -> String {
    match raw.split_once('e') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exp.abs())
        }
        None => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auto(v: impl Into<CellValue>) -> String {
        v.into().normalize(Dtype::Auto, 3)
    }

    #[test]
    fn test_auto_integral() {
        assert_eq!(auto(5), "5");
        assert_eq!(auto(5.0), "5");
        assert_eq!(auto("20134"), "20134");
        assert_eq!(auto(-0.0), "0");
    }

    #[test]
    fn test_auto_fractional() {
        assert_eq!(auto(5.25), "5.250");
        assert_eq!(auto("3.14159"), "3.142");
    }

    #[test]
    fn test_auto_large_values_go_exponential() {
        assert_eq!(auto(1_000_000_000), "1.000e+09");
        assert_eq!(auto(123456789.5), "1.235e+08");
        assert_eq!(auto(100_000_000), "100000000");
    }

    #[test]
    fn test_integer_rounds_half_to_even() {
        let int = |v: f64| CellValue::Float(v).normalize(Dtype::Integer, 3);
        assert_eq!(int(2.6), "3");
        assert_eq!(int(2.5), "2");
        assert_eq!(int(3.5), "4");
        assert_eq!(int(-2.6), "-3");
        assert_eq!(int(-0.4), "0");
    }

    #[test]
    fn test_float_and_exponential() {
        assert_eq!(CellValue::Float(1.5).normalize(Dtype::Float, 2), "1.50");
        assert_eq!(CellValue::Int(7).normalize(Dtype::Float, 0), "7");
        assert_eq!(
            CellValue::Float(0.000123).normalize(Dtype::Exponential, 2),
            "1.23e-04"
        );
    }

    #[test]
    fn test_non_numeric_text_is_kept() {
        assert_eq!(auto("2024-01-15"), "2024-01-15");
        assert_eq!(auto("Springfield"), "Springfield");
        assert_eq!(auto(""), "");
    }

    #[test]
    fn test_nan_and_infinity_render_raw() {
        assert_eq!(auto(f64::NAN), "nan");
        assert_eq!(auto(f64::INFINITY), "inf");
        assert_eq!(auto(f64::NEG_INFINITY), "-inf");
        assert_eq!(auto("NaN"), "NaN");
        assert_eq!(auto("inf"), "inf");
    }

    #[test]
    fn test_null_renders_none() {
        assert_eq!(auto(CellValue::Null), "None");
        assert_eq!(auto(None::<i64>), "None");
    }

    #[test]
    fn test_text_dtype_keeps_raw_form() {
        let text = |v: CellValue| v.normalize(Dtype::Text, 3);
        assert_eq!(text(CellValue::from("007")), "007");
        assert_eq!(text(CellValue::Float(5.0)), "5.0");
        assert_eq!(text(CellValue::Float(1e16)), "1e+16");
        assert_eq!(text(CellValue::Int(42)), "42");
    }

    #[test]
    fn test_from_json_value() {
        assert_eq!(
            CellValue::from(serde_json::json!(20134)),
            CellValue::Int(20134)
        );
        assert_eq!(CellValue::from(serde_json::json!(null)), CellValue::Null);
        assert_eq!(
            CellValue::from(serde_json::json!("x")),
            CellValue::Text("x".to_string())
        );
    }
}
