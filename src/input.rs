// input.rs

use crate::error::{CalcError, CalcResult};

/// Turns raw operand text into numbers the evaluator can trust.
#[derive(Clone, Copy, Debug)]
pub struct InputValidator {
    max_input_value: f64,
}

impl InputValidator {
    pub fn new(max_input_value: f64) -> Self {
        Self { max_input_value }
    }

    pub fn validate_pair(&self, a_raw: &str, b_raw: &str) -> CalcResult<(f64, f64)> {
        let (a, b) = match (parse_operand(a_raw), parse_operand(b_raw)) {
            (Some(a), Some(b)) => (a, b),
            _ => {
                return Err(CalcError::Validation(format!(
                    "Inputs must be numeric: got '{a_raw}', '{b_raw}'"
                )))
            }
        };
        if a.abs() > self.max_input_value || b.abs() > self.max_input_value {
            return Err(CalcError::Validation(format!(
                "Inputs must be <= {} in absolute value",
                self.max_input_value
            )));
        }
        Ok((a, b))
    }
}

// Rust parses "inf" and "NaN" as floats; neither is a usable operand.
fn parse_operand(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_numeric_text() {
        let v = InputValidator::new(1e308);
        assert_eq!(v.validate_pair("2", " -3.5 ").unwrap(), (2.0, -3.5));
        assert_eq!(v.validate_pair("1e3", "0").unwrap(), (1000.0, 0.0));
    }

    #[test]
    fn rejects_non_numeric_and_non_finite() {
        let v = InputValidator::new(1e308);
        for (a, b) in [("abc", "1"), ("1", ""), ("nan", "1"), ("1", "inf")] {
            assert!(
                matches!(v.validate_pair(a, b), Err(CalcError::Validation(_))),
                "{a:?} {b:?}"
            );
        }
    }

    #[test]
    fn rejects_values_past_bound() {
        let v = InputValidator::new(100.0);
        assert!(v.validate_pair("100", "-100").is_ok());
        assert!(matches!(
            v.validate_pair("100.5", "1"),
            Err(CalcError::Validation(_))
        ));
        assert!(matches!(
            v.validate_pair("1", "-101"),
            Err(CalcError::Validation(_))
        ));
    }
}
