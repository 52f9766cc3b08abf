// operations.rs

use std::fmt;
use std::str::FromStr;

use crate::error::{CalcError, CalcResult};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
    IntDivide,
    Modulus,
    Percent,
    Power,
    Root,
    AbsDiff,
}

type Evaluator = fn(f64, f64) -> CalcResult<f64>;

/// Name and evaluator for every operation, in help-text order.
static TABLE: [(Operation, &str, Evaluator); 10] = [
    (Operation::Add, "add", add),
    (Operation::Subtract, "subtract", subtract),
    (Operation::Multiply, "multiply", multiply),
    (Operation::Divide, "divide", divide),
    (Operation::IntDivide, "int_divide", int_divide),
    (Operation::Modulus, "modulus", modulus),
    (Operation::Percent, "percent", percent),
    (Operation::Power, "power", power),
    (Operation::Root, "root", root),
    (Operation::AbsDiff, "abs_diff", abs_diff),
];

impl Operation {
    pub const ALL: [Operation; 10] = [
        Operation::Add,
        Operation::Subtract,
        Operation::Multiply,
        Operation::Divide,
        Operation::IntDivide,
        Operation::Modulus,
        Operation::Percent,
        Operation::Power,
        Operation::Root,
        Operation::AbsDiff,
    ];

    fn entry(self) -> &'static (Operation, &'static str, Evaluator) {
        // TABLE is declared in the same order as the enum variants.
        &TABLE[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.entry().1
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        TABLE.iter().map(|(_, name, _)| *name)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        TABLE
            .iter()
            .find(|(_, name, _)| name.eq_ignore_ascii_case(wanted))
            .map(|(op, _, _)| *op)
            .ok_or_else(|| CalcError::UnsupportedOperation(wanted.to_string()))
    }
}

/// Evaluates `op` on two already-validated operands.
///
/// NaN or infinite results are reported as [`CalcError::InvalidOperation`]
/// rather than returned.
pub fn evaluate(op: Operation, a: f64, b: f64) -> CalcResult<f64> {
    let result = (op.entry().2)(a, b)?;
    if result.is_finite() {
        Ok(result)
    } else {
        Err(CalcError::InvalidOperation(format!(
            "{op}({a}, {b}) has no finite real result"
        )))
    }
}

fn add(a: f64, b: f64) -> CalcResult<f64> {
    Ok(a + b)
}

fn subtract(a: f64, b: f64) -> CalcResult<f64> {
    Ok(a - b)
}

fn multiply(a: f64, b: f64) -> CalcResult<f64> {
    Ok(a * b)
}

fn nonzero_divisor(op: Operation, b: f64) -> CalcResult<()> {
    if b == 0.0 {
        Err(CalcError::DivisionByZero(op))
    } else {
        Ok(())
    }
}

fn divide(a: f64, b: f64) -> CalcResult<f64> {
    nonzero_divisor(Operation::Divide, b)?;
    Ok(a / b)
}

fn int_divide(a: f64, b: f64) -> CalcResult<f64> {
    nonzero_divisor(Operation::IntDivide, b)?;
    Ok((a / b).floor())
}

// Floored modulus: the remainder takes the sign of the divisor.
fn modulus(a: f64, b: f64) -> CalcResult<f64> {
    nonzero_divisor(Operation::Modulus, b)?;
    let r = a % b;
    if r != 0.0 && (r < 0.0) != (b < 0.0) {
        Ok(r + b)
    } else {
        Ok(r)
    }
}

fn percent(a: f64, b: f64) -> CalcResult<f64> {
    nonzero_divisor(Operation::Percent, b)?;
    Ok((a / b) * 100.0)
}

fn is_integer(x: f64) -> bool {
    x.is_finite() && x.fract() == 0.0
}

fn power(a: f64, b: f64) -> CalcResult<f64> {
    if a < 0.0 && !is_integer(b) {
        return Err(CalcError::InvalidOperation(format!(
            "{a} raised to {b} is not a real number"
        )));
    }
    Ok(a.powf(b))
}

fn root(a: f64, b: f64) -> CalcResult<f64> {
    if b == 0.0 {
        return Err(CalcError::InvalidOperation(
            "root degree cannot be zero".to_string(),
        ));
    }
    if a < 0.0 {
        if is_integer(b) && b % 2.0 == 0.0 {
            return Err(CalcError::InvalidOperation(format!(
                "even root of negative number {a} is not a real number"
            )));
        }
        if is_integer(b) {
            // Odd integer degree: the real root keeps the sign.
            return Ok(-(-a).powf(1.0 / b));
        }
        return Err(CalcError::InvalidOperation(format!(
            "root of degree {b} of negative number {a} is not a real number"
        )));
    }
    Ok(a.powf(1.0 / b))
}

fn abs_diff(a: f64, b: f64) -> CalcResult<f64> {
    Ok((a - b).abs())
}
