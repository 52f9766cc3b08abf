// calculation.rs

use std::fmt;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

use crate::error::{CalcError, CalcResult};
use crate::operations::Operation;
use crate::store::Row;

/// One completed calculation.
///
/// Records are immutable once built. Equality ignores the timestamp, so two
/// records for the same operation, operands and result compare equal no matter
/// when they were computed.
#[derive(Clone, Copy, Debug)]
pub struct Calculation {
    operation: Operation,
    operand_a: f64,
    operand_b: f64,
    result: f64,
    timestamp: DateTime<Utc>,
}

impl Calculation {
    pub(crate) fn new(
        operation: Operation,
        operand_a: f64,
        operand_b: f64,
        result: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            operation,
            operand_a,
            operand_b,
            result,
            timestamp,
        }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn operand_a(&self) -> f64 {
        self.operand_a
    }

    pub fn operand_b(&self) -> f64 {
        self.operand_b
    }

    pub fn result(&self) -> f64 {
        self.result
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// The result with exactly `precision` fractional digits.
    pub fn format(&self, precision: usize) -> String {
        format!("{:.*}", precision, self.result)
    }

    pub fn to_row(&self) -> Row {
        let mut row = Row::new();
        row.insert("operation".to_string(), self.operation.name().to_string());
        row.insert("operand_1".to_string(), self.operand_a.to_string());
        row.insert("operand_2".to_string(), self.operand_b.to_string());
        row.insert("result".to_string(), self.result.to_string());
        row.insert(
            "timestamp".to_string(),
            self.timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        );
        row
    }

    pub fn from_row(row: &Row) -> CalcResult<Self> {
        let operation = field(row, "operation")?
            .parse::<Operation>()
            .map_err(|e| CalcError::MalformedRecord(e.to_string()))?;
        Ok(Self {
            operation,
            operand_a: number(row, "operand_1")?,
            operand_b: number(row, "operand_2")?,
            result: number(row, "result")?,
            timestamp: timestamp(field(row, "timestamp")?)?,
        })
    }
}

impl PartialEq for Calculation {
    fn eq(&self, other: &Self) -> bool {
        self.operation == other.operation
            && self.operand_a == other.operand_a
            && self.operand_b == other.operand_b
            && self.result == other.result
    }
}

impl fmt::Display for Calculation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}, {}) = {}",
            self.operation, self.operand_a, self.operand_b, self.result
        )
    }
}

fn field<'a>(row: &'a Row, name: &str) -> CalcResult<&'a str> {
    row.get(name)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| CalcError::MalformedRecord(format!("missing field '{name}'")))
}

fn number(row: &Row, name: &str) -> CalcResult<f64> {
    let raw = field(row, name)?;
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CalcError::MalformedRecord(format!("{name}: '{raw}' is not a number")))
}

// Rows without an offset are taken to be UTC.
fn timestamp(raw: &str) -> CalcResult<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| CalcError::MalformedRecord(format!("timestamp: '{raw}' is not ISO-8601")))
}
