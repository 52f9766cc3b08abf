// store.rs
//
// Flat CSV file holding one calculation per row. Every value is a plain token
// (operation name, number, ISO-8601 timestamp) so no quoting is needed.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use itertools::Itertools;

use crate::error::{CalcError, CalcResult};

pub const COLUMNS: [&str; 5] = ["operation", "operand_1", "operand_2", "result", "timestamp"];

/// One stored row, keyed by column name.
pub type Row = HashMap<String, String>;

fn header_line() -> String {
    COLUMNS.iter().join(",")
}

fn row_line(row: &Row) -> CalcResult<String> {
    let mut cells = Vec::with_capacity(COLUMNS.len());
    for col in COLUMNS {
        let value = row.get(col).map(String::as_str).unwrap_or("");
        if value.contains([',', '\n', '\r']) {
            return Err(CalcError::Persistence(format!(
                "value for '{col}' cannot be stored: {value:?}"
            )));
        }
        cells.push(value);
    }
    Ok(cells.into_iter().join(","))
}

fn ensure_parent(path: &Path) -> CalcResult<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            fs::create_dir_all(dir)?;
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Writes the header followed by `rows`, replacing any existing file.
pub fn save(path: &Path, rows: &[Row]) -> CalcResult<()> {
    ensure_parent(path)?;
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "{}", header_line())?;
    for row in rows {
        writeln!(out, "{}", row_line(row)?)?;
    }
    out.flush()?;
    Ok(())
}

/// Creates a file holding only the header row.
pub fn create_empty(path: &Path) -> CalcResult<()> {
    save(path, &[])
}

/// Appends one row, writing the header first if the file is new or empty.
pub fn append(path: &Path, row: &Row) -> CalcResult<()> {
    ensure_parent(path)?;
    let line = row_line(row)?;
    let needs_header = fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    if needs_header {
        writeln!(file, "{}", header_line())?;
    }
    writeln!(file, "{}", line)?;
    Ok(())
}

/// Reads every data row of the file. A file with only a header yields no rows.
pub fn load(path: &Path) -> CalcResult<Vec<Row>> {
    let reader = BufReader::new(File::open(path)?);
    let mut lines = reader.lines();

    let header: Vec<String> = loop {
        match lines.next() {
            Some(line) => {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                break line.split(',').map(|c| c.trim().to_string()).collect();
            }
            None => return Ok(Vec::new()),
        }
    };
    if let Some(missing) = COLUMNS.iter().find(|c| !header.iter().any(|h| h.as_str() == **c)) {
        return Err(CalcError::Persistence(format!(
            "{}: header is missing column '{missing}'",
            path.display()
        )));
    }

    let mut rows: Vec<Row> = Vec::new();
    for (idx, line) in lines.enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let cells: Vec<&str> = line.split(',').collect();
        if cells.len() != header.len() {
            return Err(CalcError::Persistence(format!(
                "{}: line {} has {} fields, expected {}",
                path.display(),
                idx + 2,
                cells.len(),
                header.len()
            )));
        }
        rows.push(
            header
                .iter()
                .cloned()
                .zip(cells.into_iter().map(|c| c.trim().to_string()))
                .collect(),
        );
    }
    Ok(rows)
}
