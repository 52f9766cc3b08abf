// util.rs

use std::io::Write;

pub fn writeln_ignore_broken_pipe<W: Write, S: AsRef<str>>(mut w: W, s: S) -> std::io::Result<()> {
    match writeln!(w, "{}", s.as_ref()) {
        Err(ref e) if e.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

/// Rounds `value` to `precision` fractional digits, leaving integral values alone.
///
/// Values too large to scale are returned unchanged. `-0.0` becomes `0.0`.
pub fn round_to_precision(value: f64, precision: usize) -> f64 {
    if value.fract() == 0.0 {
        return if value == 0.0 { 0.0 } else { value };
    }
    let factor = 10f64.powi(precision.min(i32::MAX as usize) as i32);
    let scaled = value * factor;
    let rounded = if scaled.is_finite() && factor.is_finite() {
        scaled.round() / factor
    } else {
        value
    };
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}
