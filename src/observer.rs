// observer.rs

use std::path::PathBuf;

use tracing::{info, warn};

use crate::calculation::Calculation;
use crate::error::CalcResult;
use crate::store;

/// Something that wants to hear about every completed calculation.
pub trait CalculationSink: Send {
    fn name(&self) -> &str;
    fn notify(&self, calc: &Calculation) -> CalcResult<()>;
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct SinkId(u64);

/// Registered sinks, kept in registration order.
#[derive(Default)]
pub struct SinkRegistry {
    next_id: u64,
    sinks: Vec<(SinkId, Box<dyn CalculationSink>)>,
}

impl SinkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, sink: Box<dyn CalculationSink>) -> SinkId {
        let id = SinkId(self.next_id);
        self.next_id += 1;
        self.sinks.push((id, sink));
        id
    }

    pub fn unregister(&mut self, id: SinkId) -> Option<Box<dyn CalculationSink>> {
        let idx = self.sinks.iter().position(|(sid, _)| *sid == id)?;
        Some(self.sinks.remove(idx).1)
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Hands `calc` to every sink. A failing sink is logged and skipped; the
    /// number of failures is returned.
    pub fn notify_all(&self, calc: &Calculation) -> usize {
        let mut failures = 0;
        for (_, sink) in &self.sinks {
            if let Err(e) = sink.notify(calc) {
                warn!(sink = sink.name(), error = %e, "sink failed");
                failures += 1;
            }
        }
        failures
    }
}

/// Writes one log event per calculation.
pub struct LoggingSink;

impl CalculationSink for LoggingSink {
    fn name(&self) -> &str {
        "logging"
    }

    fn notify(&self, calc: &Calculation) -> CalcResult<()> {
        info!(
            operation = %calc.operation(),
            operand_1 = calc.operand_a(),
            operand_2 = calc.operand_b(),
            result = calc.result(),
            "calculation"
        );
        Ok(())
    }
}

/// Appends each calculation as a row of the history file.
pub struct AutoSaveSink {
    path: PathBuf,
}

impl AutoSaveSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CalculationSink for AutoSaveSink {
    fn name(&self) -> &str {
        "autosave"
    }

    fn notify(&self, calc: &Calculation) -> CalcResult<()> {
        store::append(&self.path, &calc.to_row())
    }
}
