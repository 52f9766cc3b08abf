// calculator.rs

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::calculation::Calculation;
use crate::config::CalculatorConfig;
use crate::error::{CalcError, CalcResult};
use crate::history::History;
use crate::input::InputValidator;
use crate::memento::Caretaker;
use crate::observer::{AutoSaveSink, CalculationSink, LoggingSink, SinkId, SinkRegistry};
use crate::operations::{self, Operation};
use crate::store;
use crate::util::round_to_precision;

/// One calculator session: the history log, its undo/redo snapshots and the
/// sinks notified after each calculation.
///
/// Every mutating call runs to completion on `&mut self`. Share a session
/// across threads by wrapping the whole `Calculator` in a `Mutex`.
pub struct Calculator {
    config: CalculatorConfig,
    validator: InputValidator,
    history: History,
    caretaker: Caretaker,
    sinks: SinkRegistry,
    last_timestamp: Option<DateTime<Utc>>,
}

impl Calculator {
    /// A session with no sinks registered.
    pub fn new(config: CalculatorConfig) -> Self {
        let history = History::new(config.max_history_size);
        let mut caretaker = Caretaker::with_max_depth(config.max_undo_depth);
        caretaker.save(history.snapshot());
        Self {
            validator: InputValidator::new(config.max_input_value),
            history,
            caretaker,
            sinks: SinkRegistry::new(),
            last_timestamp: None,
            config,
        }
    }

    /// A session with the logging sink and, when `auto_save` is on, the
    /// autosave sink for the configured history file.
    pub fn with_default_sinks(config: CalculatorConfig) -> Self {
        let mut calc = Self::new(config);
        calc.register_sink(Box::new(LoggingSink));
        if calc.config.auto_save {
            let sink = AutoSaveSink::new(calc.config.history_file.clone());
            calc.register_sink(Box::new(sink));
        }
        calc
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    pub fn register_sink(&mut self, sink: Box<dyn CalculationSink>) -> SinkId {
        self.sinks.register(sink)
    }

    pub fn unregister_sink(&mut self, id: SinkId) -> bool {
        self.sinks.unregister(id).is_some()
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Runs `op_name` on the two raw operands and records the result.
    ///
    /// On any validation or evaluation error the history and the undo stack are
    /// left exactly as they were.
    pub fn perform(&mut self, op_name: &str, a_raw: &str, b_raw: &str) -> CalcResult<Calculation> {
        let op: Operation = op_name.parse()?;
        let (a, b) = self.validator.validate_pair(a_raw, b_raw)?;
        let result = round_to_precision(operations::evaluate(op, a, b)?, self.config.precision);

        let calc = Calculation::new(op, a, b, result, self.next_timestamp());

        self.caretaker.save(self.history.snapshot());
        self.history.append(Arc::new(calc));
        debug!(%calc, size = self.history.size(), "appended");

        self.sinks.notify_all(&calc);
        Ok(calc)
    }

    // Wall-clock time, never earlier than the previous record of this session.
    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let ts = match self.last_timestamp {
            Some(last) if last > now => last,
            _ => now,
        };
        self.last_timestamp = Some(ts);
        ts
    }

    pub fn history(&self) -> Vec<Arc<Calculation>> {
        self.history.list()
    }

    /// Empties the history. Undo brings the cleared entries back.
    ///
    /// Redo is dropped in every case. Clearing a log that is already empty
    /// pushes no snapshot, since there is nothing to bring back.
    pub fn clear_history(&mut self) {
        if self.history.is_empty() {
            self.caretaker.clear_redo();
            debug!("history already empty");
            return;
        }
        self.caretaker.save(self.history.snapshot());
        self.history.clear();
        info!("history cleared");
    }

    pub fn can_undo(&self) -> bool {
        self.caretaker.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.caretaker.can_redo()
    }

    /// Steps back one snapshot. Returns `None` when there is nothing to undo or
    /// the previous snapshot holds the same records as the current history; in
    /// that case neither stack changes.
    pub fn undo(&mut self) -> Option<Vec<Arc<Calculation>>> {
        if self.history.matches(self.caretaker.peek_undo()?) {
            return None;
        }
        let previous = self.caretaker.undo(self.history.snapshot())?;
        self.history.restore(&previous);
        info!(size = self.history.size(), "undo");
        Some(self.history.list())
    }

    /// Steps forward one snapshot, with the same no-op rule as [`undo`](Self::undo).
    pub fn redo(&mut self) -> Option<Vec<Arc<Calculation>>> {
        if self.history.matches(self.caretaker.peek_redo()?) {
            return None;
        }
        let next = self.caretaker.redo(self.history.snapshot())?;
        self.history.restore(&next);
        info!(size = self.history.size(), "redo");
        Some(self.history.list())
    }

    /// Writes the whole history to `path`, or to the configured history file.
    pub fn save_history(&self, path: Option<&Path>) -> CalcResult<()> {
        let path = path.unwrap_or(self.config.history_file.as_path());
        let rows: Vec<_> = self.history.list().iter().map(|c| c.to_row()).collect();
        store::save(path, &rows)?;
        info!(path = %path.display(), records = rows.len(), "history saved");
        Ok(())
    }

    /// Replaces the history with the contents of `path` (or the configured
    /// history file) and restarts undo/redo from the loaded state.
    ///
    /// A missing file is created with just a header and nothing is loaded. A
    /// header-only file leaves the session untouched.
    pub fn load_history(&mut self, path: Option<&Path>) -> CalcResult<()> {
        let path = path.unwrap_or(self.config.history_file.as_path()).to_path_buf();
        if !path.exists() {
            store::create_empty(&path)?;
            info!(path = %path.display(), "created empty history file");
            return Ok(());
        }

        let rows = store::load(&path)?;
        if rows.is_empty() {
            debug!(path = %path.display(), "history file has no rows");
            return Ok(());
        }
        let records = rows
            .iter()
            .map(|row| Calculation::from_row(row).map(Arc::new))
            .collect::<CalcResult<Vec<_>>>()
            .map_err(|e| CalcError::Persistence(format!("{}: {e}", path.display())))?;

        if let Some(newest) = records.iter().map(|c| c.timestamp()).max() {
            self.last_timestamp = Some(self.last_timestamp.map_or(newest, |t| t.max(newest)));
        }
        self.history.replace_all(records);
        self.caretaker.reset(self.history.snapshot());
        info!(path = %path.display(), records = self.history.size(), "history loaded");
        Ok(())
    }
}
