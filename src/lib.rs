//! Interactive calculator whose history can be undone, redone and saved.
//!
//! [`Calculator`] is the session: each [`perform`](Calculator::perform) call
//! validates its operands, evaluates the [`Operation`], snapshots the history for
//! undo, appends the new [`Calculation`] and notifies the registered sinks.
//! History is persisted as CSV through the [`store`] module.

pub mod calculation;
pub mod calculator;
pub mod commands;
pub mod completion;
pub mod config;
pub mod error;
pub mod history;
pub mod input;
pub mod logging;
pub mod memento;
pub mod observer;
pub mod operations;
pub mod parser;
pub mod repl;
pub mod store;
pub mod util;

pub use calculation::Calculation;
pub use calculator::Calculator;
pub use config::CalculatorConfig;
pub use error::{CalcError, CalcResult};
pub use memento::{Caretaker, Snapshot};
pub use observer::{AutoSaveSink, CalculationSink, LoggingSink, SinkId};
pub use operations::Operation;
