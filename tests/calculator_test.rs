use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use calc_history::{CalcError, CalcResult, Calculation, CalculationSink, Calculator, CalculatorConfig};
use tempfile::TempDir;

fn config_in(dir: &TempDir) -> CalculatorConfig {
    CalculatorConfig {
        log_dir: dir.path().join("logs"),
        history_dir: dir.path().join("data"),
        history_file: dir.path().join("data").join("history.csv"),
        auto_save: false,
        ..CalculatorConfig::default()
    }
}

fn summary(calc: &Calculator) -> Vec<String> {
    calc.history().iter().map(|c| c.to_string()).collect()
}

struct AlwaysFails;

impl CalculationSink for AlwaysFails {
    fn name(&self) -> &str {
        "always-fails"
    }

    fn notify(&self, _calc: &Calculation) -> CalcResult<()> {
        Err(CalcError::Persistence("sink is down".into()))
    }
}

struct Counter(Arc<AtomicUsize>);

impl CalculationSink for Counter {
    fn name(&self) -> &str {
        "counter"
    }

    fn notify(&self, _calc: &Calculation) -> CalcResult<()> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[test]
fn bounded_history_keeps_the_newest() {
    let dir = TempDir::new().unwrap();
    let mut calc = Calculator::new(CalculatorConfig {
        max_history_size: 2,
        ..config_in(&dir)
    });
    calc.perform("add", "1", "1").unwrap();
    calc.perform("add", "2", "2").unwrap();
    calc.perform("add", "3", "3").unwrap();
    assert_eq!(summary(&calc), vec!["add(2, 2) = 4", "add(3, 3) = 6"]);
}

#[test]
fn divide_undo_redo() {
    let dir = TempDir::new().unwrap();
    let mut calc = Calculator::new(config_in(&dir));
    let record = calc.perform("divide", "10", "2").unwrap();
    assert_eq!(record.result(), 5.0);

    let after_undo = calc.undo().unwrap();
    assert!(after_undo.is_empty());
    assert!(calc.history().is_empty());
    assert!(calc.can_redo());

    let after_redo = calc.redo().unwrap();
    assert_eq!(after_redo.len(), 1);
    assert_eq!(summary(&calc), vec!["divide(10, 2) = 5"]);
}

#[test]
fn even_root_of_negative_is_rejected() {
    let dir = TempDir::new().unwrap();
    let mut calc = Calculator::new(config_in(&dir));
    assert!(matches!(
        calc.perform("root", "-16", "2"),
        Err(CalcError::InvalidOperation(_))
    ));
    assert!(calc.history().is_empty());
}

#[test]
fn zero_divisor_changes_nothing() {
    let dir = TempDir::new().unwrap();
    let mut calc = Calculator::new(config_in(&dir));
    calc.perform("add", "1", "1").unwrap();
    calc.undo().unwrap();
    let before = (summary(&calc), calc.can_undo(), calc.can_redo());

    for op in ["divide", "int_divide", "modulus", "percent"] {
        let err = calc.perform(op, "7", "0").unwrap_err();
        assert!(matches!(err, CalcError::DivisionByZero(_)), "{op}: {err}");
        assert_eq!((summary(&calc), calc.can_undo(), calc.can_redo()), before);
    }
}

#[test]
fn failing_sink_does_not_break_perform() {
    let dir = TempDir::new().unwrap();
    let mut calc = Calculator::new(config_in(&dir));
    let count = Arc::new(AtomicUsize::new(0));
    calc.register_sink(Box::new(AlwaysFails));
    calc.register_sink(Box::new(Counter(count.clone())));

    let record = calc.perform("add", "1", "2").unwrap();
    assert_eq!(record.result(), 3.0);
    assert_eq!(calc.history().len(), 1);
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn sinks_only_hear_successful_calculations() {
    let dir = TempDir::new().unwrap();
    let mut calc = Calculator::new(config_in(&dir));
    let count = Arc::new(AtomicUsize::new(0));
    let id = calc.register_sink(Box::new(Counter(count.clone())));

    calc.perform("add", "1", "2").unwrap();
    let _ = calc.perform("divide", "1", "0");
    calc.undo();
    assert_eq!(count.load(Ordering::SeqCst), 1);

    assert!(calc.unregister_sink(id));
    calc.perform("add", "1", "2").unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn undo_without_snapshots_touches_nothing() {
    let dir = TempDir::new().unwrap();
    let mut calc = Calculator::new(config_in(&dir));
    calc.perform("add", "1", "1").unwrap();
    calc.undo().unwrap();
    // Only the session seed remains, and it matches the empty history.
    assert!(calc.undo().is_none());
    assert!(calc.can_redo());
    assert_eq!(calc.redo().unwrap().len(), 1);
}

#[test]
fn save_then_load_round_trips() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("saved.csv");
    let mut calc = Calculator::new(config_in(&dir));
    calc.perform("add", "1.5", "2.25").unwrap();
    calc.perform("power", "2", "-1").unwrap();
    calc.perform("int_divide", "-7", "2").unwrap();
    calc.save_history(Some(&path)).unwrap();

    let mut restored = Calculator::new(config_in(&dir));
    restored.load_history(Some(&path)).unwrap();

    let original = calc.history();
    let loaded = restored.history();
    assert_eq!(original.len(), loaded.len());
    for (a, b) in original.iter().zip(&loaded) {
        assert_eq!(a, b);
        assert_eq!(a.timestamp(), b.timestamp());
    }
}

#[test]
fn load_resets_undo_redo() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("saved.csv");
    let mut source = Calculator::new(config_in(&dir));
    source.perform("add", "1", "1").unwrap();
    source.save_history(Some(&path)).unwrap();

    let mut calc = Calculator::new(config_in(&dir));
    calc.perform("multiply", "3", "3").unwrap();
    calc.perform("multiply", "4", "4").unwrap();
    calc.undo().unwrap();
    calc.load_history(Some(&path)).unwrap();

    assert_eq!(summary(&calc), vec!["add(1, 1) = 2"]);
    assert!(!calc.can_redo());
    // The seed equals the loaded state, so there is nothing to step back to.
    assert!(calc.undo().is_none());

    calc.perform("add", "2", "2").unwrap();
    calc.undo().unwrap();
    assert_eq!(summary(&calc), vec!["add(1, 1) = 2"]);
}

#[test]
fn load_of_missing_file_creates_header_only_file() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    let path = config.history_file.clone();
    let mut calc = Calculator::new(config);
    calc.perform("add", "1", "1").unwrap();

    calc.load_history(None).unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "operation,operand_1,operand_2,result,timestamp\n"
    );
    assert_eq!(summary(&calc), vec!["add(1, 1) = 2"]);
    assert!(calc.undo().is_some());
}

#[test]
fn load_of_header_only_file_is_a_no_op() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.csv");
    fs::write(&path, "operation,operand_1,operand_2,result,timestamp\n").unwrap();

    let mut calc = Calculator::new(config_in(&dir));
    calc.perform("add", "1", "1").unwrap();
    calc.load_history(Some(&path)).unwrap();
    assert_eq!(calc.history().len(), 1);
    assert!(calc.undo().is_some());
}

#[test]
fn malformed_rows_fail_the_whole_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.csv");
    fs::write(
        &path,
        "operation,operand_1,operand_2,result,timestamp\n\
         add,1,1,2,2025-01-01T00:00:00Z\n\
         add,one,1,2,2025-01-01T00:00:01Z\n",
    )
    .unwrap();

    let mut calc = Calculator::new(config_in(&dir));
    calc.perform("subtract", "5", "3").unwrap();
    assert!(matches!(
        calc.load_history(Some(&path)),
        Err(CalcError::Persistence(_))
    ));
    assert_eq!(summary(&calc), vec!["subtract(5, 3) = 2"]);
}

#[test]
fn autosave_sink_appends_each_calculation() {
    let dir = TempDir::new().unwrap();
    let config = CalculatorConfig {
        auto_save: true,
        ..config_in(&dir)
    };
    let path = config.history_file.clone();
    let mut calc = Calculator::with_default_sinks(config);
    calc.perform("add", "1", "1").unwrap();
    calc.perform("add", "2", "2").unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 3);

    let mut reloaded = Calculator::new(config_in(&dir));
    reloaded.load_history(None).unwrap();
    assert_eq!(summary(&reloaded), vec!["add(1, 1) = 2", "add(2, 2) = 4"]);
}

#[test]
fn clear_after_undo_to_empty_discards_redo() {
    let dir = TempDir::new().unwrap();
    let mut calc = Calculator::new(config_in(&dir));
    calc.perform("add", "1", "1").unwrap();
    assert_eq!(calc.undo().unwrap().len(), 0);
    assert!(calc.can_redo());

    calc.clear_history();
    assert!(!calc.can_redo());
    assert!(calc.redo().is_none());
    assert!(summary(&calc).is_empty());
}

#[test]
fn session_is_send_behind_a_mutex() {
    fn assert_send<T: Send>() {}
    assert_send::<std::sync::Mutex<Calculator>>();
}
