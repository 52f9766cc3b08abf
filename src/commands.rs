// commands.rs

use std::io::{self, Write};

use crate::calculator::Calculator;
use crate::parser::Command;
use crate::util::writeln_ignore_broken_pipe;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Flow {
    Continue,
    Exit,
}

pub const HELP: &str = "\
Available Commands:
-------------------
add a b           -> Add two numbers
subtract a b      -> Subtract two numbers
multiply a b      -> Multiply two numbers
divide a b        -> Divide two numbers
power a b         -> Raise a to the power of b
root a b          -> Compute the b-th root of a
modulus a b       -> Compute a % b
int_divide a b    -> Integer division
percent a b       -> (a / b) * 100
abs_diff a b      -> |a - b|
-------------------
history           -> Show calculation history
clear             -> Clear calculation history
undo              -> Undo last calculation
redo              -> Redo last undone calculation
save [path]       -> Save history to CSV file
load [path]       -> Load history from CSV file
help              -> Show this help message
exit              -> Exit the program";

/// Runs one parsed command against the session, writing user-facing output
/// to `out`. Calculator errors are reported on `out`, not returned.
pub fn run_command<W: Write>(cmd: Command, calc: &mut Calculator, out: &mut W) -> io::Result<Flow> {
    match cmd {
        Command::Calculate { op, operands } => {
            if operands.len() != 2 {
                writeln_ignore_broken_pipe(
                    &mut *out,
                    "Error: Operation requires two operands (e.g., add 2 3)",
                )?;
                return Ok(Flow::Continue);
            }
            match calc.perform(&op, &operands[0], &operands[1]) {
                Ok(record) => writeln_ignore_broken_pipe(&mut *out, format!("Result: {}", record.result()))?,
                Err(e) => writeln_ignore_broken_pipe(&mut *out, format!("Error: {e}"))?,
            }
        }
        Command::History => {
            let history = calc.history();
            if history.is_empty() {
                writeln_ignore_broken_pipe(&mut *out, "No calculations yet.")?;
            } else {
                writeln_ignore_broken_pipe(&mut *out, "Calculation History:")?;
                for (i, record) in history.iter().enumerate() {
                    writeln_ignore_broken_pipe(&mut *out, format!("{}. {}", i + 1, record))?;
                }
            }
        }
        Command::Clear => {
            calc.clear_history();
            writeln_ignore_broken_pipe(&mut *out, "History cleared.")?;
        }
        Command::Undo => {
            let msg = if !calc.can_undo() {
                "Nothing to undo."
            } else if calc.undo().is_some() {
                "Undo successful."
            } else {
                "Nothing to undo."
            };
            writeln_ignore_broken_pipe(&mut *out, msg)?;
        }
        Command::Redo => {
            let msg = if !calc.can_redo() {
                "Nothing to redo."
            } else if calc.redo().is_some() {
                "Redo successful."
            } else {
                "Nothing to redo."
            };
            writeln_ignore_broken_pipe(&mut *out, msg)?;
        }
        Command::Save(path) => match calc.save_history(path.as_deref()) {
            Ok(()) => writeln_ignore_broken_pipe(&mut *out, "History saved successfully.")?,
            Err(e) => writeln_ignore_broken_pipe(&mut *out, format!("Error: {e}"))?,
        },
        Command::Load(path) => match calc.load_history(path.as_deref()) {
            Ok(()) => writeln_ignore_broken_pipe(&mut *out, "History loaded successfully.")?,
            Err(e) => writeln_ignore_broken_pipe(&mut *out, format!("Error: {e}"))?,
        },
        Command::Help => writeln_ignore_broken_pipe(&mut *out, HELP)?,
        Command::Exit => {
            farewell(calc, out)?;
            return Ok(Flow::Exit);
        }
        Command::Unknown(word) => writeln_ignore_broken_pipe(
            &mut *out,
            format!("Unknown command: '{word}'. Type 'help' for available commands."),
        )?,
    }
    Ok(Flow::Continue)
}

/// Saves the history to the default file and says goodbye.
pub fn farewell<W: Write>(calc: &Calculator, out: &mut W) -> io::Result<()> {
    if let Err(e) = calc.save_history(None) {
        writeln_ignore_broken_pipe(&mut *out, format!("Warning: Could not save history: {e}"))?;
    }
    writeln_ignore_broken_pipe(&mut *out, "Goodbye!")
}
