// repl.rs

use anyhow::{Context, Result};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{CompletionType, Config, Editor};
use tracing::{info, warn};

use crate::calculator::Calculator;
use crate::commands::{farewell, run_command, Flow};
use crate::completion::CommandCompleter;
use crate::parser::parse_command;
use crate::util::writeln_ignore_broken_pipe;

const PROMPT: &str = "calc> ";

pub fn start_repl(mut calc: Calculator) -> Result<()> {
    let config = Config::builder().completion_type(CompletionType::List).build();
    let mut rl: Editor<CommandCompleter, DefaultHistory> =
        Editor::with_config(config).context("failed to create line editor")?;
    rl.set_helper(Some(CommandCompleter::new()));

    let mut stdout = std::io::stdout();
    if let Err(e) = calc.load_history(None) {
        warn!(error = %e, "startup load failed");
        writeln_ignore_broken_pipe(&mut stdout, format!("Note: Could not load previous history: {e}"))?;
    }
    writeln_ignore_broken_pipe(&mut stdout, "Welcome to the calculator!")?;
    writeln_ignore_broken_pipe(&mut stdout, "Type 'help' for a list of commands, or 'exit' to quit.\n")?;
    info!("repl started");

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);
                let Some(cmd) = parse_command(trimmed) else {
                    continue;
                };
                if run_command(cmd, &mut calc, &mut stdout)? == Flow::Exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                writeln_ignore_broken_pipe(&mut stdout, "")?;
                farewell(&calc, &mut stdout)?;
                break;
            }
            Err(err) => {
                return Err(anyhow::anyhow!("failed to read input: {err}"));
            }
        }
    }
    info!("repl finished");
    Ok(())
}
