// completion.rs

use rustyline::completion::{Completer, FilenameCompleter, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Context, Helper};

use crate::operations::Operation;
use crate::parser::KEYWORDS;

/// Completes command words, and file paths after `save` / `load`.
pub struct CommandCompleter {
    files: FilenameCompleter,
}

impl CommandCompleter {
    pub fn new() -> Self {
        Self {
            files: FilenameCompleter::new(),
        }
    }
}

impl Default for CommandCompleter {
    fn default() -> Self {
        Self::new()
    }
}

/// Command words starting with `prefix`, sorted and deduplicated.
pub fn command_candidates(prefix: &str) -> Vec<String> {
    let prefix = prefix.to_lowercase();
    let mut names: Vec<String> = Operation::names()
        .chain(KEYWORDS)
        .filter(|name| name.starts_with(&prefix))
        .map(str::to_string)
        .collect();
    names.sort();
    names.dedup();
    names
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Result<(usize, Vec<Pair>), ReadlineError> {
        let before = &line[..pos];
        let start = before.len() - before.trim_start().len();
        let typed = &before[start..];

        if let Some((head, _)) = typed.split_once(char::is_whitespace) {
            if matches!(head.to_lowercase().as_str(), "save" | "load") {
                return self.files.complete(line, pos, ctx);
            }
            return Ok((pos, Vec::new()));
        }

        let completions = command_candidates(typed)
            .into_iter()
            .map(|n| Pair {
                display: n.clone(),
                replacement: format!("{} ", n),
            })
            .collect();
        Ok((start, completions))
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;
    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<String> {
        None
    }
}

impl Highlighter for CommandCompleter {}

impl Validator for CommandCompleter {
    fn validate(&self, _ctx: &mut ValidationContext) -> Result<ValidationResult, ReadlineError> {
        Ok(ValidationResult::Valid(None))
    }
}

impl Helper for CommandCompleter {}
