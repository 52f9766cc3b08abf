// parser.rs

use std::path::PathBuf;

#[derive(Clone, PartialEq, Debug)]
pub enum Command {
    Calculate { op: String, operands: Vec<String> },
    History,
    Clear,
    Undo,
    Redo,
    Save(Option<PathBuf>),
    Load(Option<PathBuf>),
    Help,
    Exit,
    Unknown(String),
}

/// Command words that are not arithmetic operations.
pub const KEYWORDS: [&str; 9] = [
    "history", "clear", "undo", "redo", "save", "load", "help", "exit", "quit",
];

/// Splits a line on whitespace, keeping single- or double-quoted runs together
/// so that paths with spaces survive.
pub fn split_words(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut cur = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();
    while let Some(ch) = chars.next() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => cur.push(ch),
            None => match ch {
                '\'' | '"' => {
                    quote = Some(ch);
                    in_word = true;
                }
                '\\' => {
                    if let Some(next) = chars.next() {
                        cur.push(next);
                    }
                    in_word = true;
                }
                c if c.is_whitespace() => {
                    if in_word {
                        words.push(std::mem::take(&mut cur));
                        in_word = false;
                    }
                }
                _ => {
                    cur.push(ch);
                    in_word = true;
                }
            },
        }
    }
    if in_word {
        words.push(cur);
    }
    words
}

/// Parses one REPL line. Blank lines yield `None`.
///
/// Any word that is not a keyword is treated as an operation name; whether the
/// operation exists is decided by the calculator.
pub fn parse_command(line: &str) -> Option<Command> {
    let mut words = split_words(line).into_iter();
    let head = words.next()?.to_lowercase();
    let rest: Vec<String> = words.collect();
    let path = rest.first().map(PathBuf::from);

    let cmd = match head.as_str() {
        "history" => Command::History,
        "clear" => Command::Clear,
        "undo" => Command::Undo,
        "redo" => Command::Redo,
        "save" => Command::Save(path),
        "load" => Command::Load(path),
        "help" => Command::Help,
        "exit" | "quit" => Command::Exit,
        _ if is_operation_name(&head) => Command::Calculate {
            op: head.clone(),
            operands: rest,
        },
        _ => Command::Unknown(head.clone()),
    };
    Some(cmd)
}

fn is_operation_name(word: &str) -> bool {
    crate::operations::Operation::names().any(|name| name == word)
}
