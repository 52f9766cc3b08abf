// config.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{CalcError, CalcResult};

/// Settings for one calculator session.
///
/// Built once at startup and handed to the [`Calculator`](crate::calculator::Calculator),
/// which passes the relevant pieces to the history log and the input validator.
#[derive(Clone, Debug, PartialEq)]
pub struct CalculatorConfig {
    pub log_dir: PathBuf,
    pub history_dir: PathBuf,
    pub history_file: PathBuf,
    pub max_history_size: usize,
    pub auto_save: bool,
    /// Fractional digits kept when storing non-integral results.
    pub precision: usize,
    pub max_input_value: f64,
    /// Undo steps kept before the oldest are forgotten.
    pub max_undo_depth: usize,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            history_dir: PathBuf::from("data"),
            history_file: PathBuf::from("data").join("history.csv"),
            max_history_size: 1000,
            auto_save: true,
            precision: 6,
            max_input_value: 1e308,
            max_undo_depth: 1000,
        }
    }
}

impl CalculatorConfig {
    /// Reads `CALCULATOR_*` environment variables and a `.env` file in the
    /// working directory, falling back to defaults.
    pub fn from_env() -> CalcResult<Self> {
        Self::from_env_file(Path::new(".env"))
    }

    /// Like [`from_env`](Self::from_env) with an explicit dotenv file. Variables
    /// already set in the process win over the file. A missing file is skipped.
    pub fn from_env_file(path: &Path) -> CalcResult<Self> {
        let file_vars = read_dotenv(path)?;
        Self::from_lookup(|key| {
            std::env::var(key)
                .ok()
                .or_else(|| file_vars.get(key).cloned())
        })
    }

    pub fn from_lookup<F>(lookup: F) -> CalcResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let log_dir = lookup("CALCULATOR_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.log_dir);
        let history_dir = lookup("CALCULATOR_HISTORY_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.history_dir);
        let history_file = lookup("CALCULATOR_HISTORY_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| history_dir.join("history.csv"));

        let max_history_size = parse_or(
            &lookup,
            "CALCULATOR_MAX_HISTORY_SIZE",
            defaults.max_history_size,
        )?;
        if max_history_size == 0 {
            return Err(CalcError::Configuration(
                "CALCULATOR_MAX_HISTORY_SIZE must be positive".to_string(),
            ));
        }

        let auto_save = match lookup("CALCULATOR_AUTO_SAVE") {
            Some(raw) => matches!(
                raw.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes"
            ),
            None => defaults.auto_save,
        };

        let precision = parse_or(&lookup, "CALCULATOR_PRECISION", defaults.precision)?;

        let max_input_value: f64 = parse_or(
            &lookup,
            "CALCULATOR_MAX_INPUT_VALUE",
            defaults.max_input_value,
        )?;
        if max_input_value.is_nan() || max_input_value <= 0.0 {
            return Err(CalcError::Configuration(
                "CALCULATOR_MAX_INPUT_VALUE must be positive".to_string(),
            ));
        }

        let max_undo_depth =
            parse_or(&lookup, "CALCULATOR_MAX_UNDO_DEPTH", defaults.max_undo_depth)?;
        if max_undo_depth == 0 {
            return Err(CalcError::Configuration(
                "CALCULATOR_MAX_UNDO_DEPTH must be positive".to_string(),
            ));
        }

        Ok(Self {
            log_dir,
            history_dir,
            history_file,
            max_history_size,
            auto_save,
            precision,
            max_input_value,
            max_undo_depth,
        })
    }

    pub fn ensure_dirs(&self) -> CalcResult<()> {
        std::fs::create_dir_all(&self.log_dir)?;
        std::fs::create_dir_all(&self.history_dir)?;
        Ok(())
    }
}

fn read_dotenv(path: &Path) -> CalcResult<HashMap<String, String>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    dotenvy::from_path_iter(path)
        .and_then(|iter| iter.collect::<Result<HashMap<_, _>, _>>())
        .map_err(|e| CalcError::Configuration(format!("{}: {e}", path.display())))
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> CalcResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| CalcError::Configuration(format!("{key}: cannot parse '{raw}'"))),
        None => Ok(default),
    }
}
