// main.rs

use anyhow::{Context, Result};
use calc_history::{logging, repl, Calculator, CalculatorConfig};

fn main() -> Result<()> {
    let config = CalculatorConfig::from_env().context("invalid calculator configuration")?;
    config
        .ensure_dirs()
        .context("cannot create data directories")?;

    let _log_guard = logging::init(&config.log_dir)
        .with_context(|| format!("cannot open logs in {}", config.log_dir.display()))?;

    let calc = Calculator::with_default_sinks(config);
    repl::start_repl(calc)
}
