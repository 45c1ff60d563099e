//! Terminal front end: loads an input snapshot and prints the month grid.

mod render;

use std::{env, fs, path::PathBuf, sync::Arc};

use chrono::NaiveDate;

use crate::{
    calendar::{Clock, ManualClock, SystemClock},
    config::ConfigManager,
    errors::{EngineError, Result},
    view::{BudgetInputs, BudgetView},
};

pub use render::GridRenderer;

pub const USAGE: &str =
    "Usage: budget_calendar_cli <inputs.json> [--today YYYY-MM-DD] [--config PATH] [--plain]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOptions {
    pub inputs: PathBuf,
    pub today: Option<NaiveDate>,
    pub config: Option<PathBuf>,
    pub plain: bool,
}

impl CliOptions {
    pub fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut inputs = None;
        let mut today = None;
        let mut config = None;
        let mut plain = false;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--today" => {
                    let value = flag_value(&mut args, "--today")?;
                    let date = NaiveDate::parse_from_str(&value, "%Y-%m-%d").map_err(|_| {
                        EngineError::InvalidInput(format!("`{value}` is not a YYYY-MM-DD date"))
                    })?;
                    today = Some(date);
                }
                "--config" => config = Some(PathBuf::from(flag_value(&mut args, "--config")?)),
                "--plain" => plain = true,
                flag if flag.starts_with("--") => {
                    return Err(EngineError::InvalidInput(format!(
                        "unknown option `{flag}`\n{USAGE}"
                    )));
                }
                _ if inputs.is_none() => inputs = Some(PathBuf::from(&arg)),
                _ => {
                    return Err(EngineError::InvalidInput(format!(
                        "unexpected argument `{arg}`\n{USAGE}"
                    )));
                }
            }
        }

        let inputs =
            inputs.ok_or_else(|| EngineError::InvalidInput(format!("missing inputs file\n{USAGE}")))?;
        Ok(Self {
            inputs,
            today,
            config,
            plain,
        })
    }
}

fn flag_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    args.next()
        .ok_or_else(|| EngineError::InvalidInput(format!("{flag} needs a value\n{USAGE}")))
}

/// Builds the view described by `options` and returns the rendered month.
pub fn render_month(options: &CliOptions) -> Result<String> {
    let manager = match &options.config {
        Some(path) => ConfigManager::at_path(path.clone()),
        None => ConfigManager::new()?,
    };
    let config = manager.load()?;

    let data = fs::read_to_string(&options.inputs)?;
    let inputs: BudgetInputs = serde_json::from_str(&data)?;

    let clock: Arc<dyn Clock> = match options.today {
        Some(today) => Arc::new(ManualClock::new(today)),
        None => Arc::new(SystemClock),
    };
    let mut view = BudgetView::new(config, clock);
    view.load_inputs(inputs)?;

    let renderer = GridRenderer::new(view.config());
    let renderer = if options.plain {
        renderer.plain()
    } else {
        renderer
    };
    Ok(renderer.render(view.snapshot()))
}

/// Entry point for the binary; reads arguments from the process environment.
pub fn run_cli() -> Result<()> {
    let options = CliOptions::parse(env::args().skip(1))?;
    if options.plain {
        colored::control::set_override(false);
    }
    print!("{}", render_month(&options)?);
    Ok(())
}
