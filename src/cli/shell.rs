use std::{
    env,
    io::{self, BufRead},
    path::PathBuf,
};

use shell_words::split;

use crate::cli::context::{LoopControl, ShellContext};
use crate::cli::output::{self, OutputPreferences};
use crate::cli::{CliError, CommandError};
use crate::config::{Config, ConfigManager};
use crate::core::time::{Clock, FixedClock, SystemClock};
use crate::domain::date_range::parse_url_date;
use crate::storage::{DataSource, JsonDataSource, SampleDataSource};

const DATA_ENV: &str = "AGFIN_DATA";
const TODAY_ENV: &str = "AGFIN_TODAY";

/// Global flags accepted before the command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOptions {
    pub data: Option<PathBuf>,
    pub today: Option<String>,
    pub plain: bool,
    /// A one-shot command; empty means read commands from stdin.
    pub command: Vec<String>,
}

pub fn parse_options<I>(args: I) -> Result<CliOptions, CliError>
where
    I: IntoIterator<Item = String>,
{
    let mut options = CliOptions::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--data" => {
                let path = args
                    .next()
                    .ok_or_else(|| CliError::Usage("--data requires a path".into()))?;
                options.data = Some(PathBuf::from(path));
            }
            "--today" => {
                let today = args
                    .next()
                    .ok_or_else(|| CliError::Usage("--today requires a YYYY-MM-DD date".into()))?;
                options.today = Some(today);
            }
            "--plain" => options.plain = true,
            _ => {
                options.command.push(arg);
                options.command.extend(args);
                break;
            }
        }
    }
    Ok(options)
}

pub fn run_cli<I>(args: I) -> Result<(), CliError>
where
    I: IntoIterator<Item = String>,
{
    let options = parse_options(args)?;
    output::set_preferences(OutputPreferences {
        plain_mode: options.plain,
    });

    let config = load_config();
    let source = data_source(&options, &config);
    let dataset = source.load()?;
    tracing::info!(source = %source.describe(), "dataset loaded");

    let mut context = ShellContext::new(dataset, clock(&options)?, config, source.describe());

    if options.command.is_empty() {
        run_script(&mut context)
    } else {
        let args: Vec<&str> = options.command.iter().skip(1).map(String::as_str).collect();
        let command = options.command[0].to_lowercase();
        let output = context.dispatch(&command, &args)?;
        print_output(&output.text);
        Ok(())
    }
}

fn load_config() -> Config {
    match ConfigManager::new().and_then(|manager| manager.load()) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(error = %err, "falling back to default configuration");
            Config::default()
        }
    }
}

/// `--data`, then `AGFIN_DATA`, then the configured path, then the built-in sample.
fn data_source(options: &CliOptions, config: &Config) -> Box<dyn DataSource> {
    let path = options
        .data
        .clone()
        .or_else(|| env::var_os(DATA_ENV).map(PathBuf::from))
        .or_else(|| config.dataset_path.clone());
    match path {
        Some(path) => Box::new(JsonDataSource::new(path)),
        None => Box::new(SampleDataSource),
    }
}

fn clock(options: &CliOptions) -> Result<Box<dyn Clock>, CliError> {
    let raw = options.today.clone().or_else(|| env::var(TODAY_ENV).ok());
    match parse_url_date(raw.as_deref())? {
        Some(today) => Ok(Box::new(FixedClock(today))),
        None => Ok(Box::new(SystemClock)),
    }
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        if !context.running {
            break;
        }
        let line = line?;
        match handle_line(context, &line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => report_error(&err),
        }
    }
    Ok(())
}

fn handle_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CommandError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(LoopControl::Continue);
    }
    let tokens = match split(trimmed) {
        Ok(tokens) => tokens,
        Err(err) => {
            output::warning(err);
            return Ok(LoopControl::Continue);
        }
    };
    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };
    let command = raw.to_lowercase();
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();

    let output = context.dispatch(&command, &args)?;
    print_output(&output.text);
    Ok(output.control)
}

fn print_output(text: &str) {
    if !text.is_empty() {
        println!("{}", text);
    }
}

fn report_error(err: &CommandError) {
    output::error(err);
    if matches!(err, CommandError::InvalidArguments(_)) {
        output::info("Use `help <command>` for usage details.");
    }
}
