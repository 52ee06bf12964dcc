use chrono::NaiveDate;

use crate::cli::commands;
use crate::cli::output::{styled, MessageKind};
use crate::cli::views::{self, ViewContext};
use crate::cli::CommandError;
use crate::config::Config;
use crate::core::services::{AggregateService, TrancheService};
use crate::core::time::Clock;
use crate::domain::{AggregateKind, DatePreset};
use crate::query::{DashboardParams, TrancheParams};
use crate::storage::{dataset_warnings, Dataset};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

/// Output of one command: the text to print and whether the shell goes on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub text: String,
    pub control: LoopControl,
}

impl CommandOutput {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            control: LoopControl::Continue,
        }
    }

    fn exit() -> Self {
        Self {
            text: String::new(),
            control: LoopControl::Exit,
        }
    }
}

type CommandResult = Result<CommandOutput, CommandError>;

/// Dataset, clock and settings shared by every command of a session.
pub struct ShellContext {
    dataset: Dataset,
    clock: Box<dyn Clock>,
    config: Config,
    source: String,
    pub running: bool,
}

impl ShellContext {
    pub fn new(dataset: Dataset, clock: Box<dyn Clock>, config: Config, source: String) -> Self {
        Self {
            dataset,
            clock,
            config,
            source,
            running: true,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    fn view(&self) -> ViewContext<'_> {
        ViewContext {
            dataset: &self.dataset,
            today: self.today(),
            config: &self.config,
        }
    }

    /// Runs one tokenized command line.
    pub fn dispatch(&mut self, command: &str, args: &[&str]) -> CommandResult {
        let result = match command {
            "dashboard" => self.cmd_dashboard(args),
            "transactions" => self.cmd_transactions(args),
            "dealers" => self.cmd_dealers(args),
            "drill" => self.cmd_drill(args),
            "tranches" => self.cmd_tranches(args),
            "terms" => self.cmd_terms(args),
            "aggregates" => Ok(CommandOutput::text(views::aggregates(&join_query(args)))),
            "toggle" => self.cmd_toggle(args),
            "stats" => self.cmd_stats(args),
            "preset" => self.cmd_preset(args),
            "info" => Ok(self.cmd_info()),
            "help" => self.cmd_help(args),
            "version" => Ok(CommandOutput::text(format!(
                "agfin_core {}",
                env!("CARGO_PKG_VERSION")
            ))),
            "exit" | "quit" => Ok(CommandOutput::exit()),
            other => Err(CommandError::UnknownCommand(other.to_string())),
        };
        if let Ok(output) = &result {
            if output.control == LoopControl::Exit {
                self.running = false;
            }
        }
        result
    }

    fn cmd_dashboard(&self, args: &[&str]) -> CommandResult {
        let params =
            DashboardParams::parse_with_default_tab(&join_query(args), self.config.default_tab)?;
        Ok(CommandOutput::text(views::dashboard(&self.view(), &params)?))
    }

    fn cmd_transactions(&self, args: &[&str]) -> CommandResult {
        let params = DashboardParams::parse(&join_query(args))?;
        Ok(CommandOutput::text(views::transactions(&self.view(), &params)?))
    }

    fn cmd_dealers(&self, args: &[&str]) -> CommandResult {
        let params = DashboardParams::parse(&join_query(args))?;
        Ok(CommandOutput::text(views::dealers(&self.view(), &params)?))
    }

    fn cmd_drill(&self, args: &[&str]) -> CommandResult {
        let (dealer, rest) = args.split_first().ok_or_else(|| usage_error("drill"))?;
        let mut params = DashboardParams::parse(&join_query(rest))?;
        params.drill_into_dealer(dealer);
        let body = views::transactions(&self.view(), &params)?;
        Ok(CommandOutput::text(format!(
            "Query: ?{}\n{}",
            params.to_query_string(),
            body
        )))
    }

    fn cmd_tranches(&self, args: &[&str]) -> CommandResult {
        let params = TrancheParams::parse(&join_query(args))?;
        Ok(CommandOutput::text(views::tranches(&self.view(), &params)?))
    }

    fn cmd_terms(&self, args: &[&str]) -> CommandResult {
        let params = TrancheParams::parse(&join_query(args))?;
        Ok(CommandOutput::text(views::terms(&self.view(), &params)?))
    }

    fn cmd_toggle(&self, args: &[&str]) -> CommandResult {
        let [column, kind, rest @ ..] = args else {
            return Err(usage_error("toggle"));
        };
        let kind = AggregateKind::parse(kind).ok_or_else(|| {
            CommandError::InvalidArguments(format!(
                "unknown aggregate `{}` (expected sum, average, count, min or max)",
                kind
            ))
        })?;
        let encoded = AggregateService::toggle_param(&rest.join(","), column, kind)?;
        let text = if encoded.is_empty() {
            "aggregates cleared".to_string()
        } else {
            format!("aggregates={encoded}")
        };
        Ok(CommandOutput::text(text))
    }

    fn cmd_stats(&self, args: &[&str]) -> CommandResult {
        let (column, rest) = args.split_first().ok_or_else(|| usage_error("stats"))?;
        let params = DashboardParams::parse(&join_query(rest))?;
        Ok(CommandOutput::text(views::stats(&self.view(), column, &params)?))
    }

    fn cmd_preset(&self, args: &[&str]) -> CommandResult {
        let (name, rest) = args.split_first().ok_or_else(|| usage_error("preset"))?;
        let preset: DatePreset = name.parse()?;
        let mut params = DashboardParams::parse(&join_query(rest))?;
        if preset == DatePreset::None {
            params.clear_date_range();
        } else {
            let range = preset.range(self.today()).ok_or_else(|| {
                CommandError::InvalidArguments(
                    "the custom preset has no implied range; pass dateFrom/dateTo instead"
                        .to_string(),
                )
            })?;
            params.set_date_range(&range);
        }
        Ok(CommandOutput::text(format!("?{}", params.to_query_string())))
    }

    fn cmd_info(&self) -> CommandOutput {
        let today = self.today();
        let statuses = self
            .dataset
            .tranches
            .iter()
            .map(|tranche| TrancheService::tranche_status(tranche, today))
            .collect::<Vec<_>>();
        let count = |label: &str| {
            statuses
                .iter()
                .filter(|status| status.as_str() == label)
                .count()
        };
        let mut lines = vec![
            format!("Data source: {}", self.source),
            format!("Today: {}", today),
            format!(
                "Dealers: {}  Transactions: {}  Tranches: {} ({} active, {} upcoming, {} expired)",
                self.dataset.dealers.len(),
                self.dataset.transactions.len(),
                self.dataset.tranches.len(),
                count("active"),
                count("upcoming"),
                count("expired"),
            ),
        ];
        for warning in dataset_warnings(&self.dataset) {
            lines.push(styled(MessageKind::Warning, warning));
        }
        CommandOutput::text(lines.join("\n"))
    }

    fn cmd_help(&self, args: &[&str]) -> CommandResult {
        match args.first() {
            None => Ok(CommandOutput::text(commands::overview())),
            Some(name) => commands::find(name)
                .map(|entry| CommandOutput::text(commands::detail(entry)))
                .ok_or_else(|| CommandError::UnknownCommand(name.to_string())),
        }
    }
}

/// Query arguments may be split across tokens: `dealerFilter=x typeFilter=y`.
fn join_query(args: &[&str]) -> String {
    args.join("&")
}

fn usage_error(command: &str) -> CommandError {
    let usage = commands::find(command)
        .map(|entry| entry.usage)
        .unwrap_or(command);
    CommandError::InvalidArguments(format!("usage: {usage}"))
}
