/// Static description of a shell command, used by `help`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandEntry {
    pub name: &'static str,
    pub usage: &'static str,
    pub description: &'static str,
}

pub const COMMANDS: &[CommandEntry] = &[
    CommandEntry {
        name: "dashboard",
        usage: "dashboard [QUERY]",
        description: "Show the tab named by `tab=` (or the configured default)",
    },
    CommandEntry {
        name: "transactions",
        usage: "transactions [QUERY]",
        description: "List transactions matching dealer, grower, type and date filters",
    },
    CommandEntry {
        name: "dealers",
        usage: "dealers [QUERY]",
        description: "Summarize transactions per dealer for a date range",
    },
    CommandEntry {
        name: "drill",
        usage: "drill <DEALER> [QUERY]",
        description: "Open the transactions of one dealer",
    },
    CommandEntry {
        name: "tranches",
        usage: "tranches [QUERY]",
        description: "List tranches by dealer, label and status",
    },
    CommandEntry {
        name: "terms",
        usage: "terms [QUERY]",
        description: "List tranche terms by tranche label and status",
    },
    CommandEntry {
        name: "aggregates",
        usage: "aggregates [ENCODED]",
        description: "Decode an `aggregates` parameter and report ignored tokens",
    },
    CommandEntry {
        name: "toggle",
        usage: "toggle <COLUMN> <KIND> [ENCODED]",
        description: "Toggle one column aggregate and print the new parameter",
    },
    CommandEntry {
        name: "stats",
        usage: "stats <COLUMN> [QUERY]",
        description: "Preview every aggregate of a transaction column",
    },
    CommandEntry {
        name: "preset",
        usage: "preset <none|last-week|last-month|last-year> [QUERY]",
        description: "Apply a date preset relative to today and print the query",
    },
    CommandEntry {
        name: "info",
        usage: "info",
        description: "Show the data source, today's date and dataset warnings",
    },
    CommandEntry {
        name: "help",
        usage: "help [COMMAND]",
        description: "Show available commands",
    },
    CommandEntry {
        name: "version",
        usage: "version",
        description: "Print the version",
    },
    CommandEntry {
        name: "exit",
        usage: "exit",
        description: "Stop reading commands",
    },
];

pub fn find(name: &str) -> Option<&'static CommandEntry> {
    COMMANDS.iter().find(|entry| entry.name == name)
}

pub fn overview() -> String {
    let mut lines = vec!["Available commands:".to_string()];
    for entry in COMMANDS {
        lines.push(format!("  {:<14} {}", entry.name, entry.description));
    }
    lines.push("Use `help <command>` for details.".to_string());
    lines.join("\n")
}

pub fn detail(entry: &CommandEntry) -> String {
    format!(
        "{}\n  Description: {}\n  Usage: {}",
        entry.name, entry.description, entry.usage
    )
}
