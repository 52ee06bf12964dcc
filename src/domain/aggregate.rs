//! Column aggregate selections and their compact `column:kind,column:kind` encoding.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{DashboardError, Result};

const PAIR_SEPARATOR: char = ',';
const KIND_SEPARATOR: char = ':';

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AggregateKind {
    Sum,
    Average,
    Count,
    Min,
    Max,
}

impl AggregateKind {
    /// Display order used by the column popover.
    pub const ALL: [AggregateKind; 5] = [
        AggregateKind::Sum,
        AggregateKind::Average,
        AggregateKind::Count,
        AggregateKind::Min,
        AggregateKind::Max,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateKind::Sum => "sum",
            AggregateKind::Average => "average",
            AggregateKind::Count => "count",
            AggregateKind::Min => "min",
            AggregateKind::Max => "max",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AggregateKind::Sum => "Sum",
            AggregateKind::Average => "Avg",
            AggregateKind::Count => "Count",
            AggregateKind::Min => "Min",
            AggregateKind::Max => "Max",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == raw)
    }
}

impl fmt::Display for AggregateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mapping of column id to aggregate kind. Keys are unique and keep their
/// insertion order so that encoding is stable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(
    try_from = "Vec<(String, AggregateKind)>",
    into = "Vec<(String, AggregateKind)>"
)]
pub struct AggregateSelection {
    entries: Vec<(String, AggregateKind)>,
}

impl TryFrom<Vec<(String, AggregateKind)>> for AggregateSelection {
    type Error = DashboardError;

    fn try_from(entries: Vec<(String, AggregateKind)>) -> Result<Self> {
        let mut selection = Self::new();
        for (column_id, kind) in entries {
            selection.set(&column_id, kind)?;
        }
        Ok(selection)
    }
}

impl From<AggregateSelection> for Vec<(String, AggregateKind)> {
    fn from(selection: AggregateSelection) -> Self {
        selection.entries
    }
}

impl AggregateSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, column_id: &str) -> Option<AggregateKind> {
        self.entries
            .iter()
            .find(|(column, _)| column == column_id)
            .map(|(_, kind)| *kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, AggregateKind)> {
        self.entries
            .iter()
            .map(|(column, kind)| (column.as_str(), *kind))
    }

    /// Selects `kind` for `column_id`. Ids that could not survive encoding
    /// (empty, or containing `:` or `,`) are rejected.
    pub fn set(&mut self, column_id: &str, kind: AggregateKind) -> Result<()> {
        if column_id.is_empty() {
            return Err(DashboardError::InvalidInput(
                "aggregate column id must not be empty".into(),
            ));
        }
        if column_id.contains(&[KIND_SEPARATOR, PAIR_SEPARATOR][..]) {
            return Err(DashboardError::InvalidInput(format!(
                "aggregate column id `{column_id}` must not contain `:` or `,`"
            )));
        }
        self.upsert(column_id, kind);
        Ok(())
    }

    pub fn remove(&mut self, column_id: &str) -> Option<AggregateKind> {
        let idx = self
            .entries
            .iter()
            .position(|(column, _)| column == column_id)?;
        Some(self.entries.remove(idx).1)
    }

    fn upsert(&mut self, column_id: &str, kind: AggregateKind) {
        match self.entries.iter_mut().find(|(column, _)| column == column_id) {
            Some(entry) => entry.1 = kind,
            None => self.entries.push((column_id.to_string(), kind)),
        }
    }

    /// Joins `column:kind` pairs with `,` in insertion order.
    pub fn encode(&self) -> String {
        self.entries
            .iter()
            .map(|(column, kind)| format!("{}{}{}", column, KIND_SEPARATOR, kind))
            .collect::<Vec<_>>()
            .join(&PAIR_SEPARATOR.to_string())
    }

    /// Lenient inverse of [`encode`](Self::encode). Unusable tokens are
    /// reported in [`DecodedAggregates::ignored`] instead of failing.
    pub fn decode(encoded: &str) -> DecodedAggregates {
        let mut decoded = DecodedAggregates::default();
        for token in encoded.split(PAIR_SEPARATOR) {
            if token.is_empty() {
                continue;
            }
            let Some((column, kind)) = token.split_once(KIND_SEPARATOR) else {
                decoded.ignore(token, IgnoreReason::MissingSeparator);
                continue;
            };
            if column.is_empty() {
                decoded.ignore(token, IgnoreReason::EmptyColumn);
            } else if kind.is_empty() {
                decoded.ignore(token, IgnoreReason::EmptyKind);
            } else {
                match AggregateKind::parse(kind) {
                    Some(kind) => decoded.selection.upsert(column, kind),
                    None => decoded.ignore(token, IgnoreReason::UnknownKind),
                }
            }
        }
        decoded
    }
}

impl PartialEq for AggregateSelection {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(column, kind)| other.get(column) == Some(kind))
    }
}

impl fmt::Display for AggregateSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    MissingSeparator,
    EmptyColumn,
    EmptyKind,
    UnknownKind,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            IgnoreReason::MissingSeparator => "missing `:` separator",
            IgnoreReason::EmptyColumn => "empty column id",
            IgnoreReason::EmptyKind => "empty aggregate kind",
            IgnoreReason::UnknownKind => "unknown aggregate kind",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoredToken {
    pub token: String,
    pub reason: IgnoreReason,
}

/// Result of decoding an `aggregates` parameter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedAggregates {
    pub selection: AggregateSelection,
    pub ignored: Vec<IgnoredToken>,
}

impl DecodedAggregates {
    fn ignore(&mut self, token: &str, reason: IgnoreReason) {
        self.ignored.push(IgnoredToken {
            token: token.to_string(),
            reason,
        });
    }
}
