//! Financing facilities ("tranches") extended to dealers and their time-bounded terms.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::common::*;
use crate::domain::dealer::Dealer;

/// Interest rate attached to a term. Variants are only ever formatted, never
/// combined arithmetically.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Rate {
    /// Decimal fraction: `0.065` is 6.5%.
    Fixed { rate: f64 },
    /// Margin in percentage points over the floating prime rate: `2.5` is prime + 2.5%.
    PrimePlus { value: f64 },
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rate::Fixed { rate } => write!(f, "{:.2}% Fixed", rate * 100.0),
            Rate::PrimePlus { value } => write!(f, "Prime + {:.2}%", value),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrancheTerm {
    pub id: String,
    pub tranche_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub on_board_date: NaiveDate,
    pub retailer_rate: Rate,
    pub grower_rate: Rate,
}

impl Identifiable for TrancheTerm {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tranche {
    pub id: String,
    pub label: String,
    #[serde(rename = "dealerId")]
    pub dealer: Dealer,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_board_date: Option<NaiveDate>,
    #[serde(default)]
    pub tranche_terms: Vec<TrancheTerm>,
}

impl Tranche {
    /// Earliest term start and latest term end, or `None` for a tranche without terms.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let start = self.tranche_terms.iter().map(|term| term.start_date).min()?;
        let end = self.tranche_terms.iter().map(|term| term.end_date).max()?;
        Some((start, end))
    }

    /// Retailer and grower rates of the first term.
    pub fn primary_rates(&self) -> Option<(Rate, Rate)> {
        self.tranche_terms
            .first()
            .map(|term| (term.retailer_rate, term.grower_rate))
    }
}

impl Identifiable for Tranche {
    fn id(&self) -> &str {
        &self.id
    }
}

impl NamedEntity for Tranche {
    fn name(&self) -> &str {
        &self.label
    }
}

/// Lifecycle state derived from "today" on every query.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TrancheStatus {
    Active,
    Expired,
    Upcoming,
}

impl TrancheStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrancheStatus::Active => "active",
            TrancheStatus::Expired => "expired",
            TrancheStatus::Upcoming => "upcoming",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TrancheStatus::Active => "Active",
            TrancheStatus::Expired => "Expired",
            TrancheStatus::Upcoming => "Upcoming",
        }
    }
}

impl fmt::Display for TrancheStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Status selector from the `status` query parameter. Values outside the
/// known set are kept verbatim and match nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum StatusFilter {
    #[default]
    All,
    Only(TrancheStatus),
    Unrecognized(String),
}

impl StatusFilter {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "" | "all" => StatusFilter::All,
            "active" => StatusFilter::Only(TrancheStatus::Active),
            "expired" => StatusFilter::Only(TrancheStatus::Expired),
            "upcoming" => StatusFilter::Only(TrancheStatus::Upcoming),
            other => StatusFilter::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Only(status) => status.as_str(),
            StatusFilter::Unrecognized(raw) => raw,
        }
    }

    pub fn matches(&self, status: TrancheStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(expected) => *expected == status,
            StatusFilter::Unrecognized(_) => false,
        }
    }
}

impl From<String> for StatusFilter {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_fixed_and_prime_plus_rates() {
        assert_eq!(Rate::Fixed { rate: 0.065 }.to_string(), "6.50% Fixed");
        assert_eq!(Rate::PrimePlus { value: 2.5 }.to_string(), "Prime + 2.50%");
        assert_eq!(Rate::Fixed { rate: 0.0 }.to_string(), "0.00% Fixed");
    }

    #[test]
    fn rate_uses_type_tag_on_the_wire() {
        let rate: Rate = serde_json::from_str(r#"{"type":"prime-plus","value":1.8}"#).unwrap();
        assert_eq!(rate, Rate::PrimePlus { value: 1.8 });
        let json = serde_json::to_string(&Rate::Fixed { rate: 0.075 }).unwrap();
        assert_eq!(json, r#"{"type":"fixed","rate":0.075}"#);
    }

    #[test]
    fn status_filter_keeps_unknown_values_as_non_matching() {
        assert_eq!(StatusFilter::parse("all"), StatusFilter::All);
        let filter = StatusFilter::parse("archived");
        assert_eq!(filter.as_str(), "archived");
        assert!(!filter.matches(TrancheStatus::Active));
        assert!(!filter.matches(TrancheStatus::Expired));
        assert!(StatusFilter::parse("upcoming").matches(TrancheStatus::Upcoming));
    }
}
