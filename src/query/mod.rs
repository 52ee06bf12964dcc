//! URL search parameters of the dashboard pages. Values arrive as plain
//! strings; parsing is lenient so that stale or hand-edited links still load.

pub mod active_filters;

use std::collections::HashSet;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize, Serializer};

use crate::core::services::{AggregateService, TermFilter, TrancheFilter, TransactionFilter};
use crate::domain::aggregate::DecodedAggregates;
use crate::domain::date_range::DateRange;
use crate::domain::tranche::StatusFilter;
use crate::domain::transaction::TypeFilter;
use crate::errors::Result;

pub use active_filters::{ActiveFilter, ActiveFilterOptions};

/// View selector of the dealers & transactions page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum Tab {
    #[default]
    Transactions,
    Dealers,
}

impl Tab {
    pub fn as_query_value(self) -> &'static str {
        match self {
            Tab::Transactions => "transactions",
            Tab::Dealers => "dealers",
        }
    }
}

impl Serialize for Tab {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_query_value())
    }
}

impl From<String> for Tab {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "dealers" => Tab::Dealers,
            _ => Tab::Transactions,
        }
    }
}

/// View selector of the tranches page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum TrancheTab {
    #[default]
    Tranches,
    Terms,
}

impl TrancheTab {
    pub fn as_query_value(self) -> &'static str {
        match self {
            TrancheTab::Tranches => "tranches",
            TrancheTab::Terms => "terms",
        }
    }
}

impl From<String> for TrancheTab {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "terms" => TrancheTab::Terms,
            _ => TrancheTab::Tranches,
        }
    }
}

fn strip_question_mark(query: &str) -> &str {
    query.strip_prefix('?').unwrap_or(query)
}

/// Decoded key/value pairs. A repeated key keeps its first value.
fn first_values(query: &str) -> Result<Vec<(String, String)>> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(strip_question_mark(query))?;
    let mut seen = HashSet::new();
    Ok(pairs
        .into_iter()
        .filter(|(key, _)| seen.insert(key.clone()))
        .collect())
}

fn params_from_pairs<T: DeserializeOwned>(pairs: &[(String, String)]) -> Result<T> {
    let encoded = serde_urlencoded::to_string(pairs)?;
    Ok(serde_urlencoded::from_str(&encoded)?)
}

/// Parameters of the dealers & transactions page.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardParams {
    pub tab: Tab,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub dealer_filter: String,
    pub grower_filter: String,
    pub type_filter: TypeFilter,
    /// Encoded `column:kind,column:kind` selection.
    pub aggregates: String,
}

impl DashboardParams {
    pub fn parse(query: &str) -> Result<Self> {
        params_from_pairs(&first_values(query)?)
    }

    /// Like [`DashboardParams::parse`], opening `default_tab` when the query names no tab.
    pub fn parse_with_default_tab(query: &str, default_tab: Tab) -> Result<Self> {
        let pairs = first_values(query)?;
        let mut params: Self = params_from_pairs(&pairs)?;
        if !pairs.iter().any(|(key, _)| key == "tab") {
            params.tab = default_tab;
        }
        Ok(params)
    }

    /// Re-encodes the parameters, leaving out values equal to their defaults.
    pub fn to_query_string(&self) -> String {
        let mut pairs: Vec<(&str, &str)> = Vec::new();
        if self.tab != Tab::default() {
            pairs.push(("tab", self.tab.as_query_value()));
        }
        if let Some(date_from) = self.date_from.as_deref() {
            pairs.push(("dateFrom", date_from));
        }
        if let Some(date_to) = self.date_to.as_deref() {
            pairs.push(("dateTo", date_to));
        }
        if !self.dealer_filter.is_empty() {
            pairs.push(("dealerFilter", self.dealer_filter.as_str()));
        }
        if !self.grower_filter.is_empty() {
            pairs.push(("growerFilter", self.grower_filter.as_str()));
        }
        if self.type_filter != TypeFilter::All {
            pairs.push(("typeFilter", self.type_filter.as_str()));
        }
        if !self.aggregates.is_empty() {
            pairs.push(("aggregates", self.aggregates.as_str()));
        }
        serde_urlencoded::to_string(pairs).unwrap_or_default()
    }

    pub fn date_range(&self) -> Result<DateRange> {
        DateRange::from_query(self.date_from.as_deref(), self.date_to.as_deref())
    }

    pub fn set_date_range(&mut self, range: &DateRange) {
        let (from, to) = range.to_query();
        self.date_from = from;
        self.date_to = to;
    }

    pub fn clear_date_range(&mut self) {
        self.date_from = None;
        self.date_to = None;
    }

    /// Criteria of the transactions tab.
    pub fn transaction_filter(&self) -> Result<TransactionFilter> {
        Ok(TransactionFilter::default()
            .with_dealer(self.dealer_filter.clone())
            .with_grower(self.grower_filter.clone())
            .with_type(self.type_filter.clone())
            .with_date_range(self.date_range()?))
    }

    pub fn aggregate_selection(&self) -> DecodedAggregates {
        AggregateService::decode(&self.aggregates)
    }

    /// Jumps from a dealer row to that dealer's transactions.
    pub fn drill_into_dealer(&mut self, dealer_name: &str) {
        self.tab = Tab::Transactions;
        self.dealer_filter = dealer_name.to_string();
        self.grower_filter.clear();
        self.type_filter = TypeFilter::All;
    }
}

/// Parameters of the tranches page.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrancheParams {
    pub tab: TrancheTab,
    pub dealer_filter: String,
    pub label_filter: String,
    pub tranche_filter: String,
    pub status: StatusFilter,
}

impl TrancheParams {
    pub fn parse(query: &str) -> Result<Self> {
        params_from_pairs(&first_values(query)?)
    }

    pub fn to_query_string(&self) -> String {
        let mut pairs: Vec<(&str, &str)> = Vec::new();
        if self.tab != TrancheTab::default() {
            pairs.push(("tab", self.tab.as_query_value()));
        }
        if !self.dealer_filter.is_empty() {
            pairs.push(("dealerFilter", self.dealer_filter.as_str()));
        }
        if !self.label_filter.is_empty() {
            pairs.push(("labelFilter", self.label_filter.as_str()));
        }
        if !self.tranche_filter.is_empty() {
            pairs.push(("trancheFilter", self.tranche_filter.as_str()));
        }
        if self.status != StatusFilter::All {
            pairs.push(("status", self.status.as_str()));
        }
        serde_urlencoded::to_string(pairs).unwrap_or_default()
    }

    pub fn tranche_filter(&self) -> TrancheFilter {
        TrancheFilter {
            dealer: self.dealer_filter.clone(),
            label: self.label_filter.clone(),
            status: self.status.clone(),
        }
    }

    pub fn term_filter(&self) -> TermFilter {
        TermFilter {
            tranche: self.tranche_filter.clone(),
            status: self.status.clone(),
        }
    }

    /// Jumps from a tranche's term count to the terms tab filtered to it.
    pub fn drill_into_terms(&mut self, tranche_label: &str) {
        self.tab = TrancheTab::Terms;
        self.tranche_filter = tranche_label.to_string();
        self.dealer_filter.clear();
        self.label_filter.clear();
    }

    pub fn clear_filters(&mut self) {
        self.dealer_filter.clear();
        self.label_filter.clear();
        self.tranche_filter.clear();
        self.status = StatusFilter::All;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tranche::TrancheStatus;
    use crate::domain::transaction::TransactionType;
    use crate::errors::DashboardError;

    #[test]
    fn empty_query_yields_defaults() {
        let params = DashboardParams::parse("").unwrap();
        assert_eq!(params, DashboardParams::default());
        assert_eq!(params.tab, Tab::Transactions);
        assert_eq!(params.type_filter, TypeFilter::All);
        assert!(params.date_range().unwrap().is_unbounded());
        assert_eq!(params.to_query_string(), "");
    }

    #[test]
    fn parses_every_parameter() {
        let params = DashboardParams::parse(
            "?tab=dealers&dateFrom=2024-01-01&dateTo=2024-06-30&dealerFilter=Green%20Valley\
             &growerFilter=smith&typeFilter=product-return\
             &aggregates=amountDrawn%3Asum%2CcfiMargin%3Amax",
        )
        .unwrap();
        assert_eq!(params.tab, Tab::Dealers);
        assert_eq!(params.dealer_filter, "Green Valley");
        assert_eq!(params.type_filter, TypeFilter::Only(TransactionType::ProductReturn));
        assert_eq!(params.aggregates, "amountDrawn:sum,cfiMargin:max");
        assert_eq!(params.aggregate_selection().selection.len(), 2);

        let filter = params.transaction_filter().unwrap();
        assert_eq!(filter.grower, "smith");
        assert!(filter.date_range.from.is_some());
    }

    #[test]
    fn lenient_on_unknown_enum_values() {
        let params = DashboardParams::parse("tab=overview&typeFilter=refund&extra=1").unwrap();
        assert_eq!(params.tab, Tab::Transactions);
        assert_eq!(params.type_filter, TypeFilter::Unrecognized("refund".into()));
    }

    #[test]
    fn invalid_dates_surface_when_building_filters() {
        let params = DashboardParams::parse("dateFrom=yesterday").unwrap();
        assert!(matches!(params.date_range(), Err(DashboardError::InvalidDate(_))));
        assert!(params.transaction_filter().is_err());
    }

    #[test]
    fn query_string_round_trips() {
        let mut params = DashboardParams::default();
        params.dealer_filter = "Harvest Co".into();
        params.type_filter = TypeFilter::Only(TransactionType::PrincipalPayment);
        params.aggregates = "amountDrawn:sum".into();
        let encoded = params.to_query_string();
        assert_eq!(
            encoded,
            "dealerFilter=Harvest+Co&typeFilter=principal-payment&aggregates=amountDrawn%3Asum"
        );
        assert_eq!(DashboardParams::parse(&encoded).unwrap(), params);
    }

    #[test]
    fn default_tab_applies_only_without_tab_key() {
        let params =
            DashboardParams::parse_with_default_tab("dealerFilter=x", Tab::Dealers).unwrap();
        assert_eq!(params.tab, Tab::Dealers);
        let params =
            DashboardParams::parse_with_default_tab("tab=transactions", Tab::Dealers).unwrap();
        assert_eq!(params.tab, Tab::Transactions);
    }

    #[test]
    fn repeated_keys_keep_the_first_value() {
        let params = DashboardParams::parse(
            "tab=dealers&tab=transactions&dealerFilter=a&dealerFilter=b&dateFrom=2024-01-01\
             &dateFrom=junk",
        )
        .unwrap();
        assert_eq!(params.tab, Tab::Dealers);
        assert_eq!(params.dealer_filter, "a");
        assert_eq!(params.date_from.as_deref(), Some("2024-01-01"));
        assert!(params.date_range().is_ok());

        let params =
            DashboardParams::parse_with_default_tab("tab=transactions&tab=dealers", Tab::Dealers)
                .unwrap();
        assert_eq!(params.tab, Tab::Transactions);

        let params = TrancheParams::parse("status=expired&status=active&tab=terms&tab=x").unwrap();
        assert_eq!(params.status, StatusFilter::Only(TrancheStatus::Expired));
        assert_eq!(params.tab, TrancheTab::Terms);
    }

    #[test]
    fn clear_date_range_drops_both_bounds() {
        let mut params = DashboardParams::parse("dateFrom=2024-01-01&dateTo=2024-02-01").unwrap();
        params.clear_date_range();
        assert!(params.date_range().unwrap().is_unbounded());
        assert_eq!(params.to_query_string(), "");
    }

    #[test]
    fn drill_into_dealer_resets_other_filters() {
        let mut params = DashboardParams::parse(
            "tab=dealers&growerFilter=doe&typeFilter=product-return&dateFrom=2024-01-01",
        )
        .unwrap();
        params.drill_into_dealer("Harvest Co");
        assert_eq!(params.tab, Tab::Transactions);
        assert_eq!(params.dealer_filter, "Harvest Co");
        assert!(params.grower_filter.is_empty());
        assert_eq!(params.type_filter, TypeFilter::All);
        assert_eq!(params.date_from.as_deref(), Some("2024-01-01"));
    }

    #[test]
    fn tranche_params_build_filters() {
        let mut params = TrancheParams::parse("dealerFilter=harvest&status=upcoming").unwrap();
        assert_eq!(params.tab, TrancheTab::Tranches);
        assert_eq!(params.tranche_filter().status, StatusFilter::Only(TrancheStatus::Upcoming));

        params.drill_into_terms("Fall 2025 - Harvest");
        assert_eq!(params.tab, TrancheTab::Terms);
        assert!(params.dealer_filter.is_empty());
        assert_eq!(params.term_filter().tranche, "Fall 2025 - Harvest");
        assert_eq!(
            params.to_query_string(),
            "tab=terms&trancheFilter=Fall+2025+-+Harvest&status=upcoming"
        );

        params.clear_filters();
        assert_eq!(params.to_query_string(), "tab=terms");
    }
}
