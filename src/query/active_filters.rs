//! Summary chips listing the filters currently narrowing a table.

use chrono::NaiveDate;

use crate::domain::date_range::DateRange;
use crate::domain::tranche::StatusFilter;
use crate::domain::transaction::TypeFilter;
use crate::query::{DashboardParams, TrancheParams};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveFilter {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
}

impl ActiveFilter {
    fn new(key: &'static str, label: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            label,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ActiveFilterOptions {
    /// Hide the Jan 1 to Dec 31 2024 range, which older links used as "no filter".
    pub legacy_full_year_default: bool,
}

fn display_date(date: Option<NaiveDate>) -> String {
    date.map(|date| date.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| "--".to_string())
}

/// Chips for the dealers & transactions page. `date_range` is passed in
/// already parsed so that an invalid date never hides the other chips.
pub fn dashboard_filters(
    params: &DashboardParams,
    date_range: &DateRange,
    options: ActiveFilterOptions,
) -> Vec<ActiveFilter> {
    let mut filters = Vec::new();

    if !params.dealer_filter.trim().is_empty() {
        filters.push(ActiveFilter::new("dealer", "Dealer", params.dealer_filter.as_str()));
    }
    if !params.grower_filter.trim().is_empty() {
        filters.push(ActiveFilter::new("grower", "Grower", params.grower_filter.as_str()));
    }
    match &params.type_filter {
        TypeFilter::All => {}
        TypeFilter::Only(kind) => filters.push(ActiveFilter::new("type", "Type", kind.label())),
        TypeFilter::Unrecognized(raw) => {
            filters.push(ActiveFilter::new("type", "Type", raw.as_str()))
        }
    }

    let hidden = date_range.is_unbounded()
        || (options.legacy_full_year_default && date_range.is_legacy_full_year_2024());
    if !hidden {
        filters.push(ActiveFilter::new(
            "dateRange",
            "Date Range",
            format!(
                "{} - {}",
                display_date(date_range.from),
                display_date(date_range.to)
            ),
        ));
    }

    filters
}

/// Chips for the tranches page.
pub fn tranche_filters(params: &TrancheParams) -> Vec<ActiveFilter> {
    let mut filters = Vec::new();
    if !params.dealer_filter.is_empty() {
        filters.push(ActiveFilter::new("dealer", "Dealer", params.dealer_filter.as_str()));
    }
    if !params.label_filter.is_empty() {
        filters.push(ActiveFilter::new("label", "Label", params.label_filter.as_str()));
    }
    if !params.tranche_filter.is_empty() {
        filters.push(ActiveFilter::new("tranche", "Tranche", params.tranche_filter.as_str()));
    }
    match &params.status {
        StatusFilter::All => {}
        StatusFilter::Only(status) => {
            filters.push(ActiveFilter::new("status", "Status", status.label()))
        }
        StatusFilter::Unrecognized(raw) => {
            filters.push(ActiveFilter::new("status", "Status", raw.as_str()))
        }
    }
    filters
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn no_chips_for_default_params() {
        let params = DashboardParams::default();
        let chips = dashboard_filters(
            &params,
            &DateRange::unbounded(),
            ActiveFilterOptions::default(),
        );
        assert!(chips.is_empty());
    }

    #[test]
    fn lists_chips_with_human_labels() {
        let params = DashboardParams::parse(
            "dealerFilter=Harvest&growerFilter=%20%20&typeFilter=principal-and-interest-payment",
        )
        .unwrap();
        let range = DateRange::new(Some(date(2024, 3, 5)), None);
        let chips = dashboard_filters(&params, &range, ActiveFilterOptions::default());
        assert_eq!(
            chips,
            vec![
                ActiveFilter::new("dealer", "Dealer", "Harvest"),
                ActiveFilter::new("type", "Type", "Principal & Interest Payment"),
                ActiveFilter::new("dateRange", "Date Range", "Mar 5, 2024 - --"),
            ]
        );
    }

    #[test]
    fn legacy_full_year_range_hidden_only_when_enabled() {
        let params = DashboardParams::default();
        let range = DateRange::between(date(2024, 1, 1), date(2024, 12, 31));
        let legacy = ActiveFilterOptions {
            legacy_full_year_default: true,
        };
        assert!(dashboard_filters(&params, &range, legacy).is_empty());

        let chips = dashboard_filters(&params, &range, ActiveFilterOptions::default());
        assert_eq!(chips[0].value, "Jan 1, 2024 - Dec 31, 2024");
    }

    #[test]
    fn tranche_chips_include_status_label() {
        let params = TrancheParams::parse("labelFilter=spring&status=active").unwrap();
        let chips = tranche_filters(&params);
        assert_eq!(chips.len(), 2);
        assert_eq!(chips[1], ActiveFilter::new("status", "Status", "Active"));
    }
}
