use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::{DashboardError, Result};

const URL_DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive date interval where either side may be open. Both sides absent
/// means "no date filter".
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self::new(Some(from), Some(to))
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }

    /// Parses the `dateFrom`/`dateTo` query values. Empty strings count as absent.
    pub fn from_query(date_from: Option<&str>, date_to: Option<&str>) -> Result<Self> {
        Ok(Self {
            from: parse_url_date(date_from)?,
            to: parse_url_date(date_to)?,
        })
    }

    pub fn to_query(&self) -> (Option<String>, Option<String>) {
        (self.from.map(format_url_date), self.to.map(format_url_date))
    }

    /// Jan 1 to Dec 31 2024, which one dashboard variant used to mean "unset".
    pub fn is_legacy_full_year_2024(&self) -> bool {
        self.from == NaiveDate::from_ymd_opt(2024, 1, 1)
            && self.to == NaiveDate::from_ymd_opt(2024, 12, 31)
    }
}

pub fn format_url_date(date: NaiveDate) -> String {
    date.format(URL_DATE_FORMAT).to_string()
}

pub fn parse_url_date(raw: Option<&str>) -> Result<Option<NaiveDate>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, URL_DATE_FORMAT)
            .map(Some)
            .map_err(|_| DashboardError::InvalidDate(value.to_string())),
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DatePreset {
    #[default]
    None,
    LastWeek,
    LastMonth,
    LastYear,
    Custom,
}

impl DatePreset {
    /// Range selected by the preset, ending on `today`. `Custom` has no
    /// implied range and yields `None`.
    pub fn range(&self, today: NaiveDate) -> Option<DateRange> {
        match self {
            DatePreset::None => Some(DateRange::unbounded()),
            DatePreset::LastWeek => Some(DateRange::between(today - Duration::days(7), today)),
            DatePreset::LastMonth => Some(DateRange::between(shift_month(today, -1), today)),
            DatePreset::LastYear => Some(DateRange::between(shift_year(today, -1), today)),
            DatePreset::Custom => None,
        }
    }

    /// Preset shown for an existing range: `None` when unbounded, otherwise `Custom`.
    pub fn infer(range: &DateRange) -> Self {
        if range.is_unbounded() {
            DatePreset::None
        } else {
            DatePreset::Custom
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DatePreset::None => "none",
            DatePreset::LastWeek => "last-week",
            DatePreset::LastMonth => "last-month",
            DatePreset::LastYear => "last-year",
            DatePreset::Custom => "custom",
        }
    }
}

impl fmt::Display for DatePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatePreset {
    type Err = DashboardError;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "none" => Ok(DatePreset::None),
            "last-week" => Ok(DatePreset::LastWeek),
            "last-month" => Ok(DatePreset::LastMonth),
            "last-year" => Ok(DatePreset::LastYear),
            "custom" => Ok(DatePreset::Custom),
            other => Err(DashboardError::InvalidInput(format!(
                "unknown date preset `{other}`"
            ))),
        }
    }
}

/// Moves `date` by whole months, clamping the day to the target month's length.
pub fn shift_month(date: NaiveDate, months: i32) -> NaiveDate {
    let index = date.year() * 12 + date.month0() as i32 + months;
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(date)
}

/// Moves `date` by whole years; Feb 29 lands on Feb 28 in non-leap years.
pub fn shift_year(date: NaiveDate, years: i32) -> NaiveDate {
    shift_month(date, years * 12)
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first_next| first_next.pred_opt())
        .map_or(28, |last| last.day())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn bounds_are_inclusive_and_optional() {
        let range = DateRange::between(date(2024, 1, 1), date(2024, 12, 31));
        assert!(range.contains(date(2024, 6, 15)));
        assert!(range.contains(date(2024, 1, 1)));
        assert!(range.contains(date(2024, 12, 31)));
        let second_half = DateRange::between(date(2024, 7, 1), date(2024, 12, 31));
        assert!(!second_half.contains(date(2024, 6, 15)));

        let open_end = DateRange::new(Some(date(2024, 6, 1)), None);
        assert!(open_end.contains(date(2030, 1, 1)));
        assert!(!open_end.contains(date(2024, 5, 31)));
        assert!(DateRange::unbounded().contains(date(1900, 1, 1)));
    }

    #[test]
    fn last_month_clamps_to_end_of_shorter_month() {
        let range = DatePreset::LastMonth.range(date(2024, 3, 31)).unwrap();
        assert_eq!(range.from, Some(date(2024, 2, 29)));
        assert_eq!(range.to, Some(date(2024, 3, 31)));

        let january = DatePreset::LastMonth.range(date(2025, 1, 15)).unwrap();
        assert_eq!(january.from, Some(date(2024, 12, 15)));
    }

    #[test]
    fn week_and_year_presets() {
        let today = date(2024, 2, 29);
        let week = DatePreset::LastWeek.range(today).unwrap();
        assert_eq!(week.from, Some(date(2024, 2, 22)));
        let year = DatePreset::LastYear.range(today).unwrap();
        assert_eq!(year.from, Some(date(2023, 2, 28)));
        assert_eq!(DatePreset::Custom.range(today), None);
        assert!(DatePreset::None.range(today).unwrap().is_unbounded());
    }

    #[test]
    fn query_dates_parse_and_reject_garbage() {
        let range = DateRange::from_query(Some("2024-01-01"), Some("")).unwrap();
        assert_eq!(range.from, Some(date(2024, 1, 1)));
        assert_eq!(range.to, None);
        assert_eq!(range.to_query(), (Some("2024-01-01".to_string()), None));

        let err = DateRange::from_query(Some("01/02/2024"), None).unwrap_err();
        assert!(matches!(err, DashboardError::InvalidDate(ref raw) if raw == "01/02/2024"));
    }

    #[test]
    fn recognises_legacy_sentinel() {
        let full_year = DateRange::between(date(2024, 1, 1), date(2024, 12, 31));
        assert!(full_year.is_legacy_full_year_2024());
        let late_start = DateRange::between(date(2024, 1, 2), date(2024, 12, 31));
        assert!(!late_start.is_legacy_full_year_2024());
        assert_eq!(DatePreset::infer(&DateRange::unbounded()), DatePreset::None);
    }
}
