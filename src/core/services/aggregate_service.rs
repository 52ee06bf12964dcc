//! Column statistics shown in table footers and the aggregate selection that
//! travels through the `aggregates` query parameter.

use crate::domain::aggregate::{AggregateKind, AggregateSelection, DecodedAggregates};
use crate::domain::common::NumericColumns;
use crate::errors::Result;

/// One computed footer value.
#[derive(Debug, Clone, PartialEq)]
pub struct FooterCell {
    pub column_id: String,
    pub kind: AggregateKind,
    pub value: f64,
}

pub struct AggregateService;

impl AggregateService {
    /// Computes `kind` over the finite entries of `values`. With no finite
    /// entries every kind yields `0.0`.
    pub fn calculate(values: &[f64], kind: AggregateKind) -> f64 {
        let valid: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if valid.is_empty() {
            return 0.0;
        }
        let sum = || valid.iter().sum::<f64>();
        match kind {
            AggregateKind::Sum => sum(),
            AggregateKind::Average => sum() / valid.len() as f64,
            AggregateKind::Count => valid.len() as f64,
            AggregateKind::Min => valid.iter().copied().fold(f64::INFINITY, f64::min),
            AggregateKind::Max => valid.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }

    /// Every kind over the same values, in popover order.
    pub fn preview(values: &[f64]) -> Vec<(AggregateKind, f64)> {
        AggregateKind::ALL
            .into_iter()
            .map(|kind| (kind, Self::calculate(values, kind)))
            .collect()
    }

    pub fn encode(selection: &AggregateSelection) -> String {
        selection.encode()
    }

    pub fn decode(encoded: &str) -> DecodedAggregates {
        let decoded = AggregateSelection::decode(encoded);
        for ignored in &decoded.ignored {
            tracing::debug!(
                token = %ignored.token,
                reason = %ignored.reason,
                "ignored aggregate token"
            );
        }
        decoded
    }

    /// Sets or clears the aggregate of one column.
    pub fn apply_change(
        selection: &mut AggregateSelection,
        column_id: &str,
        kind: Option<AggregateKind>,
    ) -> Result<()> {
        match kind {
            Some(kind) => selection.set(column_id, kind),
            None => {
                selection.remove(column_id);
                Ok(())
            }
        }
    }

    /// Picking the kind a column already shows clears it; any other kind replaces it.
    pub fn toggle(
        selection: &mut AggregateSelection,
        column_id: &str,
        kind: AggregateKind,
    ) -> Result<()> {
        if selection.get(column_id) == Some(kind) {
            Self::apply_change(selection, column_id, None)
        } else {
            Self::apply_change(selection, column_id, Some(kind))
        }
    }

    /// Decodes `encoded`, toggles one column and re-encodes the result for the URL.
    pub fn toggle_param(encoded: &str, column_id: &str, kind: AggregateKind) -> Result<String> {
        let mut selection = Self::decode(encoded).selection;
        Self::toggle(&mut selection, column_id, kind)?;
        Ok(selection.encode())
    }

    /// Footer values for the selected columns of a table. Selected ids that the
    /// row type does not know are skipped.
    pub fn footer<'a, R, I>(rows: I, selection: &AggregateSelection) -> Vec<FooterCell>
    where
        R: NumericColumns + 'a,
        I: IntoIterator<Item = &'a R>,
    {
        let rows: Vec<&R> = rows.into_iter().collect();
        R::COLUMN_IDS
            .iter()
            .filter_map(|column_id| {
                let kind = selection.get(column_id)?;
                let values = R::column(rows.iter().copied(), column_id);
                Some(FooterCell {
                    column_id: (*column_id).to_string(),
                    kind,
                    value: Self::calculate(&values, kind),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::transaction::{Transaction, TransactionType};
    use chrono::NaiveDate;

    #[test]
    fn empty_and_non_finite_inputs_yield_zero() {
        for kind in AggregateKind::ALL {
            assert_eq!(AggregateService::calculate(&[], kind), 0.0);
        }
        assert_eq!(
            AggregateService::calculate(&[f64::NAN, f64::INFINITY], AggregateKind::Count),
            0.0
        );
        assert_eq!(
            AggregateService::calculate(&[f64::NEG_INFINITY], AggregateKind::Min),
            0.0
        );
    }

    #[test]
    fn statistics_skip_non_finite_values() {
        let values = [4.0, f64::NAN, -2.0, 10.0, f64::INFINITY];
        assert_eq!(AggregateService::calculate(&values, AggregateKind::Sum), 12.0);
        assert_eq!(AggregateService::calculate(&values, AggregateKind::Average), 4.0);
        assert_eq!(AggregateService::calculate(&values, AggregateKind::Count), 3.0);
        assert_eq!(AggregateService::calculate(&values, AggregateKind::Min), -2.0);
        assert_eq!(AggregateService::calculate(&values, AggregateKind::Max), 10.0);
    }

    #[test]
    fn count_is_not_distinct() {
        assert_eq!(
            AggregateService::calculate(&[5.0, 5.0, 5.0], AggregateKind::Count),
            3.0
        );
    }

    #[test]
    fn preview_lists_all_kinds_in_order() {
        let preview = AggregateService::preview(&[1.0, 3.0]);
        assert_eq!(
            preview,
            vec![
                (AggregateKind::Sum, 4.0),
                (AggregateKind::Average, 2.0),
                (AggregateKind::Count, 2.0),
                (AggregateKind::Min, 1.0),
                (AggregateKind::Max, 3.0),
            ]
        );
    }

    #[test]
    fn toggle_sets_replaces_and_clears() {
        let mut selection = AggregateSelection::new();
        AggregateService::toggle(&mut selection, "amountDrawn", AggregateKind::Sum).unwrap();
        assert_eq!(selection.encode(), "amountDrawn:sum");
        AggregateService::toggle(&mut selection, "amountDrawn", AggregateKind::Max).unwrap();
        assert_eq!(selection.encode(), "amountDrawn:max");
        AggregateService::toggle(&mut selection, "amountDrawn", AggregateKind::Max).unwrap();
        assert!(selection.is_empty());
    }

    #[test]
    fn toggle_param_keeps_other_columns() {
        let encoded = AggregateService::toggle_param(
            "amountDrawn:sum,bogus",
            "cfiMargin",
            AggregateKind::Average,
        )
        .unwrap();
        assert_eq!(encoded, "amountDrawn:sum,cfiMargin:average");
        assert!(AggregateService::toggle_param("", "a:b", AggregateKind::Sum).is_err());
    }

    #[test]
    fn footer_uses_row_columns_in_display_order() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let rows = vec![
            Transaction::new(
                "1",
                "A",
                "G",
                day,
                TransactionType::PrincipalPayment,
                100.0,
                5.0,
                1.0,
            ),
            Transaction::new(
                "2",
                "A",
                "G",
                day,
                TransactionType::PrincipalPayment,
                50.0,
                3.0,
                2.0,
            ),
        ];
        let selection = AggregateService::decode(
            "cfiMargin:max,unknownColumn:sum,amountDrawn:average",
        )
        .selection;
        let footer = AggregateService::footer(&rows, &selection);
        assert_eq!(
            footer,
            vec![
                FooterCell {
                    column_id: "amountDrawn".into(),
                    kind: AggregateKind::Average,
                    value: 75.0,
                },
                FooterCell {
                    column_id: "cfiMargin".into(),
                    kind: AggregateKind::Max,
                    value: 2.0,
                },
            ]
        );
    }
}
