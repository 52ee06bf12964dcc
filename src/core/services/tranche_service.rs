//! Status classification and list views for tranches and their terms.

use chrono::NaiveDate;

use crate::core::services::transaction_service::contains_ignore_case;
use crate::domain::common::{Identifiable, NamedEntity};
use crate::domain::tranche::{StatusFilter, Tranche, TrancheStatus, TrancheTerm};

const UNKNOWN_TRANCHE_LABEL: &str = "Unknown Tranche";

/// Criteria of the tranches tab.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrancheFilter {
    pub dealer: String,
    pub label: String,
    pub status: StatusFilter,
}

/// Criteria of the terms tab.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermFilter {
    /// Substring of the owning tranche's label.
    pub tranche: String,
    pub status: StatusFilter,
}

pub struct TrancheService;

impl TrancheService {
    pub fn term_status(term: &TrancheTerm, today: NaiveDate) -> TrancheStatus {
        if term.start_date <= today && today <= term.end_date {
            TrancheStatus::Active
        } else if term.end_date < today {
            TrancheStatus::Expired
        } else {
            TrancheStatus::Upcoming
        }
    }

    /// Active if any term is active, else upcoming if any term is upcoming,
    /// else expired. A tranche without terms is expired.
    pub fn tranche_status(tranche: &Tranche, today: NaiveDate) -> TrancheStatus {
        Self::classify(
            tranche
                .tranche_terms
                .iter()
                .map(|term| Self::term_status(term, today)),
        )
    }

    fn classify<I>(statuses: I) -> TrancheStatus
    where
        I: IntoIterator<Item = TrancheStatus>,
    {
        let mut upcoming = false;
        for status in statuses {
            match status {
                TrancheStatus::Active => return TrancheStatus::Active,
                TrancheStatus::Upcoming => upcoming = true,
                TrancheStatus::Expired => {}
            }
        }
        if upcoming {
            TrancheStatus::Upcoming
        } else {
            TrancheStatus::Expired
        }
    }

    pub fn filter_tranches<'a>(
        tranches: &'a [Tranche],
        criteria: &TrancheFilter,
        today: NaiveDate,
    ) -> Vec<&'a Tranche> {
        tranches
            .iter()
            .filter(|tranche| contains_ignore_case(tranche.dealer.name(), &criteria.dealer))
            .filter(|tranche| contains_ignore_case(tranche.name(), &criteria.label))
            .filter(|tranche| criteria.status.matches(Self::tranche_status(tranche, today)))
            .collect()
    }

    pub fn filter_terms<'a>(
        tranches: &'a [Tranche],
        criteria: &TermFilter,
        today: NaiveDate,
    ) -> Vec<&'a TrancheTerm> {
        Self::all_terms(tranches)
            .into_iter()
            .filter(|term| {
                criteria.tranche.is_empty()
                    || contains_ignore_case(
                        Self::tranche_label(tranches, &term.tranche_id),
                        &criteria.tranche,
                    )
            })
            .filter(|term| criteria.status.matches(Self::term_status(term, today)))
            .collect()
    }

    pub fn all_terms(tranches: &[Tranche]) -> Vec<&TrancheTerm> {
        tranches
            .iter()
            .flat_map(|tranche| tranche.tranche_terms.iter())
            .collect()
    }

    pub fn find<'a>(tranches: &'a [Tranche], id: &str) -> Option<&'a Tranche> {
        find_by_id(tranches, id)
    }

    pub fn by_dealer<'a>(tranches: &'a [Tranche], dealer_id: &str) -> Vec<&'a Tranche> {
        tranches
            .iter()
            .filter(|tranche| tranche.dealer.id() == dealer_id)
            .collect()
    }

    pub fn terms_of<'a>(tranches: &'a [Tranche], tranche_id: &str) -> &'a [TrancheTerm] {
        Self::find(tranches, tranche_id)
            .map(|tranche| tranche.tranche_terms.as_slice())
            .unwrap_or(&[])
    }

    pub fn find_term<'a>(tranches: &'a [Tranche], term_id: &str) -> Option<&'a TrancheTerm> {
        tranches
            .iter()
            .find_map(|tranche| find_by_id(&tranche.tranche_terms, term_id))
    }

    /// Label of the tranche owning `tranche_id`, or `"Unknown Tranche"`.
    pub fn tranche_label<'a>(tranches: &'a [Tranche], tranche_id: &str) -> &'a str {
        Self::find(tranches, tranche_id)
            .map(|tranche| tranche.name())
            .unwrap_or(UNKNOWN_TRANCHE_LABEL)
    }
}

fn find_by_id<'a, T: Identifiable>(items: &'a [T], id: &str) -> Option<&'a T> {
    items.iter().find(|item| item.id() == id)
}
