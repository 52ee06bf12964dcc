//! Multi-criteria filtering of posted transactions.

use crate::domain::date_range::DateRange;
use crate::domain::transaction::{Transaction, TypeFilter};

/// Conjunction of field predicates. Every criterion defaults to "match all".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    /// Case-insensitive substring of the dealer name.
    pub dealer: String,
    /// Case-insensitive substring of the grower name.
    pub grower: String,
    pub transaction_type: TypeFilter,
    pub date_range: DateRange,
}

impl TransactionFilter {
    pub fn with_dealer(mut self, dealer: impl Into<String>) -> Self {
        self.dealer = dealer.into();
        self
    }

    pub fn with_grower(mut self, grower: impl Into<String>) -> Self {
        self.grower = grower.into();
        self
    }

    pub fn with_type(mut self, transaction_type: TypeFilter) -> Self {
        self.transaction_type = transaction_type;
        self
    }

    pub fn with_date_range(mut self, date_range: DateRange) -> Self {
        self.date_range = date_range;
        self
    }

    pub fn matches(&self, txn: &Transaction) -> bool {
        contains_ignore_case(&txn.dealer_name, &self.dealer)
            && contains_ignore_case(&txn.grower_name, &self.grower)
            && self.transaction_type.matches(txn.transaction_type)
            && self.date_range.contains(txn.posted_at)
    }
}

pub struct TransactionService;

impl TransactionService {
    /// Returns the matching transactions in input order.
    pub fn filter<'a>(
        transactions: &'a [Transaction],
        criteria: &TransactionFilter,
    ) -> Vec<&'a Transaction> {
        let matched: Vec<&Transaction> = transactions
            .iter()
            .filter(|txn| criteria.matches(txn))
            .collect();
        tracing::debug!(
            total = transactions.len(),
            matched = matched.len(),
            "filtered transactions"
        );
        matched
    }

    pub fn filter_by_date_range<'a>(
        transactions: &'a [Transaction],
        range: &DateRange,
    ) -> Vec<&'a Transaction> {
        transactions
            .iter()
            .filter(|txn| range.contains(txn.posted_at))
            .collect()
    }
}

/// Substring test used by every free-text filter. An empty needle matches.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}
