use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::common::*;
use crate::domain::transaction::Transaction;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dealer {
    pub id: String,
    pub name: String,
}

impl Dealer {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl Identifiable for Dealer {
    fn id(&self) -> &str {
        &self.id
    }
}

impl NamedEntity for Dealer {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Per-dealer roll-up of a filtered transaction set. Derived on every filter
/// change and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DealerSummary {
    pub dealer_name: String,
    pub transaction_count: usize,
    pub total_amount_drawn: f64,
    pub total_interest_accrued: f64,
    pub total_cfi_margin: f64,
    pub first_transaction_date: NaiveDate,
    pub last_transaction_date: NaiveDate,
}

impl DealerSummary {
    pub const TRANSACTION_COUNT: &'static str = "transactionCount";
    pub const TOTAL_AMOUNT_DRAWN: &'static str = "totalAmountDrawn";
    pub const TOTAL_INTEREST_ACCRUED: &'static str = "totalInterestAccrued";
    pub const TOTAL_CFI_MARGIN: &'static str = "totalCfiMargin";

    /// Opens a summary seeded with its first transaction.
    pub fn from_transaction(txn: &Transaction) -> Self {
        Self {
            dealer_name: txn.dealer_name.clone(),
            transaction_count: 1,
            total_amount_drawn: txn.amount_drawn,
            total_interest_accrued: txn.interest_accrued,
            total_cfi_margin: txn.cfi_margin,
            first_transaction_date: txn.posted_at,
            last_transaction_date: txn.posted_at,
        }
    }

    /// Folds another transaction of the same dealer into the running totals.
    pub fn absorb(&mut self, txn: &Transaction) {
        self.transaction_count += 1;
        self.total_amount_drawn += txn.amount_drawn;
        self.total_interest_accrued += txn.interest_accrued;
        self.total_cfi_margin += txn.cfi_margin;
        self.first_transaction_date = self.first_transaction_date.min(txn.posted_at);
        self.last_transaction_date = self.last_transaction_date.max(txn.posted_at);
    }
}

impl NamedEntity for DealerSummary {
    fn name(&self) -> &str {
        &self.dealer_name
    }
}

impl NumericColumns for DealerSummary {
    const COLUMN_IDS: &'static [&'static str] = &[
        Self::TRANSACTION_COUNT,
        Self::TOTAL_AMOUNT_DRAWN,
        Self::TOTAL_INTEREST_ACCRUED,
        Self::TOTAL_CFI_MARGIN,
    ];

    fn column_value(&self, column_id: &str) -> Option<f64> {
        match column_id {
            Self::TRANSACTION_COUNT => Some(self.transaction_count as f64),
            Self::TOTAL_AMOUNT_DRAWN => Some(self.total_amount_drawn),
            Self::TOTAL_INTEREST_ACCRUED => Some(self.total_interest_accrued),
            Self::TOTAL_CFI_MARGIN => Some(self.total_cfi_margin),
            _ => None,
        }
    }
}
