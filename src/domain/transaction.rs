use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::common::*;
use crate::errors::DashboardError;

/// Closed set of transaction kinds posted against a dealer facility.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum TransactionType {
    ProductReturn,
    PrincipalPayment,
    PrincipalAndInterestPayment,
}

impl TransactionType {
    pub const ALL: [TransactionType; 3] = [
        TransactionType::ProductReturn,
        TransactionType::PrincipalPayment,
        TransactionType::PrincipalAndInterestPayment,
    ];

    /// Wire name used in datasets and query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::ProductReturn => "product-return",
            TransactionType::PrincipalPayment => "principal-payment",
            TransactionType::PrincipalAndInterestPayment => "principal-and-interest-payment",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::ProductReturn => "Product Return",
            TransactionType::PrincipalPayment => "Principal Payment",
            TransactionType::PrincipalAndInterestPayment => "Principal & Interest Payment",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = DashboardError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| {
                DashboardError::InvalidInput(format!("unknown transaction type `{value}`"))
            })
    }
}

/// Type selector from the `typeFilter` query parameter. `"all"` matches every
/// record; values outside the closed set are kept verbatim and match nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum TypeFilter {
    #[default]
    All,
    Only(TransactionType),
    Unrecognized(String),
}

impl TypeFilter {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "" | "all" => TypeFilter::All,
            other => other
                .parse()
                .map(TypeFilter::Only)
                .unwrap_or_else(|_| TypeFilter::Unrecognized(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TypeFilter::All => "all",
            TypeFilter::Only(kind) => kind.as_str(),
            TypeFilter::Unrecognized(raw) => raw,
        }
    }

    pub fn matches(&self, kind: TransactionType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(expected) => *expected == kind,
            TypeFilter::Unrecognized(_) => false,
        }
    }
}

impl From<String> for TypeFilter {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

/// A single posted transaction. Created by the data source and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub dealer_name: String,
    pub grower_name: String,
    pub posted_at: NaiveDate,
    pub transaction_type: TransactionType,
    pub amount_drawn: f64,
    pub interest_accrued: f64,
    pub cfi_margin: f64,
}

impl Transaction {
    pub const AMOUNT_DRAWN: &'static str = "amountDrawn";
    pub const INTEREST_ACCRUED: &'static str = "interestAccrued";
    pub const CFI_MARGIN: &'static str = "cfiMargin";

    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        dealer_name: impl Into<String>,
        grower_name: impl Into<String>,
        posted_at: NaiveDate,
        transaction_type: TransactionType,
        amount_drawn: f64,
        interest_accrued: f64,
        cfi_margin: f64,
    ) -> Self {
        Self {
            id: id.into(),
            dealer_name: dealer_name.into(),
            grower_name: grower_name.into(),
            posted_at,
            transaction_type,
            amount_drawn,
            interest_accrued,
            cfi_margin,
        }
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> &str {
        &self.id
    }
}

impl NumericColumns for Transaction {
    const COLUMN_IDS: &'static [&'static str] =
        &[Self::AMOUNT_DRAWN, Self::INTEREST_ACCRUED, Self::CFI_MARGIN];

    fn column_value(&self, column_id: &str) -> Option<f64> {
        match column_id {
            Self::AMOUNT_DRAWN => Some(self.amount_drawn),
            Self::INTEREST_ACCRUED => Some(self.interest_accrued),
            Self::CFI_MARGIN => Some(self.cfi_margin),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_type_uses_kebab_case_on_the_wire() {
        let json = serde_json::to_string(&TransactionType::PrincipalAndInterestPayment).unwrap();
        assert_eq!(json, "\"principal-and-interest-payment\"");
        let parsed: TransactionType = "product-return".parse().unwrap();
        assert_eq!(parsed, TransactionType::ProductReturn);
        assert!("refund".parse::<TransactionType>().is_err());
    }

    #[test]
    fn type_filter_parses_sentinel_and_unknown_values() {
        assert_eq!(TypeFilter::parse("all"), TypeFilter::All);
        assert_eq!(
            TypeFilter::parse("principal-payment"),
            TypeFilter::Only(TransactionType::PrincipalPayment)
        );
        let unknown = TypeFilter::parse("refund");
        assert_eq!(unknown.as_str(), "refund");
        for kind in TransactionType::ALL {
            assert!(!unknown.matches(kind));
            assert!(TypeFilter::All.matches(kind));
        }
    }

    #[test]
    fn deserializes_camel_case_record() {
        let raw = r#"{
            "id": "7",
            "dealerName": "Harvest Co",
            "growerName": "Tom Miller",
            "postedAt": "2024-02-10",
            "transactionType": "product-return",
            "amountDrawn": 35000,
            "interestAccrued": 1750,
            "cfiMargin": 875
        }"#;
        let txn: Transaction = serde_json::from_str(raw).unwrap();
        assert_eq!(txn.posted_at, NaiveDate::from_ymd_opt(2024, 2, 10).unwrap());
        assert_eq!(txn.column_value("cfiMargin"), Some(875.0));
        assert_eq!(txn.column_value("growerName"), None);
    }
}
