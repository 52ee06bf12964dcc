pub mod aggregate;
pub mod common;
pub mod date_range;
pub mod dealer;
pub mod tranche;
pub mod transaction;

pub use aggregate::{
    AggregateKind, AggregateSelection, DecodedAggregates, IgnoreReason, IgnoredToken,
};
pub use common::{Identifiable, NamedEntity, NumericColumns};
pub use date_range::{DatePreset, DateRange};
pub use dealer::{Dealer, DealerSummary};
pub use tranche::{Rate, StatusFilter, Tranche, TrancheStatus, TrancheTerm};
pub use transaction::{Transaction, TransactionType, TypeFilter};
