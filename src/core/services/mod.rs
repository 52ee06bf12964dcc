pub mod aggregate_service;
pub mod dealer_service;
pub mod tranche_service;
pub mod transaction_service;

pub use aggregate_service::{AggregateService, FooterCell};
pub use dealer_service::DealerService;
pub use tranche_service::{TermFilter, TrancheFilter, TrancheService};
pub use transaction_service::{TransactionFilter, TransactionService};
