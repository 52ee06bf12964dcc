pub mod json_backend;

use serde::{Deserialize, Serialize};

use crate::domain::{Dealer, Tranche, Transaction};
use crate::errors::Result;

/// Everything the dashboard pages read: the dealer directory, posted
/// transactions and the tranche book.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Dataset {
    pub dealers: Vec<Dealer>,
    pub transactions: Vec<Transaction>,
    pub tranches: Vec<Tranche>,
}

/// Abstraction over the places a dataset can be read from.
pub trait DataSource: Send + Sync {
    fn load(&self) -> Result<Dataset>;

    /// Human readable origin, used in logs and CLI banners.
    fn describe(&self) -> String;
}

pub use json_backend::{
    dataset_warnings, load_dataset_from_path, save_dataset_to_path, JsonDataSource,
    SampleDataSource,
};
