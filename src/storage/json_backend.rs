use std::{
    collections::HashSet,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use super::{DataSource, Dataset};
use crate::errors::Result;

const TMP_SUFFIX: &str = "tmp";
const SAMPLE_DATASET: &str = include_str!("../../data/sample_dataset.json");

/// Reads a dataset from a JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonDataSource {
    path: PathBuf,
}

impl JsonDataSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DataSource for JsonDataSource {
    fn load(&self) -> Result<Dataset> {
        load_dataset_from_path(&self.path)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// The demo dataset compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleDataSource;

impl DataSource for SampleDataSource {
    fn load(&self) -> Result<Dataset> {
        let dataset: Dataset = serde_json::from_str(SAMPLE_DATASET)?;
        tracing::debug!(
            transactions = dataset.transactions.len(),
            tranches = dataset.tranches.len(),
            "loaded sample dataset"
        );
        Ok(dataset)
    }

    fn describe(&self) -> String {
        "built-in sample data".to_string()
    }
}

pub fn load_dataset_from_path(path: &Path) -> Result<Dataset> {
    let data = fs::read_to_string(path)?;
    let dataset: Dataset = serde_json::from_str(&data)?;
    tracing::debug!(
        path = %path.display(),
        transactions = dataset.transactions.len(),
        tranches = dataset.tranches.len(),
        "loaded dataset"
    );
    Ok(dataset)
}

/// Writes `dataset` next to `path` first and renames it into place.
pub fn save_dataset_to_path(dataset: &Dataset, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(dataset)?;
    let tmp = tmp_path(path);
    write_atomic(&tmp, &json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

/// Cross-reference problems that do not stop the dataset from loading.
pub fn dataset_warnings(dataset: &Dataset) -> Vec<String> {
    let dealer_names: HashSet<&str> = dataset.dealers.iter().map(|d| d.name.as_str()).collect();
    let mut warnings = Vec::new();

    if !dealer_names.is_empty() {
        for txn in &dataset.transactions {
            if !dealer_names.contains(txn.dealer_name.as_str()) {
                warnings.push(format!(
                    "transaction {} references unknown dealer {}",
                    txn.id, txn.dealer_name
                ));
            }
        }
    }
    for tranche in &dataset.tranches {
        for term in &tranche.tranche_terms {
            if term.tranche_id != tranche.id {
                warnings.push(format!(
                    "term {} is listed under tranche {} but points at {}",
                    term.id, tranche.id, term.tranche_id
                ));
            }
            if term.end_date < term.start_date {
                warnings.push(format!("term {} ends before it starts", term.id));
            }
        }
    }
    warnings
}
