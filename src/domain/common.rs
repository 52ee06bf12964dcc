/// Identifies entities that expose a stable unique identifier.
pub trait Identifiable {
    fn id(&self) -> &str;
}

/// Provides access to a human-friendly entity name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Exposes the numeric columns of a table row by column identifier so that
/// footer aggregates can be computed without knowing the row type.
pub trait NumericColumns {
    /// Column identifiers in display order.
    const COLUMN_IDS: &'static [&'static str];

    /// Returns the value held in `column_id`, or `None` for unknown columns.
    fn column_value(&self, column_id: &str) -> Option<f64>;

    /// Collects one column across a set of rows.
    fn column<'a, I>(rows: I, column_id: &str) -> Vec<f64>
    where
        Self: 'a + Sized,
        I: IntoIterator<Item = &'a Self>,
    {
        rows.into_iter()
            .filter_map(|row| row.column_value(column_id))
            .collect()
    }
}

// Re-export common dependencies so consumers can rely on this module as a façade.
pub use chrono;
pub use serde;
