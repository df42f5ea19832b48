use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Record – one typed row of a dataset
// ---------------------------------------------------------------------------

/// A row type with a fixed schema.
///
/// Columns are split into two closed sets: categorical columns (grouping and
/// membership filters) and numeric metrics (ranges, means, buckets). Both are
/// plain enums so a column reference is checked at compile time instead of
/// being looked up by name on every access.
pub trait Record: Clone + fmt::Debug + Serialize + DeserializeOwned {
    /// Categorical column of this dataset.
    type Category: Copy + Ord + fmt::Debug + fmt::Display;
    /// Numeric column of this dataset.
    type Metric: Copy + Eq + fmt::Debug + fmt::Display;

    /// Human-readable dataset name used in logs and errors.
    const DATASET: &'static str;

    /// CSV headers that must be present for a file to load.
    const REQUIRED_COLUMNS: &'static [&'static str];

    /// Text value of a categorical column. Derived columns may allocate.
    fn category(&self, column: Self::Category) -> Cow<'_, str>;

    /// Numeric value of a metric, `None` when the source cell was blank.
    fn metric(&self, column: Self::Metric) -> Option<f64>;

    /// Row-level semantic check run after deserialisation.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Table – the loaded dataset
// ---------------------------------------------------------------------------

/// Ordered, read-only collection of records.
///
/// Tables are never mutated after construction: filtering produces a new
/// table, aggregation only reads.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Table<R> {
    records: Vec<R>,
}

impl<R> Default for Table<R> {
    fn default() -> Self {
        Table {
            records: Vec::new(),
        }
    }
}

impl<R: Record> Table<R> {
    pub fn from_records(records: Vec<R>) -> Self {
        Table { records }
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }

    pub fn get(&self, index: usize) -> Option<&R> {
        self.records.get(index)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Build a new table from the records at `indices`, in the given order.
    /// Out-of-range indices are ignored.
    pub fn select(&self, indices: &[usize]) -> Self {
        let records = indices
            .iter()
            .filter_map(|&i| self.records.get(i).cloned())
            .collect();
        Table { records }
    }

    /// Sorted set of distinct values of a categorical column.
    pub fn unique_values(&self, column: R::Category) -> BTreeSet<String> {
        self.records
            .iter()
            .map(|r| r.category(column).into_owned())
            .collect()
    }

    /// Present values of a metric, in record order.
    pub fn metric_values(&self, column: R::Metric) -> impl Iterator<Item = f64> + '_ {
        self.records.iter().filter_map(move |r| r.metric(column))
    }
}

impl<'a, R> IntoIterator for &'a Table<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Minimal record type shared by the unit tests of the data layer.

    use std::borrow::Cow;
    use std::fmt;

    use serde::{Deserialize, Serialize};

    use super::Record;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    pub enum Col {
        Group,
        Kind,
    }

    impl fmt::Display for Col {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Col::Group => write!(f, "group"),
                Col::Kind => write!(f, "kind"),
            }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Num {
        Price,
        Score,
    }

    impl fmt::Display for Num {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Num::Price => write!(f, "price"),
                Num::Score => write!(f, "score"),
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Row {
        pub group: String,
        pub kind: String,
        pub price: f64,
        pub score: Option<f64>,
    }

    impl Record for Row {
        type Category = Col;
        type Metric = Num;

        const DATASET: &'static str = "test rows";
        const REQUIRED_COLUMNS: &'static [&'static str] = &["group", "kind", "price"];

        fn category(&self, column: Col) -> Cow<'_, str> {
            match column {
                Col::Group => Cow::Borrowed(&self.group),
                Col::Kind => Cow::Borrowed(&self.kind),
            }
        }

        fn metric(&self, column: Num) -> Option<f64> {
            match column {
                Num::Price => Some(self.price),
                Num::Score => self.score,
            }
        }

        fn validate(&self) -> Result<(), String> {
            if self.price < 0.0 {
                return Err(format!("negative price {}", self.price));
            }
            Ok(())
        }
    }

    pub fn row(group: &str, kind: &str, price: f64, score: Option<f64>) -> Row {
        Row {
            group: group.to_string(),
            kind: kind.to_string(),
            price,
            score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{row, Col, Num};
    use super::*;

    #[test]
    fn select_keeps_requested_order_and_skips_out_of_range() {
        let table = Table::from_records(vec![
            row("a", "x", 1.0, None),
            row("b", "y", 2.0, None),
            row("c", "z", 3.0, None),
        ]);
        let picked = table.select(&[2, 0, 7]);
        let groups: Vec<&str> = picked.iter().map(|r| r.group.as_str()).collect();
        assert_eq!(groups, ["c", "a"]);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn unique_values_are_sorted_and_deduplicated() {
        let table = Table::from_records(vec![
            row("b", "x", 1.0, None),
            row("a", "x", 2.0, None),
            row("b", "y", 3.0, None),
        ]);
        let groups: Vec<String> = table.unique_values(Col::Group).into_iter().collect();
        assert_eq!(groups, ["a", "b"]);
    }

    #[test]
    fn metric_values_skip_blank_cells() {
        let table = Table::from_records(vec![
            row("a", "x", 1.0, Some(4.0)),
            row("a", "x", 2.0, None),
        ]);
        let scores: Vec<f64> = table.metric_values(Num::Score).collect();
        assert_eq!(scores, [4.0]);
    }
}
