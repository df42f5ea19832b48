use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::model::{Record, Table};

/// Selection value meaning "every value of this column".
pub const ALL: &str = "All";

// ---------------------------------------------------------------------------
// NumericRange – inclusive bounds on a metric
// ---------------------------------------------------------------------------

/// Inclusive range with optional ends. Both ends absent means no constraint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl NumericRange {
    pub fn between(min: f64, max: f64) -> Self {
        NumericRange {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn at_least(min: f64) -> Self {
        NumericRange {
            min: Some(min),
            max: None,
        }
    }

    pub fn at_most(max: f64) -> Self {
        NumericRange {
            min: None,
            max: Some(max),
        }
    }

    /// Whether the range restricts anything.
    pub fn is_active(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    /// Inclusive containment. An inverted range contains nothing.
    pub fn contains(&self, value: f64) -> bool {
        self.min.map_or(true, |lo| value >= lo) && self.max.map_or(true, |hi| value <= hi)
    }
}

// ---------------------------------------------------------------------------
// FilterSpec – predicates over one record type
// ---------------------------------------------------------------------------

/// Set of optional predicates, combined with logical AND.
///
/// * category selection: the record's value must be in the selected set;
///   an empty set or one containing [`ALL`] imposes nothing
/// * numeric range: the record's value must be present and within bounds
#[derive(Debug, Clone)]
pub struct FilterSpec<R: Record> {
    categories: BTreeMap<R::Category, BTreeSet<String>>,
    ranges: Vec<(R::Metric, NumericRange)>,
}

impl<R: Record> Default for FilterSpec<R> {
    fn default() -> Self {
        FilterSpec {
            categories: BTreeMap::new(),
            ranges: Vec::new(),
        }
    }
}

impl<R: Record> FilterSpec<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict `column` to any of `values`. Replaces an earlier selection on
    /// the same column.
    pub fn with_category<I, S>(mut self, column: R::Category, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let selected: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        self.categories.insert(column, selected);
        self
    }

    /// Single-choice selection as made by a drop-down: `""` and [`ALL`] both
    /// mean no restriction.
    pub fn with_choice(self, column: R::Category, choice: &str) -> Self {
        if choice.is_empty() || choice == ALL {
            self
        } else {
            self.with_category(column, [choice])
        }
    }

    /// Add an inclusive range on `metric`. Inactive ranges are dropped.
    pub fn with_range(mut self, metric: R::Metric, range: NumericRange) -> Self {
        if range.is_active() {
            self.ranges.retain(|(m, _)| *m != metric);
            self.ranges.push((metric, range));
        }
        self
    }

    /// Whether any predicate restricts the table.
    pub fn is_active(&self) -> bool {
        self.categories.values().any(selection_is_active) || !self.ranges.is_empty()
    }

    /// Whether `record` satisfies every active predicate.
    pub fn matches(&self, record: &R) -> bool {
        let categories_ok = self
            .categories
            .iter()
            .filter(|(_, selected)| selection_is_active(selected))
            .all(|(col, selected)| selected.contains(&*record.category(*col)));

        categories_ok
            && self.ranges.iter().all(|(metric, range)| {
                record
                    .metric(*metric)
                    .map_or(false, |value| range.contains(value))
            })
    }
}

fn selection_is_active(selected: &BTreeSet<String>) -> bool {
    !selected.is_empty() && !selected.contains(ALL)
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Indices of records that pass all active predicates, ascending.
pub fn filtered_indices<R: Record>(table: &Table<R>, spec: &FilterSpec<R>) -> Vec<usize> {
    table
        .iter()
        .enumerate()
        .filter(|(_, rec)| spec.matches(rec))
        .map(|(i, _)| i)
        .collect()
}

/// New table with exactly the matching records, in source order.
pub fn filter<R: Record>(table: &Table<R>, spec: &FilterSpec<R>) -> Table<R> {
    if !spec.is_active() {
        return table.clone();
    }
    table.select(&filtered_indices(table, spec))
}
