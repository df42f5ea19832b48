use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use thiserror::Error;

use super::model::{Record, Table};

// ---------------------------------------------------------------------------
// SummaryStats
// ---------------------------------------------------------------------------

/// Mean, minimum and maximum of one metric. All zero when no value exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ColumnStats {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl ColumnStats {
    fn from_values(values: impl Iterator<Item = f64>) -> Self {
        let mut n = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in values {
            n += 1;
            sum += v;
            min = min.min(v);
            max = max.max(v);
        }
        if n == 0 {
            return ColumnStats::default();
        }
        ColumnStats {
            mean: sum / n as f64,
            min,
            max,
        }
    }
}

/// Scalar description of a table: record count plus two metric summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SummaryStats {
    pub count: usize,
    pub primary: ColumnStats,
    pub secondary: ColumnStats,
}

/// Count of records and statistics of `primary` and `secondary`, over the
/// records where each metric is present. An empty table gives all zeros.
pub fn summary_stats<R: Record>(
    table: &Table<R>,
    primary: R::Metric,
    secondary: R::Metric,
) -> SummaryStats {
    SummaryStats {
        count: table.len(),
        primary: ColumnStats::from_values(table.metric_values(primary)),
        secondary: ColumnStats::from_values(table.metric_values(secondary)),
    }
}

/// Number of distinct values of a categorical column.
pub fn distinct_count<R: Record>(table: &Table<R>, column: R::Category) -> usize {
    table
        .iter()
        .map(|r| r.category(column))
        .collect::<BTreeSet<_>>()
        .len()
}

// ---------------------------------------------------------------------------
// AggregatedSeries
// ---------------------------------------------------------------------------

/// One labelled value of a series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesEntry {
    pub label: String,
    pub value: f64,
}

/// Ordered label → value series, ready to be drawn as a bar or pie chart.
///
/// Empty means "no data for the current selection", never an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AggregatedSeries {
    entries: Vec<SeriesEntry>,
}

impl AggregatedSeries {
    pub fn entries(&self) -> &[SeriesEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SeriesEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Value for `label`, if present.
    pub fn get(&self, label: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.value)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.label.as_str()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.value).collect()
    }

    /// Sum of all values.
    pub fn total(&self) -> f64 {
        self.entries.iter().fold(0.0, |acc, e| acc + e.value)
    }

    /// Largest value first; ties keep their current order.
    pub fn sorted_by_value_desc(mut self) -> Self {
        self.entries.sort_by(|a, b| b.value.total_cmp(&a.value));
        self
    }

    /// Keep the first `n` entries.
    pub fn top(mut self, n: usize) -> Self {
        self.entries.truncate(n);
        self
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for AggregatedSeries {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        AggregatedSeries {
            entries: iter
                .into_iter()
                .map(|(label, value)| SeriesEntry {
                    label: label.into(),
                    value,
                })
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a AggregatedSeries {
    type Item = &'a SeriesEntry;
    type IntoIter = std::slice::Iter<'a, SeriesEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Record count per distinct value of `column`, ordered by value.
/// The counts always add up to `table.len()`.
pub fn group_count<R: Record>(table: &Table<R>, column: R::Category) -> AggregatedSeries {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for rec in table {
        *counts.entry(rec.category(column).into_owned()).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(label, n)| (label, n as f64))
        .collect()
}

/// Sum of `metric` per distinct value of `column`. Blank cells count as 0.
pub fn group_sum<R: Record>(
    table: &Table<R>,
    column: R::Category,
    metric: R::Metric,
) -> AggregatedSeries {
    let mut sums: BTreeMap<String, f64> = BTreeMap::new();
    for rec in table {
        *sums.entry(rec.category(column).into_owned()).or_default() +=
            rec.metric(metric).unwrap_or(0.0);
    }
    sums.into_iter().collect()
}

/// Mean of `metric` per distinct value of `column`. Records without the
/// metric are ignored; a group with no values is left out.
pub fn group_mean<R: Record>(
    table: &Table<R>,
    column: R::Category,
    metric: R::Metric,
) -> AggregatedSeries {
    let mut acc: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for rec in table {
        if let Some(v) = rec.metric(metric) {
            let slot = acc.entry(rec.category(column).into_owned()).or_default();
            slot.0 += v;
            slot.1 += 1;
        }
    }
    acc.into_iter()
        .map(|(label, (sum, n))| (label, sum / n as f64))
        .collect()
}

// ---------------------------------------------------------------------------
// Bucketing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BucketError {
    #[error("at least two bucket edges are required, got {0}")]
    TooFewEdges(usize),
    #[error("bucket edge {index} is NaN")]
    NanEdge { index: usize },
    #[error(
        "bucket edges must be strictly increasing (edge {index} is {value}, previous {previous})"
    )]
    NotIncreasing {
        index: usize,
        value: f64,
        previous: f64,
    },
    #[error("expected {expected} bucket labels, got {found}")]
    LabelCount { expected: usize, found: usize },
}

/// Bucket layout for [`bucketize`].
///
/// Edges `[e0, e1, .., en]` describe the buckets `[e0, e1)`, `[e1, e2)`, ..,
/// `[e(n-1), en]`: every bucket is half-open except the last, which also
/// takes values equal to `en`. Values below `e0` or above `en` belong to no
/// bucket. Use `f64::INFINITY` as the last edge for an open-ended bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct Buckets {
    edges: Vec<f64>,
    labels: Vec<String>,
}

impl Buckets {
    /// Buckets with default `"lo-hi"` labels (`"lo+"` for an infinite upper edge).
    pub fn new(edges: Vec<f64>) -> Result<Self, BucketError> {
        Self::validate_edges(&edges)?;
        let labels = edges
            .windows(2)
            .map(|w| default_label(w[0], w[1]))
            .collect();
        Ok(Buckets { edges, labels })
    }

    /// Buckets with one caller-supplied label per bucket.
    pub fn with_labels<S: Into<String>>(
        edges: Vec<f64>,
        labels: impl IntoIterator<Item = S>,
    ) -> Result<Self, BucketError> {
        Self::validate_edges(&edges)?;
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        let expected = edges.len() - 1;
        if labels.len() != expected {
            return Err(BucketError::LabelCount {
                expected,
                found: labels.len(),
            });
        }
        Ok(Buckets { edges, labels })
    }

    fn validate_edges(edges: &[f64]) -> Result<(), BucketError> {
        if edges.len() < 2 {
            return Err(BucketError::TooFewEdges(edges.len()));
        }
        if let Some(index) = edges.iter().position(|e| e.is_nan()) {
            return Err(BucketError::NanEdge { index });
        }
        for (i, w) in edges.windows(2).enumerate() {
            if w[1] <= w[0] {
                return Err(BucketError::NotIncreasing {
                    index: i + 1,
                    value: w[1],
                    previous: w[0],
                });
            }
        }
        Ok(())
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Index of the bucket holding `value`, `None` when outside every bucket.
    pub fn index_of(&self, value: f64) -> Option<usize> {
        if value.is_nan() {
            return None;
        }
        // Number of edges <= value.
        let at_or_below = self.edges.partition_point(|e| *e <= value);
        let last_edge = self.edges.len() - 1;
        match at_or_below {
            0 => None,
            n if n <= last_edge => Some(n - 1),
            _ if value == self.edges[last_edge] => Some(last_edge - 1),
            _ => None,
        }
    }
}

fn default_label(lo: f64, hi: f64) -> String {
    if hi.is_infinite() {
        format!("{lo}+")
    } else {
        format!("{lo}-{hi}")
    }
}

/// Count of records per bucket of `metric`, in bucket order.
///
/// A non-empty table yields every bucket, zero counts included. Records
/// whose value is absent or outside the buckets are not counted.
pub fn bucketize<R: Record>(
    table: &Table<R>,
    metric: R::Metric,
    buckets: &Buckets,
) -> AggregatedSeries {
    if table.is_empty() {
        return AggregatedSeries::default();
    }
    let mut counts = vec![0usize; buckets.len()];
    for value in table.metric_values(metric) {
        if let Some(i) = buckets.index_of(value) {
            counts[i] += 1;
        }
    }
    buckets
        .labels
        .iter()
        .zip(counts)
        .map(|(label, n)| (label.clone(), n as f64))
        .collect()
}
