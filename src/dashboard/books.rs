use std::sync::Arc;

use serde::Serialize;

use crate::data::aggregate::{
    bucketize, group_count, group_mean, group_sum, summary_stats, AggregatedSeries, BucketError,
    Buckets,
};
use crate::data::books::{BookCategory, BookMetric, BookSale};
use crate::data::filter::{filter, FilterSpec, NumericRange, ALL};
use crate::data::model::Table;

/// Sidebar choices of the book portfolio dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookSelection {
    pub category: String,
    pub region: String,
    pub price: NumericRange,
    pub min_rating: Option<f64>,
}

impl Default for BookSelection {
    fn default() -> Self {
        BookSelection {
            category: ALL.to_string(),
            region: ALL.to_string(),
            price: NumericRange::default(),
            min_rating: None,
        }
    }
}

impl BookSelection {
    fn filter_spec(&self) -> FilterSpec<BookSale> {
        let rating = NumericRange {
            min: self.min_rating,
            max: None,
        };
        FilterSpec::new()
            .with_choice(BookCategory::Category, &self.category)
            .with_choice(BookCategory::Region, &self.region)
            .with_range(BookMetric::Price, self.price)
            .with_range(BookMetric::Rating, rating)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookFilterOptions {
    pub categories: Vec<String>,
    pub regions: Vec<String>,
    /// Lowest and highest list price, `(0, 0)` for an empty table.
    pub price_bounds: (f64, f64),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BookOverview {
    pub sales: usize,
    pub units_sold: f64,
    pub revenue: f64,
    pub avg_price: f64,
    pub avg_rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookView {
    pub selection: BookSelection,
    pub overview: BookOverview,
    pub units_by_category: AggregatedSeries,
    pub sales_by_region: AggregatedSeries,
    pub rating_by_category: AggregatedSeries,
    pub rating_distribution: AggregatedSeries,
    pub revenue_by_month: AggregatedSeries,
    pub sales: Table<BookSale>,
}

pub struct BookDashboard {
    table: Arc<Table<BookSale>>,
    rating_buckets: Buckets,
}

impl BookDashboard {
    pub fn new(table: Arc<Table<BookSale>>) -> Result<Self, BucketError> {
        let rating_buckets = Buckets::new(vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0])?;
        Ok(BookDashboard {
            table,
            rating_buckets,
        })
    }

    pub fn table(&self) -> &Table<BookSale> {
        &self.table
    }

    pub fn filter_options(&self) -> BookFilterOptions {
        let table = self.table();
        let stats = summary_stats(table, BookMetric::Price, BookMetric::Rating);
        BookFilterOptions {
            categories: table
                .unique_values(BookCategory::Category)
                .into_iter()
                .collect(),
            regions: table.unique_values(BookCategory::Region).into_iter().collect(),
            price_bounds: (stats.primary.min, stats.primary.max),
        }
    }

    /// Every panel is computed from the same filtered subset.
    pub fn view(&self, selection: &BookSelection) -> BookView {
        let table = self.table();
        let sales = filter(table, &selection.filter_spec());
        log::debug!(
            "selection {:?}: {} of {} sales",
            selection,
            sales.len(),
            table.len()
        );

        let stats = summary_stats(&sales, BookMetric::Price, BookMetric::Rating);
        let overview = BookOverview {
            sales: stats.count,
            units_sold: sales.metric_values(BookMetric::UnitsSold).fold(0.0, |a, v| a + v),
            revenue: sales.metric_values(BookMetric::Revenue).fold(0.0, |a, v| a + v),
            avg_price: stats.primary.mean,
            avg_rating: stats.secondary.mean,
        };

        BookView {
            selection: selection.clone(),
            overview,
            units_by_category: group_sum(&sales, BookCategory::Category, BookMetric::UnitsSold),
            sales_by_region: group_count(&sales, BookCategory::Region),
            rating_by_category: group_mean(&sales, BookCategory::Category, BookMetric::Rating),
            rating_distribution: bucketize(&sales, BookMetric::Rating, &self.rating_buckets),
            revenue_by_month: group_sum(&sales, BookCategory::Month, BookMetric::Revenue),
            sales,
        }
    }
}
