use std::borrow::Cow;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::model::Record;

/// One sale line of the book portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSale {
    pub title: String,
    #[serde(default)]
    pub author: String,
    pub category: String,
    pub region: String,
    /// Reader rating, 0 to 5.
    pub rating: f64,
    pub price: f64,
    pub units_sold: u32,
    pub sale_date: NaiveDate,
}

impl BookSale {
    pub fn revenue(&self) -> f64 {
        self.price * f64::from(self.units_sold)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BookCategory {
    Category,
    Region,
    Author,
    /// `YYYY-MM` of the sale date.
    Month,
}

impl fmt::Display for BookCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BookCategory::Category => "category",
            BookCategory::Region => "region",
            BookCategory::Author => "author",
            BookCategory::Month => "month",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookMetric {
    Price,
    Rating,
    UnitsSold,
    Revenue,
}

impl fmt::Display for BookMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BookMetric::Price => "price",
            BookMetric::Rating => "rating",
            BookMetric::UnitsSold => "units_sold",
            BookMetric::Revenue => "revenue",
        };
        f.write_str(name)
    }
}

impl Record for BookSale {
    type Category = BookCategory;
    type Metric = BookMetric;

    const DATASET: &'static str = "book sales";

    const REQUIRED_COLUMNS: &'static [&'static str] = &[
        "title",
        "category",
        "region",
        "rating",
        "price",
        "units_sold",
        "sale_date",
    ];

    fn category(&self, column: BookCategory) -> Cow<'_, str> {
        match column {
            BookCategory::Category => Cow::Borrowed(&self.category),
            BookCategory::Region => Cow::Borrowed(&self.region),
            BookCategory::Author => Cow::Borrowed(&self.author),
            BookCategory::Month => Cow::Owned(self.sale_date.format("%Y-%m").to_string()),
        }
    }

    fn metric(&self, column: BookMetric) -> Option<f64> {
        let value = match column {
            BookMetric::Price => self.price,
            BookMetric::Rating => self.rating,
            BookMetric::UnitsSold => f64::from(self.units_sold),
            BookMetric::Revenue => self.revenue(),
        };
        Some(value)
    }

    fn validate(&self) -> Result<(), String> {
        if !(0.0..=5.0).contains(&self.rating) {
            return Err(format!("rating {} outside 0-5", self.rating));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(format!("invalid price {}", self.price));
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn sale(
    category: &str,
    region: &str,
    rating: f64,
    price: f64,
    units: u32,
    date: &str,
) -> BookSale {
    BookSale {
        title: format!("{category} title"),
        author: "Anon".to_string(),
        category: category.to_string(),
        region: region.to_string(),
        rating,
        price,
        units_sold: units,
        sale_date: date.parse().expect("test date"),
    }
}
