//! Filter and aggregation core of the Airbnb NYC and book sales dashboards.
//!
//! A dataset is loaded once into an immutable [`data::model::Table`], shared
//! behind an `Arc`, and every user interaction recomputes a view from it:
//! filter the table, summarise the subset, group or bucket it into series.

pub mod dashboard;
pub mod data;
pub mod report;
pub mod settings;
