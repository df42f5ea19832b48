//! Data layer: typed records, loading, filtering and aggregation.
//!
//! Architecture:
//! ```text
//!   AB_NYC_2019.csv / book_sales.csv
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse + validate rows → Table<R>
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  FilterSpec predicates → Table<R> subset
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │ aggregate  │  summary stats, grouped and bucketed series
//!   └───────────┘
//! ```

pub mod aggregate;
pub mod airbnb;
pub mod books;
pub mod filter;
pub mod loader;
pub mod model;
pub mod range;
