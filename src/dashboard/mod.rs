//! Per-dataset dashboards: turn sidebar selections into filter specs and
//! compute every panel of a page from the shared, read-only table.

pub mod airbnb;
pub mod books;

pub use airbnb::{AirbnbDashboard, AirbnbSelection, AirbnbView};
pub use books::{BookDashboard, BookSelection, BookView};
