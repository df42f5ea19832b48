//! Rendering of dashboard views for the terminal: a plain-text report or
//! the view serialised as JSON for an external charting front end.

pub mod text;

use serde::Serialize;

/// Pretty-printed JSON of any view.
pub fn json<T: Serialize>(view: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(view)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::dashboard::{BookDashboard, BookSelection};
    use crate::data::books::sale;
    use crate::data::model::Table;

    #[test]
    fn json_view_exposes_series_as_label_value_pairs() {
        let table = Table::from_records(vec![
            sale("Poetry", "APAC", 4.0, 8.0, 2, "2024-03-01"),
            sale("Poetry", "EU", 2.0, 12.0, 1, "2024-04-09"),
        ]);
        let board = BookDashboard::new(Arc::new(table)).unwrap();
        let text = json(&board.view(&BookSelection::default())).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["overview"]["sales"], 2);
        assert_eq!(value["units_by_category"][0]["label"], "Poetry");
        assert_eq!(value["units_by_category"][0]["value"], 3.0);
        assert_eq!(value["sales"][1]["sale_date"], "2024-04-09");
        assert_eq!(value["selection"]["category"], "All");
    }
}
