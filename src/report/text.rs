use std::fmt::{self, Write};

use crate::dashboard::{AirbnbView, BookView};
use crate::data::aggregate::AggregatedSeries;

/// Shown in place of a chart or table that has nothing to display.
pub const NO_DATA: &str = "No data available for the selected filters.";

const BAR_WIDTH: usize = 40;

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

/// Plain-text rendering of the listings page.
pub fn airbnb(view: &AirbnbView, table_rows: usize) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_airbnb(&mut out, view, table_rows);
    out
}

fn write_airbnb(out: &mut String, view: &AirbnbView, table_rows: usize) -> fmt::Result {
    let o = &view.overview;
    writeln!(out, "NYC Airbnb Dashboard")?;
    writeln!(
        out,
        "Filters: neighbourhood group = {}, room type = {}, price = {}",
        view.selection.neighbourhood_group,
        view.selection.room_type,
        range_text(view.selection.price.min, view.selection.price.max),
    )?;
    writeln!(out)?;
    writeln!(out, "Overview")?;
    writeln!(out, "  Total listings   {}", o.total_listings)?;
    writeln!(out, "  Average price    ${:.2}", o.avg_price)?;
    writeln!(out, "  Average reviews  {:.1}", o.avg_reviews)?;
    writeln!(out, "  Neighbourhoods   {}", o.neighbourhoods)?;

    write_series(out, "Average price by neighbourhood", &view.price_by_neighbourhood, 2)?;
    write_series(out, "Room type distribution", &view.room_types, 0)?;
    write_series(out, "Availability (days per year)", &view.availability, 0)?;
    write_series(out, "Reviews distribution", &view.reviews, 0)?;
    write_locations(out, view, table_rows)?;

    writeln!(out)?;
    writeln!(out, "Filtered listings ({})", view.listings.len())?;
    if view.listings.is_empty() {
        writeln!(out, "  {NO_DATA}")?;
        return Ok(());
    }
    let rows: Vec<Vec<String>> = view
        .listings
        .iter()
        .take(table_rows)
        .map(|l| {
            vec![
                l.name.clone(),
                l.neighbourhood_group.clone(),
                l.neighbourhood.clone(),
                l.room_type.clone(),
                format!("{:.0}", l.price),
                l.number_of_reviews.to_string(),
                l.availability_365.to_string(),
            ]
        })
        .collect();
    write_table(
        out,
        &[
            "name",
            "group",
            "neighbourhood",
            "room type",
            "price",
            "reviews",
            "availability",
        ],
        &rows,
    )?;
    write_remaining(out, view.listings.len(), table_rows)
}

/// Plain-text rendering of the book portfolio page.
pub fn books(view: &BookView, table_rows: usize) -> String {
    let mut out = String::new();
    let _ = write_books(&mut out, view, table_rows);
    out
}

fn write_books(out: &mut String, view: &BookView, table_rows: usize) -> fmt::Result {
    let o = &view.overview;
    let min_rating = view
        .selection
        .min_rating
        .map_or_else(|| "any".to_string(), |r| format!(">= {r}"));
    writeln!(out, "Book Sales Dashboard")?;
    writeln!(
        out,
        "Filters: category = {}, region = {}, price = {}, rating {}",
        view.selection.category,
        view.selection.region,
        range_text(view.selection.price.min, view.selection.price.max),
        min_rating,
    )?;
    writeln!(out)?;
    writeln!(out, "Overview")?;
    writeln!(out, "  Sales records    {}", o.sales)?;
    writeln!(out, "  Units sold       {:.0}", o.units_sold)?;
    writeln!(out, "  Revenue          ${:.2}", o.revenue)?;
    writeln!(out, "  Average price    ${:.2}", o.avg_price)?;
    writeln!(out, "  Average rating   {:.2}", o.avg_rating)?;

    write_series(out, "Units sold by category", &view.units_by_category, 0)?;
    write_series(out, "Sales by region", &view.sales_by_region, 0)?;
    write_series(out, "Average rating by category", &view.rating_by_category, 2)?;
    write_series(out, "Rating distribution", &view.rating_distribution, 0)?;
    write_series(out, "Revenue by month", &view.revenue_by_month, 2)?;

    writeln!(out)?;
    writeln!(out, "Filtered sales ({})", view.sales.len())?;
    if view.sales.is_empty() {
        writeln!(out, "  {NO_DATA}")?;
        return Ok(());
    }
    let rows: Vec<Vec<String>> = view
        .sales
        .iter()
        .take(table_rows)
        .map(|s| {
            vec![
                s.title.clone(),
                s.category.clone(),
                s.region.clone(),
                format!("{:.1}", s.rating),
                format!("{:.2}", s.price),
                s.units_sold.to_string(),
                s.sale_date.to_string(),
            ]
        })
        .collect();
    write_table(
        out,
        &["title", "category", "region", "rating", "price", "units", "date"],
        &rows,
    )?;
    write_remaining(out, view.sales.len(), table_rows)
}

// ---------------------------------------------------------------------------
// Building blocks
// ---------------------------------------------------------------------------

fn write_locations(out: &mut String, view: &AirbnbView, table_rows: usize) -> fmt::Result {
    writeln!(out)?;
    writeln!(out, "Map points ({})", view.locations.len())?;
    if view.locations.is_empty() {
        return writeln!(out, "  {NO_DATA}");
    }
    let rows: Vec<Vec<String>> = view
        .locations
        .iter()
        .take(table_rows)
        .map(|p| {
            vec![
                p.name.clone(),
                format!("{:.5}", p.latitude),
                format!("{:.5}", p.longitude),
                format!("{:.0}", p.price),
                p.room_type.clone(),
            ]
        })
        .collect();
    write_table(
        out,
        &["name", "latitude", "longitude", "price", "room type"],
        &rows,
    )?;
    write_remaining(out, view.locations.len(), table_rows)
}

fn range_text(min: Option<f64>, max: Option<f64>) -> String {
    match (min, max) {
        (None, None) => "any".to_string(),
        (Some(lo), None) => format!(">= {lo}"),
        (None, Some(hi)) => format!("<= {hi}"),
        (Some(lo), Some(hi)) => format!("{lo} to {hi}"),
    }
}

/// A titled horizontal bar chart, scaled to the largest value.
fn write_series(
    out: &mut String,
    title: &str,
    series: &AggregatedSeries,
    decimals: usize,
) -> fmt::Result {
    writeln!(out)?;
    writeln!(out, "{title}")?;
    if series.is_empty() {
        return writeln!(out, "  {NO_DATA}");
    }
    let label_width = series
        .iter()
        .map(|e| e.label.chars().count())
        .max()
        .unwrap_or(0);
    let peak = series.iter().map(|e| e.value).fold(0.0_f64, f64::max);
    for entry in series {
        let bar_len = if peak > 0.0 {
            ((entry.value / peak) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        writeln!(
            out,
            "  {label:<label_width$}  {bar:<bar_width$}  {value:.decimals$}",
            label = entry.label,
            bar = "#".repeat(bar_len),
            bar_width = BAR_WIDTH,
            value = entry.value,
        )?;
    }
    Ok(())
}

/// Left-aligned columns sized to their widest cell.
fn write_table(out: &mut String, headers: &[&str], rows: &[Vec<String>]) -> fmt::Result {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    write_row(out, &header_cells, &widths)?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_row(out, &rule, &widths)?;
    for row in rows {
        write_row(out, row, &widths)?;
    }
    Ok(())
}

fn write_row(out: &mut String, cells: &[String], widths: &[usize]) -> fmt::Result {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| format!("{cell:<w$}", w = *w))
        .collect();
    writeln!(out, "  {}", line.join("  ").trim_end())
}

fn write_remaining(out: &mut String, total: usize, shown: usize) -> fmt::Result {
    if total > shown {
        writeln!(out, "  ... {} more row(s)", total - shown)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::dashboard::{AirbnbDashboard, AirbnbSelection};
    use crate::data::airbnb::listing;
    use crate::data::model::Table;
    use crate::settings::AirbnbSettings;

    fn board() -> AirbnbDashboard {
        let table = Table::from_records(vec![
            listing("Manhattan", "Harlem", "Private room", 80.0),
            listing("Brooklyn", "Bushwick", "Entire home/apt", 120.0),
            listing("Brooklyn", "Bushwick", "Private room", 60.0),
        ]);
        AirbnbDashboard::new(Arc::new(table), AirbnbSettings::default()).unwrap()
    }

    #[test]
    fn report_contains_overview_and_sections() {
        let text = airbnb(&board().view(&AirbnbSelection::default()), 2);
        assert!(text.contains("Total listings   3"));
        assert!(text.contains("Average price    $86.67"));
        assert!(text.contains("Room type distribution"));
        assert!(text.contains("... 1 more row(s)"));
    }

    #[test]
    fn empty_selection_shows_informational_message() {
        let selection = AirbnbSelection {
            neighbourhood_group: "Queens".to_string(),
            ..AirbnbSelection::default()
        };
        let text = airbnb(&board().view(&selection), 10);
        assert!(text.contains("Total listings   0"));
        assert!(text.contains("Map points (0)"));
        assert_eq!(text.matches(NO_DATA).count(), 6);
    }

    #[test]
    fn map_points_list_coordinates_of_filtered_listings() {
        let selection = AirbnbSelection {
            neighbourhood_group: "Brooklyn".to_string(),
            ..AirbnbSelection::default()
        };
        let text = airbnb(&board().view(&selection), 1);
        let map = text
            .split("Map points (2)")
            .nth(1)
            .and_then(|rest| rest.split("Filtered listings").next())
            .unwrap();
        assert!(map.contains("Entire home/apt in Bushwick  40.70000  -73.90000  120"));
        assert!(map.contains("... 1 more row(s)"));
    }

    #[test]
    fn bars_scale_to_the_largest_value() {
        let series: AggregatedSeries = [("a", 2.0), ("bb", 1.0)].into_iter().collect();
        let mut out = String::new();
        write_series(&mut out, "T", &series, 0).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[1], "T");
        assert!(lines[2].starts_with("  a   ########"));
        assert_eq!(lines[2].matches('#').count(), BAR_WIDTH);
        assert_eq!(lines[3].matches('#').count(), BAR_WIDTH / 2);
    }
}
