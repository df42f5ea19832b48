use std::sync::Arc;

use serde::Serialize;

use crate::data::aggregate::{
    bucketize, distinct_count, group_count, group_mean, summary_stats, AggregatedSeries,
    BucketError, Buckets,
};
use crate::data::airbnb::{price_range_labels, Listing, ListingCategory, ListingMetric};
use crate::data::filter::{filter, FilterSpec, NumericRange, ALL};
use crate::data::model::Table;
use crate::data::range::price_range_bounds;
use crate::settings::AirbnbSettings;

// ---------------------------------------------------------------------------
// Selection and view
// ---------------------------------------------------------------------------

/// Sidebar choices of the listings dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirbnbSelection {
    /// `"All"` or `""` for every group.
    pub neighbourhood_group: String,
    /// `"All"` or `""` for every room type.
    pub room_type: String,
    pub price: NumericRange,
}

impl Default for AirbnbSelection {
    fn default() -> Self {
        AirbnbSelection {
            neighbourhood_group: ALL.to_string(),
            room_type: ALL.to_string(),
            price: NumericRange::default(),
        }
    }
}

/// Values offered by the sidebar widgets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirbnbFilterOptions {
    pub neighbourhood_groups: Vec<String>,
    pub room_types: Vec<String>,
    /// Price slider bounds in whole dollars.
    pub price_bounds: (i64, i64),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AirbnbOverview {
    pub total_listings: usize,
    pub avg_price: f64,
    pub avg_reviews: f64,
    pub neighbourhoods: usize,
}

/// Map marker of one listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationPoint {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub price: f64,
    pub room_type: String,
}

/// Everything the listings page shows for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirbnbView {
    pub selection: AirbnbSelection,
    pub overview: AirbnbOverview,
    pub price_by_neighbourhood: AggregatedSeries,
    pub room_types: AggregatedSeries,
    pub availability: AggregatedSeries,
    pub reviews: AggregatedSeries,
    pub locations: Vec<LocationPoint>,
    pub listings: Table<Listing>,
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// Listings dashboard over a table loaded once per session.
pub struct AirbnbDashboard {
    table: Arc<Table<Listing>>,
    settings: AirbnbSettings,
    availability_buckets: Buckets,
    review_buckets: Buckets,
}

impl AirbnbDashboard {
    pub fn new(table: Arc<Table<Listing>>, settings: AirbnbSettings) -> Result<Self, BucketError> {
        let availability_buckets = Buckets::with_labels(
            vec![0.0, 30.0, 90.0, 180.0, 270.0, 365.0],
            ["0-30", "30-90", "90-180", "180-270", "270-365"],
        )?;
        let review_buckets = Buckets::with_labels(
            vec![0.0, 1.0, 10.0, 50.0, 100.0, f64::INFINITY],
            ["No reviews", "1-9", "10-49", "50-99", "100+"],
        )?;
        Ok(AirbnbDashboard {
            table,
            settings,
            availability_buckets,
            review_buckets,
        })
    }

    pub fn table(&self) -> &Table<Listing> {
        &self.table
    }

    pub fn filter_options(&self) -> AirbnbFilterOptions {
        let table = self.table();
        let labels = price_range_labels(table, self.settings.price_band_width);
        let price_bounds = price_range_bounds(&labels).unwrap_or_else(|e| {
            log::warn!(
                "{e}; using default price range {:?}",
                self.settings.fallback_price_range
            );
            self.settings.fallback_price_range
        });

        AirbnbFilterOptions {
            neighbourhood_groups: table
                .unique_values(ListingCategory::NeighbourhoodGroup)
                .into_iter()
                .collect(),
            room_types: table
                .unique_values(ListingCategory::RoomType)
                .into_iter()
                .collect(),
            price_bounds,
        }
    }

    /// Recompute every panel for `selection`.
    ///
    /// The overview, map and table honour every filter. The charts follow
    /// the page layout: price by neighbourhood, availability and reviews
    /// ignore the price slider, the room type split only follows the
    /// neighbourhood group.
    pub fn view(&self, selection: &AirbnbSelection) -> AirbnbView {
        let by_group = FilterSpec::<Listing>::new().with_choice(
            ListingCategory::NeighbourhoodGroup,
            &selection.neighbourhood_group,
        );
        let by_group_and_room = by_group
            .clone()
            .with_choice(ListingCategory::RoomType, &selection.room_type);
        let full = by_group_and_room
            .clone()
            .with_range(ListingMetric::Price, selection.price);

        let table = self.table();
        let listings = filter(table, &full);
        let group_room = filter(table, &by_group_and_room);
        let group_only = filter(table, &by_group);

        log::debug!(
            "selection {:?}: {} of {} listings",
            selection,
            listings.len(),
            table.len()
        );

        let stats = summary_stats(
            &listings,
            ListingMetric::Price,
            ListingMetric::NumberOfReviews,
        );
        let overview = AirbnbOverview {
            total_listings: stats.count,
            avg_price: stats.primary.mean,
            avg_reviews: stats.secondary.mean,
            neighbourhoods: distinct_count(&listings, ListingCategory::Neighbourhood),
        };

        let price_by_neighbourhood = group_mean(
            &group_room,
            ListingCategory::Neighbourhood,
            ListingMetric::Price,
        )
        .sorted_by_value_desc()
        .top(self.settings.top_neighbourhoods);

        let locations = listings
            .iter()
            .map(|l| LocationPoint {
                name: l.name.clone(),
                latitude: l.latitude,
                longitude: l.longitude,
                price: l.price,
                room_type: l.room_type.clone(),
            })
            .collect();

        AirbnbView {
            selection: selection.clone(),
            overview,
            price_by_neighbourhood,
            room_types: group_count(&group_only, ListingCategory::RoomType),
            availability: bucketize(
                &group_room,
                ListingMetric::Availability,
                &self.availability_buckets,
            ),
            reviews: bucketize(
                &group_room,
                ListingMetric::NumberOfReviews,
                &self.review_buckets,
            ),
            locations,
            listings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::airbnb::listing;

    fn dashboard(records: Vec<Listing>) -> AirbnbDashboard {
        AirbnbDashboard::new(
            Arc::new(Table::from_records(records)),
            AirbnbSettings::default(),
        )
        .unwrap()
    }

    fn sample() -> Vec<Listing> {
        let mut a = listing("Manhattan", "Harlem", "Private room", 50.0);
        a.number_of_reviews = 12;
        a.availability_365 = 365;
        let mut b = listing("Manhattan", "Midtown", "Entire home/apt", 100.0);
        b.number_of_reviews = 0;
        b.availability_365 = 45;
        let mut c = listing("Brooklyn", "Bushwick", "Private room", 150.0);
        c.number_of_reviews = 150;
        c.availability_365 = 0;
        vec![a, b, c]
    }

    #[test]
    fn filter_options_list_groups_room_types_and_price_bounds() {
        let options = dashboard(sample()).filter_options();
        assert_eq!(options.neighbourhood_groups, ["Brooklyn", "Manhattan"]);
        assert_eq!(options.room_types, ["Entire home/apt", "Private room"]);
        assert_eq!(options.price_bounds, (50, 200));
    }

    #[test]
    fn empty_table_falls_back_to_default_price_range() {
        let options = dashboard(Vec::new()).filter_options();
        assert_eq!(options.price_bounds, (0, 10_000));
        assert!(options.neighbourhood_groups.is_empty());
    }

    #[test]
    fn unfiltered_view_covers_every_listing() {
        let view = dashboard(sample()).view(&AirbnbSelection::default());
        assert_eq!(view.overview.total_listings, 3);
        assert_eq!(view.overview.avg_price, 100.0);
        assert_eq!(view.overview.avg_reviews, 54.0);
        assert_eq!(view.overview.neighbourhoods, 3);
        assert_eq!(view.price_by_neighbourhood.labels(), ["Bushwick", "Midtown", "Harlem"]);
        assert_eq!(view.room_types.get("Private room"), Some(2.0));
        assert_eq!(view.availability.values(), [1.0, 1.0, 0.0, 0.0, 1.0]);
        assert_eq!(view.reviews.values(), [1.0, 0.0, 1.0, 0.0, 1.0]);
        assert_eq!(view.locations.len(), 3);
    }

    #[test]
    fn price_slider_only_narrows_overview_map_and_table() {
        let selection = AirbnbSelection {
            price: NumericRange::between(60.0, 160.0),
            ..AirbnbSelection::default()
        };
        let view = dashboard(sample()).view(&selection);
        assert_eq!(view.overview.total_listings, 2);
        assert_eq!(view.overview.avg_price, 125.0);
        assert_eq!(view.listings.len(), 2);
        assert_eq!(view.locations.len(), 2);
        assert_eq!(view.price_by_neighbourhood.len(), 3);
    }

    #[test]
    fn room_type_split_ignores_room_type_choice() {
        let selection = AirbnbSelection {
            neighbourhood_group: "Manhattan".to_string(),
            room_type: "Private room".to_string(),
            ..AirbnbSelection::default()
        };
        let view = dashboard(sample()).view(&selection);
        assert_eq!(view.overview.total_listings, 1);
        assert_eq!(view.room_types.labels(), ["Entire home/apt", "Private room"]);
        assert_eq!(view.price_by_neighbourhood.labels(), ["Harlem"]);
    }

    #[test]
    fn selection_without_matches_gives_empty_panels() {
        let selection = AirbnbSelection {
            neighbourhood_group: "Staten Island".to_string(),
            ..AirbnbSelection::default()
        };
        let view = dashboard(sample()).view(&selection);
        assert_eq!(view.overview, AirbnbOverview::default());
        assert!(view.price_by_neighbourhood.is_empty());
        assert!(view.room_types.is_empty());
        assert!(view.availability.is_empty());
        assert!(view.reviews.is_empty());
        assert!(view.listings.is_empty());
    }

    #[test]
    fn source_table_is_left_untouched() {
        let board = dashboard(sample());
        let before = board.table().clone();
        let selection = AirbnbSelection {
            room_type: "Private room".to_string(),
            ..AirbnbSelection::default()
        };
        let _ = board.view(&selection);
        assert_eq!(board.table(), &before);
    }
}
