use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::model::{Record, Table};

// ---------------------------------------------------------------------------
// Listing – one row of AB_NYC_2019.csv
// ---------------------------------------------------------------------------

/// An Airbnb listing in New York City.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub host_id: u64,
    #[serde(default)]
    pub host_name: String,
    pub neighbourhood_group: String,
    pub neighbourhood: String,
    pub latitude: f64,
    pub longitude: f64,
    pub room_type: String,
    pub price: f64,
    #[serde(default)]
    pub minimum_nights: u32,
    pub number_of_reviews: u32,
    /// Date of the most recent review, blank when the listing has none.
    #[serde(default)]
    pub last_review: Option<String>,
    #[serde(default)]
    pub reviews_per_month: Option<f64>,
    #[serde(default)]
    pub calculated_host_listings_count: u32,
    /// Days per year the listing is bookable.
    pub availability_365: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ListingCategory {
    NeighbourhoodGroup,
    Neighbourhood,
    RoomType,
}

impl fmt::Display for ListingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ListingCategory::NeighbourhoodGroup => "neighbourhood_group",
            ListingCategory::Neighbourhood => "neighbourhood",
            ListingCategory::RoomType => "room_type",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListingMetric {
    Price,
    MinimumNights,
    NumberOfReviews,
    ReviewsPerMonth,
    Availability,
    Latitude,
    Longitude,
}

impl fmt::Display for ListingMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ListingMetric::Price => "price",
            ListingMetric::MinimumNights => "minimum_nights",
            ListingMetric::NumberOfReviews => "number_of_reviews",
            ListingMetric::ReviewsPerMonth => "reviews_per_month",
            ListingMetric::Availability => "availability_365",
            ListingMetric::Latitude => "latitude",
            ListingMetric::Longitude => "longitude",
        };
        f.write_str(name)
    }
}

impl Record for Listing {
    type Category = ListingCategory;
    type Metric = ListingMetric;

    const DATASET: &'static str = "Airbnb listings";

    const REQUIRED_COLUMNS: &'static [&'static str] = &[
        "name",
        "neighbourhood_group",
        "neighbourhood",
        "latitude",
        "longitude",
        "room_type",
        "price",
        "number_of_reviews",
        "availability_365",
    ];

    fn category(&self, column: ListingCategory) -> Cow<'_, str> {
        match column {
            ListingCategory::NeighbourhoodGroup => Cow::Borrowed(&self.neighbourhood_group),
            ListingCategory::Neighbourhood => Cow::Borrowed(&self.neighbourhood),
            ListingCategory::RoomType => Cow::Borrowed(&self.room_type),
        }
    }

    fn metric(&self, column: ListingMetric) -> Option<f64> {
        match column {
            ListingMetric::Price => Some(self.price),
            ListingMetric::MinimumNights => Some(f64::from(self.minimum_nights)),
            ListingMetric::NumberOfReviews => Some(f64::from(self.number_of_reviews)),
            ListingMetric::ReviewsPerMonth => self.reviews_per_month,
            ListingMetric::Availability => Some(f64::from(self.availability_365)),
            ListingMetric::Latitude => Some(self.latitude),
            ListingMetric::Longitude => Some(self.longitude),
        }
    }

    fn validate(&self) -> Result<(), String> {
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(format!("invalid price {}", self.price));
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(format!("latitude {} out of range", self.latitude));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(format!("longitude {} out of range", self.longitude));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Price range labels
// ---------------------------------------------------------------------------

/// Labels of the form `"$<lo>-<hi>"` for every price band of `band_width`
/// dollars that holds at least one listing, in ascending price order.
///
/// A zero `band_width` yields no labels. Bands whose upper edge does not fit
/// in a `u64` are left out.
pub fn price_range_labels(table: &Table<Listing>, band_width: u32) -> Vec<String> {
    if band_width == 0 {
        return Vec::new();
    }
    let width = u64::from(band_width);
    let bands: BTreeSet<u64> = table.iter().map(|l| l.price as u64 / width).collect();

    bands
        .into_iter()
        .filter_map(|band| {
            let hi = band.checked_add(1)?.checked_mul(width);
            if hi.is_none() {
                log::debug!("price band {band} of width {width} exceeds u64, skipped");
            }
            Some(format!("${}-{}", band * width, hi?))
        })
        .collect()
}

#[cfg(test)]
pub(crate) fn listing(group: &str, neighbourhood: &str, room_type: &str, price: f64) -> Listing {
    Listing {
        id: 0,
        name: format!("{room_type} in {neighbourhood}"),
        host_id: 0,
        host_name: String::new(),
        neighbourhood_group: group.to_string(),
        neighbourhood: neighbourhood.to_string(),
        latitude: 40.7,
        longitude: -73.9,
        room_type: room_type.to_string(),
        price,
        minimum_nights: 1,
        number_of_reviews: 0,
        last_review: None,
        reviews_per_month: None,
        calculated_host_listings_count: 1,
        availability_365: 0,
    }
}
