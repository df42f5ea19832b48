use std::io::Write;
use std::sync::Arc;

use dataset_dashboards::dashboard::{
    AirbnbDashboard, AirbnbSelection, BookDashboard, BookSelection,
};
use dataset_dashboards::data::airbnb::Listing;
use dataset_dashboards::data::books::BookSale;
use dataset_dashboards::data::filter::NumericRange;
use dataset_dashboards::data::loader::{load_csv, DataLoadError};
use dataset_dashboards::settings::AirbnbSettings;

const LISTINGS: &str = "\
id,name,host_id,host_name,neighbourhood_group,neighbourhood,latitude,longitude,room_type,price,minimum_nights,number_of_reviews,last_review,reviews_per_month,calculated_host_listings_count,availability_365
2539,Clean & quiet apt home by the park,2787,John,Brooklyn,Kensington,40.64749,-73.97237,Private room,149,1,9,2018-10-19,0.21,6,365
2595,Skylit Midtown Castle,2845,Jennifer,Manhattan,Midtown,40.75362,-73.98377,Entire home/apt,225,1,45,2019-05-21,0.38,2,355
3647,THE VILLAGE OF HARLEM....NEW YORK !,4632,Elisabeth,Manhattan,Harlem,40.80902,-73.94190,Private room,150,3,0,,,1,365
3831,Cozy Entire Floor of Brownstone,4869,LisaRoxanne,Brooklyn,Clinton Hill,40.68514,-73.95976,Entire home/apt,89,1,270,2019-07-05,4.64,1,194
5022,Broken row,7192,Laura,Manhattan,East Harlem,not-a-latitude,-73.94399,Entire home/apt,80,10,9,2018-11-19,0.10,1,0
";

const BOOKS: &str = "\
title,author,category,region,rating,price,units_sold,sale_date
The Long Tide,A. Rivera,Fiction,Europe,4.2,15.99,3,2023-01-14
Cells and Stars,D. Tanaka,Science,North America,4.8,42.50,1,2023-01-20
Old Maps,C. Lindqvist,History,Europe,3.9,28.00,2,2023-02-03
Bad Rating,E. Moreau,Poetry,Europe,7.5,10.00,1,2023-02-04
";

fn write_temp(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn listings_file_drives_the_airbnb_dashboard() {
    let file = write_temp(LISTINGS);
    let table = load_csv::<Listing>(file.path()).unwrap();
    // The row with an unparsable latitude is skipped.
    assert_eq!(table.len(), 4);
    assert_eq!(table.records()[2].reviews_per_month, None);

    let dashboard = AirbnbDashboard::new(Arc::new(table), AirbnbSettings::default()).unwrap();
    let options = dashboard.filter_options();
    assert_eq!(options.neighbourhood_groups, ["Brooklyn", "Manhattan"]);
    assert_eq!(options.price_bounds, (50, 250));

    let selection = AirbnbSelection {
        neighbourhood_group: "Manhattan".to_string(),
        price: NumericRange::between(100.0, 200.0),
        ..AirbnbSelection::default()
    };
    let view = dashboard.view(&selection);
    assert_eq!(view.overview.total_listings, 1);
    assert_eq!(view.overview.avg_price, 150.0);
    assert_eq!(view.locations[0].name, "THE VILLAGE OF HARLEM....NEW YORK !");
    // Charts other than the overview ignore the price slider.
    assert_eq!(view.price_by_neighbourhood.labels(), ["Midtown", "Harlem"]);
    assert_eq!(view.reviews.get("No reviews"), Some(1.0));
    assert_eq!(view.reviews.get("10-49"), Some(1.0));
    assert_eq!(view.availability.get("270-365"), Some(2.0));
}

#[test]
fn price_beyond_any_band_falls_back_to_default_bounds() {
    let header = LISTINGS.lines().next().unwrap();
    let row = "9,Penthouse,1,Ann,Manhattan,Tribeca,40.72,-74.00,Entire home/apt,1e20,1,0,,,1,0";
    let file = write_temp(&format!("{header}\n{row}\n"));
    let table = load_csv::<Listing>(file.path()).unwrap();
    assert_eq!(table.len(), 1);

    let settings = AirbnbSettings::default();
    let fallback = settings.fallback_price_range;
    let dashboard = AirbnbDashboard::new(Arc::new(table), settings).unwrap();
    assert_eq!(dashboard.filter_options().price_bounds, fallback);
}

#[test]
fn books_file_drives_the_book_dashboard() {
    let file = write_temp(BOOKS);
    let table = load_csv::<BookSale>(file.path()).unwrap();
    // Rating 7.5 fails validation.
    assert_eq!(table.len(), 3);

    let dashboard = BookDashboard::new(Arc::new(table)).unwrap();
    let selection = BookSelection {
        region: "Europe".to_string(),
        ..BookSelection::default()
    };
    let view = dashboard.view(&selection);
    assert_eq!(view.overview.sales, 2);
    assert_eq!(view.overview.units_sold, 5.0);
    assert_eq!(view.revenue_by_month.labels(), ["2023-01", "2023-02"]);
    assert_eq!(view.revenue_by_month.get("2023-02"), Some(56.0));
}

#[test]
fn listings_file_without_price_column_is_rejected() {
    let file = write_temp(
        "name,neighbourhood_group,neighbourhood,latitude,longitude,room_type\nx,a,b,1,2,c\n",
    );
    let err = load_csv::<Listing>(file.path()).unwrap_err();
    match err {
        DataLoadError::MissingColumns { missing, .. } => {
            assert_eq!(missing, ["price", "number_of_reviews", "availability_365"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_file_is_reported_with_its_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.csv");
    let err = load_csv::<BookSale>(&path).unwrap_err();
    assert!(matches!(err, DataLoadError::Open { .. }));
    assert!(err.to_string().contains("absent.csv"));
}
