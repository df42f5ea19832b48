use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use dataset_dashboards::dashboard::{AirbnbDashboard, AirbnbSelection, BookDashboard, BookSelection};
use dataset_dashboards::data::airbnb::Listing;
use dataset_dashboards::data::books::BookSale;
use dataset_dashboards::data::filter::NumericRange;
use dataset_dashboards::data::loader::load_csv;
use dataset_dashboards::report;
use dataset_dashboards::settings::{Args, DatasetCommand, OutputFormat, Settings};

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let settings = Settings::load(args.config.as_deref())?;
    log::debug!("settings: {settings:?}");

    let output = match args.dataset {
        DatasetCommand::Airbnb {
            data,
            neighbourhood_group,
            room_type,
            min_price,
            max_price,
        } => {
            let path = data.unwrap_or_else(|| settings.airbnb.data.clone());
            // Loaded once; every view reads the same shared table.
            let table = Arc::new(
                load_csv::<Listing>(&path).context("failed to load Airbnb listings")?,
            );
            let dashboard = AirbnbDashboard::new(table, settings.airbnb.clone())?;

            let options = dashboard.filter_options();
            log::info!(
                "{} neighbourhood groups, {} room types, price bounds {:?}",
                options.neighbourhood_groups.len(),
                options.room_types.len(),
                options.price_bounds
            );

            let selection = AirbnbSelection {
                neighbourhood_group,
                room_type,
                price: NumericRange {
                    min: min_price,
                    max: max_price,
                },
            };
            let view = dashboard.view(&selection);
            match args.format {
                OutputFormat::Text => report::text::airbnb(&view, settings.report.table_rows),
                OutputFormat::Json => report::json(&view)?,
            }
        }
        DatasetCommand::Books {
            data,
            category,
            region,
            min_price,
            max_price,
            min_rating,
        } => {
            let path = data.unwrap_or_else(|| settings.books.data.clone());
            let table = Arc::new(
                load_csv::<BookSale>(&path).context("failed to load book sales")?,
            );
            let dashboard = BookDashboard::new(table)?;

            let selection = BookSelection {
                category,
                region,
                price: NumericRange {
                    min: min_price,
                    max: max_price,
                },
                min_rating,
            };
            let view = dashboard.view(&selection);
            match args.format {
                OutputFormat::Text => report::text::books(&view, settings.report.table_rows),
                OutputFormat::Json => report::json(&view)?,
            }
        }
    };

    println!("{output}");
    Ok(())
}
