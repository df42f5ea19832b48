use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use clap::Parser;

use dataset_dashboards::data::airbnb::Listing;
use dataset_dashboards::data::books::BookSale;

#[derive(Parser, Debug)]
#[command(about = "Write synthetic listings and book sales CSV files")]
struct Args {
    /// Directory receiving AB_NYC_2019.csv and book_sales.csv
    #[arg(value_name = "OUT_DIR", default_value = "data")]
    out_dir: PathBuf,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    #[arg(long, default_value_t = 2_000)]
    listings: usize,

    #[arg(long, default_value_t = 1_500)]
    sales: usize,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.below(items.len() as u64) as usize]
    }
}

// (group, neighbourhoods, centre latitude, centre longitude, price factor)
const BOROUGHS: &[(&str, &[&str], f64, f64, f64)] = &[
    ("Manhattan", &["Harlem", "Midtown", "East Village", "Chelsea"], 40.78, -73.97, 1.6),
    ("Brooklyn", &["Williamsburg", "Bushwick", "Park Slope"], 40.68, -73.95, 1.1),
    ("Queens", &["Astoria", "Flushing", "Jamaica"], 40.73, -73.82, 0.8),
    ("Bronx", &["Fordham", "Mott Haven"], 40.85, -73.88, 0.7),
    ("Staten Island", &["St. George"], 40.58, -74.15, 0.75),
];

// (room type, base nightly price)
const ROOM_TYPES: &[(&str, f64)] = &[
    ("Entire home/apt", 180.0),
    ("Private room", 80.0),
    ("Shared room", 45.0),
];

fn generate_listings(rng: &mut SimpleRng, n: usize) -> Vec<Listing> {
    (0..n)
        .map(|i| {
            let (group, hoods, lat, lon, factor) = *rng.pick(BOROUGHS);
            let (room_type, base) = *rng.pick(ROOM_TYPES);
            let neighbourhood = *rng.pick(hoods);
            let price = (base * factor * rng.gauss(1.0, 0.35).max(0.2)).round();
            let number_of_reviews = if rng.below(5) == 0 {
                0
            } else {
                rng.gauss(25.0, 40.0).abs() as u32
            };
            let id = 2_000 + i as u64;

            Listing {
                id,
                name: format!("{room_type} in {neighbourhood} #{i}"),
                host_id: 10_000 + rng.below(n as u64 / 2 + 1),
                host_name: format!("host{}", rng.below(500)),
                neighbourhood_group: group.to_string(),
                neighbourhood: neighbourhood.to_string(),
                latitude: lat + rng.gauss(0.0, 0.02),
                longitude: lon + rng.gauss(0.0, 0.02),
                room_type: room_type.to_string(),
                price,
                minimum_nights: 1 + rng.below(7) as u32,
                number_of_reviews,
                last_review: (number_of_reviews > 0)
                    .then(|| format!("2019-{:02}-{:02}", 1 + rng.below(6), 1 + rng.below(28))),
                reviews_per_month: (number_of_reviews > 0)
                    .then(|| (f64::from(number_of_reviews) / 24.0 * 100.0).round() / 100.0),
                calculated_host_listings_count: 1 + rng.below(3) as u32,
                availability_365: rng.below(366) as u32,
            }
        })
        .collect()
}

const CATEGORIES: &[(&str, f64)] = &[
    ("Fiction", 14.0),
    ("Science", 32.0),
    ("History", 24.0),
    ("Children", 9.0),
    ("Poetry", 12.0),
];
const REGIONS: &[&str] = &["North America", "Europe", "Asia Pacific", "Latin America"];
const AUTHORS: &[&str] = &["A. Rivera", "B. Okafor", "C. Lindqvist", "D. Tanaka", "E. Moreau"];

fn generate_book_sales(rng: &mut SimpleRng, n: usize) -> Result<Vec<BookSale>> {
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).context("invalid start date")?;
    let sales = (0..n)
        .map(|i| {
            let (category, base_price) = *rng.pick(CATEGORIES);
            let rating = (rng.gauss(3.8, 0.7).clamp(0.0, 5.0) * 10.0).round() / 10.0;
            let price = (base_price * rng.gauss(1.0, 0.2).max(0.3) * 100.0).round() / 100.0;
            BookSale {
                title: format!("{category} Volume {}", i % 40 + 1),
                author: rng.pick(AUTHORS).to_string(),
                category: category.to_string(),
                region: rng.pick(REGIONS).to_string(),
                rating,
                price,
                units_sold: 1 + rng.below(20) as u32,
                sale_date: start + Duration::days(rng.below(365) as i64),
            }
        })
        .collect();
    Ok(sales)
}

fn write_csv<T: serde::Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let out_dir = args.out_dir;
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(args.seed);

    let listings = generate_listings(&mut rng, args.listings);
    let listings_path = out_dir.join("AB_NYC_2019.csv");
    write_csv(&listings_path, &listings)?;

    let sales = generate_book_sales(&mut rng, args.sales)?;
    let sales_path = out_dir.join("book_sales.csv");
    write_csv(&sales_path, &sales)?;

    println!(
        "Wrote {} listings to {} and {} book sales to {}",
        listings.len(),
        listings_path.display(),
        sales.len(),
        sales_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arguments_default_to_the_data_directory() {
        let args = Args::try_parse_from(["generate-sample"]).unwrap();
        assert_eq!(args.out_dir, PathBuf::from("data"));
        assert_eq!((args.seed, args.listings, args.sales), (42, 2_000, 1_500));
    }

    #[test]
    fn output_directory_and_sizes_can_be_overridden() {
        let args =
            Args::try_parse_from(["generate-sample", "out", "--seed", "7", "--listings", "10"])
                .unwrap();
        assert_eq!(args.out_dir, PathBuf::from("out"));
        assert_eq!(args.seed, 7);
        assert_eq!(args.listings, 10);
        assert_eq!(args.sales, 1_500);
    }
}
