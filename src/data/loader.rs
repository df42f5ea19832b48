use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::model::{Record, Table};

/// Failure to turn a CSV file into a [`Table`]. Fatal for the session.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot read CSV header of {source_name}: {source}")]
    Header {
        source_name: String,
        #[source]
        source: csv::Error,
    },
    #[error(
        "{dataset} data in {source_name} is missing required column(s): {}",
        .missing.join(", ")
    )]
    MissingColumns {
        dataset: &'static str,
        source_name: String,
        missing: Vec<String>,
    },
    #[error("no valid {dataset} records in {source_name} ({skipped} malformed row(s) skipped)")]
    NoValidRecords {
        dataset: &'static str,
        source_name: String,
        skipped: usize,
    },
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a table of `R` from a CSV file with a header row.
pub fn load_csv<R: Record>(path: &Path) -> Result<Table<R>, DataLoadError> {
    let file = File::open(path).map_err(|source| DataLoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let table = read_csv(file, &path.display().to_string())?;
    log::info!(
        "Loaded {} {} from {}",
        table.len(),
        R::DATASET,
        path.display()
    );
    Ok(table)
}

/// Parse CSV from any reader. `source_name` only labels errors and logs.
///
/// Rows that do not deserialize or fail [`Record::validate`] are skipped.
/// The load fails only when data rows exist and none of them are usable.
pub fn read_csv<R: Record, Rd: io::Read>(
    reader: Rd,
    source_name: &str,
) -> Result<Table<R>, DataLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|source| DataLoadError::Header {
            source_name: source_name.to_string(),
            source,
        })?
        .clone();

    let missing: Vec<String> = R::REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(DataLoadError::MissingColumns {
            dataset: R::DATASET,
            source_name: source_name.to_string(),
            missing,
        });
    }

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (row_no, result) in reader.records().enumerate() {
        // Header is line 1.
        let line = row_no + 2;
        let parsed = result
            .map_err(|e| e.to_string())
            .and_then(|raw| raw.deserialize::<R>(Some(&headers)).map_err(|e| e.to_string()))
            .and_then(|rec| rec.validate().map(|()| rec));

        match parsed {
            Ok(rec) => records.push(rec),
            Err(reason) => {
                skipped += 1;
                log::debug!("{source_name}: skipping line {line}: {reason}");
            }
        }
    }

    if skipped > 0 {
        if records.is_empty() {
            return Err(DataLoadError::NoValidRecords {
                dataset: R::DATASET,
                source_name: source_name.to_string(),
                skipped,
            });
        }
        log::warn!(
            "{source_name}: skipped {skipped} malformed {} row(s), kept {}",
            R::DATASET,
            records.len()
        );
    }

    Ok(Table::from_records(records))
}
