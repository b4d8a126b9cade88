use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use super::model::{DailyRecord, Dataset, DuplicateDate, Season, Weather};

// ---------------------------------------------------------------------------
// LoadError – fatal at startup, surfaced directly
// ---------------------------------------------------------------------------

/// Everything that can go wrong while turning a source file into a
/// [`Dataset`].  Schema violations are detected here, never deferred to
/// aggregation time.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("row {row}: invalid date '{value}' (expected YYYY-MM-DD)")]
    InvalidDate { row: usize, value: String },

    #[error("row {row}: unknown season '{value}'")]
    UnknownSeason { row: usize, value: String },

    #[error("row {row}: weather code {code} outside 1..=4")]
    InvalidWeatherCode { row: usize, code: i64 },

    #[error("row {row}: column '{column}' is not a number: '{value}'")]
    InvalidNumber {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("row {row}: total_rentals is negative ({value})")]
    NegativeRentals { row: usize, value: i64 },

    #[error("row {row}: flag column '{column}' must be 0 or 1, got {value}")]
    InvalidFlag {
        row: usize,
        column: &'static str,
        value: i64,
    },

    #[error(transparent)]
    DuplicateDate(#[from] DuplicateDate),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the daily-rental table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row with the source columns (primary format)
/// * `.json` – records-oriented array, the `df.to_json(orient='records')`
///   shape, with ISO `YYYY-MM-DD` dates
///
/// Required columns in either format: `record_date`, `season`,
/// `weather_status`, `temp`, `workingday`, `holiday`, `total_rentals`.
/// Extra columns are ignored.
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        other => Err(LoadError::UnsupportedExtension(other.to_string())),
    }?;

    log::info!(
        "loaded {} daily records from {}",
        dataset.len(),
        path.display()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Raw row – shared validation path for both formats
// ---------------------------------------------------------------------------

/// An unvalidated source row.  Both loaders funnel through
/// [`RawRow::into_record`] so every schema rule is enforced exactly once.
#[derive(Debug, Deserialize)]
struct RawRow {
    record_date: String,
    season: String,
    weather_status: i64,
    temp: f64,
    workingday: i64,
    holiday: i64,
    total_rentals: i64,
}

impl RawRow {
    fn into_record(self, row: usize) -> Result<DailyRecord, LoadError> {
        let date = NaiveDate::parse_from_str(self.record_date.trim(), "%Y-%m-%d").map_err(
            |_| LoadError::InvalidDate {
                row,
                value: self.record_date.clone(),
            },
        )?;

        let season = Season::parse(&self.season).ok_or_else(|| LoadError::UnknownSeason {
            row,
            value: self.season.clone(),
        })?;

        let weather = u8::try_from(self.weather_status)
            .ok()
            .and_then(Weather::from_code)
            .ok_or(LoadError::InvalidWeatherCode {
                row,
                code: self.weather_status,
            })?;

        let working_day = parse_flag(self.workingday, row, "workingday")?;
        let holiday = parse_flag(self.holiday, row, "holiday")?;

        if self.total_rentals < 0 {
            return Err(LoadError::NegativeRentals {
                row,
                value: self.total_rentals,
            });
        }

        Ok(DailyRecord::new(
            date,
            season,
            weather,
            self.temp,
            working_day,
            holiday,
            self.total_rentals as u64,
        ))
    }
}

fn parse_flag(value: i64, row: usize, column: &'static str) -> Result<bool, LoadError> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(LoadError::InvalidFlag {
            row,
            column,
            value: other,
        }),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Columns are located by header name so a missing column is reported as
/// such, not as a parse failure on the wrong field.
fn load_csv(path: &Path) -> Result<Dataset, LoadError> {
    let file = File::open(path).map_err(|e| LoadError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    let col = |name: &str| -> Result<usize, LoadError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
    };

    let date_idx = col("record_date")?;
    let season_idx = col("season")?;
    let weather_idx = col("weather_status")?;
    let temp_idx = col("temp")?;
    let workingday_idx = col("workingday")?;
    let holiday_idx = col("holiday")?;
    let rentals_idx = col("total_rentals")?;

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        let field = |idx: usize| record.get(idx).unwrap_or("").trim();

        let raw = RawRow {
            record_date: field(date_idx).to_string(),
            season: field(season_idx).to_string(),
            weather_status: parse_int(field(weather_idx), row_no, "weather_status")?,
            temp: parse_float(field(temp_idx), row_no, "temp")?,
            workingday: parse_int(field(workingday_idx), row_no, "workingday")?,
            holiday: parse_int(field(holiday_idx), row_no, "holiday")?,
            total_rentals: parse_int(field(rentals_idx), row_no, "total_rentals")?,
        };
        records.push(raw.into_record(row_no)?);
    }

    Ok(Dataset::from_records(records)?)
}

fn parse_int(s: &str, row: usize, column: &'static str) -> Result<i64, LoadError> {
    s.parse::<i64>().map_err(|_| LoadError::InvalidNumber {
        row,
        column,
        value: s.to_string(),
    })
}

fn parse_float(s: &str, row: usize, column: &'static str) -> Result<f64, LoadError> {
    s.parse::<f64>().map_err(|_| LoadError::InvalidNumber {
        row,
        column,
        value: s.to_string(),
    })
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   {
///     "record_date": "2024-01-01",
///     "season": "spring",
///     "weather_status": 1,
///     "temp": 0.3,
///     "workingday": 1,
///     "holiday": 0,
///     "total_rentals": 100
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Dataset, LoadError> {
    let file = File::open(path).map_err(|e| LoadError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let rows: Vec<RawRow> = serde_json::from_reader(BufReader::new(file))?;

    let records = rows
        .into_iter()
        .enumerate()
        .map(|(row_no, raw)| raw.into_record(row_no))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Dataset::from_records(records)?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "record_date,season,weather_status,temp,workingday,holiday,total_rentals";

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_csv_happy_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "data.csv",
            &format!(
                "{HEADER}\n\
                 2024-01-02,spring,2,0.40,0,0,50\n\
                 2024-01-01,spring,1,0.30,1,0,100\n"
            ),
        );

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        // Sorted on load even when the file is out of order.
        let first = &ds.records()[0];
        assert_eq!(first.date.to_string(), "2024-01-01");
        assert_eq!(first.season, Season::Spring);
        assert_eq!(first.weather, Weather::Clear);
        assert_eq!(first.total_rentals, 100);
        assert!(first.working_day);
        assert!(!first.holiday);
        assert_eq!(first.year, 2024);
    }

    #[test]
    fn test_load_csv_ignores_extra_columns() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "data.csv",
            &format!("{HEADER},humidity\n2024-01-01,winter,1,0.10,1,0,7,0.8\n"),
        );
        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records()[0].season, Season::Winter);
    }

    #[test]
    fn test_missing_column_is_reported_by_name() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "data.csv",
            "record_date,season,weather_status,temp,workingday,holiday\n",
        );
        match load_file(&path) {
            Err(LoadError::MissingColumn(name)) => assert_eq!(name, "total_rentals"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_weather_code_out_of_range_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "data.csv",
            &format!("{HEADER}\n2024-01-01,spring,5,0.30,1,0,100\n"),
        );
        match load_file(&path) {
            Err(LoadError::InvalidWeatherCode { row: 0, code: 5 }) => {}
            other => panic!("expected InvalidWeatherCode, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_rentals_fail() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "data.csv",
            &format!("{HEADER}\n2024-01-01,spring,1,0.30,1,0,-3\n"),
        );
        match load_file(&path) {
            Err(LoadError::NegativeRentals { row: 0, value: -3 }) => {}
            other => panic!("expected NegativeRentals, got {other:?}"),
        }
    }

    #[test]
    fn test_non_numeric_rentals_fail() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "data.csv",
            &format!("{HEADER}\n2024-01-01,spring,1,0.30,1,0,many\n"),
        );
        match load_file(&path) {
            Err(LoadError::InvalidNumber { column, .. }) => assert_eq!(column, "total_rentals"),
            other => panic!("expected InvalidNumber, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_flag_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "data.csv",
            &format!("{HEADER}\n2024-01-01,spring,1,0.30,2,0,100\n"),
        );
        match load_file(&path) {
            Err(LoadError::InvalidFlag { column, value: 2, .. }) => {
                assert_eq!(column, "workingday")
            }
            other => panic!("expected InvalidFlag, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_season_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "data.csv",
            &format!("{HEADER}\n2024-01-01,monsoon,1,0.30,1,0,100\n"),
        );
        match load_file(&path) {
            Err(LoadError::UnknownSeason { value, .. }) => assert_eq!(value, "monsoon"),
            other => panic!("expected UnknownSeason, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_date_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "data.csv",
            &format!(
                "{HEADER}\n\
                 2024-01-01,spring,1,0.30,1,0,100\n\
                 2024-01-01,spring,1,0.35,1,0,120\n"
            ),
        );
        assert!(matches!(load_file(&path), Err(LoadError::DuplicateDate(_))));
    }

    #[test]
    fn test_unreadable_file_is_file_read_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("nope.csv");
        assert!(matches!(
            load_file(&missing),
            Err(LoadError::FileRead { .. })
        ));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_file(&dir, "data.parquet", "not really parquet");
        match load_file(&path) {
            Err(LoadError::UnsupportedExtension(ext)) => assert_eq!(ext, "parquet"),
            other => panic!("expected UnsupportedExtension, got {other:?}"),
        }
    }

    #[test]
    fn test_load_json_records_orientation() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "data.json",
            r#"[
                {"record_date": "2024-01-01", "season": "springer", "weather_status": 1,
                 "temp": 0.3, "workingday": 1, "holiday": 0, "total_rentals": 100},
                {"record_date": "2024-01-02", "season": "summer", "weather_status": 4,
                 "temp": 0.5, "workingday": 0, "holiday": 1, "total_rentals": 200}
            ]"#,
        );

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[0].season, Season::Spring);
        assert_eq!(ds.records()[1].weather, Weather::HeavyPrecip);
        assert!(ds.records()[1].holiday);
    }

    #[test]
    fn test_json_with_bad_date_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "data.json",
            r#"[{"record_date": "01/01/2024", "season": "spring", "weather_status": 1,
                 "temp": 0.3, "workingday": 1, "holiday": 0, "total_rentals": 100}]"#,
        );
        assert!(matches!(
            load_file(&path),
            Err(LoadError::InvalidDate { row: 0, .. })
        ));
    }
}
