use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Categorical fields
// ---------------------------------------------------------------------------

/// Season a record belongs to, as stored in the source table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    /// Parse a source label, case-insensitively.  Some exports of the source
    /// data spell spring as `"springer"`.
    pub fn parse(s: &str) -> Option<Season> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spring" | "springer" => Some(Season::Spring),
            "summer" => Some(Season::Summer),
            "fall" => Some(Season::Fall),
            "winter" => Some(Season::Winter),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Fall => "fall",
            Season::Winter => "winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Weather condition, stored in the source as an integer code 1..=4.
///
/// The code→label mapping is fixed and total: every valid code maps, every
/// invalid code is rejected at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weather {
    Clear,
    Misty,
    LightPrecip,
    HeavyPrecip,
}

impl Weather {
    pub fn from_code(code: u8) -> Option<Weather> {
        match code {
            1 => Some(Weather::Clear),
            2 => Some(Weather::Misty),
            3 => Some(Weather::LightPrecip),
            4 => Some(Weather::HeavyPrecip),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Weather::Clear => 1,
            Weather::Misty => 2,
            Weather::LightPrecip => 3,
            Weather::HeavyPrecip => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Weather::Clear => "Clear/Partly Cloudy",
            Weather::Misty => "Mist/Cloudy",
            Weather::LightPrecip => "Light Snow/Rain",
            Weather::HeavyPrecip => "Heavy Rain/Ice Pallets",
        }
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Weekday/Weekend label derived from the source working-day flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DayType {
    Weekday,
    Weekend,
}

impl DayType {
    pub fn from_working_day(working_day: bool) -> DayType {
        if working_day {
            DayType::Weekday
        } else {
            DayType::Weekend
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DayType::Weekday => "Weekday",
            DayType::Weekend => "Weekend",
        }
    }
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ---------------------------------------------------------------------------
// DailyRecord – one calendar day's measurement
// ---------------------------------------------------------------------------

/// One calendar day of bike-rental observations.
///
/// `year` and `day_type` are derived once at load time; they depend only on
/// the row itself, so there is no reason to recompute them per query.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub season: Season,
    pub weather: Weather,
    /// Normalized temperature in `[0, 1]` (already normalized in the source).
    pub temp: f64,
    pub working_day: bool,
    pub holiday: bool,
    pub total_rentals: u64,
    pub year: i32,
    pub day_type: DayType,
}

impl DailyRecord {
    /// Build a record, deriving `year` and `day_type`.
    pub fn new(
        date: NaiveDate,
        season: Season,
        weather: Weather,
        temp: f64,
        working_day: bool,
        holiday: bool,
        total_rentals: u64,
    ) -> DailyRecord {
        DailyRecord {
            year: date.year(),
            day_type: DayType::from_working_day(working_day),
            date,
            season,
            weather,
            temp,
            working_day,
            holiday,
            total_rentals,
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// Two rows claim the same calendar date; the dataset key must be unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("duplicate record date: {0}")]
pub struct DuplicateDate(pub NaiveDate);

/// The full parsed table: records sorted ascending by date, dates unique,
/// immutable once constructed.  Replaced wholesale by a reload, never
/// mutated in place.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<DailyRecord>,
}

impl Dataset {
    /// Sort the records by date and reject duplicate dates.
    pub fn from_records(mut records: Vec<DailyRecord>) -> Result<Dataset, DuplicateDate> {
        records.sort_by_key(|r| r.date);
        if let Some(pair) = records.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(DuplicateDate(pair[1].date));
        }
        Ok(Dataset { records })
    }

    /// All records, ascending by date.
    pub fn records(&self) -> &[DailyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn min_date(&self) -> Option<NaiveDate> {
        self.records.first().map(|r| r.date)
    }

    pub fn max_date(&self) -> Option<NaiveDate> {
        self.records.last().map(|r| r.date)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn record(d: &str) -> DailyRecord {
        DailyRecord::new(date(d), Season::Spring, Weather::Clear, 0.5, true, false, 10)
    }

    #[test]
    fn test_season_parse_accepts_springer_spelling() {
        assert_eq!(Season::parse("spring"), Some(Season::Spring));
        assert_eq!(Season::parse("springer"), Some(Season::Spring));
        assert_eq!(Season::parse("SUMMER"), Some(Season::Summer));
        assert_eq!(Season::parse(" winter "), Some(Season::Winter));
        assert_eq!(Season::parse("monsoon"), None);
    }

    #[test]
    fn test_weather_code_mapping_is_total_over_valid_codes() {
        for code in 1..=4u8 {
            let w = Weather::from_code(code).unwrap();
            assert_eq!(w.code(), code);
        }
        assert_eq!(Weather::from_code(0), None);
        assert_eq!(Weather::from_code(5), None);
    }

    #[test]
    fn test_weather_labels() {
        assert_eq!(Weather::Clear.label(), "Clear/Partly Cloudy");
        assert_eq!(Weather::Misty.label(), "Mist/Cloudy");
        assert_eq!(Weather::LightPrecip.label(), "Light Snow/Rain");
        assert_eq!(Weather::HeavyPrecip.label(), "Heavy Rain/Ice Pallets");
    }

    #[test]
    fn test_day_type_from_working_day() {
        assert_eq!(DayType::from_working_day(true), DayType::Weekday);
        assert_eq!(DayType::from_working_day(false), DayType::Weekend);
    }

    #[test]
    fn test_record_derives_year_and_day_type() {
        let r = DailyRecord::new(
            date("2024-03-05"),
            Season::Spring,
            Weather::Misty,
            0.3,
            false,
            false,
            42,
        );
        assert_eq!(r.year, 2024);
        assert_eq!(r.day_type, DayType::Weekend);
    }

    #[test]
    fn test_dataset_sorts_by_date() {
        let ds = Dataset::from_records(vec![
            record("2024-01-03"),
            record("2024-01-01"),
            record("2024-01-02"),
        ])
        .unwrap();
        let dates: Vec<NaiveDate> = ds.records().iter().map(|r| r.date).collect();
        assert_eq!(
            dates,
            vec![date("2024-01-01"), date("2024-01-02"), date("2024-01-03")]
        );
        assert_eq!(ds.min_date(), Some(date("2024-01-01")));
        assert_eq!(ds.max_date(), Some(date("2024-01-03")));
    }

    #[test]
    fn test_dataset_rejects_duplicate_dates() {
        let err = Dataset::from_records(vec![record("2024-01-01"), record("2024-01-01")])
            .unwrap_err();
        assert_eq!(err, DuplicateDate(date("2024-01-01")));
    }

    #[test]
    fn test_empty_dataset_has_no_bounds() {
        let ds = Dataset::from_records(Vec::new()).unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.min_date(), None);
        assert_eq!(ds.max_date(), None);
    }
}
