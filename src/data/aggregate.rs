use std::collections::BTreeMap;

use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;
use thiserror::Error;

use super::model::{DailyRecord, DayType, Season};

// ---------------------------------------------------------------------------
// Derived view types
// ---------------------------------------------------------------------------

/// Which categorical field feeds the `top_category` KPI.
///
/// The dashboard variants served from this data differ only in which
/// category they surface, so the field is a parameter rather than a fork.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryField {
    Season,
    WeatherStatus,
    DayType,
}

impl CategoryField {
    fn label_of(self, record: &DailyRecord) -> &'static str {
        match self {
            CategoryField::Season => record.season.label(),
            CategoryField::WeatherStatus => record.weather.label(),
            CategoryField::DayType => record.day_type.label(),
        }
    }
}

/// KPI triple over a selection.  Recomputed per query, never cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSummary {
    pub total_rentals: u64,
    /// Mean daily rentals, rounded to 2 decimals.
    pub avg_daily_rentals: f64,
    /// Modal value of the chosen category field.
    pub top_category: String,
}

/// One `(season, temp, total_rentals)` scatter point per record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeasonPoint {
    pub season: Season,
    pub temp: f64,
    pub total_rentals: u64,
}

/// Rentals summed over one calendar month, keyed by its last day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyTotal {
    pub month_end: NaiveDate,
    pub total_rentals: u64,
}

/// Aggregation was requested on an empty selection.  A caller defect: route
/// through [`crate::state::Selection`] and never aggregate in the `Empty`
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot aggregate an empty selection")]
pub struct EmptyAggregation;

// ---------------------------------------------------------------------------
// Aggregations – pure functions of a selection
// ---------------------------------------------------------------------------

/// Compute the KPI triple over a non-empty selection.
///
/// * `total_rentals` is the exact integer sum.
/// * `avg_daily_rentals` is `sum / count` rounded to 2 decimals, half away
///   from zero (`f64::round`); totals are non-negative so this is the usual
///   round-half-up.
/// * `top_category` is the most frequent value of `category`; ties go to
///   the value that occurs first in the selection's date order.
pub fn kpis(
    records: &[DailyRecord],
    category: CategoryField,
) -> Result<KpiSummary, EmptyAggregation> {
    if records.is_empty() {
        return Err(EmptyAggregation);
    }

    let total: u64 = records.iter().map(|r| r.total_rentals).sum();
    let avg = total as f64 / records.len() as f64;
    let avg = (avg * 100.0).round() / 100.0;

    Ok(KpiSummary {
        total_rentals: total,
        avg_daily_rentals: avg,
        top_category: top_category(records, category).to_string(),
    })
}

/// Modal value of `category` with a deterministic tie-break: the label seen
/// earliest in the selection wins.  Category cardinality is at most four,
/// so a linear scan over the label list is enough.
fn top_category(records: &[DailyRecord], category: CategoryField) -> &'static str {
    let mut counts: Vec<(&'static str, u64)> = Vec::new();
    for r in records {
        let label = category.label_of(r);
        match counts.iter_mut().find(|(l, _)| *l == label) {
            Some((_, n)) => *n += 1,
            None => counts.push((label, 1)),
        }
    }

    // Strict '>' keeps the earliest label on ties.
    let mut best: (&'static str, u64) = ("", 0);
    for &(label, n) in &counts {
        if n > best.1 {
            best = (label, n);
        }
    }
    best.0
}

/// Pivot: rentals summed per `(year, day_type)` cell.
///
/// Combinations with no records are absent from the map; a renderer drawing
/// a full grid fills absent cells with 0.
pub fn rentals_by_year_and_day_type(records: &[DailyRecord]) -> BTreeMap<(i32, DayType), u64> {
    let mut out: BTreeMap<(i32, DayType), u64> = BTreeMap::new();
    for r in records {
        *out.entry((r.year, r.day_type)).or_insert(0) += r.total_rentals;
    }
    out
}

/// Emit every record's `(season, temp, total_rentals)` triple in date
/// order.  Grouping or colouring by season is the presenter's concern.
pub fn season_temperature_points(records: &[DailyRecord]) -> Vec<SeasonPoint> {
    records
        .iter()
        .map(|r| SeasonPoint {
            season: r.season,
            temp: r.temp,
            total_rentals: r.total_rentals,
        })
        .collect()
}

/// Resample the selection to calendar months: one entry per month spanned
/// by the selection's date range, inclusive, keyed by the month's last day.
/// Spanned months with no records still appear, with a sum of 0.
pub fn resample_monthly(records: &[DailyRecord]) -> Vec<MonthlyTotal> {
    let (Some(first), Some(last)) = (records.first(), records.last()) else {
        return Vec::new();
    };

    let mut sums: BTreeMap<(i32, u32), u64> = BTreeMap::new();
    for r in records {
        *sums.entry((r.year, r.date.month())).or_insert(0) += r.total_rentals;
    }

    let mut out = Vec::new();
    let mut cursor = month_start(first.date);
    let stop = month_start(last.date);
    while cursor <= stop {
        let next = cursor + Months::new(1);
        let total = sums
            .get(&(cursor.year(), cursor.month()))
            .copied()
            .unwrap_or(0);
        out.push(MonthlyTotal {
            month_end: next.pred_opt().unwrap_or(cursor),
            total_rentals: total,
        });
        cursor = next;
    }
    out
}

fn month_start(d: NaiveDate) -> NaiveDate {
    d.with_day(1).unwrap_or(d)
}

/// Rentals split by the holiday flag.  Only flags actually present in the
/// selection appear as keys.
pub fn rentals_by_holiday(records: &[DailyRecord]) -> BTreeMap<bool, u64> {
    let mut out: BTreeMap<bool, u64> = BTreeMap::new();
    for r in records {
        *out.entry(r.holiday).or_insert(0) += r.total_rentals;
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
