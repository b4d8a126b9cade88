//! Plain-text presenter for the engine's derived views.
//!
//! Formatting lives here so the data layer stays pure and testable; a chart
//! front-end would consume the same aggregate functions and branch on the
//! same [`Selection`] states.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::data::aggregate::{self, CategoryField, EmptyAggregation};
use crate::data::model::{DailyRecord, DayType, Season};
use crate::state::Selection;

/// Render the report for the current selection state.
pub fn render(selection: &Selection) -> String {
    match selection {
        Selection::Incomplete => {
            "Pick a start and an end date to see the report.\n".to_string()
        }
        Selection::Invalid { start, end } => {
            format!("Invalid range: {start} is after {end}. Swap the dates and retry.\n")
        }
        Selection::Empty { start, end } => {
            format!("No data for the selected time range ({start} to {end}).\n")
        }
        Selection::NonEmpty {
            start,
            end,
            records,
        } => report_body(*start, *end, records)
            .unwrap_or_else(|_| format!("No data for the selected time range ({start} to {end}).\n")),
    }
}

fn report_body(
    start: NaiveDate,
    end: NaiveDate,
    records: &[DailyRecord],
) -> Result<String, EmptyAggregation> {
    let kpi = aggregate::kpis(records, CategoryField::Season)?;

    let mut out = String::new();
    out.push_str("=== Bike Rental Report ===\n");
    out.push_str(&format!(
        "Window: {start} to {end} ({} days with data)\n\n",
        records.len()
    ));

    out.push_str(&format!("Total rentals:     {}\n", kpi.total_rentals));
    out.push_str(&format!("Avg daily rentals: {:.2}\n", kpi.avg_daily_rentals));
    out.push_str(&format!("Top season:        {}\n", capitalize(&kpi.top_category)));

    out.push_str("\nRentals by year, weekday vs weekend:\n");
    let pivot = aggregate::rentals_by_year_and_day_type(records);
    let years: BTreeSet<i32> = pivot.keys().map(|(year, _)| *year).collect();
    for year in years {
        // Absent cells render as 0 in the full grid.
        let weekday = pivot.get(&(year, DayType::Weekday)).copied().unwrap_or(0);
        let weekend = pivot.get(&(year, DayType::Weekend)).copied().unwrap_or(0);
        out.push_str(&format!(
            "  {year}: weekday={weekday:>9}  weekend={weekend:>9}\n"
        ));
    }

    out.push_str("\nTemperature vs rentals, per season:\n");
    let points = aggregate::season_temperature_points(records);
    for season in [Season::Spring, Season::Summer, Season::Fall, Season::Winter] {
        let in_season: Vec<_> = points.iter().filter(|p| p.season == season).collect();
        if in_season.is_empty() {
            continue;
        }
        let mean_temp =
            in_season.iter().map(|p| p.temp).sum::<f64>() / in_season.len() as f64;
        let rentals: u64 = in_season.iter().map(|p| p.total_rentals).sum();
        out.push_str(&format!(
            "  {:<7} n={:<4} mean_temp={mean_temp:.2}  rentals={rentals}\n",
            season.label(),
            in_season.len(),
        ));
    }

    out.push_str("\nMonthly totals:\n");
    for month in aggregate::resample_monthly(records) {
        out.push_str(&format!(
            "  {}: {:>9}\n",
            month.month_end, month.total_rentals
        ));
    }

    out.push_str("\nHoliday split:\n");
    for (holiday, total) in aggregate::rentals_by_holiday(records) {
        let label = if holiday { "holiday" } else { "regular day" };
        out.push_str(&format!("  {label:<11}: {total:>9}\n"));
    }

    Ok(out)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
