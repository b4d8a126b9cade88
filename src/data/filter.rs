use chrono::NaiveDate;
use thiserror::Error;

use super::model::{DailyRecord, Dataset};

// ---------------------------------------------------------------------------
// Date-range selection
// ---------------------------------------------------------------------------

/// Rejected date window: the start date lies after the end date.
///
/// Recoverable: the caller should re-prompt for input, not abort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid date range: start {start} is after end {end}")]
pub struct InvalidRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Select all records with `start <= date <= end`, inclusive on both ends.
///
/// The dataset is sorted by date, so the matching records form one
/// contiguous run; the result borrows that run as a slice and copies
/// nothing.  A window partially (or wholly) outside the dataset bounds is
/// not an error, it just matches fewer rows.  Pure and deterministic.
pub fn select_range<'a>(
    dataset: &'a Dataset,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<&'a [DailyRecord], InvalidRange> {
    if start > end {
        return Err(InvalidRange { start, end });
    }

    let records = dataset.records();
    let lo = records.partition_point(|r| r.date < start);
    let hi = records.partition_point(|r| r.date <= end);
    Ok(&records[lo..hi])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
