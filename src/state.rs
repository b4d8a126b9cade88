use chrono::NaiveDate;

use crate::data::filter::select_range;
use crate::data::model::{DailyRecord, Dataset};

// ---------------------------------------------------------------------------
// Selection state machine
// ---------------------------------------------------------------------------

/// Classification of the current date-range input, independent of any UI.
///
/// "Zero matching rows" is a distinct reportable state, not an error: the
/// presenter branches on `Empty` to show a warning instead of charts, and
/// the engine never raises for it.  Aggregation runs only in `NonEmpty`.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection<'a> {
    /// Fewer than two dates picked so far; show a prompt.
    Incomplete,
    /// Two dates picked but the start lies after the end; re-prompt.
    Invalid { start: NaiveDate, end: NaiveDate },
    /// Valid window with zero matching records; show a warning.
    Empty { start: NaiveDate, end: NaiveDate },
    /// Valid window with at least one record; the only state that feeds
    /// the aggregator.
    NonEmpty {
        start: NaiveDate,
        end: NaiveDate,
        records: &'a [DailyRecord],
    },
}

impl<'a> Selection<'a> {
    /// Classify the dates picked so far against `dataset`.
    ///
    /// `picked` is the raw picker output: zero, one, or two dates (a
    /// two-date picker mid-edit reports a single date).
    pub fn classify(dataset: &'a Dataset, picked: &[NaiveDate]) -> Selection<'a> {
        let [start, end] = picked else {
            return Selection::Incomplete;
        };
        let (start, end) = (*start, *end);

        match select_range(dataset, start, end) {
            Err(_) => Selection::Invalid { start, end },
            Ok(records) if records.is_empty() => Selection::Empty { start, end },
            Ok(records) => Selection::NonEmpty {
                start,
                end,
                records,
            },
        }
    }

    /// The selected records, when there are any.
    pub fn records(&self) -> Option<&'a [DailyRecord]> {
        match self {
            Selection::NonEmpty { records, .. } => Some(records),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
