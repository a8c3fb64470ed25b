//! Date arithmetic shared by the interest strategies and the fallback path.

use chrono::{Datelike, Months, NaiveDate};

/// elapsed months under the jumping-month rule
///
/// calendar month difference, plus one more month once the day of month
/// has been passed. never negative.
pub fn jumping_months(start: NaiveDate, end: NaiveDate) -> u32 {
    let mut months = (end.year() as i64 - start.year() as i64) * 12
        + (end.month() as i64 - start.month() as i64);
    if end.day() > start.day() {
        months += 1;
    }
    months.max(0) as u32
}

/// signed calendar days from start to end
pub fn elapsed_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

/// one step of the month walk from a start date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthIncrement {
    /// 1-based position in the walk
    pub index: u32,
    pub from: NaiveDate,
    pub to: NaiveDate,
    /// days covered, a full month unless the walk reached its end date
    pub days: u32,
}

/// walk from `start` to `end` one calendar month at a time
///
/// each step ends at `start + n months` (clamped to month end) or at `end`,
/// whichever comes first. an empty or reversed range yields nothing.
pub fn month_increments(start: NaiveDate, end: NaiveDate) -> MonthIncrements {
    MonthIncrements {
        start,
        end,
        cursor: start,
        index: 0,
    }
}

#[derive(Debug, Clone)]
pub struct MonthIncrements {
    start: NaiveDate,
    end: NaiveDate,
    cursor: NaiveDate,
    index: u32,
}

impl Iterator for MonthIncrements {
    type Item = MonthIncrement;

    fn next(&mut self) -> Option<MonthIncrement> {
        if self.cursor >= self.end {
            return None;
        }

        let index = self.index + 1;
        // anchor on the start date so month-end clamping never drifts
        let step_end = self
            .start
            .checked_add_months(Months::new(index))
            .map_or(self.end, |d| d.min(self.end));

        let increment = MonthIncrement {
            index,
            from: self.cursor,
            to: step_end,
            days: elapsed_days(self.cursor, step_end) as u32,
        };

        self.cursor = step_end;
        self.index = index;
        Some(increment)
    }
}
