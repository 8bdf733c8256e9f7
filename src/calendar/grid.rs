use super::util::{iter_days_from, week_start, WeekdayExt, DAYS_IN_WEEK};
use std::array;
use thiserror::Error;
use time::{Date, Weekday};

/// Number of weeks shown for a whole month; enough for any month starting on
/// any weekday
pub(crate) const WEEKS_IN_MONTH_GRID: usize = 6;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct DayCell {
    pub(crate) date: Date,
    pub(crate) is_current_month: bool,
    pub(crate) is_today: bool,
}

impl DayCell {
    fn new(date: Date, today: Date) -> DayCell {
        DayCell {
            date,
            is_current_month: date.year() == today.year() && date.month() == today.month(),
            is_today: date == today,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Week(pub(crate) [DayCell; DAYS_IN_WEEK]);

impl Week {
    pub(crate) fn cells(&self) -> &[DayCell; DAYS_IN_WEEK] {
        &self.0
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct CalendarGrid {
    weekdays: [Weekday; DAYS_IN_WEEK],
    weeks: Vec<Week>,
}

impl CalendarGrid {
    /// Lays out the month containing `today` (or, with `focus_on_current_week`,
    /// just the week containing it) in weeks starting on `first_day`
    pub(crate) fn build(
        today: Date,
        first_day: Weekday,
        focus_on_current_week: bool,
    ) -> Result<CalendarGrid, OutOfTimeError> {
        let (anchor, week_qty) = if focus_on_current_week {
            (today, 1)
        } else {
            let first_of_month = today.replace_day(1).map_err(|_| OutOfTimeError)?;
            (first_of_month, WEEKS_IN_MONTH_GRID)
        };
        let start = week_start(anchor, first_day).ok_or(OutOfTimeError)?;
        let cells = iter_days_from(start)
            .take(week_qty * DAYS_IN_WEEK)
            .map(|date| DayCell::new(date, today))
            .collect::<Vec<_>>();
        if cells.len() < week_qty * DAYS_IN_WEEK {
            return Err(OutOfTimeError);
        }
        let weeks = cells
            .chunks_exact(DAYS_IN_WEEK)
            .map(|chunk| Week(array::from_fn(|i| chunk[i])))
            .collect();
        Ok(CalendarGrid {
            weekdays: first_day.week_from(),
            weeks,
        })
    }

    /// The days of the week in column order
    pub(crate) fn weekdays(&self) -> &[Weekday; DAYS_IN_WEEK] {
        &self.weekdays
    }

    pub(crate) fn weeks(&self) -> &[Week] {
        &self.weeks
    }

    pub(crate) fn first_date(&self) -> Option<Date> {
        self.weeks.first().map(|w| w.0[0].date)
    }

    pub(crate) fn last_date(&self) -> Option<Date> {
        self.weeks.last().map(|w| w.0[DAYS_IN_WEEK - 1].date)
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("reached the end of time")]
pub(crate) struct OutOfTimeError;
