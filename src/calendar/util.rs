use crate::config::PersistedName;
use std::iter::successors;
use time::{Date, Weekday, Weekday::*};

pub(crate) const DAYS_IN_WEEK: usize = 7;

pub(crate) trait WeekdayExt {
    fn is_weekend(&self) -> bool;

    /// The weekdays of a week that starts on `self`, in order
    fn week_from(&self) -> [Weekday; DAYS_IN_WEEK];
}

impl WeekdayExt for Weekday {
    fn is_weekend(&self) -> bool {
        matches!(self, Saturday | Sunday)
    }

    fn week_from(&self) -> [Weekday; DAYS_IN_WEEK] {
        let mut days = [*self; DAYS_IN_WEEK];
        let following = successors(Some(*self), |wd| Some(wd.next()));
        for (slot, wd) in days.iter_mut().zip(following) {
            *slot = wd;
        }
        days
    }
}

impl PersistedName for Weekday {
    const VARIANTS: &'static [Weekday] = &[
        Monday, Tuesday, Wednesday, Thursday, Friday, Saturday, Sunday,
    ];

    fn persisted_name(self) -> &'static str {
        match self {
            Monday => "MONDAY",
            Tuesday => "TUESDAY",
            Wednesday => "WEDNESDAY",
            Thursday => "THURSDAY",
            Friday => "FRIDAY",
            Saturday => "SATURDAY",
            Sunday => "SUNDAY",
        }
    }
}

/// Walks backwards from `date` (inclusive) to the nearest `first_day`.
/// Returns `None` if that day would precede the earliest representable date.
pub(crate) fn week_start(date: Date, first_day: Weekday) -> Option<Date> {
    successors(Some(date), |&d| d.previous_day())
        .take(DAYS_IN_WEEK)
        .find(|d| d.weekday() == first_day)
}

/// `date` followed by the days after it, for as long as time lasts
pub(crate) fn iter_days_from(date: Date) -> impl Iterator<Item = Date> {
    successors(Some(date), |&d| d.next_day())
}
