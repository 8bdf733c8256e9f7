use super::grid::CalendarGrid;
use crate::format::Format;
use crate::locale::{label, Language};
use time::{Date, Weekday};

/// Relative size of the year suffix next to the month name
pub(crate) const HEADER_RELATIVE_YEAR_SIZE: f32 = 0.7;

/// The "December 18" header above the grid
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct MonthYearHeader {
    pub(crate) month_label: String,
    pub(crate) year_suffix: String,
    pub(crate) year_relative_size: f32,
}

impl MonthYearHeader {
    pub(crate) fn new(today: Date, language: Language, format: &Format) -> MonthYearHeader {
        MonthYearHeader {
            month_label: label(
                language.month_name(today.month()),
                format.month_header_label_length,
            ),
            year_suffix: format!("{:02}", today.year().rem_euclid(100)),
            year_relative_size: HEADER_RELATIVE_YEAR_SIZE,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct DayHeader {
    pub(crate) weekday: Weekday,
    pub(crate) label: String,
}

/// Column headers for `grid`, in the grid's weekday order
pub(crate) fn day_headers(
    grid: &CalendarGrid,
    language: Language,
    format: &Format,
) -> Vec<DayHeader> {
    grid.weekdays()
        .iter()
        .map(|&weekday| DayHeader {
            weekday,
            label: label(
                language.weekday_name(weekday),
                format.day_header_label_length,
            ),
        })
        .collect()
}
