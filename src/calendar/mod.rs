mod grid;
mod header;
mod util;
pub(crate) use self::grid::{CalendarGrid, DayCell, OutOfTimeError};
pub(crate) use self::header::{day_headers, MonthYearHeader};
pub(crate) use self::util::WeekdayExt;
