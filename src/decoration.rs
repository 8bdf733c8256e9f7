use crate::calendar::DayCell;
use crate::colour::Argb;
use crate::config::PersistedName;
use crate::events::Instance;
use time::{Date, OffsetDateTime, Time, UtcOffset};

/// Glyphs used to show how many instances fall on a day
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum SymbolSet {
    Minimal,
    Vertical,
    Circles,
    Numbers,
    Roman,
    Binary,
    Blank,
}

impl SymbolSet {
    /// Glyphs for one, two, three, … instances
    fn glyphs(self) -> &'static [char] {
        match self {
            SymbolSet::Minimal => &['·', '∶', '∴', '∷', '◇'],
            SymbolSet::Vertical => &['·', '∶', '⁝', '⁞'],
            SymbolSet::Circles => &['◔', '◑', '◕', '●'],
            SymbolSet::Numbers => &['1', '2', '3', '4', '5', '6', '7', '8', '9'],
            SymbolSet::Roman => &[
                'Ⅰ', 'Ⅱ', 'Ⅲ', 'Ⅳ', 'Ⅴ', 'Ⅵ', 'Ⅶ', 'Ⅷ', 'Ⅸ', 'Ⅹ',
            ],
            SymbolSet::Binary => &['☱', '☲', '☳', '☴', '☵', '☶', '☷'],
            SymbolSet::Blank => &[],
        }
    }

    /// Glyph for counts beyond the end of `glyphs()`
    fn overflow(self) -> Option<char> {
        match self {
            SymbolSet::Minimal => Some('◈'),
            SymbolSet::Vertical => Some('|'),
            SymbolSet::Circles => Some('🞊'),
            SymbolSet::Numbers => Some('+'),
            SymbolSet::Roman => Some('∾'),
            SymbolSet::Binary => Some('※'),
            SymbolSet::Blank => None,
        }
    }

    /// Size of the symbol relative to the day number it follows
    pub(crate) fn relative_size(self) -> f32 {
        match self {
            SymbolSet::Minimal | SymbolSet::Vertical => 0.35,
            SymbolSet::Circles => 0.3,
            SymbolSet::Numbers | SymbolSet::Roman => 0.4,
            SymbolSet::Binary => 0.45,
            SymbolSet::Blank => 0.25,
        }
    }

    pub(crate) fn symbol(self, count: usize) -> Option<char> {
        let i = count.checked_sub(1)?;
        self.glyphs().get(i).copied().or_else(|| self.overflow())
    }
}

impl PersistedName for SymbolSet {
    const VARIANTS: &'static [SymbolSet] = &[
        SymbolSet::Minimal,
        SymbolSet::Vertical,
        SymbolSet::Circles,
        SymbolSet::Numbers,
        SymbolSet::Roman,
        SymbolSet::Binary,
        SymbolSet::Blank,
    ];

    fn persisted_name(self) -> &'static str {
        match self {
            SymbolSet::Minimal => "MINIMAL",
            SymbolSet::Vertical => "VERTICAL",
            SymbolSet::Circles => "CIRCLES",
            SymbolSet::Numbers => "NUMBERS",
            SymbolSet::Roman => "ROMAN",
            SymbolSet::Binary => "BINARY",
            SymbolSet::Blank => "NONE",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct DecoratedCell {
    pub(crate) cell: DayCell,
    pub(crate) instance_count: usize,
    pub(crate) is_bold: bool,
    pub(crate) symbol: Option<char>,
    pub(crate) instances_colour: Argb,
    pub(crate) instances_relative_size: f32,
}

/// Start and end of `date` as observed at `offset`
pub(crate) fn day_bounds(date: Date, offset: UtcOffset) -> (OffsetDateTime, OffsetDateTime) {
    let start = date.midnight().assume_offset(offset);
    let end = date
        .next_day()
        .map_or_else(|| date.with_time(Time::MAX), Date::midnight)
        .assume_offset(offset);
    (start, end)
}

pub(crate) fn decorate(
    cell: DayCell,
    instances: &[Instance],
    offset: UtcOffset,
    show_declined: bool,
    symbol_set: SymbolSet,
    instances_colour: Argb,
) -> DecoratedCell {
    let (start, end) = day_bounds(cell.date, offset);
    let instance_count = instances
        .iter()
        .filter(|i| show_declined || !i.is_declined)
        .filter(|i| i.overlaps(start, end))
        .count();
    DecoratedCell {
        cell,
        instance_count,
        is_bold: cell.is_current_month,
        symbol: symbol_set.symbol(instance_count),
        instances_colour,
        instances_relative_size: symbol_set.relative_size(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime, offset};

    const CYAN: Argb = Argb(0xFF00_BCD4);

    fn cell(date: Date) -> DayCell {
        DayCell {
            date,
            is_current_month: true,
            is_today: false,
        }
    }

    fn instance(start: OffsetDateTime, end: OffsetDateTime, is_declined: bool) -> Instance {
        Instance {
            start,
            end,
            is_declined,
        }
    }

    #[test]
    fn test_symbols() {
        assert_eq!(SymbolSet::Minimal.symbol(0), None);
        assert_eq!(SymbolSet::Minimal.symbol(1), Some('·'));
        assert_eq!(SymbolSet::Minimal.symbol(5), Some('◇'));
        assert_eq!(SymbolSet::Minimal.symbol(6), Some('◈'));
        assert_eq!(SymbolSet::Numbers.symbol(9), Some('9'));
        assert_eq!(SymbolSet::Numbers.symbol(10), Some('+'));
        assert_eq!(SymbolSet::Roman.symbol(10), Some('Ⅹ'));
        assert_eq!(SymbolSet::Roman.symbol(11), Some('∾'));
        assert_eq!(SymbolSet::Blank.symbol(1), None);
        assert_eq!(SymbolSet::Blank.symbol(100), None);
    }

    #[test]
    fn test_relative_sizes_are_reduced() {
        for &set in SymbolSet::VARIANTS {
            let size = set.relative_size();
            assert!(size > 0.0 && size < 1.0, "{set:?}");
        }
    }

    #[test]
    fn test_overflow_with_four_glyph_set() {
        let day = date!(2018 - 12 - 04);
        let instances = (0..10)
            .map(|_| {
                instance(
                    datetime!(2018-12-04 10:00 UTC),
                    datetime!(2018-12-04 11:00 UTC),
                    false,
                )
            })
            .collect::<Vec<_>>();
        let decorated = decorate(
            cell(day),
            &instances,
            UtcOffset::UTC,
            false,
            SymbolSet::Vertical,
            CYAN,
        );
        assert_eq!(decorated.instance_count, 10);
        assert_eq!(decorated.symbol, Some('|'));
        assert_eq!(decorated.instances_colour, CYAN);
    }

    #[test]
    fn test_declined_instances() {
        let day = date!(2018 - 12 - 04);
        let instances = [
            instance(
                datetime!(2018-12-04 09:00 UTC),
                datetime!(2018-12-04 10:00 UTC),
                false,
            ),
            instance(
                datetime!(2018-12-04 12:00 UTC),
                datetime!(2018-12-04 13:00 UTC),
                true,
            ),
        ];
        let hidden = decorate(
            cell(day),
            &instances,
            UtcOffset::UTC,
            false,
            SymbolSet::Minimal,
            CYAN,
        );
        assert_eq!(hidden.instance_count, 1);
        assert_eq!(hidden.symbol, Some('·'));
        let shown = decorate(
            cell(day),
            &instances,
            UtcOffset::UTC,
            true,
            SymbolSet::Minimal,
            CYAN,
        );
        assert_eq!(shown.instance_count, 2);
        assert_eq!(shown.symbol, Some('∶'));
    }

    #[test]
    fn test_day_boundaries() {
        let day = date!(2018 - 12 - 04);
        let instances = [
            // ends exactly when the day starts
            instance(
                datetime!(2018-12-03 23:00 UTC),
                datetime!(2018-12-04 00:00 UTC),
                false,
            ),
            // starts exactly when the day ends
            instance(
                datetime!(2018-12-05 00:00 UTC),
                datetime!(2018-12-05 01:00 UTC),
                false,
            ),
            // spans the whole day
            instance(
                datetime!(2018-12-01 00:00 UTC),
                datetime!(2018-12-10 00:00 UTC),
                false,
            ),
            // zero-length at midnight
            instance(
                datetime!(2018-12-04 00:00 UTC),
                datetime!(2018-12-04 00:00 UTC),
                false,
            ),
        ];
        let decorated = decorate(
            cell(day),
            &instances,
            UtcOffset::UTC,
            false,
            SymbolSet::Numbers,
            CYAN,
        );
        assert_eq!(decorated.instance_count, 2);
        assert_eq!(decorated.symbol, Some('2'));
    }

    #[test]
    fn test_day_follows_offset() {
        let day = date!(2018 - 12 - 04);
        let instances = [instance(
            datetime!(2018-12-04 23:30 UTC),
            datetime!(2018-12-04 23:45 UTC),
            false,
        )];
        let utc = decorate(
            cell(day),
            &instances,
            UtcOffset::UTC,
            false,
            SymbolSet::Minimal,
            CYAN,
        );
        assert_eq!(utc.instance_count, 1);
        let ahead = decorate(
            cell(day),
            &instances,
            offset!(+2),
            false,
            SymbolSet::Minimal,
            CYAN,
        );
        assert_eq!(ahead.instance_count, 0);
        let next = decorate(
            cell(date!(2018 - 12 - 05)),
            &instances,
            offset!(+2),
            false,
            SymbolSet::Minimal,
            CYAN,
        );
        assert_eq!(next.instance_count, 1);
    }

    #[test]
    fn test_bold_follows_current_month() {
        let outside = DayCell {
            date: date!(2018 - 11 - 30),
            is_current_month: false,
            is_today: false,
        };
        let decorated = decorate(
            outside,
            &[],
            UtcOffset::UTC,
            false,
            SymbolSet::Minimal,
            CYAN,
        );
        assert!(!decorated.is_bold);
        assert_eq!(decorated.symbol, None);
        let inside = decorate(
            cell(date!(2018 - 12 - 01)),
            &[],
            UtcOffset::UTC,
            false,
            SymbolSet::Minimal,
            CYAN,
        );
        assert!(inside.is_bold);
    }
}
