use crate::calendar::{day_headers, CalendarGrid, DayCell, MonthYearHeader, OutOfTimeError};
use crate::colour::{with_transparency, Argb, ColourError, Transparency, TransparencyRange};
use crate::config::{
    Preferences, FOCUS_ON_CURRENT_WEEK, INSTANCES_COLOUR, INSTANCES_SYMBOL_SET,
    SHOW_DECLINED_EVENTS, WIDGET_TEXT_SIZE, WIDGET_THEME, WIDGET_TRANSPARENCY,
};
use crate::decoration::{day_bounds, decorate, DecoratedCell};
use crate::events::{EventProvider, Instance, QueryError};
use crate::format::{Format, WidgetMeasure};
use crate::platform::{Capabilities, Platform};
use crate::store::KeyValueStore;
use crate::theme::Theme;
use thiserror::Error;
use time::{Date, OffsetDateTime, UtcOffset};
use tracing::{debug, info, trace, warn};

/// Surface that the finished widget is drawn onto
pub(crate) trait WidgetRenderer {
    fn set_background(&mut self, colour: Argb);

    fn set_month_year_header(&mut self, header: &HeaderView);

    fn add_day_header(&mut self, header: &DayHeaderView);

    /// Starts a new row of day cells
    fn add_week_row(&mut self);

    fn add_day_cell(&mut self, cell: &DayCellView);
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct HeaderView {
    pub(crate) month_label: String,
    pub(crate) year_suffix: String,
    pub(crate) year_relative_size: f32,
    pub(crate) text_colour: Argb,
    pub(crate) text_relative_size: f32,
}

impl HeaderView {
    pub(crate) fn text(&self) -> String {
        format!("{} {}", self.month_label, self.year_suffix)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct DayHeaderView {
    pub(crate) text: String,
    pub(crate) text_colour: Argb,
    pub(crate) text_relative_size: f32,
    pub(crate) background: Option<Argb>,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct DayCellView {
    pub(crate) date: Date,
    pub(crate) day: String,
    pub(crate) symbol: Option<char>,
    pub(crate) bold: bool,
    pub(crate) text_colour: Argb,
    pub(crate) text_relative_size: f32,
    pub(crate) instances_colour: Argb,
    pub(crate) instances_relative_size: f32,
    pub(crate) background: Option<Argb>,
}

impl DayCellView {
    /// The day number followed by the instance symbol, or a space when
    /// there is none
    pub(crate) fn text(&self) -> String {
        format!(" {}{}", self.day, self.symbol.unwrap_or(' '))
    }
}

/// Everything one pass draws, in drawing order.  A layout is complete before
/// any of it reaches a renderer.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct WidgetLayout {
    pub(crate) background: Argb,
    pub(crate) header: HeaderView,
    pub(crate) day_headers: Vec<DayHeaderView>,
    pub(crate) weeks: Vec<Vec<DayCellView>>,
}

impl WidgetLayout {
    pub(crate) fn draw<R: WidgetRenderer + ?Sized>(&self, renderer: &mut R) {
        renderer.set_background(self.background);
        renderer.set_month_year_header(&self.header);
        for header in &self.day_headers {
            renderer.add_day_header(header);
        }
        for week in &self.weeks {
            renderer.add_week_row();
            for cell in week {
                renderer.add_day_cell(cell);
            }
        }
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub(crate) enum RenderError {
    #[error("calendar access is required to show events")]
    NeedsPermission,
    #[error(transparent)]
    OutOfTime(#[from] OutOfTimeError),
    #[error(transparent)]
    Colour(#[from] ColourError),
}

/// Source of the current moment, optionally pinned to a fixed date.  The
/// local offset is looked up again on every reading so that timezone and DST
/// changes show up without a restart.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Clock {
    offset: UtcOffset,
    date: Option<Date>,
    local_offset: fn() -> Option<UtcOffset>,
}

impl Clock {
    pub(crate) fn new(offset: UtcOffset, date: Option<Date>) -> Clock {
        Clock {
            offset,
            date,
            local_offset: || UtcOffset::current_local_offset().ok(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_offset_source(mut self, source: fn() -> Option<UtcOffset>) -> Clock {
        self.local_offset = source;
        self
    }

    /// Falls back to the last known offset when the local one is unavailable
    pub(crate) fn now(&mut self) -> OffsetDateTime {
        match (self.local_offset)() {
            Some(offset) if offset != self.offset => {
                info!(from = %self.offset, to = %offset, "local offset changed");
                self.offset = offset;
            }
            Some(_) => (),
            None => debug!(offset = %self.offset, "local offset unavailable; keeping last one"),
        }
        let now = OffsetDateTime::now_utc().to_offset(self.offset);
        match self.date {
            Some(date) => now.replace_date(date),
            None => now,
        }
    }
}

/// The calendar widget: preferences, platform and event source that together
/// decide what a pass draws
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct CalendarWidget<S, P, E> {
    preferences: Preferences<S>,
    platform: P,
    capabilities: Capabilities,
    events: E,
}

impl<S: KeyValueStore, P: Platform, E: EventProvider> CalendarWidget<S, P, E> {
    pub(crate) fn new(
        preferences: Preferences<S>,
        platform: P,
        capabilities: Capabilities,
        events: E,
    ) -> CalendarWidget<S, P, E> {
        CalendarWidget {
            preferences,
            platform,
            capabilities,
            events,
        }
    }

    pub(crate) fn preferences(&self) -> &Preferences<S> {
        &self.preferences
    }

    pub(crate) fn preferences_mut(&mut self) -> &mut Preferences<S> {
        &mut self.preferences
    }

    pub(crate) fn layout<M: WidgetMeasure + ?Sized>(
        &self,
        measure: &M,
        now: OffsetDateTime,
    ) -> Result<WidgetLayout, RenderError> {
        let prefs = &self.preferences;
        let format = Format::resolve(measure)
            .with_text_size(prefs.get_percentage(WIDGET_TEXT_SIZE));
        let theme = prefs.get_enum(WIDGET_THEME);
        let transparency = Transparency(prefs.get_percentage(WIDGET_TRANSPARENCY));
        let first_day = prefs.resolve_first_day_of_week(&self.platform, self.capabilities);
        let language = prefs.resolve_language(&self.platform, self.capabilities);
        let today = now.date();
        debug!(%today, %first_day, ?language, ?theme, "starting widget pass");

        let grid = CalendarGrid::build(today, first_day, prefs.get_bool(FOCUS_ON_CURRENT_WEEK))?;
        let instances = self.query_instances(&grid, now.offset())?;
        let show_declined = prefs.get_bool(SHOW_DECLINED_EVENTS);
        let symbol_set = prefs.get_enum(INSTANCES_SYMBOL_SET);
        let instances_colour = Argb::parse(prefs.get_enum(INSTANCES_COLOUR).hex())?;
        let palette = ThemeColours::new(theme, transparency)?;

        let header = MonthYearHeader::new(today, language, &format);
        let header = HeaderView {
            month_label: header.month_label,
            year_suffix: header.year_suffix,
            year_relative_size: header.year_relative_size,
            text_colour: palette.main_text,
            text_relative_size: format.header_text_relative_size,
        };
        let day_headers = day_headers(&grid, language, &format)
            .into_iter()
            .map(|h| {
                Ok(DayHeaderView {
                    text: h.label,
                    text_colour: palette.main_text,
                    text_relative_size: format.header_text_relative_size,
                    background: palette.day_header_background(h.weekday)?,
                })
            })
            .collect::<Result<Vec<_>, ColourError>>()?;
        let weeks = grid
            .weeks()
            .iter()
            .map(|week| {
                week.cells()
                    .iter()
                    .map(|&cell| {
                        let decorated = decorate(
                            cell,
                            &instances,
                            now.offset(),
                            show_declined,
                            symbol_set,
                            instances_colour,
                        );
                        let view = palette.day_cell(&decorated, &format)?;
                        trace!(
                            date = %view.date,
                            instances = decorated.instance_count,
                            "decorated day"
                        );
                        Ok(view)
                    })
                    .collect::<Result<Vec<_>, ColourError>>()
            })
            .collect::<Result<Vec<_>, ColourError>>()?;
        info!(
            header = %header.text(),
            weeks = weeks.len(),
            instances = instances.len(),
            "widget layout ready"
        );
        Ok(WidgetLayout {
            background: palette.background,
            header,
            day_headers,
            weeks,
        })
    }

    /// Fetches the instances for the whole grid in one query
    fn query_instances(
        &self,
        grid: &CalendarGrid,
        offset: UtcOffset,
    ) -> Result<Vec<Instance>, RenderError> {
        let (Some(first), Some(last)) = (grid.first_date(), grid.last_date()) else {
            return Ok(Vec::new());
        };
        let (start, _) = day_bounds(first, offset);
        let (_, end) = day_bounds(last, offset);
        match self.events.query(start, end) {
            Ok(instances) => Ok(instances),
            Err(QueryError::PermissionDenied) => {
                warn!("calendar permission denied; abandoning pass");
                Err(RenderError::NeedsPermission)
            }
            Err(e) => {
                warn!(error = %e, "could not query instances; showing none");
                Ok(Vec::new())
            }
        }
    }
}

/// A theme's colours with the pass's transparency applied
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct ThemeColours {
    theme: Theme,
    transparency: Transparency,
    background: Argb,
    main_text: Argb,
    muted_text: Argb,
}

impl ThemeColours {
    fn new(theme: Theme, transparency: Transparency) -> Result<ThemeColours, ColourError> {
        Ok(ThemeColours {
            theme,
            transparency,
            background: with_transparency(
                theme.main_background(),
                transparency,
                TransparencyRange::Complete,
            )?,
            main_text: Argb::parse(theme.main_text())?,
            muted_text: Argb::parse(theme.muted_text())?,
        })
    }

    fn day_header_background(&self, weekday: time::Weekday) -> Result<Option<Argb>, ColourError> {
        self.theme
            .day_header_background(weekday)
            .map(|c| with_transparency(c, self.transparency, TransparencyRange::Low))
            .transpose()
    }

    fn day_cell_background(&self, cell: &DayCell) -> Result<Option<Argb>, ColourError> {
        let range = if cell.is_today {
            TransparencyRange::Moderate
        } else {
            TransparencyRange::Low
        };
        self.theme
            .day_cell_background(cell)
            .map(|c| with_transparency(c, self.transparency, range))
            .transpose()
    }

    fn day_cell(
        &self,
        decorated: &DecoratedCell,
        format: &Format,
    ) -> Result<DayCellView, ColourError> {
        let cell = &decorated.cell;
        Ok(DayCellView {
            date: cell.date,
            day: format!("{:>2}", cell.date.day()),
            symbol: decorated.symbol,
            bold: decorated.is_bold,
            text_colour: if cell.is_current_month {
                self.main_text
            } else {
                self.muted_text
            },
            text_relative_size: format.day_cell_text_relative_size,
            instances_colour: decorated.instances_colour,
            instances_relative_size: decorated.instances_relative_size,
            background: self.day_cell_background(cell)?,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{Instruction, RecordingRenderer};
    use super::*;
    use crate::events::testing::FixedProvider;
    use crate::format::FixedWidth;
    use crate::platform::testing::FakePlatform;
    use crate::store::testing::MemoryStore;
    use crate::store::StoredValue;
    use time::macros::{date, datetime, offset};

    type TestWidget = CalendarWidget<MemoryStore, FakePlatform, FixedProvider>;

    fn widget(
        entries: Vec<(&'static str, StoredValue)>,
        events: Result<Vec<Instance>, QueryError>,
    ) -> TestWidget {
        CalendarWidget::new(
            Preferences::new(MemoryStore::with(entries)),
            FakePlatform::default(),
            Capabilities::new(0),
            FixedProvider(events),
        )
    }

    fn meeting(start: OffsetDateTime, is_declined: bool) -> Instance {
        Instance {
            start,
            end: start + time::Duration::hours(1),
            is_declined,
        }
    }

    const NOW: OffsetDateTime = datetime!(2018-12-04 15:30 UTC);

    // Nothing reaches `renderer` unless the whole layout could be computed
    fn render(w: &TestWidget, renderer: &mut RecordingRenderer) -> Result<(), RenderError> {
        w.layout(&FixedWidth(230), NOW)?.draw(renderer);
        Ok(())
    }

    #[test]
    fn test_end_to_end_month() {
        let w = widget(
            Vec::new(),
            Ok(vec![
                meeting(datetime!(2018-12-04 09:00 UTC), false),
                meeting(datetime!(2018-12-04 11:00 UTC), false),
                meeting(datetime!(2018-12-05 11:00 UTC), true),
                meeting(datetime!(2019-01-06 20:00 UTC), false),
            ]),
        );
        let mut renderer = RecordingRenderer::default();
        render(&w, &mut renderer).unwrap();
        let ins = &renderer.instructions;
        assert_eq!(
            ins[..9],
            [
                Instruction::Background(Argb(0xCC00_0000)),
                Instruction::MonthYearHeader("December 18".into()),
                Instruction::DayHeader("Mon".into()),
                Instruction::DayHeader("Tue".into()),
                Instruction::DayHeader("Wed".into()),
                Instruction::DayHeader("Thu".into()),
                Instruction::DayHeader("Fri".into()),
                Instruction::DayHeader("Sat".into()),
                Instruction::DayHeader("Sun".into()),
            ]
        );
        assert_eq!(ins.len(), 9 + 6 * 8);
        assert_eq!(
            ins.iter().filter(|i| **i == Instruction::WeekRow).count(),
            6
        );
        let cells = &renderer.cells;
        assert_eq!(cells.len(), 42);
        assert_eq!(cells[0].date, date!(2018 - 11 - 26));
        assert_eq!(cells[41].date, date!(2019 - 01 - 06));
        let today = &cells[8];
        assert_eq!(today.date, date!(2018 - 12 - 04));
        assert_eq!(today.text(), "  4∶");
        assert!(today.bold);
        assert_eq!(today.instances_colour, Argb(0xFF00_BCD4));
        assert!(today.instances_relative_size < 1.0);
        assert!(today.background.is_some());
        assert_eq!(cells[9].text(), "  5 ");
        assert_eq!(cells[41].text(), "  6·");
        assert!(!cells[41].bold);
        assert_eq!(cells[41].text_colour, Argb(0xFF7F_7F7F));
    }

    #[test]
    fn test_focus_mode_and_narrow_format() {
        let w = widget(
            vec![
                (FOCUS_ON_CURRENT_WEEK.key, StoredValue::Bool(true)),
                (SHOW_DECLINED_EVENTS.key, StoredValue::Bool(true)),
                (INSTANCES_SYMBOL_SET.key, StoredValue::Str("NUMBERS".into())),
            ],
            Ok(vec![meeting(datetime!(2018-12-05 11:00 UTC), true)]),
        );
        let layout = w.layout(&FixedWidth(100), NOW).unwrap();
        assert_eq!(layout.header.text(), "Dec 18");
        assert_eq!(layout.weeks.len(), 1);
        let headers = layout
            .day_headers
            .iter()
            .map(|h| h.text.as_str())
            .collect::<Vec<_>>();
        assert_eq!(headers, ["M", "T", "W", "T", "F", "S", "S"]);
        assert_eq!(layout.weeks[0][2].text(), "  51");
    }

    #[test]
    fn test_weekend_backgrounds() {
        let w = widget(Vec::new(), Ok(Vec::new()));
        let layout = w.layout(&FixedWidth(230), NOW).unwrap();
        let backgrounds = layout
            .day_headers
            .iter()
            .map(|h| h.background.is_some())
            .collect::<Vec<_>>();
        assert_eq!(backgrounds, [false, false, false, false, false, true, true]);
        // Saturdays 2018-12-01 (this month) and 2019-01-05 (next month)
        assert!(layout.weeks[0][5].background.is_some());
        assert!(layout.weeks[5][5].background.is_none());
    }

    #[test]
    fn test_permission_denied_draws_nothing() {
        let w = widget(Vec::new(), Err(QueryError::PermissionDenied));
        let mut renderer = RecordingRenderer::default();
        assert_eq!(
            render(&w, &mut renderer),
            Err(RenderError::NeedsPermission)
        );
        assert!(renderer.instructions.is_empty());
    }

    #[test]
    fn test_unavailable_events_show_none() {
        let w = widget(
            Vec::new(),
            Err(QueryError::Unavailable("provider crashed".into())),
        );
        let mut renderer = RecordingRenderer::default();
        render(&w, &mut renderer).unwrap();
        assert_eq!(renderer.cells.len(), 42);
        assert!(renderer.cells.iter().all(|c| c.symbol.is_none()));
    }

    #[test]
    fn test_transparency_preference() {
        let w = widget(
            vec![
                (WIDGET_TRANSPARENCY.key, StoredValue::Int(100)),
                (WIDGET_THEME.key, StoredValue::Str("LIGHT".into())),
            ],
            Ok(Vec::new()),
        );
        let layout = w.layout(&FixedWidth(230), NOW).unwrap();
        assert_eq!(layout.background, Argb(0x00FF_FFFF));
        assert_eq!(layout.header.text_colour, Argb(0xFF00_0000));
    }

    #[test]
    fn test_text_size_preference() {
        let w = widget(vec![], Ok(Vec::new()));
        let layout = w.layout(&FixedWidth(230), NOW).unwrap();
        assert_eq!(layout.header.text_relative_size, 1.0);
        assert_eq!(layout.weeks[0][0].text_relative_size, 1.0);
        let w = widget(
            vec![(WIDGET_TEXT_SIZE.key, StoredValue::Int(100))],
            Ok(Vec::new()),
        );
        let layout = w.layout(&FixedWidth(230), NOW).unwrap();
        assert_eq!(layout.header.text_relative_size, 1.6);
        assert_eq!(layout.day_headers[0].text_relative_size, 1.6);
        assert!(layout
            .weeks
            .iter()
            .flatten()
            .all(|c| c.text_relative_size == 1.6));
        let w = widget(
            vec![(WIDGET_TEXT_SIZE.key, StoredValue::Int(0))],
            Ok(Vec::new()),
        );
        let layout = w.layout(&FixedWidth(230), NOW).unwrap();
        assert_eq!(layout.weeks[5][6].text_relative_size, 0.6);
    }

    #[test]
    fn test_first_day_from_locale() {
        let w = CalendarWidget::new(
            Preferences::new(MemoryStore::default()),
            FakePlatform {
                locale: Some("en-US".into()),
                first_day_of_week: None,
                app_language: None,
            },
            Capabilities::new(0),
            FixedProvider(Ok(Vec::new())),
        );
        let layout = w.layout(&FixedWidth(230), NOW).unwrap();
        assert_eq!(layout.day_headers[0].text, "Sun");
        assert_eq!(layout.weeks[0][0].date, date!(2018 - 11 - 25));
    }

    #[test]
    fn test_clock_pinned_date() {
        let mut clock = Clock::new(UtcOffset::UTC, Some(date!(2018 - 12 - 04)))
            .with_offset_source(|| None);
        assert_eq!(clock.now().date(), date!(2018 - 12 - 04));
    }

    #[test]
    fn test_clock_follows_local_offset() {
        let mut clock =
            Clock::new(offset!(+1), None).with_offset_source(|| Some(offset!(+2)));
        assert_eq!(clock.now().offset(), offset!(+2));
        let mut clock = clock.with_offset_source(|| None);
        assert_eq!(clock.now().offset(), offset!(+2));
        let mut clock = Clock::new(offset!(-5), None).with_offset_source(|| None);
        assert_eq!(clock.now().offset(), offset!(-5));
    }
}
