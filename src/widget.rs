use crate::colour::Argb;
use crate::format::{MeasureError, Orientation, WidgetMeasure};
use crate::render::{DayCellView, DayHeaderView, HeaderView, WidgetLayout, WidgetRenderer};
use ratatui::{
    buffer::Buffer,
    layout::{Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Text},
    widgets::{Clear, Paragraph, Widget},
};

/// Columns per day of week
const CELL_WIDTH: u16 = 5;

/// Columns left blank on either side of the grid
const MARGIN: u16 = 1;

pub(crate) const WIDGET_WIDTH: u16 = 2 * MARGIN + 7 * CELL_WIDTH;

const HEADER_ROW: u16 = 1;

const DAY_HEADER_ROW: u16 = 3;

/// Row of the first week; each week takes one row
const WEEKS_TOP: u16 = 4;

/// Text drawn at less than this relative size is dimmed, as terminals can't
/// shrink it
const DIM_BELOW: f32 = 0.75;

/// dp per terminal column when estimating the smallest width of the widget
const MIN_DP_PER_COLUMN: i32 = 4;

/// dp per terminal column when estimating the largest width of the widget
const MAX_DP_PER_COLUMN: i32 = 5;

const BLACK: [u8; 3] = [0, 0, 0];

impl Widget for &WidgetLayout {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let height = u16::try_from(self.weeks.len())
            .unwrap_or(u16::MAX)
            .saturating_add(WEEKS_TOP + 1);
        let [area] = Layout::horizontal([WIDGET_WIDTH])
            .flex(Flex::Center)
            .areas(area);
        let [area] = Layout::vertical([height]).flex(Flex::Center).areas(area);
        let mut canvas = TerminalCanvas::new(area, buf);
        self.draw(&mut canvas);
    }
}

/// Draws render instructions into a region of a terminal buffer
#[derive(Debug, Eq, PartialEq)]
pub(crate) struct TerminalCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
    background: [u8; 3],
    header_column: u16,
    week: Option<u16>,
    column: u16,
}

impl<'a> TerminalCanvas<'a> {
    pub(crate) fn new(area: Rect, buf: &'a mut Buffer) -> Self {
        TerminalCanvas {
            area,
            buf,
            background: BLACK,
            header_column: 0,
            week: None,
            column: 0,
        }
    }

    fn text_style(&self, colour: Argb, relative_size: f32) -> Style {
        Style::new()
            .fg(rgb(composite(colour, self.background)))
            .add_modifier(size_modifier(relative_size))
    }

    fn fill_background(&mut self, y: u16, x: u16, width: u16, colour: Option<Argb>) {
        if let Some(colour) = colour {
            let style = Style::new().bg(rgb(composite(colour, self.background)));
            self.fill(y, x, width, style);
        }
    }

    fn fill(&mut self, y: u16, x: u16, width: u16, style: Style) {
        if y < self.area.height && x < self.area.width {
            let rect = Rect {
                x: x + self.area.x,
                y: y + self.area.y,
                width: (self.area.width - x).min(width),
                height: 1,
            };
            self.buf.set_style(rect, style);
        }
    }

    fn mvprint<S: AsRef<str>>(&mut self, y: u16, x: u16, s: S, style: Style) {
        if y < self.area.height && x < self.area.width {
            let text = Text::styled(s.as_ref(), style);
            let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
            // A Paragraph truncates whatever extends past the canvas, but
            // only if its own Rect lies within the buffer.
            Paragraph::new(text).render(
                Rect {
                    x: x + self.area.x,
                    y: y + self.area.y,
                    width: (self.area.width - x).min(width),
                    height: 1,
                },
                self.buf,
            );
        }
    }
}

impl WidgetRenderer for TerminalCanvas<'_> {
    fn set_background(&mut self, colour: Argb) {
        self.background = composite(colour, BLACK);
        Clear.render(self.area, self.buf);
        self.buf
            .set_style(self.area, Style::new().bg(rgb(self.background)));
    }

    fn set_month_year_header(&mut self, header: &HeaderView) {
        let x = MARGIN + 1;
        let month_style = self
            .text_style(header.text_colour, header.text_relative_size)
            .add_modifier(Modifier::BOLD);
        self.mvprint(HEADER_ROW, x, &header.month_label, month_style);
        let month_width = u16::try_from(Span::raw(header.month_label.as_str()).width())
            .unwrap_or(u16::MAX);
        let year_style = self.text_style(header.text_colour, header.year_relative_size);
        self.mvprint(
            HEADER_ROW,
            x.saturating_add(month_width).saturating_add(1),
            &header.year_suffix,
            year_style,
        );
    }

    fn add_day_header(&mut self, header: &DayHeaderView) {
        let x = MARGIN + self.header_column * CELL_WIDTH;
        self.fill_background(DAY_HEADER_ROW, x, CELL_WIDTH, header.background);
        let style = self.text_style(header.text_colour, header.text_relative_size);
        self.mvprint(DAY_HEADER_ROW, x + 1, &header.text, style);
        self.header_column += 1;
    }

    fn add_week_row(&mut self) {
        self.week = Some(self.week.map_or(0, |w| w + 1));
        self.column = 0;
    }

    fn add_day_cell(&mut self, cell: &DayCellView) {
        let y = WEEKS_TOP + self.week.unwrap_or(0);
        let x = MARGIN + self.column * CELL_WIDTH;
        self.fill_background(y, x, CELL_WIDTH, cell.background);
        let mut day_style = self.text_style(cell.text_colour, cell.text_relative_size);
        if cell.bold {
            day_style = day_style.add_modifier(Modifier::BOLD);
        }
        self.mvprint(y, x, cell.text(), day_style);
        if let Some(symbol) = cell.symbol {
            let style = self.text_style(cell.instances_colour, cell.instances_relative_size);
            self.mvprint(y, x + 3, symbol.to_string(), style);
        }
        self.column += 1;
    }
}

/// Alpha-blends `colour` over an opaque RGB colour
fn composite(colour: Argb, under: [u8; 3]) -> [u8; 3] {
    let alpha = u16::from(colour.alpha());
    let mix = |over: u8, under: u8| {
        let v = (u16::from(over) * alpha + u16::from(under) * (255 - alpha)) / 255;
        u8::try_from(v).unwrap_or(u8::MAX)
    };
    [
        mix(colour.red(), under[0]),
        mix(colour.green(), under[1]),
        mix(colour.blue(), under[2]),
    ]
}

fn rgb([r, g, b]: [u8; 3]) -> Color {
    Color::Rgb(r, g, b)
}

fn size_modifier(relative_size: f32) -> Modifier {
    if relative_size < DIM_BELOW {
        Modifier::DIM
    } else {
        Modifier::empty()
    }
}

/// Widget measurement derived from the terminal area available to it
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct TerminalMeasure(pub(crate) Rect);

impl WidgetMeasure for TerminalMeasure {
    fn orientation(&self) -> Result<Orientation, MeasureError> {
        if self.0.width == 0 || self.0.height == 0 {
            return Err(MeasureError(format!(
                "terminal area is {}x{}",
                self.0.width, self.0.height
            )));
        }
        if u32::from(self.0.width) > 2 * u32::from(self.0.height) {
            Ok(Orientation::Landscape)
        } else {
            Ok(Orientation::Portrait)
        }
    }

    fn min_width(&self) -> Result<i32, MeasureError> {
        Ok(i32::from(self.0.width) * MIN_DP_PER_COLUMN)
    }

    fn max_width(&self) -> Result<i32, MeasureError> {
        Ok(i32::from(self.0.width) * MAX_DP_PER_COLUMN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Preferences;
    use crate::events::testing::FixedProvider;
    use crate::events::Instance;
    use crate::format::FixedWidth;
    use crate::platform::testing::FakePlatform;
    use crate::platform::Capabilities;
    use crate::render::CalendarWidget;
    use crate::store::testing::MemoryStore;
    use time::macros::datetime;

    fn december_2018() -> WidgetLayout {
        let widget = CalendarWidget::new(
            Preferences::new(MemoryStore::default()),
            FakePlatform::default(),
            Capabilities::new(0),
            FixedProvider(Ok(vec![
                Instance {
                    start: datetime!(2018-12-04 09:00 UTC),
                    end: datetime!(2018-12-04 10:00 UTC),
                    is_declined: false,
                },
                Instance {
                    start: datetime!(2018-12-04 13:00 UTC),
                    end: datetime!(2018-12-04 14:00 UTC),
                    is_declined: false,
                },
            ])),
        );
        widget
            .layout(&FixedWidth(230), datetime!(2018-12-04 15:30 UTC))
            .unwrap()
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        let area = buf.area;
        (area.x..area.x + area.width)
            .map(|x| buf[(x, y)].symbol())
            .collect()
    }

    #[test]
    fn test_render_month() {
        let layout = december_2018();
        let area = Rect::new(0, 0, WIDGET_WIDTH, 11);
        let mut buffer = Buffer::empty(area);
        (&layout).render(area, &mut buffer);
        let rows = (0..11).map(|y| row_text(&buffer, y)).collect::<Vec<_>>();
        assert_eq!(
            rows,
            [
                "                                     ",
                "  December 18                        ",
                "                                     ",
                "  Mon  Tue  Wed  Thu  Fri  Sat  Sun  ",
                "  26   27   28   29   30    1    2   ",
                "   3    4∶   5    6    7    8    9   ",
                "  10   11   12   13   14   15   16   ",
                "  17   18   19   20   21   22   23   ",
                "  24   25   26   27   28   29   30   ",
                "  31    1    2    3    4    5    6   ",
                "                                     ",
            ]
        );
    }

    #[test]
    fn test_render_styles() {
        let layout = december_2018();
        let area = Rect::new(0, 0, WIDGET_WIDTH, 11);
        let mut buffer = Buffer::empty(area);
        (&layout).render(area, &mut buffer);
        // 20% transparency over black
        assert_eq!(buffer[(0, 0)].bg, Color::Rgb(0, 0, 0));
        // month name bold, year suffix dimmed
        assert!(buffer[(2, 1)].modifier.contains(Modifier::BOLD));
        assert!(buffer[(11, 1)].modifier.contains(Modifier::DIM));
        // today's cell has its own background
        assert_ne!(buffer[(6, 5)].bg, buffer[(11, 5)].bg);
        // day numbers of this month are bold, the others are not
        assert!(buffer[(8, 5)].modifier.contains(Modifier::BOLD));
        assert!(!buffer[(3, 4)].modifier.contains(Modifier::BOLD));
        // symbol in the instances colour
        assert_eq!(buffer[(9, 5)].fg, Color::Rgb(0x00, 0xBC, 0xD4));
        assert!(buffer[(9, 5)].modifier.contains(Modifier::DIM));
    }

    #[test]
    fn test_render_centred() {
        let layout = december_2018();
        let area = Rect::new(0, 0, WIDGET_WIDTH + 4, 15);
        let mut buffer = Buffer::empty(area);
        (&layout).render(area, &mut buffer);
        assert_eq!(
            row_text(&buffer, 3),
            format!("  {}  ", "  December 18                        ")
        );
        assert_eq!(row_text(&buffer, 1), " ".repeat(41));
    }

    #[test]
    fn test_composite() {
        assert_eq!(composite(Argb(0xFFFF_FFFF), BLACK), [255, 255, 255]);
        assert_eq!(composite(Argb(0x00FF_FFFF), [1, 2, 3]), [1, 2, 3]);
        assert_eq!(composite(Argb(0x8000_FF00), BLACK), [0, 128, 0]);
    }

    #[test]
    fn test_terminal_measure() {
        let m = TerminalMeasure(Rect::new(0, 0, 80, 24));
        assert_eq!(m.orientation(), Ok(Orientation::Landscape));
        assert_eq!(m.max_width(), Ok(400));
        let m = TerminalMeasure(Rect::new(0, 0, 40, 30));
        assert_eq!(m.orientation(), Ok(Orientation::Portrait));
        assert_eq!(m.min_width(), Ok(160));
        assert!(TerminalMeasure(Rect::new(0, 0, 0, 0)).orientation().is_err());
    }
}
