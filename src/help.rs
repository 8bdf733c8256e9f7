use ratatui::{
    buffer::Buffer,
    layout::Flex,
    layout::{Alignment, Layout, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Widget, Wrap},
};

static HELP_TEXT: &[&str] = &[
    "r               Redraw now",
    "f               Toggle focus on the current week",
    "d               Toggle declined events",
    "t               Switch to the next theme",
    "s               Switch to the next symbol set",
    "?               Show this help",
    "q, ESC          Quit",
    "",
    "Press the Any Key to dismiss.",
];

static PERMISSION_TEXT: &[&str] = &[
    "Calendar access is required.",
    "",
    "Make the events file readable,",
    "then press r to try again.",
];

/// A bordered box of text drawn over the middle of its area
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Popup {
    title: &'static str,
    lines: Vec<String>,
    style: Style,
}

impl Popup {
    pub(crate) fn help(style: Style) -> Popup {
        Popup::new(" Commands ", HELP_TEXT, style)
    }

    pub(crate) fn permission(style: Style) -> Popup {
        Popup::new(" Calendar ", PERMISSION_TEXT, style)
    }

    pub(crate) fn error(message: String, style: Style) -> Popup {
        Popup {
            title: " Error ",
            lines: vec![message],
            style,
        }
    }

    fn new(title: &'static str, text: &[&str], style: Style) -> Popup {
        Popup {
            title,
            lines: text.iter().map(|&s| s.to_owned()).collect(),
            style,
        }
    }
}

impl Widget for &Popup {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = self
            .lines
            .iter()
            .map(|s| Line::raw(s.as_str()))
            .collect::<Vec<_>>();
        let text = Text::from(lines);
        let height = u16::try_from(text.height())
            .unwrap_or(u16::MAX)
            .saturating_add(2)
            .min(area.height);
        let width = u16::try_from(text.width())
            .unwrap_or(u16::MAX)
            .saturating_add(2)
            .min(area.width);
        let para = Paragraph::new(text)
            .wrap(Wrap { trim: false })
            .block(
                Block::bordered()
                    .title(self.title)
                    .title_alignment(Alignment::Center),
            )
            .style(self.style);
        let [popup_area] = Layout::horizontal([width]).flex(Flex::Center).areas(area);
        let [popup_area] = Layout::vertical([height])
            .flex(Flex::Center)
            .areas(popup_area);
        let outer_area = Rect {
            x: popup_area.x.saturating_sub(1),
            y: popup_area.y,
            width: popup_area.width.saturating_add(2).min(area.width),
            height: popup_area.height,
        };
        Clear.render(outer_area, buf);
        Block::new().style(self.style).render(outer_area, buf);
        para.render(popup_area, buf);
    }
}
