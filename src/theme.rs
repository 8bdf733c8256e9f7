use crate::calendar::{DayCell, WeekdayExt};
use crate::config::PersistedName;
use ratatui::style::{Color, Modifier, Style};
use time::Weekday;

/// Style of the terminal chrome around the widget (help popup, notices)
pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub(crate) const NOTICE_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum Theme {
    Dark,
    Grey,
    Light,
}

struct Palette {
    main_background: &'static str,
    main_text: &'static str,
    muted_text: &'static str,
    weekend_header_background: &'static str,
    today_background: &'static str,
    weekend_background: &'static str,
}

static DARK: Palette = Palette {
    main_background: "#000000",
    main_text: "#FFFFFF",
    muted_text: "#7F7F7F",
    weekend_header_background: "#4A4A4A",
    today_background: "#5A6D94",
    weekend_background: "#2E2E2E",
};

static GREY: Palette = Palette {
    main_background: "#333333",
    main_text: "#F0F0F0",
    muted_text: "#9E9E9E",
    weekend_header_background: "#5C5C5C",
    today_background: "#7A8FB8",
    weekend_background: "#474747",
};

static LIGHT: Palette = Palette {
    main_background: "#FFFFFF",
    main_text: "#000000",
    muted_text: "#8A8A8A",
    weekend_header_background: "#D6D6D6",
    today_background: "#A9C1F0",
    weekend_background: "#EBEBEB",
};

impl Theme {
    fn palette(self) -> &'static Palette {
        match self {
            Theme::Dark => &DARK,
            Theme::Grey => &GREY,
            Theme::Light => &LIGHT,
        }
    }

    pub(crate) fn main_background(self) -> &'static str {
        self.palette().main_background
    }

    pub(crate) fn main_text(self) -> &'static str {
        self.palette().main_text
    }

    /// Text colour of days outside the current month
    pub(crate) fn muted_text(self) -> &'static str {
        self.palette().muted_text
    }

    pub(crate) fn day_header_background(self, weekday: Weekday) -> Option<&'static str> {
        weekday
            .is_weekend()
            .then_some(self.palette().weekend_header_background)
    }

    pub(crate) fn day_cell_background(self, cell: &DayCell) -> Option<&'static str> {
        if cell.is_today {
            Some(self.palette().today_background)
        } else if cell.is_current_month && cell.date.weekday().is_weekend() {
            Some(self.palette().weekend_background)
        } else {
            None
        }
    }
}

impl PersistedName for Theme {
    const VARIANTS: &'static [Theme] = &[Theme::Dark, Theme::Grey, Theme::Light];

    fn persisted_name(self) -> &'static str {
        match self {
            Theme::Dark => "DARK",
            Theme::Grey => "GREY",
            Theme::Light => "LIGHT",
        }
    }
}

/// Colour of the instance symbols
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum Colour {
    Cyan,
    Mint,
    Blue,
    Green,
    Yellow,
    Black,
    White,
}

impl Colour {
    pub(crate) fn hex(self) -> &'static str {
        match self {
            Colour::Cyan => "#00BCD4",
            Colour::Mint => "#3EB489",
            Colour::Blue => "#2196F3",
            Colour::Green => "#4CAF50",
            Colour::Yellow => "#FFEB3B",
            Colour::Black => "#000000",
            Colour::White => "#FFFFFF",
        }
    }
}

impl PersistedName for Colour {
    const VARIANTS: &'static [Colour] = &[
        Colour::Cyan,
        Colour::Mint,
        Colour::Blue,
        Colour::Green,
        Colour::Yellow,
        Colour::Black,
        Colour::White,
    ];

    fn persisted_name(self) -> &'static str {
        match self {
            Colour::Cyan => "CYAN",
            Colour::Mint => "MINT",
            Colour::Blue => "BLUE",
            Colour::Green => "GREEN",
            Colour::Yellow => "YELLOW",
            Colour::Black => "BLACK",
            Colour::White => "WHITE",
        }
    }
}
