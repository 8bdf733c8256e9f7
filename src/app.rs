use crate::config::{
    BooleanPreference, EnumPreference, PersistedName, FOCUS_ON_CURRENT_WEEK, INSTANCES_SYMBOL_SET,
    SHOW_DECLINED_EVENTS, WIDGET_THEME,
};
use crate::events::EventProvider;
use crate::format::FixedWidth;
use crate::help::Popup;
use crate::platform::Platform;
use crate::render::{CalendarWidget, Clock, RenderError, WidgetLayout};
use crate::store::{KeyValueStore, StoreError};
use crate::theme::{BASE_STYLE, NOTICE_STYLE};
use crate::widget::TerminalMeasure;
use crossterm::event::{poll, read, Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget, DefaultTerminal};
use std::io::{self, Write};
use std::time::Duration;
use tracing::{debug, info, warn};

/// How long to wait for input before redrawing anyway, so that the date
/// shown follows the clock
const TICK: Duration = Duration::from_secs(60);

/// What caused a widget pass
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum RedrawTrigger {
    Startup,
    UserAction,
    Resize,
    Tick,
}

#[derive(Clone, Debug)]
pub(crate) struct App<S, P, E> {
    widget: CalendarWidget<S, P, E>,
    clock: Clock,
    width: Option<i32>,
    outcome: Option<Result<WidgetLayout, RenderError>>,
    state: AppState,
}

impl<S: KeyValueStore, P: Platform, E: EventProvider> App<S, P, E> {
    /// `width`, if set, pins the measured widget width in dp instead of
    /// deriving it from the terminal size
    pub(crate) fn new(widget: CalendarWidget<S, P, E>, clock: Clock, width: Option<i32>) -> Self {
        App {
            widget,
            clock,
            width,
            outcome: None,
            state: AppState::Widget,
        }
    }

    pub(crate) fn run(mut self, mut terminal: DefaultTerminal) -> io::Result<()> {
        let mut trigger = RedrawTrigger::Startup;
        while !self.quitting() {
            terminal.draw(|frame| {
                self.pass(frame.area(), trigger);
                frame.render_widget(&self, frame.area());
            })?;
            trigger = self.handle_input()?;
        }
        Ok(())
    }

    /// Runs one widget pass and draws it into a fresh buffer covering `area`
    pub(crate) fn snapshot(&mut self, area: Rect) -> Buffer {
        self.pass(area, RedrawTrigger::Startup);
        let mut buffer = Buffer::empty(area);
        (&*self).render(area, &mut buffer);
        buffer
    }

    fn pass(&mut self, area: Rect, trigger: RedrawTrigger) {
        debug!(?trigger, width = area.width, height = area.height, "redrawing");
        let now = self.clock.now();
        let outcome = match self.width {
            Some(width) => self.widget.layout(&FixedWidth(width), now),
            None => self.widget.layout(&TerminalMeasure(area), now),
        };
        if let Err(ref e) = outcome {
            info!(error = %e, "widget pass abandoned");
        }
        self.outcome = Some(outcome);
    }

    fn handle_input(&mut self) -> io::Result<RedrawTrigger> {
        if !poll(TICK)? {
            return Ok(RedrawTrigger::Tick);
        }
        let event = read()?;
        if matches!(event, Event::Resize(..)) {
            return Ok(RedrawTrigger::Resize);
        }
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = event.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        }
        Ok(RedrawTrigger::UserAction)
    }

    // Returns `false` if the user pressed an invalid key or a preference
    // could not be saved
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match self.state {
            AppState::Widget => match key {
                KeyCode::Char('r') => true,
                KeyCode::Char('f') => self.toggle(FOCUS_ON_CURRENT_WEEK),
                KeyCode::Char('d') => self.toggle(SHOW_DECLINED_EVENTS),
                KeyCode::Char('t') => self.cycle(WIDGET_THEME),
                KeyCode::Char('s') => self.cycle(INSTANCES_SYMBOL_SET),
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Widget;
                true
            }
            AppState::Quitting => false,
        }
    }

    fn toggle(&mut self, item: BooleanPreference) -> bool {
        let value = !self.widget.preferences().get_bool(item);
        saved(item.key, self.widget.preferences_mut().set_bool(item, value))
    }

    fn cycle<T: PersistedName>(&mut self, item: EnumPreference<T>) -> bool {
        let value = self.widget.preferences().get_enum(item).cycle();
        saved(item.key, self.widget.preferences_mut().set_enum(item, value))
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }
}

fn saved(key: &str, result: Result<(), StoreError>) -> bool {
    match result {
        Ok(()) => {
            debug!(key, "preference updated");
            true
        }
        Err(e) => {
            warn!(key, error = %e, "could not save preference");
            false
        }
    }
}

impl<S, P, E> Widget for &App<S, P, E> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        match &self.outcome {
            Some(Ok(layout)) => layout.render(area, buf),
            Some(Err(RenderError::NeedsPermission)) => {
                Popup::permission(NOTICE_STYLE).render(area, buf);
            }
            Some(Err(e)) => Popup::error(e.to_string(), NOTICE_STYLE).render(area, buf),
            None => (),
        }
        if self.state == AppState::Helping {
            Popup::help(BASE_STYLE).render(area, buf);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Widget,
    Helping,
    Quitting,
}

/// The text of each row of `buffer`, with trailing blanks removed
pub(crate) fn buffer_lines(buffer: &Buffer) -> Vec<String> {
    let area = buffer.area;
    (area.y..area.y + area.height)
        .map(|y| {
            let row = (area.x..area.x + area.width)
                .map(|x| buffer[(x, y)].symbol())
                .collect::<String>();
            row.trim_end().to_owned()
        })
        .collect()
}
