mod app;
mod calendar;
mod colour;
mod config;
mod decoration;
mod events;
mod format;
mod help;
mod locale;
mod logging;
mod platform;
mod render;
mod store;
mod theme;
mod widget;
use crate::app::{buffer_lines, App};
use crate::config::Preferences;
use crate::events::JsonFileProvider;
use crate::logging::{init_logging, LOG_FILE_NAME};
use crate::platform::{Capabilities, EnvPlatform};
use crate::render::{CalendarWidget, Clock};
use crate::store::{JsonFileStore, STORE_ID};
use crate::widget::WIDGET_WIDTH;
use anyhow::Context;
use lexopt::{Arg, Parser, ValueExt};
use ratatui::{layout::Rect, DefaultTerminal};
use std::path::PathBuf;
use time::{format_description::FormatItem, macros::format_description, Date, UtcOffset};
use tracing::info;

static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Directory under the platform's config & data directories
const APP_DIR: &str = "mincal";

const EVENTS_FILE_NAME: &str = "events.json";

/// Rows given to `--print` output; enough for a six-week month
const PRINT_HEIGHT: u16 = 11;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct RunOptions {
    prefs: Option<PathBuf>,
    events: Option<PathBuf>,
    width: Option<i32>,
    api_level: u32,
    print: bool,
    date: Option<Date>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run(RunOptions),
    Set {
        prefs: Option<PathBuf>,
        key: String,
        value: String,
    },
    Clear {
        prefs: Option<PathBuf>,
    },
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut opts = RunOptions::default();
        let mut args = Vec::new();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Long("prefs") => opts.prefs = Some(PathBuf::from(parser.value()?)),
                Arg::Long("events") => opts.events = Some(PathBuf::from(parser.value()?)),
                Arg::Long("width") => opts.width = Some(parser.value()?.parse()?),
                Arg::Long("api-level") => opts.api_level = parser.value()?.parse()?,
                Arg::Long("print") => opts.print = true,
                Arg::Value(value) => args.push(value.string()?),
                _ => return Err(arg.unexpected()),
            }
        }
        let mut args = args.into_iter();
        match args.next().as_deref() {
            Some("set") => match (args.next(), args.next(), args.next()) {
                (Some(key), Some(value), None) => Ok(Command::Set {
                    prefs: opts.prefs,
                    key,
                    value,
                }),
                _ => Err(lexopt::Error::from("usage: mincal set KEY VALUE")),
            },
            Some("clear") => match args.next() {
                None => Ok(Command::Clear { prefs: opts.prefs }),
                Some(value) => Err(lexopt::Error::UnexpectedArgument(value.into())),
            },
            Some(value) => {
                if let Some(extra) = args.next() {
                    return Err(lexopt::Error::UnexpectedArgument(extra.into()));
                }
                match Date::parse(value, &YMD_FMT) {
                    Ok(d) => opts.date = Some(d),
                    Err(e) => {
                        return Err(lexopt::Error::ParsingFailed {
                            value: value.to_owned(),
                            error: Box::new(e),
                        })
                    }
                }
                Ok(Command::Run(opts))
            }
            None => Ok(Command::Run(opts)),
        }
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run(opts) => {
                let offset = UtcOffset::current_local_offset()
                    .context("failed to determine local time offset")?;
                init_logging(default_path(dirs::data_local_dir(), LOG_FILE_NAME).as_deref());
                let prefs_path = prefs_path(opts.prefs)?;
                let events_path = match opts.events {
                    Some(p) => p,
                    None => default_path(dirs::data_dir(), EVENTS_FILE_NAME)
                        .context("failed to determine data directory")?,
                };
                info!(
                    prefs = %prefs_path.display(),
                    events = %events_path.display(),
                    api_level = opts.api_level,
                    "starting"
                );
                let store = JsonFileStore::open_or_default(prefs_path);
                let widget = CalendarWidget::new(
                    Preferences::new(store),
                    EnvPlatform::from_env(),
                    Capabilities::new(opts.api_level),
                    JsonFileProvider::new(events_path),
                );
                let mut app = App::new(widget, Clock::new(offset, opts.date), opts.width);
                if opts.print {
                    let (columns, _) = crossterm::terminal::size().unwrap_or((80, 24));
                    let buffer =
                        app.snapshot(Rect::new(0, 0, columns.max(WIDGET_WIDTH), PRINT_HEIGHT));
                    for line in dedent(buffer_lines(&buffer)) {
                        println!("{line}");
                    }
                    Ok(())
                } else {
                    with_terminal(|mut terminal| {
                        terminal.hide_cursor().context("failed to hide cursor")?;
                        app.run(terminal)?;
                        Ok(())
                    })
                }
            }
            Command::Set { prefs, key, value } => {
                let store = JsonFileStore::open(prefs_path(prefs)?)
                    .context("failed to open preference store")?;
                Preferences::new(store)
                    .set_by_name(&key, &value)
                    .with_context(|| format!("failed to set {key}"))?;
                Ok(())
            }
            Command::Clear { prefs } => {
                let store = JsonFileStore::open(prefs_path(prefs)?)
                    .context("failed to open preference store")?;
                Preferences::new(store)
                    .clear_all()
                    .context("failed to clear preferences")?;
                Ok(())
            }
            Command::Help => {
                println!("Usage: mincal [<options>] [YYYY-MM-DD]");
                println!("       mincal [--prefs FILE] set KEY VALUE");
                println!("       mincal [--prefs FILE] clear");
                println!();
                println!("Minimal month calendar widget for the terminal");
                println!();
                println!("Options:");
                println!("  --prefs FILE      Read & write preferences in FILE");
                println!("  --events FILE     Read calendar events from FILE");
                println!("  --width DP        Lay out as if the widget were DP wide");
                println!("  --api-level N     Assume platform API level N [default: 0]");
                println!("  --print           Print the widget once instead of running");
                println!("  -h, --help        Display this help message and exit");
                println!("  -V, --version     Show the program version and exit");
                println!();
                println!("Preferences:");
                println!("  WIDGET_THEME            DARK, GREY, LIGHT");
                println!("  WIDGET_TRANSPARENCY     0-100");
                println!("  WIDGET_TEXT_SIZE        0-100 [default: 40]");
                println!("  FIRST_DAY_OF_WEEK       MONDAY ... SUNDAY");
                println!("  INSTANCES_SYMBOL_SET    MINIMAL, VERTICAL, CIRCLES, NUMBERS, ROMAN, BINARY, NONE");
                println!("  INSTANCES_COLOUR        CYAN, MINT, BLUE, GREEN, YELLOW, BLACK, WHITE");
                println!("  SHOW_DECLINED_EVENTS    true, false");
                println!("  FOCUS_ON_CURRENT_WEEK   true, false");
                println!("  LANGUAGE                ENGLISH, SPANISH, CATALAN, FRENCH, GERMAN");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn default_path(base: Option<PathBuf>, file_name: &str) -> Option<PathBuf> {
    base.map(|dir| dir.join(APP_DIR).join(file_name))
}

fn prefs_path(explicit: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    match explicit {
        Some(p) => Ok(p),
        None => default_path(dirs::config_dir(), &format!("{STORE_ID}.json"))
            .context("failed to determine configuration directory"),
    }
}

/// Drops blank lines at either end and the indentation common to all lines
fn dedent(lines: Vec<String>) -> Vec<String> {
    let start = lines.iter().position(|s| !s.is_empty()).unwrap_or(lines.len());
    let end = lines
        .iter()
        .rposition(|s| !s.is_empty())
        .map_or(start, |i| i + 1);
    let lines = lines.get(start..end).unwrap_or_default();
    let indent = lines
        .iter()
        .filter(|s| !s.is_empty())
        .map(|s| s.len() - s.trim_start().len())
        .min()
        .unwrap_or(0);
    lines
        .iter()
        .map(|s| s.get(indent..).unwrap_or_default().to_owned())
        .collect()
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = func(terminal);
    ratatui::restore();
    r
}
