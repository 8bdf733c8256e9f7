use crate::config::PersistedName;
use time::{Month, Weekday};

/// Regions whose weeks start on Sunday
static SUNDAY_FIRST_REGIONS: &[&str] = &[
    "AG", "AS", "BD", "BR", "BS", "BT", "BW", "BZ", "CA", "CN", "CO", "DM", "DO", "ET", "GT",
    "GU", "HK", "HN", "ID", "IL", "IN", "JM", "JP", "KE", "KH", "KR", "LA", "MH", "MM", "MO",
    "MT", "MX", "MZ", "NI", "NP", "PA", "PE", "PH", "PK", "PR", "PT", "PY", "SA", "SG", "SV",
    "TH", "TT", "TW", "UM", "US", "VE", "VI", "WS", "YE", "ZA", "ZW",
];

/// Regions whose weeks start on Saturday
static SATURDAY_FIRST_REGIONS: &[&str] = &[
    "AE", "AF", "BH", "DJ", "DZ", "EG", "IQ", "IR", "JO", "KW", "LY", "OM", "QA", "SD", "SY",
];

/// Regions whose weeks start on Friday
static FRIDAY_FIRST_REGIONS: &[&str] = &["MV"];

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum Language {
    English,
    Spanish,
    Catalan,
    French,
    German,
}

struct Names {
    months: [&'static str; 12],
    weekdays: [&'static str; 7],
}

static ENGLISH: Names = Names {
    months: [
        "january",
        "february",
        "march",
        "april",
        "may",
        "june",
        "july",
        "august",
        "september",
        "october",
        "november",
        "december",
    ],
    weekdays: [
        "monday",
        "tuesday",
        "wednesday",
        "thursday",
        "friday",
        "saturday",
        "sunday",
    ],
};

static SPANISH: Names = Names {
    months: [
        "enero",
        "febrero",
        "marzo",
        "abril",
        "mayo",
        "junio",
        "julio",
        "agosto",
        "septiembre",
        "octubre",
        "noviembre",
        "diciembre",
    ],
    weekdays: [
        "lunes",
        "martes",
        "miércoles",
        "jueves",
        "viernes",
        "sábado",
        "domingo",
    ],
};

static CATALAN: Names = Names {
    months: [
        "gener", "febrer", "març", "abril", "maig", "juny", "juliol", "agost", "setembre",
        "octubre", "novembre", "desembre",
    ],
    weekdays: [
        "dilluns",
        "dimarts",
        "dimecres",
        "dijous",
        "divendres",
        "dissabte",
        "diumenge",
    ],
};

static FRENCH: Names = Names {
    months: [
        "janvier",
        "février",
        "mars",
        "avril",
        "mai",
        "juin",
        "juillet",
        "août",
        "septembre",
        "octobre",
        "novembre",
        "décembre",
    ],
    weekdays: [
        "lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi", "dimanche",
    ],
};

static GERMAN: Names = Names {
    months: [
        "januar",
        "februar",
        "märz",
        "april",
        "mai",
        "juni",
        "juli",
        "august",
        "september",
        "oktober",
        "november",
        "dezember",
    ],
    weekdays: [
        "montag",
        "dienstag",
        "mittwoch",
        "donnerstag",
        "freitag",
        "samstag",
        "sonntag",
    ],
};

impl Language {
    /// Picks the language named by the primary subtag of a locale tag
    pub(crate) fn from_tag(tag: &str) -> Option<Language> {
        match primary_language(tag).as_str() {
            "en" => Some(Language::English),
            "es" => Some(Language::Spanish),
            "ca" => Some(Language::Catalan),
            "fr" => Some(Language::French),
            "de" => Some(Language::German),
            _ => None,
        }
    }

    fn names(self) -> &'static Names {
        match self {
            Language::English => &ENGLISH,
            Language::Spanish => &SPANISH,
            Language::Catalan => &CATALAN,
            Language::French => &FRENCH,
            Language::German => &GERMAN,
        }
    }

    pub(crate) fn month_name(self, month: Month) -> &'static str {
        self.names().months[usize::from(u8::from(month) - 1)]
    }

    pub(crate) fn weekday_name(self, weekday: Weekday) -> &'static str {
        self.names().weekdays[usize::from(weekday.number_days_from_monday())]
    }
}

impl PersistedName for Language {
    const VARIANTS: &'static [Language] = &[
        Language::English,
        Language::Spanish,
        Language::Catalan,
        Language::French,
        Language::German,
    ];

    fn persisted_name(self) -> &'static str {
        match self {
            Language::English => "ENGLISH",
            Language::Spanish => "SPANISH",
            Language::Catalan => "CATALAN",
            Language::French => "FRENCH",
            Language::German => "GERMAN",
        }
    }
}

/// Takes at most `length` characters of `name` and upper-cases the first one
pub(crate) fn label(name: &str, length: usize) -> String {
    let mut chars = name.chars().take(length);
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Parses a weekday abbreviation such as `mon` or `Sun`
pub(crate) fn parse_weekday_abbreviation(s: &str) -> Option<Weekday> {
    match s.trim().to_ascii_lowercase().as_str() {
        "mon" => Some(Weekday::Monday),
        "tue" => Some(Weekday::Tuesday),
        "wed" => Some(Weekday::Wednesday),
        "thu" => Some(Weekday::Thursday),
        "fri" => Some(Weekday::Friday),
        "sat" => Some(Weekday::Saturday),
        "sun" => Some(Weekday::Sunday),
        _ => None,
    }
}

/// The first day of the week customary for a locale, Monday when the locale
/// says nothing either way
pub(crate) fn first_day_of_week_for(tag: &str) -> Weekday {
    let language = primary_language(tag);
    let region = region(tag).or_else(|| default_region(&language).map(str::to_owned));
    match region.as_deref() {
        Some(r) if SUNDAY_FIRST_REGIONS.contains(&r) => Weekday::Sunday,
        Some(r) if SATURDAY_FIRST_REGIONS.contains(&r) => Weekday::Saturday,
        Some(r) if FRIDAY_FIRST_REGIONS.contains(&r) => Weekday::Friday,
        _ => Weekday::Monday,
    }
}

/// Converts POSIX locale names like `en_GB.UTF-8@euro` into BCP 47 tags;
/// tags that already are BCP 47 are returned unchanged
pub(crate) fn normalize_locale_tag(s: &str) -> String {
    let base = s.split(['.', '@']).next().unwrap_or_default();
    base.replace('_', "-")
}

/// Returns the value of `key` in the `-u-` extension of a BCP 47 tag
pub(crate) fn unicode_extension<'a>(tag: &'a str, key: &str) -> Option<&'a str> {
    let mut subtags = tag
        .split(['-', '_'])
        .skip_while(|s| !s.eq_ignore_ascii_case("u"))
        .skip(1);
    while let Some(subtag) = subtags.next() {
        if subtag.len() == 1 {
            return None;
        }
        if subtag.eq_ignore_ascii_case(key) {
            return subtags.next().filter(|value| value.len() > 2);
        }
    }
    None
}

fn primary_language(tag: &str) -> String {
    tag.split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

fn region(tag: &str) -> Option<String> {
    tag.split(['-', '_'])
        .skip(1)
        .take_while(|s| s.len() > 1)
        .find(|s| {
            (s.len() == 2 && s.chars().all(|c| c.is_ascii_alphabetic()))
                || (s.len() == 3 && s.chars().all(|c| c.is_ascii_digit()))
        })
        .map(str::to_ascii_uppercase)
}

fn default_region(language: &str) -> Option<&'static str> {
    match language {
        "en" => Some("US"),
        "he" | "iw" => Some("IL"),
        "ja" => Some("JP"),
        "ko" => Some("KR"),
        "zh" | "yue" => Some("CN"),
        "pt" => Some("BR"),
        "ar" => Some("EG"),
        "fa" => Some("IR"),
        "hi" => Some("IN"),
        "th" => Some("TH"),
        _ => None,
    }
}
