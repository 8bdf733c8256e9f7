use crate::decoration::SymbolSet;
use crate::locale::{first_day_of_week_for, parse_weekday_abbreviation, Language};
use crate::platform::{Capabilities, Platform};
use crate::store::{Edit, KeyValueStore, StoreError, StoredValue};
use crate::theme::{Colour, Theme};
use thiserror::Error;
use time::Weekday;
use tracing::warn;

/// An enum that is persisted by name
pub(crate) trait PersistedName: Copy + Eq + 'static {
    const VARIANTS: &'static [Self];

    fn persisted_name(self) -> &'static str;

    fn from_persisted_name(name: &str) -> Option<Self> {
        Self::VARIANTS
            .iter()
            .copied()
            .find(|v| v.persisted_name() == name)
    }

    /// The variant after `self`, wrapping around at the end
    fn cycle(self) -> Self {
        let i = Self::VARIANTS
            .iter()
            .position(|&v| v == self)
            .map_or(0, |i| i + 1);
        Self::VARIANTS.get(i).copied().unwrap_or(Self::VARIANTS[0])
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct BooleanPreference {
    pub(crate) key: &'static str,
    pub(crate) default: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct PercentagePreference {
    pub(crate) key: &'static str,
    pub(crate) default: i64,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct EnumPreference<T> {
    pub(crate) key: &'static str,
    pub(crate) default: T,
}

pub(crate) const SHOW_DECLINED_EVENTS: BooleanPreference = BooleanPreference {
    key: "SHOW_DECLINED_EVENTS",
    default: false,
};

pub(crate) const FOCUS_ON_CURRENT_WEEK: BooleanPreference = BooleanPreference {
    key: "FOCUS_ON_CURRENT_WEEK",
    default: false,
};

pub(crate) const WIDGET_TRANSPARENCY: PercentagePreference = PercentagePreference {
    key: "WIDGET_TRANSPARENCY",
    default: 20,
};

/// Scales every text size; the default leaves them unchanged
pub(crate) const WIDGET_TEXT_SIZE: PercentagePreference = PercentagePreference {
    key: "WIDGET_TEXT_SIZE",
    default: 40,
};

pub(crate) const WIDGET_THEME: EnumPreference<Theme> = EnumPreference {
    key: "WIDGET_THEME",
    default: Theme::Dark,
};

pub(crate) const FIRST_DAY_OF_WEEK: EnumPreference<Weekday> = EnumPreference {
    key: "FIRST_DAY_OF_WEEK",
    default: Weekday::Monday,
};

pub(crate) const INSTANCES_SYMBOL_SET: EnumPreference<SymbolSet> = EnumPreference {
    key: "INSTANCES_SYMBOL_SET",
    default: SymbolSet::Minimal,
};

pub(crate) const INSTANCES_COLOUR: EnumPreference<Colour> = EnumPreference {
    key: "INSTANCES_COLOUR",
    default: Colour::Cyan,
};

pub(crate) const LANGUAGE: EnumPreference<Language> = EnumPreference {
    key: "LANGUAGE",
    default: Language::English,
};

static ALL_KEYS: &[&str] = &[
    SHOW_DECLINED_EVENTS.key,
    FOCUS_ON_CURRENT_WEEK.key,
    WIDGET_TRANSPARENCY.key,
    WIDGET_TEXT_SIZE.key,
    WIDGET_THEME.key,
    FIRST_DAY_OF_WEEK.key,
    INSTANCES_SYMBOL_SET.key,
    INSTANCES_COLOUR.key,
    LANGUAGE.key,
];

#[derive(Debug, Error)]
pub(crate) enum SetPreferenceError {
    #[error("unknown preference {0:?}")]
    UnknownKey(String),
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
    #[error("{key} must be between 0 and 100, got {value}")]
    OutOfRange { key: &'static str, value: i64 },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Typed access to the preference store.  Reads never fail: anything absent,
/// mistyped or unrecognized reads as the preference's default.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Preferences<S> {
    store: S,
}

impl<S: KeyValueStore> Preferences<S> {
    pub(crate) fn new(store: S) -> Preferences<S> {
        Preferences { store }
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &S {
        &self.store
    }

    pub(crate) fn get_bool(&self, item: BooleanPreference) -> bool {
        match self.store.get(item.key) {
            Some(StoredValue::Bool(value)) => value,
            Some(other) => {
                warn!(key = item.key, value = ?other, "ignoring mistyped preference");
                item.default
            }
            None => item.default,
        }
    }

    pub(crate) fn set_bool(
        &mut self,
        item: BooleanPreference,
        value: bool,
    ) -> Result<(), StoreError> {
        self.store
            .commit(&[Edit::Put(item.key, StoredValue::Bool(value))])
    }

    /// Returns the stored percentage as-is; it is clamped where it is used
    pub(crate) fn get_percentage(&self, item: PercentagePreference) -> i64 {
        match self.store.get(item.key) {
            Some(StoredValue::Int(value)) => value,
            Some(other) => {
                warn!(key = item.key, value = ?other, "ignoring mistyped preference");
                item.default
            }
            None => item.default,
        }
    }

    pub(crate) fn set_percentage(
        &mut self,
        item: PercentagePreference,
        value: i64,
    ) -> Result<(), SetPreferenceError> {
        if !(0..=100).contains(&value) {
            return Err(SetPreferenceError::OutOfRange {
                key: item.key,
                value,
            });
        }
        self.store
            .commit(&[Edit::Put(item.key, StoredValue::Int(value))])?;
        Ok(())
    }

    /// Returns the explicitly stored value, if there is a valid one
    pub(crate) fn find_enum<T: PersistedName>(&self, item: EnumPreference<T>) -> Option<T> {
        match self.store.get(item.key)? {
            StoredValue::Str(name) => {
                let value = T::from_persisted_name(&name);
                if value.is_none() {
                    warn!(key = item.key, value = %name, "ignoring unknown preference value");
                }
                value
            }
            other => {
                warn!(key = item.key, value = ?other, "ignoring mistyped preference");
                None
            }
        }
    }

    pub(crate) fn get_enum<T: PersistedName>(&self, item: EnumPreference<T>) -> T {
        self.find_enum(item).unwrap_or(item.default)
    }

    pub(crate) fn set_enum<T: PersistedName>(
        &mut self,
        item: EnumPreference<T>,
        value: T,
    ) -> Result<(), StoreError> {
        self.store.commit(&[Edit::Put(
            item.key,
            StoredValue::Str(value.persisted_name().to_owned()),
        )])
    }

    /// Removes every preference in one commit
    pub(crate) fn clear_all(&mut self) -> Result<(), StoreError> {
        let edits = ALL_KEYS.iter().map(|&k| Edit::Remove(k)).collect::<Vec<_>>();
        self.store.commit(&edits)
    }

    /// Sets a preference from its textual key and value, as typed by a user
    pub(crate) fn set_by_name(
        &mut self,
        key: &str,
        value: &str,
    ) -> Result<(), SetPreferenceError> {
        let key = key.to_ascii_uppercase();
        if let Some(item) = [SHOW_DECLINED_EVENTS, FOCUS_ON_CURRENT_WEEK]
            .into_iter()
            .find(|item| item.key == key)
        {
            let parsed = value
                .trim()
                .parse::<bool>()
                .map_err(|_| invalid_value(item.key, value))?;
            self.set_bool(item, parsed)?;
        } else if let Some(item) = [WIDGET_TRANSPARENCY, WIDGET_TEXT_SIZE]
            .into_iter()
            .find(|item| item.key == key)
        {
            let parsed = value
                .trim()
                .parse::<i64>()
                .map_err(|_| invalid_value(item.key, value))?;
            self.set_percentage(item, parsed)?;
        } else if key == WIDGET_THEME.key {
            self.set_enum_by_name(WIDGET_THEME, value)?;
        } else if key == FIRST_DAY_OF_WEEK.key {
            self.set_enum_by_name(FIRST_DAY_OF_WEEK, value)?;
        } else if key == INSTANCES_SYMBOL_SET.key {
            self.set_enum_by_name(INSTANCES_SYMBOL_SET, value)?;
        } else if key == INSTANCES_COLOUR.key {
            self.set_enum_by_name(INSTANCES_COLOUR, value)?;
        } else if key == LANGUAGE.key {
            self.set_enum_by_name(LANGUAGE, value)?;
        } else {
            return Err(SetPreferenceError::UnknownKey(key));
        }
        Ok(())
    }

    fn set_enum_by_name<T: PersistedName>(
        &mut self,
        item: EnumPreference<T>,
        value: &str,
    ) -> Result<(), SetPreferenceError> {
        let parsed = T::from_persisted_name(&value.trim().to_ascii_uppercase())
            .ok_or_else(|| invalid_value(item.key, value))?;
        self.set_enum(item, parsed)?;
        Ok(())
    }

    /// Resolves the first day of the week.  Where the platform has a locale
    /// preference for it, that replaces the stored preference; otherwise the
    /// stored preference is used.  Either way, the locale's customary first
    /// day comes next, and Monday last.
    pub(crate) fn resolve_first_day_of_week<P: Platform + ?Sized>(
        &self,
        platform: &P,
        capabilities: Capabilities,
    ) -> Weekday {
        let preferred = if capabilities.first_day_of_week_preference() {
            platform
                .first_day_of_week_preference()
                .and_then(|s| parse_weekday_abbreviation(&s))
        } else {
            self.find_enum(FIRST_DAY_OF_WEEK)
        };
        preferred
            .or_else(|| platform.locale().map(|tag| first_day_of_week_for(&tag)))
            .unwrap_or(FIRST_DAY_OF_WEEK.default)
    }

    /// Resolves the display language, delegating to the platform's per-app
    /// language where it has one
    pub(crate) fn resolve_language<P: Platform + ?Sized>(
        &self,
        platform: &P,
        capabilities: Capabilities,
    ) -> Language {
        let preferred = if capabilities.per_app_language() {
            platform
                .app_language()
                .and_then(|tag| Language::from_tag(&tag))
        } else {
            self.find_enum(LANGUAGE)
        };
        preferred
            .or_else(|| platform.locale().and_then(|tag| Language::from_tag(&tag)))
            .unwrap_or(LANGUAGE.default)
    }
}

fn invalid_value(key: &'static str, value: &str) -> SetPreferenceError {
    SetPreferenceError::InvalidValue {
        key,
        value: value.to_owned(),
    }
}
