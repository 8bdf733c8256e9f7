use crate::locale::{normalize_locale_tag, unicode_extension};
use std::env;

/// Lowest API level at which the language is chosen through the platform's
/// per-app language setting
pub(crate) const PER_APP_LANGUAGE_MIN_API_LEVEL: u32 = 33;

/// Lowest API level at which the platform exposes a first-day-of-week locale
/// preference
pub(crate) const FIRST_DAY_OF_WEEK_PREFERENCE_MIN_API_LEVEL: u32 = 34;

/// What the running platform is able to provide, as decided by its API level
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct Capabilities {
    api_level: u32,
}

impl Capabilities {
    pub(crate) fn new(api_level: u32) -> Capabilities {
        Capabilities { api_level }
    }

    pub(crate) fn per_app_language(self) -> bool {
        self.api_level >= PER_APP_LANGUAGE_MIN_API_LEVEL
    }

    pub(crate) fn first_day_of_week_preference(self) -> bool {
        self.api_level >= FIRST_DAY_OF_WEEK_PREFERENCE_MIN_API_LEVEL
    }
}

pub(crate) trait Platform {
    /// BCP 47 tag of the current locale, e.g. `en-GB`
    fn locale(&self) -> Option<String>;

    /// First day of week chosen in the platform's locale preferences, as a
    /// three-letter weekday abbreviation (`mon` … `sun`)
    fn first_day_of_week_preference(&self) -> Option<String>;

    /// BCP 47 tag of the language chosen for this application
    fn app_language(&self) -> Option<String>;
}

/// Platform description taken from the usual locale environment variables
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct EnvPlatform {
    locale: Option<String>,
    language: Option<String>,
}

impl EnvPlatform {
    pub(crate) fn from_env() -> EnvPlatform {
        let locale = ["LC_ALL", "LC_TIME", "LANG"]
            .into_iter()
            .filter_map(|name| env::var(name).ok())
            .find(|value| !value.is_empty());
        let language = env::var("LANGUAGE").ok().and_then(|value| {
            value
                .split(':')
                .find(|s| !s.is_empty())
                .map(normalize_locale_tag)
        });
        EnvPlatform { locale, language }
    }
}

impl Platform for EnvPlatform {
    fn locale(&self) -> Option<String> {
        self.locale.as_deref().map(normalize_locale_tag)
    }

    fn first_day_of_week_preference(&self) -> Option<String> {
        self.locale
            .as_deref()
            .and_then(|tag| unicode_extension(tag, "fw"))
            .map(str::to_owned)
    }

    fn app_language(&self) -> Option<String> {
        self.language.clone()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_app_language_threshold() {
        for (level, expected) in [
            (1, false),
            (5, false),
            (29, false),
            (32, false),
            (33, true),
            (35, true),
            (99, true),
        ] {
            assert_eq!(
                Capabilities::new(level).per_app_language(),
                expected,
                "API level {level}"
            );
        }
    }

    #[test]
    fn test_first_day_of_week_preference_threshold() {
        for (level, expected) in [
            (1, false),
            (5, false),
            (29, false),
            (33, false),
            (34, true),
            (35, true),
            (99, true),
        ] {
            assert_eq!(
                Capabilities::new(level).first_day_of_week_preference(),
                expected,
                "API level {level}"
            );
        }
    }

    #[test]
    fn test_env_platform_posix_locale() {
        let platform = EnvPlatform {
            locale: Some("en_GB.UTF-8".into()),
            language: None,
        };
        assert_eq!(platform.locale().as_deref(), Some("en-GB"));
        assert_eq!(platform.first_day_of_week_preference(), None);
    }

    #[test]
    fn test_env_platform_fw_extension() {
        let platform = EnvPlatform {
            locale: Some("en-US-u-fw-wed".into()),
            language: Some("ca-ES".into()),
        };
        assert_eq!(platform.locale().as_deref(), Some("en-US-u-fw-wed"));
        assert_eq!(
            platform.first_day_of_week_preference().as_deref(),
            Some("wed")
        );
        assert_eq!(platform.app_language().as_deref(), Some("ca-ES"));
    }
}
