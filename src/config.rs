//! Page-level configuration, read from the URL query string.
//!
//! `?lang=de&images=https://cdn.example/eco/&log=debug` overrides the locale,
//! the base URL item sprites are loaded from and the console log level.
//! Anything not given falls back to the stored choice, then the browser
//! language, then the defaults.

use tracing::{debug, Level};

use crate::locale::Locale;

pub const DEFAULT_IMAGE_BASE_URL: &str = "assets/images/";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub image_base_url: String,
    /// Locale forced by the URL, if any.
    pub locale_override: Option<Locale>,
    /// Console log level forced by the URL, if any.
    pub log_level: Option<Level>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            locale_override: None,
            log_level: None,
        }
    }
}

impl AppConfig {
    /// Parse a `location.search` string (leading `?` optional).
    pub fn from_query(query: &str) -> Self {
        let mut config = Self::default();
        for pair in query.trim_start_matches('?').split('&') {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let value = match urlencoding::decode(value) {
                Ok(v) => v.into_owned(),
                Err(_) => continue,
            };
            match key {
                "lang" | "locale" => match Locale::find(&value) {
                    Some(locale) => config.locale_override = Some(locale),
                    None => debug!(value = %value, "unsupported locale in query"),
                },
                "images" if !value.is_empty() => {
                    config.image_base_url = if value.ends_with('/') {
                        value
                    } else {
                        format!("{value}/")
                    };
                }
                "log" => match value.parse::<Level>() {
                    Ok(level) => config.log_level = Some(level),
                    Err(_) => debug!(value = %value, "unsupported log level in query"),
                },
                "" => {}
                other => debug!(key = other, "ignoring unknown query parameter"),
            }
        }
        config
    }

    /// The locale to start in: URL override, stored choice, browser language,
    /// default, in that order.
    pub fn initial_locale(&self, stored: Option<Locale>, browser_language: Option<&str>) -> Locale {
        self.locale_override
            .or(stored)
            .or_else(|| browser_language.and_then(Locale::find))
            .unwrap_or_default()
    }

    /// Most verbose level the console shows: the URL's choice, else debug
    /// in debug builds and info in release builds.
    pub fn max_log_level(&self) -> Level {
        self.log_level.unwrap_or(if cfg!(debug_assertions) {
            Level::DEBUG
        } else {
            Level::INFO
        })
    }

    /// Config for the running page.
    #[cfg(target_arch = "wasm32")]
    pub fn from_page() -> Self {
        let search = web_sys::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        Self::from_query(&search)
    }
}

/// `navigator.language` of the running browser.
#[cfg(target_arch = "wasm32")]
pub fn browser_language() -> Option<String> {
    web_sys::window()?.navigator().language()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_gives_defaults() {
        assert_eq!(AppConfig::from_query(""), AppConfig::default());
        assert_eq!(AppConfig::from_query("?"), AppConfig::default());
    }

    #[test]
    fn reads_locale_and_images() {
        let config = AppConfig::from_query("?lang=de&images=https%3A%2F%2Fcdn.example%2Feco");
        assert_eq!(config.locale_override.map(|l| l.code), Some("de-DE"));
        assert_eq!(config.image_base_url, "https://cdn.example/eco/");
    }

    #[test]
    fn unknown_values_are_ignored() {
        let config = AppConfig::from_query("lang=tlh&foo=bar&images=");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn log_level_from_query() {
        let config = AppConfig::from_query("?log=warn");
        assert_eq!(config.log_level, Some(Level::WARN));
        assert_eq!(config.max_log_level(), Level::WARN);
        assert_eq!(AppConfig::from_query("log=TRACE").max_log_level(), Level::TRACE);
        assert_eq!(AppConfig::from_query("log=loud").log_level, None);
    }

    #[test]
    fn default_log_level_follows_build_profile() {
        let expected = if cfg!(debug_assertions) { Level::DEBUG } else { Level::INFO };
        assert_eq!(AppConfig::default().max_log_level(), expected);
    }

    #[test]
    fn initial_locale_precedence() {
        let ja = Locale::find("ja").unwrap();
        let fr = Locale::find("fr").unwrap();

        let forced = AppConfig::from_query("locale=pl-PL");
        assert_eq!(forced.initial_locale(Some(ja), Some("fr-FR")).code, "pl-PL");

        let plain = AppConfig::default();
        assert_eq!(plain.initial_locale(Some(ja), Some("fr-FR")), ja);
        assert_eq!(plain.initial_locale(None, Some("fr-CA")), fr);
        assert_eq!(plain.initial_locale(None, Some("tlh")), Locale::default());
        assert_eq!(plain.initial_locale(None, None), Locale::default());
    }
}
