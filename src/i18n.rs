//! Internationalization (i18n) module for Campus Content
//!
//! Provides:
//! - The fixed set of content locales the backend serves
//! - Locale resolution from explicit choice, cookie, Accept-Language and environment
//! - The small catalog of interface strings shown around fetched content

use crate::error::LocaleError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Cookie the site front-end stores the chosen language in
pub const LOCALE_COOKIE: &str = "i18next";

/// Content language served by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Russian
    #[default]
    Ru,
    /// English
    En,
    /// Kyrgyz
    Kg,
}

impl Locale {
    /// Every supported locale, in menu order
    pub const ALL: [Locale; 3] = [Locale::Ru, Locale::En, Locale::Kg];

    /// Code sent to the backend
    pub fn code(&self) -> &'static str {
        match self {
            Locale::Ru => "ru",
            Locale::En => "en",
            Locale::Kg => "kg",
        }
    }

    /// Name of the language in the language itself
    pub fn native_name(&self) -> &'static str {
        match self {
            Locale::Ru => "Русский",
            Locale::En => "English",
            Locale::Kg => "Кыргызча",
        }
    }

    /// Parse a language tag such as `en`, `EN-us`, `ru_RU.UTF-8` or `ky`.
    ///
    /// Only the primary subtag is considered.
    pub fn parse(tag: &str) -> Option<Locale> {
        let primary = primary_subtag(tag)?;
        match primary.as_str() {
            "ru" => Some(Locale::Ru),
            "en" => Some(Locale::En),
            "kg" | "ky" => Some(Locale::Kg),
            _ => None,
        }
    }

    /// Parse a tag, falling back when it is absent or not recognized
    pub fn parse_or(tag: Option<&str>, fallback: Locale) -> Locale {
        tag.and_then(Locale::parse).unwrap_or(fallback)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locale::parse(s).ok_or_else(|| LocaleError::Unsupported(s.trim().to_string()))
    }
}

/// Lowercased primary subtag, with encoding suffixes (`.UTF-8`, `@euro`) removed
fn primary_subtag(tag: &str) -> Option<String> {
    let tag = tag.trim();
    let tag = tag.split(['.', '@']).next().unwrap_or(tag);
    let primary = tag.split(['-', '_']).next().unwrap_or("").trim();
    if primary.is_empty() {
        None
    } else {
        Some(primary.to_ascii_lowercase())
    }
}

/// Inputs available when deciding which locale to show
#[derive(Debug, Clone, Default)]
pub struct ResolveContext {
    /// Locale chosen explicitly (command line flag, URL segment)
    pub explicit: Option<String>,
    /// Raw `Cookie` header
    pub cookie_header: Option<String>,
    /// Raw `Accept-Language` header
    pub accept_language: Option<String>,
    /// Environment locale such as `LANG`
    pub environment: Option<String>,
    /// Locales enabled in configuration
    pub supported: Vec<Locale>,
    /// Locale used when nothing else matches
    pub default: Locale,
}

impl ResolveContext {
    /// Context with the process environment filled in
    pub fn from_env(supported: Vec<Locale>, default: Locale) -> Self {
        Self {
            environment: env_locale(),
            supported,
            default,
            ..Self::default()
        }
    }

    fn accepts(&self, locale: Locale) -> bool {
        self.supported.is_empty() || self.supported.contains(&locale)
    }

    fn pick(&self, tag: &str) -> Option<Locale> {
        Locale::parse(tag).filter(|l| self.accepts(*l))
    }
}

/// Resolve chain: explicit -> cookie -> Accept-Language -> environment -> default
pub fn resolve(ctx: &ResolveContext) -> Locale {
    if let Some(tag) = ctx.explicit.as_deref() {
        if ctx.pick(tag).is_none() {
            log::warn!("Language '{}' is not available, falling back", tag);
        }
    }

    if let Some(locale) = ctx.explicit.as_deref().and_then(|t| ctx.pick(t)) {
        return locale;
    }

    if let Some(locale) = ctx
        .cookie_header
        .as_deref()
        .and_then(|h| cookie_value(h, LOCALE_COOKIE))
        .and_then(|v| ctx.pick(v))
    {
        return locale;
    }

    if let Some(locale) = ctx
        .accept_language
        .as_deref()
        .and_then(|h| parse_accept_language(h, ctx))
    {
        return locale;
    }

    if let Some(locale) = ctx.environment.as_deref().and_then(|t| ctx.pick(t)) {
        return locale;
    }

    ctx.default
}

/// Locale from `LC_ALL`, `LC_MESSAGES` or `LANG`, first one set wins
pub fn env_locale() -> Option<String> {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|key| std::env::var(key).ok())
        .find(|value| !value.is_empty() && value != "C" && value != "POSIX")
}

fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (k, v) = pair.trim().split_once('=')?;
        (k.trim() == name).then(|| v.trim())
    })
}

fn parse_accept_language(header: &str, ctx: &ResolveContext) -> Option<Locale> {
    let mut entries: Vec<(&str, f64)> = header
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut segments = part.split(';');
            let tag = segments.next().unwrap_or("").trim();
            // Unparseable or non-finite weights make the entry unusable
            let q = match segments.find_map(|s| s.trim().strip_prefix("q=")) {
                Some(v) => v.trim().parse::<f64>().ok().filter(|q| q.is_finite()).unwrap_or(0.0),
                None => 1.0,
            };
            (tag, q)
        })
        .collect();

    // Stable sort keeps header order between equal weights
    entries.sort_by(|a, b| b.1.total_cmp(&a.1));

    entries
        .into_iter()
        .filter(|(_, q)| *q > 0.0)
        .find_map(|(tag, _)| ctx.pick(tag))
}

/// Interface strings rendered around content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiText {
    Loading,
    NoContent,
    ErrorTitle,
    Retry,
    NetworkError,
    HttpError,
    DecodeError,
    Rejected,
    InvalidRequest,
    Program,
}

/// Look up an interface string
pub fn text(locale: Locale, key: UiText) -> &'static str {
    use UiText::*;
    match (locale, key) {
        (Locale::Ru, Loading) => "Загрузка...",
        (Locale::En, Loading) => "Loading...",
        (Locale::Kg, Loading) => "Жүктөлүүдө...",

        (Locale::Ru, NoContent) => "Нет данных",
        (Locale::En, NoContent) => "No data available",
        (Locale::Kg, NoContent) => "Маалымат жок",

        (Locale::Ru, ErrorTitle) => "Не удалось загрузить данные",
        (Locale::En, ErrorTitle) => "Failed to load data",
        (Locale::Kg, ErrorTitle) => "Маалыматты жүктөө мүмкүн болгон жок",

        (Locale::Ru, Retry) => "Повторить",
        (Locale::En, Retry) => "Retry",
        (Locale::Kg, Retry) => "Кайталоо",

        (Locale::Ru, NetworkError) => "Нет соединения с сервером",
        (Locale::En, NetworkError) => "Could not reach the server",
        (Locale::Kg, NetworkError) => "Сервер менен байланыш жок",

        (Locale::Ru, HttpError) => "Сервер вернул ошибку",
        (Locale::En, HttpError) => "The server returned an error",
        (Locale::Kg, HttpError) => "Сервер ката кайтарды",

        (Locale::Ru, DecodeError) => "Получен некорректный ответ",
        (Locale::En, DecodeError) => "The server response could not be read",
        (Locale::Kg, DecodeError) => "Сервердин жообу туура эмес",

        (Locale::Ru, Rejected) => "Запрос отклонён сервером",
        (Locale::En, Rejected) => "The request was rejected",
        (Locale::Kg, Rejected) => "Сурам четке кагылды",

        (Locale::Ru, InvalidRequest) => "Некорректный запрос",
        (Locale::En, InvalidRequest) => "Invalid request",
        (Locale::Kg, InvalidRequest) => "Туура эмес сурам",

        (Locale::Ru, Program) => "Направление",
        (Locale::En, Program) => "Program",
        (Locale::Kg, Program) => "Багыт",
    }
}
