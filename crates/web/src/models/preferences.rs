//! UI preference types resolved per request.

use serde::{Deserialize, Serialize};

/// UI language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Locale {
    /// Simplified Chinese.
    #[default]
    #[serde(rename = "zh")]
    Zh,
    /// English.
    #[serde(rename = "en")]
    En,
}

impl Locale {
    /// BCP 47 tag used in `Content-Language`.
    #[must_use]
    pub const fn language_tag(self) -> &'static str {
        match self {
            Self::Zh => "zh-CN",
            Self::En => "en",
        }
    }

    /// Match a language tag such as `zh-TW` or `en-US` by its primary subtag.
    fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag.trim().split('-').next()?;
        if primary.eq_ignore_ascii_case("zh") {
            Some(Self::Zh)
        } else if primary.eq_ignore_ascii_case("en") {
            Some(Self::En)
        } else {
            None
        }
    }

    /// Parse one `Accept-Language` entry such as `en-US;q=0.8`.
    ///
    /// A missing or malformed `q` counts as `1`.
    fn from_language_range(range: &str) -> Option<(Self, f32)> {
        let mut parts = range.split(';');
        let locale = Self::from_tag(parts.next()?)?;
        let quality = parts
            .filter_map(|param| {
                let param = param.trim();
                param.strip_prefix("q=").or_else(|| param.strip_prefix("Q="))
            })
            .find_map(|q| q.trim().parse::<f32>().ok())
            .unwrap_or(1.0);
        Some((locale, quality))
    }

    /// Pick the preferred supported language from an `Accept-Language` header.
    ///
    /// Ranges with `q=0` are refused. The highest quality wins; ties keep
    /// header order.
    #[must_use]
    pub fn from_accept_language(header: &str) -> Option<Self> {
        let mut best: Option<(Self, f32)> = None;
        for (locale, quality) in header.split(',').filter_map(Self::from_language_range) {
            if quality > 0.0 && best.is_none_or(|(_, top)| quality > top) {
                best = Some((locale, quality));
            }
        }
        best.map(|(locale, _)| locale)
    }
}

impl std::str::FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| format!("unsupported locale: {s}"))
    }
}

/// UI color mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    Light,
    Dark,
    /// Follow the operating system.
    #[default]
    System,
}

impl ColorMode {
    /// Interpret the `Sec-CH-Prefers-Color-Scheme` client hint.
    #[must_use]
    pub fn from_client_hint(value: &str) -> Option<Self> {
        match value.trim().trim_matches('"') {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }
}
