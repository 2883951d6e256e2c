// App preference persistence.
// Typed access to the theme, font, color-blind and language keys.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::warn;

use super::store::KeyValueStore;

pub const THEME_MODE_KEY: &str = "themeMode";
pub const FONT_MODE_KEY: &str = "fontMode";
pub const COLOR_BLIND_MODE_KEY: &str = "colorBlindMode";
pub const LANGUAGE_KEY: &str = "user-language";

pub const DEFAULT_LANGUAGE: &str = "en";

/// Persisted theme selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        })
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            other => Err(format!("unknown theme mode {:?}", other)),
        }
    }
}

/// Persisted font size selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontMode {
    #[default]
    Normal,
    Large,
}

impl fmt::Display for FontMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FontMode::Normal => "normal",
            FontMode::Large => "large",
        })
    }
}

impl FromStr for FontMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(FontMode::Normal),
            "large" => Ok(FontMode::Large),
            other => Err(format!("unknown font mode {:?}", other)),
        }
    }
}

/// Preference reader/writer. Storage failures degrade to defaults.
#[derive(Clone)]
pub struct Preferences {
    store: Arc<dyn KeyValueStore>,
}

impl Preferences {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    async fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to read preference {}: {}", key, e);
                None
            }
        }
    }

    async fn write(&self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value).await {
            warn!("Failed to write preference {}: {}", key, e);
        }
    }

    async fn read_parsed<T: FromStr + Default>(&self, key: &str) -> T {
        self.read(key)
            .await
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default()
    }

    pub async fn theme_mode(&self) -> ThemeMode {
        self.read_parsed(THEME_MODE_KEY).await
    }

    pub async fn set_theme_mode(&self, mode: ThemeMode) {
        self.write(THEME_MODE_KEY, &mode.to_string()).await;
    }

    pub async fn font_mode(&self) -> FontMode {
        self.read_parsed(FONT_MODE_KEY).await
    }

    pub async fn set_font_mode(&self, mode: FontMode) {
        self.write(FONT_MODE_KEY, &mode.to_string()).await;
    }

    pub async fn color_blind_mode(&self) -> bool {
        self.read_parsed(COLOR_BLIND_MODE_KEY).await
    }

    pub async fn set_color_blind_mode(&self, enabled: bool) {
        self.write(COLOR_BLIND_MODE_KEY, &enabled.to_string()).await;
    }

    /// Preferred UI language code, `en` when unset.
    pub async fn language(&self) -> String {
        self.read(LANGUAGE_KEY)
            .await
            .filter(|lang| !lang.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
    }

    pub async fn set_language(&self, language: &str) {
        self.write(LANGUAGE_KEY, language).await;
    }
}
