//! Theme styling for the uploader UI.
//!
//! Two palettes ship (Dracula and Nord). Components ask the active [`Theme`]
//! for semantic styles instead of hard-coding colors.

use std::env;

use tracing::debug;

pub mod catalog;
pub mod dracula;
pub mod nord;
pub mod roles;
pub mod theme_helpers;

pub use catalog::ThemeDefinition;
pub use dracula::DraculaTheme;
pub use nord::NordTheme;
pub use roles::Theme;

/// Environment variable that overrides any persisted theme preference.
pub const THEME_ENV: &str = "TUI_THEME";

/// Theme plus the definition that produced it.
pub struct LoadedTheme {
    pub definition: &'static ThemeDefinition,
    pub theme: Box<dyn Theme>,
}

impl LoadedTheme {
    fn from_definition(definition: &'static ThemeDefinition) -> Self {
        Self {
            definition,
            theme: definition.build(),
        }
    }
}

/// Selects a theme from `TUI_THEME`, then the preferred name, then the default.
pub fn load(preferred_theme: Option<&str>) -> LoadedTheme {
    if let Ok(theme_name) = env::var(THEME_ENV)
        && let Some(definition) = catalog::resolve(theme_name.trim())
    {
        debug!(theme = definition.id, "theme selected from environment");
        return LoadedTheme::from_definition(definition);
    }

    if let Some(name) = preferred_theme
        && let Some(definition) = catalog::resolve(name.trim())
    {
        return LoadedTheme::from_definition(definition);
    }

    LoadedTheme::from_definition(catalog::default_definition())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_override_wins_over_preference() {
        temp_env::with_var(THEME_ENV, Some("nord"), || {
            assert_eq!(load(Some("dracula")).definition.id, "nord");
        });
    }

    #[test]
    fn unknown_names_fall_back_to_default() {
        temp_env::with_var(THEME_ENV, None::<&str>, || {
            assert_eq!(load(Some("nord")).definition.id, "nord");
            assert_eq!(load(Some("mystery")).definition.id, "dracula");
        });
    }
}
