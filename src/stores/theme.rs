use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rollcall_core::storage::{load_json, save_json};
use rollcall_core::{ClientError, StateStorage};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::debug;

pub const THEME_STORAGE_KEY: &str = "theme-storage";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{}'", other)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedTheme {
    theme: Theme,
}

/// Light/dark preference, persisted under `theme-storage`.
#[derive(Clone)]
pub struct ThemeStore {
    theme: Arc<watch::Sender<Theme>>,
    storage: Arc<dyn StateStorage>,
}

impl ThemeStore {
    pub async fn load(storage: Arc<dyn StateStorage>) -> Result<Self, ClientError> {
        let theme = load_json::<PersistedTheme>(storage.as_ref(), THEME_STORAGE_KEY)
            .await?
            .map(|p| p.theme)
            .unwrap_or_default();
        debug!(%theme, "theme restored");

        let (sender, _) = watch::channel(theme);
        Ok(Self {
            theme: Arc::new(sender),
            storage,
        })
    }

    pub fn theme(&self) -> Theme {
        *self.theme.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Theme> {
        self.theme.subscribe()
    }

    pub async fn set(&self, theme: Theme) -> Result<(), ClientError> {
        self.theme.send_replace(theme);
        self.save().await
    }

    pub async fn toggle(&self) -> Result<Theme, ClientError> {
        let next = self.theme().toggled();
        self.set(next).await?;
        Ok(next)
    }

    async fn save(&self) -> Result<(), ClientError> {
        let persisted = PersistedTheme {
            theme: self.theme(),
        };
        save_json(self.storage.as_ref(), THEME_STORAGE_KEY, &persisted).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollcall_core::MemoryStateStorage;

    #[tokio::test]
    async fn test_defaults_to_light() {
        let store = ThemeStore::load(Arc::new(MemoryStateStorage::new()))
            .await
            .unwrap();
        assert_eq!(store.theme(), Theme::Light);
    }

    #[tokio::test]
    async fn test_toggle_persists() {
        let storage = Arc::new(MemoryStateStorage::new());
        let store = ThemeStore::load(storage.clone()).await.unwrap();
        assert_eq!(store.toggle().await.unwrap(), Theme::Dark);

        let raw = storage.load(THEME_STORAGE_KEY).await.unwrap().unwrap();
        assert_eq!(raw, r#"{"theme":"dark"}"#);

        let reloaded = ThemeStore::load(storage).await.unwrap();
        assert_eq!(reloaded.theme(), Theme::Dark);
    }

    #[test]
    fn test_parse_theme() {
        assert_eq!("Dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("blue".parse::<Theme>().is_err());
    }
}
