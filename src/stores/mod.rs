//! Process-wide client state, persisted to durable storage.

pub mod session;
pub mod theme;

pub use session::SessionStore;
pub use theme::{THEME_STORAGE_KEY, Theme, ThemeStore};
