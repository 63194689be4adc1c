use std::path::PathBuf;

/// Where persisted client state (`auth-storage`, `theme-storage`) lives.
///
/// `ROLLCALL_STORAGE_DIR`, default `.rollcall`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageConfig {
    pub dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(".rollcall"),
        }
    }
}

impl StorageConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(&|key: &str| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Self {
        lookup("ROLLCALL_STORAGE_DIR")
            .filter(|s| !s.trim().is_empty())
            .map(|dir| Self {
                dir: PathBuf::from(dir),
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup_from;

    #[test]
    fn test_storage_dir_override() {
        let lookup = lookup_from(&[("ROLLCALL_STORAGE_DIR", "/var/lib/rollcall")]);
        assert_eq!(
            StorageConfig::from_lookup(&lookup).dir,
            PathBuf::from("/var/lib/rollcall")
        );
    }

    #[test]
    fn test_blank_dir_uses_default() {
        let lookup = lookup_from(&[("ROLLCALL_STORAGE_DIR", "  ")]);
        assert_eq!(StorageConfig::from_lookup(&lookup), StorageConfig::default());
    }
}
