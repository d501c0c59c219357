use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

pub const HIGH_CONTRAST_KEY: &str = "ktc-high-contrast";
pub const LARGE_TEXT_KEY: &str = "ktc-large-text";

/// String key-value persistence for user preferences
pub trait SettingsStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-process store, nothing survives the process
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// Store backed by a flat TOML table on disk. Every write rewrites the file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`; a missing file is an empty store
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = if path.exists() {
            toml::from_str::<BTreeMap<String, String>>(&fs::read_to_string(&path)?)?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, toml::to_string(&self.values)?)?;
        Ok(())
    }
}

impl SettingsStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.save()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.values.remove(key).is_some() {
            self.save()?;
        }
        Ok(())
    }
}

/// The two display preferences offered by the accessibility panel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AccessibilitySettings {
    pub high_contrast: bool,
    pub large_text: bool,
}

impl AccessibilitySettings {
    /// Read both flags; anything other than `"true"` reads as off
    pub fn load(store: &impl SettingsStore) -> Result<Self> {
        let flag = |key: &str| -> Result<bool> { Ok(store.get(key)?.as_deref() == Some("true")) };
        Ok(Self {
            high_contrast: flag(HIGH_CONTRAST_KEY)?,
            large_text: flag(LARGE_TEXT_KEY)?,
        })
    }

    pub fn toggle_contrast(&mut self, store: &mut impl SettingsStore) -> Result<bool> {
        self.high_contrast = !self.high_contrast;
        store.set(HIGH_CONTRAST_KEY, &self.high_contrast.to_string())?;
        Ok(self.high_contrast)
    }

    pub fn toggle_text_size(&mut self, store: &mut impl SettingsStore) -> Result<bool> {
        self.large_text = !self.large_text;
        store.set(LARGE_TEXT_KEY, &self.large_text.to_string())?;
        Ok(self.large_text)
    }

    /// Turn both flags off and forget the stored values
    pub fn reset(&mut self, store: &mut impl SettingsStore) -> Result<()> {
        *self = Self::default();
        store.remove(HIGH_CONTRAST_KEY)?;
        store.remove(LARGE_TEXT_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_nothing_stored() {
        let store = MemoryStore::new();
        assert_eq!(AccessibilitySettings::load(&store).unwrap(), AccessibilitySettings::default());
    }

    #[test]
    fn test_toggle_writes_string_flags() {
        let mut store = MemoryStore::new();
        let mut settings = AccessibilitySettings::load(&store).unwrap();

        assert!(settings.toggle_contrast(&mut store).unwrap());
        assert_eq!(store.get(HIGH_CONTRAST_KEY).unwrap().as_deref(), Some("true"));

        assert!(!settings.toggle_contrast(&mut store).unwrap());
        assert_eq!(store.get(HIGH_CONTRAST_KEY).unwrap().as_deref(), Some("false"));

        assert!(settings.toggle_text_size(&mut store).unwrap());
        assert_eq!(
            AccessibilitySettings::load(&store).unwrap(),
            AccessibilitySettings {
                high_contrast: false,
                large_text: true
            }
        );
    }

    #[test]
    fn test_reset_removes_keys() {
        let mut store = MemoryStore::new();
        store.set(HIGH_CONTRAST_KEY, "true").unwrap();
        store.set(LARGE_TEXT_KEY, "true").unwrap();
        let mut settings = AccessibilitySettings::load(&store).unwrap();

        settings.reset(&mut store).unwrap();
        assert_eq!(settings, AccessibilitySettings::default());
        assert_eq!(store.get(HIGH_CONTRAST_KEY).unwrap(), None);
        assert_eq!(store.get(LARGE_TEXT_KEY).unwrap(), None);
    }

    #[test]
    fn test_unexpected_values_read_as_off() {
        let mut store = MemoryStore::new();
        store.set(LARGE_TEXT_KEY, "yes").unwrap();
        assert!(!AccessibilitySettings::load(&store).unwrap().large_text);
    }

    #[test]
    fn test_file_store_persists_between_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.toml");

        let mut store = FileStore::open(&path).unwrap();
        let mut settings = AccessibilitySettings::load(&store).unwrap();
        settings.toggle_text_size(&mut store).unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert!(AccessibilitySettings::load(&reopened).unwrap().large_text);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("ktc-large-text"));
        assert!(contents.contains(r#""true""#));
    }

    #[test]
    fn test_file_store_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "not = [valid").unwrap();
        assert!(matches!(FileStore::open(&path), Err(crate::error::Error::Toml(_))));
    }
}
