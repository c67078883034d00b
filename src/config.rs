use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_BOOKS_TABLE, DEFAULT_TIMEOUT_SECS};

const CONFIG_FILE: &str = "config.yaml";

/// Connection settings for the hosted backend
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Settings {
    /// Project URL, e.g. `https://xyz.supabase.co`
    #[serde(default)]
    pub url: String,
    /// Public (anon) project key
    #[serde(default)]
    pub anon_key: String,
    #[serde(default = "default_table")]
    pub books_table: String,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

fn default_table() -> String {
    DEFAULT_BOOKS_TABLE.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            url: String::new(),
            anon_key: String::new(),
            books_table: default_table(),
            request_timeout_secs: default_timeout(),
        }
    }
}

/// `~/.bookshelf`, where the config file and the log live
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".bookshelf")
}

impl Settings {
    /// Load from `$BOOKSHELF_CONFIG` or `~/.bookshelf/config.yaml`, then apply
    /// environment overrides. A missing file is fine as long as the
    /// environment supplies the required keys.
    pub fn load() -> Result<Self> {
        let path = std::env::var_os("BOOKSHELF_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|| config_dir().join(CONFIG_FILE));

        let mut settings = Self::from_file(&path)?;
        settings.apply_overrides(|key| std::env::var(key).ok());
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "No config file, using defaults");
            return Ok(Settings::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let settings = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(settings)
    }

    /// Apply `BOOKSHELF_URL`, `BOOKSHELF_ANON_KEY` and `BOOKSHELF_TABLE`
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("BOOKSHELF_URL") {
            self.url = url;
        }
        if let Some(key) = lookup("BOOKSHELF_ANON_KEY") {
            self.anon_key = key;
        }
        if let Some(table) = lookup("BOOKSHELF_TABLE") {
            self.books_table = table;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            bail!("missing `url` (set it in config.yaml or BOOKSHELF_URL)");
        }
        if self.anon_key.trim().is_empty() {
            bail!("missing `anon_key` (set it in config.yaml or BOOKSHELF_ANON_KEY)");
        }
        if self.books_table.trim().is_empty() {
            bail!("`books_table` must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_load_yaml_with_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "url: https://demo.supabase.co\nanon_key: abc\n").unwrap();

        let settings = Settings::from_file(&path).unwrap();
        assert_eq!(settings.url, "https://demo.supabase.co");
        assert_eq!(settings.books_table, "books");
        assert_eq!(settings.request_timeout_secs, 30);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let settings = Settings::from_file(&dir.path().join("absent.yaml")).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_environment_overrides_file() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("BOOKSHELF_URL", "http://localhost:54321"),
            ("BOOKSHELF_ANON_KEY", "local-key"),
        ]);
        let mut settings = Settings {
            url: "https://remote.example".into(),
            ..Settings::default()
        };
        settings.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(settings.url, "http://localhost:54321");
        assert_eq!(settings.anon_key, "local-key");
        assert_eq!(settings.books_table, "books");
    }

    #[test]
    fn test_validate_names_missing_key() {
        let settings = Settings {
            url: "https://demo.supabase.co".into(),
            ..Settings::default()
        };
        let err = settings.validate().unwrap_err().to_string();
        assert!(err.contains("anon_key"), "{err}");
    }

    #[test]
    fn test_malformed_yaml_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "url: [unterminated\n").unwrap();
        assert!(Settings::from_file(&path).is_err());
    }
}
