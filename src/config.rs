use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Persisted settings, stored as JSON under the OS config directory.
/// A missing file means defaults, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub github_token: String,
    pub repositories: Vec<String>,
    pub poll_interval_minutes: u64,
    pub reminder_enabled: bool,
    pub reminder_interval_minutes: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            github_token: String::new(),
            repositories: Vec::new(),
            poll_interval_minutes: 5,
            reminder_enabled: true,
            reminder_interval_minutes: 60,
        }
    }
}

impl Settings {
    pub fn load_default() -> Result<Self> {
        Self::load(&default_config_path()?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents)
                .with_context(|| format!("invalid settings file {}", path.display())),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err).with_context(|| {
                format!("failed to read settings file {}", path.display())
            }),
        }
    }

    pub fn save_default(&self) -> Result<()> {
        self.save(&default_config_path()?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create config dir {}", parent.display()))?;
        }
        let data = serde_json::to_string_pretty(self).context("failed to serialize settings")?;
        fs::write(path, data)
            .with_context(|| format!("failed to write settings file {}", path.display()))
    }

    pub fn is_configured(&self) -> bool {
        !self.github_token.is_empty() && !self.repositories.is_empty()
    }

    /// Set semantics: adding an already-listed repository is a no-op.
    /// Returns whether the list changed.
    pub fn add_repository(&mut self, slug: &str) -> bool {
        if self.repositories.iter().any(|r| r == slug) {
            return false;
        }
        self.repositories.push(slug.to_string());
        true
    }

    pub fn remove_repository(&mut self, slug: &str) -> bool {
        let before = self.repositories.len();
        self.repositories.retain(|r| r != slug);
        self.repositories.len() != before
    }

    pub fn set_poll_interval(&mut self, minutes: u64) {
        self.poll_interval_minutes = minutes.max(1);
    }

    pub fn set_reminder_interval(&mut self, minutes: u64) {
        self.reminder_interval_minutes = minutes.max(1);
    }
}

pub fn default_config_path() -> Result<PathBuf> {
    let base = dirs::config_dir().context("could not resolve a config directory")?;
    Ok(base.join("prr").join("config.json"))
}

/// `owner/name`, both parts limited to word characters, dots, and dashes.
pub fn is_valid_repo_slug(slug: &str) -> bool {
    let Some((owner, name)) = slug.split_once('/') else {
        return false;
    };
    let part_ok = |s: &str| {
        !s.is_empty()
            && s.chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    };
    part_ok(owner) && part_ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join("config.json")).unwrap();
        assert!(settings.github_token.is_empty());
        assert_eq!(settings.poll_interval_minutes, 5);
        assert!(settings.reminder_enabled);
        assert_eq!(settings.reminder_interval_minutes, 60);
        assert!(!settings.is_configured());
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut settings = Settings::default();
        settings.github_token = "ghp_test".to_string();
        settings.add_repository("acme/widgets");
        settings.set_poll_interval(10);
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded.github_token, "ghp_test");
        assert_eq!(loaded.repositories, vec!["acme/widgets"]);
        assert_eq!(loaded.poll_interval_minutes, 10);
        assert!(loaded.is_configured());
    }

    #[test]
    fn partial_file_falls_back_to_field_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"github_token":"ghp_x"}"#).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded.github_token, "ghp_x");
        assert_eq!(loaded.poll_interval_minutes, 5);
    }

    #[test]
    fn add_repository_has_set_semantics() {
        let mut settings = Settings::default();
        assert!(settings.add_repository("acme/widgets"));
        assert!(!settings.add_repository("acme/widgets"));
        assert_eq!(settings.repositories.len(), 1);

        assert!(settings.remove_repository("acme/widgets"));
        assert!(!settings.remove_repository("acme/widgets"));
    }

    #[test]
    fn intervals_are_clamped_to_at_least_one_minute() {
        let mut settings = Settings::default();
        settings.set_poll_interval(0);
        settings.set_reminder_interval(0);
        assert_eq!(settings.poll_interval_minutes, 1);
        assert_eq!(settings.reminder_interval_minutes, 1);
    }

    #[test]
    fn repo_slug_validation() {
        assert!(is_valid_repo_slug("acme/widgets"));
        assert!(is_valid_repo_slug("rust-lang/rust.vim"));
        assert!(!is_valid_repo_slug("acme"));
        assert!(!is_valid_repo_slug("acme/"));
        assert!(!is_valid_repo_slug("/widgets"));
        assert!(!is_valid_repo_slug("acme/wid gets"));
        assert!(!is_valid_repo_slug("a/b/c"));
    }
}
