// SPDX-License-Identifier: MIT
//! User profiles: per-user defaults for task, platform, and agent.
//!
//! Profiles live in `{data_dir}/profiles/<name>.yaml`. A stock
//! `default.yaml` is written on first run and never overwritten. Loading
//! falls back: requested profile → `default` → built-in.

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::config::{Platform, Task};

/// Defaults a profile can set. Only fields the router consumes are modeled;
/// anything else in the file is ignored rather than rejected, so profiles
/// can be shared with other tooling.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilePreferences {
    pub default_task: Option<Task>,
    pub default_platform: Option<Platform>,
    /// Acts as the global default agent when the routing config has none.
    pub default_agent: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    pub description: String,
    pub preferences: ProfilePreferences,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            description: "Stock profile".to_string(),
            preferences: ProfilePreferences {
                default_task: Some(Task::AppGen),
                default_platform: Some(Platform::All),
                default_agent: Some("Aider".to_string()),
            },
        }
    }
}

// ─── Store ────────────────────────────────────────────────────────────────────

pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            dir: data_dir.join("profiles"),
        }
    }

    /// Write the stock `default.yaml` if absent. Never overwrites. Failure
    /// is non-fatal: routing works from the built-in profile either way.
    pub fn ensure_default(&self) {
        let path = self.dir.join("default.yaml");
        if path.exists() {
            return;
        }
        if let Err(e) = self.write_default(&path) {
            warn!(path = %path.display(), err = %e, "could not write default profile");
        }
    }

    fn write_default(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating {}", self.dir.display()))?;
        let yaml = serde_yaml::to_string(&Profile::default())?;
        std::fs::write(path, yaml).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    /// Load `name`, falling back to `default`, then the built-in profile.
    /// A profile that exists but does not parse is skipped with a WARN so a
    /// typo in one profile cannot brick routing.
    pub fn load(&self, name: &str) -> Profile {
        for candidate in [name, "default"] {
            let path = self.dir.join(format!("{candidate}.yaml"));
            if !path.exists() {
                if candidate == name && name != "default" {
                    warn!(profile = name, "profile not found; falling back");
                }
                continue;
            }
            match std::fs::read_to_string(&path)
                .map_err(anyhow::Error::from)
                .and_then(|text| serde_yaml::from_str::<Profile>(&text).map_err(Into::into))
            {
                Ok(profile) => return profile,
                Err(e) => {
                    warn!(path = %path.display(), err = %e, "unreadable profile; falling back");
                }
            }
        }
        Profile::default()
    }

    /// Profile names available on disk, sorted.
    pub fn list(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(&self.dir) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                matches!(
                    p.extension().and_then(|e| e.to_str()),
                    Some("yaml") | Some("yml")
                )
            })
            .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(String::from))
            .collect();
        names.sort();
        names
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_default_writes_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path());
        store.ensure_default();
        let path = dir.path().join("profiles").join("default.yaml");
        let first = std::fs::read_to_string(&path).unwrap();

        // Hand-edit, then re-run: must not be overwritten.
        std::fs::write(&path, "name: Edited\n").unwrap();
        store.ensure_default();
        let second = std::fs::read_to_string(&path).unwrap();
        assert_ne!(first, second);
        assert!(second.contains("Edited"));
    }

    #[test]
    fn load_falls_back_to_default_then_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path());

        // Nothing on disk: built-in.
        let p = store.load("missing");
        assert_eq!(p.preferences.default_task, Some(Task::AppGen));

        // default.yaml on disk: used for unknown names.
        store.ensure_default();
        let path = dir.path().join("profiles").join("default.yaml");
        std::fs::write(
            &path,
            "name: Default\npreferences:\n  default_agent: \"Codex CLI\"\n",
        )
        .unwrap();
        let p = store.load("missing");
        assert_eq!(p.preferences.default_agent.as_deref(), Some("Codex CLI"));
    }

    #[test]
    fn named_profile_wins_over_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path());
        store.ensure_default();
        std::fs::write(
            dir.path().join("profiles").join("night.yaml"),
            "name: Night\npreferences:\n  default_task: \"vibe-gen\"\n",
        )
        .unwrap();
        let p = store.load("night");
        assert_eq!(p.name, "Night");
        assert_eq!(p.preferences.default_task, Some(Task::VibeGen));
    }

    #[test]
    fn malformed_profile_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path());
        std::fs::create_dir_all(dir.path().join("profiles")).unwrap();
        std::fs::write(dir.path().join("profiles").join("broken.yaml"), "{{{{").unwrap();
        let p = store.load("broken");
        assert_eq!(p.name, "Default");
    }

    #[test]
    fn list_returns_sorted_stems() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path());
        std::fs::create_dir_all(dir.path().join("profiles")).unwrap();
        for name in ["zeta.yaml", "alpha.yaml", "notes.txt"] {
            std::fs::write(dir.path().join("profiles").join(name), "name: x\n").unwrap();
        }
        assert_eq!(store.list(), vec!["alpha".to_string(), "zeta".to_string()]);
    }
}
