//! Configuration: ambient settings and routing preferences.
//!
//! Two layers, both loaded fresh per invocation:
//!
//! - `config/settings.toml` — ambient knobs (log level, log format).
//!   Priority: CLI / env var  >  TOML  >  built-in default.
//! - `config/defaults.yaml` — the routing preference table mapping each task
//!   to mood/syntax/fallback agent choices, validated against the loaded
//!   lexicon and pattern set before any routing happens.

use crate::error::RouterError;
use crate::signals::{Lexicon, PatternSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

// ─── Task & platform vocabulary ───────────────────────────────────────────────

/// The recognized task types. Routing config keys parse into this enum, so
/// an unknown task in `defaults.yaml` fails at load instead of at lookup.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Task {
    AppGen,
    Deploy,
    Monetize,
    VibeGen,
}

impl Task {
    pub fn as_str(&self) -> &'static str {
        match self {
            Task::AppGen => "app-gen",
            Task::Deploy => "deploy",
            Task::Monetize => "monetize",
            Task::VibeGen => "vibe-gen",
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target platform. Recorded in the history log; not used by routing rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Android,
    Ios,
    Web,
    All,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Android => "android",
            Platform::Ios => "ios",
            Platform::Web => "web",
            Platform::All => "all",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Ambient settings (settings.toml) ─────────────────────────────────────────

const DEFAULT_LOG: &str = "info";
const DEFAULT_LOG_FORMAT: &str = "pretty";

/// `{data_dir}/config/settings.toml` — all fields are optional overrides.
#[derive(Debug, Deserialize, Default)]
struct TomlSettings {
    /// Log level filter string, e.g. "debug", "info,str8zero=trace".
    log: Option<String>,
    /// Log output format: "pretty" (default, human-readable) | "json".
    log_format: Option<String>,
}

/// Resolved ambient settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub log: String,
    /// "pretty" | "json".
    pub log_format: String,
}

impl Settings {
    /// Build settings from CLI/env args plus the optional TOML file.
    ///
    /// A missing file means defaults; a file that exists but does not parse
    /// is fatal, since silently ignoring an operator's settings would hide
    /// typos until they matter.
    pub fn load(data_dir: Option<PathBuf>, log: Option<String>) -> Result<Self, RouterError> {
        let data_dir = data_dir.unwrap_or_else(default_data_dir);
        let path = data_dir.join("config").join("settings.toml");
        let toml = if path.exists() {
            let text =
                std::fs::read_to_string(&path).map_err(|e| RouterError::MalformedConfig {
                    path: path.clone(),
                    reason: format!("unreadable: {e}"),
                })?;
            toml::from_str::<TomlSettings>(&text).map_err(|e| RouterError::MalformedConfig {
                path: path.clone(),
                reason: e.to_string(),
            })?
        } else {
            TomlSettings::default()
        };

        let log_format = toml
            .log_format
            .unwrap_or_else(|| DEFAULT_LOG_FORMAT.to_string());
        if log_format != "pretty" && log_format != "json" {
            return Err(RouterError::MalformedConfig {
                path,
                reason: format!("log_format must be \"pretty\" or \"json\", got `{log_format}`"),
            });
        }

        Ok(Self {
            data_dir,
            log: log.or(toml.log).unwrap_or_else(|| DEFAULT_LOG.to_string()),
            log_format,
        })
    }
}

/// Platform-appropriate default data directory.
pub fn default_data_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("str8zero");
        }
    }
    #[cfg(target_os = "linux")]
    {
        if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
            return PathBuf::from(xdg).join("str8zero");
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join(".local")
                .join("share")
                .join("str8zero");
        }
    }
    #[cfg(target_os = "windows")]
    {
        if let Ok(appdata) = std::env::var("APPDATA") {
            return PathBuf::from(appdata).join("str8zero");
        }
    }
    PathBuf::from(".str8zero")
}

// ─── Routing preferences (defaults.yaml) ──────────────────────────────────────

/// Per-task routing table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskPrefs {
    /// mood label → agent name.
    pub mood: BTreeMap<String, String>,
    /// syntax pattern name → agent name.
    pub syntax: BTreeMap<String, String>,
    /// Agent used when no mood or syntax rule matches for this task.
    pub fallback: Option<String>,
}

/// Global defaults applied when a task has no entry at all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalDefaults {
    pub agent: Option<String>,
}

/// The full routing preference table (`config/defaults.yaml`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    pub preferences: BTreeMap<Task, TaskPrefs>,
    pub defaults: GlobalDefaults,
}

impl RoutingConfig {
    /// Load from `path`, validating every referenced mood label and syntax
    /// pattern name against the loaded static data. A missing file yields
    /// the built-in preferences.
    pub fn load(
        path: &Path,
        lexicon: &Lexicon,
        patterns: &PatternSet,
    ) -> Result<Self, RouterError> {
        let config = if path.exists() {
            let text =
                std::fs::read_to_string(path).map_err(|e| RouterError::MalformedConfig {
                    path: path.to_path_buf(),
                    reason: format!("unreadable: {e}"),
                })?;
            serde_yaml::from_str::<RoutingConfig>(&text).map_err(|e| {
                RouterError::MalformedConfig {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                }
            })?
        } else {
            Self::builtin()
        };
        config
            .validate(lexicon, patterns)
            .map_err(|reason| RouterError::MalformedConfig {
                path: path.to_path_buf(),
                reason,
            })?;
        Ok(config)
    }

    /// Cross-check referenced labels and pattern names. Routing on a label
    /// the lexicon cannot produce would silently never fire.
    fn validate(&self, lexicon: &Lexicon, patterns: &PatternSet) -> Result<(), String> {
        for (task, prefs) in &self.preferences {
            for label in prefs.mood.keys() {
                if !lexicon.contains_label(label) {
                    return Err(format!(
                        "task `{task}` routes on unknown mood label `{label}`"
                    ));
                }
            }
            for name in prefs.syntax.keys() {
                if !patterns.contains(name) {
                    return Err(format!(
                        "task `{task}` routes on unknown syntax pattern `{name}`"
                    ));
                }
            }
            for agent in prefs
                .mood
                .values()
                .chain(prefs.syntax.values())
                .chain(prefs.fallback.iter())
            {
                if agent.trim().is_empty() {
                    return Err(format!("task `{task}` maps to an empty agent name"));
                }
            }
        }
        Ok(())
    }

    /// The built-in preference table, mirroring the stock `defaults.yaml`.
    pub fn builtin() -> Self {
        let mut preferences = BTreeMap::new();
        preferences.insert(
            Task::VibeGen,
            TaskPrefs {
                mood: BTreeMap::from([
                    ("rebellious".to_string(), "Gemini CLI".to_string()),
                    ("nostalgic".to_string(), "Codex CLI".to_string()),
                ]),
                syntax: BTreeMap::from([("sketch-based".to_string(), "Gemini CLI".to_string())]),
                fallback: Some("Aider".to_string()),
            },
        );
        preferences.insert(
            Task::AppGen,
            TaskPrefs {
                mood: BTreeMap::from([
                    ("futuristic".to_string(), "Gemini CLI".to_string()),
                    ("precise".to_string(), "Claude Code".to_string()),
                ]),
                syntax: BTreeMap::from([("code-refactor".to_string(), "Aider".to_string())]),
                fallback: Some("Codex CLI".to_string()),
            },
        );
        Self {
            preferences,
            defaults: GlobalDefaults {
                agent: Some("Aider".to_string()),
            },
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
