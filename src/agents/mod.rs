//! Agent descriptors: the catalog of selectable coding agents.
//!
//! Descriptors are purely cosmetic/informational (listing, explanation text,
//! cost estimates). Routing treats agent names opaquely: an override or a
//! config entry may name an agent that is not in the catalog, and that is
//! fine — this process never invokes the agent, it only names it.

use crate::config::Task;
use anyhow::{bail, Context as _, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Cost applied when an agent is not in the catalog.
const UNKNOWN_AGENT_BASE_COST: f64 = 0.10;

// ─── Descriptor ───────────────────────────────────────────────────────────────

/// One selectable agent. Custom agents are the same shape, loaded from
/// `{data_dir}/agents/*.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentDescriptor {
    pub name: String,
    #[serde(default)]
    pub emoji: String,
    #[serde(default)]
    pub description: String,
    /// Base cost in USD per request, before the task multiplier.
    #[serde(default = "default_base_cost")]
    pub base_cost_usd: f64,
    /// Free-form strength tags, e.g. "refactoring", "sandboxed".
    #[serde(default)]
    pub strengths: Vec<String>,
}

fn default_base_cost() -> f64 {
    UNKNOWN_AGENT_BASE_COST
}

struct BuiltinAgent {
    name: &'static str,
    emoji: &'static str,
    description: &'static str,
    base_cost_usd: f64,
    strengths: &'static [&'static str],
}

const BUILTIN_AGENTS: &[BuiltinAgent] = &[
    BuiltinAgent {
        name: "Aider",
        emoji: "🕶",
        description: "Terminal pair-programmer, strongest on focused edits",
        base_cost_usd: 0.05,
        strengths: &["refactoring", "git-aware", "cheap"],
    },
    BuiltinAgent {
        name: "Gemini CLI",
        emoji: "🚀",
        description: "Fast multimodal generation, good for UI-from-sketch work",
        base_cost_usd: 0.08,
        strengths: &["multimodal", "ui-generation", "fast"],
    },
    BuiltinAgent {
        name: "Codex CLI",
        emoji: "🧠",
        description: "Sandboxed executor with strong completion quality",
        base_cost_usd: 0.10,
        strengths: &["sandboxed", "completion", "tool-driven"],
    },
    BuiltinAgent {
        name: "Claude Code",
        emoji: "🔐",
        description: "Deep-reasoning agent for precise, multi-step work",
        base_cost_usd: 0.15,
        strengths: &["reasoning", "multi-file", "precision"],
    },
];

/// Task cost multipliers applied on top of an agent's base cost.
fn task_multiplier(task: Task) -> f64 {
    match task {
        Task::AppGen => 2.0,
        Task::Deploy => 1.5,
        Task::Monetize => 1.2,
        Task::VibeGen => 0.8,
    }
}

// ─── Catalog ──────────────────────────────────────────────────────────────────

/// Built-in agents plus any custom descriptors found on disk, in listing
/// order (built-ins first, then customs sorted by file name).
pub struct AgentCatalog {
    agents: Vec<AgentDescriptor>,
    custom_count: usize,
}

impl AgentCatalog {
    /// Load the catalog. A malformed custom descriptor is skipped with a
    /// WARN — one broken plugin file must not take the router down.
    pub fn load(data_dir: &Path) -> Self {
        let mut agents: Vec<AgentDescriptor> = BUILTIN_AGENTS
            .iter()
            .map(|a| AgentDescriptor {
                name: a.name.to_string(),
                emoji: a.emoji.to_string(),
                description: a.description.to_string(),
                base_cost_usd: a.base_cost_usd,
                strengths: a.strengths.iter().map(|s| s.to_string()).collect(),
            })
            .collect();

        let mut custom_count = 0;
        for path in custom_descriptor_paths(&data_dir.join("agents")) {
            match load_descriptor(&path) {
                Ok(custom) => {
                    // A custom descriptor shadows a built-in of the same name.
                    agents.retain(|a| a.name != custom.name);
                    agents.push(custom);
                    custom_count += 1;
                }
                Err(e) => {
                    warn!(path = %path.display(), err = %e, "skipping custom agent descriptor");
                }
            }
        }

        Self {
            agents,
            custom_count,
        }
    }

    /// Catalog with built-ins only.
    pub fn builtin() -> Self {
        Self::load(Path::new("/nonexistent"))
    }

    pub fn get(&self, name: &str) -> Option<&AgentDescriptor> {
        self.agents.iter().find(|a| a.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AgentDescriptor> {
        self.agents.iter()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn custom_count(&self) -> usize {
        self.custom_count
    }

    /// Deterministic cost estimate: base cost × task multiplier. Unknown
    /// agents use a flat base so the estimate is still meaningful.
    pub fn estimate_cost(&self, agent: &str, task: Task) -> f64 {
        let base = self
            .get(agent)
            .map(|a| a.base_cost_usd)
            .unwrap_or(UNKNOWN_AGENT_BASE_COST);
        round_cents(base * task_multiplier(task))
    }

    pub fn emoji(&self, agent: &str) -> &str {
        self.get(agent).map(|a| a.emoji.as_str()).unwrap_or("✨")
    }
}

fn round_cents(usd: f64) -> f64 {
    (usd * 100.0).round() / 100.0
}

fn custom_descriptor_paths(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut paths: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            matches!(
                p.extension().and_then(|e| e.to_str()),
                Some("yaml") | Some("yml")
            )
        })
        .collect();
    paths.sort();
    paths
}

fn load_descriptor(path: &Path) -> Result<AgentDescriptor> {
    let text = std::fs::read_to_string(path).context("unreadable")?;
    let descriptor: AgentDescriptor = serde_yaml::from_str(&text).context("invalid YAML")?;
    if descriptor.name.trim().is_empty() {
        bail!("descriptor has an empty name");
    }
    Ok(descriptor)
}

// ─── Template creation ────────────────────────────────────────────────────────

/// Write a commented descriptor template for a new custom agent.
///
/// Refuses to overwrite an existing file. Returns the path written.
pub fn create_agent_template(data_dir: &Path, name: &str) -> Result<PathBuf> {
    let name = name.trim();
    if name.is_empty() {
        bail!("agent name must not be empty");
    }
    let safe: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    let dir = data_dir.join("agents");
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join(format!("{safe}.yaml"));
    if path.exists() {
        bail!("agent descriptor {} already exists", path.display());
    }

    let template = format!(
        "# Custom agent descriptor for `{name}`.\n\
         # Reference it from routing preferences or `--override` by its `name`.\n\
         name: \"{name}\"\n\
         emoji: \"✨\"\n\
         description: \"Custom agent\"\n\
         # Base cost in USD per request, before the task multiplier.\n\
         base_cost_usd: 0.10\n\
         strengths: []\n"
    );
    std::fs::write(&path, template)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_roster_is_complete() {
        let catalog = AgentCatalog::builtin();
        for name in ["Aider", "Gemini CLI", "Codex CLI", "Claude Code"] {
            assert!(catalog.get(name).is_some(), "missing {name}");
        }
        assert_eq!(catalog.custom_count(), 0);
    }

    #[test]
    fn cost_estimate_is_deterministic() {
        let catalog = AgentCatalog::builtin();
        let a = catalog.estimate_cost("Claude Code", Task::AppGen);
        let b = catalog.estimate_cost("Claude Code", Task::AppGen);
        assert_eq!(a, b);
        assert_eq!(a, 0.30); // 0.15 × 2.0
        assert_eq!(catalog.estimate_cost("Aider", Task::VibeGen), 0.04);
    }

    #[test]
    fn unknown_agent_gets_flat_base_cost() {
        let catalog = AgentCatalog::builtin();
        assert_eq!(catalog.estimate_cost("Mystery Agent", Task::Monetize), 0.12);
        assert_eq!(catalog.emoji("Mystery Agent"), "✨");
    }

    #[test]
    fn custom_descriptor_is_loaded_and_shadows_builtin() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("agents")).unwrap();
        std::fs::write(
            dir.path().join("agents").join("aider.yaml"),
            "name: \"Aider\"\nemoji: \"🛠\"\nbase_cost_usd: 0.01\n",
        )
        .unwrap();
        let catalog = AgentCatalog::load(dir.path());
        assert_eq!(catalog.custom_count(), 1);
        assert_eq!(catalog.get("Aider").unwrap().emoji, "🛠");
        // Shadowed, not duplicated.
        assert_eq!(
            catalog.iter().filter(|a| a.name == "Aider").count(),
            1
        );
    }

    #[test]
    fn malformed_descriptor_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("agents")).unwrap();
        std::fs::write(dir.path().join("agents").join("bad.yaml"), ": not yaml :").unwrap();
        let catalog = AgentCatalog::load(dir.path());
        assert_eq!(catalog.custom_count(), 0);
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn template_round_trips_through_the_loader() {
        let dir = tempfile::tempdir().unwrap();
        let path = create_agent_template(dir.path(), "My Agent").unwrap();
        assert!(path.ends_with("my_agent.yaml"));
        let catalog = AgentCatalog::load(dir.path());
        assert!(catalog.get("My Agent").is_some());
    }

    #[test]
    fn template_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        create_agent_template(dir.path(), "dup").unwrap();
        assert!(create_agent_template(dir.path(), "dup").is_err());
    }
}
