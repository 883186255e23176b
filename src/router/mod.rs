//! Agent routing: signals + preferences → one agent name, with a trace.
//!
//! Pure function over already-loaded data. Precedence is strict: manual
//! override, then dominant mood, then first matched syntax pattern, then the
//! task fallback, then the global default. When nothing resolves the router
//! refuses to guess and reports which task is unroutable.

use crate::config::{RoutingConfig, Task};
use crate::error::RouterError;
use crate::signals::{MoodScore, MoodSignal, SyntaxSignal};
use serde::Serialize;

/// A dominant mood must score above this to drive routing. Normalization
/// maps the strongest matched mood to 1.0, so in practice this separates
/// "something matched" from "nothing matched" while leaving headroom for
/// lexicons that normalize differently.
pub const MOOD_SIGNIFICANCE_THRESHOLD: f64 = 0.7;

// ─── Decision & trace ─────────────────────────────────────────────────────────

/// Which precedence rule selected the agent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteRule {
    ManualOverride,
    MoodMatch { label: String, score: f64 },
    SyntaxMatch { pattern: String },
    Fallback,
    GlobalDefault,
}

/// Structured record of why an agent was chosen. Rendered as text only for
/// the `--explain` consumer.
#[derive(Debug, Clone, Serialize)]
pub struct ExplanationTrace {
    pub rule: RouteRule,
    pub task: Task,
    /// The dominant mood observed, whether or not it drove the decision.
    pub dominant_mood: Option<MoodScore>,
    /// All matched syntax patterns, in declaration order.
    pub matched_patterns: Vec<String>,
    pub agent: String,
}

impl ExplanationTrace {
    /// One-line reason in the stock phrasing.
    pub fn reason(&self) -> String {
        match &self.rule {
            RouteRule::ManualOverride => "manual override".to_string(),
            RouteRule::MoodMatch { label, score } => {
                format!("{label} mood ({score:.1}) matched to {}", self.agent)
            }
            RouteRule::SyntaxMatch { pattern } => {
                format!("{pattern} syntax matched to {}", self.agent)
            }
            RouteRule::Fallback => "fallback".to_string(),
            RouteRule::GlobalDefault => "no task config; global default".to_string(),
        }
    }

    /// Multi-line rendering for `--explain`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("task: {}\n", self.task));
        match &self.dominant_mood {
            Some(m) => out.push_str(&format!("dominant mood: {} ({:.2})\n", m.label, m.score)),
            None => out.push_str("dominant mood: none\n"),
        }
        if self.matched_patterns.is_empty() {
            out.push_str("syntax patterns: none\n");
        } else {
            out.push_str(&format!(
                "syntax patterns: {}\n",
                self.matched_patterns.join(", ")
            ));
        }
        out.push_str(&format!("rule: {}\n", self.reason()));
        out.push_str(&format!("agent: {}", self.agent));
        out
    }
}

/// The routing outcome: the selected agent plus its explanation.
#[derive(Debug, Clone, Serialize)]
pub struct Decision {
    pub agent: String,
    pub trace: ExplanationTrace,
}

// ─── Routing ──────────────────────────────────────────────────────────────────

/// Select an agent for `task` given the extracted signals.
///
/// `override_agent` bypasses all inference when non-empty. Fails with
/// `ConfigurationIncomplete` only when no rule, no fallback, and no global
/// default can name an agent.
pub fn route(
    task: Task,
    mood: &MoodSignal,
    syntax: &SyntaxSignal,
    config: &RoutingConfig,
    override_agent: Option<&str>,
) -> Result<Decision, RouterError> {
    let dominant = mood.dominant().cloned();
    let decide = |agent: String, rule: RouteRule| Decision {
        trace: ExplanationTrace {
            rule,
            task,
            dominant_mood: dominant.clone(),
            matched_patterns: syntax.matched.clone(),
            agent: agent.clone(),
        },
        agent,
    };

    // 1. Manual override wins unconditionally.
    if let Some(agent) = override_agent.map(str::trim).filter(|a| !a.is_empty()) {
        return Ok(decide(agent.to_string(), RouteRule::ManualOverride));
    }

    let prefs = match config.preferences.get(&task) {
        Some(prefs) => prefs,
        // 5. No entry for this task at all: straight to the global default.
        None => {
            let agent = config.defaults.agent.clone().ok_or_else(|| {
                RouterError::ConfigurationIncomplete {
                    task: task.to_string(),
                }
            })?;
            return Ok(decide(agent, RouteRule::GlobalDefault));
        }
    };

    // 2. Dominant mood above the significance threshold.
    if let Some(m) = &dominant {
        if m.score > MOOD_SIGNIFICANCE_THRESHOLD {
            if let Some(agent) = prefs.mood.get(&m.label) {
                return Ok(decide(
                    agent.clone(),
                    RouteRule::MoodMatch {
                        label: m.label.clone(),
                        score: m.score,
                    },
                ));
            }
        }
    }

    // 3. First matched syntax pattern, in declaration order.
    for pattern in &syntax.matched {
        if let Some(agent) = prefs.syntax.get(pattern) {
            return Ok(decide(
                agent.clone(),
                RouteRule::SyntaxMatch {
                    pattern: pattern.clone(),
                },
            ));
        }
    }

    // 4. Task fallback, then the global default.
    if let Some(agent) = &prefs.fallback {
        return Ok(decide(agent.clone(), RouteRule::Fallback));
    }
    if let Some(agent) = &config.defaults.agent {
        return Ok(decide(agent.clone(), RouteRule::GlobalDefault));
    }

    Err(RouterError::ConfigurationIncomplete {
        task: task.to_string(),
    })
}

// ─── Tests ────────────────────────────────────────────────────────────────────
