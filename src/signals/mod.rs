// SPDX-License-Identifier: MIT
//! Signal extraction — pure, deterministic prompt analysis.
//!
//! `extract` scans a prompt against the emotion lexicon and the syntax
//! pattern set and produces two signals: a normalized mood score vector and
//! the ordered set of matched syntax patterns. No side effects, no I/O;
//! identical input and static data yield bit-identical output.

pub mod lexicon;

pub use lexicon::{Lexicon, MoodEntry, PatternEntry, PatternSet, PhraseCue};

use lexicon::INTENSIFIER_BONUS;
use serde::{Deserialize, Serialize};

// ─── Signals ──────────────────────────────────────────────────────────────────

/// One mood label with its normalized score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodScore {
    pub label: String,
    /// Normalized to (0, 1]: the strongest observed mood maps to 1.0.
    pub score: f64,
}

/// Mood scores in lexicon declaration order. Only moods that actually
/// matched are present; an empty signal means no lexicon keyword occurred,
/// which is a valid, common case.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MoodSignal {
    pub scores: Vec<MoodScore>,
}

impl MoodSignal {
    /// The highest-scoring mood. Equal scores resolve to the earliest
    /// declared lexicon entry. `None` when nothing matched.
    pub fn dominant(&self) -> Option<&MoodScore> {
        let mut best: Option<&MoodScore> = None;
        for s in &self.scores {
            match best {
                Some(b) if s.score <= b.score => {}
                _ => best = Some(s),
            }
        }
        best
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.scores.iter().find(|s| s.label == label).map(|s| s.score)
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Names of matched syntax patterns, in pattern declaration order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SyntaxSignal {
    pub matched: Vec<String>,
}

impl SyntaxSignal {
    pub fn first(&self) -> Option<&str> {
        self.matched.first().map(|s| s.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.matched.iter().any(|m| m == name)
    }

    pub fn is_empty(&self) -> bool {
        self.matched.is_empty()
    }
}

// ─── Extraction ───────────────────────────────────────────────────────────────

/// Scan `prompt` for mood and syntax signals.
///
/// Mood scoring: each keyword occurrence adds the entry's weight; an
/// intensifier directly before a keyword ("extremely precise") adds a fixed
/// bonus; phrase cues carry their own weight. Scores are then normalized so
/// the maximum maps to 1.0. Syntax: a pattern is matched when any of its
/// triggers occurs; the result keeps declaration order, not scan order.
pub fn extract(prompt: &str, lexicon: &Lexicon, patterns: &PatternSet) -> (MoodSignal, SyntaxSignal) {
    let mut raw: Vec<(String, f64)> = Vec::new();
    for mood in lexicon.moods() {
        let mut score = 0.0;
        if let Some(matcher) = &mood.matcher {
            score += matcher.find_iter(prompt).count() as f64 * mood.weight;
        }
        if let Some(intensified) = &mood.intensified {
            score += intensified.find_iter(prompt).count() as f64 * INTENSIFIER_BONUS;
        }
        for (re, weight) in &mood.phrases {
            score += re.find_iter(prompt).count() as f64 * weight;
        }
        if score > 0.0 {
            raw.push((mood.label.clone(), score));
        }
    }

    let max = raw.iter().fold(0.0_f64, |acc, (_, s)| acc.max(*s));
    let scores = if max > 0.0 {
        raw.into_iter()
            .map(|(label, s)| MoodScore {
                label,
                score: s / max,
            })
            .collect()
    } else {
        Vec::new()
    };

    let matched = patterns
        .patterns()
        .iter()
        .filter(|p| p.matcher.is_match(prompt))
        .map(|p| p.name.clone())
        .collect();

    (MoodSignal { scores }, SyntaxSignal { matched })
}

// ─── Tests ────────────────────────────────────────────────────────────────────
