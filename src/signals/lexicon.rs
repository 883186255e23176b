// SPDX-License-Identifier: MIT
//! Emotion lexicon and syntax pattern data.
//!
//! Both are ordered entry lists loaded once at startup and immutable for the
//! run. Declaration order is significant: it is the deterministic tie-break
//! for equal mood scores and for simultaneous syntax matches. Missing files
//! fall back to the built-in defaults; files that parse but fail validation
//! are fatal.

use crate::error::RouterError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Weight added per keyword occurrence when the entry does not specify one.
pub const DEFAULT_KEYWORD_WEIGHT: f64 = 0.3;
/// Weight added per phrase-cue occurrence when the cue does not specify one.
pub const DEFAULT_PHRASE_WEIGHT: f64 = 0.4;
/// Bonus added when an intensifier directly precedes a keyword.
pub const INTENSIFIER_BONUS: f64 = 0.2;

const INTENSIFIERS: &[&str] = &[
    "very",
    "extremely",
    "deeply",
    "highly",
    "incredibly",
    "truly",
    "absolutely",
];

// ─── File format ──────────────────────────────────────────────────────────────

/// One mood with its trigger vocabulary, as stored in
/// `data/emotion_lexicon.json` (an ordered array of entries).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodEntry {
    /// Mood label, e.g. `"rebellious"`. Must be unique within the file.
    pub mood: String,
    /// Weight added per keyword occurrence (default: 0.3).
    #[serde(default = "default_keyword_weight")]
    pub weight: f64,
    /// Single words matched case-insensitively on word boundaries.
    pub keywords: Vec<String>,
    /// Multi-word cues with their own weight.
    #[serde(default)]
    pub phrases: Vec<PhraseCue>,
}

/// A multi-word cue, e.g. `"clean code"` for the `elegant` mood.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhraseCue {
    pub text: String,
    #[serde(default = "default_phrase_weight")]
    pub weight: f64,
}

fn default_keyword_weight() -> f64 {
    DEFAULT_KEYWORD_WEIGHT
}

fn default_phrase_weight() -> f64 {
    DEFAULT_PHRASE_WEIGHT
}

/// One syntax pattern, as stored in `data/syntax_patterns.json`.
///
/// Triggers may be single words or short phrases; a pattern matches when any
/// trigger occurs in the prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternEntry {
    pub name: String,
    pub triggers: Vec<String>,
}

// ─── Compiled lexicon ─────────────────────────────────────────────────────────

/// A mood entry with its matchers compiled. Built once at load time.
#[derive(Debug)]
pub struct CompiledMood {
    pub label: String,
    pub weight: f64,
    /// Word-boundary alternation over the entry's keywords. `None` when the
    /// entry is phrase-only.
    pub(crate) matcher: Option<Regex>,
    /// Intensifier immediately followed by one of the keywords.
    pub(crate) intensified: Option<Regex>,
    /// Phrase matchers with their weights, in declaration order.
    pub(crate) phrases: Vec<(Regex, f64)>,
}

/// The full emotion lexicon, in declaration order.
#[derive(Debug)]
pub struct Lexicon {
    moods: Vec<CompiledMood>,
}

impl Lexicon {
    /// Load from `path`, falling back to the built-in lexicon when the file
    /// does not exist. A file that exists but cannot be read, parsed, or
    /// validated is fatal.
    pub fn load(path: &Path) -> Result<Self, RouterError> {
        if !path.exists() {
            return Ok(Self::builtin());
        }
        let text = std::fs::read_to_string(path).map_err(|e| RouterError::MalformedLexicon {
            path: path.to_path_buf(),
            reason: format!("unreadable: {e}"),
        })?;
        let entries: Vec<MoodEntry> =
            serde_json::from_str(&text).map_err(|e| RouterError::MalformedLexicon {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        Self::from_entries(entries).map_err(|reason| RouterError::MalformedLexicon {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Validate and compile a list of entries, preserving order.
    pub fn from_entries(entries: Vec<MoodEntry>) -> Result<Self, String> {
        if entries.is_empty() {
            return Err("lexicon has no entries".to_string());
        }
        let mut moods = Vec::with_capacity(entries.len());
        for entry in entries {
            if entry.mood.trim().is_empty() {
                return Err("entry with empty mood label".to_string());
            }
            if moods
                .iter()
                .any(|m: &CompiledMood| m.label == entry.mood)
            {
                return Err(format!("duplicate mood label `{}`", entry.mood));
            }
            if entry.keywords.is_empty() && entry.phrases.is_empty() {
                return Err(format!("mood `{}` has no keywords or phrases", entry.mood));
            }
            if !entry.weight.is_finite() || entry.weight <= 0.0 {
                return Err(format!("mood `{}` has non-positive weight", entry.mood));
            }

            if entry
                .keywords
                .iter()
                .any(|k| k.split_whitespace().next().is_none())
            {
                return Err(format!("mood `{}` has an empty keyword", entry.mood));
            }
            let (matcher, intensified) = if entry.keywords.is_empty() {
                (None, None)
            } else {
                (
                    Some(
                        word_matcher(&entry.keywords)
                            .map_err(|e| format!("mood `{}`: {e}", entry.mood))?,
                    ),
                    Some(
                        intensified_matcher(&entry.keywords)
                            .map_err(|e| format!("mood `{}`: {e}", entry.mood))?,
                    ),
                )
            };

            let mut phrases = Vec::with_capacity(entry.phrases.len());
            for cue in &entry.phrases {
                if cue.text.split_whitespace().next().is_none() {
                    return Err(format!("mood `{}` has an empty phrase", entry.mood));
                }
                if !cue.weight.is_finite() || cue.weight <= 0.0 {
                    return Err(format!(
                        "mood `{}` phrase `{}` has non-positive weight",
                        entry.mood, cue.text
                    ));
                }
                let re = phrase_matcher(&cue.text)
                    .map_err(|e| format!("mood `{}`: {e}", entry.mood))?;
                phrases.push((re, cue.weight));
            }

            moods.push(CompiledMood {
                label: entry.mood,
                weight: entry.weight,
                matcher,
                intensified,
                phrases,
            });
        }
        Ok(Self { moods })
    }

    /// The built-in seven-mood lexicon.
    pub fn builtin() -> Self {
        Self::from_entries(builtin_mood_entries()).expect("built-in lexicon is valid")
    }

    pub(crate) fn moods(&self) -> &[CompiledMood] {
        &self.moods
    }

    pub fn contains_label(&self, label: &str) -> bool {
        self.moods.iter().any(|m| m.label == label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.moods.iter().map(|m| m.label.as_str())
    }
}

// ─── Compiled pattern set ─────────────────────────────────────────────────────

pub struct CompiledPattern {
    pub name: String,
    pub(crate) matcher: Regex,
}

/// All syntax patterns, in declaration order.
pub struct PatternSet {
    patterns: Vec<CompiledPattern>,
}

impl PatternSet {
    /// Load from `path`, falling back to the built-in patterns when the file
    /// does not exist.
    pub fn load(path: &Path) -> Result<Self, RouterError> {
        if !path.exists() {
            return Ok(Self::builtin());
        }
        let text = std::fs::read_to_string(path).map_err(|e| RouterError::MalformedLexicon {
            path: path.to_path_buf(),
            reason: format!("unreadable: {e}"),
        })?;
        let entries: Vec<PatternEntry> =
            serde_json::from_str(&text).map_err(|e| RouterError::MalformedLexicon {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        Self::from_entries(entries).map_err(|reason| RouterError::MalformedLexicon {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Validate and compile a list of pattern entries, preserving order.
    pub fn from_entries(entries: Vec<PatternEntry>) -> Result<Self, String> {
        let mut patterns = Vec::with_capacity(entries.len());
        for entry in entries {
            if entry.name.trim().is_empty() {
                return Err("pattern with empty name".to_string());
            }
            if patterns
                .iter()
                .any(|p: &CompiledPattern| p.name == entry.name)
            {
                return Err(format!("duplicate pattern name `{}`", entry.name));
            }
            if entry.triggers.is_empty() {
                return Err(format!("pattern `{}` has no triggers", entry.name));
            }
            if entry
                .triggers
                .iter()
                .any(|t| t.split_whitespace().next().is_none())
            {
                return Err(format!("pattern `{}` has an empty trigger", entry.name));
            }
            let matcher = trigger_matcher(&entry.triggers)
                .map_err(|e| format!("pattern `{}`: {e}", entry.name))?;
            patterns.push(CompiledPattern {
                name: entry.name,
                matcher,
            });
        }
        Ok(Self { patterns })
    }

    /// The built-in four-pattern set.
    pub fn builtin() -> Self {
        Self::from_entries(builtin_pattern_entries()).expect("built-in patterns are valid")
    }

    pub(crate) fn patterns(&self) -> &[CompiledPattern] {
        &self.patterns
    }

    pub fn contains(&self, name: &str) -> bool {
        self.patterns.iter().any(|p| p.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|p| p.name.as_str())
    }
}

// ─── Matcher construction ─────────────────────────────────────────────────────

/// Escape a word or phrase into a regex fragment. Internal whitespace is
/// normalized to `\s+` so `"clean  code"` still matches `"clean code"`.
fn escaped_fragment(text: &str) -> String {
    text.split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+")
}

fn word_matcher(words: &[String]) -> Result<Regex, regex::Error> {
    let alt = words
        .iter()
        .map(|w| escaped_fragment(w))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alt})\b"))
}

fn intensified_matcher(words: &[String]) -> Result<Regex, regex::Error> {
    let intensifiers = INTENSIFIERS.join("|");
    let alt = words
        .iter()
        .map(|w| escaped_fragment(w))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(
        r"(?i)\b(?:{intensifiers})\s+(?:{alt})\b"
    ))
}

fn phrase_matcher(text: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"(?i)\b{}\b", escaped_fragment(text)))
}

fn trigger_matcher(triggers: &[String]) -> Result<Regex, regex::Error> {
    let alt = triggers
        .iter()
        .map(|t| escaped_fragment(t))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alt})\b"))
}

// ─── Built-in data ────────────────────────────────────────────────────────────

struct BuiltinMood {
    label: &'static str,
    keywords: &'static [&'static str],
    phrases: &'static [&'static str],
}

const BUILTIN_MOODS: &[BuiltinMood] = &[
    BuiltinMood {
        label: "rebellious",
        keywords: &[
            "rebellion", "freedom", "break", "disrupt", "revolution", "anarchy", "resist",
            "defy", "challenge", "unconventional",
        ],
        phrases: &["freedom of expression"],
    },
    BuiltinMood {
        label: "elegant",
        keywords: &[
            "clean", "elegant", "minimal", "precise", "refined", "sophisticated", "polished",
            "sleek", "streamlined", "graceful",
        ],
        phrases: &["clean code"],
    },
    BuiltinMood {
        label: "nostalgic",
        keywords: &[
            "retro", "nostalgia", "classic", "vintage", "old-school", "traditional", "legacy",
            "throwback", "memory", "reminiscent",
        ],
        phrases: &["like the old days", "remember when"],
    },
    BuiltinMood {
        label: "futuristic",
        keywords: &[
            "future", "prophecy", "advanced", "cutting-edge", "innovative", "forward",
            "next-gen", "tomorrow", "visionary", "ahead",
        ],
        phrases: &["cutting edge", "next generation"],
    },
    BuiltinMood {
        label: "precise",
        keywords: &[
            "precise", "exact", "accurate", "meticulous", "detailed", "rigorous", "specific",
            "exacting", "careful", "thorough",
        ],
        phrases: &["no errors", "perfect output"],
    },
    BuiltinMood {
        label: "rapid",
        keywords: &[
            "rapid", "quick", "fast", "swift", "speedy", "immediate", "instant", "prompt",
            "expedient", "hasty",
        ],
        phrases: &["deadline", "as soon as possible"],
    },
    BuiltinMood {
        label: "cautious",
        keywords: &[
            "cautious", "careful", "prudent", "wary", "vigilant", "guarded", "conservative",
            "safe", "measured", "deliberate",
        ],
        phrases: &["make sure", "double check"],
    },
];

const BUILTIN_PATTERNS: &[(&str, &[&str])] = &[
    (
        "sketch-based",
        &[
            "sketch", "design", "wireframe", "mockup", "prototype", "layout", "ui", "ux",
            "interface", "visual",
        ],
    ),
    (
        "code-refactor",
        &[
            "refactor", "improve", "optimize", "clean", "restructure", "rewrite", "enhance",
            "upgrade", "modernize", "fix", "improve performance", "make it faster",
        ],
    ),
    (
        "multi-file",
        &[
            "files", "project", "codebase", "repository", "directory", "structure", "organize",
            "architecture", "system", "framework", "project structure", "organize code",
        ],
    ),
    (
        "api-bindings",
        &[
            "api", "connect", "integrate", "binding", "interface", "endpoint", "service",
            "request", "response", "data", "connect to", "integrate with",
        ],
    ),
];

fn builtin_mood_entries() -> Vec<MoodEntry> {
    BUILTIN_MOODS
        .iter()
        .map(|m| MoodEntry {
            mood: m.label.to_string(),
            weight: DEFAULT_KEYWORD_WEIGHT,
            keywords: m.keywords.iter().map(|k| k.to_string()).collect(),
            phrases: m
                .phrases
                .iter()
                .map(|p| PhraseCue {
                    text: p.to_string(),
                    weight: DEFAULT_PHRASE_WEIGHT,
                })
                .collect(),
        })
        .collect()
}

fn builtin_pattern_entries() -> Vec<PatternEntry> {
    BUILTIN_PATTERNS
        .iter()
        .map(|(name, triggers)| PatternEntry {
            name: name.to_string(),
            triggers: triggers.iter().map(|t| t.to_string()).collect(),
        })
        .collect()
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_lexicon_compiles() {
        let lex = Lexicon::builtin();
        assert!(lex.contains_label("rebellious"));
        assert!(lex.contains_label("cautious"));
        assert_eq!(lex.moods().len(), 7);
    }

    #[test]
    fn builtin_patterns_compile_in_order() {
        let set = PatternSet::builtin();
        let names: Vec<&str> = set.names().collect();
        assert_eq!(
            names,
            vec!["sketch-based", "code-refactor", "multi-file", "api-bindings"]
        );
    }

    #[test]
    fn duplicate_mood_label_rejected() {
        let entries = vec![
            MoodEntry {
                mood: "calm".to_string(),
                weight: 0.3,
                keywords: vec!["serene".to_string()],
                phrases: vec![],
            },
            MoodEntry {
                mood: "calm".to_string(),
                weight: 0.3,
                keywords: vec!["placid".to_string()],
                phrases: vec![],
            },
        ];
        let err = Lexicon::from_entries(entries).unwrap_err();
        assert!(err.contains("duplicate"), "{err}");
    }

    #[test]
    fn empty_entry_rejected() {
        let entries = vec![MoodEntry {
            mood: "void".to_string(),
            weight: 0.3,
            keywords: vec![],
            phrases: vec![],
        }];
        assert!(Lexicon::from_entries(entries).is_err());
    }

    #[test]
    fn non_positive_weight_rejected() {
        let entries = vec![MoodEntry {
            mood: "calm".to_string(),
            weight: 0.0,
            keywords: vec!["serene".to_string()],
            phrases: vec![],
        }];
        assert!(Lexicon::from_entries(entries).is_err());
    }

    #[test]
    fn keywords_with_regex_metacharacters_are_escaped() {
        let entries = vec![MoodEntry {
            mood: "odd".to_string(),
            weight: 0.3,
            keywords: vec!["c++".to_string(), "what?".to_string()],
            phrases: vec![],
        }];
        // Must not fail to compile; metacharacters are literals.
        Lexicon::from_entries(entries).unwrap();
    }

    #[test]
    fn missing_file_falls_back_to_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let lex = Lexicon::load(&dir.path().join("nope.json")).unwrap();
        assert!(lex.contains_label("elegant"));
        let set = PatternSet::load(&dir.path().join("nope.json")).unwrap();
        assert!(set.contains("multi-file"));
    }

    #[test]
    fn malformed_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("emotion_lexicon.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = Lexicon::load(&path).unwrap_err();
        assert!(matches!(err, RouterError::MalformedLexicon { .. }));
    }

    #[test]
    fn lexicon_roundtrips_through_json() {
        let json = serde_json::to_string(&builtin_mood_entries()).unwrap();
        let back: Vec<MoodEntry> = serde_json::from_str(&json).unwrap();
        let lex = Lexicon::from_entries(back).unwrap();
        assert_eq!(lex.moods().len(), 7);
    }

    #[test]
    fn duplicate_pattern_name_rejected() {
        let entries = vec![
            PatternEntry {
                name: "x".to_string(),
                triggers: vec!["a".to_string()],
            },
            PatternEntry {
                name: "x".to_string(),
                triggers: vec!["b".to_string()],
            },
        ];
        assert!(PatternSet::from_entries(entries).is_err());
    }
}
