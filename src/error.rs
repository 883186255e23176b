//! Error taxonomy for the routing pipeline.
//!
//! Malformed static data (lexicon, patterns, routing config) is fatal at
//! load time, before any routing attempt. History log write failures are
//! deliberately *not* represented here: they are logged at WARN and
//! swallowed, because the routing decision must never be blocked by logging
//! (see `history::HistoryLog::append`).

use std::path::PathBuf;

/// Errors surfaced by data loading and routing. All variants are fatal:
/// the binary prints the one-line cause to stderr and exits non-zero.
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    /// No rule matched, no task fallback, no global default. The router
    /// refuses to guess.
    #[error("no agent resolvable for task `{task}`: no matching rule, no fallback, no global default")]
    ConfigurationIncomplete { task: String },

    /// An emotion lexicon or syntax pattern file failed to parse or
    /// failed validation.
    #[error("malformed lexicon {}: {reason}", path.display())]
    MalformedLexicon { path: PathBuf, reason: String },

    /// A routing preferences or settings file failed to parse or failed
    /// validation.
    #[error("malformed config {}: {reason}", path.display())]
    MalformedConfig { path: PathBuf, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_incomplete_names_the_task() {
        let err = RouterError::ConfigurationIncomplete {
            task: "deploy".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("deploy"), "message must name the task: {msg}");
    }

    #[test]
    fn malformed_config_names_the_path() {
        let err = RouterError::MalformedConfig {
            path: PathBuf::from("/tmp/defaults.yaml"),
            reason: "unknown mood label `angry`".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("defaults.yaml"));
        assert!(msg.contains("angry"));
    }
}
