//! Str8ZeRO — mood-aware router for AI coding agents.
//!
//! One prompt in, one agent name out. The prompt is scanned against an
//! emotion lexicon and a set of syntax patterns; the resulting signals are
//! matched against per-task routing preferences to pick the agent that
//! should handle the request. The selected agent is only *named* — invoking
//! it is the caller's business.

pub mod agents;
pub mod cli;
pub mod config;
pub mod error;
pub mod history;
pub mod profiles;
pub mod router;
pub mod signals;

pub use error::RouterError;
