//! End-to-end routing flow: data files on disk → signals → decision →
//! history line. Exercises `cli::route::run` against a temp data dir
//! without spawning the binary.

use std::path::Path;

use str8zero::cli::route::{run, RouteArgs};
use str8zero::config::{Platform, Settings, Task};
use tempfile::TempDir;

fn settings(dir: &Path) -> Settings {
    Settings::load(Some(dir.to_path_buf()), None).unwrap()
}

fn route_args(prompt: &str) -> RouteArgs<'_> {
    RouteArgs {
        prompt,
        task: None,
        platform: None,
        override_agent: None,
        explain: false,
        quiet: true,
        profile: "default",
    }
}

fn read_history(dir: &Path) -> Vec<serde_json::Value> {
    let path = dir.join("logs").join("agent_history.jsonl");
    let content = std::fs::read_to_string(path).unwrap_or_default();
    content
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

// ─── Precedence scenarios ─────────────────────────────────────────────────────

#[test]
fn override_is_selected_verbatim() {
    let dir = TempDir::new().unwrap();
    let mut args = route_args("anything");
    args.override_agent = Some("Claude Code");
    run(&settings(dir.path()), &args).unwrap();

    let history = read_history(dir.path());
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["selectedAgent"], "Claude Code");
    assert_eq!(history[0]["overrideUsed"], true);
    assert_eq!(history[0]["reason"], "manual override");
}

#[test]
fn rebellious_prompt_routes_vibe_gen_to_gemini() {
    let dir = TempDir::new().unwrap();
    let mut args = route_args("rebellion meets prophecy");
    args.task = Some(Task::VibeGen);
    run(&settings(dir.path()), &args).unwrap();

    let history = read_history(dir.path());
    assert_eq!(history[0]["selectedAgent"], "Gemini CLI");
    assert_eq!(history[0]["overrideUsed"], false);
    let reason = history[0]["reason"].as_str().unwrap();
    assert!(reason.contains("rebellious"), "reason cites the mood: {reason}");
    let moods = history[0]["moodSignal"]["scores"].as_array().unwrap();
    assert!(moods
        .iter()
        .any(|m| m["label"] == "rebellious" && m["score"] == 1.0));
}

#[test]
fn refactor_prompt_routes_app_gen_to_aider_via_syntax() {
    let dir = TempDir::new().unwrap();
    let mut args = route_args("quick refactor");
    args.task = Some(Task::AppGen);
    run(&settings(dir.path()), &args).unwrap();

    let history = read_history(dir.path());
    assert_eq!(history[0]["selectedAgent"], "Aider");
    let reason = history[0]["reason"].as_str().unwrap();
    assert!(
        reason.contains("code-refactor"),
        "reason cites the pattern: {reason}"
    );
}

#[test]
fn platform_and_task_are_recorded() {
    let dir = TempDir::new().unwrap();
    let mut args = route_args("ship something");
    args.task = Some(Task::Deploy);
    args.platform = Some(Platform::Ios);
    run(&settings(dir.path()), &args).unwrap();

    let history = read_history(dir.path());
    assert_eq!(history[0]["task"], "deploy");
    assert_eq!(history[0]["platform"], "ios");
}

// ─── Custom data files ────────────────────────────────────────────────────────

#[test]
fn custom_lexicon_patterns_and_config_drive_routing() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("data")).unwrap();
    std::fs::create_dir_all(dir.path().join("config")).unwrap();
    std::fs::write(
        dir.path().join("data").join("emotion_lexicon.json"),
        r#"[{"mood": "zen", "keywords": ["breathe", "calm"]}]"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("data").join("syntax_patterns.json"),
        r#"[{"name": "docs", "triggers": ["document", "readme"]}]"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("config").join("defaults.yaml"),
        "preferences:\n  vibe-gen:\n    mood:\n      zen: \"Claude Code\"\n    fallback: \"Aider\"\n",
    )
    .unwrap();

    let mut args = route_args("breathe and document everything");
    args.task = Some(Task::VibeGen);
    run(&settings(dir.path()), &args).unwrap();

    let history = read_history(dir.path());
    assert_eq!(history[0]["selectedAgent"], "Claude Code");
    assert_eq!(
        history[0]["syntaxSignal"]["matched"],
        serde_json::json!(["docs"])
    );
}

#[test]
fn malformed_lexicon_is_fatal_before_routing() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("data")).unwrap();
    std::fs::write(
        dir.path().join("data").join("emotion_lexicon.json"),
        "{ definitely not a lexicon",
    )
    .unwrap();

    let err = run(&settings(dir.path()), &route_args("hello")).unwrap_err();
    assert!(err.to_string().contains("malformed lexicon"), "{err:#}");
    // Nothing must have been routed or logged.
    assert!(read_history(dir.path()).is_empty());
}

#[test]
fn config_with_unknown_mood_label_is_fatal() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("config")).unwrap();
    std::fs::write(
        dir.path().join("config").join("defaults.yaml"),
        "preferences:\n  app-gen:\n    mood:\n      euphoric: \"Aider\"\n",
    )
    .unwrap();

    let err = run(&settings(dir.path()), &route_args("hello")).unwrap_err();
    assert!(err.to_string().contains("euphoric"), "{err:#}");
}

#[test]
fn unroutable_task_reports_configuration_incomplete() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("config")).unwrap();
    std::fs::create_dir_all(dir.path().join("profiles")).unwrap();
    // Task config exists but has no rules, no fallback; no global default.
    std::fs::write(
        dir.path().join("config").join("defaults.yaml"),
        "preferences:\n  app-gen: {}\n",
    )
    .unwrap();
    // A profile without a default agent, so nothing can fill the gap.
    std::fs::write(
        dir.path().join("profiles").join("bare.yaml"),
        "name: Bare\npreferences: {}\n",
    )
    .unwrap();

    let mut args = route_args("hello");
    args.task = Some(Task::AppGen);
    args.profile = "bare";
    let err = run(&settings(dir.path()), &args).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("app-gen"), "must name the task: {msg}");
    assert!(msg.contains("no agent resolvable"), "{msg}");
}

// ─── History resilience ───────────────────────────────────────────────────────

#[test]
fn history_write_failure_does_not_fail_routing() {
    let dir = TempDir::new().unwrap();
    // Occupy the log path with a directory so the append cannot succeed.
    std::fs::create_dir_all(dir.path().join("logs").join("agent_history.jsonl")).unwrap();

    let mut args = route_args("rebellion meets prophecy");
    args.task = Some(Task::VibeGen);
    run(&settings(dir.path()), &args).unwrap();
}

#[test]
fn repeated_runs_append_without_rewriting() {
    let dir = TempDir::new().unwrap();
    run(&settings(dir.path()), &route_args("first prompt")).unwrap();
    let after_one =
        std::fs::read_to_string(dir.path().join("logs").join("agent_history.jsonl")).unwrap();
    run(&settings(dir.path()), &route_args("second prompt")).unwrap();
    let after_two =
        std::fs::read_to_string(dir.path().join("logs").join("agent_history.jsonl")).unwrap();

    assert!(after_two.starts_with(&after_one));
    assert_eq!(read_history(dir.path()).len(), 2);
}

// ─── Profile defaults ─────────────────────────────────────────────────────────

#[test]
fn profile_supplies_default_task_and_agent() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("profiles")).unwrap();
    std::fs::create_dir_all(dir.path().join("config")).unwrap();
    // No defaults.agent in config; profile fills the global default.
    std::fs::write(
        dir.path().join("config").join("defaults.yaml"),
        "preferences: {}\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("profiles").join("night.yaml"),
        "name: Night\npreferences:\n  default_task: \"monetize\"\n  default_agent: \"Codex CLI\"\n",
    )
    .unwrap();

    let mut args = route_args("no signals here");
    args.profile = "night";
    run(&settings(dir.path()), &args).unwrap();

    let history = read_history(dir.path());
    assert_eq!(history[0]["task"], "monetize");
    assert_eq!(history[0]["selectedAgent"], "Codex CLI");
    assert_eq!(history[0]["reason"], "no task config; global default");
}
