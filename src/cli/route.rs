//! The main routing flow: prompt in, agent name out.

use anyhow::Result;

use crate::agents::AgentCatalog;
use crate::config::{Platform, RoutingConfig, Settings, Task};
use crate::history::{HistoryEntry, HistoryLog};
use crate::profiles::ProfileStore;
use crate::router::{route, RouteRule};
use crate::signals::{extract, Lexicon, PatternSet};

pub struct RouteArgs<'a> {
    pub prompt: &'a str,
    pub task: Option<Task>,
    pub platform: Option<Platform>,
    pub override_agent: Option<&'a str>,
    pub explain: bool,
    pub quiet: bool,
    pub profile: &'a str,
}

/// Load static data, extract signals, route, print, and record history.
///
/// Fatal errors (malformed data, unroutable task) propagate; the history
/// append never does.
pub fn run(settings: &Settings, args: &RouteArgs) -> Result<()> {
    let data_dir = &settings.data_dir;

    let store = ProfileStore::new(data_dir);
    store.ensure_default();
    let profile = store.load(args.profile);

    let task = args
        .task
        .or(profile.preferences.default_task)
        .unwrap_or(Task::AppGen);
    let platform = args
        .platform
        .or(profile.preferences.default_platform)
        .unwrap_or(Platform::All);

    let lexicon = Lexicon::load(&data_dir.join("data").join("emotion_lexicon.json"))?;
    let patterns = PatternSet::load(&data_dir.join("data").join("syntax_patterns.json"))?;
    let mut routing = RoutingConfig::load(
        &data_dir.join("config").join("defaults.yaml"),
        &lexicon,
        &patterns,
    )?;
    // The profile supplies a global default only when the routing config
    // does not set one; an explicit config entry stays authoritative.
    if routing.defaults.agent.is_none() {
        routing.defaults.agent = profile.preferences.default_agent.clone();
    }

    if !args.quiet {
        println!("🚀 Str8ZeRO — routing: '{}'", args.prompt);
    }

    let (mood, syntax) = extract(args.prompt, &lexicon, &patterns);
    let decision = route(task, &mood, &syntax, &routing, args.override_agent)?;

    let catalog = AgentCatalog::load(data_dir);
    let cost = catalog.estimate_cost(&decision.agent, task);

    if args.quiet {
        println!("{}", decision.agent);
    } else {
        println!();
        println!(
            "🔀 Agent selected: {} {}",
            decision.agent,
            catalog.emoji(&decision.agent)
        );
        println!("🧠 Reason: {}", decision.trace.reason());
        println!("💸 Estimated cost: ${cost:.2}");
        if args.explain {
            println!();
            println!("{}", decision.trace.render());
        }
    }

    let entry = HistoryEntry::new(
        args.prompt,
        task,
        platform,
        mood,
        syntax,
        &decision.agent,
        decision.trace.rule == RouteRule::ManualOverride,
        decision.trace.reason(),
    );
    HistoryLog::new(data_dir).append(&entry);

    Ok(())
}
