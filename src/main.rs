use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use str8zero::cli;
use str8zero::config::{Platform, Settings, Task};

#[derive(Parser)]
#[command(
    name = "str8zero",
    about = "Str8ZeRO — mood-aware router for AI coding agents",
    version
)]
struct Args {
    /// Free-text prompt to route to an agent.
    prompt: Option<String>,

    /// Task to perform.
    #[arg(long, value_enum)]
    task: Option<Task>,

    /// Target platform (recorded in the history log; not a routing input).
    #[arg(long, value_enum)]
    platform: Option<Platform>,

    /// Show the full routing explanation.
    #[arg(long)]
    explain: bool,

    /// Bypass inference and select this agent unconditionally.
    #[arg(long = "override", value_name = "AGENT")]
    override_agent: Option<String>,

    /// Profile supplying default task, platform, and agent.
    #[arg(long, default_value = "default")]
    profile: String,

    /// List built-in and custom agents, then exit.
    #[arg(long)]
    list_agents: bool,

    /// Write a custom agent descriptor template, then exit.
    #[arg(long, value_name = "NAME")]
    create_agent: Option<String>,

    /// List available profiles, then exit.
    #[arg(long)]
    list_profiles: bool,

    /// Data directory for config, lexicons, profiles, and the history log.
    #[arg(long, env = "STR8ZERO_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "STR8ZERO_LOG")]
    log: Option<String>,

    /// Suppress progress output; print only the selected agent name.
    ///
    /// Errors are still printed to stderr. Use this flag when piping output
    /// to other tools.
    #[arg(long, short = 'q')]
    quiet: bool,
}

fn main() {
    if let Err(e) = run() {
        // One-line cause; config errors must name the offending piece.
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    let settings = Settings::load(args.data_dir.clone(), args.log.clone())?;
    init_tracing(&settings);

    if args.list_agents {
        return cli::agents::list(&settings.data_dir);
    }
    if let Some(name) = &args.create_agent {
        return cli::agents::create(&settings.data_dir, name);
    }
    if args.list_profiles {
        return cli::profiles::list(&settings.data_dir);
    }

    let Some(prompt) = args.prompt.as_deref() else {
        anyhow::bail!("a prompt is required unless a management flag is given (see --help)");
    };

    cli::route::run(
        &settings,
        &cli::route::RouteArgs {
            prompt,
            task: args.task,
            platform: args.platform,
            override_agent: args.override_agent.as_deref(),
            explain: args.explain,
            quiet: args.quiet,
            profile: &args.profile,
        },
    )
}

/// Structured logs go to stderr so stdout stays clean for the selection.
fn init_tracing(settings: &Settings) {
    let filter = tracing_subscriber::EnvFilter::try_new(&settings.log)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if settings.log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}
