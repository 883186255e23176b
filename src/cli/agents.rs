// SPDX-License-Identifier: MIT
//! `--list-agents` / `--create-agent` — agent catalog management.

use anyhow::Result;
use std::path::Path;

use crate::agents::{create_agent_template, AgentCatalog};

/// Print the agent catalog as a table.
pub fn list(data_dir: &Path) -> Result<()> {
    let catalog = AgentCatalog::load(data_dir);

    println!("{:<14} {:<6} {:<8} {}", "Agent", "", "Cost", "Strengths");
    println!("{}", "─".repeat(60));
    for agent in catalog.iter() {
        println!(
            "{:<14} {:<6} ${:<7.2} {}",
            agent.name,
            agent.emoji,
            agent.base_cost_usd,
            agent.strengths.join(", ")
        );
    }
    if catalog.custom_count() > 0 {
        println!(
            "\n{} custom agent(s) loaded from {}",
            catalog.custom_count(),
            data_dir.join("agents").display()
        );
    }
    Ok(())
}

/// Write a new custom agent descriptor template.
pub fn create(data_dir: &Path, name: &str) -> Result<()> {
    let path = create_agent_template(data_dir, name)?;
    println!("✅ Created custom agent template: {}", path.display());
    println!("   Edit it, then reference the agent by name in routing preferences.");
    Ok(())
}
