/*
 * Copyright (C) 2023 Asim Ihsan
 * SPDX-License-Identifier: AGPL-3.0-only
 *
 * This program is free software: you can redistribute it and/or modify it under
 * the terms of the GNU Affero General Public License as published by the Free
 * Software Foundation, version 3.
 *
 * This program is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A
 * PARTICULAR PURPOSE. See the GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License along
 * with this program. If not, see <https://www.gnu.org/licenses/>
 */

#![warn(missing_docs)]

//! Chapter 2, Intelligent Agents, the blind dog in the park.

use std::path::PathBuf;

use agents::park::{Park, ParkEvent};
use agents::{Environment, Int, ThingKey};
use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod scenario;

use scenario::ScenarioConfig;

// A blind dog wanders down a one-dimensional park. It eats food, drinks water and barks at people
// it bumps into, and otherwise keeps moving. The park is done once nothing is left to eat or
// drink.
#[derive(Parser)]
#[command(name = "blind-dog-park")]
#[command(about = "Run a simple reflex agent through a park", version)]
struct Cli {
    /// Scenario file (JSON). Defaults to the built-in park.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum number of steps, overriding the scenario
    #[arg(short, long)]
    steps: Option<usize>,

    /// Scatter things randomly along the park, using this seed
    #[arg(long, value_name = "SEED")]
    scatter: Option<u64>,

    /// Length of the park when scattering
    #[arg(long, default_value_t = 20)]
    length: Int,

    /// Choose the dog's actions yourself
    #[arg(short, long)]
    interactive: bool,

    /// Print events as JSON lines
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &cli.config {
        Some(path) => ScenarioConfig::from_path(path)?,
        None => ScenarioConfig::default(),
    };
    if let Some(seed) = cli.scatter {
        config.scatter(seed, cli.length);
    }
    if let Some(steps) = cli.steps {
        config.steps = steps;
    }

    let program = cli.interactive.then(scenario::interactive_program);
    let (mut park, dog) = config.build(program)?;

    // narrate as we go so interactive prompts and their effects interleave
    park.set_journal(false);
    let mut failed = None;
    park.run_with(config.steps, |events| {
        for event in events {
            if failed.is_some() {
                return;
            }
            failed = report(event, cli.json).err();
        }
    });
    if let Some(err) = failed {
        return Err(err);
    }

    summarize(&park, dog);
    Ok(())
}

fn report(event: &ParkEvent<Int>, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(event)?);
    } else {
        println!("{}", event);
    }
    Ok(())
}

fn summarize(park: &Environment<Park>, dog: ThingKey) {
    let Some(thing) = park.thing(dog) else {
        return;
    };
    let location = thing
        .location
        .map_or_else(|| "nowhere".to_string(), |l| l.to_string());
    let performance = park.agent(dog).map_or(0, |agent| agent.performance);

    println!("Park is done: {}", park.is_done());
    println!("{} performance: {}", thing.label(), performance);

    let no_edibles = !park
        .things()
        .iter()
        .any(|(_, thing)| thing.kind().is_edible());
    let no_agents_alive = !park.things().agents().any(|(_, agent)| agent.is_alive());
    if no_edibles {
        println!("{} starved at location: {}", thing.label(), location);
    }
    if no_agents_alive {
        println!("{} died at location: {}", thing.label(), location);
    }
}
