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

use std::io::{BufRead, Write};
use std::path::Path;

use agents::park::{self, Park, ParkAction, ParkKind, ParkPercept, Rewards};
use agents::{Agent, Environment, Int, Program, ThingKey};
use anyhow::Context;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// One thing to put in the park.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// What it is.
    pub kind: ParkKind,
    /// Optional name, used in narration instead of the kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Where it starts.
    pub location: Int,
}

impl Placement {
    fn new(kind: ParkKind, location: Int) -> Self {
        Self {
            kind,
            name: None,
            location,
        }
    }

    fn named(kind: ParkKind, name: &str, location: Int) -> Self {
        Self {
            kind,
            name: Some(name.to_string()),
            location,
        }
    }
}

/// Everything needed to set up and run a park.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Maximum number of steps to run.
    pub steps: usize,
    /// Where the dog starts.
    pub dog: Int,
    /// Everything else in the park, in insertion order.
    pub things: Vec<Placement>,
    /// Performance awarded per action.
    pub rewards: Rewards,
}

// The Chapter 2 park: two foods, one water and two people.
impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            steps: 18,
            dog: 1,
            things: vec![
                Placement::named(ParkKind::Food, "dogfood", 5),
                Placement::named(ParkKind::Water, "water", 7),
                Placement::named(ParkKind::Food, "chicken", 9),
                Placement::named(ParkKind::Person, "Vincent", 3),
                Placement::named(ParkKind::Person, "Ngan", 12),
            ],
            rewards: Rewards::default(),
        }
    }
}

impl ScenarioConfig {
    /// Read a scenario from a JSON file. Missing fields take their default values.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        let config = serde_json::from_str(&contents)
            .with_context(|| format!("parsing scenario {}", path.display()))?;
        Ok(config)
    }

    /// Replace the placements with a random layout along `1..=length`. The same seed always gives
    /// the same park.
    pub fn scatter(&mut self, seed: u64, length: Int) {
        let mut rng = rand_pcg::Pcg64::seed_from_u64(seed);
        let length = length.max(1);
        let mut things = Vec::new();
        for _ in 0..rng.gen_range(1..=3) {
            things.push(Placement::new(ParkKind::Food, rng.gen_range(1..=length)));
        }
        for _ in 0..rng.gen_range(1..=3) {
            things.push(Placement::new(ParkKind::Water, rng.gen_range(1..=length)));
        }
        for _ in 0..rng.gen_range(0..=2) {
            things.push(Placement::new(ParkKind::Tree, rng.gen_range(1..=length)));
        }
        for i in 0..rng.gen_range(0..=2) {
            let name = format!("Person {}", i + 1);
            things.push(Placement::named(
                ParkKind::Person,
                &name,
                rng.gen_range(1..=length),
            ));
        }
        self.dog = 1;
        self.things = things;
    }

    /// Build the park. The dog runs `program`, or the reflex program if none is given. Returns
    /// the park and the dog.
    pub fn build(
        &self,
        program: Option<Program<Park>>,
    ) -> anyhow::Result<(Environment<Park>, ThingKey)> {
        let mut env = Environment::new(Park::with_rewards(self.rewards));
        let program =
            program.unwrap_or_else(|| Box::new(park::blind_dog_program) as Program<Park>);
        let dog = Agent::builder(ParkKind::BlindDog).program(program).build()?;
        let dog = env.spawn(dog, Some(self.dog));
        for placement in &self.things {
            let thing = match placement.kind {
                ParkKind::BlindDog => park::blind_dog(),
                ParkKind::Food => park::food(),
                ParkKind::Water => park::water(),
                ParkKind::Tree => park::tree(),
                ParkKind::Person => park::person(None),
            };
            let thing = match &placement.name {
                Some(name) => thing.with_name(name.clone()),
                None => thing,
            };
            env.spawn(thing, Some(placement.location));
        }
        info!(things = env.len(), dog = self.dog, "park is set up");
        Ok((env, dog))
    }
}

fn describe(percept: &ParkPercept) -> String {
    let labels: Vec<String> = percept
        .iter()
        .map(|sighting| match &sighting.name {
            Some(name) => format!("<{}>", name),
            None => format!("<{}>", sighting.kind),
        })
        .collect();
    format!("[{}]", labels.join(", "))
}

/// Ask for an action until a valid label comes in. Out of input means "move down".
pub fn read_action<R: BufRead, W: Write>(
    percept: &ParkPercept,
    input: &mut R,
    output: &mut W,
) -> ParkAction {
    loop {
        let _ = write!(output, "Percept={}; action? ", describe(percept));
        let _ = output.flush();
        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) => {
                warn!("no more input, moving down");
                return ParkAction::MoveDown;
            }
            Ok(_) => match line.parse::<ParkAction>() {
                Ok(action) => return action,
                Err(err) => {
                    let _ = writeln!(output, "{}; try one of: eat, drink, bark, move down", err);
                }
            },
            Err(err) => {
                warn!(%err, "could not read action, moving down");
                return ParkAction::MoveDown;
            }
        }
    }
}

/// A program that asks the person at the terminal.
pub fn interactive_program() -> Program<Park> {
    Box::new(|percept: &ParkPercept| {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        read_action(percept, &mut stdin.lock(), &mut stdout.lock())
    })
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use agents::Sighting;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_default_scenario_is_chapter_two_park() {
        let config = ScenarioConfig::default();
        let (mut env, dog) = config.build(None).expect("build failed");
        assert_eq!(env.len(), 6);
        assert_eq!(env.run(config.steps), 9);
        assert_eq!(env.thing(dog).and_then(|t| t.location), Some(10));
        assert!(env.is_done());
    }

    #[test]
    fn test_narrating_as_we_go_matches_the_journal() {
        let config = ScenarioConfig::default();
        let (mut journaled, _) = config.build(None).expect("build failed");
        journaled.run(config.steps);

        let (mut streamed, _) = config.build(None).expect("build failed");
        streamed.set_journal(false);
        let mut narrated = Vec::new();
        let ran = streamed.run_with(config.steps, |events| narrated.extend_from_slice(events));
        assert_eq!(ran, 9);
        assert!(streamed.events().is_empty());
        assert_eq!(narrated, journaled.events());
    }

    #[test]
    fn test_config_parses_with_defaults() {
        let json = r#"{
            "steps": 4,
            "things": [
                {"kind": "Food", "location": 2},
                {"kind": "Person", "name": "Vincent", "location": 1}
            ],
            "rewards": {"eat": 3}
        }"#;
        let config: ScenarioConfig = serde_json::from_str(json).expect("parse failed");
        assert_eq!(config.steps, 4);
        assert_eq!(config.dog, 1);
        assert_eq!(config.things[1].name.as_deref(), Some("Vincent"));
        assert_eq!(config.rewards.eat, 3);
        assert_eq!(config.rewards.drink, 1);

        let (mut env, dog) = config.build(None).expect("build failed");
        env.run(config.steps);
        // bark at 1, eat at 2
        assert_eq!(env.agent(dog).map(|a| a.performance), Some(4));
    }

    #[test]
    fn test_scatter_is_reproducible() {
        let mut a = ScenarioConfig::default();
        let mut b = ScenarioConfig::default();
        a.scatter(42, 20);
        b.scatter(42, 20);
        assert_eq!(a, b);
        assert!(a
            .things
            .iter()
            .all(|placement| (1..=20).contains(&placement.location)));
        assert!(a.things.iter().any(|placement| placement.kind.is_edible()));
    }

    #[test]
    fn test_scattered_park_builds_every_placement() {
        let mut config = ScenarioConfig::default();
        config.scatter(7, 10);
        let (env, dog) = config.build(None).expect("build failed");
        assert_eq!(env.len(), config.things.len() + 1);
        assert_eq!(env.thing(dog).and_then(|t| t.location), Some(1));
    }

    #[test]
    fn test_custom_program_drives_dog() {
        let config = ScenarioConfig::default();
        let program: Program<Park> = Box::new(|_: &ParkPercept| ParkAction::MoveDown);
        let (mut env, dog) = config.build(Some(program)).expect("build failed");
        env.run(3);
        assert_eq!(env.thing(dog).and_then(|t| t.location), Some(4));
        assert_eq!(env.len(), 6);
    }

    #[test]
    fn test_read_action_retries_until_valid() {
        let percept = vec![Sighting {
            key: ThingKey::default(),
            kind: ParkKind::Food,
            name: Some("chicken".to_string()),
        }];
        let mut input = Cursor::new("fetch\neat\n");
        let mut output = Vec::new();
        let action = read_action(&percept, &mut input, &mut output);
        assert_eq!(action, ParkAction::Eat);
        let output = String::from_utf8(output).expect("not utf8");
        assert!(output.starts_with("Percept=[<chicken>]; action? "));
        assert!(output.contains("unrecognized action: \"fetch\""));
    }

    #[test]
    fn test_read_action_out_of_input_moves_down() {
        let mut input = Cursor::new("");
        let mut output = Vec::new();
        assert_eq!(
            read_action(&vec![], &mut input, &mut output),
            ParkAction::MoveDown
        );
    }

    proptest! {
        #[test]
        fn test_scatter_stays_inside_park(seed in any::<u64>(), length in 1..50i32) {
            let mut config = ScenarioConfig::default();
            config.scatter(seed, length);
            prop_assert!(config
                .things
                .iter()
                .all(|placement| (1..=length).contains(&placement.location)));
            prop_assert!(config.things.iter().filter(|p| p.kind.is_edible()).count() >= 2);
        }
    }
}
