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

//! The park, a one-dimensional world of food, water and people, and the blind dog that wanders
//! through it.
//!
//! The dog only feels what is at its own location. Its program is a simple reflex table:
//!
//! | Percept | Feel Food | Feel Water | Feel Person | Feel Nothing |
//! |---------|-----------|------------|-------------|--------------|
//! | Action  | eat       | drink      | bark        | move down    |
//!
//! Every action moves the dog one location down the park. A person the dog barks at is scared
//! one location back, behind the dog.

use std::fmt::{Debug, Display};
use std::marker::PhantomData;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::agent::Agent;
use crate::environment::{Policy, Things};
use crate::error::ParseActionError;
use crate::thing::{Sighting, Thing, ThingKey};
use crate::Int;

/// What a Thing in the park is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParkKind {
    /// The agent.
    BlindDog,
    /// Something to eat.
    Food,
    /// Something to drink.
    Water,
    /// Scenery.
    Tree,
    /// Somebody to bark at.
    Person,
}

impl ParkKind {
    /// Food and water are edible. The park is done once nothing edible is left.
    pub fn is_edible(self) -> bool {
        matches!(self, ParkKind::Food | ParkKind::Water)
    }
}

impl Display for ParkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParkKind::BlindDog => write!(f, "BlindDog"),
            ParkKind::Food => write!(f, "Food"),
            ParkKind::Water => write!(f, "Water"),
            ParkKind::Tree => write!(f, "Tree"),
            ParkKind::Person => write!(f, "Person"),
        }
    }
}

/// Actions in the park.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParkAction {
    /// Eat the food here.
    #[serde(rename = "eat")]
    Eat,
    /// Drink the water here.
    #[serde(rename = "drink")]
    Drink,
    /// Bark at the person here.
    #[serde(rename = "bark")]
    Bark,
    /// Just move on.
    #[serde(rename = "move down")]
    MoveDown,
}

impl ParkAction {
    /// Every action, in priority order.
    pub const ALL: [ParkAction; 4] = [
        ParkAction::Eat,
        ParkAction::Drink,
        ParkAction::Bark,
        ParkAction::MoveDown,
    ];

    /// Label of the action.
    pub fn label(self) -> &'static str {
        match self {
            ParkAction::Eat => "eat",
            ParkAction::Drink => "drink",
            ParkAction::Bark => "bark",
            ParkAction::MoveDown => "move down",
        }
    }

    /// The kind of thing the action is aimed at, if any.
    pub fn target(self) -> Option<ParkKind> {
        match self {
            ParkAction::Eat => Some(ParkKind::Food),
            ParkAction::Drink => Some(ParkKind::Water),
            ParkAction::Bark => Some(ParkKind::Person),
            ParkAction::MoveDown => None,
        }
    }
}

impl Display for ParkAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for ParkAction {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        ParkAction::ALL
            .into_iter()
            .find(|action| action.label() == label)
            .ok_or_else(|| ParseActionError::Unrecognized(label.to_string()))
    }
}

/// What happened in the park. Things are referred to by their labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ParkEvent<L> {
    /// An agent moved one location down the park.
    MovedDown {
        /// Who moved.
        agent: String,
        /// Where from.
        from: L,
        /// Where to.
        to: L,
    },

    /// An agent ate some food.
    Ate {
        /// Who ate.
        agent: String,
        /// What was eaten.
        food: String,
        /// Where.
        at: L,
    },

    /// An agent drank some water.
    Drank {
        /// Who drank.
        agent: String,
        /// What was drunk.
        water: String,
        /// Where.
        at: L,
    },

    /// An agent barked at a person.
    Barked {
        /// Who barked.
        agent: String,
        /// At whom.
        person: String,
        /// Where.
        at: L,
    },

    /// A person was scared away by an agent.
    Scared {
        /// Who was scared.
        person: String,
        /// By whom.
        by: String,
        /// Where the person went.
        to: L,
    },
}

impl<L: Display> Display for ParkEvent<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParkEvent::MovedDown { agent, from, to } => write!(
                f,
                "{} at location: {} decided to move down to location: {}",
                agent, from, to
            ),
            ParkEvent::Ate { agent, food, at } => {
                write!(f, "{} ate {} at location: {}", agent, food, at)
            }
            ParkEvent::Drank { agent, water, at } => {
                write!(f, "{} drank {} at location: {}", agent, water, at)
            }
            ParkEvent::Barked { agent, person, at } => {
                write!(f, "{} barked at {} at location: {}", agent, person, at)
            }
            ParkEvent::Scared { person, by, to } => write!(
                f,
                "{} was scared by {} and moved to location: {}",
                person, by, to
            ),
        }
    }
}

/// Performance awarded per successful action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rewards {
    /// For eating food.
    pub eat: Int,
    /// For drinking water.
    pub drink: Int,
    /// For barking at a person.
    pub bark: Int,
    /// For every move down the park.
    pub move_down: Int,
}

impl Default for Rewards {
    fn default() -> Self {
        Self {
            eat: 1,
            drink: 1,
            bark: 1,
            move_down: 0,
        }
    }
}

/// A coordinate along the park. The dog only ever counts up by one, and scared people only ever
/// step back by one, so any signed integer will do. A step past the end of the type's range has
/// no effect.
pub trait Position:
    num_traits::Signed + num_traits::CheckedAdd + num_traits::CheckedSub + Copy + Debug + Display
{
}

impl<T> Position for T where
    T: num_traits::Signed + num_traits::CheckedAdd + num_traits::CheckedSub + Copy + Debug + Display
{
}

/// The percept of a park agent: everything at its own location, itself included.
pub type ParkPercept = Vec<Sighting<ParkKind>>;

/// The park.
#[derive(Debug, Clone)]
pub struct Park<L = Int> {
    rewards: Rewards,
    phantom_location: PhantomData<L>,
}

impl<L: Position> Default for Park<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Position> Park<L> {
    /// A park with the default rewards.
    pub fn new() -> Self {
        Self::with_rewards(Rewards::default())
    }

    /// A park with custom rewards.
    pub fn with_rewards(rewards: Rewards) -> Self {
        Self {
            rewards,
            phantom_location: PhantomData,
        }
    }

    /// Performance awarded per action.
    pub fn rewards(&self) -> &Rewards {
        &self.rewards
    }

    fn label(things: &Things<Self>, key: ThingKey) -> String {
        things
            .get(key)
            .map_or_else(|| format!("{:?}", key), Thing::label)
    }

    fn reward(things: &mut Things<Self>, agent: ThingKey, points: Int) {
        if let Some(agent) = things.agent_mut(agent) {
            agent.performance += points;
        }
    }

    // Returns the event for an effect on the first matching thing, or None if nothing matched.
    fn act_on_target(
        &self,
        things: &mut Things<Self>,
        agent: ThingKey,
        action: ParkAction,
        location: L,
    ) -> Vec<ParkEvent<L>> {
        let Some(kind) = action.target() else {
            return Vec::new();
        };
        let Some(target) = things
            .list_things_at(&location, |thing| *thing.kind() == kind)
            .first()
            .copied()
        else {
            debug!(%action, %location, "nothing to {} here", action);
            return Vec::new();
        };

        let agent_label = Self::label(things, agent);
        let target_label = Self::label(things, target);
        match action {
            ParkAction::Eat | ParkAction::Drink => {
                if let Err(err) = things.delete(target) {
                    warn!(%err, "could not consume {}", target_label);
                    return Vec::new();
                }
                let (points, event) = if action == ParkAction::Eat {
                    let event = ParkEvent::Ate {
                        agent: agent_label,
                        food: target_label,
                        at: location,
                    };
                    (self.rewards.eat, event)
                } else {
                    let event = ParkEvent::Drank {
                        agent: agent_label,
                        water: target_label,
                        at: location,
                    };
                    (self.rewards.drink, event)
                };
                Self::reward(things, agent, points);
                vec![event]
            }
            ParkAction::Bark => {
                let Some(behind) = location.checked_sub(&L::one()) else {
                    warn!(%location, "{} has nowhere to back away to", target_label);
                    return Vec::new();
                };
                if let Some(person) = things.get_mut(target) {
                    person.location = Some(behind);
                }
                Self::reward(things, agent, self.rewards.bark);
                vec![
                    ParkEvent::Barked {
                        agent: agent_label.clone(),
                        person: target_label.clone(),
                        at: location,
                    },
                    ParkEvent::Scared {
                        person: target_label,
                        by: agent_label,
                        to: behind,
                    },
                ]
            }
            ParkAction::MoveDown => Vec::new(),
        }
    }

    fn move_down(
        &self,
        things: &mut Things<Self>,
        agent: ThingKey,
        from: L,
    ) -> Option<ParkEvent<L>> {
        let Some(to) = from.checked_add(&L::one()) else {
            warn!(?agent, %from, "end of the park, can't move down");
            return None;
        };
        if let Some(thing) = things.get_mut(agent) {
            thing.location = Some(to);
        }
        Self::reward(things, agent, self.rewards.move_down);
        Some(ParkEvent::MovedDown {
            agent: Self::label(things, agent),
            from,
            to,
        })
    }
}

impl<L: Position> Policy for Park<L> {
    type Kind = ParkKind;
    type Location = L;
    type Action = ParkAction;
    type Percept = ParkPercept;
    type Event = ParkEvent<L>;

    /// Return the list of things that are at the agent's location.
    fn percept(&self, things: &Things<Self>, agent: ThingKey) -> ParkPercept {
        match things.location(agent) {
            Some(location) => things.sightings_at(location),
            None => Vec::new(),
        }
    }

    /// Apply the action to the first matching thing at the agent's location, then move the agent
    /// down. An action with nothing to act on is just a move down. Neither the dog nor a scared
    /// person is moved past the end of the location type's range.
    fn execute_action(
        &mut self,
        things: &mut Things<Self>,
        agent: ThingKey,
        action: &ParkAction,
    ) -> Vec<ParkEvent<L>> {
        let Some(location) = things.location(agent).copied() else {
            warn!(?agent, %action, "agent has no location");
            return Vec::new();
        };
        let mut events = self.act_on_target(things, agent, *action, location);
        events.extend(self.move_down(things, agent, location));
        for event in &events {
            debug!(%event);
        }
        events
    }

    /// The park entrance.
    fn default_location(&self, _thing: &Thing<Self>) -> Option<L> {
        Some(L::one())
    }

    /// By default we would be done when we can't find a live agent, but to avoid starving the
    /// dog we also stop once there is no more food or water.
    fn is_done(&self, things: &Things<Self>) -> bool {
        let no_edibles = !things.iter().any(|(_, thing)| thing.kind().is_edible());
        let dead_agents = !things.agents().any(|(_, agent)| agent.is_alive());
        dead_agents || no_edibles
    }
}

/// Returns an action based on the dog's percept. Food is preferred to water, and water to a
/// person to bark at.
pub fn blind_dog_program(percept: &ParkPercept) -> ParkAction {
    let feels = |kind: ParkKind| percept.iter().any(|sighting| sighting.kind == kind);
    if feels(ParkKind::Food) {
        ParkAction::Eat
    } else if feels(ParkKind::Water) {
        ParkAction::Drink
    } else if feels(ParkKind::Person) {
        ParkAction::Bark
    } else {
        ParkAction::MoveDown
    }
}

/// A blind dog running [`blind_dog_program`].
pub fn blind_dog<L: Position>() -> Thing<Park<L>> {
    Thing::agent(ParkKind::BlindDog, Agent::new(blind_dog_program))
}

/// Some food.
pub fn food<L: Position>() -> Thing<Park<L>> {
    Thing::new(ParkKind::Food)
}

/// Some water.
pub fn water<L: Position>() -> Thing<Park<L>> {
    Thing::new(ParkKind::Water)
}

/// A tree.
pub fn tree<L: Position>() -> Thing<Park<L>> {
    Thing::new(ParkKind::Tree)
}

/// A person, optionally with a name.
pub fn person<L: Position>(name: Option<&str>) -> Thing<Park<L>> {
    match name {
        Some(name) => Thing::named(ParkKind::Person, name),
        None => Thing::new(ParkKind::Person),
    }
}
