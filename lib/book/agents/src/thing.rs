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

//! Things: anything that can be placed in an Environment.

use std::fmt::{Debug, Display};

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

use crate::agent::Agent;
use crate::environment::Policy;

new_key_type! {
    /// Identity of a Thing. Keys are handed out by the Environment that the Thing was created
    /// in, and two Things are the same Thing only if their keys are equal.
    pub struct ThingKey;
}

/// Thing represents any physical object that can appear in an Environment: food, a tree, a
/// person, or an agent.
///
/// A Thing is a plain record. What kind of thing it is comes from the Policy's `Kind`, and a
/// Thing is an agent exactly when it carries an [`Agent`].
pub struct Thing<P: Policy> {
    name: Option<String>,
    kind: P::Kind,

    /// Where the Thing is. Things outside of any Environment may have no location.
    pub location: Option<P::Location>,

    /// Liveness flag. Only things that are explicitly alive are alive.
    pub alive: Option<bool>,

    agent: Option<Agent<P>>,
}

impl<P: Policy> Thing<P> {
    /// Create an unnamed, inanimate Thing of the given kind.
    pub fn new(kind: P::Kind) -> Self {
        Self {
            name: None,
            kind,
            location: None,
            alive: None,
            agent: None,
        }
    }

    /// Create an inanimate Thing with a display name.
    pub fn named(kind: P::Kind, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new(kind)
        }
    }

    /// Create an agent. Agents start off alive.
    pub fn agent(kind: P::Kind, agent: Agent<P>) -> Self {
        Self {
            alive: Some(true),
            agent: Some(agent),
            ..Self::new(kind)
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Display name, if one was given.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Kind of the Thing.
    pub fn kind(&self) -> &P::Kind {
        &self.kind
    }

    /// Human-readable label: the name if there is one, otherwise the kind.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self.kind.to_string(),
        }
    }

    /// Things that are alive return true.
    pub fn is_alive(&self) -> bool {
        self.alive == Some(true)
    }

    /// Whether the Thing is driven by an agent program.
    pub fn is_agent(&self) -> bool {
        self.agent.is_some()
    }

    /// The agent capability, if this Thing is an agent.
    pub fn as_agent(&self) -> Option<&Agent<P>> {
        self.agent.as_ref()
    }

    /// Mutable agent capability, if this Thing is an agent.
    pub fn as_agent_mut(&mut self) -> Option<&mut Agent<P>> {
        self.agent.as_mut()
    }

    /// What an observer sees of this Thing.
    pub fn sighting(&self, key: ThingKey) -> Sighting<P::Kind> {
        Sighting {
            key,
            kind: self.kind.clone(),
            name: self.name.clone(),
        }
    }
}

impl<P: Policy> Debug for Thing<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Thing")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("location", &self.location)
            .field("alive", &self.alive)
            .field("agent", &self.agent)
            .finish()
    }
}

// <Food>, <Vincent>
impl<P: Policy> Display for Thing<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{}>", self.label())
    }
}

/// A read-only snapshot of one Thing as perceived by an agent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sighting<K> {
    /// The Thing that was seen.
    pub key: ThingKey,

    /// Its kind.
    pub kind: K,

    /// Its name, if it has one.
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::park::{blind_dog, ParkKind};
    use crate::Environment;

    type ParkThing = Thing<crate::park::Park<i32>>;

    #[test]
    fn test_inanimate_things_are_not_alive() {
        let food = ParkThing::new(ParkKind::Food);
        assert!(!food.is_alive());
        assert!(!food.is_agent());
        assert_eq!(food.location, None);
    }

    #[test]
    fn test_agents_start_alive() {
        let dog: ParkThing = blind_dog();
        assert!(dog.is_alive());
        assert!(dog.is_agent());
    }

    #[test]
    fn test_explicitly_dead_thing_is_not_alive() {
        let mut dog: ParkThing = blind_dog();
        dog.alive = Some(false);
        assert!(!dog.is_alive());
    }

    #[test]
    fn test_person_can_be_named() {
        let person = ParkThing::named(ParkKind::Person, "Justin Trudeau");
        assert_eq!(person.name(), Some("Justin Trudeau"));
        assert_eq!(person.label(), "Justin Trudeau");
        assert_eq!(format!("{}", person), "<Justin Trudeau>");
    }

    #[test]
    fn test_unnamed_thing_is_labelled_by_kind() {
        let water = ParkThing::new(ParkKind::Water);
        assert_eq!(format!("{}", water), "<Water>");
        let dog: ParkThing = blind_dog();
        assert_eq!(dog.label(), "BlindDog");
    }

    #[test]
    fn test_sighting_copies_kind_and_name() {
        let mut env = Environment::new(crate::park::Park::<i32>::new());
        let person = env.create_thing(ParkThing::named(ParkKind::Person, "Ngan"));
        let sighting = env.thing(person).unwrap().sighting(person);
        assert_eq!(sighting.key, person);
        assert_eq!(sighting.kind, ParkKind::Person);
        assert_eq!(sighting.name.as_deref(), Some("Ngan"));
    }
}
