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

//! Agents and their programs.

use std::fmt::Debug;

use crate::environment::Policy;
use crate::error::ConfigurationError;
use crate::thing::{Thing, ThingKey};
use crate::{HashSet, Int};

/// An agent program maps the current percept to an action. It sees nothing but the percept.
pub type Program<P> = Box<dyn Fn(&<P as Policy>::Percept) -> <P as Policy>::Action>;

type GrabPredicate<P> = Box<dyn Fn(&Thing<P>) -> bool>;

/// An Agent is the part of a Thing that acts. It has one required slot, the program, which takes
/// the percept and returns an action. What counts as a percept or action depends on the Policy of
/// the Environment the agent lives in.
///
/// The program is a slot and not a method so that it cannot "cheat" and look at the agent or the
/// environment. An agent program that needs a model of the world would have to build and maintain
/// its own model.
///
/// The Environment keeps the performance measure up to date.
pub struct Agent<P: Policy> {
    program: Program<P>,
    can_grab: Option<GrabPredicate<P>>,

    /// Performance measure of the agent in its Environment.
    pub performance: Int,

    /// Things the agent is holding.
    pub holding: HashSet<ThingKey>,
}

impl<P: Policy> Agent<P> {
    /// Create an agent driven by `program`.
    pub fn new<F>(program: F) -> Self
    where
        F: Fn(&P::Percept) -> P::Action + 'static,
    {
        Self {
            program: Box::new(program),
            can_grab: None,
            performance: 0,
            holding: HashSet::default(),
        }
    }

    /// Start building an agent Thing of the given kind.
    pub fn builder(kind: P::Kind) -> AgentBuilder<P> {
        AgentBuilder {
            kind,
            name: None,
            program: None,
            can_grab: None,
        }
    }

    /// Run the agent program on a percept.
    pub fn decide(&self, percept: &P::Percept) -> P::Action {
        (self.program)(percept)
    }

    /// Return true if this agent can grab this thing. False unless the agent was built with a
    /// grab predicate.
    pub fn can_grab(&self, thing: &Thing<P>) -> bool {
        match &self.can_grab {
            Some(can_grab) => can_grab(thing),
            None => false,
        }
    }
}

impl<P: Policy> Debug for Agent<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("performance", &self.performance)
            .field("holding", &self.holding)
            .finish_non_exhaustive()
    }
}

/// Builder for agent Things. Building fails if no program was given.
pub struct AgentBuilder<P: Policy> {
    kind: P::Kind,
    name: Option<String>,
    program: Option<Program<P>>,
    can_grab: Option<GrabPredicate<P>>,
}

impl<P: Policy> AgentBuilder<P> {
    /// Display name of the agent.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Agent program.
    pub fn program<F>(mut self, program: F) -> Self
    where
        F: Fn(&P::Percept) -> P::Action + 'static,
    {
        self.program = Some(Box::new(program));
        self
    }

    /// Which things the agent is able to grab.
    pub fn can_grab<F>(mut self, can_grab: F) -> Self
    where
        F: Fn(&Thing<P>) -> bool + 'static,
    {
        self.can_grab = Some(Box::new(can_grab));
        self
    }

    /// Build the agent Thing.
    pub fn build(self) -> Result<Thing<P>, ConfigurationError> {
        let program = match self.program {
            Some(program) => program,
            None => {
                let agent = self.name.unwrap_or_else(|| self.kind.to_string());
                return Err(ConfigurationError::MissingProgram { agent });
            }
        };
        let agent = Agent {
            program,
            can_grab: self.can_grab,
            performance: 0,
            holding: HashSet::default(),
        };
        let thing = Thing::agent(self.kind, agent);
        Ok(match self.name {
            Some(name) => thing.with_name(name),
            None => thing,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::park::{blind_dog_program, Park, ParkAction, ParkKind};
    use crate::thing::Sighting;

    type ParkAgent = Agent<Park<i32>>;

    #[test]
    fn test_agent_starts_with_zero_performance_and_empty_hands() {
        let agent = ParkAgent::new(blind_dog_program);
        assert_eq!(agent.performance, 0);
        assert!(agent.holding.is_empty());
    }

    #[test]
    fn test_builder_without_program_is_a_configuration_error() {
        let result = ParkAgent::builder(ParkKind::BlindDog).name("Rex").build();
        assert_eq!(
            result.unwrap_err(),
            ConfigurationError::MissingProgram {
                agent: "Rex".to_string()
            }
        );
    }

    #[test]
    fn test_builder_without_program_or_name_reports_kind() {
        let err = ParkAgent::builder(ParkKind::BlindDog).build().unwrap_err();
        assert_eq!(err.to_string(), "can't find a valid program for BlindDog");
    }

    #[test]
    fn test_builder_with_program_builds_live_agent() {
        let dog = ParkAgent::builder(ParkKind::BlindDog)
            .name("Rex")
            .program(|_percept| ParkAction::Bark)
            .build()
            .expect("build failed");
        assert!(dog.is_alive());
        assert_eq!(dog.name(), Some("Rex"));
        let agent = dog.as_agent().expect("not an agent");
        assert_eq!(agent.decide(&Vec::new()), ParkAction::Bark);
    }

    #[test]
    fn test_cannot_grab_by_default() {
        let agent = ParkAgent::new(blind_dog_program);
        let food = Thing::new(ParkKind::Food);
        assert!(!agent.can_grab(&food));
    }

    #[test]
    fn test_grab_predicate_overrides_default() {
        let dog = ParkAgent::builder(ParkKind::BlindDog)
            .program(blind_dog_program)
            .can_grab(|thing| *thing.kind() == ParkKind::Tree)
            .build()
            .expect("build failed");
        let agent = dog.as_agent().expect("not an agent");
        assert!(agent.can_grab(&Thing::new(ParkKind::Tree)));
        assert!(!agent.can_grab(&Thing::new(ParkKind::Food)));
    }

    #[test]
    fn test_program_only_sees_the_percept() {
        let agent = ParkAgent::new(blind_dog_program);
        let mut things = slotmap::SlotMap::<ThingKey, ()>::with_key();
        let percept = vec![Sighting {
            key: things.insert(()),
            kind: ParkKind::Water,
            name: None,
        }];
        assert_eq!(agent.decide(&percept), ParkAction::Drink);
    }
}
