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

//! The Environment engine and the Policy that makes it a particular world.

use std::fmt::{Debug, Display};

use slotmap::SlotMap;
use tracing::{debug, info, trace, warn};

use crate::agent::Agent;
use crate::error::EnvironmentError;
use crate::thing::{Sighting, Thing, ThingKey};
use crate::Location;

/// A Policy is what makes an Environment a particular world. It defines what an agent perceives,
/// what each action does, and when the world is done. The Environment engine does the rest:
/// bookkeeping of things and agents, and the step loop.
///
/// `percept` and `execute_action` have no defaults. Every world must say what its agents see and
/// what their actions do.
pub trait Policy: Sized {
    /// Tag telling what a Thing is, e.g. food or a person.
    type Kind: Clone + PartialEq + Debug + Display;

    /// Coordinate type.
    type Location: Location;

    /// Action chosen by agent programs.
    type Action: Clone + PartialEq + Debug + Display;

    /// What an agent perceives.
    type Percept;

    /// Record of an effect applied to the world.
    type Event: Clone + Debug;

    /// Return the percept that the agent sees at this point.
    fn percept(&self, things: &Things<Self>, agent: ThingKey) -> Self::Percept;

    /// Change the world to reflect this action. Also update the agent's performance.
    fn execute_action(
        &mut self,
        things: &mut Things<Self>,
        agent: ThingKey,
        action: &Self::Action,
    ) -> Vec<Self::Event>;

    /// Location to place a new thing with unspecified location.
    fn default_location(&self, _thing: &Thing<Self>) -> Option<Self::Location> {
        None
    }

    /// If there is spontaneous change in the world, override this.
    fn exogenous_change(&mut self, _things: &mut Things<Self>) -> Vec<Self::Event> {
        Vec::new()
    }

    /// By default, we're done when we can't find a live agent.
    fn is_done(&self, things: &Things<Self>) -> bool {
        !things.agents().any(|(_, agent)| agent.is_alive())
    }
}

/// The things of an Environment, in insertion order, with the agents as a subset.
///
/// Every Thing ever created lives in an arena and keeps its key for the life of the Environment.
/// Only the things that were added (and not since deleted) are in the world. A deleted Thing can
/// still be looked up with [`Things::get`] and can be added again.
pub struct Things<P: Policy> {
    arena: SlotMap<ThingKey, Thing<P>>,
    things: Vec<ThingKey>,
    agents: Vec<ThingKey>,
}

impl<P: Policy> Default for Things<P> {
    fn default() -> Self {
        Self {
            arena: SlotMap::with_key(),
            things: Vec::new(),
            agents: Vec::new(),
        }
    }
}

impl<P: Policy> Things<P> {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a Thing in the arena. It is not in the world until it is added.
    pub fn create(&mut self, thing: Thing<P>) -> ThingKey {
        self.arena.insert(thing)
    }

    /// Add a Thing to the world at `location`. Agents get their performance reset.
    pub fn add(
        &mut self,
        key: ThingKey,
        location: Option<P::Location>,
    ) -> Result<(), EnvironmentError> {
        let Some(thing) = self.arena.get_mut(key) else {
            warn!(?key, "can't add a thing that was never created");
            return Err(EnvironmentError::ThingNotFound(key));
        };
        if self.things.contains(&key) {
            warn!(thing = %thing, "can't add the same thing twice");
            return Err(EnvironmentError::DuplicateThing(key));
        }
        thing.location = location;
        self.things.push(key);
        if let Some(agent) = thing.as_agent_mut() {
            agent.performance = 0;
            self.agents.push(key);
        }
        Ok(())
    }

    /// Remove a Thing from the world. It stays in the arena.
    pub fn delete(&mut self, key: ThingKey) -> Result<(), EnvironmentError> {
        let Some(index) = self.things.iter().position(|k| *k == key) else {
            warn!(
                ?key,
                location = ?self.location(key),
                remaining = self.things.len(),
                "thing to be removed is not in the environment"
            );
            return Err(EnvironmentError::ThingNotFound(key));
        };
        self.things.remove(index);
        self.agents.retain(|k| *k != key);
        Ok(())
    }

    /// Whether the Thing is currently in the world.
    pub fn contains(&self, key: ThingKey) -> bool {
        self.things.contains(&key)
    }

    /// Look up a Thing, whether or not it is currently in the world.
    pub fn get(&self, key: ThingKey) -> Option<&Thing<P>> {
        self.arena.get(key)
    }

    /// Mutable look up, whether or not the Thing is currently in the world.
    pub fn get_mut(&mut self, key: ThingKey) -> Option<&mut Thing<P>> {
        self.arena.get_mut(key)
    }

    /// The agent capability of a Thing.
    pub fn agent(&self, key: ThingKey) -> Option<&Agent<P>> {
        self.arena.get(key).and_then(Thing::as_agent)
    }

    /// The mutable agent capability of a Thing.
    pub fn agent_mut(&mut self, key: ThingKey) -> Option<&mut Agent<P>> {
        self.arena.get_mut(key).and_then(Thing::as_agent_mut)
    }

    /// Location of a Thing.
    pub fn location(&self, key: ThingKey) -> Option<&P::Location> {
        self.arena.get(key).and_then(|thing| thing.location.as_ref())
    }

    /// Keys of the things in the world, in insertion order.
    pub fn keys(&self) -> &[ThingKey] {
        &self.things
    }

    /// Keys of the agents in the world, in insertion order.
    pub fn agent_keys(&self) -> &[ThingKey] {
        &self.agents
    }

    /// Things in the world, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (ThingKey, &Thing<P>)> + '_ {
        self.things.iter().map(|key| (*key, &self.arena[*key]))
    }

    /// Agents in the world, in insertion order.
    pub fn agents(&self) -> impl Iterator<Item = (ThingKey, &Thing<P>)> + '_ {
        self.agents.iter().map(|key| (*key, &self.arena[*key]))
    }

    /// Number of things in the world.
    pub fn len(&self) -> usize {
        self.things.len()
    }

    /// Whether the world is empty.
    pub fn is_empty(&self) -> bool {
        self.things.is_empty()
    }

    /// Return all things exactly at a given location that pass `filter`, in insertion order.
    pub fn list_things_at<F>(&self, location: &P::Location, filter: F) -> Vec<ThingKey>
    where
        F: Fn(&Thing<P>) -> bool,
    {
        self.iter()
            .filter(|(_, thing)| thing.location.as_ref() == Some(location) && filter(thing))
            .map(|(key, _)| key)
            .collect()
    }

    /// Return all things exactly at a given location.
    pub fn things_at(&self, location: &P::Location) -> Vec<ThingKey> {
        self.list_things_at(location, |_| true)
    }

    /// Return true if at least one of the things at location passes `filter`.
    pub fn some_things_at<F>(&self, location: &P::Location, filter: F) -> bool
    where
        F: Fn(&Thing<P>) -> bool,
    {
        self.iter()
            .any(|(_, thing)| thing.location.as_ref() == Some(location) && filter(thing))
    }

    /// What an observer at `location` sees.
    pub fn sightings_at(&self, location: &P::Location) -> Vec<Sighting<P::Kind>> {
        self.iter()
            .filter(|(_, thing)| thing.location.as_ref() == Some(location))
            .map(|(key, thing)| thing.sighting(key))
            .collect()
    }
}

/// An Environment runs one or more agents in discrete time steps.
///
/// It keeps the list of things and the list of agents (which is a subset of things), asks every
/// live agent for an action and then applies the actions. Each agent has a performance measure
/// that the Policy updates.
///
/// Events are kept in a journal that grows with every step until it is drained with
/// [`Environment::take_events`]. Long runs that consume events as they happen can turn it off
/// with [`Environment::set_journal`].
pub struct Environment<P: Policy> {
    things: Things<P>,
    policy: P,
    time: usize,
    journal: bool,
    events: Vec<P::Event>,
}

impl<P: Policy> Environment<P> {
    /// Create an empty Environment governed by `policy`.
    pub fn new(policy: P) -> Self {
        Self {
            things: Things::new(),
            policy,
            time: 0,
            journal: true,
            events: Vec::new(),
        }
    }

    /// Turn the event journal on or off. It is on by default. Turning it off does not clear
    /// events already recorded.
    pub fn set_journal(&mut self, enabled: bool) {
        self.journal = enabled;
    }

    /// The Policy.
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// All things, including the arena of things no longer in the world.
    pub fn things(&self) -> &Things<P> {
        &self.things
    }

    /// Look up a Thing, whether or not it is currently in the world.
    pub fn thing(&self, key: ThingKey) -> Option<&Thing<P>> {
        self.things.get(key)
    }

    /// Mutable look up of a Thing.
    pub fn thing_mut(&mut self, key: ThingKey) -> Option<&mut Thing<P>> {
        self.things.get_mut(key)
    }

    /// The agent capability of a Thing.
    pub fn agent(&self, key: ThingKey) -> Option<&Agent<P>> {
        self.things.agent(key)
    }

    /// Whether the Thing is currently in the world.
    pub fn contains(&self, key: ThingKey) -> bool {
        self.things.contains(key)
    }

    /// Number of things in the world.
    pub fn len(&self) -> usize {
        self.things.len()
    }

    /// Whether the world is empty.
    pub fn is_empty(&self) -> bool {
        self.things.is_empty()
    }

    /// Number of steps run so far.
    pub fn time(&self) -> usize {
        self.time
    }

    /// Every event so far, oldest first.
    pub fn events(&self) -> &[P::Event] {
        &self.events
    }

    /// Take the events recorded so far, leaving the journal empty.
    pub fn take_events(&mut self) -> Vec<P::Event> {
        std::mem::take(&mut self.events)
    }

    /// Create a Thing without putting it in the world.
    pub fn create_thing(&mut self, thing: Thing<P>) -> ThingKey {
        self.things.create(thing)
    }

    /// Add a Thing to the Environment, setting its location. If no location is given the Policy
    /// picks a default.
    pub fn add_thing(
        &mut self,
        key: ThingKey,
        location: Option<P::Location>,
    ) -> Result<(), EnvironmentError> {
        let location = match location {
            Some(location) => Some(location),
            None => self
                .things
                .get(key)
                .and_then(|thing| self.policy.default_location(thing)),
        };
        self.things.add(key, location)
    }

    /// Create a Thing and add it to the Environment.
    pub fn spawn(&mut self, thing: Thing<P>, location: Option<P::Location>) -> ThingKey {
        let key = self.create_thing(thing);
        // a freshly created key can be neither missing nor a duplicate
        let _ = self.add_thing(key, location);
        key
    }

    /// Remove a Thing from the Environment.
    pub fn delete_thing(&mut self, key: ThingKey) -> Result<(), EnvironmentError> {
        self.things.delete(key)
    }

    /// Return all things exactly at a given location that pass `filter`.
    pub fn list_things_at<F>(&self, location: &P::Location, filter: F) -> Vec<ThingKey>
    where
        F: Fn(&Thing<P>) -> bool,
    {
        self.things.list_things_at(location, filter)
    }

    /// Return all things exactly at a given location.
    pub fn things_at(&self, location: &P::Location) -> Vec<ThingKey> {
        self.things.things_at(location)
    }

    /// Return true if at least one of the things at location passes `filter`.
    pub fn some_things_at<F>(&self, location: &P::Location, filter: F) -> bool
    where
        F: Fn(&Thing<P>) -> bool,
    {
        self.things.some_things_at(location, filter)
    }

    /// Return the percept that the agent sees at this point.
    pub fn percept(&self, agent: ThingKey) -> P::Percept {
        self.policy.percept(&self.things, agent)
    }

    /// Change the world to reflect this action.
    pub fn execute_action(&mut self, agent: ThingKey, action: &P::Action) -> Vec<P::Event> {
        self.policy.execute_action(&mut self.things, agent, action)
    }

    /// Apply spontaneous change to the world.
    pub fn exogenous_change(&mut self) -> Vec<P::Event> {
        self.policy.exogenous_change(&mut self.things)
    }

    /// Whether the simulation is over.
    pub fn is_done(&self) -> bool {
        self.policy.is_done(&self.things)
    }

    /// Run the Environment for one time step.
    ///
    /// Every live agent decides on an action from its percept first. Only then are the actions
    /// applied, in agent order, so that no agent perceives the effects of another agent's action
    /// from the same step. Dead agents do nothing. Returns the events of this step.
    pub fn step(&mut self) -> Vec<P::Event> {
        if self.is_done() {
            return Vec::new();
        }

        let actions: Vec<(ThingKey, Option<P::Action>)> = self
            .things
            .agents()
            .map(|(key, thing)| {
                let action = match thing.as_agent() {
                    Some(agent) if thing.is_alive() => Some(agent.decide(&self.percept(key))),
                    _ => None,
                };
                (key, action)
            })
            .collect();

        let mut events = Vec::new();
        for (key, action) in actions {
            let Some(action) = action else {
                trace!(time = self.time, ?key, "no-op for dead agent");
                continue;
            };
            let still_acting = self.things.contains(key)
                && self.things.get(key).map_or(false, Thing::is_alive);
            if !still_acting {
                debug!(time = self.time, ?key, %action, "agent left or died before acting");
                continue;
            }
            debug!(time = self.time, ?key, %action, "executing action");
            events.extend(self.execute_action(key, &action));
        }
        events.extend(self.exogenous_change());

        self.time += 1;
        if self.journal {
            self.events.extend(events.iter().cloned());
        }
        events
    }

    /// Run the Environment for at most `steps` time steps, stopping early once it is done.
    /// Returns the number of steps that were run.
    pub fn run(&mut self, steps: usize) -> usize {
        self.run_with(steps, |_| {})
    }

    /// Like [`Environment::run`], handing the events of every step to `on_step` as it finishes.
    pub fn run_with<F>(&mut self, steps: usize, mut on_step: F) -> usize
    where
        F: FnMut(&[P::Event]),
    {
        let mut ran = 0;
        while ran < steps && !self.is_done() {
            on_step(&self.step());
            ran += 1;
        }
        info!(steps = ran, budget = steps, done = self.is_done(), "run finished");
        ran
    }
}
