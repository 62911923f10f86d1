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

//! Agents and Environments.
//!
//! See:
//! -  Chapter 2: Intelligent Agents, page 34
//!
//! An [`Environment`] owns every [`Thing`] in the world, computes what each agent perceives,
//! applies the actions the agents choose and decides when the simulation is over. The parts that
//! differ between worlds (what a percept is, what an action does, when the world is done) are
//! supplied by a [`Policy`], so one engine runs many worlds.
//!
//! An agent only ever sees its percept. Its program is a plain function from percept to action
//! and has no access to the environment, see [`Agent`].

pub mod agent;
pub mod environment;
pub mod error;
pub mod park;
pub mod thing;

pub use agent::{Agent, AgentBuilder, Program};
pub use environment::{Environment, Policy, Things};
pub use error::{ConfigurationError, EnvironmentError, ParseActionError};
pub use thing::{Sighting, Thing, ThingKey};

/// Integer type used for performance measures.
pub type Int = i32;

/// Hash set used for small collections of keys.
pub type HashSet<T> = rustc_hash::FxHashSet<T>;

/// A coordinate in some Environment. Coordinates are only ever compared for equality, so
/// composite coordinates such as `(i32, i32)` compare element-wise.
pub trait Location: Clone + PartialEq + std::fmt::Debug {}

impl<T> Location for T where T: Clone + PartialEq + std::fmt::Debug {}
