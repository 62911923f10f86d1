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

//! Error types.

use crate::thing::ThingKey;

/// An agent could not be built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    /// No program was supplied for the agent.
    #[error("can't find a valid program for {agent}")]
    MissingProgram {
        /// Label of the agent that was being built.
        agent: String,
    },
}

/// A structural operation on an Environment could not be carried out. These are recoverable:
/// the operation is a no-op and the simulation can continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EnvironmentError {
    /// The thing is already in the environment.
    #[error("can't add the same thing twice: {0:?}")]
    DuplicateThing(ThingKey),

    /// The thing is not in the environment.
    #[error("thing not found: {0:?}")]
    ThingNotFound(ThingKey),
}

/// A textual action label could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseActionError {
    /// The label is not in the action table.
    #[error("unrecognized action: {0:?}")]
    Unrecognized(String),
}
