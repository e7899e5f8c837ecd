// Copyright © moderator-assistant 2026-present
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//   https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt;

/// Recoverable errors surfaced to the host, per §7.
///
/// Every variant carries a stable `code()` for tests and UIs to match on; the
/// `Display` message is a developer-facing default, not the localized string
/// named in §6 (resolving that is the host's job, keyed on `code()`).
///
/// Fatal, engine-internal programmer errors (illegal transitions, unknown
/// paused listeners, ...) never appear here — they escape as
/// `utils::outcome::Fatal` and the caller must treat the session as corrupt.
#[derive(Debug, Clone)]
pub enum EngineError {
    /// The session id is unknown to this host.
    GameNotFound,
    /// The moderator's response doesn't match what the pending instruction
    /// allows: wrong variant, selection count out of range, an id or role
    /// outside the instruction's allowed set.
    InvalidInput { reason: String },
    /// The response is well-formed for the pending instruction but violates
    /// a role-level rule (werewolf targets a werewolf, a potion is reused,
    /// ...).
    RuleViolation { reason: String },
    /// A response was submitted when none was pending, or after game over.
    InvalidOperation { reason: String },
}

impl EngineError {
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::GameNotFound => "game_not_found",
            EngineError::InvalidInput { .. } => "invalid_input",
            EngineError::RuleViolation { .. } => "rule_violation",
            EngineError::InvalidOperation { .. } => "invalid_operation",
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::GameNotFound => write!(f, "no session with that id exists"),
            EngineError::InvalidInput { reason } => write!(f, "invalid input: {reason}"),
            EngineError::RuleViolation { reason } => write!(f, "rule violation: {reason}"),
            EngineError::InvalidOperation { reason } => write!(f, "invalid operation: {reason}"),
        }
    }
}

impl std::error::Error for EngineError {}

/// The full error channel threaded through the `rules` crate and returned
/// by the flow controller, distinguishing the two severities named in §7
/// rather than collapsing them into one type a caller might accidentally
/// treat uniformly.
#[derive(Debug)]
pub enum ProcessError {
    /// Host-facing, recoverable: the session's state is unchanged.
    Recoverable(EngineError),
    /// Internal programmer error. The caller must treat the session as
    /// corrupt.
    Fatal(utils::outcome::Fatal),
}

impl ProcessError {
    pub fn fatal(message: impl fmt::Display) -> Self {
        ProcessError::Fatal(utils::outcome::Fatal(color_eyre::eyre::eyre!(message.to_string())))
    }
}

impl From<EngineError> for ProcessError {
    fn from(error: EngineError) -> Self {
        ProcessError::Recoverable(error)
    }
}

impl From<utils::outcome::Fatal> for ProcessError {
    fn from(fatal: utils::outcome::Fatal) -> Self {
        ProcessError::Fatal(fatal)
    }
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessError::Recoverable(error) => write!(f, "{error}"),
            ProcessError::Fatal(fatal) => write!(f, "{fatal}"),
        }
    }
}

impl std::error::Error for ProcessError {}

/// Asserts `condition`, returning a fatal [ProcessError] naming `message` if
/// it does not hold. Used at the phase/stage/hook boundary for invariants
/// the type system cannot express (illegal transitions, corrupt cache tags).
pub fn verify_fatal(condition: bool, message: impl fmt::Display) -> Result<(), ProcessError> {
    if condition {
        Ok(())
    } else {
        Err(ProcessError::fatal(message))
    }
}

/// Result of an operation within the rules engine, which may fail with
/// either a host-facing [EngineError] or an internal [ProcessError::Fatal].
pub type EngineResult<T> = Result<T, ProcessError>;
