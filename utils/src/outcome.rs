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

use color_eyre::Report;

/// Wraps a fatal, engine-internal programmer error: an illegal phase
/// transition, an unknown paused listener, a stage re-entered while its
/// mutex is held by another stage, or any other violation of an invariant
/// the type system could not enforce.
///
/// Per the rulebook's error taxonomy, these are never recoverable — the
/// caller must treat the session as corrupt once one escapes `process`.
#[derive(Debug)]
#[must_use]
pub struct Fatal(pub Report);

impl fmt::Display for Fatal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for Fatal {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

/// Result of some internal mutation that can only fail with a [Fatal]
/// programmer error. Recoverable, moderator-facing failures never flow
/// through this type; see `data::error::EngineError`.
pub type Outcome = Result<(), Fatal>;

/// Equivalent alias to [Outcome] which wraps a returned value.
pub type Value<T> = Result<T, Fatal>;

/// Mutation completed successfully, execution can continue.
pub const OK: Outcome = Ok(());
