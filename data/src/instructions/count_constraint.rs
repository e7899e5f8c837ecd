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

use serde::{Deserialize, Serialize};

/// Bounds on the number of items a [crate::instructions::instruction::InstructionKind::SelectPlayers]
/// response may carry, per §4.4.
///
/// Empty selection is only legal when `min == 0`; by convention an empty set
/// reported for a day vote signifies a tie (the "Empty selection ⇔ tie" law,
/// §8).
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct CountConstraint {
    min: usize,
    max: Option<usize>,
}

impl CountConstraint {
    /// Exactly one selection required, no tie possible.
    pub const fn single() -> Self {
        Self { min: 1, max: Some(1) }
    }

    /// At most one selection; an empty response is a legal tie.
    pub const fn single_optional() -> Self {
        Self { min: 0, max: Some(1) }
    }

    /// Exactly `n` selections required.
    pub const fn exactly(n: usize) -> Self {
        Self { min: n, max: Some(n) }
    }

    /// Between `min` and `max` selections, inclusive.
    pub const fn range(min: usize, max: usize) -> Self {
        Self { min, max: Some(max) }
    }

    /// At least `min` selections, no upper bound.
    pub const fn unbounded(min: usize) -> Self {
        Self { min, max: None }
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> Option<usize> {
        self.max
    }

    pub fn allows(&self, count: usize) -> bool {
        count >= self.min && self.max.map_or(true, |max| count <= max)
    }
}
