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

/// Turn number for an ongoing session.
///
/// Zero before the first Night is entered. Invariant 2: once the first Night
/// phase is entered this is always >= 1, and it only ever increases.
#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TurnNumber(pub u32);

impl TurnNumber {
    pub const NOT_STARTED: TurnNumber = TurnNumber(0);

    pub fn next(self) -> TurnNumber {
        TurnNumber(self.0 + 1)
    }
}

/// Default vote weight for a player without the Sheriff secondary role.
pub const DEFAULT_VOTE_MULTIPLIER: u32 = 1;

/// Vote weight granted to the Sheriff.
pub const SHERIFF_VOTE_MULTIPLIER: u32 = 2;
