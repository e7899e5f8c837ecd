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

use enumset::EnumSetType;
use serde::{Deserialize, Serialize};

/// Stackable secondary roles/flags orthogonal to a player's main role, per
/// the Glossary's "Secondary role" entry and §3's Player State description.
///
/// Scalar per-flag data that doesn't fit a boolean (lover partner id, vote
/// multiplier, wild-child model id, ...) lives alongside this set on
/// [crate::player_states::player_state::PlayerState] rather than in the flag
/// itself, matching §3's "set of active secondary flags" / "scalar data"
/// split.
#[derive(Debug, Hash, EnumSetType, Serialize, Deserialize)]
pub enum SecondaryFlag {
    Sheriff,
    Lover,
    Charmed,
    Infected,
    ProtectedThisNight,
    TempWerewolf,
    Muted,
    Transformed,
    LynchingImmunityUsed,
    HasUsedHealPotion,
    HasUsedPoisonPotion,
    HasUsedHunterShot,
}
