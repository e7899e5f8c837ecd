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
use slotmap::new_key_type;
use uuid::Uuid;

new_key_type! {
    /// Identifies a single player within a session. Stable for the lifetime of
    /// the session; identity is immutable even as the player's state changes.
    pub struct PlayerId;
}

/// Identifies a struct that is 1:1 associated with a given [PlayerId].
pub trait HasPlayerId {
    fn player_id(&self) -> PlayerId;
}

impl HasPlayerId for PlayerId {
    fn player_id(&self) -> PlayerId {
        *self
    }
}

/// Opaque unique identifier for a session, per §3.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifies an event card in the optional event deck (§6 Configuration).
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize)]
pub struct EventCardId(pub &'static str);

impl<'de> Deserialize<'de> for EventCardId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(EventCardId(crate::core::leak_str(String::deserialize(deserializer)?)))
    }
}

/// A role a player may be assigned.
///
/// The engine hosts role implementations rather than enumerating the full
/// rulebook catalog (§1 Non-goals); this is the fixed set of roles this
/// implementation ships with listeners for, per SPEC_FULL.md's supplemented
/// features, plus the catch-all [RoleId::SimpleVillager] which has no
/// listener at all.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, enum_iterator::Sequence)]
pub enum RoleId {
    SimpleVillager,
    Werewolf,
    Seer,
    Hunter,
}

impl RoleId {
    /// The [RoleGroup] this role belongs to absent any transformation
    /// (Wolf-Hound alignment, infection, etc. are tracked as secondary state,
    /// not by changing this mapping).
    pub fn group(self) -> RoleGroup {
        match self {
            RoleId::SimpleVillager | RoleId::Seer | RoleId::Hunter => RoleGroup::Villagers,
            RoleId::Werewolf => RoleGroup::Werewolves,
        }
    }

    /// Number of players expected to hold this role, used by
    /// [crate::instructions::instruction::CountConstraint] when a night-role
    /// listener's first-night identification stage asks the moderator to name
    /// its holders.
    pub fn expected_holder_count(self, roles_in_play: &[RoleId]) -> usize {
        roles_in_play.iter().filter(|&&r| r == self).count()
    }
}

/// Partition of roles into teams, per the Glossary.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum RoleGroup {
    Villagers,
    Werewolves,
    Ambiguous,
    Loners,
    NewMoon,
}

/// The winning side of a completed session.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Team {
    Villagers,
    Werewolves,
}

/// Why a player was eliminated; carried on [crate::log::log_entry::LogEntry::PlayerEliminated].
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum EliminationReason {
    WerewolfAttack,
    DayVote,
    HunterShot,
    LoverHeartbreak,
    WitchPoison,
}
