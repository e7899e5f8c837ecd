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

use enumset::EnumSet;
use serde::{Deserialize, Serialize};

use crate::core::numerics::DEFAULT_VOTE_MULTIPLIER;
use crate::core::primitives::{HasPlayerId, PlayerId, RoleGroup, RoleId};
use crate::core::secondary_flag::SecondaryFlag;

/// A player's health. Becomes [Health::Dead] at most once (invariant 6).
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Health {
    Alive,
    Dead,
}

/// Mutable state for a single player.
///
/// Identity ([PlayerState::id], [PlayerState::name]) is immutable for the
/// life of the session; every other field is mutable only through the
/// kernel's proxy mutator (see `session::mutator::SessionMutator`), never
/// directly, even from within this crate — see
/// `session::kernel::Session` for the privacy boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    id: PlayerId,
    name: String,
    health: Health,
    role: Option<RoleId>,
    flags: EnumSet<SecondaryFlag>,
    lover_partner: Option<PlayerId>,
    vote_multiplier: u32,
    wild_child_model: Option<PlayerId>,
    times_attacked_by_werewolves: u32,
    wolf_hound_alignment: Option<RoleGroup>,
}

impl PlayerState {
    pub(crate) fn new(id: PlayerId, name: String) -> Self {
        Self {
            id,
            name,
            health: Health::Alive,
            role: None,
            flags: EnumSet::empty(),
            lover_partner: None,
            vote_multiplier: DEFAULT_VOTE_MULTIPLIER,
            wild_child_model: None,
            times_attacked_by_werewolves: 0,
            wolf_hound_alignment: None,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn health(&self) -> Health {
        self.health
    }

    pub fn is_alive(&self) -> bool {
        self.health == Health::Alive
    }

    pub fn role(&self) -> Option<RoleId> {
        self.role
    }

    /// Effective team for victory-counting purposes: a player's known role
    /// group, widened to Werewolves if they carry the Infected flag,
    /// regardless of their assigned role (§4.9).
    pub fn effective_group(&self) -> Option<RoleGroup> {
        if self.flags.contains(SecondaryFlag::Infected) {
            return Some(RoleGroup::Werewolves);
        }
        self.role.map(RoleId::group)
    }

    pub fn has_flag(&self, flag: SecondaryFlag) -> bool {
        self.flags.contains(flag)
    }

    pub fn flags(&self) -> EnumSet<SecondaryFlag> {
        self.flags
    }

    pub fn lover_partner(&self) -> Option<PlayerId> {
        self.lover_partner
    }

    pub fn vote_multiplier(&self) -> u32 {
        self.vote_multiplier
    }

    pub fn wild_child_model(&self) -> Option<PlayerId> {
        self.wild_child_model
    }

    pub fn times_attacked_by_werewolves(&self) -> u32 {
        self.times_attacked_by_werewolves
    }

    pub fn wolf_hound_alignment(&self) -> Option<RoleGroup> {
        self.wolf_hound_alignment
    }

    // The following setters are `pub(crate)`: only the mutator proxy defined
    // in `session::mutator`, which lives in this crate, may call them. No
    // other crate can see `PlayerState`'s fields or call these methods.

    pub(crate) fn set_health(&mut self, health: Health) {
        self.health = health;
    }

    pub(crate) fn set_role(&mut self, role: RoleId) {
        self.role = Some(role);
    }

    pub(crate) fn apply_flag(&mut self, flag: SecondaryFlag) {
        self.flags.insert(flag);
    }

    pub(crate) fn clear_flag(&mut self, flag: SecondaryFlag) {
        self.flags.remove(flag);
    }

    pub(crate) fn set_lover_partner(&mut self, partner: Option<PlayerId>) {
        self.lover_partner = partner;
    }

    pub(crate) fn set_vote_multiplier(&mut self, multiplier: u32) {
        self.vote_multiplier = multiplier;
    }

    pub(crate) fn set_wild_child_model(&mut self, model: Option<PlayerId>) {
        self.wild_child_model = model;
    }

    pub(crate) fn increment_werewolf_attacks(&mut self) {
        self.times_attacked_by_werewolves += 1;
    }

    pub(crate) fn set_wolf_hound_alignment(&mut self, group: Option<RoleGroup>) {
        self.wolf_hound_alignment = group;
    }
}

impl HasPlayerId for PlayerState {
    fn player_id(&self) -> PlayerId {
        self.id
    }
}
