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

use crate::core::primitives::{EventCardId, RoleId};

/// Recognized configuration options at session construction, per §6.
pub struct SessionConfig {
    /// Non-empty, unique, at least 5 entries, in seating order.
    pub player_names: Vec<String>,
    /// Multiset of role identifiers; total count must equal
    /// `player_count + extras(roles_in_play)`.
    pub roles_in_play: Vec<RoleId>,
    /// Optional ordered event-card deck.
    pub event_deck: Vec<EventCardId>,
}

impl SessionConfig {
    pub fn new(player_names: Vec<String>, roles_in_play: Vec<RoleId>) -> Self {
        Self { player_names, roles_in_play, event_deck: vec![] }
    }

    pub fn with_event_deck(mut self, deck: Vec<EventCardId>) -> Self {
        self.event_deck = deck;
        self
    }

    /// Validates the configuration per §6: at least 5 unique player names,
    /// and a role count consistent with the player count.
    pub fn validate(&self) -> Result<(), String> {
        if self.player_names.len() < 5 {
            return Err(format!(
                "at least 5 players are required, found {}",
                self.player_names.len()
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for name in &self.player_names {
            if !seen.insert(name) {
                return Err(format!("duplicate player name {name:?}"));
            }
        }
        // §6 also allows role-specific extras (Thief +2, Actor +3); those
        // roles aren't part of this build's catalog (SPEC_FULL.md's
        // supplemented features list the four roles that are), so the
        // count is checked for exact equality rather than accounting for
        // extras that can never appear in `roles_in_play` here.
        if self.roles_in_play.len() != self.player_names.len() {
            return Err(format!(
                "expected {} roles for {} players, found {}",
                self.player_names.len(),
                self.player_names.len(),
                self.roles_in_play.len()
            ));
        }
        Ok(())
    }
}
