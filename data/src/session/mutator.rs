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

use crate::core::numerics::TurnNumber;
use crate::core::primitives::{EventCardId, PlayerId, RoleGroup, RoleId, Team};
use crate::core::secondary_flag::SecondaryFlag;
use crate::player_states::player_state::Health;

/// The narrow interface a [crate::log::log_entry::LogEntry] uses to mutate
/// session state.
///
/// This is "the mutator's narrow interface" of §4.1: every method here
/// corresponds to exactly one kind of state change, and the only
/// implementation in this codebase is the one-shot proxy constructed inside
/// `kernel::Session::register_log_entry`. No `LogEntry::apply` implementation
/// can reach a field that isn't named by one of these methods.
pub trait SessionMutator {
    /// Creates the players named in `player_names`, in seating order, and
    /// records `roles_in_play` and the optional `event_deck`. Only ever
    /// called once, by `LogEntry::GameStarted`.
    fn initialize_game(
        &mut self,
        player_names: Vec<String>,
        roles_in_play: Vec<RoleId>,
        event_deck: Vec<EventCardId>,
    );

    fn set_turn_number(&mut self, turn: TurnNumber);

    /// No-op if `player` already has an assigned role other than via a
    /// Devoted Servant swap (invariant 5 — enforced by the `rules` layer
    /// before the entry is constructed, not here).
    fn set_player_role(&mut self, player: PlayerId, role: RoleId);

    /// No-op if `player` is already `Dead` (invariant 6).
    fn set_player_health(&mut self, player: PlayerId, health: Health);

    fn apply_status_effect(&mut self, player: PlayerId, flag: SecondaryFlag);

    fn clear_status_effect(&mut self, player: PlayerId, flag: SecondaryFlag);

    /// Links two players as lovers (Cupid). Symmetric: both players' lover
    /// partner field is set and both receive the `Lover` flag.
    fn link_lovers(&mut self, a: PlayerId, b: PlayerId);

    fn set_vote_multiplier(&mut self, player: PlayerId, multiplier: u32);

    fn set_wild_child_model(&mut self, player: PlayerId, model: PlayerId);

    fn increment_werewolf_attacks(&mut self, player: PlayerId);

    fn set_wolf_hound_alignment(&mut self, player: PlayerId, group: RoleGroup);

    /// Devoted Servant swap: `servant` takes on `source`'s already-known
    /// role.
    fn swap_role(&mut self, servant: PlayerId, source: PlayerId);

    fn set_current_event_card(&mut self, card: Option<EventCardId>);

    fn set_winner(&mut self, team: Team);
}
