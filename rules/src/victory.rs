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

use data::core::primitives::{RoleGroup, Team};
use data::session::kernel::Session;

/// Checks the two victory predicates of §4.9 against the session's current,
/// already-resolved state: Villagers win once no werewolf remains alive and
/// at least one villager does; Werewolves win once their living count is
/// positive and at least the living non-werewolf count. A simultaneous
/// double-kill that empties both sides (e.g. the last werewolf and the last
/// villager are Lovers and die of heartbreak together) grants neither team a
/// win. Counts use [PlayerState::effective_group]; a living player whose
/// role the engine has never been told (an ordinary villager who hasn't
/// died or acted) defaults to the Villagers side rather than being dropped
/// from the count, since the zero-leakage invariant (§4.1) means the engine
/// is never told who they are until they die or self-identify, and no role
/// in this implementation's catalog belongs to any other faction.
pub fn check_victory(session: &Session) -> Option<Team> {
    let (mut werewolves, mut villagers) = (0u32, 0u32);
    for player in session.players() {
        if !player.is_alive() {
            continue;
        }
        match player.effective_group().unwrap_or(RoleGroup::Villagers) {
            RoleGroup::Werewolves => werewolves += 1,
            _ => villagers += 1,
        }
    }

    if werewolves == 0 && villagers > 0 {
        return Some(Team::Villagers);
    }
    if werewolves > 0 && werewolves >= villagers {
        return Some(Team::Werewolves);
    }
    None
}

#[cfg(test)]
mod tests {
    use data::core::primitives::{EliminationReason, RoleId};
    use data::session::config::SessionConfig;

    use super::*;

    fn session_with(roles: &[RoleId]) -> Session {
        let names: Vec<String> = (0..roles.len()).map(|i| format!("p{i}")).collect();
        Session::new(SessionConfig::new(names, roles.to_vec())).unwrap()
    }

    #[test]
    fn no_victory_mid_game() {
        let mut session =
            session_with(&[RoleId::Werewolf, RoleId::Seer, RoleId::SimpleVillager, RoleId::SimpleVillager, RoleId::SimpleVillager]);
        let ids = session.seating_order().to_vec();
        for (id, role) in ids.iter().zip(
            [RoleId::Werewolf, RoleId::Seer, RoleId::SimpleVillager, RoleId::SimpleVillager, RoleId::SimpleVillager],
        ) {
            session.assign_role(*id, role).unwrap();
        }
        assert!(check_victory(&session).is_none());
    }

    #[test]
    fn villagers_win_once_werewolves_are_gone() {
        let mut session =
            session_with(&[RoleId::Werewolf, RoleId::Seer, RoleId::SimpleVillager, RoleId::SimpleVillager, RoleId::SimpleVillager]);
        let wolf = session.seating_order()[0];
        session.assign_role(wolf, RoleId::Werewolf).unwrap();
        session.eliminate_player(wolf, EliminationReason::DayVote).unwrap();
        assert_eq!(check_victory(&session), Some(Team::Villagers));
    }

    #[test]
    fn werewolves_win_once_they_equal_the_village() {
        let mut session = session_with(&[
            RoleId::Werewolf,
            RoleId::Werewolf,
            RoleId::Seer,
            RoleId::SimpleVillager,
            RoleId::SimpleVillager,
        ]);
        let ids = session.seating_order().to_vec();
        session.assign_role(ids[0], RoleId::Werewolf).unwrap();
        session.assign_role(ids[1], RoleId::Werewolf).unwrap();
        session.assign_role(ids[2], RoleId::Seer).unwrap();
        session.eliminate_player(ids[2], EliminationReason::WerewolfAttack).unwrap();
        session.eliminate_player(ids[3], EliminationReason::WerewolfAttack).unwrap();
        assert_eq!(check_victory(&session), Some(Team::Werewolves));
    }

    #[test]
    fn living_villagers_with_no_recorded_role_still_count_toward_the_village() {
        // Only the werewolf has ever been identified; the other four living
        // players have never had their role assigned, as an ordinary villager
        // never does until death. They must still hold off a single wolf.
        let mut session =
            session_with(&[RoleId::Werewolf, RoleId::SimpleVillager, RoleId::SimpleVillager, RoleId::SimpleVillager, RoleId::SimpleVillager]);
        let wolf = session.seating_order()[0];
        session.assign_role(wolf, RoleId::Werewolf).unwrap();
        assert!(check_victory(&session).is_none());
    }

    #[test]
    fn a_simultaneous_double_kill_that_empties_both_sides_grants_no_win() {
        // The last werewolf and the last villager die together (e.g. a
        // Lovers heartbreak chain) and nobody is left on either side: this
        // is not a Villagers win just because no werewolf remains alive.
        let mut session =
            session_with(&[RoleId::Werewolf, RoleId::SimpleVillager, RoleId::SimpleVillager, RoleId::SimpleVillager, RoleId::SimpleVillager]);
        let ids = session.seating_order().to_vec();
        session.assign_role(ids[0], RoleId::Werewolf).unwrap();
        for &id in &ids {
            session.eliminate_player(id, EliminationReason::WerewolfAttack).unwrap();
        }
        assert_eq!(check_victory(&session), None);
    }
}
