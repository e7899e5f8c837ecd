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

use data::core::primitives::{EliminationReason, PlayerId};
use data::core::secondary_flag::SecondaryFlag;
use data::log::log_entry::{LogEntry, NightActionKind};
use data::session::kernel::Session;

/// Computes the night's eliminations from the log, in resolution order
/// (§4.9): the werewolves' shared target is read back from the
/// `NightAction` entry recorded this turn; a `ProtectedThisNight` flag voids
/// the attack outright; otherwise the target dies, and a living lover
/// partner dies alongside them (heartbreak). Pure — records nothing itself,
/// so it can be called speculatively and is safe to re-run on a resumed
/// `CalculateVictims` stage.
pub fn resolve_night(session: &Session) -> Vec<(PlayerId, EliminationReason)> {
    let turn = session.turn();
    let werewolf_target = session
        .log()
        .iter()
        .rev()
        .take_while(|record| record.turn == turn)
        .find_map(|record| match &record.entry {
            LogEntry::NightAction { kind: NightActionKind::WerewolfTarget, target, .. } => Some(*target),
            _ => None,
        })
        .flatten();

    let mut victims = Vec::new();
    let Some(target) = werewolf_target else {
        return victims;
    };
    let Some(player) = session.player(target) else {
        return victims;
    };
    if !player.is_alive() || player.has_flag(SecondaryFlag::ProtectedThisNight) {
        return victims;
    }

    victims.push((target, EliminationReason::WerewolfAttack));
    if let Some(partner) = player.lover_partner() {
        if session.player(partner).is_some_and(|p| p.is_alive()) {
            victims.push((partner, EliminationReason::LoverHeartbreak));
        }
    }
    victims
}

#[cfg(test)]
mod tests {
    use data::core::primitives::RoleId;
    use data::session::config::SessionConfig;

    use super::*;

    fn session_with(names: &[&str]) -> Session {
        let names: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        let roles = names.iter().map(|_| RoleId::SimpleVillager).collect();
        Session::new(SessionConfig::new(names, roles)).unwrap()
    }

    #[test]
    fn no_night_action_yields_no_victims() {
        let session = session_with(&["a", "b", "c", "d", "e"]);
        assert!(resolve_night(&session).is_empty());
    }

    #[test]
    fn werewolf_attack_kills_its_target() {
        let mut session = session_with(&["a", "b", "c", "d", "e"]);
        let actor = session.seating_order()[0];
        let target = session.seating_order()[1];
        session.advance_turn(data::core::numerics::TurnNumber(1)).unwrap();
        session.record_night_action(actor, NightActionKind::WerewolfTarget, Some(target)).unwrap();
        let victims = resolve_night(&session);
        assert_eq!(victims, vec![(target, EliminationReason::WerewolfAttack)]);
    }

    #[test]
    fn protected_target_survives() {
        let mut session = session_with(&["a", "b", "c", "d", "e"]);
        let actor = session.seating_order()[0];
        let target = session.seating_order()[1];
        session.advance_turn(data::core::numerics::TurnNumber(1)).unwrap();
        session.apply_status_effect(target, SecondaryFlag::ProtectedThisNight).unwrap();
        session.record_night_action(actor, NightActionKind::WerewolfTarget, Some(target)).unwrap();
        assert!(resolve_night(&session).is_empty());
    }

    #[test]
    fn lover_dies_of_heartbreak() {
        let mut session = session_with(&["a", "b", "c", "d", "e"]);
        let actor = session.seating_order()[0];
        let target = session.seating_order()[1];
        let lover = session.seating_order()[2];
        session.link_lovers(target, lover).unwrap();
        session.advance_turn(data::core::numerics::TurnNumber(1)).unwrap();
        session.record_night_action(actor, NightActionKind::WerewolfTarget, Some(target)).unwrap();
        let victims = resolve_night(&session);
        assert_eq!(victims.len(), 2);
        assert!(victims.contains(&(target, EliminationReason::WerewolfAttack)));
        assert!(victims.contains(&(lover, EliminationReason::LoverHeartbreak)));
    }
}
