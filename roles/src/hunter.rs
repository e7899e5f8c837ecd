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

use data::core::primitives::{EliminationReason, PlayerId, RoleId};
use data::core::secondary_flag::SecondaryFlag;
use data::error::{EngineResult, ProcessError};
use data::instructions::count_constraint::CountConstraint;
use data::instructions::instruction::{Instruction, InstructionKind};
use data::instructions::response::Response;
use data::phase::tags::{ListenerId, ListenerKind, Tag};
use data::session::kernel::Session;
use rules::listener::{Listener, ListenerResult};

const AWAITING_SHOT: Tag = Tag::new("awaiting_shot");

/// Reacts to `player_eliminated` rather than a night wake-up: whenever a
/// Hunter dies without having already fired their shot, they immediately
/// name a target to take down with them, per the Glossary's "immediate
/// reaction" listener shape.
pub struct Hunter;

fn unspent_hunter(session: &Session) -> Option<PlayerId> {
    session
        .players()
        .find(|p| !p.is_alive() && p.role() == Some(RoleId::Hunter) && !p.has_flag(SecondaryFlag::HasUsedHunterShot))
        .map(|p| p.id())
}

impl Listener for Hunter {
    fn identifier(&self) -> ListenerId {
        ListenerId::new(ListenerKind::SecondaryRole, "hunter")
    }

    fn advance(&self, session: &mut Session, response: Option<&Response>) -> EngineResult<ListenerResult> {
        if session.phase_cache().paused_listener_state() == Some(AWAITING_SHOT) {
            return self.handle_response(session, response);
        }

        let Some(hunter) = unspent_hunter(session) else {
            return Ok(ListenerResult::Complete(None));
        };

        let selectable: Vec<PlayerId> =
            session.players().filter(|p| p.is_alive() && p.id() != hunter).map(|p| p.id()).collect();
        if selectable.is_empty() {
            session.apply_status_effect(hunter, SecondaryFlag::HasUsedHunterShot)?;
            return Ok(ListenerResult::Complete(None));
        }

        let instruction = Instruction::new(InstructionKind::SelectPlayers {
            selectable,
            count: CountConstraint::single_optional(),
        })
        .with_public("The Hunter, dying, may take one more player down with them.");
        Ok(ListenerResult::NeedInput(AWAITING_SHOT, instruction))
    }
}

impl Hunter {
    fn handle_response(&self, session: &mut Session, response: Option<&Response>) -> EngineResult<ListenerResult> {
        let Some(Response::PlayerSelection(selected)) = response else {
            return Err(ProcessError::fatal("expected a PlayerSelection response to the Hunter's shot"));
        };
        let Some(hunter) = unspent_hunter(session) else {
            return Err(ProcessError::fatal("Hunter shot resumed but no unspent Hunter is dead"));
        };
        if let Some(target) = selected.first().copied() {
            session.eliminate_player(target, EliminationReason::HunterShot)?;
        }
        session.apply_status_effect(hunter, SecondaryFlag::HasUsedHunterShot)?;
        Ok(ListenerResult::Complete(None))
    }
}

#[cfg(test)]
mod tests {
    use data::session::config::SessionConfig;

    use super::*;

    fn session_with(names: &[&str]) -> Session {
        let names: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        let roles = names.iter().map(|_| RoleId::SimpleVillager).collect();
        Session::new(SessionConfig::new(names, roles)).unwrap()
    }

    #[test]
    fn no_dead_hunter_completes_immediately() {
        let mut session = session_with(&["a", "b", "c", "d", "e"]);
        match Hunter.advance(&mut session, None).unwrap() {
            ListenerResult::Complete(None) => {}
            _ => panic!("expected an immediate no-op completion"),
        }
    }

    #[test]
    fn dead_hunter_fires_a_retaliatory_shot() {
        let mut session = session_with(&["a", "b", "c", "d", "e"]);
        let ids = session.seating_order().to_vec();
        session.assign_role(ids[0], RoleId::Hunter).unwrap();
        session.eliminate_player(ids[0], EliminationReason::DayVote).unwrap();

        let instruction = match Hunter.advance(&mut session, None).unwrap() {
            ListenerResult::NeedInput(tag, instruction) => {
                assert_eq!(tag, AWAITING_SHOT);
                instruction
            }
            _ => panic!("expected the Hunter to ask for a retaliation target"),
        };
        let _ = instruction;
        session.set_paused_listener(Hunter.identifier(), AWAITING_SHOT);

        let response = Response::PlayerSelection(vec![ids[1]]);
        match Hunter.advance(&mut session, Some(&response)).unwrap() {
            ListenerResult::Complete(None) => {}
            _ => panic!("expected the Hunter's shot to complete the hook"),
        }
        assert!(!session.player(ids[1]).unwrap().is_alive());
        assert!(session.player(ids[0]).unwrap().has_flag(SecondaryFlag::HasUsedHunterShot));
    }
}
