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
//
// The day phase here is a deliberately linear Debate → Vote → Finalize
// sequence rather than the richer sheriff-tiebreak / runoff flow real tables
// use — vote tallying itself is explicitly out of scope (the moderator
// counts ballots and reports the outcome; this only records it and applies
// the consequence).

use data::core::primitives::EliminationReason;
use data::error::{EngineResult, ProcessError};
use data::instructions::count_constraint::CountConstraint;
use data::instructions::instruction::{Instruction, InstructionKind};
use data::instructions::response::Response;
use data::phase::phase_cache::{MainPhase, MainPhaseKind};
use data::phase::tags::Tag;
use data::session::kernel::Session;

use crate::hooks::ids;
use crate::reveal::{reveal_one, unrevealed_victim};
use crate::stage::{NavigationResult, PhaseManager, StageDef, StageOutcome, SubPhaseManager};
use crate::victory;

const DEBATE: Tag = Tag::new("debate");
const VOTE: Tag = Tag::new("vote");
const ROUTE_TO_REVEAL_1: Tag = Tag::new("route_to_reveal_1");
const REVEAL_BEFORE_CHAIN_1: Tag = Tag::new("reveal_before_chain_1");
const ROUTE_TO_CHAIN_1: Tag = Tag::new("route_to_chain_1");
const CHAIN_1: Tag = Tag::new("death_chain_1");
const ROUTE_TO_REVEAL_2: Tag = Tag::new("route_to_reveal_2");
const REVEAL_BEFORE_CHAIN_2: Tag = Tag::new("reveal_before_chain_2");
const ROUTE_TO_CHAIN_2: Tag = Tag::new("route_to_chain_2");
const CHAIN_2: Tag = Tag::new("death_chain_2");
const ROUTE_TO_REVEAL_3: Tag = Tag::new("route_to_reveal_3");
const REVEAL_BEFORE_FINALIZE: Tag = Tag::new("reveal_before_finalize");
const ROUTE_AFTER_FINAL_REVEAL: Tag = Tag::new("route_after_final_reveal");
const CHECK_VICTORY: Tag = Tag::new("check_victory");
const ROUTE: Tag = Tag::new("route");

const SUB_VOTE: Tag = Tag::new("vote");
const SUB_REVEAL_BEFORE_CHAIN_1: Tag = Tag::new("reveal_before_chain_1");
const SUB_CHAIN_1: Tag = Tag::new("chain_1");
const SUB_REVEAL_BEFORE_CHAIN_2: Tag = Tag::new("reveal_before_chain_2");
const SUB_CHAIN_2: Tag = Tag::new("chain_2");
const SUB_REVEAL_BEFORE_FINALIZE: Tag = Tag::new("reveal_before_finalize");
const SUB_FINALIZE: Tag = Tag::new("finalize");

fn debate(_session: &mut Session, response: Option<&Response>) -> EngineResult<StageOutcome> {
    match response {
        None => Ok(StageOutcome::NeedInput(
            Instruction::new(InstructionKind::Confirmation)
                .with_public("The village debates. Confirm when discussion ends."),
        )),
        Some(Response::Confirmation(_)) => Ok(StageOutcome::Complete),
        Some(_) => Err(ProcessError::fatal("expected a Confirmation response to end debate")),
    }
}

fn vote(session: &mut Session, response: Option<&Response>) -> EngineResult<StageOutcome> {
    match response {
        None => {
            let selectable = session.players().filter(|p| p.is_alive()).map(|p| p.id()).collect();
            Ok(StageOutcome::NeedInput(
                Instruction::new(InstructionKind::SelectPlayers {
                    selectable,
                    count: CountConstraint::single_optional(),
                })
                .with_public("Report who the village voted to eliminate, or none for a tie."),
            ))
        }
        Some(Response::PlayerSelection(selected)) => {
            session.report_vote_outcome(selected.clone())?;
            let eliminated = selected.first().copied();
            session.resolve_vote(eliminated)?;
            if let Some(target) = eliminated {
                session.eliminate_player(target, EliminationReason::DayVote)?;
            }
            Ok(StageOutcome::Complete)
        }
        Some(_) => Err(ProcessError::fatal("expected a PlayerSelection response to report the vote")),
    }
}

fn check_victory_stage(session: &mut Session, _response: Option<&Response>) -> EngineResult<StageOutcome> {
    if let Some(team) = victory::check_victory(session) {
        session.record_victory(team)?;
    }
    Ok(StageOutcome::Complete)
}

fn route(session: &Session) -> NavigationResult {
    match session.winner() {
        Some(winner) => NavigationResult::MainPhaseTransition(MainPhase::GameOver { winner }),
        None => NavigationResult::MainPhaseTransition(MainPhase::Night),
    }
}

fn route_to_reveal_1(_session: &Session) -> NavigationResult {
    NavigationResult::SubPhaseTransition(SUB_REVEAL_BEFORE_CHAIN_1)
}

fn route_to_chain_1(session: &Session) -> NavigationResult {
    if unrevealed_victim(session).is_some() {
        NavigationResult::StayInSubPhase
    } else {
        NavigationResult::SubPhaseTransition(SUB_CHAIN_1)
    }
}

fn route_to_reveal_2(_session: &Session) -> NavigationResult {
    NavigationResult::SubPhaseTransition(SUB_REVEAL_BEFORE_CHAIN_2)
}

fn route_to_chain_2(session: &Session) -> NavigationResult {
    if unrevealed_victim(session).is_some() {
        NavigationResult::StayInSubPhase
    } else {
        NavigationResult::SubPhaseTransition(SUB_CHAIN_2)
    }
}

fn route_to_reveal_3(_session: &Session) -> NavigationResult {
    NavigationResult::SubPhaseTransition(SUB_REVEAL_BEFORE_FINALIZE)
}

fn route_after_final_reveal(session: &Session) -> NavigationResult {
    if unrevealed_victim(session).is_some() {
        NavigationResult::StayInSubPhase
    } else {
        NavigationResult::SubPhaseTransition(SUB_FINALIZE)
    }
}

pub fn phase_manager() -> PhaseManager {
    PhaseManager {
        kind: MainPhaseKind::Day,
        sub_phases: vec![
            SubPhaseManager {
                tag: SUB_VOTE,
                stages: vec![
                    StageDef::logic(DEBATE, debate),
                    StageDef::logic(VOTE, vote),
                    StageDef::navigation(ROUTE_TO_REVEAL_1, route_to_reveal_1),
                ],
                allowed_next_sub_phases: &[SUB_REVEAL_BEFORE_CHAIN_1],
                allowed_next_main_phases: &[],
            },
            // Reveal every death before the hook that might react to it
            // fires, mirroring Dawn's chain so a Hunter eliminated by the
            // day's vote can still take their retaliatory shot.
            SubPhaseManager {
                tag: SUB_REVEAL_BEFORE_CHAIN_1,
                stages: vec![
                    StageDef::logic(REVEAL_BEFORE_CHAIN_1, reveal_one),
                    StageDef::navigation(ROUTE_TO_CHAIN_1, route_to_chain_1),
                ],
                allowed_next_sub_phases: &[SUB_CHAIN_1],
                allowed_next_main_phases: &[],
            },
            SubPhaseManager {
                tag: SUB_CHAIN_1,
                stages: vec![
                    StageDef::hook(CHAIN_1, ids::PLAYER_ELIMINATED),
                    StageDef::navigation(ROUTE_TO_REVEAL_2, route_to_reveal_2),
                ],
                allowed_next_sub_phases: &[SUB_REVEAL_BEFORE_CHAIN_2],
                allowed_next_main_phases: &[],
            },
            SubPhaseManager {
                tag: SUB_REVEAL_BEFORE_CHAIN_2,
                stages: vec![
                    StageDef::logic(REVEAL_BEFORE_CHAIN_2, reveal_one),
                    StageDef::navigation(ROUTE_TO_CHAIN_2, route_to_chain_2),
                ],
                allowed_next_sub_phases: &[SUB_CHAIN_2],
                allowed_next_main_phases: &[],
            },
            SubPhaseManager {
                tag: SUB_CHAIN_2,
                stages: vec![
                    StageDef::hook(CHAIN_2, ids::PLAYER_ELIMINATED),
                    StageDef::navigation(ROUTE_TO_REVEAL_3, route_to_reveal_3),
                ],
                allowed_next_sub_phases: &[SUB_REVEAL_BEFORE_FINALIZE],
                allowed_next_main_phases: &[],
            },
            SubPhaseManager {
                tag: SUB_REVEAL_BEFORE_FINALIZE,
                stages: vec![
                    StageDef::logic(REVEAL_BEFORE_FINALIZE, reveal_one),
                    StageDef::navigation(ROUTE_AFTER_FINAL_REVEAL, route_after_final_reveal),
                ],
                allowed_next_sub_phases: &[SUB_FINALIZE],
                allowed_next_main_phases: &[],
            },
            SubPhaseManager {
                tag: SUB_FINALIZE,
                stages: vec![
                    StageDef::logic(CHECK_VICTORY, check_victory_stage),
                    StageDef::navigation(ROUTE, route),
                ],
                allowed_next_sub_phases: &[],
                allowed_next_main_phases: &[MainPhaseKind::Night, MainPhaseKind::GameOver],
            },
        ],
    }
}
