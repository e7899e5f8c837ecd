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

use data::error::EngineResult;
use data::instructions::response::Response;
use data::phase::phase_cache::{MainPhase, MainPhaseKind};
use data::phase::tags::Tag;
use data::session::kernel::Session;

use crate::hooks::ids;
use crate::night_resolver::resolve_night;
use crate::reveal::{reveal_one, unrevealed_victim};
use crate::stage::{NavigationResult, PhaseManager, StageDef, StageOutcome, SubPhaseManager};
use crate::victory;

const COMPUTE: Tag = Tag::new("compute_victims");
const ROUTE_AFTER_COMPUTE: Tag = Tag::new("route_after_compute");
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
const ROUTE_AFTER_FINALIZE: Tag = Tag::new("route_after_finalize");

const SUB_CALCULATE_VICTIMS: Tag = Tag::new("calculate_victims");
const SUB_REVEAL_BEFORE_CHAIN_1: Tag = Tag::new("reveal_before_chain_1");
const SUB_CHAIN_1: Tag = Tag::new("chain_1");
const SUB_REVEAL_BEFORE_CHAIN_2: Tag = Tag::new("reveal_before_chain_2");
const SUB_CHAIN_2: Tag = Tag::new("chain_2");
const SUB_REVEAL_BEFORE_FINALIZE: Tag = Tag::new("reveal_before_finalize");
const SUB_FINALIZE: Tag = Tag::new("finalize");

fn compute_victims(session: &mut Session, _response: Option<&Response>) -> EngineResult<StageOutcome> {
    for (victim, reason) in resolve_night(session) {
        session.eliminate_player(victim, reason)?;
    }
    Ok(StageOutcome::Complete)
}

fn route_after_compute(_session: &Session) -> NavigationResult {
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

fn check_victory_stage(session: &mut Session, _response: Option<&Response>) -> EngineResult<StageOutcome> {
    if let Some(team) = victory::check_victory(session) {
        session.record_victory(team)?;
    }
    Ok(StageOutcome::Complete)
}

fn route_after_finalize(session: &Session) -> NavigationResult {
    match session.winner() {
        Some(winner) => NavigationResult::MainPhaseTransition(MainPhase::GameOver { winner }),
        None => NavigationResult::MainPhaseTransition(MainPhase::Day),
    }
}

pub fn phase_manager() -> PhaseManager {
    PhaseManager {
        kind: MainPhaseKind::Dawn,
        sub_phases: vec![
            SubPhaseManager {
                tag: SUB_CALCULATE_VICTIMS,
                stages: vec![
                    StageDef::logic(COMPUTE, compute_victims),
                    StageDef::navigation(ROUTE_AFTER_COMPUTE, route_after_compute),
                ],
                allowed_next_sub_phases: &[SUB_REVEAL_BEFORE_CHAIN_1],
                allowed_next_main_phases: &[],
            },
            // Every death is revealed before the hook that might react to
            // it fires, so a secondary-role reaction (the Hunter's shot) can
            // see who it's reacting to. Fired twice: that reaction's own
            // victim could in turn be a second Hunter, but the chain is
            // bounded there rather than left unbounded (§4.7).
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
                    StageDef::navigation(ROUTE_AFTER_FINALIZE, route_after_finalize),
                ],
                allowed_next_sub_phases: &[],
                allowed_next_main_phases: &[MainPhaseKind::Day, MainPhaseKind::GameOver],
            },
        ],
    }
}
