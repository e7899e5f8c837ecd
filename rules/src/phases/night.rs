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
use crate::stage::{NavigationResult, PhaseManager, StageDef, StageOutcome, SubPhaseManager};

const START: Tag = Tag::new("start");
const ACTIONS: Tag = Tag::new("actions");
const END_NIGHT: Tag = Tag::new("end_night");

fn start_night(session: &mut Session, _response: Option<&Response>) -> EngineResult<StageOutcome> {
    session.advance_turn(session.turn().next())?;
    Ok(StageOutcome::Complete)
}

fn end_night(_session: &Session) -> NavigationResult {
    NavigationResult::MainPhaseTransition(MainPhase::Dawn)
}

pub fn phase_manager() -> PhaseManager {
    PhaseManager {
        kind: MainPhaseKind::Night,
        sub_phases: vec![SubPhaseManager {
            tag: Tag::new("fall"),
            stages: vec![
                StageDef::logic(START, start_night),
                StageDef::hook(ACTIONS, ids::NIGHT_ACTIONS),
                StageDef::navigation(END_NIGHT, end_night),
            ],
            allowed_next_sub_phases: &[],
            allowed_next_main_phases: &[MainPhaseKind::Dawn],
        }],
    }
}
