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

use data::error::{EngineResult, ProcessError};
use data::instructions::instruction::{Instruction, InstructionKind};
use data::instructions::response::Response;
use data::phase::phase_cache::{MainPhase, MainPhaseKind};
use data::phase::tags::Tag;
use data::session::kernel::Session;

use crate::stage::{NavigationResult, PhaseManager, StageDef, StageOutcome, SubPhaseManager};

const CONFIRM: Tag = Tag::new("confirm_start");
const ENTER_NIGHT: Tag = Tag::new("enter_night");

fn confirm_start(_session: &mut Session, response: Option<&Response>) -> EngineResult<StageOutcome> {
    match response {
        None => Ok(StageOutcome::NeedInput(
            Instruction::new(InstructionKind::StartGameConfirmation)
                .with_public("All players are seated. Begin the game?"),
        )),
        Some(Response::Confirmation(_)) => Ok(StageOutcome::Complete),
        Some(_) => Err(ProcessError::fatal("expected a Confirmation response to start the game")),
    }
}

fn enter_night(_session: &Session) -> NavigationResult {
    NavigationResult::MainPhaseTransition(MainPhase::Night)
}

pub fn phase_manager() -> PhaseManager {
    PhaseManager {
        kind: MainPhaseKind::Setup,
        sub_phases: vec![SubPhaseManager {
            tag: Tag::new("begin"),
            stages: vec![
                StageDef::logic(CONFIRM, confirm_start),
                StageDef::navigation(ENTER_NIGHT, enter_night),
            ],
            allowed_next_sub_phases: &[],
            allowed_next_main_phases: &[MainPhaseKind::Night],
        }],
    }
}
