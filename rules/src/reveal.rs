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

use data::core::primitives::{PlayerId, RoleId};
use data::error::{EngineResult, ProcessError};
use data::instructions::instruction::{Instruction, InstructionKind};
use data::instructions::response::Response;
use data::session::kernel::Session;

use crate::stage::StageOutcome;

/// A dead player whose role hasn't yet been recorded. Shared by Dawn's
/// night-death and Day's vote-death paths: a secondary-role reaction (the
/// Hunter's shot) keys off `role()`, so every death must be revealed before
/// the `PLAYER_ELIMINATED` hook that might react to it fires.
pub fn unrevealed_victim(session: &Session) -> Option<PlayerId> {
    session.players().find(|p| !p.is_alive() && p.role().is_none()).map(|p| p.id())
}

/// Reveals one still-unrevealed victim, or completes immediately if none
/// remain. Call this repeatedly (via a `StayInSubPhase` route) until
/// [unrevealed_victim] returns `None` before firing a hook that reacts to
/// a death.
pub fn reveal_one(session: &mut Session, response: Option<&Response>) -> EngineResult<StageOutcome> {
    let Some(victim) = unrevealed_victim(session) else {
        return Ok(StageOutcome::Complete);
    };
    match response {
        None => Ok(StageOutcome::NeedInput(
            Instruction::new(InstructionKind::AssignRoles {
                players: vec![victim],
                allowed_roles: enum_iterator::all::<RoleId>().collect(),
            })
            .with_private("Reveal this victim's actual role to record it."),
        )),
        Some(Response::RoleAssignment(assignment)) => {
            let role = assignment
                .get(&victim)
                .copied()
                .ok_or_else(|| ProcessError::fatal("role reveal response omitted the victim"))?;
            session.assign_role(victim, role)?;
            Ok(StageOutcome::Complete)
        }
        Some(_) => Err(ProcessError::fatal("expected a RoleAssignment response while revealing a victim")),
    }
}
