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

use std::collections::HashMap;

use data::core::primitives::Team;
use data::error::{EngineError, EngineResult, ProcessError};
use data::instructions::instruction::{Instruction, InstructionKind};
use data::instructions::response::Response;
use data::phase::phase_cache::{MainPhase, MainPhaseKind};
use data::session::kernel::Session;

use crate::hooks::HookRegistry;
use crate::phases::all_phase_managers;
use crate::stage::{PhaseManager, PhaseOutcome};

/// What a single [FlowController::process] call produced.
#[derive(Debug)]
pub enum FlowOutcome {
    /// The session is paused awaiting a response to `instruction`, which is
    /// also recorded on the session as its pending instruction.
    AwaitingInput(Instruction),
    /// The session reached its end state and the moderator acknowledged it.
    GameOver(Team),
}

/// Drives a session's main-phase dispatch loop, per §4.8's `process` algorithm.
/// Holds the complete, read-only phase table and hook registry; holds no
/// per-session state itself, so one instance is shared across every session a
/// host manages.
pub struct FlowController {
    phase_managers: HashMap<MainPhaseKind, PhaseManager>,
    hooks: HookRegistry,
}

impl FlowController {
    pub fn new(hooks: HookRegistry) -> Self {
        Self { phase_managers: all_phase_managers(), hooks }
    }

    /// Advances `session` by zero or more main-phase transitions, starting
    /// with `response` (the moderator's answer to the session's current
    /// pending instruction, or `None` to simply resume). Steps, per §4.8:
    ///
    /// 1. Reject a response submitted with nothing pending, or nothing
    ///    submitted while an instruction is pending.
    /// 2. Reject a response whose variant doesn't match what the pending
    ///    instruction expects, before any instruction-specific validation.
    /// 3. Dispatch into the current main phase's table.
    /// 4. A `NeedInput` result records the new pending instruction and
    ///    returns it to the caller.
    /// 5. A `MainPhaseTransition` result moves the session's main phase and
    ///    loops, now with no response to forward (the instruction that
    ///    caused the transition has already been fully consumed).
    /// 6. Arriving at `GameOver` for the first time asks for acknowledgement
    ///    rather than ending immediately, so a replay of the log always
    ///    passes through the same instruction sequence a live session would.
    ///    Any call made after the acknowledgement has already been recorded
    ///    is refused with `InvalidOperation`, per §6's exit condition.
    pub fn process(&self, session: &mut Session, mut response: Option<Response>) -> EngineResult<FlowOutcome> {
        self.validate_against_pending(session, &response)?;
        session.set_pending_instruction(None);

        loop {
            let phase = session.main_phase();
            if phase.kind() == MainPhaseKind::GameOver {
                let MainPhase::GameOver { winner } = phase else { unreachable!() };
                if session.phase_cache().game_over_acknowledged() {
                    return Err(EngineError::InvalidOperation {
                        reason: "the game is over and has already been acknowledged".into(),
                    }
                    .into());
                }
                return Ok(self.handle_game_over(session, winner, response.is_none()));
            }

            let manager = self.phase_managers.get(&phase.kind()).ok_or_else(|| {
                ProcessError::fatal(format!("no phase manager registered for {:?}", phase.kind()))
            })?;

            match manager.process(session, &self.hooks, response.as_ref())? {
                PhaseOutcome::NeedInput(instruction) => {
                    session.set_pending_instruction(Some(instruction.clone()));
                    return Ok(FlowOutcome::AwaitingInput(instruction));
                }
                PhaseOutcome::MainPhaseTransition(next) => {
                    session.transition_main_phase(next);
                    response = None;
                }
            }
        }
    }

    fn validate_against_pending(&self, session: &Session, response: &Option<Response>) -> EngineResult<()> {
        match (session.pending_instruction(), response) {
            (None, None) => Ok(()),
            (None, Some(_)) => Err(EngineError::InvalidOperation {
                reason: "a response was submitted but no instruction is pending".into(),
            }
            .into()),
            (Some(_), None) => Err(EngineError::InvalidOperation {
                reason: "an instruction is pending; submit a response before advancing further".into(),
            }
            .into()),
            (Some(pending), Some(response)) => {
                if response.variant_name() == pending.expected_response_variant() {
                    Ok(())
                } else {
                    Err(EngineError::InvalidInput {
                        reason: format!(
                            "expected a {} response, got {}",
                            pending.expected_response_variant(),
                            response.variant_name()
                        ),
                    }
                    .into())
                }
            }
        }
    }

    fn handle_game_over(&self, session: &mut Session, winner: Team, first_arrival: bool) -> FlowOutcome {
        if first_arrival {
            let instruction = Instruction::new(InstructionKind::FinishedGameConfirmation)
                .with_public(format!("The game is over. {winner:?} win."));
            session.set_pending_instruction(Some(instruction.clone()));
            FlowOutcome::AwaitingInput(instruction)
        } else {
            session.set_pending_instruction(None);
            session.acknowledge_game_over();
            FlowOutcome::GameOver(winner)
        }
    }
}
