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

use data::error::{verify_fatal, EngineResult};
use data::instructions::instruction::Instruction;
use data::instructions::response::Response;
use data::phase::tags::HookId;
use data::session::kernel::Session;

use crate::listener::{ListenerFactory, ListenerResult};

/// Well-known hook points fired by the declarative phase tables in
/// `crate::phases`. Shared between `rules` (which fires them) and `roles`
/// (which registers listeners against them) via the `engine` crate, which is
/// the one place both are in scope together.
pub mod ids {
    use data::phase::tags::HookId;

    pub const NIGHT_ACTIONS: HookId = HookId("night_actions");
    pub const PLAYER_ELIMINATED: HookId = HookId("player_eliminated");
}

/// Outcome of a single [HookRegistry::fire] call.
pub enum HookOutcome {
    /// A listener (or a stage-attributed confirmation between two listeners)
    /// needs moderator input before this hook can finish firing.
    NeedInput(Instruction),
    /// Every listener registered on this hook ran to completion.
    Complete,
}

/// Static dictionary of hook → ordered listener factories, built once by the
/// `engine` crate (which alone may depend on both `rules` and `roles`) and
/// shared read-only across every session, per §4.7 and §9's design note.
#[derive(Default)]
pub struct HookRegistry {
    table: HashMap<HookId, Vec<Box<dyn ListenerFactory>>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self { table: HashMap::new() }
    }

    /// Appends `factory` to `hook`'s listener order. Registration order is
    /// firing order (§4.7).
    pub fn register(&mut self, hook: HookId, factory: Box<dyn ListenerFactory>) {
        self.table.entry(hook).or_default().push(factory);
    }

    /// Fires `hook`: runs each of its listeners in order, starting from
    /// wherever the session's phase cache says this hook last left off.
    ///
    /// 1. If a listener is currently paused, resume it with `response` at its
    ///    recorded index. Otherwise start at `hook_listener_index` (set by a
    ///    stage-attributed [ListenerResult::Complete] announcement) or `0`.
    /// 2. Each listener that returns [ListenerResult::Complete] is skipped on
    ///    future resumes; the loop immediately continues to the next one with
    ///    `response` cleared to `None` beyond the first iteration.
    /// 3. A [ListenerResult::NeedInput] or a [ListenerResult::Complete]
    ///    carrying an instruction both halt the loop and return `NeedInput` to
    ///    the caller — the latter with no listener left paused, so the
    ///    moderator's reply to it is discarded by the caller rather than
    ///    redelivered here (SPEC_FULL.md's resolution of the "instruction
    ///    identity" open question).
    pub fn fire(
        &self,
        session: &mut Session,
        hook: HookId,
        response: Option<&Response>,
    ) -> EngineResult<HookOutcome> {
        let Some(factories) = self.table.get(&hook) else {
            return Ok(HookOutcome::Complete);
        };

        let resuming_listener = session.phase_cache().paused_listener();
        let mut index = session.phase_cache().hook_listener_index().unwrap_or(0);
        let mut response = response;
        let mut first = true;

        while index < factories.len() {
            let listener = factories[index].create();
            if first {
                if let Some(paused) = resuming_listener {
                    verify_fatal(
                        paused == listener.identifier(),
                        "resumed hook listener does not match the session's paused listener",
                    )?;
                }
            }
            first = false;

            match listener.advance(session, response)? {
                ListenerResult::NeedInput(state, instruction) => {
                    session.set_paused_listener(listener.identifier(), state);
                    session.set_hook_listener_index(index);
                    return Ok(HookOutcome::NeedInput(instruction));
                }
                ListenerResult::Complete(announcement) => {
                    session.clear_paused_listener();
                    if let Some(instruction) = announcement {
                        session.set_hook_listener_index(index + 1);
                        return Ok(HookOutcome::NeedInput(instruction));
                    }
                }
            }

            index += 1;
            response = None;
        }

        session.set_hook_listener_index(0);
        Ok(HookOutcome::Complete)
    }
}
