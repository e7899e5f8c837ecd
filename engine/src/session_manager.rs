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

use data::core::primitives::SessionId;
use data::error::{EngineError, EngineResult};
use data::instructions::instruction::Instruction;
use data::instructions::response::Response;
use data::session::config::SessionConfig;
use data::session::kernel::Session;
use rules::flow::{FlowController, FlowOutcome};
use rules::hooks::{ids, HookRegistry};
use rules::listener::Listener;
use tracing::instrument;

/// Registers one listener factory per role against the hook it reacts to.
/// `SimpleVillager` has no listener and registers nothing. This is the only
/// function in the workspace that names both `rules` and `roles`.
fn build_hook_registry() -> HookRegistry {
    let mut hooks = HookRegistry::new();
    hooks.register(ids::NIGHT_ACTIONS, Box::new(roles::werewolf_factory as fn() -> Box<dyn Listener>));
    hooks.register(ids::NIGHT_ACTIONS, Box::new(roles::seer_factory as fn() -> Box<dyn Listener>));
    hooks.register(ids::PLAYER_ELIMINATED, Box::new(roles::hunter_factory as fn() -> Box<dyn Listener>));
    hooks
}

/// Owns every live session plus the single [FlowController] shared across
/// them. Mirrors the teacher's `GameActionServer`: one long-lived registry
/// in front of a table of per-session state, instead of a fresh controller
/// per call.
pub struct SessionManager {
    controller: FlowController,
    sessions: HashMap<SessionId, Session>,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionManager {
    pub fn new() -> Self {
        Self { controller: FlowController::new(build_hook_registry()), sessions: HashMap::new() }
    }

    /// Validates `config` and starts a new session under a freshly minted id.
    #[instrument(level = "debug", skip(self, config))]
    pub fn start(&mut self, config: SessionConfig) -> EngineResult<SessionId> {
        let session = Session::new(config)?;
        let id = session.id();
        self.sessions.insert(id, session);
        Ok(id)
    }

    fn session(&self, id: SessionId) -> EngineResult<&Session> {
        self.sessions.get(&id).ok_or_else(|| EngineError::GameNotFound.into())
    }

    /// Advances `id` by the moderator's `response` (or `None` to resume).
    ///
    /// A call made after the moderator has already acknowledged
    /// `FinishedGameConfirmation` is refused as `InvalidOperation`; the
    /// session itself is left in the table (so `log`/`serialize` can still
    /// inspect a finished game) until the host calls [Self::destroy].
    #[instrument(level = "debug", skip(self, response))]
    pub fn process(&mut self, id: SessionId, response: Option<Response>) -> EngineResult<FlowOutcome> {
        let session = self.sessions.get_mut(&id).ok_or(EngineError::GameNotFound)?;
        self.controller.process(session, response)
    }

    /// Removes `id` from the table, per §6's "session destroyed on the
    /// moderator's acknowledgement of the final instruction". Left as an
    /// explicit call rather than automatic on [FlowOutcome::GameOver] so a
    /// host can still inspect the finished session's log before tearing it
    /// down.
    pub fn destroy(&mut self, id: SessionId) -> EngineResult<()> {
        self.sessions.remove(&id).ok_or(EngineError::GameNotFound)?;
        Ok(())
    }

    pub fn current_instruction(&self, id: SessionId) -> EngineResult<Option<&Instruction>> {
        Ok(self.session(id)?.pending_instruction())
    }

    /// The session's append-only log, for hosts or tests asserting on the
    /// exact sequence of recorded events rather than just terminal state.
    pub fn log(&self, id: SessionId) -> EngineResult<&[data::log::log_entry::LogRecord]> {
        Ok(self.session(id)?.log())
    }

    /// Serializes a session to JSON for external persistence, per §4.3's
    /// rehydration requirement: every piece of resumable state lives on
    /// `Session`/`PhaseCache`, so this snapshot is sufficient to resume from.
    pub fn serialize(&self, id: SessionId) -> EngineResult<String> {
        let session = self.session(id)?;
        serde_json::to_string(session)
            .map_err(|error| EngineError::InvalidOperation { reason: error.to_string() }.into())
    }

    /// Rehydrates a session previously produced by [Self::serialize] and
    /// installs it under its original id, replacing any session already
    /// live under that id.
    pub fn rehydrate(&mut self, json: &str) -> EngineResult<SessionId> {
        let session: Session = serde_json::from_str(json)
            .map_err(|error| EngineError::InvalidOperation { reason: error.to_string() })?;
        let id = session.id();
        self.sessions.insert(id, session);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use data::core::primitives::RoleId;
    use data::instructions::instruction::InstructionKind;

    use super::*;

    fn five_player_config() -> SessionConfig {
        let names = ["a", "b", "c", "d", "e"].iter().map(|s| s.to_string()).collect();
        let roles = vec![RoleId::Werewolf, RoleId::Seer, RoleId::SimpleVillager, RoleId::SimpleVillager, RoleId::SimpleVillager];
        SessionConfig::new(names, roles)
    }

    #[test]
    fn starting_a_session_yields_a_pending_start_confirmation() {
        let mut manager = SessionManager::new();
        let id = manager.start(five_player_config()).unwrap();
        match manager.process(id, None).unwrap() {
            FlowOutcome::AwaitingInput(instruction) => {
                assert!(matches!(instruction.kind, InstructionKind::StartGameConfirmation));
            }
            FlowOutcome::GameOver(_) => panic!("a freshly started session cannot already be over"),
        }
    }

    #[test]
    fn unknown_session_id_is_reported_as_game_not_found() {
        let mut manager = SessionManager::new();
        let bogus = SessionId::new();
        match manager.process(bogus, None) {
            Err(data::error::ProcessError::Recoverable(EngineError::GameNotFound)) => {}
            _ => panic!("expected a GameNotFound error for an unknown session id"),
        }
    }

    #[test]
    fn a_session_survives_a_serialize_rehydrate_round_trip() {
        let mut manager = SessionManager::new();
        let id = manager.start(five_player_config()).unwrap();
        manager.process(id, None).unwrap();
        let snapshot = manager.serialize(id).unwrap();

        let mut rehydrated_into = SessionManager::new();
        let rehydrated_id = rehydrated_into.rehydrate(&snapshot).unwrap();
        assert_eq!(rehydrated_id, id);
        assert_eq!(
            format!("{:?}", rehydrated_into.current_instruction(id).unwrap()),
            format!("{:?}", manager.current_instruction(id).unwrap()),
        );
    }
}
