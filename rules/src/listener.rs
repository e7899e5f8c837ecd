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

use data::core::numerics::TurnNumber;
use data::core::primitives::PlayerId;
use data::error::{EngineError, EngineResult};
use data::instructions::count_constraint::CountConstraint;
use data::instructions::instruction::{Instruction, InstructionKind};
use data::instructions::response::Response;
use data::log::log_entry::NightActionKind;
use data::phase::tags::{ListenerId, Tag};
use data::session::kernel::Session;

/// Outcome of a single [Listener::advance] call, per §4.5.
pub enum ListenerResult {
    /// Pause: the engine stores this listener as the paused listener, tagged
    /// with `state`, and halts the hook for this `process` call.
    NeedInput(Tag, Instruction),
    /// This listener is done reacting to the current hook firing. A carried
    /// instruction (the sleep-confirmation announcement) is shown to the
    /// moderator, but per SPEC_FULL.md's resolution of the "instruction
    /// identity" open question, the response to it is attributed to the
    /// *stage*, not re-delivered to this listener.
    Complete(Option<Instruction>),
}

/// A role or event-card reaction to a named hook, per the Glossary.
///
/// Implementations are fresh per session (produced by a [ListenerFactory])
/// and stateless across calls: anything that must survive a pause — which
/// logical step a listener is resuming into — is read back out of
/// `session.phase_cache().paused_listener_state()`, never kept on `self`.
/// This is what lets the hook registry serialize a session mid-hook without
/// the listener instance itself needing to be serializable.
pub trait Listener: Send + Sync {
    fn identifier(&self) -> ListenerId;

    fn advance(&self, session: &mut Session, response: Option<&Response>) -> EngineResult<ListenerResult>;
}

/// Produces a fresh [Listener] instance per session, per §4.7/§9's "static
/// dictionary + per-session factories" design note — the master hook table
/// is a compile-time constant, but no listener instance is shared across
/// sessions.
pub trait ListenerFactory: Send + Sync {
    fn create(&self) -> Box<dyn Listener>;
}

impl<F> ListenerFactory for F
where
    F: Fn() -> Box<dyn Listener> + Send + Sync,
{
    fn create(&self) -> Box<dyn Listener> {
        self()
    }
}

/// Internal state tags shared by every night-role listener.
pub const IDENTIFY: Tag = Tag::new("identify");
pub const ACT: Tag = Tag::new("act");

/// One entry of the declarative `(start_state, [allowed_end_states], handler)`
/// table the base listener is specified to accept, per §4.5. The handler
/// itself isn't stored here — each specialization already dispatches to its
/// own handler methods — this table exists purely so [validate_end_state] can
/// check a paused result's end-state against what that start-state declares
/// legal, the same way [crate::stage::SubPhaseManager] validates a navigation
/// result against its declared successors.
struct StageTransition {
    /// `None` means "first entry into this hook firing for this listener" —
    /// there is no internal state yet to resume from.
    start_state: Option<Tag>,
    allowed_end_states: &'static [Tag],
}

/// Checks that `result`, produced while resuming from `start_state`, only
/// pauses (`NeedInput`) into an end-state `start_state`'s table entry
/// declares legal. `Complete` is always accepted — it's a specialization's
/// designated open-ended exit, never a tag that could itself be resumed into.
/// An end-state outside the declared set, or a `start_state` missing from the
/// table entirely, is a programmer error.
fn validate_end_state(table: &[StageTransition], start_state: Option<Tag>, result: &ListenerResult) -> EngineResult<()> {
    let entry = table
        .iter()
        .find(|t| t.start_state == start_state)
        .ok_or_else(|| data::error::ProcessError::fatal(format!("no stage declared for start state {start_state:?}")))?;
    if let ListenerResult::NeedInput(end_state, _) = result {
        data::error::verify_fatal(
            entry.allowed_end_states.contains(end_state),
            format!("{end_state} is not a declared end-state for start state {start_state:?}"),
        )?;
    }
    Ok(())
}

/// The common "prompt-one-target → process-target" shape named in §4.5,
/// covering the bulk of night roles. A role's behavior is the data returned
/// by these methods, not a subclass (§9's "deep inheritance" design note) —
/// the blanket [Listener] impl below is the only state machine, shared by
/// every implementor.
pub trait StandardNightRole: Send + Sync {
    fn listener_id(&self) -> ListenerId;

    fn role(&self) -> data::core::primitives::RoleId;

    fn night_action_kind(&self) -> NightActionKind;

    /// Text shown to the moderator when asking this role's holders to act.
    fn prompt(&self) -> &'static str;

    /// Players this role's holders may legally target tonight, given the
    /// acting player. Implementations exclude the dead and (for roles that
    /// forbid self-targeting or same-team targeting) filter further.
    fn selectable_targets(&self, session: &Session, actor: PlayerId) -> Vec<PlayerId>;

    /// A role-level rule violation (§7's `RuleViolation`), checked once a
    /// target is chosen but before the night action is recorded. Default: no
    /// additional rule.
    fn validate_target(
        &self,
        _session: &Session,
        _actor: PlayerId,
        _target: Option<PlayerId>,
    ) -> Result<(), EngineError> {
        Ok(())
    }
}

/// `StandardNightRole`'s declarative stage table: first entry may pause into
/// either `IDENTIFY` or `ACT` depending on whether identification is still
/// needed; `IDENTIFY` always resolves onward into `ACT` (or completes
/// outright if it turns out nobody holds the role); `ACT` is terminal.
const STANDARD_NIGHT_ROLE_TABLE: &[StageTransition] = &[
    StageTransition { start_state: None, allowed_end_states: &[IDENTIFY, ACT] },
    StageTransition { start_state: Some(IDENTIFY), allowed_end_states: &[ACT] },
    StageTransition { start_state: Some(ACT), allowed_end_states: &[] },
];

impl<T: StandardNightRole> Listener for T {
    fn identifier(&self) -> ListenerId {
        self.listener_id()
    }

    fn advance(&self, session: &mut Session, response: Option<&Response>) -> EngineResult<ListenerResult> {
        let resuming_state = session.phase_cache().paused_listener_state();

        // Identification only ever happens once, on turn 1, before any player
        // holds this role — checked first, since the holders list below is
        // necessarily empty until it has run.
        let needs_identify =
            session.turn() == TurnNumber(1) && !session.players().any(|p| p.role() == Some(self.role()));

        let result = match resuming_state {
            Some(tag) if tag == IDENTIFY => self.handle_identify_response(session, response)?,
            None if needs_identify => identify_prompt(session, self.role()),
            _ => {
                let holders: Vec<PlayerId> = session
                    .players()
                    .filter(|p| p.is_alive() && p.role() == Some(self.role()))
                    .map(|p| p.id())
                    .collect();

                if holders.is_empty() {
                    ListenerResult::Complete(None)
                } else {
                    match resuming_state {
                        None => act_prompt(self, session, &holders),
                        Some(tag) if tag == ACT => self.handle_act_response(session, response, &holders)?,
                        Some(other) => {
                            return Err(data::error::ProcessError::fatal(format!(
                                "unknown night-role listener state {other}"
                            )))
                        }
                    }
                }
            }
        };

        validate_end_state(STANDARD_NIGHT_ROLE_TABLE, resuming_state, &result)?;
        Ok(result)
    }
}

trait StandardNightRoleResponses: StandardNightRole {
    fn handle_identify_response(
        &self,
        session: &mut Session,
        response: Option<&Response>,
    ) -> EngineResult<ListenerResult>;

    fn handle_act_response(
        &self,
        session: &mut Session,
        response: Option<&Response>,
        holders: &[PlayerId],
    ) -> EngineResult<ListenerResult>;
}

impl<T: StandardNightRole> StandardNightRoleResponses for T {
    fn handle_identify_response(
        &self,
        session: &mut Session,
        response: Option<&Response>,
    ) -> EngineResult<ListenerResult> {
        let Some(Response::PlayerSelection(selected)) = response else {
            return Err(data::error::ProcessError::fatal(
                "expected a PlayerSelection response while resuming role identification",
            ));
        };
        for &player in selected {
            session.assign_role(player, self.role()).map_err(data::error::ProcessError::from)?;
        }
        if selected.is_empty() {
            // A role with zero expected holders in this game's roster still
            // has to be asked about (zero-leakage requires confirming no one
            // holds it), but there's no one to prompt for an action.
            return Ok(ListenerResult::Complete(None));
        }
        Ok(act_prompt(self, session, selected))
    }

    fn handle_act_response(
        &self,
        session: &mut Session,
        response: Option<&Response>,
        holders: &[PlayerId],
    ) -> EngineResult<ListenerResult> {
        let Some(Response::PlayerSelection(selected)) = response else {
            return Err(data::error::ProcessError::fatal(
                "expected a PlayerSelection response while resuming a night action",
            ));
        };
        let target = selected.first().copied();
        self.validate_target(session, holders[0], target)?;
        session
            .record_night_action(holders[0], self.night_action_kind(), target)
            .map_err(data::error::ProcessError::from)?;
        Ok(ListenerResult::Complete(Some(
            Instruction::new(InstructionKind::Confirmation)
                .with_public(format!("{} have gone back to sleep.", self.prompt())),
        )))
    }
}

fn identify_prompt(session: &Session, role: data::core::primitives::RoleId) -> ListenerResult {
    let alive: Vec<PlayerId> = session.players().filter(|p| p.is_alive()).map(|p| p.id()).collect();
    let count = role.expected_holder_count(session.roles_in_play());
    let instruction = Instruction::new(InstructionKind::SelectPlayers {
        selectable: alive,
        count: CountConstraint::exactly(count),
    })
    .with_private("Ask this role's players to identify themselves.");
    ListenerResult::NeedInput(IDENTIFY, instruction)
}

fn act_prompt<T: StandardNightRole + ?Sized>(role: &T, session: &Session, holders: &[PlayerId]) -> ListenerResult {
    let actor = holders[0];
    let selectable = role.selectable_targets(session, actor);
    let instruction = Instruction::new(InstructionKind::SelectPlayers {
        selectable,
        count: CountConstraint::single_optional(),
    })
    .with_public(role.prompt());
    ListenerResult::NeedInput(ACT, instruction)
}

/// The other of §4.5's two thinner specializations: a role with nothing to
/// do but be named. It wakes once, on turn 1, to let the moderator identify
/// its holders, then goes straight back to sleep — there is no act state at
/// all, unlike [StandardNightRole].
pub trait IdentificationOnlyNightRole: Send + Sync {
    fn listener_id(&self) -> ListenerId;

    fn role(&self) -> data::core::primitives::RoleId;
}

/// `IdentificationOnlyNightRole`'s declarative stage table: first entry may
/// pause into `IDENTIFY` if identification is still needed, or else complete
/// immediately; `IDENTIFY` is terminal — there is no further state to resume
/// into.
const IDENTIFICATION_ONLY_NIGHT_ROLE_TABLE: &[StageTransition] = &[
    StageTransition { start_state: None, allowed_end_states: &[IDENTIFY] },
    StageTransition { start_state: Some(IDENTIFY), allowed_end_states: &[] },
];

/// Adapts an [IdentificationOnlyNightRole] into a [Listener].
///
/// A plain `impl<T: IdentificationOnlyNightRole> Listener for T` would
/// conflict with [StandardNightRole]'s blanket impl under Rust's coherence
/// rules (the compiler must assume some future type could implement both),
/// even though no role ever does. Wrapping in this marker newtype sidesteps
/// that — a [ListenerFactory] for one of these roles returns
/// `Box::new(IdentificationOnly(Role))` rather than `Box::new(Role)`.
pub struct IdentificationOnly<T>(pub T);

impl<T: IdentificationOnlyNightRole> Listener for IdentificationOnly<T> {
    fn identifier(&self) -> ListenerId {
        self.0.listener_id()
    }

    fn advance(&self, session: &mut Session, response: Option<&Response>) -> EngineResult<ListenerResult> {
        let resuming_state = session.phase_cache().paused_listener_state();
        let needs_identify =
            session.turn() == TurnNumber(1) && !session.players().any(|p| p.role() == Some(self.0.role()));

        let result = match resuming_state {
            Some(tag) if tag == IDENTIFY => self.0.handle_identify_only_response(session, response)?,
            None if needs_identify => identify_prompt(session, self.0.role()),
            _ => ListenerResult::Complete(None),
        };

        validate_end_state(IDENTIFICATION_ONLY_NIGHT_ROLE_TABLE, resuming_state, &result)?;
        Ok(result)
    }
}

trait IdentificationOnlyNightRoleResponses: IdentificationOnlyNightRole {
    fn handle_identify_only_response(
        &self,
        session: &mut Session,
        response: Option<&Response>,
    ) -> EngineResult<ListenerResult>;
}

impl<T: IdentificationOnlyNightRole> IdentificationOnlyNightRoleResponses for T {
    fn handle_identify_only_response(
        &self,
        session: &mut Session,
        response: Option<&Response>,
    ) -> EngineResult<ListenerResult> {
        let Some(Response::PlayerSelection(selected)) = response else {
            return Err(data::error::ProcessError::fatal(
                "expected a PlayerSelection response while resuming role identification",
            ));
        };
        for &player in selected {
            session.assign_role(player, self.role()).map_err(data::error::ProcessError::from)?;
        }
        if selected.is_empty() {
            return Ok(ListenerResult::Complete(None));
        }
        Ok(ListenerResult::Complete(Some(
            Instruction::new(InstructionKind::Confirmation)
                .with_public(format!("{:?}'s players are noted and go back to sleep.", self.role())),
        )))
    }
}

#[cfg(test)]
mod tests {
    use data::core::primitives::RoleId;
    use data::phase::tags::ListenerKind;
    use data::session::config::SessionConfig;

    use super::*;

    struct Bystander;

    impl IdentificationOnlyNightRole for Bystander {
        fn listener_id(&self) -> ListenerId {
            ListenerId::new(ListenerKind::MainRole, "bystander")
        }

        fn role(&self) -> RoleId {
            RoleId::Seer
        }
    }

    fn session_with(names: &[&str], roles: Vec<RoleId>) -> Session {
        let names: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        Session::new(SessionConfig::new(names, roles)).unwrap()
    }

    #[test]
    fn identification_only_wakes_identifies_and_sleeps_with_no_act_state() {
        let mut session =
            session_with(&["a", "b", "c", "d", "e"], vec![RoleId::Seer, RoleId::SimpleVillager, RoleId::SimpleVillager, RoleId::SimpleVillager, RoleId::SimpleVillager]);
        session.advance_turn(TurnNumber(1)).unwrap();
        let listener = IdentificationOnly(Bystander);
        let seer = session.seating_order()[0];

        let identify = listener.advance(&mut session, None).unwrap();
        let ListenerResult::NeedInput(IDENTIFY, _) = identify else {
            panic!("expected the first wake to pause on IDENTIFY");
        };
        session.set_paused_listener(listener.identifier(), IDENTIFY);

        let response = Response::PlayerSelection(vec![seer]);
        let done = listener.advance(&mut session, Some(&response)).unwrap();
        assert!(matches!(done, ListenerResult::Complete(Some(_))));
        assert_eq!(session.players().find(|p| p.id() == seer).unwrap().role(), Some(RoleId::Seer));
    }

    #[test]
    fn identification_only_completes_silently_once_already_identified() {
        let mut session =
            session_with(&["a", "b", "c", "d", "e"], vec![RoleId::Seer, RoleId::SimpleVillager, RoleId::SimpleVillager, RoleId::SimpleVillager, RoleId::SimpleVillager]);
        session.advance_turn(TurnNumber(2)).unwrap();
        let seer = session.seating_order()[0];
        session.assign_role(seer, RoleId::Seer).unwrap();

        let listener = IdentificationOnly(Bystander);
        let result = listener.advance(&mut session, None).unwrap();
        assert!(matches!(result, ListenerResult::Complete(None)));
    }
}
