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

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;
use utils::outcome::{Outcome, OK};

use crate::core::numerics::TurnNumber;
use crate::core::primitives::{
    EliminationReason, EventCardId, PlayerId, RoleGroup, RoleId, SessionId, Team,
};
use crate::core::secondary_flag::SecondaryFlag;
use crate::error::EngineError;
use crate::instructions::instruction::Instruction;
use crate::log::log_entry::{LogEntry, LogRecord, NightActionKind};
use crate::phase::phase_cache::{MainPhase, PhaseCache};
use crate::phase::tags::{ListenerId, ListenerStateTag, StageTag, SubPhaseTag};
use crate::player_states::player_state::{Health, PlayerState};
use crate::session::config::SessionConfig;
use crate::session::mutator::SessionMutator;
use crate::session::observer::{NullObserver, StateChangeObserver};

/// Holds every mutable field of a session in private storage. Every crate
/// outside `data` — including `rules` and `roles` — only ever sees a `&Session`
/// or `&mut Session`, and can only reach the fields below through the methods
/// on this type, per §4.2.
///
/// The one genuine mutation path is [Session::register_log_entry]: it builds
/// a one-shot [Proxy] bound to this kernel's fields, hands it to
/// [LogEntry::apply], and only appends `entry` to the log once that returns.
/// Every other `pub` method below that looks like a mutation (`assign_role`,
/// `eliminate_player`, ...) is a thin wrapper that constructs the matching
/// [LogEntry] and calls `register_log_entry` — there is no way to reach a
/// player's or the game's state except by going through a log entry.
///
/// The phase-cache pass-throughs (`transition_main_phase` and friends) are
/// the one exception: control-flow position isn't itself replayable game
/// state (§4.3), so it bypasses the log, but it still only moves through
/// `PhaseCache`'s `pub(crate)` setters, never a public field.
#[derive(Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    seating_order: Vec<PlayerId>,
    players: SlotMap<PlayerId, PlayerState>,
    roles_in_play: Vec<RoleId>,
    event_deck: Vec<EventCardId>,
    current_event_card: Option<EventCardId>,
    turn: TurnNumber,
    winner: Option<Team>,
    phase_cache: PhaseCache,
    log: Vec<LogRecord>,
    sequence: u64,
    pending_instruction: Option<Instruction>,
    #[serde(skip, default = "default_observer")]
    observer: Box<dyn StateChangeObserver>,
}

fn default_observer() -> Box<dyn StateChangeObserver> {
    Box::new(NullObserver)
}

impl Session {
    /// Validates `config` and starts a new session, recording its single
    /// [LogEntry::GameStarted] entry. Mirrors the teacher's
    /// `GameCreationPipeline`: configuration errors are host-facing
    /// ([EngineError]), never [utils::outcome::Fatal].
    pub fn new(config: SessionConfig) -> Result<Session, EngineError> {
        config.validate().map_err(|reason| EngineError::InvalidInput { reason })?;
        let mut session = Session {
            id: SessionId::new(),
            seating_order: Vec::new(),
            players: SlotMap::with_key(),
            roles_in_play: Vec::new(),
            event_deck: Vec::new(),
            current_event_card: None,
            turn: TurnNumber::NOT_STARTED,
            winner: None,
            phase_cache: PhaseCache::default(),
            log: Vec::new(),
            sequence: 0,
            pending_instruction: None,
            observer: Box::new(NullObserver),
        };
        session
            .register_log_entry(LogEntry::GameStarted {
                player_names: config.player_names,
                roles_in_play: config.roles_in_play,
                event_deck: config.event_deck,
            })
            .map_err(|fatal| EngineError::InvalidOperation { reason: fatal.to_string() })?;
        Ok(session)
    }

    pub fn set_observer(&mut self, observer: Box<dyn StateChangeObserver>) {
        self.observer = observer;
    }

    /// The only entry point capable of mutating a player's or the game's
    /// state. Constructs a one-shot [Proxy], applies `entry` through it, and
    /// only then appends the entry and notifies the observer — so a `Fatal`
    /// panic inside `apply` (there is none today, but the shape allows for
    /// one) can never leave a half-applied entry in the log.
    pub fn register_log_entry(&mut self, entry: LogEntry) -> Outcome {
        {
            let mut proxy = Proxy {
                seating_order: &mut self.seating_order,
                players: &mut self.players,
                roles_in_play: &mut self.roles_in_play,
                event_deck: &mut self.event_deck,
                current_event_card: &mut self.current_event_card,
                turn: &mut self.turn,
                winner: &mut self.winner,
            };
            entry.apply(&mut proxy);
        }
        let record =
            LogRecord { entry, sequence: self.sequence, turn: self.turn, phase: self.phase_cache.main_phase() };
        self.sequence += 1;
        self.observer.on_log_entry(&record);
        self.log.push(record);
        OK
    }

    // ---- Internal command surface (§4.2) -------------------------------
    //
    // One method per `LogEntry` variant other than `GameStarted`, which only
    // ever happens once, inside `Session::new`. Called exclusively by the
    // `rules` crate's action handlers and night/vote resolvers, which are
    // expected to have already checked every rule-level precondition — these
    // methods do not re-validate (§4.1: "the mutator's narrow interface").

    pub fn assign_role(&mut self, player: PlayerId, role: RoleId) -> Outcome {
        self.register_log_entry(LogEntry::AssignRole { player, role })
    }

    pub fn record_night_action(
        &mut self,
        actor: PlayerId,
        kind: NightActionKind,
        target: Option<PlayerId>,
    ) -> Outcome {
        self.register_log_entry(LogEntry::NightAction { actor, kind, target })
    }

    pub fn apply_status_effect(&mut self, player: PlayerId, flag: SecondaryFlag) -> Outcome {
        self.register_log_entry(LogEntry::StatusEffectApplied { player, flag })
    }

    pub fn clear_status_effect(&mut self, player: PlayerId, flag: SecondaryFlag) -> Outcome {
        self.register_log_entry(LogEntry::StatusEffectCleared { player, flag })
    }

    pub fn eliminate_player(&mut self, player: PlayerId, reason: EliminationReason) -> Outcome {
        self.register_log_entry(LogEntry::PlayerEliminated { player, reason })
    }

    pub fn report_vote_outcome(&mut self, selection: Vec<PlayerId>) -> Outcome {
        self.register_log_entry(LogEntry::VoteOutcomeReported { selection })
    }

    pub fn resolve_vote(&mut self, eliminated: Option<PlayerId>) -> Outcome {
        self.register_log_entry(LogEntry::VoteResolved { eliminated })
    }

    pub fn record_victory(&mut self, team: Team) -> Outcome {
        self.register_log_entry(LogEntry::VictoryConditionMet { team })
    }

    pub fn appoint_sheriff(&mut self, player: PlayerId) -> Outcome {
        self.register_log_entry(LogEntry::SheriffAppointed { player })
    }

    pub fn draw_event_card(&mut self, card: EventCardId) -> Outcome {
        self.register_log_entry(LogEntry::EventCardDrawn { card })
    }

    pub fn devoted_servant_swap(&mut self, servant: PlayerId, source: PlayerId) -> Outcome {
        self.register_log_entry(LogEntry::DevotedServantSwap { servant, source })
    }

    pub fn link_lovers(&mut self, a: PlayerId, b: PlayerId) -> Outcome {
        self.register_log_entry(LogEntry::LoversLinked { a, b })
    }

    pub fn choose_wolf_hound_alignment(&mut self, player: PlayerId, group: RoleGroup) -> Outcome {
        self.register_log_entry(LogEntry::WolfHoundAlignmentChosen { player, group })
    }

    pub fn advance_turn(&mut self, turn: TurnNumber) -> Outcome {
        self.register_log_entry(LogEntry::TurnAdvanced { turn })
    }

    // ---- Phase-cache pass-throughs (§4.3) -------------------------------

    pub fn transition_main_phase(&mut self, phase: MainPhase) {
        self.phase_cache.transition_main_phase(phase);
    }

    pub fn transition_sub_phase(&mut self, sub_phase: SubPhaseTag) {
        self.phase_cache.transition_sub_phase(sub_phase);
    }

    #[must_use]
    pub fn try_enter_stage(&mut self, stage: StageTag) -> bool {
        self.phase_cache.try_enter_stage(stage)
    }

    pub fn complete_stage(&mut self) {
        self.phase_cache.complete_stage();
    }

    pub fn set_paused_listener(&mut self, listener: ListenerId, state: ListenerStateTag) {
        self.phase_cache.set_paused_listener(listener, state);
    }

    pub fn clear_paused_listener(&mut self) {
        self.phase_cache.clear_paused_listener();
    }

    pub fn set_hook_listener_index(&mut self, index: usize) {
        self.phase_cache.set_hook_listener_index(index);
    }

    pub fn set_pending_instruction(&mut self, instruction: Option<Instruction>) {
        self.pending_instruction = instruction;
    }

    pub fn acknowledge_game_over(&mut self) {
        self.phase_cache.acknowledge_game_over();
    }

    // ---- Read-only projections ------------------------------------------

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn seating_order(&self) -> &[PlayerId] {
        &self.seating_order
    }

    pub fn roles_in_play(&self) -> &[RoleId] {
        &self.roles_in_play
    }

    pub fn event_deck(&self) -> &[EventCardId] {
        &self.event_deck
    }

    pub fn current_event_card(&self) -> Option<EventCardId> {
        self.current_event_card
    }

    pub fn turn(&self) -> TurnNumber {
        self.turn
    }

    pub fn winner(&self) -> Option<Team> {
        self.winner
    }

    pub fn player(&self, id: PlayerId) -> Option<&PlayerState> {
        self.players.get(id)
    }

    pub fn players(&self) -> impl Iterator<Item = &PlayerState> {
        self.seating_order.iter().filter_map(|id| self.players.get(*id))
    }

    pub fn phase_cache(&self) -> &PhaseCache {
        &self.phase_cache
    }

    pub fn main_phase(&self) -> MainPhase {
        self.phase_cache.main_phase()
    }

    pub fn pending_instruction(&self) -> Option<&Instruction> {
        self.pending_instruction.as_ref()
    }

    pub fn log(&self) -> &[LogRecord] {
        &self.log
    }
}

/// One-shot mutator bound to a single [Session::register_log_entry] call.
/// Its fields are exactly the subset of the kernel's state that some
/// [LogEntry] variant needs to touch — there is no field here a `LogEntry`
/// couldn't already reach through [SessionMutator], so this type adds no
/// capability beyond what the trait already grants.
struct Proxy<'a> {
    seating_order: &'a mut Vec<PlayerId>,
    players: &'a mut SlotMap<PlayerId, PlayerState>,
    roles_in_play: &'a mut Vec<RoleId>,
    event_deck: &'a mut Vec<EventCardId>,
    current_event_card: &'a mut Option<EventCardId>,
    turn: &'a mut TurnNumber,
    winner: &'a mut Option<Team>,
}

impl SessionMutator for Proxy<'_> {
    fn initialize_game(
        &mut self,
        player_names: Vec<String>,
        roles_in_play: Vec<RoleId>,
        event_deck: Vec<EventCardId>,
    ) {
        for name in player_names {
            let id = self.players.insert_with_key(|id| PlayerState::new(id, name));
            self.seating_order.push(id);
        }
        *self.roles_in_play = roles_in_play;
        *self.event_deck = event_deck;
    }

    fn set_turn_number(&mut self, turn: TurnNumber) {
        *self.turn = turn;
    }

    fn set_player_role(&mut self, player: PlayerId, role: RoleId) {
        if let Some(state) = self.players.get_mut(player) {
            if state.role().is_none() {
                state.set_role(role);
            }
        }
    }

    fn set_player_health(&mut self, player: PlayerId, health: Health) {
        if let Some(state) = self.players.get_mut(player) {
            if state.is_alive() {
                state.set_health(health);
            }
        }
    }

    fn apply_status_effect(&mut self, player: PlayerId, flag: SecondaryFlag) {
        if let Some(state) = self.players.get_mut(player) {
            state.apply_flag(flag);
        }
    }

    fn clear_status_effect(&mut self, player: PlayerId, flag: SecondaryFlag) {
        if let Some(state) = self.players.get_mut(player) {
            state.clear_flag(flag);
        }
    }

    fn link_lovers(&mut self, a: PlayerId, b: PlayerId) {
        if let Some(state) = self.players.get_mut(a) {
            state.set_lover_partner(Some(b));
            state.apply_flag(SecondaryFlag::Lover);
        }
        if let Some(state) = self.players.get_mut(b) {
            state.set_lover_partner(Some(a));
            state.apply_flag(SecondaryFlag::Lover);
        }
    }

    fn set_vote_multiplier(&mut self, player: PlayerId, multiplier: u32) {
        if let Some(state) = self.players.get_mut(player) {
            state.set_vote_multiplier(multiplier);
        }
    }

    fn set_wild_child_model(&mut self, player: PlayerId, model: PlayerId) {
        if let Some(state) = self.players.get_mut(player) {
            state.set_wild_child_model(Some(model));
        }
    }

    fn increment_werewolf_attacks(&mut self, player: PlayerId) {
        if let Some(state) = self.players.get_mut(player) {
            state.increment_werewolf_attacks();
        }
    }

    fn set_wolf_hound_alignment(&mut self, player: PlayerId, group: RoleGroup) {
        if let Some(state) = self.players.get_mut(player) {
            state.set_wolf_hound_alignment(Some(group));
        }
    }

    fn swap_role(&mut self, servant: PlayerId, source: PlayerId) {
        let source_role = self.players.get(source).and_then(PlayerState::role);
        if let (Some(role), Some(state)) = (source_role, self.players.get_mut(servant)) {
            state.set_role(role);
        }
    }

    fn set_current_event_card(&mut self, card: Option<EventCardId>) {
        *self.current_event_card = card;
    }

    fn set_winner(&mut self, team: Team) {
        *self.winner = Some(team);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::primitives::RoleId;

    fn config(names: &[&str]) -> SessionConfig {
        let names: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        let roles = names.iter().map(|_| RoleId::SimpleVillager).collect();
        SessionConfig::new(names, roles)
    }

    #[test]
    fn new_session_creates_players_in_seating_order() {
        let session = Session::new(config(&["a", "b", "c", "d", "e"])).unwrap();
        assert_eq!(session.seating_order().len(), 5);
        assert_eq!(session.players().next().unwrap().name(), "a");
        assert_eq!(session.log().len(), 1);
    }

    #[test]
    fn eliminate_player_is_idempotent() {
        let mut session = Session::new(config(&["a", "b", "c", "d", "e"])).unwrap();
        let target = session.seating_order()[0];
        session.eliminate_player(target, EliminationReason::DayVote).unwrap();
        session.eliminate_player(target, EliminationReason::WerewolfAttack).unwrap();
        assert!(!session.player(target).unwrap().is_alive());
        assert_eq!(session.log().len(), 3);
    }

    #[test]
    fn stage_pass_through_does_not_touch_log() {
        let mut session = Session::new(config(&["a", "b", "c", "d", "e"])).unwrap();
        let before = session.log().len();
        assert!(session.try_enter_stage(StageTag::new("night_fall")));
        session.complete_stage();
        assert_eq!(session.log().len(), before);
    }

    #[test]
    fn rejects_configs_with_too_few_players() {
        assert!(Session::new(config(&["a", "b"])).is_err());
    }
}
