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

use crate::core::numerics::TurnNumber;
use crate::core::primitives::{EliminationReason, EventCardId, PlayerId, RoleGroup, RoleId, Team};
use crate::core::secondary_flag::SecondaryFlag;
use crate::phase::phase_cache::MainPhase;
use crate::player_states::player_state::Health;
use crate::session::mutator::SessionMutator;

/// What kind of choice a player made during the night, carried on
/// [LogEntry::NightAction]. This is the non-deterministic record of what the
/// moderator reported; the night resolver (§4.9) reads these to compute
/// eliminations, it is not itself a state mutation.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum NightActionKind {
    WerewolfTarget,
    SeerInspect,
}

/// Tagged sum of every append-only event in a session's log, per §3/§4.1.
///
/// Every variant owns its `apply`, which mutates state only through the
/// narrow [SessionMutator] interface and is pure with respect to the log
/// list itself — appending is the kernel's job, not the entry's.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LogEntry {
    GameStarted {
        player_names: Vec<String>,
        roles_in_play: Vec<RoleId>,
        event_deck: Vec<EventCardId>,
    },
    AssignRole {
        player: PlayerId,
        role: RoleId,
    },
    NightAction {
        actor: PlayerId,
        kind: NightActionKind,
        target: Option<PlayerId>,
    },
    StatusEffectApplied {
        player: PlayerId,
        flag: SecondaryFlag,
    },
    StatusEffectCleared {
        player: PlayerId,
        flag: SecondaryFlag,
    },
    PlayerEliminated {
        player: PlayerId,
        reason: EliminationReason,
    },
    VoteOutcomeReported {
        selection: Vec<PlayerId>,
    },
    VoteResolved {
        eliminated: Option<PlayerId>,
    },
    VictoryConditionMet {
        team: Team,
    },
    SheriffAppointed {
        player: PlayerId,
    },
    EventCardDrawn {
        card: EventCardId,
    },
    DevotedServantSwap {
        servant: PlayerId,
        source: PlayerId,
    },
    LoversLinked {
        a: PlayerId,
        b: PlayerId,
    },
    WolfHoundAlignmentChosen {
        player: PlayerId,
        group: RoleGroup,
    },
    TurnAdvanced {
        turn: TurnNumber,
    },
}

impl LogEntry {
    /// Applies this entry's effect through the narrow mutator interface.
    /// Pure with respect to the log list: callers are responsible for
    /// appending `self` once this returns successfully (`kernel::Session::
    /// register_log_entry` is the only caller in this codebase).
    pub fn apply<M: SessionMutator>(&self, mutator: &mut M) {
        match self {
            LogEntry::GameStarted { player_names, roles_in_play, event_deck } => {
                mutator.initialize_game(
                    player_names.clone(),
                    roles_in_play.clone(),
                    event_deck.clone(),
                );
            }
            LogEntry::AssignRole { player, role } => {
                mutator.set_player_role(*player, *role);
            }
            LogEntry::NightAction { .. } => {
                // Purely a moderator-reported record; the night resolver
                // reads the log for these rather than any mutated field.
            }
            LogEntry::StatusEffectApplied { player, flag } => {
                mutator.apply_status_effect(*player, *flag);
            }
            LogEntry::StatusEffectCleared { player, flag } => {
                mutator.clear_status_effect(*player, *flag);
            }
            LogEntry::PlayerEliminated { player, .. } => {
                mutator.set_player_health(*player, Health::Dead);
            }
            LogEntry::VoteOutcomeReported { .. } | LogEntry::VoteResolved { .. } => {
                // Audit-trail records; the consequential elimination (if
                // any) is its own separate `PlayerEliminated` entry.
            }
            LogEntry::VictoryConditionMet { team } => {
                mutator.set_winner(*team);
            }
            LogEntry::SheriffAppointed { player } => {
                mutator.apply_status_effect(*player, SecondaryFlag::Sheriff);
                mutator.set_vote_multiplier(*player, crate::core::numerics::SHERIFF_VOTE_MULTIPLIER);
            }
            LogEntry::EventCardDrawn { card } => {
                mutator.set_current_event_card(Some(*card));
            }
            LogEntry::DevotedServantSwap { servant, source } => {
                mutator.swap_role(*servant, *source);
            }
            LogEntry::LoversLinked { a, b } => {
                mutator.link_lovers(*a, *b);
            }
            LogEntry::WolfHoundAlignmentChosen { player, group } => {
                mutator.set_wolf_hound_alignment(*player, *group);
            }
            LogEntry::TurnAdvanced { turn } => {
                mutator.set_turn_number(*turn);
            }
        }
    }

    /// Human-readable summary for the diagnostic observer (§4.1). Never
    /// consulted by game logic.
    pub fn summary(&self) -> String {
        match self {
            LogEntry::GameStarted { player_names, .. } => {
                format!("Game started with {} players", player_names.len())
            }
            LogEntry::AssignRole { player, role } => format!("{player:?} assigned role {role:?}"),
            LogEntry::NightAction { actor, kind, target } => {
                format!("{actor:?} performed {kind:?} on {target:?}")
            }
            LogEntry::StatusEffectApplied { player, flag } => {
                format!("{player:?} gained status {flag:?}")
            }
            LogEntry::StatusEffectCleared { player, flag } => {
                format!("{player:?} lost status {flag:?}")
            }
            LogEntry::PlayerEliminated { player, reason } => {
                format!("{player:?} eliminated ({reason:?})")
            }
            LogEntry::VoteOutcomeReported { selection } => {
                format!("Vote outcome reported: {selection:?}")
            }
            LogEntry::VoteResolved { eliminated } => format!("Vote resolved: {eliminated:?}"),
            LogEntry::VictoryConditionMet { team } => format!("Victory: {team:?}"),
            LogEntry::SheriffAppointed { player } => format!("{player:?} appointed Sheriff"),
            LogEntry::EventCardDrawn { card } => format!("Event card drawn: {}", card.0),
            LogEntry::DevotedServantSwap { servant, source } => {
                format!("{servant:?} swapped roles with {source:?}")
            }
            LogEntry::LoversLinked { a, b } => format!("{a:?} and {b:?} linked as lovers"),
            LogEntry::WolfHoundAlignmentChosen { player, group } => {
                format!("{player:?} aligned with {group:?}")
            }
            LogEntry::TurnAdvanced { turn } => format!("Turn advanced to {}", turn.0),
        }
    }
}

/// A single entry in a session's log, with the common metadata named in §3:
/// a timestamp, the turn number, and the phase at the time of recording.
///
/// `sequence` is a logical clock (the position this entry was appended at)
/// rather than a wall-clock timestamp, so that replay determinism (§8's
/// "Replay equivalence" property) never depends on when a test happens to
/// run. Ordering is exactly `register_log_entry` call order (§5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    pub entry: LogEntry,
    pub sequence: u64,
    pub turn: TurnNumber,
    pub phase: MainPhase,
}
