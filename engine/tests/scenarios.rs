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

use data::core::primitives::{EliminationReason, PlayerId, Team};
use engine::{EngineError, FlowOutcome, Instruction, InstructionKind, LogEntry, Response, RoleId, SessionConfig, SessionManager};

fn config(names: &[&str], roles: Vec<RoleId>) -> SessionConfig {
    SessionConfig::new(names.iter().map(|s| s.to_string()).collect(), roles)
}

fn awaiting(outcome: FlowOutcome) -> Instruction {
    match outcome {
        FlowOutcome::AwaitingInput(instruction) => instruction,
        FlowOutcome::GameOver(team) => panic!("expected to still be awaiting input, game already ended in {team:?}"),
    }
}

fn selectable(instruction: &Instruction) -> Vec<PlayerId> {
    match &instruction.kind {
        InstructionKind::SelectPlayers { selectable, .. } => selectable.clone(),
        other => panic!("expected a SelectPlayers instruction, got {other:?}"),
    }
}

struct Game {
    manager: SessionManager,
    id: data::core::primitives::SessionId,
}

impl Game {
    fn start(names: &[&str], roles: Vec<RoleId>) -> Self {
        let mut manager = SessionManager::new();
        let id = manager.start(config(names, roles)).unwrap();
        Self { manager, id }
    }

    fn send(&mut self, response: Option<Response>) -> FlowOutcome {
        self.manager.process(self.id, response).unwrap()
    }

    fn confirm(&mut self) -> FlowOutcome {
        self.send(Some(Response::Confirmation(true)))
    }

    fn select(&mut self, players: Vec<PlayerId>) -> FlowOutcome {
        self.send(Some(Response::PlayerSelection(players)))
    }

    fn log_entries(&self) -> Vec<LogEntry> {
        self.manager.log(self.id).unwrap().iter().map(|record| record.entry.clone()).collect()
    }
}

/// Base 5-player game: one Werewolf, one Seer, three Villagers.
///
/// Sequence mirrors the rulebook's literal seed: the village lynches the
/// werewolf the morning after it kills a villager, so the Villagers win.
#[test]
fn base_game_one_werewolf_one_seer_three_villagers() {
    let mut game = Game::start(
        &["w", "s", "v1", "v2", "v3"],
        vec![RoleId::Werewolf, RoleId::Seer, RoleId::SimpleVillager, RoleId::SimpleVillager, RoleId::SimpleVillager],
    );

    let start_confirmation = awaiting(game.send(None));
    assert!(matches!(start_confirmation.kind, InstructionKind::StartGameConfirmation));

    // Night 1: the werewolves identify, then choose a victim.
    let identify_wolf = awaiting(game.confirm());
    let wolf_candidates = selectable(&identify_wolf);
    let wolf = wolf_candidates[0];
    let act_wolf = awaiting(game.select(vec![wolf]));
    let wolf_targets = selectable(&act_wolf);
    let victim = *wolf_targets.last().unwrap();
    let wolf_asleep = awaiting(game.select(vec![victim]));
    assert!(matches!(wolf_asleep.kind, InstructionKind::Confirmation));

    // The seer identifies, then inspects a target (the response to the
    // wolf's "asleep" announcement is discarded, not redelivered to the seer).
    let identify_seer = awaiting(game.confirm());
    let seer_candidates = selectable(&identify_seer);
    let seer = seer_candidates[1];
    let act_seer = awaiting(game.select(vec![seer]));
    let seer_targets = selectable(&act_seer);
    let inspected = seer_targets[0];
    assert_eq!(inspected, wolf);
    let seer_asleep = awaiting(game.select(vec![inspected]));
    assert!(matches!(seer_asleep.kind, InstructionKind::Confirmation));

    // Dawn: the victim's role is revealed, then the day's debate and vote.
    let reveal = awaiting(game.confirm());
    let InstructionKind::AssignRoles { players, .. } = &reveal.kind else {
        panic!("expected an AssignRoles instruction, got {:?}", reveal.kind);
    };
    assert_eq!(players, &vec![victim]);
    let mut assignment = std::collections::HashMap::new();
    assignment.insert(victim, RoleId::SimpleVillager);
    let debate = awaiting(game.send(Some(Response::RoleAssignment(assignment))));
    assert!(matches!(debate.kind, InstructionKind::Confirmation));

    let vote = awaiting(game.confirm());
    let voters = selectable(&vote);
    assert!(voters.contains(&wolf));

    let finished = awaiting(game.select(vec![wolf]));
    assert!(matches!(finished.kind, InstructionKind::FinishedGameConfirmation));

    match game.confirm() {
        FlowOutcome::GameOver(Team::Villagers) => {}
        other => panic!("expected the villagers to win, got {other:?}"),
    }

    let log = game.log_entries();
    assert_eq!(log.iter().filter(|e| matches!(e, LogEntry::VictoryConditionMet { team: Team::Villagers })).count(), 1);
    let eliminations: Vec<_> = log
        .iter()
        .filter_map(|e| match e {
            LogEntry::PlayerEliminated { player, reason } => Some((*player, *reason)),
            _ => None,
        })
        .collect();
    assert_eq!(eliminations, vec![(victim, EliminationReason::WerewolfAttack), (wolf, EliminationReason::DayVote)]);
}

/// Once the moderator has acknowledged `FinishedGameConfirmation`, the
/// session is destroyed: a further call with the same id is refused rather
/// than re-emitting the confirmation or silently resuming.
#[test]
fn a_session_refuses_all_input_once_game_over_is_acknowledged() {
    let mut game = Game::start(
        &["w", "s", "v1", "v2", "v3"],
        vec![RoleId::Werewolf, RoleId::Seer, RoleId::SimpleVillager, RoleId::SimpleVillager, RoleId::SimpleVillager],
    );

    game.send(None);
    let identify_wolf = awaiting(game.confirm());
    let wolf = selectable(&identify_wolf)[0];
    let act_wolf = awaiting(game.select(vec![wolf]));
    let victim = *selectable(&act_wolf).last().unwrap();
    awaiting(game.select(vec![victim]));

    let identify_seer = awaiting(game.confirm());
    let seer = selectable(&identify_seer)[1];
    let act_seer = awaiting(game.select(vec![seer]));
    awaiting(game.select(vec![selectable(&act_seer)[0]]));

    let reveal = awaiting(game.confirm());
    let InstructionKind::AssignRoles { players, .. } = &reveal.kind else {
        panic!("expected an AssignRoles instruction, got {:?}", reveal.kind);
    };
    let mut assignment = std::collections::HashMap::new();
    assignment.insert(players[0], RoleId::SimpleVillager);
    awaiting(game.send(Some(Response::RoleAssignment(assignment))));

    let vote = awaiting(game.confirm());
    let voters = selectable(&vote);
    assert!(voters.contains(&wolf));
    let finished = awaiting(game.select(vec![wolf]));
    assert!(matches!(finished.kind, InstructionKind::FinishedGameConfirmation));

    match game.confirm() {
        FlowOutcome::GameOver(Team::Villagers) => {}
        other => panic!("expected the villagers to win, got {other:?}"),
    }

    // A third call with no response is the bug this regresses: it used to
    // re-emit the FinishedGameConfirmation instruction indefinitely instead
    // of refusing input once the game is already over.
    match game.manager.process(game.id, None) {
        Err(data::error::ProcessError::Recoverable(EngineError::InvalidOperation { .. })) => {}
        other => panic!("expected InvalidOperation for input after game over, got {other:?}"),
    }

    // The host can still read the finished game's log before tearing it down.
    assert!(!game.log_entries().is_empty());

    game.manager.destroy(game.id).unwrap();
    match game.manager.process(game.id, None) {
        Err(data::error::ProcessError::Recoverable(EngineError::GameNotFound)) => {}
        other => panic!("expected GameNotFound for a destroyed session, got {other:?}"),
    }
}

/// Two werewolves overwhelm a five-player table before any day vote happens:
/// once wolves are at parity with the village, the victory check at dawn
/// ends the game without ever entering the Day phase.
#[test]
fn two_werewolves_trigger_an_early_victory_at_dawn() {
    let mut game = Game::start(
        &["w1", "w2", "s", "v1", "v2"],
        vec![RoleId::Werewolf, RoleId::Werewolf, RoleId::Seer, RoleId::SimpleVillager, RoleId::SimpleVillager],
    );

    game.send(None);
    let identify_wolves = awaiting(game.confirm());
    let candidates = selectable(&identify_wolves);
    let wolves = vec![candidates[0], candidates[1]];
    let act_wolves = awaiting(game.select(wolves.clone()));
    let targets = selectable(&act_wolves);
    // Picked from the tail, not the head, so it can't collide with the
    // Seer's own identity pick below (the kill hasn't resolved yet at this
    // point in the night, so both picks draw from the same living pool).
    let victim = *targets.last().unwrap();
    let wolves_asleep = awaiting(game.select(vec![victim]));
    assert!(matches!(wolves_asleep.kind, InstructionKind::Confirmation));

    let identify_seer = awaiting(game.confirm());
    let seer_candidates = selectable(&identify_seer);
    let seer = *seer_candidates.iter().find(|p| !wolves.contains(p) && **p != victim).unwrap();
    let act_seer = awaiting(game.select(vec![seer]));
    let seer_targets = selectable(&act_seer);
    let seer_asleep = awaiting(game.select(vec![seer_targets[0]]));
    assert!(matches!(seer_asleep.kind, InstructionKind::Confirmation));

    let reveal = awaiting(game.confirm());
    let InstructionKind::AssignRoles { players, .. } = &reveal.kind else {
        panic!("expected an AssignRoles instruction, got {:?}", reveal.kind);
    };
    let mut assignment = std::collections::HashMap::new();
    assignment.insert(players[0], RoleId::SimpleVillager);

    match game.send(Some(Response::RoleAssignment(assignment))) {
        FlowOutcome::AwaitingInput(finished) => {
            assert!(matches!(finished.kind, InstructionKind::FinishedGameConfirmation));
        }
        other => panic!("expected a FinishedGameConfirmation before GameOver, got {other:?}"),
    }
    match game.confirm() {
        FlowOutcome::GameOver(Team::Werewolves) => {}
        other => panic!("expected the werewolves to win at dawn, got {other:?}"),
    }
}

/// A tied day vote eliminates nobody and the game moves straight into the
/// next night, with the turn counter incrementing only there.
#[test]
fn a_tied_vote_eliminates_nobody_and_turn_advances_on_the_next_night() {
    let mut game = Game::start(
        &["w", "s", "v1", "v2", "v3"],
        vec![RoleId::Werewolf, RoleId::Seer, RoleId::SimpleVillager, RoleId::SimpleVillager, RoleId::SimpleVillager],
    );

    game.send(None);
    let identify_wolf = awaiting(game.confirm());
    let wolf = selectable(&identify_wolf)[0];
    let act_wolf = awaiting(game.select(vec![wolf]));
    let victim = *selectable(&act_wolf).last().unwrap();
    awaiting(game.select(vec![victim]));

    let identify_seer = awaiting(game.confirm());
    let seer = selectable(&identify_seer)[1];
    let act_seer = awaiting(game.select(vec![seer]));
    let seer_asleep = awaiting(game.select(vec![selectable(&act_seer)[0]]));
    assert!(matches!(seer_asleep.kind, InstructionKind::Confirmation));

    let reveal = awaiting(game.confirm());
    let InstructionKind::AssignRoles { players, .. } = &reveal.kind else {
        panic!("expected an AssignRoles instruction, got {:?}", reveal.kind);
    };
    let mut assignment = std::collections::HashMap::new();
    assignment.insert(players[0], RoleId::SimpleVillager);
    awaiting(game.send(Some(Response::RoleAssignment(assignment))));

    let vote = awaiting(game.confirm());
    let _ = selectable(&vote);
    // An empty selection reports a tie: nobody is eliminated.
    // The turn counter has advanced, but the wolf already identified back on
    // turn 1, so the hook goes straight to its act prompt.
    let night_two_act = awaiting(game.select(vec![]));
    assert!(matches!(night_two_act.kind, InstructionKind::SelectPlayers { .. }));
}

/// After night 1 kills one villager and the day vote lynches another, the
/// wolf's selectable targets on night 2 exclude both corpses and the wolf
/// itself.
#[test]
fn dead_players_are_excluded_from_the_wolfs_next_selectable_targets() {
    let mut game = Game::start(
        &["w", "s", "v1", "v2", "v3"],
        vec![RoleId::Werewolf, RoleId::Seer, RoleId::SimpleVillager, RoleId::SimpleVillager, RoleId::SimpleVillager],
    );

    game.send(None);
    let identify_wolf = awaiting(game.confirm());
    let wolf = selectable(&identify_wolf)[0];
    let act_wolf = awaiting(game.select(vec![wolf]));
    let night_one_victim = *selectable(&act_wolf).last().unwrap();
    awaiting(game.select(vec![night_one_victim]));

    let identify_seer = awaiting(game.confirm());
    let seer = selectable(&identify_seer)[1];
    let act_seer = awaiting(game.select(vec![seer]));
    awaiting(game.select(vec![selectable(&act_seer)[0]]));

    let reveal = awaiting(game.confirm());
    let InstructionKind::AssignRoles { players, .. } = &reveal.kind else {
        panic!("expected an AssignRoles instruction, got {:?}", reveal.kind);
    };
    let mut assignment = std::collections::HashMap::new();
    assignment.insert(players[0], RoleId::SimpleVillager);
    awaiting(game.send(Some(Response::RoleAssignment(assignment))));

    let vote = awaiting(game.confirm());
    let living_at_vote = selectable(&vote);
    assert!(!living_at_vote.contains(&night_one_victim));
    let lynched = *living_at_vote.iter().find(|&&p| p != wolf).unwrap();

    let night_two_identify = awaiting(game.select(vec![lynched]));
    // the wolf already identified last turn, so the hook goes straight to
    // the wolf's act prompt rather than asking to identify again.
    let night_two_targets = selectable(&night_two_identify);
    assert!(!night_two_targets.contains(&wolf));
    assert!(!night_two_targets.contains(&night_one_victim));
    assert!(!night_two_targets.contains(&lynched));
}

/// Submitting a response of the wrong variant for the pending instruction is
/// rejected outright: the session's log and pending instruction are
/// untouched.
#[test]
fn wrong_response_variant_is_rejected_without_mutating_the_session() {
    let mut game = Game::start(
        &["w", "s", "v1", "v2", "v3"],
        vec![RoleId::Werewolf, RoleId::Seer, RoleId::SimpleVillager, RoleId::SimpleVillager, RoleId::SimpleVillager],
    );
    game.send(None);
    let identify_wolf = awaiting(game.confirm());
    assert!(matches!(identify_wolf.kind, InstructionKind::SelectPlayers { .. }));

    match game.manager.process(game.id, Some(Response::Confirmation(true))) {
        Err(data::error::ProcessError::Recoverable(EngineError::InvalidInput { .. })) => {}
        other => panic!("expected an InvalidInput error for a mismatched response variant, got {other:?}"),
    }

    let still_pending = game.manager.current_instruction(game.id).unwrap().unwrap();
    assert!(matches!(still_pending.kind, InstructionKind::SelectPlayers { .. }));
}

/// A Hunter killed by the werewolves takes a retaliatory shot as soon as
/// their role is revealed at dawn, before the day even begins.
#[test]
fn a_revealed_hunter_fires_back_on_the_way_out() {
    let mut game = Game::start(
        &["w", "h", "v1", "v2", "v3"],
        vec![RoleId::Werewolf, RoleId::Hunter, RoleId::SimpleVillager, RoleId::SimpleVillager, RoleId::SimpleVillager],
    );

    game.send(None);
    let identify_wolf = awaiting(game.confirm());
    let wolf = selectable(&identify_wolf)[0];
    let act_wolf = awaiting(game.select(vec![wolf]));
    let targets = selectable(&act_wolf);
    let victim = *targets.last().unwrap();
    let wolf_asleep = awaiting(game.select(vec![victim]));
    assert!(matches!(wolf_asleep.kind, InstructionKind::Confirmation));

    // No Seer in this roster, so the Seer's listener still asks to identify
    // its (empty) holder set before the night can finish.
    let identify_seer = awaiting(game.confirm());
    assert!(matches!(identify_seer.kind, InstructionKind::SelectPlayers { .. }));
    // No one holds the Seer role this game, so the listener completes
    // silently once told so, without a sleep announcement of its own.
    let reveal = awaiting(game.select(vec![]));
    let InstructionKind::AssignRoles { players, .. } = &reveal.kind else {
        panic!("expected an AssignRoles instruction, got {:?}", reveal.kind);
    };
    assert_eq!(players, &vec![victim]);
    let mut assignment = std::collections::HashMap::new();
    assignment.insert(victim, RoleId::Hunter);

    let shot_prompt = awaiting(game.send(Some(Response::RoleAssignment(assignment))));
    let retaliation_targets = selectable(&shot_prompt);
    assert!(!retaliation_targets.contains(&victim));
    assert!(!retaliation_targets.contains(&wolf) || wolf != victim);
    let retaliation_target = *retaliation_targets.iter().find(|&&p| p != wolf).unwrap();

    let reveal_retaliation = awaiting(game.select(vec![retaliation_target]));
    let InstructionKind::AssignRoles { players: second_players, .. } = &reveal_retaliation.kind else {
        panic!("expected an AssignRoles instruction for the Hunter's own victim, got {:?}", reveal_retaliation.kind);
    };
    assert_eq!(second_players, &vec![retaliation_target]);
    let mut second_assignment = std::collections::HashMap::new();
    second_assignment.insert(retaliation_target, RoleId::SimpleVillager);
    let debate = awaiting(game.send(Some(Response::RoleAssignment(second_assignment))));
    assert!(matches!(debate.kind, InstructionKind::Confirmation));

    let log = game.log_entries();
    let eliminations: Vec<_> = log
        .iter()
        .filter_map(|e| match e {
            LogEntry::PlayerEliminated { player, reason } => Some((*player, *reason)),
            _ => None,
        })
        .collect();
    assert_eq!(
        eliminations,
        vec![(victim, EliminationReason::WerewolfAttack), (retaliation_target, EliminationReason::HunterShot)]
    );
}

/// Serializing mid-game and rehydrating into a fresh manager produces a
/// session that continues identically to one that never took the detour.
#[test]
fn rehydration_mid_night_continues_identically() {
    let mut live = Game::start(
        &["w", "s", "v1", "v2", "v3"],
        vec![RoleId::Werewolf, RoleId::Seer, RoleId::SimpleVillager, RoleId::SimpleVillager, RoleId::SimpleVillager],
    );
    live.send(None);
    let identify_wolf = awaiting(live.confirm());
    let wolf = selectable(&identify_wolf)[0];
    let pending_act = awaiting(live.select(vec![wolf]));
    let targets = selectable(&pending_act);
    let victim = targets[0];

    let snapshot = live.manager.serialize(live.id).unwrap();
    let mut rehydrated_manager = SessionManager::new();
    let rehydrated_id = rehydrated_manager.rehydrate(&snapshot).unwrap();
    assert_eq!(rehydrated_id, live.id);

    let live_outcome = live.select(vec![victim]);
    let rehydrated_outcome =
        rehydrated_manager.process(rehydrated_id, Some(Response::PlayerSelection(vec![victim]))).unwrap();

    let debug = |o: &FlowOutcome| match o {
        FlowOutcome::AwaitingInput(i) => format!("{:?}", i.kind),
        FlowOutcome::GameOver(t) => format!("GameOver({t:?})"),
    };
    assert_eq!(debug(&live_outcome), debug(&rehydrated_outcome));
    assert_eq!(live.manager.serialize(live.id).unwrap(), rehydrated_manager.serialize(rehydrated_id).unwrap());
}
