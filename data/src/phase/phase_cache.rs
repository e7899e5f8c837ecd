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

use crate::core::primitives::Team;
use crate::phase::tags::{ListenerId, ListenerStateTag, StageTag, SubPhaseTag};

/// The coarse beats of a session, per the Glossary.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum MainPhase {
    Setup,
    Night,
    Dawn,
    Day,
    GameOver { winner: Team },
}

impl MainPhase {
    /// Strips the data carried by [MainPhase::GameOver], for declaring
    /// allowed-transition tables and dispatching to a phase manager without
    /// needing a concrete `Team` at table-construction time.
    pub fn kind(&self) -> MainPhaseKind {
        match self {
            MainPhase::Setup => MainPhaseKind::Setup,
            MainPhase::Night => MainPhaseKind::Night,
            MainPhase::Dawn => MainPhaseKind::Dawn,
            MainPhase::Day => MainPhaseKind::Day,
            MainPhase::GameOver { .. } => MainPhaseKind::GameOver,
        }
    }
}

/// [MainPhase] without its payload, used by §4.6's "legal next main-phase
/// tags" tables and phase-table dispatch.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum MainPhaseKind {
    Setup,
    Night,
    Dawn,
    Day,
    GameOver,
}

/// Tracks the current main phase, sub-phase, currently executing stage,
/// completed stages, and the single paused listener, per §4.3.
///
/// All mutation goes through the methods below, which are invoked only by
/// the phase machine and hook registry in the `rules` crate — never
/// directly by listeners.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseCache {
    main_phase: MainPhase,
    sub_phase: Option<SubPhaseTag>,
    stage: Option<StageTag>,
    completed_stages: Vec<StageTag>,
    paused_listener: Option<ListenerId>,
    paused_listener_state: Option<ListenerStateTag>,
    /// Index into the current hook's ordered listener list to resume from.
    /// Cleared whenever the stage exits, entered fresh when a `HookStage`
    /// begins executing. See SPEC_FULL.md's resolution of the "instruction
    /// identity of the paused-listener announcement" open question: this is
    /// what lets the hook dispatcher resume past an already-`Complete`d
    /// listener after an announcement is shown.
    hook_listener_index: Option<usize>,
    /// Set once the moderator has acknowledged the `FinishedGameConfirmation`
    /// for this session's `GameOver`. Distinct from `pending_instruction`
    /// being cleared (which also happens on every other resolved
    /// instruction) so the flow controller can tell a genuine first arrival
    /// into `GameOver` apart from a stray call after the game has already
    /// ended.
    game_over_acknowledged: bool,
}

impl Default for PhaseCache {
    fn default() -> Self {
        Self {
            main_phase: MainPhase::Setup,
            sub_phase: None,
            stage: None,
            completed_stages: vec![],
            paused_listener: None,
            paused_listener_state: None,
            hook_listener_index: None,
            game_over_acknowledged: false,
        }
    }
}

impl PhaseCache {
    pub fn main_phase(&self) -> MainPhase {
        self.main_phase
    }

    pub fn sub_phase(&self) -> Option<SubPhaseTag> {
        self.sub_phase
    }

    pub fn stage(&self) -> Option<StageTag> {
        self.stage
    }

    pub fn completed_stages(&self) -> &[StageTag] {
        &self.completed_stages
    }

    /// Sets the current main phase; clears sub-phase, stage, completed
    /// stages, the paused listener, and its internal state (§4.3).
    ///
    /// `pub(crate)`: only reachable through `session::kernel::Session`'s
    /// pass-through, which is the single funnel the phase machine in the
    /// `rules` crate mutates through.
    pub(crate) fn transition_main_phase(&mut self, phase: MainPhase) {
        self.main_phase = phase;
        self.sub_phase = None;
        self.stage = None;
        self.completed_stages.clear();
        self.paused_listener = None;
        self.paused_listener_state = None;
        self.hook_listener_index = None;
        self.game_over_acknowledged = false;
    }

    /// Sets the current sub-phase; clears stage and completed stages. Does
    /// *not* clear the paused listener — sub-phase transitions only happen
    /// after a listener completed (§4.3).
    pub(crate) fn transition_sub_phase(&mut self, sub_phase: SubPhaseTag) {
        self.sub_phase = Some(sub_phase);
        self.stage = None;
        self.completed_stages.clear();
    }

    /// Returns false if `stage` is the current stage (re-entry) or already
    /// completed for this sub-phase activation; otherwise marks it current
    /// and returns true. This is what guarantees invariant: "a stage is
    /// executed at most once per sub-phase activation."
    #[must_use]
    pub(crate) fn try_enter_stage(&mut self, stage: StageTag) -> bool {
        if self.stage == Some(stage) || self.completed_stages.contains(&stage) {
            return false;
        }
        self.stage = Some(stage);
        true
    }

    /// Appends the current stage to the completed list and clears it.
    pub(crate) fn complete_stage(&mut self) {
        if let Some(stage) = self.stage.take() {
            self.completed_stages.push(stage);
        }
        self.hook_listener_index = None;
    }

    pub(crate) fn set_paused_listener(&mut self, listener: ListenerId, state: ListenerStateTag) {
        self.paused_listener = Some(listener);
        self.paused_listener_state = Some(state);
    }

    pub(crate) fn clear_paused_listener(&mut self) {
        self.paused_listener = None;
        self.paused_listener_state = None;
    }

    pub fn paused_listener(&self) -> Option<ListenerId> {
        self.paused_listener
    }

    pub fn paused_listener_state(&self) -> Option<ListenerStateTag> {
        self.paused_listener_state
    }

    pub fn hook_listener_index(&self) -> Option<usize> {
        self.hook_listener_index
    }

    pub(crate) fn set_hook_listener_index(&mut self, index: usize) {
        self.hook_listener_index = Some(index);
    }

    pub fn game_over_acknowledged(&self) -> bool {
        self.game_over_acknowledged
    }

    pub(crate) fn acknowledge_game_over(&mut self) {
        self.game_over_acknowledged = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::tags::Tag;

    #[test]
    fn stage_runs_at_most_once_per_activation() {
        let mut cache = PhaseCache::default();
        let stage = Tag::new("start");
        assert!(cache.try_enter_stage(stage));
        assert!(!cache.try_enter_stage(stage));
        cache.complete_stage();
        assert!(!cache.try_enter_stage(stage));
    }

    #[test]
    fn main_phase_transition_clears_paused_listener() {
        let mut cache = PhaseCache::default();
        cache.set_paused_listener(
            ListenerId::new(crate::phase::tags::ListenerKind::MainRole, "werewolf"),
            Tag::new("awaiting_target"),
        );
        cache.transition_main_phase(MainPhase::Dawn);
        assert!(cache.paused_listener().is_none());
    }

    #[test]
    fn sub_phase_transition_preserves_paused_listener() {
        let mut cache = PhaseCache::default();
        cache.set_paused_listener(
            ListenerId::new(crate::phase::tags::ListenerKind::MainRole, "werewolf"),
            Tag::new("awaiting_target"),
        );
        cache.transition_sub_phase(Tag::new("action_loop"));
        assert!(cache.paused_listener().is_some());
    }
}
