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

use data::error::{verify_fatal, EngineResult, ProcessError};
use data::instructions::instruction::Instruction;
use data::instructions::response::Response;
use data::phase::phase_cache::{MainPhase, MainPhaseKind};
use data::phase::tags::{HookId, StageTag, SubPhaseTag};
use data::session::kernel::Session;

use crate::hooks::{HookOutcome, HookRegistry};

/// Where a sub-phase's terminal stage sends control next, per §4.6.
pub enum NavigationResult {
    /// Reset this sub-phase's stages and run it again from the top (its
    /// `completed_stages` are cleared but its tag is unchanged).
    StayInSubPhase,
    SubPhaseTransition(SubPhaseTag),
    MainPhaseTransition(MainPhase),
}

/// What a [LogicFn] or a hook-firing stage produced this call.
pub enum StageOutcome {
    Complete,
    NeedInput(Instruction),
}

pub type LogicFn = fn(&mut Session, Option<&Response>) -> EngineResult<StageOutcome>;
pub type NavigationFn = fn(&Session) -> NavigationResult;

/// The three atomic stage shapes named in §4.6: pure computation, a named
/// hook firing, and a terminal decision about where the sub-phase goes next.
pub enum StageKind {
    Logic(LogicFn),
    Hook(HookId),
    Navigation(NavigationFn),
}

pub struct StageDef {
    pub tag: StageTag,
    pub kind: StageKind,
}

impl StageDef {
    pub const fn logic(tag: StageTag, f: LogicFn) -> Self {
        Self { tag, kind: StageKind::Logic(f) }
    }

    pub const fn hook(tag: StageTag, hook: HookId) -> Self {
        Self { tag, kind: StageKind::Hook(hook) }
    }

    pub const fn navigation(tag: StageTag, f: NavigationFn) -> Self {
        Self { tag, kind: StageKind::Navigation(f) }
    }
}

pub enum SubPhaseOutcome {
    NeedInput(Instruction),
    Navigate(NavigationResult),
}

/// A declarative, ordered list of stages making up one sub-phase, per §4.6.
///
/// `allowed_next_sub_phases`/`allowed_next_main_phases` are the set of legal
/// targets its own navigation stage may produce — not every tag anywhere in
/// the phase table, just this sub-phase's legal successors. `execute`
/// validates every navigation result against them before returning it; a
/// target outside both sets is a programmer error (§4.6's runtime guarantee).
pub struct SubPhaseManager {
    pub tag: SubPhaseTag,
    pub stages: Vec<StageDef>,
    pub allowed_next_sub_phases: &'static [SubPhaseTag],
    pub allowed_next_main_phases: &'static [MainPhaseKind],
}

impl SubPhaseManager {
    /// Runs this sub-phase's stages in order, resuming mid-stage if the
    /// session's phase cache says we already entered one.
    ///
    /// A stage whose tag matches `phase_cache.stage()` is resuming — it
    /// bypasses `try_enter_stage` (which would otherwise reject it as
    /// already-current) and is handed `response` directly. A stage already
    /// present in `completed_stages` is skipped outright. Every other stage
    /// enters fresh via `try_enter_stage`. `response` is only ever forwarded
    /// to the first stage actually run in a given `execute` call — every
    /// stage after that starts from nothing, since a fresh stage can't have
    /// been the one awaiting a moderator's answer.
    pub fn execute(
        &self,
        session: &mut Session,
        hooks: &HookRegistry,
        response: Option<&Response>,
    ) -> EngineResult<SubPhaseOutcome> {
        let mut response = response;

        for stage in &self.stages {
            let is_resuming = session.phase_cache().stage() == Some(stage.tag);
            if !is_resuming && !session.try_enter_stage(stage.tag) {
                continue;
            }

            match &stage.kind {
                StageKind::Logic(f) => match f(session, response)? {
                    StageOutcome::Complete => session.complete_stage(),
                    StageOutcome::NeedInput(instruction) => {
                        return Ok(SubPhaseOutcome::NeedInput(instruction))
                    }
                },
                StageKind::Hook(hook) => match hooks.fire(session, *hook, response)? {
                    HookOutcome::Complete => session.complete_stage(),
                    HookOutcome::NeedInput(instruction) => {
                        return Ok(SubPhaseOutcome::NeedInput(instruction))
                    }
                },
                StageKind::Navigation(f) => {
                    let navigation = f(session);
                    session.complete_stage();
                    self.validate_navigation(&navigation)?;
                    return Ok(SubPhaseOutcome::Navigate(navigation));
                }
            }
            response = None;
        }

        Err(ProcessError::fatal(format!(
            "sub-phase {} fell through its stage list without reaching a navigation stage",
            self.tag
        )))
    }

    /// Checks `navigation` against this sub-phase's declared allowed sets.
    /// `StayInSubPhase` is always legal — it re-enters `self`, never another
    /// tag.
    fn validate_navigation(&self, navigation: &NavigationResult) -> EngineResult<()> {
        match navigation {
            NavigationResult::StayInSubPhase => Ok(()),
            NavigationResult::SubPhaseTransition(next) => verify_fatal(
                self.allowed_next_sub_phases.contains(next),
                format!("sub-phase {} is not a legal successor of {}", next, self.tag),
            ),
            NavigationResult::MainPhaseTransition(next) => verify_fatal(
                self.allowed_next_main_phases.contains(&next.kind()),
                format!("main phase {:?} is not a legal successor of sub-phase {}", next.kind(), self.tag),
            ),
        }
    }
}

pub enum PhaseOutcome {
    NeedInput(Instruction),
    MainPhaseTransition(MainPhase),
}

/// The ordered sub-phase tables for one main phase, per §4.6's `PhaseManager::process` loop.
pub struct PhaseManager {
    pub kind: MainPhaseKind,
    pub sub_phases: Vec<SubPhaseManager>,
}

impl PhaseManager {
    fn sub_phase(&self, tag: SubPhaseTag) -> EngineResult<&SubPhaseManager> {
        self.sub_phases
            .iter()
            .find(|sp| sp.tag == tag)
            .ok_or_else(|| ProcessError::fatal(format!("no sub-phase {tag} registered for this main phase")))
    }

    /// Drives sub-phases forward until a stage needs moderator input or the
    /// main phase itself transitions, entering the first declared sub-phase
    /// if none is current yet.
    pub fn process(
        &self,
        session: &mut Session,
        hooks: &HookRegistry,
        response: Option<&Response>,
    ) -> EngineResult<PhaseOutcome> {
        verify_fatal(!self.sub_phases.is_empty(), "phase manager has no sub-phases declared")?;

        if session.phase_cache().sub_phase().is_none() {
            session.transition_sub_phase(self.sub_phases[0].tag);
        }

        let mut response = response;
        loop {
            let tag = session
                .phase_cache()
                .sub_phase()
                .ok_or_else(|| ProcessError::fatal("sub-phase unexpectedly cleared mid-process"))?;
            let manager = self.sub_phase(tag)?;

            match manager.execute(session, hooks, response)? {
                SubPhaseOutcome::NeedInput(instruction) => return Ok(PhaseOutcome::NeedInput(instruction)),
                SubPhaseOutcome::Navigate(NavigationResult::StayInSubPhase) => {
                    session.transition_sub_phase(tag);
                }
                SubPhaseOutcome::Navigate(NavigationResult::SubPhaseTransition(next)) => {
                    session.transition_sub_phase(next);
                }
                SubPhaseOutcome::Navigate(NavigationResult::MainPhaseTransition(next)) => {
                    return Ok(PhaseOutcome::MainPhaseTransition(next));
                }
            }
            response = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use data::core::primitives::Team;
    use data::phase::tags::Tag;

    use super::*;

    const VOTE: Tag = Tag::new("vote");
    const REVEAL: Tag = Tag::new("reveal");
    const FINALIZE: Tag = Tag::new("finalize");

    fn manager() -> SubPhaseManager {
        SubPhaseManager {
            tag: VOTE,
            stages: vec![],
            allowed_next_sub_phases: &[REVEAL],
            allowed_next_main_phases: &[MainPhaseKind::Dawn],
        }
    }

    #[test]
    fn stay_in_sub_phase_is_always_legal() {
        assert!(manager().validate_navigation(&NavigationResult::StayInSubPhase).is_ok());
    }

    #[test]
    fn a_declared_sub_phase_transition_is_accepted() {
        let navigation = NavigationResult::SubPhaseTransition(REVEAL);
        assert!(manager().validate_navigation(&navigation).is_ok());
    }

    #[test]
    fn an_undeclared_sub_phase_transition_is_a_fatal_error() {
        let navigation = NavigationResult::SubPhaseTransition(FINALIZE);
        assert!(matches!(manager().validate_navigation(&navigation), Err(ProcessError::Fatal(_))));
    }

    #[test]
    fn a_declared_main_phase_transition_is_accepted() {
        let navigation = NavigationResult::MainPhaseTransition(MainPhase::Dawn);
        assert!(manager().validate_navigation(&navigation).is_ok());
    }

    #[test]
    fn an_undeclared_main_phase_transition_is_a_fatal_error() {
        let navigation = NavigationResult::MainPhaseTransition(MainPhase::GameOver { winner: Team::Villagers });
        assert!(matches!(manager().validate_navigation(&navigation), Err(ProcessError::Fatal(_))));
    }
}
