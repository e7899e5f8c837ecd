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

use serde::{Deserialize, Serialize};

use crate::core::primitives::{PlayerId, RoleId};
use crate::error::EngineError;
use crate::instructions::count_constraint::CountConstraint;
use crate::instructions::response::Response;

/// A request for moderator input, paired at response time with a [Response]
/// of the matching variant (§3, §4.4).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instruction {
    pub kind: InstructionKind,
    /// Announcement the moderator may read aloud to the table.
    pub public_announcement: Option<String>,
    /// Guidance shown only to the moderator.
    pub private_note: Option<String>,
}

impl Instruction {
    pub fn new(kind: InstructionKind) -> Self {
        Self { kind, public_announcement: None, private_note: None }
    }

    pub fn with_public(mut self, text: impl Into<String>) -> Self {
        self.public_announcement = Some(text.into());
        self
    }

    pub fn with_private(mut self, text: impl Into<String>) -> Self {
        self.private_note = Some(text.into());
        self
    }

    /// Validates a confirmation response against this instruction. Legal for
    /// `StartGameConfirmation`, `FinishedGameConfirmation`, and
    /// `Confirmation` — any boolean is accepted.
    pub fn create_confirmation(&self, value: bool) -> Result<Response, EngineError> {
        match &self.kind {
            InstructionKind::StartGameConfirmation
            | InstructionKind::FinishedGameConfirmation
            | InstructionKind::Confirmation => Ok(Response::Confirmation(value)),
            _ => Err(wrong_kind("Confirmation")),
        }
    }

    /// Validates a player-selection response: fails if the count falls
    /// outside this instruction's [CountConstraint], or any id isn't in the
    /// selectable set.
    pub fn create_player_selection(
        &self,
        selected: Vec<PlayerId>,
    ) -> Result<Response, EngineError> {
        let InstructionKind::SelectPlayers { selectable, count } = &self.kind else {
            return Err(wrong_kind("PlayerSelection"));
        };
        if !count.allows(selected.len()) {
            return Err(EngineError::InvalidInput {
                reason: format!(
                    "selected {} players, expected between {} and {:?}",
                    selected.len(),
                    count.min(),
                    count.max()
                ),
            });
        }
        if let Some(bad) = selected.iter().find(|id| !selectable.contains(id)) {
            return Err(EngineError::InvalidInput {
                reason: format!("{bad:?} is not in the selectable set"),
            });
        }
        Ok(Response::PlayerSelection(selected))
    }

    /// Validates a role-assignment response: fails if any id isn't in the
    /// instruction's target set, or any role isn't in its allowed multiset.
    pub fn create_role_assignment(
        &self,
        assignment: HashMap<PlayerId, RoleId>,
    ) -> Result<Response, EngineError> {
        let InstructionKind::AssignRoles { players, allowed_roles } = &self.kind else {
            return Err(wrong_kind("RoleAssignment"));
        };
        for (player, role) in &assignment {
            if !players.contains(player) {
                return Err(EngineError::InvalidInput {
                    reason: format!("{player:?} is not a target of this assignment"),
                });
            }
            if !allowed_roles.contains(role) {
                return Err(EngineError::InvalidInput {
                    reason: format!("{role:?} is not an allowed role for this assignment"),
                });
            }
        }
        Ok(Response::RoleAssignment(assignment))
    }

    /// Validates an option-selection response: fails if the option isn't in
    /// this instruction's option list.
    pub fn create_option_selection(&self, option: String) -> Result<Response, EngineError> {
        let InstructionKind::SelectOptions { options } = &self.kind else {
            return Err(wrong_kind("OptionSelection"));
        };
        if !options.contains(&option) {
            return Err(EngineError::InvalidInput {
                reason: format!("{option:?} is not an offered option"),
            });
        }
        Ok(Response::OptionSelection(option))
    }

    /// The variant name expected of a matching [Response], used to implement
    /// §4.8 step 3 (reject before any instruction-specific validation runs).
    pub fn expected_response_variant(&self) -> &'static str {
        match &self.kind {
            InstructionKind::StartGameConfirmation
            | InstructionKind::FinishedGameConfirmation
            | InstructionKind::Confirmation => "Confirmation",
            InstructionKind::SelectPlayers { .. } => "PlayerSelection",
            InstructionKind::AssignRoles { .. } => "RoleAssignment",
            InstructionKind::SelectOptions { .. } => "OptionSelection",
        }
    }
}

fn wrong_kind(expected: &str) -> EngineError {
    EngineError::InvalidInput { reason: format!("expected a response of kind {expected}") }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum InstructionKind {
    StartGameConfirmation,
    FinishedGameConfirmation,
    Confirmation,
    SelectPlayers { selectable: Vec<PlayerId>, count: CountConstraint },
    AssignRoles { players: Vec<PlayerId>, allowed_roles: Vec<RoleId> },
    SelectOptions { options: Vec<String> },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn players(n: usize) -> Vec<PlayerId> {
        let mut map = slotmap::SlotMap::<PlayerId, ()>::with_key();
        (0..n).map(|_| map.insert(())).collect()
    }

    #[test]
    fn single_optional_allows_empty_tie() {
        let ids = players(3);
        let instruction = Instruction::new(InstructionKind::SelectPlayers {
            selectable: ids.clone(),
            count: CountConstraint::single_optional(),
        });
        assert!(instruction.create_player_selection(vec![]).is_ok());
        assert!(instruction.create_player_selection(vec![ids[0]]).is_ok());
        assert!(instruction.create_player_selection(vec![ids[0], ids[1]]).is_err());
    }

    #[test]
    fn rejects_ids_outside_selectable_set() {
        // `outsider` must come from the same `SlotMap` as `ids`: two
        // independent slot maps both start their generation counter fresh,
        // so keys minted from separate maps can collide instead of being
        // genuinely foreign to each other.
        let mut all = players(3);
        let outsider = all.pop().unwrap();
        let instruction = Instruction::new(InstructionKind::SelectPlayers {
            selectable: all,
            count: CountConstraint::single(),
        });
        assert!(instruction.create_player_selection(vec![outsider]).is_err());
    }

    #[test]
    fn wrong_response_kind_rejected() {
        let instruction = Instruction::new(InstructionKind::Confirmation);
        assert!(instruction.create_player_selection(vec![]).is_err());
    }
}
