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

/// The moderator's answer to a pending [crate::instructions::instruction::Instruction].
///
/// Constructed only through `InstructionKind::create_*`, which validate the
/// payload against the instruction that's pending (§4.4) — there is no public
/// constructor that bypasses that check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Response {
    Confirmation(bool),
    PlayerSelection(Vec<PlayerId>),
    RoleAssignment(HashMap<PlayerId, RoleId>),
    OptionSelection(String),
}

impl Response {
    /// Name of this response's variant, used to check it against the pending
    /// instruction's variant before anything else is validated (§4.8 step 3).
    pub fn variant_name(&self) -> &'static str {
        match self {
            Response::Confirmation(_) => "Confirmation",
            Response::PlayerSelection(_) => "PlayerSelection",
            Response::RoleAssignment(_) => "RoleAssignment",
            Response::OptionSelection(_) => "OptionSelection",
        }
    }
}
