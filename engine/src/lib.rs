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

//! The host-facing surface: wires the hook registry with every role's
//! listeners (the one place allowed to depend on both `rules` and `roles`),
//! and keeps a session table a host process can drive by id.

pub mod session_manager;

pub use data::core::primitives::{PlayerId, RoleId, SessionId, Team};
pub use data::error::{EngineError, EngineResult};
pub use data::instructions::instruction::{Instruction, InstructionKind};
pub use data::instructions::response::Response;
pub use data::log::log_entry::{LogEntry, LogRecord};
pub use data::session::config::SessionConfig;
pub use rules::flow::FlowOutcome;
pub use session_manager::SessionManager;
