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

use data::core::primitives::{PlayerId, RoleId};
use data::error::EngineError;
use data::log::log_entry::NightActionKind;
use data::phase::tags::{ListenerId, ListenerKind};
use data::session::kernel::Session;
use rules::listener::StandardNightRole;

/// The werewolves' shared night action: choose one victim, recorded as a
/// single `NightAction` on behalf of the pack rather than per-player.
pub struct Werewolf;

impl StandardNightRole for Werewolf {
    fn listener_id(&self) -> ListenerId {
        ListenerId::new(ListenerKind::MainRole, "werewolf")
    }

    fn role(&self) -> RoleId {
        RoleId::Werewolf
    }

    fn night_action_kind(&self) -> NightActionKind {
        NightActionKind::WerewolfTarget
    }

    fn prompt(&self) -> &'static str {
        "The werewolves wake and choose their victim."
    }

    fn selectable_targets(&self, session: &Session, actor: PlayerId) -> Vec<PlayerId> {
        session
            .players()
            .filter(|p| p.is_alive() && p.id() != actor && p.role() != Some(RoleId::Werewolf))
            .map(|p| p.id())
            .collect()
    }

    fn validate_target(&self, session: &Session, _actor: PlayerId, target: Option<PlayerId>) -> Result<(), EngineError> {
        if let Some(target) = target {
            if session.player(target).and_then(|p| p.role()) == Some(RoleId::Werewolf) {
                return Err(EngineError::RuleViolation {
                    reason: "werewolves cannot attack one of their own".into(),
                });
            }
        }
        Ok(())
    }
}
