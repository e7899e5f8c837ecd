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
use data::log::log_entry::NightActionKind;
use data::phase::tags::{ListenerId, ListenerKind};
use data::session::kernel::Session;
use rules::listener::StandardNightRole;

/// A read-only probe: the seer names a target, the moderator privately
/// reveals that player's actual role to them at the table, and the engine
/// records only that the inspection happened — it never learns the
/// inspected role itself, since nothing downstream needs it.
pub struct Seer;

impl StandardNightRole for Seer {
    fn listener_id(&self) -> ListenerId {
        ListenerId::new(ListenerKind::MainRole, "seer")
    }

    fn role(&self) -> RoleId {
        RoleId::Seer
    }

    fn night_action_kind(&self) -> NightActionKind {
        NightActionKind::SeerInspect
    }

    fn prompt(&self) -> &'static str {
        "The seer wakes and chooses a player to inspect."
    }

    fn selectable_targets(&self, session: &Session, actor: PlayerId) -> Vec<PlayerId> {
        session.players().filter(|p| p.is_alive() && p.id() != actor).map(|p| p.id()).collect()
    }
}

#[cfg(test)]
mod tests {
    use data::session::config::SessionConfig;

    use super::*;

    #[test]
    fn selectable_targets_exclude_only_self() {
        let names = vec!["a".to_string(), "b".to_string(), "c".to_string(), "d".to_string(), "e".to_string()];
        let roles = vec![RoleId::SimpleVillager; 5];
        let mut session = Session::new(SessionConfig::new(names, roles)).unwrap();
        let ids = session.seating_order().to_vec();
        session.assign_role(ids[1], RoleId::Werewolf).unwrap();
        let targets = Seer.selectable_targets(&session, ids[0]);
        assert_eq!(targets, vec![ids[1], ids[2], ids[3], ids[4]]);
    }
}
