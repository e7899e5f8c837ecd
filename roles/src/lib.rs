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

pub mod hunter;
pub mod seer;
pub mod villager;
pub mod werewolf;

use rules::listener::Listener;

/// Builds a fresh listener for each role that reacts to a hook. A
/// [Listener] carries no state of its own across calls, but the
/// [rules::hooks::HookRegistry] still needs a fresh trait object per
/// firing since listeners are stored behind factories, not singletons.
pub fn werewolf_factory() -> Box<dyn Listener> {
    Box::new(werewolf::Werewolf)
}

pub fn seer_factory() -> Box<dyn Listener> {
    Box::new(seer::Seer)
}

pub fn hunter_factory() -> Box<dyn Listener> {
    Box::new(hunter::Hunter)
}
