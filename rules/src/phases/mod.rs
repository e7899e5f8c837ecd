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

pub mod dawn;
pub mod day;
pub mod night;
pub mod setup;

use std::collections::HashMap;

use data::phase::phase_cache::MainPhaseKind;

use crate::stage::PhaseManager;

/// Every main phase's declarative sub-phase table, keyed by [MainPhaseKind].
/// `GameOver` carries none: once a session reaches it, the flow controller
/// stops dispatching (§4.8).
pub fn all_phase_managers() -> HashMap<MainPhaseKind, PhaseManager> {
    let mut map = HashMap::new();
    for manager in [setup::phase_manager(), night::phase_manager(), dawn::phase_manager(), day::phase_manager()] {
        map.insert(manager.kind, manager);
    }
    map
}
