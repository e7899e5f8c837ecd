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

use crate::log::log_entry::LogRecord;

/// Optional diagnostic sink for a session, per §6 Configuration.
///
/// Invoked by the kernel after every successful `register_log_entry`,
/// outside of the kernel's own mutation path — a session with no observer
/// configured pays nothing beyond a single branch (§9's "session-wide
/// observer" design note).
pub trait StateChangeObserver: Send + Sync {
    fn on_log_entry(&self, record: &LogRecord);
}

/// Zero-overhead default used when no observer is configured.
#[derive(Default)]
pub struct NullObserver;

impl StateChangeObserver for NullObserver {
    fn on_log_entry(&self, _record: &LogRecord) {}
}
