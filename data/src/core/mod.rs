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

pub mod numerics;
pub mod primitives;
pub mod secondary_flag;

/// Leaks an owned string to satisfy the `'static` bound on tag and id types
/// (§4.3's "stable string or integer identifiers"), used by their hand-written
/// `Deserialize` impls — `#[derive(Deserialize)]` on a field typed `&'static
/// str` only ends up implementing `Deserialize<'static>`, not `Deserialize<'de>`
/// for every `'de`, so those types deserialize through a `String` shadow
/// instead. Rehydration happens once per session restore, so the leak is
/// bounded by how many sessions a host restores, not by game length.
pub(crate) fn leak_str(s: String) -> &'static str {
    Box::leak(s.into_boxed_str())
}
