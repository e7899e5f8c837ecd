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

use serde::{Deserialize, Serialize};

/// Stable identifier for a sub-phase, stage, or listener internal state.
///
/// Represented as a static string rather than a concrete enum so the phase
/// cache (§4.3) stays generic across every phase module and listener —
/// exactly the tradeoff the rulebook calls for: "Enum tags... are serialized
/// as stable string or integer identifiers so the cache remains generic
/// across phases and listeners." Constructing one from an unrecognized
/// string during rehydration is a programmer error (§4.3) and is the
/// caller's responsibility to reject; this type itself does not validate
/// membership in any particular table.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize)]
pub struct Tag(pub &'static str);

impl Tag {
    pub const fn new(s: &'static str) -> Self {
        Self(s)
    }
}

impl<'de> Deserialize<'de> for Tag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(Tag(crate::core::leak_str(String::deserialize(deserializer)?)))
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub type SubPhaseTag = Tag;
pub type StageTag = Tag;
pub type ListenerStateTag = Tag;

/// Which table a [ListenerId] is drawn from.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ListenerKind {
    MainRole,
    SecondaryRole,
    Event,
}

/// Identifies a single hook listener, per the Glossary.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize)]
pub struct ListenerId {
    pub kind: ListenerKind,
    pub id: &'static str,
}

impl ListenerId {
    pub const fn new(kind: ListenerKind, id: &'static str) -> Self {
        Self { kind, id }
    }
}

#[derive(Deserialize)]
struct ListenerIdShadow {
    kind: ListenerKind,
    id: String,
}

impl<'de> Deserialize<'de> for ListenerId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let shadow = ListenerIdShadow::deserialize(deserializer)?;
        Ok(ListenerId { kind: shadow.kind, id: crate::core::leak_str(shadow.id) })
    }
}

/// Identifies a named point in the flow at which an ordered list of
/// listeners is invoked, per the Glossary's "Hook" entry.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize)]
pub struct HookId(pub &'static str);

impl<'de> Deserialize<'de> for HookId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(HookId(crate::core::leak_str(String::deserialize(deserializer)?)))
    }
}
