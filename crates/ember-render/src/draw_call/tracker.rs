// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Change tracking: one subscription per property path, each replaying the
//! binding steps that read the path.

use ember_core::data::{BindingSource, SignalSlot};
use ember_core::renderer::{ProgramInput, SamplerState};
use std::collections::HashMap;

/// A binding step to replay when its property changes.
///
/// Each instruction carries the arguments of the original binding so that
/// replaying it is self-contained and never reserves a new slot.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RebindInstruction {
    IndexBuffer {
        path: String,
    },
    VertexAttribute {
        input: ProgramInput,
        path: String,
        source: BindingSource,
        slot: usize,
    },
    TextureSampler {
        input: ProgramInput,
        path: String,
        source: BindingSource,
        slot: usize,
        sampler: SamplerState,
    },
    Uniform {
        input: ProgramInput,
        path: String,
        array_path: Option<String>,
        source: BindingSource,
    },
}

impl RebindInstruction {
    pub fn input_name(&self) -> &str {
        match self {
            Self::IndexBuffer { .. } => "<indices>",
            Self::VertexAttribute { input, .. }
            | Self::TextureSampler { input, .. }
            | Self::Uniform { input, .. } => &input.name,
        }
    }
}

struct Subscription {
    _slot: SignalSlot,
    instructions: Vec<RebindInstruction>,
}

/// Property path to its single live subscription.
#[derive(Default)]
pub(crate) struct SubscriptionRegistry {
    entries: HashMap<String, Subscription>,
}

impl SubscriptionRegistry {
    /// Records `instruction` under `path`. `connect` is only called for a
    /// path that has no subscription yet.
    pub fn track(
        &mut self,
        path: &str,
        instruction: RebindInstruction,
        connect: impl FnOnce() -> SignalSlot,
    ) {
        if let Some(entry) = self.entries.get_mut(path) {
            if !entry.instructions.contains(&instruction) {
                entry.instructions.push(instruction);
            }
            return;
        }
        self.entries.insert(
            path.to_owned(),
            Subscription {
                _slot: connect(),
                instructions: vec![instruction],
            },
        );
    }

    /// Returns a copy of the instructions registered for `path`.
    pub fn instructions(&self, path: &str) -> Vec<RebindInstruction> {
        self.entries
            .get(path)
            .map(|entry| entry.instructions.clone())
            .unwrap_or_default()
    }

    /// Drops every subscription and returns how many were released.
    pub fn clear(&mut self) -> usize {
        let released = self.entries.len();
        self.entries.clear();
        released
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_subscribed(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }
}
