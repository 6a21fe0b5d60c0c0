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

//! Z-sort signalling for depth-sorted draw calls.
//!
//! A depth-sorted draw call watches the properties its eye-space position
//! depends on and asks an external sorter to re-sort whenever one of them
//! changes. Requests are delivered as [`ZSortNeeded`] events, typically into an
//! [`ember_core::event::EventBus`] owned by the sorter.

use super::DrawCallId;
use ember_core::data::SignalSlot;

/// Property of the target holding the model-to-world matrix.
pub const MODEL_TO_WORLD_MATRIX: &str = "transform.modelToWorldMatrix";
/// Property of the target holding the vertex positions.
pub const VERTEX_POSITIONS: &str = "geometry.vertex.attribute.position";
/// Property of the renderer holding the world-to-screen matrix.
pub const WORLD_TO_SCREEN_MATRIX: &str = "camera.worldToScreenMatrix";

/// A request to re-sort a depth-sorted draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ZSortNeeded {
    /// The draw call whose eye-space position may have changed.
    pub draw_call: DrawCallId,
}

/// The z-sort subscriptions and listeners of one draw call.
#[derive(Default)]
pub(crate) struct ZSortSignals {
    slots: Vec<SignalSlot>,
    listeners: Vec<flume::Sender<ZSortNeeded>>,
}

impl ZSortSignals {
    pub fn add_listener(&mut self, sender: flume::Sender<ZSortNeeded>) {
        self.listeners.push(sender);
    }

    pub fn hold(&mut self, slot: SignalSlot) {
        self.slots.push(slot);
    }

    /// Drops the property subscriptions. Listeners are kept.
    pub fn release(&mut self) -> usize {
        let released = self.slots.len();
        self.slots.clear();
        released
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Sends a request to every listener, forgetting disconnected ones.
    pub fn publish(&mut self, draw_call: DrawCallId) {
        let event = ZSortNeeded { draw_call };
        self.listeners.retain(|sender| sender.send(event).is_ok());
        log::trace!(
            "DrawCall {draw_call}: z-sort requested ({} listeners).",
            self.listeners.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::event::EventBus;

    #[test]
    fn publish_reaches_every_live_listener() {
        let bus = EventBus::<ZSortNeeded>::new();
        let (dead_sender, dead_receiver) = flume::unbounded();
        drop(dead_receiver);

        let mut signals = ZSortSignals::default();
        signals.add_listener(bus.sender());
        signals.add_listener(dead_sender);

        let id = DrawCallId::new();
        signals.publish(id);
        signals.publish(id);

        assert_eq!(bus.drain(), vec![ZSortNeeded { draw_call: id }; 2]);
        assert_eq!(signals.listeners.len(), 1);
    }
}
