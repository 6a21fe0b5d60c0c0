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

//! Fixed-capacity resource slot tables.
//!
//! Slots are handed out in order during a bind pass. An empty slot holds the
//! unbound sentinel: resource id 0 and -1 for every location or size.

use crate::error::DrawCallError;
use ember_core::renderer::{
    AddressMode, BufferId, FilterMode, MipmapFilterMode, SamplerState, TextureId,
};
use std::fmt;

/// Number of texture slots available to the dynamic bindings of a draw call.
pub const MAX_NUM_TEXTURES: usize = 8;

/// Number of vertex buffer slots available to a draw call.
pub const MAX_NUM_VERTEX_BUFFERS: usize = 8;

/// The kind of resource a slot table holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
    /// Texture units.
    Texture,
    /// Vertex attribute streams.
    VertexBuffer,
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotKind::Texture => f.write_str("texture"),
            SlotKind::VertexBuffer => f.write_str("vertex buffer"),
        }
    }
}

/// A slot entry with an "unbound" sentinel value.
pub trait Slot: Copy + PartialEq + fmt::Debug {
    /// The kind of table this slot lives in.
    const KIND: SlotKind;
    /// The sentinel stored in empty slots.
    const UNBOUND: Self;

    /// Returns `true` if a resource is bound to this slot.
    fn is_bound(&self) -> bool;
}

/// A texture bound to a texture unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureSlot {
    /// The bound texture, or `TextureId::NONE`.
    pub texture: TextureId,
    /// The sampler location in the program, or -1.
    pub location: i32,
    /// The sampler state applied with the texture.
    pub sampler: SamplerState,
}

impl Slot for TextureSlot {
    const KIND: SlotKind = SlotKind::Texture;
    const UNBOUND: Self = Self {
        texture: TextureId::NONE,
        location: -1,
        sampler: SamplerState::new(
            AddressMode::ClampToEdge,
            FilterMode::Nearest,
            MipmapFilterMode::None,
        ),
    };

    fn is_bound(&self) -> bool {
        self.texture.is_bound()
    }
}

/// One attribute of a vertex buffer bound to an attribute location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexSlot {
    /// The bound buffer, or `BufferId::NONE`.
    pub buffer: BufferId,
    /// The attribute location in the program, or -1.
    pub location: i32,
    /// Components per vertex, or -1.
    pub vertex_size: i32,
    /// Components in the attribute, or -1.
    pub attribute_size: i32,
    /// Offset of the attribute inside a vertex, or -1.
    pub attribute_offset: i32,
}

impl Slot for VertexSlot {
    const KIND: SlotKind = SlotKind::VertexBuffer;
    const UNBOUND: Self = Self {
        buffer: BufferId::NONE,
        location: -1,
        vertex_size: -1,
        attribute_size: -1,
        attribute_offset: -1,
    };

    fn is_bound(&self) -> bool {
        self.buffer.is_bound()
    }
}

/// A table of `N` slots and the cursor of the current bind pass.
#[derive(Debug, Clone)]
pub(crate) struct SlotTable<S: Slot, const N: usize> {
    slots: [S; N],
    next: usize,
}

impl<S: Slot, const N: usize> SlotTable<S, N> {
    pub fn new() -> Self {
        Self {
            slots: [S::UNBOUND; N],
            next: 0,
        }
    }

    /// Empties every slot and rewinds the cursor.
    pub fn reset(&mut self) {
        self.slots = [S::UNBOUND; N];
        self.next = 0;
    }

    /// Reserves the next slot of the bind pass.
    pub fn allocate(&mut self) -> Result<usize, DrawCallError> {
        if self.next >= N {
            return Err(DrawCallError::SlotCapacityExceeded {
                kind: S::KIND,
                capacity: N,
            });
        }
        let slot = self.next;
        self.next += 1;
        Ok(slot)
    }

    pub fn set(&mut self, index: usize, slot: S) {
        if let Some(entry) = self.slots.get_mut(index) {
            *entry = slot;
        }
    }

    pub fn clear(&mut self, index: usize) {
        self.set(index, S::UNBOUND);
    }

    /// Number of slots reserved in the current bind pass.
    pub fn allocated(&self) -> usize {
        self.next
    }

    pub fn slots(&self) -> &[S; N] {
        &self.slots
    }
}
