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

//! Vertex and index buffer handles as seen by the binding layer.
//!
//! Uploading is a backend concern; these types only carry the identifiers and
//! layout metadata the draw call needs to bind them.

use crate::math::Vec3;

/// An opaque handle to a GPU buffer. `BufferId(0)` means "unbound".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BufferId(pub u32);

impl BufferId {
    /// The sentinel for an empty buffer slot.
    pub const NONE: Self = Self(0);

    /// Returns `true` unless this is the unbound sentinel.
    #[inline]
    pub fn is_bound(self) -> bool {
        self.0 != 0
    }
}

/// A named attribute interleaved inside a vertex buffer.
///
/// Sizes and offsets are expressed in `f32` components, not bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexAttribute {
    /// The attribute name, e.g. `position` or `uv`.
    pub name: String,
    /// Number of components (1..=4).
    pub size: u32,
    /// Offset of the first component inside a vertex.
    pub offset: u32,
}

impl VertexAttribute {
    /// Creates a new attribute descriptor.
    pub fn new(name: impl Into<String>, size: u32, offset: u32) -> Self {
        Self {
            name: name.into(),
            size,
            offset,
        }
    }
}

/// An interleaved vertex buffer.
#[derive(Debug, Clone)]
pub struct VertexBuffer {
    /// The GPU handle.
    pub id: BufferId,
    /// Number of `f32` components per vertex (the stride).
    pub vertex_size: u32,
    /// The attributes present in each vertex.
    pub attributes: Vec<VertexAttribute>,
    /// CPU-side copy of the vertex data.
    pub data: Vec<f32>,
    /// `false` while the buffer has not been uploaded.
    pub ready: bool,
}

impl VertexBuffer {
    /// Creates a buffer from its id, layout and data. The vertex size is
    /// derived from the attribute layout.
    pub fn new(id: BufferId, attributes: Vec<VertexAttribute>, data: Vec<f32>) -> Self {
        let vertex_size = attributes
            .iter()
            .map(|a| a.offset + a.size)
            .max()
            .unwrap_or(0);
        Self {
            id,
            vertex_size,
            attributes,
            data,
            ready: true,
        }
    }

    /// Looks up an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&VertexAttribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Returns `true` if the buffer carries an attribute with this name.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Returns the number of whole vertices stored in `data`.
    pub fn num_vertices(&self) -> usize {
        if self.vertex_size == 0 {
            0
        } else {
            self.data.len() / self.vertex_size as usize
        }
    }

    /// Returns the center of the axis-aligned bounds of the `position` attribute.
    ///
    /// Returns the origin when there is no position attribute or no vertex.
    pub fn center_position(&self) -> Vec3 {
        let Some(position) = self.attribute("position") else {
            return Vec3::ZERO;
        };
        if position.size < 3 || self.num_vertices() == 0 {
            return Vec3::ZERO;
        }

        let stride = self.vertex_size as usize;
        let offset = position.offset as usize;
        let mut min = Vec3::new(f32::MAX, f32::MAX, f32::MAX);
        let mut max = Vec3::new(f32::MIN, f32::MIN, f32::MIN);

        for vertex in self.data.chunks_exact(stride) {
            let p = Vec3::new(vertex[offset], vertex[offset + 1], vertex[offset + 2]);
            min = min.min(p);
            max = max.max(p);
        }

        (min + max) * 0.5
    }
}

/// A 16-bit index buffer describing a triangle list.
#[derive(Debug, Clone)]
pub struct IndexBuffer {
    /// The GPU handle.
    pub id: BufferId,
    /// CPU-side copy of the indices.
    pub data: Vec<u16>,
    /// `false` while the buffer has not been uploaded.
    pub ready: bool,
}

impl IndexBuffer {
    /// Creates an uploaded index buffer.
    pub fn new(id: BufferId, data: Vec<u16>) -> Self {
        Self {
            id,
            data,
            ready: true,
        }
    }

    /// Returns the number of indices.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the buffer holds no index.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
