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

//! The compiled shader program contract.
//!
//! Compilation and reflection are backend concerns. The binding layer only
//! needs the reflected input list and the optional program-owned resources
//! that take precedence over dynamically resolved ones.

use super::buffer::{IndexBuffer, VertexBuffer};
use super::texture::Texture;
use std::fmt;
use std::rc::Rc;

/// An opaque handle to a linked GPU program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ProgramId(pub u32);

/// The declared type of a reflected program input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputType {
    /// A per-vertex attribute.
    Attribute,
    /// A 2D texture sampler.
    Sampler2d,
    /// A cube map sampler.
    SamplerCube,
    /// `float`
    Float1,
    /// `vec2`
    Float2,
    /// `vec3`
    Float3,
    /// `vec4`
    Float4,
    /// `mat3`
    Float9,
    /// `mat4`
    Float16,
    /// `int`
    Int1,
    /// `ivec2`
    Int2,
    /// `ivec3`
    Int3,
    /// `ivec4`
    Int4,
    /// `bool`
    Bool1,
    /// Any type the binding layer does not model.
    Unknown,
}

impl InputType {
    /// Returns the GLSL-style name of the type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Attribute => "attribute",
            Self::Sampler2d => "sampler2D",
            Self::SamplerCube => "samplerCube",
            Self::Float1 => "float",
            Self::Float2 => "vec2",
            Self::Float3 => "vec3",
            Self::Float4 => "vec4",
            Self::Float9 => "mat3",
            Self::Float16 => "mat4",
            Self::Int1 => "int",
            Self::Int2 => "ivec2",
            Self::Int3 => "ivec3",
            Self::Int4 => "ivec4",
            Self::Bool1 => "bool",
            Self::Unknown => "unknown",
        }
    }

    /// Returns `true` for texture samplers.
    pub fn is_sampler(self) -> bool {
        matches!(self, Self::Sampler2d | Self::SamplerCube)
    }

    /// Returns `true` for the integer uniform family.
    pub fn is_int(self) -> bool {
        matches!(self, Self::Int1 | Self::Int2 | Self::Int3 | Self::Int4)
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reflected program input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramInput {
    /// The input name as declared in the shader, e.g. `light[2].color`.
    pub name: String,
    /// The declared type.
    pub input_type: InputType,
    /// The hardware location assigned at link time.
    pub location: i32,
}

/// The ordered list of a program's reflected inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramInputs {
    inputs: Vec<ProgramInput>,
}

impl ProgramInputs {
    /// Creates an empty input list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an input.
    pub fn push(&mut self, name: impl Into<String>, input_type: InputType, location: i32) {
        self.inputs.push(ProgramInput {
            name: name.into(),
            input_type,
            location,
        });
    }

    /// Builder-style variant of [`ProgramInputs::push`].
    pub fn with(mut self, name: impl Into<String>, input_type: InputType, location: i32) -> Self {
        self.push(name, input_type, location);
        self
    }

    /// Iterates over the inputs in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, ProgramInput> {
        self.inputs.iter()
    }

    /// Returns the number of inputs.
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    /// Returns `true` if the program declares no input.
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}

impl<'a> IntoIterator for &'a ProgramInputs {
    type Item = &'a ProgramInput;
    type IntoIter = std::slice::Iter<'a, ProgramInput>;

    fn into_iter(self) -> Self::IntoIter {
        self.inputs.iter()
    }
}

/// A linked program together with the resources it owns.
#[derive(Debug, Clone, Default)]
pub struct Program {
    /// The GPU handle.
    pub id: ProgramId,
    /// The reflected inputs.
    pub inputs: ProgramInputs,
    /// Program-owned textures as `(location, texture)`, bound before dynamic ones.
    pub textures: Vec<(i32, Rc<Texture>)>,
    /// Program-owned vertex buffers as `(location, buffer)`. Each buffer is
    /// bound through its first attribute.
    pub vertex_buffers: Vec<(i32, Rc<VertexBuffer>)>,
    /// A program-owned index buffer. When present, program-owned vertex
    /// buffers replace the dynamically resolved ones.
    pub index_buffer: Option<Rc<IndexBuffer>>,
}

impl Program {
    /// Creates a program with no owned resource.
    pub fn new(id: ProgramId, inputs: ProgramInputs) -> Self {
        Self {
            id,
            inputs,
            ..Default::default()
        }
    }
}
