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

//! Dynamically typed property values and their typed accessors.

use crate::math::{Mat4, Vec2, Vec3, Vec4};
use crate::renderer::api::{IndexBuffer, Texture, VertexBuffer};
use std::rc::Rc;

/// A numeric array bound as a uniform array.
///
/// The array is "not yet bound" while its length is zero or it has no
/// backing storage.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformArray<T> {
    /// The number of elements, each `arity` components wide.
    pub len: u32,
    /// The flat component buffer.
    pub data: Option<Rc<[T]>>,
}

impl<T> UniformArray<T> {
    /// Creates an array of `len` elements over `data`.
    pub fn new(len: u32, data: impl Into<Rc<[T]>>) -> Self {
        Self {
            len,
            data: Some(data.into()),
        }
    }

    /// Creates an array that is declared but not yet populated.
    pub fn unbound() -> Self {
        Self { len: 0, data: None }
    }

    /// Returns `true` when the array has elements and backing storage.
    pub fn is_bound(&self) -> bool {
        self.len > 0 && self.data.is_some()
    }
}

/// A value stored in a property container.
#[derive(Debug, Clone)]
pub enum PropertyValue {
    /// `float`
    Float(f32),
    /// `vec2`
    Float2(Vec2),
    /// `vec3`
    Float3(Vec3),
    /// `vec4`
    Float4(Vec4),
    /// `mat4`
    Float16(Mat4),
    /// `int`
    Int(i32),
    /// `ivec2`
    Int2([i32; 2]),
    /// `ivec3`
    Int3([i32; 3]),
    /// `ivec4`
    Int4([i32; 4]),
    /// An array of floats.
    FloatArray(Rc<UniformArray<f32>>),
    /// An array of integers.
    IntArray(Rc<UniformArray<i32>>),
    /// A vertex buffer.
    VertexBuffer(Rc<VertexBuffer>),
    /// An index buffer.
    IndexBuffer(Rc<IndexBuffer>),
    /// A texture.
    Texture(Rc<Texture>),
}

impl PropertyValue {
    /// Returns a short name for the variant, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Float(_) => "float",
            Self::Float2(_) => "float2",
            Self::Float3(_) => "float3",
            Self::Float4(_) => "float4",
            Self::Float16(_) => "float16",
            Self::Int(_) => "int",
            Self::Int2(_) => "int2",
            Self::Int3(_) => "int3",
            Self::Int4(_) => "int4",
            Self::FloatArray(_) => "float array",
            Self::IntArray(_) => "int array",
            Self::VertexBuffer(_) => "vertex buffer",
            Self::IndexBuffer(_) => "index buffer",
            Self::Texture(_) => "texture",
        }
    }

    /// Returns `true` if both values are the same: equal for plain values,
    /// the same allocation for shared resources and arrays.
    pub fn same_reference(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Float2(a), Self::Float2(b)) => a == b,
            (Self::Float3(a), Self::Float3(b)) => a == b,
            (Self::Float4(a), Self::Float4(b)) => a == b,
            (Self::Float16(a), Self::Float16(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Int2(a), Self::Int2(b)) => a == b,
            (Self::Int3(a), Self::Int3(b)) => a == b,
            (Self::Int4(a), Self::Int4(b)) => a == b,
            (Self::FloatArray(a), Self::FloatArray(b)) => Rc::ptr_eq(a, b),
            (Self::IntArray(a), Self::IntArray(b)) => Rc::ptr_eq(a, b),
            (Self::VertexBuffer(a), Self::VertexBuffer(b)) => Rc::ptr_eq(a, b),
            (Self::IndexBuffer(a), Self::IndexBuffer(b)) => Rc::ptr_eq(a, b),
            (Self::Texture(a), Self::Texture(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Conversion from a [`PropertyValue`] into a concrete Rust type.
pub trait FromProperty: Sized {
    /// A short name for the expected variant, used in diagnostics.
    const KIND: &'static str;

    /// Extracts `Self` from `value`, or `None` on a variant mismatch.
    fn from_property(value: &PropertyValue) -> Option<Self>;
}

macro_rules! property_conversions {
    ($($ty:ty => $variant:ident, $kind:literal;)*) => {
        $(
            impl FromProperty for $ty {
                const KIND: &'static str = $kind;

                fn from_property(value: &PropertyValue) -> Option<Self> {
                    match value {
                        PropertyValue::$variant(v) => Some(v.clone()),
                        _ => None,
                    }
                }
            }

            impl From<$ty> for PropertyValue {
                fn from(value: $ty) -> Self {
                    PropertyValue::$variant(value)
                }
            }
        )*
    };
}

property_conversions! {
    f32 => Float, "float";
    Vec2 => Float2, "float2";
    Vec3 => Float3, "float3";
    Vec4 => Float4, "float4";
    Mat4 => Float16, "float16";
    i32 => Int, "int";
    [i32; 2] => Int2, "int2";
    [i32; 3] => Int3, "int3";
    [i32; 4] => Int4, "int4";
    Rc<UniformArray<f32>> => FloatArray, "float array";
    Rc<UniformArray<i32>> => IntArray, "int array";
    Rc<VertexBuffer> => VertexBuffer, "vertex buffer";
    Rc<IndexBuffer> => IndexBuffer, "index buffer";
    Rc<Texture> => Texture, "texture";
}
