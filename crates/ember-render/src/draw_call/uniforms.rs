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

//! Typed uniform values keyed by program location.

use ember_core::data::UniformArray;
use ember_core::math::{Mat4, Vec2, Vec3, Vec4};
use ember_core::renderer::GraphicsContext;
use std::collections::BTreeMap;
use std::rc::Rc;

/// A value uploaded to one uniform location.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
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
    /// An array of float elements, each `arity` components wide.
    FloatArray {
        /// Components per element (1 to 4, or 16).
        arity: u32,
        /// The shared array.
        array: Rc<UniformArray<f32>>,
    },
    /// An array of integer elements, each `arity` components wide.
    IntArray {
        /// Components per element (1 to 4).
        arity: u32,
        /// The shared array.
        array: Rc<UniformArray<i32>>,
    },
}

impl UniformValue {
    /// Position of the value in the upload order: float scalars and vectors by
    /// arity then matrices, integers by arity, float arrays by arity with
    /// matrices last, integer arrays by arity.
    fn upload_rank(&self) -> u32 {
        match self {
            Self::Float(_) => 0,
            Self::Float2(_) => 1,
            Self::Float3(_) => 2,
            Self::Float4(_) => 3,
            Self::Float16(_) => 4,
            Self::Int(_) => 5,
            Self::Int2(_) => 6,
            Self::Int3(_) => 7,
            Self::Int4(_) => 8,
            Self::FloatArray { arity, .. } => 9 + (*arity).min(5),
            Self::IntArray { arity, .. } => 15 + *arity,
        }
    }

    fn upload(&self, location: i32, context: &mut dyn GraphicsContext) {
        match self {
            Self::Float(v) => context.set_uniform_floats(location, &[*v]),
            Self::Float2(v) => context.set_uniform_floats(location, &v.to_array()),
            Self::Float3(v) => context.set_uniform_floats(location, &v.to_array()),
            Self::Float4(v) => context.set_uniform_floats(location, &v.to_array()),
            Self::Float16(m) => context.set_uniform_matrix4(location, &m.to_cols_array()),
            Self::Int(v) => context.set_uniform_ints(location, &[*v]),
            Self::Int2(v) => context.set_uniform_ints(location, v),
            Self::Int3(v) => context.set_uniform_ints(location, v),
            Self::Int4(v) => context.set_uniform_ints(location, v),
            Self::FloatArray { arity, array } => {
                let (count, data) = array_data(array, *arity);
                context.set_uniform_float_array(location, *arity, count, data);
            }
            Self::IntArray { arity, array } => {
                let (count, data) = array_data(array, *arity);
                context.set_uniform_int_array(location, *arity, count, data);
            }
        }
    }
}

/// The whole elements actually present, at most `array.len`, and their data.
fn array_data<T>(array: &UniformArray<T>, arity: u32) -> (u32, &[T]) {
    let Some(data) = array.data.as_deref() else {
        return (0, &[]);
    };
    let arity = arity.max(1) as usize;
    let count = (array.len as usize).min(data.len() / arity);
    (count as u32, &data[..count * arity])
}

/// The uniforms of one draw call, at most one per location.
#[derive(Debug, Clone, Default)]
pub(crate) struct UniformStore {
    values: BTreeMap<i32, UniformValue>,
}

impl UniformStore {
    pub fn set(&mut self, location: i32, value: UniformValue) {
        self.values.insert(location, value);
    }

    pub fn remove(&mut self, location: i32) -> Option<UniformValue> {
        self.values.remove(&location)
    }

    pub fn get(&self, location: i32) -> Option<&UniformValue> {
        self.values.get(&location)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Every uniform in ascending location order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, &UniformValue)> {
        self.values.iter().map(|(location, value)| (*location, value))
    }

    /// Uploads every uniform in upload order, ascending location within a rank.
    pub fn upload(&self, context: &mut dyn GraphicsContext) {
        let mut ordered: Vec<(i32, &UniformValue)> = self.iter().collect();
        ordered.sort_by_key(|(location, value)| (value.upload_rank(), *location));
        for (location, value) in ordered {
            value.upload(location, context);
        }
    }
}
