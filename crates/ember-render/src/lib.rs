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

//! # Ember Render
//!
//! The draw-call binding and dispatch layer.
//!
//! A [`DrawCall`] connects the named inputs of a compiled [`Program`] to the
//! values stored in three property containers (target, renderer and root),
//! keeps that resolution current as the containers change, and emits the
//! ordered command sequence of one indexed draw on a [`GraphicsContext`].
//!
//! [`Program`]: ember_core::renderer::Program
//! [`GraphicsContext`]: ember_core::renderer::GraphicsContext

#![warn(missing_docs)]

pub mod draw_call;
mod error;

pub use draw_call::{
    DataSources, DrawCall, DrawCallId, IndexBinding, PropertyPathFormatter, RenderStateSnapshot,
    Slot, SlotKind, TextureSlot, UniformValue, VertexSlot, ZSortNeeded, MAX_NUM_TEXTURES,
    MAX_NUM_VERTEX_BUFFERS,
};
pub use error::DrawCallError;
