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

use super::zsort::{MODEL_TO_WORLD_MATRIX, VERTEX_POSITIONS, WORLD_TO_SCREEN_MATRIX};
use super::DrawCallState;
use ember_core::data::{BindingSource, FromProperty};
use ember_core::math::{Mat4, Vec3};
use ember_core::renderer::VertexBuffer;
use std::rc::Rc;

impl DrawCallState {
    /// Transforms the center of the target's vertex positions by its
    /// model-to-world matrix and the renderer's world-to-screen matrix.
    ///
    /// Missing data is replaced by the origin and identity matrices.
    pub(super) fn eye_space_position(&self) -> Vec3 {
        let local = self
            .read_lenient::<Rc<VertexBuffer>>(BindingSource::Target, VERTEX_POSITIONS)
            .map_or(Vec3::ZERO, |positions| positions.center_position());
        let model_to_world = self
            .read_lenient::<Mat4>(BindingSource::Target, MODEL_TO_WORLD_MATRIX)
            .unwrap_or(Mat4::IDENTITY);
        let world_to_screen = self
            .read_lenient::<Mat4>(BindingSource::Renderer, WORLD_TO_SCREEN_MATRIX)
            .unwrap_or(Mat4::IDENTITY);

        (world_to_screen * model_to_world).transform_point(local)
    }

    fn read_lenient<T: FromProperty>(&self, source: BindingSource, path: &str) -> Option<T> {
        self.sources.read::<T>(source, path).unwrap_or_else(|e| {
            log::warn!("DrawCall {}: {e}", self.id);
            None
        })
    }
}
