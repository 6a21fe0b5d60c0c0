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

//! Emission of the draw command sequence.

use super::{DrawCallState, IndexBinding, Slot};
use crate::error::DrawCallError;
use ember_core::renderer::{GraphicsContext, Texture};

impl DrawCallState {
    /// Emits, in order: render target setup, program, uniforms, textures,
    /// vertex buffers, render state and the indexed draw.
    pub(super) fn render(
        &mut self,
        context: &mut dyn GraphicsContext,
        render_target: Option<&Texture>,
    ) -> Result<(), DrawCallError> {
        if let Some(e) = self.pending_errors.pop_front() {
            return Err(e);
        }
        let Some(program) = self.program.clone() else {
            log::warn!("DrawCall {}: render requested without a program.", self.id);
            return Err(DrawCallError::MissingProgram);
        };

        let target = render_target
            .or(self.render_state.target.as_ref())
            .map(|texture| texture.id);
        match target {
            Some(target) => {
                if context.render_target() != Some(target) {
                    context.set_render_to_texture(target);
                }
                context.clear();
            }
            None => {
                if context.render_target().is_some() {
                    context.set_render_to_back_buffer();
                }
            }
        }

        context.set_program(program.id);

        self.uniforms.upload(context);

        for (slot, (location, texture)) in program.textures.iter().enumerate() {
            context.set_texture_at(slot as u32, texture.id, *location);
        }
        let offset = program.textures.len();
        for (index, slot) in self.textures.slots().iter().enumerate() {
            let unit = (offset + index) as u32;
            context.set_texture_at(unit, slot.texture, slot.location);
            if slot.is_bound() {
                context.set_sampler_state_at(unit, slot.sampler);
            }
        }

        if program.index_buffer.is_some() {
            for (location, buffer) in &program.vertex_buffers {
                if !buffer.ready {
                    continue;
                }
                if let Some(attribute) = buffer.attributes.first() {
                    context.set_vertex_buffer_at(
                        *location,
                        buffer.id,
                        attribute.size as i32,
                        buffer.vertex_size as i32,
                        attribute.offset as i32,
                    );
                }
            }
        } else {
            for slot in self.vertex_buffers.slots().iter().filter(|s| s.is_bound()) {
                context.set_vertex_buffer_at(
                    slot.location,
                    slot.buffer,
                    slot.attribute_size,
                    slot.vertex_size,
                    slot.attribute_offset,
                );
            }
        }

        self.render_state.apply(context);

        let indices = match &program.index_buffer {
            Some(buffer) if buffer.ready => Some(IndexBinding {
                id: buffer.id,
                count: buffer.len() as u32,
            }),
            _ => self.index_buffer,
        };
        match indices {
            Some(indices) => context.draw_triangles(indices.id, indices.count / 3),
            None => log::warn!("DrawCall {}: no index buffer bound, draw skipped.", self.id),
        }

        Ok(())
    }
}
