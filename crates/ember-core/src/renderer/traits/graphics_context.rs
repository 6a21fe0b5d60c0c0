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

use crate::renderer::api::*;

/// An immediate-mode graphics context.
///
/// Draw calls issue their whole command sequence through this trait. Calls are
/// order-sensitive: the current program, texture slots and vertex streams are
/// state of the context. Resource upload is the backend's business and is
/// assumed complete by the time a handle reaches these methods.
pub trait GraphicsContext {
    /// Returns the texture currently used as render target, or `None` when
    /// rendering to the back buffer.
    fn render_target(&self) -> Option<TextureId>;

    /// Redirects rendering into a texture.
    fn set_render_to_texture(&mut self, target: TextureId);

    /// Redirects rendering to the back buffer.
    fn set_render_to_back_buffer(&mut self);

    /// Clears the current render target.
    fn clear(&mut self);

    /// Makes `program` the current program.
    fn set_program(&mut self, program: ProgramId);

    /// Uploads a single float vector uniform.
    /// ## Arguments
    /// * `location` - The uniform location in the current program.
    /// * `values` - One to four components.
    fn set_uniform_floats(&mut self, location: i32, values: &[f32]);

    /// Uploads a single integer vector uniform (one to four components).
    fn set_uniform_ints(&mut self, location: i32, values: &[i32]);

    /// Uploads a column-major 4x4 matrix uniform.
    fn set_uniform_matrix4(&mut self, location: i32, matrix: &[f32; 16]);

    /// Uploads a float array uniform.
    /// ## Arguments
    /// * `location` - The uniform location in the current program.
    /// * `arity` - Components per element (1 to 4, or 16 for matrices).
    /// * `count` - Number of elements.
    /// * `data` - The raw elements, `arity * count` floats.
    fn set_uniform_float_array(&mut self, location: i32, arity: u32, count: u32, data: &[f32]);

    /// Uploads an integer array uniform. See [`GraphicsContext::set_uniform_float_array`].
    fn set_uniform_int_array(&mut self, location: i32, arity: u32, count: u32, data: &[i32]);

    /// Binds a texture to a texture unit. `TextureId::NONE` unbinds the unit.
    fn set_texture_at(&mut self, slot: u32, texture: TextureId, location: i32);

    /// Applies sampler state to a texture unit.
    fn set_sampler_state_at(&mut self, slot: u32, sampler: SamplerState);

    /// Binds one attribute of a vertex buffer to an attribute location.
    /// ## Arguments
    /// * `location` - The attribute location in the current program.
    /// * `buffer` - The vertex buffer.
    /// * `size` - Components in the attribute.
    /// * `stride` - Components per vertex.
    /// * `offset` - Offset of the attribute inside a vertex, in components.
    fn set_vertex_buffer_at(
        &mut self,
        location: i32,
        buffer: BufferId,
        size: i32,
        stride: i32,
        offset: i32,
    );

    /// Enables or disables color writes.
    fn set_color_mask(&mut self, enabled: bool);

    /// Sets the blend factors.
    fn set_blend_mode(&mut self, mode: BlendMode);

    /// Sets depth writes and the depth comparison function.
    fn set_depth_test(&mut self, depth_mask: bool, function: CompareFunction);

    /// Configures the stencil test.
    fn set_stencil_test(
        &mut self,
        function: CompareFunction,
        reference: i32,
        mask: u32,
        fail: StencilOperation,
        depth_fail: StencilOperation,
        depth_pass: StencilOperation,
    );

    /// Enables or disables the scissor test and sets its rectangle.
    fn set_scissor_test(&mut self, enabled: bool, scissor: ScissorBox);

    /// Sets the face culling mode.
    fn set_triangle_culling(&mut self, mode: CullMode);

    /// Draws an indexed triangle list.
    fn draw_triangles(&mut self, index_buffer: BufferId, num_triangles: u32);
}
