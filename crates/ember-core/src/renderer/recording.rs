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

//! A headless [`GraphicsContext`] that records commands instead of executing them.
//!
//! Used by tests and tools to inspect the exact command stream a draw call
//! emits.

use super::api::*;
use super::traits::GraphicsContext;

/// One recorded graphics-context call.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum ContextCommand {
    SetRenderToTexture(TextureId),
    SetRenderToBackBuffer,
    Clear,
    SetProgram(ProgramId),
    UniformFloats {
        location: i32,
        values: Vec<f32>,
    },
    UniformInts {
        location: i32,
        values: Vec<i32>,
    },
    UniformMatrix4 {
        location: i32,
        matrix: [f32; 16],
    },
    UniformFloatArray {
        location: i32,
        arity: u32,
        count: u32,
        data: Vec<f32>,
    },
    UniformIntArray {
        location: i32,
        arity: u32,
        count: u32,
        data: Vec<i32>,
    },
    Texture {
        slot: u32,
        texture: TextureId,
        location: i32,
    },
    SamplerState {
        slot: u32,
        sampler: SamplerState,
    },
    VertexBuffer {
        location: i32,
        buffer: BufferId,
        size: i32,
        stride: i32,
        offset: i32,
    },
    ColorMask(bool),
    BlendMode(BlendMode),
    DepthTest {
        depth_mask: bool,
        function: CompareFunction,
    },
    StencilTest {
        function: CompareFunction,
        reference: i32,
        mask: u32,
        fail: StencilOperation,
        depth_fail: StencilOperation,
        depth_pass: StencilOperation,
    },
    ScissorTest {
        enabled: bool,
        scissor: ScissorBox,
    },
    TriangleCulling(CullMode),
    DrawTriangles {
        index_buffer: BufferId,
        num_triangles: u32,
    },
}

impl ContextCommand {
    /// Returns `true` for any single or array uniform upload.
    pub fn is_uniform(&self) -> bool {
        matches!(
            self,
            Self::UniformFloats { .. }
                | Self::UniformInts { .. }
                | Self::UniformMatrix4 { .. }
                | Self::UniformFloatArray { .. }
                | Self::UniformIntArray { .. }
        )
    }
}

/// A [`GraphicsContext`] that appends every call to a command list.
#[derive(Debug, Default)]
pub struct RecordingContext {
    commands: Vec<ContextCommand>,
    target: Option<TextureId>,
}

impl RecordingContext {
    /// Creates an empty recorder rendering to the back buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the commands recorded so far.
    pub fn commands(&self) -> &[ContextCommand] {
        &self.commands
    }

    /// Returns and clears the recorded commands. The current render target is kept.
    pub fn take_commands(&mut self) -> Vec<ContextCommand> {
        std::mem::take(&mut self.commands)
    }

    fn record(&mut self, command: ContextCommand) {
        log::trace!("RecordingContext: {command:?}");
        self.commands.push(command);
    }
}

impl GraphicsContext for RecordingContext {
    fn render_target(&self) -> Option<TextureId> {
        self.target
    }

    fn set_render_to_texture(&mut self, target: TextureId) {
        self.target = Some(target);
        self.record(ContextCommand::SetRenderToTexture(target));
    }

    fn set_render_to_back_buffer(&mut self) {
        self.target = None;
        self.record(ContextCommand::SetRenderToBackBuffer);
    }

    fn clear(&mut self) {
        self.record(ContextCommand::Clear);
    }

    fn set_program(&mut self, program: ProgramId) {
        self.record(ContextCommand::SetProgram(program));
    }

    fn set_uniform_floats(&mut self, location: i32, values: &[f32]) {
        self.record(ContextCommand::UniformFloats {
            location,
            values: values.to_vec(),
        });
    }

    fn set_uniform_ints(&mut self, location: i32, values: &[i32]) {
        self.record(ContextCommand::UniformInts {
            location,
            values: values.to_vec(),
        });
    }

    fn set_uniform_matrix4(&mut self, location: i32, matrix: &[f32; 16]) {
        self.record(ContextCommand::UniformMatrix4 {
            location,
            matrix: *matrix,
        });
    }

    fn set_uniform_float_array(&mut self, location: i32, arity: u32, count: u32, data: &[f32]) {
        self.record(ContextCommand::UniformFloatArray {
            location,
            arity,
            count,
            data: data.to_vec(),
        });
    }

    fn set_uniform_int_array(&mut self, location: i32, arity: u32, count: u32, data: &[i32]) {
        self.record(ContextCommand::UniformIntArray {
            location,
            arity,
            count,
            data: data.to_vec(),
        });
    }

    fn set_texture_at(&mut self, slot: u32, texture: TextureId, location: i32) {
        self.record(ContextCommand::Texture {
            slot,
            texture,
            location,
        });
    }

    fn set_sampler_state_at(&mut self, slot: u32, sampler: SamplerState) {
        self.record(ContextCommand::SamplerState { slot, sampler });
    }

    fn set_vertex_buffer_at(
        &mut self,
        location: i32,
        buffer: BufferId,
        size: i32,
        stride: i32,
        offset: i32,
    ) {
        self.record(ContextCommand::VertexBuffer {
            location,
            buffer,
            size,
            stride,
            offset,
        });
    }

    fn set_color_mask(&mut self, enabled: bool) {
        self.record(ContextCommand::ColorMask(enabled));
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.record(ContextCommand::BlendMode(mode));
    }

    fn set_depth_test(&mut self, depth_mask: bool, function: CompareFunction) {
        self.record(ContextCommand::DepthTest {
            depth_mask,
            function,
        });
    }

    fn set_stencil_test(
        &mut self,
        function: CompareFunction,
        reference: i32,
        mask: u32,
        fail: StencilOperation,
        depth_fail: StencilOperation,
        depth_pass: StencilOperation,
    ) {
        self.record(ContextCommand::StencilTest {
            function,
            reference,
            mask,
            fail,
            depth_fail,
            depth_pass,
        });
    }

    fn set_scissor_test(&mut self, enabled: bool, scissor: ScissorBox) {
        self.record(ContextCommand::ScissorTest { enabled, scissor });
    }

    fn set_triangle_culling(&mut self, mode: CullMode) {
        self.record(ContextCommand::TriangleCulling(mode));
    }

    fn draw_triangles(&mut self, index_buffer: BufferId, num_triangles: u32) {
        self.record(ContextCommand::DrawTriangles {
            index_buffer,
            num_triangles,
        });
    }
}
