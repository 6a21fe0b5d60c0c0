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

//! The render state captured from a technique.

use ember_core::renderer::*;

/// Render state copied from a technique's [`States`] at bind time.
///
/// Render state is static for the technique's lifetime, so it is copied
/// verbatim and never tracked through containers.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderStateSnapshot {
    /// Draw order hint.
    pub priority: f32,
    /// Whether the draw call is depth-sorted.
    pub zsorted: bool,
    /// Blend factors.
    pub blend_mode: BlendMode,
    /// Color writes.
    pub color_mask: bool,
    /// Depth writes.
    pub depth_mask: bool,
    /// Depth comparison.
    pub depth_function: CompareFunction,
    /// Face culling.
    pub triangle_culling: CullMode,
    /// Stencil comparison.
    pub stencil_function: CompareFunction,
    /// Stencil reference value.
    pub stencil_reference: i32,
    /// Stencil mask.
    pub stencil_mask: u32,
    /// Stencil-fail operation.
    pub stencil_fail_operation: StencilOperation,
    /// Depth-fail operation.
    pub stencil_depth_fail_operation: StencilOperation,
    /// Depth-pass operation.
    pub stencil_depth_pass_operation: StencilOperation,
    /// Scissor test switch.
    pub scissor_test: bool,
    /// Scissor rectangle.
    pub scissor_box: ScissorBox,
    /// Render-to-texture target.
    pub target: Option<Texture>,
}

impl RenderStateSnapshot {
    /// Copies every field of `states`.
    pub fn capture(states: &States) -> Self {
        Self {
            priority: states.priority,
            zsorted: states.zsorted,
            blend_mode: states.blend_mode,
            color_mask: states.color_mask,
            depth_mask: states.depth_mask,
            depth_function: states.depth_function,
            triangle_culling: states.triangle_culling,
            stencil_function: states.stencil_function,
            stencil_reference: states.stencil_reference,
            stencil_mask: states.stencil_mask,
            stencil_fail_operation: states.stencil_fail_operation,
            stencil_depth_fail_operation: states.stencil_depth_fail_operation,
            stencil_depth_pass_operation: states.stencil_depth_pass_operation,
            scissor_test: states.scissor_test,
            scissor_box: states.scissor_box,
            target: states.target.clone(),
        }
    }

    /// Applies the color, depth, stencil, scissor and culling state.
    pub(crate) fn apply(&self, context: &mut dyn GraphicsContext) {
        context.set_color_mask(self.color_mask);
        context.set_blend_mode(self.blend_mode);
        context.set_depth_test(self.depth_mask, self.depth_function);
        context.set_stencil_test(
            self.stencil_function,
            self.stencil_reference,
            self.stencil_mask,
            self.stencil_fail_operation,
            self.stencil_depth_fail_operation,
            self.stencil_depth_pass_operation,
        );
        context.set_scissor_test(self.scissor_test, self.scissor_box);
        context.set_triangle_culling(self.triangle_culling);
    }
}

impl Default for RenderStateSnapshot {
    fn default() -> Self {
        Self::capture(&States::default())
    }
}
