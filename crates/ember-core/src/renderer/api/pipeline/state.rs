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

//! The render state a technique declares for its draw calls.

use super::enums::*;
use crate::renderer::api::texture::{SamplerState, Texture};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A source/destination blend factor pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlendMode {
    /// Factor applied to the incoming fragment.
    pub source: BlendFactor,
    /// Factor applied to the value already in the target.
    pub destination: BlendFactor,
}

impl BlendMode {
    /// Opaque rendering: the fragment replaces the target.
    pub const OPAQUE: Self = Self {
        source: BlendFactor::One,
        destination: BlendFactor::Zero,
    };

    /// Classic alpha blending.
    pub const ALPHA: Self = Self {
        source: BlendFactor::SrcAlpha,
        destination: BlendFactor::OneMinusSrcAlpha,
    };
}

impl Default for BlendMode {
    fn default() -> Self {
        Self::OPAQUE
    }
}

/// A scissor rectangle in pixels.
///
/// A negative width or height means "the whole viewport".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScissorBox {
    /// Left edge.
    pub x: i32,
    /// Bottom edge.
    pub y: i32,
    /// Width, or -1.
    pub width: i32,
    /// Height, or -1.
    pub height: i32,
}

impl Default for ScissorBox {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: -1,
            height: -1,
        }
    }
}

/// The fixed set of render-state values a technique declares.
///
/// Partial descriptors are accepted: every missing field falls back to its
/// value in [`States::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct States {
    /// Draw order hint. Higher priorities are drawn first.
    pub priority: f32,
    /// Whether draw calls using this state must be depth-sorted.
    pub zsorted: bool,
    /// Color blending factors.
    pub blend_mode: BlendMode,
    /// Whether color writes are enabled.
    pub color_mask: bool,
    /// Whether depth writes are enabled.
    pub depth_mask: bool,
    /// The depth comparison function.
    pub depth_function: CompareFunction,
    /// Which triangle faces are culled.
    pub triangle_culling: CullMode,
    /// The stencil comparison function.
    pub stencil_function: CompareFunction,
    /// The stencil reference value.
    pub stencil_reference: i32,
    /// The stencil read/write mask.
    pub stencil_mask: u32,
    /// Operation applied when the stencil test fails.
    pub stencil_fail_operation: StencilOperation,
    /// Operation applied when the stencil test passes but the depth test fails.
    pub stencil_depth_fail_operation: StencilOperation,
    /// Operation applied when both tests pass.
    pub stencil_depth_pass_operation: StencilOperation,
    /// Whether the scissor test is enabled.
    pub scissor_test: bool,
    /// The scissor rectangle.
    pub scissor_box: ScissorBox,
    /// Sampler state per sampler input name. Unlisted samplers use
    /// [`SamplerState::default`].
    pub samplers: HashMap<String, SamplerState>,
    /// Render-to-texture target, or `None` for the back buffer.
    pub target: Option<Texture>,
}

impl States {
    /// Returns the sampler state declared for `input_name`, or the default one.
    pub fn sampler_for(&self, input_name: &str) -> SamplerState {
        self.samplers.get(input_name).copied().unwrap_or_default()
    }
}

impl Default for States {
    fn default() -> Self {
        Self {
            priority: 0.0,
            zsorted: false,
            blend_mode: BlendMode::default(),
            color_mask: true,
            depth_mask: true,
            depth_function: CompareFunction::Less,
            triangle_culling: CullMode::Back,
            stencil_function: CompareFunction::Always,
            stencil_reference: 0,
            stencil_mask: 0xff,
            stencil_fail_operation: StencilOperation::Keep,
            stencil_depth_fail_operation: StencilOperation::Keep,
            stencil_depth_pass_operation: StencilOperation::Keep,
            scissor_test: false,
            scissor_box: ScissorBox::default(),
            samplers: HashMap::new(),
            target: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::api::texture::{AddressMode, FilterMode, MipmapFilterMode, TextureId};

    #[test]
    fn defaults_describe_opaque_depth_tested_geometry() {
        let states = States::default();
        assert_eq!(states.blend_mode, BlendMode::OPAQUE);
        assert_eq!(states.depth_function, CompareFunction::Less);
        assert_eq!(states.triangle_culling, CullMode::Back);
        assert_eq!(states.stencil_mask, 0xff);
        assert_eq!(states.scissor_box.width, -1);
        assert!(states.target.is_none());
        assert!(!states.zsorted);
    }

    #[test]
    fn partial_descriptor_falls_back_to_defaults() {
        let states: States = ron::from_str(
            "(zsorted: true, blend_mode: (source: SrcAlpha, destination: OneMinusSrcAlpha))",
        )
        .expect("valid states");

        assert!(states.zsorted);
        assert_eq!(states.blend_mode, BlendMode::ALPHA);
        assert!(states.depth_mask);
        assert_eq!(states.stencil_function, CompareFunction::Always);
    }

    #[test]
    fn sampler_lookup_uses_default_for_unlisted_inputs() {
        let mut states = States::default();
        let repeat = SamplerState::new(
            AddressMode::Repeat,
            FilterMode::Linear,
            MipmapFilterMode::Linear,
        );
        states.samplers.insert("diffuseMap".to_owned(), repeat);

        assert_eq!(states.sampler_for("diffuseMap"), repeat);
        assert_eq!(states.sampler_for("normalMap"), SamplerState::default());
    }

    #[test]
    fn target_is_declared_by_value() {
        let states: States =
            ron::from_str("(target: Some((id: (4), kind: Texture2d)))").expect("valid states");
        assert_eq!(states.target.map(|t| t.id), Some(TextureId(4)));
    }
}
