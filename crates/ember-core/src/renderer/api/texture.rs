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

//! Texture handles and the sampler state applied when binding them.

use serde::{Deserialize, Serialize};

/// An opaque handle to a GPU texture. `TextureId(0)` means "unbound".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TextureId(pub u32);

impl TextureId {
    /// The sentinel for an empty texture slot.
    pub const NONE: Self = Self(0);

    /// Returns `true` unless this is the unbound sentinel.
    #[inline]
    pub fn is_bound(self) -> bool {
        self.0 != 0
    }
}

/// The shape of a texture resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TextureKind {
    /// A regular two-dimensional texture.
    #[default]
    Texture2d,
    /// A six-faced cube map.
    Cube,
}

/// A texture as seen by the binding layer.
///
/// Render-target textures are declared by value in technique descriptors, so
/// the handle is serializable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Texture {
    /// The GPU handle.
    pub id: TextureId,
    /// The texture shape.
    pub kind: TextureKind,
}

impl Texture {
    /// Creates a 2D texture handle.
    pub fn new_2d(id: TextureId) -> Self {
        Self {
            id,
            kind: TextureKind::Texture2d,
        }
    }

    /// Creates a cube map handle.
    pub fn new_cube(id: TextureId) -> Self {
        Self {
            id,
            kind: TextureKind::Cube,
        }
    }
}

/// Defines how texture coordinates outside the [0, 1] range are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressMode {
    /// The texture repeats.
    Repeat,
    /// The coordinate is clamped to the edge texel.
    ClampToEdge,
}

/// Defines the filtering used when a texture is magnified or minified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterMode {
    /// Nearest-neighbor sampling.
    Nearest,
    /// Bilinear interpolation.
    Linear,
}

/// Defines how mipmap levels are selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MipmapFilterMode {
    /// Mipmapping is disabled.
    None,
    /// Use the nearest mip level.
    Nearest,
    /// Interpolate between the two nearest mip levels.
    Linear,
}

/// The wrap/filter/mip triple applied to a texture slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SamplerState {
    /// Wrapping of out-of-range coordinates.
    pub address_mode: AddressMode,
    /// Magnification and minification filter.
    pub filter: FilterMode,
    /// Mip level selection.
    pub mipmap_filter: MipmapFilterMode,
}

impl SamplerState {
    /// Creates a sampler state from its three components.
    pub const fn new(
        address_mode: AddressMode,
        filter: FilterMode,
        mipmap_filter: MipmapFilterMode,
    ) -> Self {
        Self {
            address_mode,
            filter,
            mipmap_filter,
        }
    }
}

impl Default for SamplerState {
    /// Clamp, nearest, no mipmapping.
    fn default() -> Self {
        Self::new(
            AddressMode::ClampToEdge,
            FilterMode::Nearest,
            MipmapFilterMode::None,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sampler_is_clamp_nearest_without_mips() {
        let sampler = SamplerState::default();
        assert_eq!(sampler.address_mode, AddressMode::ClampToEdge);
        assert_eq!(sampler.filter, FilterMode::Nearest);
        assert_eq!(sampler.mipmap_filter, MipmapFilterMode::None);
    }

    #[test]
    fn sampler_state_parses_from_ron() {
        let sampler: SamplerState =
            ron::from_str("(address_mode: Repeat, filter: Linear, mipmap_filter: Linear)")
                .expect("valid sampler");
        assert_eq!(
            sampler,
            SamplerState::new(AddressMode::Repeat, FilterMode::Linear, MipmapFilterMode::Linear)
        );
    }
}
