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

//! Backend-agnostic rendering API.
//!
//! - **[`buffer`]**: vertex and index buffer handles.
//! - **[`texture`]**: texture handles and sampler state.
//! - **[`pipeline`]**: render-state vocabulary and the technique-declared [`States`].
//! - **[`program`]**: the compiled shader program contract.

pub mod buffer;
pub mod pipeline;
pub mod program;
pub mod texture;

pub use self::buffer::{BufferId, IndexBuffer, VertexAttribute, VertexBuffer};
pub use self::pipeline::*;
pub use self::program::{InputType, Program, ProgramId, ProgramInput, ProgramInputs};
pub use self::texture::{
    AddressMode, FilterMode, MipmapFilterMode, SamplerState, Texture, TextureId, TextureKind,
};
