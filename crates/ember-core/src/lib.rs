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

//! # Ember Core
//!
//! Foundational crate containing the traits, core types and interface contracts
//! that the draw-call layer is written against:
//!
//! - [`math`]: vectors and matrices used by uniforms and spatial queries.
//! - [`data`]: the property-container contract, change signals and binding tables.
//! - [`renderer`]: resource handles, render-state vocabulary, the compiled program
//!   contract and the [`renderer::GraphicsContext`] trait.
//! - [`event`]: a generic channel-backed event bus.
//! - [`config`]: loading of technique descriptors from RON or JSON.

#![warn(missing_docs)]

pub mod config;
pub mod data;
pub mod event;
pub mod math;
pub mod renderer;

pub use config::{ConfigError, TechniqueDescriptor};
pub use data::{Container, PropertyContainer, PropertyValue};
