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

//! Backend-agnostic rendering contracts.
//!
//! This module defines the "common language" between the draw-call layer and
//! a graphics backend: resource handles, render-state vocabulary, the compiled
//! program contract and the [`GraphicsContext`] trait a backend implements.
//! [`RecordingContext`] is a headless implementation that records the command
//! stream instead of submitting it.

pub mod api;
pub mod recording;
pub mod traits;

pub use self::api::*;
pub use self::recording::{ContextCommand, RecordingContext};
pub use self::traits::GraphicsContext;
