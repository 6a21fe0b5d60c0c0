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

//! Scene data as seen by draw calls.
//!
//! - [`PropertyContainer`]: the read/subscribe contract of a property store.
//! - [`Container`]: an in-memory container.
//! - [`Signal`]: the synchronous per-path change notification.
//! - [`BindingTable`]: the technique-declared mapping from program inputs to
//!   property paths.

mod binding;
mod container;
mod error;
mod signal;
mod value;

pub use self::binding::{Binding, BindingMap, BindingSource, BindingTable};
pub use self::container::{Container, PropertyContainer};
pub use self::error::PropertyError;
pub use self::signal::{Signal, SignalCallback, SignalSlot};
pub use self::value::{FromProperty, PropertyValue, UniformArray};
