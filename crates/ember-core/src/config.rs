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

//! Loading of technique descriptors.
//!
//! A technique descriptor bundles the binding table and the render state
//! shared by every draw call of a technique. Descriptors are authored in RON
//! or JSON:
//!
//! ```
//! use ember_core::config::TechniqueDescriptor;
//!
//! let technique = TechniqueDescriptor::from_ron(r#"(
//!     uniform_bindings: {
//!         "diffuseColor": (property: "material.diffuseColor", source: Target),
//!     },
//!     states: (priority: 10.0),
//! )"#).unwrap();
//! assert_eq!(technique.states.priority, 10.0);
//! ```

use crate::data::{BindingMap, BindingTable};
use crate::renderer::api::States;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// An error raised while parsing a technique descriptor.
#[derive(Debug)]
pub enum ConfigError {
    /// The RON document is malformed or does not match the descriptor.
    Ron(ron::error::SpannedError),
    /// The JSON document is malformed or does not match the descriptor.
    Json(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Ron(e) => write!(f, "Invalid RON technique descriptor: {e}"),
            ConfigError::Json(e) => write!(f, "Invalid JSON technique descriptor: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Ron(e) => Some(e),
            ConfigError::Json(e) => Some(e),
        }
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(e: ron::error::SpannedError) -> Self {
        ConfigError::Ron(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

/// The bindings and render state of one technique.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechniqueDescriptor {
    /// Vertex attribute bindings.
    pub attribute_bindings: BindingMap,
    /// Uniform and sampler bindings.
    pub uniform_bindings: BindingMap,
    /// Render-state bindings.
    pub state_bindings: BindingMap,
    /// The declared render state.
    pub states: States,
}

impl TechniqueDescriptor {
    /// Parses a descriptor from RON.
    pub fn from_ron(source: &str) -> Result<Self, ConfigError> {
        let descriptor = ron::from_str(source)?;
        log::debug!("TechniqueDescriptor: loaded from RON.");
        Ok(descriptor)
    }

    /// Parses a descriptor from JSON.
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        let descriptor = serde_json::from_str(source)?;
        log::debug!("TechniqueDescriptor: loaded from JSON.");
        Ok(descriptor)
    }

    /// Splits the descriptor into a shareable binding table and its render state.
    pub fn into_parts(self) -> (Rc<BindingTable>, States) {
        let table = BindingTable::new(
            self.attribute_bindings,
            self.uniform_bindings,
            self.state_bindings,
        );
        (Rc::new(table), self.states)
    }
}
