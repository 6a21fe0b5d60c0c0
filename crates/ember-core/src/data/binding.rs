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

//! Binding tables: which property feeds which program input.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which of the three bound containers a binding reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BindingSource {
    /// The container of the rendered object (geometry, material, transform).
    #[default]
    Target,
    /// The container of the renderer (camera, viewport).
    Renderer,
    /// The scene-wide container (lights, time).
    Root,
}

/// A property path template and the container it is read from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Binding {
    /// The property path, possibly containing `${variable}` placeholders.
    pub property: String,
    /// The container to read from.
    #[serde(default)]
    pub source: BindingSource,
}

impl Binding {
    /// Creates a binding.
    pub fn new(property: impl Into<String>, source: BindingSource) -> Self {
        Self {
            property: property.into(),
            source,
        }
    }
}

/// Program input name to binding.
pub type BindingMap = HashMap<String, Binding>;

/// The bindings a technique declares, grouped by kind of program input.
///
/// A table is immutable once built and is shared by every draw call of the
/// technique.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingTable {
    /// Vertex attribute bindings.
    pub attributes: BindingMap,
    /// Uniform and sampler bindings.
    pub uniforms: BindingMap,
    /// Render-state bindings.
    pub states: BindingMap,
}

impl BindingTable {
    /// Creates a table from its three maps.
    pub fn new(attributes: BindingMap, uniforms: BindingMap, states: BindingMap) -> Self {
        Self {
            attributes,
            uniforms,
            states,
        }
    }

    /// Adds an attribute binding.
    pub fn with_attribute(
        mut self,
        input: impl Into<String>,
        property: impl Into<String>,
        source: BindingSource,
    ) -> Self {
        self.attributes
            .insert(input.into(), Binding::new(property, source));
        self
    }

    /// Adds a uniform or sampler binding.
    pub fn with_uniform(
        mut self,
        input: impl Into<String>,
        property: impl Into<String>,
        source: BindingSource,
    ) -> Self {
        self.uniforms
            .insert(input.into(), Binding::new(property, source));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_defaults_to_target_when_omitted() {
        let binding: Binding =
            ron::from_str(r#"(property: "material.diffuseColor")"#).expect("valid binding");
        assert_eq!(binding.source, BindingSource::Target);
    }

    #[test]
    fn builder_fills_the_right_maps() {
        let table = BindingTable::default()
            .with_attribute("position", "geometry[${geometryId}].vertex.attribute.position", BindingSource::Target)
            .with_uniform("viewMatrix", "camera.viewMatrix", BindingSource::Renderer);

        assert_eq!(table.attributes.len(), 1);
        assert_eq!(
            table.uniforms.get("viewMatrix").map(|b| b.source),
            Some(BindingSource::Renderer)
        );
        assert!(table.states.is_empty());
    }
}
