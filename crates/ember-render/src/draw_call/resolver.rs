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

//! Maps a binding source to one of the three containers a draw call is bound to.

use ember_core::data::{BindingSource, FromProperty, PropertyContainer, PropertyError};
use std::fmt;
use std::rc::Rc;

/// The three containers a draw call reads from. Each one is optional.
#[derive(Clone, Default)]
pub struct DataSources {
    target: Option<Rc<dyn PropertyContainer>>,
    renderer: Option<Rc<dyn PropertyContainer>>,
    root: Option<Rc<dyn PropertyContainer>>,
}

impl DataSources {
    /// Creates an empty set of sources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the container of the rendered object.
    pub fn with_target(mut self, container: Rc<dyn PropertyContainer>) -> Self {
        self.target = Some(container);
        self
    }

    /// Sets the container of the renderer.
    pub fn with_renderer(mut self, container: Rc<dyn PropertyContainer>) -> Self {
        self.renderer = Some(container);
        self
    }

    /// Sets the scene-wide container.
    pub fn with_root(mut self, container: Rc<dyn PropertyContainer>) -> Self {
        self.root = Some(container);
        self
    }

    /// Returns the container a source tag designates. There is no fallback
    /// between sources.
    pub fn resolve(&self, source: BindingSource) -> Option<&Rc<dyn PropertyContainer>> {
        match source {
            BindingSource::Target => self.target.as_ref(),
            BindingSource::Renderer => self.renderer.as_ref(),
            BindingSource::Root => self.root.as_ref(),
        }
    }

    /// Reads `path` from the designated container as a `T`.
    ///
    /// A missing container or property yields `Ok(None)`.
    pub(crate) fn read<T: FromProperty>(
        &self,
        source: BindingSource,
        path: &str,
    ) -> Result<Option<T>, PropertyError> {
        let Some(container) = self.resolve(source) else {
            return Ok(None);
        };
        match container.get_as::<T>(path) {
            Ok(value) => Ok(Some(value)),
            Err(PropertyError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl fmt::Debug for DataSources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataSources")
            .field("target", &self.target.is_some())
            .field("renderer", &self.renderer.is_some())
            .field("root", &self.root.is_some())
            .finish()
    }
}
