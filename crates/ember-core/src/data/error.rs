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

use std::fmt;

/// An error raised by a typed property read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyError {
    /// The container has no property at this path.
    NotFound {
        /// The property path that was read.
        path: String,
    },
    /// The property exists but holds another kind of value.
    TypeMismatch {
        /// The property path that was read.
        path: String,
        /// The kind the caller asked for.
        expected: &'static str,
        /// The kind actually stored.
        found: &'static str,
    },
}

impl fmt::Display for PropertyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyError::NotFound { path } => write!(f, "Property '{path}' not found"),
            PropertyError::TypeMismatch {
                path,
                expected,
                found,
            } => write!(
                f,
                "Property '{path}' holds a {found} value, expected {expected}"
            ),
        }
    }
}

impl std::error::Error for PropertyError {}
