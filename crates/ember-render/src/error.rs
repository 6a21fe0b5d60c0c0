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

//! Defines the configuration errors a draw call can raise.

use crate::draw_call::SlotKind;
use ember_core::data::PropertyError;
use ember_core::renderer::InputType;
use std::fmt;

/// A mismatch between a compiled program and the data bound to it.
///
/// These errors cannot be fixed by waiting for data: they signal that the
/// program, the binding table and the scene disagree. Data that is merely
/// missing is never reported as an error.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCallError {
    /// A bound program input has a negative location.
    InvalidLocation {
        /// The input name.
        input: String,
        /// The reflected location.
        location: i32,
    },
    /// More resources were bound than the slot table can hold.
    SlotCapacityExceeded {
        /// The kind of slot that overflowed.
        kind: SlotKind,
        /// The capacity of the table.
        capacity: usize,
    },
    /// A resolved value targets an input type the uniform store does not model.
    UnsupportedUniformType {
        /// The input name.
        input: String,
        /// The declared type.
        input_type: InputType,
    },
    /// A vertex buffer was found but lacks the attribute the program reads.
    MissingVertexAttribute {
        /// The input name.
        input: String,
        /// The property path of the vertex buffer.
        property: String,
        /// The attribute that was looked up.
        attribute: String,
    },
    /// A property holds a value of the wrong kind for its input.
    Property(PropertyError),
    /// The draw call was bound or rendered before a program was installed.
    MissingProgram,
}

impl fmt::Display for DrawCallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawCallError::InvalidLocation { input, location } => {
                write!(f, "Invalid location {location} for program input '{input}'")
            }
            DrawCallError::SlotCapacityExceeded { kind, capacity } => {
                write!(f, "Cannot bind more than {capacity} {kind} slots")
            }
            DrawCallError::UnsupportedUniformType { input, input_type } => {
                write!(
                    f,
                    "Unsupported uniform type '{input_type}' for program input '{input}'"
                )
            }
            DrawCallError::MissingVertexAttribute {
                input,
                property,
                attribute,
            } => write!(
                f,
                "Vertex buffer '{property}' has no attribute '{attribute}' required by input '{input}'"
            ),
            DrawCallError::Property(e) => write!(f, "{e}"),
            DrawCallError::MissingProgram => write!(f, "No program installed on the draw call"),
        }
    }
}

impl std::error::Error for DrawCallError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DrawCallError::Property(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PropertyError> for DrawCallError {
    fn from(e: PropertyError) -> Self {
        DrawCallError::Property(e)
    }
}
