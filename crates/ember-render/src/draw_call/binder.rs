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

//! Resolution of program inputs into slots and uniforms.

use super::formatter::split_array_index;
use super::resolver::DataSources;
use super::state::RenderStateSnapshot;
use super::tracker::RebindInstruction;
use super::uniforms::UniformValue;
use super::zsort::{MODEL_TO_WORLD_MATRIX, VERTEX_POSITIONS, WORLD_TO_SCREEN_MATRIX};
use super::{DrawCallState, IndexBinding, TextureSlot, VertexSlot};
use crate::error::DrawCallError;
use ember_core::data::{BindingSource, PropertyError, PropertyValue, UniformArray};
use ember_core::renderer::{
    IndexBuffer, InputType, ProgramInput, SamplerState, Texture, VertexBuffer,
};
use std::rc::Rc;

const INDICES_TEMPLATE: &str = "geometry[${geometryId}].indices";

fn check_location(input: &ProgramInput) -> Result<(), DrawCallError> {
    if input.location < 0 {
        return Err(DrawCallError::InvalidLocation {
            input: input.name.clone(),
            location: input.location,
        });
    }
    Ok(())
}

/// Components per element of a uniform array for a declared type.
fn array_arity(input: &ProgramInput) -> Result<u32, DrawCallError> {
    match input.input_type {
        InputType::Float1 | InputType::Int1 => Ok(1),
        InputType::Float2 | InputType::Int2 => Ok(2),
        InputType::Float3 | InputType::Int3 => Ok(3),
        InputType::Float4 | InputType::Int4 => Ok(4),
        InputType::Float16 => Ok(16),
        input_type => Err(DrawCallError::UnsupportedUniformType {
            input: input.name.clone(),
            input_type,
        }),
    }
}

/// Converts a directly matched property into the value of a uniform input.
fn uniform_value(
    input: &ProgramInput,
    path: &str,
    value: &PropertyValue,
) -> Result<UniformValue, DrawCallError> {
    let uniform = match (input.input_type, value) {
        (InputType::Float1, PropertyValue::Float(v)) => UniformValue::Float(*v),
        (InputType::Float2, PropertyValue::Float2(v)) => UniformValue::Float2(*v),
        (InputType::Float3, PropertyValue::Float3(v)) => UniformValue::Float3(*v),
        (InputType::Float4, PropertyValue::Float4(v)) => UniformValue::Float4(*v),
        (InputType::Float16, PropertyValue::Float16(m)) => UniformValue::Float16(*m),
        (InputType::Int1, PropertyValue::Int(v)) => UniformValue::Int(*v),
        (InputType::Int2, PropertyValue::Int2(v)) => UniformValue::Int2(*v),
        (InputType::Int3, PropertyValue::Int3(v)) => UniformValue::Int3(*v),
        (InputType::Int4, PropertyValue::Int4(v)) => UniformValue::Int4(*v),
        (InputType::Float9 | InputType::Bool1, _) => {
            return Err(DrawCallError::UnsupportedUniformType {
                input: input.name.clone(),
                input_type: input.input_type,
            })
        }
        (input_type, value) => {
            return Err(PropertyError::TypeMismatch {
                path: path.to_owned(),
                expected: input_type.as_str(),
                found: value.kind(),
            }
            .into())
        }
    };
    Ok(uniform)
}

impl DrawCallState {
    /// Resets, then resolves the index buffer, every program input and the
    /// render state.
    pub(super) fn bind(&mut self, sources: DataSources) -> Result<(), DrawCallError> {
        self.reset();
        self.sources = sources;

        let Some(program) = self.program.clone() else {
            log::warn!("DrawCall {}: bind requested without a program.", self.id);
            return Err(DrawCallError::MissingProgram);
        };

        self.bind_index_buffer()?;

        for input in program.inputs.iter() {
            match input.input_type {
                InputType::Attribute => self.bind_attribute(input)?,
                InputType::Sampler2d | InputType::SamplerCube => self.bind_texture_sampler(input)?,
                InputType::Unknown => {}
                _ => self.bind_uniform(input)?,
            }
        }

        self.bind_states();

        log::debug!(
            "DrawCall {}: bound {} inputs ({} texture slots, {} vertex slots, {} uniforms, {} subscriptions).",
            self.id,
            program.inputs.len(),
            self.textures.allocated(),
            self.vertex_buffers.allocated(),
            self.uniforms.len(),
            self.subscriptions.len() + self.zsort.len(),
        );
        Ok(())
    }

    /// Replays one binding step with its original arguments.
    ///
    /// On failure the slot or uniform the step fills is left unbound.
    pub(super) fn rebind(&mut self, instruction: &RebindInstruction) -> Result<(), DrawCallError> {
        let result = self.replay(instruction);
        if result.is_err() {
            self.unbind(instruction);
        }
        result
    }

    fn unbind(&mut self, instruction: &RebindInstruction) {
        match instruction {
            RebindInstruction::IndexBuffer { .. } => self.index_buffer = None,
            RebindInstruction::VertexAttribute { slot, .. } => self.vertex_buffers.clear(*slot),
            RebindInstruction::TextureSampler { slot, .. } => self.textures.clear(*slot),
            RebindInstruction::Uniform { input, .. } => {
                self.uniforms.remove(input.location);
            }
        }
    }

    fn replay(&mut self, instruction: &RebindInstruction) -> Result<(), DrawCallError> {
        match instruction {
            RebindInstruction::IndexBuffer { path } => self.resolve_index_buffer(path),
            RebindInstruction::VertexAttribute {
                input,
                path,
                source,
                slot,
            } => self.resolve_attribute(input, path, *source, *slot),
            RebindInstruction::TextureSampler {
                input,
                path,
                source,
                slot,
                sampler,
            } => self.resolve_texture(input, path, *source, *slot, *sampler),
            RebindInstruction::Uniform {
                input,
                path,
                array_path,
                source,
            } => self.resolve_uniform(input, path, array_path.as_deref(), *source),
        }
    }

    /// Registers `instruction` for `path` on the container designated by
    /// `source`. Without a container there is nothing to watch.
    fn track(&mut self, path: &str, source: BindingSource, instruction: RebindInstruction) {
        let Some(container) = self.sources.resolve(source).cloned() else {
            return;
        };
        let weak = self.self_ref.clone();
        let key = path.to_owned();
        self.subscriptions.track(path, instruction, || {
            container
                .property_reference_changed(&key)
                .connect(move |_| DrawCallState::on_property_changed(&weak, &key))
        });
    }

    fn bind_index_buffer(&mut self) -> Result<(), DrawCallError> {
        let path = self.formatter.format(INDICES_TEMPLATE);
        self.track(
            &path,
            BindingSource::Target,
            RebindInstruction::IndexBuffer { path: path.clone() },
        );
        self.resolve_index_buffer(&path)
    }

    fn resolve_index_buffer(&mut self, path: &str) -> Result<(), DrawCallError> {
        let indices = self
            .sources
            .read::<Rc<IndexBuffer>>(BindingSource::Target, path)?;
        self.index_buffer = indices.map(|buffer| IndexBinding {
            id: buffer.id,
            count: buffer.len() as u32,
        });
        Ok(())
    }

    fn bind_attribute(&mut self, input: &ProgramInput) -> Result<(), DrawCallError> {
        let Some(binding) = self.bindings.attributes.get(&input.name).cloned() else {
            return Ok(());
        };
        check_location(input)?;

        // Reserved before resolution so replays land in the same slot.
        let slot = self.vertex_buffers.allocate()?;
        let path = self.formatter.format(&binding.property);
        self.track(
            &path,
            binding.source,
            RebindInstruction::VertexAttribute {
                input: input.clone(),
                path: path.clone(),
                source: binding.source,
                slot,
            },
        );
        self.resolve_attribute(input, &path, binding.source, slot)
    }

    fn resolve_attribute(
        &mut self,
        input: &ProgramInput,
        path: &str,
        source: BindingSource,
        slot: usize,
    ) -> Result<(), DrawCallError> {
        let Some(buffer) = self.sources.read::<Rc<VertexBuffer>>(source, path)? else {
            self.vertex_buffers.clear(slot);
            return Ok(());
        };

        let attribute_name = path.rsplit('.').next().unwrap_or(path);
        let attribute = buffer.attribute(attribute_name).ok_or_else(|| {
            DrawCallError::MissingVertexAttribute {
                input: input.name.clone(),
                property: path.to_owned(),
                attribute: attribute_name.to_owned(),
            }
        })?;

        self.vertex_buffers.set(
            slot,
            VertexSlot {
                buffer: buffer.id,
                location: input.location,
                vertex_size: buffer.vertex_size as i32,
                attribute_size: attribute.size as i32,
                attribute_offset: attribute.offset as i32,
            },
        );
        Ok(())
    }

    fn bind_texture_sampler(&mut self, input: &ProgramInput) -> Result<(), DrawCallError> {
        let Some(binding) = self.bindings.uniforms.get(&input.name).cloned() else {
            return Ok(());
        };
        check_location(input)?;

        let slot = self.textures.allocate()?;
        let sampler = self.states.sampler_for(&input.name);
        let path = self.formatter.format(&binding.property);
        self.track(
            &path,
            binding.source,
            RebindInstruction::TextureSampler {
                input: input.clone(),
                path: path.clone(),
                source: binding.source,
                slot,
                sampler,
            },
        );
        self.resolve_texture(input, &path, binding.source, slot, sampler)
    }

    fn resolve_texture(
        &mut self,
        input: &ProgramInput,
        path: &str,
        source: BindingSource,
        slot: usize,
        sampler: SamplerState,
    ) -> Result<(), DrawCallError> {
        match self.sources.read::<Rc<Texture>>(source, path)? {
            Some(texture) => self.textures.set(
                slot,
                TextureSlot {
                    texture: texture.id,
                    location: input.location,
                    sampler,
                },
            ),
            None => self.textures.clear(slot),
        }
        Ok(())
    }

    fn bind_uniform(&mut self, input: &ProgramInput) -> Result<(), DrawCallError> {
        let (base_name, suffix) = split_array_index(&input.name);
        let Some(binding) = self.bindings.uniforms.get(base_name).cloned() else {
            return Ok(());
        };
        check_location(input)?;

        let base_path = self.formatter.format(&binding.property);
        let path = format!("{base_path}{suffix}");
        let array_path = (!suffix.is_empty()).then_some(base_path);

        let instruction = RebindInstruction::Uniform {
            input: input.clone(),
            path: path.clone(),
            array_path: array_path.clone(),
            source: binding.source,
        };
        self.track(&path, binding.source, instruction.clone());
        if let Some(array_path) = &array_path {
            self.track(array_path, binding.source, instruction);
        }

        self.resolve_uniform(input, &path, array_path.as_deref(), binding.source)
    }

    /// A direct match at `path` wins; otherwise `array_path`, when given, is
    /// read as a numeric array.
    fn resolve_uniform(
        &mut self,
        input: &ProgramInput,
        path: &str,
        array_path: Option<&str>,
        source: BindingSource,
    ) -> Result<(), DrawCallError> {
        let direct = self
            .sources
            .resolve(source)
            .and_then(|container| container.get(path));

        let value = match (direct, array_path) {
            (Some(value), _) => Some(uniform_value(input, path, &value)?),
            (None, Some(array_path)) => self.resolve_uniform_array(input, array_path, source)?,
            (None, None) => None,
        };

        match value {
            Some(value) => self.uniforms.set(input.location, value),
            None => {
                self.uniforms.remove(input.location);
            }
        }
        Ok(())
    }

    fn resolve_uniform_array(
        &self,
        input: &ProgramInput,
        path: &str,
        source: BindingSource,
    ) -> Result<Option<UniformValue>, DrawCallError> {
        if input.input_type.is_int() {
            let Some(array) = self.sources.read::<Rc<UniformArray<i32>>>(source, path)? else {
                return Ok(None);
            };
            if !array.is_bound() {
                return Ok(None);
            }
            let arity = array_arity(input)?;
            Ok(Some(UniformValue::IntArray { arity, array }))
        } else {
            let Some(array) = self.sources.read::<Rc<UniformArray<f32>>>(source, path)? else {
                return Ok(None);
            };
            if !array.is_bound() {
                return Ok(None);
            }
            let arity = array_arity(input)?;
            Ok(Some(UniformValue::FloatArray { arity, array }))
        }
    }

    fn bind_states(&mut self) {
        self.render_state = RenderStateSnapshot::capture(&self.states);
        if self.render_state.zsorted {
            self.watch_zsort_properties();
        }
    }

    fn watch_zsort_properties(&mut self) {
        let watched = [
            (BindingSource::Target, MODEL_TO_WORLD_MATRIX),
            (BindingSource::Target, VERTEX_POSITIONS),
            (BindingSource::Renderer, WORLD_TO_SCREEN_MATRIX),
        ];
        for (source, path) in watched {
            let Some(container) = self.sources.resolve(source).cloned() else {
                continue;
            };
            let weak = self.self_ref.clone();
            let slot = container
                .property_reference_changed(path)
                .connect(move |changed| DrawCallState::on_zsort_property_changed(&weak, changed));
            self.zsort.hold(slot);
        }
    }
}
