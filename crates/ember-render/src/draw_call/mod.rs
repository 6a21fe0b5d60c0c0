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

//! The draw call: binding of program inputs and dispatch of one indexed draw.
//!
//! A [`DrawCall`] is created from a technique's binding table and render
//! state, then configured with a program and bound to three property
//! containers. Binding resolves every program input into a texture slot, a
//! vertex slot or a uniform and subscribes to each resolved property path.
//! When a property changes afterwards, only the binding steps that read it
//! are replayed. [`DrawCall::render`] then issues the command sequence on a
//! [`GraphicsContext`].

mod binder;
mod executor;
mod eye_space;
mod formatter;
mod resolver;
mod slots;
mod state;
mod tracker;
mod uniforms;
mod zsort;

pub use self::formatter::{split_array_index, substitute, FormatFunction, PropertyPathFormatter};
pub use self::resolver::DataSources;
pub use self::slots::{
    Slot, SlotKind, TextureSlot, VertexSlot, MAX_NUM_TEXTURES, MAX_NUM_VERTEX_BUFFERS,
};
pub use self::state::RenderStateSnapshot;
pub use self::uniforms::UniformValue;
pub use self::zsort::{
    ZSortNeeded, MODEL_TO_WORLD_MATRIX, VERTEX_POSITIONS, WORLD_TO_SCREEN_MATRIX,
};

use self::slots::SlotTable;
use self::tracker::SubscriptionRegistry;
use self::uniforms::UniformStore;
use self::zsort::ZSortSignals;
use crate::error::DrawCallError;
use ember_core::config::TechniqueDescriptor;
use ember_core::data::BindingTable;
use ember_core::math::Vec3;
use ember_core::renderer::{BufferId, GraphicsContext, Program, States, Texture};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::rc::{Rc, Weak};
use uuid::Uuid;

/// A unique identifier for a draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DrawCallId(Uuid);

impl DrawCallId {
    /// Generates a new random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DrawCallId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DrawCallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The index buffer resolved from the target container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexBinding {
    /// The buffer handle.
    pub id: BufferId,
    /// The number of indices.
    pub count: u32,
}

pub(crate) struct DrawCallState {
    id: DrawCallId,
    self_ref: Weak<RefCell<DrawCallState>>,
    bindings: Rc<BindingTable>,
    states: States,
    program: Option<Rc<Program>>,
    sources: DataSources,
    formatter: PropertyPathFormatter,
    textures: SlotTable<TextureSlot, MAX_NUM_TEXTURES>,
    vertex_buffers: SlotTable<VertexSlot, MAX_NUM_VERTEX_BUFFERS>,
    index_buffer: Option<IndexBinding>,
    uniforms: UniformStore,
    render_state: RenderStateSnapshot,
    subscriptions: SubscriptionRegistry,
    zsort: ZSortSignals,
    pending_errors: VecDeque<DrawCallError>,
}

impl DrawCallState {
    /// Clears every resolved value and releases every subscription.
    fn reset(&mut self) {
        self.textures.reset();
        self.vertex_buffers.reset();
        self.index_buffer = None;
        self.uniforms.clear();
        self.render_state = RenderStateSnapshot::default();
        self.pending_errors.clear();

        let released = self.subscriptions.clear() + self.zsort.release();
        if released > 0 {
            log::debug!("DrawCall {}: released {released} subscriptions.", self.id);
        }
    }

    /// Entry point of every property change notification.
    fn on_property_changed(weak: &Weak<RefCell<DrawCallState>>, path: &str) {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        let Ok(mut state) = inner.try_borrow_mut() else {
            log::error!("DrawCall: change of '{path}' notified while the draw call is busy, ignored.");
            return;
        };

        for instruction in state.subscriptions.instructions(path) {
            log::trace!(
                "DrawCall {}: rebinding '{}' after change of '{path}'.",
                state.id,
                instruction.input_name()
            );
            if let Err(e) = state.rebind(&instruction) {
                log::error!("DrawCall {}: rebinding '{path}' failed: {e}", state.id);
                state.pending_errors.push_back(e);
            }
        }
    }

    fn on_zsort_property_changed(weak: &Weak<RefCell<DrawCallState>>, path: &str) {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        match inner.try_borrow_mut() {
            Ok(mut state) => {
                let id = state.id;
                state.zsort.publish(id);
            }
            Err(_) => {
                log::error!("DrawCall: z-sort change of '{path}' notified while the draw call is busy, ignored.");
            }
        };
    }
}

/// One bound, dispatch-ready draw operation.
///
/// The handle is cheap to clone; clones share the same state. Dropping the last
/// handle releases every subscription the draw call holds.
#[derive(Clone)]
pub struct DrawCall {
    inner: Rc<RefCell<DrawCallState>>,
}

impl DrawCall {
    /// Creates an unbound draw call for a technique.
    ///
    /// ## Arguments
    /// * `bindings` - The technique's binding table, shared with its other draw calls.
    /// * `states` - The technique's render state.
    pub fn new(bindings: Rc<BindingTable>, states: States) -> Self {
        let inner = Rc::new_cyclic(|self_ref| {
            RefCell::new(DrawCallState {
                id: DrawCallId::new(),
                self_ref: self_ref.clone(),
                bindings,
                states,
                program: None,
                sources: DataSources::default(),
                formatter: PropertyPathFormatter::new(),
                textures: SlotTable::new(),
                vertex_buffers: SlotTable::new(),
                index_buffer: None,
                uniforms: UniformStore::default(),
                render_state: RenderStateSnapshot::default(),
                subscriptions: SubscriptionRegistry::default(),
                zsort: ZSortSignals::default(),
                pending_errors: VecDeque::new(),
            })
        });
        Self { inner }
    }

    /// Creates an unbound draw call from a technique descriptor.
    pub fn from_technique(technique: TechniqueDescriptor) -> Self {
        let (bindings, states) = technique.into_parts();
        Self::new(bindings, states)
    }

    /// Returns the unique identifier of this draw call.
    pub fn id(&self) -> DrawCallId {
        self.inner.borrow().id
    }

    /// Replaces the variables used to expand property path templates.
    ///
    /// Takes effect at the next [`DrawCall::bind`].
    pub fn set_variables(&self, variables: HashMap<String, String>) {
        self.inner.borrow_mut().formatter.set_variables(variables);
    }

    /// Sets one path template variable. Takes effect at the next bind.
    pub fn set_variable(&self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.borrow_mut().formatter.set_variable(name, value);
    }

    /// Replaces `${name}` substitution with a custom path formatter.
    pub fn set_path_formatter(
        &self,
        formatter: impl Fn(&str, &HashMap<String, String>) -> String + 'static,
    ) {
        self.inner
            .borrow_mut()
            .formatter
            .set_format_function(Rc::new(formatter));
    }

    /// Installs the program whose inputs are bound. Takes effect at the next bind.
    pub fn set_program(&self, program: Rc<Program>) {
        self.inner.borrow_mut().program = Some(program);
    }

    /// Installs `program` and binds the draw call to `sources`.
    pub fn configure(&self, program: Rc<Program>, sources: DataSources) -> Result<(), DrawCallError> {
        self.set_program(program);
        self.bind(sources)
    }

    /// Binds the draw call to a new set of containers.
    ///
    /// All previously resolved state and subscriptions are dropped before
    /// every program input is resolved again.
    ///
    /// ## Errors
    /// Returns the first configuration error met: a negative location, a
    /// slot table overflow, an unsupported uniform type, a missing vertex
    /// attribute, a property of the wrong kind, or no program at all.
    pub fn bind(&self, sources: DataSources) -> Result<(), DrawCallError> {
        self.inner.borrow_mut().bind(sources)
    }

    /// Clears every slot, uniform and subscription without rebinding.
    pub fn reset(&self) {
        self.inner.borrow_mut().reset();
    }

    /// Issues the command sequence of this draw call.
    ///
    /// ## Arguments
    /// * `context` - The graphics context receiving the commands.
    /// * `render_target` - Overrides the render target declared by the technique.
    ///
    /// ## Errors
    /// Returns the oldest error raised by an earlier change notification, one
    /// per call, or `DrawCallError::MissingProgram`. No command is emitted in
    /// either case.
    pub fn render(
        &self,
        context: &mut dyn GraphicsContext,
        render_target: Option<&Texture>,
    ) -> Result<(), DrawCallError> {
        self.inner.borrow_mut().render(context, render_target)
    }

    /// Returns the view-space reference point used for depth sorting.
    pub fn eye_space_position(&self) -> Vec3 {
        self.inner.borrow().eye_space_position()
    }

    /// Registers a channel receiving a [`ZSortNeeded`] event every time a
    /// property affecting the eye-space position of this draw call changes.
    pub fn register_zsort_listener(&self, sender: flume::Sender<ZSortNeeded>) {
        self.inner.borrow_mut().zsort.add_listener(sender);
    }

    /// Returns the installed program.
    pub fn program(&self) -> Option<Rc<Program>> {
        self.inner.borrow().program.clone()
    }

    /// Returns a copy of the texture slot table.
    pub fn texture_slots(&self) -> [TextureSlot; MAX_NUM_TEXTURES] {
        *self.inner.borrow().textures.slots()
    }

    /// Returns a copy of the vertex slot table.
    pub fn vertex_slots(&self) -> [VertexSlot; MAX_NUM_VERTEX_BUFFERS] {
        *self.inner.borrow().vertex_buffers.slots()
    }

    /// Returns the resolved index buffer.
    pub fn index_buffer(&self) -> Option<IndexBinding> {
        self.inner.borrow().index_buffer
    }

    /// Returns the uniform bound at `location`.
    pub fn uniform(&self, location: i32) -> Option<UniformValue> {
        self.inner.borrow().uniforms.get(location).cloned()
    }

    /// Returns every bound uniform in ascending location order.
    pub fn uniforms(&self) -> Vec<(i32, UniformValue)> {
        self.inner
            .borrow()
            .uniforms
            .iter()
            .map(|(location, value)| (location, value.clone()))
            .collect()
    }

    /// Returns the captured render state.
    pub fn render_state(&self) -> RenderStateSnapshot {
        self.inner.borrow().render_state.clone()
    }

    /// Returns the number of live property subscriptions, z-sort ones included.
    pub fn subscription_count(&self) -> usize {
        let state = self.inner.borrow();
        state.subscriptions.len() + state.zsort.len()
    }

    /// Returns `true` if the draw call watches `path` for rebinding.
    pub fn is_subscribed(&self, path: &str) -> bool {
        self.inner.borrow().subscriptions.is_subscribed(path)
    }

    /// Returns the draw order hint.
    pub fn priority(&self) -> f32 {
        self.inner.borrow().render_state.priority
    }

    /// Returns `true` if the draw call is depth-sorted.
    pub fn zsorted(&self) -> bool {
        self.inner.borrow().render_state.zsorted
    }
}

impl fmt::Debug for DrawCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(state) => f
                .debug_struct("DrawCall")
                .field("id", &state.id)
                .field("program", &state.program.as_ref().map(|p| p.id))
                .field("sources", &state.sources)
                .field("subscriptions", &state.subscriptions.len())
                .finish(),
            Err(_) => f.debug_struct("DrawCall").finish_non_exhaustive(),
        }
    }
}
