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

use anyhow::Result;
use approx::assert_relative_eq;
use ember_core::data::{BindingSource, BindingTable, Container, PropertyContainer, UniformArray};
use ember_core::event::EventBus;
use ember_core::math::{Mat4, Vec3};
use ember_core::renderer::{
    AddressMode, BufferId, ContextCommand, FilterMode, GraphicsContext, IndexBuffer, InputType,
    MipmapFilterMode, Program, ProgramId, ProgramInputs, RecordingContext, SamplerState, States,
    Texture, TextureId, VertexAttribute, VertexBuffer,
};
use ember_core::TechniqueDescriptor;
use ember_render::{
    DataSources, DrawCall, DrawCallError, Slot, SlotKind, TextureSlot, UniformValue, VertexSlot,
    ZSortNeeded, MAX_NUM_TEXTURES,
};
use std::rc::Rc;

// --- Fixtures ---

const POSITIONS: &str = "geometry[0].vertex.attribute.position";
const UVS: &str = "geometry[0].vertex.attribute.uv";
const INDICES: &str = "geometry[0].indices";

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn technique() -> BindingTable {
    BindingTable::default()
        .with_attribute(
            "position",
            "geometry[${geometryId}].vertex.attribute.position",
            BindingSource::Target,
        )
        .with_attribute(
            "uv",
            "geometry[${geometryId}].vertex.attribute.uv",
            BindingSource::Target,
        )
        .with_uniform("diffuseColor", "material.diffuseColor", BindingSource::Target)
        .with_uniform("diffuseMap", "material.diffuseMap", BindingSource::Target)
        .with_uniform("normalMap", "material.normalMap", BindingSource::Target)
        .with_uniform(
            "modelToWorldMatrix",
            "transform.modelToWorldMatrix",
            BindingSource::Target,
        )
        .with_uniform(
            "worldToScreenMatrix",
            "camera.worldToScreenMatrix",
            BindingSource::Renderer,
        )
        .with_uniform("lightCount", "lights.count", BindingSource::Root)
        .with_uniform("lightColors", "lights.colors", BindingSource::Root)
        .with_uniform("lightIds", "lights.ids", BindingSource::Root)
}

fn inputs() -> ProgramInputs {
    ProgramInputs::new()
        .with("position", InputType::Attribute, 0)
        .with("uv", InputType::Attribute, 1)
        .with("diffuseColor", InputType::Float3, 2)
        .with("diffuseMap", InputType::Sampler2d, 3)
        .with("normalMap", InputType::Sampler2d, 4)
        .with("modelToWorldMatrix", InputType::Float16, 5)
}

fn program(inputs: ProgramInputs) -> Rc<Program> {
    Rc::new(Program::new(ProgramId(1), inputs))
}

fn quad() -> Rc<VertexBuffer> {
    Rc::new(VertexBuffer::new(
        BufferId(10),
        vec![
            VertexAttribute::new("position", 3, 0),
            VertexAttribute::new("uv", 2, 3),
        ],
        vec![
            -1.0, -1.0, 0.0, 0.0, 0.0, //
            1.0, -1.0, 0.0, 1.0, 0.0, //
            1.0, 1.0, 0.0, 1.0, 1.0, //
            -1.0, 1.0, 0.0, 0.0, 1.0,
        ],
    ))
}

fn geometry(target: &Container) {
    let vertices = quad();
    target.set(POSITIONS, Rc::clone(&vertices));
    target.set(UVS, vertices);
    target.set(
        INDICES,
        Rc::new(IndexBuffer::new(BufferId(11), vec![0, 1, 2, 0, 2, 3])),
    );
}

struct Scene {
    target: Rc<Container>,
    renderer: Rc<Container>,
    root: Rc<Container>,
}

impl Scene {
    fn new() -> Self {
        Self {
            target: Container::new(),
            renderer: Container::new(),
            root: Container::new(),
        }
    }

    fn sources(&self) -> DataSources {
        DataSources::new()
            .with_target(self.target.clone())
            .with_renderer(self.renderer.clone())
            .with_root(self.root.clone())
    }
}

fn render(draw_call: &DrawCall) -> Result<Vec<ContextCommand>> {
    let mut ctx = RecordingContext::new();
    draw_call.render(&mut ctx, None)?;
    Ok(ctx.take_commands())
}

fn stage(command: &ContextCommand) -> u32 {
    match command {
        ContextCommand::SetRenderToTexture(_)
        | ContextCommand::SetRenderToBackBuffer
        | ContextCommand::Clear => 0,
        ContextCommand::SetProgram(_) => 1,
        ContextCommand::UniformFloats { .. } | ContextCommand::UniformMatrix4 { .. } => 2,
        ContextCommand::UniformInts { .. } => 3,
        ContextCommand::UniformFloatArray { .. } => 4,
        ContextCommand::UniformIntArray { .. } => 5,
        ContextCommand::Texture { .. } | ContextCommand::SamplerState { .. } => 6,
        ContextCommand::VertexBuffer { .. } => 7,
        ContextCommand::ColorMask(_)
        | ContextCommand::BlendMode(_)
        | ContextCommand::DepthTest { .. }
        | ContextCommand::StencilTest { .. }
        | ContextCommand::ScissorTest { .. }
        | ContextCommand::TriangleCulling(_) => 8,
        ContextCommand::DrawTriangles { .. } => 9,
    }
}

// --- Late binding ---

#[test]
fn test_uniform_bound_once_property_appears() -> Result<()> {
    init_logger();
    // ARRANGE
    let scene = Scene::new();
    geometry(&scene.target);
    let draw_call = DrawCall::new(Rc::new(technique()), States::default());
    draw_call.configure(program(inputs()), scene.sources())?;

    // ACT: render before the material exists.
    let before = render(&draw_call)?;

    // ASSERT
    assert!(!before
        .iter()
        .any(|c| matches!(c, ContextCommand::UniformFloats { location: 2, .. })));
    assert!(draw_call.uniform(2).is_none());

    // ACT: the material color is set after binding.
    scene
        .target
        .set("material.diffuseColor", Vec3::new(1.0, 0.5, 0.25));
    let after = render(&draw_call)?;

    // ASSERT
    assert!(after.contains(&ContextCommand::UniformFloats {
        location: 2,
        values: vec![1.0, 0.5, 0.25],
    }));
    assert_eq!(
        draw_call.uniform(2),
        Some(UniformValue::Float3(Vec3::new(1.0, 0.5, 0.25)))
    );
    Ok(())
}

#[test]
fn test_removed_property_unbinds_its_uniform() -> Result<()> {
    let scene = Scene::new();
    scene.target.set("material.diffuseColor", Vec3::ZERO);
    let draw_call = DrawCall::new(Rc::new(technique()), States::default());
    draw_call.configure(program(inputs()), scene.sources())?;
    assert!(draw_call.uniform(2).is_some());

    scene.target.remove("material.diffuseColor");

    assert!(draw_call.uniform(2).is_none());
    Ok(())
}

// --- Slots ---

#[test]
fn test_dynamic_textures_follow_program_textures() -> Result<()> {
    // ARRANGE: one program-owned texture and two sampler inputs.
    let scene = Scene::new();
    geometry(&scene.target);
    scene
        .target
        .set("material.diffuseMap", Rc::new(Texture::new_2d(TextureId(21))));
    scene
        .target
        .set("material.normalMap", Rc::new(Texture::new_2d(TextureId(22))));

    let mut owned = Program::new(ProgramId(1), inputs());
    owned
        .textures
        .push((9, Rc::new(Texture::new_2d(TextureId(20)))));

    let mut states = States::default();
    let repeat = SamplerState::new(
        AddressMode::Repeat,
        FilterMode::Linear,
        MipmapFilterMode::Linear,
    );
    states.samplers.insert("normalMap".to_owned(), repeat);

    let draw_call = DrawCall::new(Rc::new(technique()), states);
    draw_call.configure(Rc::new(owned), scene.sources())?;

    // ACT
    let commands = render(&draw_call)?;
    let textures: Vec<_> = commands.iter().filter(|c| stage(c) == 6).cloned().collect();

    // ASSERT
    assert_eq!(
        &textures[..5],
        [
            ContextCommand::Texture {
                slot: 0,
                texture: TextureId(20),
                location: 9
            },
            ContextCommand::Texture {
                slot: 1,
                texture: TextureId(21),
                location: 3
            },
            ContextCommand::SamplerState {
                slot: 1,
                sampler: SamplerState::default()
            },
            ContextCommand::Texture {
                slot: 2,
                texture: TextureId(22),
                location: 4
            },
            ContextCommand::SamplerState {
                slot: 2,
                sampler: repeat
            },
        ]
    );
    // Remaining dynamic slots are emitted empty and without sampler state.
    assert_eq!(textures.len(), 5 + MAX_NUM_TEXTURES - 2);
    assert!(textures[5..].iter().all(|c| matches!(
        c,
        ContextCommand::Texture {
            texture: TextureId(0),
            ..
        }
    )));
    Ok(())
}

#[test]
fn test_slots_are_stable_across_rebinds() -> Result<()> {
    let scene = Scene::new();
    let draw_call = DrawCall::new(Rc::new(technique()), States::default());
    draw_call.configure(program(inputs()), scene.sources())?;

    // Nothing resolved yet: the slots are reserved but empty.
    assert_eq!(draw_call.texture_slots()[1], TextureSlot::UNBOUND);

    for id in [31, 32, 33] {
        scene
            .target
            .set("material.normalMap", Rc::new(Texture::new_2d(TextureId(id))));
        let slots = draw_call.texture_slots();
        assert_eq!(slots[1].texture, TextureId(id));
        assert_eq!(slots[1].location, 4);
        assert_eq!(slots[0], TextureSlot::UNBOUND);
    }

    scene.target.remove("material.normalMap");
    assert_eq!(draw_call.texture_slots()[1], TextureSlot::UNBOUND);

    geometry(&scene.target);
    let vertex_slots = draw_call.vertex_slots();
    assert_eq!(
        vertex_slots[1],
        VertexSlot {
            buffer: BufferId(10),
            location: 1,
            vertex_size: 5,
            attribute_size: 2,
            attribute_offset: 3,
        }
    );
    assert_eq!(vertex_slots[2], VertexSlot::UNBOUND);
    Ok(())
}

#[test]
fn test_slot_capacity_is_enforced() {
    let scene = Scene::new();
    let mut table = BindingTable::default();
    let mut inputs = ProgramInputs::new();
    for i in 0..9 {
        let name = format!("sampler{i}");
        table = table.with_uniform(name.clone(), format!("material.{name}"), BindingSource::Target);
        inputs.push(name, InputType::Sampler2d, i);
    }

    let draw_call = DrawCall::new(Rc::new(table), States::default());
    let result = draw_call.configure(program(inputs), scene.sources());

    assert_eq!(
        result,
        Err(DrawCallError::SlotCapacityExceeded {
            kind: SlotKind::Texture,
            capacity: MAX_NUM_TEXTURES,
        })
    );
}

// --- Subscriptions ---

#[test]
fn test_one_subscription_per_property_path() -> Result<()> {
    // ARRANGE: two inputs read the same property.
    let scene = Scene::new();
    let table = technique().with_uniform("tint", "material.diffuseColor", BindingSource::Target);
    let draw_call = DrawCall::new(Rc::new(table), States::default());
    draw_call.configure(
        program(inputs().with("tint", InputType::Float3, 6)),
        scene.sources(),
    )?;

    // ASSERT
    let signal = scene
        .target
        .property_reference_changed("material.diffuseColor");
    assert_eq!(signal.subscriber_count(), 1);
    assert!(draw_call.is_subscribed("material.diffuseColor"));

    // ACT: both inputs still follow the property.
    scene.target.set("material.diffuseColor", Vec3::new(0.0, 1.0, 0.0));
    scene.target.set("material.diffuseColor", Vec3::new(0.0, 0.0, 1.0));

    assert_eq!(draw_call.uniform(2), draw_call.uniform(6));
    assert_eq!(
        draw_call.uniform(6),
        Some(UniformValue::Float3(Vec3::new(0.0, 0.0, 1.0)))
    );
    assert_eq!(signal.subscriber_count(), 1);
    Ok(())
}

#[test]
fn test_bind_resets_everything_before_resolving() -> Result<()> {
    // ARRANGE
    let first = Scene::new();
    geometry(&first.target);
    first.target.set("material.diffuseColor", Vec3::ZERO);
    first
        .target
        .set("material.diffuseMap", Rc::new(Texture::new_2d(TextureId(5))));

    let draw_call = DrawCall::new(Rc::new(technique()), States::default());
    draw_call.configure(program(inputs()), first.sources())?;
    assert!(draw_call.index_buffer().is_some());
    assert!(draw_call.subscription_count() > 0);

    // ACT
    let second = Scene::new();
    draw_call.bind(second.sources())?;

    // ASSERT
    assert!(draw_call
        .texture_slots()
        .iter()
        .all(|s| *s == TextureSlot::UNBOUND));
    assert!(draw_call
        .vertex_slots()
        .iter()
        .all(|s| *s == VertexSlot::UNBOUND));
    assert!(draw_call.uniforms().is_empty());
    assert!(draw_call.index_buffer().is_none());
    assert_eq!(
        first
            .target
            .property_reference_changed("material.diffuseColor")
            .subscriber_count(),
        0
    );

    // Old containers no longer drive the draw call.
    first.target.set("material.diffuseColor", Vec3::new(1.0, 1.0, 1.0));
    assert!(draw_call.uniform(2).is_none());
    Ok(())
}

#[test]
fn test_dropping_the_draw_call_releases_subscriptions() -> Result<()> {
    let scene = Scene::new();
    let draw_call = DrawCall::new(Rc::new(technique()), States::default());
    draw_call.configure(program(inputs()), scene.sources())?;
    let signal = scene.target.property_reference_changed(POSITIONS);
    assert_eq!(signal.subscriber_count(), 1);

    drop(draw_call);

    assert_eq!(signal.subscriber_count(), 0);
    geometry(&scene.target);
    Ok(())
}

// --- Errors ---

#[test]
fn test_missing_vertex_attribute_is_fatal() {
    let scene = Scene::new();
    let positions_only = Rc::new(VertexBuffer::new(
        BufferId(12),
        vec![VertexAttribute::new("position", 3, 0)],
        vec![0.0; 9],
    ));
    scene.target.set(POSITIONS, Rc::clone(&positions_only));
    scene.target.set(UVS, positions_only);

    let draw_call = DrawCall::new(Rc::new(technique()), States::default());
    let result = draw_call.configure(program(inputs()), scene.sources());

    assert_eq!(
        result,
        Err(DrawCallError::MissingVertexAttribute {
            input: "uv".to_owned(),
            property: UVS.to_owned(),
            attribute: "uv".to_owned(),
        })
    );
}

#[test]
fn test_error_raised_by_a_notification_is_returned_by_render() -> Result<()> {
    // ARRANGE: nothing bound yet, so binding succeeds.
    let scene = Scene::new();
    let draw_call = DrawCall::new(Rc::new(technique()), States::default());
    draw_call.configure(program(inputs()), scene.sources())?;

    // ACT: a property of the wrong kind arrives later.
    scene.target.set("material.diffuseColor", 1.0f32);

    // ASSERT
    let mut ctx = RecordingContext::new();
    let err = draw_call.render(&mut ctx, None).unwrap_err();
    assert!(matches!(err, DrawCallError::Property(_)));
    assert!(ctx.commands().is_empty());

    // The error is reported once.
    draw_call.render(&mut ctx, None)?;
    assert!(!ctx.commands().is_empty());
    Ok(())
}

#[test]
fn test_failed_rebind_leaves_its_input_unbound() -> Result<()> {
    init_logger();
    // ARRANGE
    let scene = Scene::new();
    geometry(&scene.target);
    scene
        .target
        .set("material.diffuseColor", Vec3::new(1.0, 0.0, 0.0));
    let draw_call = DrawCall::new(Rc::new(technique()), States::default());
    draw_call.configure(program(inputs()), scene.sources())?;
    render(&draw_call)?;

    // ACT: the uv stream loses its attribute and the color changes kind.
    let positions_only = VertexBuffer::new(
        BufferId(12),
        vec![VertexAttribute::new("position", 3, 0)],
        vec![0.0; 12],
    );
    scene.target.set(UVS, Rc::new(positions_only));
    scene.target.set("material.diffuseColor", 5.0f32);

    // ASSERT: both errors are reported, oldest first.
    let mut ctx = RecordingContext::new();
    assert!(matches!(
        draw_call.render(&mut ctx, None),
        Err(DrawCallError::MissingVertexAttribute { .. })
    ));
    assert!(matches!(
        draw_call.render(&mut ctx, None),
        Err(DrawCallError::Property(_))
    ));
    assert!(ctx.commands().is_empty());

    // The stale buffer and color are no longer drawn.
    draw_call.render(&mut ctx, None)?;
    let commands = ctx.take_commands();
    assert!(!commands
        .iter()
        .any(|c| matches!(c, ContextCommand::VertexBuffer { location: 1, .. })));
    assert!(!commands
        .iter()
        .any(|c| matches!(c, ContextCommand::UniformFloats { location: 2, .. })));
    assert_eq!(draw_call.vertex_slots()[1], VertexSlot::UNBOUND);
    assert!(draw_call.uniform(2).is_none());
    Ok(())
}

#[test]
fn test_index_buffer_of_the_wrong_kind_is_fatal() -> Result<()> {
    // ARRANGE
    let scene = Scene::new();
    scene.target.set(INDICES, 3.0f32);
    let draw_call = DrawCall::new(Rc::new(technique()), States::default());

    // ACT / ASSERT: during bind.
    assert!(matches!(
        draw_call.configure(program(inputs()), scene.sources()),
        Err(DrawCallError::Property(_))
    ));

    // ACT / ASSERT: during a later change.
    geometry(&scene.target);
    draw_call.bind(scene.sources())?;
    assert!(draw_call.index_buffer().is_some());
    scene.target.set(INDICES, 3.0f32);
    assert!(render(&draw_call).is_err());
    assert!(draw_call.index_buffer().is_none());
    Ok(())
}

#[test]
fn test_invalid_location_and_unsupported_types() {
    let scene = Scene::new();
    scene.target.set("transform.normalMatrix", Mat4::IDENTITY);
    let table = technique().with_uniform(
        "normalMatrix",
        "transform.normalMatrix",
        BindingSource::Target,
    );
    let table = Rc::new(table);

    let negative = DrawCall::new(Rc::clone(&table), States::default());
    assert_eq!(
        negative.configure(
            program(ProgramInputs::new().with("diffuseColor", InputType::Float3, -1)),
            scene.sources()
        ),
        Err(DrawCallError::InvalidLocation {
            input: "diffuseColor".to_owned(),
            location: -1,
        })
    );

    let mat3 = DrawCall::new(table, States::default());
    assert_eq!(
        mat3.configure(
            program(ProgramInputs::new().with("normalMatrix", InputType::Float9, 0)),
            scene.sources()
        ),
        Err(DrawCallError::UnsupportedUniformType {
            input: "normalMatrix".to_owned(),
            input_type: InputType::Float9,
        })
    );
}

#[test]
fn test_unknown_and_unbound_inputs_are_ignored() -> Result<()> {
    let scene = Scene::new();
    let draw_call = DrawCall::new(Rc::new(technique()), States::default());
    draw_call.configure(
        program(
            ProgramInputs::new()
                .with("mystery", InputType::Unknown, -1)
                .with("notInTheTable", InputType::Float4, 3),
        ),
        scene.sources(),
    )?;
    assert!(draw_call.uniforms().is_empty());
    Ok(())
}

#[test]
fn test_render_without_program() {
    let draw_call = DrawCall::new(Rc::new(technique()), States::default());
    let mut ctx = RecordingContext::new();
    assert_eq!(
        draw_call.render(&mut ctx, None),
        Err(DrawCallError::MissingProgram)
    );
    assert_eq!(
        draw_call.bind(DataSources::new()),
        Err(DrawCallError::MissingProgram)
    );
}

// --- Uniform arrays ---

#[test]
fn test_array_fallback_and_direct_match() -> Result<()> {
    // ARRANGE
    let scene = Scene::new();
    let colors = Rc::new(UniformArray::<f32>::new(2, vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0]));
    scene.root.set("lights.colors", Rc::clone(&colors));
    scene.root.set("lights.ids", Rc::new(UniformArray::<i32>::unbound()));

    let draw_call = DrawCall::new(Rc::new(technique()), States::default());
    draw_call.configure(
        program(
            ProgramInputs::new()
                .with("lightColors[0]", InputType::Float3, 7)
                .with("lightIds[0]", InputType::Int1, 8),
        ),
        scene.sources(),
    )?;

    // ASSERT: the base path is read as an array, empty arrays stay unbound.
    assert_eq!(
        draw_call.uniform(7),
        Some(UniformValue::FloatArray {
            arity: 3,
            array: colors
        })
    );
    assert!(draw_call.uniform(8).is_none());

    // ACT: the array gets data, then a direct match appears.
    scene
        .root
        .set("lights.ids", Rc::new(UniformArray::<i32>::new(3, vec![4, 5, 6])));
    scene.root.set("lights.colors[0]", Vec3::new(0.0, 0.0, 1.0));

    // ASSERT
    assert!(matches!(
        draw_call.uniform(8),
        Some(UniformValue::IntArray { arity: 1, .. })
    ));
    assert_eq!(
        draw_call.uniform(7),
        Some(UniformValue::Float3(Vec3::new(0.0, 0.0, 1.0)))
    );
    Ok(())
}

// --- Command stream ---

#[test]
fn test_command_order_is_fixed() -> Result<()> {
    // ARRANGE: one input of every family.
    let scene = Scene::new();
    geometry(&scene.target);
    scene.target.set("material.diffuseColor", Vec3::new(1.0, 1.0, 1.0));
    scene
        .target
        .set("material.diffuseMap", Rc::new(Texture::new_2d(TextureId(3))));
    scene
        .target
        .set("transform.modelToWorldMatrix", Mat4::IDENTITY);
    scene.root.set("lights.count", 2);
    scene.root.set(
        "lights.colors",
        Rc::new(UniformArray::<f32>::new(1, vec![1.0, 1.0, 1.0])),
    );
    scene
        .root
        .set("lights.ids", Rc::new(UniformArray::<i32>::new(2, vec![7, 8])));

    let draw_call = DrawCall::new(Rc::new(technique()), States::default());
    draw_call.configure(
        program(
            inputs()
                .with("lightIds[0]", InputType::Int1, 6)
                .with("lightCount", InputType::Int1, 7)
                .with("lightColors[0]", InputType::Float3, 8),
        ),
        scene.sources(),
    )?;

    // ACT
    let commands = render(&draw_call)?;

    // ASSERT
    let stages: Vec<u32> = commands.iter().map(stage).collect();
    assert!(stages.windows(2).all(|w| w[0] <= w[1]), "{stages:?}");
    for expected in 1..=9 {
        assert!(stages.contains(&expected), "stage {expected} missing");
    }
    assert_eq!(commands[0], ContextCommand::SetProgram(ProgramId(1)));
    assert_eq!(
        commands.last(),
        Some(&ContextCommand::DrawTriangles {
            index_buffer: BufferId(11),
            num_triangles: 2,
        })
    );
    Ok(())
}

#[test]
fn test_render_target_setup() -> Result<()> {
    // ARRANGE
    let scene = Scene::new();
    geometry(&scene.target);
    let states = States {
        target: Some(Texture::new_2d(TextureId(40))),
        ..States::default()
    };
    let draw_call = DrawCall::new(Rc::new(technique()), states);
    draw_call.configure(program(inputs()), scene.sources())?;
    let mut ctx = RecordingContext::new();

    // ACT / ASSERT: first render switches to the target and clears.
    draw_call.render(&mut ctx, None)?;
    let commands = ctx.take_commands();
    assert_eq!(
        &commands[..2],
        [
            ContextCommand::SetRenderToTexture(TextureId(40)),
            ContextCommand::Clear
        ]
    );

    // Already current: only the clear is issued.
    draw_call.render(&mut ctx, None)?;
    assert_eq!(ctx.take_commands()[0], ContextCommand::Clear);

    // An override wins over the declared target.
    let shadow_map = Texture::new_2d(TextureId(41));
    draw_call.render(&mut ctx, Some(&shadow_map))?;
    assert_eq!(
        ctx.take_commands()[0],
        ContextCommand::SetRenderToTexture(TextureId(41))
    );
    assert_eq!(ctx.render_target(), Some(TextureId(41)));
    Ok(())
}

#[test]
fn test_render_returns_to_the_back_buffer() -> Result<()> {
    // ARRANGE
    let scene = Scene::new();
    geometry(&scene.target);
    let draw_call = DrawCall::new(Rc::new(technique()), States::default());
    draw_call.configure(program(inputs()), scene.sources())?;
    let mut ctx = RecordingContext::new();
    let offscreen = Texture::new_2d(TextureId(42));
    draw_call.render(&mut ctx, Some(&offscreen))?;
    assert_eq!(ctx.render_target(), Some(TextureId(42)));
    ctx.take_commands();

    // ACT: no target while a texture is current.
    draw_call.render(&mut ctx, None)?;

    // ASSERT: switch back without clearing.
    let commands = ctx.take_commands();
    assert_eq!(commands[0], ContextCommand::SetRenderToBackBuffer);
    assert!(!commands.contains(&ContextCommand::Clear));
    assert_eq!(ctx.render_target(), None);

    // ACT / ASSERT: already on the back buffer, no target command at all.
    draw_call.render(&mut ctx, None)?;
    let commands = ctx.take_commands();
    assert!(commands.iter().all(|c| stage(c) != 0));
    assert_eq!(commands[0], ContextCommand::SetProgram(ProgramId(1)));
    Ok(())
}

#[test]
fn test_program_owned_buffers_take_precedence() -> Result<()> {
    let scene = Scene::new();
    geometry(&scene.target);

    let mut owned = Program::new(ProgramId(2), inputs());
    owned.vertex_buffers.push((0, quad()));
    owned.index_buffer = Some(Rc::new(IndexBuffer::new(BufferId(50), vec![0, 1, 2])));

    let draw_call = DrawCall::new(Rc::new(technique()), States::default());
    draw_call.configure(Rc::new(owned), scene.sources())?;
    let commands = render(&draw_call)?;

    let vertex_commands: Vec<_> = commands.iter().filter(|c| stage(c) == 7).collect();
    assert_eq!(
        vertex_commands,
        [&ContextCommand::VertexBuffer {
            location: 0,
            buffer: BufferId(10),
            size: 3,
            stride: 5,
            offset: 0,
        }]
    );
    assert_eq!(
        commands.last(),
        Some(&ContextCommand::DrawTriangles {
            index_buffer: BufferId(50),
            num_triangles: 1,
        })
    );
    Ok(())
}

#[test]
fn test_geometry_id_variable_selects_the_geometry() -> Result<()> {
    let scene = Scene::new();
    scene.target.set(
        "geometry[3].indices",
        Rc::new(IndexBuffer::new(BufferId(60), vec![0; 9])),
    );
    let draw_call = DrawCall::new(Rc::new(technique()), States::default());
    draw_call.set_variable("geometryId", "3");
    draw_call.configure(program(inputs()), scene.sources())?;

    assert_eq!(draw_call.index_buffer().map(|ib| ib.count), Some(9));
    assert!(draw_call.is_subscribed("geometry[3].vertex.attribute.position"));
    Ok(())
}

// --- Depth sorting ---

#[test]
fn test_zsorted_draw_call_requests_resorting() -> Result<()> {
    // ARRANGE
    let scene = Scene::new();
    let bus = EventBus::<ZSortNeeded>::new();
    let states = States {
        zsorted: true,
        priority: 2.0,
        ..States::default()
    };
    let draw_call = DrawCall::new(Rc::new(technique()), states);
    draw_call.register_zsort_listener(bus.sender());
    draw_call.configure(program(inputs()), scene.sources())?;
    assert!(draw_call.zsorted());
    assert_eq!(draw_call.priority(), 2.0);

    // ACT
    scene
        .target
        .set("transform.modelToWorldMatrix", Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0)));
    scene
        .renderer
        .set("camera.worldToScreenMatrix", Mat4::IDENTITY);

    // ASSERT
    let expected = ZSortNeeded {
        draw_call: draw_call.id(),
    };
    assert_eq!(bus.drain(), vec![expected, expected]);
    Ok(())
}

#[test]
fn test_eye_space_position() -> Result<()> {
    let scene = Scene::new();
    let draw_call = DrawCall::new(Rc::new(technique()), States::default());
    draw_call.configure(program(inputs()), scene.sources())?;

    // No data: the origin.
    assert_eq!(draw_call.eye_space_position(), Vec3::ZERO);

    scene.target.set("geometry.vertex.attribute.position", quad());
    scene.target.set(
        "transform.modelToWorldMatrix",
        Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)),
    );
    scene.renderer.set(
        "camera.worldToScreenMatrix",
        Mat4::from_scale(Vec3::new(2.0, 2.0, 2.0)),
    );

    let position = draw_call.eye_space_position();
    assert_relative_eq!(position.x, 2.0);
    assert_relative_eq!(position.y, 4.0);
    assert_relative_eq!(position.z, 6.0);

    // Removing the model matrix falls back to identity.
    scene.target.remove("transform.modelToWorldMatrix");
    assert_relative_eq!(draw_call.eye_space_position().z, 0.0);
    Ok(())
}

// --- Configuration ---

#[test]
fn test_draw_call_from_ron_technique() -> Result<()> {
    let technique = TechniqueDescriptor::from_ron(
        r#"(
            attribute_bindings: {
                "position": (property: "geometry[${geometryId}].vertex.attribute.position"),
            },
            uniform_bindings: {
                "diffuseColor": (property: "material.diffuseColor", source: Target),
            },
            states: (priority: 4.0, triangle_culling: Front),
        )"#,
    )?;

    let scene = Scene::new();
    geometry(&scene.target);
    scene.target.set("material.diffuseColor", Vec3::new(0.5, 0.5, 0.5));

    let draw_call = DrawCall::from_technique(technique);
    draw_call.configure(program(inputs()), scene.sources())?;

    assert_eq!(draw_call.priority(), 4.0);
    assert_eq!(draw_call.vertex_slots()[0].buffer, BufferId(10));
    assert!(render(&draw_call)?.contains(&ContextCommand::TriangleCulling(
        ember_core::renderer::CullMode::Front
    )));
    Ok(())
}
