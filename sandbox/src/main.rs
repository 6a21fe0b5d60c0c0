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

// Ember Sandbox
// Binds a textured quad and logs the command stream of its draw call.

use anyhow::Result;
use ember_core::data::Container;
use ember_core::event::EventBus;
use ember_core::math::{Mat4, Vec3};
use ember_core::renderer::{
    BufferId, IndexBuffer, InputType, Program, ProgramId, ProgramInputs, RecordingContext,
    Texture, TextureId, VertexAttribute, VertexBuffer,
};
use ember_core::TechniqueDescriptor;
use ember_render::{DataSources, DrawCall, ZSortNeeded};
use std::rc::Rc;

const TECHNIQUE: &str = include_str!("../assets/textured.ron");

fn quad() -> VertexBuffer {
    VertexBuffer::new(
        BufferId(1),
        vec![
            VertexAttribute::new("position", 3, 0),
            VertexAttribute::new("uv", 2, 3),
        ],
        vec![
            -0.5, -0.5, 0.0, 0.0, 0.0, //
            0.5, -0.5, 0.0, 1.0, 0.0, //
            0.5, 0.5, 0.0, 1.0, 1.0, //
            -0.5, 0.5, 0.0, 0.0, 1.0,
        ],
    )
}

fn log_commands(label: &str, context: &mut RecordingContext) {
    let commands = context.take_commands();
    log::info!("{label}: {} commands", commands.len());
    for command in commands {
        log::info!("  {command:?}");
    }
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let technique = TechniqueDescriptor::from_ron(TECHNIQUE)?;
    let program = Rc::new(Program::new(
        ProgramId(1),
        ProgramInputs::new()
            .with("position", InputType::Attribute, 0)
            .with("uv", InputType::Attribute, 1)
            .with("diffuseColor", InputType::Float4, 2)
            .with("diffuseMap", InputType::Sampler2d, 3)
            .with("modelToWorldMatrix", InputType::Float16, 4)
            .with("worldToScreenMatrix", InputType::Float16, 5)
            .with("time", InputType::Float1, 6),
    ));

    let target = Container::new();
    let renderer = Container::new();
    let root = Container::new();

    let vertices = Rc::new(quad());
    target.set("geometry[0].vertex.attribute.position", Rc::clone(&vertices));
    target.set("geometry[0].vertex.attribute.uv", Rc::clone(&vertices));
    target.set("geometry.vertex.attribute.position", vertices);
    target.set(
        "geometry[0].indices",
        Rc::new(IndexBuffer::new(BufferId(2), vec![0, 1, 2, 0, 2, 3])),
    );
    target.set(
        "transform.modelToWorldMatrix",
        Mat4::from_translation(Vec3::new(0.0, 0.0, -3.0)),
    );
    renderer.set("camera.worldToScreenMatrix", Mat4::IDENTITY);
    root.set("time", 0.0f32);

    let sorter = EventBus::<ZSortNeeded>::new();
    let draw_call = DrawCall::from_technique(technique);
    draw_call.register_zsort_listener(sorter.sender());
    draw_call.configure(
        program,
        DataSources::new()
            .with_target(target.clone())
            .with_renderer(renderer.clone())
            .with_root(root.clone()),
    )?;
    log::info!(
        "Sandbox: draw call {} bound with {} subscriptions.",
        draw_call.id(),
        draw_call.subscription_count()
    );

    let mut context = RecordingContext::new();
    draw_call.render(&mut context, None)?;
    log_commands("Frame 1 (material incomplete)", &mut context);

    // The material arrives after binding; the draw call picks it up on its own.
    target.set(
        "material.diffuseColor",
        ember_core::math::Vec4::new(1.0, 0.8, 0.6, 0.5),
    );
    target.set("material.diffuseMap", Rc::new(Texture::new_2d(TextureId(7))));
    root.set("time", 0.016f32);
    target.set(
        "transform.modelToWorldMatrix",
        Mat4::from_translation(Vec3::new(0.0, 1.0, -3.0)),
    );

    draw_call.render(&mut context, None)?;
    log_commands("Frame 2", &mut context);

    for request in sorter.drain() {
        log::info!(
            "Sandbox: re-sort requested for {}, eye-space position {:?}",
            request.draw_call,
            draw_call.eye_space_position()
        );
    }

    Ok(())
}
