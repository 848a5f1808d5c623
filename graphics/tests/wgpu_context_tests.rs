//! Integration tests for `WgpuContext` on a real device.
//!
//! Every test needs a GPU adapter. Machines without one (most CI runners)
//! log a message and skip.
//!
//! ```bash
//! cargo test -p orrery-graphics --features wgpu-backend --test wgpu_context_tests
//! ```

#![cfg(feature = "wgpu-backend")]

mod common;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use rstest::rstest;

use common::{Shape, init_logging};
use orrery_core::mesh::{PrimitiveTopology, UsageHint, VertexAttributeLayout, VertexLayout};
use orrery_graphics::context::wgpu_context::{primitive_topology, vertex_buffer_layouts};
use orrery_graphics::{GraphicsContext, MeshBuffer, WgpuContext};

const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

const COLOR_SHADER: &str = r#"
struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_main(@location(0) position: vec3<f32>, @location(1) color: vec4<f32>) -> VertexOutput {
    var out: VertexOutput;
    out.position = vec4<f32>(position * 0.5, 1.0);
    out.color = color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

fn wgpu_context() -> Option<Rc<RefCell<WgpuContext>>> {
    init_logging();
    match WgpuContext::new() {
        Ok(ctx) => Some(Rc::new(RefCell::new(ctx))),
        Err(err) => {
            eprintln!("wgpu not available, skipping: {}", err);
            None
        }
    }
}

/// A pipeline whose vertex buffers come from `vertex_buffer_layouts`.
fn color_pipeline(
    device: &wgpu::Device,
    layout: &VertexLayout,
    topology: PrimitiveTopology,
) -> wgpu::RenderPipeline {
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("color shader"),
        source: wgpu::ShaderSource::Wgsl(COLOR_SHADER.into()),
    });

    let attributes = vertex_buffer_layouts(layout).unwrap();
    let buffers: Vec<_> = attributes
        .iter()
        .map(|(stride, attribute)| wgpu::VertexBufferLayout {
            array_stride: *stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: std::slice::from_ref(attribute),
        })
        .collect();

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("color pipeline"),
        layout: None,
        vertex: wgpu::VertexState {
            module: &module,
            entry_point: Some("vs_main"),
            buffers: &buffers,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &module,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: TARGET_FORMAT,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: primitive_topology(topology),
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

/// Replay everything recorded so far into a small offscreen target.
fn replay_offscreen(ctx: &Rc<RefCell<WgpuContext>>, pipeline: &wgpu::RenderPipeline) {
    let (device, queue) = {
        let ctx = ctx.borrow();
        (Arc::clone(ctx.device()), Arc::clone(ctx.queue()))
    };

    let target = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("offscreen target"),
        size: wgpu::Extent3d {
            width: 16,
            height: 16,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: TARGET_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let view = target.create_view(&wgpu::TextureViewDescriptor::default());

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("replay"),
    });
    {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("replay pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
        pass.set_pipeline(pipeline);
        ctx.borrow().replay(&mut pass);
    }
    queue.submit([encoder.finish()]);
}

// ============================================================================
// Buffers
// ============================================================================

#[test]
fn test_buffer_length_tracks_uploads() {
    let Some(ctx) = wgpu_context() else {
        return;
    };
    let mut ctx = ctx.borrow_mut();

    let buffer = ctx.create_buffer("scratch").unwrap();
    assert_eq!(ctx.buffer_byte_length(buffer).unwrap(), 0);

    // Unaligned lengths are padded on the device but reported as uploaded.
    ctx.upload_buffer_data(buffer, &[1, 2, 3], UsageHint::Dynamic)
        .unwrap();
    assert_eq!(ctx.buffer_byte_length(buffer).unwrap(), 3);

    ctx.upload_buffer_data(buffer, &[0; 40], UsageHint::Dynamic)
        .unwrap();
    assert_eq!(ctx.buffer_byte_length(buffer).unwrap(), 40);

    ctx.delete_buffer(buffer).unwrap();
    assert!(ctx.buffer_byte_length(buffer).is_err());
    assert!(ctx.delete_buffer(buffer).is_err());
}

// ============================================================================
// Draw recording and replay
// ============================================================================

#[rstest]
#[case::plane(Shape::Plane)]
#[case::colored_cube(Shape::ColoredCube)]
#[case::sphere(Shape::Sphere { sectors: 16, stacks: 8 })]
fn test_mesh_draws_are_recorded_and_replayed(#[case] shape: Shape) {
    let Some(ctx) = wgpu_context() else {
        return;
    };
    let geometry = shape.generate();
    let mut mesh = MeshBuffer::from_geometry(ctx.clone(), &geometry, UsageHint::Static).unwrap();
    assert_eq!(mesh.vertex_count().unwrap(), geometry.vertex_count() as u64);

    mesh.draw(PrimitiveTopology::TriangleList).unwrap();
    mesh.draw(PrimitiveTopology::TriangleList).unwrap();
    assert_eq!(ctx.borrow().pending_draw_count(), 2);

    let pipeline = {
        let ctx = ctx.borrow();
        color_pipeline(
            ctx.device(),
            &VertexLayout::position_color(),
            PrimitiveTopology::TriangleList,
        )
    };
    replay_offscreen(&ctx, &pipeline);

    ctx.borrow_mut().clear_draws();
    assert_eq!(ctx.borrow().pending_draw_count(), 0);

    mesh.dispose().unwrap();
}

#[test]
fn test_replay_binds_by_slot_when_declared_out_of_order() {
    let Some(ctx) = wgpu_context() else {
        return;
    };
    // Colors are declared first but read from slot 1.
    let layout = Arc::new(
        VertexLayout::new()
            .with_attribute(VertexAttributeLayout::color(1))
            .with_attribute(VertexAttributeLayout::position(0)),
    );
    let geometry = Shape::ColoredCube.generate();

    let mut mesh = MeshBuffer::new(ctx.clone(), layout.clone()).unwrap();
    mesh.upload_vertex_data(
        VertexLayout::COLORS,
        geometry.color_bytes(),
        UsageHint::Static,
    )
    .unwrap();
    mesh.upload_vertex_data(
        VertexLayout::POSITIONS,
        geometry.position_bytes(),
        UsageHint::Static,
    )
    .unwrap();
    mesh.upload_indices(&geometry.indices, UsageHint::Static)
        .unwrap();
    mesh.draw(PrimitiveTopology::TriangleList).unwrap();

    let pipeline = {
        let ctx = ctx.borrow();
        color_pipeline(ctx.device(), &layout, PrimitiveTopology::TriangleList)
    };
    replay_offscreen(&ctx, &pipeline);
    assert_eq!(ctx.borrow().pending_draw_count(), 1);

    mesh.dispose().unwrap();
}

#[test]
fn test_dispose_forgets_bindings() {
    let Some(ctx) = wgpu_context() else {
        return;
    };
    let geometry = Shape::WhiteCube.generate();
    let mut mesh = MeshBuffer::from_geometry(ctx.clone(), &geometry, UsageHint::Static).unwrap();
    let positions = mesh.vertex_buffer(VertexLayout::POSITIONS).unwrap();

    mesh.dispose().unwrap();

    let ctx = ctx.borrow();
    assert!(ctx.buffer_byte_length(positions).is_err());
    assert_eq!(ctx.pending_draw_count(), 0);
}
