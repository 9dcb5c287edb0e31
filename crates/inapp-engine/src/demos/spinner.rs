use anyhow::Result;
use wgpu::util::DeviceExt;

use crate::device::{GpuBackend, WgpuBackend};
use crate::example::Example;

use super::common::{
    begin_clear_pass, clear_color, color_pipeline, validated, ColorVertex, UniformBinding,
};

const QUAD: [ColorVertex; 4] = [
    ColorVertex { pos: [-0.5, -0.5], color: [1.0, 0.2, 0.2, 1.0] },
    ColorVertex { pos: [0.5, -0.5], color: [0.2, 1.0, 0.2, 1.0] },
    ColorVertex { pos: [0.5, 0.5], color: [0.2, 0.2, 1.0, 1.0] },
    ColorVertex { pos: [-0.5, 0.5], color: [1.0, 1.0, 0.2, 1.0] },
];

const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

/// Rotating, pulsing quad driven by a uniform.
#[derive(Default)]
pub struct Spinner {
    elapsed: f32,
    gpu: Option<SpinnerResources>,
}

struct SpinnerResources {
    pipeline: wgpu::RenderPipeline,
    uniform: UniformBinding,
    vbo: wgpu::Buffer,
    ibo: wgpu::Buffer,
}

impl Spinner {
    /// Radians per second.
    const SPIN_SPEED: f32 = 1.2;

    pub fn new() -> Self {
        Self::default()
    }

    fn angle(&self) -> f32 {
        (self.elapsed * Self::SPIN_SPEED).rem_euclid(std::f32::consts::TAU)
    }

    fn scale(&self) -> f32 {
        1.0 + 0.15 * (self.elapsed * 2.0).sin()
    }
}

impl Example<WgpuBackend> for Spinner {
    fn name(&self) -> &'static str {
        "spinner"
    }

    fn activate(&mut self, gpu: &WgpuBackend) -> Result<()> {
        let device = gpu.device();

        let resources = validated(device, "spinner setup", || {
            let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("inapp spinner shader"),
                source: wgpu::ShaderSource::Wgsl(include_str!("shaders/spinner.wgsl").into()),
            });

            let uniform = UniformBinding::new(device, "inapp spinner uniform");
            let pipeline = color_pipeline(
                device,
                "inapp spinner pipeline",
                &shader,
                &uniform,
                gpu.color_format(),
                wgpu::PrimitiveTopology::TriangleList,
                1,
            );

            let vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("inapp spinner vbo"),
                contents: bytemuck::cast_slice(&QUAD),
                usage: wgpu::BufferUsages::VERTEX,
            });
            let ibo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("inapp spinner ibo"),
                contents: bytemuck::cast_slice(&QUAD_INDICES),
                usage: wgpu::BufferUsages::INDEX,
            });

            SpinnerResources {
                pipeline,
                uniform,
                vbo,
                ibo,
            }
        })?;

        self.elapsed = 0.0;
        self.gpu = Some(resources);
        Ok(())
    }

    fn deactivate(&mut self) {
        self.gpu = None;
        self.elapsed = 0.0;
    }

    fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    fn record(&mut self, gpu: &WgpuBackend, encoder: &mut wgpu::CommandEncoder) {
        let Some(res) = self.gpu.as_ref() else { return };

        let aspect = gpu.target().aspect();
        res.uniform
            .write(gpu.queue(), [self.angle(), aspect, self.scale(), 0.0]);

        let mut rpass = begin_clear_pass(
            encoder,
            "inapp spinner pass",
            gpu.target_view(),
            None,
            clear_color([0.02, 0.02, 0.04]),
        );

        rpass.set_pipeline(&res.pipeline);
        rpass.set_bind_group(0, &res.uniform.bind_group, &[]);
        rpass.set_vertex_buffer(0, res.vbo.slice(..));
        rpass.set_index_buffer(res.ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..1);
    }
}
