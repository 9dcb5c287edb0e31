//! Multisampled line list.
//!
//! MSAA is enabled by:
//! - creating the pipeline with `sample_count > 1`
//! - rendering into a multisampled texture instead of the target
//! - resolving that texture into the target at the end of the pass
//!
//! The line fan rotates slowly; its rotation is the only per-frame state.

use anyhow::Result;
use wgpu::util::DeviceExt;

use crate::device::{GpuBackend, WgpuBackend};
use crate::example::Example;

use super::common::{
    begin_clear_pass, clear_color, color_pipeline, validated, ColorVertex, UniformBinding,
};

/// Radians per second.
const SPIN_SPEED: f32 = 0.25;

/// Fans rendered side by side.
const FAN_COUNT: usize = 5;

/// Lines per fan.
const LINES_PER_FAN: usize = 50;

#[derive(Default)]
pub struct MsaaLine {
    angle: f32,
    gpu: Option<MsaaResources>,
}

struct MsaaResources {
    pipeline: wgpu::RenderPipeline,
    uniform: UniformBinding,
    vertex_buffers: Vec<wgpu::Buffer>,
    vertex_count: u32,

    /// `None` when the adapter only supports single-sample rendering.
    multisampled: Option<wgpu::TextureView>,
}

impl MsaaLine {
    pub fn new() -> Self {
        Self::default()
    }

    fn sample_count(gpu: &WgpuBackend) -> u32 {
        let flags = gpu
            .adapter()
            .get_texture_format_features(gpu.color_format())
            .flags;

        // Without adapter-specific format features only 4x is guaranteed.
        let adapter_specific = gpu
            .device()
            .features()
            .contains(wgpu::Features::TEXTURE_ADAPTER_SPECIFIC_FORMAT_FEATURES);
        let candidates: &[u32] = if adapter_specific { &[8, 4, 2] } else { &[4] };

        candidates
            .iter()
            .copied()
            .find(|&n| flags.sample_count_supported(n))
            .unwrap_or(1)
    }

    fn create_multisampled_framebuffer(gpu: &WgpuBackend, sample_count: u32) -> wgpu::TextureView {
        let target = gpu.target();
        gpu.device()
            .create_texture(&wgpu::TextureDescriptor {
                label: Some("inapp msaa-line framebuffer"),
                size: wgpu::Extent3d {
                    width: target.width,
                    height: target.height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count,
                dimension: wgpu::TextureDimension::D2,
                format: gpu.color_format(),
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            })
            .create_view(&wgpu::TextureViewDescriptor::default())
    }
}

/// Vertices for `FAN_COUNT` fans of `LINES_PER_FAN` lines each.
///
/// Every line runs from a hub on the x axis to a point on the unit circle.
fn fan_vertices() -> Vec<Vec<ColorVertex>> {
    let step = 2.0 / (FAN_COUNT as f32 + 1.0);
    (1..=FAN_COUNT)
        .map(|fan| {
            let hub_x = -1.0 + step * fan as f32;
            (0..LINES_PER_FAN)
                .flat_map(|i| {
                    let percent = i as f32 / LINES_PER_FAN as f32;
                    let (sin, cos) = (percent * std::f32::consts::TAU).sin_cos();
                    [
                        ColorVertex {
                            pos: [hub_x, 0.0],
                            color: [1.0, -sin, cos, 1.0],
                        },
                        ColorVertex {
                            pos: [cos, sin],
                            color: [sin, -cos, 1.0, 1.0],
                        },
                    ]
                })
                .collect()
        })
        .collect()
}

impl Example<WgpuBackend> for MsaaLine {
    fn name(&self) -> &'static str {
        "msaa-line"
    }

    fn activate(&mut self, gpu: &WgpuBackend) -> Result<()> {
        let device = gpu.device();
        let sample_count = Self::sample_count(gpu);
        log::info!("msaa-line sample_count: {sample_count}");

        let resources = validated(device, "msaa-line setup", || {
            let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("inapp msaa-line shader"),
                source: wgpu::ShaderSource::Wgsl(include_str!("shaders/msaa_line.wgsl").into()),
            });

            let uniform = UniformBinding::new(device, "inapp msaa-line uniform");
            let pipeline = color_pipeline(
                device,
                "inapp msaa-line pipeline",
                &shader,
                &uniform,
                gpu.color_format(),
                wgpu::PrimitiveTopology::LineList,
                sample_count,
            );

            let vertex_buffers = fan_vertices()
                .iter()
                .map(|vertices| {
                    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("inapp msaa-line vbo"),
                        contents: bytemuck::cast_slice(vertices),
                        usage: wgpu::BufferUsages::VERTEX,
                    })
                })
                .collect();

            let multisampled = (sample_count > 1)
                .then(|| Self::create_multisampled_framebuffer(gpu, sample_count));

            MsaaResources {
                pipeline,
                uniform,
                vertex_buffers,
                vertex_count: (LINES_PER_FAN * 2) as u32,
                multisampled,
            }
        })?;

        self.angle = 0.0;
        self.gpu = Some(resources);
        Ok(())
    }

    fn deactivate(&mut self) {
        self.gpu = None;
        self.angle = 0.0;
    }

    fn advance(&mut self, dt: f32) {
        self.angle = (self.angle + dt * SPIN_SPEED).rem_euclid(std::f32::consts::TAU);
    }

    fn record(&mut self, gpu: &WgpuBackend, encoder: &mut wgpu::CommandEncoder) {
        let Some(res) = self.gpu.as_ref() else { return };

        let (sin, cos) = self.angle.sin_cos();
        res.uniform.write(gpu.queue(), [cos, sin, 0.0, 0.0]);

        let mut rpass = begin_clear_pass(
            encoder,
            "inapp msaa-line pass",
            gpu.target_view(),
            res.multisampled.as_ref(),
            clear_color([0.0, 0.0, 0.0]),
        );

        rpass.set_pipeline(&res.pipeline);
        rpass.set_bind_group(0, &res.uniform.bind_group, &[]);
        for buffer in &res.vertex_buffers {
            rpass.set_vertex_buffer(0, buffer.slice(..));
            rpass.draw(0..res.vertex_count, 0..1);
        }
    }
}
