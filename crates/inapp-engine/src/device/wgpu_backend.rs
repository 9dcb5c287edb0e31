use anyhow::{Context, Result};

use super::import::import_texture;
use super::{BackendKind, DeviceInit, GpuBackend, HostDevice, PixelFormat, RawHandle, TargetDesc};

/// wgpu-backed implementation of [`GpuBackend`].
///
/// Two construction paths:
/// - [`WgpuBackend::from_host`] wraps a host device/queue and an imported texture
/// - [`WgpuBackend::headless`] creates its own adapter, device and target texture
///
/// Either way the render target and its view are created once and never rebound.
pub struct WgpuBackend {
    kind: BackendKind,

    /// Adapter the device was opened on; examples query format features from it.
    adapter: wgpu::Adapter,

    device: wgpu::Device,
    queue: wgpu::Queue,

    /// Bound render target. Imported targets stay owned by the host.
    texture: wgpu::Texture,
    view: wgpu::TextureView,

    target: TargetDesc,
    imported: bool,
}

impl WgpuBackend {
    /// Formats the wgpu backend (and every registered example) renders into.
    pub const SUPPORTED_FORMATS: [PixelFormat; 4] = PixelFormat::COLOR8;

    #[inline]
    pub fn format_supported(format: PixelFormat) -> bool {
        Self::SUPPORTED_FORMATS.contains(&format)
    }

    /// Binds a host-created texture to a wrapped host device.
    ///
    /// The target is validated (including against the device limits) before
    /// anything is imported, so a rejected target leaves no GPU allocation behind.
    ///
    /// # Safety
    /// `texture` must be a live 2D texture on `host`'s device matching `target`,
    /// kept alive by the host for the lifetime of the returned backend.
    pub unsafe fn from_host(host: HostDevice, texture: RawHandle, target: TargetDesc) -> Result<Self> {
        target.validate()?;
        anyhow::ensure!(
            Self::format_supported(target.format),
            "pixel format {:?} is not supported by the {} backend",
            target.format,
            host.kind
        );

        target.check_limits(&host.device.limits())?;

        let texture = unsafe { import_texture(&host, texture, &target) }
            .context("failed to import host render target")?;

        let HostDevice {
            kind,
            adapter,
            device,
            queue,
        } = host;

        log::info!(
            "wrapped host {kind} device; target {}x{} {:?}",
            target.width,
            target.height,
            target.format
        );

        Ok(Self::assemble(kind, adapter, device, queue, texture, target, true))
    }

    /// Creates an engine-owned device and render target.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu.
    pub async fn headless(target: TargetDesc, init: DeviceInit) -> Result<Self> {
        target.validate()?;
        anyhow::ensure!(
            Self::format_supported(target.format),
            "pixel format {:?} is not supported by the wgpu backend",
            target.format
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: init.power_preference,
                compatible_surface: None,
                force_fallback_adapter: init.force_fallback_adapter,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let info = adapter.get_info();
        let kind = BackendKind::from_wgpu(info.backend)
            .with_context(|| format!("adapter backend {:?} is not supported", info.backend))?;

        let (device, queue) = adapter
            .request_device(&init.device_descriptor())
            .await
            .context("failed to create wgpu device/queue")?;

        target.check_limits(&device.limits())?;

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("inapp headless target"),
            size: target.extent(),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: target.format.to_wgpu(),
            usage: target.usage.to_wgpu(target.format) | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });

        log::info!(
            "created headless {kind} device on {}; target {}x{} {:?}",
            info.name,
            target.width,
            target.height,
            target.format
        );

        Ok(Self::assemble(kind, adapter, device, queue, texture, target, false))
    }

    fn assemble(
        kind: BackendKind,
        adapter: wgpu::Adapter,
        device: wgpu::Device,
        queue: wgpu::Queue,
        texture: wgpu::Texture,
        target: TargetDesc,
        imported: bool,
    ) -> Self {
        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("inapp target view"),
            format: Some(target.format.to_wgpu()),
            dimension: Some(wgpu::TextureViewDimension::D2),
            ..Default::default()
        });

        Self {
            kind,
            adapter,
            device,
            queue,
            texture,
            view,
            target,
            imported,
        }
    }

    pub fn adapter(&self) -> &wgpu::Adapter {
        &self.adapter
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    /// View of the bound render target; examples render into this.
    pub fn target_view(&self) -> &wgpu::TextureView {
        &self.view
    }

    /// wgpu format of the bound render target.
    pub fn color_format(&self) -> wgpu::TextureFormat {
        self.target.format.to_wgpu()
    }

    /// `true` if the target texture belongs to the host.
    pub fn is_imported(&self) -> bool {
        self.imported
    }
}

impl GpuBackend for WgpuBackend {
    type Encoder = wgpu::CommandEncoder;

    fn kind(&self) -> BackendKind {
        self.kind
    }

    fn supports_format(&self, format: PixelFormat) -> bool {
        Self::format_supported(format)
    }

    fn target(&self) -> &TargetDesc {
        &self.target
    }

    fn begin_frame(&self) -> wgpu::CommandEncoder {
        self.device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("inapp frame encoder"),
            })
    }

    fn submit(&self, encoder: wgpu::CommandEncoder) {
        self.queue.submit(std::iter::once(encoder.finish()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_color8_formats_are_supported() {
        for format in PixelFormat::COLOR8 {
            assert!(WgpuBackend::format_supported(format));
        }
        assert!(!WgpuBackend::format_supported(PixelFormat::Rgba16Float));
        assert!(!WgpuBackend::format_supported(PixelFormat::Rgb10a2Unorm));
    }

    fn headless(width: u32, height: u32) -> Result<WgpuBackend> {
        let target = TargetDesc::new(width, height, PixelFormat::Rgba8Unorm);
        pollster::block_on(WgpuBackend::headless(target, DeviceInit::default()))
    }

    #[test]
    fn headless_target_matches_description() {
        let gpu = match headless(320, 200) {
            Ok(gpu) => gpu,
            Err(err) => {
                eprintln!("skipping: {err:#}");
                return;
            }
        };
        let size = gpu.texture().size();
        assert_eq!((size.width, size.height), (320, 200));
        assert_eq!(gpu.texture().format(), gpu.color_format());
        assert!(!gpu.is_imported());
    }

    #[test]
    fn target_beyond_device_limits_is_an_error_not_a_panic() {
        if let Err(err) = headless(16, 16) {
            eprintln!("skipping: {err:#}");
            return;
        }

        for (w, h) in [(100_000, 16), (16, 100_000)] {
            let result = std::panic::catch_unwind(|| headless(w, h));
            let err = match result {
                Ok(Err(err)) => err,
                Ok(Ok(_)) => panic!("{w}x{h} target was accepted"),
                Err(_) => panic!("{w}x{h} target panicked inside wgpu"),
            };
            assert!(format!("{err:#}").contains("exceeds the device limit"), "{err:#}");
        }
    }

    #[test]
    fn headless_rejects_unsupported_format_before_touching_the_gpu() {
        let target = TargetDesc::new(64, 64, PixelFormat::Rgba16Float);
        let result = pollster::block_on(WgpuBackend::headless(target, DeviceInit::default()));
        let err = result.err().unwrap();
        assert!(format!("{err:#}").contains("not supported"));
    }
}
