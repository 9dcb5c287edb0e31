use anyhow::Result;

/// Pixel formats a host may declare for its render target.
///
/// Only the 8-bit color formats are renderable by the wgpu backend; the rest are
/// recognized so they can be rejected with a meaningful configuration error.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PixelFormat {
    Bgra8UnormSrgb,
    Bgra8Unorm,
    Rgba8UnormSrgb,
    Rgba8Unorm,
    Rgba16Float,
    Rgb10a2Unorm,
}

impl PixelFormat {
    /// 8-bit color formats (sRGB and linear).
    pub const COLOR8: [PixelFormat; 4] = [
        PixelFormat::Bgra8UnormSrgb,
        PixelFormat::Bgra8Unorm,
        PixelFormat::Rgba8UnormSrgb,
        PixelFormat::Rgba8Unorm,
    ];

    /// Whether the format may be bound as a storage (shader-write) texture without
    /// optional device features.
    #[inline]
    pub fn is_storage_capable(self) -> bool {
        matches!(self, PixelFormat::Rgba8Unorm | PixelFormat::Rgba16Float)
    }

    pub(crate) fn to_wgpu(self) -> wgpu::TextureFormat {
        match self {
            PixelFormat::Bgra8UnormSrgb => wgpu::TextureFormat::Bgra8UnormSrgb,
            PixelFormat::Bgra8Unorm => wgpu::TextureFormat::Bgra8Unorm,
            PixelFormat::Rgba8UnormSrgb => wgpu::TextureFormat::Rgba8UnormSrgb,
            PixelFormat::Rgba8Unorm => wgpu::TextureFormat::Rgba8Unorm,
            PixelFormat::Rgba16Float => wgpu::TextureFormat::Rgba16Float,
            PixelFormat::Rgb10a2Unorm => wgpu::TextureFormat::Rgb10a2Unorm,
        }
    }
}

/// How the render target may be used by the GPU.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TargetUsage {
    pub shader_read: bool,
    pub shader_write: bool,
    pub render_target: bool,
}

impl TargetUsage {
    /// Shader-read, shader-write and render-target; what hosts create by default.
    pub const ALL: TargetUsage = TargetUsage {
        shader_read: true,
        shader_write: true,
        render_target: true,
    };

    /// Maps to wgpu usages for `format`.
    ///
    /// Shader-write is dropped for formats that cannot be storage-bound; the
    /// engine never writes the target from a compute pass.
    pub(crate) fn to_wgpu(self, format: PixelFormat) -> wgpu::TextureUsages {
        let mut usages = wgpu::TextureUsages::empty();
        if self.render_target {
            usages |= wgpu::TextureUsages::RENDER_ATTACHMENT;
        }
        if self.shader_read {
            usages |= wgpu::TextureUsages::TEXTURE_BINDING;
        }
        if self.shader_write && format.is_storage_capable() {
            usages |= wgpu::TextureUsages::STORAGE_BINDING;
        }
        usages
    }
}

impl Default for TargetUsage {
    fn default() -> Self {
        Self::ALL
    }
}

/// Description of the single render target bound to a canvas.
///
/// Dimensions are fixed for the lifetime of the canvas.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TargetDesc {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub usage: TargetUsage,
}

impl TargetDesc {
    #[inline]
    pub const fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            width,
            height,
            format,
            usage: TargetUsage::ALL,
        }
    }

    #[inline]
    pub const fn with_usage(mut self, usage: TargetUsage) -> Self {
        self.usage = usage;
        self
    }

    /// Width over height. Callers only see validated (non-zero) targets.
    #[inline]
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    pub(crate) fn extent(&self) -> wgpu::Extent3d {
        wgpu::Extent3d {
            width: self.width,
            height: self.height,
            depth_or_array_layers: 1,
        }
    }

    /// Checks the backend-independent invariants of a render target.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.width > 0 && self.height > 0,
            "render target has zero size ({}x{})",
            self.width,
            self.height
        );
        anyhow::ensure!(
            self.usage.render_target,
            "render target is not usable as a color attachment"
        );
        Ok(())
    }

    /// Checks the target against the limits of the device it will live on.
    pub(crate) fn check_limits(&self, limits: &wgpu::Limits) -> Result<()> {
        let max = limits.max_texture_dimension_2d;
        anyhow::ensure!(
            self.width <= max && self.height <= max,
            "render target {}x{} exceeds the device limit of {max} per side",
            self.width,
            self.height
        );
        Ok(())
    }
}
