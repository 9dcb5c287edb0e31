use std::fmt;

use super::{PixelFormat, TargetDesc};

/// Native API family behind a device.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BackendKind {
    Metal,
    Vulkan,
    Dx12,
    Gl,
}

impl BackendKind {
    pub(crate) fn to_wgpu(self) -> wgpu::Backends {
        match self {
            BackendKind::Metal => wgpu::Backends::METAL,
            BackendKind::Vulkan => wgpu::Backends::VULKAN,
            BackendKind::Dx12 => wgpu::Backends::DX12,
            BackendKind::Gl => wgpu::Backends::GL,
        }
    }

    pub(crate) fn from_wgpu(backend: wgpu::Backend) -> Option<Self> {
        match backend {
            wgpu::Backend::Metal => Some(BackendKind::Metal),
            wgpu::Backend::Vulkan => Some(BackendKind::Vulkan),
            wgpu::Backend::Dx12 => Some(BackendKind::Dx12),
            wgpu::Backend::Gl => Some(BackendKind::Gl),
            _ => None,
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BackendKind::Metal => "Metal",
            BackendKind::Vulkan => "Vulkan",
            BackendKind::Dx12 => "D3D12",
            BackendKind::Gl => "GL",
        };
        f.write_str(name)
    }
}

/// Uniform GPU contract used by a canvas and its examples.
///
/// An implementation holds a device, its submission queue and exactly one render
/// target. The target is bound at construction and never rebound; frame recording
/// only ever borrows the backend immutably.
pub trait GpuBackend {
    /// Command recorder handed to the active example for one frame.
    type Encoder;

    fn kind(&self) -> BackendKind;

    /// Returns `true` if the backend can render into targets of `format`.
    fn supports_format(&self, format: PixelFormat) -> bool;

    /// Description of the bound render target.
    fn target(&self) -> &TargetDesc;

    /// Starts recording a frame.
    fn begin_frame(&self) -> Self::Encoder;

    /// Submits the recorded commands.
    ///
    /// Back-pressure (blocking or queueing when the GPU is still busy) follows the
    /// backend's own queue semantics.
    fn submit(&self, encoder: Self::Encoder);
}
