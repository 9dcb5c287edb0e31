use std::ffi::c_void;

use inapp_engine::canvas::{Canvas, CanvasConfig, CanvasError, CanvasEvent, EventSink, NullSink};
use inapp_engine::demos;
use inapp_engine::device::{
    wrap_host_device, BackendKind, DeviceInit, PixelFormat, RawHandle, TargetDesc, TargetUsage,
    WgpuBackend,
};

/// Host callback: receives a `CanvasEvent` code.
pub type HostCallbackFn = extern "C" fn(code: i32);

/// Everything a host hands over to create a canvas.
///
/// All pointers are borrowed. The host keeps the device, queue and texture alive
/// until it destroys the canvas.
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct HostViewObj {
    /// e.g. `id<MTLDevice>`
    pub device_ptr: *mut c_void,
    /// e.g. `id<MTLCommandQueue>` created from `device_ptr`
    pub queue_ptr: *mut c_void,
    /// e.g. `id<MTLTexture>`, 2D, created from `device_ptr`
    pub texture_ptr: *mut c_void,

    pub width: u32,
    pub height: u32,
    /// `HostPixelFormat` code.
    pub format: u32,
    /// `HostBackend` code.
    pub backend: u32,

    /// May be null; events are then dropped.
    pub callback: Option<HostCallbackFn>,
}

/// Pixel format codes of the C contract.
#[repr(u32)]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum HostPixelFormat {
    Bgra8UnormSrgb = 0,
    Bgra8Unorm = 1,
    Rgba8UnormSrgb = 2,
    Rgba8Unorm = 3,
    Rgba16Float = 4,
    Rgb10a2Unorm = 5,
}

impl HostPixelFormat {
    pub fn from_code(code: u32) -> Option<Self> {
        Some(match code {
            0 => Self::Bgra8UnormSrgb,
            1 => Self::Bgra8Unorm,
            2 => Self::Rgba8UnormSrgb,
            3 => Self::Rgba8Unorm,
            4 => Self::Rgba16Float,
            5 => Self::Rgb10a2Unorm,
            _ => return None,
        })
    }
}

impl From<HostPixelFormat> for PixelFormat {
    fn from(f: HostPixelFormat) -> Self {
        match f {
            HostPixelFormat::Bgra8UnormSrgb => PixelFormat::Bgra8UnormSrgb,
            HostPixelFormat::Bgra8Unorm => PixelFormat::Bgra8Unorm,
            HostPixelFormat::Rgba8UnormSrgb => PixelFormat::Rgba8UnormSrgb,
            HostPixelFormat::Rgba8Unorm => PixelFormat::Rgba8Unorm,
            HostPixelFormat::Rgba16Float => PixelFormat::Rgba16Float,
            HostPixelFormat::Rgb10a2Unorm => PixelFormat::Rgb10a2Unorm,
        }
    }
}

/// Backend codes of the C contract.
#[repr(u32)]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum HostBackend {
    Metal = 0,
    Vulkan = 1,
    Dx12 = 2,
    Gl = 3,
}

impl HostBackend {
    pub fn from_code(code: u32) -> Option<Self> {
        Some(match code {
            0 => Self::Metal,
            1 => Self::Vulkan,
            2 => Self::Dx12,
            3 => Self::Gl,
            _ => return None,
        })
    }
}

impl From<HostBackend> for BackendKind {
    fn from(b: HostBackend) -> Self {
        match b {
            HostBackend::Metal => BackendKind::Metal,
            HostBackend::Vulkan => BackendKind::Vulkan,
            HostBackend::Dx12 => BackendKind::Dx12,
            HostBackend::Gl => BackendKind::Gl,
        }
    }
}

/// Forwards canvas events to a C function pointer.
#[derive(Debug, Copy, Clone)]
pub struct HostCallback(pub HostCallbackFn);

impl EventSink for HostCallback {
    fn emit(&self, event: CanvasEvent) {
        (self.0)(event.code())
    }
}

pub(crate) fn event_sink(callback: Option<HostCallbackFn>) -> Box<dyn EventSink> {
    match callback {
        Some(cb) => Box::new(HostCallback(cb)),
        None => Box::new(NullSink),
    }
}

/// Decodes a size + format code into a render-target description.
///
/// Rejects formats the wgpu backend cannot render into, so callers can stop before
/// any handle is touched.
pub(crate) fn decode_target(width: u32, height: u32, format: u32) -> Result<TargetDesc, CanvasError> {
    let format = HostPixelFormat::from_code(format)
        .map(PixelFormat::from)
        .ok_or_else(|| CanvasError::Configuration(format!("unknown pixel format code {format}")))?;

    if !WgpuBackend::format_supported(format) {
        return Err(CanvasError::Configuration(format!(
            "pixel format {format:?} is not supported by the wgpu backend"
        )));
    }

    let target = TargetDesc::new(width, height, format).with_usage(TargetUsage::ALL);
    target
        .validate()
        .map_err(|e| CanvasError::Configuration(format!("{e:#}")))?;
    Ok(target)
}

fn raw_handle(ptr: *mut c_void, what: &str) -> Result<RawHandle, CanvasError> {
    RawHandle::new(ptr).ok_or_else(|| CanvasError::Configuration(format!("null {what} handle")))
}

impl HostViewObj {
    /// Builds a canvas over the host's device, queue and texture.
    ///
    /// Everything that can be checked without touching the handles (format, size,
    /// null pointers, backend code) is checked first, so a rejected view leaves no
    /// allocation behind and fires no callback.
    ///
    /// # Safety
    /// Non-null pointers must satisfy the contract of [`HostViewObj`].
    pub unsafe fn into_canvas(
        self,
        config: CanvasConfig,
    ) -> Result<Canvas<WgpuBackend>, CanvasError> {
        let target = decode_target(self.width, self.height, self.format)?;

        let device = raw_handle(self.device_ptr, "device")?;
        let queue = raw_handle(self.queue_ptr, "queue")?;
        let texture = raw_handle(self.texture_ptr, "texture")?;

        let kind: BackendKind = HostBackend::from_code(self.backend)
            .ok_or_else(|| {
                CanvasError::Configuration(format!("unknown backend code {}", self.backend))
            })?
            .into();

        let host = unsafe { wrap_host_device(kind, device, queue, &DeviceInit::default()) }
            .map_err(|e| CanvasError::Configuration(format!("{e:#}")))?;
        let gpu = unsafe { WgpuBackend::from_host(host, texture, target) }
            .map_err(|e| CanvasError::Configuration(format!("{e:#}")))?;

        Canvas::new(gpu, demos::default_examples(), event_sink(self.callback), config)
    }
}
