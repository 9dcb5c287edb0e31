use std::ffi::c_void;
use std::ptr::NonNull;

use anyhow::Result;

use super::{BackendKind, DeviceInit, TargetDesc};

/// Opaque, host-owned native object pointer (e.g. an `id<MTLDevice>`).
///
/// The engine never frees the object behind a `RawHandle`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct RawHandle(NonNull<c_void>);

impl RawHandle {
    /// Returns `None` for a null pointer.
    #[inline]
    pub fn new(ptr: *mut c_void) -> Option<Self> {
        NonNull::new(ptr).map(Self)
    }

    #[inline]
    pub fn as_ptr(self) -> *mut c_void {
        self.0.as_ptr()
    }
}

/// Host device + queue wrapped for wgpu.
///
/// Holds the engine's own reference to the native objects; the host's references
/// are untouched.
pub struct HostDevice {
    pub(crate) kind: BackendKind,
    pub(crate) adapter: wgpu::Adapter,
    pub(crate) device: wgpu::Device,
    pub(crate) queue: wgpu::Queue,
}

impl HostDevice {
    pub fn kind(&self) -> BackendKind {
        self.kind
    }
}

/// Wraps a host-created device and command queue.
///
/// Fails when the handles belong to a backend this build cannot import (for
/// example Vulkan handles on a Metal-only build). That is a configuration error,
/// reported once at canvas creation.
///
/// # Safety
/// `device` and `queue` must point to live, initialized native objects of `kind`
/// and the queue must belong to the device. The host keeps both alive for as long
/// as the returned value, and anything built from it, exists.
pub unsafe fn wrap_host_device(
    kind: BackendKind,
    device: RawHandle,
    queue: RawHandle,
    init: &DeviceInit,
) -> Result<HostDevice> {
    match kind {
        #[cfg(all(feature = "metal", target_vendor = "apple"))]
        BackendKind::Metal => unsafe { metal_import::wrap_device(device, queue, init) },
        other => {
            let _ = (device, queue, init);
            anyhow::bail!("{other} device handles cannot be imported by this build")
        }
    }
}

/// Wraps a host-created texture as the canvas render target.
///
/// # Safety
/// `texture` must point to a live 2D texture created on `host`'s device with the
/// size and format in `desc`, kept alive by the host for the canvas lifetime.
pub(crate) unsafe fn import_texture(
    host: &HostDevice,
    texture: RawHandle,
    desc: &TargetDesc,
) -> Result<wgpu::Texture> {
    match host.kind {
        #[cfg(all(feature = "metal", target_vendor = "apple"))]
        BackendKind::Metal => unsafe { metal_import::wrap_texture(host, texture, desc) },
        other => {
            let _ = (texture, desc);
            anyhow::bail!("{other} textures cannot be imported by this build")
        }
    }
}

#[cfg(all(feature = "metal", target_vendor = "apple"))]
mod metal_import {
    use anyhow::{Context, Result};
    use foreign_types::ForeignTypeRef;
    use wgpu::hal;

    use super::{HostDevice, RawHandle};
    use crate::device::{BackendKind, DeviceInit, TargetDesc};

    pub(super) unsafe fn wrap_device(
        device: RawHandle,
        queue: RawHandle,
        init: &DeviceInit,
    ) -> Result<HostDevice> {
        // `to_owned` retains; wgpu releases its own reference on drop.
        let raw_device = unsafe { metal::DeviceRef::from_ptr(device.as_ptr().cast()) }.to_owned();
        let raw_queue =
            unsafe { metal::CommandQueueRef::from_ptr(queue.as_ptr().cast()) }.to_owned();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::METAL,
            ..Default::default()
        });
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: init.power_preference,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .context("no Metal adapter available")?;

        let open = hal::OpenDevice::<hal::api::Metal> {
            device: unsafe { hal::metal::Device::device_from_raw(raw_device, init.required_features) },
            queue: unsafe { hal::metal::Queue::queue_from_raw(raw_queue, 1.0) },
        };

        let (device, queue) =
            unsafe { adapter.create_device_from_hal(open, &init.device_descriptor()) }
                .context("failed to open wgpu device over host Metal device")?;

        Ok(HostDevice {
            kind: BackendKind::Metal,
            adapter,
            device,
            queue,
        })
    }

    pub(super) unsafe fn wrap_texture(
        host: &HostDevice,
        texture: RawHandle,
        desc: &TargetDesc,
    ) -> Result<wgpu::Texture> {
        let raw = unsafe { metal::TextureRef::from_ptr(texture.as_ptr().cast()) }.to_owned();
        let format = desc.format.to_wgpu();

        let hal_texture = unsafe {
            hal::metal::Device::texture_from_raw(
                raw,
                format,
                metal::MTLTextureType::D2,
                1,
                1,
                hal::CopyExtent {
                    width: desc.width,
                    height: desc.height,
                    depth: 1,
                },
            )
        };

        let texture = unsafe {
            host.device.create_texture_from_hal::<hal::api::Metal>(
                hal_texture,
                &wgpu::TextureDescriptor {
                    label: Some("inapp imported target"),
                    size: desc.extent(),
                    mip_level_count: 1,
                    sample_count: 1,
                    dimension: wgpu::TextureDimension::D2,
                    format,
                    usage: desc.usage.to_wgpu(desc.format),
                    view_formats: &[],
                },
            )
        };
        Ok(texture)
    }
}
