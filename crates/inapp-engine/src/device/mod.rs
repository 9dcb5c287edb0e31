//! GPU device abstraction.
//!
//! This module is responsible for:
//! - the backend-neutral `GpuBackend` contract consumed by canvases and examples
//! - wrapping host-supplied native device/queue/texture handles for wgpu
//! - creating an engine-owned device and render target when the host has none
//!
//! Platform pointer types never leave `import`.

mod backend;
mod format;
mod import;
mod init;
mod wgpu_backend;

pub use backend::{BackendKind, GpuBackend};
pub use format::{PixelFormat, TargetDesc, TargetUsage};
pub use import::{wrap_host_device, HostDevice, RawHandle};
pub use init::DeviceInit;
pub use wgpu_backend::WgpuBackend;
