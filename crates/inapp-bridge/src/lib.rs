//! C ABI over `inapp-engine`.
//!
//! Hosts (iOS/macOS apps in practice) hand over their own device, queue and
//! render texture through [`HostViewObj`], then drive the canvas with
//! `enter_frame` / `change_example` and release it with `destroy_canvas`.
//! The matching declarations live in `include/inapp_bridge.h`.

pub mod ffi;
pub mod host;

pub use ffi::{
    change_example, create_canvas, create_headless_canvas, destroy_canvas, enter_frame,
    example_count,
};
pub use host::{HostBackend, HostCallbackFn, HostPixelFormat, HostViewObj};
