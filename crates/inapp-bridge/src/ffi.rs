//! C entry points.
//!
//! Canvases live in a process-wide registry and are addressed by opaque `u64`
//! handles (0 is never a valid handle). Every entry point:
//! - never unwinds into the host; panics are caught and logged
//! - treats unknown or destroyed handles as a logged no-op
//! - holds the registry lock while it runs, so host callbacks must not call back
//!   into the bridge

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Mutex, MutexGuard, PoisonError};

use inapp_engine::canvas::{Canvas, CanvasConfig, CanvasError, CanvasRegistry};
use inapp_engine::demos;
use inapp_engine::device::{DeviceInit, WgpuBackend};
use inapp_engine::logging::init_logging;

use crate::host::{self, HostCallbackFn, HostViewObj};

static CANVASES: Mutex<CanvasRegistry<Canvas<WgpuBackend>>> =
    Mutex::new(CanvasRegistry::new());

fn canvases() -> MutexGuard<'static, CanvasRegistry<Canvas<WgpuBackend>>> {
    // A panic mid-frame leaves the registry structurally intact.
    CANVASES.lock().unwrap_or_else(PoisonError::into_inner)
}

fn guarded<T>(entry: &str, fallback: T, f: impl FnOnce() -> T) -> T {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(payload) => {
            let msg = payload
                .downcast_ref::<&str>()
                .copied()
                .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
                .unwrap_or("<non-string panic>");
            log::error!("{entry}: panic caught at the C boundary: {msg}");
            fallback
        }
    }
}

fn register(entry: &str, created: Result<Canvas<WgpuBackend>, CanvasError>) -> u64 {
    match created {
        Ok(canvas) => {
            let handle = canvases().insert(canvas).into_raw();
            log::debug!("{entry}: canvas {handle:#x} registered");
            handle
        }
        Err(err) => {
            log::error!("{entry}: {err}");
            0
        }
    }
}

/// Creates a canvas over host-owned GPU objects.
///
/// Returns 0 on failure; no callback fires in that case. On success
/// `CanvasCreated` (code 0) is delivered before this function returns.
///
/// # Safety
/// Non-null pointers in `obj` must be live objects of the backend named by
/// `obj.backend`, and stay alive until `destroy_canvas`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn create_canvas(obj: HostViewObj) -> u64 {
    let config = CanvasConfig::default();
    init_logging(config.logging.clone());

    guarded("create_canvas", 0, || {
        register("create_canvas", unsafe { obj.into_canvas(config) })
    })
}

/// Creates a canvas that renders into an engine-owned offscreen texture on a
/// device of its own. Same return and callback rules as `create_canvas`.
#[unsafe(no_mangle)]
pub extern "C" fn create_headless_canvas(
    width: u32,
    height: u32,
    format: u32,
    callback: Option<HostCallbackFn>,
) -> u64 {
    let config = CanvasConfig::default();
    init_logging(config.logging.clone());

    guarded("create_headless_canvas", 0, || {
        let created = host::decode_target(width, height, format).and_then(|target| {
            let gpu = pollster::block_on(WgpuBackend::headless(target, DeviceInit::default()))
                .map_err(|e| CanvasError::Configuration(format!("{e:#}")))?;
            Canvas::new(gpu, demos::default_examples(), host::event_sink(callback), config)
        });
        register("create_headless_canvas", created)
    })
}

/// Renders one frame into the canvas's target. Fires `FrameEntered` (code 1)
/// after submission; skipped frames fire nothing.
#[unsafe(no_mangle)]
pub extern "C" fn enter_frame(canvas: u64) {
    guarded("enter_frame", (), || match canvases().get_mut(canvas) {
        Ok(c) => {
            c.enter_frame();
        }
        Err(err) => log::debug!("enter_frame ignored: {err}"),
    })
}

/// Switches the canvas to example `index`. Out-of-range indices are ignored.
#[unsafe(no_mangle)]
pub extern "C" fn change_example(canvas: u64, index: i32) {
    guarded("change_example", (), || match canvases().get_mut(canvas) {
        // The canvas logs its own failures.
        Ok(c) => {
            let _ = c.change_example(index);
        }
        Err(err) => log::debug!("change_example ignored: {err}"),
    })
}

/// Releases the canvas and every GPU resource it created. The host's own
/// device, queue and texture are left untouched.
#[unsafe(no_mangle)]
pub extern "C" fn destroy_canvas(canvas: u64) {
    guarded("destroy_canvas", (), || {
        let removed = canvases().remove(canvas);
        match removed {
            // Dropped outside the lock.
            Ok(c) => {
                drop(c);
                log::debug!("canvas {canvas:#x} destroyed");
            }
            Err(err) => log::debug!("destroy_canvas ignored: {err}"),
        }
    })
}

/// Number of built-in examples; valid indices are `0..example_count()`.
#[unsafe(no_mangle)]
pub extern "C" fn example_count() -> i32 {
    guarded("example_count", 0, || {
        i32::try_from(demos::default_examples().len()).unwrap_or(i32::MAX)
    })
}
