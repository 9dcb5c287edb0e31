//! inapp engine crate.
//!
//! Embeddable canvas engine: a host hands over native device/queue/texture handles,
//! then drives frames and example switches through a small, stable contract.
//!
//! Layering:
//! - `device`: backend-neutral GPU contract + wgpu implementation and host import
//! - `example`: the `Example` capability, registry and switcher
//! - `canvas`: session object, frame driver, events, errors, handle registry
//! - `demos`: built-in examples

pub mod canvas;
pub mod demos;
pub mod device;
pub mod example;
pub mod logging;
pub mod time;

#[cfg(test)]
mod testing;
