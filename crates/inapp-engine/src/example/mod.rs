//! Switchable rendering examples.
//!
//! An example is a self-contained rendering routine with private GPU state. A canvas
//! owns an ordered, fixed registry of examples and a `Switcher` that keeps exactly
//! one of them active.
//!
//! Lifecycle of one example inside a canvas:
//! `activate` -> (`advance` -> `record`)* -> `deactivate`, repeated on every
//! (re-)selection. Nothing is cached across deactivation.

mod registry;
mod switcher;

pub use registry::ExampleRegistry;
pub use switcher::{SwitchState, Switcher};

use anyhow::Result;

use crate::device::GpuBackend;

/// Common interface of every registered example.
pub trait Example<G: GpuBackend>: Send {
    /// Stable display name, used in logs and host pickers.
    fn name(&self) -> &'static str;

    /// Allocates pipelines and buffers against the shared device.
    ///
    /// Runs on every selection, including re-selection of the active example, and
    /// must leave the example in the same state as a first activation.
    fn activate(&mut self, gpu: &G) -> Result<()>;

    /// Releases everything `activate` allocated. Must be safe to call on an
    /// example whose activation failed.
    fn deactivate(&mut self);

    /// Advances animation state by `dt` seconds.
    fn advance(&mut self, dt: f32);

    /// Records this frame's commands into `encoder`, targeting the bound render target.
    fn record(&mut self, gpu: &G, encoder: &mut G::Encoder);
}
