//! Canvas sessions.
//!
//! A canvas binds one render target on one device to a set of switchable examples
//! and drives them one host-triggered frame at a time. It also defines the error
//! taxonomy and lifecycle events shared with the host bridge.

mod config;
mod error;
mod event;
mod handle;
mod session;

pub use config::CanvasConfig;
pub use error::CanvasError;
pub use event::{CanvasEvent, EventSink, NullSink};
pub use handle::{CanvasHandle, CanvasRegistry};
pub use session::{Canvas, FrameOutcome};
