//! Time subsystem.
//!
//! Provides stable, testable frame timing without coupling to the host's display loop.
//! Intended usage:
//! - one `FrameClock` per canvas
//! - call `tick()` once per accepted frame to obtain `FrameTime`
//!
//! Whether `dt` follows the wall clock or a fixed step is explicit configuration
//! (`FrameDelta`), never inferred.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameDelta, FrameTime};
