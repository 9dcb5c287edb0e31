//! Logging utilities.
//!
//! Centralizes logger initialization. Engine code logs through the `log` facade
//! only; hosts that install their own logger simply skip `init_logging`.

mod init;

pub use init::{init_logging, LoggingConfig};
