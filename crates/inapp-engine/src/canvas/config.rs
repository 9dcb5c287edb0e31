use crate::logging::LoggingConfig;
use crate::time::FrameDelta;

/// Per-canvas configuration.
#[derive(Debug, Clone)]
pub struct CanvasConfig {
    /// Animation delta fed to the active example on each frame.
    ///
    /// Fixed by default so frame sequences are reproducible; hosts that want
    /// real-time animation opt into `FrameDelta::WallClock`.
    pub frame_delta: FrameDelta,

    /// Example activated by the first frame.
    pub default_example: usize,

    /// Logger setup applied by hosts that let the engine own logging.
    pub logging: LoggingConfig,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            frame_delta: FrameDelta::default(),
            default_example: 0,
            logging: LoggingConfig::default(),
        }
    }
}
