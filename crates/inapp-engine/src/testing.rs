//! GPU-free test doubles shared by unit tests.

use std::cell::Cell;
use std::sync::{Arc, Mutex};

use anyhow::Result;

use crate::device::{BackendKind, GpuBackend, PixelFormat, TargetDesc};
use crate::example::Example;

/// Shared, ordered log of what the doubles were asked to do.
#[derive(Debug, Clone, Default)]
pub(crate) struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub(crate) fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    /// Drains and returns everything recorded so far.
    pub(crate) fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

/// Backend whose "command buffers" are lists of strings.
pub(crate) struct RecordingGpu {
    journal: Journal,
    target: TargetDesc,
    submissions: Cell<u64>,
}

impl RecordingGpu {
    pub(crate) fn new(journal: Journal) -> Self {
        Self::with_target(journal, TargetDesc::new(1122, 1122, PixelFormat::Bgra8UnormSrgb))
    }

    pub(crate) fn with_target(journal: Journal, target: TargetDesc) -> Self {
        Self {
            journal,
            target,
            submissions: Cell::new(0),
        }
    }

    pub(crate) fn submissions(&self) -> u64 {
        self.submissions.get()
    }
}

impl GpuBackend for RecordingGpu {
    type Encoder = Vec<String>;

    fn kind(&self) -> BackendKind {
        BackendKind::Metal
    }

    fn supports_format(&self, format: PixelFormat) -> bool {
        PixelFormat::COLOR8.contains(&format)
    }

    fn target(&self) -> &TargetDesc {
        &self.target
    }

    fn begin_frame(&self) -> Vec<String> {
        Vec::new()
    }

    fn submit(&self, encoder: Vec<String>) {
        self.submissions.set(self.submissions.get() + 1);
        self.journal.push(format!("submit [{}]", encoder.join(", ")));
    }
}

const NAMES: [&str; 8] = [
    "recording-0",
    "recording-1",
    "recording-2",
    "recording-3",
    "recording-4",
    "recording-5",
    "recording-6",
    "recording-7",
];

/// Example that journals its lifecycle and draws `draw <index> #<ticks>`.
pub(crate) struct RecordingExample {
    index: usize,
    journal: Journal,
    fail_setup: bool,
    active: bool,
    ticks: u32,
}

impl RecordingExample {
    pub(crate) fn new(index: usize, journal: Journal) -> Self {
        Self {
            index,
            journal,
            fail_setup: false,
            active: false,
            ticks: 0,
        }
    }

    pub(crate) fn failing(index: usize, journal: Journal) -> Self {
        Self {
            fail_setup: true,
            ..Self::new(index, journal)
        }
    }
}

impl Example<RecordingGpu> for RecordingExample {
    fn name(&self) -> &'static str {
        NAMES[self.index % NAMES.len()]
    }

    fn activate(&mut self, _gpu: &RecordingGpu) -> Result<()> {
        self.journal.push(format!("activate {}", self.index));
        anyhow::ensure!(!self.fail_setup, "pipeline creation refused");
        self.active = true;
        self.ticks = 0;
        Ok(())
    }

    fn deactivate(&mut self) {
        self.journal.push(format!("deactivate {}", self.index));
        self.active = false;
    }

    fn advance(&mut self, _dt: f32) {
        self.ticks += 1;
    }

    fn record(&mut self, _gpu: &RecordingGpu, encoder: &mut Vec<String>) {
        assert!(self.active, "example {} recorded while inactive", self.index);
        encoder.push(format!("draw {} #{}", self.index, self.ticks));
    }
}
