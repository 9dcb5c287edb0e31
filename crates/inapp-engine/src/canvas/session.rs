use crate::device::{GpuBackend, TargetDesc};
use crate::example::{ExampleRegistry, SwitchState, Switcher};
use crate::time::FrameClock;

use super::{CanvasConfig, CanvasError, CanvasEvent, EventSink};

/// Result of one `enter_frame` call.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameOutcome {
    /// The example at `example` recorded and submitted frame `frame_index`.
    Rendered { example: usize, frame_index: u64 },
    /// No example could be activated; nothing was submitted.
    Skipped,
}

/// Session object bound to one host render surface.
///
/// Owns the switcher (and through it every example) and the GPU backend. The
/// backend's bindings are fixed at construction: frames only borrow it.
///
/// Not reentrant. The host serializes `enter_frame`/`change_example` on one thread.
pub struct Canvas<G: GpuBackend> {
    // Declared first so example resources are released before the device.
    switcher: Switcher<G>,
    gpu: G,
    clock: FrameClock,
    events: Box<dyn EventSink>,
}

impl<G: GpuBackend> Canvas<G> {
    /// Validates the bound target and example set, then fires `CanvasCreated`.
    ///
    /// On error nothing is emitted and `gpu` is dropped with everything it holds.
    pub fn new(
        gpu: G,
        examples: ExampleRegistry<G>,
        events: Box<dyn EventSink>,
        config: CanvasConfig,
    ) -> Result<Self, CanvasError> {
        let target = *gpu.target();
        target.validate().map_err(CanvasError::configuration)?;

        if !gpu.supports_format(target.format) {
            return Err(CanvasError::Configuration(format!(
                "pixel format {:?} is not supported by the {} backend",
                target.format,
                gpu.kind()
            )));
        }

        let switcher = Switcher::new(examples, config.default_example)?;

        log::info!(
            "canvas created: {} {}x{} {:?}, {} examples",
            gpu.kind(),
            target.width,
            target.height,
            target.format,
            switcher.len()
        );

        let canvas = Self {
            switcher,
            gpu,
            clock: FrameClock::new(config.frame_delta),
            events,
        };
        canvas.events.emit(CanvasEvent::CanvasCreated);
        Ok(canvas)
    }

    /// Produces one frame into the bound target.
    ///
    /// Resolves the active example (activating the default on first use), advances
    /// it, records, submits, then fires `FrameEntered`. Skipped frames submit
    /// nothing and fire nothing.
    pub fn enter_frame(&mut self) -> FrameOutcome {
        let Some((index, example)) = self.switcher.resolve(&self.gpu) else {
            log::trace!("frame skipped: no active example");
            return FrameOutcome::Skipped;
        };

        let time = self.clock.tick();
        example.advance(time.dt);

        let mut encoder = self.gpu.begin_frame();
        example.record(&self.gpu, &mut encoder);
        self.gpu.submit(encoder);

        log::trace!("frame {} rendered by example {index}", time.frame_index);
        self.events.emit(CanvasEvent::FrameEntered);

        FrameOutcome::Rendered {
            example: index,
            frame_index: time.frame_index,
        }
    }

    /// Switches the active example.
    ///
    /// Out-of-range indices are logged and ignored. A valid index always tears the
    /// current example down and sets the new one up, even if it is already active.
    /// Nothing is rendered until the next `enter_frame`.
    pub fn change_example(&mut self, index: i32) -> Result<usize, CanvasError> {
        let result = self.switcher.select(&self.gpu, i64::from(index));
        match &result {
            Ok(active) => {
                self.clock.reset();
                log::info!("switched to example {active}");
            }
            Err(err @ CanvasError::InvalidIndex { .. }) => log::warn!("{err}; keeping current example"),
            Err(err) => log::error!("{err}"),
        }
        result
    }

    pub fn gpu(&self) -> &G {
        &self.gpu
    }

    pub fn target(&self) -> &TargetDesc {
        self.gpu.target()
    }

    pub fn active_example(&self) -> Option<usize> {
        self.switcher.active_index()
    }

    pub fn switch_state(&self) -> SwitchState {
        self.switcher.state()
    }

    pub fn example_count(&self) -> usize {
        self.switcher.len()
    }

    pub fn example_names(&self) -> Vec<&'static str> {
        self.switcher.names()
    }

    /// Frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.clock.frames()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::canvas::NullSink;
    use crate::device::PixelFormat;
    use crate::testing::{Journal, RecordingExample, RecordingGpu};

    fn examples(journal: &Journal, count: usize) -> ExampleRegistry<RecordingGpu> {
        (0..count).fold(ExampleRegistry::new(), |reg, i| {
            reg.register(RecordingExample::new(i, journal.clone()))
        })
    }

    fn event_log() -> (Arc<Mutex<Vec<i32>>>, Box<dyn EventSink>) {
        let codes = Arc::new(Mutex::new(Vec::new()));
        let sink = {
            let codes = Arc::clone(&codes);
            move |ev: CanvasEvent| codes.lock().unwrap().push(ev.code())
        };
        (codes, Box::new(sink))
    }

    fn canvas(journal: &Journal) -> (Canvas<RecordingGpu>, Arc<Mutex<Vec<i32>>>) {
        let (codes, sink) = event_log();
        let canvas = Canvas::new(
            RecordingGpu::new(journal.clone()),
            examples(journal, 3),
            sink,
            CanvasConfig::default(),
        )
        .unwrap();
        (canvas, codes)
    }

    #[test]
    fn creation_fires_created_exactly_once() {
        let journal = Journal::default();
        let (canvas, codes) = canvas(&journal);

        assert_eq!(*codes.lock().unwrap(), vec![0]);
        assert_eq!(canvas.target().width, 1122);
        assert_eq!(canvas.target().height, 1122);
        assert_eq!(canvas.switch_state(), SwitchState::Uninitialized);
        // Nothing is set up before the first frame.
        assert!(journal.take().is_empty());
    }

    #[test]
    fn three_frames_fire_three_frame_events_on_example_zero() {
        let journal = Journal::default();
        let (mut canvas, codes) = canvas(&journal);

        for expected in 0..3 {
            let outcome = canvas.enter_frame();
            assert_eq!(
                outcome,
                FrameOutcome::Rendered {
                    example: 0,
                    frame_index: expected
                }
            );
            assert_eq!(canvas.active_example(), Some(0));
        }

        assert_eq!(*codes.lock().unwrap(), vec![0, 1, 1, 1]);
        assert_eq!(
            journal.take(),
            vec![
                "activate 0",
                "submit [draw 0 #1]",
                "submit [draw 0 #2]",
                "submit [draw 0 #3]",
            ]
        );
        assert_eq!(canvas.gpu().submissions(), 3);
        assert_eq!(canvas.frames(), 3);
    }

    #[test]
    fn switch_sets_up_before_recording_and_releases_previous() {
        let journal = Journal::default();
        let (mut canvas, _codes) = canvas(&journal);
        canvas.enter_frame();
        journal.take();

        assert_eq!(canvas.change_example(2), Ok(2));
        // No rendering effect until the next frame.
        assert_eq!(canvas.gpu().submissions(), 1);

        canvas.enter_frame();
        assert_eq!(
            journal.take(),
            vec!["deactivate 0", "activate 2", "submit [draw 2 #1]"]
        );
    }

    #[test]
    fn switch_before_first_frame_skips_default() {
        let journal = Journal::default();
        let (mut canvas, _codes) = canvas(&journal);

        canvas.change_example(2).unwrap();
        canvas.enter_frame();
        assert_eq!(journal.take(), vec!["activate 2", "submit [draw 2 #1]"]);
    }

    #[test]
    fn unsupported_format_is_rejected_without_events() {
        let journal = Journal::default();
        let (codes, sink) = event_log();
        let gpu = RecordingGpu::with_target(
            journal.clone(),
            TargetDesc::new(1122, 1122, PixelFormat::Rgba16Float),
        );

        let err = Canvas::new(gpu, examples(&journal, 3), sink, CanvasConfig::default())
            .err()
            .unwrap();

        assert!(err.is_fatal());
        assert!(err.to_string().contains("Rgba16Float"));
        assert!(codes.lock().unwrap().is_empty());
        // No example was ever set up.
        assert!(journal.take().is_empty());
    }

    #[test]
    fn zero_sized_target_is_a_configuration_error() {
        let journal = Journal::default();
        let gpu = RecordingGpu::with_target(
            journal.clone(),
            TargetDesc::new(0, 0, PixelFormat::Bgra8UnormSrgb),
        );
        let err = Canvas::new(gpu, examples(&journal, 1), Box::new(NullSink), CanvasConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, CanvasError::Configuration(msg) if msg.contains("zero size")));
    }

    #[test]
    fn at_most_one_example_is_ever_active() {
        let journal = Journal::default();
        let (mut canvas, _codes) = canvas(&journal);

        let script: [i32; 9] = [1, 1, 7, 0, -3, 2, 2, 1, 0];
        for index in script {
            let _ = canvas.change_example(index);
            canvas.enter_frame();
        }

        // Replay the journal: activations and deactivations must alternate.
        let mut active: Option<String> = None;
        for entry in journal.take() {
            if let Some(i) = entry.strip_prefix("activate ") {
                assert!(active.is_none(), "activate {i} while {active:?} active");
                active = Some(i.to_string());
            } else if let Some(i) = entry.strip_prefix("deactivate ") {
                assert_eq!(active.as_deref(), Some(i));
                active = None;
            } else if let Some(cmds) = entry.strip_prefix("submit [") {
                let current = active.as_deref().unwrap();
                assert!(cmds.starts_with(&format!("draw {current} ")));
            }
        }
        assert_eq!(canvas.active_example(), Some(0));
    }

    #[test]
    fn invalid_index_keeps_active_example() {
        let journal = Journal::default();
        let (mut canvas, codes) = canvas(&journal);
        canvas.change_example(1).unwrap();

        for bad in [-1, 3, i32::MAX, i32::MIN] {
            let err = canvas.change_example(bad).unwrap_err();
            assert!(!err.is_fatal());
            assert_eq!(canvas.active_example(), Some(1));
        }
        canvas.enter_frame();
        assert_eq!(*codes.lock().unwrap(), vec![0, 1]);
    }

    #[test]
    fn reselection_equals_fresh_activation() {
        let journal = Journal::default();
        let (mut canvas, _codes) = canvas(&journal);
        canvas.change_example(1).unwrap();
        canvas.enter_frame();
        canvas.enter_frame();
        journal.take();

        canvas.change_example(1).unwrap();
        canvas.enter_frame();
        // Tick counter restarted: same output as the very first frame of example 1.
        assert_eq!(
            journal.take(),
            vec!["deactivate 1", "activate 1", "submit [draw 1 #1]"]
        );
    }

    #[test]
    fn frames_never_touch_bindings() {
        let journal = Journal::default();
        let (mut canvas, _codes) = canvas(&journal);
        let before = *canvas.target();
        let kind = canvas.gpu().kind();

        for _ in 0..10 {
            canvas.enter_frame();
        }
        assert_eq!(*canvas.target(), before);
        assert_eq!(canvas.gpu().kind(), kind);
    }

    #[test]
    fn failed_setup_skips_frames_without_events() {
        let journal = Journal::default();
        let (codes, sink) = event_log();
        let registry = ExampleRegistry::new()
            .register(RecordingExample::failing(0, journal.clone()))
            .register(RecordingExample::new(1, journal.clone()));
        let mut canvas = Canvas::new(
            RecordingGpu::new(journal.clone()),
            registry,
            sink,
            CanvasConfig::default(),
        )
        .unwrap();

        assert_eq!(canvas.enter_frame(), FrameOutcome::Skipped);
        assert_eq!(canvas.enter_frame(), FrameOutcome::Skipped);
        assert_eq!(canvas.switch_state(), SwitchState::Failed(0));
        assert_eq!(canvas.gpu().submissions(), 0);

        canvas.change_example(1).unwrap();
        assert!(matches!(canvas.enter_frame(), FrameOutcome::Rendered { example: 1, .. }));
        assert_eq!(*codes.lock().unwrap(), vec![0, 1]);
    }

    #[test]
    fn configured_default_example_is_activated_first() {
        let journal = Journal::default();
        let config = CanvasConfig {
            default_example: 2,
            ..CanvasConfig::default()
        };
        let mut canvas = Canvas::new(
            RecordingGpu::new(journal.clone()),
            examples(&journal, 3),
            Box::new(NullSink),
            config,
        )
        .unwrap();

        canvas.enter_frame();
        assert_eq!(canvas.active_example(), Some(2));
        assert_eq!(canvas.example_names()[2], "recording-2");
    }

    #[test]
    fn dropping_canvas_releases_active_example() {
        let journal = Journal::default();
        let (mut canvas, _codes) = canvas(&journal);
        canvas.enter_frame();
        journal.take();

        drop(canvas);
        assert_eq!(journal.take(), vec!["deactivate 0"]);
    }
}
