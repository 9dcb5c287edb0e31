use crate::canvas::CanvasError;
use crate::device::GpuBackend;

use super::{Example, ExampleRegistry};

/// Switcher state.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SwitchState {
    /// Nothing activated yet; the first frame activates the default example.
    Uninitialized,
    /// Example at this index is set up and renders on every frame.
    Active(usize),
    /// Setup of this example failed; frames are skipped until the next valid switch.
    Failed(usize),
}

/// Keeps at most one example of a registry active.
///
/// Every valid selection tears the current example down before the next one is set
/// up, including re-selection of the active index. No two examples ever hold GPU
/// state at the same time.
pub struct Switcher<G: GpuBackend> {
    examples: ExampleRegistry<G>,
    state: SwitchState,
    default_index: usize,
}

impl<G: GpuBackend> Switcher<G> {
    pub fn new(examples: ExampleRegistry<G>, default_index: usize) -> Result<Self, CanvasError> {
        if examples.is_empty() {
            return Err(CanvasError::Configuration(
                "no examples registered".to_string(),
            ));
        }
        if default_index >= examples.len() {
            return Err(CanvasError::Configuration(format!(
                "default example {default_index} out of range (0..{})",
                examples.len()
            )));
        }

        Ok(Self {
            examples,
            state: SwitchState::Uninitialized,
            default_index,
        })
    }

    #[inline]
    pub fn state(&self) -> SwitchState {
        self.state
    }

    /// Index of the example that renders on the next frame, if any.
    #[inline]
    pub fn active_index(&self) -> Option<usize> {
        match self.state {
            SwitchState::Active(index) => Some(index),
            _ => None,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.examples.names()
    }

    /// Switches to `index`.
    ///
    /// Out-of-range indices leave the current state untouched. A valid index always
    /// runs a full teardown + setup, even when it is already active.
    pub fn select(&mut self, gpu: &G, index: i64) -> Result<usize, CanvasError> {
        let count = self.examples.len();
        let target = usize::try_from(index)
            .ok()
            .filter(|&i| i < count)
            .ok_or(CanvasError::InvalidIndex { index, count })?;

        self.teardown();
        self.activate(gpu, target)
    }

    /// Returns the example to render this frame.
    ///
    /// Activates the default example on first use. Returns `None` while the
    /// switcher is in the `Failed` state.
    pub fn resolve(&mut self, gpu: &G) -> Option<(usize, &mut (dyn Example<G> + 'static))> {
        if self.state == SwitchState::Uninitialized {
            if let Err(err) = self.activate(gpu, self.default_index) {
                log::error!("{err}");
            }
        }

        match self.state {
            SwitchState::Active(index) => self.examples.get_mut(index).map(|e| (index, e)),
            _ => None,
        }
    }

    /// Deactivates the current example, if any, and returns to `Uninitialized`.
    pub fn teardown(&mut self) {
        if let SwitchState::Active(index) | SwitchState::Failed(index) = self.state {
            if let Some(example) = self.examples.get_mut(index) {
                log::debug!("deactivating example {index} `{}`", example.name());
                example.deactivate();
            }
        }
        self.state = SwitchState::Uninitialized;
    }

    fn activate(&mut self, gpu: &G, index: usize) -> Result<usize, CanvasError> {
        let count = self.examples.len();
        let Some(example) = self.examples.get_mut(index) else {
            // Callers validate `index`; keep the invariant without panicking.
            return Err(CanvasError::InvalidIndex {
                index: index as i64,
                count,
            });
        };

        match example.activate(gpu) {
            Ok(()) => {
                log::info!("activated example {index} `{}`", example.name());
                self.state = SwitchState::Active(index);
                Ok(index)
            }
            Err(err) => {
                // Drop whatever the partial setup allocated.
                example.deactivate();
                self.state = SwitchState::Failed(index);
                Err(CanvasError::ExampleSetup {
                    name: example.name(),
                    reason: format!("{err:#}"),
                })
            }
        }
    }
}

impl<G: GpuBackend> Drop for Switcher<G> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Journal, RecordingExample, RecordingGpu};

    fn switcher(journal: &Journal, count: usize) -> Switcher<RecordingGpu> {
        let mut registry = ExampleRegistry::new();
        for i in 0..count {
            registry = registry.register(RecordingExample::new(i, journal.clone()));
        }
        Switcher::new(registry, 0).unwrap()
    }

    #[test]
    fn starts_uninitialized_and_resolves_default() {
        let journal = Journal::default();
        let gpu = RecordingGpu::new(journal.clone());
        let mut sw = switcher(&journal, 3);

        assert_eq!(sw.state(), SwitchState::Uninitialized);
        let (index, _) = sw.resolve(&gpu).unwrap();
        assert_eq!(index, 0);
        assert_eq!(sw.state(), SwitchState::Active(0));
        assert_eq!(journal.take(), vec!["activate 0"]);
    }

    #[test]
    fn select_tears_down_before_setup() {
        let journal = Journal::default();
        let gpu = RecordingGpu::new(journal.clone());
        let mut sw = switcher(&journal, 3);
        sw.resolve(&gpu);
        journal.take();

        assert_eq!(sw.select(&gpu, 2), Ok(2));
        assert_eq!(journal.take(), vec!["deactivate 0", "activate 2"]);
        assert_eq!(sw.active_index(), Some(2));
    }

    #[test]
    fn reselecting_active_example_reruns_setup() {
        let journal = Journal::default();
        let gpu = RecordingGpu::new(journal.clone());
        let mut sw = switcher(&journal, 2);
        sw.select(&gpu, 1).unwrap();
        journal.take();

        sw.select(&gpu, 1).unwrap();
        assert_eq!(journal.take(), vec!["deactivate 1", "activate 1"]);
    }

    #[test]
    fn out_of_range_index_keeps_current_example() {
        let journal = Journal::default();
        let gpu = RecordingGpu::new(journal.clone());
        let mut sw = switcher(&journal, 3);
        sw.select(&gpu, 1).unwrap();
        journal.take();

        for bad in [-1, 3, 42, i64::from(i32::MIN)] {
            let err = sw.select(&gpu, bad).unwrap_err();
            assert_eq!(err, CanvasError::InvalidIndex { index: bad, count: 3 });
        }
        assert_eq!(sw.active_index(), Some(1));
        assert!(journal.take().is_empty());
    }

    #[test]
    fn failed_setup_skips_until_next_switch() {
        let journal = Journal::default();
        let gpu = RecordingGpu::new(journal.clone());
        let mut registry = ExampleRegistry::new()
            .register(RecordingExample::new(0, journal.clone()))
            .register(RecordingExample::failing(1, journal.clone()));
        registry = registry.register(RecordingExample::new(2, journal.clone()));
        let mut sw = Switcher::new(registry, 0).unwrap();

        let err = sw.select(&gpu, 1).unwrap_err();
        assert!(matches!(err, CanvasError::ExampleSetup { name: "recording-1", .. }));
        assert_eq!(sw.state(), SwitchState::Failed(1));
        assert!(sw.resolve(&gpu).is_none());

        sw.select(&gpu, 2).unwrap();
        assert_eq!(
            journal.take(),
            vec!["activate 1", "deactivate 1", "deactivate 1", "activate 2"]
        );
        assert_eq!(sw.active_index(), Some(2));
    }

    #[test]
    fn empty_registry_or_bad_default_is_configuration_error() {
        let journal = Journal::default();
        let empty = ExampleRegistry::<RecordingGpu>::new();
        assert!(Switcher::new(empty, 0).err().unwrap().is_fatal());

        let one = ExampleRegistry::new().register(RecordingExample::new(0, journal));
        assert!(Switcher::new(one, 1).err().unwrap().is_fatal());
    }

    #[test]
    fn drop_deactivates_active_example() {
        let journal = Journal::default();
        let gpu = RecordingGpu::new(journal.clone());
        let mut sw = switcher(&journal, 2);
        sw.resolve(&gpu);
        drop(sw);
        assert_eq!(journal.take(), vec!["activate 0", "deactivate 0"]);
    }
}
