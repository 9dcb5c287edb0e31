use crate::device::GpuBackend;

use super::Example;

/// Ordered, closed set of examples.
///
/// Indices are assigned in registration order and never change once the registry
/// is handed to a canvas.
pub struct ExampleRegistry<G: GpuBackend> {
    examples: Vec<Box<dyn Example<G>>>,
}

impl<G: GpuBackend> ExampleRegistry<G> {
    pub fn new() -> Self {
        Self {
            examples: Vec::new(),
        }
    }

    /// Appends an example; its index is the previous `len()`.
    pub fn register<E>(mut self, example: E) -> Self
    where
        E: Example<G> + 'static,
    {
        self.examples.push(Box::new(example));
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Names in index order.
    pub fn names(&self) -> Vec<&'static str> {
        self.examples.iter().map(|e| e.name()).collect()
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut (dyn Example<G> + 'static)> {
        self.examples.get_mut(index).map(|e| e.as_mut())
    }
}

impl<G: GpuBackend> Default for ExampleRegistry<G> {
    fn default() -> Self {
        Self::new()
    }
}
