/// Lifecycle signal delivered from a canvas back to its host.
///
/// Purely informational. The integer codes are part of the host contract.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CanvasEvent {
    CanvasCreated,
    FrameEntered,
}

impl CanvasEvent {
    #[inline]
    pub const fn code(self) -> i32 {
        match self {
            CanvasEvent::CanvasCreated => 0,
            CanvasEvent::FrameEntered => 1,
        }
    }

    /// Inverse of [`code`](Self::code). Reserved codes map to `None`.
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(CanvasEvent::CanvasCreated),
            1 => Some(CanvasEvent::FrameEntered),
            _ => None,
        }
    }
}

/// Receiver of canvas events, registered per canvas instance.
///
/// The thread an event is emitted on is whatever thread drove the canvas call;
/// hosts re-marshal onto their UI context if they need to.
pub trait EventSink: Send {
    fn emit(&self, event: CanvasEvent);
}

impl<F> EventSink for F
where
    F: Fn(CanvasEvent) + Send,
{
    fn emit(&self, event: CanvasEvent) {
        self(event)
    }
}

/// Sink that drops every event.
#[derive(Debug, Default, Copy, Clone)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: CanvasEvent) {}
}
