use snvec_core::{FinalStateEvent, SnError};

/// Consumer of finished events.
///
/// Events arrive in emission-time order. `finish` is called once after the
/// last event.
pub trait EventSink {
    /// Takes ownership of one event.
    fn accept(&mut self, event: FinalStateEvent) -> Result<(), SnError>;

    /// Flushes anything still buffered.
    fn finish(&mut self) -> Result<(), SnError> {
        Ok(())
    }
}

/// Sink that keeps every event in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VecSink {
    /// Collected events.
    pub events: Vec<FinalStateEvent>,
    /// Whether `finish` has been called.
    pub finished: bool,
}

impl VecSink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventSink for VecSink {
    fn accept(&mut self, event: FinalStateEvent) -> Result<(), SnError> {
        self.events.push(event);
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SnError> {
        self.finished = true;
        Ok(())
    }
}
