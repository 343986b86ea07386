use crate::frame::Frame;

/// An event stamped with the frame it was emitted on.
#[derive(Debug, Clone, PartialEq)]
pub struct Stamped<E> {
    pub frame_index: u64,
    pub event: E,
}

/// Drain-style event bus.
///
/// Producers emit during a frame; the owner drains once per frame and hands
/// the batch to whoever consumes it. Events are delivered in emission order.
#[derive(Debug)]
pub struct EventBus<E> {
    events: Vec<Stamped<E>>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, frame: Frame, event: E) {
        self.events.push(Stamped {
            frame_index: frame.index,
            event,
        });
    }

    pub fn events(&self) -> &[Stamped<E>] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<Stamped<E>> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::EventBus;
    use crate::frame::Frame;

    #[derive(Debug, Clone, PartialEq)]
    enum TestEvent {
        Ping,
        Pong,
    }

    #[test]
    fn records_events_with_frame_index() {
        let mut bus = EventBus::new();
        bus.emit(Frame::new(2, 0.1), TestEvent::Ping);
        assert_eq!(bus.events().len(), 1);
        assert_eq!(bus.events()[0].frame_index, 2);
    }

    #[test]
    fn drain_clears_and_preserves_order() {
        let mut bus = EventBus::new();
        bus.emit(Frame::new(0, 1.0), TestEvent::Ping);
        bus.emit(Frame::new(0, 1.0), TestEvent::Pong);
        let drained = bus.drain();
        assert_eq!(drained[0].event, TestEvent::Ping);
        assert_eq!(drained[1].event, TestEvent::Pong);
        assert!(bus.events().is_empty());
    }
}
