//! Mock event source for unit and integration testing.
//!
//! Channel-backed: tests hold an [`EventInjector`] and feed the dispatcher
//! synthetic events as if they came from a grabbed device. Dropping the
//! injector closes the stream, which is how tests end the dispatcher's
//! run loop.

use std::sync::mpsc::{self, Receiver, Sender};

use super::{EventSource, RawEvent, RawEventKind, StreamError, StreamPoll};

/// A scripted [`EventSource`] fed through a channel.
pub struct MockEventSource {
    rx: Receiver<StreamPoll>,
}

/// The sending half handed to the test.
#[derive(Clone)]
pub struct EventInjector {
    tx: Sender<StreamPoll>,
}

impl MockEventSource {
    /// Creates a connected source/injector pair.
    pub fn pair() -> (Self, EventInjector) {
        let (tx, rx) = mpsc::channel();
        (Self { rx }, EventInjector { tx })
    }
}

impl EventInjector {
    /// Injects a raw key transition (value 1 = down, 0 = up, 2 = repeat).
    pub fn key(&self, code: u16, value: i32) {
        self.inject(StreamPoll::Event(RawEvent {
            kind: RawEventKind::Key,
            code,
            value,
        }));
    }

    /// Injects a non-key event the dispatcher must ignore.
    pub fn non_key(&self, kind: RawEventKind, code: u16, value: i32) {
        self.inject(StreamPoll::Event(RawEvent { kind, code, value }));
    }

    /// Injects an empty poll.
    pub fn would_block(&self) {
        self.inject(StreamPoll::WouldBlock);
    }

    /// Injects an explicit end-of-stream marker.
    pub fn close(&self) {
        self.inject(StreamPoll::Closed);
    }

    fn inject(&self, poll: StreamPoll) {
        self.tx
            .send(poll)
            .expect("mock event source has been dropped");
    }
}

impl EventSource for MockEventSource {
    fn next_event(&mut self) -> Result<StreamPoll, StreamError> {
        // Blocks like the real device; a dropped injector ends the stream.
        match self.rx.recv() {
            Ok(poll) => Ok(poll),
            Err(_) => Ok(StreamPoll::Closed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_injected_events_arrive_in_order() {
        // Arrange
        let (mut source, injector) = MockEventSource::pair();

        // Act
        injector.key(77, 1);
        injector.would_block();
        injector.key(77, 0);

        // Assert
        assert_eq!(
            source.next_event().unwrap(),
            StreamPoll::Event(RawEvent {
                kind: RawEventKind::Key,
                code: 77,
                value: 1
            })
        );
        assert_eq!(source.next_event().unwrap(), StreamPoll::WouldBlock);
        assert_eq!(
            source.next_event().unwrap(),
            StreamPoll::Event(RawEvent {
                kind: RawEventKind::Key,
                code: 77,
                value: 0
            })
        );
    }

    #[test]
    fn test_dropping_the_injector_closes_the_stream() {
        // Arrange
        let (mut source, injector) = MockEventSource::pair();
        injector.key(82, 1);
        drop(injector);

        // Act / Assert
        assert!(matches!(source.next_event().unwrap(), StreamPoll::Event(_)));
        assert_eq!(source.next_event().unwrap(), StreamPoll::Closed);
    }
}
