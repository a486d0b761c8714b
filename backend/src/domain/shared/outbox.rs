//! Per-aggregate list of domain events awaiting publication.

/// Events recorded by an aggregate until the use case drains them.
///
/// The outbox is never persisted; a use case drains it after a successful
/// save and hands the events to the publisher port.
///
/// # Examples
/// ```
/// use atelier::domain::Outbox;
///
/// let mut outbox = Outbox::default();
/// outbox.record("scheduled");
/// assert_eq!(outbox.pending(), ["scheduled"]);
/// assert_eq!(outbox.drain(), vec!["scheduled"]);
/// assert!(outbox.pending().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbox<E> {
    events: Vec<E>,
}

impl<E> Default for Outbox<E> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<E> Outbox<E> {
    /// Append an event.
    pub fn record(&mut self, event: E) {
        self.events.push(event);
    }

    /// Events not yet drained.
    pub fn pending(&self) -> &[E] {
        &self.events
    }

    /// Take every pending event, leaving the outbox empty.
    pub fn drain(&mut self) -> Vec<E> {
        std::mem::take(&mut self.events)
    }
}
