use bevy::prelude::*;

/// Identity handed out by [`EventChannel::subscribe`]; required to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

type BoxedHandler<E> = Box<dyn FnMut(&E, &mut World) + Send + Sync>;

/// Decoupled publish/subscribe channel.
///
/// An explicit observer registry: subscriber identity mapped to callback,
/// delivered synchronously in subscription order on the publishing context.
/// There is no buffering; publishing with zero subscribers logs a warning and
/// drops the event.
pub struct EventChannel<E> {
    label: &'static str,
    next_id: u64,
    subscribers: Vec<(SubscriberId, &'static str, BoxedHandler<E>)>,
}

impl<E> EventChannel<E> {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            next_id: 0,
            subscribers: Vec::new(),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn subscribe(
        &mut self,
        name: &'static str,
        handler: impl FnMut(&E, &mut World) + Send + Sync + 'static,
    ) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, name, Box::new(handler)));
        debug!(target: "events", "'{}' subscribed to channel '{}'", name, self.label);
        id
    }

    /// Returns false if the id was never subscribed (or already removed).
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _, _)| *sid != id);
        before != self.subscribers.len()
    }

    /// Invoke every subscriber in subscription order. With no subscribers the
    /// event is lost; that is diagnosed but not an error.
    pub fn publish(&mut self, event: &E, world: &mut World) {
        if self.subscribers.is_empty() {
            warn!(
                target: "events",
                "event published on channel '{}', but nobody picked it up; \
                 check that a listener is registered before publishing",
                self.label
            );
            return;
        }
        for (_, _, handler) in self.subscribers.iter_mut() {
            handler(event, world);
        }
    }
}
