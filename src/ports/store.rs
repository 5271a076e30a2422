use crate::types::events::{Event, Subscriber};

/// Read-only view of the document store: a full scan of tracked events and an
/// array-containment lookup of the users subscribed to one event.
pub trait EventStore: Clone + Send + Sync + 'static {
    type Error: std::fmt::Display + Send + Sync + 'static;
    type EventsFut<'a>: Future<Output = Result<Vec<Event>, Self::Error>> + Send + 'a
    where
        Self: 'a;
    type SubscribersFut<'a>: Future<Output = Result<Vec<Subscriber>, Self::Error>> + Send + 'a
    where
        Self: 'a;

    fn events<'a>(&'a self) -> Self::EventsFut<'a>;
    fn subscribers<'a>(&'a self, event_id: &'a str) -> Self::SubscribersFut<'a>;
}
