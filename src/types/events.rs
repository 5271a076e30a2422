use time::Date;

/// A marathon event as read from the document store. Created and mutated
/// elsewhere; this service only reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: String,
    pub name: String,
    /// The day the race takes place.
    pub date: Date,
    /// The day the registration window opens.
    pub registration_start: Date,
}

/// A user who may be subscribed to events. Only the delivery token is
/// consumed; a user without a token is skipped during resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscriber {
    pub id: String,
    pub token: Option<String>,
}
