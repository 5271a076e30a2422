use crate::types::push::{MulticastReport, PushMessage};

/// Multicast push gateway. One call delivers the same message to every token
/// and yields a per-token report.
pub trait PushSender: Clone + Send + Sync + 'static {
    type Error: std::fmt::Display + Send + Sync + 'static;
    type Fut<'a>: Future<Output = Result<MulticastReport, Self::Error>> + Send + 'a
    where
        Self: 'a;

    fn send_multicast<'a>(
        &'a self,
        message: &'a PushMessage,
        tokens: &'a [String],
    ) -> Self::Fut<'a>;
}
