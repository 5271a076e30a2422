use std::time::Duration;

use time::OffsetDateTime;

/// Clock and timer source for the daily scheduler. Swapped for a manual
/// clock in tests so trigger dates and sleep targets are deterministic.
pub trait TimeProvider: Clone + Send + Sync + 'static {
    type Sleep<'a>: Future<Output = ()> + Send + 'a
    where
        Self: 'a;

    fn now(&self) -> OffsetDateTime;
    fn sleep<'a>(&'a self, duration: Duration) -> Self::Sleep<'a>;
}
