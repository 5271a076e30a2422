use std::time::Duration;

use time::OffsetDateTime;

use crate::ports;

mod fcm;
mod firestore;

pub use fcm::{FcmError, FcmPushSender};
pub use firestore::{FirestoreError, FirestoreStore};

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimeProvider;

impl ports::TimeProvider for TokioTimeProvider {
    type Sleep<'a>
        = tokio::time::Sleep
    where
        Self: 'a;

    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }

    fn sleep<'a>(&'a self, duration: Duration) -> Self::Sleep<'a> {
        tokio::time::sleep(duration)
    }
}
