use crate::ports::{EventStore, PushSender};
use crate::types::push::{DispatchResult, PushMessage};

use thiserror::Error;

mod scheduler;

pub(crate) use scheduler::{SchedulerHandle, start_scheduler};

#[derive(Debug, Error)]
#[error("failed to retrieve subscribers: {0}")]
pub struct SubscriberLookupError(String);

/// Performs one multicast push send and normalizes the outcome. The gateway
/// is contacted exactly once per call; per-token failures inside a successful
/// call are reported back but not inspected here. An empty token list
/// short-circuits without touching the gateway.
pub async fn dispatch<S: PushSender>(
    sender: &S,
    message: &PushMessage,
    tokens: &[String],
) -> DispatchResult {
    if tokens.is_empty() {
        return DispatchResult::failed("no delivery tokens to send to");
    }

    match sender.send_multicast(message, tokens).await {
        Ok(report) => {
            tracing::info!(
                title = %message.title,
                tokens = tokens.len(),
                delivered = report.success,
                failed = report.failure,
                "push notification sent"
            );
            DispatchResult::delivered(report)
        }
        Err(err) => {
            tracing::error!(title = %message.title, error = %err, "push notification failed");
            DispatchResult::failed(err.to_string())
        }
    }
}

/// Maps an event id to the delivery tokens of its subscribers. Users without
/// a usable token are dropped; store failures are wrapped and propagated.
pub async fn resolve_subscriber_tokens<D: EventStore>(
    store: &D,
    event_id: &str,
) -> Result<Vec<String>, SubscriberLookupError> {
    let subscribers = store
        .subscribers(event_id)
        .await
        .map_err(|err| SubscriberLookupError(err.to_string()))?;

    Ok(subscribers
        .into_iter()
        .filter_map(|subscriber| subscriber.token)
        .filter(|token| !token.trim().is_empty())
        .collect())
}
