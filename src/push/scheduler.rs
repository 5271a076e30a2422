use crate::config::NotifySchedule;
use crate::ports::{EventStore, PushSender, TimeProvider};
use crate::push::{SubscriberLookupError, dispatch, resolve_subscriber_tokens};
use crate::types::events::Event;
use crate::types::push::PushMessage;

use std::time::Duration;

use thiserror::Error;
use time::{Date, PrimitiveDateTime};
use tokio::task::JoinHandle;

pub(crate) const REGISTRATION_OPEN_BODY: &str = "Registration opens today!";
pub(crate) const DAY_BEFORE_BODY: &str = "The race is tomorrow. Get ready!";

pub(crate) struct SchedulerHandle {
    handle: JoinHandle<()>,
}

impl SchedulerHandle {
    #[cfg(test)]
    pub(crate) fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Spawns the daily notification loop. The loop runs until the returned
/// handle is dropped.
pub(crate) fn start_scheduler<T, D, S>(
    time: T,
    store: D,
    sender: S,
    schedule: NotifySchedule,
) -> SchedulerHandle
where
    T: TimeProvider,
    D: EventStore,
    S: PushSender,
{
    let handle = tokio::spawn(run_scheduler(time, store, sender, schedule));
    SchedulerHandle { handle }
}

async fn run_scheduler<T, D, S>(time: T, store: D, sender: S, schedule: NotifySchedule)
where
    T: TimeProvider,
    D: EventStore,
    S: PushSender,
{
    loop {
        let delay = delay_until_next_run(&time, &schedule);
        time.sleep(delay).await;
        match run_daily_pass(&time, &store, &sender, &schedule).await {
            Ok(report) => {
                tracing::info!(
                    events = report.events_seen,
                    sent = report.notifications_sent,
                    failed = report.events_failed,
                    "daily notification pass complete"
                );
            }
            Err(err) => {
                tracing::error!(error = %err, "daily notification pass failed");
            }
        }
    }
}

fn delay_until_next_run<T: TimeProvider>(time: &T, schedule: &NotifySchedule) -> Duration {
    let now = time.now().to_offset(schedule.utc_offset);
    let today_run =
        PrimitiveDateTime::new(now.date(), schedule.at).assume_offset(schedule.utc_offset);
    let next_run = if now < today_run {
        today_run
    } else {
        match now.date().next_day() {
            Some(day) => PrimitiveDateTime::new(day, schedule.at).assume_offset(schedule.utc_offset),
            // Calendar overflow; unreachable for any realistic clock.
            None => today_run,
        }
    };
    (next_run - now).try_into().unwrap_or(Duration::ZERO)
}

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct DailyRunReport {
    pub(crate) events_seen: usize,
    pub(crate) notifications_sent: usize,
    pub(crate) events_failed: usize,
}

#[derive(Debug, Error)]
#[error("failed to scan events: {0}")]
pub(crate) struct EventScanError(String);

/// One scan-evaluate-dispatch cycle. "Today" and "tomorrow" are calendar
/// dates in the configured offset; events are compared by date equality, not
/// by formatted strings. A subscriber lookup failure only skips the affected
/// event; a failure of the scan itself fails the whole pass.
pub(crate) async fn run_daily_pass<T, D, S>(
    time: &T,
    store: &D,
    sender: &S,
    schedule: &NotifySchedule,
) -> Result<DailyRunReport, EventScanError>
where
    T: TimeProvider,
    D: EventStore,
    S: PushSender,
{
    let today = time.now().to_offset(schedule.utc_offset).date();
    let tomorrow = today.next_day().unwrap_or(today);

    let events = store
        .events()
        .await
        .map_err(|err| EventScanError(err.to_string()))?;

    let mut report = DailyRunReport {
        events_seen: events.len(),
        ..Default::default()
    };
    for event in &events {
        match notify_event(store, sender, event, today, tomorrow).await {
            Ok(sent) => report.notifications_sent += sent,
            Err(err) => {
                tracing::error!(event = %event.id, error = %err, "skipping event");
                report.events_failed += 1;
            }
        }
    }
    Ok(report)
}

async fn notify_event<D, S>(
    store: &D,
    sender: &S,
    event: &Event,
    today: Date,
    tomorrow: Date,
) -> Result<usize, SubscriberLookupError>
where
    D: EventStore,
    S: PushSender,
{
    let mut sent = 0;

    // Both triggers are evaluated independently; a same-day race can fire
    // both notifications in one pass.
    if event.registration_start == today {
        sent += notify_subscribers(store, sender, event, REGISTRATION_OPEN_BODY).await?;
    }
    if event.date == tomorrow {
        sent += notify_subscribers(store, sender, event, DAY_BEFORE_BODY).await?;
    }

    Ok(sent)
}

async fn notify_subscribers<D, S>(
    store: &D,
    sender: &S,
    event: &Event,
    body: &str,
) -> Result<usize, SubscriberLookupError>
where
    D: EventStore,
    S: PushSender,
{
    let tokens = resolve_subscriber_tokens(store, &event.id).await?;
    if tokens.is_empty() {
        return Ok(0);
    }

    let message = PushMessage {
        title: event.name.clone(),
        body: body.to_string(),
        icon: Some(event.name.clone()),
    };
    // Fire-and-forget: a gateway failure is logged by dispatch and does not
    // fail the event.
    let result = dispatch(sender, &message, &tokens).await;
    Ok(usize::from(result.success))
}
