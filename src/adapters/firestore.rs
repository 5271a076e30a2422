use crate::config::FirestoreConfig;
use crate::ports::EventStore;
use crate::types::events::{Event, Subscriber};

use std::pin::Pin;
use std::time::Duration;

use serde_json::{Value, json};
use thiserror::Error;
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, UtcOffset};

const PLAIN_DATE: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

#[derive(Debug, Error)]
pub enum FirestoreError {
    #[error("document store request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("document store returned status {0}")]
    Status(u16),
}

/// Firestore REST client covering the two reads this service needs: a full
/// scan of the `marathons` collection and an array-containment query against
/// the `users` collection.
#[derive(Clone)]
pub struct FirestoreStore {
    config: FirestoreConfig,
    utc_offset: UtcOffset,
    client: reqwest::Client,
}

impl FirestoreStore {
    pub fn new(config: FirestoreConfig, utc_offset: UtcOffset) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            config,
            utc_offset,
            client,
        })
    }

    async fn run_query(&self, query: Value) -> Result<Vec<(String, Value)>, FirestoreError> {
        let url = format!(
            "{}/projects/{}/databases/(default)/documents:runQuery",
            self.config.endpoint, self.config.project_id
        );
        let mut request = self
            .client
            .post(&url)
            .json(&json!({ "structuredQuery": query }));
        if let Some(token) = &self.config.auth_token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FirestoreError::Status(status.as_u16()));
        }
        let rows = response.json::<Vec<Value>>().await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let document = row.get("document")?;
                let id = document
                    .get("name")?
                    .as_str()?
                    .rsplit('/')
                    .next()?
                    .to_string();
                let fields = document.get("fields").cloned().unwrap_or_else(|| json!({}));
                Some((id, fields))
            })
            .collect())
    }
}

impl EventStore for FirestoreStore {
    type Error = FirestoreError;
    type EventsFut<'a>
        = Pin<Box<dyn Future<Output = Result<Vec<Event>, Self::Error>> + Send + 'a>>
    where
        Self: 'a;
    type SubscribersFut<'a>
        = Pin<Box<dyn Future<Output = Result<Vec<Subscriber>, Self::Error>> + Send + 'a>>
    where
        Self: 'a;

    fn events<'a>(&'a self) -> Self::EventsFut<'a> {
        Box::pin(async move {
            let rows = self
                .run_query(json!({ "from": [{ "collectionId": "marathons" }] }))
                .await?;
            Ok(rows
                .iter()
                .filter_map(|(id, fields)| {
                    let event = parse_event(id, fields, self.utc_offset);
                    if event.is_none() {
                        tracing::warn!(document = %id, "skipping malformed marathon document");
                    }
                    event
                })
                .collect())
        })
    }

    fn subscribers<'a>(&'a self, event_id: &'a str) -> Self::SubscribersFut<'a> {
        Box::pin(async move {
            let rows = self
                .run_query(json!({
                    "from": [{ "collectionId": "users" }],
                    "where": {
                        "fieldFilter": {
                            "field": { "fieldPath": "marathons" },
                            "op": "ARRAY_CONTAINS",
                            "value": { "stringValue": event_id },
                        }
                    }
                }))
                .await?;
            Ok(rows
                .into_iter()
                .map(|(id, fields)| Subscriber {
                    id,
                    token: string_field(&fields, "token"),
                })
                .collect())
        })
    }
}

fn parse_event(id: &str, fields: &Value, offset: UtcOffset) -> Option<Event> {
    let name = string_field(fields, "name")?;
    let date = parse_date(fields.get("date")?, offset)?;
    let registration_start = parse_date(
        fields
            .get("registrationPeriod")?
            .get("mapValue")?
            .get("fields")?
            .get("startDate")?,
        offset,
    )?;
    Some(Event {
        id: id.to_string(),
        name,
        date,
        registration_start,
    })
}

fn string_field(fields: &Value, key: &str) -> Option<String> {
    fields
        .get(key)?
        .get("stringValue")?
        .as_str()
        .map(str::to_string)
}

/// Dates arrive either as Firestore timestamps (RFC 3339) or as plain
/// strings; timestamps are projected onto a calendar date in the configured
/// offset.
fn parse_date(value: &Value, offset: UtcOffset) -> Option<Date> {
    if let Some(raw) = value.get("timestampValue").and_then(Value::as_str) {
        return OffsetDateTime::parse(raw, &Rfc3339)
            .ok()
            .map(|timestamp| timestamp.to_offset(offset).date());
    }
    let raw = value.get("stringValue")?.as_str()?;
    if let Ok(date) = Date::parse(raw, PLAIN_DATE) {
        return Some(date);
    }
    OffsetDateTime::parse(raw, &Rfc3339)
        .ok()
        .map(|timestamp| timestamp.to_offset(offset).date())
}
