use crate::config::FcmConfig;
use crate::ports::PushSender;
use crate::types::push::{MulticastReport, PushMessage};

use std::pin::Pin;
use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use serde_json::{Value, json};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FcmError {
    #[error("push gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("push gateway returned status {0}")]
    Status(u16),
}

/// FCM legacy multicast client. One POST carries the whole token list and the
/// response enumerates per-token outcomes.
#[derive(Clone)]
pub struct FcmPushSender {
    config: FcmConfig,
    client: reqwest::Client,
}

impl FcmPushSender {
    pub fn new(config: FcmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { config, client })
    }
}

impl PushSender for FcmPushSender {
    type Error = FcmError;
    type Fut<'a>
        = Pin<Box<dyn Future<Output = Result<MulticastReport, Self::Error>> + Send + 'a>>
    where
        Self: 'a;

    fn send_multicast<'a>(
        &'a self,
        message: &'a PushMessage,
        tokens: &'a [String],
    ) -> Self::Fut<'a> {
        Box::pin(async move {
            let response = self
                .client
                .post(&self.config.endpoint)
                .header(AUTHORIZATION, format!("key={}", self.config.server_key))
                .json(&build_payload(message, tokens))
                .send()
                .await?;
            let status = response.status();
            if !status.is_success() {
                return Err(FcmError::Status(status.as_u16()));
            }
            Ok(response.json::<MulticastReport>().await?)
        })
    }
}

fn build_payload(message: &PushMessage, tokens: &[String]) -> Value {
    let mut data = json!({
        "title": message.title,
        "body": message.body,
    });
    if let Some(icon) = &message.icon {
        data["icon"] = json!(icon);
    }
    json!({
        "registration_ids": tokens,
        "data": data,
    })
}
