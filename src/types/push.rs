use serde::{Deserialize, Serialize};

/// Content of one push notification, shared by both entry points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushMessage {
    pub title: String,
    pub body: String,
    pub icon: Option<String>,
}

/// Per-token delivery report returned by the push gateway for one multicast
/// call. Individual token failures are reported here but not acted upon.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MulticastReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multicast_id: Option<i64>,
    #[serde(default)]
    pub success: u32,
    #[serde(default)]
    pub failure: u32,
    #[serde(default)]
    pub results: Vec<SendResult>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Normalized outcome of one dispatch. Serialized verbatim as the HTTP
/// response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<MulticastReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DispatchResult {
    pub fn delivered(report: MulticastReport) -> Self {
        Self {
            success: true,
            response: Some(report),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            response: None,
            error: Some(error.into()),
        }
    }
}
