use time::{Time, UtcOffset};

#[derive(Clone)]
pub struct AppConfig {
    pub allowed_origins: Vec<String>,
    pub schedule: NotifySchedule,
    pub fcm: FcmConfig,
    pub firestore: FirestoreConfig,
}

/// Local time of day at which the daily notification pass runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotifySchedule {
    pub at: Time,
    pub utc_offset: UtcOffset,
}

#[derive(Debug, Clone)]
pub struct FcmConfig {
    pub endpoint: String,
    pub server_key: String,
}

#[derive(Debug, Clone)]
pub struct FirestoreConfig {
    pub endpoint: String,
    pub project_id: String,
    pub auth_token: Option<String>,
}

#[cfg(test)]
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            schedule: NotifySchedule {
                at: Time::from_hms(8, 0, 0).expect("valid time"),
                utc_offset: UtcOffset::from_hms(9, 0, 0).expect("valid offset"),
            },
            fcm: FcmConfig {
                endpoint: "http://fcm.invalid/send".to_string(),
                server_key: "test-key".to_string(),
            },
            firestore: FirestoreConfig {
                endpoint: "http://firestore.invalid/v1".to_string(),
                project_id: "test-project".to_string(),
                auth_token: None,
            },
        }
    }
}
