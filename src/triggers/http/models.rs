//! Success payloads returned by the notification endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Success envelope shared by every notification endpoint
#[derive(Debug, Serialize)]
pub struct NotificationResponse<T> {
    pub success: bool,
    pub message: &'static str,
    pub data: T,
}

impl<T> NotificationResponse<T> {
    pub fn sent(message: &'static str, data: T) -> Self {
        Self {
            success: true,
            message,
            data,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminAnnouncementData {
    pub message_id: String,
    pub topic: &'static str,
    pub title: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionData {
    pub message_id: String,
    pub topic: &'static str,
    /// Echoed as supplied; `null` when absent
    pub promo_code: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FortuneReadyData {
    pub message_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fortune_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fortune_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserNotificationData {
    pub message_id: String,
    pub title: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestNotificationData {
    pub message_id: String,
    /// "all_users" for the broadcast topic, "specific_token" for a device
    pub target: &'static str,
    pub timestamp: DateTime<Utc>,
}
