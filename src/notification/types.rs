use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Kind of notification a caller can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    AdminAnnouncement,
    Promotion,
    FortuneReady,
    UserNotification,
    Test,
}

impl NotificationKind {
    /// Label used in metrics and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::AdminAnnouncement => "admin_announcement",
            NotificationKind::Promotion => "promotion",
            NotificationKind::FortuneReady => "fortune_ready",
            NotificationKind::UserNotification => "user_notification",
            NotificationKind::Test => "test",
        }
    }

    /// Noun used in client-facing failure messages
    pub fn description(&self) -> &'static str {
        match self {
            NotificationKind::AdminAnnouncement => "admin announcement",
            NotificationKind::Promotion => "promotion notification",
            NotificationKind::FortuneReady => "fortune ready notification",
            NotificationKind::UserNotification => "user notification",
            NotificationKind::Test => "test notification",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated request to deliver a notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationIntent {
    pub kind: NotificationKind,
    pub title: Option<String>,
    pub body: Option<String>,
    /// Device token, when the kind addresses a single device
    pub recipient: Option<String>,
    pub image_url: Option<String>,
    /// Caller-supplied data merged into the provider payload
    pub extra_data: BTreeMap<String, String>,
    pub promo_code: Option<String>,
    pub fortune_type: Option<String>,
    pub fortune_id: Option<String>,
}

impl NotificationIntent {
    pub fn new(kind: NotificationKind) -> Self {
        Self {
            kind,
            title: None,
            body: None,
            recipient: None,
            image_url: None,
            extra_data: BTreeMap::new(),
            promo_code: None,
            fortune_type: None,
            fortune_id: None,
        }
    }
}

/// Where a message is addressed. Exactly one addressing mode per envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Topic(String),
    Token(String),
    Tokens(Vec<String>),
}

impl Target {
    /// Descriptor safe for logs and responses
    pub fn descriptor(&self) -> String {
        match self {
            Target::Topic(topic) => topic.clone(),
            Target::Token(token) => redact_token(token),
            Target::Tokens(tokens) => format!("{} tokens", tokens.len()),
        }
    }
}

/// Number of token characters kept in descriptors
const TOKEN_VISIBLE_CHARS: usize = 20;

/// Truncate a device token to its first 20 characters plus an ellipsis
pub fn redact_token(token: &str) -> String {
    let visible: String = token.chars().take(TOKEN_VISIBLE_CHARS).collect();
    format!("{}...", visible)
}

/// Notification content, before it is addressed and stamped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushNotification {
    pub title: String,
    pub body: String,
    pub image_url: Option<String>,
    /// Fixed kind-specific fields (type, route, ...)
    pub metadata: BTreeMap<String, String>,
    /// Platform action; never overridable by caller data
    pub click_action: String,
    pub extra_data: BTreeMap<String, String>,
}

impl PushNotification {
    /// Data block without the delivery timestamp.
    ///
    /// Fixed metadata first, caller data overlaid, then `click_action`.
    pub fn data_block(&self) -> BTreeMap<String, String> {
        let mut data = self.metadata.clone();
        data.extend(self.extra_data.clone());
        data.insert(CLICK_ACTION_KEY.to_string(), self.click_action.clone());
        data
    }
}

pub const CLICK_ACTION_KEY: &str = "click_action";
pub const TIMESTAMP_KEY: &str = "timestamp";

/// Visible notification block of an envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationBlock {
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AndroidHints {
    pub priority: String,
    pub sound: String,
    pub channel_id: String,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApnsHints {
    pub sound: String,
    pub badge: u32,
    /// Explicit alert, repeated from the notification block on topic sends
    pub alert: Option<NotificationBlock>,
}

/// Platform-specific delivery hints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryHints {
    pub android: AndroidHints,
    pub apns: Option<ApnsHints>,
}

impl DeliveryHints {
    fn android(icon: Option<&str>) -> AndroidHints {
        AndroidHints {
            priority: "high".to_string(),
            sound: "default".to_string(),
            channel_id: "default_channel".to_string(),
            icon: icon.map(str::to_string),
        }
    }

    /// Hints for a given addressing mode
    pub fn for_target(target: &Target, notification: &NotificationBlock) -> Self {
        match target {
            Target::Topic(_) => Self {
                android: Self::android(Some("@mipmap/ic_launcher")),
                apns: Some(ApnsHints {
                    sound: "default".to_string(),
                    badge: 1,
                    alert: Some(NotificationBlock {
                        image: None,
                        ..notification.clone()
                    }),
                }),
            },
            Target::Token(_) => Self {
                android: Self::android(None),
                apns: Some(ApnsHints {
                    sound: "default".to_string(),
                    badge: 1,
                    alert: None,
                }),
            },
            Target::Tokens(_) => Self {
                android: Self::android(None),
                apns: None,
            },
        }
    }
}

/// Provider-facing message, built fresh for each send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEnvelope {
    target: Target,
    notification: NotificationBlock,
    data: BTreeMap<String, String>,
    hints: DeliveryHints,
}

impl MessageEnvelope {
    /// Address a notification and stamp its data block with `timestamp_ms`
    pub fn new(target: Target, notification: &PushNotification, timestamp_ms: i64) -> Self {
        let block = NotificationBlock {
            title: notification.title.clone(),
            body: notification.body.clone(),
            image: notification.image_url.clone(),
        };

        let mut data = notification.data_block();
        data.insert(TIMESTAMP_KEY.to_string(), timestamp_ms.to_string());

        let hints = DeliveryHints::for_target(&target, &block);

        Self {
            target,
            notification: block,
            data,
            hints,
        }
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn notification(&self) -> &NotificationBlock {
        &self.notification
    }

    pub fn data(&self) -> &BTreeMap<String, String> {
        &self.data
    }

    pub fn hints(&self) -> &DeliveryHints {
        &self.hints
    }
}

/// Per-recipient result of a multi-token send
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipientOutcome {
    /// Redacted token
    pub token: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Normalized outcome of a send attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeliveryResult {
    #[serde(rename_all = "camelCase")]
    Success { message_id: String, target: String },
    #[serde(rename_all = "camelCase")]
    PartialSuccess {
        success_count: usize,
        failure_count: usize,
        outcomes: Vec<RecipientOutcome>,
    },
    #[serde(rename_all = "camelCase")]
    Failure { error_message: String },
}

impl DeliveryResult {
    pub fn is_success(&self) -> bool {
        !matches!(self, DeliveryResult::Failure { .. })
    }

    /// Label used in metrics
    pub fn outcome(&self) -> &'static str {
        match self {
            DeliveryResult::Success { .. } => "success",
            DeliveryResult::PartialSuccess { .. } => "partial",
            DeliveryResult::Failure { .. } => "failure",
        }
    }
}
