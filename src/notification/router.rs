//! Maps notification intents onto delivery calls.
//!
//! - admin announcement: topic `admin_announcements`
//! - promotion: topic `promotions`, with `promoCode` and `route=/store`
//! - fortune ready: device token, title derived from the fortune type
//! - user notification: device token
//! - test: device token if supplied, else topic `all_users`

use std::collections::BTreeMap;

use super::{
    DeliveryResult, NotificationDelivery, NotificationIntent, NotificationKind, PushNotification,
    Target,
};

pub const ADMIN_TOPIC: &str = "admin_announcements";
pub const PROMOTION_TOPIC: &str = "promotions";
pub const BROADCAST_TOPIC: &str = "all_users";

/// Action the mobile client uses to open the app from a notification
pub const PLATFORM_OPEN_ACTION: &str = "FLUTTER_NOTIFICATION_CLICK";

pub const FORTUNE_READY_BODY: &str = "Falınız yorumlandı! Hemen görmek için tıklayın.";
pub const TEST_TITLE: &str = "🧪 Test Bildirimi";
pub const TEST_BODY: &str = "Bildirim sistemi çalışıyor!";

const DEFAULT_FORTUNE_TYPE: &str = "general";
const DEFAULT_FORTUNE_ID: &str = "unknown";

/// Title announcing a finished reading of `fortune_type`.
///
/// Matching is case-insensitive; unknown or absent types get the generic title.
pub fn fortune_title(fortune_type: Option<&str>) -> &'static str {
    let normalized = fortune_type.map(str::to_lowercase);

    match normalized.as_deref() {
        Some("kahve") | Some("coffee") => "☕ Kahve Falınız Hazır!",
        Some("ask") | Some("love") => "💕 Aşk Falınız Hazır!",
        Some("gunluk") | Some("daily") => "📅 Günlük Falınız Hazır!",
        Some("genel") | Some("general") => "🔮 Genel Falınız Hazır!",
        Some("tarot") => "🃏 Tarot Falınız Hazır!",
        Some("numerology") => "🔢 Numeroloji Falınız Hazır!",
        Some(_) | None => "🔮 Falınız Hazır!",
    }
}

/// A fully resolved send: where to and what
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryPlan {
    pub target: Target,
    pub notification: PushNotification,
}

fn fixed_fields<const N: usize>(entries: [(&str, String); N]) -> BTreeMap<String, String> {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// Resolve the target, text and metadata for an intent
pub fn plan(intent: &NotificationIntent) -> DeliveryPlan {
    let text = |value: &Option<String>| value.clone().unwrap_or_default();
    let kind_type = intent.kind.as_str().to_string();

    let (target, title, body, metadata) = match intent.kind {
        NotificationKind::AdminAnnouncement => (
            Target::Topic(ADMIN_TOPIC.to_string()),
            text(&intent.title),
            text(&intent.body),
            fixed_fields([("type", kind_type)]),
        ),
        NotificationKind::Promotion => (
            Target::Topic(PROMOTION_TOPIC.to_string()),
            text(&intent.title),
            text(&intent.body),
            fixed_fields([
                ("type", kind_type),
                ("promoCode", text(&intent.promo_code)),
                ("route", "/store".to_string()),
            ]),
        ),
        NotificationKind::FortuneReady => (
            Target::Token(text(&intent.recipient)),
            fortune_title(intent.fortune_type.as_deref()).to_string(),
            FORTUNE_READY_BODY.to_string(),
            fixed_fields([
                ("type", kind_type),
                (
                    "fortuneType",
                    intent
                        .fortune_type
                        .clone()
                        .unwrap_or_else(|| DEFAULT_FORTUNE_TYPE.to_string()),
                ),
                (
                    "fortuneId",
                    intent
                        .fortune_id
                        .clone()
                        .unwrap_or_else(|| DEFAULT_FORTUNE_ID.to_string()),
                ),
                ("route", "/fortune_detail".to_string()),
            ]),
        ),
        NotificationKind::UserNotification => (
            Target::Token(text(&intent.recipient)),
            text(&intent.title),
            text(&intent.body),
            fixed_fields([("type", kind_type)]),
        ),
        NotificationKind::Test => (
            match &intent.recipient {
                Some(token) => Target::Token(token.clone()),
                None => Target::Topic(BROADCAST_TOPIC.to_string()),
            },
            TEST_TITLE.to_string(),
            TEST_BODY.to_string(),
            fixed_fields([("type", kind_type)]),
        ),
    };

    DeliveryPlan {
        target,
        notification: PushNotification {
            title,
            body,
            image_url: intent.image_url.clone(),
            metadata,
            click_action: PLATFORM_OPEN_ACTION.to_string(),
            extra_data: intent.extra_data.clone(),
        },
    }
}

/// Routes validated intents to the delivery layer
#[derive(Clone)]
pub struct IntentRouter {
    delivery: NotificationDelivery,
}

impl IntentRouter {
    pub fn new(delivery: NotificationDelivery) -> Self {
        Self { delivery }
    }

    pub fn delivery(&self) -> &NotificationDelivery {
        &self.delivery
    }

    /// Plan and deliver one intent
    #[tracing::instrument(name = "router.dispatch", skip(self, intent), fields(kind = %intent.kind))]
    pub async fn dispatch(&self, intent: &NotificationIntent) -> DeliveryResult {
        let DeliveryPlan {
            target,
            notification,
        } = plan(intent);

        tracing::info!(
            target_descriptor = %target.descriptor(),
            title = %notification.title,
            "Dispatching notification"
        );

        self.delivery.deliver(target, &notification).await
    }
}
