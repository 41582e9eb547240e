//! Notification intents, validation, routing and delivery.
//!
//! A request flows through these pieces in order:
//!
//! - `validation`: checks the raw payload for the requested kind and builds a
//!   `NotificationIntent`
//! - `router`: resolves the intent's target, title/body and metadata
//! - `delivery`: builds the `MessageEnvelope`, makes one gateway call and
//!   normalizes the outcome into a `DeliveryResult`

mod delivery;
mod router;
mod types;
pub mod validation;

pub use delivery::NotificationDelivery;
pub use router::{
    fortune_title, plan, DeliveryPlan, IntentRouter, ADMIN_TOPIC, BROADCAST_TOPIC,
    FORTUNE_READY_BODY, PLATFORM_OPEN_ACTION, PROMOTION_TOPIC, TEST_BODY, TEST_TITLE,
};
pub use types::{
    redact_token, AndroidHints, ApnsHints, DeliveryHints, DeliveryResult, MessageEnvelope,
    NotificationBlock, NotificationIntent, NotificationKind, PushNotification, RecipientOutcome,
    Target, CLICK_ACTION_KEY, TIMESTAMP_KEY,
};
pub use validation::{parse_payload, validate, FieldRule, FieldRules, ValidationError};
