//! HTTP notification handlers

use axum::{body::Bytes, extract::State, Json};
use chrono::Utc;

use crate::error::{AppError, Result};
use crate::metrics::{NotificationMetrics, ValidationMetrics};
use crate::notification::{
    parse_payload, validate, DeliveryResult, NotificationIntent, NotificationKind,
    ValidationError, ADMIN_TOPIC, PROMOTION_TOPIC,
};
use crate::server::AppState;

use super::models::{
    AdminAnnouncementData, FortuneReadyData, NotificationResponse, PromotionData,
    TestNotificationData, UserNotificationData,
};

/// A notification accepted by the gateway
struct Sent {
    intent: NotificationIntent,
    message_id: String,
}

fn reject(err: ValidationError) -> AppError {
    ValidationMetrics::record_failure(&err.field);
    err.into()
}

/// Validate the body for `kind`, route it and make the single gateway call
async fn send(state: &AppState, kind: NotificationKind, body: &[u8]) -> Result<Sent> {
    let payload = parse_payload(body).map_err(reject)?;
    let intent = validate(kind, &payload).map_err(reject)?;

    let result = state.router.dispatch(&intent).await;
    NotificationMetrics::record(kind.as_str(), result.outcome());

    match result {
        DeliveryResult::Success { message_id, target } => {
            tracing::info!(kind = %kind, target = %target, message_id = %message_id, "Notification sent");
            Ok(Sent { intent, message_id })
        }
        DeliveryResult::Failure { error_message } => Err(AppError::DeliveryFailed {
            context: kind.description().to_string(),
            details: error_message,
        }),
        DeliveryResult::PartialSuccess { .. } => Err(AppError::Internal(format!(
            "unexpected multicast result for {}",
            kind
        ))),
    }
}

/// POST /api/notifications/admin
#[tracing::instrument(name = "http.admin_announcement", skip(state, body))]
pub async fn admin_announcement(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<NotificationResponse<AdminAnnouncementData>>> {
    let sent = send(&state, NotificationKind::AdminAnnouncement, &body).await?;

    Ok(Json(NotificationResponse::sent(
        "Admin announcement sent successfully",
        AdminAnnouncementData {
            message_id: sent.message_id,
            topic: ADMIN_TOPIC,
            title: sent.intent.title,
            timestamp: Utc::now(),
        },
    )))
}

/// POST /api/notifications/promotion
#[tracing::instrument(name = "http.promotion", skip(state, body))]
pub async fn promotion(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<NotificationResponse<PromotionData>>> {
    let sent = send(&state, NotificationKind::Promotion, &body).await?;

    Ok(Json(NotificationResponse::sent(
        "Promotion notification sent successfully",
        PromotionData {
            message_id: sent.message_id,
            topic: PROMOTION_TOPIC,
            promo_code: sent.intent.promo_code,
            timestamp: Utc::now(),
        },
    )))
}

/// POST /api/notifications/fortune
#[tracing::instrument(name = "http.fortune_ready", skip(state, body))]
pub async fn fortune_ready(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<NotificationResponse<FortuneReadyData>>> {
    let sent = send(&state, NotificationKind::FortuneReady, &body).await?;

    Ok(Json(NotificationResponse::sent(
        "Fortune ready notification sent successfully",
        FortuneReadyData {
            message_id: sent.message_id,
            fortune_type: sent.intent.fortune_type,
            fortune_id: sent.intent.fortune_id,
            timestamp: Utc::now(),
        },
    )))
}

/// POST /api/notifications/user
#[tracing::instrument(name = "http.user_notification", skip(state, body))]
pub async fn user_notification(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<NotificationResponse<UserNotificationData>>> {
    let sent = send(&state, NotificationKind::UserNotification, &body).await?;

    Ok(Json(NotificationResponse::sent(
        "User notification sent successfully",
        UserNotificationData {
            message_id: sent.message_id,
            title: sent.intent.title,
            timestamp: Utc::now(),
        },
    )))
}

/// POST /api/notifications/test
#[tracing::instrument(name = "http.test_notification", skip(state, body))]
pub async fn test_notification(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<NotificationResponse<TestNotificationData>>> {
    let sent = send(&state, NotificationKind::Test, &body).await?;

    let target = if sent.intent.recipient.is_some() {
        "specific_token"
    } else {
        "all_users"
    };

    Ok(Json(NotificationResponse::sent(
        "Test notification sent successfully",
        TestNotificationData {
            message_id: sent.message_id,
            target,
            timestamp: Utc::now(),
        },
    )))
}
