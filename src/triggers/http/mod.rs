//! HTTP notification trigger handlers
//!
//! One endpoint per notification kind:
//! - Admin announcements and promotions (topic broadcast)
//! - Fortune ready and user notifications (single device)
//! - Test notifications (broadcast or single device)

mod handlers;
mod models;

pub use handlers::{
    admin_announcement, fortune_ready, promotion, test_notification, user_notification,
};

pub use models::{
    AdminAnnouncementData, FortuneReadyData, NotificationResponse, PromotionData,
    TestNotificationData, UserNotificationData,
};
