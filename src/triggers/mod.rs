mod http;

pub use http::{
    admin_announcement, fortune_ready, promotion, test_notification, user_notification,
    AdminAnnouncementData, FortuneReadyData, NotificationResponse, PromotionData,
    TestNotificationData, UserNotificationData,
};
