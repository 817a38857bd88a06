//! Notification client methods

use super::request::{ApiRequest, ListParams};
use super::{ApiClient, ClientError};
use serde::Deserialize;
use serde_json::Value as JsonValue;

/// `GET /notifications/unread-count` response
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct UnreadCount {
    #[serde(alias = "count")]
    pub unread_count: u64,
}

impl ApiClient {
    /// Notifications for the signed-in user
    pub async fn list_notifications(&self, params: &ListParams) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::get(params.apply("/notifications/")))
            .await
    }

    /// Number of unread notifications
    pub async fn unread_notification_count(&self) -> Result<UnreadCount, ClientError> {
        self.execute(&ApiRequest::get("/notifications/unread-count"))
            .await
    }

    /// Every user's notifications (admin)
    pub async fn all_notifications(&self, params: &ListParams) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::get(params.apply("/notifications/all")))
            .await
    }

    /// Get a notification
    pub async fn get_notification(&self, notification_id: i64) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::get(format!("/notifications/{notification_id}")))
            .await
    }

    /// Create a notification (admin)
    pub async fn create_notification(
        &self,
        notification: JsonValue,
    ) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::post("/notifications/").json(notification))
            .await
    }

    /// Update a notification
    pub async fn update_notification(
        &self,
        notification_id: i64,
        notification: JsonValue,
    ) -> Result<JsonValue, ClientError> {
        let request =
            ApiRequest::put(format!("/notifications/{notification_id}")).json(notification);
        self.execute(&request).await
    }

    /// Delete a notification (admin)
    pub async fn delete_notification(&self, notification_id: i64) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::delete(format!("/notifications/{notification_id}")))
            .await
    }

    /// Mark one notification as read
    pub async fn mark_notification_read(
        &self,
        notification_id: i64,
    ) -> Result<JsonValue, ClientError> {
        let path = format!("/notifications/{notification_id}/mark-read");
        self.execute(&ApiRequest::post(path)).await
    }

    /// Mark every notification as read
    pub async fn mark_all_notifications_read(&self) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::post("/notifications/mark-all-read"))
            .await
    }
}
