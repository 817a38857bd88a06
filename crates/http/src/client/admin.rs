//! Admin dashboard client methods

use super::request::{ApiRequest, ListParams, with_query};
use super::{ApiClient, ClientError};
use carryit_core::UserProfile;
use serde_json::Value as JsonValue;

impl ApiClient {
    /// Platform-wide statistics
    pub async fn admin_stats(&self) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::get("/admin/stats")).await
    }

    /// Most recent system activity
    pub async fn recent_activity(&self, limit: u32) -> Result<JsonValue, ClientError> {
        let path = with_query("/admin/recent-activity", [("limit", Some(limit.to_string()))]);
        self.execute(&ApiRequest::get(path)).await
    }

    /// Open system alerts
    pub async fn system_alerts(&self) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::get("/admin/system-alerts")).await
    }

    /// All user accounts
    pub async fn list_users(&self, skip: u32, limit: u32) -> Result<Vec<UserProfile>, ClientError> {
        let path = ListParams::page(skip, limit).apply("/auth/users");
        self.execute(&ApiRequest::get(path)).await
    }

    /// Get a user account
    pub async fn get_user(&self, user_id: i64) -> Result<UserProfile, ClientError> {
        self.execute(&ApiRequest::get(format!("/auth/users/{user_id}")))
            .await
    }

    /// All maintenance requests
    pub async fn list_maintenance_requests(
        &self,
        skip: u32,
        limit: u32,
    ) -> Result<JsonValue, ClientError> {
        let path = ListParams::page(skip, limit).apply("/maintenance/");
        self.execute(&ApiRequest::get(path)).await
    }

    /// All inspection bookings
    pub async fn list_inspection_bookings(
        &self,
        skip: u32,
        limit: u32,
    ) -> Result<JsonValue, ClientError> {
        let path = ListParams::page(skip, limit).apply("/inspections/");
        self.execute(&ApiRequest::get(path)).await
    }
}
