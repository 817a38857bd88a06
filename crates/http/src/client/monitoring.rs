//! Rent payment monitoring client methods

use super::request::{ApiRequest, with_query};
use super::{ApiClient, ClientError};
use serde_json::Value as JsonValue;

impl ApiClient {
    /// Counts of tenants by payment standing
    pub async fn payment_monitoring_summary(&self) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::get("/payment-monitoring/summary"))
            .await
    }

    /// Tenants grouped by payment category
    pub async fn tenant_payment_categories(&self) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::get("/payment-monitoring/categories"))
            .await
    }

    /// Run the overdue check now instead of waiting for the schedule
    pub async fn run_payment_check(&self) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::post("/payment-monitoring/run-check"))
            .await
    }

    /// Tenants whose payment status is `status`
    pub async fn tenants_by_payment_status(&self, status: &str) -> Result<JsonValue, ClientError> {
        let path = with_query(
            "/tenants/payment-status",
            [("status", Some(status.to_string()))],
        );
        self.execute(&ApiRequest::get(path)).await
    }
}
