//! Rent and utility payment client methods

use super::request::{ApiRequest, ListParams};
use super::{ApiClient, ClientError};
use serde_json::Value as JsonValue;

impl ApiClient {
    /// List payments, filtered by e.g. `unit_id`, `payer_id` or `status`
    pub async fn list_payments(&self, params: &ListParams) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::get(params.apply("/payments"))).await
    }

    /// Payments whose status is `overdue`
    pub async fn overdue_payments(&self) -> Result<JsonValue, ClientError> {
        let params = ListParams::default().filter("status", "overdue");
        self.list_payments(&params).await
    }

    /// Get a payment
    pub async fn get_payment(&self, payment_id: i64) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::get(format!("/payments/{payment_id}")))
            .await
    }

    /// Record a payment
    pub async fn create_payment(&self, payment: JsonValue) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::post("/payments").json(payment)).await
    }

    /// Update a payment
    pub async fn update_payment(
        &self,
        payment_id: i64,
        payment: JsonValue,
    ) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::put(format!("/payments/{payment_id}")).json(payment))
            .await
    }

    /// Mark a payment as paid
    pub async fn mark_payment_paid(&self, payment_id: i64) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::post(format!("/payments/{payment_id}/mark-paid")))
            .await
    }

    /// Delete a payment
    pub async fn delete_payment(&self, payment_id: i64) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::delete(format!("/payments/{payment_id}")))
            .await
    }

    /// List utility payments, filtered by `property_id`, `unit_id` or `tenant_id`
    pub async fn list_utility_payments(
        &self,
        params: &ListParams,
    ) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::get(params.apply("/payments/utilities")))
            .await
    }

    /// Record a utility payment
    pub async fn create_utility_payment(&self, payment: JsonValue) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::post("/payments/utilities").json(payment))
            .await
    }

    /// Totals of utility payments
    pub async fn utility_payment_summary(
        &self,
        params: &ListParams,
    ) -> Result<JsonValue, ClientError> {
        let path = params.apply("/payments/utilities/summary");
        self.execute(&ApiRequest::get(path)).await
    }
}
