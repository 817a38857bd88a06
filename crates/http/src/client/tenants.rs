//! Tenant management client methods

use super::request::{ApiRequest, FilePart, ListParams, RequestOptions, with_query};
use super::units::encode_segment;
use super::{ApiClient, ClientError};
use chrono::NaiveDate;
use serde_json::{Value as JsonValue, json};

impl ApiClient {
    /// List tenants
    pub async fn list_tenants(&self, params: &ListParams) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::get(params.apply("/tenants"))).await
    }

    /// Get a tenant
    pub async fn get_tenant(&self, tenant_id: i64) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::get(format!("/tenants/{tenant_id}")))
            .await
    }

    /// Create a tenant
    pub async fn create_tenant(&self, tenant: JsonValue) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::post("/tenants").json(tenant)).await
    }

    /// Update a tenant
    pub async fn update_tenant(
        &self,
        tenant_id: i64,
        tenant: JsonValue,
    ) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::put(format!("/tenants/{tenant_id}")).json(tenant))
            .await
    }

    /// Delete a tenant
    pub async fn delete_tenant(&self, tenant_id: i64) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::delete(format!("/tenants/{tenant_id}")))
            .await
    }

    /// Set a tenant's rent payment status
    pub async fn update_tenant_payment_status(
        &self,
        tenant_id: i64,
        status: &str,
        payment_date: Option<NaiveDate>,
    ) -> Result<JsonValue, ClientError> {
        let path = with_query(
            &format!("/tenants/{tenant_id}/payment-status"),
            [
                ("status", Some(status.to_string())),
                ("payment_date", payment_date.map(|d| d.to_string())),
            ],
        );
        self.execute(&ApiRequest::patch(path)).await
    }

    /// Record a tenant moving out
    pub async fn move_out_tenant(
        &self,
        tenant_id: i64,
        move_out_date: NaiveDate,
    ) -> Result<JsonValue, ClientError> {
        let request = ApiRequest::patch(format!("/tenants/{tenant_id}/move-out"))
            .json(json!({ "move_out_date": move_out_date.to_string() }));
        self.execute(&request).await
    }

    /// Tenants with overdue rent
    pub async fn overdue_tenants(&self) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::get("/tenants/overdue")).await
    }

    /// Payment status of all tenants, optionally for one property
    pub async fn tenants_payment_status(
        &self,
        property_id: Option<i64>,
    ) -> Result<JsonValue, ClientError> {
        let path = with_query(
            "/tenants/payment-status",
            [("property_id", property_id.map(|id| id.to_string()))],
        );
        self.execute(&ApiRequest::get(path)).await
    }

    /// Search tenants by free text
    pub async fn search_tenants(
        &self,
        query: &str,
        skip: u32,
        limit: u32,
    ) -> Result<JsonValue, ClientError> {
        let path = ListParams::page(skip, limit)
            .apply(&format!("/tenants/search/{}", encode_segment(query)));
        self.execute(&ApiRequest::get(path)).await
    }

    /// Upload both sides of a tenant's national ID
    pub async fn upload_national_id(
        &self,
        tenant_id: i64,
        front: FilePart,
        back: FilePart,
    ) -> Result<JsonValue, ClientError> {
        let front = FilePart {
            field: "front_image".to_string(),
            ..front
        };
        let back = FilePart {
            field: "back_image".to_string(),
            ..back
        };
        let request = ApiRequest::post(format!("/tenants/{tenant_id}/upload-national-id"))
            .multipart(vec![front, back])
            .options(RequestOptions::upload());
        self.execute(&request).await
    }
}
