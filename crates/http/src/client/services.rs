//! Additional services offered to tenants and guests
//!
//! The catalogue is public; only changes need an admin session.

use super::request::{ApiRequest, ListParams};
use super::{ApiClient, ClientError};
use serde_json::Value as JsonValue;

impl ApiClient {
    /// List services, with credentials when signed in
    pub async fn list_services(&self, params: &ListParams) -> Result<JsonValue, ClientError> {
        let request = ApiRequest::get(params.apply("/additional-services/"));
        if self.session().access_token().is_some() {
            self.execute(&request).await
        } else {
            self.execute_public(&request).await
        }
    }

    /// Services currently offered
    pub async fn active_services(&self) -> Result<JsonValue, ClientError> {
        let path = ListParams::default()
            .filter("active_only", true)
            .apply("/additional-services/");
        self.execute_public(&ApiRequest::get(path)).await
    }

    /// Get a service
    pub async fn get_service(&self, service_id: i64) -> Result<JsonValue, ClientError> {
        let path = format!("/additional-services/{service_id}");
        self.execute_public(&ApiRequest::get(path)).await
    }

    /// Create a service (admin)
    pub async fn create_service(&self, service: JsonValue) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::post("/additional-services/").json(service))
            .await
    }

    /// Update a service (admin)
    pub async fn update_service(
        &self,
        service_id: i64,
        service: JsonValue,
    ) -> Result<JsonValue, ClientError> {
        let request = ApiRequest::put(format!("/additional-services/{service_id}")).json(service);
        self.execute(&request).await
    }

    /// Delete a service (admin)
    pub async fn delete_service(&self, service_id: i64) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::delete(format!("/additional-services/{service_id}")))
            .await
    }
}
