//! Property and property QR code client methods

use super::request::{ApiRequest, ListParams};
use super::{ApiClient, ClientError};
use serde_json::Value as JsonValue;

impl ApiClient {
    /// List properties
    pub async fn list_properties(&self, params: &ListParams) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::get(params.apply("/properties/")))
            .await
    }

    /// Properties of one owner
    pub async fn properties_by_owner(&self, owner_id: i64) -> Result<JsonValue, ClientError> {
        let params = ListParams::default().filter("owner_id", owner_id);
        self.list_properties(&params).await
    }

    /// Get a property
    pub async fn get_property(&self, property_id: i64) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::get(format!("/properties/{property_id}/")))
            .await
    }

    /// Create a property
    pub async fn create_property(&self, property: JsonValue) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::post("/properties/").json(property))
            .await
    }

    /// Update a property
    pub async fn update_property(
        &self,
        property_id: i64,
        property: JsonValue,
    ) -> Result<JsonValue, ClientError> {
        let request = ApiRequest::put(format!("/properties/{property_id}/")).json(property);
        self.execute(&request).await
    }

    /// Delete a property
    pub async fn delete_property(&self, property_id: i64) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::delete(format!("/properties/{property_id}/")))
            .await
    }

    /// Generate the QR code that links to a property's public page
    pub async fn generate_property_qr(&self, property_id: i64) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::post(format!("/property-qr/generate/{property_id}")))
            .await
    }

    /// Get a property's QR code
    pub async fn property_qr(&self, property_id: i64) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::get(format!("/property-qr/{property_id}")))
            .await
    }
}
