//! Utility and unit utility client methods

use super::request::{ApiRequest, ListParams};
use super::{ApiClient, ClientError};
use serde_json::Value as JsonValue;

impl ApiClient {
    /// List utilities
    pub async fn list_utilities(&self, params: &ListParams) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::get(params.apply("/utilities")))
            .await
    }

    /// Get a utility
    pub async fn get_utility(&self, utility_id: i64) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::get(format!("/utilities/{utility_id}")))
            .await
    }

    /// Create a utility
    pub async fn create_utility(&self, utility: JsonValue) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::post("/utilities/").json(utility))
            .await
    }

    /// Update a utility
    pub async fn update_utility(
        &self,
        utility_id: i64,
        utility: JsonValue,
    ) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::put(format!("/utilities/{utility_id}")).json(utility))
            .await
    }

    /// Delete a utility
    pub async fn delete_utility(&self, utility_id: i64) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::delete(format!("/utilities/{utility_id}")))
            .await
    }

    /// List utilities attached to units
    pub async fn list_unit_utilities(&self, params: &ListParams) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::get(params.apply("/unit-utilities")))
            .await
    }

    /// Attach a utility to a unit
    pub async fn create_unit_utility(&self, utility: JsonValue) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::post("/unit-utilities/").json(utility))
            .await
    }

    /// Update a unit utility
    pub async fn update_unit_utility(
        &self,
        utility_id: i64,
        utility: JsonValue,
    ) -> Result<JsonValue, ClientError> {
        let request = ApiRequest::put(format!("/unit-utilities/{utility_id}")).json(utility);
        self.execute(&request).await
    }

    /// Detach a utility from a unit
    pub async fn delete_unit_utility(&self, utility_id: i64) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::delete(format!("/unit-utilities/{utility_id}")))
            .await
    }

    /// Utilities of one unit
    pub async fn utilities_for_unit(&self, unit_id: i64) -> Result<JsonValue, ClientError> {
        let path = ListParams::default().filter("unit_id", unit_id).apply("/unit-utilities");
        self.execute(&ApiRequest::get(path)).await
    }

    /// Utilities of one property
    pub async fn utilities_for_property(&self, property_id: i64) -> Result<JsonValue, ClientError> {
        let path = ListParams::default()
            .filter("property_id", property_id)
            .apply("/utilities");
        self.execute(&ApiRequest::get(path)).await
    }
}
