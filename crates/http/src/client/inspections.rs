//! Inspection booking client methods

use super::request::{ApiRequest, ListParams};
use super::{ApiClient, ClientError};
use serde_json::Value as JsonValue;

impl ApiClient {
    /// List inspections, optionally filtered (e.g. by `status`)
    pub async fn list_inspections(&self, params: &ListParams) -> Result<JsonValue, ClientError> {
        let path = params.apply("/rental-units/inspections");
        self.execute(&ApiRequest::get(path)).await
    }

    /// Get an inspection
    pub async fn get_inspection(&self, inspection_id: i64) -> Result<JsonValue, ClientError> {
        let path = format!("/rental-units/inspections/{inspection_id}");
        self.execute(&ApiRequest::get(path)).await
    }

    /// Book an inspection for a rental unit
    pub async fn book_inspection(
        &self,
        unit_id: i64,
        inspection: JsonValue,
    ) -> Result<JsonValue, ClientError> {
        let path = format!("/rental-units/{unit_id}/book-inspection");
        self.execute(&ApiRequest::post(path).json(inspection)).await
    }

    /// Update an inspection
    pub async fn update_inspection(
        &self,
        inspection_id: i64,
        inspection: JsonValue,
    ) -> Result<JsonValue, ClientError> {
        let path = format!("/rental-units/inspections/{inspection_id}");
        self.execute(&ApiRequest::put(path).json(inspection)).await
    }

    /// Cancel an inspection
    pub async fn cancel_inspection(&self, inspection_id: i64) -> Result<JsonValue, ClientError> {
        let path = format!("/rental-units/inspections/{inspection_id}");
        self.execute(&ApiRequest::delete(path)).await
    }

    /// Inspections booked by the signed-in user
    pub async fn my_inspection_bookings(&self) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::get("/rental-units/inspections/my-bookings"))
            .await
    }

    /// Inspections awaiting confirmation
    pub async fn pending_inspections(&self) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::get("/rental-units/inspections/pending"))
            .await
    }

    /// Inspections for one rental unit
    pub async fn unit_inspections(&self, unit_id: i64) -> Result<JsonValue, ClientError> {
        let path = format!("/rental-units/{unit_id}/inspections");
        self.execute(&ApiRequest::get(path)).await
    }
}
