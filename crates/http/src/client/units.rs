//! Unit and rental unit client methods

use super::request::{ApiRequest, FilePart, ListParams, RequestOptions};
use super::{ApiClient, ClientError};
use serde_json::Value as JsonValue;

impl ApiClient {
    /// List units
    pub async fn list_units(&self, params: &ListParams) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::get(params.apply("/units/"))).await
    }

    /// Get a unit
    pub async fn get_unit(&self, unit_id: i64) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::get(format!("/units/{unit_id}")))
            .await
    }

    /// Create a unit
    pub async fn create_unit(&self, unit: JsonValue) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::post("/units/").json(unit)).await
    }

    /// Update a unit
    pub async fn update_unit(&self, unit_id: i64, unit: JsonValue) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::put(format!("/units/{unit_id}")).json(unit))
            .await
    }

    /// Delete a unit
    pub async fn delete_unit(&self, unit_id: i64) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::delete(format!("/units/{unit_id}")))
            .await
    }

    /// Search units by free text
    pub async fn search_units(
        &self,
        query: &str,
        params: &ListParams,
    ) -> Result<JsonValue, ClientError> {
        let path = params.apply(&format!("/units/search/{}", encode_segment(query)));
        self.execute(&ApiRequest::get(path)).await
    }

    /// Upload images for a unit
    pub async fn upload_unit_images(
        &self,
        unit_id: i64,
        files: Vec<FilePart>,
    ) -> Result<JsonValue, ClientError> {
        let request = ApiRequest::post(format!("/units/{unit_id}/upload-images"))
            .multipart(files)
            .options(RequestOptions::upload());
        self.execute(&request).await
    }

    /// List rental units
    pub async fn list_rental_units(&self, params: &ListParams) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::get(params.apply("/rental-units/")))
            .await
    }

    /// Get a rental unit
    pub async fn get_rental_unit(&self, unit_id: i64) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::get(format!("/rental-units/{unit_id}")))
            .await
    }

    /// Create a rental unit
    pub async fn create_rental_unit(&self, unit: JsonValue) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::post("/rental-units/").json(unit))
            .await
    }

    /// Update a rental unit
    pub async fn update_rental_unit(
        &self,
        unit_id: i64,
        unit: JsonValue,
    ) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::put(format!("/rental-units/{unit_id}")).json(unit))
            .await
    }

    /// Delete a rental unit
    pub async fn delete_rental_unit(&self, unit_id: i64) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::delete(format!("/rental-units/{unit_id}")))
            .await
    }

    /// Upload images for a rental unit
    pub async fn upload_rental_unit_images(
        &self,
        unit_id: i64,
        files: Vec<FilePart>,
    ) -> Result<JsonValue, ClientError> {
        let request = ApiRequest::post(format!("/rental-units/{unit_id}/upload-images"))
            .multipart(files)
            .options(RequestOptions::upload());
        self.execute(&request).await
    }
}

/// Percent-encode a free-text path segment
pub(crate) fn encode_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

#[cfg(test)]
mod tests {
    use super::encode_segment;

    #[test]
    fn test_encode_segment() {
        assert_eq!(encode_segment("two bed/bath"), "two%20bed%2Fbath");
        assert_eq!(encode_segment("kilimani"), "kilimani");
    }
}
